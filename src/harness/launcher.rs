use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;

use log::{debug, info};

use crate::harness::error::HarnessError;
use crate::harness::invocation::DebuggerCommand;

/// What a finished debugger session left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    /// Merged stdout and stderr bytes
    pub bytes: Vec<u8>,
}

impl RawOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a debugger command line to completion
pub trait Launcher {
    fn launch(&self, command: &DebuggerCommand) -> Result<RawOutput, HarnessError>;
}

/// Launcher that spawns a real child process and blocks until it exits
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher {
    /// Directory the child runs in (defaults to ours)
    workdir: Option<PathBuf>,
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the child in `dir`. The bootstrap script path is resolved
    /// relative to it.
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    fn command(&self, command: &DebuggerCommand) -> Command {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).stdin(Stdio::null());
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd
    }

    #[cfg(unix)]
    fn run(&self, command: &DebuggerCommand) -> Result<RawOutput, HarnessError> {
        let pipe = crate::platform::merged_pipe()?;
        let mut reader = pipe.reader;

        // Our copies of the write end live in `cmd` and must be closed before
        // reading, otherwise the read never sees EOF
        let mut child = {
            let mut cmd = self.command(command);
            cmd.stdout(pipe.stdout).stderr(pipe.stderr);
            cmd.spawn().map_err(|source| HarnessError::Spawn {
                program: command.program.display().to_string(),
                source,
            })?
        };
        debug!("Spawned debugger with PID {}", child.id());

        let mut bytes = Vec::new();
        let read_result = reader.read_to_end(&mut bytes);
        let status = child.wait()?;
        read_result?;

        Ok(RawOutput { code: status.code(), bytes })
    }

    #[cfg(not(unix))]
    fn run(&self, command: &DebuggerCommand) -> Result<RawOutput, HarnessError> {
        // No shared pipe here: stderr is appended after stdout
        let output = self
            .command(command)
            .output()
            .map_err(|source| HarnessError::Spawn {
                program: command.program.display().to_string(),
                source,
            })?;

        let mut bytes = output.stdout;
        bytes.extend_from_slice(&output.stderr);
        Ok(RawOutput { code: output.status.code(), bytes })
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, command: &DebuggerCommand) -> Result<RawOutput, HarnessError> {
        info!("Launching command: {}", command);
        let start = Instant::now();

        let output = self.run(command)?;

        debug!(
            "Debugger finished in {:?} with code {:?}, {} bytes captured",
            start.elapsed(),
            output.code,
            output.bytes.len()
        );
        Ok(output)
    }
}
