use std::path::Path;

use log::{debug, warn};

use crate::harness::config::HarnessConfig;
use crate::harness::error::HarnessError;
use crate::harness::invocation::Invocation;
use crate::harness::launcher::{Launcher, ProcessLauncher};
use crate::harness::normalize::{decode, normalize};

/// Runs debugger sessions with the plugin loaded and returns their
/// normalized output
pub struct GdbRunner<L: Launcher = ProcessLauncher> {
    config: HarnessConfig,
    launcher: L,
}

impl GdbRunner<ProcessLauncher> {
    /// Runner backed by real child processes
    pub fn from_config(config: HarnessConfig) -> Self {
        let mut launcher = ProcessLauncher::new();
        if let Some(dir) = &config.workdir {
            launcher = launcher.with_workdir(dir);
        }
        Self::new(config, launcher)
    }
}

impl<L: Launcher> GdbRunner<L> {
    pub fn new(config: HarnessConfig, launcher: L) -> Self {
        Self { config, launcher }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run one session and return its normalized output.
    ///
    /// A non-zero exit is reported as [`HarnessError::Exit`] carrying the
    /// normalized text produced up to that point.
    pub fn run(&self, invocation: &Invocation) -> Result<String, HarnessError> {
        let command = invocation.command_line(&self.config.gdb, &self.config.script);
        let raw = self.launcher.launch(&command)?;

        let text = decode(raw.bytes)?;
        let output = normalize(&text).into_owned();

        if raw.code != Some(0) {
            warn!("Debugger exited with {:?}: {}", raw.code, command);
            return Err(HarnessError::Exit {
                code: raw.code,
                output,
            });
        }

        debug!("Captured {} lines of output", output.lines().count());
        Ok(output)
    }
}

/// Convenience wrapper in the shape of the classic helper: empty paths mean
/// "not given", command lists are run in order around the bootstrap script.
pub fn run_gdb_with_script(
    config: &HarnessConfig,
    binary: Option<&Path>,
    core: Option<&Path>,
    before: &[&str],
    after: &[&str],
) -> Result<String, HarnessError> {
    let mut invocation = Invocation::new();
    for cmd in before {
        invocation = invocation.before(*cmd);
    }
    if let Some(binary) = binary {
        invocation = invocation.binary(binary);
    }
    if let Some(core) = core {
        invocation = invocation.core(core);
    }
    for cmd in after {
        invocation = invocation.after(*cmd);
    }

    GdbRunner::from_config(config.clone()).run(&invocation)
}
