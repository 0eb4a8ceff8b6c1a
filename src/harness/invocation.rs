use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Flags that put the debugger into a quiet, non-interactive session
/// without reading any init file
pub const SESSION_FLAGS: [&str; 3] = ["--silent", "--nx", "--nh"];

/// Command that terminates the session once every other command ran
pub const QUIT_COMMAND: &str = "quit";

/// One debugger session: commands before the bootstrap script, the target,
/// and commands after it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    before: Vec<String>,
    binary: Option<PathBuf>,
    core: Option<PathBuf>,
    after: Vec<String>,
}

impl Invocation {
    /// Create an empty invocation (no target, no extra commands)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command evaluated before the bootstrap script
    pub fn before(mut self, command: impl Into<String>) -> Self {
        self.before.push(command.into());
        self
    }

    /// Append a command evaluated after the bootstrap script
    pub fn after(mut self, command: impl Into<String>) -> Self {
        self.after.push(command.into());
        self
    }

    /// Set the target binary. An empty path means no binary.
    pub fn binary(mut self, path: impl AsRef<Path>) -> Self {
        self.binary = non_empty(path.as_ref());
        self
    }

    /// Set the core dump. An empty path means no core.
    pub fn core(mut self, path: impl AsRef<Path>) -> Self {
        self.core = non_empty(path.as_ref());
        self
    }

    pub fn before_commands(&self) -> &[String] {
        &self.before
    }

    pub fn after_commands(&self) -> &[String] {
        &self.after
    }

    pub fn binary_path(&self) -> Option<&Path> {
        self.binary.as_deref()
    }

    pub fn core_path(&self) -> Option<&Path> {
        self.core.as_deref()
    }

    /// Build the concrete command line for `program` running `script`
    pub fn command_line(&self, program: &Path, script: &Path) -> DebuggerCommand {
        let mut args: Vec<OsString> = SESSION_FLAGS.iter().map(OsString::from).collect();

        for cmd in &self.before {
            args.push("--eval-command".into());
            args.push(cmd.into());
        }

        args.push("--command".into());
        args.push(script.into());

        if let Some(binary) = &self.binary {
            args.push(binary.into());
        }

        if let Some(core) = &self.core {
            args.push("--core".into());
            args.push(core.into());
        }

        for cmd in &self.after {
            args.push("--eval-command".into());
            args.push(cmd.into());
        }

        args.push("--eval-command".into());
        args.push(QUIT_COMMAND.into());

        DebuggerCommand {
            program: program.to_path_buf(),
            args,
        }
    }
}

fn non_empty(path: &Path) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path.to_path_buf())
    }
}

/// Fully resolved debugger command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebuggerCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl DebuggerCommand {
    /// Arguments as lossy strings, handy for assertions and logs
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for DebuggerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in self.args_lossy() {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg.replace('\'', "'\\''"))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
