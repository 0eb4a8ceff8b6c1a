use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors raised while launching the debugger or interpreting its output
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The debugger process could not be started at all
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Pipe setup, reading or waiting on the child failed
    #[error("I/O error while running debugger: {0}")]
    Io(#[from] io::Error),

    /// The debugger exited unsuccessfully; `output` is everything it printed
    #[error("debugger exited with {}", describe_code(.code))]
    Exit { code: Option<i32>, output: String },

    /// Captured bytes were not valid UTF-8
    #[error("debugger output is not valid UTF-8: {0}")]
    Decode(#[from] FromUtf8Error),

    /// A fixture file is missing or unreadable
    #[error("fixture {}: {reason}", .path.display())]
    Fixture { path: PathBuf, reason: String },

    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
}

impl HarnessError {
    /// Output captured before the failure, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            HarnessError::Exit { output, .. } => Some(output),
            _ => None,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (killed by signal)".to_string(),
    }
}
