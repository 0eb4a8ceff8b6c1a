//! GDBPROBE - load smoke-test harness for GDB plugins
//!
//! Launches the host debugger non-interactively with the plugin bootstrap
//! script, captures the merged session output and checks it against pinned
//! fixture text. Used both by the `gdbprobe` binary and by the test suite.

pub mod harness;
pub mod platform;

/// Re-export key types for easier access in tests
pub use harness::config::HarnessConfig;
pub use harness::error::HarnessError;
pub use harness::expect::{Expected, Mismatch, BANNER};
pub use harness::fixtures::{FixtureKind, Fixtures};
pub use harness::invocation::{DebuggerCommand, Invocation};
pub use harness::launcher::{Launcher, ProcessLauncher, RawOutput};
pub use harness::normalize::normalize;
pub use harness::runner::{run_gdb_with_script, GdbRunner};
pub use harness::scenario::{CheckOutcome, Scenario};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize the logging system
pub fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("gdbprobe", level)
        .format_timestamp_secs()
        .init();
}
