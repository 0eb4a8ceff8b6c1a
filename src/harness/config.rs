use std::env;
use std::path::PathBuf;

use log::debug;

use crate::harness::fixtures::Fixtures;

/// Environment variable set by the remote build environment; scenarios that
/// need pre-built fixtures only run when it is non-empty
pub const REMOTE_ENV_VAR: &str = "PWNDBG_TRAVIS_TEST_RUN";

pub const GDB_ENV_VAR: &str = "GDBPROBE_GDB";
pub const SCRIPT_ENV_VAR: &str = "GDBPROBE_SCRIPT";
pub const WORKDIR_ENV_VAR: &str = "GDBPROBE_WORKDIR";
pub const FIXTURE_BINARY_ENV_VAR: &str = "GDBPROBE_FIXTURE_BINARY";
pub const FIXTURE_CORE_ENV_VAR: &str = "GDBPROBE_FIXTURE_CORE";

/// Default debugger executable, looked up in PATH
pub const DEFAULT_GDB: &str = "gdb";
/// Default plugin bootstrap script
pub const DEFAULT_SCRIPT: &str = "gdbinit.py";

/// Harness settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Debugger executable
    pub gdb: PathBuf,
    /// Plugin bootstrap script passed with `--command`
    pub script: PathBuf,
    /// Working directory for the debugger process
    pub workdir: Option<PathBuf>,
    /// Binary/core fixtures for the gated scenarios
    pub fixtures: Fixtures,
    /// Running in the remote build environment
    pub remote: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            gdb: PathBuf::from(DEFAULT_GDB),
            script: PathBuf::from(DEFAULT_SCRIPT),
            workdir: None,
            fixtures: Fixtures::default(),
            remote: false,
        }
    }
}

impl HarnessConfig {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let mut config = Self::default();

        if let Some(gdb) = get(GDB_ENV_VAR) {
            config.gdb = PathBuf::from(gdb);
        }
        if let Some(script) = get(SCRIPT_ENV_VAR) {
            config.script = PathBuf::from(script);
        }
        if let Some(dir) = get(WORKDIR_ENV_VAR) {
            config.workdir = Some(PathBuf::from(dir));
        }
        if let Some(binary) = get(FIXTURE_BINARY_ENV_VAR) {
            config.fixtures.binary = PathBuf::from(binary);
        }
        if let Some(core) = get(FIXTURE_CORE_ENV_VAR) {
            config.fixtures.core = PathBuf::from(core);
        }
        config.remote = get(REMOTE_ENV_VAR).is_some();

        debug!("Harness configuration: {:?}", config);
        config
    }

    /// Path of the bootstrap script as the debugger will resolve it
    pub fn resolved_script(&self) -> PathBuf {
        match &self.workdir {
            Some(dir) if self.script.is_relative() => dir.join(&self.script),
            _ => self.script.clone(),
        }
    }
}
