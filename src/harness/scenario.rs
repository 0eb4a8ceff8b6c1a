use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use log::{debug, info};

use crate::harness::config::{HarnessConfig, REMOTE_ENV_VAR};
use crate::harness::error::HarnessError;
use crate::harness::expect::{self, Expected, Mismatch, BANNER, FRAME_GAP_CHARS};
use crate::harness::fixtures::Fixtures;
use crate::harness::invocation::Invocation;
use crate::harness::launcher::Launcher;
use crate::harness::runner::GdbRunner;

/// Binary path that is guaranteed not to exist
pub const MISSING_BINARY: &str = "not_existing_binary";

/// Command run against a session with nothing loaded
pub const ENTRY_COMMAND: &str = "entry";

/// Plugin load scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Plain debugger, no target
    PureGdb,
    /// Fixture binary only
    Binary,
    /// Fixture binary with its core dump
    BinaryCore,
    /// Core dump without the binary
    Core,
    /// Nonexistent binary followed by `entry`
    MissingBinary,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::PureGdb,
        Scenario::Binary,
        Scenario::BinaryCore,
        Scenario::Core,
        Scenario::MissingBinary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::PureGdb => "pure-gdb",
            Scenario::Binary => "binary",
            Scenario::BinaryCore => "binary-core",
            Scenario::Core => "core",
            Scenario::MissingBinary => "missing-binary",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::PureGdb => "loads into a plain debugger without crashing",
            Scenario::Binary => "loads with a binary without crashing",
            Scenario::BinaryCore => "loads with a binary and its core without crashing",
            Scenario::Core => "loads with a core only without crashing",
            Scenario::MissingBinary => "reports `entry` with no file loaded",
        }
    }

    /// Whether the scenario uses the pre-built binary/core fixtures
    pub fn needs_fixtures(&self) -> bool {
        matches!(self, Scenario::Binary | Scenario::BinaryCore | Scenario::Core)
    }

    pub fn invocation(&self, fixtures: &Fixtures) -> Invocation {
        match self {
            Scenario::PureGdb => Invocation::new(),
            Scenario::Binary => Invocation::new().binary(&fixtures.binary),
            Scenario::BinaryCore => Invocation::new().binary(&fixtures.binary).core(&fixtures.core),
            Scenario::Core => Invocation::new().core(&fixtures.core),
            Scenario::MissingBinary => Invocation::new().binary(MISSING_BINARY).after(ENTRY_COMMAND),
        }
    }

    pub fn expected(&self, fixtures: &Fixtures) -> Expected {
        match self {
            Scenario::PureGdb => Expected::exact(BANNER),
            Scenario::Binary => Expected::exact(expect::symbols_line(&fixtures.binary) + BANNER),
            Scenario::BinaryCore => Expected::Gapped {
                prefix: expect::binary_core_prefix(&fixtures.binary),
                gap: FRAME_GAP_CHARS,
                suffix: expect::binary_core_suffix(),
            },
            Scenario::Core => Expected::exact(expect::core_only()),
            Scenario::MissingBinary => Expected::exact(format!(
                "{}: No such file or directory.\n{}{}: There is no file loaded.\n",
                MISSING_BINARY, BANNER, ENTRY_COMMAND
            )),
        }
    }

    /// Reason this scenario should not run under `config`, if any
    pub fn skip_reason(&self, config: &HarnessConfig) -> Option<String> {
        if !self.needs_fixtures() || config.remote {
            return None;
        }
        Some(format!(
            "uses fixtures built in the remote build environment (set {})",
            REMOTE_ENV_VAR
        ))
    }

    /// First fixture this scenario needs that does not exist under `config`
    pub fn missing_fixture(&self, config: &HarnessConfig) -> Option<PathBuf> {
        let fixtures = &config.fixtures;
        let needed = match self {
            Scenario::Binary => vec![&fixtures.binary],
            Scenario::BinaryCore => vec![&fixtures.binary, &fixtures.core],
            Scenario::Core => vec![&fixtures.core],
            Scenario::PureGdb | Scenario::MissingBinary => Vec::new(),
        };
        needed
            .into_iter()
            .map(|path| match &config.workdir {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path.clone(),
            })
            .find(|path| !path.exists())
    }

    /// Run the scenario and compare its output
    pub fn check<L: Launcher>(&self, runner: &GdbRunner<L>) -> CheckOutcome {
        let config = runner.config();
        if let Some(reason) = self.skip_reason(config) {
            debug!("Skipping {}: {}", self.name(), reason);
            return CheckOutcome::Skipped(reason);
        }

        // A gated scenario that is enabled but lacks its fixture is broken
        // setup, not a skip
        if let Some(path) = self.missing_fixture(config) {
            return CheckOutcome::Errored(HarnessError::Fixture {
                path,
                reason: "not found".to_string(),
            });
        }

        info!("Running scenario {}", self.name());
        let output = match runner.run(&self.invocation(&config.fixtures)) {
            Ok(output) => output,
            Err(e) => return CheckOutcome::Errored(e),
        };

        match self.expected(&config.fixtures).check(&output) {
            Ok(()) => CheckOutcome::Passed,
            Err(mismatch) => CheckOutcome::Failed(mismatch),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| HarnessError::UnknownScenario(s.to_string()))
    }
}

/// Result of checking one scenario
#[derive(Debug)]
pub enum CheckOutcome {
    Passed,
    Skipped(String),
    Failed(Mismatch),
    Errored(HarnessError),
}

impl CheckOutcome {
    /// Whether this outcome should fail the run
    pub fn is_failure(&self) -> bool {
        matches!(self, CheckOutcome::Failed(_) | CheckOutcome::Errored(_))
    }
}
