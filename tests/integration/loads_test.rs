//! Plugin load checks against a real debugger.
//!
//! These need `gdb` and the plugin's bootstrap script (run from the plugin
//! checkout, or point `GDBPROBE_WORKDIR` at it). When either is missing the
//! tests return early. Fixture scenarios additionally need the remote build
//! environment toggle.

use std::process::{Command, Stdio};

use gdbprobe::harness::fixtures::{self, FixtureKind};
use gdbprobe::{run_gdb_with_script, CheckOutcome, GdbRunner, HarnessConfig, Scenario, BANNER};

/// Config for a usable debugger + plugin, or `None` to skip
fn live_config() -> Option<HarnessConfig> {
    let config = HarnessConfig::from_env();

    if !config.resolved_script().exists() {
        eprintln!("skipping: {} not found", config.resolved_script().display());
        return None;
    }

    let gdb_works = Command::new(&config.gdb)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);
    if !gdb_works {
        eprintln!("skipping: {} is not runnable", config.gdb.display());
        return None;
    }

    Some(config)
}

fn assert_scenario(scenario: Scenario) {
    let Some(config) = live_config() else { return };
    let runner = GdbRunner::from_config(config);

    match scenario.check(&runner) {
        CheckOutcome::Passed => {}
        CheckOutcome::Skipped(reason) => eprintln!("skipping {}: {}", scenario, reason),
        CheckOutcome::Failed(mismatch) => panic!("{} failed\n{}", scenario, mismatch),
        CheckOutcome::Errored(e) => panic!("{} errored: {}\n{}", scenario, e, e.output().unwrap_or("")),
    }
}

#[test]
fn test_loads_pure_gdb_without_crashing() {
    assert_scenario(Scenario::PureGdb);
}

#[test]
fn test_loads_binary_without_crashing() {
    assert_scenario(Scenario::Binary);
}

#[test]
fn test_loads_binary_with_core_without_crashing() {
    assert_scenario(Scenario::BinaryCore);
}

#[test]
fn test_loads_core_without_crashing() {
    assert_scenario(Scenario::Core);
}

#[test]
fn test_entry_no_file_loaded() {
    assert_scenario(Scenario::MissingBinary);
}

#[test]
fn test_helper_matches_scenario_runner() {
    let Some(config) = live_config() else { return };

    let output = run_gdb_with_script(&config, None, None, &[], &[]).unwrap();
    assert_eq!(output, BANNER);
}

#[test]
fn test_fixtures_have_expected_kinds() {
    let Some(config) = live_config() else { return };
    if !config.remote {
        return;
    }

    let dir = config.workdir.clone().unwrap_or_default();
    let binary = fixtures::inspect(&dir.join(&config.fixtures.binary)).unwrap();
    let core = fixtures::inspect(&dir.join(&config.fixtures.core)).unwrap();

    assert!(binary.is_loadable(), "binary fixture is {}", binary);
    assert_eq!(core, FixtureKind::Core);
}
