use std::path::PathBuf;

use gdbprobe::{
    CheckOutcome, DebuggerCommand, GdbRunner, HarnessConfig, HarnessError, Invocation, Launcher, ProcessLauncher,
    Scenario, BANNER,
};

use crate::test_helpers::{fixture_files, ShellLauncher, FAKE_GDB};

fn runner(body: &str) -> GdbRunner<ShellLauncher> {
    GdbRunner::new(HarnessConfig::default(), ShellLauncher::new(body))
}

#[test]
fn test_stdout_and_stderr_are_interleaved() {
    let output = runner("echo one; echo two >&2; echo three; echo four >&2")
        .run(&Invocation::new())
        .unwrap();
    assert_eq!(output, "one\ntwo\nthree\nfour\n");
}

#[test]
fn test_child_sees_arguments_in_order() {
    let output = runner(r#"for arg in "$@"; do echo "$arg"; done"#)
        .run(&Invocation::new().before("set width 0").binary("/bin/true").after("entry"))
        .unwrap();

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        [
            "--silent", "--nx", "--nh",
            "--eval-command", "set width 0",
            "--command", "gdbinit.py",
            "/bin/true",
            "--eval-command", "entry",
            "--eval-command", "quit",
        ]
    );
}

#[test]
fn test_nonzero_exit_keeps_output() {
    let err = runner("echo 'pwndbg: loaded 12 commands'; echo boom >&2; exit 3")
        .run(&Invocation::new())
        .unwrap_err();

    match err {
        HarnessError::Exit { code, output } => {
            assert_eq!(code, Some(3));
            assert_eq!(output, "pwndbg: loaded ### commands\nboom\n");
        }
        other => panic!("expected exit error, got {:?}", other),
    }
}

#[test]
fn test_invalid_utf8_output_fails_decode() {
    let err = runner(r"printf '\377\376'").run(&Invocation::new()).unwrap_err();
    assert!(matches!(err, HarnessError::Decode(_)));
}

#[test]
fn test_stdin_is_closed() {
    // A session that reads stdin must see EOF instead of hanging
    let output = runner("cat; echo done").run(&Invocation::new()).unwrap();
    assert_eq!(output, "done\n");
}

#[test]
fn test_spawn_failure_names_program() {
    let command = DebuggerCommand {
        program: PathBuf::from("/nonexistent/gdbprobe/gdb"),
        args: Vec::new(),
    };
    match ProcessLauncher::new().launch(&command) {
        Err(HarnessError::Spawn { program, .. }) => assert_eq!(program, "/nonexistent/gdbprobe/gdb"),
        other => panic!("expected spawn error, got {:?}", other),
    }
}

#[test]
fn test_workdir_is_applied() {
    let launcher = ProcessLauncher::new().with_workdir("/");
    let output = launcher
        .launch(&DebuggerCommand {
            program: PathBuf::from("pwd"),
            args: Vec::new(),
        })
        .unwrap();
    assert!(output.success());
    assert_eq!(output.bytes, b"/\n");
}

#[test]
fn test_fake_pure_gdb_prints_banner_only() {
    let output = runner(FAKE_GDB).run(&Invocation::new()).unwrap();
    assert_eq!(output, BANNER);
}

#[test]
fn test_fake_pure_gdb_scenario_passes() {
    let outcome = Scenario::PureGdb.check(&runner(FAKE_GDB));
    assert!(matches!(outcome, CheckOutcome::Passed), "{:?}", outcome);
}

#[test]
fn test_fake_missing_binary_scenario_passes() {
    let outcome = Scenario::MissingBinary.check(&runner(FAKE_GDB));
    assert!(matches!(outcome, CheckOutcome::Passed), "{:?}", outcome);
}

fn remote_runner(fixture_dir: &str) -> GdbRunner<ShellLauncher> {
    let config = HarnessConfig {
        remote: true,
        fixtures: fixture_files(fixture_dir),
        ..HarnessConfig::default()
    };
    GdbRunner::new(config, ShellLauncher::new(FAKE_GDB))
}

#[test]
fn test_fake_binary_scenario_passes() {
    let outcome = Scenario::Binary.check(&remote_runner("binary"));
    assert!(matches!(outcome, CheckOutcome::Passed), "{:?}", outcome);
}

#[test]
fn test_fake_binary_core_scenario_passes() {
    let outcome = Scenario::BinaryCore.check(&remote_runner("binary-core"));
    assert!(matches!(outcome, CheckOutcome::Passed), "{:?}", outcome);
}

#[test]
fn test_fake_core_scenario_passes() {
    let outcome = Scenario::Core.check(&remote_runner("core"));
    assert!(matches!(outcome, CheckOutcome::Passed), "{:?}", outcome);
}

#[test]
fn test_fake_gated_scenarios_skip_locally() {
    let config = HarnessConfig {
        fixtures: fixture_files("local"),
        ..HarnessConfig::default()
    };
    let runner = GdbRunner::new(config, ShellLauncher::new(FAKE_GDB));

    for scenario in [Scenario::Binary, Scenario::BinaryCore, Scenario::Core] {
        assert!(matches!(scenario.check(&runner), CheckOutcome::Skipped(_)));
    }
}

#[test]
fn test_fake_binary_scenario_fails_against_other_binary() {
    // The stand-in echoes the binary it was given; a different fixture path
    // in the expectation must surface as a mismatch, not a pass
    let runner = remote_runner("other-binary");
    let mut fixtures = runner.config().fixtures.clone();
    fixtures.binary = fixtures.binary.with_file_name("renamed");

    let output = runner.run(&Scenario::Binary.invocation(&runner.config().fixtures)).unwrap();
    assert!(Scenario::Binary.expected(&fixtures).check(&output).is_err());
}
