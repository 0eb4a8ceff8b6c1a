use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, Context, Result};
use log::{info, LevelFilter};

use gdbprobe::harness::fixtures;
use gdbprobe::{CheckOutcome, GdbRunner, HarnessConfig, HarnessError, Invocation, Scenario};

/// What the command line asked for
enum Mode {
    /// Check these scenarios against their fixture text
    Check(Vec<Scenario>),
    /// Run one ad-hoc session and print its normalized output
    Run(Invocation),
    List,
    Fixtures,
}

/// GDBPROBE - load smoke-test harness for GDB plugins
fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("gdbprobe");

    let mut config = HarnessConfig::from_env();
    let mut verbose = false;
    let mut run_mode = false;
    let mut invocation = Invocation::new();
    let mut scenarios = Vec::new();
    let mut mode = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            // Version
            "-v" | "--version" => {
                println!("GDBPROBE v{}", gdbprobe::VERSION);
                println!("{}", gdbprobe::PKG_DESCRIPTION);
                process::exit(0);
            }
            // Help
            "-h" | "--help" => {
                print_usage(program_name);
                process::exit(0);
            }
            "--list" => mode = Some(Mode::List),
            "--fixtures" => mode = Some(Mode::Fixtures),
            "--remote" => config.remote = true,
            "--verbose" => verbose = true,
            "--run" => run_mode = true,
            "--gdb" => config.gdb = PathBuf::from(value(&args, &mut i)?),
            "--script" => config.script = PathBuf::from(value(&args, &mut i)?),
            "--workdir" => config.workdir = Some(PathBuf::from(value(&args, &mut i)?)),
            "--fixture-binary" => config.fixtures.binary = PathBuf::from(value(&args, &mut i)?),
            "--fixture-core" => config.fixtures.core = PathBuf::from(value(&args, &mut i)?),
            "--binary" => invocation = invocation.binary(value(&args, &mut i)?),
            "--core" => invocation = invocation.core(value(&args, &mut i)?),
            "-b" | "--before" => invocation = invocation.before(value(&args, &mut i)?),
            "-a" | "--after" => invocation = invocation.after(value(&args, &mut i)?),
            flag if flag.starts_with('-') => {
                eprintln!("Unknown option: {}", flag);
                print_usage(program_name);
                process::exit(2);
            }
            // Anything else names a scenario
            name => scenarios.push(name.parse::<Scenario>()?),
        }

        i += 1;
    }

    gdbprobe::init_logging(if verbose { LevelFilter::Debug } else { LevelFilter::Info });
    info!("Starting GDBPROBE v{}", gdbprobe::VERSION);

    let mode = match mode {
        Some(mode) => mode,
        None if run_mode => Mode::Run(invocation),
        None if scenarios.is_empty() => Mode::Check(Scenario::ALL.to_vec()),
        None => Mode::Check(scenarios),
    };

    let ok = match mode {
        Mode::List => {
            list_scenarios(&config);
            true
        }
        Mode::Fixtures => report_fixtures(&config),
        Mode::Run(invocation) => run_once(config, &invocation)?,
        Mode::Check(scenarios) => check_scenarios(config, &scenarios),
    };

    if !ok {
        process::exit(1);
    }

    info!("GDBPROBE exiting");
    Ok(())
}

/// Take the value following the flag at `args[*i]`
fn value(args: &[String], i: &mut usize) -> Result<String> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| anyhow!("Missing value for {}", flag))
}

fn list_scenarios(config: &HarnessConfig) {
    for scenario in Scenario::ALL {
        match scenario.skip_reason(config) {
            Some(reason) => println!("{:<16} {} (skipped: {})", scenario.name(), scenario.description(), reason),
            None => println!("{:<16} {}", scenario.name(), scenario.description()),
        }
    }
}

fn report_fixtures(config: &HarnessConfig) -> bool {
    let mut ok = true;
    for (role, path) in [("binary", &config.fixtures.binary), ("core", &config.fixtures.core)] {
        let path = match &config.workdir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.clone(),
        };
        match fixtures::inspect(&path) {
            Ok(kind) => println!("{:<7} {} ({})", role, path.display(), kind),
            Err(e) => {
                println!("{:<7} {}", role, e);
                ok = false;
            }
        }
    }
    ok
}

fn run_once(config: HarnessConfig, invocation: &Invocation) -> Result<bool> {
    let runner = GdbRunner::from_config(config);
    match runner.run(invocation) {
        Ok(output) => {
            print!("{}", output);
            Ok(true)
        }
        Err(HarnessError::Exit { code, output }) => {
            print!("{}", output);
            eprintln!("debugger exited with {:?}", code);
            Ok(false)
        }
        Err(e) => Err(e).context("debugger session failed"),
    }
}

fn check_scenarios(config: HarnessConfig, scenarios: &[Scenario]) -> bool {
    let runner = GdbRunner::from_config(config);
    let mut failures = 0;

    for scenario in scenarios {
        let outcome = scenario.check(&runner);
        match &outcome {
            CheckOutcome::Passed => println!("PASS  {}", scenario),
            CheckOutcome::Skipped(reason) => println!("SKIP  {} ({})", scenario, reason),
            CheckOutcome::Failed(mismatch) => println!("FAIL  {}\n{}", scenario, mismatch),
            CheckOutcome::Errored(e) => {
                println!("ERROR {}: {}", scenario, e);
                if let Some(output) = e.output() {
                    println!("{}", output);
                }
            }
        }
        if outcome.is_failure() {
            failures += 1;
        }
    }

    println!("{} scenario(s), {} failed", scenarios.len(), failures);
    failures == 0
}

/// Print usage information
fn print_usage(program_name: &str) {
    println!("GDBPROBE - load smoke-test harness for GDB plugins");
    println!("Usage: {} [options] [scenario...]", program_name);
    println!("       {} --run [--binary PATH] [--core PATH] [-b CMD]... [-a CMD]...", program_name);
    println!();
    println!("Options:");
    println!("  -h, --help             Display this help message");
    println!("  -v, --version          Display version information");
    println!("  --list                 List scenarios and whether they would run");
    println!("  --fixtures             Inspect the binary/core fixtures");
    println!("  --gdb PATH             Debugger executable (default: gdb)");
    println!("  --script PATH          Plugin bootstrap script (default: gdbinit.py)");
    println!("  --workdir DIR          Directory to run the debugger in");
    println!("  --fixture-binary PATH  Fixture binary");
    println!("  --fixture-core PATH    Fixture core dump");
    println!("  --remote               Run fixture scenarios as in the remote build environment");
    println!("  --verbose              Debug logging");
    println!();
    println!("Ad-hoc session (--run):");
    println!("  --binary PATH          Target binary");
    println!("  --core PATH            Core dump");
    println!("  -b, --before CMD       Command evaluated before the bootstrap script");
    println!("  -a, --after CMD        Command evaluated after the bootstrap script");
    println!();
    println!("Scenarios: pure-gdb, binary, binary-core, core, missing-binary");
}
