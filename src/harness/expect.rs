use std::fmt::Write as _;
use std::path::Path;

use difference::{Changeset, Difference};
use thiserror::Error;

/// Plugin startup banner, after normalization
pub const BANNER: &str = concat!(
    "pwndbg: loaded ### commands. Type pwndbg [filter] for a list.\n",
    "pwndbg: created $rebase, $ida gdb functions (can be used with print/break)\n",
);

/// Thread notice printed when the fixture core is loaded
pub const CORE_LWP_LINE: &str = "[New LWP 13562]\n";
/// Path the fixture core was originally generated from
pub const CORE_ORIGIN_PATH: &str = "/home/user/pwndbg/tests/corefiles/bash/binary";
pub const CORE_SIGNAL_LINE: &str = "Program terminated with signal SIGINT, Interrupt.\n";
/// Program counter recorded in the fixture core
pub const CORE_FRAME_ADDRESS: &str = "0x00007ffff76d36b0";

/// Width of the volatile fragment inside the `file=` argument of the
/// binary+core frame line
pub const FRAME_GAP_CHARS: usize = 10;

/// Placeholder shown in diffs where characters were skipped
const GAP_MARKER: &str = "<skipped>";

/// Symbol-loading notice for a binary without debug info
pub fn symbols_line(binary: &Path) -> String {
    format!(
        "Reading symbols from {}...(no debugging symbols found)...done.\n",
        binary.display()
    )
}

/// Lines the debugger prints when attaching to the fixture core, ending
/// with the `#0` frame prefix
fn core_header() -> String {
    format!(
        "{}Core was generated by `{}'.\n{}#0  {} in ",
        CORE_LWP_LINE, CORE_ORIGIN_PATH, CORE_SIGNAL_LINE, CORE_FRAME_ADDRESS
    )
}

/// Frame line for the core with the binary's symbols, up to the volatile
/// part of the `file` string
pub fn binary_core_prefix(binary: &Path) -> String {
    format!(
        "{}{}faccessat (fd=0, file=0x7fffffffc8ef \"",
        symbols_line(binary),
        core_header()
    )
}

/// Rest of the binary+core output after the volatile fragment
pub fn binary_core_suffix() -> String {
    let mut suffix = String::from(
        "\", \n    mode=1, flag=-1) at ../sysdeps/unix/sysv/linux/faccessat.c:41\n\
         41\t../sysdeps/unix/sysv/linux/faccessat.c: No such file or directory.\n",
    );
    suffix.push_str(BANNER);
    suffix
}

/// Output of the core-only session, where no symbols resolve the frame
pub fn core_only() -> String {
    format!("{}?? ()\n{}", core_header(), BANNER)
}

/// What a session's normalized output must look like
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// Byte-for-byte equality
    Exact(String),
    /// `prefix`, then exactly `gap` characters of anything, then `suffix`
    Gapped {
        prefix: String,
        gap: usize,
        suffix: String,
    },
}

impl Expected {
    pub fn exact(text: impl Into<String>) -> Self {
        Expected::Exact(text.into())
    }

    /// Expected text as shown in diffs
    pub fn render(&self) -> String {
        match self {
            Expected::Exact(text) => text.clone(),
            Expected::Gapped { prefix, suffix, .. } => format!("{}{}{}", prefix, GAP_MARKER, suffix),
        }
    }

    /// Compare `actual` against the expectation
    pub fn check(&self, actual: &str) -> Result<(), Mismatch> {
        match self {
            Expected::Exact(text) => {
                if actual == text {
                    Ok(())
                } else {
                    Err(Mismatch::new(text, actual))
                }
            }
            Expected::Gapped { prefix, gap, suffix } => {
                let Some(rest) = actual.strip_prefix(prefix.as_str()) else {
                    return Err(Mismatch::new(&self.render(), actual));
                };

                let skipped = rest.chars().take(*gap).count();
                let tail: String = rest.chars().skip(*gap).collect();
                if skipped == *gap && tail == *suffix {
                    return Ok(());
                }

                let masked = format!("{}{}{}", prefix, GAP_MARKER, tail);
                Err(Mismatch::new(&self.render(), &masked))
            }
        }
    }
}

/// Captured output did not match the expectation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("output mismatch (- expected, + actual):\n{diff}")]
pub struct Mismatch {
    pub expected: String,
    pub actual: String,
    /// Line diff with ` `, `-` and `+` markers
    pub diff: String,
}

impl Mismatch {
    pub fn new(expected: &str, actual: &str) -> Self {
        let changeset = Changeset::new(expected, actual, "\n");
        Self {
            expected: expected.to_string(),
            actual: actual.to_string(),
            diff: render_diff(&changeset.diffs),
        }
    }
}

fn render_diff(diffs: &[Difference]) -> String {
    let mut out = String::new();
    for diff in diffs {
        let (marker, text) = match diff {
            Difference::Same(x) => (' ', x),
            Difference::Add(x) => ('+', x),
            Difference::Rem(x) => ('-', x),
        };
        // The empty segment after a trailing '\n' is not a line of its own,
        // whether it trails a chunk or forms a chunk by itself
        if text.is_empty() && marker == ' ' {
            continue;
        }
        let body = text.strip_suffix('\n').unwrap_or(text);
        for line in body.split('\n') {
            let _ = writeln!(out, "{}{}", marker, line);
        }
    }
    out
}
