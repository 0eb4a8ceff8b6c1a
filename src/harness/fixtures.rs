use std::fmt;
use std::path::{Path, PathBuf};

use goblin::elf::{header, Elf};
use log::debug;

use crate::harness::error::HarnessError;

/// Default fixture location, relative to the plugin checkout
pub const DEFAULT_FIXTURE_DIR: &str = "tests/binaries/old_bash";

/// Pre-built target binary and the core dump taken from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixtures {
    pub binary: PathBuf,
    pub core: PathBuf,
}

impl Fixtures {
    /// Fixtures named `binary` and `core` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            binary: dir.join("binary"),
            core: dir.join("core"),
        }
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::in_dir(DEFAULT_FIXTURE_DIR)
    }
}

/// ELF object type of a fixture file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureKind {
    /// ET_EXEC
    Executable,
    /// ET_DYN, which covers PIE executables
    SharedObject,
    /// ET_CORE
    Core,
    /// Any other e_type
    Other(u16),
}

impl FixtureKind {
    /// Whether a debugger can load this file as a target binary
    pub fn is_loadable(&self) -> bool {
        matches!(self, FixtureKind::Executable | FixtureKind::SharedObject)
    }
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureKind::Executable => write!(f, "executable"),
            FixtureKind::SharedObject => write!(f, "shared object / PIE"),
            FixtureKind::Core => write!(f, "core dump"),
            FixtureKind::Other(e_type) => write!(f, "ELF type {}", e_type),
        }
    }
}

/// Read the ELF header of `path` and classify the file
pub fn inspect(path: &Path) -> Result<FixtureKind, HarnessError> {
    let fixture_error = |reason: String| HarnessError::Fixture {
        path: path.to_path_buf(),
        reason,
    };

    let data = std::fs::read(path).map_err(|e| fixture_error(e.to_string()))?;
    let kind = classify(&data).map_err(fixture_error)?;

    debug!("Fixture {} is {}", path.display(), kind);
    Ok(kind)
}

/// Classify raw file contents by their ELF header
pub fn classify(data: &[u8]) -> Result<FixtureKind, String> {
    if data.len() < header::SIZEOF_IDENT || &data[..header::SELFMAG] != header::ELFMAG {
        return Err("not an ELF file".to_string());
    }

    let elf_header = Elf::parse_header(data).map_err(|e| format!("bad ELF header: {}", e))?;

    Ok(match elf_header.e_type {
        header::ET_EXEC => FixtureKind::Executable,
        header::ET_DYN => FixtureKind::SharedObject,
        header::ET_CORE => FixtureKind::Core,
        other => FixtureKind::Other(other),
    })
}
