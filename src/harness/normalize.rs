use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::harness::error::HarnessError;

/// Replacement for the command count in the plugin banner
pub const COMMAND_COUNT_PLACEHOLDER: &str = "loaded ### commands";

fn command_count_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"loaded [0-9]+ commands").unwrap())
}

/// Rewrite the loaded-command count in the banner so output is stable
/// across environments where the plugin registers a different number of
/// commands
pub fn normalize(text: &str) -> Cow<'_, str> {
    command_count_regex().replace_all(text, COMMAND_COUNT_PLACEHOLDER)
}

/// Decode captured bytes. Invalid UTF-8 is an infrastructure fault and is
/// never repaired.
pub fn decode(bytes: Vec<u8>) -> Result<String, HarnessError> {
    Ok(String::from_utf8(bytes)?)
}
