//! Version resolution
//!
//! The project version comes from the MinVer tool, which derives it from the
//! tag history. Its stdout is validated against a version pattern before use
//! so a stray diagnostic line never ends up in a package path.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::BuildContext;
use crate::tools::ToolCommand;
use regex::Regex;

const VERSION_PATTERN: &str = r"^\d+\.\d+\.\d+(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$";

/// Resolve the current version
pub fn resolve(ctx: &BuildContext) -> ExecutionResult<String> {
    parse_version(&ToolCommand::new("minver").output(ctx)?)
}

/// Resolve the version with auto-increment, the value used for the next tag
pub fn resolve_incremented(ctx: &BuildContext) -> ExecutionResult<String> {
    parse_version(&ToolCommand::new("minver").arg("-i").output(ctx)?)
}

/// Pick the version out of tool output: the last non-empty line, checked
/// against the version pattern
pub fn parse_version(raw: &str) -> ExecutionResult<String> {
    let pattern = Regex::new(VERSION_PATTERN).unwrap();
    let candidate = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .unwrap_or_default();

    if pattern.is_match(candidate) {
        Ok(candidate.to_string())
    } else {
        Err(ExecutionError::VersionParse(raw.to_string()))
    }
}
