//! Source-control client wrappers

use crate::error::ExecutionResult;
use crate::runner::BuildContext;
use crate::tools::ToolCommand;

pub fn current_branch(ctx: &BuildContext) -> ExecutionResult<String> {
    ToolCommand::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output(ctx)
}

pub fn current_commit(ctx: &BuildContext) -> ExecutionResult<String> {
    ToolCommand::new("git")
        .args(["rev-parse", "HEAD"])
        .output(ctx)
}

/// Tags pointing at the current commit
pub fn head_tags(ctx: &BuildContext) -> ExecutionResult<Vec<String>> {
    let out = ToolCommand::new("git")
        .args(["tag", "--points-at", "HEAD"])
        .output(ctx)?;
    Ok(out.lines().map(str::to_string).collect())
}

pub fn tag(ctx: &BuildContext, name: &str, force: bool) -> ExecutionResult<()> {
    let mut command = ToolCommand::new("git").arg("tag").arg(name);
    if force {
        command = command.arg("-f");
    }
    command.status(ctx)
}

pub fn push_tags(ctx: &BuildContext, force: bool) -> ExecutionResult<()> {
    let mut command = ToolCommand::new("git").args(["push", "--tags"]);
    if force {
        command = command.arg("-f");
    }
    command.status(ctx)
}

pub fn is_on_main_or_master(ctx: &BuildContext) -> ExecutionResult<bool> {
    let branch = current_branch(ctx)?;
    Ok(branch == "main" || branch == "master")
}
