//! .NET toolchain wrappers

use crate::error::ExecutionResult;
use crate::runner::{BuildContext, Secret};
use crate::tools::ToolCommand;
use std::path::Path;

pub fn restore(ctx: &BuildContext) -> ExecutionResult<()> {
    ToolCommand::new("dotnet")
        .args(["restore", "--force"])
        .status(ctx)
}

pub fn build(ctx: &BuildContext) -> ExecutionResult<()> {
    ToolCommand::new("dotnet")
        .args(["build", "--nologo", "--no-restore", "-c"])
        .arg(ctx.configuration().as_str())
        .status(ctx)
}

/// Run the test suite with the cross-platform coverage collector, writing
/// results (and the coverage artifact) under `results_dir`
pub fn test(ctx: &BuildContext, results_dir: &Path) -> ExecutionResult<()> {
    ToolCommand::new("dotnet")
        .args(["test", "--nologo", "--no-build", "--no-restore", "-c"])
        .arg(ctx.configuration().as_str())
        .args(["--collect", "XPlat Code Coverage"])
        .arg("--results-directory")
        .arg(results_dir.display().to_string())
        .status(ctx)
}

pub fn publish(ctx: &BuildContext, project: &Path, output: &Path) -> ExecutionResult<()> {
    ToolCommand::new("dotnet")
        .args(["publish", "--nologo", "--no-build", "--no-restore"])
        .arg(project.display().to_string())
        .arg("-o")
        .arg(output.display().to_string())
        .arg("-c")
        .arg(ctx.configuration().as_str())
        .status(ctx)
}

pub fn pack(ctx: &BuildContext, project: &Path, output: &Path) -> ExecutionResult<()> {
    ToolCommand::new("dotnet")
        .args(["pack", "--nologo", "--no-build", "--no-restore"])
        .arg(project.display().to_string())
        .arg("-c")
        .arg(ctx.configuration().as_str())
        .arg("-o")
        .arg(output.display().to_string())
        .status(ctx)
}

/// Push a package to a feed. The api key rides along as a secret argument
/// and never appears in output.
pub fn nuget_push(
    ctx: &BuildContext,
    package: &Path,
    api_key: &Secret,
    source: &str,
) -> ExecutionResult<()> {
    ToolCommand::new("dotnet")
        .args(["nuget", "push"])
        .arg(package.display().to_string())
        .arg("--api-key")
        .secret_arg(api_key.expose())
        .arg("--source")
        .arg(source)
        .status(ctx)
}
