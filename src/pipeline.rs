//! The standard pipeline
//!
//! Registers the build's targets against the graph builder. Each action is a
//! thin sequencing of tool wrappers; the interesting structure lives in the
//! dependency, ordering, trigger and guard declarations.

use crate::error::{ConfigResult, ExecutionResult};
use crate::graph::{GraphBuilder, Target, TargetGraph};
use crate::runner::BuildContext;
use crate::tools;
use crate::utils;
use regex::Regex;
use std::fs;

/// Target run when the command line names none
pub const DEFAULT_TARGET: &str = "compile";

/// Build the standard target graph
pub fn standard_graph() -> ConfigResult<TargetGraph> {
    GraphBuilder::new()
        .add(
            Target::new("print")
                .usage("Log version, commit, branch and tag facts")
                .action(print_facts),
        )
        .add(
            Target::new("clean")
                .usage("Recreate the artifacts directory")
                .produces([".artifacts"])
                .action(clean),
        )
        .add(
            Target::new("restore")
                .usage("Restore project dependencies")
                .after(["clean"])
                .action(restore),
        )
        .add(
            Target::new("compile")
                .usage("Build the solution")
                .depends_on(["clean", "restore"])
                .action(compile),
        )
        .add(
            Target::new("test")
                .usage("Run the test suite with coverage")
                .depends_on(["compile"])
                .before(["publish", "pack"])
                .produces(["TestResults"])
                .action(test),
        )
        .add(
            Target::new("bump-version")
                .usage("Advance the release tag and push it")
                .before(["compile"])
                .action(bump_version),
        )
        .add(
            Target::new("publish")
                .usage("Publish the CLI project and archive it")
                .depends_on(["compile"])
                .after(["test"])
                .triggers(["pack"])
                .produces(["packages"])
                .action(publish),
        )
        .add(
            Target::new("pack")
                .usage("Create packages for the current version")
                .depends_on(["compile"])
                .after(["test"])
                .only_when("a packable project exists", has_packable_project)
                .produces(["packages"])
                .action(pack),
        )
        .add(
            Target::new("push")
                .usage("Push packages to the package feed")
                .depends_on(["pack"])
                .requires("current branch is main or master", |ctx| {
                    tools::git::is_on_main_or_master(ctx).unwrap_or(false)
                })
                .requires("an api key is provided", |ctx| ctx.api_key().is_some())
                .action(push),
        )
        .build()
}

fn print_facts(ctx: &BuildContext) -> ExecutionResult<()> {
    let branch = tools::git::current_branch(ctx)?;
    ctx.print_info(&format!("Version = {}", ctx.version()?));
    ctx.print_info(&format!("Commit = {}", tools::git::current_commit(ctx)?));
    ctx.print_info(&format!("Branch = {branch}"));
    ctx.print_info(&format!(
        "Tags = {}",
        tools::git::head_tags(ctx)?.join(", ")
    ));
    ctx.print_info(&format!(
        "main/master branch = {}",
        branch == "main" || branch == "master"
    ));
    ctx.print_info(&format!(
        "release/* branch = {}",
        branch.starts_with("release/")
    ));
    ctx.print_info(&format!(
        "hotfix/* branch = {}",
        branch.starts_with("hotfix/")
    ));
    Ok(())
}

fn clean(ctx: &BuildContext) -> ExecutionResult<()> {
    utils::create_or_clean_dir(&ctx.artifacts_dir())?;
    Ok(())
}

fn restore(ctx: &BuildContext) -> ExecutionResult<()> {
    tools::dotnet::restore(ctx)
}

fn compile(ctx: &BuildContext) -> ExecutionResult<()> {
    ctx.print_info(&format!("Building version {}", ctx.version()?));
    tools::dotnet::build(ctx)
}

fn test(ctx: &BuildContext) -> ExecutionResult<()> {
    let results_dir = ctx.test_results_dir();
    utils::create_or_clean_dir(&results_dir)?;
    tools::dotnet::test(ctx, &results_dir)?;

    match tools::coverage::find_coverage_report(&results_dir) {
        Some(report) => tools::coverage::generate(ctx, &report, &ctx.coverage_report_dir()),
        None => {
            ctx.print_debug("No coverage artifact found; skipping report generation");
            Ok(())
        }
    }
}

fn bump_version(ctx: &BuildContext) -> ExecutionResult<()> {
    ctx.print_info(&format!("Version = {}", ctx.version()?));

    let next_tag = tools::version::resolve_incremented(ctx)?;
    ctx.print_info(&format!("Next tag = {next_tag}"));

    tools::git::tag(ctx, &next_tag, true)?;
    tools::git::push_tags(ctx, true)?;

    // The tag moved, so the cached version is stale.
    ctx.refresh_version();
    ctx.print_info(&format!("Version = {}", ctx.version()?));
    Ok(())
}

fn publish(ctx: &BuildContext) -> ExecutionResult<()> {
    let publish_dir = ctx.publish_dir();
    utils::create_or_clean_dir(&publish_dir)?;
    tools::dotnet::publish(ctx, &ctx.project_dir(), &publish_dir)?;

    fs::create_dir_all(ctx.pack_dir())?;
    let archive = ctx.pack_dir().join(format!("{}.zip", solution_name(ctx)));
    tools::archive::zip_directory(ctx, &publish_dir, &archive)
}

fn pack(ctx: &BuildContext) -> ExecutionResult<()> {
    let output = ctx.pack_dir().join(ctx.version()?);
    tools::dotnet::pack(ctx, &ctx.project_dir(), &output)
}

fn push(ctx: &BuildContext) -> ExecutionResult<()> {
    let version = ctx.version()?;
    let package = ctx
        .pack_dir()
        .join(&version)
        .join(format!("{}.{version}.nupkg", solution_name(ctx)));
    let api_key = ctx.require_api_key()?;
    tools::dotnet::nuget_push(ctx, &package, api_key, ctx.package_source())
}

/// Name of the solution file at the root, falling back to the directory name
fn solution_name(ctx: &BuildContext) -> String {
    let pattern = ctx.root_dir().join("*.sln");
    utils::glob_paths(&pattern.to_string_lossy())
        .into_iter()
        .next()
        .and_then(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| {
            ctx.root_dir()
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "build".to_string())
        })
}

fn has_packable_project(ctx: &BuildContext) -> bool {
    let count = packable_project_count(ctx);
    ctx.print_debug(&format!("Packable projects found = {count}"));
    count > 0
}

fn packable_project_count(ctx: &BuildContext) -> usize {
    let marker = Regex::new(r"(?i)<IsPackable>\s*true\s*</IsPackable>").unwrap();
    let pattern = ctx.root_dir().join("**").join("*.csproj");
    utils::glob_paths(&pattern.to_string_lossy())
        .iter()
        .filter(|path| {
            fs::read_to_string(path)
                .map(|text| marker.is_match(&text))
                .unwrap_or(false)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn resolve(requested: &[&str]) -> Vec<String> {
        let graph = standard_graph().unwrap();
        let requested: Vec<String> = requested.iter().map(|s| s.to_string()).collect();
        graph.resolve(&requested).unwrap()
    }

    #[test]
    fn test_standard_graph_builds() {
        let graph = standard_graph().unwrap();
        assert!(graph.contains(DEFAULT_TARGET));
        assert_eq!(graph.targets().count(), 9);
    }

    #[test]
    fn test_requesting_test_runs_the_compile_chain() {
        assert_eq!(resolve(&["test"]), ["clean", "restore", "compile", "test"]);
    }

    #[test]
    fn test_requesting_publish_does_not_pull_in_test() {
        // test orders before publish only when both are requested; it is not
        // a hard dependency of publish.
        assert_eq!(
            resolve(&["publish"]),
            ["clean", "restore", "compile", "publish"]
        );
    }

    #[test]
    fn test_test_orders_before_publish_when_both_requested() {
        assert_eq!(
            resolve(&["publish", "test"]),
            ["clean", "restore", "compile", "test", "publish"]
        );
    }

    #[test]
    fn test_bump_version_orders_before_compile() {
        let plan = resolve(&["bump-version", "compile"]);
        let bump = plan.iter().position(|t| t == "bump-version").unwrap();
        let compile = plan.iter().position(|t| t == "compile").unwrap();
        assert!(bump < compile);
    }

    #[test]
    fn test_push_depends_on_pack() {
        let plan = resolve(&["push"]);
        assert_eq!(plan, ["clean", "restore", "compile", "pack", "push"]);
    }

    #[test]
    fn test_packable_count_reads_project_markers() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("src").join("Cli");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            nested.join("Cli.csproj"),
            "<Project><PropertyGroup><IsPackable>true</IsPackable></PropertyGroup></Project>",
        )
        .unwrap();
        fs::write(
            dir.path().join("src").join("Lib.csproj"),
            "<Project><PropertyGroup><IsPackable>false</IsPackable></PropertyGroup></Project>",
        )
        .unwrap();

        let ctx = BuildContext::new().with_root(dir.path().to_path_buf());
        assert_eq!(packable_project_count(&ctx), 1);
    }

    #[test]
    fn test_packable_count_zero_without_projects() {
        let dir = TempDir::new().unwrap();
        let ctx = BuildContext::new().with_root(dir.path().to_path_buf());
        assert_eq!(packable_project_count(&ctx), 0);
        assert!(!has_packable_project(&ctx));
    }

    #[test]
    fn test_solution_name_prefers_sln_stem() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Sample.App.sln"), "").unwrap();
        let ctx = BuildContext::new().with_root(dir.path().to_path_buf());
        assert_eq!(solution_name(&ctx), "Sample.App");
    }

    #[test]
    fn test_solution_name_falls_back_to_dir_name() {
        let ctx = BuildContext::new().with_root(PathBuf::from("/tmp/myrepo"));
        assert_eq!(solution_name(&ctx), "myrepo");
    }
}
