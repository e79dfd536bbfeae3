//! Coverage report generation

use crate::error::ExecutionResult;
use crate::runner::BuildContext;
use crate::tools::ToolCommand;
use crate::utils;
use std::path::{Path, PathBuf};

/// Locate the coverage artifact the test run left behind, if any
pub fn find_coverage_report(results_dir: &Path) -> Option<PathBuf> {
    let pattern = results_dir.join("**").join("coverage.cobertura.xml");
    utils::glob_paths(&pattern.to_string_lossy()).into_iter().next()
}

/// Render an HTML report from a coverage artifact
pub fn generate(ctx: &BuildContext, report: &Path, target_dir: &Path) -> ExecutionResult<()> {
    ToolCommand::new("reportgenerator")
        .arg(format!("-reports:{}", report.display()))
        .arg(format!("-targetdir:{}", target_dir.display()))
        .status(ctx)
}
