//! Archive creation

use crate::error::ExecutionResult;
use crate::runner::BuildContext;
use crate::tools::ToolCommand;
use std::path::Path;

/// Zip the contents of `dir` into `archive`. The archiver runs from inside
/// the directory so entries are stored root-relative.
pub fn zip_directory(ctx: &BuildContext, dir: &Path, archive: &Path) -> ExecutionResult<()> {
    ToolCommand::new("zip")
        .args(["-r", "-q"])
        .arg(archive.display().to_string())
        .arg(".")
        .current_dir(dir.to_path_buf())
        .status(ctx)
}
