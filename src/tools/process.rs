//! External process invocation
//!
//! `ToolCommand` is the single path through which child processes are
//! spawned. Arguments marked secret reach the child untouched but are
//! replaced with `***` in every rendered line, so credentials cannot leak
//! into logs or error messages.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::BuildContext;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// A command line for an external tool
pub struct ToolCommand {
    program: String,
    args: Vec<(String, bool)>,
    dir: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        ToolCommand {
            program: program.into(),
            args: Vec::new(),
            dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push((arg.into(), false));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|a| (a.into(), false)));
        self
    }

    /// Add an argument that must never appear in rendered output
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push((arg.into(), true));
        self
    }

    /// Working directory; defaults to the repository root
    pub fn current_dir(mut self, dir: PathBuf) -> Self {
        self.dir = Some(dir);
        self
    }

    /// The command line as shown to the user, secrets redacted
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for (arg, secret) in &self.args {
            line.push(' ');
            line.push_str(if *secret { "***" } else { arg });
        }
        line
    }

    fn command(&self, ctx: &BuildContext) -> Command {
        let mut command = Command::new(&self.program);
        for (arg, _) in &self.args {
            command.arg(arg);
        }
        let dir = self
            .dir
            .clone()
            .unwrap_or_else(|| ctx.root_dir().clone());
        command.current_dir(dir);
        command
    }

    /// Run with inherited stdio; a non-zero exit is an error
    pub fn status(&self, ctx: &BuildContext) -> ExecutionResult<()> {
        ctx.print_command(&self.display_line());

        let status = self
            .command(ctx)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ExecutionError::ToolNotFound {
                tool: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ExecutionError::ToolFailed {
                tool: self.display_line(),
                code: status.code(),
            });
        }
        Ok(())
    }

    /// Run capturing stdout; a non-zero exit is an error. Trailing
    /// whitespace is trimmed from the captured text.
    pub fn output(&self, ctx: &BuildContext) -> ExecutionResult<String> {
        ctx.print_debug(&self.display_line());

        let output = self
            .command(ctx)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ExecutionError::ToolNotFound {
                tool: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExecutionError::ToolFailed {
                tool: self.display_line(),
                code: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent_ctx() -> BuildContext {
        BuildContext::new().with_verbosity(crate::runner::Verbosity::Silent)
    }

    #[test]
    fn test_status_of_succeeding_command() {
        let ctx = silent_ctx();
        let result = ToolCommand::new("true").status(&ctx);
        assert!(result.is_ok());
    }

    #[test]
    fn test_status_of_failing_command() {
        let ctx = silent_ctx();
        let result = ToolCommand::new("false").status(&ctx);
        assert!(matches!(
            result,
            Err(ExecutionError::ToolFailed { code: Some(1), .. })
        ));
    }

    #[test]
    fn test_missing_program_reports_spawn_failure() {
        let ctx = silent_ctx();
        let result = ToolCommand::new("definitely-not-a-real-tool").status(&ctx);
        assert!(matches!(result, Err(ExecutionError::ToolNotFound { .. })));
    }

    #[test]
    fn test_output_captures_stdout() {
        let ctx = silent_ctx();
        let out = ToolCommand::new("echo").arg("hello").output(&ctx).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn test_display_line_redacts_secrets() {
        let line = ToolCommand::new("dotnet")
            .args(["nuget", "push"])
            .arg("--api-key")
            .secret_arg("s3cr3t")
            .display_line();
        assert_eq!(line, "dotnet nuget push --api-key ***");
        assert!(!line.contains("s3cr3t"));
    }

    #[test]
    fn test_failure_error_keeps_secrets_redacted() {
        let ctx = silent_ctx();
        let result = ToolCommand::new("false").secret_arg("s3cr3t").status(&ctx);
        match result {
            Err(error) => {
                let rendered = error.to_string();
                assert!(!rendered.contains("s3cr3t"));
            }
            Ok(()) => panic!("expected failure"),
        }
    }
}
