//! Terminal output
//!
//! All user-facing lines go to stderr so captured tool output on stdout
//! stays clean. Callers gate on verbosity; these functions only format.

use crate::graph::TargetGraph;
use crate::runner::{RunSummary, TargetOutcome};
use colored::Colorize;
use std::time::Duration;

pub fn info(message: &str) {
    eprintln!("{} {}", "[INFO]".cyan(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}

pub fn debug(message: &str) {
    eprintln!("{} {}", "[DEBUG]".dimmed(), message);
}

pub fn command(line: &str) {
    eprintln!("{} {}", "[RUN]".green(), line);
}

pub fn target_banner(name: &str) {
    eprintln!();
    eprintln!("{}", format!("=== {name} ===").bold());
}

pub fn skip(name: &str, reason: &str) {
    eprintln!("{} {} ({})", "[SKIP]".yellow(), name, reason);
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}

/// Per-target status table printed at the end of a run
pub fn summary(summary: &RunSummary) {
    eprintln!();
    eprintln!("{}", "─".repeat(44).dimmed());
    for run in summary.runs() {
        let status = match &run.outcome {
            TargetOutcome::Succeeded => "OK".green(),
            TargetOutcome::Skipped { .. } => "SKIPPED".yellow(),
            TargetOutcome::Failed { .. } => "FAILED".red().bold(),
        };
        eprintln!(
            "{:<16} {:<18} {:>8}",
            run.name,
            status,
            format_duration(run.duration)
        );
    }
    eprintln!("{}", "─".repeat(44).dimmed());
    let verdict = if summary.succeeded() {
        "Build succeeded".green().bold()
    } else {
        "Build failed".red().bold()
    };
    eprintln!("{} in {}", verdict, format_duration(summary.elapsed()));
}

/// Target listing for `--list`
pub fn list_targets(graph: &TargetGraph) {
    for target in graph.targets() {
        println!(
            "{:<14} {}",
            target.name().bold(),
            target.usage_text().unwrap_or_default()
        );
        if !target.dependency_names().is_empty() {
            println!("               depends on: {}", target.dependency_names().join(", "));
        }
        if !target.trigger_names().is_empty() {
            println!("               triggers:   {}", target.trigger_names().join(", "));
        }
        if let Some(guard) = target.guard() {
            println!("               only when:  {}", guard.description());
        }
        if !target.produced_paths().is_empty() {
            println!("               produces:   {}", target.produced_paths().join(", "));
        }
    }
}
