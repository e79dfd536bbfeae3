//! Main CLI application

use crate::ci;
use crate::error::Result;
use crate::pipeline;
use crate::runner::{BuildContext, Configuration, Engine, Secret, Verbosity};
use crate::ui;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::env;
use std::io;
use std::path::PathBuf;

/// Environment variable consulted when `--api-key` is not given
const API_KEY_VAR: &str = "NUGET_API_KEY";

/// Build the clap command
fn build_command() -> Command {
    Command::new("gantry")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A declarative build and release pipeline runner")
        .arg(
            Arg::new("targets")
                .value_name("TARGET")
                .num_args(0..)
                .help(format!("Targets to run (default: {})", pipeline::DEFAULT_TARGET)),
        )
        .arg(
            Arg::new("configuration")
                .short('c')
                .long("configuration")
                .value_name("CONFIG")
                .value_parser(value_parser!(Configuration))
                .help("Build configuration: debug or release (default: debug locally, release on CI)"),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .value_name("KEY")
                .help(format!("Publishing credential (falls back to ${API_KEY_VAR}); never logged")),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("DIR")
                .help("Repository root (default: current directory)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("List targets and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ci")
                .long("ci")
                .help("Validate and print the CI workflow definitions, then exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .value_parser(value_parser!(Shell))
                .help("Generate shell completions and exit"),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Default configuration: Debug on a developer machine, Release on CI
fn default_configuration() -> Configuration {
    if env::var_os("CI").is_some() {
        Configuration::Release
    } else {
        Configuration::Debug
    }
}

/// Run the CLI application
pub fn run() -> Result<()> {
    // Pick up a local .env before reading credentials from the environment.
    dotenvy::dotenv().ok();

    let mut command = build_command();
    let matches = command.clone().get_matches();

    if let Some(shell) = matches.get_one::<Shell>("completions") {
        clap_complete::generate(*shell, &mut command, "gantry", &mut io::stdout());
        return Ok(());
    }

    let graph = pipeline::standard_graph()?;

    if matches.get_flag("list") {
        ui::list_targets(&graph);
        return Ok(());
    }

    if matches.get_flag("ci") {
        let workflows = ci::standard_workflows();
        ci::validate(&workflows, &graph)?;
        print!("{}", ci::render(&workflows)?);
        return Ok(());
    }

    let verbosity = get_verbosity(&matches);
    let configuration = matches
        .get_one::<Configuration>("configuration")
        .copied()
        .unwrap_or_else(default_configuration);
    let root = match matches.get_one::<String>("root") {
        Some(dir) => PathBuf::from(dir),
        None => env::current_dir()?,
    };

    let mut ctx = BuildContext::new()
        .with_root(root)
        .with_configuration(configuration)
        .with_verbosity(verbosity);

    let api_key = matches
        .get_one::<String>("api-key")
        .cloned()
        .or_else(|| env::var(API_KEY_VAR).ok());
    if let Some(key) = api_key {
        if !key.is_empty() {
            ctx = ctx.with_api_key(Secret::new(key));
        }
    }

    let targets: Vec<String> = match matches.get_many::<String>("targets") {
        Some(values) => values.cloned().collect(),
        None => vec![pipeline::DEFAULT_TARGET.to_string()],
    };

    let summary = Engine::new(&graph).run(&targets, &ctx)?;
    if verbosity >= Verbosity::Normal {
        ui::summary(&summary);
    }
    summary.into_result()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definition_is_consistent() {
        build_command().debug_assert();
    }

    #[test]
    fn test_get_verbosity_levels() {
        let matches = build_command().get_matches_from(["gantry"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Normal);

        let matches = build_command().get_matches_from(["gantry", "--verbose"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Verbose);

        let matches = build_command().get_matches_from(["gantry", "-q"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Quiet);

        let matches = build_command().get_matches_from(["gantry", "-s"]);
        assert_eq!(get_verbosity(&matches), Verbosity::Silent);
    }

    #[test]
    fn test_configuration_flag_parses() {
        let matches = build_command().get_matches_from(["gantry", "-c", "release"]);
        assert_eq!(
            matches.get_one::<Configuration>("configuration").copied(),
            Some(Configuration::Release)
        );
    }

    #[test]
    fn test_targets_are_positional() {
        let matches = build_command().get_matches_from(["gantry", "clean", "test"]);
        let targets: Vec<&String> = matches.get_many::<String>("targets").unwrap().collect();
        assert_eq!(targets, ["clean", "test"]);
    }
}
