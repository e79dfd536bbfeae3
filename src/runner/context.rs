//! Build context
//!
//! The context carries everything a target action may need: the build
//! configuration, the repository layout, the publishing credential, and the
//! resolved project version. It is constructed once per invocation and
//! threaded immutably through every action; the version is the one cached
//! field, behind interior mutability, so the version-bump target can refresh
//! it after moving tags.

use crate::error::{ExecutionError, ExecutionResult};
use crate::tools;
use crate::ui;
use std::cell::RefCell;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Build configuration passed to the wrapped toolchain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Configuration {
    Debug,
    Release,
}

impl Configuration {
    /// The spelling the toolchain expects for `-c`
    pub fn as_str(&self) -> &'static str {
        match self {
            Configuration::Debug => "Debug",
            Configuration::Release => "Release",
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Configuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Configuration::Debug),
            "release" => Ok(Configuration::Release),
            other => Err(format!("unknown configuration '{other}'")),
        }
    }
}

/// A credential that must never reach a log line
///
/// The wrapped value is only reachable through [`Secret::expose`]; `Debug`
/// renders a fixed placeholder.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    /// The raw value, for handing to a child process
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

/// Immutable state threaded through target actions
pub struct BuildContext {
    /// Repository root; every derived path hangs off this
    root_dir: PathBuf,

    /// Build configuration (Debug locally, Release on CI by default)
    configuration: Configuration,

    /// Publishing credential, if provided
    api_key: Option<Secret>,

    /// Package-feed URL used by the push target
    package_source: String,

    /// Verbosity level
    verbosity: Verbosity,

    /// Cached project version; resolved on first use
    version: RefCell<Option<String>>,
}

/// Default package feed for the push target
const DEFAULT_PACKAGE_SOURCE: &str = "https://api.nuget.org/v3/index.json";

impl BuildContext {
    /// Create a context rooted at the current directory with defaults
    pub fn new() -> Self {
        BuildContext {
            root_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            configuration: Configuration::Debug,
            api_key: None,
            package_source: DEFAULT_PACKAGE_SOURCE.to_string(),
            verbosity: Verbosity::Normal,
            version: RefCell::new(None),
        }
    }

    pub fn with_root(mut self, dir: PathBuf) -> Self {
        self.root_dir = dir;
        self
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn with_api_key(mut self, key: Secret) -> Self {
        self.api_key = Some(key);
        self
    }

    pub fn with_package_source(mut self, url: impl Into<String>) -> Self {
        self.package_source = url.into();
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Preset the version, bypassing resolution (tests, dry listings)
    pub fn with_version(self, version: impl Into<String>) -> Self {
        self.version.borrow_mut().replace(version.into());
        self
    }

    pub fn configuration(&self) -> Configuration {
        self.configuration
    }

    pub fn api_key(&self) -> Option<&Secret> {
        self.api_key.as_ref()
    }

    pub fn package_source(&self) -> &str {
        &self.package_source
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    // Repository layout

    pub fn root_dir(&self) -> &PathBuf {
        &self.root_dir
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root_dir.join("src")
    }

    /// The CLI project published and packed by the release targets
    pub fn project_dir(&self) -> PathBuf {
        self.source_dir().join("Cli")
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.root_dir.join(".artifacts")
    }

    pub fn publish_dir(&self) -> PathBuf {
        self.root_dir.join("publish")
    }

    pub fn pack_dir(&self) -> PathBuf {
        self.root_dir.join("packages")
    }

    pub fn test_results_dir(&self) -> PathBuf {
        self.root_dir.join("TestResults")
    }

    pub fn coverage_report_dir(&self) -> PathBuf {
        self.test_results_dir().join("coveragereport")
    }

    /// The project version, resolved on first call and cached for the rest
    /// of the run
    pub fn version(&self) -> ExecutionResult<String> {
        if let Some(version) = self.version.borrow().as_ref() {
            return Ok(version.clone());
        }
        let version = tools::version::resolve(self)?;
        self.version.borrow_mut().replace(version.clone());
        Ok(version)
    }

    /// Drop the cached version so the next [`BuildContext::version`] call
    /// resolves it again (used after tags move)
    pub fn refresh_version(&self) {
        self.version.borrow_mut().take();
    }

    /// The publishing credential, or an error naming what is missing
    pub fn require_api_key(&self) -> ExecutionResult<&Secret> {
        self.api_key
            .as_ref()
            .ok_or_else(|| ExecutionError::MissingCredential("api key".to_string()))
    }

    // Output helpers, gated on verbosity

    pub fn print_info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            ui::info(message);
        }
    }

    pub fn print_error(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            ui::error(message);
        }
    }

    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            ui::debug(message);
        }
    }

    pub fn print_command(&self, line: &str) {
        if self.verbosity >= Verbosity::Normal {
            ui::command(line);
        }
    }

    pub fn print_target_start(&self, name: &str) {
        if self.verbosity >= Verbosity::Normal {
            ui::target_banner(name);
        }
    }

    pub fn print_target_skip(&self, name: &str, reason: &str) {
        if self.verbosity >= Verbosity::Normal {
            ui::skip(name, reason);
        }
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}
