//! Error types for Gantry

use std::io;
use thiserror::Error;

/// Result type alias for Gantry operations
pub type Result<T> = std::result::Result<T, GantryError>;

/// Main error type for Gantry
#[derive(Error, Debug)]
pub enum GantryError {
    /// Target-graph configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Target execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Graph construction and resolution errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Target '{0}' is already defined")]
    DuplicateTarget(String),

    #[error("Target '{0}' is not defined (referenced by '{1}')")]
    UnknownReference(String, String),

    #[error("Target '{0}' is not defined")]
    TargetNotFound(String),

    #[error("Circular dependency detected among targets: {0}")]
    CircularDependency(String),

    #[error("Invalid CI pipeline '{name}': {reason}")]
    InvalidPipeline { name: String, reason: String },
}

/// Target execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("{tool} exited with code {code:?}")]
    ToolFailed { tool: String, code: Option<i32> },

    #[error("Failed to start {tool}: {source}")]
    ToolNotFound {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("Requirement not met for target '{target}': {requirement}")]
    PreconditionFailed { target: String, requirement: String },

    #[error("Target '{target}' failed: {cause}")]
    TargetFailed {
        target: String,
        #[source]
        cause: Box<ExecutionError>,
    },

    #[error("Could not parse a version from '{0}'")]
    VersionParse(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Run interrupted before completion")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Specialized result type for graph configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Helper to determine whether an error is a precondition failure
/// (a misuse of the invocation rather than a broken build step)
pub fn is_precondition_failure(err: &ExecutionError) -> bool {
    matches!(err, ExecutionError::PreconditionFailed { .. })
}
