//! Hosted-CI workflow definitions
//!
//! Each workflow is plain data: trigger conditions plus the targets it
//! invokes. The execution engine never consults this module; the
//! definitions are validated against the target graph and printed for
//! inspection, and the CI provider's own files are maintained from them.

use crate::error::{ConfigError, ConfigResult, Result};
use crate::graph::TargetGraph;
use serde::{Deserialize, Serialize};

/// One hosted-CI workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiWorkflow {
    pub name: String,
    pub image: String,
    /// Whether the provider-side file is kept in sync automatically
    pub auto_generate: bool,
    /// Clone depth; 0 means full history (the version tooling needs tags)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_depth: Option<u32>,
    pub trigger: CiTrigger,
    pub invoked_targets: Vec<String>,
}

/// Trigger conditions for a workflow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CiTrigger {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_push_branches: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_push_branches_ignore: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_pull_request_branches: Vec<String>,
}

impl CiTrigger {
    pub fn is_empty(&self) -> bool {
        self.on_push_branches.is_empty()
            && self.on_push_branches_ignore.is_empty()
            && self.on_pull_request_branches.is_empty()
    }
}

const CI_IMAGE: &str = "ubuntu-latest";

/// The workflows wired to this repository's pipeline
pub fn standard_workflows() -> Vec<CiWorkflow> {
    vec![
        CiWorkflow {
            name: "continuous".to_string(),
            image: CI_IMAGE.to_string(),
            auto_generate: true,
            fetch_depth: Some(0),
            trigger: CiTrigger {
                on_push_branches_ignore: vec!["main".to_string()],
                ..CiTrigger::default()
            },
            invoked_targets: vec!["test".to_string()],
        },
        CiWorkflow {
            name: "merge".to_string(),
            image: CI_IMAGE.to_string(),
            auto_generate: true,
            fetch_depth: Some(0),
            trigger: CiTrigger {
                on_pull_request_branches: vec!["main".to_string()],
                ..CiTrigger::default()
            },
            invoked_targets: vec!["test".to_string()],
        },
        CiWorkflow {
            name: "after-merge".to_string(),
            image: CI_IMAGE.to_string(),
            auto_generate: true,
            fetch_depth: Some(0),
            trigger: CiTrigger {
                on_push_branches: vec!["main".to_string()],
                ..CiTrigger::default()
            },
            invoked_targets: vec!["bump-version".to_string(), "publish".to_string()],
        },
        CiWorkflow {
            name: "bumpversion".to_string(),
            image: CI_IMAGE.to_string(),
            auto_generate: false,
            fetch_depth: Some(0),
            trigger: CiTrigger {
                on_pull_request_branches: vec!["main".to_string()],
                ..CiTrigger::default()
            },
            invoked_targets: vec!["bump-version".to_string()],
        },
    ]
}

/// Check the definitions against the target graph
pub fn validate(workflows: &[CiWorkflow], graph: &TargetGraph) -> ConfigResult<()> {
    for workflow in workflows {
        if workflow.invoked_targets.is_empty() {
            return Err(ConfigError::InvalidPipeline {
                name: workflow.name.clone(),
                reason: "invokes no targets".to_string(),
            });
        }
        if workflow.trigger.is_empty() {
            return Err(ConfigError::InvalidPipeline {
                name: workflow.name.clone(),
                reason: "has no trigger conditions".to_string(),
            });
        }
        for target in &workflow.invoked_targets {
            if !graph.contains(target) {
                return Err(ConfigError::InvalidPipeline {
                    name: workflow.name.clone(),
                    reason: format!("invoked target '{target}' is not defined"),
                });
            }
        }
    }
    Ok(())
}

/// Render the definitions as YAML for inspection
pub fn render(workflows: &[CiWorkflow]) -> Result<String> {
    Ok(serde_yaml::to_string(workflows)?)
}
