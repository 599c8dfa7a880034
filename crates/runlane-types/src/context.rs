use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::project::ProjectHash;

/// Terminal status of one action execution. Exactly one per completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    /// The action ran to the end without raising.
    Success,
    /// The action failed with a handled, user-facing error.
    Error,
    /// The action aborted with an unhandled failure.
    Crash,
}

impl CompletionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::Success => "success",
            CompletionStatus::Error => "error",
            CompletionStatus::Crash => "crash",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn validated_action_name(action_name: impl Into<String>) -> Result<String> {
    let action_name = action_name.into();
    if action_name.trim().is_empty() {
        return Err(Error::InvalidInput(
            "action name must not be empty".to_string(),
        ));
    }
    Ok(action_name)
}

/// Inputs for recording the start of an action.
///
/// Immutable after construction. Only the action name is required; the
/// project hash and platform stay absent unless the host supplies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLaunchContext {
    action_name: String,
    project_hash: Option<ProjectHash>,
    platform: Option<String>,
}

impl ActionLaunchContext {
    pub fn new(action_name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            action_name: validated_action_name(action_name)?,
            project_hash: None,
            platform: None,
        })
    }

    pub fn with_project_hash(mut self, project_hash: ProjectHash) -> Self {
        self.project_hash = Some(project_hash);
        self
    }

    /// Target platform of the launching project (e.g. "ios").
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    pub fn project_hash(&self) -> Option<&ProjectHash> {
        self.project_hash.as_ref()
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }
}

/// Inputs for recording the end of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCompletionContext {
    action_name: String,
    project_hash: Option<ProjectHash>,
    status: CompletionStatus,
}

impl ActionCompletionContext {
    pub fn new(action_name: impl Into<String>, status: CompletionStatus) -> Result<Self> {
        Ok(Self {
            action_name: validated_action_name(action_name)?,
            project_hash: None,
            status,
        })
    }

    pub fn with_project_hash(mut self, project_hash: ProjectHash) -> Self {
        self.project_hash = Some(project_hash);
        self
    }

    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    pub fn project_hash(&self) -> Option<&ProjectHash> {
        self.project_hash.as_ref()
    }

    pub fn status(&self) -> CompletionStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_context_requires_action_name() {
        assert!(ActionLaunchContext::new("").is_err());
        assert!(ActionLaunchContext::new("   ").is_err());
        assert!(ActionLaunchContext::new("deploy").is_ok());
    }

    #[test]
    fn test_launch_context_optionals_default_absent() {
        let context = ActionLaunchContext::new("deploy").unwrap();
        assert_eq!(context.action_name(), "deploy");
        assert!(context.project_hash().is_none());
        assert!(context.platform().is_none());
    }

    #[test]
    fn test_launch_context_builder_fields() {
        let context = ActionLaunchContext::new("deploy")
            .unwrap()
            .with_project_hash(ProjectHash::new("some.phash.value"))
            .with_platform("ios");
        assert_eq!(context.project_hash().unwrap().as_str(), "some.phash.value");
        assert_eq!(context.platform(), Some("ios"));
    }

    #[test]
    fn test_completion_context_requires_action_name() {
        assert!(ActionCompletionContext::new("", CompletionStatus::Success).is_err());
        let context = ActionCompletionContext::new("deploy", CompletionStatus::Crash).unwrap();
        assert_eq!(context.status(), CompletionStatus::Crash);
    }

    #[test]
    fn test_status_wire_values() {
        assert_eq!(CompletionStatus::Success.as_str(), "success");
        assert_eq!(CompletionStatus::Error.as_str(), "error");
        assert_eq!(CompletionStatus::Crash.as_str(), "crash");
        assert_eq!(
            serde_json::to_string(&CompletionStatus::Crash).unwrap(),
            "\"crash\""
        );
    }
}
