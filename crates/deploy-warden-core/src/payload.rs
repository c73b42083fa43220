//! Typed model of the `deployment_protection_rule` webhook payload.
//!
//! GitHub's payload shape for the initiating actor varies across API
//! versions and event contexts, so every field here is optional and the
//! ambiguous fields are modelled as untagged unions. Deserialization accepts
//! any JSON object; fields the service does not read are dropped.

use serde::Deserialize;

// ============================================================================
// Event Payload
// ============================================================================

/// Inbound `deployment_protection_rule` webhook payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeploymentProtectionEvent {
    /// Webhook action; the service only acts on `"requested"`.
    pub action: Option<String>,

    /// The deployment awaiting approval.
    pub deployment: Option<Deployment>,

    /// The workflow that requested the deployment.
    pub workflow: Option<WorkflowInfo>,

    /// The account that generated the webhook delivery. May be a bot or app
    /// identity rather than the human who ran the workflow.
    pub sender: Option<Sender>,

    /// The repository the deployment belongs to.
    pub repository: Option<RepositoryInfo>,

    /// One-time, event-specific URL used to submit the approve/reject
    /// decision back to GitHub.
    pub deployment_callback_url: Option<String>,
}

impl DeploymentProtectionEvent {
    /// Target environment name, when the deployment carries one.
    pub fn environment(&self) -> Option<&str> {
        self.deployment.as_ref()?.environment.as_deref()
    }

    /// Workflow run identifier, when present.
    pub fn run_id(&self) -> Option<u64> {
        self.workflow.as_ref()?.id
    }

    /// Repository owner login, when present.
    pub fn repo_owner(&self) -> Option<&str> {
        self.repository.as_ref()?.owner.as_ref()?.login.as_deref()
    }

    /// Repository name, when present.
    pub fn repo_name(&self) -> Option<&str> {
        self.repository.as_ref()?.name.as_deref()
    }

    /// Full `owner/name` repository identifier, when present.
    pub fn repo_full_name(&self) -> Option<&str> {
        self.repository.as_ref()?.full_name.as_deref()
    }
}

/// Deployment object embedded in the event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Deployment {
    /// Name of the protected environment the deployment targets.
    pub environment: Option<String>,

    /// Custom payload attached when the deployment was created.
    pub payload: Option<DeploymentPayload>,
}

/// Custom payload attached to a deployment by its creator.
///
/// GitHub forwards whatever JSON the deployment was created with, so the
/// shape is caller-defined. The structured form carries the `actor` field
/// used by identity resolution; any other shape (including a serialized
/// string) is kept opaque.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DeploymentPayload {
    Structured(StructuredDeploymentPayload),
    Opaque(serde_json::Value),
}

/// The structured deployment payload form recognized by identity resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructuredDeploymentPayload {
    pub actor: Option<String>,
}

impl DeploymentPayload {
    /// The actor recorded in the deployment's own payload, if any.
    ///
    /// Empty strings are treated as absent so resolution falls through to
    /// the next strategy.
    pub fn actor(&self) -> Option<&str> {
        match self {
            Self::Structured(payload) => payload.actor.as_deref().filter(|a| !a.is_empty()),
            Self::Opaque(_) => None,
        }
    }
}

/// Workflow object embedded in the event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowInfo {
    /// Workflow run identifier.
    pub id: Option<u64>,

    /// Identity GitHub Actions recorded as having started the run.
    pub triggering_actor: Option<ActorRef>,
}

/// Actor reference that GitHub delivers either as a plain login string or as
/// an object carrying `login`/`name`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ActorRef {
    Login(String),
    Detailed(ActorDetails),
}

/// Object form of an actor reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorDetails {
    pub login: Option<String>,
    pub name: Option<String>,
}

impl ActorRef {
    /// Resolve the reference to a non-empty identity string.
    ///
    /// The object form prefers `login` and falls back to `name`; empty
    /// strings never resolve.
    pub fn resolve(&self) -> Option<&str> {
        match self {
            Self::Login(login) => Some(login.as_str()).filter(|l| !l.is_empty()),
            Self::Detailed(details) => details
                .login
                .as_deref()
                .filter(|l| !l.is_empty())
                .or_else(|| details.name.as_deref().filter(|n| !n.is_empty())),
        }
    }
}

/// Sender object embedded in the event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sender {
    pub login: Option<String>,
}

/// Repository object embedded in the event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryInfo {
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub owner: Option<RepositoryOwner>,
}

/// Owner object nested in the repository.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryOwner {
    pub login: Option<String>,
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
