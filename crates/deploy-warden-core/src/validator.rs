//! Deployment initiator resolution and authorization.
//!
//! The webhook payload does not carry the initiating identity in one fixed
//! place: depending on the GitHub API version and the event context it may
//! appear in the deployment's own custom payload, on the workflow object, on
//! the sender, or only in the workflow run fetched from the REST API. The
//! [`DeploymentValidator`] walks those locations in a fixed order and
//! compares the first identity it finds against the configured authorized
//! user.

use async_trait::async_trait;
use tracing::{error, info, instrument};

use crate::payload::DeploymentProtectionEvent;

// ============================================================================
// Ports
// ============================================================================

/// Actor fields of a workflow run, as fetched from the GitHub API.
///
/// This is the projection of a workflow-run response that identity
/// resolution needs; the gateway crate maps its full API model down to this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunActors {
    /// Identity recorded as having caused the run to start.
    pub triggering_actor: Option<String>,

    /// Identity the run is attributed to.
    pub actor: Option<String>,
}

/// Port for the network fallback of identity resolution.
///
/// Implementations return `None` for any failure — lookup errors are an
/// expected condition (the fallback is best effort), never a reason to abort
/// validation.
#[async_trait]
pub trait WorkflowRunLookup: Send + Sync {
    /// Fetch the actor fields of a workflow run.
    async fn workflow_run_actors(&self, owner: &str, repo: &str, run_id: u64)
        -> Option<RunActors>;
}

// ============================================================================
// Validation Outcome
// ============================================================================

/// Result of resolving and authorizing the deployment initiator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Whether the resolved identity matches the authorized user.
    ///
    /// True only when an identity was positively resolved AND its normalized
    /// form matches the configured authorized identity case-insensitively.
    pub is_valid: bool,

    /// The raw resolved identity, or the literal `"Unknown"` when no
    /// strategy produced one.
    pub initiated_by: String,

    /// Workflow run identifier, when the payload carried one.
    pub run_id: Option<u64>,

    /// Reason resolution failed, when it did.
    pub error: Option<String>,

    /// Normalized identity actually used in the comparison.
    pub username_checked: Option<String>,
}

impl ValidationOutcome {
    /// Outcome for a payload where no strategy yielded an identity.
    fn unresolved(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            initiated_by: "Unknown".to_string(),
            run_id: None,
            error: Some(message.into()),
            username_checked: None,
        }
    }
}

// ============================================================================
// Validator
// ============================================================================

/// Validates that a deployment was initiated by the authorized user.
#[derive(Debug, Clone)]
pub struct DeploymentValidator {
    authorized_user: String,
}

impl DeploymentValidator {
    /// Construct a validator for the given authorized identity.
    pub fn new(authorized_user: impl Into<String>) -> Self {
        Self {
            authorized_user: authorized_user.into(),
        }
    }

    /// The configured authorized identity, as given.
    pub fn authorized_user(&self) -> &str {
        &self.authorized_user
    }

    /// Resolve the deployment initiator and decide whether it is authorized.
    ///
    /// Resolution is an ordered, first-non-empty-match-wins fallback chain:
    ///
    /// 1. `deployment.payload.actor` — the deployment's own custom payload.
    /// 2. `workflow.triggering_actor` — string form as-is; object form
    ///    prefers `login`, then `name`.
    /// 3. `sender.login` — the account that generated the delivery. Weakest
    ///    signal; may be a bot or app identity.
    /// 4. The workflow run fetched through `runs`, preferring
    ///    `triggering_actor` over `actor`. Only attempted when the payload
    ///    carries a run id and repository coordinates.
    ///
    /// Empty strings never match a strategy; they fall through to the next
    /// one. When no strategy yields an identity the outcome is invalid with
    /// `initiated_by = "Unknown"`.
    #[instrument(skip(self, event, runs), fields(authorized_user = %self.authorized_user))]
    pub async fn validate(
        &self,
        event: &DeploymentProtectionEvent,
        runs: &dyn WorkflowRunLookup,
    ) -> ValidationOutcome {
        let run_id = event.run_id();

        let Some(initiated_by) = self.resolve_initiator(event, runs).await else {
            error!("Could not determine who initiated the deployment");
            return ValidationOutcome::unresolved("Could not determine deployment initiator");
        };

        let username_checked = extract_username(&initiated_by);
        let authorized = extract_username(&self.authorized_user);

        info!(
            candidate = %username_checked,
            authorized = %authorized,
            "Comparing resolved identity against authorized user"
        );

        ValidationOutcome {
            is_valid: username_checked.to_lowercase() == authorized.to_lowercase(),
            initiated_by,
            run_id,
            error: None,
            username_checked: Some(username_checked),
        }
    }

    /// Walk the fallback chain; `None` when every strategy comes up empty.
    async fn resolve_initiator(
        &self,
        event: &DeploymentProtectionEvent,
        runs: &dyn WorkflowRunLookup,
    ) -> Option<String> {
        if let Some(actor) = event
            .deployment
            .as_ref()
            .and_then(|d| d.payload.as_ref())
            .and_then(|p| p.actor())
        {
            info!(actor, "Resolved initiator from deployment.payload.actor");
            return Some(actor.to_string());
        }

        if let Some(actor) = event
            .workflow
            .as_ref()
            .and_then(|w| w.triggering_actor.as_ref())
            .and_then(|a| a.resolve())
        {
            info!(actor, "Resolved initiator from workflow.triggering_actor");
            return Some(actor.to_string());
        }

        if let Some(login) = event
            .sender
            .as_ref()
            .and_then(|s| s.login.as_deref())
            .filter(|l| !l.is_empty())
        {
            info!(login, "Resolved initiator from sender.login");
            return Some(login.to_string());
        }

        let (run_id, owner, repo) = (event.run_id()?, event.repo_owner()?, event.repo_name()?);
        info!(run_id, "Attempting to resolve initiator from the workflow run");
        let actors = runs.workflow_run_actors(owner, repo, run_id).await?;
        let actor = actors
            .triggering_actor
            .filter(|a| !a.is_empty())
            .or(actors.actor.filter(|a| !a.is_empty()))?;
        info!(actor = %actor, "Resolved initiator from the workflow run");
        Some(actor)
    }
}

// ============================================================================
// Username Normalization
// ============================================================================

/// Extract a bare username from the formats identities arrive in.
///
/// GitHub logins are usually already clean; this handles identities minted
/// elsewhere: an email-style domain suffix is stripped first, then a
/// backslash-delimited domain prefix, then a slash-delimited prefix, then
/// surrounding whitespace. Each strip applies only when its delimiter is
/// present, and the order is fixed — stripping the email part first means an
/// `@` inside a path-like identity is handled before slashes are.
///
/// ```
/// use deploy_warden_core::extract_username;
///
/// assert_eq!(extract_username("user@example.com"), "user");
/// assert_eq!(extract_username("DOMAIN\\user"), "user");
/// assert_eq!(extract_username("org/user"), "user");
/// assert_eq!(extract_username("plainuser"), "plainuser");
/// ```
pub fn extract_username(raw: &str) -> String {
    let mut name = raw;

    if let Some((local_part, _)) = name.split_once('@') {
        name = local_part;
    }
    if let Some((_, after_domain)) = name.rsplit_once('\\') {
        name = after_domain;
    }
    if let Some((_, after_prefix)) = name.rsplit_once('/') {
        name = after_prefix;
    }

    name.trim().to_string()
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
