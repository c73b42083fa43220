//! Response types for the HTTP service.

use chrono::{DateTime, Utc};
use deploy_warden_github::MutationOutcome;
use serde::Serialize;

// ============================================================================
// Decision Responses
// ============================================================================

/// Outcome of a deployment protection webhook, returned to GitHub.
///
/// Serialized with a `status` discriminator. Every variant is an
/// acknowledgement (HTTP 200) — even when the GitHub-side approve/reject
/// call itself failed, that failure travels in the `*_result` field rather
/// than the status code, so GitHub does not re-deliver an event the service
/// already understood.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DecisionResponse {
    /// The deployment initiator was not the authorized user (or could not
    /// be determined) and the deployment was rejected.
    Rejected {
        reason: String,
        initiated_by: String,
        authorized_user: String,
        rejection_result: MutationOutcome,
    },

    /// The deployment initiator matched the authorized user and the
    /// deployment was approved.
    Approved {
        message: String,
        initiated_by: String,
        environment: Option<String>,
        approval_result: MutationOutcome,
    },

    /// The delivery was not a `deployment_protection_rule`/`requested`
    /// event; acknowledged without any GitHub call.
    Skipped { message: String },
}

// ============================================================================
// Health Responses
// ============================================================================

/// Liveness probe response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

#[cfg(test)]
#[path = "responses_tests.rs"]
mod tests;
