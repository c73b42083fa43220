//! Deployment protection review submission.
//!
//! GitHub supplies a one-time `deployment_callback_url` in every
//! `deployment_protection_rule` event; POSTing a review state to it approves
//! or rejects the pending deployment. The URL is event-specific, so these
//! operations take it as an argument instead of building an API route.

use serde::Serialize;
use tracing::{error, info, instrument};

use crate::error::ApiError;
use crate::{check_status, GitHubClient, MutationOutcome};

/// Decision submitted to the deployment callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Approved,
    Rejected,
}

impl ReviewState {
    /// Wire value of the `state` field; doubles as the synthetic `status`
    /// reported when GitHub answers with an empty body.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Gerund used in failure messages.
    fn verb(&self) -> &'static str {
        match self {
            Self::Approved => "approving",
            Self::Rejected => "rejecting",
        }
    }
}

/// Review body POSTed to the callback URL.
#[derive(Debug, Clone, Serialize)]
struct ReviewRequest<'a> {
    state: &'a str,
    comment: &'a str,
    // GitHub fills the environment in from the callback context.
    environment_name: &'a str,
}

impl GitHubClient {
    /// Approve a pending deployment through its callback URL.
    ///
    /// On success returns the parsed response body, or a synthetic
    /// `{"status": "approved"}` when GitHub answers with an empty body. On
    /// failure returns `{"error": <message>}` — reported, never fatal to the
    /// webhook request.
    pub async fn approve_deployment(&self, callback_url: &str, comment: &str) -> MutationOutcome {
        self.submit_review(callback_url, ReviewState::Approved, comment)
            .await
    }

    /// Reject a pending deployment through its callback URL.
    ///
    /// Same contract as [`approve_deployment`](Self::approve_deployment),
    /// with `state: "rejected"`.
    pub async fn reject_deployment(&self, callback_url: &str, comment: &str) -> MutationOutcome {
        self.submit_review(callback_url, ReviewState::Rejected, comment)
            .await
    }

    #[instrument(skip(self, callback_url, state, comment), fields(state = state.as_str()))]
    async fn submit_review(
        &self,
        callback_url: &str,
        state: ReviewState,
        comment: &str,
    ) -> MutationOutcome {
        match self.try_submit_review(callback_url, state, comment).await {
            Ok(body) => {
                info!(state = state.as_str(), "Deployment review submitted");
                MutationOutcome::Completed(body)
            }
            Err(e) => {
                let message = format!("Error {} deployment: {}", state.verb(), e);
                error!(error = %e, state = state.as_str(), "Deployment review failed");
                MutationOutcome::failed(message)
            }
        }
    }

    async fn try_submit_review(
        &self,
        callback_url: &str,
        state: ReviewState,
        comment: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let request = ReviewRequest {
            state: state.as_str(),
            comment,
            environment_name: "",
        };

        let response = self.post_json(callback_url, &request).await?;
        let response = check_status(response).await?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::json!({ "status": state.as_str() }));
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
