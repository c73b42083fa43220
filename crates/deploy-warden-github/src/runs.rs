//! Workflow run operations.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use deploy_warden_core::validator::{RunActors, WorkflowRunLookup};

use crate::error::ApiError;
use crate::{check_status, GitHubClient, MutationOutcome};

// ============================================================================
// Models
// ============================================================================

/// GitHub Actions workflow run.
///
/// Only the fields the service reads are declared; the rest of GitHub's
/// response is dropped on deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    /// Unique workflow run identifier.
    pub id: u64,

    /// Workflow run name.
    #[serde(default)]
    pub name: Option<String>,

    /// Run status: `"queued"`, `"in_progress"`, or `"completed"`.
    #[serde(default)]
    pub status: Option<String>,

    /// Identity recorded as having caused the run to start.
    #[serde(default)]
    pub triggering_actor: Option<RunActor>,

    /// Identity the run is attributed to.
    #[serde(default)]
    pub actor: Option<RunActor>,
}

/// Actor object nested in a workflow run response.
#[derive(Debug, Clone, Deserialize)]
pub struct RunActor {
    #[serde(default)]
    pub login: Option<String>,
}

/// Single job of a workflow run.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowJob {
    pub id: u64,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobsPage {
    #[serde(default)]
    jobs: Vec<WorkflowJob>,
}

// ============================================================================
// Operations
// ============================================================================

impl GitHubClient {
    /// Fetch a workflow run.
    ///
    /// Best-effort lookup used as an identity-resolution fallback: any
    /// failure (network, non-2xx, undecodable body) is logged and reported
    /// as `None`, never raised to the caller.
    #[instrument(skip(self))]
    pub async fn get_workflow_run(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> Option<WorkflowRun> {
        match self.try_get_workflow_run(owner, repo, run_id).await {
            Ok(run) => Some(run),
            Err(e) => {
                error!(error = %e, run_id, "Failed to fetch workflow run");
                None
            }
        }
    }

    async fn try_get_workflow_run(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> Result<WorkflowRun, ApiError> {
        let url = self.endpoint(&format!("/repos/{}/{}/actions/runs/{}", owner, repo, run_id));
        let response = check_status(self.get(&url).await?).await?;
        response.json().await.map_err(ApiError::from)
    }

    /// Record a rejection message against a workflow run.
    ///
    /// Verifies the run has jobs and writes the message to the service log;
    /// returns `false` when no jobs exist or the lookup fails. This does not
    /// post a Checks API annotation — that would need `checks:write`, which
    /// the service token does not carry — and the rejection itself is
    /// already visible in the GitHub UI through the callback state.
    #[instrument(skip(self, message))]
    pub async fn add_workflow_summary_error(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
        message: &str,
    ) -> bool {
        let jobs = match self.try_list_jobs(owner, repo, run_id).await {
            Ok(jobs) => jobs,
            Err(e) => {
                error!(error = %e, run_id, "Failed to list workflow run jobs");
                return false;
            }
        };

        if jobs.is_empty() {
            warn!(run_id, "No jobs found for workflow run");
            return false;
        }

        error!(run_id, job_count = jobs.len(), message, "Workflow run rejected");
        true
    }

    async fn try_list_jobs(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> Result<Vec<WorkflowJob>, ApiError> {
        let url = self.endpoint(&format!(
            "/repos/{}/{}/actions/runs/{}/jobs",
            owner, repo, run_id
        ));
        let response = check_status(self.get(&url).await?).await?;
        let page: JobsPage = response.json().await?;
        Ok(page.jobs)
    }

    /// Cancel a workflow run.
    ///
    /// Auxiliary operation; not exercised by the main approval flow.
    #[instrument(skip(self))]
    pub async fn cancel_workflow_run(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> MutationOutcome {
        let url = self.endpoint(&format!(
            "/repos/{}/{}/actions/runs/{}/cancel",
            owner, repo, run_id
        ));

        let result = match self.post_empty(&url).await {
            Ok(response) => check_status(response).await.map(|_| ()),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!(run_id, "Cancelled workflow run");
                MutationOutcome::Completed(serde_json::json!({ "status": "cancelled" }))
            }
            Err(e) => {
                error!(error = %e, run_id, "Failed to cancel workflow run");
                MutationOutcome::failed(format!("Error cancelling workflow run: {}", e))
            }
        }
    }
}

// ============================================================================
// Identity-resolution port
// ============================================================================

#[async_trait]
impl WorkflowRunLookup for GitHubClient {
    async fn workflow_run_actors(
        &self,
        owner: &str,
        repo: &str,
        run_id: u64,
    ) -> Option<RunActors> {
        let run = self.get_workflow_run(owner, repo, run_id).await?;
        Some(RunActors {
            triggering_actor: run.triggering_actor.and_then(|a| a.login),
            actor: run.actor.and_then(|a| a.login),
        })
    }
}

#[cfg(test)]
#[path = "runs_tests.rs"]
mod tests;
