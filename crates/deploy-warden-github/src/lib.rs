//! # Deploy Warden GitHub Gateway
//!
//! Thin, stateless wrapper over the GitHub REST API for the Deploy Warden
//! service: fetching workflow runs, submitting deployment protection
//! decisions through per-event callback URLs, and the auxiliary run/user
//! operations the service exposes.
//!
//! ## Error discipline
//!
//! Every public operation recovers transport and HTTP failures internally
//! and returns a structured value — `Option` for best-effort reads,
//! [`MutationOutcome`] for mutations whose result is echoed back to the
//! webhook caller. [`error::ApiError`] classifies failures for logging and
//! tests but never crosses the crate boundary from a public method.

pub mod error;

mod review;
mod runs;
mod users;

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::ApiError;

pub use review::ReviewState;
pub use runs::{RunActor, WorkflowJob, WorkflowRun};
pub use users::User;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

// ============================================================================
// Mutation Outcomes
// ============================================================================

/// Terminal result of a fire-and-log GitHub mutation.
///
/// `Completed` carries the parsed (or synthesized) response body; `Failed`
/// carries a human-readable error. Serialized untagged, so the value
/// round-trips into the service's decision response exactly as GitHub (or
/// the failure) produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MutationOutcome {
    Completed(serde_json::Value),
    Failed { error: String },
}

impl MutationOutcome {
    /// Build a failed outcome from any displayable error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            error: message.into(),
        }
    }

    /// Whether the mutation failed to reach GitHub.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

// ============================================================================
// Client Configuration
// ============================================================================

/// Configuration for GitHub API client behavior.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string for API requests (required by GitHub).
    pub user_agent: String,

    /// Request timeout applied to every outbound call. A timed-out call is
    /// reported as a gateway failure value, never an in-flight hang.
    pub timeout: Duration,

    /// GitHub API base URL; overridden in tests.
    pub github_api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: "deploy-warden/0.1.0".to_string(),
            timeout: Duration::from_secs(10),
            github_api_url: "https://api.github.com".to_string(),
        }
    }
}

impl ClientConfig {
    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the GitHub API base URL.
    pub fn with_github_api_url(mut self, url: impl Into<String>) -> Self {
        self.github_api_url = url.into();
        self
    }
}

// ============================================================================
// Client
// ============================================================================

/// GitHub API client for the deployment protection flow.
///
/// Stateless aside from its immutable configuration; cheap to clone and
/// share across requests. Every call attaches the bearer token, the GitHub
/// JSON accept header, and the pinned API version.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    config: ClientConfig,
}

impl GitHubClient {
    /// Construct a client from a bearer token and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] when the underlying HTTP client cannot
    /// be constructed (TLS backend initialization failure).
    pub fn new(token: impl Into<String>, config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            token: token.into(),
            config,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for an API route path.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.github_api_url.trim_end_matches('/'), path)
    }

    /// Attach the authentication and protocol headers every call carries.
    fn authenticated(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
            .header(API_VERSION_HEADER, API_VERSION)
    }

    pub(crate) async fn get(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        Ok(self.authenticated(self.http.get(url)).send().await?)
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        Ok(self
            .authenticated(self.http.post(url))
            .json(body)
            .send()
            .await?)
    }

    pub(crate) async fn post_empty(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        Ok(self.authenticated(self.http.post(url)).send().await?)
    }
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("token", &"<REDACTED>")
            .field("config", &self.config)
            .finish()
    }
}

/// Map a non-2xx response to [`ApiError::Status`], passing 2xx through.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
