//! # Deploy Warden Service
//!
//! HTTP service mediating GitHub Actions deployment protection rule events.
//!
//! When a workflow run requests access to a protected environment, GitHub
//! delivers a `deployment_protection_rule` webhook to this service. The
//! handler verifies the delivery signature, resolves the identity that
//! initiated the deployment, compares it against the configured authorized
//! user, and submits the approve/reject decision back to GitHub through the
//! event's one-time callback URL.
//!
//! Each request is handled independently; the shared [`AppState`] holds only
//! immutable configuration, the GitHub gateway, and the validator.

pub mod config;
pub mod errors;
pub mod responses;

use axum::{
    extract::State,
    http::HeaderMap,
    response::Json,
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

use deploy_warden_core::{verify_signature, DeploymentProtectionEvent, DeploymentValidator};
use deploy_warden_github::{GitHubClient, MutationOutcome};

use crate::config::ServiceConfig;
use crate::errors::{HandlerError, ServiceError};
use crate::responses::{DecisionResponse, HealthResponse};

/// Event type this service acts on; every other delivery is acknowledged
/// and skipped.
pub const DEPLOYMENT_PROTECTION_EVENT: &str = "deployment_protection_rule";

const REQUESTED_ACTION: &str = "requested";

// ============================================================================
// Application State
// ============================================================================

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration snapshot taken at startup.
    pub config: Arc<ServiceConfig>,

    /// Gateway for outbound GitHub calls.
    pub gateway: Arc<GitHubClient>,

    /// Validator holding the authorized identity.
    pub validator: Arc<DeploymentValidator>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ServiceConfig, gateway: Arc<GitHubClient>) -> Self {
        let validator = Arc::new(DeploymentValidator::new(
            config.approval.authorized_user.clone(),
        ));

        Self {
            config: Arc::new(config),
            gateway,
            validator,
        }
    }
}

// ============================================================================
// HTTP Server
// ============================================================================

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook/approval", post(handle_approval_webhook))
        .route("/health", get(handle_health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(state)
}

/// Start the HTTP server and serve until a shutdown signal arrives.
pub async fn start_server(
    config: ServiceConfig,
    gateway: Arc<GitHubClient>,
) -> Result<(), ServiceError> {
    let address = format!("{}:{}", config.server.host, config.server.port);
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);

    let state = AppState::new(config, gateway);
    let app = create_router(state);

    let listener =
        tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| ServiceError::BindFailed {
                address: address.clone(),
                message: e.to_string(),
            })?;

    info!(address = %address, "Starting HTTP server");

    let shutdown_signal = async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C signal handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!(
                    "Received SIGINT (Ctrl+C), initiating graceful shutdown with {}s timeout",
                    shutdown_timeout.as_secs()
                );
            },
            _ = terminate => {
                info!(
                    "Received SIGTERM, initiating graceful shutdown with {}s timeout",
                    shutdown_timeout.as_secs()
                );
            },
        }
    };

    // In-flight requests are allowed to complete; new connections are
    // refused as soon as the signal arrives.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ServiceError::ServerFailed {
            message: e.to_string(),
        })?;

    info!("HTTP server shutdown complete");
    Ok(())
}

// ============================================================================
// Webhook Handler
// ============================================================================

/// Handle a GitHub deployment protection webhook.
///
/// State machine per request:
///
/// 1. Parse the body; malformed JSON is a 400.
/// 2. When a secret is configured, verify the delivery signature; failure
///    is a 401 and nothing else runs.
/// 3. Filter on event type and action; everything else is acknowledged
///    with a `skipped` response, because GitHub expects non-matching
///    deliveries to be accepted rather than errored.
/// 4. Resolve the initiator and compare against the authorized user.
/// 5. Submit the decision through the callback URL and report the outcome
///    in the response body.
#[instrument(skip(state, headers, body), fields(delivery_id))]
pub async fn handle_approval_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DecisionResponse>, HandlerError> {
    if let Some(delivery_id) = header_str(&headers, "x-github-delivery") {
        tracing::Span::current().record("delivery_id", delivery_id);
    }
    info!("Received deployment protection webhook");

    let event: DeploymentProtectionEvent =
        serde_json::from_slice(&body).map_err(|e| HandlerError::MalformedBody {
            message: e.to_string(),
        })?;

    if let Some(secret) = state.config.approval.signature_secret() {
        let signature = header_str(&headers, "x-hub-signature-256");
        if !verify_signature(&body, signature, secret) {
            return Err(HandlerError::InvalidSignature);
        }
    }

    let event_type = header_str(&headers, "x-github-event").unwrap_or("");
    let action = event.action.as_deref();
    if event_type != DEPLOYMENT_PROTECTION_EVENT || action != Some(REQUESTED_ACTION) {
        warn!(
            event_type,
            action = action.unwrap_or(""),
            "Received non-deployment-protection event; skipping"
        );
        return Ok(Json(DecisionResponse::Skipped {
            message: "Not a deployment protection rule request, skipping".to_string(),
        }));
    }

    let environment = event.environment().map(str::to_string);
    info!(
        environment = environment.as_deref().unwrap_or(""),
        repository = event.repo_full_name().unwrap_or(""),
        run_id = ?event.run_id(),
        callback_url = event.deployment_callback_url.as_deref().unwrap_or(""),
        "Processing deployment protection request"
    );

    let outcome = state.validator.validate(&event, &*state.gateway).await;
    let callback_url = event.deployment_callback_url.as_deref();

    if !outcome.is_valid {
        let reason = rejection_message(environment.as_deref());
        error!(
            initiated_by = %outcome.initiated_by,
            authorized_user = state.validator.authorized_user(),
            "Unauthorized deployment initiator; rejecting"
        );

        let rejection_result = match callback_url {
            Some(url) => state.gateway.reject_deployment(url, &reason).await,
            None => missing_callback_outcome(),
        };
        if rejection_result.is_failed() {
            warn!("Deployment rejection could not be delivered to GitHub");
        }

        // Best-effort annotation; failure only affects the log.
        if let (Some(run_id), Some(owner), Some(repo)) =
            (event.run_id(), event.repo_owner(), event.repo_name())
        {
            if !state
                .gateway
                .add_workflow_summary_error(owner, repo, run_id, &reason)
                .await
            {
                warn!(run_id, "Could not record the rejection against the workflow run");
            }
        }

        return Ok(Json(DecisionResponse::Rejected {
            reason,
            initiated_by: outcome.initiated_by,
            authorized_user: state.validator.authorized_user().to_string(),
            rejection_result,
        }));
    }

    let message = approval_message(&outcome.initiated_by, environment.as_deref());
    info!(initiated_by = %outcome.initiated_by, "Authorized deployment initiator; approving");

    let approval_result = match callback_url {
        Some(url) => state.gateway.approve_deployment(url, &message).await,
        None => missing_callback_outcome(),
    };
    if approval_result.is_failed() {
        warn!("Deployment approval could not be delivered to GitHub");
    }

    Ok(Json(DecisionResponse::Approved {
        message,
        initiated_by: outcome.initiated_by,
        environment,
        approval_result,
    }))
}

// ============================================================================
// Health Handler
// ============================================================================

/// Liveness probe.
async fn handle_health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Private helpers
// ============================================================================

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

// Operator-facing decision messages, shown in the GitHub UI next to the
// review state.

fn rejection_message(environment: Option<&str>) -> String {
    format!(
        "El usuario utilizado para el despliegue no se encuentra autorizado para desplegar en {}",
        environment.unwrap_or("el entorno solicitado")
    )
}

fn approval_message(initiated_by: &str, environment: Option<&str>) -> String {
    format!(
        "Usuario autorizado: {}. Despliegue permitido en {}",
        initiated_by,
        environment.unwrap_or("el entorno solicitado")
    )
}

/// Outcome reported when a filtered-in event carries no callback URL; the
/// callback is never invoked in that case.
fn missing_callback_outcome() -> MutationOutcome {
    MutationOutcome::failed("deployment_callback_url missing from webhook payload")
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
