//! Binary entry point for the Deploy Warden HTTP service.
//!
//! This executable:
//! - Loads configuration from files and environment
//! - Initializes logging
//! - Constructs the GitHub gateway
//! - Starts the HTTP server with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use deploy_warden_github::{ClientConfig, GitHubClient};
use deploy_warden_service::config::{LoggingConfig, ServiceConfig};
use deploy_warden_service::errors::ServiceError;
use deploy_warden_service::start_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration is resolved before the subscriber so logging can honor
    // the configured default level.
    let config = match ServiceConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(3);
        }
    };

    init_tracing(&config.logging);

    info!("Starting Deploy Warden service");

    if let Err(e) = config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(3);
    }

    if config.approval.signature_secret().is_none() {
        warn!(
            "No webhook secret is configured — signature verification is \
             DISABLED and any caller that reaches the endpoint can submit \
             events. Set GITHUB_WEBHOOK_SECRET before exposing this service."
        );
    }

    let client_config = ClientConfig::default()
        .with_user_agent(config.github.user_agent.clone())
        .with_timeout(Duration::from_secs(config.github.request_timeout_seconds))
        .with_github_api_url(config.github.api_url.clone());

    let gateway = Arc::new(
        GitHubClient::new(config.github.token.clone(), client_config)
            .context("failed to construct the GitHub client")?,
    );

    info!(
        host = %config.server.host,
        port = config.server.port,
        authorized_user = %config.approval.authorized_user,
        "Configuration loaded"
    );

    if let Err(e) = start_server(config, gateway).await {
        error!("Failed to start server: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
        };

        std::process::exit(exit_code);
    }

    Ok(())
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to the
/// workspace crates with HTTP-layer noise capped at `warn`.
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "deploy_warden_service={level},deploy_warden_github={level},\
             deploy_warden_core={level},tower_http=warn",
            level = logging.level
        ))
    });

    let fmt_layer = if logging.json_format {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
