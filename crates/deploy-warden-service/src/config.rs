//! Configuration types for the HTTP service.
//!
//! Sources are layered — later sources override earlier ones:
//!
//! 1. `/etc/deploy-warden/service.yaml` — system-wide defaults
//! 2. `./config/service.yaml` — deployment-local override
//! 3. Path given by the `DW_CONFIG_FILE` environment variable
//! 4. Environment variables prefixed `DW__` (double-underscore separator),
//!    e.g. `DW__SERVER__PORT=9090` sets `server.port = 9090`
//! 5. The well-known GitHub variables `GITHUB_TOKEN`,
//!    `GITHUB_WEBHOOK_SECRET`, and `AUTHORIZED_USER`, which override every
//!    other source.
//!
//! Every field carries a serde default, so an absent file or an empty
//! environment yields a structurally valid configuration; [`ServiceConfig::validate`]
//! then enforces the fields that have no sensible default.

use deploy_warden_core::ValidationError;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// GitHub API access settings.
    pub github: GitHubConfig,

    /// Deployment approval settings.
    pub approval: ApprovalConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Load configuration from the layered sources described on the module.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(
                config::File::with_name("/etc/deploy-warden/service")
                    .required(false)
                    .format(config::FileFormat::Yaml),
            )
            .add_source(
                config::File::with_name("config/service")
                    .required(false)
                    .format(config::FileFormat::Yaml),
            );

        // Optional explicit path supplied by the operator.
        if let Ok(explicit_path) = std::env::var("DW_CONFIG_FILE") {
            if !explicit_path.is_empty() {
                builder = builder.add_source(
                    config::File::with_name(&explicit_path)
                        .required(true)
                        .format(config::FileFormat::Yaml),
                );
            }
        }

        builder = builder.add_source(config::Environment::with_prefix("DW").separator("__"));

        // The well-known GitHub variables win over every layered source so a
        // platform-injected token cannot be shadowed by a stale file entry.
        for (variable, key) in [
            ("GITHUB_TOKEN", "github.token"),
            ("GITHUB_WEBHOOK_SECRET", "approval.webhook_secret"),
            ("AUTHORIZED_USER", "approval.authorized_user"),
        ] {
            if let Ok(value) = std::env::var(variable) {
                builder = builder.set_override(key, value)?;
            }
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Enforce the fields that have no sensible default.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.github.token.is_empty() {
            return Err(ValidationError::Required {
                field: "github.token (GITHUB_TOKEN)".to_string(),
            });
        }

        if self.approval.authorized_user.is_empty() {
            return Err(ValidationError::Required {
                field: "approval.authorized_user (AUTHORIZED_USER)".to_string(),
            });
        }

        if self.server.port == 0 {
            return Err(ValidationError::InvalidFormat {
                field: "server.port".to_string(),
                message: "must be non-zero".to_string(),
            });
        }

        if self.github.request_timeout_seconds == 0 {
            return Err(ValidationError::InvalidFormat {
                field: "github.request_timeout_seconds".to_string(),
                message: "must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Graceful shutdown timeout in seconds.
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

/// GitHub API access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Bearer credential for the GitHub API. Required; normally injected
    /// through `GITHUB_TOKEN`.
    pub token: String,

    /// GitHub API base URL.
    pub api_url: String,

    /// Timeout applied to every outbound GitHub call, in seconds.
    pub request_timeout_seconds: u64,

    /// User agent for outbound calls (required by GitHub).
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: "https://api.github.com".to_string(),
            request_timeout_seconds: 10,
            user_agent: "deploy-warden/0.1.0".to_string(),
        }
    }
}

/// Deployment approval configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApprovalConfig {
    /// The single identity permitted to trigger approved deployments.
    ///
    /// Deliberately has no default: a baked-in placeholder identity would
    /// silently authorize the wrong account on an unconfigured deployment.
    /// Normally injected through `AUTHORIZED_USER`.
    pub authorized_user: String,

    /// Webhook secret for `X-Hub-Signature-256` verification.
    ///
    /// When unset (or empty) signature verification is **skipped entirely**
    /// and any caller that can reach the endpoint can submit events. Leaving
    /// this unset is an explicit deployer decision, flagged with a warning
    /// at startup.
    pub webhook_secret: Option<String>,
}

impl ApprovalConfig {
    /// The webhook secret, when one is configured and non-empty.
    pub fn signature_secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref().filter(|s| !s.is_empty())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default logging level when `RUST_LOG` is not set.
    pub level: String,

    /// Enable JSON structured logging.
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
