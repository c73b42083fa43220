//! Tests for client construction, configuration, and shared result types.

use super::*;

// ============================================================================
// ClientConfig
// ============================================================================

mod client_config {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();

        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent, "deploy-warden/0.1.0");
    }

    #[test]
    fn test_builder_methods_override_fields() {
        let config = ClientConfig::default()
            .with_user_agent("warden-test/1.0")
            .with_timeout(Duration::from_secs(3))
            .with_github_api_url("http://localhost:9999");

        assert_eq!(config.user_agent, "warden-test/1.0");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.github_api_url, "http://localhost:9999");
    }
}

// ============================================================================
// GitHubClient
// ============================================================================

mod client {
    use super::*;

    #[test]
    fn test_construction_succeeds() {
        let client = GitHubClient::new("token", ClientConfig::default());
        assert!(client.is_ok());
    }

    /// The bearer token must never appear in debug output.
    #[test]
    fn test_debug_redacts_token() {
        let client = GitHubClient::new("ghp_very_secret", ClientConfig::default()).unwrap();
        let debug_str = format!("{:?}", client);

        assert!(
            !debug_str.contains("ghp_very_secret"),
            "token must not appear in debug output; got: {}",
            debug_str
        );
        assert!(debug_str.contains("<REDACTED>"));
    }

    /// A trailing slash on the configured base URL must not produce double
    /// slashes in request URLs.
    #[test]
    fn test_endpoint_normalizes_trailing_slash() {
        let config = ClientConfig::default().with_github_api_url("http://localhost:9999/");
        let client = GitHubClient::new("token", config).unwrap();

        assert_eq!(
            client.endpoint("/users/octocat"),
            "http://localhost:9999/users/octocat"
        );
    }
}

// ============================================================================
// MutationOutcome
// ============================================================================

mod mutation_outcome {
    use super::*;

    /// Completed outcomes serialize as the raw response body.
    #[test]
    fn test_completed_serializes_untagged() {
        let outcome = MutationOutcome::Completed(serde_json::json!({ "status": "approved" }));

        let serialized = serde_json::to_value(&outcome).unwrap();
        assert_eq!(serialized, serde_json::json!({ "status": "approved" }));
    }

    #[test]
    fn test_failed_serializes_as_error_object() {
        let outcome = MutationOutcome::failed("Error approving deployment: timed out");

        let serialized = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            serialized,
            serde_json::json!({ "error": "Error approving deployment: timed out" })
        );
    }

    #[test]
    fn test_is_failed() {
        assert!(MutationOutcome::failed("boom").is_failed());
        assert!(!MutationOutcome::Completed(serde_json::Value::Null).is_failed());
    }
}
