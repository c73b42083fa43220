//! Tests for workflow run operations and the identity-resolution port.

use super::*;
use crate::ClientConfig;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> GitHubClient {
    let config = ClientConfig::default().with_github_api_url(server.uri());
    GitHubClient::new("test-token", config).unwrap()
}

// ============================================================================
// get_workflow_run
// ============================================================================

mod get_workflow_run {
    use super::*;

    #[tokio::test]
    async fn test_fetches_run_with_actors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/actions/runs/42"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("X-GitHub-Api-Version", "2022-11-28"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 42,
                "name": "deploy",
                "status": "in_progress",
                "triggering_actor": { "login": "alice", "id": 1 },
                "actor": { "login": "bob", "id": 2 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let run = test_client(&server)
            .get_workflow_run("acme", "widgets", 42)
            .await
            .expect("run should be found");

        assert_eq!(run.id, 42);
        assert_eq!(run.name.as_deref(), Some("deploy"));
        assert_eq!(run.status.as_deref(), Some("in_progress"));
        assert_eq!(run.triggering_actor.unwrap().login.as_deref(), Some("alice"));
        assert_eq!(run.actor.unwrap().login.as_deref(), Some("bob"));
    }

    /// Non-2xx answers are a best-effort miss, not an error.
    #[tokio::test]
    async fn test_not_found_yields_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/actions/runs/42"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .expect(1)
            .mount(&server)
            .await;

        let run = test_client(&server)
            .get_workflow_run("acme", "widgets", 42)
            .await;

        assert!(run.is_none());
    }

    #[tokio::test]
    async fn test_network_failure_yields_none() {
        let config = ClientConfig::default().with_github_api_url("http://127.0.0.1:1");
        let client = GitHubClient::new("test-token", config).unwrap();

        assert!(client.get_workflow_run("acme", "widgets", 42).await.is_none());
    }
}

// ============================================================================
// add_workflow_summary_error
// ============================================================================

mod add_workflow_summary_error {
    use super::*;

    #[tokio::test]
    async fn test_run_with_jobs_returns_true() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/actions/runs/42/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_count": 1,
                "jobs": [{ "id": 7, "name": "deploy", "status": "in_progress" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let noted = test_client(&server)
            .add_workflow_summary_error("acme", "widgets", 42, "unauthorized deployment")
            .await;

        assert!(noted);
    }

    #[tokio::test]
    async fn test_run_without_jobs_returns_false() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/actions/runs/42/jobs"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "total_count": 0, "jobs": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let noted = test_client(&server)
            .add_workflow_summary_error("acme", "widgets", 42, "unauthorized deployment")
            .await;

        assert!(!noted);
    }

    #[tokio::test]
    async fn test_failed_jobs_lookup_returns_false() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/actions/runs/42/jobs"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let noted = test_client(&server)
            .add_workflow_summary_error("acme", "widgets", 42, "unauthorized deployment")
            .await;

        assert!(!noted);
    }
}

// ============================================================================
// cancel_workflow_run
// ============================================================================

mod cancel_workflow_run {
    use super::*;

    #[tokio::test]
    async fn test_cancel_success_synthesizes_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/acme/widgets/actions/runs/42/cancel"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = test_client(&server)
            .cancel_workflow_run("acme", "widgets", 42)
            .await;

        assert_eq!(
            outcome,
            MutationOutcome::Completed(serde_json::json!({ "status": "cancelled" }))
        );
    }

    #[tokio::test]
    async fn test_cancel_failure_becomes_error_value() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/acme/widgets/actions/runs/42/cancel"))
            .respond_with(ResponseTemplate::new(409).set_body_string("already completed"))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = test_client(&server)
            .cancel_workflow_run("acme", "widgets", 42)
            .await;

        match outcome {
            MutationOutcome::Failed { error } => {
                assert!(error.starts_with("Error cancelling workflow run:"), "{error}");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}

// ============================================================================
// WorkflowRunLookup port
// ============================================================================

mod workflow_run_lookup {
    use super::*;

    #[tokio::test]
    async fn test_maps_run_to_actor_logins() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/actions/runs/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 42,
                "triggering_actor": { "login": "alice" },
                "actor": { "login": "bob" }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let actors = (&client as &dyn WorkflowRunLookup)
            .workflow_run_actors("acme", "widgets", 42)
            .await
            .expect("actors should resolve");

        assert_eq!(actors.triggering_actor.as_deref(), Some("alice"));
        assert_eq!(actors.actor.as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn test_missing_run_yields_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/actions/runs/42"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let actors = (&client as &dyn WorkflowRunLookup)
            .workflow_run_actors("acme", "widgets", 42)
            .await;

        assert!(actors.is_none());
    }
}
