//! CLI tests against a mock API.
//!
//! Each test gets its own credential file through `RETAIN_CREDENTIALS`, so
//! nothing touches the user's real session.

mod common;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{TestEnv, failure, success};

fn api_url(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

// ============================================================================
// Offline
// ============================================================================

#[test]
fn test_status_when_logged_out() {
    let env = TestEnv::new("http://localhost:8000/api");

    let args = ["status"];
    let stdout = success(&args, env.run(&args));

    assert!(stdout.contains("Not logged in"), "stdout: {}", stdout);
    assert!(stdout.contains("http://localhost:8000/api"));
}

#[test]
fn test_logout_when_logged_out_is_ok() {
    let env = TestEnv::new("http://localhost:8000/api");

    let args = ["logout"];
    success(&args, env.run(&args));
    success(&args, env.run(&args));

    assert!(env.read_credentials().is_none());
}

#[test]
fn test_logout_removes_credentials() {
    let env = TestEnv::new("http://localhost:8000/api");
    env.write_credentials("A1", "R1");

    let stdout = success(&["status"], env.run(&["status"]));
    assert!(stdout.contains("Logged in"), "stdout: {}", stdout);

    success(&["logout"], env.run(&["logout"]));
    assert!(env.read_credentials().is_none());
}

#[test]
fn test_commands_require_login() {
    let env = TestEnv::new("http://localhost:8000/api");

    let args = ["students", "list"];
    let stderr = failure(&args, env.run(&args));

    assert!(stderr.contains("Not logged in"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_api_url_rejected() {
    let env = TestEnv::new("ftp://example.com/api");

    let args = ["status"];
    let stderr = failure(&args, env.run(&args));

    assert!(stderr.contains("Invalid API URL"), "stderr: {}", stderr);
}

// ============================================================================
// Against a mock API
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_login_list_logout_flow() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .and(body_json(json!({ "username": "alice", "password": "secret123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "A1",
            "refresh": "R1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/students/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(api_url(&server));

    let args = ["login", "--username", "alice", "--password", "secret123"];
    let stdout = success(&args, env.run_async(&args).await);
    assert!(stdout.contains("Logged in successfully"));

    let stored = env.read_credentials().expect("credentials were not saved");
    assert_eq!(stored["access_token"], "A1");
    assert_eq!(stored["refresh_token"], "R1");

    let args = ["students", "list"];
    success(&args, env.run_async(&args).await);

    success(&["logout"], env.run_async(&["logout"]).await);
    assert!(env.read_credentials().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&server)
        .await;

    let env = TestEnv::new(api_url(&server));

    let args = ["login", "--username", "alice", "--password", "wrong"];
    let stderr = failure(&args, env.run_async(&args).await);

    assert!(stderr.contains("invalid credentials"), "stderr: {}", stderr);
    assert!(env.read_credentials().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_refreshed_credentials_are_persisted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .and(body_json(json!({ "refresh": "R1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "A2" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notifications/"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(api_url(&server));
    env.write_credentials("A1", "R1");

    let args = ["notifications", "list"];
    success(&args, env.run_async(&args).await);

    let stored = env.read_credentials().expect("credentials were cleared");
    assert_eq!(stored["access_token"], "A2");
    assert_eq!(stored["refresh_token"], "R1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_session_is_cleared() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/students/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is blacklisted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(api_url(&server));
    env.write_credentials("A1", "R1");

    let args = ["students", "list"];
    let stderr = failure(&args, env.run_async(&args).await);

    assert!(stderr.contains("Session expired"), "stderr: {}", stderr);
    assert!(env.read_credentials().is_none());

    let stdout = success(&["status"], env.run_async(&["status"]).await);
    assert!(stdout.contains("Not logged in"));
}
