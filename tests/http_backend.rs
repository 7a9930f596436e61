//! HttpBackend against a mock wake backend

use serde_json::json;
use std::time::Duration;
use wakectl::client::{ActionError, AuthError, HttpBackend, PollError, WakeBackend};
use wakectl::models::Token;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_probe_treats_401_as_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(backend(&server).probe().await);
}

#[tokio::test]
async fn test_probe_fails_when_nothing_answers() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let backend = HttpBackend::new(&uri, Duration::from_secs(1)).unwrap();
    assert!(!backend.probe().await);
}

#[tokio::test]
async fn test_authenticate_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .and(body_json(json!({ "pin": "1234" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let token = backend(&server).authenticate("1234").await.unwrap();
    assert_eq!(token.as_str(), "abc");
}

#[tokio::test]
async fn test_authenticate_maps_rejections() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .and(body_json(json!({ "pin": "0000" })))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid PIN" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .and(body_json(json!({ "pin": "9999" })))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({ "error": "Too many attempts" })),
        )
        .mount(&server)
        .await;

    let backend = backend(&server);
    assert_eq!(backend.authenticate("0000").await, Err(AuthError::InvalidPin));
    assert_eq!(backend.authenticate("9999").await, Err(AuthError::RateLimited));
}

#[tokio::test]
async fn test_status_parses_snapshot_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(header("authorization", "Bearer t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reachable": true,
            "initrd_ssh_open": true,
            "system_ssh_open": false,
            "homelab_ip": "10.0.0.5",
            "initrd_ssh_port": 2222
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = backend(&server).status(&Token::new("t")).await.unwrap();
    assert!(snapshot.reachable);
    assert!(snapshot.initrd_ssh_open);
    assert!(!snapshot.system_ssh_open);
    assert_eq!(snapshot.homelab_ip.as_deref(), Some("10.0.0.5"));
    assert_eq!(snapshot.initrd_ssh_port, Some(2222));
}

#[tokio::test]
async fn test_status_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(header("authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(header("authorization", "Bearer t"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Status check failed" })),
        )
        .mount(&server)
        .await;

    let backend = backend(&server);
    assert_eq!(
        backend.status(&Token::new("expired")).await,
        Err(PollError::Unauthorized)
    );
    assert_eq!(
        backend.status(&Token::new("t")).await,
        Err(PollError::Server {
            status: 500,
            message: "Status check failed".to_string(),
        })
    );
}

#[tokio::test]
async fn test_wake_sends_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/wol"))
        .and(header("authorization", "Bearer t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    backend(&server).wake(&Token::new("t")).await.unwrap();
}

#[tokio::test]
async fn test_unlock_posts_passphrase() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/unlock"))
        .and(header("authorization", "Bearer t"))
        .and(body_json(json!({ "passphrase": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    backend(&server).unlock(&Token::new("t"), "hunter2").await.unwrap();
}

#[tokio::test]
async fn test_action_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/wol"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/unlock"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let backend = backend(&server);
    let token = Token::new("t");
    assert_eq!(backend.wake(&token).await, Err(ActionError::Unauthorized));
    assert_eq!(
        backend.unlock(&token, "pw").await,
        Err(ActionError::Server {
            status: 502,
            message: "Bad Gateway".to_string(),
        })
    );
}

#[tokio::test]
async fn test_base_path_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wake/api/status"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&format!("{}/wake", server.uri()), Duration::from_secs(5)).unwrap();
    assert!(backend.probe().await);
}
