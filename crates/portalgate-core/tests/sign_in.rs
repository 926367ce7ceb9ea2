//! Integration tests for the sign-in sequence against a mock identity service.

use std::time::Duration;

use portalgate_core::{
    ApiClient, ApiError, ErrorCategory, PortalLocation, SessionController, SessionError, SessionState,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EMAIL: &str = "user@example.com";
const PASSWORD: &str = "Abcdef1!";
const PORTAL: &str = "https://portal.example/tenant1";

fn controller_for(server: &MockServer) -> SessionController {
    SessionController::new(ApiClient::new(server.uri()).unwrap())
}

async fn mount_login_ok(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/Login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"email": EMAIL, "password": PASSWORD})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": token})))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_portal_ok(server: &MockServer, token: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/api/PortalUrl"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_sign_in_reaches_browsing() {
    let server = MockServer::start().await;
    mount_login_ok(&server, "T").await;
    mount_portal_ok(&server, "T", PORTAL).await;

    let controller = controller_for(&server);
    let location = controller.sign_in(EMAIL, PASSWORD).await.unwrap();

    assert_eq!(location.as_str(), PORTAL);
    let session = controller.session();
    assert_eq!(session.current(), SessionState::Browsing);
    assert_eq!(session.location(), Some(PortalLocation::from(PORTAL)));
    assert_eq!(session.token().map(|t| t.expose().to_string()), Some("T".to_string()));
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_login_success_stores_token_even_if_portal_fails() {
    let server = MockServer::start().await;
    mount_login_ok(&server, "T").await;
    Mock::given(method("GET"))
        .and(path("/api/PortalUrl"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    let err = controller.sign_in(EMAIL, PASSWORD).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::PortalFailed);
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("503"));

    // Authenticated, token retained, no destination
    let session = controller.session();
    assert_eq!(session.current(), SessionState::Authenticated);
    assert_eq!(session.token().map(|t| t.expose().to_string()), Some("T".to_string()));
    assert!(session.location().is_none());
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_login_unauthorized_stays_logged_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/PortalUrl"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PORTAL))
        .expect(0)
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    let err = controller.sign_in(EMAIL, PASSWORD).await.unwrap_err();

    assert!(matches!(err, SessionError::Login(_)));
    assert_eq!(err.category(), ErrorCategory::LoginFailed);
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("401"));

    let session = controller.session();
    assert_eq!(session.current(), SessionState::LoggedOut);
    assert!(session.token().is_none());
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_malformed_login_response_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    let err = controller.sign_in(EMAIL, PASSWORD).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::LoginFailed);
    assert_eq!(err.status(), None);
    assert!(matches!(
        err,
        SessionError::Login(portalgate_core::ApiError::Parse(_))
    ));
    assert_eq!(controller.session().current(), SessionState::LoggedOut);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_login_response_without_token_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T"})))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    let err = controller.sign_in(EMAIL, PASSWORD).await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Login(portalgate_core::ApiError::Parse(_))
    ));
    assert!(controller.session().token().is_none());
}

#[tokio::test]
async fn test_unreachable_server_stays_logged_out() {
    // Nothing listens on the discard port
    let controller = SessionController::new(ApiClient::new("http://127.0.0.1:9").unwrap());
    let err = controller.sign_in(EMAIL, PASSWORD).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::LoginFailed);
    assert_eq!(controller.session().current(), SessionState::LoggedOut);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_second_attempt_while_loading_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"accessToken": "T"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_portal_ok(&server, "T", PORTAL).await;

    let controller = controller_for(&server);
    let (first, second) = tokio::join!(controller.sign_in(EMAIL, PASSWORD), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(controller.is_loading());
        assert_eq!(controller.session().current(), SessionState::Authenticating);
        controller.sign_in(EMAIL, PASSWORD).await
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(SessionError::Busy)));
    assert_eq!(controller.session().current(), SessionState::Browsing);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_sign_in_while_browsing_is_rejected() {
    let server = MockServer::start().await;
    mount_login_ok(&server, "T").await;
    mount_portal_ok(&server, "T", PORTAL).await;

    let controller = controller_for(&server);
    controller.sign_in(EMAIL, PASSWORD).await.unwrap();

    let err = controller.sign_in(EMAIL, PASSWORD).await.unwrap_err();
    assert!(matches!(err, SessionError::AlreadySignedIn));
    assert_eq!(controller.session().current(), SessionState::Browsing);
    assert_eq!(controller.session().location(), Some(PortalLocation::from(PORTAL)));
}

#[tokio::test]
async fn test_logout_after_portal_failure_allows_new_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "T"})))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/PortalUrl"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/PortalUrl"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PORTAL))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    assert!(controller.sign_in(EMAIL, PASSWORD).await.is_err());
    assert_eq!(controller.session().current(), SessionState::Authenticated);

    // Portal failures are not retried automatically
    assert!(matches!(
        controller.sign_in(EMAIL, PASSWORD).await,
        Err(SessionError::AlreadySignedIn)
    ));

    controller.logout().unwrap();
    assert_eq!(controller.session().current(), SessionState::LoggedOut);
    assert!(controller.session().token().is_none());

    let location = controller.sign_in(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(location.as_str(), PORTAL);
    assert_eq!(controller.session().current(), SessionState::Browsing);
}

#[tokio::test]
async fn test_subscribers_observe_each_step() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"accessToken": "T"}))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/PortalUrl"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PORTAL)
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    let mut rx = controller.session().subscribe();

    let collect = async {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            let done = snapshot.state == SessionState::Browsing;
            seen.push(snapshot);
            if done {
                break;
            }
        }
        seen
    };

    let (result, seen) = tokio::join!(controller.sign_in(EMAIL, PASSWORD), collect);
    result.unwrap();

    let states: Vec<SessionState> = seen.iter().map(|s| s.state).collect();
    assert_eq!(
        states,
        vec![
            SessionState::Authenticating,
            SessionState::Authenticated,
            SessionState::Browsing
        ]
    );
    assert!(!seen[0].has_token);
    assert!(seen[1].has_token && seen[1].location.is_none());
    assert_eq!(seen[2].location, Some(PortalLocation::from(PORTAL)));
}

#[tokio::test]
async fn test_dropped_sign_in_returns_to_logged_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"accessToken": "T"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    mount_portal_ok(&server, "T", PORTAL).await;

    let controller = controller_for(&server);
    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), controller.sign_in(EMAIL, PASSWORD)).await;
    assert!(timed_out.is_err());

    assert_eq!(controller.session().current(), SessionState::LoggedOut);
    assert!(controller.session().token().is_none());
    assert!(!controller.is_loading());

    // A fresh attempt is accepted
    let location = controller.sign_in(EMAIL, PASSWORD).await.unwrap();
    assert_eq!(location.as_str(), PORTAL);
    assert_eq!(controller.session().current(), SessionState::Browsing);
}

#[tokio::test]
async fn test_empty_portal_body_is_parse_error() {
    let server = MockServer::start().await;
    mount_login_ok(&server, "T").await;
    mount_portal_ok(&server, "T", "").await;

    let controller = controller_for(&server);
    let err = controller.sign_in(EMAIL, PASSWORD).await.unwrap_err();

    assert!(matches!(err, SessionError::Portal(ApiError::Parse(_))));
    assert_eq!(err.category(), ErrorCategory::PortalFailed);
    assert_eq!(controller.session().current(), SessionState::Authenticated);
    assert!(controller.session().location().is_none());
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_whitespace_only_portal_body_is_parse_error() {
    let server = MockServer::start().await;
    mount_login_ok(&server, "T").await;
    mount_portal_ok(&server, "T", " \r\n").await;

    let controller = controller_for(&server);
    let err = controller.sign_in(EMAIL, PASSWORD).await.unwrap_err();

    assert!(matches!(err, SessionError::Portal(ApiError::Parse(_))));
    assert_eq!(controller.session().current(), SessionState::Authenticated);
}

#[tokio::test]
async fn test_portal_body_is_stored_verbatim() {
    let body = "  https://portal.example/tenant1\n";
    let server = MockServer::start().await;
    mount_login_ok(&server, "T").await;
    mount_portal_ok(&server, "T", body).await;

    let controller = controller_for(&server);
    let location = controller.sign_in(EMAIL, PASSWORD).await.unwrap();

    assert_eq!(location.as_str(), body);
    assert_eq!(
        controller.session().location(),
        Some(PortalLocation::from(body))
    );
}
