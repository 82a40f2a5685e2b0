use assert_json_diff::assert_json_eq;
use mockito::{Matcher, Server, ServerGuard};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio_test::assert_ok;
use wadas_client::application::client::RetryingSessionClient;
use wadas_client::application::services::{DashboardService, DashboardServiceImpl};
use wadas_client::config::{Config, Credentials, RestApiConfig, SessionConfig, StorageConfig};
use wadas_client::error::ClientError;
use wadas_client::session::{HttpTokenRefresher, SingleFlightRefresher, TokenRefresher};
use wadas_client::storage::{FileTokenStore, MemoryTokenStore, Session, TokenKind, TokenStore};
use wadas_client::transport::{RawResponse, WadasHttpClient};
use wadas_client::utils::filters::DetectionFilter;
use wadas_client::utils::logger::setup_logger;

fn rest_api(server: &ServerGuard) -> RestApiConfig {
    RestApiConfig {
        base_url: format!("{}/", server.url()),
        timeout: 5,
    }
}

fn config(server: &ServerGuard, token_path: PathBuf, single_flight: bool) -> Arc<Config> {
    Arc::new(Config {
        credentials: Credentials {
            username: "ranger".to_string(),
            password: "secret".to_string(),
        },
        rest_api: rest_api(server),
        storage: StorageConfig { token_path },
        session: SessionConfig {
            single_flight_refresh: single_flight,
        },
    })
}

/// Retrying client wired to a real refresher talking to `server`.
fn retrying_client(
    server: &ServerGuard,
    store: Arc<dyn TokenStore>,
) -> (RetryingSessionClient, WadasHttpClient) {
    let http = WadasHttpClient::new(&rest_api(server)).unwrap();
    let refresher: Arc<dyn TokenRefresher> = Arc::new(HttpTokenRefresher::new(
        http.clone(),
        store.clone(),
        Duration::from_secs(5),
    ));
    (
        RetryingSessionClient::new(store, refresher, Duration::from_secs(5)),
        http,
    )
}

#[tokio::test]
async fn test_expired_access_token_is_refreshed_and_retried() {
    setup_logger();
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("GET", "/api/v1/cameras")
        .match_header("x-access-token", "expired")
        .with_status(401)
        .with_body(r#"{"detail": "Invalid token"}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/v1/token/refresh")
        .match_body(Matcher::Json(json!({"refresh_token": "valid123"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "renewed", "token_type": "JWT"}"#)
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", "/api/v1/cameras")
        .match_header("x-access-token", "renewed")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": [{"id": 1, "name": "Pond", "type": "FTP", "enabled": true}]}"#)
        .expect(1)
        .create_async()
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(Session::new(
        "expired", "valid123",
    )));
    let (client, http) = retrying_client(&server, store.clone());

    let payload = assert_ok!(
        client
            .execute(|token| {
                let http = http.clone();
                async move { http.get("api/v1/cameras", &[], token.as_deref()).await }
            })
            .await
    );

    assert_json_eq!(
        payload.json::<serde_json::Value>().unwrap(),
        json!({"data": [{"id": 1, "name": "Pond", "type": "FTP", "enabled": true}]})
    );
    assert_eq!(store.session(), Session::new("renewed", "valid123"));
    rejected.assert_async().await;
    refresh.assert_async().await;
    accepted.assert_async().await;
}

#[tokio::test]
async fn test_missing_refresh_token_is_unauthorized_without_refresh_call() {
    setup_logger();
    let mut server = Server::new_async().await;
    let resource = server
        .mock("GET", "/api/v1/animals")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/api/v1/token/refresh")
        .expect(0)
        .create_async()
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store.set(TokenKind::Access, "expired");
    let (client, http) = retrying_client(&server, store.clone());

    let result = client
        .execute(|token| {
            let http = http.clone();
            async move { http.get("api/v1/animals", &[], token.as_deref()).await }
        })
        .await;

    assert_eq!(result, Err(ClientError::Unauthorized));
    resource.assert_async().await;
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_rejected_refresh_keeps_stored_tokens() {
    setup_logger();
    let mut server = Server::new_async().await;
    let resource = server
        .mock("GET", "/api/v1/animals")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let _refresh = server
        .mock("POST", "/api/v1/token/refresh")
        .with_status(401)
        .with_body(r#"{"detail": "Invalid token"}"#)
        .create_async()
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(Session::new("old", "revoked")));
    let (client, http) = retrying_client(&server, store.clone());

    let result = client
        .execute(|token| {
            let http = http.clone();
            async move { http.get("api/v1/animals", &[], token.as_deref()).await }
        })
        .await;

    assert_eq!(result, Err(ClientError::Unauthorized));
    assert_eq!(store.session(), Session::new("old", "revoked"));
    resource.assert_async().await;
}

#[tokio::test]
async fn test_other_failure_after_refresh_is_unknown() {
    setup_logger();
    let mut server = Server::new_async().await;
    let _rejected = server
        .mock("GET", "/api/v1/actuator_types")
        .match_header("x-access-token", "expired")
        .with_status(401)
        .create_async()
        .await;
    let _refresh = server
        .mock("POST", "/api/v1/token/refresh")
        .with_status(200)
        .with_body(r#"{"access_token": "renewed"}"#)
        .create_async()
        .await;
    let _broken = server
        .mock("GET", "/api/v1/actuator_types")
        .match_header("x-access-token", "renewed")
        .with_status(503)
        .create_async()
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(Session::new("expired", "ref")));
    let service =
        DashboardServiceImpl::new(config(&server, "unused.json".into(), false), store).unwrap();

    assert_eq!(service.actuator_types().await, Err(ClientError::Unknown));
}

#[tokio::test]
async fn test_login_persists_session_for_the_next_run() {
    setup_logger();
    let dir = tempdir().unwrap();
    let token_path = dir.path().join("wadas").join("session.json");
    let mut server = Server::new_async().await;
    let _login = server
        .mock("POST", "/api/v1/login")
        .match_body(Matcher::Json(json!({"username": "ranger", "password": "secret"})))
        .with_status(200)
        .with_body(r#"{"access_token": "acc", "refresh_token": "ref", "token_type": "JWT"}"#)
        .create_async()
        .await;
    let detections = server
        .mock("GET", "/api/v1/detections")
        .match_header("x-access-token", "acc")
        .match_query(Matcher::UrlEncoded("offset".into(), "0".into()))
        .with_status(200)
        .with_body(r#"{"total": 0, "count": 0, "data": []}"#)
        .expect(1)
        .create_async()
        .await;

    let config = config(&server, token_path.clone(), true);
    {
        let service = DashboardServiceImpl::from_config(config.clone()).unwrap();
        let auth = service.authenticator();
        assert!(!auth.is_logged_in());
        auth.login_with(&config.credentials).await.unwrap();
    }

    let reopened = FileTokenStore::open(&token_path).unwrap();
    assert_eq!(reopened.session(), Session::new("acc", "ref"));

    let service = DashboardServiceImpl::from_config(config).unwrap();
    let page = assert_ok!(service.detections(&DetectionFilter::default(), 0).await);

    assert!(page.is_empty());
    assert_eq!(page.total_pages(20), 1);
    detections.assert_async().await;

    service.authenticator().logout();
    assert!(FileTokenStore::open(&token_path).unwrap().session().is_empty());
}

#[tokio::test]
async fn test_concurrent_calls_with_valid_token_are_independent() {
    setup_logger();
    let mut server = Server::new_async().await;
    let _animals = server
        .mock("GET", "/api/v1/animals")
        .match_header("x-access-token", "acc")
        .with_status(200)
        .with_body(r#"{"data": ["fox"]}"#)
        .expect(1)
        .create_async()
        .await;
    let _commands = server
        .mock("GET", "/api/v1/actuation_commands")
        .match_header("x-access-token", "acc")
        .with_status(200)
        .with_body(r#"{"data": ["OPEN", "CLOSE"]}"#)
        .expect(1)
        .create_async()
        .await;

    let store = Arc::new(MemoryTokenStore::with_session(Session::new("acc", "ref")));
    let service =
        DashboardServiceImpl::new(config(&server, "unused.json".into(), true), store).unwrap();

    let (animals, commands) = tokio::join!(service.animals(), service.actuation_commands());

    assert_eq!(animals.unwrap(), vec!["fox"]);
    assert_eq!(commands.unwrap(), vec!["OPEN", "CLOSE"]);
}

/// Refresh endpoint answering after `delay`, so concurrent callers overlap.
async fn slow_refresh_mock(
    server: &mut ServerGuard,
    delay: Duration,
    hits: usize,
) -> mockito::Mock {
    server
        .mock("POST", "/api/v1/token/refresh")
        .expect(hits)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_chunked_body(move |w| {
            std::thread::sleep(delay);
            w.write_all(br#"{"access_token": "fresh", "token_type": "JWT"}"#)
        })
        .create_async()
        .await
}

#[tokio::test]
async fn test_concurrent_authorization_failures_share_one_refresh() {
    setup_logger();
    let mut server = Server::new_async().await;
    let mut rejected = Vec::new();
    for endpoint in ["/api/v1/animals", "/api/v1/actuation_commands"] {
        rejected.push(
            server
                .mock("GET", endpoint)
                .match_header("x-access-token", "expired")
                .with_status(401)
                .expect(1)
                .create_async()
                .await,
        );
    }
    let animals = server
        .mock("GET", "/api/v1/animals")
        .match_header("x-access-token", "fresh")
        .with_status(200)
        .with_body(r#"{"data": ["fox"]}"#)
        .expect(1)
        .create_async()
        .await;
    let commands = server
        .mock("GET", "/api/v1/actuation_commands")
        .match_header("x-access-token", "fresh")
        .with_status(200)
        .with_body(r#"{"data": ["OPEN"]}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = slow_refresh_mock(&mut server, Duration::from_millis(300), 1).await;

    let store = Arc::new(MemoryTokenStore::with_session(Session::new("expired", "ref")));
    let service =
        DashboardServiceImpl::new(config(&server, "unused.json".into(), true), store.clone())
            .unwrap();

    let (found, known) = tokio::join!(service.animals(), service.actuation_commands());

    assert_eq!(found.unwrap(), vec!["fox"]);
    assert_eq!(known.unwrap(), vec!["OPEN"]);
    assert_eq!(store.get(TokenKind::Access).as_deref(), Some("fresh"));
    refresh.assert_async().await;
    animals.assert_async().await;
    commands.assert_async().await;
    for mock in &rejected {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_refresh_after_cancelled_caller_starts_a_new_exchange() {
    setup_logger();
    let mut server = Server::new_async().await;
    let _refresh = slow_refresh_mock(&mut server, Duration::from_millis(300), 2).await;

    let store = Arc::new(MemoryTokenStore::with_session(Session::new("expired", "ref")));
    let http = WadasHttpClient::new(&RestApiConfig {
        base_url: format!("{}/", server.url()),
        timeout: 1,
    })
    .unwrap();
    let refresher = SingleFlightRefresher::new(Arc::new(HttpTokenRefresher::new(
        http,
        store.clone(),
        Duration::from_secs(1),
    )));

    let abandoned = tokio::time::timeout(Duration::from_millis(50), refresher.refresh()).await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(refresher.refresh().await, Ok("fresh".to_string()));
    assert_eq!(store.get(TokenKind::Access).as_deref(), Some("fresh"));
}

#[tokio::test(start_paused = true)]
async fn test_slow_request_times_out_as_other_failure() {
    setup_logger();
    let store = Arc::new(MemoryTokenStore::with_session(Session::new("acc", "ref")));
    let refresher: Arc<dyn TokenRefresher> = Arc::new(HttpTokenRefresher::new(
        WadasHttpClient::new(&RestApiConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            timeout: 1,
        })
        .unwrap(),
        store.clone(),
        Duration::from_secs(1),
    ));
    let client = RetryingSessionClient::new(store, refresher, Duration::from_secs(1));

    let result = client
        .execute(|_token| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, anyhow::Error>(RawResponse::new(StatusCode::OK, "late"))
        })
        .await;

    match result {
        Err(ClientError::Other(detail)) => assert!(detail.contains("timed out")),
        other => panic!("unexpected result: {other:?}"),
    }
}
