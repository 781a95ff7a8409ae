//! HTTP client tests against an in-process API server

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::RawQuery;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use gateway::{
    ApiRequest, AuthGate, ClientConfig, GatewayError, History, HttpClient, Route, TransportCode,
};
use platform::notify::RecordingNotifier;
use serde_json::{Value, json};

async fn echo_query(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({"code": 200, "msg": "ok", "data": {"query": query.unwrap_or_default()}}))
}

async fn echo_body(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({"code": 200, "data": {"body": body, "content_type": content_type}}))
}

async fn app_failure() -> Json<Value> {
    Json(json!({"code": 500, "msg": "article not found"}))
}

async fn not_json() -> &'static str {
    "<html>maintenance</html>"
}

async fn server_crash() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({"code": 404})))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({"code": 200}))
}

async fn login() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, "SESSION_ID=abc123; Path=/")],
        Json(json!({"code": 200, "msg": "welcome"})),
    )
}

async fn whoami(headers: HeaderMap) -> Json<Value> {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({"code": 200, "data": cookie}))
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/api/echo", get(echo_query))
        .route("/api/article", post(echo_body))
        .route("/api/fail", get(app_failure))
        .route("/api/text", get(not_json))
        .route("/api/crash", get(server_crash))
        .route("/api/missing", get(missing))
        .route("/api/slow", get(slow))
        .route("/api/login", post(login))
        .route("/api/whoami", get(whoami));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config_for(addr: SocketAddr) -> ClientConfig {
    ClientConfig::with_base_url(&format!("http://{addr}/api")).unwrap()
}

fn client_for(config: ClientConfig) -> (HttpClient, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let client = HttpClient::new(config, notifier.clone()).unwrap();
    (client, notifier)
}

/// Wait past the debounce window
async fn settle() {
    tokio::time::sleep(Duration::from_millis(400)).await;
}

#[tokio::test]
async fn test_query_params_are_sanitized() {
    let addr = spawn_server().await;
    let (client, notifier) = client_for(config_for(addr));

    let body = client
        .get(
            "/echo",
            json!({"page": 1, "tag": "", "keyword": "rust", "author": null, "ids": [3, 4], "range": {}}),
        )
        .await
        .unwrap();

    let query = body.data["query"].as_str().unwrap().to_string();
    let pairs: HashSet<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let expected: HashSet<(String, String)> = [
        ("page", "1"),
        ("keyword", "rust"),
        ("ids[]", "3"),
        ("ids[]", "4"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(pairs, expected);
    assert!(!query.contains("tag"));

    settle().await;
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn test_json_body_and_content_type() {
    let addr = spawn_server().await;
    let (client, _notifier) = client_for(config_for(addr));

    let body = client
        .post("article", json!({"title": "Hello", "summary": ""}))
        .await
        .unwrap();

    assert!(body.is_success(200));
    assert_eq!(body.data["body"], json!({"title": "Hello", "summary": ""}));
    assert_eq!(body.data["content_type"], "application/json");
}

#[tokio::test]
async fn test_application_error_notifies_but_resolves() {
    let addr = spawn_server().await;
    let (client, notifier) = client_for(config_for(addr));

    let body = client.get("/fail", json!({})).await.unwrap();
    assert_eq!(body.code, Some(500));
    assert_eq!(body.msg.as_deref(), Some("article not found"));

    settle().await;
    assert_eq!(notifier.messages(), vec!["article not found".to_string()]);

    assert!(matches!(
        body.into_result(200),
        Err(GatewayError::Application { code: Some(500), .. })
    ));
}

#[tokio::test]
async fn test_parallel_failures_produce_one_notice() {
    let addr = spawn_server().await;
    let (client, notifier) = client_for(config_for(addr));

    let (a, b, c) = tokio::join!(
        client.get("/text", json!({})),
        client.get("/text", json!({})),
        client.get("/fail", json!({})),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(a.unwrap().data, json!("<html>maintenance</html>"));

    settle().await;
    assert_eq!(notifier.notices().len(), 1);
}

#[tokio::test]
async fn test_http_status_failure_rejects() {
    let addr = spawn_server().await;
    let (client, notifier) = client_for(config_for(addr));

    let err = client.get("/crash", json!({})).await.unwrap_err();
    assert_eq!(err.transport_code(), Some(TransportCode::BadResponse));

    let err = client.get("/missing", json!({})).await.unwrap_err();
    assert_eq!(err.transport_code(), Some(TransportCode::BadRequest));
    assert_eq!(err.to_app_error().status_code(), 404);

    settle().await;
    assert_eq!(
        notifier.messages().last().map(String::as_str),
        Some("server error: ERR_BAD_REQUEST")
    );
}

#[tokio::test]
async fn test_timeout_rejects() {
    let addr = spawn_server().await;
    let mut config = config_for(addr);
    config.timeout = Duration::from_millis(200);
    let (client, notifier) = client_for(config);

    let err = client.get("/slow", json!({})).await.unwrap_err();
    assert_eq!(err.transport_code(), Some(TransportCode::Timeout));

    settle().await;
    assert_eq!(
        notifier.messages(),
        vec!["server error: ECONNABORTED".to_string()]
    );
}

#[tokio::test]
async fn test_network_error_rejects() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (client, notifier) = client_for(config_for(addr));
    let err = client.get("/echo", json!({})).await.unwrap_err();
    assert_eq!(err.transport_code(), Some(TransportCode::Network));

    settle().await;
    assert_eq!(
        notifier.messages(),
        vec!["server error: ERR_NETWORK".to_string()]
    );
}

#[tokio::test]
async fn test_session_cookie_flows_into_auth_gate() {
    let addr = spawn_server().await;
    let config = config_for(addr);
    let cookie_name = config.session_cookie_name.clone();
    let (client, notifier) = client_for(config);

    let history = Arc::new(History::new(Route::Tools));
    let gate = AuthGate::new(
        Arc::new(client.jar().clone()),
        notifier.clone(),
        history.clone(),
        cookie_name,
    );

    assert!(!gate.check_logined());
    assert!(!gate.check_auth());
    assert_eq!(history.current(), Route::Home);

    client.post("/login", json!({"name": "june"})).await.unwrap();
    assert!(gate.check_logined());
    assert!(gate.check_auth());

    let body = client.send(ApiRequest::get("/whoami")).await.unwrap();
    assert_eq!(body.data, json!("SESSION_ID=abc123"));
}
