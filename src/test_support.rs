//! Helpers shared by the router tests.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::FromRef,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    auth::jwt::JwtKeys,
    llm::{fake::FakeLlm, LlmClient},
    state::AppState,
};

pub fn fake_state() -> AppState {
    AppState::fake(Arc::new(FakeLlm::default()))
}

pub fn state_with_llm(llm: Arc<dyn LlmClient>) -> AppState {
    AppState::fake(llm)
}

pub fn bearer(state: &AppState, user_id: Uuid) -> String {
    JwtKeys::from_ref(state)
        .sign_access(user_id)
        .expect("sign access")
}

/// Sends one request and returns the status with the body as JSON
/// (non-JSON bodies come back as a JSON string).
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => req.body(Body::empty()),
    }
    .expect("request builds");

    let res = app.oneshot(req).await.expect("router is infallible");
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}
