#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use gateway::{AppState, config::Config, create_router, services::RetryPolicy};
use tower::ServiceExt;

pub const SECRET: &str = "integration-secret";
pub const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";
pub const ANDROID: &str = "Mozilla/5.0 (Linux; Android 11)";
pub const WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0)";

pub fn state() -> AppState {
    let mut state = AppState::new(Config::development(SECRET));
    state.retry = RetryPolicy {
        base_delay: Duration::ZERO,
        ..RetryPolicy::default()
    };
    state
}

pub fn app() -> Router {
    create_router(state())
}

/// Router configured as deployed: cookies carry the `Secure` flag.
pub fn production_app() -> Router {
    let mut state = state();
    state.config.app_env = "production".to_string();
    create_router(state)
}

pub async fn send(app: Router, req: Request<Body>) -> Response<Body> {
    app.oneshot(req).await.unwrap()
}

pub fn get(path: &str, user_agent: &str, cookies: &[String]) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(path)
        .header(header::USER_AGENT, user_agent);
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies.join("; "));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(path: &str, json: serde_json::Value, cookies: &[String]) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies.join("; "));
    }
    builder.body(Body::from(json.to_string())).unwrap()
}

pub fn location(resp: &Response<Body>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

/// Raw `Set-Cookie` headers of a response.
pub fn set_cookies(resp: &Response<Body>) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// `name=value` pair to send back for the cookie `name`, if the response set one.
pub fn cookie_pair(resp: &Response<Body>, name: &str) -> Option<String> {
    set_cookies(resp)
        .into_iter()
        .filter(|c| c.starts_with(&format!("{}=", name)))
        .map(|c| c.split(';').next().unwrap().to_string())
        .find(|pair| pair.len() > name.len() + 1)
}

pub fn removes_cookie(resp: &Response<Body>, name: &str) -> bool {
    set_cookies(resp)
        .iter()
        .any(|c| c.starts_with(&format!("{}=", name)) && c.contains("Max-Age=0"))
}

pub async fn json(resp: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
