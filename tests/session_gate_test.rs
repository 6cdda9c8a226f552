mod common;

use axum::http::{StatusCode, header};
use common::*;
use gateway::utils::Claims;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

async fn login_cookie() -> String {
    let resp = send(app(), post_json("/api/auth/login", json!({ "address": ADDRESS }), &[])).await;
    assert_eq!(resp.status(), StatusCode::OK);
    cookie_pair(&resp, "auth-token").expect("login sets the auth cookie")
}

fn expired_token() -> String {
    let claims = Claims {
        user_id: ADDRESS.to_lowercase(),
        role: "player".into(),
        iat: 1_600_000_000,
        exp: Some(1_600_000_100),
        jti: "expired".into(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

#[tokio::test]
async fn login_sets_http_only_cookie() {
    let resp = send(app(), post_json("/api/auth/login", json!({ "address": ADDRESS }), &[])).await;
    let auth = set_cookies(&resp)
        .into_iter()
        .find(|c| c.starts_with("auth-token="))
        .unwrap();
    assert!(auth.contains("HttpOnly"));
    assert!(auth.contains("SameSite=Lax"));

    let body = json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["resp_data"]["user_id"], ADDRESS.to_lowercase());
    assert_eq!(body["resp_data"]["role"], "player");
}

#[tokio::test]
async fn login_rejects_malformed_address() {
    let resp = send(app(), post_json("/api/auth/login", json!({ "address": "nope" }), &[])).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json(resp).await["code"], 1000);
}

#[tokio::test]
async fn session_endpoint_requires_token() {
    let resp = send(app(), get("/api/auth/session", WINDOWS, &[])).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(resp).await["code"], 1002);

    let cookie = login_cookie().await;
    let resp = send(app(), get("/api/auth/session", WINDOWS, &[cookie])).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp).await["resp_data"]["user_id"], ADDRESS.to_lowercase());
}

#[tokio::test]
async fn bearer_token_is_accepted_by_api() {
    let cookie = login_cookie().await;
    let token = cookie.trim_start_matches("auth-token=").to_string();
    let req = axum::http::Request::builder()
        .uri("/api/auth/session")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = send(app(), req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_token_is_rejected_by_api() {
    let cookie = format!("auth-token={}", expired_token());
    let resp = send(app(), get("/api/auth/session", WINDOWS, &[cookie])).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_page_redirects_to_auth() {
    let resp = send(app(), get("/m/wallet", ANDROID, &[])).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/m/auth?from=/m/wallet");
}

#[tokio::test]
async fn auth_redirect_keeps_query() {
    let resp = send(app(), get("/m/wallet?tab=deposit", ANDROID, &[])).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/m/auth?from=/m/wallet?tab=deposit");
}

#[tokio::test]
async fn auth_cookie_is_secure_outside_development() {
    let resp = send(
        production_app(),
        post_json("/api/auth/login", json!({ "address": ADDRESS }), &[]),
    )
    .await;
    let auth = set_cookies(&resp)
        .into_iter()
        .find(|c| c.starts_with("auth-token="))
        .unwrap();
    assert!(auth.contains("; Secure"));

    let resp = send(app(), post_json("/api/auth/login", json!({ "address": ADDRESS }), &[])).await;
    let auth = set_cookies(&resp)
        .into_iter()
        .find(|c| c.starts_with("auth-token="))
        .unwrap();
    assert!(!auth.contains("; Secure"));
}

#[tokio::test]
async fn protected_page_with_expired_cookie_redirects_and_drops_cookie() {
    let cookie = format!("auth-token={}", expired_token());
    let resp = send(app(), get("/d/history", WINDOWS, &[cookie])).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/d/auth?from=/d/history");
    assert!(removes_cookie(&resp, "auth-token"));
}

#[tokio::test]
async fn protected_page_with_forged_cookie_redirects() {
    let claims = Claims {
        user_id: "mallory".into(),
        role: "admin".into(),
        iat: 0,
        exp: Some(i64::MAX / 1000),
        jti: String::new(),
    };
    let forged = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"guess")).unwrap();
    let resp = send(app(), get("/d/profile", WINDOWS, &[format!("auth-token={}", forged)])).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn protected_page_with_valid_cookie_is_served() {
    let cookie = login_cookie().await;
    let resp = send(app(), get("/m/wallet/deposit", ANDROID, &[cookie])).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_removes_cookies() {
    let cookie = login_cookie().await;
    let resp = send(app(), post_json("/api/auth/logout", json!({}), &[cookie])).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(removes_cookie(&resp, "auth-token"));
}
