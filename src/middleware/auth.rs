use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{
    extract::cookie::{Cookie, CookieJar},
    headers::{Authorization, HeaderMapExt, authorization::Bearer},
};

use crate::{
    AppState,
    device::{DeviceClass, strip_device_prefix},
    error::AppError,
    utils::{Claims, InvalidSession, verify_session_token},
};

pub const AUTH_PAGE: &str = "/auth";

/// Session token from the auth cookie, falling back to a bearer header.
fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .typed_get::<Authorization<Bearer>>()
                .map(|auth| auth.token().to_string())
        })
}

fn check_session(headers: &HeaderMap, state: &AppState) -> Result<Claims, InvalidSession> {
    let token = session_token(headers, &state.config.auth_cookie_name).ok_or(InvalidSession)?;
    verify_session_token(&token, &state.config.jwt_secret)
}

/// Gate for API routes: 401 unless the request carries a valid session.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = check_session(req.headers(), &state).map_err(|_| AppError::Unauthorized)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// First path segment after the device prefix, e.g. `wallet` for `/m/wallet/deposit`.
fn section(path: &str) -> &str {
    strip_device_prefix(path)
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
}

pub fn auth_redirect_target(device: DeviceClass, from: &str) -> String {
    format!(
        "{}{}?from={}",
        device.prefix(),
        AUTH_PAGE,
        from.replace('%', "%25").replace('&', "%26").replace('+', "%2B")
    )
}

/// Gate for device-prefixed pages: protected sections redirect to the auth page.
pub async fn page_auth(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let Some(device) = DeviceClass::from_path(&path) else {
        return next.run(req).await;
    };
    if !state.config.protected_sections.iter().any(|s| s == section(&path)) {
        return next.run(req).await;
    }

    match check_session(req.headers(), &state) {
        Ok(claims) => {
            let mut req = req;
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(InvalidSession) => {
            let from = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or(&path);
            let target = auth_redirect_target(device, from);
            tracing::info!("Unauthenticated request for {}, redirecting to {}", path, target);
            let jar = CookieJar::from_headers(req.headers());
            let jar = if jar.get(&state.config.auth_cookie_name).is_some() {
                jar.remove(Cookie::build((state.config.auth_cookie_name.clone(), "")).path("/"))
            } else {
                jar
            };
            (jar, Redirect::temporary(&target)).into_response()
        }
    }
}
