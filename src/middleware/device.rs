use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::headers::{HeaderMapExt, UserAgent};

use crate::{
    AppState,
    device::{DeviceClass, classify, rewrite},
};

const STATIC_PREFIXES: [&str; 3] = ["/_next/", "/static/", "/assets/"];

/// Paths the front-end serves without a device prefix.
pub fn skips_device_routing(path: &str, api_base_uri: &str) -> bool {
    if path == "/health" || path == "/favicon.ico" {
        return true;
    }
    if let Some(rest) = path.strip_prefix(api_base_uri) {
        if rest.is_empty() || rest.starts_with('/') {
            return true;
        }
    }
    if STATIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }
    // files such as /robots.txt or /images/logo.png
    path.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

pub async fn device_routing(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if skips_device_routing(&path, &state.config.api_base_uri) {
        return next.run(req).await;
    }

    let user_agent = req.headers().typed_get::<UserAgent>();
    let device = classify(user_agent.as_ref().map(UserAgent::as_str).unwrap_or_default());
    let target = rewrite(&path, device);

    if target == path {
        req.extensions_mut().insert::<DeviceClass>(device);
        return next.run(req).await;
    }

    let location = match req.uri().query() {
        Some(query) => format!("{}?{}", target, query),
        None => target,
    };
    tracing::debug!("{:?} request for {} redirected to {}", device, path, location);
    Redirect::temporary(&location).into_response()
}
