use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    middleware::{auth_middleware, device_routing, log_errors, page_auth},
    routes::{auth, page, wallet},
};

fn public_api() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/wallet/connect", post(wallet::connect))
        .route("/wallet/session", get(wallet::session))
        .route("/wallet/validate", post(wallet::validate))
        .route("/wallet/disconnect", post(wallet::disconnect))
}

fn protected_api(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/session", get(auth::session))
        .route("/wallet/refresh", post(wallet::refresh))
        .layer(from_fn_with_state(state.clone(), auth_middleware))
}

fn pages(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/m", get(page::render))
        .route("/m/{*page}", get(page::render))
        .route("/d", get(page::render))
        .route("/d/{*page}", get(page::render))
        .layer(from_fn_with_state(state.clone(), page_auth))
}

/// Full application: device routing wraps everything, including the fallback,
/// so unprefixed page paths are redirected before they can 404.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(page::health))
        .nest(
            &state.config.api_base_uri,
            public_api().merge(protected_api(&state)),
        )
        .merge(pages(&state))
        .fallback(page::not_found)
        .layer(from_fn_with_state(state.clone(), device_routing))
        .layer(from_fn(log_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
