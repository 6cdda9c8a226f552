use axum::{
    extract::{Extension, Json, State},
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

use crate::{
    AppState,
    error::AppError,
    services::{Balances, RequestKind},
    utils::{Claims, success_to_api_response},
    wallet::{CookieStorage, WalletSession, WalletSessionStore, is_valid_address},
};

use super::model::{ConnectRequest, ValidateRequest, ValidateResponse};

fn store(state: &AppState, jar: CookieJar) -> WalletSessionStore<CookieStorage> {
    WalletSessionStore::new(CookieStorage::new(jar, state.config.secure_cookies()))
}

async fn fetch_balances(
    state: &AppState,
    kind: RequestKind,
    address: &str,
    chain_id: u64,
) -> Result<Balances, AppError> {
    let provider = state.balances.clone();
    state
        .retry
        .run(kind, || {
            let provider = provider.clone();
            let address = address.to_string();
            async move { provider.balances(&address, chain_id).await }
        })
        .await
        .map_err(|e| AppError::ServiceUnavailable(format!("balance lookup failed: {}", e)))
}

#[axum::debug_handler]
pub async fn connect(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<ConnectRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !is_valid_address(&req.address) {
        return Err(AppError::Validation("invalid wallet address".to_string()));
    }

    // Connecting creates the session, so the lookup follows the mutation retry budget.
    let balances =
        fetch_balances(&state, RequestKind::Mutation, &req.address, req.chain_id).await?;

    let mut session = WalletSession::new(
        &req.address,
        req.chain_id,
        &req.connector,
        Utc::now().timestamp_millis(),
    );
    session.matic_balance = balances.matic_balance;
    session.usdt_balance = balances.usdt_balance;

    let mut store = store(&state, jar);
    let session = store.save(session).map_err(|e| {
        tracing::error!("Failed to serialise wallet session: {}", e);
        AppError::InternalServerError
    })?;
    tracing::info!("Wallet {} connected via {}", session.address, session.connector);

    Ok((store.into_storage().into_jar(), success_to_api_response(session)))
}

/// Current wallet session, or `null`. Unreadable or stale cookies are removed.
#[axum::debug_handler]
pub async fn session(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let mut store = store(&state, jar);
    let session = store.load();
    (store.into_storage().into_jar(), success_to_api_response(session))
}

#[axum::debug_handler]
pub async fn validate(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<ValidateRequest>,
) -> impl IntoResponse {
    let mut store = store(&state, jar);
    let valid = store.validate(req.address.as_deref(), req.chain_id);
    (
        store.into_storage().into_jar(),
        success_to_api_response(ValidateResponse { valid }),
    )
}

/// Errors keep the jar so a corrupt or stale wallet cookie is still removed.
#[axum::debug_handler]
pub async fn refresh(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    jar: CookieJar,
) -> Result<impl IntoResponse, (CookieJar, AppError)> {
    let mut store = store(&state, jar);
    let Some(current) = store.load() else {
        return Err((
            store.into_storage().into_jar(),
            AppError::Validation("no wallet connected".to_string()),
        ));
    };
    if !current.matches_address(&claims.user_id) {
        tracing::warn!("Session {} tried to refresh wallet {}", claims.user_id, current.address);
        return Err((store.into_storage().into_jar(), AppError::Unauthorized));
    }

    let balances =
        match fetch_balances(&state, RequestKind::Query, &current.address, current.chain_id).await
        {
            Ok(balances) => balances,
            Err(e) => return Err((store.into_storage().into_jar(), e)),
        };
    let Some(session) = store.update_balances(&balances.matic_balance, &balances.usdt_balance)
    else {
        return Err((store.into_storage().into_jar(), AppError::InternalServerError));
    };

    Ok((store.into_storage().into_jar(), success_to_api_response(session)))
}

#[axum::debug_handler]
pub async fn disconnect(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let mut store = store(&state, jar);
    store.clear();
    (store.into_storage().into_jar(), success_to_api_response(()))
}
