use axum::{
    extract::{Extension, Json, State},
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    AppState,
    error::AppError,
    utils::{Claims, generate_token, success_to_api_response},
    wallet::{CookieStorage, WalletSessionStore, is_valid_address},
};

use super::model::{LoginRequest, LoginResponse};

const PLAYER_ROLE: &str = "player";

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !is_valid_address(&req.address) {
        return Err(AppError::Validation("invalid wallet address".to_string()));
    }

    let user_id = req.address.to_ascii_lowercase();
    let (token, expires_at) =
        generate_token(&user_id, PLAYER_ROLE, &state.config).map_err(|e| {
            tracing::error!("Failed to sign session token: {}", e);
            AppError::InternalServerError
        })?;

    let cookie = Cookie::build((state.config.auth_cookie_name.clone(), token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies())
        .max_age(time::Duration::seconds(state.config.jwt_expiration_secs as i64));

    tracing::info!("Wallet {} signed in", user_id);
    Ok((
        jar.add(cookie),
        success_to_api_response(LoginResponse {
            user_id,
            role: PLAYER_ROLE.to_string(),
            token,
            expires_at,
        }),
    ))
}

/// Drops the auth cookie and the wallet session.
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build((state.config.auth_cookie_name.clone(), "")).path("/"));
    let mut store = WalletSessionStore::new(CookieStorage::new(jar, state.config.secure_cookies()));
    store.clear();
    (store.into_storage().into_jar(), success_to_api_response(()))
}

#[axum::debug_handler]
pub async fn session(Extension(claims): Extension<Claims>) -> impl IntoResponse {
    success_to_api_response(claims)
}
