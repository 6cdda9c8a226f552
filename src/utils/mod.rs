use axum::Json;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::result::ApiResponse;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: String,
    pub role: String,
    pub iat: i64,
    /// Expiry in seconds since the epoch. Tokens without it never verify.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default)]
    pub jti: String,
}

/// Single outcome for every way a session token can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSession;

pub fn generate_token(
    user_id: &str,
    role: &str,
    config: &Config,
) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let expiration = now + config.jwt_expiration().as_secs() as i64;

    let claims = Claims {
        user_id: user_id.to_string(),
        role: role.to_string(),
        iat: now,
        exp: Some(expiration),
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    tracing::debug!("Issued session token for {}", user_id);
    Ok((token, expiration))
}

pub fn verify_session_token(token: &str, secret: &str) -> Result<Claims, InvalidSession> {
    verify_session_token_at(token, secret, Utc::now().timestamp_millis())
}

/// Verify `token` as of `now_ms` (milliseconds since the epoch).
pub fn verify_session_token_at(
    token: &str,
    secret: &str,
    now_ms: i64,
) -> Result<Claims, InvalidSession> {
    // Expiry is checked below against `now_ms`, with no leeway.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Session token rejected: {}", e);
            InvalidSession
        })?;

    match claims.exp {
        Some(exp) if now_ms < exp.saturating_mul(1000) => Ok(claims),
        _ => {
            tracing::debug!("Session token for {} expired or without exp", claims.user_id);
            Err(InvalidSession)
        }
    }
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: error_codes::SUCCESS,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const AUTH_FAILED: i32 = 1002;
    pub const NOT_FOUND: i32 = 1004;
    pub const SERVICE_UNAVAILABLE: i32 = 1006;
    pub const INTERNAL_ERROR: i32 = 5000;
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp: Option<i64>) -> Claims {
        Claims {
            user_id: "0xabc".into(),
            role: "player".into(),
            iat: 1_700_000_000,
            exp,
            jti: "j".into(),
        }
    }

    #[test]
    fn accepts_signed_unexpired_token() {
        let token = sign(&claims(Some(1_700_000_100)), SECRET);
        let verified = verify_session_token_at(&token, SECRET, 1_700_000_099_999).unwrap();
        assert_eq!(verified, claims(Some(1_700_000_100)));
    }

    #[test]
    fn expiry_is_inclusive_in_milliseconds() {
        let token = sign(&claims(Some(1_700_000_100)), SECRET);
        assert_eq!(
            verify_session_token_at(&token, SECRET, 1_700_000_100_000),
            Err(InvalidSession)
        );
    }

    #[test]
    fn expired_token_is_invalid_even_when_signed_correctly() {
        let token = sign(&claims(Some(1_600_000_000)), SECRET);
        assert_eq!(verify_session_token(&token, SECRET), Err(InvalidSession));
    }

    #[test]
    fn token_without_exp_is_invalid() {
        let token = sign(&claims(None), SECRET);
        assert_eq!(verify_session_token_at(&token, SECRET, 0), Err(InvalidSession));
    }

    #[test]
    fn wrong_secret_and_garbage_are_invalid() {
        let token = sign(&claims(Some(i64::MAX / 1000)), SECRET);
        assert_eq!(verify_session_token(&token, "other"), Err(InvalidSession));
        assert_eq!(verify_session_token("not.a.jwt", SECRET), Err(InvalidSession));
        assert_eq!(verify_session_token("", SECRET), Err(InvalidSession));
    }

    #[test]
    fn generated_token_round_trips_through_the_gate() {
        let config = Config::development(SECRET);
        let (token, exp) = generate_token("0xabc", "player", &config).unwrap();
        let verified = verify_session_token(&token, SECRET).unwrap();
        assert_eq!(verified.user_id, "0xabc");
        assert_eq!(verified.role, "player");
        assert_eq!(verified.exp, Some(exp));
    }
}
