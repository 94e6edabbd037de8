use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{api::error::ApiError, state::AppState};

/// Extractor that only succeeds for requests carrying the configured
/// `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthBearer;

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthBearer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        match provided {
            Some(token) if token_matches(token, &state.cfg.auth.token) => Ok(Self),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

/// Compare without short-circuiting on the first differing byte.
fn token_matches(provided: &str, expected: &str) -> bool {
    if expected.is_empty() || provided.len() != expected.len() {
        return false;
    }
    provided
        .bytes()
        .zip(expected.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
