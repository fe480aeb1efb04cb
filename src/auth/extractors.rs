use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::services::JwtKeys;
use crate::error::ApiError;

/// Extracts and validates the bearer token, returning the user ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .filter(|h| !h.trim().is_empty())
            .ok_or(ApiError::MissingToken)?;

        // Expect "Bearer <token>"; a bare token is accepted as well
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .unwrap_or(auth)
            .trim_start();

        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid token");
            ApiError::InvalidToken(e.to_string())
        })?;

        Ok(AuthUser(claims.id))
    }
}
