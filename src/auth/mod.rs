// src/auth/mod.rs

pub mod jwt;
pub mod password;
pub mod service;

pub use jwt::{Claims, create_token, verify_token};
pub use password::{hash_password, verify_password};
pub use service::{AuthResponse, AuthService, User};

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::state::AppState;

/// Authenticated caller identity, resolved from the bearer token. Carries
/// the author id so every store call is explicitly scoped to the caller;
/// handlers never derive ownership from request data.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub author_id: i64,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Expected a bearer token"))?;

        let claims = verify_token(token, &state.config.jwt_secret)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        let author_id = state
            .auth
            .author_id_for_user(&claims.sub)
            .await
            .map_err(|e| {
                tracing::error!("Failed to resolve author for user {}: {}", claims.sub, e);
                ApiError::internal("Failed to resolve account")
            })?
            .ok_or_else(|| ApiError::unauthorized("Unknown or disabled account"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            username: claims.username,
            author_id,
        })
    }
}
