// src/api/http/auth.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult, db_error};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// `POST /api/register`: create a user and its author profile.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = non_empty(req.username).ok_or_else(|| missing("username"))?;
    let password = non_empty(req.password).ok_or_else(|| missing("password"))?;
    let email = non_empty(req.email).ok_or_else(|| missing("email"))?;

    if state
        .auth
        .username_exists(&username)
        .await
        .map_err(|e| db_error("registration", e))?
    {
        return Err(ApiError::validation("username", "Username already exists"));
    }

    state
        .auth
        .register_user(&username, &password, &email)
        .await
        .map_err(|e| db_error("registration", e))?;

    info!("Registered new user '{}'", username);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully" })),
    ))
}

/// `POST /api/token`: exchange credentials for a bearer token.
pub async fn token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TokenRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = state
        .auth
        .login(&req.username, &req.password)
        .await
        .map_err(|_| ApiError::unauthorized("Invalid credentials"))?;

    Ok(Json(response))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing(field: &str) -> ApiError {
    ApiError::validation(field, format!("{field} is required"))
}
