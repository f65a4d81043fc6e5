// src/api/http/content.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult, db_error};
use crate::auth::AuthUser;
use crate::content::{ContentStatus, ContentUpdate, NewContent};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub persona_id: Option<i64>,
    pub status: Option<ContentStatus>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub persona_id: Option<i64>,
    pub status: Option<ContentStatus>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<DateTime<Utc>>,
}

pub async fn list_content(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let pieces = state
        .content
        .list(user.author_id)
        .await
        .map_err(|e| db_error("content list", e))?;
    Ok(Json(pieces))
}

pub async fn create_content(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateContentRequest>,
) -> ApiResult<impl IntoResponse> {
    if let Some(persona_id) = req.persona_id {
        require_owned_persona(&state, &user, persona_id).await?;
    }

    let piece = state
        .content
        .create(
            user.author_id,
            NewContent {
                persona_id: req.persona_id,
                title: req.title,
                content: req.content,
                status: req.status.unwrap_or_default(),
                tags: req.tags.unwrap_or_default(),
                published_at: req.published_at,
            },
        )
        .await
        .map_err(|e| db_error("content create", e))?;

    Ok((StatusCode::CREATED, Json(piece)))
}

pub async fn get_content(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let piece = state
        .content
        .get(user.author_id, id)
        .await
        .map_err(|e| db_error("content fetch", e))?
        .ok_or_else(|| ApiError::not_found("Content piece not found"))?;
    Ok(Json(piece))
}

pub async fn update_content(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateContentRequest>,
) -> ApiResult<impl IntoResponse> {
    if let Some(persona_id) = req.persona_id {
        require_owned_persona(&state, &user, persona_id).await?;
    }

    let piece = state
        .content
        .update(
            user.author_id,
            id,
            ContentUpdate {
                persona_id: req.persona_id.map(Some),
                title: req.title,
                content: req.content,
                status: req.status,
                tags: req.tags,
                published_at: req.published_at.map(Some),
            },
        )
        .await
        .map_err(|e| db_error("content update", e))?
        .ok_or_else(|| ApiError::not_found("Content piece not found"))?;
    Ok(Json(piece))
}

pub async fn delete_content(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .content
        .delete(user.author_id, id)
        .await
        .map_err(|e| db_error("content delete", e))?;

    if !deleted {
        return Err(ApiError::not_found("Content piece not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// A referenced persona must exist and belong to the caller.
async fn require_owned_persona(
    state: &Arc<AppState>,
    user: &AuthUser,
    persona_id: i64,
) -> ApiResult<()> {
    state
        .personas
        .get(user.author_id, persona_id)
        .await
        .map_err(|e| db_error("persona fetch", e))?
        .ok_or_else(|| ApiError::validation("persona_id", "Persona not found"))?;
    Ok(())
}
