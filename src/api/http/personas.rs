// src/api/http/personas.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult, db_error};
use crate::auth::AuthUser;
use crate::content::{ContentStatus, NewContent};
use crate::llm::{analyze_writing_sample, generate_content};
use crate::persona::{PersonaAttributes, PersonaInput};
use crate::state::AppState;

/// Body accepted by persona create and update. `writing_sample` only has an
/// effect on create, where it triggers analysis before the row is written.
#[derive(Debug, Deserialize)]
pub struct PersonaPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub attributes: PersonaAttributes,
    pub writing_sample: Option<String>,
}

impl PersonaPayload {
    fn into_input(self) -> (PersonaInput, Option<String>) {
        let sample = self
            .writing_sample
            .filter(|sample| !sample.trim().is_empty());
        let input = PersonaInput {
            name: self.name,
            description: self.description,
            attributes: self.attributes,
            is_active: self.is_active,
        };
        (input, sample)
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentRequest {
    pub prompt: Option<String>,
}

pub async fn list_personas(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let personas = state
        .personas
        .list(user.author_id)
        .await
        .map_err(|e| db_error("persona list", e))?;
    Ok(Json(personas))
}

pub async fn create_persona(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<PersonaPayload>,
) -> ApiResult<impl IntoResponse> {
    let (mut input, writing_sample) = payload.into_input();

    if let Some(sample) = writing_sample {
        let profile =
            analyze_writing_sample(&state.llm, &state.config.analysis_debug_path, &sample)
                .await
                .map_err(|e| {
                    warn!("Writing sample analysis failed: {}", e);
                    ApiError::validation("writing_sample", "Failed to analyze the writing sample")
                })?;

        // Analysis results win over client-supplied values.
        input.attributes.merge(profile.attributes);
        if profile.name.is_some() {
            input.name = profile.name;
        }
    }

    let persona = state
        .personas
        .create(user.author_id, input)
        .await
        .map_err(|e| db_error("persona create", e))?;

    info!(
        "Created persona {} for author {}",
        persona.persona.id, user.author_id
    );
    Ok((StatusCode::CREATED, Json(persona)))
}

pub async fn get_persona(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let persona = state
        .personas
        .get(user.author_id, id)
        .await
        .map_err(|e| db_error("persona fetch", e))?
        .ok_or_else(|| ApiError::not_found("Persona not found"))?;
    Ok(Json(persona))
}

pub async fn update_persona(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<PersonaPayload>,
) -> ApiResult<impl IntoResponse> {
    let (input, _) = payload.into_input();

    let persona = state
        .personas
        .update(user.author_id, id, input)
        .await
        .map_err(|e| db_error("persona update", e))?
        .ok_or_else(|| ApiError::not_found("Persona not found"))?;
    Ok(Json(persona))
}

pub async fn delete_persona(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .personas
        .delete(user.author_id, id)
        .await
        .map_err(|e| db_error("persona delete", e))?;

    if !deleted {
        return Err(ApiError::not_found("Persona not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/personas/{id}/generate-content`: generate a draft content
/// piece from a persona and a topic prompt.
pub async fn generate_persona_content(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<GenerateContentRequest>,
) -> ApiResult<impl IntoResponse> {
    let persona = state
        .personas
        .get(user.author_id, id)
        .await
        .map_err(|e| db_error("persona fetch", e))?
        .ok_or_else(|| ApiError::not_found("Persona not found"))?;

    let prompt = req
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::validation("prompt", "Prompt is required"))?;

    let generated = generate_content(&state.llm, &persona.persona, &prompt).await;
    if generated.is_empty() {
        return Err(ApiError::internal("Failed to generate content"));
    }

    let (title, body) = split_title_body(&generated);
    let piece = state
        .content
        .create(
            user.author_id,
            NewContent {
                persona_id: Some(id),
                title: Some(title),
                content: Some(body),
                status: ContentStatus::Draft,
                ..Default::default()
            },
        )
        .await
        .map_err(|e| db_error("content create", e))?;

    info!(
        "Generated content piece {} from persona {}",
        piece.id, id
    );
    Ok((StatusCode::CREATED, Json(piece)))
}

/// Split generated text into title and body. The first line is the title
/// (with a leading `Title:` label and surrounding quotes stripped); the rest
/// is the body. Single-line output with no label is all body under a
/// placeholder title.
pub fn split_title_body(generated: &str) -> (String, String) {
    let trimmed = generated.trim();
    let (first, rest) = match trimmed.split_once('\n') {
        Some((first, rest)) => (first, Some(rest)),
        None => (trimmed, None),
    };

    let labeled = first.trim_start().starts_with("Title:");
    if rest.is_none() && !labeled {
        return ("Untitled".to_string(), trimmed.to_string());
    }

    let first = first.trim();
    let title = first
        .strip_prefix("Title:")
        .unwrap_or(first)
        .trim()
        .trim_matches('"')
        .trim();
    let title = if title.is_empty() {
        "Untitled".to_string()
    } else {
        title.to_string()
    };

    (title, rest.unwrap_or("").to_string())
}
