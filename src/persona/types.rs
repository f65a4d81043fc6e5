// src/persona/types.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::attributes::PersonaAttributes;

/// A named bundle of writing-style, personality, and demographic attributes
/// used to condition generated text. Owned by exactly one author.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Persona {
    pub id: i64,
    #[serde(skip)]
    pub author_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub attributes: PersonaAttributes,
    pub is_active: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persona plus the number of content pieces generated from it. This is the
/// shape every persona endpoint returns.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PersonaWithCount {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub persona: Persona,
    pub content_count: i64,
}
