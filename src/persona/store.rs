// src/persona/store.rs

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use super::attributes::{ATTRIBUTE_COLUMNS, PersonaAttributes};
use super::types::PersonaWithCount;

/// Fields a caller can set on a persona. Attribute values land in the flat
/// attribute block; everything else is identity metadata.
#[derive(Debug, Clone, Default)]
pub struct PersonaInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub attributes: PersonaAttributes,
    pub is_active: Option<bool>,
}

/// CRUD over the personas table. Every operation takes the owning author id
/// explicitly; rows belonging to other authors are invisible.
pub struct PersonaStore {
    pool: SqlitePool,
}

const SELECT_WITH_COUNT: &str = "SELECT p.*, \
     (SELECT COUNT(*) FROM content_pieces c WHERE c.persona_id = p.id) AS content_count \
     FROM personas p";

impl PersonaStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, author_id: i64, input: PersonaInput) -> Result<PersonaWithCount> {
        let now = Utc::now();
        let cols = ATTRIBUTE_COLUMNS.join(", ");
        let placeholders = vec!["?"; ATTRIBUTE_COLUMNS.len()].join(", ");
        let sql = format!(
            "INSERT INTO personas (author_id, name, description, {cols}, is_active, created_at, updated_at) \
             VALUES (?, ?, ?, {placeholders}, ?, ?, ?)"
        );

        let query = sqlx::query(&sql)
            .bind(author_id)
            .bind(&input.name)
            .bind(&input.description);
        let query = input.attributes.bind_all(query);
        let result = query
            .bind(input.is_active.unwrap_or(true))
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        self.get(author_id, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Persona {} vanished after insert", id))
    }

    pub async fn get(&self, author_id: i64, id: i64) -> Result<Option<PersonaWithCount>> {
        let sql = format!("{SELECT_WITH_COUNT} WHERE p.id = ? AND p.author_id = ?");
        let persona = sqlx::query_as::<_, PersonaWithCount>(&sql)
            .bind(id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(persona)
    }

    pub async fn list(&self, author_id: i64) -> Result<Vec<PersonaWithCount>> {
        let sql = format!("{SELECT_WITH_COUNT} WHERE p.author_id = ? ORDER BY p.created_at DESC");
        let personas = sqlx::query_as::<_, PersonaWithCount>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(personas)
    }

    /// Full update of an owned persona. Returns `None` when the persona does
    /// not exist or belongs to another author.
    pub async fn update(
        &self,
        author_id: i64,
        id: i64,
        input: PersonaInput,
    ) -> Result<Option<PersonaWithCount>> {
        let Some(existing) = self.get(author_id, id).await? else {
            return Ok(None);
        };

        let mut persona = existing.persona;
        if input.name.is_some() {
            persona.name = input.name;
        }
        if input.description.is_some() {
            persona.description = input.description;
        }
        if input.is_active.is_some() {
            persona.is_active = input.is_active;
        }
        persona.attributes.merge(input.attributes);
        persona.updated_at = Utc::now();

        let sets = ATTRIBUTE_COLUMNS
            .iter()
            .map(|c| format!("{c} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE personas SET name = ?, description = ?, {sets}, is_active = ?, updated_at = ? \
             WHERE id = ? AND author_id = ?"
        );

        let query = sqlx::query(&sql)
            .bind(&persona.name)
            .bind(&persona.description);
        let query = persona.attributes.bind_all(query);
        query
            .bind(persona.is_active)
            .bind(persona.updated_at)
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        self.get(author_id, id).await
    }

    pub async fn delete(&self, author_id: i64, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM personas WHERE id = ? AND author_id = ?")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
