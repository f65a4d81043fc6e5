// src/content/store.rs

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use super::types::{ContentPiece, ContentStatus, word_count};

/// Fields accepted when creating a content piece. `word_count` is never part
/// of the input; it is derived from `content` on every save.
#[derive(Debug, Clone, Default)]
pub struct NewContent {
    pub persona_id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: ContentStatus,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Partial update of a content piece; absent fields keep their values.
#[derive(Debug, Clone, Default)]
pub struct ContentUpdate {
    pub persona_id: Option<Option<i64>>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<ContentStatus>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<Option<DateTime<Utc>>>,
}

/// CRUD over content pieces, scoped to the owning author.
pub struct ContentStore {
    pool: SqlitePool,
}

const SELECT_CONTENT: &str = "SELECT c.*, p.name AS persona_name \
     FROM content_pieces c LEFT JOIN personas p ON p.id = c.persona_id";

impl ContentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, author_id: i64, input: NewContent) -> Result<ContentPiece> {
        let now = Utc::now();
        let count = word_count(input.content.as_deref().unwrap_or(""));
        let tags_json = serde_json::to_string(&input.tags)?;

        let result = sqlx::query(
            r#"
            INSERT INTO content_pieces
                (author_id, persona_id, title, content, status, tags, word_count,
                 created_at, updated_at, published_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(author_id)
        .bind(input.persona_id)
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.status.to_string())
        .bind(&tags_json)
        .bind(count)
        .bind(now)
        .bind(now)
        .bind(input.published_at)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(author_id, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Content piece {} vanished after insert", id))
    }

    pub async fn get(&self, author_id: i64, id: i64) -> Result<Option<ContentPiece>> {
        let sql = format!("{SELECT_CONTENT} WHERE c.id = ? AND c.author_id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_content(row)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, author_id: i64) -> Result<Vec<ContentPiece>> {
        let sql = format!("{SELECT_CONTENT} WHERE c.author_id = ? ORDER BY c.created_at DESC");
        let rows = sqlx::query(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(row_to_content).collect()
    }

    /// Apply an update to an owned content piece, recomputing `word_count`
    /// from the resulting content. Returns `None` when the piece does not
    /// exist or belongs to another author.
    pub async fn update(
        &self,
        author_id: i64,
        id: i64,
        update: ContentUpdate,
    ) -> Result<Option<ContentPiece>> {
        let Some(mut piece) = self.get(author_id, id).await? else {
            return Ok(None);
        };

        if let Some(persona_id) = update.persona_id {
            piece.persona_id = persona_id;
        }
        if update.title.is_some() {
            piece.title = update.title;
        }
        if update.content.is_some() {
            piece.content = update.content;
        }
        if let Some(status) = update.status {
            piece.status = status;
        }
        if let Some(tags) = update.tags {
            piece.tags = tags;
        }
        if let Some(published_at) = update.published_at {
            piece.published_at = published_at;
        }

        piece.word_count = word_count(piece.content.as_deref().unwrap_or(""));
        piece.updated_at = Utc::now();
        let tags_json = serde_json::to_string(&piece.tags)?;

        sqlx::query(
            r#"
            UPDATE content_pieces
            SET persona_id = ?, title = ?, content = ?, status = ?, tags = ?,
                word_count = ?, updated_at = ?, published_at = ?
            WHERE id = ? AND author_id = ?
            "#,
        )
        .bind(piece.persona_id)
        .bind(&piece.title)
        .bind(&piece.content)
        .bind(piece.status.to_string())
        .bind(&tags_json)
        .bind(piece.word_count)
        .bind(piece.updated_at)
        .bind(piece.published_at)
        .bind(id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;

        self.get(author_id, id).await
    }

    pub async fn delete(&self, author_id: i64, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM content_pieces WHERE id = ? AND author_id = ?")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_content(row: sqlx::sqlite::SqliteRow) -> Result<ContentPiece> {
    let status_str: String = row.get("status");
    let status = status_str
        .parse::<ContentStatus>()
        .map_err(|e| anyhow::anyhow!(e))?;

    let tags_json: String = row.get("tags");
    let tags = serde_json::from_str::<Vec<String>>(&tags_json).unwrap_or_default();

    Ok(ContentPiece {
        id: row.get("id"),
        author_id: row.get("author_id"),
        persona_id: row.get("persona_id"),
        persona_name: row.get("persona_name"),
        title: row.get("title"),
        content: row.get("content"),
        status,
        tags,
        word_count: row.get("word_count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        published_at: row.get("published_at"),
    })
}
