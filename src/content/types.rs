// src/content/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a content piece.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ContentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ContentStatus::Draft),
            "published" => Ok(ContentStatus::Published),
            "archived" => Ok(ContentStatus::Archived),
            other => Err(format!("Unknown content status: {}", other)),
        }
    }
}

/// A generated or authored text artifact tied to a persona and an owning
/// account. `word_count` is always derived from `content` at save time.
#[derive(Debug, Clone, Serialize)]
pub struct ContentPiece {
    pub id: i64,
    #[serde(skip)]
    pub author_id: i64,
    pub persona_id: Option<i64>,
    /// Name of the referenced persona, if it still exists. Read-only.
    pub persona_name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: ContentStatus,
    pub tags: Vec<String>,
    pub word_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Whitespace-token count of a piece of content. Empty content counts zero.
pub fn word_count(content: &str) -> i64 {
    content.split_whitespace().count() as i64
}
