// src/auth/service.rs

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::jwt::create_token;
use super::password::{hash_password, verify_password};

/// Public view of a user account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Account management over the users and authors tables. Registration
/// creates the author profile in the same transaction as the user, so an
/// account can never exist without its author.
pub struct AuthService {
    db: SqlitePool,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(db: SqlitePool, jwt_secret: String) -> Self {
        Self { db, jwt_secret }
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.db)
            .await?;
        Ok(count.0 > 0)
    }

    /// Create a user and its author profile. The caller is responsible for
    /// the duplicate-username check; a race here still fails on the unique
    /// index and rolls the transaction back.
    pub async fn register_user(&self, username: &str, password: &str, email: &str) -> Result<User> {
        let user_id = Uuid::new_v4().to_string();
        let password_hash = hash_password(password)?;
        let now = Utc::now();

        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, TRUE, ?, ?)
            "#,
        )
        .bind(&user_id)
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO authors (user_id, created_at) VALUES (?, ?)")
            .bind(&user_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(User {
            id: user_id,
            username: username.to_string(),
            email: email.to_string(),
            is_active: true,
            created_at: now,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, password_hash, is_active, created_at \
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| anyhow!("Invalid credentials"))?;

        if !row.is_active {
            return Err(anyhow!("User account is disabled"));
        }

        if !verify_password(password, &row.password_hash)? {
            return Err(anyhow!("Invalid credentials"));
        }

        let token = create_token(&row.id, &row.username, &self.jwt_secret)?;
        self.update_last_login(&row.id).await?;

        Ok(AuthResponse {
            user: row.into(),
            token,
        })
    }

    /// Resolve the author id owned by a user, if the account still exists.
    pub async fn author_id_for_user(&self, user_id: &str) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT a.id FROM authors a \
             JOIN users u ON u.id = a.user_id \
             WHERE u.id = ? AND u.is_active = TRUE",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(|(id,)| id))
    }

    async fn update_last_login(&self, user_id: &str) -> Result<()> {
        let now = Utc::now();
        sqlx::query("UPDATE users SET last_login_at = ?, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(now)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
