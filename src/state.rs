// src/state.rs

use sqlx::SqlitePool;

use crate::auth::AuthService;
use crate::config::Config;
use crate::content::ContentStore;
use crate::llm::OllamaClient;
use crate::persona::PersonaStore;

/// Shared application state handed to every handler. Cheap to construct:
/// the stores all share the same pool.
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub auth: AuthService,
    pub personas: PersonaStore,
    pub content: ContentStore,
    pub llm: OllamaClient,
}

pub fn create_app_state(pool: SqlitePool, config: Config) -> AppState {
    let auth = AuthService::new(pool.clone(), config.jwt_secret.clone());
    let personas = PersonaStore::new(pool.clone());
    let content = ContentStore::new(pool.clone());
    let llm = OllamaClient::new(&config);

    AppState {
        db: pool,
        config,
        auth,
        personas,
        content,
        llm,
    }
}
