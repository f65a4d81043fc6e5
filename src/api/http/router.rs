// src/api/http/router.rs
// HTTP router composition for REST API endpoints

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::auth::{register, token};
use super::content::{create_content, delete_content, get_content, list_content, update_content};
use super::personas::{
    create_persona, delete_persona, generate_persona_content, get_persona, list_personas,
    update_persona,
};
use crate::state::AppState;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Routes nested under `/api`.
fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/token", post(token))
        .route("/personas", get(list_personas).post(create_persona))
        .route(
            "/personas/{id}",
            get(get_persona).put(update_persona).delete(delete_persona),
        )
        .route(
            "/personas/{id}/generate-content",
            post(generate_persona_content),
        )
        .route("/content", get(list_content).post(create_content))
        .route(
            "/content/{id}",
            get(get_content).put(update_content).delete(delete_content),
        )
}

/// Full application router with CORS and request tracing.
pub fn app_router(state: Arc<AppState>) -> Router {
    let cors = match state.config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        Err(_) => {
            warn!(
                "Invalid CORS origin '{}', falling back to permissive CORS",
                state.config.cors_origin
            );
            CorsLayer::permissive()
        }
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
