// tests/api_integration_test.rs
//
// End-to-end tests over the full router: in-memory SQLite, a stub inference
// endpoint on an ephemeral port, real JWT auth.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::routing::post;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

use ghostwriter::api::app_router;
use ghostwriter::config::Config;
use ghostwriter::db::run_migrations;
use ghostwriter::state::create_app_state;

/// Spawn a stub inference endpoint that answers every `/api/generate` call
/// with the given JSON envelope. Returns its base URL.
async fn spawn_json_stub(envelope: Value) -> String {
    let app = Router::new().route(
        "/api/generate",
        post(move || {
            let envelope = envelope.clone();
            async move { axum::Json(envelope) }
        }),
    );
    serve_stub(app).await
}

/// Stub that answers with a non-JSON body, for malformed-envelope cases.
async fn spawn_text_stub(body: &'static str) -> String {
    let app = Router::new().route("/api/generate", post(move || async move { body }));
    serve_stub(app).await
}

async fn serve_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Build the full application against an in-memory database.
async fn test_app(ollama_url: &str) -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("create in-memory sqlite");
    run_migrations(&pool, Path::new("migrations"))
        .await
        .expect("run migrations");

    let debug_dir = tempfile::tempdir().expect("create temp dir");
    let mut config = Config::from_env();
    config.ollama_base_url = ollama_url.to_string();
    config.analysis_debug_path = debug_dir
        .into_path()
        .join("analysis_debug.md")
        .to_string_lossy()
        .to_string();
    config.jwt_secret = "integration-test-secret".to_string();

    app_router(Arc::new(create_app_state(pool, config)))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router, username: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "username": username,
            "password": "hunter2secret",
            "email": format!("{}@example.com", username),
        })),
    )
    .await
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/token",
        None,
        Some(json!({ "username": username, "password": "hunter2secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

// ── Registration ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_register_and_login() {
    let app = test_app("http://127.0.0.1:1").await;

    let (status, body) = register(&app, "iris").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");

    let token = login(&app, "iris").await;
    let (status, body) = send(&app, "GET", "/api/personas", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_register_duplicate_username_rejected() {
    let app = test_app("http://127.0.0.1:1").await;

    let (status, _) = register(&app, "iris").await;
    assert_eq!(status, StatusCode::CREATED);

    // second attempt with different password/email still fails
    let (status, body) = send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "username": "iris",
            "password": "another-password",
            "email": "other@example.com",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "username");
}

#[tokio::test]
async fn test_register_missing_fields_creates_no_user() {
    let app = test_app("http://127.0.0.1:1").await;

    for body in [
        json!({ "password": "hunter2secret", "email": "a@example.com" }),
        json!({ "username": "ghost", "email": "a@example.com" }),
        json!({ "username": "ghost", "password": "hunter2secret" }),
        json!({ "username": "", "password": "hunter2secret", "email": "a@example.com" }),
    ] {
        let (status, _) = send(&app, "POST", "/api/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // none of the rejected attempts left a user behind: the name is free
    let (status, _) = register(&app, "ghost").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_login_with_bad_password_rejected() {
    let app = test_app("http://127.0.0.1:1").await;
    register(&app, "iris").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/token",
        None,
        Some(json!({ "username": "iris", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_requests_without_token_rejected() {
    let app = test_app("http://127.0.0.1:1").await;

    let (status, _) = send(&app, "GET", "/api/personas", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/content", Some("bogus-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ── Persona CRUD & scoping ────────────────────────────────────────────────

#[tokio::test]
async fn test_persona_crud_round_trip() {
    let app = test_app("http://127.0.0.1:1").await;
    register(&app, "iris").await;
    let token = login(&app, "iris").await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/personas",
        Some(&token),
        Some(json!({
            "name": "Columnist",
            "description": "Sunday opinion voice",
            "tone": "wry",
            "vocabulary_complexity": 7,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Columnist");
    assert_eq!(created["tone"], "wry");
    assert_eq!(created["vocabulary_complexity"], 7);
    assert_eq!(created["content_count"], 0);
    assert_eq!(created["is_active"], true);
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/personas/{}", id),
        Some(&token),
        Some(json!({ "tone": "earnest", "empathy_level": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["tone"], "earnest");
    assert_eq!(updated["empathy_level"], 9);
    // untouched field survives the update
    assert_eq!(updated["vocabulary_complexity"], 7);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/personas/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/personas/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_personas_are_scoped_per_account() {
    let app = test_app("http://127.0.0.1:1").await;
    register(&app, "alice").await;
    register(&app, "bob").await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/personas",
        Some(&alice),
        Some(json!({ "name": "Alice's persona" })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/api/personas", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/personas/{}", id),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/personas/{}", id),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Writing-sample analysis ───────────────────────────────────────────────

#[tokio::test]
async fn test_persona_create_with_writing_sample() {
    // The model wraps its JSON in prose; the extraction heuristic digs it out.
    let envelope = json!({
        "response": "Here is my assessment: {\"name\": \"Iris\", \"vocabulary_complexity\": 8, \"tone\": \"wry\", \"empathy_level\": 6, \"some_future_attribute\": true} Let me know if you need more.",
        "done": true,
    });
    let stub = spawn_json_stub(envelope).await;
    let app = test_app(&stub).await;
    register(&app, "iris").await;
    let token = login(&app, "iris").await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/personas",
        Some(&token),
        Some(json!({
            "name": "placeholder",
            "tone": "flat",
            "writing_sample": "It rained the day I moved out, which felt about right.",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // analysis results overwrite the client-supplied values
    assert_eq!(created["name"], "Iris");
    assert_eq!(created["tone"], "wry");
    assert_eq!(created["vocabulary_complexity"], 8);
    assert_eq!(created["empathy_level"], 6);
}

#[tokio::test]
async fn test_unparsable_analysis_leaves_persona_uncreated() {
    let stub = spawn_json_stub(json!({
        "response": "I'm sorry, I can't produce structured output today.",
    }))
    .await;
    let app = test_app(&stub).await;
    register(&app, "iris").await;
    let token = login(&app, "iris").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/personas",
        Some(&token),
        Some(json!({ "name": "doomed", "writing_sample": "some sample text" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "writing_sample");

    let (_, personas) = send(&app, "GET", "/api/personas", Some(&token), None).await;
    assert_eq!(personas, json!([]));
}

#[tokio::test]
async fn test_malformed_envelope_fails_analysis() {
    let stub = spawn_text_stub("definitely not a JSON envelope").await;
    let app = test_app(&stub).await;
    register(&app, "iris").await;
    let token = login(&app, "iris").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/personas",
        Some(&token),
        Some(json!({ "writing_sample": "some sample text" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "writing_sample");
}

#[tokio::test]
async fn test_empty_writing_sample_skips_analysis() {
    // No stub running at all: an empty sample must never hit the endpoint.
    let app = test_app("http://127.0.0.1:1").await;
    register(&app, "iris").await;
    let token = login(&app, "iris").await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/personas",
        Some(&token),
        Some(json!({ "name": "Quiet", "writing_sample": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Quiet");
}

// ── Content generation ────────────────────────────────────────────────────

#[tokio::test]
async fn test_generate_content_creates_draft() {
    let stub = spawn_json_stub(json!({
        "response": "Title: \"My Post\"\nBody line one\nBody line two",
    }))
    .await;
    let app = test_app(&stub).await;
    register(&app, "iris").await;
    let token = login(&app, "iris").await;

    let (_, persona) = send(
        &app,
        "POST",
        "/api/personas",
        Some(&token),
        Some(json!({ "name": "Columnist" })),
    )
    .await;
    let persona_id = persona["id"].as_i64().unwrap();

    let (status, piece) = send(
        &app,
        "POST",
        &format!("/api/personas/{}/generate-content", persona_id),
        Some(&token),
        Some(json!({ "prompt": "the smell of rain" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(piece["title"], "My Post");
    assert_eq!(piece["content"], "Body line one\nBody line two");
    assert_eq!(piece["status"], "draft");
    assert_eq!(piece["persona_id"], persona_id);
    assert_eq!(piece["persona_name"], "Columnist");
    assert_eq!(piece["word_count"], 6);

    // the persona's content count reflects the new piece
    let (_, persona) = send(
        &app,
        "GET",
        &format!("/api/personas/{}", persona_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(persona["content_count"], 1);
}

#[tokio::test]
async fn test_generate_content_requires_prompt() {
    let app = test_app("http://127.0.0.1:1").await;
    register(&app, "iris").await;
    let token = login(&app, "iris").await;

    let (_, persona) = send(
        &app,
        "POST",
        "/api/personas",
        Some(&token),
        Some(json!({ "name": "Columnist" })),
    )
    .await;
    let persona_id = persona["id"].as_i64().unwrap();

    for body in [json!({}), json!({ "prompt": "" }), json!({ "prompt": "  " })] {
        let (status, response) = send(
            &app,
            "POST",
            &format!("/api/personas/{}/generate-content", persona_id),
            Some(&token),
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["field"], "prompt");
    }

    let (_, pieces) = send(&app, "GET", "/api/content", Some(&token), None).await;
    assert_eq!(pieces, json!([]));
}

#[tokio::test]
async fn test_generate_content_empty_output_is_500() {
    let stub = spawn_json_stub(json!({ "response": "   " })).await;
    let app = test_app(&stub).await;
    register(&app, "iris").await;
    let token = login(&app, "iris").await;

    let (_, persona) = send(
        &app,
        "POST",
        "/api/personas",
        Some(&token),
        Some(json!({ "name": "Columnist" })),
    )
    .await;
    let persona_id = persona["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/personas/{}/generate-content", persona_id),
        Some(&token),
        Some(json!({ "prompt": "anything" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, pieces) = send(&app, "GET", "/api/content", Some(&token), None).await;
    assert_eq!(pieces, json!([]));
}

// ── Content CRUD ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_word_count_is_always_server_computed() {
    let app = test_app("http://127.0.0.1:1").await;
    register(&app, "iris").await;
    let token = login(&app, "iris").await;

    let (status, piece) = send(
        &app,
        "POST",
        "/api/content",
        Some(&token),
        Some(json!({
            "title": "Counted",
            "content": "one   two\nthree",
            "word_count": 999,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(piece["word_count"], 3);
    let id = piece["id"].as_i64().unwrap();

    let (status, piece) = send(
        &app,
        "PUT",
        &format!("/api/content/{}", id),
        Some(&token),
        Some(json!({ "content": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(piece["word_count"], 0);
}

#[tokio::test]
async fn test_content_scoped_per_account() {
    let app = test_app("http://127.0.0.1:1").await;
    register(&app, "alice").await;
    register(&app, "bob").await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let (_, piece) = send(
        &app,
        "POST",
        "/api/content",
        Some(&alice),
        Some(json!({ "title": "Private", "content": "alice words" })),
    )
    .await;
    let id = piece["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", "/api/content", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(&app, "GET", &format!("/api/content/{}", id), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_cannot_reference_foreign_persona() {
    let app = test_app("http://127.0.0.1:1").await;
    register(&app, "alice").await;
    register(&app, "bob").await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let (_, persona) = send(
        &app,
        "POST",
        "/api/personas",
        Some(&alice),
        Some(json!({ "name": "Alice's" })),
    )
    .await;
    let persona_id = persona["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/content",
        Some(&bob),
        Some(json!({ "title": "Sneaky", "content": "words", "persona_id": persona_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "persona_id");
}

#[tokio::test]
async fn test_content_update_merges_fields() {
    let app = test_app("http://127.0.0.1:1").await;
    register(&app, "iris").await;
    let token = login(&app, "iris").await;

    let (_, piece) = send(
        &app,
        "POST",
        "/api/content",
        Some(&token),
        Some(json!({
            "title": "Draft thoughts",
            "content": "some words here",
            "tags": ["notes", "draft"],
        })),
    )
    .await;
    let id = piece["id"].as_i64().unwrap();
    assert_eq!(piece["status"], "draft");
    assert_eq!(piece["tags"], json!(["notes", "draft"]));

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/content/{}", id),
        Some(&token),
        Some(json!({ "status": "published", "published_at": "2026-08-07T12:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "published");
    // fields absent from the update survive
    assert_eq!(updated["title"], "Draft thoughts");
    assert_eq!(updated["tags"], json!(["notes", "draft"]));
    assert!(updated["published_at"].is_string());
}
