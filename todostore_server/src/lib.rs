//! JSON API over [`TodoService`].
//!
//! Route surface and response envelopes:
//!
//! - `GET    /api/todos`      → `{"todos": [...]}`
//! - `POST   /api/todos`      → 201 `{"todo": ...}`
//! - `DELETE /api/todos`      → `{"deletedCount": n}` (clears completed)
//! - `PUT    /api/todos/{id}` → partial update (`text?`, `completed?`) → `{"todo": ...}`
//! - `PATCH  /api/todos/{id}` → toggle completion → `{"todo": ...}`
//! - `DELETE /api/todos/{id}` → `{"success": true}`
//! - `GET    /api/health`     → 200/503 `{"status", "database", "timestamp"}`
//!
//! Validation failures map to 400, missing todos to 404, internal failures
//! to 500 — always as `{"error": "..."}` with a stable message.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use todostore::{ServiceError, TodoService};

type AppState = Arc<TodoService>;

type ApiResponse = (StatusCode, Json<Value>);

/// Build the router. The service must already be initialized (the binary
/// does this before serving); an uninitialized service surfaces as 500s.
pub fn app(service: AppState) -> Router {
    Router::new()
        .route(
            "/api/todos",
            get(list_todos).post(create_todo).delete(clear_completed),
        )
        .route(
            "/api/todos/{id}",
            axum::routing::put(update_todo)
                .patch(toggle_todo)
                .delete(delete_todo),
        )
        .route("/api/health", get(health))
        .with_state(service)
}

#[derive(Deserialize)]
struct CreateTodoRequest {
    // Absent text falls through to service validation as empty.
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct UpdateTodoRequest {
    text: Option<String>,
    completed: Option<bool>,
}

fn error_response(err: ServiceError) -> ApiResponse {
    let status = match err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

fn not_found() -> ApiResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Todo not found" })),
    )
}

async fn list_todos(State(service): State<AppState>) -> ApiResponse {
    match service.get_all_todos().await {
        Ok(todos) => (StatusCode::OK, Json(json!({ "todos": todos }))),
        Err(err) => error_response(err),
    }
}

async fn create_todo(
    State(service): State<AppState>,
    Json(request): Json<CreateTodoRequest>,
) -> ApiResponse {
    match service.add_todo(&request.text).await {
        Ok(todo) => (StatusCode::CREATED, Json(json!({ "todo": todo }))),
        Err(err) => error_response(err),
    }
}

async fn update_todo(
    State(service): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTodoRequest>,
) -> ApiResponse {
    match service
        .update_todo(&id, request.text.as_deref(), request.completed)
        .await
    {
        Ok(Some(todo)) => (StatusCode::OK, Json(json!({ "todo": todo }))),
        Ok(None) => not_found(),
        Err(err) => error_response(err),
    }
}

async fn toggle_todo(State(service): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    match service.toggle_todo(&id).await {
        Ok(Some(todo)) => (StatusCode::OK, Json(json!({ "todo": todo }))),
        Ok(None) => not_found(),
        Err(err) => error_response(err),
    }
}

async fn delete_todo(State(service): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    match service.delete_todo(&id).await {
        Ok(true) => (StatusCode::OK, Json(json!({ "success": true }))),
        Ok(false) => not_found(),
        Err(err) => error_response(err),
    }
}

async fn clear_completed(State(service): State<AppState>) -> ApiResponse {
    match service.clear_completed().await {
        Ok(count) => (StatusCode::OK, Json(json!({ "deletedCount": count }))),
        Err(err) => error_response(err),
    }
}

async fn health(State(service): State<AppState>) -> ApiResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();
    if service.is_healthy().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "timestamp": timestamp,
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "database": "disconnected",
                "timestamp": timestamp,
            })),
        )
    }
}
