// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::handlers;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

/// Creates and configures the application router.
pub fn create_router(pool: SqlitePool) -> Router {
    Router::new()
        // `GET /api/moves` lists moves, `POST /api/moves` creates one and seeds its tasks
        .route("/api/moves", get(handlers::list_moves).post(handlers::create_move))
        .route("/api/moves/{id}", delete(handlers::delete_move))
        .route("/api/moves/{id}/timeline", get(handlers::get_timeline))
        .route("/api/moves/{id}/progress", get(handlers::get_progress))
        .route("/api/moves/{id}/tasks", post(handlers::create_custom_task))
        .route("/api/tasks/{id}", patch(handlers::update_task_status))
        .layer(TraceLayer::new_for_http())
        // Adds the database pool to the application state
        .with_state(pool)
}
