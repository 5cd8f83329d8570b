// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::database;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{Local, NaiveDate};
use movekit_common::{
    catalog, ApiResponse, CreateCustomTaskPayload, CreateMovePayload, Move, TaskTemplate, TimelineSummary,
    UpdateTaskStatusPayload,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, error, info};

/// Handler for listing the user's moves, newest first.
pub async fn list_moves(
    State(pool): State<SqlitePool>,
) -> Result<Json<ApiResponse<Vec<Move>>>, AppError> {
    let moves = database::list_moves_from_db(&pool).await?;
    info!("Successfully retrieved {} moves.", moves.len());
    Ok(Json(ApiResponse::ok(moves)))
}

/// Handler for creating a move. The task catalog is attached on creation.
pub async fn create_move(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateMovePayload>,
) -> Result<(StatusCode, Json<ApiResponse<Move>>), AppError> {
    debug!("Received request to create move: {}", payload.title);
    if payload.title.trim().is_empty() {
        error!("Validation failed: Move title is empty.");
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "Move title cannot be empty.",
        ));
    }

    let new_move = database::create_move_in_db(&pool, payload).await?;
    info!("Move created successfully with ID: {}", new_move.id);

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(new_move))))
}

/// Handler for deleting a move and all of its tasks.
pub async fn delete_move(
    State(pool): State<SqlitePool>,
    Path(move_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    debug!("Attempting to delete move with ID: {}", move_id);

    if database::delete_move_from_db(&pool, move_id).await? {
        info!("Move with ID {} deleted successfully.", move_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::move_not_found(move_id))
    }
}

/// Handler for the tasks of a move, in timeline order.
pub async fn get_timeline(
    State(pool): State<SqlitePool>,
    Path(move_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<TaskTemplate>>>, AppError> {
    require_move(&pool, move_id).await?;
    let tasks = database::get_timeline_tasks_from_db(&pool, move_id).await?;
    info!("Retrieved {} tasks for move {}.", tasks.len(), move_id);
    Ok(Json(ApiResponse::ok(tasks)))
}

#[derive(Deserialize, Debug, Default)]
pub struct ProgressQuery {
    /// Reference day for status derivation; the server's local day if absent.
    pub today: Option<NaiveDate>,
}

/// Handler for the derived progress figures of a move.
pub async fn get_progress(
    State(pool): State<SqlitePool>,
    Path(move_id): Path<i64>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<ApiResponse<TimelineSummary>>, AppError> {
    let found = require_move(&pool, move_id).await?;
    let tasks = database::get_timeline_tasks_from_db(&pool, move_id).await?;
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());

    let summary = TimelineSummary::compute(found.move_date, &tasks, today);
    debug!(
        "Move {} progress on {}: {}/{} ({}%)",
        move_id,
        today,
        summary.progress.completed_count,
        summary.progress.total_count,
        summary.progress.percent
    );
    Ok(Json(ApiResponse::ok(summary)))
}

/// Handler for adding a user-authored task to a move.
pub async fn create_custom_task(
    State(pool): State<SqlitePool>,
    Path(move_id): Path<i64>,
    Json(payload): Json<CreateCustomTaskPayload>,
) -> Result<(StatusCode, Json<ApiResponse<TaskTemplate>>), AppError> {
    if payload.title.trim().is_empty() {
        error!("Validation failed: Task title is empty.");
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "Task title cannot be empty.",
        ));
    }
    if let Some(bucket) = payload.bucket.as_deref() {
        if !catalog::is_known_bucket(bucket) {
            error!("Validation failed: unknown bucket {}.", bucket);
            return Err(AppError::new(
                StatusCode::BAD_REQUEST,
                &format!("Unknown bucket: {}.", bucket),
            ));
        }
    }
    require_move(&pool, move_id).await?;

    let task = database::create_custom_task_in_db(&pool, move_id, payload).await?;
    info!("Custom task {} added to move {}.", task.id, move_id);

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(task))))
}

/// Handler for setting the completion flag of a task.
pub async fn update_task_status(
    State(pool): State<SqlitePool>,
    Path(task_id): Path<i64>,
    Json(payload): Json<UpdateTaskStatusPayload>,
) -> Result<Json<ApiResponse<TaskTemplate>>, AppError> {
    debug!(
        "Received request to set completed={} on task {}",
        payload.completed, task_id
    );

    match database::update_task_status_in_db(&pool, task_id, payload.completed).await? {
        Some(task) => {
            info!("Task {} is now completed={}.", task.id, task.completed);
            Ok(Json(ApiResponse::ok(task)))
        }
        None => {
            error!("Task with ID {} not found.", task_id);
            Err(AppError::new(
                StatusCode::NOT_FOUND,
                &format!("Task with ID {} not found.", task_id),
            ))
        }
    }
}

async fn require_move(pool: &SqlitePool, move_id: i64) -> Result<Move, AppError> {
    database::get_move_from_db(pool, move_id)
        .await?
        .ok_or_else(|| AppError::move_not_found(move_id))
}

// --- Custom Error Handling ---

/// Our custom error type for the application.
pub struct AppError {
    code: StatusCode,
    message: String,
}

impl AppError {
    fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }

    fn move_not_found(move_id: i64) -> Self {
        error!("Move with ID {} not found.", move_id);
        Self::new(
            StatusCode::NOT_FOUND,
            &format!("Move with ID {} not found.", move_id),
        )
    }
}

/// Allows converting an `anyhow::Error` (coming from `database.rs`)
/// into our `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Internal server error: {:?}", err);
        Self {
            code: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred.".to_string(),
        }
    }
}

/// Renders the error as a failed envelope.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(
            "Responding with error: status_code={}, message={}",
            self.code.as_u16(),
            self.message
        );
        (
            self.code,
            Json(ApiResponse::<()>::failure(self.message)),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        database::init_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_create_move_validation_empty_title() {
        // Validation fails before any DB access.
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        let payload = Json(CreateMovePayload {
            title: "   ".to_string(),
            move_date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
            from_address: None,
            to_address: None,
        });

        let err = create_move(State(pool), payload).await.unwrap_err();
        assert_eq!(err.code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Move title cannot be empty.");
    }

    #[tokio::test]
    async fn test_custom_task_validation_runs_before_lookup() {
        let pool = setup_pool().await;
        let payload = Json(CreateCustomTaskPayload {
            title: String::new(),
            bucket: None,
        });

        let err = create_custom_task(State(pool), Path(404), payload).await.unwrap_err();
        assert_eq!(err.code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_custom_task_unknown_bucket() {
        let pool = setup_pool().await;
        let payload = Json(CreateCustomTaskPayload {
            title: "Pack garage".to_string(),
            bucket: Some("12-weeks".to_string()),
        });

        let err = create_custom_task(State(pool), Path(1), payload).await.unwrap_err();
        assert_eq!(err.code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Unknown bucket: 12-weeks.");
    }

    #[tokio::test]
    async fn test_update_unknown_task() {
        let pool = setup_pool().await;
        let err = update_task_status(
            State(pool),
            Path(77),
            Json(UpdateTaskStatusPayload { completed: true }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Task with ID 77 not found.");
    }

    #[tokio::test]
    async fn test_progress_for_unknown_move() {
        let pool = setup_pool().await;
        let err = get_progress(State(pool), Path(5), Query(ProgressQuery::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code, StatusCode::NOT_FOUND);
    }
}
