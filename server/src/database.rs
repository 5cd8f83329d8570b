// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use movekit_common::catalog;
use movekit_common::{
    Category, CreateCustomTaskPayload, CreateMovePayload, Move, Priority, TaskTemplate,
};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use tracing::{debug, info};

const TASK_COLUMNS: &str =
    "id, move_id, title, description, day_offset, category, priority, completed, estimated_time, bucket";

/// Establishes the database connection pool.
/// If the database does not exist, it creates it, then makes sure the
/// `moves` and `tasks` tables exist.
pub async fn establish_connection_pool(database_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        info!("Creating database {}", database_url);
        if let Some(parent) = database_file(database_url).and_then(Path::parent) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        Sqlite::create_database(database_url)
            .await
            .context("Failed to create database")?;
    } else {
        info!("Database already exists.");
    }

    let pool = SqlitePool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    init_schema(&pool).await?;

    Ok(pool)
}

fn database_file(database_url: &str) -> Option<&Path> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(Path::new(path))
}

/// Creates the tables if they are missing.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS moves (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            from_address TEXT NULL,
            to_address TEXT NULL,
            move_date DATE NOT NULL,
            created_at TIMESTAMP NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create 'moves' table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            move_id INTEGER NOT NULL REFERENCES moves(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            day_offset INTEGER NULL,
            category TEXT NOT NULL,
            priority TEXT NOT NULL,
            completed BOOLEAN NOT NULL DEFAULT 0,
            estimated_time TEXT NULL,
            bucket TEXT NULL,
            created_at TIMESTAMP NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create 'tasks' table")?;

    info!("'moves' and 'tasks' tables are ready.");

    Ok(())
}

/// All moves, newest first.
pub async fn list_moves_from_db(pool: &SqlitePool) -> Result<Vec<Move>> {
    let moves = sqlx::query_as::<_, Move>(
        "SELECT id, title, from_address, to_address, move_date, created_at FROM moves ORDER BY created_at DESC, id DESC;",
    )
    .fetch_all(pool)
    .await
    .context("Failed to retrieve moves from DB")?;

    Ok(moves)
}

pub async fn get_move_from_db(pool: &SqlitePool, move_id: i64) -> Result<Option<Move>> {
    let found = sqlx::query_as::<_, Move>(
        "SELECT id, title, from_address, to_address, move_date, created_at FROM moves WHERE id = ?;",
    )
    .bind(move_id)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Failed to retrieve move {}", move_id))?;

    Ok(found)
}

/// Inserts a new move and seeds it with the task catalog, atomically.
pub async fn create_move_in_db(pool: &SqlitePool, payload: CreateMovePayload) -> Result<Move> {
    let created_at = Utc::now();
    let mut tx = pool.begin().await.context("Failed to open transaction")?;

    debug!(
        "Insert values: title={}, move_date={}, from_address={:?}, to_address={:?}",
        payload.title, payload.move_date, payload.from_address, payload.to_address
    );

    let move_id = sqlx::query(
        "INSERT INTO moves (title, from_address, to_address, move_date, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&payload.title)
    .bind(&payload.from_address)
    .bind(&payload.to_address)
    .bind(payload.move_date)
    .bind(created_at)
    .execute(&mut *tx)
    .await
    .context("Failed to insert move into DB")?
    .last_insert_rowid();

    for entry in catalog::timeline_catalog() {
        sqlx::query(
            "INSERT INTO tasks (move_id, title, description, day_offset, category, priority, completed, estimated_time, bucket, created_at) VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?, ?)",
        )
        .bind(move_id)
        .bind(entry.title)
        .bind(entry.description)
        .bind(entry.day_offset)
        .bind(entry.category)
        .bind(entry.priority)
        .bind(entry.estimated_time)
        .bind(entry.bucket)
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to seed task '{}'", entry.title))?;
    }

    tx.commit().await.context("Failed to commit new move")?;
    info!(
        "Created move {} with {} seeded tasks.",
        move_id,
        catalog::timeline_catalog().len()
    );

    Ok(Move {
        id: move_id,
        title: payload.title,
        from_address: payload.from_address,
        to_address: payload.to_address,
        move_date: payload.move_date,
        created_at,
    })
}

/// Deletes a move together with its tasks.
/// Returns false if no move with the given ID was found.
pub async fn delete_move_from_db(pool: &SqlitePool, move_id: i64) -> Result<bool> {
    let mut tx = pool.begin().await.context("Failed to open transaction")?;

    let tasks = sqlx::query("DELETE FROM tasks WHERE move_id = ?")
        .bind(move_id)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to delete tasks of move {}", move_id))?
        .rows_affected();

    let moves = sqlx::query("DELETE FROM moves WHERE id = ?")
        .bind(move_id)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to delete move {}", move_id))?
        .rows_affected();

    tx.commit().await.context("Failed to commit move deletion")?;
    info!("Deleted move {} ({} rows) and {} tasks.", move_id, moves, tasks);

    Ok(moves > 0)
}

/// Tasks of a move, ordered along the timeline. Custom tasks without an
/// offset come last.
pub async fn get_timeline_tasks_from_db(pool: &SqlitePool, move_id: i64) -> Result<Vec<TaskTemplate>> {
    let tasks = sqlx::query_as::<_, TaskTemplate>(&format!(
        "SELECT {} FROM tasks WHERE move_id = ? ORDER BY day_offset ASC NULLS LAST, id ASC;",
        TASK_COLUMNS
    ))
    .bind(move_id)
    .fetch_all(pool)
    .await
    .with_context(|| format!("Failed to retrieve tasks of move {}", move_id))?;

    Ok(tasks)
}

pub async fn get_task_from_db(pool: &SqlitePool, task_id: i64) -> Result<Option<TaskTemplate>> {
    let task = sqlx::query_as::<_, TaskTemplate>(&format!(
        "SELECT {} FROM tasks WHERE id = ?;",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Failed to retrieve task {}", task_id))?;

    Ok(task)
}

/// Sets the completion flag and returns the updated task, or `None` if no
/// task with the given ID exists.
pub async fn update_task_status_in_db(
    pool: &SqlitePool,
    task_id: i64,
    completed: bool,
) -> Result<Option<TaskTemplate>> {
    debug!("Setting completed={} on task {}", completed, task_id);
    let result = sqlx::query("UPDATE tasks SET completed = ? WHERE id = ?")
        .bind(completed)
        .bind(task_id)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to update status of task {}", task_id))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_task_from_db(pool, task_id).await
}

/// Inserts a user-authored task. The caller has already checked that the
/// move exists and the title is not blank.
pub async fn create_custom_task_in_db(
    pool: &SqlitePool,
    move_id: i64,
    payload: CreateCustomTaskPayload,
) -> Result<TaskTemplate> {
    let title = payload.title.trim().to_string();

    let id = sqlx::query(
        "INSERT INTO tasks (move_id, title, description, day_offset, category, priority, completed, estimated_time, bucket, created_at) VALUES (?, ?, '', NULL, ?, ?, 0, NULL, ?, ?)",
    )
    .bind(move_id)
    .bind(&title)
    .bind(Category::Custom)
    .bind(Priority::Medium)
    .bind(&payload.bucket)
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("Failed to insert custom task into DB")?
    .last_insert_rowid();

    Ok(TaskTemplate {
        id,
        move_id,
        title,
        description: String::new(),
        day_offset: None,
        category: Category::Custom,
        priority: Priority::Medium,
        completed: false,
        estimated_time: None,
        bucket: payload.bucket,
    })
}
