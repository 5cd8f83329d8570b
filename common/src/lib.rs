// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod checklist;
pub mod mutation;
pub mod progress;
pub mod schedule;

pub use checklist::{Checklist, WeekBucket};
pub use mutation::{add_custom_task, toggle_task, ToggleOutcome, TogglePolicy};
pub use progress::{aggregate, aggregate_by_bucket, ProgressSnapshot, StatusBreakdown};
pub use schedule::{derive_status, derive_status_at, project_date, TaskStatus};

/// A relocation, anchored on its move date.
///
/// The move date is the origin of every relative due date: tasks never store
/// an absolute date, only their offset from this one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Move {
    pub id: i64,

    pub title: String,

    pub from_address: Option<String>,

    pub to_address: Option<String>,

    // Only the calendar day matters, without a timezone.
    pub move_date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

/// Fixed set of task categories.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Category {
    Logistics,
    Preparation,
    Supplies,
    Utilities,
    AddressChange,
    Packing,
    MovingDay,
    Custom,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One actionable item of a move.
///
/// `day_offset` is set once when the task is authored and never recomputed.
/// It is `None` only for custom tasks, which live in their authoring bucket
/// and are not placed on the absolute timeline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TaskTemplate {
    pub id: i64,

    pub move_id: i64,

    pub title: String,

    pub description: String,

    pub day_offset: Option<i32>,

    pub category: Category,

    pub priority: Priority,

    pub completed: bool,

    // Display only, e.g. "2 hours".
    pub estimated_time: Option<String>,

    pub bucket: Option<String>,
}

/// Uniform response envelope shared by every API route.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Body of `POST /api/moves`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateMovePayload {
    pub title: String,
    pub move_date: NaiveDate,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
}

/// Body of `POST /api/moves/{id}/tasks`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateCustomTaskPayload {
    pub title: String,
    pub bucket: Option<String>,
}

/// Body of `PATCH /api/tasks/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct UpdateTaskStatusPayload {
    pub completed: bool,
}

/// Derived dashboard figures for one move, computed on read.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimelineSummary {
    pub move_date: NaiveDate,
    pub today: NaiveDate,
    pub progress: ProgressSnapshot,
    pub breakdown: StatusBreakdown,
}

impl TimelineSummary {
    pub fn compute(move_date: NaiveDate, tasks: &[TaskTemplate], today: NaiveDate) -> Self {
        Self {
            move_date,
            today,
            progress: aggregate(tasks),
            breakdown: StatusBreakdown::tally(tasks, move_date, today),
        }
    }
}
