// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::collections::HashSet;

use chrono::NaiveDate;
use movekit_common::schedule::{derive_status, due_date};
use movekit_common::{
    aggregate, catalog, mutation, CreateCustomTaskPayload, Move, ProgressSnapshot, TaskStatus,
    TaskTemplate, TimelineSummary, ToggleOutcome, TogglePolicy,
};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::api::MoveApi;
use crate::error::ClientError;

/// A task as the timeline renders it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskView {
    pub task: TaskTemplate,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
}

/// View state of one move's timeline.
///
/// The local task list is the single source of truth for rendering. It only
/// changes after the backend acknowledged a mutation; nothing is applied
/// optimistically.
pub struct TimelineSession<A> {
    api: A,
    policy: TogglePolicy,
    current: Move,
    tasks: RwLock<Vec<TaskTemplate>>,
    in_flight: Mutex<HashSet<i64>>,
}

/// Clears the in-flight mark of a task when the request settles.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<i64>>,
    task_id: i64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.task_id);
    }
}

impl<A: MoveApi> TimelineSession<A> {
    /// Opens the user's most recent move. `Ok(None)` when there is none.
    pub async fn load(api: A, policy: TogglePolicy) -> Result<Option<Self>, ClientError> {
        let moves = api.get_user_moves().await?;
        let Some(current) = moves.into_iter().next() else {
            info!("No move found for this user.");
            return Ok(None);
        };
        Self::open(api, current, policy).await.map(Some)
    }

    /// Opens a specific move. `Ok(None)` when the user has no such move.
    pub async fn load_move(
        api: A,
        move_id: i64,
        policy: TogglePolicy,
    ) -> Result<Option<Self>, ClientError> {
        let moves = api.get_user_moves().await?;
        let Some(current) = moves.into_iter().find(|m| m.id == move_id) else {
            info!("Move {} not found for this user.", move_id);
            return Ok(None);
        };
        Self::open(api, current, policy).await.map(Some)
    }

    async fn open(api: A, current: Move, policy: TogglePolicy) -> Result<Self, ClientError> {
        let tasks = api.get_timeline_events(current.id).await?;
        info!(
            "Loaded move {} ({}) with {} tasks.",
            current.id,
            current.move_date,
            tasks.len()
        );
        Ok(Self {
            api,
            policy,
            current,
            tasks: RwLock::new(tasks),
            in_flight: Mutex::new(HashSet::new()),
        })
    }

    /// Replaces the local tasks with the backend's current list.
    pub async fn reload(&self) -> Result<(), ClientError> {
        let tasks = self.api.get_timeline_events(self.current.id).await?;
        debug!("Reloaded {} tasks for move {}.", tasks.len(), self.current.id);
        *self.tasks.write() = tasks;
        Ok(())
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn move_record(&self) -> &Move {
        &self.current
    }

    pub fn policy(&self) -> TogglePolicy {
        self.policy
    }

    pub fn tasks(&self) -> Vec<TaskTemplate> {
        self.tasks.read().clone()
    }

    pub fn progress(&self) -> ProgressSnapshot {
        aggregate(&self.tasks.read())
    }

    pub fn summary(&self, today: NaiveDate) -> TimelineSummary {
        TimelineSummary::compute(self.current.move_date, &self.tasks.read(), today)
    }

    /// Every task with its due date and status as of `today`.
    pub fn views(&self, today: NaiveDate) -> Vec<TaskView> {
        let move_date = self.current.move_date;
        self.tasks
            .read()
            .iter()
            .map(|task| TaskView {
                task: task.clone(),
                due_date: due_date(task, move_date),
                status: derive_status(task, move_date, today),
            })
            .collect()
    }

    pub fn is_in_flight(&self, task_id: i64) -> bool {
        self.in_flight.lock().contains(&task_id)
    }

    /// Toggles a task through the backend.
    ///
    /// Unknown tasks, transitions the policy forbids and a second toggle
    /// while one is pending are no-ops that never reach the backend. A task
    /// the backend no longer knows is dropped from the local list and
    /// reported as `NotFound`. On any other backend failure the local task
    /// is left as it was and the error is returned for the caller to display.
    pub async fn toggle(&self, task_id: i64) -> Result<ToggleOutcome, ClientError> {
        let inserted = self.in_flight.lock().insert(task_id);
        if !inserted {
            debug!("Toggle ignored: task {} has a request in flight.", task_id);
            return Ok(ToggleOutcome::InFlight);
        }
        let _guard = InFlight {
            set: &self.in_flight,
            task_id,
        };

        // Read under the in-flight mark so no other toggle of this task can
        // settle in between.
        let completed = {
            let tasks = self.tasks.read();
            tasks.iter().find(|t| t.id == task_id).map(|t| t.completed)
        };
        let Some(completed) = completed else {
            debug!("Toggle ignored: task {} is not loaded.", task_id);
            return Ok(ToggleOutcome::NotFound);
        };
        let Some(target) = self.policy.target_state(completed) else {
            debug!("Toggle ignored: task {} is already completed.", task_id);
            return Ok(ToggleOutcome::Unchanged);
        };

        let echoed = match self.api.update_task_status(task_id, target).await {
            Ok(echoed) => echoed,
            Err(ClientError::Remote { status: 404, .. }) => {
                info!("Task {} was removed elsewhere; dropping it.", task_id);
                self.tasks.write().retain(|t| t.id != task_id);
                return Ok(ToggleOutcome::NotFound);
            }
            Err(e) => {
                warn!("Failed to update task {}: {}", task_id, e);
                return Err(e);
            }
        };

        let mut tasks = self.tasks.write();
        let applied = match echoed {
            Some(updated) => match tasks.iter_mut().find(|t| t.id == updated.id) {
                Some(local) => {
                    *local = updated;
                    true
                }
                None => false,
            },
            None => mutation::set_completed(&mut tasks, task_id, target),
        };
        if !applied {
            return Ok(ToggleOutcome::NotFound);
        }

        info!("Task {} is now completed={}.", task_id, target);
        Ok(if target {
            ToggleOutcome::Completed
        } else {
            ToggleOutcome::Reopened
        })
    }

    /// Adds a custom task through the backend. A blank title or an unknown
    /// bucket is rejected locally with `Ok(None)` and no request.
    pub async fn add_custom_task(
        &self,
        title: &str,
        bucket: Option<&str>,
    ) -> Result<Option<TaskTemplate>, ClientError> {
        let title = title.trim();
        if title.is_empty() {
            debug!("Custom task rejected: blank title.");
            return Ok(None);
        }
        if let Some(bucket) = bucket.filter(|b| !catalog::is_known_bucket(b)) {
            debug!("Custom task rejected: unknown bucket {}.", bucket);
            return Ok(None);
        }

        let payload = CreateCustomTaskPayload {
            title: title.to_string(),
            bucket: bucket.map(str::to_string),
        };
        let created = match self.api.create_custom_task(self.current.id, payload).await {
            Ok(created) => created,
            Err(e) => {
                warn!("Failed to add custom task to move {}: {}", self.current.id, e);
                return Err(e);
            }
        };

        info!("Custom task {} added to move {}.", created.id, self.current.id);
        self.tasks.write().push(created.clone());
        Ok(Some(created))
    }
}
