// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Category, Priority, TaskTemplate};

/// Which completion transitions a toggle may perform.
///
/// The same policy is applied by the in-memory toggle and by the API-backed
/// session, so both views agree on what a click does.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TogglePolicy {
    /// pending <-> completed
    #[default]
    Bidirectional,
    /// pending -> completed only; toggling a completed task does nothing.
    OneWay,
}

impl TogglePolicy {
    /// State a toggle should move a task to, or `None` when the policy
    /// forbids any transition from `completed`.
    pub fn target_state(self, completed: bool) -> Option<bool> {
        match (self, completed) {
            (TogglePolicy::OneWay, true) => None,
            _ => Some(!completed),
        }
    }
}

impl FromStr for TogglePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bidirectional" => Ok(TogglePolicy::Bidirectional),
            "one-way" | "one_way" | "oneway" => Ok(TogglePolicy::OneWay),
            other => Err(format!("unknown toggle policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Completed,
    Reopened,
    /// The policy forbids the transition.
    Unchanged,
    /// No task with that id; stale UI state is tolerated.
    NotFound,
    /// A toggle for this task is already waiting on the backend.
    InFlight,
}

/// Flips the completion flag of task `id` according to `policy`.
pub fn toggle_task(tasks: &mut [TaskTemplate], id: i64, policy: TogglePolicy) -> ToggleOutcome {
    let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
        debug!("Toggle ignored: task {} is not in the collection.", id);
        return ToggleOutcome::NotFound;
    };

    match policy.target_state(task.completed) {
        Some(true) => {
            task.completed = true;
            ToggleOutcome::Completed
        }
        Some(false) => {
            task.completed = false;
            ToggleOutcome::Reopened
        }
        None => ToggleOutcome::Unchanged,
    }
}

/// Sets the completion flag of task `id` outright. Returns false when the
/// task is missing.
pub fn set_completed(tasks: &mut [TaskTemplate], id: i64, completed: bool) -> bool {
    match tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            task.completed = completed;
            true
        }
        None => false,
    }
}

pub fn next_task_id(tasks: &[TaskTemplate]) -> i64 {
    tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
}

/// Appends a user-authored task and returns it. A blank title is rejected
/// and leaves the collection untouched.
pub fn add_custom_task<'a>(
    tasks: &'a mut Vec<TaskTemplate>,
    move_id: i64,
    title: &str,
    bucket: Option<&str>,
) -> Option<&'a TaskTemplate> {
    let title = title.trim();
    if title.is_empty() {
        debug!("Custom task rejected: blank title.");
        return None;
    }

    let task = TaskTemplate {
        id: next_task_id(tasks),
        move_id,
        title: title.to_string(),
        description: String::new(),
        day_offset: None,
        category: Category::Custom,
        priority: Priority::Medium,
        completed: false,
        estimated_time: None,
        bucket: bucket.map(str::to_string),
    };
    tasks.push(task);
    tasks.last()
}
