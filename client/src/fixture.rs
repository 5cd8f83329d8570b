// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use movekit_common::{catalog, mutation, CreateCustomTaskPayload, Move, TaskTemplate};
use parking_lot::RwLock;
use tracing::debug;

use crate::api::MoveApi;
use crate::error::ClientError;

/// In-memory [`MoveApi`] seeded from fixture data, for the offline view.
///
/// It can be switched offline to make every call fail like an unreachable
/// backend would.
#[derive(Debug, Default)]
pub struct FixtureMoveApi {
    moves: RwLock<Vec<Move>>,
    tasks: RwLock<Vec<TaskTemplate>>,
    offline: AtomicBool,
    update_calls: AtomicUsize,
}

impl FixtureMoveApi {
    pub fn new(moves: Vec<Move>, tasks: Vec<TaskTemplate>) -> Self {
        Self {
            moves: RwLock::new(moves),
            tasks: RwLock::new(tasks),
            ..Self::default()
        }
    }

    /// One move on `move_date` (id 1) carrying the whole catalog.
    pub fn seeded(move_date: NaiveDate) -> Self {
        let fixture_move = Move {
            id: 1,
            title: "My move".to_string(),
            from_address: None,
            to_address: None,
            move_date,
            created_at: Utc::now(),
        };
        Self::new(vec![fixture_move], catalog::seed_tasks(1, 1))
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `update_task_status` calls received, failed ones included.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Backend-side copy of a task, bypassing any session.
    pub fn stored_task(&self, task_id: i64) -> Option<TaskTemplate> {
        self.tasks.read().iter().find(|t| t.id == task_id).cloned()
    }

    /// Deletes a task on the backend side, as another client would.
    pub fn remove_task(&self, task_id: i64) -> bool {
        let mut tasks = self.tasks.write();
        let before = tasks.len();
        tasks.retain(|t| t.id != task_id);
        tasks.len() != before
    }

    fn check_online(&self) -> Result<(), ClientError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Remote {
                status: 503,
                message: "The server is unavailable.".to_string(),
            });
        }
        Ok(())
    }
}

fn not_found(what: &str, id: i64) -> ClientError {
    ClientError::Remote {
        status: 404,
        message: format!("{} with ID {} not found.", what, id),
    }
}

#[async_trait]
impl MoveApi for FixtureMoveApi {
    async fn get_user_moves(&self) -> Result<Vec<Move>, ClientError> {
        self.check_online()?;
        let mut moves = self.moves.read().clone();
        moves.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(moves)
    }

    async fn get_timeline_events(&self, move_id: i64) -> Result<Vec<TaskTemplate>, ClientError> {
        self.check_online()?;
        if !self.moves.read().iter().any(|m| m.id == move_id) {
            return Err(not_found("Move", move_id));
        }
        let mut tasks: Vec<TaskTemplate> = self
            .tasks
            .read()
            .iter()
            .filter(|t| t.move_id == move_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.day_offset.is_none(), t.day_offset, t.id));
        Ok(tasks)
    }

    async fn update_task_status(
        &self,
        task_id: i64,
        completed: bool,
    ) -> Result<Option<TaskTemplate>, ClientError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        let mut tasks = self.tasks.write();
        if !mutation::set_completed(&mut tasks, task_id, completed) {
            return Err(not_found("Task", task_id));
        }
        debug!("Fixture task {} set to completed={}", task_id, completed);
        Ok(tasks.iter().find(|t| t.id == task_id).cloned())
    }

    async fn create_custom_task(
        &self,
        move_id: i64,
        payload: CreateCustomTaskPayload,
    ) -> Result<TaskTemplate, ClientError> {
        self.check_online()?;
        if !self.moves.read().iter().any(|m| m.id == move_id) {
            return Err(not_found("Move", move_id));
        }
        if let Some(bucket) = payload.bucket.as_deref().filter(|b| !catalog::is_known_bucket(b)) {
            return Err(ClientError::Remote {
                status: 400,
                message: format!("Unknown bucket: {}.", bucket),
            });
        }

        let mut tasks = self.tasks.write();
        mutation::add_custom_task(&mut tasks, move_id, &payload.title, payload.bucket.as_deref())
            .cloned()
            .ok_or_else(|| ClientError::Remote {
                status: 400,
                message: "Task title cannot be empty.".to_string(),
            })
    }
}
