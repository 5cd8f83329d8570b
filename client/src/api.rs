// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use async_trait::async_trait;
use movekit_common::{
    ApiResponse, CreateCustomTaskPayload, Move, TaskTemplate, UpdateTaskStatusPayload,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Backend operations the timeline view depends on.
#[async_trait]
pub trait MoveApi: Send + Sync {
    /// The user's moves, newest first.
    async fn get_user_moves(&self) -> Result<Vec<Move>, ClientError>;

    async fn get_timeline_events(&self, move_id: i64) -> Result<Vec<TaskTemplate>, ClientError>;

    /// Persists a completion flag. The backend may echo the updated task.
    async fn update_task_status(
        &self,
        task_id: i64,
        completed: bool,
    ) -> Result<Option<TaskTemplate>, ClientError>;

    async fn create_custom_task(
        &self,
        move_id: i64,
        payload: CreateCustomTaskPayload,
    ) -> Result<TaskTemplate, ClientError>;
}

/// [`MoveApi`] over the JSON routes served by the backend.
#[derive(Debug, Clone)]
pub struct HttpMoveApi {
    client: Client,
    base_url: String,
}

impl HttpMoveApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Unwraps the `{ success, data, message }` envelope.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<Option<T>, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;

    let envelope: ApiResponse<T> = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => return Err(e.into()),
        Err(_) => {
            return Err(ClientError::Remote {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).into_owned(),
            });
        }
    };

    if !envelope.success || !status.is_success() {
        let message = envelope
            .message
            .unwrap_or_else(|| "The request failed.".to_string());
        warn!("Backend reported failure (HTTP {}): {}", status.as_u16(), message);
        return Err(ClientError::Remote {
            status: status.as_u16(),
            message,
        });
    }

    Ok(envelope.data)
}

#[async_trait]
impl MoveApi for HttpMoveApi {
    async fn get_user_moves(&self) -> Result<Vec<Move>, ClientError> {
        debug!("GET /api/moves");
        let response = self.client.get(self.url("/api/moves")).send().await?;
        read_envelope(response)
            .await?
            .ok_or(ClientError::MissingData("get_user_moves"))
    }

    async fn get_timeline_events(&self, move_id: i64) -> Result<Vec<TaskTemplate>, ClientError> {
        debug!("GET /api/moves/{}/timeline", move_id);
        let response = self
            .client
            .get(self.url(&format!("/api/moves/{}/timeline", move_id)))
            .send()
            .await?;
        read_envelope(response)
            .await?
            .ok_or(ClientError::MissingData("get_timeline_events"))
    }

    async fn update_task_status(
        &self,
        task_id: i64,
        completed: bool,
    ) -> Result<Option<TaskTemplate>, ClientError> {
        debug!("PATCH /api/tasks/{} completed={}", task_id, completed);
        let response = self
            .client
            .patch(self.url(&format!("/api/tasks/{}", task_id)))
            .json(&UpdateTaskStatusPayload { completed })
            .send()
            .await?;
        read_envelope(response).await
    }

    async fn create_custom_task(
        &self,
        move_id: i64,
        payload: CreateCustomTaskPayload,
    ) -> Result<TaskTemplate, ClientError> {
        debug!("POST /api/moves/{}/tasks", move_id);
        let response = self
            .client
            .post(self.url(&format!("/api/moves/{}/tasks", move_id)))
            .json(&payload)
            .send()
            .await?;
        read_envelope(response)
            .await?
            .ok_or(ClientError::MissingData("create_custom_task"))
    }
}
