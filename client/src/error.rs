// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
/// Failures crossing the backend boundary.
///
/// Domain no-ops (unknown task, blank title, forbidden transition) are not
/// errors; they are reported through return values instead.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Server error: HTTP {status} - {message}")]
    Remote { status: u16, message: String },

    #[error("Response to {0} carried no data")]
    MissingData(&'static str),
}

impl ClientError {
    /// Message suitable for a transient user notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Remote { message, .. } => message.clone(),
            ClientError::Http(_) => "Could not reach the server. Please try again.".to_string(),
            ClientError::Decode(_) | ClientError::MissingData(_) => {
                "The server sent an unexpected response.".to_string()
            }
        }
    }
}
