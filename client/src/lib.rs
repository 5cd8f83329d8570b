// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Client side of the move timeline: talks to the backend through
//! [`MoveApi`] and keeps the view state in a [`TimelineSession`].

pub mod api;
pub mod config;
pub mod error;
pub mod fixture;
pub mod session;

pub use api::{HttpMoveApi, MoveApi};
pub use config::ClientConfig;
pub use error::ClientError;
pub use fixture::FixtureMoveApi;
pub use session::{TaskView, TimelineSession};
