// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::net::SocketAddr;

use tracing::warn;

pub const DEFAULT_DB_URL: &str = "sqlite://database/sqlite.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Server settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Reads `DATABASE_URL` and `BIND_ADDR`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_URL.to_string());

        let default_addr: SocketAddr = ([0, 0, 0, 0], 3000).into();
        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring invalid BIND_ADDR {:?}: {}", raw, e);
                default_addr
            }),
            None => default_addr,
        };

        Self {
            database_url,
            bind_addr,
        }
    }
}
