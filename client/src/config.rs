// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::time::Duration;

use movekit_common::TogglePolicy;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub toggle_policy: TogglePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            toggle_policy: TogglePolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Reads `MOVEKIT_API_URL`, `MOVEKIT_TIMEOUT_SECS` and
    /// `MOVEKIT_TOGGLE_POLICY`. Invalid values keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("MOVEKIT_API_URL").filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup("MOVEKIT_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!("Ignoring invalid MOVEKIT_TIMEOUT_SECS {:?}", raw),
            }
        }

        if let Some(raw) = lookup("MOVEKIT_TOGGLE_POLICY") {
            match raw.parse::<TogglePolicy>() {
                Ok(policy) => config.toggle_policy = policy,
                Err(e) => warn!("Ignoring MOVEKIT_TOGGLE_POLICY: {}", e),
            }
        }

        config
    }
}
