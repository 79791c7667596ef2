// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::types::PageSize;

/// Name of the config file inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// WebSocket endpoint of the notification bus.
    pub bus_endpoint: String,
    /// Fixed identity sent in the CONNECT frame (`userCode` header).
    pub bus_user_code: String,
    /// The single topic the listener subscribes to.
    pub bus_topic: String,
    /// Page geometry used when the UI has not set one yet.
    pub default_page_size: PageSize,
    /// Ceiling on captured shell output, in bytes. A query whose captured
    /// stdout exceeds this is rejected instead of being passed downstream.
    pub shell_output_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bus_endpoint: "ws://192.168.2.170:8082/pms/endpoint".into(),
            bus_user_code: "218817272071061505".into(),
            bus_topic: "/user/bubble".into(),
            default_page_size: PageSize::DEFAULT,
            shell_output_limit: 8 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Load the config from `dir/config.json`, falling back to defaults when
    /// the file is missing or unreadable.
    pub fn load_or_default(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        std::fs::read_to_string(&path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    /// Persist the config as pretty-printed JSON.
    pub fn persist(&self, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}
