// Copyright (c) 2026 Amunchain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Node configuration root, loaded from TOML.
//!
//! Layered the way `core::types::NodeConfig` lays out per-subsystem structs:
//! a top-level struct composed of independently deserializable pieces, each
//! carrying its own defaults via `#[serde(default)]`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::cache::coordinator::CacheLimits;

/// Configuration load/parse errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file")]
    Read,
    #[error("parse config toml")]
    Parse,
}

/// Node configuration root.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Where the validator keystore and block-states database live.
    pub node: NodeSettings,
    /// Limits for the in-memory block-states cache.
    #[serde(default = "CacheLimits::block_states_default")]
    pub block_states_cache: CacheLimits,
    /// Metrics HTTP listen address, e.g. `0.0.0.0:9100`.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Node-level directories.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Human-readable name.
    pub name: String,
    /// Directory containing `<name>.json` validator keystores.
    pub keystore_dir: String,
    /// Directory containing `<name>.txt` password files, one per keystore.
    pub password_dir: String,
    /// Directory for the sled-backed state database.
    pub state_dir: String,
}

/// Metrics endpoint configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Listen address for the `/metrics` endpoint.
    #[serde(default = "default_metrics_addr")]
    pub listen_addr: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_metrics_addr(),
        }
    }
}

fn default_metrics_addr() -> String {
    "127.0.0.1:9100".to_string()
}

impl NodeConfig {
    /// Load and parse a TOML config file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::Read)?;
        toml::from_str(&raw).map_err(|_| ConfigError::Parse)
    }
}
