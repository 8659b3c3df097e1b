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

use prometheus::{IntCounter, IntGauge, Registry};
use thiserror::Error;

/// Metrics errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus")]
    Prom,
}

/// Metrics container, shared via `Arc` between the keystore loader, the
/// cache coordinator and the `/metrics` HTTP endpoint.
#[derive(Clone)]
pub struct Metrics {
    /// Registry.
    pub registry: Registry,

    /// Cache hits across all `Cache` instances.
    pub cache_hits_total: IntCounter,
    /// Cache misses across all `Cache` instances.
    pub cache_misses_total: IntCounter,
    /// Entries evicted by the LRU pruner.
    pub cache_evictions_total: IntCounter,
    /// Current number of live entries in the block-states cache.
    pub block_states_cache_size: IntGauge,

    /// Keystore files that failed to decode during a directory scan.
    pub keystore_decode_failures_total: IntCounter,
    /// Keystore files decoded successfully during a directory scan.
    pub keystore_decode_success_total: IntCounter,
}

impl Metrics {
    /// Create and register metrics.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let cache_hits_total = IntCounter::new("amunchain_cache_hits_total", "Cache hits")
            .map_err(|_| MetricsError::Prom)?;
        let cache_misses_total = IntCounter::new("amunchain_cache_misses_total", "Cache misses")
            .map_err(|_| MetricsError::Prom)?;
        let cache_evictions_total = IntCounter::new(
            "amunchain_cache_evictions_total",
            "Entries evicted by the LRU pruner",
        )
        .map_err(|_| MetricsError::Prom)?;
        let block_states_cache_size = IntGauge::new(
            "amunchain_block_states_cache_size",
            "Live entries in the block-states cache",
        )
        .map_err(|_| MetricsError::Prom)?;

        let keystore_decode_failures_total = IntCounter::new(
            "amunchain_keystore_decode_failures_total",
            "Keystore files that failed to decode",
        )
        .map_err(|_| MetricsError::Prom)?;
        let keystore_decode_success_total = IntCounter::new(
            "amunchain_keystore_decode_success_total",
            "Keystore files decoded successfully",
        )
        .map_err(|_| MetricsError::Prom)?;

        registry
            .register(Box::new(cache_hits_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(cache_misses_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(cache_evictions_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(block_states_cache_size.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(keystore_decode_failures_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(keystore_decode_success_total.clone()))
            .map_err(|_| MetricsError::Prom)?;

        Ok(Self {
            registry,
            cache_hits_total,
            cache_misses_total,
            cache_evictions_total,
            block_states_cache_size,
            keystore_decode_failures_total,
            keystore_decode_success_total,
        })
    }
}
