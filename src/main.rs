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

//! Amunchain node entrypoint (systemd-friendly).
//! Loads validator keystores, brings up the block-states cache, serves
//! metrics, and waits for a shutdown signal.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use amunchain::cache::block_states::{BlockStatesCache, StateStore};
use amunchain::config::NodeConfig;
use amunchain::keystore;
use amunchain::monitoring::metrics::Metrics;
use amunchain::monitoring::serve::serve_metrics;

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .compact()
        .try_init();

    let config_path = env("AMUN_CONFIG", "./amunchain.toml");
    let config = match NodeConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load config at {config_path}: {e}");
            std::process::exit(1);
        }
    };

    info!(node = %config.node.name, "amunchain node starting");

    let metrics = Arc::new(Metrics::new().expect("metrics init failed"));

    let metrics_for_server = metrics.clone();
    let metrics_addr = config.metrics.listen_addr.clone();
    let metrics_task = tokio::spawn(async move {
        if let Err(e) = serve_metrics(&metrics_addr, metrics_for_server).await {
            error!(?e, "metrics server exited");
        }
    });

    let report = match keystore::scan_dir(
        Path::new(&config.node.keystore_dir),
        Path::new(&config.node.password_dir),
    ) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("failed to scan keystore directory: {e}");
            std::process::exit(1);
        }
    };

    metrics
        .keystore_decode_success_total
        .inc_by(report.records.len() as u64);
    metrics
        .keystore_decode_failures_total
        .inc_by(report.failures.len() as u64);

    for failure in &report.failures {
        warn!(path = %failure.keystore_path.display(), error = %failure.error, "keystore rejected");
    }
    info!(decoded = report.records.len(), rejected = report.failures.len(), "keystore scan complete");

    let store = match StateStore::open(&config.node.state_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("failed to open state store at {}: {e}", config.node.state_dir);
            std::process::exit(1);
        }
    };
    let _block_states = BlockStatesCache::new(store, Some(metrics.clone()));

    info!("amunchain node ready");

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => error!(?e, "failed to listen for shutdown signal"),
    }

    metrics_task.abort();
}
