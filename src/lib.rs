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

//! Amunchain validator keystore and block-states caching core.
//!
//! This crate provides:
//! - ERC-2335 validator keystore decryption and BLS12-381 key binding
//! - A bounded LRU write-through cache of beacon states over a persistent store
//! - Persistent key-value state backing the block-states cache
//! - Monitoring via Prometheus metrics and structured JSON logging

/// Core protocol primitives (deterministic types, persistent state).
pub mod core;
/// ERC-2335 validator keystore decoding and directory scanning.
pub mod keystore;
/// Bounded LRU write-through cache and its binding to beacon states.
pub mod cache;
/// Node configuration, loaded from TOML.
pub mod config;
/// Observability (metrics, structured logging helpers).
pub mod monitoring;
