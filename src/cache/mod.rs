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

//! Bounded LRU write-through cache: a single-writer/many-reader actor over a
//! generic key-value store, and its binding to beacon block states.

/// Recency-ordered index over cached keys.
pub mod lru_index;
/// The generic single-writer/many-reader cache actor.
pub mod coordinator;
/// Binding of the cache to the beacon-state domain and `sled` store.
pub mod block_states;
