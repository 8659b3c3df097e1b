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

//! Generic bounded LRU write-through cache actor.
//!
//! A `DashMap` data table is readable by any number of concurrent readers;
//! all mutations (inserts, touches, prunes) are serialized through a single
//! consumer task reached over an `mpsc` channel, matching the teacher's
//! actor-style task dispatch elsewhere in this codebase.

use std::collections::hash_map::RandomState;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::lru_index::{LruIndex, TokenClock};
use crate::monitoring::metrics::Metrics;

/// A boxed, owned future, matching this crate's async trait-object convention.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Write-through persistence callback invoked on every `put`.
pub type StoreFn<K, V> = Arc<dyn Fn(K, V) -> BoxFuture<Result<(), String>> + Send + Sync>;

/// Miss-path fetch callback invoked by `get` when the cache does not hold `K`.
pub type FetchFn<K, V> = Arc<dyn Fn(K) -> BoxFuture<Result<Option<V>, String>> + Send + Sync>;

/// Cache coordinator errors.
#[derive(Debug, Error, Clone)]
pub enum CacheError {
    /// The injected `store_func` returned an error; the cache was not mutated.
    #[error("store function failed: {0}")]
    StoreFault(String),
    /// The coordinator actor task is no longer running.
    #[error("cache actor shut down")]
    ActorShutDown,
}

/// Bound and pruning parameters, independently deserializable from TOML.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheLimits {
    /// Entries above which a prune is triggered.
    #[serde(default = "CacheLimits::default_max_entries")]
    pub max_entries: usize,
    /// How many extra entries a prune removes beyond the overflow, to
    /// amortize pruning cost over subsequent puts.
    #[serde(default = "CacheLimits::default_batch_prune_size")]
    pub batch_prune_size: usize,
}

impl CacheLimits {
    fn default_max_entries() -> usize {
        512
    }

    fn default_batch_prune_size() -> usize {
        32
    }

    /// Defaults used by the block-states facade: a much smaller bound since
    /// entries are full beacon-state blobs.
    pub fn block_states_default() -> Self {
        Self {
            max_entries: 128,
            batch_prune_size: 16,
        }
    }
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            max_entries: Self::default_max_entries(),
            batch_prune_size: Self::default_batch_prune_size(),
        }
    }
}

const CACHE_CHANNEL_CAPACITY: usize = 256;

enum Message<K, V> {
    Put {
        key: K,
        value: V,
        reply: oneshot::Sender<Result<(), CacheError>>,
    },
    InsertFromMiss {
        key: K,
        value: V,
        reply: oneshot::Sender<()>,
    },
    Touch {
        key: K,
    },
}

type Table<K, V> = Arc<DashMap<K, (V, u64), RandomState>>;

/// A bounded LRU write-through cache over keys `K` and values `V`.
///
/// Cloning a `Cache` is cheap: it shares the data table and the sender half
/// of the actor channel.
pub struct Cache<K, V> {
    data: Table<K, V>,
    tx: mpsc::Sender<Message<K, V>>,
    fetch_func: FetchFn<K, V>,
    metrics: Option<Arc<Metrics>>,
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            tx: self.tx.clone(),
            fetch_func: self.fetch_func.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Ord + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Construct a cache and spawn its single-consumer coordinator task.
    pub fn new(
        limits: CacheLimits,
        store_func: StoreFn<K, V>,
        fetch_func: FetchFn<K, V>,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        let data: Table<K, V> = Arc::new(DashMap::new());
        let (tx, rx) = mpsc::channel(CACHE_CHANNEL_CAPACITY);

        tokio::spawn(run_coordinator(
            rx,
            data.clone(),
            store_func,
            limits,
            metrics.clone(),
        ));

        Self {
            data,
            tx,
            fetch_func,
            metrics,
        }
    }

    /// Write `value` through to the backing store, then admit it into the
    /// cache, pruning if the bound is exceeded.
    pub async fn put(&self, key: K, value: V) -> Result<(), CacheError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Message::Put {
                key,
                value,
                reply,
            })
            .await
            .map_err(|_| CacheError::ActorShutDown)?;
        rx.await.map_err(|_| CacheError::ActorShutDown)?
    }

    /// Look up `key`. On a hit, asynchronously records a recency touch and
    /// returns immediately. On a miss, invokes the injected fetch function;
    /// a `Some` result is admitted into the cache (without a write-through
    /// store), a `None` result is not cached.
    pub async fn get(&self, key: K) -> Result<Option<V>, CacheError> {
        if let Some(entry) = self.data.get(&key) {
            let value = entry.value().0.clone();
            drop(entry);
            let _ = self.tx.try_send(Message::Touch { key });
            if let Some(metrics) = &self.metrics {
                metrics.cache_hits_total.inc();
            }
            return Ok(Some(value));
        }

        if let Some(metrics) = &self.metrics {
            metrics.cache_misses_total.inc();
        }

        match (self.fetch_func)(key.clone()).await {
            Ok(Some(value)) => {
                let (reply, rx) = oneshot::channel();
                self.tx
                    .send(Message::InsertFromMiss {
                        key,
                        value: value.clone(),
                        reply,
                    })
                    .await
                    .map_err(|_| CacheError::ActorShutDown)?;
                rx.await.map_err(|_| CacheError::ActorShutDown)?;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(CacheError::StoreFault(e)),
        }
    }

    /// Number of entries currently resident (may be stale the instant it is
    /// read, since the data table is concurrently mutated).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

async fn run_coordinator<K, V>(
    mut rx: mpsc::Receiver<Message<K, V>>,
    data: Table<K, V>,
    store_func: StoreFn<K, V>,
    limits: CacheLimits,
    metrics: Option<Arc<Metrics>>,
) where
    K: Eq + Hash + Ord + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    let mut lru: LruIndex<K> = LruIndex::new();
    let clock = TokenClock::new();

    while let Some(msg) = rx.recv().await {
        match msg {
            Message::Put { key, value, reply } => {
                if let Err(e) = store_func(key.clone(), value.clone()).await {
                    let _ = reply.send(Err(CacheError::StoreFault(e)));
                    continue;
                }
                admit(&data, &mut lru, &clock, key, value, &limits, &metrics);
                let _ = reply.send(Ok(()));
            }
            Message::InsertFromMiss { key, value, reply } => {
                admit(&data, &mut lru, &clock, key, value, &limits, &metrics);
                let _ = reply.send(());
            }
            Message::Touch { key } => {
                if let Some(mut entry) = data.get_mut(&key) {
                    let old_token = entry.1;
                    let new_token = clock.next();
                    entry.1 = new_token;
                    drop(entry);
                    lru.delete(old_token);
                    lru.insert(new_token, key);
                }
            }
        }
    }
}

fn admit<K, V>(
    data: &Table<K, V>,
    lru: &mut LruIndex<K>,
    clock: &TokenClock,
    key: K,
    value: V,
    limits: &CacheLimits,
    metrics: &Option<Arc<Metrics>>,
) where
    K: Eq + Hash + Ord + Clone,
{
    let new_token = clock.next();
    let previous = data.insert(key.clone(), (value, new_token));
    if let Some((_, old_token)) = previous {
        lru.delete(old_token);
    }
    lru.insert(new_token, key);

    if data.len() > limits.max_entries {
        let overflow = data.len() - limits.max_entries;
        let to_evict = overflow + limits.batch_prune_size;
        let evicted = lru.pop_oldest(to_evict);
        for (_, k) in &evicted {
            data.remove(k);
        }
        if let Some(metrics) = metrics {
            metrics.cache_evictions_total.inc_by(evicted.len() as u64);
        }
    }

    if let Some(metrics) = metrics {
        metrics.block_states_cache_size.set(data.len() as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop_store() -> StoreFn<u64, u64> {
        Arc::new(|_k, _v| Box::pin(async { Ok(()) }))
    }

    fn always_miss() -> FetchFn<u64, u64> {
        Arc::new(|_k| Box::pin(async { Ok(None) }))
    }

    #[tokio::test]
    async fn put_then_get_observes_the_write() {
        let cache: Cache<u64, u64> = Cache::new(
            CacheLimits {
                max_entries: 4,
                batch_prune_size: 1,
            },
            noop_store(),
            always_miss(),
            None,
        );
        cache.put(1, 100).await.unwrap();
        assert_eq!(cache.get(1).await.unwrap(), Some(100));
    }

    #[tokio::test]
    async fn store_failure_aborts_put_without_mutating_cache() {
        let store: StoreFn<u64, u64> = Arc::new(|_k, _v| Box::pin(async { Err("disk full".to_string()) }));
        let cache: Cache<u64, u64> = Cache::new(
            CacheLimits {
                max_entries: 4,
                batch_prune_size: 1,
            },
            store,
            always_miss(),
            None,
        );
        let err = cache.put(1, 100).await.unwrap_err();
        assert!(matches!(err, CacheError::StoreFault(_)));
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn overflow_evicts_oldest_entries_first() {
        let cache: Cache<u64, u64> = Cache::new(
            CacheLimits {
                max_entries: 2,
                batch_prune_size: 1,
            },
            noop_store(),
            always_miss(),
            None,
        );
        for i in 0..5u64 {
            cache.put(i, i).await.unwrap();
        }
        // Bound is max_entries + batch_prune_size - 1 between prunes; the
        // oldest keys (0, 1) must be gone, the newest (4) must remain.
        assert_eq!(cache.get(0).await.unwrap(), None);
        assert_eq!(cache.get(4).await.unwrap(), Some(4));
        assert!(cache.len() <= 2 + 1);
    }

    #[tokio::test]
    async fn miss_then_fetch_hit_populates_cache_without_store_func() {
        let store_calls = Arc::new(AtomicUsize::new(0));
        let store_calls_clone = store_calls.clone();
        let store: StoreFn<u64, u64> = Arc::new(move |_k, _v| {
            let counter = store_calls_clone.clone();
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok(()) })
        });
        let fetch: FetchFn<u64, u64> = Arc::new(|k| Box::pin(async move { Ok(Some(k * 10)) }));

        let cache: Cache<u64, u64> = Cache::new(
            CacheLimits {
                max_entries: 4,
                batch_prune_size: 1,
            },
            store,
            fetch,
            None,
        );

        assert_eq!(cache.get(7).await.unwrap(), Some(70));
        assert_eq!(store_calls.load(Ordering::SeqCst), 0);
        assert_eq!(cache.get(7).await.unwrap(), Some(70));
    }

    #[tokio::test]
    async fn negative_fetch_result_is_not_cached() {
        let cache: Cache<u64, u64> = Cache::new(
            CacheLimits {
                max_entries: 4,
                batch_prune_size: 1,
            },
            noop_store(),
            always_miss(),
            None,
        );
        assert_eq!(cache.get(9).await.unwrap(), None);
        assert_eq!(cache.len(), 0);
    }
}
