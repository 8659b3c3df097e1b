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

//! A `BTreeMap<u64, K>` ordered by recency token, and the process-wide clock
//! that mints those tokens.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic source of recency tokens. Two concurrent callers observe
/// distinct tokens; ordering across unrelated clocks is not promised.
#[derive(Debug, Default)]
pub struct TokenClock(AtomicU64);

impl TokenClock {
    /// A fresh clock starting at zero.
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Mint the next token.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Recency index: smaller tokens are older. Owned exclusively by the cache
/// coordinator's single-consumer task; not `Sync` in practice since nothing
/// else ever touches it concurrently.
#[derive(Debug, Default)]
pub struct LruIndex<K: Ord + Clone> {
    by_token: BTreeMap<u64, K>,
}

impl<K: Ord + Clone> LruIndex<K> {
    /// An empty index.
    pub fn new() -> Self {
        Self {
            by_token: BTreeMap::new(),
        }
    }

    /// Record `key` as most-recently-touched at `token`.
    pub fn insert(&mut self, token: u64, key: K) {
        self.by_token.insert(token, key);
    }

    /// Remove a specific token, e.g. the previous token of a key being
    /// re-touched.
    pub fn delete(&mut self, token: u64) {
        self.by_token.remove(&token);
    }

    /// Pop and return the `batch_n` oldest `(token, key)` pairs, ascending.
    /// Returns fewer than `batch_n` if the index holds fewer entries.
    pub fn pop_oldest(&mut self, batch_n: usize) -> Vec<(u64, K)> {
        let tokens: Vec<u64> = self.by_token.keys().take(batch_n).copied().collect();
        tokens
            .into_iter()
            .filter_map(|t| self.by_token.remove(&t).map(|k| (t, k)))
            .collect()
    }

    /// Number of entries currently indexed.
    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_yields_distinct_increasing_tokens() {
        let clock = TokenClock::new();
        let a = clock.next();
        let b = clock.next();
        assert!(b > a);
    }

    #[test]
    fn pop_oldest_returns_ascending_tokens() {
        let mut idx = LruIndex::new();
        idx.insert(5, "e");
        idx.insert(1, "a");
        idx.insert(3, "c");
        let popped = idx.pop_oldest(2);
        assert_eq!(popped, vec![(1, "a"), (3, "c")]);
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn pop_oldest_saturates_below_batch_size() {
        let mut idx = LruIndex::new();
        idx.insert(1, "a");
        let popped = idx.pop_oldest(10);
        assert_eq!(popped, vec![(1, "a")]);
        assert!(idx.is_empty());
    }

    #[test]
    fn delete_removes_specific_token() {
        let mut idx = LruIndex::new();
        idx.insert(1, "a");
        idx.insert(2, "b");
        idx.delete(1);
        assert_eq!(idx.pop_oldest(10), vec![(2, "b")]);
    }
}
