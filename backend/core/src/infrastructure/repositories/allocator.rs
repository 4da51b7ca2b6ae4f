// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::repository::{IdAllocator, RepositoryError};

/// Per-collection counters. The first id handed out is 1.
#[derive(Debug, Default)]
pub struct InMemoryIdAllocator {
    counters: DashMap<String, i64>,
}

impl InMemoryIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last id handed out for `collection`, 0 if none
    pub fn current(&self, collection: &str) -> i64 {
        self.counters.get(collection).map_or(0, |v| *v)
    }
}

#[async_trait]
impl IdAllocator for InMemoryIdAllocator {
    async fn next_id(&self, collection: &str) -> Result<i64, RepositoryError> {
        // The entry guard holds the shard lock, so read-increment-read is atomic
        let mut counter = self.counters.entry(collection.to_string()).or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| RepositoryError::Storage(format!("id space exhausted for {}", collection)))?;
        Ok(*counter)
    }
}
