//! In-memory memoization of query results.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::types::MatchResult;

/// Append-only result cache keyed by the raw query line.
///
/// Price lists repeat items (same part under several printer models),
/// so a repeated query inside one run is served from memory instead of
/// hitting the sites again. Entries are never evicted; a process run
/// is the cache's whole lifetime.
#[derive(Clone, Default)]
pub struct MatchCache {
    entries: Arc<RwLock<HashMap<String, MatchResult>>>,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, query: &str) -> Option<MatchResult> {
        self.entries.read().await.get(query).cloned()
    }

    pub async fn insert(&self, query: &str, result: MatchResult) {
        self.entries
            .write()
            .await
            .insert(query.to_string(), result);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
