//! # Read Cache
//!
//! Listing a paste means walking its working tree and reading every file.
//! Pastes are read far more often than they change, so the registry keeps
//! the last computed listing per paste id and serves it until the next
//! mutation invalidates it.
//!
//! Two contract points matter to callers:
//!
//! - An empty listing is never served from the cache. Readers cannot tell
//!   an absent entry from a cached-empty one, and recomputing an empty
//!   directory listing costs nothing, so empty entries count as misses.
//! - Population happens inside the paste's read lock (see the registry).
//!   A `put` that raced with a mutation would otherwise be able to land
//!   *after* that mutation's `invalidate` and pin a stale listing
//!   forever.

use crate::model::FileRecord;
use dashmap::DashMap;
use uuid::Uuid;

/// Concurrent map from paste id to its last computed file listing.
///
/// All methods are safe to call from any thread without external
/// locking; the map shards internally.
#[derive(Debug, Default)]
pub struct ReadCache {
    entries: DashMap<Uuid, Vec<FileRecord>>,
}

impl ReadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached listing for `id`, or `None` when absent or cached empty.
    pub fn get(&self, id: &Uuid) -> Option<Vec<FileRecord>> {
        self.entries
            .get(id)
            .map(|entry| entry.value().clone())
            .filter(|records| !records.is_empty())
    }

    /// Stores `records` for `id` and hands them back to the caller.
    pub fn put(&self, id: Uuid, records: Vec<FileRecord>) -> Vec<FileRecord> {
        self.entries.insert(id, records.clone());
        records
    }

    /// Drops the entry for `id`. Absent entries are ignored.
    pub fn invalidate(&self, id: &Uuid) {
        self.entries.remove(id);
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, id: &Uuid) -> bool {
        self.entries.contains_key(id)
    }
}
