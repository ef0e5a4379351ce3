use std::collections::HashMap;

use chrono_tz::Tz;
use log::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::data::aggregate::aggregate_file;
use crate::data::error::FileError;
use crate::data::loader::parse_csv_bytes;
use crate::data::model::{FileAggregate, SourceFormat};

// ---------------------------------------------------------------------------
// Aggregation cache
// ---------------------------------------------------------------------------

/// Everything a file's aggregate depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// xxh3 of the raw file bytes.
    pub content_hash: u64,
    pub zone: String,
    pub format: SourceFormat,
}

impl CacheKey {
    pub fn new(bytes: &[u8], zone: Tz, format: SourceFormat) -> Self {
        CacheKey {
            content_hash: xxh3_64(bytes),
            zone: zone.name().to_string(),
            format,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoizes parse + aggregate per file.
///
/// Failures are stored like successes: both are pure functions of the key.
/// Entries are never evicted individually; the owner calls [`clear`] when a
/// new batch of files replaces the session.
///
/// [`clear`]: AggregateCache::clear
#[derive(Debug, Default)]
pub struct AggregateCache {
    entries: HashMap<CacheKey, Result<FileAggregate, FileError>>,
    stats: CacheStats,
}

impl AggregateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the aggregate of `bytes`, computing it on first use.
    pub fn get_or_aggregate(
        &mut self,
        bytes: &[u8],
        zone: Tz,
        format: SourceFormat,
    ) -> Result<FileAggregate, FileError> {
        let key = CacheKey::new(bytes, zone, format);
        if let Some(hit) = self.entries.get(&key) {
            self.stats.hits += 1;
            debug!("Cache hit for {:016x}", key.content_hash);
            return hit.clone();
        }

        self.stats.misses += 1;
        debug!("Cache miss for {:016x}", key.content_hash);
        let outcome = parse_csv_bytes(bytes, format)
            .and_then(|table| aggregate_file(&table, zone, format.decimal));
        self.entries.insert(key, outcome.clone());
        outcome
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&mut self) {
        debug!("Clearing {} cached aggregates", self.entries.len());
        self.entries.clear();
    }
}
