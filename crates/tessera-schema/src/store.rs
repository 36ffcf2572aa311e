use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::types::{SchemaExtraction, SchemaProvider};

/// Time source for cache staleness checks
///
/// Injectable so TTL expiry can be tested without sleeping
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    extraction: SchemaExtraction,
    stored_at: Instant,
}

/// Process-wide cache of schema extractions keyed by (provider, model id)
///
/// Entries are replaced wholesale on refetch, never merged. Concurrent
/// lookups during a refresh may both miss and fetch independently; that
/// duplicate work is tolerated.
pub struct SchemaStore {
    entries: DashMap<(SchemaProvider, String), CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SchemaStore {
    /// Create a store with the given TTL and the system clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a store with an explicit clock
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Look up a cached extraction
    ///
    /// A hit requires the entry to be strictly younger than the TTL;
    /// anything older is treated as absent and the caller must refetch
    pub fn lookup(&self, provider: SchemaProvider, model_id: &str) -> Option<SchemaExtraction> {
        let entry = self.entries.get(&(provider, model_id.to_owned()))?;
        let age = self.clock.now().duration_since(entry.stored_at);
        (age < self.ttl).then(|| entry.extraction.clone())
    }

    /// Store an extraction, superseding any previous entry
    pub fn store(&self, provider: SchemaProvider, model_id: String, extraction: SchemaExtraction) {
        self.entries.insert(
            (provider, model_id),
            CacheEntry {
                extraction,
                stored_at: self.clock.now(),
            },
        );
    }
}
