//! Memoized relatedness lookups.
//!
//! Relatedness is the only latency-bearing lookup in the pipeline. The cache
//! wraps any oracle and can be shared across concurrent requests; entries
//! are plain memoized scores, so no ordering between requests is needed.
//!
//! ## Thread Safety
//!
//! Scores live in a bounded LRU behind a `Mutex`. The lock is never held
//! while the inner oracle is awaited, so two requests missing the same pair
//! at the same time may both call the oracle; the later insert wins, and
//! both values are equal for a deterministic oracle.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lru::LruCache;
use tracing::trace;

use suggest_types::{SuggestError, TopicId};

use crate::ports::Relatedness;

/// Caching decorator for a relatedness oracle.
///
/// Keyed by the ordered `(seed, candidate)` pair and bounded to `capacity`
/// entries, evicting the least recently used. Failures are not cached.
pub struct RelatednessCache {
    inner: Arc<dyn Relatedness>,
    scores: Mutex<LruCache<(TopicId, TopicId), f64>>,
}

impl RelatednessCache {
    /// Wrap an oracle, keeping at most `capacity` scores (minimum 1).
    pub fn new(inner: Arc<dyn Relatedness>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            scores: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Maximum number of cached scores.
    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Number of cached scores.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all cached scores.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<(TopicId, TopicId), f64>> {
        self.scores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Relatedness for RelatednessCache {
    async fn score(&self, seed: TopicId, candidate: TopicId) -> Result<f64, SuggestError> {
        let cached = self.lock().get(&(seed, candidate)).copied();
        if let Some(score) = cached {
            trace!(seed, candidate, "Relatedness cache hit");
            return Ok(score);
        }

        let score = self.inner.score(seed, candidate).await?;
        self.lock().put((seed, candidate), score);
        Ok(score)
    }
}
