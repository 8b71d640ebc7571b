use crate::data::loader::DatasetId;
use crate::style::opacity::OpacityEncoding;
use crate::Result;
use fxhash::FxBuildHasher;
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;

type EncodingKey = (DatasetId, String);

/// Opacity encodings keyed on dataset identity and dimension key, LRU evicted
pub struct EncodingCache {
    cache: LruCache<EncodingKey, OpacityEncoding, FxBuildHasher>,
    hits: u64,
    misses: u64,
}

impl EncodingCache {
    /// Create a cache holding at most `capacity` encodings (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::with_hasher(capacity, FxBuildHasher::default()),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, dataset: DatasetId, key: &str) -> Option<&OpacityEncoding> {
        self.cache.get(&(dataset, key.to_string()))
    }

    /// Returns the cached encoding or computes and stores it. Failures are not cached.
    pub fn get_or_try_insert(
        &mut self,
        dataset: DatasetId,
        key: &str,
        classify: impl FnOnce() -> Result<OpacityEncoding>,
    ) -> Result<OpacityEncoding> {
        let entry = (dataset, key.to_string());
        if let Some(encoding) = self.cache.get(&entry) {
            self.hits += 1;
            log::debug!("opacity memo hit for #{} {}", dataset, key);
            return Ok(encoding.clone());
        }

        self.misses += 1;
        let encoding = classify()?;
        self.cache.put(entry, encoding.clone());
        Ok(encoding)
    }

    pub fn contains(&self, dataset: DatasetId, key: &str) -> bool {
        self.cache.contains(&(dataset, key.to_string()))
    }

    /// Drops every encoding of datasets other than `current`
    pub fn retain_dataset(&mut self, current: DatasetId) {
        let stale: Vec<EncodingKey> = self
            .cache
            .iter()
            .filter(|((id, _), _)| *id != current)
            .map(|(k, _)| k.clone())
            .collect();
        for key in stale {
            self.cache.pop(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// `(hits, misses)` since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl fmt::Debug for EncodingCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodingCache")
            .field("len", &self.cache.len())
            .field("capacity", &self.cache.cap())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}
