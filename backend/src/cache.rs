//! List-query cache
//!
//! Results are keyed by entity plus a hash of the filter that produced them.
//! A write to an entity drops that entity's entries only.

use std::collections::HashMap;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::config::CacheConfig;

/// Entities whose list queries are cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheEntity {
    Clothes,
    Materials,
    Storage,
}

impl CacheEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheEntity::Clothes => "clothes",
            CacheEntity::Materials => "materials",
            CacheEntity::Storage => "storage",
        }
    }
}

/// Hash a filter into a stable cache key component
pub fn filter_key<F: Serialize + ?Sized>(filter: &F) -> Option<String> {
    let bytes = serde_json::to_vec(filter).ok()?;
    let digest = Sha256::digest(&bytes);
    Some(URL_SAFE_NO_PAD.encode(digest))
}

/// Invalidation epoch of one entity, taken on a miss and handed back to
/// [`ListCache::put`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Outcome of a cache read
pub enum Lookup<T> {
    Hit(T),
    Miss(Generation),
}

#[derive(Default)]
struct Bucket {
    generation: u64,
    values: HashMap<String, serde_json::Value>,
}

pub struct ListCache {
    enabled: bool,
    capacity: usize,
    entries: RwLock<HashMap<CacheEntity, Bucket>>,
}

impl ListCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            enabled: config.enabled && config.capacity > 0,
            capacity: config.capacity,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Read a cached list. A miss carries the generation the caller must pass
    /// to `put` once it has loaded the list.
    pub async fn get<F, T>(&self, entity: CacheEntity, filter: &F) -> Lookup<T>
    where
        F: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        if !self.enabled {
            return Lookup::Miss(Generation(0));
        }
        let entries = self.entries.read().await;
        let Some(bucket) = entries.get(&entity) else {
            return Lookup::Miss(Generation(0));
        };
        let generation = Generation(bucket.generation);
        let Some(key) = filter_key(filter) else {
            return Lookup::Miss(generation);
        };
        let Some(value) = bucket.values.get(&key).cloned() else {
            return Lookup::Miss(generation);
        };
        drop(entries);

        match serde_json::from_value(value) {
            Ok(hit) => {
                tracing::trace!(entity = entity.as_str(), key = %key, "cache hit");
                Lookup::Hit(hit)
            }
            Err(e) => {
                tracing::warn!(entity = entity.as_str(), "discarding unreadable cache entry: {}", e);
                Lookup::Miss(generation)
            }
        }
    }

    /// Store a list loaded after a miss. Dropped when the entity was
    /// invalidated since that miss.
    pub async fn put<F, T>(
        &self,
        entity: CacheEntity,
        filter: &F,
        generation: Generation,
        value: &T,
    )
    where
        F: Serialize + ?Sized,
        T: Serialize,
    {
        if !self.enabled {
            return;
        }
        let (Some(key), Ok(value)) = (filter_key(filter), serde_json::to_value(value)) else {
            return;
        };

        let mut entries = self.entries.write().await;
        let bucket = entries.entry(entity).or_default();
        if bucket.generation != generation.0 {
            tracing::debug!(entity = entity.as_str(), "stale cache fill dropped");
            return;
        }
        if bucket.values.len() >= self.capacity && !bucket.values.contains_key(&key) {
            tracing::debug!(entity = entity.as_str(), "cache bucket full, clearing");
            bucket.values.clear();
        }
        bucket.values.insert(key, value);
    }

    /// Drop every cached list of `entity` and start a new generation
    pub async fn invalidate(&self, entity: CacheEntity) {
        if !self.enabled {
            return;
        }
        let mut entries = self.entries.write().await;
        let bucket = entries.entry(entity).or_default();
        bucket.generation = bucket.generation.wrapping_add(1);
        let dropped = bucket.values.len();
        bucket.values.clear();
        tracing::debug!(entity = entity.as_str(), dropped, "cache invalidated");
    }
}
