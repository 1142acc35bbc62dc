use crate::models::{MenteeProfile, MentorProfile};
use crate::services::store::{ProfileStore, StoreError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Multi-tier cache manager
///
/// Implements L1 (in-memory) and L2 (Redis) caching strategy.
/// L1 is fastest but limited in size, L2 is shared across instances.
/// Without a Redis URL the manager runs on L1 alone.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a new cache manager, connecting to Redis when a URL is given
    pub async fn new(redis_url: Option<&str>, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let redis = match redis_url {
            Some(url) => {
                let client = redis::Client::open(url)?;
                let manager = ConnectionManager::new(client).await?;
                Some(Arc::new(tokio::sync::Mutex::new(manager)))
            }
            None => None,
        };

        Ok(Self {
            redis,
            l1_cache: build_l1(l1_size, ttl_secs),
            ttl_secs,
        })
    }

    /// Create an L1-only cache manager
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            redis: None,
            l1_cache: build_l1(l1_size, ttl_secs),
            ttl_secs,
        }
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        // Try L1 cache first
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let value: Option<String> = redis::cmd("GET")
                .arg(key)
                .query_async(&mut *conn)
                .await?;
            drop(conn);

            if let Some(json) = value {
                tracing::trace!("L2 cache hit: {}", key);

                // Populate L1 cache
                self.l1_cache
                    .insert(key.to_string(), json.as_bytes().to_vec())
                    .await;

                return Ok(serde_json::from_str(&json)?);
            }
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache (both L1 and L2)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        // L1 uses the TTL configured on the cache itself
        self.l1_cache
            .insert(key.to_string(), json.as_bytes().to_vec())
            .await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let _: () = redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async(&mut *conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
            redis_enabled: self.redis.is_some(),
            ttl_secs: self.ttl_secs,
        }
    }
}

fn build_l1(l1_size: u64, ttl_secs: u64) -> moka::future::Cache<String, Vec<u8>> {
    moka::future::CacheBuilder::new(l1_size)
        .time_to_live(Duration::from_secs(ttl_secs))
        .build()
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    #[serde(rename = "l1Size")]
    pub l1_size: u64,
    #[serde(rename = "redisEnabled")]
    pub redis_enabled: bool,
    #[serde(rename = "ttlSecs")]
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a mentee profile
    pub fn mentee(mentee_id: &str) -> String {
        format!("mentee:{}", mentee_id)
    }

    /// Build a cache key for a mentor profile
    pub fn mentor(mentor_id: &str) -> String {
        format!("mentor:{}", mentor_id)
    }

    /// Build a cache key for the mentors of an area
    pub fn area_mentors(area_id: &str) -> String {
        format!("area_mentors:{}", area_id)
    }
}

/// Read-through cache in front of another profile store
///
/// Only successful lookups are cached. Cache failures are logged and the
/// inner store answers instead.
pub struct CachedProfileStore<S> {
    inner: S,
    cache: Arc<CacheManager>,
}

impl<S: ProfileStore> CachedProfileStore<S> {
    pub fn new(inner: S, cache: Arc<CacheManager>) -> Self {
        Self { inner, cache }
    }

    async fn read_through<T, F, Fut>(&self, key: String, fetch: F) -> Result<T, StoreError>
    where
        T: Serialize + for<'de> Deserialize<'de> + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, StoreError>> + Send,
    {
        match self.cache.get::<T>(&key).await {
            Ok(value) => return Ok(value),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Cache read failed for {}, using store: {}", key, e),
        }

        let value = fetch().await?;

        if let Err(e) = self.cache.set(&key, &value).await {
            tracing::warn!("Failed to cache {}: {}", key, e);
        }

        Ok(value)
    }
}

#[async_trait]
impl<S: ProfileStore> ProfileStore for CachedProfileStore<S> {
    async fn get_mentee(&self, mentee_id: &str) -> Result<MenteeProfile, StoreError> {
        self.read_through(CacheKey::mentee(mentee_id), || self.inner.get_mentee(mentee_id))
            .await
    }

    async fn get_mentor(&self, mentor_id: &str) -> Result<MentorProfile, StoreError> {
        self.read_through(CacheKey::mentor(mentor_id), || self.inner.get_mentor(mentor_id))
            .await
    }

    async fn list_mentors(&self, area_id: &str) -> Result<Vec<MentorProfile>, StoreError> {
        self.read_through(CacheKey::area_mentors(area_id), || self.inner.list_mentors(area_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::InMemoryProfileStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store wrapper counting how often the inner store is consulted
    struct CountingStore {
        inner: InMemoryProfileStore,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProfileStore for CountingStore {
        async fn get_mentee(&self, mentee_id: &str) -> Result<MenteeProfile, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_mentee(mentee_id).await
        }

        async fn get_mentor(&self, mentor_id: &str) -> Result<MentorProfile, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get_mentor(mentor_id).await
        }

        async fn list_mentors(&self, area_id: &str) -> Result<Vec<MentorProfile>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_mentors(area_id).await
        }
    }

    fn cached_store() -> (CachedProfileStore<CountingStore>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = InMemoryProfileStore::new()
            .with_mentee(MenteeProfile::new("u1", vec!["rust".into()]))
            .with_mentor(
                &["backend"],
                MentorProfile::new("m1", vec!["Rust".into()]).with_rating(4.5),
            );
        let store = CachedProfileStore::new(
            CountingStore { inner, calls: calls.clone() },
            Arc::new(CacheManager::in_memory(100, 60)),
        );
        (store, calls)
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_cache_set_get() {
        let cache = CacheManager::new(Some("redis://127.0.0.1:6379"), 1000, 60)
            .await
            .expect("Failed to create cache");

        let key = "test_key";
        let value = "test_value";

        cache.set(key, &value).await.unwrap();
        let result: String = cache.get(key).await.unwrap();
        assert_eq!(result, value);
    }

    #[tokio::test]
    async fn test_in_memory_set_get() {
        let cache = CacheManager::in_memory(10, 60);

        cache.set("k", &vec![1u32, 2, 3]).await.unwrap();
        let value: Vec<u32> = cache.get("k").await.unwrap();
        assert_eq!(value, vec![1, 2, 3]);

        assert!(matches!(
            cache.get::<Vec<u32>>("missing").await,
            Err(CacheError::CacheMiss(_))
        ));
        assert!(!cache.stats().redis_enabled);
    }

    #[tokio::test]
    async fn test_read_through_hits_store_once() {
        let (store, calls) = cached_store();

        let first = store.list_mentors("backend").await.unwrap();
        let second = store.list_mentors("backend").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second[0].rating, Some(4.5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        store.get_mentee("u1").await.unwrap();
        store.get_mentee("u1").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let (store, calls) = cached_store();

        assert!(store.get_mentee("ghost").await.is_err());
        assert!(store.get_mentee("ghost").await.is_err());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::mentee("user123"), "mentee:user123");
        assert_eq!(CacheKey::mentor("m1"), "mentor:m1");
        assert_eq!(CacheKey::area_mentors("web"), "area_mentors:web");
    }
}
