//! Cache-aside wrapper around an externally supplied embedder.

use async_trait::async_trait;
use tracing::debug;

use crate::Result;

use super::key::CacheKey;
use super::store::{BoundedCache, CacheConfig, CacheStats};

/// The single capability the external embedding service must supply.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Turn `text` into a vector. May fail, may have arbitrary latency.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Adapter so a plain async closure can serve as an [`Embedder`].
pub struct FnEmbedder<F>(F);

impl<F> FnEmbedder<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> Embedder for FnEmbedder<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<Vec<f32>>> + Send,
{
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (self.0)(text.to_string()).await
    }
}

/// Cache-aside embedder: checks the bounded cache before calling the inner
/// embedder and writes computed vectors back on miss.
///
/// Under sequential use this makes at most one inner call per distinct key
/// per TTL window. Concurrent misses on the same key are *not* deduplicated:
/// two simultaneous misses both call the inner embedder and the second
/// write overwrites the first.
pub struct CachedEmbedder {
    inner: Box<dyn Embedder>,
    cache: BoundedCache,
    hits: u64,
    misses: u64,
}

impl CachedEmbedder {
    pub fn new(inner: Box<dyn Embedder>, config: CacheConfig) -> Self {
        Self {
            inner,
            cache: BoundedCache::new(config),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the vector for `text`, from cache when fresh, otherwise by
    /// calling the inner embedder exactly once and storing the result.
    ///
    /// The result is stored unconditionally on miss, empty vectors
    /// included. Inner errors propagate and nothing is cached for them.
    pub async fn embed(&mut self, text: &str) -> Result<Vec<f32>> {
        let key = CacheKey::from_text(text);
        if let Some(vector) = self.cache.get(&key) {
            self.hits += 1;
            debug!(key = %key, "embedding cache hit");
            return Ok(vector.to_vec());
        }
        self.misses += 1;
        let vector = self.inner.embed(text).await?;
        self.cache.set(key, vector.clone());
        Ok(vector)
    }

    /// Fraction of lookups served from cache; 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Occupancy of the underlying cache.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct CountingEmbedder {
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f32, 1.0])
        }
    }

    fn counting(calls: &Arc<AtomicU32>) -> Box<dyn Embedder> {
        Box::new(CountingEmbedder {
            calls: Arc::clone(calls),
        })
    }

    #[tokio::test]
    async fn test_repeat_embed_calls_inner_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut embedder = CachedEmbedder::new(counting(&calls), CacheConfig::default());

        let first = embedder.embed("the same text").await.unwrap();
        let second = embedder.embed("the same text").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hit_rate_after_one_miss_one_hit() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut embedder = CachedEmbedder::new(counting(&calls), CacheConfig::default());
        assert_eq!(embedder.hit_rate(), 0.0);

        embedder.embed("query").await.unwrap();
        embedder.embed("query").await.unwrap();
        assert_eq!(embedder.hit_rate(), 0.5);
        assert_eq!(embedder.hits(), 1);
        assert_eq!(embedder.misses(), 1);
    }

    #[tokio::test]
    async fn test_distinct_texts_each_call_inner() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut embedder = CachedEmbedder::new(counting(&calls), CacheConfig::default());

        embedder.embed("alpha").await.unwrap();
        embedder.embed("beta").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(embedder.hit_rate(), 0.0);
    }

    #[tokio::test]
    async fn test_empty_vector_is_cached() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let inner = FnEmbedder::new(move |_text: String| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<Vec<f32>, crate::Error>(Vec::new())
            }
        });
        let mut embedder = CachedEmbedder::new(Box::new(inner), CacheConfig::default());

        assert!(embedder.embed("nothing").await.unwrap().is_empty());
        assert!(embedder.embed("nothing").await.unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(embedder.hits(), 1);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let inner = FnEmbedder::new(move |_text: String| {
            let c = Arc::clone(&c);
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(crate::Error::embedding_failed("provider 503"))
                } else {
                    Ok(vec![1.0f32])
                }
            }
        });
        let mut embedder = CachedEmbedder::new(Box::new(inner), CacheConfig::default());

        assert!(embedder.embed("text").await.is_err());
        // The failed attempt counted as a miss but stored nothing, so the
        // next call reaches the inner embedder again.
        assert_eq!(embedder.embed("text").await.unwrap(), vec![1.0]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(embedder.misses(), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_recomputed() {
        let calls = Arc::new(AtomicU32::new(0));
        let config = CacheConfig::new().with_default_ttl(Duration::from_millis(20));
        let mut embedder = CachedEmbedder::new(counting(&calls), config);

        embedder.embed("short lived").await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        embedder.embed("short lived").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
