//! Embedding cache module: bounded, time-aware storage plus a cache-aside
//! wrapper over the caller's embedding function.
//!
//! ## Overview
//!
//! Embedding calls are the most expensive step of a retrieval pipeline, and
//! real workloads repeat texts constantly. Caching here is valuable for:
//! - Avoiding duplicate embedding calls for identical texts
//! - Keeping memory bounded under arbitrary workloads
//! - Exposing hit/miss behavior to the metrics layer
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`BoundedCache`] | Key→vector store with per-entry TTL and a hard size bound |
//! | [`CacheConfig`] | Capacity and default-TTL configuration |
//! | [`CacheKey`] | Deterministic key derived from input text (SHA-256) |
//! | [`CachedEmbedder`] | Cache-aside wrapper with hit/miss accounting |
//! | [`Embedder`] | Trait the external embedding service implements |
//! | [`FnEmbedder`] | Adapter turning an async closure into an [`Embedder`] |
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use rag_sentinel::cache::{CacheConfig, CachedEmbedder, FnEmbedder};
//!
//! # async fn demo() -> rag_sentinel::Result<()> {
//! let inner = FnEmbedder::new(|text: String| async move {
//!     // call the real embedding API here
//!     Ok::<_, rag_sentinel::Error>(vec![text.len() as f32])
//! });
//! let config = CacheConfig::new()
//!     .with_max_size(1000)
//!     .with_default_ttl(Duration::from_secs(3600));
//! let mut embedder = CachedEmbedder::new(Box::new(inner), config);
//!
//! let v1 = embedder.embed("hello").await?;
//! let v2 = embedder.embed("hello").await?; // served from cache
//! assert_eq!(v1, v2);
//! # Ok(())
//! # }
//! ```
//!
//! Eviction is by insertion order, expiry is lazy; see [`BoundedCache`] for
//! the exact semantics.

mod embedder;
mod key;
mod store;

pub use embedder::{CachedEmbedder, Embedder, FnEmbedder};
pub use key::CacheKey;
pub use store::{BoundedCache, CacheConfig, CacheStats};
