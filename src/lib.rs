//! # rag-sentinel
//!
//! In-process reliability core for AI-backed retrieval pipelines.
//!
//! The expensive parts of a retrieval pipeline — embedding, search,
//! generation — sit behind remote services that are slow, rate-limited, and
//! occasionally down. This crate is the layer that makes that tolerable:
//! it deduplicates embedding work through a bounded cache, measures what
//! actually happened, surfaces degraded health proactively, and retries the
//! failures that are worth retrying.
//!
//! ## Core Philosophy
//!
//! - **Library, not framework**: the caller supplies the embedding function
//!   and consumes alerts; this crate owns no I/O surface of its own
//! - **Bounded by construction**: the cache never exceeds its configured
//!   size, enforced inline on every insert
//! - **Derived, not stored**: metrics snapshots are recomputed from raw
//!   history on every read, so they are always internally consistent
//! - **Classified failures**: every error carries machine-readable
//!   retryability and status metadata, and the retry executor decides from
//!   that alone
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Bounded embedding cache and cache-aside embedder wrapper |
//! | [`metrics`] | Request/latency accumulation and snapshot derivation |
//! | [`alerts`] | Threshold evaluation and alert history |
//! | [`retry`] | Backoff retry executor driven by error classification |
//! | [`error`] | Classified error taxonomy |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use rag_sentinel::{
//!     with_retry, AlertManager, CacheConfig, CachedEmbedder, FnEmbedder, MetricsCollector,
//! };
//!
//! # async fn demo() -> rag_sentinel::Result<()> {
//! let inner = FnEmbedder::new(|text: String| async move {
//!     // call the real embedding API here
//!     Ok::<_, rag_sentinel::Error>(vec![0.0; 384])
//! });
//! // Single-writer boundary: the components have no internal locks.
//! let embedder = Arc::new(tokio::sync::Mutex::new(CachedEmbedder::new(
//!     Box::new(inner),
//!     CacheConfig::default(),
//! )));
//! let mut metrics = MetricsCollector::new();
//! let mut alerts = AlertManager::new()
//!     .with_callback(|alert| eprintln!("[{}] {}", alert.level, alert.message));
//!
//! let started = std::time::Instant::now();
//! let result = with_retry(
//!     || {
//!         let embedder = Arc::clone(&embedder);
//!         async move { embedder.lock().await.embed("what is a vector database?").await }
//!     },
//!     3,
//!     Duration::from_millis(200),
//! )
//! .await;
//! metrics.record_request(result.is_ok(), started.elapsed().as_secs_f64() * 1000.0);
//!
//! alerts.check_metrics(&metrics.snapshot());
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Every component is a single-owner structure: mutating operations take
//! `&mut self` and there is no internal locking. Callers sharing an
//! instance across tasks put it behind a single-writer boundary (a mutex or
//! an actor task). Eviction, expiry, metric recording, and alert evaluation
//! all run inline on the call that triggers them; the embedding call and
//! retried operations are the only suspension points.

pub mod alerts;
pub mod cache;
pub mod error;
pub mod metrics;
pub mod retry;

// Re-export main types for convenience
pub use alerts::{Alert, AlertLevel, AlertManager, AlertThresholds};
pub use cache::{BoundedCache, CacheConfig, CacheKey, CacheStats, CachedEmbedder, Embedder, FnEmbedder};
pub use error::{Error, ErrorCode};
pub use metrics::{MetricsCollector, MetricsSnapshot};
pub use retry::with_retry;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
