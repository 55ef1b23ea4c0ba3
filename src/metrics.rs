//! Request metrics: outcome counters and latency distribution.
//!
//! [`MetricsCollector`] accumulates raw observations (request outcomes with
//! latencies, cache hits/misses) and derives everything else — success rate,
//! cache hit rate, latency percentiles — on demand in [`MetricsCollector::snapshot`].
//! Nothing derived is stored, so a snapshot is always consistent with the
//! raw history at the moment it is taken.
//!
//! Percentiles are nearest-rank: sort all recorded latencies ascending and
//! index at `floor(n * p)`, no interpolation. This is intentionally simple
//! and slightly biased low for small sample counts.

use serde::Serialize;

/// Request outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequestCounts {
    pub total: u64,
    pub success: u64,
    pub failed: u64,
}

/// Cache lookup counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheCounts {
    pub hits: u64,
    pub misses: u64,
}

/// Nearest-rank latency percentiles, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

/// Point-in-time view of everything the collector has seen.
///
/// Derived, never persisted; recomputed from the raw history on every
/// [`MetricsCollector::snapshot`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub requests: RequestCounts,
    /// `success / total`, 0.0 when no requests have been recorded.
    pub success_rate: f64,
    pub latency: LatencySummary,
    pub cache: CacheCounts,
    /// `hits / (hits + misses)`, 0.0 when no lookups have been recorded.
    pub cache_hit_rate: f64,
}

/// Accumulates request outcomes and latency samples.
///
/// The latency history is unbounded: every recorded sample is kept so the
/// percentile computation stays a pure function of the full history. Long
/// running processes that record at high rates should snapshot and reset at
/// their own cadence, or sit this behind a rolling-window wrapper.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    requests: RequestCounts,
    cache: CacheCounts,
    latencies_ms: Vec<f64>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request outcome and its latency.
    pub fn record_request(&mut self, success: bool, latency_ms: f64) {
        self.requests.total += 1;
        if success {
            self.requests.success += 1;
        } else {
            self.requests.failed += 1;
        }
        self.latencies_ms.push(latency_ms);
    }

    /// Record one cache lookup outcome, independent of request counters.
    pub fn record_cache_hit(&mut self, hit: bool) {
        if hit {
            self.cache.hits += 1;
        } else {
            self.cache.misses += 1;
        }
    }

    /// Derive a snapshot from the accumulated history.
    ///
    /// Deterministic: two calls with no recording in between return
    /// identical snapshots.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let success_rate = if self.requests.total == 0 {
            0.0
        } else {
            self.requests.success as f64 / self.requests.total as f64
        };

        let lookups = self.cache.hits + self.cache.misses;
        let cache_hit_rate = if lookups == 0 {
            0.0
        } else {
            self.cache.hits as f64 / lookups as f64
        };

        let mut sorted = self.latencies_ms.clone();
        sorted.sort_by(f64::total_cmp);

        MetricsSnapshot {
            requests: self.requests,
            success_rate,
            latency: LatencySummary {
                p50_ms: nearest_rank(&sorted, 0.50),
                p95_ms: nearest_rank(&sorted, 0.95),
                p99_ms: nearest_rank(&sorted, 0.99),
            },
            cache: self.cache,
            cache_hit_rate,
        }
    }

    /// Number of latency samples held.
    pub fn sample_count(&self) -> usize {
        self.latencies_ms.len()
    }
}

/// Index a sorted sample at `floor(n * p)`, clamped; 0.0 for an empty
/// sample.
fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 * p).floor() as usize).min(sorted.len() - 1);
    sorted[idx]
}
