//! Threshold alerting over metrics snapshots.
//!
//! [`AlertManager`] is a stateless policy evaluator: each
//! [`AlertManager::check_metrics`] call looks at one point-in-time
//! [`MetricsSnapshot`], compares it against the configured thresholds, and
//! raises an [`Alert`] per breached threshold. There is no trend tracking
//! and no debouncing; checking the same degraded snapshot twice raises the
//! same alerts twice. The only state kept is the append-only alert history.

use std::time::SystemTime;

use serde::Serialize;
use tracing::warn;

use crate::metrics::MetricsSnapshot;

/// Severity of an [`Alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Critical,
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Critical => f.write_str("critical"),
        }
    }
}

/// A single threshold breach. Never mutated once raised.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub timestamp: SystemTime,
}

/// Thresholds evaluated by [`AlertManager::check_metrics`].
#[derive(Debug, Clone)]
pub struct AlertThresholds {
    /// Error rate (`1 - success_rate`) above this raises a critical alert.
    pub error_rate: f64,
    /// p95 latency above this (ms) raises a warning.
    pub latency_p95_ms: f64,
    /// Cache hit rate below this raises a warning.
    pub cache_hit_rate: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            error_rate: 0.10,
            latency_p95_ms: 5000.0,
            cache_hit_rate: 0.50,
        }
    }
}

impl AlertThresholds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_rate(mut self, rate: f64) -> Self {
        self.error_rate = rate;
        self
    }

    pub fn with_latency_p95_ms(mut self, ms: f64) -> Self {
        self.latency_p95_ms = ms;
        self
    }

    pub fn with_cache_hit_rate(mut self, rate: f64) -> Self {
        self.cache_hit_rate = rate;
        self
    }
}

type AlertCallback = Box<dyn Fn(&Alert) + Send + Sync>;

/// Evaluates snapshots against thresholds and keeps an append-only history
/// of every alert raised.
pub struct AlertManager {
    thresholds: AlertThresholds,
    callback: Option<AlertCallback>,
    history: Vec<Alert>,
}

impl AlertManager {
    /// Manager with default thresholds and no notification callback.
    pub fn new() -> Self {
        Self {
            thresholds: AlertThresholds::default(),
            callback: None,
            history: Vec::new(),
        }
    }

    /// Override the default thresholds.
    pub fn with_thresholds(mut self, thresholds: AlertThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Register a callback invoked synchronously for every alert raised.
    pub fn with_callback(mut self, callback: impl Fn(&Alert) + Send + Sync + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Evaluate every threshold against `metrics` independently.
    ///
    /// A single snapshot can raise zero to three alerts in one call. The
    /// error-rate and cache-hit-rate checks are skipped while their
    /// denominators are zero so a freshly started process is not flagged
    /// unhealthy before it has seen traffic.
    pub fn check_metrics(&mut self, metrics: &MetricsSnapshot) {
        if metrics.requests.total > 0 {
            let error_rate = 1.0 - metrics.success_rate;
            if error_rate > self.thresholds.error_rate {
                self.raise(
                    AlertLevel::Critical,
                    format!(
                        "error rate {:.1}% exceeds {:.1}% threshold",
                        error_rate * 100.0,
                        self.thresholds.error_rate * 100.0
                    ),
                );
            }
        }

        if metrics.latency.p95_ms > self.thresholds.latency_p95_ms {
            self.raise(
                AlertLevel::Warning,
                format!(
                    "p95 latency {:.0}ms exceeds {:.0}ms threshold",
                    metrics.latency.p95_ms, self.thresholds.latency_p95_ms
                ),
            );
        }

        let lookups = metrics.cache.hits + metrics.cache.misses;
        if lookups > 0 && metrics.cache_hit_rate < self.thresholds.cache_hit_rate {
            self.raise(
                AlertLevel::Warning,
                format!(
                    "cache hit rate {:.1}% below {:.1}% threshold",
                    metrics.cache_hit_rate * 100.0,
                    self.thresholds.cache_hit_rate * 100.0
                ),
            );
        }
    }

    /// Defensive copy of the full alert history, oldest first.
    pub fn alerts(&self) -> Vec<Alert> {
        self.history.clone()
    }

    fn raise(&mut self, level: AlertLevel, message: String) {
        warn!(%level, %message, "threshold breached");
        let alert = Alert {
            level,
            message,
            timestamp: SystemTime::now(),
        };
        if let Some(ref callback) = self.callback {
            callback(&alert);
        }
        self.history.push(alert);
    }
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new()
    }
}
