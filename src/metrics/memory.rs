use super::{Action, MetricsPublisher, action_label, namespace_for};
use crate::utils::saturating_fetch_add;
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// In-process metrics collector
#[derive(Clone, Debug)]
pub struct InMemoryPublisher {
    resource_type: String,
    /// Total number of handler invocations
    pub total_invocations: Arc<AtomicU64>,
    /// Total number of recorded failures
    pub total_exceptions: Arc<AtomicU64>,
    /// Number of duration samples
    pub duration_samples: Arc<AtomicU64>,
    /// Sum of recorded durations in milliseconds
    pub total_duration_ms: Arc<AtomicU64>,
    actions: Arc<DashMap<String, ActionCounters>>,
    exception_kinds: Arc<DashMap<String, u64>>,
}

#[derive(Debug, Default, Clone, Copy)]
struct ActionCounters {
    invocations: u64,
    exceptions: u64,
    duration_samples: u64,
    total_duration_ms: u64,
}

impl InMemoryPublisher {
    pub fn new(resource_type: &str) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            total_invocations: Arc::new(AtomicU64::new(0)),
            total_exceptions: Arc::new(AtomicU64::new(0)),
            duration_samples: Arc::new(AtomicU64::new(0)),
            total_duration_ms: Arc::new(AtomicU64::new(0)),
            actions: Arc::new(DashMap::new()),
            exception_kinds: Arc::new(DashMap::new()),
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let samples = self.duration_samples.load(Ordering::Relaxed);
        let total_ms = self.total_duration_ms.load(Ordering::Relaxed);

        let actions = self
            .actions
            .iter()
            .map(|entry| {
                let c = *entry.value();
                (
                    entry.key().clone(),
                    ActionSnapshot {
                        invocations: c.invocations,
                        exceptions: c.exceptions,
                        average_duration_ms: average(c.total_duration_ms, c.duration_samples),
                    },
                )
            })
            .collect();

        let exception_kinds = self
            .exception_kinds
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();

        MetricsSnapshot {
            resource_type: self.resource_type.clone(),
            namespace: namespace_for(&self.resource_type),
            total_invocations: self.total_invocations.load(Ordering::Relaxed),
            total_exceptions: self.total_exceptions.load(Ordering::Relaxed),
            average_duration_ms: average(total_ms, samples),
            actions,
            exception_kinds,
        }
    }
}

fn average(total: u64, samples: u64) -> f64 {
    if samples > 0 {
        total as f64 / samples as f64
    } else {
        0.0
    }
}

impl MetricsPublisher for InMemoryPublisher {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn record_invocation(&self, action: Action) {
        self.total_invocations.fetch_add(1, Ordering::Relaxed);
        self.actions
            .entry(action.as_str().to_string())
            .or_default()
            .invocations += 1;
    }

    fn record_duration(&self, action: Action, milliseconds: u64) {
        self.duration_samples.fetch_add(1, Ordering::Relaxed);
        saturating_fetch_add(&self.total_duration_ms, milliseconds);
        let mut counters = self.actions.entry(action.as_str().to_string()).or_default();
        counters.duration_samples += 1;
        counters.total_duration_ms = counters.total_duration_ms.saturating_add(milliseconds);
    }

    fn record_exception(&self, action: Option<Action>, error_kind: &str) {
        self.total_exceptions.fetch_add(1, Ordering::Relaxed);
        self.actions
            .entry(action_label(action).to_string())
            .or_default()
            .exceptions += 1;
        *self
            .exception_kinds
            .entry(error_kind.to_string())
            .or_default() += 1;
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub resource_type: String,
    pub namespace: String,
    pub total_invocations: u64,
    pub total_exceptions: u64,
    pub average_duration_ms: f64,
    /// Keyed by action name, including `UNKNOWN`
    pub actions: BTreeMap<String, ActionSnapshot>,
    pub exception_kinds: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActionSnapshot {
    pub invocations: u64,
    pub exceptions: u64,
    pub average_duration_ms: f64,
}

/// Helper for timing handler invocations
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed whole milliseconds, as reported by `record_duration`
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
