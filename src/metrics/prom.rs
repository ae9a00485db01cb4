use super::{
    Action, DIMENSION_KEY_ACTION_TYPE, DIMENSION_KEY_EXCEPTION_TYPE, DIMENSION_KEY_RESOURCE_TYPE,
    METRIC_NAME_HANDLER_DURATION, METRIC_NAME_HANDLER_EXCEPTION,
    METRIC_NAME_HANDLER_INVOCATION_COUNT, MetricsPublisher, action_label, namespace_for,
};
use crate::error::{RetryDelayError, RetryDelayResult};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Millisecond buckets for handler durations
const DURATION_BUCKETS_MS: &[f64] = &[
    10.0, 50.0, 100.0, 250.0, 500.0, 1_000.0, 2_500.0, 5_000.0, 10_000.0, 30_000.0, 60_000.0,
];

/// Publisher backed by its own Prometheus registry.
///
/// Every series carries a constant `namespace` label derived from the
/// resource type.
pub struct PrometheusPublisher {
    resource_type: String,
    registry: Registry,
    invocations: IntCounterVec,
    durations: HistogramVec,
    exceptions: IntCounterVec,
}

impl PrometheusPublisher {
    pub fn new(resource_type: &str) -> RetryDelayResult<Self> {
        let namespace = namespace_for(resource_type);
        let const_labels = HashMap::from([("namespace".to_string(), namespace.clone())]);
        let registry = Registry::new_custom(None, Some(const_labels)).map_err(metrics_error)?;

        let invocations = IntCounterVec::new(
            Opts::new(
                METRIC_NAME_HANDLER_INVOCATION_COUNT,
                "Number of handler invocations",
            ),
            &[DIMENSION_KEY_ACTION_TYPE, DIMENSION_KEY_RESOURCE_TYPE],
        )
        .map_err(metrics_error)?;

        let durations = HistogramVec::new(
            HistogramOpts::new(
                METRIC_NAME_HANDLER_DURATION,
                "Handler invocation duration in milliseconds",
            )
            .buckets(DURATION_BUCKETS_MS.to_vec()),
            &[DIMENSION_KEY_ACTION_TYPE, DIMENSION_KEY_RESOURCE_TYPE],
        )
        .map_err(metrics_error)?;

        let exceptions = IntCounterVec::new(
            Opts::new(METRIC_NAME_HANDLER_EXCEPTION, "Number of handler failures"),
            &[
                DIMENSION_KEY_ACTION_TYPE,
                DIMENSION_KEY_EXCEPTION_TYPE,
                DIMENSION_KEY_RESOURCE_TYPE,
            ],
        )
        .map_err(metrics_error)?;

        registry
            .register(Box::new(invocations.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(durations.clone()))
            .map_err(metrics_error)?;
        registry
            .register(Box::new(exceptions.clone()))
            .map_err(metrics_error)?;

        debug!("Prometheus metrics registered under namespace {}", namespace);

        Ok(Self {
            resource_type: resource_type.to_string(),
            registry,
            invocations,
            durations,
            exceptions,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current metrics in the Prometheus text exposition format
    pub fn render(&self) -> RetryDelayResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(metrics_error)?;
        String::from_utf8(buffer).map_err(|e| RetryDelayError::Metrics(e.to_string()))
    }
}

fn metrics_error(e: prometheus::Error) -> RetryDelayError {
    RetryDelayError::Metrics(e.to_string())
}

fn log_publish_failure(e: prometheus::Error) {
    warn!("An error occurred while publishing metrics: {}", e);
}

impl MetricsPublisher for PrometheusPublisher {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn record_invocation(&self, action: Action) {
        match self
            .invocations
            .get_metric_with_label_values(&[action.as_str(), self.resource_type.as_str()])
        {
            Ok(counter) => counter.inc(),
            Err(e) => log_publish_failure(e),
        }
    }

    fn record_duration(&self, action: Action, milliseconds: u64) {
        match self
            .durations
            .get_metric_with_label_values(&[action.as_str(), self.resource_type.as_str()])
        {
            Ok(histogram) => histogram.observe(milliseconds as f64),
            Err(e) => log_publish_failure(e),
        }
    }

    fn record_exception(&self, action: Option<Action>, error_kind: &str) {
        match self.exceptions.get_metric_with_label_values(&[
            action_label(action),
            error_kind,
            self.resource_type.as_str(),
        ]) {
            Ok(counter) => counter.inc(),
            Err(e) => log_publish_failure(e),
        }
    }
}
