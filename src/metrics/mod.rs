//! Handler metrics reported by retry callers.
//!
//! Publishers never surface their own failures: anything that goes wrong
//! while recording is logged and dropped, so metrics can't break the
//! operation being measured.

pub mod memory;
pub mod prom;

pub use memory::{ActionSnapshot, InMemoryPublisher, MetricsSnapshot, Timer};
pub use prom::PrometheusPublisher;

use crate::config::{MetricsBackend, MetricsConfig};
use crate::error::RetryDelayResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const METRIC_NAMESPACE_ROOT: &str = "AWS/CloudFormation";

pub const METRIC_NAME_HANDLER_EXCEPTION: &str = "HandlerException";
pub const METRIC_NAME_HANDLER_DURATION: &str = "HandlerInvocationDuration";
pub const METRIC_NAME_HANDLER_INVOCATION_COUNT: &str = "HandlerInvocationCount";

pub const DIMENSION_KEY_ACTION_TYPE: &str = "DimensionKeyActionType";
pub const DIMENSION_KEY_EXCEPTION_TYPE: &str = "DimensionKeyExceptionType";
pub const DIMENSION_KEY_RESOURCE_TYPE: &str = "DimensionKeyResourceType";

/// Action reported when a failure happens outside any handler action.
pub const UNKNOWN_ACTION: &str = "UNKNOWN";

/// Handler action a metric is reported against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "CREATE",
            Action::Read => "READ",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
            Action::List => "LIST",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for handler metrics.
pub trait MetricsPublisher: Send + Sync {
    /// Resource type name the metrics are scoped to
    fn resource_type(&self) -> &str;

    /// Count one handler invocation
    fn record_invocation(&self, action: Action);

    /// Record how long a handler invocation took
    fn record_duration(&self, action: Action, milliseconds: u64);

    /// Count one failure. `None` reports the action as [`UNKNOWN_ACTION`].
    fn record_exception(&self, action: Option<Action>, error_kind: &str);
}

/// Type alias for a publisher shared across handlers
pub type MetricsPublisherType = Arc<dyn MetricsPublisher>;

/// Metrics namespace for a resource type: `AWS::S3::Bucket` becomes
/// `AWS/CloudFormation/AWS/S3/Bucket`.
pub fn namespace_for(resource_type: &str) -> String {
    format!(
        "{}/{}",
        METRIC_NAMESPACE_ROOT,
        resource_type.replace("::", "/")
    )
}

/// Type name of an error value, used as the exception dimension.
pub fn error_kind_of<E: ?Sized>(_error: &E) -> &'static str {
    std::any::type_name::<E>()
}

pub(crate) fn action_label(action: Option<Action>) -> &'static str {
    action.map(|a| a.as_str()).unwrap_or(UNKNOWN_ACTION)
}

/// Create the publisher selected in configuration
pub fn create_publisher(config: &MetricsConfig) -> RetryDelayResult<MetricsPublisherType> {
    let publisher: MetricsPublisherType = match config.backend {
        MetricsBackend::Memory => Arc::new(InMemoryPublisher::new(&config.resource_type)),
        MetricsBackend::Prometheus => Arc::new(PrometheusPublisher::new(&config.resource_type)?),
    };
    Ok(publisher)
}
