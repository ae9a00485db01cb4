use crate::clock::{SharedClock, system_clock};
use crate::error::InvalidArgumentError;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::warn;

/// Fields every strategy shares: the timeout budget, the floor delay and
/// the instant the budget started counting.
///
/// The start instant is taken from the clock when the strategy is built,
/// not when the first delay is requested.
#[derive(Clone)]
pub struct DelayBase {
    timeout: Duration,
    min_delay: Duration,
    start: Instant,
    clock: SharedClock,
}

impl DelayBase {
    pub(crate) fn new(timeout: Duration, min_delay: Duration, clock: SharedClock) -> Self {
        if timeout < min_delay {
            warn!(
                "Timeout {:?} is shorter than minimum delay {:?}; retries will expire early",
                timeout, min_delay
            );
        }
        let start = clock.now();
        Self {
            timeout,
            min_delay,
            start,
            clock,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Time spent since the strategy was built, according to its clock.
    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.start)
    }

    /// Whether the timeout budget has run out. Compared at millisecond
    /// granularity; reaching the timeout exactly still counts as active.
    pub fn is_expired(&self) -> bool {
        self.elapsed().as_millis() > self.timeout.as_millis()
    }
}

impl fmt::Debug for DelayBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayBase")
            .field("timeout", &self.timeout)
            .field("min_delay", &self.min_delay)
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}

/// Builder state shared by every strategy builder.
#[derive(Clone)]
pub struct BaseBuilder {
    pub(crate) timeout: Duration,
    pub(crate) min_delay: Duration,
    pub(crate) clock: SharedClock,
}

impl Default for BaseBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::ZERO,
            min_delay: Duration::ZERO,
            clock: system_clock(),
        }
    }
}

impl BaseBuilder {
    pub(crate) fn into_base(self) -> DelayBase {
        DelayBase::new(self.timeout, self.min_delay, self.clock)
    }
}

impl fmt::Debug for BaseBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseBuilder")
            .field("timeout", &self.timeout)
            .field("min_delay", &self.min_delay)
            .finish_non_exhaustive()
    }
}

/// Convert a signed millisecond value into a [`Duration`], rejecting
/// negative input.
pub fn duration_from_millis(
    field: &'static str,
    millis: i64,
) -> Result<Duration, InvalidArgumentError> {
    u64::try_from(millis)
        .map(Duration::from_millis)
        .map_err(|_| InvalidArgumentError::NegativeDuration { field, millis })
}

/// `upper` must not be below `lower`.
pub(crate) fn ensure_cap(upper: Duration, lower: Duration) -> Result<(), InvalidArgumentError> {
    if upper < lower {
        return Err(InvalidArgumentError::MaxDelayBelowMinDelay {
            max_delay: upper,
            min_delay: lower,
        });
    }
    Ok(())
}
