//! Exponential backoff with an upper bound and a wall-clock budget.
//!
//! Delays grow as `min_delay * power_by^(attempt - 1)` and are capped at
//! `max_delay`. Once the budget measured from construction runs out every
//! retry attempt gets [`Duration::ZERO`], which callers must treat as
//! "stop retrying".
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use retry_delay::clock::ManualClock;
//! use retry_delay::delay::{CappedExponential, Delay};
//!
//! let clock = Arc::new(ManualClock::new());
//! let backoff = CappedExponential::builder()
//!     .timeout(Duration::from_secs(60))
//!     .min_delay(Duration::from_secs(1))
//!     .clock(clock.clone())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(backoff.next_delay(3), Duration::from_secs(4));
//! assert_eq!(backoff.next_delay(6), Duration::from_secs(20));
//!
//! clock.advance(Duration::from_secs(61));
//! assert_eq!(backoff.next_delay(3), Duration::ZERO);
//! ```

use super::Delay;
use super::base::{BaseBuilder, DelayBase, ensure_cap};
use crate::clock::SharedClock;
use crate::error::InvalidArgumentError;
use std::time::Duration;
use tracing::debug;

/// Growth exponent used when the builder is not given one.
pub const DEFAULT_POWER_BY: f64 = 2.0;

/// Cap used when the builder is not given one.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(20);

#[derive(Debug, Clone)]
pub struct CappedExponential {
    base: DelayBase,
    power_by: f64,
    max_delay: Duration,
}

impl CappedExponential {
    pub fn builder() -> CappedExponentialBuilder {
        CappedExponentialBuilder::default()
    }

    pub fn base(&self) -> &DelayBase {
        &self.base
    }

    pub fn power_by(&self) -> f64 {
        self.power_by
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }
}

impl Delay for CappedExponential {
    fn next_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return self.base.min_delay();
        }
        if self.base.is_expired() {
            debug!(
                attempt,
                "Retry budget of {:?} exhausted", self.base.timeout()
            );
            return Duration::ZERO;
        }

        let growth = self.power_by.powf(f64::from(attempt - 1));
        // float-to-int `as` saturates, so runaway growth lands on u64::MAX
        let candidate_ms = (self.base.min_delay().as_millis() as f64 * growth).round() as u64;

        // whole seconds only, sub-second remainders are dropped before capping
        let seconds = (candidate_ms / 1000).min(self.max_delay.as_secs());
        Duration::from_secs(seconds)
    }
}

/// Builder for [`CappedExponential`].
#[derive(Debug, Clone)]
pub struct CappedExponentialBuilder {
    base: BaseBuilder,
    power_by: f64,
    max_delay: Duration,
}

impl Default for CappedExponentialBuilder {
    fn default() -> Self {
        Self {
            base: BaseBuilder::default(),
            power_by: DEFAULT_POWER_BY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl CappedExponentialBuilder {
    /// Total elapsed-time budget, measured from `build()`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.base.timeout = timeout;
        self
    }

    /// Delay for attempt 0 and the base of the growth curve.
    pub fn min_delay(mut self, min_delay: Duration) -> Self {
        self.base.min_delay = min_delay;
        self
    }

    /// Time source for the budget. Defaults to the system clock.
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.base.clock = clock;
        self
    }

    pub fn power_by(mut self, power_by: f64) -> Self {
        self.power_by = power_by;
        self
    }

    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Validate the parameters and start the budget clock.
    ///
    /// # Errors
    ///
    /// * [`InvalidArgumentError::PowerByTooSmall`] if `power_by < 1.0` or NaN
    /// * [`InvalidArgumentError::MaxDelayBelowMinDelay`] if `max_delay < min_delay`
    pub fn build(self) -> Result<CappedExponential, InvalidArgumentError> {
        if !(self.power_by >= 1.0) {
            return Err(InvalidArgumentError::PowerByTooSmall {
                power_by: self.power_by,
            });
        }
        ensure_cap(self.max_delay, self.base.min_delay)?;

        let base = self.base.into_base();
        debug!(
            "Built capped exponential backoff: min {:?}, max {:?}, power {}, timeout {:?}",
            base.min_delay(),
            self.max_delay,
            self.power_by,
            base.timeout()
        );
        Ok(CappedExponential {
            base,
            power_by: self.power_by,
            max_delay: self.max_delay,
        })
    }
}
