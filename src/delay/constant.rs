//! Fixed delay for every retry until the budget runs out.

use super::Delay;
use super::base::{BaseBuilder, DelayBase};
use crate::clock::SharedClock;
use crate::error::InvalidArgumentError;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Constant {
    base: DelayBase,
}

impl Constant {
    pub fn builder() -> ConstantBuilder {
        ConstantBuilder::default()
    }

    pub fn base(&self) -> &DelayBase {
        &self.base
    }

    pub fn delay(&self) -> Duration {
        self.base.min_delay()
    }
}

impl Delay for Constant {
    fn next_delay(&self, attempt: u32) -> Duration {
        if attempt > 0 && self.base.is_expired() {
            debug!(
                attempt,
                "Retry budget of {:?} exhausted", self.base.timeout()
            );
            return Duration::ZERO;
        }
        self.delay()
    }
}

/// Builder for [`Constant`].
#[derive(Debug, Clone, Default)]
pub struct ConstantBuilder {
    base: BaseBuilder,
}

impl ConstantBuilder {
    /// Total elapsed-time budget, measured from `build()`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.base.timeout = timeout;
        self
    }

    /// The delay returned for every attempt.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.base.min_delay = delay;
        self
    }

    /// Time source for the budget. Defaults to the system clock.
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.base.clock = clock;
        self
    }

    /// # Errors
    ///
    /// [`InvalidArgumentError::DelayExceedsTimeout`] if the delay is longer
    /// than the timeout.
    pub fn build(self) -> Result<Constant, InvalidArgumentError> {
        if self.base.min_delay > self.base.timeout {
            return Err(InvalidArgumentError::DelayExceedsTimeout {
                delay: self.base.min_delay,
                timeout: self.base.timeout,
            });
        }
        let base = self.base.into_base();
        debug!(
            "Built constant backoff: delay {:?}, timeout {:?}",
            base.min_delay(),
            base.timeout()
        );
        Ok(Constant { base })
    }
}
