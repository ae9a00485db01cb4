//! Retry delay strategies.
//!
//! A strategy is built once and then asked for the delay before each retry.
//! Attempt 0 is the initial try and always gets the floor delay. A zero
//! duration for any later attempt means the timeout budget is spent.

pub mod base;
pub mod capped_exponential;
pub mod constant;

pub use base::{DelayBase, duration_from_millis};
pub use capped_exponential::{
    CappedExponential, CappedExponentialBuilder, DEFAULT_MAX_DELAY, DEFAULT_POWER_BY,
};
pub use constant::{Constant, ConstantBuilder};

use std::time::Duration;

/// Computes the wait before a retry attempt.
pub trait Delay: Send + Sync {
    /// Delay before `attempt`. Never fails; [`Duration::ZERO`] for
    /// `attempt >= 1` signals that the caller should give up.
    fn next_delay(&self, attempt: u32) -> Duration;
}

/// Any of the available strategies.
#[derive(Debug, Clone)]
pub enum DelayStrategy {
    CappedExponential(CappedExponential),
    Constant(Constant),
}

impl DelayStrategy {
    pub fn base(&self) -> &DelayBase {
        match self {
            Self::CappedExponential(s) => s.base(),
            Self::Constant(s) => s.base(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.base().timeout()
    }

    pub fn min_delay(&self) -> Duration {
        self.base().min_delay()
    }

    pub fn is_expired(&self) -> bool {
        self.base().is_expired()
    }

    /// Short name matching the configuration value.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CappedExponential(_) => "capped_exponential",
            Self::Constant(_) => "constant",
        }
    }

    /// Delays for attempts `0..attempts`, read at the current instant.
    pub fn schedule(&self, attempts: u32) -> Vec<Duration> {
        (0..attempts).map(|attempt| self.next_delay(attempt)).collect()
    }
}

impl Delay for DelayStrategy {
    fn next_delay(&self, attempt: u32) -> Duration {
        match self {
            Self::CappedExponential(s) => s.next_delay(attempt),
            Self::Constant(s) => s.next_delay(attempt),
        }
    }
}

impl From<CappedExponential> for DelayStrategy {
    fn from(strategy: CappedExponential) -> Self {
        Self::CappedExponential(strategy)
    }
}

impl From<Constant> for DelayStrategy {
    fn from(strategy: Constant) -> Self {
        Self::Constant(strategy)
    }
}
