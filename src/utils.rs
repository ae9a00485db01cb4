//! Small shared helpers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Add to an atomic counter, sticking at `u64::MAX` instead of wrapping.
///
/// Returns the value stored after the addition.
pub fn saturating_fetch_add(counter: &AtomicU64, value: u64) -> u64 {
    let mut current = counter.load(Ordering::Relaxed);
    loop {
        let next = current.saturating_add(value);
        match counter.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => current = actual,
        }
    }
}
