use retry_delay::utils::saturating_fetch_add;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[test]
fn test_saturating_fetch_add_adds() {
    let counter = AtomicU64::new(40);
    assert_eq!(saturating_fetch_add(&counter, 2), 42);
    assert_eq!(counter.load(Ordering::Relaxed), 42);
}

#[test]
fn test_saturating_fetch_add_sticks_at_max() {
    let counter = AtomicU64::new(u64::MAX - 1);
    assert_eq!(saturating_fetch_add(&counter, 5), u64::MAX);
    assert_eq!(saturating_fetch_add(&counter, 1), u64::MAX);
    assert_eq!(counter.load(Ordering::Relaxed), u64::MAX);
}

#[test]
fn test_saturating_fetch_add_concurrent() {
    let counter = Arc::new(AtomicU64::new(0));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let counter = Arc::clone(&counter);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    saturating_fetch_add(&counter, 3);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(counter.load(Ordering::Relaxed), 12_000);
}
