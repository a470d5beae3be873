//! Tests for debouncer
//!
//! All timer tests run on a paused tokio clock, so sleeps advance virtual time
//! instantly and deterministically.

use super::*;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::sleep;

const DELAY: Duration = Duration::from_millis(300);

fn bump(count: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
    let count = Arc::clone(count);
    move || {
        count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Run a future on a fresh paused current-thread runtime (for proptest bodies)
fn run_paused<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("Failed to create tokio runtime")
        .block_on(f)
}

#[tokio::test(start_paused = true)]
async fn test_new_debouncer_has_no_pending() {
    let debouncer = Debouncer::new(DELAY);
    assert!(!debouncer.is_pending());
    assert_eq!(debouncer.delay(), DELAY);
}

#[tokio::test(start_paused = true)]
async fn test_fires_only_after_quiet_period() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(DELAY);

    debouncer.schedule(bump(&count));
    sleep(Duration::from_millis(250)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert!(debouncer.is_pending());

    sleep(Duration::from_millis(100)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!debouncer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn test_burst_coalesces_into_one_call() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(DELAY);

    for _ in 0..5 {
        debouncer.schedule(bump(&count));
        sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(count.load(Ordering::SeqCst), 0);

    sleep(DELAY * 2).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_last_scheduled_callback_wins() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut debouncer = Debouncer::new(DELAY);

    for value in 1..=3 {
        let seen = Arc::clone(&seen);
        debouncer.schedule(move || seen.lock().unwrap().push(value));
    }

    sleep(DELAY * 2).await;
    assert_eq!(*seen.lock().unwrap(), vec![3]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_prevents_invocation() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(DELAY);

    debouncer.schedule(bump(&count));
    debouncer.cancel();
    assert!(!debouncer.is_pending());

    sleep(DELAY * 2).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_timer() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(DELAY);

    debouncer.schedule(bump(&count));
    drop(debouncer);

    sleep(DELAY * 2).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_schedule_after_fire_arms_new_timer() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(DELAY);

    debouncer.schedule(bump(&count));
    sleep(DELAY * 2).await;
    debouncer.schedule(bump(&count));
    sleep(DELAY * 2).await;

    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_leading_fires_immediately_once_per_window() {
    let count = Arc::new(AtomicUsize::new(0));
    let options = DebounceOptions {
        leading: true,
        trailing: false,
    };
    let mut debouncer = Debouncer::with_options(DELAY, options);

    debouncer.schedule(bump(&count));
    assert_eq!(count.load(Ordering::SeqCst), 1);

    sleep(Duration::from_millis(100)).await;
    debouncer.schedule(bump(&count));
    assert_eq!(count.load(Ordering::SeqCst), 1);

    sleep(DELAY * 2).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    // Window closed, so the next call leads again
    debouncer.schedule(bump(&count));
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_leading_and_trailing_fire_at_both_edges() {
    let count = Arc::new(AtomicUsize::new(0));
    let options = DebounceOptions {
        leading: true,
        trailing: true,
    };
    let mut debouncer = Debouncer::with_options(DELAY, options);

    debouncer.schedule(bump(&count));
    sleep(Duration::from_millis(100)).await;
    debouncer.schedule(bump(&count));
    sleep(Duration::from_millis(100)).await;
    debouncer.schedule(bump(&count));
    assert_eq!(count.load(Ordering::SeqCst), 1);

    sleep(DELAY * 2).await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_single_call_with_both_edges_fires_once() {
    let count = Arc::new(AtomicUsize::new(0));
    let options = DebounceOptions {
        leading: true,
        trailing: true,
    };
    let mut debouncer = Debouncer::with_options(DELAY, options);

    debouncer.schedule(bump(&count));
    sleep(DELAY * 2).await;

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

// Any burst of calls spaced closer than the delay produces exactly one invocation.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_burst_fires_exactly_once(
        num_calls in 1usize..=10,
        gap_ms in 0u64..300
    ) {
        let count = run_paused(async move {
            let count = Arc::new(AtomicUsize::new(0));
            let mut debouncer = Debouncer::new(DELAY);

            for _ in 0..num_calls {
                debouncer.schedule(bump(&count));
                sleep(Duration::from_millis(gap_ms)).await;
            }
            sleep(DELAY * 2).await;

            count.load(Ordering::SeqCst)
        });

        prop_assert_eq!(count, 1);
    }
}
