//! Concurrency tests for the latest-wins contact ingestor.

use std::sync::Arc;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

use tire_friction_contact::prelude::*;
use tire_friction_test_helpers::prelude::*;

const TICK: Duration = Duration::from_millis(1);

fn stamped(t: u32) -> ContactsMessage {
    TireContactFixture::new().point(0.0, 10.0).message().at(f64::from(t))
}

#[test]
fn test_step_observes_only_last_of_n_messages() -> TestResult {
    let ingestor = Arc::new(ContactIngestor::new());
    let producer = {
        let ingestor = Arc::clone(&ingestor);
        thread::spawn(move || {
            for t in 0..50 {
                ingestor.on_contact_message(&stamped(t));
            }
        })
    };
    producer.join().map_err(|_| "producer thread panicked")?;

    let snapshot = must_some(ingestor.take_snapshot_if_dirty(TICK), "expected a snapshot");
    assert_eq!(snapshot.sim_time(), Some(49.0));
    assert!(ingestor.take_snapshot_if_dirty(TICK).is_none());

    let stats = ingestor.stats();
    assert_eq!(stats.received, 50);
    assert_eq!(stats.superseded, 49);
    assert_eq!(stats.consumed, 1);
    Ok(())
}

#[test]
fn test_concurrent_producer_and_stepper_see_monotonic_stamps() -> TestResult {
    const MESSAGES: u32 = 2_000;
    let ingestor = Arc::new(ContactIngestor::new());
    let start = Arc::new(Barrier::new(2));

    let producer = {
        let ingestor = Arc::clone(&ingestor);
        let start = Arc::clone(&start);
        thread::spawn(move || {
            start.wait();
            for t in 0..MESSAGES {
                ingestor.on_contact_message(&stamped(t));
                if t % 64 == 0 {
                    thread::yield_now();
                }
            }
        })
    };

    start.wait();
    let mut observed = Vec::new();
    for _ in 0..10_000 {
        if let Some(snapshot) = ingestor.take_snapshot_if_dirty(TICK) {
            observed.push(snapshot.sim_time().unwrap_or(f64::NAN));
        }
    }
    producer.join().map_err(|_| "producer thread panicked")?;
    if let Some(snapshot) = ingestor.take_snapshot_if_dirty(TICK) {
        observed.push(snapshot.sim_time().unwrap_or(f64::NAN));
    }

    assert!(observed.windows(2).all(|w| matches!(w, [a, b] if a < b)));
    assert_eq!(observed.last().copied(), Some(f64::from(MESSAGES - 1)));

    let stats = ingestor.stats();
    assert_eq!(stats.received, u64::from(MESSAGES));
    assert_eq!(stats.consumed + stats.superseded, stats.received);
    assert_eq!(stats.consumed, observed.len() as u64);
    Ok(())
}

#[test]
fn test_snapshot_unaffected_by_later_messages() {
    let ingestor = ContactIngestor::new();
    ingestor.on_contact_message(&stamped(1));
    let first = must_some(ingestor.take_snapshot_if_dirty(TICK), "first snapshot");
    ingestor.on_contact_message(&stamped(2));
    assert_eq!(first.sim_time(), Some(1.0));
    assert_eq!(first.len(), 1);
}

#[test]
fn test_stall_warning_logged_once_per_second() {
    let ingestor = ContactIngestor::new();
    let ((), logs) = capture_logs(|| {
        for _ in 0..2_500 {
            assert!(ingestor.take_snapshot_if_dirty(TICK).is_none());
        }
    });
    assert_eq!(logs.count(tracing::Level::WARN), 2);
    assert!(logs.contains(tracing::Level::WARN, "without a contact message"));
    assert_eq!(ingestor.stats().stall_warnings, 2);
}
