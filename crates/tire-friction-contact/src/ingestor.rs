//! Single-slot, latest-wins contact ingestion.
//!
//! The transport posts contact events from its own thread; the physics step
//! pulls at most one snapshot per tick. There is no queue: a new message
//! replaces an unconsumed one.

use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{trace, warn};

use crate::types::{ContactSnapshot, ContactsMessage};

/// Simulated time without a new message before a stall is reported.
pub const DEFAULT_STALL_THRESHOLD: Duration = Duration::from_secs(1);

/// Counters describing ingestion since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Messages posted by the transport.
    pub received: u64,
    /// Snapshots handed to the step path.
    pub consumed: u64,
    /// Snapshots replaced before any tick observed them.
    pub superseded: u64,
    /// Stall diagnostics emitted.
    pub stall_warnings: u64,
}

#[derive(Debug, Default)]
struct Slot {
    latest: Option<ContactSnapshot>,
    wait: Duration,
    stats: IngestStats,
}

/// Holds the most recent contact snapshot between two execution contexts.
///
/// # Thread Safety
///
/// All state sits behind one `parking_lot::Mutex`. Critical sections only
/// move values in or out; the deep copy of an incoming message happens before
/// the lock is taken and a superseded snapshot is dropped after release.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tire_friction_contact::{ContactIngestor, ContactsMessage};
///
/// let ingestor = ContactIngestor::new();
/// ingestor.on_contact_message(&ContactsMessage::default().at(1.0));
/// ingestor.on_contact_message(&ContactsMessage::default().at(2.0));
///
/// let dt = Duration::from_millis(1);
/// let snapshot = ingestor.take_snapshot_if_dirty(dt);
/// assert_eq!(snapshot.and_then(|s| s.sim_time()), Some(2.0));
/// assert!(ingestor.take_snapshot_if_dirty(dt).is_none());
/// ```
#[derive(Debug)]
pub struct ContactIngestor {
    slot: Mutex<Slot>,
    stall_threshold: Duration,
}

impl Default for ContactIngestor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactIngestor {
    /// Create an ingestor with the default one-second stall threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_stall_threshold(DEFAULT_STALL_THRESHOLD)
    }

    /// Create an ingestor with a custom stall threshold.
    #[must_use]
    pub fn with_stall_threshold(stall_threshold: Duration) -> Self {
        Self {
            slot: Mutex::new(Slot::default()),
            stall_threshold,
        }
    }

    /// Stall threshold in simulated time.
    #[must_use]
    pub fn stall_threshold(&self) -> Duration {
        self.stall_threshold
    }

    /// Store a deep copy of `msg` as the latest snapshot.
    ///
    /// Called from the message-delivery context. Replaces any snapshot the
    /// step path has not yet taken.
    pub fn on_contact_message(&self, msg: &ContactsMessage) {
        let snapshot = ContactSnapshot::from_message(msg);
        let superseded = {
            let mut slot = self.slot.lock();
            slot.stats.received = slot.stats.received.saturating_add(1);
            let previous = slot.latest.replace(snapshot);
            if previous.is_some() {
                slot.stats.superseded = slot.stats.superseded.saturating_add(1);
            }
            previous
        };
        if superseded.is_some() {
            trace!("Unconsumed contact snapshot superseded");
        }
    }

    /// Hand the latest snapshot to the step path, if one arrived since the
    /// previous call.
    ///
    /// Called once per physics tick with the tick's duration. When nothing
    /// new is available the duration is added to a wait accumulator; once it
    /// exceeds the stall threshold a warning is logged and the accumulator
    /// restarts. Never blocks on anything but the short critical section.
    pub fn take_snapshot_if_dirty(&self, dt: Duration) -> Option<ContactSnapshot> {
        let stalled_for = {
            let mut slot = self.slot.lock();
            if let Some(snapshot) = slot.latest.take() {
                slot.wait = Duration::ZERO;
                slot.stats.consumed = slot.stats.consumed.saturating_add(1);
                return Some(snapshot);
            }
            slot.wait = slot.wait.saturating_add(dt);
            if slot.wait > self.stall_threshold {
                let waited = slot.wait;
                slot.wait = Duration::ZERO;
                slot.stats.stall_warnings = slot.stats.stall_warnings.saturating_add(1);
                Some(waited)
            } else {
                None
            }
        };

        if let Some(waited) = stalled_for {
            warn!(
                waited_secs = waited.as_secs_f64(),
                "Waited {:.3} s without a contact message",
                waited.as_secs_f64()
            );
        }
        None
    }

    /// True if a snapshot is waiting to be taken.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.slot.lock().latest.is_some()
    }

    /// Simulated time accumulated since the last snapshot or stall report.
    #[must_use]
    pub fn pending_wait(&self) -> Duration {
        self.slot.lock().wait
    }

    /// Ingestion counters.
    #[must_use]
    pub fn stats(&self) -> IngestStats {
        self.slot.lock().stats
    }
}
