//! In-memory capture of `tracing` events.
//!
//! Installs a thread-local subscriber for the duration of a closure and
//! records every event's level and message, so tests can assert that a code
//! path logged exactly what it should.

use std::fmt::{self, Debug};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// Rendered `message` field.
    pub message: String,
}

/// Shared handle to the captured events.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturedLogs {
    /// Copy of every captured event, in order.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    /// Number of events at exactly `level`.
    pub fn count(&self, level: Level) -> usize {
        self.events.lock().iter().filter(|e| e.level == level).count()
    }

    /// True if an event at `level` contains `needle` in its message.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.events
            .lock()
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }

    fn push(&self, event: CapturedEvent) {
        self.events.lock().push(event);
    }
}

struct CaptureLayer {
    sink: CapturedLogs,
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.sink.push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
        });
    }
}

impl fmt::Debug for CaptureLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureLayer").finish_non_exhaustive()
    }
}

/// Run `f` with a capturing subscriber installed on this thread.
///
/// # Example
///
/// ```rust
/// use tire_friction_test_helpers::capture_logs;
///
/// let ((), logs) = capture_logs(|| tracing::error!("Only ODE is supported right now"));
/// assert_eq!(logs.count(tracing::Level::ERROR), 1);
/// ```
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer { sink: logs.clone() });
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_counts_by_level() {
        let ((), logs) = capture_logs(|| {
            tracing::warn!("first");
            tracing::warn!(value = 3, "second {}", 2);
            tracing::error!("third");
        });
        assert_eq!(logs.count(Level::WARN), 2);
        assert_eq!(logs.count(Level::ERROR), 1);
        assert!(logs.contains(Level::WARN, "second 2"));
    }

    #[test]
    fn test_capture_is_scoped() {
        let ((), logs) = capture_logs(|| ());
        tracing::error!("outside");
        assert!(logs.events().is_empty());
    }
}
