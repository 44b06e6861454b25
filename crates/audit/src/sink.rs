//! Audit emission seam.

use std::sync::Mutex;

use crate::event::AuditEvent;

/// Append-only audit destination.
///
/// `record` is fire-and-forget: implementations must absorb their own
/// failures (log and drop) rather than surface them, so that an audit outage
/// never rolls back the business operation being described. Where the audit
/// write must be part of the same transaction as the mutation (erasure), the
/// persistence collaborator handles that pairing, not this trait.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// In-memory sink for tests/dev.
///
/// - No IO
/// - Preserves append order
/// - Tolerates lock poisoning (the event is dropped and logged)
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditEvent>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        match self.entries.lock() {
            Ok(mut guard) => guard.push(event),
            Err(_) => {
                tracing::warn!(
                    event_type = event.event_type.event_type(),
                    "audit sink poisoned; dropping event"
                );
            }
        }
    }
}
