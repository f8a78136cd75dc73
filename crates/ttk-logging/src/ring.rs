use std::collections::VecDeque;
use std::sync::Mutex;

use crate::LogRecord;

/// The "log pane" sink named in §6: a bounded in-memory ring. Emission from
/// worker threads (§5) must be lock-scoped and never block the UI thread —
/// the lock here is only ever held for a `push_back`/`pop_front` pair, never
/// across I/O.
pub struct RingSink {
    capacity: usize,
    records: Mutex<VecDeque<LogRecord>>,
}

impl RingSink {
    pub fn new(capacity: usize) -> Self {
        RingSink { capacity: capacity.max(1), records: Mutex::new(VecDeque::new()) }
    }

    pub fn push(&self, record: LogRecord) {
        let mut records = self.records.lock().expect("ring sink mutex poisoned");
        if records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Snapshot of every buffered record, oldest first.
    pub fn snapshot(&self) -> Vec<LogRecord> {
        self.records.lock().expect("ring sink mutex poisoned").iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("ring sink mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogRecordKind;
    use tracing::Level;

    fn record(message: &str) -> LogRecord {
        LogRecord {
            timestamp: "00:00:00".to_string(),
            source: "ttk::test",
            level: Level::INFO,
            message: message.to_string(),
            kind: LogRecordKind::Normal,
        }
    }

    #[test]
    fn push_beyond_capacity_drops_oldest() {
        let sink = RingSink::new(2);
        sink.push(record("a"));
        sink.push(record("b"));
        sink.push(record("c"));
        let snapshot = sink.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].message, "b");
        assert_eq!(snapshot[1].message, "c");
    }

    #[test]
    fn empty_ring_has_zero_length() {
        let sink = RingSink::new(10);
        assert!(sink.is_empty());
    }
}
