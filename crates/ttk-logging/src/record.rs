use serde::Serialize;
use tracing::Level;

/// Replaces the "side-channel flag on event records" anti-pattern named in
/// the design notes (e.g. `is_stream_capture`) with an explicit sum: routing
/// decisions (does this record also go to the captured-stream sink?) become
/// a match arm instead of a boolean field callers might forget to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRecordKind {
    Normal,
    /// Emitted while a stream-capture session (e.g. a test harness recording
    /// stdout) is active; routed to the capture sink in addition to the
    /// normal sinks.
    StreamCapture,
}

/// One log event, already detached from the `tracing` event borrow so it can
/// be stored in the ring buffer or serialised for the TCP broadcaster.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// `HH:MM:SS`, matching the wire protocol in §6.
    pub timestamp: String,
    pub source: &'static str,
    pub level: Level,
    pub message: String,
    pub kind: LogRecordKind,
}

/// The wire shape broadcast to TCP clients (§6): newline-delimited JSON
/// objects `{"timestamp", "source", "level", "message"}`. `LogRecordKind` is
/// deliberately not part of the wire format — it is a local routing
/// decision, not something a read-only client needs.
#[derive(Debug, Serialize)]
pub struct WireRecord<'a> {
    pub timestamp: &'a str,
    pub source: &'a str,
    pub level: &'a str,
    pub message: &'a str,
}

impl LogRecord {
    pub fn to_wire(&self) -> WireRecord<'_> {
        WireRecord {
            timestamp: &self.timestamp,
            source: self.source,
            level: self.level.as_str(),
            message: &self.message,
        }
    }

    pub fn to_json_line(&self) -> String {
        let mut line = serde_json::to_string(&self.to_wire()).unwrap_or_default();
        line.push('\n');
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_line_matches_wire_protocol_shape() {
        let record = LogRecord {
            timestamp: "12:00:00".to_string(),
            source: "ttk::render",
            level: Level::INFO,
            message: "frame painted".to_string(),
            kind: LogRecordKind::Normal,
        };
        let line = record.to_json_line();
        assert!(line.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["timestamp"], "12:00:00");
        assert_eq!(value["source"], "ttk::render");
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["message"], "frame painted");
    }
}
