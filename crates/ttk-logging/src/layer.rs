use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::sinks::{BroadcastSink, StreamSink};
use crate::time::now_hhmmss;
use crate::{LogRecord, LogRecordKind, RingSink};

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

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

/// Fans a `tracing::Event` out to every configured sink, converting it to a
/// [`LogRecord`] exactly once. This is the "`Layer` that flips an
/// `AtomicBool` 'alive' flag on error" named in §4.8 — the flag itself lives
/// on each sink, not here, so one sink's failure cannot affect another's.
pub struct TtkLayer {
    pub(crate) ring: Arc<RingSink>,
    pub(crate) stream: Option<Arc<StreamSink>>,
    pub(crate) broadcast: Option<Arc<BroadcastSink>>,
    /// Set while a stream-capture session (a test harness recording stdout)
    /// is active; routes records through `LogRecordKind::StreamCapture`
    /// instead of `Normal`.
    pub(crate) capture_active: Arc<std::sync::atomic::AtomicBool>,
}

impl<S> Layer<S> for TtkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, _attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {}

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let kind = if self.capture_active.load(std::sync::atomic::Ordering::Relaxed) {
            LogRecordKind::StreamCapture
        } else {
            LogRecordKind::Normal
        };

        let record = LogRecord {
            timestamp: now_hhmmss(),
            source: event.metadata().target(),
            level: *event.metadata().level(),
            message: visitor.message,
            kind,
        };

        self.ring.push(record.clone());

        if let Some(stream) = &self.stream {
            stream.write_line(&format!(
                "{} {} {}: {}\n",
                record.timestamp,
                record.level,
                record.source,
                record.message
            ));
        }

        if let Some(broadcast) = &self.broadcast {
            broadcast.send(record.to_json_line());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use tracing_subscriber::prelude::*;

    #[test]
    fn on_event_pushes_record_into_ring() {
        let ring = Arc::new(RingSink::new(10));
        let layer = TtkLayer {
            ring: ring.clone(),
            stream: None,
            broadcast: None,
            capture_active: Arc::new(AtomicBool::new(false)),
        };
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "ttk::test", "hello from the layer");
        });
        let snapshot = ring.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].source, "ttk::test");
        assert_eq!(snapshot[0].message, "hello from the layer");
        assert_eq!(snapshot[0].kind, LogRecordKind::Normal);
    }

    #[test]
    fn capture_active_tags_records_as_stream_capture() {
        let ring = Arc::new(RingSink::new(10));
        let capture_active = Arc::new(AtomicBool::new(true));
        let layer = TtkLayer {
            ring: ring.clone(),
            stream: None,
            broadcast: None,
            capture_active: capture_active.clone(),
        };
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "ttk::capture", "captured line");
        });
        assert_eq!(ring.snapshot()[0].kind, LogRecordKind::StreamCapture);
    }
}
