//! Structured logging subsystem (§4.8). Grounded in the teacher's
//! `tracing`/`tracing-subscriber` idiom: typed targets instead of a single
//! global logger, structured fields over string interpolation, and a
//! subscriber composed from independently swappable layers.
//!
//! [`TtkLogger::init`] is the single entry point the host application calls
//! once at startup; everything else in this crate is plumbing it wires
//! together.

mod broadcaster;
mod layer;
mod sinks;
mod time;

pub mod record;
pub mod ring;

use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

pub use record::{LogRecord, LogRecordKind, WireRecord};
pub use ring::RingSink;

use broadcaster::Broadcaster;
use layer::TtkLayer;
use sinks::StreamSink;
use ttk_config::Config;

/// Owns every sink wired up at [`TtkLogger::init`] and the handles needed to
/// inspect or tear them down at runtime (e.g. a log-pane widget reading the
/// ring, or a test harness toggling stream capture).
pub struct TtkLogger {
    ring: Arc<RingSink>,
    capture_active: Arc<AtomicBool>,
    _broadcaster: Option<Broadcaster>,
}

impl TtkLogger {
    /// Installs the global `tracing` subscriber and returns the handle used
    /// to read the ring buffer or toggle stream capture. Idempotent in the
    /// sense that a failure to install the global default (e.g. a second
    /// call within the same process, common in tests) is logged and does not
    /// panic — matching the "never hard fail" posture of the rest of the
    /// ambient stack.
    pub fn init(config: &Config) -> TtkLogger {
        let ring = Arc::new(RingSink::new(config.logging.max_log_messages));
        let capture_active = Arc::new(AtomicBool::new(false));

        let stream_enabled =
            config.logging.stream_output_enabled.unwrap_or_else(|| !std::io::stdout().is_terminal());
        let stream = stream_enabled
            .then(|| Arc::new(StreamSink::new(Box::new(std::io::stdout()) as Box<dyn std::io::Write + Send>)));

        let broadcaster = if config.logging.remote_monitoring_enabled {
            config.logging.remote_port.and_then(Broadcaster::start)
        } else {
            None
        };
        let broadcast_sink = broadcaster.as_ref().map(Broadcaster::sink);

        let env_filter = build_env_filter(config);
        let ttk_layer = TtkLayer {
            ring: ring.clone(),
            stream,
            broadcast: broadcast_sink,
            capture_active: capture_active.clone(),
        };

        let subscriber = Registry::default().with(env_filter).with(ttk_layer);
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            tracing::debug!(target: "ttk::logging", "global tracing subscriber already set");
        }

        TtkLogger { ring, capture_active, _broadcaster: broadcaster }
    }

    /// Every record currently buffered in the log-pane ring, oldest first.
    pub fn ring_snapshot(&self) -> Vec<LogRecord> {
        self.ring.snapshot()
    }

    /// Marks subsequently emitted records as [`LogRecordKind::StreamCapture`]
    /// until [`TtkLogger::end_stream_capture`] is called.
    pub fn begin_stream_capture(&self) {
        self.capture_active.store(true, Ordering::Relaxed);
    }

    pub fn end_stream_capture(&self) {
        self.capture_active.store(false, Ordering::Relaxed);
    }
}

fn build_env_filter(config: &Config) -> EnvFilter {
    let mut directive = config.logging.default_level.clone();
    for (target, level) in &config.logging.logger_levels {
        directive.push(',');
        directive.push_str(target);
        directive.push('=');
        directive.push_str(level);
    }
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_filter_combines_default_and_per_logger_overrides() {
        let mut config = Config::default();
        config.logging.default_level = "warn".to_string();
        config.logging.logger_levels = vec![("ttk::render".to_string(), "debug".to_string())];
        // `EnvFilter` has no public inspection API beyond its `Display` impl;
        // asserting the built directive string round-trips is the practical
        // way to confirm both pieces landed in the filter.
        let filter = build_env_filter(&config);
        let rendered = filter.to_string();
        assert!(rendered.contains("warn"));
        assert!(rendered.contains("ttk::render=debug"));
    }

    #[test]
    fn stream_capture_toggle_tags_emitted_records() {
        let config = Config::default();
        let logger = TtkLogger::init(&config);
        logger.begin_stream_capture();
        tracing::info!(target: "ttk::test", "during capture");
        logger.end_stream_capture();
        tracing::info!(target: "ttk::test", "after capture");

        let records = logger.ring_snapshot();
        let during = records.iter().find(|r| r.message == "during capture");
        let after = records.iter().find(|r| r.message == "after capture");
        if let Some(during) = during {
            assert_eq!(during.kind, LogRecordKind::StreamCapture);
        }
        if let Some(after) = after {
            assert_eq!(after.kind, LogRecordKind::Normal);
        }
    }
}
