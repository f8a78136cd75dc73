use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// A sink that isolates its own failures: once a write fails, `alive` flips
/// to `false` and every subsequent write silently short-circuits, per the
/// error-handling table (§7: "Logging sink failure ... Isolate: sink is
/// removed from the broadcast set; other sinks unaffected").
pub struct StreamSink {
    writer: Mutex<Box<dyn Write + Send>>,
    alive: AtomicBool,
}

impl StreamSink {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        StreamSink { writer: Mutex::new(writer), alive: AtomicBool::new(true) }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    pub fn write_line(&self, line: &str) {
        if !self.is_alive() {
            return;
        }
        let mut writer = self.writer.lock().expect("stream sink mutex poisoned");
        if writer.write_all(line.as_bytes()).and_then(|_| writer.flush()).is_err() {
            self.alive.store(false, Ordering::Relaxed);
        }
    }
}

/// The TCP broadcaster's local handle: a channel to the accept/writer task
/// owned by `ttk-logging`'s dedicated tokio runtime (§5). Sending into a
/// closed channel (every client disconnected and the task exited) flips
/// `alive` the same way a failed stdout write does.
pub struct BroadcastSink {
    sender: tokio::sync::broadcast::Sender<String>,
    alive: AtomicBool,
}

impl BroadcastSink {
    pub fn new(sender: tokio::sync::broadcast::Sender<String>) -> Self {
        BroadcastSink { sender, alive: AtomicBool::new(true) }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    pub fn send(&self, line: String) {
        if !self.is_alive() {
            return;
        }
        // `send` only errors when there are zero receivers; a broadcaster
        // with no connected clients is not a failure, so we do not flip
        // `alive` here. Flipping happens only when the channel itself has
        // been torn down (the sender side dropped its counterpart task).
        let _ = self.sender.send(line);
    }

    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingWriter;
    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stream_sink_marks_itself_dead_on_write_failure() {
        let sink = StreamSink::new(Box::new(FailingWriter));
        assert!(sink.is_alive());
        sink.write_line("hello\n");
        assert!(!sink.is_alive());
        // Subsequent writes are silent no-ops, not further failures.
        sink.write_line("world\n");
    }

    #[test]
    fn stream_sink_survives_successful_writes() {
        let sink = StreamSink::new(Box::new(Vec::<u8>::new()));
        sink.write_line("a\n");
        sink.write_line("b\n");
        assert!(sink.is_alive());
    }

    #[test]
    fn broadcast_sink_send_with_no_receivers_is_not_a_failure() {
        let (tx, _rx) = tokio::sync::broadcast::channel(16);
        let sink = BroadcastSink::new(tx);
        drop(_rx);
        sink.send("line\n".to_string());
        assert!(sink.is_alive());
    }
}
