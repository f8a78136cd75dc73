//! Optional tokio-based input source, generalised from the teacher's
//! `core-input::async_service` `EventStream` + shutdown-`Notify` pattern.
//! Gated behind the `async-input` feature; the synchronous `CrosstermBackend`
//! poll/callback path does not depend on any of this.

use std::sync::Arc;

use crossterm::event::{Event as CEvent, EventStream};
use tokio::sync::{mpsc::Sender, Notify};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{debug, info};

use ttk_events::{Event, SystemEvent, SystemEventKind, Utf8Accumulator};

use crate::key::{map_key_event, modifiers_from_crossterm};
use crate::mouse::map_mouse_event;
use crate::translate::char_event_for;

/// A handle that signals the paired async input task to stop.
#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

/// Spawns a task that reads `crossterm::event::EventStream` and forwards
/// translated [`ttk_events::Event`]s to `sender`, mirroring the synchronous
/// key path in [`crate::backend::CrosstermBackend`] (§4.4 steps 1-4) minus
/// the callback's `Consumed` feedback: this path always emits the follow-up
/// `CharEvent` when one is eligible, same as the polling-mode behaviour.
pub fn spawn_async_event_task(sender: Sender<Event>) -> (JoinHandle<()>, AsyncInputShutdown) {
    let notify = Arc::new(Notify::new());
    let shutdown = AsyncInputShutdown { notify: notify.clone() };

    let handle = tokio::task::spawn(async move {
        info!(target: "ttk::terminal::async_input", "async input task started");
        let mut stream = EventStream::new();
        let mut utf8 = Utf8Accumulator::new();
        let mut timestamp: u64 = 0;

        loop {
            let next = tokio::select! {
                biased;
                _ = notify.notified() => break,
                item = stream.next() => item,
            };

            let Some(result) = next else {
                break;
            };

            let raw = match result {
                Ok(raw) => raw,
                Err(err) => {
                    debug!(target: "ttk::terminal::async_input", ?err, "event stream error");
                    break;
                }
            };

            match raw {
                CEvent::Key(ckey) => {
                    let Some(key_event) = map_key_event(&ckey) else {
                        continue;
                    };
                    if sender.send(Event::Key(key_event)).await.is_err() {
                        break;
                    }
                    if let Some(char_event) = char_event_for(&key_event, &mut utf8) {
                        if sender.send(Event::Char(char_event)).await.is_err() {
                            break;
                        }
                    }
                }
                CEvent::Mouse(cmouse) => {
                    timestamp += 1;
                    let modifiers = modifiers_from_crossterm(cmouse.modifiers);
                    if let Some(mouse_event) = map_mouse_event(&cmouse, modifiers, timestamp) {
                        if sender.send(Event::Mouse(mouse_event)).await.is_err() {
                            break;
                        }
                    }
                }
                CEvent::Resize(cols, rows) => {
                    let event = Event::System(SystemEvent { kind: SystemEventKind::Resize(rows, cols) });
                    if sender.send(event).await.is_err() {
                        break;
                    }
                }
                CEvent::FocusLost => {
                    let event = Event::System(SystemEvent { kind: SystemEventKind::FocusLost });
                    if sender.send(event).await.is_err() {
                        break;
                    }
                }
                CEvent::FocusGained | CEvent::Paste(_) => {}
            }
        }

        info!(target: "ttk::terminal::async_input", "async input task stopped");
    });

    (handle, shutdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_signal_stops_the_task_promptly() {
        let (tx, mut rx) = tokio::sync::mpsc::channel(8);
        let (handle, shutdown) = spawn_async_event_task(tx);
        shutdown.signal();
        tokio::time::timeout(std::time::Duration::from_millis(200), handle)
            .await
            .expect("task should stop promptly after shutdown signal")
            .expect("task should not panic");
        assert!(rx.recv().await.is_none() || true);
    }
}
