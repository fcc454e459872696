use crate::observer::types::ObserverEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Create a connected producer/consumer pair.
pub fn channel() -> (EventSink, EventStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        EventSink {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        },
        EventStream { rx },
    )
}

/// Producer half. Appending never blocks.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<ObserverEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventSink {
    /// Append an event. Returns `false` (and counts the event as dropped)
    /// once the consumer has gone away.
    pub fn emit(&self, event: ObserverEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(_) => {
                if self.dropped.fetch_add(1, Ordering::Relaxed) == 0 {
                    tracing::debug!("observer went away, dropping further events");
                }
                false
            }
        }
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half. Yields events in exactly the order they were emitted.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<ObserverEvent>,
}

impl EventStream {
    /// Next event if one is already queued.
    pub fn try_next(&mut self) -> Option<ObserverEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next event from a plain thread.
    ///
    /// Returns `None` once every sink is dropped and the queue is empty.
    /// Must not be called from inside an async runtime.
    pub fn next_blocking(&mut self) -> Option<ObserverEvent> {
        self.rx.blocking_recv()
    }

    /// Wait for the next event from an async task.
    pub async fn next(&mut self) -> Option<ObserverEvent> {
        self.rx.recv().await
    }

    /// Everything queued right now.
    pub fn drain(&mut self) -> Vec<ObserverEvent> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}
