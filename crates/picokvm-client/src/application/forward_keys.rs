//! KeyForwarder: decouples the hook callback from surface delivery.
//!
//! The hook callback runs on the OS input-dispatch path and must return its
//! suppress/pass decision immediately.  It therefore only pushes the event
//! into an unbounded channel; a single delivery task drains the channel and
//! awaits each `dispatch_key_event` before starting the next one, which keeps
//! delivery in observation order.

use std::sync::Arc;

use picokvm_core::RemoteKeyEvent;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use super::remote_sink::RemoteEventSink;

/// Sending half of the delivery queue.  Cheap to clone, usable from any thread.
#[derive(Debug, Clone)]
pub struct KeyForwarder {
    tx: UnboundedSender<RemoteKeyEvent>,
}

impl KeyForwarder {
    /// Creates a forwarder and the receiver its events arrive on.
    pub fn channel() -> (Self, UnboundedReceiver<RemoteKeyEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Creates a forwarder whose events are delivered to `sink` by a spawned task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(sink: Arc<dyn RemoteEventSink>) -> (Self, JoinHandle<()>) {
        let (forwarder, rx) = Self::channel();
        let handle = tokio::spawn(run_delivery(rx, sink));
        (forwarder, handle)
    }

    /// Enqueues one event.  Never blocks; a closed queue drops the event.
    pub fn forward(&self, event: RemoteKeyEvent) {
        let _ = self.tx.send(event);
    }
}

/// Delivers queued events to `sink` one at a time until every forwarder is dropped.
///
/// Delivery failures (surface not attached yet, script error) are dropped:
/// nobody is waiting on the result of a single keystroke.
pub async fn run_delivery(mut rx: UnboundedReceiver<RemoteKeyEvent>, sink: Arc<dyn RemoteEventSink>) {
    while let Some(event) = rx.recv().await {
        if let Err(e) = sink.dispatch_key_event(event).await {
            debug!("dropped {} {}: {e}", event.action.dom_event_type(), event.code);
        }
    }
    debug!("key delivery queue closed");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
