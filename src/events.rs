//! Window-global event scope.
//!
//! Front-ends emit pointer and keyboard signals via [`EventBus::emit`];
//! drag gestures and the run shortcut listen via [`EventBus::subscribe`].
//! Built on [`tokio::sync::broadcast`], so a listener is just a receiver:
//! dropping it detaches the listener, and [`EventBus::listener_count`]
//! shows how many are attached.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use crate::keymap::KeyChord;

/// Pointer signals, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { x: f64, y: f64 },
    Release,
    /// Pointer capture lost without a release.
    Cancel,
    /// The window lost focus mid-gesture.
    Blur,
}

impl PointerEvent {
    /// Whether this signal ends a drag gesture.
    pub fn ends_gesture(&self) -> bool {
        matches!(
            self,
            PointerEvent::Release | PointerEvent::Cancel | PointerEvent::Blur
        )
    }
}

/// Events that flow through the system.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Pointer(PointerEvent),
    Key(KeyChord),
}

/// A broadcast channel that any component can emit to or subscribe from.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all current subscribers.
    /// Returns the number of receivers that will see it.
    pub fn emit(&self, event: Event) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe to events. Returns a receiver that yields all
    /// future events (does not replay past ones).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Take every event currently queued for `rx` without waiting.
/// Events dropped because the listener fell behind are skipped.
pub fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    events
}
