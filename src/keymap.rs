//! Key chords and the run shortcut.

use tokio::sync::broadcast;

use crate::events::{Event, EventBus, drain};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Escape,
}

/// A key plus modifier state. `primary` is Ctrl, or Cmd on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub primary: bool,
    pub shift: bool,
    pub key: Key,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self {
            primary: false,
            shift: false,
            key,
        }
    }

    pub fn primary(key: Key) -> Self {
        Self {
            primary: true,
            shift: false,
            key,
        }
    }

    /// Primary + Enter.
    pub fn run() -> Self {
        Self::primary(Key::Enter)
    }

    pub fn is_run(&self) -> bool {
        self.primary && !self.shift && self.key == Key::Enter
    }
}

/// A live binding of the run chord on an [`EventBus`].
///
/// Holding the binding keeps one listener attached; dropping it detaches.
pub struct RunShortcut {
    rx: broadcast::Receiver<Event>,
}

impl RunShortcut {
    pub fn install(bus: &EventBus) -> Self {
        Self {
            rx: bus.subscribe(),
        }
    }

    /// Drain pending events and count run chords among them.
    pub fn triggered(&mut self) -> usize {
        drain(&mut self.rx)
            .into_iter()
            .filter(|event| matches!(event, Event::Key(chord) if chord.is_run()))
            .count()
    }
}
