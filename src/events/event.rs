//! Event types and host-event normalization.

use crate::pipeline::Container;

// =============================================================================
// Types
// =============================================================================

bitflags::bitflags! {
    /// Keyboard modifiers held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const CTRL = 1 << 0;
        const ALT = 1 << 1;
        const SHIFT = 1 << 2;
        const META = 1 << 3;
    }
}

/// Event families a container can be listened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyPress,
    KeyDown,
}

/// Keyboard payload.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// The key (e.g. "a", "Enter", "ArrowUp").
    pub key: String,
    /// Legacy numeric key code.
    pub key_code: u32,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, key_code: u32) -> Self {
        Self {
            key: key.into(),
            key_code,
            modifiers: Modifiers::empty(),
        }
    }
}

/// An event in engine space (Y grows upward).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Click { x: f64, y: f64 },
    KeyPress(KeyEvent),
    KeyDown(KeyEvent),
    /// Anything the engine does not route. Ignored by the dispatcher.
    Unknown,
}

impl Event {
    pub fn click(x: f64, y: f64) -> Self {
        Event::Click { x, y }
    }

    pub fn key_press(key: impl Into<String>, key_code: u32) -> Self {
        Event::KeyPress(KeyEvent::new(key, key_code))
    }

    pub fn key_down(key: impl Into<String>, key_code: u32) -> Self {
        Event::KeyDown(KeyEvent::new(key, key_code))
    }

    pub fn kind(&self) -> Option<EventKind> {
        match self {
            Event::Click { .. } => Some(EventKind::Click),
            Event::KeyPress(_) => Some(EventKind::KeyPress),
            Event::KeyDown(_) => Some(EventKind::KeyDown),
            Event::Unknown => None,
        }
    }

    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            Event::KeyPress(k) | Event::KeyDown(k) => Some(k),
            _ => None,
        }
    }
}

/// A raw event as the host delivers it, in host space (Y grows downward).
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Click { offset_x: f64, offset_y: f64 },
    KeyPress { key: String, key_code: u32 },
    KeyDown { key: String, key_code: u32 },
    /// Named host event with no engine meaning (resize, focus, ...).
    Other(String),
}

impl HostEvent {
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            HostEvent::Click { .. } => Some(EventKind::Click),
            HostEvent::KeyPress { .. } => Some(EventKind::KeyPress),
            HostEvent::KeyDown { .. } => Some(EventKind::KeyDown),
            HostEvent::Other(_) => None,
        }
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Project a host event into engine space.
///
/// Clicks keep `offset_x` and flip Y against the container height. Key events
/// pass `key` and `key_code` through; modifiers are left empty.
pub fn from_host_event<C: Container + ?Sized>(container: &C, raw: &HostEvent) -> Event {
    match raw {
        HostEvent::Click { offset_x, offset_y } => Event::Click {
            x: *offset_x,
            y: container.client_height() - offset_y,
        },
        HostEvent::KeyPress { key, key_code } => Event::key_press(key.clone(), *key_code),
        HostEvent::KeyDown { key, key_code } => Event::key_down(key.clone(), *key_code),
        HostEvent::Other(_) => Event::Unknown,
    }
}
