//! Host container - where input comes from and frames are paced.

use std::time::Duration;

use crate::error::Result;
use crate::events::{EventKind, HostEvent};

/// Host-side input listener. Receives the container that produced the event
/// so it can read `client_height` while normalizing.
pub type Listener = Box<dyn FnMut(&dyn Container, &HostEvent)>;

/// A surface the runtime is mounted on.
pub trait Container {
    /// Height of the drawable area, used to flip Y into engine space.
    fn client_height(&self) -> f64;

    /// Register a listener for one host event family.
    fn add_event_listener(&mut self, kind: EventKind, listener: Listener);

    /// Wait up to `budget` for the next frame, delivering any input that
    /// arrives meanwhile to the registered listeners.
    fn next_frame(&mut self, budget: Duration) -> Result<()>;

    /// Monotonic time since the container was created.
    fn elapsed(&self) -> Duration;

    /// The host asked to shut down.
    fn is_closed(&self) -> bool {
        false
    }
}

/// Listener set a container keeps per event family.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(EventKind, Listener)>,
}

impl Listeners {
    pub fn add(&mut self, kind: EventKind, listener: Listener) {
        self.entries.push((kind, listener));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Call every listener registered for the family of `raw`.
    pub fn emit(&mut self, container: &dyn Container, raw: &HostEvent) {
        let Some(kind) = raw.kind() else { return };
        for (_, listener) in self.entries.iter_mut().filter(|(k, _)| *k == kind) {
            listener(container, raw);
        }
    }

    /// Append listeners registered while this set was taken out for emitting.
    pub fn merge(&mut self, other: Listeners) {
        self.entries.extend(other.entries);
    }
}
