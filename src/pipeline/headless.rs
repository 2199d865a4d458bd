//! Headless container - an in-memory host for tests and offscreen runs.
//!
//! Input is queued with [`HeadlessContainer::push`] and delivered on the next
//! frame. Time advances by exactly one budget per frame, so a run is fully
//! reproducible.

use std::time::Duration;

use super::container::{Container, Listener, Listeners};
use crate::error::Result;
use crate::events::{EventKind, HostEvent};

pub struct HeadlessContainer {
    height: f64,
    listeners: Listeners,
    inbox: Vec<HostEvent>,
    elapsed: Duration,
    frames: u64,
    closed: bool,
}

impl HeadlessContainer {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            listeners: Listeners::default(),
            inbox: Vec::new(),
            elapsed: Duration::ZERO,
            frames: 0,
            closed: false,
        }
    }

    /// Queue a host event for the next frame.
    pub fn push(&mut self, raw: HostEvent) {
        self.inbox.push(raw);
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height;
    }

    /// Make the next `is_closed` check report shutdown.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Frames waited so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Container for HeadlessContainer {
    fn client_height(&self) -> f64 {
        self.height
    }

    fn add_event_listener(&mut self, kind: EventKind, listener: Listener) {
        self.listeners.add(kind, listener);
    }

    fn next_frame(&mut self, budget: Duration) -> Result<()> {
        let inbox = std::mem::take(&mut self.inbox);
        let mut listeners = std::mem::take(&mut self.listeners);
        for raw in &inbox {
            listeners.emit(&*self, raw);
        }
        listeners.merge(std::mem::take(&mut self.listeners));
        self.listeners = listeners;

        self.elapsed += budget;
        self.frames += 1;
        Ok(())
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
