//! Event Dispatcher - routes engine events through the rendered tree.
//!
//! # API
//!
//! - `handle_event(event, root)` - Hit-test clicks, broadcast key events
//! - `listen(id, kind, fn)` - Register an instance's global key listener
//! - `last_event()` - Last dispatched event (reactive)
//!
//! # Example
//!
//! ```ignore
//! let dispatcher = runtime.dispatcher();
//!
//! // Clicks land on the outermost containing node with `onClick`
//! dispatcher.handle_event(&Event::click(10.0, 20.0), &tree);
//!
//! // Key events visit every instance with a listener
//! dispatcher.handle_event(&Event::key_down("Enter", 13), &tree);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use super::event::{Event, EventKind};
use crate::engine::Rendered;
use crate::types::{Handler, InstanceId};

/// Global key listeners of one instance.
#[derive(Default)]
struct KeyListeners {
    press: Option<Handler>,
    down: Option<Handler>,
}

impl KeyListeners {
    fn get(&self, kind: EventKind) -> Option<&Handler> {
        match kind {
            EventKind::KeyPress => self.press.as_ref(),
            EventKind::KeyDown => self.down.as_ref(),
            EventKind::Click => None,
        }
    }
}

pub struct Dispatcher {
    listeners: RefCell<HashMap<InstanceId, KeyListeners>>,
    last_event: Signal<Option<Event>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(HashMap::new()),
            last_event: signal(None),
        }
    }

    /// Register `f` as the `kind` listener of instance `id`.
    ///
    /// One listener per family per instance; registering again replaces it.
    /// Clicks are routed through `onClick` props, never through listeners.
    pub fn listen(&self, id: InstanceId, kind: EventKind, f: impl Fn(&Event) + 'static) {
        let handler: Handler = Rc::new(f);
        let mut listeners = self.listeners.borrow_mut();
        let entry = listeners.entry(id).or_default();
        match kind {
            EventKind::KeyPress => entry.press = Some(handler),
            EventKind::KeyDown => entry.down = Some(handler),
            EventKind::Click => {
                tracing::warn!(instance = %id, "click listeners are not supported, use onClick");
            }
        }
    }

    /// Drop every listener of an unmounted instance.
    pub(crate) fn forget(&self, id: InstanceId) {
        self.listeners.borrow_mut().remove(&id);
    }

    /// Number of instances with at least one listener.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// The most recently dispatched event.
    pub fn last_event(&self) -> Option<Event> {
        self.last_event.get()
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    pub fn handle_event(&self, event: &Event, root: &Rendered) {
        let Some(kind) = event.kind() else {
            tracing::trace!("unknown event ignored");
            return;
        };
        self.last_event.set(Some(event.clone()));

        match (kind, event) {
            (EventKind::Click, Event::Click { x, y }) => self.dispatch_click(root, *x, *y, event),
            _ => self.dispatch_key(root, kind, event),
        }
    }

    fn dispatch_click(&self, node: &Rendered, x: f64, y: f64, event: &Event) {
        if contains(node, x, y) {
            if let Some(on_click) = node.props.handler("onClick") {
                tracing::trace!(instance = %node.id, x, y, "click");
                let on_click = on_click.clone();
                on_click(event);
                return;
            }
        }
        for child in node.children.nodes() {
            self.dispatch_click(child, x, y, event);
        }
    }

    fn dispatch_key(&self, root: &Rendered, kind: EventKind, event: &Event) {
        // Collect in tree order first so listeners may register or drop
        // listeners themselves.
        let mut targets = Vec::new();
        {
            let listeners = self.listeners.borrow();
            root.walk(&mut |node| {
                if let Some(listener) = listeners.get(&node.id).and_then(|l| l.get(kind)) {
                    targets.push((node.id, listener.clone()));
                }
            });
        }
        for (id, listener) in targets {
            tracing::trace!(instance = %id, ?kind, "key");
            listener(event);
        }
    }
}

/// Center-anchored box test, edges inclusive. Missing geometry never hits.
pub fn contains(node: &Rendered, x: f64, y: f64) -> bool {
    let props = &node.props;
    let (Some(cx), Some(cy), Some(w), Some(h)) = (
        props.number("x"),
        props.number("y"),
        props.number("width"),
        props.number("height"),
    ) else {
        return false;
    };

    let (half_w, half_h) = (w / 2.0, h / 2.0);
    x >= cx - half_w && x <= cx + half_w && y >= cy - half_h && y <= cy + half_h
}
