//! Features - the per-instance API handed to component functions.

use super::runtime::{Runtime, WeakRuntime};
use crate::events::{Event, EventKind};
use crate::types::{InstanceId, Value};

/// State and lifecycle access for the instance being rendered.
///
/// Only valid during the render that received it. Use [`Features::setter`]
/// to update state later from an event handler or callback.
pub struct Features {
    runtime: Runtime,
    id: InstanceId,
    state: Value,
}

impl Features {
    pub(crate) fn new(runtime: Runtime, id: InstanceId, state: Value) -> Self {
        Self { runtime, id, state }
    }

    /// Id of the instance being rendered.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// State as of this render. `Undefined` until the first write lands.
    pub fn state(&self) -> &Value {
        &self.state
    }

    /// Store `value` as pending state and schedule a re-render.
    ///
    /// Does not re-render synchronously; the new state shows up after the
    /// next flush.
    pub fn set_state(&self, value: impl Into<Value>) {
        self.runtime.set_state(self.id, value.into());
    }

    /// A handle that can set this instance's state after the render returns.
    pub fn setter(&self) -> StateHandle {
        StateHandle {
            runtime: self.runtime.downgrade(),
            id: self.id,
        }
    }

    /// Run `f` the first time this is reached on a not-yet-mounted instance.
    pub fn mounted(&self, f: impl FnOnce()) {
        let first = self
            .runtime
            .shared
            .instances
            .borrow_mut()
            .get_mut(self.id)
            .is_some_and(|i| i.mark_mounted());
        if first {
            tracing::trace!(instance = %self.id, "mounted");
            f();
        }
    }

    /// Register the callback to run when this instance is removed.
    /// Replaces any previously registered one.
    pub fn unmounted(&self, f: impl FnOnce() + 'static) {
        if let Some(instance) = self.runtime.shared.instances.borrow_mut().get_mut(self.id) {
            instance.unmounted = Some(Box::new(f));
        }
    }

    /// Opt in or out of memoization and per-flush rescheduling.
    ///
    /// Turning it on schedules the instance right away.
    pub fn dynamic(&self, dynamic: bool) {
        let became_dynamic = self
            .runtime
            .shared
            .instances
            .borrow_mut()
            .get_mut(self.id)
            .is_some_and(|i| i.set_dynamic(dynamic));
        if became_dynamic {
            self.runtime.push_update(self.id);
        }
    }

    /// Listen to every key press while this instance is mounted.
    pub fn on_global_key_press(&self, f: impl Fn(&Event) + 'static) {
        self.runtime
            .shared
            .dispatcher
            .listen(self.id, EventKind::KeyPress, f);
    }

    /// Listen to every key down while this instance is mounted.
    pub fn on_global_key_down(&self, f: impl Fn(&Event) + 'static) {
        self.runtime
            .shared
            .dispatcher
            .listen(self.id, EventKind::KeyDown, f);
    }
}

/// Deferred state setter bound to one instance.
///
/// Holds the runtime weakly, so storing it in props does not keep the runtime
/// alive. Setting state on an unmounted instance does nothing.
#[derive(Clone)]
pub struct StateHandle {
    runtime: WeakRuntime,
    id: InstanceId,
}

impl StateHandle {
    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn set(&self, value: impl Into<Value>) {
        if let Some(runtime) = self.runtime.upgrade() {
            runtime.set_state(self.id, value.into());
        }
    }
}
