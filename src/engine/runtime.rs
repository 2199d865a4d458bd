//! Runtime - the context every engine operation runs against.
//!
//! Owns the instance table, the update scheduler, the event dispatcher and
//! the current rendered tree. Nothing is process-global: independent runtimes
//! never share state, which keeps tests isolated.
//!
//! Borrows on the shared cells are always released before user code runs
//! (component functions, lifecycle callbacks, handlers), so that code may call
//! back into the runtime freely.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::instance::{InstanceFlags, InstanceTable};
use super::rendered::Rendered;
use crate::config::Config;
use crate::element::Element;
use crate::error::Result;
use crate::events::{Dispatcher, Event};
use crate::scheduler::{Scheduler, Task};
use crate::types::{InstanceId, Value};

pub(crate) struct Shared {
    pub(crate) config: Config,
    pub(crate) instances: RefCell<InstanceTable>,
    pub(crate) scheduler: RefCell<Scheduler>,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) tree: RefCell<Option<Rc<Rendered>>>,
}

/// Handle to one runtime. Cheap to clone.
#[derive(Clone)]
pub struct Runtime {
    pub(crate) shared: Rc<Shared>,
}

/// Non-owning runtime handle, for closures stored inside the tree.
#[derive(Clone)]
pub struct WeakRuntime(Weak<Shared>);

impl WeakRuntime {
    pub fn upgrade(&self) -> Option<Runtime> {
        self.0.upgrade().map(|shared| Runtime { shared })
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Runtime {
    pub fn new(config: Config) -> Self {
        let scheduler = Scheduler::new(config.flush_interval);
        Self {
            shared: Rc::new(Shared {
                config,
                instances: RefCell::new(InstanceTable::default()),
                scheduler: RefCell::new(scheduler),
                dispatcher: Dispatcher::new(),
                tree: RefCell::new(None),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn downgrade(&self) -> WeakRuntime {
        WeakRuntime(Rc::downgrade(&self.shared))
    }

    /// The most recent rendered tree.
    pub fn tree(&self) -> Option<Rc<Rendered>> {
        self.shared.tree.borrow().clone()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.shared.dispatcher
    }

    /// Number of live instances.
    pub fn instance_count(&self) -> usize {
        self.shared.instances.borrow().len()
    }

    pub fn is_mounted(&self, id: InstanceId) -> bool {
        self.shared.instances.borrow().contains(id)
    }

    /// Current state of an instance.
    pub fn state_of(&self, id: InstanceId) -> Option<Value> {
        self.shared.instances.borrow().get(id).map(|i| i.state.clone())
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Route an event through the current tree.
    pub fn handle_event(&self, event: &Event) {
        // Handlers run against a snapshot; a flush they trigger swaps the tree.
        let Some(tree) = self.tree() else { return };
        self.shared.dispatcher.handle_event(event, &tree);
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Store pending state and schedule the instance.
    ///
    /// Writing to an unmounted instance is a no-op.
    pub(crate) fn set_state(&self, id: InstanceId, value: Value) {
        {
            let mut instances = self.shared.instances.borrow_mut();
            let Some(instance) = instances.get_mut(id) else {
                tracing::debug!(instance = %id, "set_state on unmounted instance ignored");
                return;
            };
            instance.next_state = value;
        }
        self.push_update(id);
    }

    /// Mark dirty and enqueue on the scheduler.
    pub(crate) fn push_update(&self, id: InstanceId) {
        {
            let mut instances = self.shared.instances.borrow_mut();
            let Some(instance) = instances.get_mut(id) else {
                tracing::debug!(instance = %id, "update for unmounted instance dropped");
                return;
            };
            instance.flags.insert(InstanceFlags::DIRTY);
        }
        self.shared.scheduler.borrow_mut().enqueue(id);
    }

    /// Current virtual time of the scheduler.
    pub fn now(&self) -> Duration {
        self.shared.scheduler.borrow().now()
    }

    /// Number of flush batches run so far.
    pub fn flush_count(&self) -> u64 {
        self.shared.scheduler.borrow().flush_count()
    }

    /// Instances waiting for the next flush.
    pub fn pending_updates(&self) -> usize {
        self.shared.scheduler.borrow().pending()
    }

    /// Advance virtual time by `dt`, firing every timer that falls due.
    pub fn advance(&self, dt: Duration) -> Result<()> {
        let target = self.now() + dt;
        self.advance_to(target)
    }

    /// Advance virtual time to `t`, firing due timers in deadline order,
    /// including timers armed while firing.
    pub fn advance_to(&self, t: Duration) -> Result<()> {
        loop {
            let task = self.shared.scheduler.borrow_mut().pop_due(t);
            match task {
                None => break,
                Some(Task::Flush) => self.flush()?,
                Some(Task::Requeue(ids)) => {
                    for id in ids {
                        self.push_update(id);
                    }
                }
            }
        }
        self.shared.scheduler.borrow_mut().settle(t);
        Ok(())
    }

    /// Drain the queue as one batch, in enqueue order.
    fn flush(&self) -> Result<()> {
        let batch = self.shared.scheduler.borrow_mut().take_batch();
        tracing::debug!(size = batch.len(), "flush");

        let mut dynamic = Vec::new();
        for id in batch {
            let element = {
                let instances = self.shared.instances.borrow();
                let Some(instance) = instances.get(id) else {
                    continue;
                };
                instance.is_dirty().then(|| instance.element.clone())
            };

            if let Some(element) = element {
                self.rerender(id, element)?;
            }

            let is_dynamic = self
                .shared
                .instances
                .borrow()
                .get(id)
                .is_some_and(|i| i.is_dynamic());
            if is_dynamic && !dynamic.contains(&id) {
                dynamic.push(id);
            }
        }

        self.shared.scheduler.borrow_mut().defer(dynamic);
        Ok(())
    }

    /// Re-reconcile the subtree rooted at `id` and splice it into the tree.
    fn rerender(&self, id: InstanceId, element: Element) -> Result<()> {
        let Some(mut tree) = self.shared.tree.borrow_mut().take() else {
            return Ok(());
        };

        let result = match tree.find(id) {
            Some(old) => self.reconcile_node(element, Some(old)).map(Some),
            None => {
                tracing::debug!(instance = %id, "dirty instance not in current tree");
                Ok(None)
            }
        };

        match result {
            Ok(node) => {
                if let Some(node) = node {
                    Rc::make_mut(&mut tree).replace(id, node);
                }
                *self.shared.tree.borrow_mut() = Some(tree);
                Ok(())
            }
            Err(err) => {
                self.abort_pass(Some(&tree));
                Err(err)
            }
        }
    }

    /// Unmount the whole current tree, firing every unmount callback.
    pub fn unmount(&self) {
        let tree = self.shared.tree.borrow_mut().take();
        if let Some(tree) = tree {
            self.unmount_subtree(&tree);
        }
    }
}
