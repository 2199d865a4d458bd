//! Component instances and the table that owns them.
//!
//! An instance is the persistent half of one mounted occurrence of a node:
//! its state, the pending state written by `set_state`, lifecycle flags and
//! the memoized output of its last render. The rendered tree refers to
//! instances by [`InstanceId`]; the table is the only owner.

use std::collections::HashMap;

use crate::element::{Children, Element};
use crate::types::{InstanceId, Props, Value};

bitflags::bitflags! {
    /// Per-instance lifecycle flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InstanceFlags: u8 {
        /// Pending state change not yet reflected in the last render.
        const DIRTY = 1 << 0;
        /// Skips memoization and is rescheduled every flush.
        const DYNAMIC = 1 << 1;
        /// The `mounted` effect already ran.
        const MOUNTED = 1 << 2;
    }
}

/// Outcome of the bookkeeping half of a render.
pub(crate) enum RenderStep {
    /// Memo hit: reuse the cached output.
    Cached(Children),
    /// Call the node with this (just promoted) state.
    Invoke(Value),
}

pub(crate) struct Instance {
    pub(crate) state: Value,
    pub(crate) next_state: Value,
    pub(crate) old_props: Option<Props>,
    pub(crate) flags: InstanceFlags,
    pub(crate) unmounted: Option<Box<dyn FnOnce()>>,
    pub(crate) last_render: Option<Children>,
    /// Last descriptor this instance rendered; the root of localized re-renders.
    pub(crate) element: Element,
}

impl Instance {
    pub(crate) fn new(element: Element) -> Self {
        Self {
            state: Value::Undefined,
            next_state: Value::Undefined,
            old_props: None,
            flags: InstanceFlags::DIRTY,
            unmounted: None,
            last_render: None,
            element,
        }
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.flags.contains(InstanceFlags::DIRTY)
    }

    pub(crate) fn is_dynamic(&self) -> bool {
        self.flags.contains(InstanceFlags::DYNAMIC)
    }

    /// Set the dynamic flag. Returns true on a not-dynamic -> dynamic edge.
    pub(crate) fn set_dynamic(&mut self, dynamic: bool) -> bool {
        let was = self.is_dynamic();
        self.flags.set(InstanceFlags::DYNAMIC, dynamic);
        !was && dynamic
    }

    /// Mark mounted. Returns true the first time only.
    pub(crate) fn mark_mounted(&mut self) -> bool {
        let first = !self.flags.contains(InstanceFlags::MOUNTED);
        self.flags.insert(InstanceFlags::MOUNTED);
        first
    }

    /// Memo check and state promotion.
    ///
    /// The cached output is reused iff the instance is not dynamic, it has
    /// rendered before, the props have the same key count with every key
    /// strictly identical, and no state write is pending. Children are not
    /// compared: a parent that hands out new children changes a prop or its
    /// own state to get them rendered.
    pub(crate) fn begin_render(&mut self, element: &Element) -> RenderStep {
        self.flags.remove(InstanceFlags::DIRTY);

        let props_unchanged = self
            .old_props
            .as_ref()
            .is_some_and(|old| old.is_identical(element.props()));
        if !self.is_dynamic()
            && props_unchanged
            && self.state.is_identical(&self.next_state)
        {
            if let Some(cached) = &self.last_render {
                return RenderStep::Cached(cached.clone());
            }
        }

        self.state = self.next_state.clone();
        self.old_props = Some(element.props().clone());
        self.element = element.clone();
        RenderStep::Invoke(self.state.clone())
    }
}

// =============================================================================
// Instance Table
// =============================================================================

#[derive(Default)]
pub(crate) struct InstanceTable {
    instances: HashMap<InstanceId, Instance>,
    next_id: u64,
}

impl InstanceTable {
    pub(crate) fn insert(&mut self, instance: Instance) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.instances.insert(id, instance);
        id
    }

    pub(crate) fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        self.instances.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: InstanceId) -> Option<Instance> {
        self.instances.remove(&id)
    }

    pub(crate) fn contains(&self, id: InstanceId) -> bool {
        self.instances.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.instances.len()
    }

    /// Remove every instance, newest first. Descendants mount after their
    /// ancestors, so this is children before parents.
    pub(crate) fn drain(&mut self) -> Vec<(InstanceId, Instance)> {
        let mut all: Vec<_> = self.instances.drain().collect();
        all.sort_by(|a, b| b.0.cmp(&a.0));
        all
    }
}
