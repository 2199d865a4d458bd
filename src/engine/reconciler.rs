//! Reconciler - resolves descriptors into a rendered tree.
//!
//! Each pass builds a new [`Rendered`] value from the previous tree and the
//! fresh descriptors; neither input is mutated. Instances survive a pass only
//! when their node is matched:
//!
//! ```text
//! new child ──key?──► old child with same key
//!           └─none──► old child at same index
//!
//! matched && same type  → transplant instance (state kept)
//! otherwise             → unmount old subtree, mount fresh instance
//! ```
//!
//! Reordering keyed siblings therefore never remounts them, and a type change
//! at a key/position is always unmount-then-mount.
//!
//! A pass that fails part way (invalid primitive geometry) has already
//! unmounted some old nodes and mounted some new ones. It is not rolled back:
//! the whole tree is unmounted and the runtime is left empty.

use std::rc::Rc;

use super::features::Features;
use super::instance::{Instance, RenderStep};
use super::rendered::{Rendered, Resolved};
use super::runtime::Runtime;
use crate::element::{Children, Element, NodeType};
use crate::error::Result;
use crate::primitives;
use crate::types::InstanceId;

impl Runtime {
    /// Run one reconciliation pass rooted at `element`.
    ///
    /// The root is matched against the current tree with the same rule as
    /// children: same key and same type keep the root instance. The result
    /// becomes the current tree. On error nothing stays mounted.
    pub fn reconcile(&self, element: Element) -> Result<Rc<Rendered>> {
        let previous = self.shared.tree.borrow_mut().take();
        let reuse = previous
            .as_ref()
            .is_some_and(|old| old.ty == element.ty && old.key == element.key);

        if let (false, Some(old)) = (reuse, &previous) {
            self.unmount_subtree(old);
        }

        let old = previous.as_deref().filter(|_| reuse);
        let tree = match self.reconcile_node(element, old) {
            Ok(node) => Rc::new(node),
            Err(err) => {
                self.abort_pass(previous.as_deref());
                return Err(err);
            }
        };

        *self.shared.tree.borrow_mut() = Some(tree.clone());
        Ok(tree)
    }

    /// Resolve one node, reusing the instance of `old` when given.
    pub(crate) fn reconcile_node(&self, element: Element, old: Option<&Rendered>) -> Result<Rendered> {
        if let NodeType::Primitive(tag) = &element.ty {
            if self.shared.config.validate_primitives {
                primitives::validate_geometry(*tag, &element.props)?;
            }
        }

        let id = self.attach_instance(&element, old);
        let output = self.render_instance(id, &element);

        let old_children = old.map_or(&[][..], |o| o.children.nodes());
        let children = match output {
            Children::None => self.resolve_leaf(old_children, Resolved::Empty),
            Children::Text(text) => self.resolve_leaf(old_children, Resolved::Text(text)),
            Children::Number(n) => self.resolve_leaf(old_children, Resolved::Number(n)),
            Children::One(child) => {
                Resolved::Nodes(self.reconcile_children(std::slice::from_ref(&*child), old_children)?)
            }
            Children::Many(list) => Resolved::Nodes(self.reconcile_children(&list, old_children)?),
        };

        let Element { ty, props, key, .. } = element;
        Ok(Rendered {
            id,
            ty,
            props,
            key,
            children,
        })
    }

    fn attach_instance(&self, element: &Element, old: Option<&Rendered>) -> InstanceId {
        let mut instances = self.shared.instances.borrow_mut();
        match old.map(|o| o.id).filter(|id| instances.contains(*id)) {
            Some(id) => id,
            None => {
                let id = instances.insert(Instance::new(element.clone()));
                tracing::trace!(instance = %id, node = element.ty.name(), "mount");
                id
            }
        }
    }

    /// Memo check, then call the node. Primitives yield their own children.
    fn render_instance(&self, id: InstanceId, element: &Element) -> Children {
        let step = match self.shared.instances.borrow_mut().get_mut(id) {
            Some(instance) => instance.begin_render(element),
            None => return Children::None,
        };

        let state = match step {
            RenderStep::Cached(output) => {
                tracing::trace!(instance = %id, "memo hit");
                return output;
            }
            RenderStep::Invoke(state) => state,
        };

        let output = match &element.ty {
            NodeType::Component(component) => {
                let features = Features::new(self.clone(), id, state);
                component.call(&element.props, &element.children, &features)
            }
            NodeType::Primitive(_) => element.children.clone(),
        };

        if let Some(instance) = self.shared.instances.borrow_mut().get_mut(id) {
            instance.last_render = Some(output.clone());
        }
        output
    }

    /// A leaf output replaces whatever nodes were there before.
    fn resolve_leaf(&self, old_children: &[Rendered], leaf: Resolved) -> Resolved {
        for old in old_children {
            self.unmount_subtree(old);
        }
        leaf
    }

    fn reconcile_children(&self, children: &[Element], old: &[Rendered]) -> Result<Vec<Rendered>> {
        // Match every new child against the old snapshot. An old child is
        // claimed at most once so an instance never has two owners.
        let mut claimed = vec![false; old.len()];
        let mut matches = Vec::with_capacity(children.len());
        for (index, child) in children.iter().enumerate() {
            let candidate = match &child.key {
                Some(key) => old.iter().position(|o| o.key.as_ref() == Some(key)),
                None => (index < old.len()).then_some(index),
            };
            let matched = candidate.filter(|&j| !claimed[j] && old[j].ty == child.ty);
            if let Some(j) = matched {
                claimed[j] = true;
            }
            matches.push(matched);
        }

        for (old_child, kept) in old.iter().zip(&claimed) {
            if !kept {
                self.unmount_subtree(old_child);
            }
        }

        children
            .iter()
            .zip(matches)
            .map(|(child, matched)| self.reconcile_node(child.clone(), matched.map(|j| &old[j])))
            .collect()
    }

    /// Tear everything down after a failed pass: what is left of the previous
    /// tree, then instances the pass mounted that no tree points at.
    pub(crate) fn abort_pass(&self, previous: Option<&Rendered>) {
        if let Some(old) = previous {
            self.unmount_subtree(old);
        }

        let orphans = self.shared.instances.borrow_mut().drain();
        tracing::warn!(orphans = orphans.len(), "reconcile failed, tree unmounted");
        for (id, instance) in orphans {
            self.shared.dispatcher.forget(id);
            if let Some(callback) = instance.unmounted {
                callback();
            }
        }
    }

    /// Destroy a subtree: descendants first, each unmount callback once.
    pub(crate) fn unmount_subtree(&self, node: &Rendered) {
        for child in node.children.nodes() {
            self.unmount_subtree(child);
        }

        let removed = self.shared.instances.borrow_mut().remove(node.id);
        self.shared.dispatcher.forget(node.id);

        if let Some(instance) = removed {
            tracing::trace!(instance = %node.id, node = node.ty.name(), "unmount");
            if let Some(callback) = instance.unmounted {
                callback();
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
