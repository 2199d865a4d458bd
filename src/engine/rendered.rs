//! The rendered tree - output of reconciliation.

use std::rc::Rc;

use crate::element::NodeType;
use crate::types::{InstanceId, Key, Props};

/// Fully resolved children of a rendered node.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Resolved {
    #[default]
    Empty,
    Text(Rc<str>),
    Number(f64),
    Nodes(Vec<Rendered>),
}

impl Resolved {
    /// Child nodes; empty for leaves.
    pub fn nodes(&self) -> &[Rendered] {
        match self {
            Resolved::Nodes(nodes) => nodes,
            _ => &[],
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Resolved::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Resolved::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One node of the rendered tree, bound to the instance that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    pub id: InstanceId,
    pub ty: NodeType,
    pub props: Props,
    pub key: Option<Key>,
    pub children: Resolved,
}

impl Rendered {
    pub fn child(&self, index: usize) -> Option<&Rendered> {
        self.children.nodes().get(index)
    }

    /// Follow a path of child indices.
    pub fn at(&self, path: &[usize]) -> Option<&Rendered> {
        path.iter().try_fold(self, |node, &i| node.child(i))
    }

    /// Depth-first search for the node bound to `id`.
    pub fn find(&self, id: InstanceId) -> Option<&Rendered> {
        if self.id == id {
            return Some(self);
        }
        self.children.nodes().iter().find_map(|c| c.find(id))
    }

    /// Swap the node bound to `id` for `node`. Returns whether it was found.
    pub(crate) fn replace(&mut self, id: InstanceId, node: Rendered) -> bool {
        let mut slot = Some(node);
        self.replace_in(id, &mut slot);
        slot.is_none()
    }

    fn replace_in(&mut self, id: InstanceId, slot: &mut Option<Rendered>) {
        if self.id == id {
            if let Some(node) = slot.take() {
                *self = node;
            }
            return;
        }
        if let Resolved::Nodes(children) = &mut self.children {
            for child in children {
                if slot.is_none() {
                    return;
                }
                child.replace_in(id, slot);
            }
        }
    }

    /// Pre-order walk.
    pub fn walk(&self, f: &mut impl FnMut(&Rendered)) {
        f(self);
        for child in self.children.nodes() {
            child.walk(f);
        }
    }

    /// Number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.nodes().iter().map(Rendered::node_count).sum::<usize>()
    }
}
