//! Element descriptors.
//!
//! An [`Element`] describes one node: what resolves it ([`NodeType`]), its
//! [`Props`](crate::Props), the children it was handed and an optional
//! sibling [`Key`](crate::Key). Descriptors are built fresh on every render
//! and never mutated; the reconciler consumes them and produces a
//! [`Rendered`](crate::Rendered) tree.

mod descriptor;
mod enhance;

pub use descriptor::*;
pub use enhance::enhance;
