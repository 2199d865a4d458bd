//! Engine - instances, reconciliation and the runtime that ties them together.
//!
//! - Instance: persistent per-node state, flags and memoized output
//! - Reconciler: resolves descriptors against the previous rendered tree
//! - Runtime: owns instances, scheduler, dispatcher and the current tree
//! - Features: the per-render API a component function receives
//!
//! # Architecture
//!
//! The rendered tree never owns instances. Each node carries an
//! [`InstanceId`](crate::InstanceId) into the runtime's instance table:
//!
//! ```text
//! Rendered tree                 Instance table
//! #0 Scene ───────────────────► #0 { state, flags, last_render }
//! ├── #1 Rect ────────────────► #1 { ... }
//! └── #2 Rect ────────────────► #2 { ... }
//! ```
//!
//! Reconciliation rebuilds the tree as a new value; a flush re-renders a
//! single subtree and splices it in place.

mod features;
mod instance;
mod reconciler;
mod rendered;
mod runtime;

pub use features::{Features, StateHandle};
pub use instance::InstanceFlags;
pub use rendered::{Rendered, Resolved};
pub use runtime::{Runtime, WeakRuntime};
