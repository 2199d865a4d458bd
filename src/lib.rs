//! # spark-vdom
//!
//! Retained-mode UI runtime: declarative element trees resolved frame after
//! frame into a rendered tree, with per-node instances that keep state and
//! lifecycle across frames.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! reactive bits (the dispatcher's last event).
//!
//! ## Architecture
//!
//! ```text
//! Element tree → reconcile → Rendered tree → presentation sink
//!                    ▲                 │
//!     flush ◄── Scheduler ◄── set_state ◄── Dispatcher ◄── host input
//! ```
//!
//! Instances live in a table keyed by [`InstanceId`]; the rendered tree only
//! refers to them. A runtime is an explicit context, never a global, so any
//! number of independent trees can coexist.
//!
//! ## Modules
//!
//! - [`element`] - Element descriptors, components, `create_element`
//! - [`engine`] - Instances, reconciler, runtime, per-render features
//! - [`scheduler`] - Throttled batching of re-renders on virtual time
//! - [`events`] - Engine events, host normalization, hit-test dispatch
//! - [`pipeline`] - Containers and the frame loop
//! - [`primitives`] - `rect` / `sprite` leaf shapes

pub mod config;
pub mod element;
pub mod engine;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod primitives;
pub mod scheduler;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{Config, BATCH_UPDATE_INTERVAL, FRAME_INTERVAL};
pub use error::{Error, Result};

pub use element::{create_element, enhance, try_create_element, Children, Component, Element, NodeType, Tag};

pub use engine::{Features, InstanceFlags, Rendered, Resolved, Runtime, StateHandle, WeakRuntime};

pub use events::{from_host_event, Dispatcher, Event, EventKind, HostEvent, KeyEvent, Modifiers};

pub use pipeline::{
    init_with_config, init_with_renderer, run, tick, Container, HeadlessContainer, MountHandle,
    Starter, TerminalContainer,
};

pub use primitives::{rect, sprite, RECT, SPRITE};
