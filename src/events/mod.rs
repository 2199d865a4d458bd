//! Events - engine event types, host normalization and dispatch.
//!
//! Host input arrives as [`HostEvent`] (Y down), is projected into engine
//! space with [`from_host_event`] (Y up) and routed by the [`Dispatcher`].

mod dispatcher;
mod event;

pub use dispatcher::{contains, Dispatcher};
pub use event::*;
