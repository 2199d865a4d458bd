//! Mount API - wiring a runtime to a container and running the frame loop.
//!
//! # Example
//!
//! ```ignore
//! use spark_vdom::pipeline::{init_with_renderer, tick, run};
//!
//! let starter = init_with_renderer(container, |tree| present(tree));
//! let mut handle = starter.start(app())?;
//!
//! // Option 1: Run blocking frame loop
//! run(&mut handle)?;
//!
//! // Option 2: Tick manually in your own loop
//! while tick(&mut handle)? {
//!     // Your logic here
//! }
//!
//! // Clean up
//! handle.unmount();
//! ```

use std::time::Duration;

use crate::config::Config;
use crate::element::Element;
use crate::engine::{Rendered, Runtime};
use crate::error::Result;
use crate::events::{from_host_event, EventKind};

use super::container::Container;

// =============================================================================
// Init
// =============================================================================

/// Wire `container` input into a fresh runtime with default config.
pub fn init_with_renderer<C, S>(container: C, sink: S) -> Starter<C, S>
where
    C: Container,
    S: FnMut(&Rendered),
{
    init_with_config(Config::default(), container, sink)
}

/// Like [`init_with_renderer`] with explicit runtime config.
///
/// Registers click, keypress and keydown listeners on the container. Each
/// normalizes the host event and routes it through the runtime's current
/// tree.
pub fn init_with_config<C, S>(config: Config, mut container: C, sink: S) -> Starter<C, S>
where
    C: Container,
    S: FnMut(&Rendered),
{
    let runtime = Runtime::new(config);

    for kind in [EventKind::Click, EventKind::KeyPress, EventKind::KeyDown] {
        let weak = runtime.downgrade();
        container.add_event_listener(
            kind,
            Box::new(move |host, raw| {
                if let Some(runtime) = weak.upgrade() {
                    runtime.handle_event(&from_host_event(host, raw));
                }
            }),
        );
    }

    Starter {
        runtime,
        container,
        sink,
    }
}

/// A wired runtime waiting for its root element.
pub struct Starter<C, S> {
    runtime: Runtime,
    container: C,
    sink: S,
}

impl<C, S> Starter<C, S>
where
    C: Container,
    S: FnMut(&Rendered),
{
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Render and present the first frame, returning the loop handle.
    pub fn start(self, root: Element) -> Result<MountHandle<C, S>> {
        let Starter {
            runtime,
            container,
            sink,
        } = self;

        let mut handle = MountHandle {
            runtime,
            container,
            sink,
            root,
            running: true,
        };
        let now = handle.container.elapsed();
        handle.frame(now)?;
        Ok(handle)
    }
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`Starter::start`].
///
/// Holds the runtime, the container, the presentation sink and the root
/// element reconciled every frame.
pub struct MountHandle<C, S> {
    runtime: Runtime,
    container: C,
    sink: S,
    root: Element,
    running: bool,
}

impl<C, S> MountHandle<C, S>
where
    C: Container,
    S: FnMut(&Rendered),
{
    /// One frame at time `now`: fire due scheduler timers, reconcile the
    /// root, present the result.
    pub fn frame(&mut self, now: Duration) -> Result<()> {
        self.runtime.advance_to(now)?;
        let tree = self.runtime.reconcile(self.root.clone())?;
        (self.sink)(&tree);
        Ok(())
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    /// Check if still running.
    pub fn is_running(&self) -> bool {
        self.running && !self.container.is_closed()
    }

    /// Stop the frame loop. The tree stays mounted until [`Self::unmount`].
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and unmount the whole tree, firing every unmount callback.
    pub fn unmount(mut self) -> C {
        self.running = false;
        self.runtime.unmount();
        self.container
    }
}

// =============================================================================
// Frame Loop
// =============================================================================

/// Run one frame: wait for the container, then reconcile and present.
///
/// Returns `Ok(false)` once the container closed or `stop` was called.
pub fn tick<C, S>(handle: &mut MountHandle<C, S>) -> Result<bool>
where
    C: Container,
    S: FnMut(&Rendered),
{
    if !handle.is_running() {
        return Ok(false);
    }

    let budget = handle.runtime.config().frame_interval;
    handle.container.next_frame(budget)?;
    if !handle.is_running() {
        return Ok(false);
    }

    let now = handle.container.elapsed();
    handle.frame(now)?;
    Ok(handle.is_running())
}

/// Run frames until the container closes or `stop` is called.
pub fn run<C, S>(handle: &mut MountHandle<C, S>) -> Result<()>
where
    C: Container,
    S: FnMut(&Rendered),
{
    while tick(handle)? {}
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
