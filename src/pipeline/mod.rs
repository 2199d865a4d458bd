//! Frame Pipeline
//!
//! Connects a runtime to the host it is mounted on.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Container input → from_host_event → Dispatcher → set_state → Scheduler
//!                                                                   │
//! next_frame → advance_to(elapsed) → flush ─────────────────────────┘
//!            → reconcile(root) → presentation sink
//! ```
//!
//! ## Key Design Principles
//!
//! - **One frame, one pass**: every frame fires due timers, reconciles the
//!   root and hands the resolved tree to the sink
//! - **Host-paced**: the container decides how long a frame waits and what
//!   time it is, so headless runs are reproducible

mod container;
mod headless;
pub mod mount;
pub mod terminal;

// Re-exports
pub use container::{Container, Listener, Listeners};
pub use headless::HeadlessContainer;
pub use mount::{init_with_config, init_with_renderer, run, tick, MountHandle, Starter};
pub use terminal::TerminalContainer;
