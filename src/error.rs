//! Error type shared by the whole crate.

use std::io;

/// Errors surfaced by the runtime.
///
/// Faults inside component functions or event handlers are not represented
/// here: they panic and propagate to the caller of the frame that ran them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `key` prop that is neither a string nor a number.
    #[error("invalid key {0}: keys must be strings or numbers")]
    InvalidKey(String),

    /// A primitive whose geometry props cannot be laid out.
    #[error("primitive {tag} has invalid `{prop}`: {reason}")]
    InvalidGeometry {
        tag: &'static str,
        prop: &'static str,
        reason: &'static str,
    },

    /// The terminal host failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
