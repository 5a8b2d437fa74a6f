//! Input state consumed by the core.
//!
//! # Invariants
//! - The core never polls devices; the host fills an [`InputState`] and passes it in.
//! - Movement is expressed as [`MoveAction`]s, each bound to two keys.

pub mod action;
pub mod state;

pub use action::{Key, MoveAction};
pub use state::{InputSource, InputState};

pub fn crate_info() -> &'static str {
    "blockfield-input v0.1.0"
}
