//! Isometric room engine (workspace facade crate).
//!
//! Re-exports the member crates under stable names so callers can write
//! `isoroom::core::Room` or `isoroom::engine::FurnitureEngine` without
//! depending on each crate directly. [`preview`] holds the terminal-free
//! scene behind the `isoroom` binary.

pub mod preview;

pub use isoroom_adapter as adapter;
pub use isoroom_core as core;
pub use isoroom_engine as engine;
pub use isoroom_input as input;
pub use isoroom_term as term;
pub use isoroom_types as types;
