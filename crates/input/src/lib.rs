//! Terminal input module (preview-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`crate::types::ViewAction`] and mouse reports into pointer
//! input in canvas pixel coordinates, ready for the room camera.

pub mod handler;
pub mod map;

pub use isoroom_types as types;

pub use handler::{cell_to_pixel, PointerInput, PointerTracker};
pub use map::{handle_key_event, should_quit};
