//! Terminal room preview.
//!
//! A small rendering layer for looking at rooms in a terminal. The core
//! rasterizes into a [`core::Canvas`]; this crate folds pixel pairs into
//! half-block cells and flushes only the cells that changed.
//!
//! Goals:
//! - Keep `core` free of terminal concerns
//! - Square-ish pixels (two per cell, stacked)
//! - Cheap redraws while furniture animates

pub mod fb;
pub mod render_throttle;
pub mod renderer;
pub mod room_view;

pub use isoroom_core as core;
pub use isoroom_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb, HALF_BLOCK};
pub use render_throttle::RenderThrottle;
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, TerminalRenderer};
pub use room_view::{RoomView, TermSize};
