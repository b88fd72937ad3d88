//! RoomView: maps a rasterized room canvas into a terminal framebuffer.
//!
//! This module is pure (no I/O). Each terminal cell shows two canvas pixels
//! stacked vertically with a half-block glyph; the last row is a status line.

use crate::core::Canvas;
use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Terminal size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub width: u16,
    pub height: u16,
}

impl TermSize {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Canvas pixels backing the cells above the status line.
    pub fn canvas_size(self) -> (u32, u32) {
        (self.width as u32, self.height.saturating_sub(1) as u32 * 2)
    }
}

pub struct RoomView {
    /// Terminal color under transparent canvas pixels.
    backdrop: Rgb,
    status: CellStyle,
}

impl Default for RoomView {
    fn default() -> Self {
        Self {
            backdrop: Rgb::new(0, 0, 0),
            status: CellStyle::new(Rgb::new(230, 230, 230), Rgb::new(40, 40, 60)).bold(),
        }
    }
}

impl RoomView {
    pub fn new(backdrop: Rgb) -> Self {
        Self {
            backdrop,
            ..Self::default()
        }
    }

    /// Render `canvas` plus a status line into `fb`, resizing it to `size`.
    pub fn render_into(&self, canvas: &Canvas, status: &str, size: TermSize, fb: &mut FrameBuffer) {
        fb.resize(size.width, size.height);
        let rows = size.height.saturating_sub(1);

        let pixel = |x: u32, y: u32| match canvas.pixel(x, y) {
            Some(rgba) => self.backdrop.under(rgba),
            None => self.backdrop,
        };
        for row in 0..rows {
            for col in 0..size.width {
                let (x, y) = (col as u32, row as u32 * 2);
                fb.put_pixels(col, row, pixel(x, y), pixel(x, y + 1));
            }
        }

        if size.height > 0 {
            fb.fill_row(rows, self.status);
            fb.put_str(1, rows, status, self.status);
        }
    }

    pub fn render(&self, canvas: &Canvas, status: &str, size: TermSize) -> FrameBuffer {
        let mut fb = FrameBuffer::new(size.width, size.height);
        self.render_into(canvas, status, size, &mut fb);
        fb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::HALF_BLOCK;

    #[test]
    fn canvas_size_reserves_status_line() {
        assert_eq!(TermSize::new(80, 24).canvas_size(), (80, 46));
        assert_eq!(TermSize::new(10, 0).canvas_size(), (10, 0));
    }

    #[test]
    fn pixels_pair_into_half_blocks() {
        let mut canvas = Canvas::new(2, 2);
        canvas.clear(0xff0000, 1.0);
        let fb = RoomView::default().render(&canvas, "zoom 1.00", TermSize::new(3, 2));

        let cell = fb.get(0, 0).unwrap();
        assert_eq!(cell.ch, HALF_BLOCK);
        assert_eq!(cell.style.fg, Rgb::new(255, 0, 0));
        assert_eq!(cell.style.bg, Rgb::new(255, 0, 0));

        // Outside the canvas shows the backdrop.
        assert_eq!(fb.get(2, 0).unwrap().style.fg, Rgb::new(0, 0, 0));

        assert_eq!(fb.get(1, 1).unwrap().ch, 'z');
    }

    #[test]
    fn transparent_canvas_shows_backdrop() {
        let canvas = Canvas::new(1, 2);
        let view = RoomView::new(Rgb::new(9, 9, 9));
        let fb = view.render(&canvas, "", TermSize::new(1, 2));
        assert_eq!(fb.get(0, 0).unwrap().style.fg, Rgb::new(9, 9, 9));
    }
}
