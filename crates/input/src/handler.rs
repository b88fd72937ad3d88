//! Mouse tracking for terminal environments.
//!
//! Terminal mice report cell coordinates. The preview draws two pixels per
//! cell vertically (half blocks), so a cell maps to the pixel at its center:
//! `(column + 0.5, row * 2 + 1)`. Movement is derived from the previous
//! report since crossterm does not carry deltas.

use arrayvec::ArrayVec;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::types::Vec2;

/// Pixels scrolled per wheel notch, matching a browser's line delta.
pub const WHEEL_DELTA: f64 = 100.0;

/// Pointer input in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down(Vec2),
    Move { position: Vec2, movement: Vec2 },
    Up(Vec2),
    Wheel { delta_y: f64, position: Vec2 },
}

/// Converts crossterm mouse reports into pointer input.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    last: Option<Vec2>,
    pressed: bool,
}

pub fn cell_to_pixel(column: u16, row: u16) -> Vec2 {
    Vec2::new(column as f64 + 0.5, row as f64 * 2.0 + 1.0)
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn position(&self) -> Option<Vec2> {
        self.last
    }

    /// Translate one report. A press or release at a new cell is preceded by
    /// a move so hover state stays in sync.
    pub fn handle(&mut self, event: MouseEvent) -> ArrayVec<PointerInput, 2> {
        let mut out = ArrayVec::new();
        let position = cell_to_pixel(event.column, event.row);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.push_move(position, &mut out);
                self.pressed = true;
                out.push(PointerInput::Down(position));
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.push_move(position, &mut out);
                self.pressed = false;
                out.push(PointerInput::Up(position));
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                self.push_move(position, &mut out);
            }
            MouseEventKind::ScrollUp => out.push(PointerInput::Wheel {
                delta_y: -WHEEL_DELTA,
                position,
            }),
            MouseEventKind::ScrollDown => out.push(PointerInput::Wheel {
                delta_y: WHEEL_DELTA,
                position,
            }),
            _ => {}
        }
        out
    }

    fn push_move(&mut self, position: Vec2, out: &mut ArrayVec<PointerInput, 2>) {
        let previous = self.last.replace(position);
        let movement = match previous {
            Some(p) if p == position => return,
            Some(p) => position - p,
            None => Vec2::ZERO,
        };
        out.push(PointerInput::Move { position, movement });
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.pressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_press_emits_move_then_down() {
        let mut t = PointerTracker::new();
        let out = t.handle(mouse(MouseEventKind::Down(MouseButton::Left), 3, 2));
        assert_eq!(
            out.as_slice(),
            &[
                PointerInput::Move {
                    position: Vec2::new(3.5, 5.0),
                    movement: Vec2::ZERO
                },
                PointerInput::Down(Vec2::new(3.5, 5.0)),
            ]
        );
        assert!(t.is_pressed());
    }

    #[test]
    fn test_drag_reports_movement() {
        let mut t = PointerTracker::new();
        t.handle(mouse(MouseEventKind::Down(MouseButton::Left), 3, 2));
        let out = t.handle(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 1));
        assert_eq!(
            out.as_slice(),
            &[PointerInput::Move {
                position: Vec2::new(5.5, 3.0),
                movement: Vec2::new(2.0, -2.0)
            }]
        );

        // Same cell again: nothing new.
        assert!(t.handle(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 1)).is_empty());

        let out = t.handle(mouse(MouseEventKind::Up(MouseButton::Left), 5, 1));
        assert_eq!(out.as_slice(), &[PointerInput::Up(Vec2::new(5.5, 3.0))]);
        assert!(!t.is_pressed());
    }

    #[test]
    fn test_scroll_maps_to_wheel() {
        let mut t = PointerTracker::new();
        let out = t.handle(mouse(MouseEventKind::ScrollUp, 0, 0));
        assert_eq!(
            out.as_slice(),
            &[PointerInput::Wheel {
                delta_y: -WHEEL_DELTA,
                position: Vec2::new(0.5, 1.0)
            }]
        );
    }
}
