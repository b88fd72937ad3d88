//! Sorting module - paint order for room primitives
//!
//! Painter's algorithm: everything is drawn in ascending order. Room parts and
//! room objects (furniture) live in separate layers; parts are painted first.
//!
//! Part layer scale:
//! - walls: `(z - 1) * 4 + face offset`, face offsets TOP 0, LEFT -0.5, RIGHT -0.6.
//!   Heights are single digits, so every wall sorts below [`FLOOR_ORDER_BASE`].
//! - floor tiles: `FLOOR_ORDER_BASE + depth * FLOOR_DEPTH_STEP` with
//!   `depth = (x + sx - 1) + (y + sy - 1) + z`.
//! - door tile: one `DOOR_ORDER_ADJUST` below a plain tile at the same cell.
//! - stair steps: a plain tile's order plus `STAIR_ORDER_BIAS`, front steps last.
//!
//! Object layer scale:
//! - floor furniture: `(x + y + z) * 100 + layer z offset`.
//!
//! Offsets stay below one depth step so they never reorder different depths.

use crate::types::{CubeFace, TilePosition, Vec3};

pub const WALL_TIER_STEP: f64 = 4.0;
pub const FLOOR_ORDER_BASE: f64 = 40.0;
pub const FLOOR_DEPTH_STEP: f64 = 4.0;
pub const DOOR_ORDER_ADJUST: f64 = 2.0;
pub const STAIR_ORDER_BIAS: f64 = 1.0;
pub const STAIR_STEP_BIAS: f64 = 0.5;
pub const FURNITURE_DEPTH_STEP: f64 = 100.0;

/// Per-face offset that orders one wall's own faces.
pub fn wall_face_offset(face: CubeFace) -> f64 {
    match face {
        CubeFace::Top => 0.0,
        CubeFace::Left => -0.5,
        CubeFace::Right => -0.6,
    }
}

/// Wall face order at height tier `z`.
pub fn wall_order(z: i32, face: CubeFace) -> f64 {
    (z - 1) as f64 * WALL_TIER_STEP + wall_face_offset(face)
}

/// Orders for a wall's TOP, LEFT and RIGHT faces.
pub fn wall_orders(z: i32) -> [f64; 3] {
    CubeFace::ALL.map(|face| wall_order(z, face))
}

/// Floor tile order for a tile of `size` (in tiles) at `position`.
pub fn floor_order(position: TilePosition, size: (i32, i32), door: bool) -> f64 {
    let depth = (position.x + size.0 - 1) + (position.y + size.1 - 1) + position.z;
    let order = FLOOR_ORDER_BASE + depth as f64 * FLOOR_DEPTH_STEP;
    if door {
        order - DOOR_ORDER_ADJUST
    } else {
        order
    }
}

/// Stair step order; `step` 0 is the lowest (front) step.
pub fn stair_order(position: TilePosition, step: usize, steps: usize) -> f64 {
    let from_back = steps.saturating_sub(step + 1) as f64;
    floor_order(position, (1, 1), false) + STAIR_ORDER_BIAS + from_back * STAIR_STEP_BIAS
}

/// Floor furniture layer order.
pub fn floor_furniture_order(position: Vec3, layer_z: f64) -> f64 {
    (position.x + position.y + position.z) * FURNITURE_DEPTH_STEP + layer_z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_faces_order_within_one_wall() {
        assert_eq!(wall_order(0, CubeFace::Top), -4.0);
        assert_eq!(wall_order(0, CubeFace::Left), -4.5);
        assert_eq!(wall_order(0, CubeFace::Right), -4.6);
        assert_eq!(wall_orders(2), [4.0, 3.5, 3.4]);
    }

    #[test]
    fn walls_sort_below_floors() {
        let highest_wall = wall_order(9, CubeFace::Top);
        let lowest_floor = floor_order(TilePosition::new(0, 0, 0), (1, 1), true);
        assert!(highest_wall < lowest_floor);
    }

    #[test]
    fn floor_order_is_monotonic_in_depth() {
        let a = floor_order(TilePosition::new(0, 0, 0), (1, 1), false);
        let b = floor_order(TilePosition::new(1, 0, 0), (1, 1), false);
        let c = floor_order(TilePosition::new(1, 1, 0), (1, 1), false);
        let d = floor_order(TilePosition::new(0, 0, 3), (1, 1), false);
        assert!(a < b && b < c && c < d);
    }

    #[test]
    fn door_tile_sorts_below_its_cell_but_above_shallower_cells() {
        let plain = floor_order(TilePosition::new(0, 3, 0), (1, 1), false);
        let door = floor_order(TilePosition::new(0, 3, 0), (1, 1), true);
        let behind = floor_order(TilePosition::new(0, 2, 0), (1, 1), false);
        assert!(door < plain);
        assert!(behind < door);
    }

    #[test]
    fn stair_steps_paint_back_to_front() {
        let p = TilePosition::new(2, 2, 0);
        let back = stair_order(p, 3, 4);
        let front = stair_order(p, 0, 4);
        assert!(back < front);
        assert!(front < floor_order(TilePosition::new(3, 2, 0), (1, 1), false));
    }

    #[test]
    fn furniture_order_formula() {
        assert_eq!(floor_furniture_order(Vec3::new(1.0, 2.0, 4.0), 0.0), 700.0);
        assert_eq!(floor_furniture_order(Vec3::new(2.0, 2.0, 4.0), 0.0), 800.0);
        assert_eq!(floor_furniture_order(Vec3::new(2.0, 2.0, 4.0), -1.0), 799.0);
    }
}
