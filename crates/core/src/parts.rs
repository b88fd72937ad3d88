//! Room parts - the renderable primitives derived from the tile map
//!
//! World coordinates: cell `(x, y)` covers `X in [x, x+1]`, `Y in [y-1, y]`,
//! so a unit tile's container sits at `project(x, y, z)`:
//!
//! ```text
//! container.x = 32x - 32(y + sy - 1)
//! container.y = 16x + 16(y + sy - 1) - 32z
//! ```
//!
//! Walls stand outside the cell: west walls in `X in [x-t, x]`, north walls
//! in `Y in [y-1-t, y-1]` (`t` = wall thickness in tiles). A wall's top is at
//! a fixed absolute height, so neighboring walls of different base heights
//! line up.

use crate::cube::{contains_point, face_points, project, Cube, Face, Quad};
use crate::sorting::{floor_order, stair_order, wall_orders, STAIR_ORDER_BIAS};
use crate::types::{
    CubeFace, Direction, Material, Rect, StairCorner, StairType, TilePosition, Vec2, Vec3,
    WallType, DOOR_OPENING_HEIGHT, HEIGHT_UNIT, TILE_HALF_HEIGHT, TILE_HALF_WIDTH,
    WALL_BASE_HEIGHT,
};

/// Steps per stair.
pub const STAIR_STEPS: usize = 4;

const STEP_DEPTH: f64 = 1.0 / STAIR_STEPS as f64;
const CORNER_TRIM: f64 = 0.125;

/// Which room-level handler set a part's pointer events go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Tiles, stairs and the door tile.
    Tiles,
    /// Walls (forwarded, no handlers by default).
    Walls,
}

/// Variant tag of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Tile,
    Wall(WallType),
    Stair,
    Door,
}

/// Inputs shared by every wall of one rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSettings {
    /// Wall thickness in pixels.
    pub thickness: u32,
    /// Floor thickness in pixels.
    pub floor_thickness: u32,
    /// `-1` follows the tallest tile.
    pub height: i32,
    pub max_height: u8,
}

impl WallSettings {
    fn thickness_tiles(&self) -> f64 {
        self.thickness as f64 / HEIGHT_UNIT
    }

    fn floor_tiles(&self) -> f64 {
        self.floor_thickness as f64 / HEIGHT_UNIT
    }

    /// Vertical size (height units) of a wall standing at tier `z`.
    pub fn rise(&self, z: i32) -> f64 {
        let floor = self.floor_tiles();
        let base = WALL_BASE_HEIGHT / HEIGHT_UNIT;
        let extra = if self.height == -1 {
            self.max_height as f64 + base
        } else {
            base + 2.0 * self.height as f64
        };
        (floor - z as f64 + extra).max(floor)
    }
}

/// Floor tile or door tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePart {
    pub position: TilePosition,
    pub size: Vec3,
    pub order: f64,
    pub cube: Cube,
    hit_area: Quad,
}

impl TilePart {
    pub fn new(position: TilePosition, thickness: u32, material: &Material) -> Self {
        Self::build(position, thickness as f64 / HEIGHT_UNIT, material, false)
    }

    /// Door tile: no thickness, ordered just below a plain tile.
    pub fn door(position: TilePosition, material: &Material) -> Self {
        Self::build(position, 0.0, material, true)
    }

    fn build(position: TilePosition, thickness: f64, material: &Material, door: bool) -> Self {
        let size = Vec3::new(1.0, 1.0, thickness);
        let origin = tile_origin(position);
        let order = floor_order(position, (1, 1), door);
        Self {
            position,
            size,
            order,
            cube: Cube::uniform(origin, size, material, order),
            hit_area: tile_hit_area(origin),
        }
    }
}

/// Wall segment: left/right runs, corner pillar or door cut.
#[derive(Debug, Clone, PartialEq)]
pub struct WallPart {
    pub kind: WallType,
    pub position: TilePosition,
    /// Cells covered along the run.
    pub length: u32,
    pub size: Vec3,
    pub cube: Cube,
}

impl WallPart {
    /// West-edge run covering `length` cells along +Y.
    pub fn left(position: TilePosition, length: u32, settings: &WallSettings, material: &Material) -> Self {
        let t = settings.thickness_tiles();
        let size = Vec3::new(t, length as f64, settings.rise(position.z));
        let corner = Vec3::new(
            position.x as f64 - t,
            (position.y + length as i32 - 1) as f64,
            0.0,
        );
        Self::build(WallType::Left, position, length, size, corner, settings, material)
    }

    /// North-edge run covering `length` cells along +X.
    pub fn right(position: TilePosition, length: u32, settings: &WallSettings, material: &Material) -> Self {
        let t = settings.thickness_tiles();
        let size = Vec3::new(length as f64, t, settings.rise(position.z));
        let corner = Vec3::new(position.x as f64, (position.y - 1) as f64, 0.0);
        Self::build(WallType::Right, position, length, size, corner, settings, material)
    }

    /// Pillar filling the corner square where a left and a right run meet.
    pub fn corner(position: TilePosition, settings: &WallSettings, material: &Material) -> Self {
        let t = settings.thickness_tiles();
        let size = Vec3::new(t, t, settings.rise(position.z));
        let corner = Vec3::new(position.x as f64 - t, (position.y - 1) as f64, 0.0);
        Self::build(WallType::Corner, position, 1, size, corner, settings, material)
    }

    /// One-cell west wall with the door opening cut into its front face.
    pub fn door(position: TilePosition, settings: &WallSettings, material: &Material) -> Self {
        let mut wall = Self::left(position, 1, settings, material);
        wall.kind = WallType::Door;

        let t = settings.thickness_tiles();
        let floor_px = (wall.size.z - settings.floor_tiles()) * HEIGHT_UNIT;
        let opening = DOOR_OPENING_HEIGHT.min(floor_px);
        let near = Vec2::new(TILE_HALF_WIDTH * t, TILE_HALF_HEIGHT * t);
        let far = Vec2::new(TILE_HALF_WIDTH * (t + 1.0), TILE_HALF_HEIGHT * (t - 1.0));
        let origin = wall.cube.origin;
        let hole: Quad = [
            Vec2::new(near.x, near.y + floor_px - opening),
            Vec2::new(far.x, far.y + floor_px - opening),
            Vec2::new(far.x, far.y + floor_px),
            Vec2::new(near.x, near.y + floor_px),
        ]
        .into_iter()
        .map(|p| p + origin)
        .collect();
        wall.cube.face_mut(CubeFace::Right).hole = Some(hole);
        wall
    }

    fn build(
        kind: WallType,
        position: TilePosition,
        length: u32,
        size: Vec3,
        corner: Vec3,
        settings: &WallSettings,
        material: &Material,
    ) -> Self {
        let top = position.z as f64 - settings.floor_tiles() + size.z;
        let origin = project(Vec3::new(corner.x, corner.y, top));
        Self {
            kind,
            position,
            length,
            size,
            cube: Cube::new(origin, size, material, wall_orders(position.z)),
        }
    }

    /// Door opening polygon, for door walls.
    pub fn door_opening(&self) -> Option<&Quad> {
        self.cube.face(CubeFace::Right).hole.as_ref()
    }
}

/// Four quarter-depth steps climbing toward the higher neighbor.
#[derive(Debug, Clone, PartialEq)]
pub struct StairPart {
    pub position: TilePosition,
    pub stair: StairType,
    pub size: Vec3,
    pub order: f64,
    pub steps: Vec<Cube>,
    hit_area: Quad,
}

impl StairPart {
    pub fn new(position: TilePosition, stair: StairType, thickness: u32, material: &Material) -> Self {
        let floor = thickness as f64 / HEIGHT_UNIT;
        let x = position.x as f64;
        let y = position.y as f64;
        let z = position.z as f64;

        let steps = (0..STAIR_STEPS)
            .map(|i| {
                let rise = (i + 1) as f64 * STEP_DEPTH;
                let from_back = (STAIR_STEPS - 1 - i) as f64 * STEP_DEPTH;
                let left = corner_trim(stair.left, i);
                let right = corner_trim(stair.right, i);

                // Footprint as (min X, max X, min Y, max Y).
                let (x0, x1, y0, y1) = match stair.direction {
                    Direction::West => {
                        let x0 = x + from_back;
                        (x0, x0 + STEP_DEPTH, y - 1.0 + right, y - left)
                    }
                    _ => {
                        let y0 = y - 1.0 + from_back;
                        (x + left, x + 1.0 - right, y0, y0 + STEP_DEPTH)
                    }
                };

                let size = Vec3::new(x1 - x0, y1 - y0, floor + rise);
                let origin = project(Vec3::new(x0, y1, z + rise));
                Cube::uniform(origin, size, material, stair_order(position, i, STAIR_STEPS))
            })
            .collect();

        let origin = tile_origin(position);
        Self {
            position,
            stair,
            size: Vec3::new(1.0, 1.0, floor + 1.0),
            order: floor_order(position, (1, 1), false) + STAIR_ORDER_BIAS,
            steps,
            hit_area: tile_hit_area(origin),
        }
    }
}

fn corner_trim(corner: StairCorner, step: usize) -> f64 {
    match corner {
        StairCorner::None => 0.0,
        StairCorner::Outer => step as f64 * CORNER_TRIM,
        StairCorner::Inner => (STAIR_STEPS - 1 - step) as f64 * CORNER_TRIM,
    }
}

fn tile_origin(position: TilePosition) -> Vec2 {
    project(Vec3::new(
        position.x as f64,
        position.y as f64,
        position.z as f64,
    ))
}

fn tile_hit_area(origin: Vec2) -> Quad {
    face_points(CubeFace::Top, Vec3::new(1.0, 1.0, 0.0))
        .into_iter()
        .map(|p| p + origin)
        .collect()
}

/// One room primitive. Parts are rebuilt wholesale, never patched.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomPart {
    Tile(TilePart),
    Wall(WallPart),
    Stair(StairPart),
    Door(TilePart),
}

impl RoomPart {
    pub fn kind(&self) -> PartKind {
        match self {
            RoomPart::Tile(_) => PartKind::Tile,
            RoomPart::Wall(w) => PartKind::Wall(w.kind),
            RoomPart::Stair(_) => PartKind::Stair,
            RoomPart::Door(_) => PartKind::Door,
        }
    }

    pub fn position(&self) -> TilePosition {
        match self {
            RoomPart::Tile(t) | RoomPart::Door(t) => t.position,
            RoomPart::Wall(w) => w.position,
            RoomPart::Stair(s) => s.position,
        }
    }

    /// Size in tile units.
    pub fn size(&self) -> Vec3 {
        match self {
            RoomPart::Tile(t) | RoomPart::Door(t) => t.size,
            RoomPart::Wall(w) => w.size,
            RoomPart::Stair(s) => s.size,
        }
    }

    /// Base paint order (a wall reports its top face).
    pub fn order(&self) -> f64 {
        match self {
            RoomPart::Tile(t) | RoomPart::Door(t) => t.order,
            RoomPart::Wall(w) => w.cube.face(CubeFace::Top).order,
            RoomPart::Stair(s) => s.order,
        }
    }

    pub fn cubes(&self) -> &[Cube] {
        match self {
            RoomPart::Tile(t) | RoomPart::Door(t) => std::slice::from_ref(&t.cube),
            RoomPart::Wall(w) => std::slice::from_ref(&w.cube),
            RoomPart::Stair(s) => &s.steps,
        }
    }

    pub fn faces(&self) -> impl Iterator<Item = &Face> + '_ {
        self.cubes().iter().flat_map(|c| c.faces.iter())
    }

    pub fn category(&self) -> EventCategory {
        match self {
            RoomPart::Wall(_) => EventCategory::Walls,
            _ => EventCategory::Tiles,
        }
    }

    /// Container origin used for local pointer math.
    pub fn origin(&self) -> Vec2 {
        match self {
            RoomPart::Tile(t) | RoomPart::Door(t) => t.cube.origin,
            RoomPart::Wall(w) => w.cube.origin,
            RoomPart::Stair(s) => tile_origin(s.position),
        }
    }

    /// Whether a scene-space point hits this part.
    pub fn hit_test(&self, p: Vec2) -> bool {
        match self {
            RoomPart::Tile(t) | RoomPart::Door(t) => contains_point(&t.hit_area, p),
            RoomPart::Stair(s) => contains_point(&s.hit_area, p),
            RoomPart::Wall(w) => w.cube.faces.iter().any(|f| f.contains(p)),
        }
    }

    /// Grid position under a scene-space point.
    pub fn tile_position_at(&self, p: Vec2) -> TilePosition {
        let span = match self {
            RoomPart::Wall(w) => w.length as i32,
            _ => 1,
        };
        let local = p - self.origin();
        let local_x = (local.x / 64.0 + local.y / 32.0).floor() as i32;
        let local_y = (local.y / 32.0 - local.x / 64.0 - 0.01).floor() as i32 + span;
        let position = self.position();
        TilePosition::new(position.x + local_x, position.y + local_y, position.z)
    }

    pub fn bounds(&self) -> Rect {
        self.cubes()
            .iter()
            .map(Cube::bounds)
            .fold(Rect::default(), |acc, r| acc.union(&r))
    }
}
