//! TileMap module - per-cell classification of a parsed heightmap
//!
//! Every cell is classified once, from its north and west neighbors:
//! - neighbor void or off the grid: that side needs a wall
//! - neighbor exactly one step higher: that side is a stair edge
//! - neighbor two or more steps higher: wall
//! - both sides qualify as stair edges: ambiguous, both become walls
//! - neighbor at the same height or lower: open
//!
//! A downward step to the north or west (neighbor one or more steps lower)
//! therefore renders as an open drop, with no stair or wall part on either cell.
//!
//! Stairs and walls belong to the lower cell of a pair, so only north/west
//! comparisons are needed (south/east edges face the camera and show the
//! tile thickness instead).
//!
//! Storage is flat row-major arrays with an `index` helper.
//! The wall-coverage flags are written by the compositor while it emits wall
//! parts and are cleared on every rebuild.

use crate::heightmap::{Heightmap, HeightmapError};
use crate::types::{Direction, GridPos, StairCorner, StairType, WallType};

/// Resolved metadata for one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeightmapCell {
    /// `None` for void cells.
    pub height: Option<u8>,
    pub wall_type: WallType,
    pub stair_type: Option<StairType>,
    /// The room's single door cell.
    pub door: bool,
}

impl HeightmapCell {
    pub const VOID: HeightmapCell = HeightmapCell {
        height: None,
        wall_type: WallType::None,
        stair_type: None,
        door: false,
    };

    pub fn is_tile(&self) -> bool {
        self.height.is_some()
    }
}

/// Wall coverage recorded for a cell during the current rebuild.
///
/// - `x`: the north edge is covered by an emitted X-running (right) wall
/// - `y`: the west edge is covered by an emitted Y-running (left) wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallFlags {
    pub x: bool,
    pub y: bool,
}

/// Side comparison result against one neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Open,
    Wall,
    Stair,
}

fn edge(height: u8, neighbor: Option<u8>) -> Edge {
    match neighbor {
        None => Edge::Wall,
        Some(n) if n == height + 1 => Edge::Stair,
        Some(n) if n > height + 1 => Edge::Wall,
        Some(_) => Edge::Open,
    }
}

/// Classified room grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    width: usize,
    depth: usize,
    cells: Vec<HeightmapCell>,
    walls: Vec<WallFlags>,
    max_height: u8,
    door: Option<GridPos>,
    demoted_doors: Vec<GridPos>,
}

impl TileMap {
    /// Parse heightmap text and classify it.
    pub fn parse(text: &str, doors: &[GridPos]) -> Result<Self, HeightmapError> {
        let heightmap = Heightmap::parse(text)?;
        Ok(Self::from_heightmap(&heightmap, doors))
    }

    /// Classify a parsed heightmap.
    ///
    /// Door markers are considered in row-major order; the first one that
    /// lands on a tile becomes the door, every other marker is demoted.
    pub fn from_heightmap(heightmap: &Heightmap, doors: &[GridPos]) -> Self {
        let width = heightmap.width();
        let depth = heightmap.depth();

        let mut markers: Vec<GridPos> = doors.to_vec();
        markers.sort_by_key(|p| (p.y, p.x));
        markers.dedup();

        let mut door = None;
        let mut demoted_doors = Vec::new();
        for marker in markers {
            if door.is_none() && heightmap.is_tile(marker.x, marker.y) {
                door = Some(marker);
            } else {
                demoted_doors.push(marker);
            }
        }

        let mut cells = Vec::with_capacity(width * depth);
        for y in 0..depth as i32 {
            for x in 0..width as i32 {
                cells.push(classify(heightmap, x, y, door == Some(GridPos::new(x, y))));
            }
        }

        Self {
            width,
            depth,
            cells,
            walls: vec![WallFlags::default(); width * depth],
            max_height: heightmap.max_height(),
            door,
            demoted_doors,
        }
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.depth {
            return None;
        }
        Some((y as usize) * self.width + (x as usize))
    }

    /// Number of columns (world X).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows (world Y).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Cell metadata; positions off the grid read as void.
    pub fn tile_info(&self, x: i32, y: i32) -> HeightmapCell {
        self.index(x, y)
            .map(|i| self.cells[i])
            .unwrap_or(HeightmapCell::VOID)
    }

    pub fn is_tile(&self, x: i32, y: i32) -> bool {
        self.tile_info(x, y).is_tile()
    }

    pub fn height_at(&self, x: i32, y: i32) -> Option<u8> {
        self.tile_info(x, y).height
    }

    pub fn max_height(&self) -> u8 {
        self.max_height
    }

    /// The honored door cell, if any marker landed on a tile.
    pub fn door(&self) -> Option<GridPos> {
        self.door
    }

    /// Door markers that were not honored (later duplicates, or not on a tile).
    pub fn demoted_doors(&self) -> &[GridPos] {
        &self.demoted_doors
    }

    /// Wall coverage for `(x, y)`; both flags are false until a wall is emitted.
    pub fn has_wall(&self, x: i32, y: i32) -> WallFlags {
        self.index(x, y)
            .map(|i| self.walls[i])
            .unwrap_or_default()
    }

    /// Record that an X-running wall covers the north edge of `(x, y)`.
    pub(crate) fn mark_wall_x(&mut self, x: i32, y: i32) {
        if let Some(i) = self.index(x, y) {
            self.walls[i].x = true;
        }
    }

    /// Record that a Y-running wall covers the west edge of `(x, y)`.
    pub(crate) fn mark_wall_y(&mut self, x: i32, y: i32) {
        if let Some(i) = self.index(x, y) {
            self.walls[i].y = true;
        }
    }

    /// Forget every recorded wall.
    pub fn reset_walls(&mut self) {
        self.walls.fill(WallFlags::default());
    }

    /// Iterate cells in row-major order (y outer, x inner).
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, HeightmapCell)> + '_ {
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let x = (i % self.width) as i32;
            let y = (i / self.width) as i32;
            (GridPos::new(x, y), *cell)
        })
    }

    /// Number of tiles (non-void cells).
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_tile()).count()
    }
}

fn classify(heightmap: &Heightmap, x: i32, y: i32, door: bool) -> HeightmapCell {
    let Some(height) = heightmap.height_at(x, y) else {
        return HeightmapCell::VOID;
    };

    let north = edge(height, heightmap.height_at(x, y - 1));
    let west = edge(height, heightmap.height_at(x - 1, y));

    let (mut west_wall, north_wall, stair_type) = match (west, north) {
        (Edge::Stair, Edge::Stair) => (true, true, None),
        (Edge::Stair, n) => (
            false,
            n == Edge::Wall,
            Some(west_stair(heightmap, x, y, height)),
        ),
        (w, Edge::Stair) => (
            w == Edge::Wall,
            false,
            Some(north_stair(heightmap, x, y, height)),
        ),
        (w, n) => (w == Edge::Wall, n == Edge::Wall, None),
    };

    // The door wall replaces the door cell's west wall.
    if door {
        west_wall = false;
    }

    HeightmapCell {
        height: Some(height),
        wall_type: WallType::from_sides(west_wall, north_wall),
        stair_type,
        door,
    }
}

/// Stair climbing north; its run lies along X (left end at -X).
fn north_stair(heightmap: &Heightmap, x: i32, y: i32, height: u8) -> StairType {
    let upper = Some(height + 1);
    let left = if heightmap.height_at(x - 1, y - 1) == upper {
        StairCorner::None
    } else {
        StairCorner::Outer
    };
    let right = if heightmap.height_at(x + 1, y) == upper {
        StairCorner::Inner
    } else if heightmap.height_at(x + 1, y - 1) != upper {
        StairCorner::Outer
    } else {
        StairCorner::None
    };
    StairType {
        direction: Direction::North,
        left,
        right,
    }
}

/// Stair climbing west; its run lies along Y (left end at +Y, right end at -Y).
fn west_stair(heightmap: &Heightmap, x: i32, y: i32, height: u8) -> StairType {
    let upper = Some(height + 1);
    let right = if heightmap.height_at(x - 1, y - 1) == upper {
        StairCorner::None
    } else {
        StairCorner::Outer
    };
    let left = if heightmap.height_at(x, y + 1) == upper {
        StairCorner::Inner
    } else if heightmap.height_at(x - 1, y + 1) != upper {
        StairCorner::Outer
    } else {
        StairCorner::None
    };
    StairType {
        direction: Direction::West,
        left,
        right,
    }
}
