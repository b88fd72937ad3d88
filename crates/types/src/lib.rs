//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the room engine.
//! All types are pure data structures (serde-friendly, no I/O), usable from the
//! geometry core, the furniture engine, the terminal preview and the adapter.
//!
//! # Projection
//!
//! Rooms are drawn in a fixed 2:1 dimetric projection. A world point
//! `(X, Y, Z)` lands on screen at:
//!
//! ```text
//! sx = 32 * (X - Y)
//! sy = 16 * (X + Y) - 32 * Z
//! ```
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TILE_HALF_WIDTH` | 32 | Half of a tile's screen width in pixels |
//! | `TILE_HALF_HEIGHT` | 16 | Half of a tile's screen height in pixels |
//! | `HEIGHT_UNIT` | 32 | Screen pixels per height step |
//! | `WALL_BASE_HEIGHT` | 115 | Wall rise above the floor base at `wallHeight = 0` |
//!
//! These are a compatibility contract: tiles, walls and stairs only interlock
//! when every primitive uses the same constants.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `CLICK_THRESHOLD_MS` | 100 | Minimum gap since the last click before a press starts a drag |
//! | `DOUBLE_CLICK_MS` | 350 | Window in which two presses form a double click |
//! | `CENTER_DURATION_MS` | 600 | Camera centering animation length |
//! | `ROOM_ANIMATION_FPS` | 4 | Furniture animation clock |
//!
//! # Examples
//!
//! ```
//! use isoroom_types::{Direction, RoomConfiguration, ZoomType, TILE_HALF_WIDTH};
//!
//! let dir = Direction::from_u8(6).unwrap();
//! assert_eq!(dir, Direction::West);
//!
//! let config = RoomConfiguration::default();
//! assert_eq!(config.floor_thickness, 8);
//! assert_eq!(config.zoom.zoom_type, ZoomType::Both);
//!
//! assert_eq!(ZoomType::from_str("wheel"), Some(ZoomType::Wheel));
//! assert_eq!(TILE_HALF_WIDTH, 32.0);
//! ```

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Half of a tile's screen width in pixels.
pub const TILE_HALF_WIDTH: f64 = 32.0;

/// Half of a tile's screen height in pixels.
pub const TILE_HALF_HEIGHT: f64 = 16.0;

/// Screen pixels per height step.
pub const HEIGHT_UNIT: f64 = 32.0;

/// Wall rise in pixels above the floor base when `wall_height == 0`.
pub const WALL_BASE_HEIGHT: f64 = 115.0;

/// Door opening height in pixels (cut into the door wall's front face).
pub const DOOR_OPENING_HEIGHT: f64 = 86.0;

/// Pointer presses closer together than this never start a camera drag.
pub const CLICK_THRESHOLD_MS: u64 = 100;

/// Two presses within this window form a double click.
pub const DOUBLE_CLICK_MS: u64 = 350;

/// Camera centering animation length.
pub const CENTER_DURATION_MS: u32 = 600;

/// Furniture animation clock (frames per second).
pub const ROOM_ANIMATION_FPS: u32 = 4;

/// Shadow layer alpha.
pub const SHADOW_ALPHA: f64 = 0.19;

/// Shadow layer z offset (paints below the furniture's own layers).
pub const SHADOW_Z_OFFSET: f64 = -1.0;

/// Material id used when none is configured.
pub const DEFAULT_MATERIAL_ID: u32 = 101;

/// Color used when a material id cannot be resolved.
pub const FALLBACK_MATERIAL_COLOR: u32 = 0x989865;


// ============== Geometry ==============

/// Continuous 2D point or vector (screen or local space, pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Continuous room-space point or size, in tile units (z in height steps).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Integer grid coordinate (column `x`, row `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Integer tile position including floor height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TilePosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl TilePosition {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn grid(self) -> GridPos {
        GridPos::new(self.x, self.y)
    }
}

/// Axis-aligned rectangle (screen or local pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Strict overlap (touching edges do not count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

// ============== Room classification ==============

/// Compass direction using the 0..=7 numbering of furniture data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Direction::North),
            1 => Some(Direction::NorthEast),
            2 => Some(Direction::East),
            3 => Some(Direction::SouthEast),
            4 => Some(Direction::South),
            5 => Some(Direction::SouthWest),
            6 => Some(Direction::West),
            7 => Some(Direction::NorthWest),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Direction::North => 0,
            Direction::NorthEast => 1,
            Direction::East => 2,
            Direction::SouthEast => 3,
            Direction::South => 4,
            Direction::SouthWest => 5,
            Direction::West => 6,
            Direction::NorthWest => 7,
        }
    }
}

impl From<Direction> for u8 {
    fn from(value: Direction) -> Self {
        value.as_u8()
    }
}

impl TryFrom<u8> for Direction {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::from_u8(value).ok_or_else(|| format!("invalid direction {}", value))
    }
}

/// Wall classification of a cell, and the kind of an emitted wall part.
///
/// - **Left**: wall along the cell's west edge (runs along the Y axis)
/// - **Right**: wall along the cell's north edge (runs along the X axis)
/// - **Corner**: both; emitted as a pillar joining a Left and a Right run
/// - **Door**: one-cell west wall with a door opening
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallType {
    #[default]
    None,
    Left,
    Right,
    Corner,
    Door,
}

impl WallType {
    /// Combine west/north wall needs into one classification.
    pub fn from_sides(west: bool, north: bool) -> Self {
        match (west, north) {
            (true, true) => WallType::Corner,
            (true, false) => WallType::Left,
            (false, true) => WallType::Right,
            (false, false) => WallType::None,
        }
    }

    pub fn needs_west(self) -> bool {
        matches!(self, WallType::Left | WallType::Corner)
    }

    pub fn needs_north(self) -> bool {
        matches!(self, WallType::Right | WallType::Corner)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WallType::None => "none",
            WallType::Left => "left",
            WallType::Right => "right",
            WallType::Corner => "corner",
            WallType::Door => "door",
        }
    }
}

/// Shape of a stair's end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StairCorner {
    #[default]
    None,
    Inner,
    Outer,
}

/// Stair classification of a cell.
///
/// `direction` is the side (north or west) on which the higher neighbor sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StairType {
    pub direction: Direction,
    pub left: StairCorner,
    pub right: StairCorner,
}

/// One visible face of an isometric cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    Top,
    Left,
    Right,
}

impl CubeFace {
    pub const ALL: [CubeFace; 3] = [CubeFace::Top, CubeFace::Left, CubeFace::Right];

    /// Simulated directional light multiplier.
    pub fn brightness(self) -> f64 {
        match self {
            CubeFace::Top => 1.0,
            CubeFace::Left => 0.8,
            CubeFace::Right => 0.71,
        }
    }
}

/// Resolved material: solid color with an optional texture key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub color: u32,
    #[serde(default)]
    pub texture: Option<String>,
}

impl Material {
    pub fn solid(color: u32) -> Self {
        Self {
            color,
            texture: None,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::solid(FALLBACK_MATERIAL_COLOR)
    }
}

/// Sprite blend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    #[default]
    Normal,
    Add,
    Multiply,
    Screen,
}

impl BlendMode {
    /// Map a furniture layer `ink` string (case-insensitive).
    pub fn from_ink(ink: &str) -> Self {
        match ink.to_lowercase().as_str() {
            "add" => BlendMode::Add,
            "multiply" => BlendMode::Multiply,
            "screen" => BlendMode::Screen,
            _ => BlendMode::Normal,
        }
    }
}

// ============== Pointer events ==============

/// Payload delivered to tile/stair/furniture pointer handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: TilePosition,
    /// True when the pointer moved the camera since it was pressed.
    pub dragging: bool,
}

/// Pointer callback kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Up,
    Move,
    Out,
    Over,
    DoubleClick,
}

/// Preview actions produced by the key map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewAction {
    /// Zoom key, forwarded to the camera as-is (`+`, `=`, `-`, `_`).
    Zoom(char),
    /// Animate the room back to the viewport center.
    Center,
    /// Nudge the camera by whole tiles.
    Pan { dx: i32, dy: i32 },
    /// Save a PNG of the current view.
    Screenshot,
    /// Toggle room/furniture logging.
    ToggleVerbose,
}

// ============== Configuration ==============

/// Which inputs drive zooming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomType {
    Wheel,
    Keydown,
    #[default]
    Both,
}

impl ZoomType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "wheel" => Some(ZoomType::Wheel),
            "keydown" => Some(ZoomType::Keydown),
            "both" => Some(ZoomType::Both),
            _ => None,
        }
    }

    pub fn accepts_wheel(self) -> bool {
        matches!(self, ZoomType::Wheel | ZoomType::Both)
    }

    pub fn accepts_keys(self) -> bool {
        matches!(self, ZoomType::Keydown | ZoomType::Both)
    }
}

/// Zoom anchor: keep the point under the cursor fixed, or zoom around the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    Cursor,
    #[default]
    Center,
}

/// Camera zoom settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomConfig {
    #[serde(rename = "type")]
    pub zoom_type: ZoomType,
    pub direction: ZoomDirection,
    pub level: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Tween length in milliseconds.
    pub duration_ms: u32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            zoom_type: ZoomType::Both,
            direction: ZoomDirection::Center,
            level: 1.0,
            min: 0.5,
            max: 5.0,
            step: 0.5,
            duration_ms: 125,
        }
    }
}

impl ZoomConfig {
    pub fn clamp(&self, level: f64) -> f64 {
        level.max(self.min).min(self.max)
    }
}

/// Immutable room configuration snapshot.
///
/// Changes are made by building the next snapshot (`with_*`) and handing it to
/// the room explicitly; nothing here triggers a rebuild on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomConfiguration {
    pub height_map: String,
    /// Out-of-band door markers; only the first in row-major order is honored.
    pub doors: Vec<GridPos>,
    pub floor_material: u32,
    /// Pixels.
    pub floor_thickness: u32,
    pub floor_hidden: bool,
    pub wall_material: u32,
    /// Pixels.
    pub wall_thickness: u32,
    pub wall_hidden: bool,
    /// Extra wall height in double steps; `-1` follows the tallest tile.
    pub wall_height: i32,
    pub dragging: bool,
    pub center_camera: bool,
    pub zoom: ZoomConfig,
}

impl Default for RoomConfiguration {
    fn default() -> Self {
        Self {
            height_map: String::new(),
            doors: Vec::new(),
            floor_material: 111,
            floor_thickness: 8,
            floor_hidden: false,
            wall_material: 101,
            wall_thickness: 8,
            wall_hidden: false,
            wall_height: 0,
            dragging: true,
            center_camera: true,
            zoom: ZoomConfig::default(),
        }
    }
}

impl RoomConfiguration {
    pub fn new(height_map: impl Into<String>) -> Self {
        Self {
            height_map: height_map.into(),
            ..Self::default()
        }
    }

    pub fn with_height_map(mut self, height_map: impl Into<String>) -> Self {
        self.height_map = height_map.into();
        self
    }

    pub fn with_door(mut self, door: GridPos) -> Self {
        self.doors.push(door);
        self
    }

    pub fn with_floor_thickness(mut self, px: u32) -> Self {
        self.floor_thickness = px;
        self
    }

    pub fn with_wall_thickness(mut self, px: u32) -> Self {
        self.wall_thickness = px;
        self
    }

    pub fn with_wall_height(mut self, height: i32) -> Self {
        self.wall_height = height;
        self
    }

    pub fn with_materials(mut self, floor: u32, wall: u32) -> Self {
        self.floor_material = floor;
        self.wall_material = wall;
        self
    }

    pub fn with_hidden(mut self, floor_hidden: bool, wall_hidden: bool) -> Self {
        self.floor_hidden = floor_hidden;
        self.wall_hidden = wall_hidden;
        self
    }

    pub fn with_camera(mut self, dragging: bool, center_camera: bool) -> Self {
        self.dragging = dragging;
        self.center_camera = center_camera;
        self
    }

    pub fn with_zoom(mut self, zoom: ZoomConfig) -> Self {
        self.zoom = zoom;
        self
    }

    /// True when applying `next` requires re-walking the tile map.
    ///
    /// Camera-only changes (dragging, centering, zoom) keep the scene.
    pub fn geometry_differs(&self, next: &RoomConfiguration) -> bool {
        self.height_map != next.height_map
            || self.doors != next.doors
            || self.floor_material != next.floor_material
            || self.floor_thickness != next.floor_thickness
            || self.floor_hidden != next.floor_hidden
            || self.wall_material != next.wall_material
            || self.wall_thickness != next.wall_thickness
            || self.wall_hidden != next.wall_hidden
            || self.wall_height != next.wall_height
    }
}
