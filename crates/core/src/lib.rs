//! Room geometry core - pure, deterministic, and testable
//!
//! Turns a heightmap and a configuration snapshot into positioned isometric
//! primitives (floor tiles, walls, stairs, a door), sorts them for painting,
//! and wraps the scene in a pan/zoom camera. Nothing here touches a terminal,
//! a socket or the file system; rasterizing into a [`raster::Canvas`] is the
//! only output.
//!
//! # Module Structure
//!
//! - [`heightmap`]: grid text parsing and validation
//! - [`tile_map`]: per-cell wall/stair/door classification plus wall coverage flags
//! - [`cube`]: the three-face isometric box and the projection
//! - [`sorting`]: paint-order formulas
//! - [`parts`]: tile, wall, stair and door parts
//! - [`visualization`]: the compositor walk
//! - [`camera`] / [`tween`]: pan, zoom, centering
//! - [`events`]: pointer handler sets
//! - [`material`]: material id resolution with fallback
//! - [`raster`]: software rasterizer and PNG screenshots
//! - [`room`]: ties everything together
//!
//! # Example
//!
//! ```
//! use isoroom_core::{RendererContext, Room};
//! use isoroom_core::types::RoomConfiguration;
//!
//! let config = RoomConfiguration::new("xx00\n0000\n0000");
//! let room = Room::new(config, RendererContext::default()).unwrap();
//!
//! assert!(!room.parts().is_empty());
//! assert_eq!(room.tile_map().tile_count(), 10);
//! ```
//!
//! # Rebuilds
//!
//! [`Room::update`] discards every part and recomposes from scratch. Part
//! handles ([`room::PartId`]) from an earlier rebuild no longer resolve.

pub mod camera;
pub mod cube;
pub mod events;
pub mod heightmap;
pub mod material;
pub mod parts;
pub mod raster;
pub mod room;
pub mod snapshot;
pub mod sorting;
pub mod tile_map;
pub mod tween;
pub mod visualization;

pub use isoroom_types as types;

pub use camera::{Camera, Viewport};
pub use cube::{project, Cube, Face};
pub use events::{EventManager, RoomEvents};
pub use heightmap::{Heightmap, HeightmapError, MalformedHeightmapError};
pub use material::{MaterialCatalog, StaticMaterialCatalog};
pub use parts::{EventCategory, PartKind, RoomPart};
pub use raster::{Canvas, ScreenshotError, MAX_CANVAS_PIXELS, SpriteAtlas, SpriteImage, StageSprite, Transform};
pub use room::{PartId, RendererContext, Room};
pub use snapshot::PartSnapshot;
pub use tile_map::{HeightmapCell, TileMap, WallFlags};
