//! Furniture animation engine
//!
//! Tracks placed furniture, swaps placeholders for real layers once property
//! tables arrive, and advances per-layer frame sequences on a fixed 4 fps
//! clock. The output is a flat list of [`StageSprite`](isoroom_core::raster::StageSprite)s
//! for the stage plus pointer hit-testing against sprite bitmaps.
//!
//! # Module Structure
//!
//! - [`data`]: property tables and the furniture catalog
//! - [`animation`]: per-layer frame cursor
//! - [`bottle`]: roll/slow-down/settle state queue for bottle furniture
//! - [`layer`]: texture keys and layer sprite construction
//! - [`furniture`]: one placed furniture and its visualization
//! - [`scheduler`]: fixed-rate ticks with cancellable subscriptions
//! - [`engine`]: the furniture set driven by the scheduler
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use isoroom_engine::{FurnitureEngine, FurniturePlacement, StaticFurnitureCatalog};
//! use isoroom_core::types::Vec3;
//!
//! let mut engine = FurnitureEngine::new(Rc::new(StaticFurnitureCatalog::new()));
//! engine.place(FurniturePlacement {
//!     id: 1,
//!     base_id: 42,
//!     position: Vec3::new(1.0, 1.0, 0.0),
//!     direction: 2,
//!     state: 0,
//! });
//!
//! // Unknown bases stay placeholders.
//! assert!(engine.get(1).unwrap().is_placeholder());
//! assert_eq!(engine.sprites().len(), 1);
//! ```

pub mod animation;
pub mod bottle;
pub mod data;
pub mod engine;
pub mod furniture;
pub mod layer;
pub mod scheduler;

pub use animation::LayerAnimationState;
pub use bottle::BottleQueue;
pub use data::{
    CatalogEntry, FurnitureAsset, FurnitureCatalog, FurnitureProperty, StaticFurnitureCatalog,
    VisualizationKind,
};
pub use engine::{FurnitureEngine, FurnitureEvent, FurnitureWorld};
pub use furniture::{Furniture, FurniturePlacement};
pub use layer::{LayerKind, LayerSprite, SpriteIds};
pub use scheduler::{Scheduler, SubscriptionHandle, Tick};
