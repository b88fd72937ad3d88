//! Furniture engine - owns the placed furniture and drives their animation
//!
//! Each placed furniture registers one callback on the animation scheduler and
//! keeps the returned handle; removing the furniture cancels it. A tick first
//! swaps a placeholder for the real layers when the catalog has the asset,
//! then advances the furniture's layers.

use std::collections::BTreeMap;
use std::rc::Rc;

use isoroom_core::events::EventManager;
use isoroom_core::raster::{SpriteAtlas, StageSprite};
use isoroom_core::types::{PointerEvent, PointerKind, TilePosition, Vec2, Vec3};

use crate::data::{CatalogEntry, FurnitureCatalog};
use crate::furniture::{Furniture, FurniturePlacement};
use crate::layer::{LayerKind, LayerSprite, SpriteIds};
use crate::scheduler::Scheduler;

/// Pointer event on one furniture layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FurnitureEvent {
    pub furniture_id: u32,
    pub layer: LayerKind,
    pub event: PointerEvent,
}

/// State shared with scheduler callbacks.
pub struct FurnitureWorld {
    furnitures: BTreeMap<u32, Furniture>,
    catalog: Rc<dyn FurnitureCatalog>,
    ids: SpriteIds,
    verbose: bool,
}

impl FurnitureWorld {
    pub fn get(&self, id: u32) -> Option<&Furniture> {
        self.furnitures.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Furniture> + '_ {
        self.furnitures.values()
    }

    pub fn len(&self) -> usize {
        self.furnitures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.furnitures.is_empty()
    }

    /// Load the real visualization if the catalog has it. Returns true on swap.
    fn try_load(&mut self, id: u32) -> bool {
        let Some(furniture) = self.furnitures.get_mut(&id) else {
            return false;
        };
        if !furniture.is_placeholder() {
            return false;
        }
        match self.catalog.lookup(furniture.base_id()) {
            CatalogEntry::Ready(asset) => {
                furniture.load(asset, &mut self.ids, self.verbose);
                true
            }
            CatalogEntry::Loading => false,
            CatalogEntry::Missing => false,
        }
    }

    fn tick_furniture(&mut self, id: u32) {
        self.try_load(id);
        if let Some(furniture) = self.furnitures.get_mut(&id) {
            furniture.tick(&mut self.ids, self.verbose);
        }
    }
}

pub struct FurnitureEngine {
    world: FurnitureWorld,
    scheduler: Scheduler<FurnitureWorld>,
    events: EventManager<FurnitureEvent>,
}

impl FurnitureEngine {
    pub fn new(catalog: Rc<dyn FurnitureCatalog>) -> Self {
        Self {
            world: FurnitureWorld {
                furnitures: BTreeMap::new(),
                catalog,
                ids: SpriteIds::default(),
                verbose: false,
            },
            scheduler: Scheduler::default(),
            events: EventManager::new(),
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.world.verbose = verbose;
        self
    }

    /// Use a different animation interval.
    pub fn with_interval_ms(mut self, interval_ms: u32) -> Self {
        self.scheduler = Scheduler::new(interval_ms);
        self
    }

    pub fn world(&self) -> &FurnitureWorld {
        &self.world
    }

    pub fn get(&self, id: u32) -> Option<&Furniture> {
        self.world.get(id)
    }

    pub fn scheduler(&self) -> &Scheduler<FurnitureWorld> {
        &self.scheduler
    }

    pub fn events_mut(&mut self) -> &mut EventManager<FurnitureEvent> {
        &mut self.events
    }

    /// Place a furniture, replacing any with the same id.
    pub fn place(&mut self, placement: FurniturePlacement) {
        let id = placement.id;
        self.remove(id);

        let mut furniture = Furniture::new(placement, &mut self.world.ids);
        furniture.subscription = Some(
            self.scheduler
                .register(move |world: &mut FurnitureWorld, _| world.tick_furniture(id)),
        );
        let base_id = furniture.base_id();
        self.world.furnitures.insert(id, furniture);

        if !self.world.try_load(id) {
            if let CatalogEntry::Missing = self.world.catalog.lookup(base_id) {
                eprintln!("[Furniture] {} uses unknown base {}, showing placeholder", id, base_id);
            }
        }
    }

    pub fn remove(&mut self, id: u32) -> Option<FurniturePlacement> {
        let furniture = self.world.furnitures.remove(&id)?;
        if let Some(handle) = furniture.subscription {
            self.scheduler.cancel(handle);
        }
        Some(furniture.placement().clone())
    }

    pub fn set_state(&mut self, id: u32, state: i32) -> bool {
        let world = &mut self.world;
        match world.furnitures.get_mut(&id) {
            Some(f) => {
                f.set_state(state, &mut world.ids, world.verbose);
                true
            }
            None => false,
        }
    }

    pub fn set_direction(&mut self, id: u32, direction: u8) -> bool {
        let world = &mut self.world;
        match world.furnitures.get_mut(&id) {
            Some(f) => {
                f.set_direction(direction, &mut world.ids, world.verbose);
                true
            }
            None => false,
        }
    }

    pub fn set_position(&mut self, id: u32, position: Vec3) -> bool {
        let world = &mut self.world;
        match world.furnitures.get_mut(&id) {
            Some(f) => {
                f.set_position(position, &mut world.ids, world.verbose);
                true
            }
            None => false,
        }
    }

    /// Tell the engine an asset became available; swaps placeholders right away.
    pub fn notify_loaded(&mut self, base_id: u32) -> usize {
        let ids: Vec<u32> = self
            .world
            .furnitures
            .values()
            .filter(|f| f.base_id() == base_id && f.is_placeholder())
            .map(Furniture::id)
            .collect();
        ids.into_iter().filter(|&id| self.world.try_load(id)).count()
    }

    /// Feed elapsed time; returns the number of animation ticks fired.
    pub fn tick(&mut self, elapsed_ms: f64) -> u32 {
        self.scheduler.advance(elapsed_ms, &mut self.world)
    }

    /// Every sprite of every furniture, ready for the stage.
    pub fn sprites(&self) -> Vec<StageSprite> {
        self.world
            .iter()
            .flat_map(|f| f.sprites())
            .map(LayerSprite::stage_sprite)
            .collect()
    }

    /// Topmost interactive layer under a scene-space point.
    pub fn hit_test(&self, point: Vec2, atlas: &dyn SpriteAtlas) -> Option<(u32, LayerKind)> {
        let mut best: Option<(u32, LayerKind, f64)> = None;
        for furniture in self.world.iter() {
            for sprite in furniture.sprites() {
                if sprite.ignore_mouse || !sprite_contains(sprite, point, atlas) {
                    continue;
                }
                if best.map_or(true, |(_, _, order)| sprite.order >= order) {
                    best = Some((furniture.id(), sprite.layer, sprite.order));
                }
            }
        }
        best.map(|(id, layer, _)| (id, layer))
    }

    fn event_at(&self, point: Vec2, atlas: &dyn SpriteAtlas) -> Option<FurnitureEvent> {
        let (furniture_id, layer) = self.hit_test(point, atlas)?;
        let p = self.world.get(furniture_id)?.placement().position;
        Some(FurnitureEvent {
            furniture_id,
            layer,
            event: PointerEvent {
                position: TilePosition::new(p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32),
                dragging: false,
            },
        })
    }

    pub fn pointer_down(&mut self, point: Vec2, atlas: &dyn SpriteAtlas, now_ms: u64) -> Option<u32> {
        let event = self.event_at(point, atlas)?;
        self.events.handle_pointer_down(&event, now_ms);
        Some(event.furniture_id)
    }

    pub fn pointer_up(&mut self, point: Vec2, atlas: &dyn SpriteAtlas) -> Option<u32> {
        let event = self.event_at(point, atlas)?;
        self.events.emit(PointerKind::Up, &event);
        Some(event.furniture_id)
    }
}

fn sprite_contains(sprite: &LayerSprite, point: Vec2, atlas: &dyn SpriteAtlas) -> bool {
    let Some(image) = atlas.image(&sprite.texture_key) else {
        return false;
    };
    let local = point - sprite.position;
    if local.x < 0.0 || local.y < 0.0 {
        return false;
    }
    let (mut u, v) = (local.x as u32, local.y as u32);
    if u >= image.width || v >= image.height {
        return false;
    }
    if sprite.flip {
        u = image.width - 1 - u;
    }
    image.pixels[(v * image.width + u) as usize][3] > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FurnitureAsset, FurnitureProperty, StaticFurnitureCatalog};
    use isoroom_core::raster::{MarkerAtlas, SpriteImage};
    use serde_json::json;
    use std::cell::RefCell;

    fn asset() -> FurnitureAsset {
        let property: FurnitureProperty = serde_json::from_str(
            &json!({
                "infos": {"visualization": "furniture_animated"},
                "visualization": {
                    "layerCount": 1,
                    "directions": [2],
                    "animation": {"0": {"0": {"frameSequence": [0, 1]}}}
                }
            })
            .to_string(),
        )
        .unwrap();
        FurnitureAsset {
            name: "fan".into(),
            property,
        }
    }

    fn placement(id: u32, base_id: u32) -> FurniturePlacement {
        FurniturePlacement {
            id,
            base_id,
            position: Vec3::new(0.0, 0.0, 0.0),
            direction: 2,
            state: 0,
        }
    }

    #[test]
    fn placement_registers_and_removal_cancels() {
        let mut catalog = StaticFurnitureCatalog::new();
        catalog.insert(10, asset());
        let mut engine = FurnitureEngine::new(Rc::new(catalog));
        engine.place(placement(1, 10));
        assert_eq!(engine.scheduler().len(), 1);
        assert!(!engine.get(1).unwrap().is_placeholder());

        engine.place(placement(1, 10));
        assert_eq!(engine.scheduler().len(), 1);

        assert!(engine.remove(1).is_some());
        assert!(engine.scheduler().is_empty());
        assert!(engine.remove(1).is_none());
    }

    #[test]
    fn placeholder_swaps_once_catalog_is_ready() {
        let catalog = Rc::new(RefCell::new(StaticFurnitureCatalog::new()));
        catalog.borrow_mut().mark_loading(10);
        let mut engine = FurnitureEngine::new(catalog.clone());
        engine.place(placement(1, 10));
        assert!(engine.get(1).unwrap().is_placeholder());
        assert_eq!(engine.sprites()[0].key, "place_holder_furniture_64");

        engine.tick(250.0);
        assert!(engine.get(1).unwrap().is_placeholder());

        catalog.borrow_mut().insert(10, asset());
        engine.tick(250.0);
        assert!(!engine.get(1).unwrap().is_placeholder());
    }

    #[test]
    fn ticks_advance_frames() {
        let mut catalog = StaticFurnitureCatalog::new();
        catalog.insert(10, asset());
        let mut engine = FurnitureEngine::new(Rc::new(catalog));
        engine.place(placement(1, 10));
        assert_eq!(engine.tick(500.0), 2);
        // [0, 1] after two ticks is back at 0.
        assert_eq!(engine.get(1).unwrap().layer_sprite(0).unwrap().frame, 0);
        engine.tick(250.0);
        assert_eq!(engine.get(1).unwrap().layer_sprite(0).unwrap().frame, 1);
    }

    #[test]
    fn notify_loaded_swaps_immediately() {
        let catalog = Rc::new(RefCell::new(StaticFurnitureCatalog::new()));
        let mut engine = FurnitureEngine::new(catalog.clone());
        engine.place(placement(1, 10));
        engine.place(placement(2, 10));
        catalog.borrow_mut().insert(10, asset());
        assert_eq!(engine.notify_loaded(10), 2);
        assert_eq!(engine.notify_loaded(10), 0);
    }

    #[test]
    fn hit_test_picks_topmost_interactive_layer() {
        let mut catalog = StaticFurnitureCatalog::new();
        catalog.insert(10, asset());
        let mut engine = FurnitureEngine::new(Rc::new(catalog));
        engine.place(placement(1, 10));
        let atlas = MarkerAtlas {
            marker: SpriteImage::solid(8, 8, 0xffffff),
        };
        // Layer sprite anchored at (32, 0); the shadow ignores the mouse.
        assert_eq!(
            engine.hit_test(Vec2::new(34.0, 2.0), &atlas),
            Some((1, LayerKind::Index(0)))
        );
        assert_eq!(engine.hit_test(Vec2::new(0.0, 0.0), &atlas), None);
        assert_eq!(engine.pointer_down(Vec2::new(34.0, 2.0), &atlas, 0), Some(1));
    }
}
