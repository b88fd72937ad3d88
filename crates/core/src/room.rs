//! Room - owns the tile map, the composed parts and the camera
//!
//! Configuration is an immutable snapshot. [`Room::apply_configuration`]
//! decides whether the scene must be rebuilt; [`Room::update`] always throws
//! every part away and walks the tile map again. Part handles carry the
//! rebuild generation, so a handle kept across a rebuild stops resolving.

use std::rc::Rc;

use crate::camera::{Camera, Viewport};
use crate::events::{EventManager, RoomEvents};
use crate::heightmap::HeightmapError;
use crate::material::{resolve_floor, resolve_wall, MaterialCatalog, StaticMaterialCatalog};
use crate::parts::{EventCategory, RoomPart, WallSettings};
use crate::raster::{region_size, render_stage, Canvas, ScreenshotError, SpriteAtlas, StageSprite};
use crate::snapshot::{fingerprint, snapshot, PartSnapshot};
use crate::tile_map::TileMap;
use crate::types::{PointerEvent, PointerKind, Rect, RoomConfiguration, TilePosition, Vec2};
use crate::visualization::{compose, ComposeSettings};

/// Collaborators handed to a room instead of global lookups.
#[derive(Clone)]
pub struct RendererContext {
    pub viewport: Viewport,
    pub background_color: u32,
    /// 0..=1
    pub background_alpha: f64,
    pub materials: Rc<dyn MaterialCatalog>,
    pub verbose: bool,
}

impl RendererContext {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            background_color: 0x000000,
            background_alpha: 1.0,
            materials: Rc::new(StaticMaterialCatalog::builtin()),
            verbose: false,
        }
    }

    pub fn with_materials(mut self, materials: Rc<dyn MaterialCatalog>) -> Self {
        self.materials = materials;
        self
    }

    pub fn with_background(mut self, color: u32, alpha: f64) -> Self {
        self.background_color = color;
        self.background_alpha = alpha;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Default for RendererContext {
    fn default() -> Self {
        RendererContext::new(Viewport::default())
    }
}

impl std::fmt::Debug for RendererContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererContext")
            .field("viewport", &self.viewport)
            .field("background_color", &self.background_color)
            .field("background_alpha", &self.background_alpha)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

/// Handle to a part of one specific rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartId {
    generation: u32,
    index: u32,
}

pub struct Room {
    ctx: RendererContext,
    config: RoomConfiguration,
    tile_map: TileMap,
    parts: Vec<RoomPart>,
    generation: u32,
    bounds: Rect,
    camera: Camera,
    events: RoomEvents,
    hovered: Option<PartId>,
    cursor: Option<TilePosition>,
}

impl Room {
    pub fn new(config: RoomConfiguration, ctx: RendererContext) -> Result<Self, HeightmapError> {
        let tile_map = TileMap::parse(&config.height_map, &config.doors)?;
        let camera = Camera::new(ctx.viewport, config.zoom, config.dragging, config.center_camera);
        let mut room = Self {
            ctx,
            config,
            tile_map,
            parts: Vec::new(),
            generation: 0,
            bounds: Rect::default(),
            camera,
            events: RoomEvents::default(),
            hovered: None,
            cursor: None,
        };
        room.log_demoted_doors();
        room.update();
        room.camera.snap_to_center();
        Ok(room)
    }

    pub fn config(&self) -> &RoomConfiguration {
        &self.config
    }

    pub fn context(&self) -> &RendererContext {
        &self.ctx
    }

    pub fn tile_map(&self) -> &TileMap {
        &self.tile_map
    }

    /// Apply the next configuration snapshot.
    ///
    /// Returns whether the scene was rebuilt. A heightmap that fails to parse
    /// leaves the room untouched.
    pub fn apply_configuration(&mut self, next: RoomConfiguration) -> Result<bool, HeightmapError> {
        let grid_changed =
            self.config.height_map != next.height_map || self.config.doors != next.doors;
        let rebuild = self.config.geometry_differs(&next);

        if grid_changed {
            self.tile_map = TileMap::parse(&next.height_map, &next.doors)?;
        }
        self.camera
            .configure(next.zoom, next.dragging, next.center_camera);
        self.config = next;

        if grid_changed {
            self.log_demoted_doors();
        }
        if rebuild {
            self.update();
        }
        Ok(rebuild)
    }

    /// Destroy every part and compose the scene again.
    pub fn update(&mut self) {
        self.parts.clear();
        self.tile_map.reset_walls();
        self.generation = self.generation.wrapping_add(1);
        self.hovered = None;
        self.cursor = None;

        let verbose = self.ctx.verbose;
        let catalog = self.ctx.materials.as_ref();
        let settings = ComposeSettings {
            floor_material: resolve_floor(catalog, self.config.floor_material, verbose),
            wall_material: resolve_wall(catalog, self.config.wall_material, verbose),
            floor_thickness: self.config.floor_thickness,
            floor_hidden: self.config.floor_hidden,
            wall_hidden: self.config.wall_hidden,
            walls: WallSettings {
                thickness: self.config.wall_thickness,
                floor_thickness: self.config.floor_thickness,
                height: self.config.wall_height,
                max_height: self.tile_map.max_height(),
            },
        };
        self.parts = compose(&mut self.tile_map, &settings);

        self.bounds = self
            .parts
            .iter()
            .map(RoomPart::bounds)
            .fold(Rect::default(), |acc, r| acc.union(&r));
        self.camera.set_bounds(self.bounds);

        if verbose {
            eprintln!(
                "[Room] rebuilt {} parts from {}x{} grid (generation {})",
                self.parts.len(),
                self.tile_map.width(),
                self.tile_map.depth(),
                self.generation
            );
        }
    }

    fn log_demoted_doors(&self) {
        for door in self.tile_map.demoted_doors() {
            eprintln!(
                "[Heightmap] door marker at ({}, {}) ignored, room door is {:?}",
                door.x,
                door.y,
                self.tile_map.door()
            );
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn parts(&self) -> &[RoomPart] {
        &self.parts
    }

    pub fn part_ids(&self) -> impl Iterator<Item = PartId> + '_ {
        (0..self.parts.len() as u32).map(move |index| PartId {
            generation: self.generation,
            index,
        })
    }

    /// Resolve a handle; `None` once a rebuild has run.
    pub fn part(&self, id: PartId) -> Option<&RoomPart> {
        if id.generation != self.generation {
            return None;
        }
        self.parts.get(id.index as usize)
    }

    /// Scene-space bounding box of every part.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn events_mut(&mut self) -> &mut RoomEvents {
        &mut self.events
    }

    /// The hovered tile, if the pointer is over one.
    pub fn cursor(&self) -> Option<TilePosition> {
        self.cursor
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.ctx.viewport = viewport;
        self.camera.set_viewport(viewport);
    }

    /// Topmost part under a screen point.
    pub fn hit_test(&self, screen: Vec2) -> Option<PartId> {
        let local = self.camera.to_local(screen);
        let mut best: Option<(usize, f64)> = None;
        for (i, part) in self.parts.iter().enumerate() {
            if !part.hit_test(local) {
                continue;
            }
            let order = part.order();
            if best.map_or(true, |(_, o)| order >= o) {
                best = Some((i, order));
            }
        }
        best.map(|(i, _)| PartId {
            generation: self.generation,
            index: i as u32,
        })
    }

    fn pointer_event(&self, id: PartId, screen: Vec2) -> Option<(EventCategory, PointerEvent)> {
        let part = self.part(id)?;
        let local = self.camera.to_local(screen);
        Some((
            part.category(),
            PointerEvent {
                position: part.tile_position_at(local),
                dragging: self.camera.has_dragged(),
            },
        ))
    }

    fn handlers(&mut self, category: EventCategory) -> &mut EventManager<PointerEvent> {
        match category {
            EventCategory::Tiles => &mut self.events.tiles,
            EventCategory::Walls => &mut self.events.walls,
        }
    }

    pub fn pointer_down(&mut self, screen: Vec2, now_ms: u64) {
        self.camera.pointer_down(now_ms);
        let hit = self.hit_test(screen).and_then(|id| self.pointer_event(id, screen));
        if let Some((category, event)) = hit {
            self.handlers(category).handle_pointer_down(&event, now_ms);
        }
    }

    /// Pointer moved to `screen` by `movement` device pixels.
    pub fn pointer_move(&mut self, screen: Vec2, movement: Vec2) {
        self.camera.pointer_move(movement);
        let hit = self.hit_test(screen);

        if hit != self.hovered {
            let previous = self.hovered.and_then(|id| self.pointer_event(id, screen));
            if let Some((category, event)) = previous {
                self.handlers(category).emit(PointerKind::Out, &event);
            }
            self.cursor = None;
            self.hovered = hit;
            if let Some((category, event)) = hit.and_then(|id| self.pointer_event(id, screen)) {
                if category == EventCategory::Tiles {
                    self.cursor = Some(event.position);
                }
                self.handlers(category).emit(PointerKind::Over, &event);
            }
        }

        if let Some((category, event)) = hit.and_then(|id| self.pointer_event(id, screen)) {
            if category == EventCategory::Tiles {
                self.cursor = Some(event.position);
            }
            self.handlers(category).emit(PointerKind::Move, &event);
        }
    }

    /// Returns whether releasing started a centering animation.
    pub fn pointer_up(&mut self, screen: Vec2, now_ms: u64) -> bool {
        let hit = self.hit_test(screen).and_then(|id| self.pointer_event(id, screen));
        if let Some((category, event)) = hit {
            self.handlers(category).emit(PointerKind::Up, &event);
        }
        self.camera.pointer_up(now_ms)
    }

    pub fn wheel(&mut self, delta_y: f64, cursor: Vec2) -> bool {
        self.camera.wheel(delta_y, cursor)
    }

    pub fn key(&mut self, key: char, cursor: Vec2) -> bool {
        self.camera.key(key, cursor)
    }

    /// Advance camera animations.
    pub fn tick(&mut self, elapsed_ms: f64) {
        self.camera.update(elapsed_ms);
    }

    /// Draw the background, the parts and then `sprites` through the camera.
    pub fn render_into(&self, canvas: &mut Canvas, sprites: &[StageSprite], atlas: &dyn SpriteAtlas) {
        canvas.clear(self.ctx.background_color, self.ctx.background_alpha);
        render_stage(canvas, &self.parts, sprites, atlas, self.camera.transform());
    }

    /// Render the on-screen `region` offscreen and encode it as a PNG data URL.
    pub fn screenshot(
        &self,
        region: Rect,
        sprites: &[StageSprite],
        atlas: &dyn SpriteAtlas,
    ) -> Result<String, ScreenshotError> {
        let (width, height) = region_size(region);
        if width == 0 || height == 0 {
            return Err(ScreenshotError::EmptyRegion);
        }
        let mut canvas = Canvas::try_new(width, height)
            .ok_or(ScreenshotError::RegionTooLarge { width, height })?;
        canvas.clear(self.ctx.background_color, self.ctx.background_alpha);
        let transform = self
            .camera
            .transform()
            .translated(Vec2::new(region.x, region.y));
        render_stage(&mut canvas, &self.parts, sprites, atlas, transform);
        canvas.to_png_data_url()
    }

    pub fn snapshot(&self) -> Vec<PartSnapshot> {
        snapshot(&self.parts)
    }

    pub fn fingerprint(&self) -> u64 {
        fingerprint(&self.parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::NoSprites;
    use std::cell::RefCell;

    fn room(text: &str) -> Room {
        Room::new(RoomConfiguration::new(text), RendererContext::default()).unwrap()
    }

    #[test]
    fn malformed_heightmap_is_an_error() {
        let err = Room::new(RoomConfiguration::new("00\n0"), RendererContext::default());
        assert!(matches!(err, Err(HeightmapError::RaggedRow { .. })));
    }

    #[test]
    fn rebuild_invalidates_part_handles() {
        let mut r = room("00\n00");
        let id = r.part_ids().next().unwrap();
        assert!(r.part(id).is_some());
        r.update();
        assert!(r.part(id).is_none());
    }

    #[test]
    fn camera_only_changes_keep_the_scene() {
        let mut r = room("00\n00");
        let generation = r.generation();
        let next = r.config().clone().with_camera(false, false);
        assert_eq!(r.apply_configuration(next), Ok(false));
        assert_eq!(r.generation(), generation);

        let next = r.config().clone().with_wall_height(2);
        assert_eq!(r.apply_configuration(next), Ok(true));
        assert_eq!(r.generation(), generation + 1);
    }

    #[test]
    fn bad_heightmap_leaves_room_untouched() {
        let mut r = room("00\n00");
        let before = r.fingerprint();
        let next = r.config().clone().with_height_map("0\n00");
        assert!(r.apply_configuration(next).is_err());
        assert_eq!(r.fingerprint(), before);
        assert_eq!(r.config().height_map, "00\n00");
    }

    #[test]
    fn hover_sets_cursor_and_fires_over() {
        let mut r = room("000\n000\n000");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        r.events_mut()
            .tiles
            .set_handler(PointerKind::Over, move |e: &PointerEvent| {
                sink.borrow_mut().push(e.position)
            });

        // Center of tile (1,1): its top face center in scene space.
        let local = crate::cube::project(crate::types::Vec3::new(1.5, 0.5, 0.0));
        let screen = r.camera().to_screen(local);
        r.pointer_move(screen, Vec2::ZERO);
        assert_eq!(r.cursor(), Some(TilePosition::new(1, 1, 0)));
        assert_eq!(*seen.borrow(), vec![TilePosition::new(1, 1, 0)]);

        // Far outside the room: cursor hidden.
        r.pointer_move(Vec2::new(-5000.0, -5000.0), Vec2::ZERO);
        assert_eq!(r.cursor(), None);
    }

    #[test]
    fn screenshot_is_png_data_url() {
        let r = room("00\n00");
        let url = r
            .screenshot(Rect::new(0.0, 0.0, 32.0, 16.0), &[], &NoSprites)
            .unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(
            r.screenshot(Rect::new(0.0, 0.0, 0.0, 10.0), &[], &NoSprites),
            Err(ScreenshotError::EmptyRegion)
        );
    }

    #[test]
    fn oversized_screenshot_region_is_an_error() {
        let r = room("00\n00");
        assert_eq!(
            r.screenshot(Rect::new(0.0, 0.0, 70000.0, 70000.0), &[], &NoSprites),
            Err(ScreenshotError::RegionTooLarge {
                width: 70000,
                height: 70000
            })
        );
    }
}
