//! Preview scene: one room plus its furniture, driven by terminal input.
//!
//! Everything here is terminal-free so the binary stays a thin loop and the
//! scene can be exercised from tests.

use std::collections::hash_map::DefaultHasher;
use std::env;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use base64::Engine as _;

use crate::adapter::RoomLoad;
use crate::core::raster::{MarkerAtlas, SpriteImage};
use crate::core::{Canvas, RendererContext, Room, Viewport};
use crate::engine::{FurnitureEngine, StaticFurnitureCatalog};
use crate::input::PointerInput;
use crate::term::TermSize;
use crate::types::{RoomConfiguration, Vec2, ViewAction, ZoomConfig, TILE_HALF_HEIGHT, TILE_HALF_WIDTH};

/// Room shown when no heightmap or room file is given.
pub const DEFAULT_HEIGHTMAP: &str = "xxxxxxxx\nx2222xxx\nx2222000\nx2222000\nx0000000\nx0000000\nx0000000";

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Preview settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    /// `ISOROOM_HEIGHTMAP`: plain heightmap text file.
    pub heightmap_path: Option<PathBuf>,
    /// `ISOROOM_ROOM`: `loadRoom` packet or bare payload; wins over the heightmap.
    pub room_path: Option<PathBuf>,
    /// `ISOROOM_FURNITURE`: furniture property tables keyed by base id.
    pub furniture_path: Option<PathBuf>,
    /// `ISOROOM_TICK_MS`: input poll interval.
    pub tick_ms: u64,
    /// `ISOROOM_VERBOSE`
    pub verbose: bool,
    /// `ISOROOM_SCREENSHOT`: where `p` writes its PNG.
    pub screenshot_path: PathBuf,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            heightmap_path: None,
            room_path: None,
            furniture_path: None,
            tick_ms: 16,
            verbose: false,
            screenshot_path: PathBuf::from("isoroom-screenshot.png"),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl PreviewConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path = |key: &str| lookup(key).and_then(non_empty).map(PathBuf::from);
        Self {
            heightmap_path: path("ISOROOM_HEIGHTMAP"),
            room_path: path("ISOROOM_ROOM"),
            furniture_path: path("ISOROOM_FURNITURE"),
            tick_ms: lookup("ISOROOM_TICK_MS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|&ms| ms > 0)
                .unwrap_or(defaults.tick_ms),
            verbose: lookup("ISOROOM_VERBOSE").map_or(false, |s| parse_flag(&s)),
            screenshot_path: path("ISOROOM_SCREENSHOT").unwrap_or(defaults.screenshot_path),
        }
    }
}

/// Base configuration for terminal pixels: tiles are 64 canvas pixels wide,
/// so the preview starts zoomed out.
pub fn preview_configuration() -> RoomConfiguration {
    RoomConfiguration::default().with_zoom(ZoomConfig {
        level: 0.5,
        min: 0.25,
        max: 3.0,
        step: 0.25,
        ..ZoomConfig::default()
    })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Resolve the room to show from `config`.
pub fn load_room(config: &PreviewConfig) -> Result<RoomLoad> {
    let base = preview_configuration();
    if let Some(path) = &config.room_path {
        let text = read(path)?;
        let load = if text.contains("\"header\"") {
            RoomLoad::from_packet(&text, &base)?
                .ok_or_else(|| anyhow!("{} is not a loadRoom packet", path.display()))?
        } else {
            RoomLoad::from_payload(&text, &base)?
        };
        return Ok(load);
    }

    let heightmap = match &config.heightmap_path {
        Some(path) => read(path)?,
        None => DEFAULT_HEIGHTMAP.to_string(),
    };
    let payload = serde_json::json!({ "heightmap": heightmap.trim_end() }).to_string();
    RoomLoad::from_payload(&payload, &base)
}

pub fn load_catalog(config: &PreviewConfig) -> Result<StaticFurnitureCatalog> {
    match &config.furniture_path {
        Some(path) => StaticFurnitureCatalog::from_json(&read(path)?)
            .with_context(|| format!("parse furniture tables {}", path.display())),
        None => Ok(StaticFurnitureCatalog::new()),
    }
}

pub struct Scene {
    room: Room,
    furniture: FurnitureEngine,
    atlas: MarkerAtlas,
    title: String,
    canvas: Canvas,
    verbose: bool,
    screenshot_path: PathBuf,
}

impl Scene {
    pub fn new(load: RoomLoad, catalog: StaticFurnitureCatalog, size: TermSize, verbose: bool) -> Result<Self> {
        let (width, height) = size.canvas_size();
        let ctx = RendererContext::new(Viewport::new(width as f64, height as f64))
            .with_background(0x101018, 1.0)
            .with_verbose(verbose);
        let title = load.title();
        let room = Room::new(load.config, ctx).context("build room")?;

        let mut furniture = FurnitureEngine::new(Rc::new(catalog)).with_verbose(verbose);
        for placement in load.placements {
            furniture.place(placement);
        }

        Ok(Self {
            room,
            furniture,
            atlas: MarkerAtlas {
                marker: SpriteImage::solid(6, 10, 0xd8a040),
            },
            title,
            canvas: Canvas::new(width, height),
            verbose,
            screenshot_path: PreviewConfig::default().screenshot_path,
        })
    }

    pub fn with_screenshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot_path = path.into();
        self
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn furniture(&self) -> &FurnitureEngine {
        &self.furniture
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn resize(&mut self, size: TermSize) {
        let (width, height) = size.canvas_size();
        self.room.set_viewport(Viewport::new(width as f64, height as f64));
        self.room.camera_mut().snap_to_center();
        self.canvas = Canvas::new(width, height);
    }

    fn viewport_center(&self) -> Vec2 {
        self.room.camera().viewport().center()
    }

    /// Apply a key action. Returns a status message worth showing, if any.
    pub fn apply(&mut self, action: ViewAction) -> Result<Option<String>> {
        let center = self.viewport_center();
        match action {
            ViewAction::Zoom(key) => {
                self.room.key(key, center);
            }
            ViewAction::Center => self.room.camera_mut().center(),
            ViewAction::Pan { dx, dy } => self.room.camera_mut().pan(Vec2::new(
                dx as f64 * TILE_HALF_WIDTH,
                dy as f64 * TILE_HALF_HEIGHT,
            )),
            ViewAction::Screenshot => {
                let path = self.screenshot_path.clone();
                let bytes = self.save_screenshot(&path)?;
                return Ok(Some(format!("saved {} ({} bytes)", path.display(), bytes)));
            }
            ViewAction::ToggleVerbose => {
                self.verbose = !self.verbose;
                return Ok(Some(format!("logging {}", if self.verbose { "on" } else { "off" })));
            }
        }
        Ok(None)
    }

    pub fn pointer(&mut self, input: PointerInput, now_ms: u64) {
        match input {
            PointerInput::Down(p) => {
                let local = self.room.camera().to_local(p);
                if let Some(id) = self.furniture.pointer_down(local, &self.atlas, now_ms) {
                    if self.verbose {
                        eprintln!("[Preview] furniture {} pressed", id);
                    }
                }
                self.room.pointer_down(p, now_ms);
            }
            PointerInput::Move { position, movement } => self.room.pointer_move(position, movement),
            PointerInput::Up(p) => {
                let local = self.room.camera().to_local(p);
                self.furniture.pointer_up(local, &self.atlas);
                self.room.pointer_up(p, now_ms);
            }
            PointerInput::Wheel { delta_y, position } => {
                self.room.wheel(delta_y, position);
            }
        }
    }

    /// Advance camera tweens and furniture animation.
    pub fn tick(&mut self, elapsed_ms: f64) {
        self.room.tick(elapsed_ms);
        self.furniture.tick(elapsed_ms);
    }

    pub fn is_animating(&self) -> bool {
        let camera = self.room.camera();
        camera.is_zooming() || camera.is_centering() || camera.is_dragging()
    }

    /// Changes whenever the next frame would look different.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.room.fingerprint().hash(&mut hasher);
        let camera = self.room.camera();
        for v in [camera.position(), camera.pivot(), camera.scale()] {
            v.x.to_bits().hash(&mut hasher);
            v.y.to_bits().hash(&mut hasher);
        }
        self.room.cursor().hash(&mut hasher);
        for sprite in self.furniture.sprites() {
            sprite.key.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Rasterize the current frame into the scene canvas.
    pub fn render(&mut self) -> &Canvas {
        let sprites = self.furniture.sprites();
        self.room.render_into(&mut self.canvas, &sprites, &self.atlas);
        &self.canvas
    }

    pub fn status_line(&self) -> String {
        let cursor = match self.room.cursor() {
            Some(t) => format!("{},{},{}", t.x, t.y, t.z),
            None => "-".to_string(),
        };
        format!(
            "{} | zoom {:.2} | parts {} | furni {} | tile {} | +/- zoom  c center  p shot  q quit",
            self.title,
            self.room.camera().level(),
            self.room.parts().len(),
            self.furniture.world().len(),
            cursor,
        )
    }

    /// Encode the visible viewport as PNG bytes.
    pub fn screenshot_png(&self) -> Result<Vec<u8>> {
        let sprites = self.furniture.sprites();
        let region = self.room.camera().viewport().rect();
        let url = self.room.screenshot(region, &sprites, &self.atlas)?;
        let encoded = url
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| anyhow!("unexpected screenshot encoding"))?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .context("decode screenshot")
    }

    pub fn save_screenshot(&self, path: &Path) -> Result<usize> {
        let png = self.screenshot_png()?;
        fs::write(path, &png).with_context(|| format!("write {}", path.display()))?;
        Ok(png.len())
    }
}
