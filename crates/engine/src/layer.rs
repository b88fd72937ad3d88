//! Layer sprites - texture keys, positions and draw attributes
//!
//! Texture keys follow the asset naming scheme:
//!
//! ```text
//! {name}_{name}_64_{letter}_{direction}_{frame}   layer sprite
//! {name}_{name}_64_sd_{direction}_0               shadow
//! ```
//!
//! where `letter` is `a` for layer 0, `b` for layer 1 and so on.

use isoroom_core::raster::StageSprite;
use isoroom_core::sorting::floor_furniture_order;
use isoroom_core::types::{
    BlendMode, Vec2, Vec3, HEIGHT_UNIT, SHADOW_ALPHA, SHADOW_Z_OFFSET, TILE_HALF_HEIGHT,
    TILE_HALF_WIDTH,
};

use crate::data::LayerData;

/// Texture shown until a furniture's property table is available.
pub const PLACEHOLDER_KEY: &str = "place_holder_furniture_64";

const PLACEHOLDER_OFFSET: Vec2 = Vec2::new(-1.0, -50.0);

/// Which sprite of a furniture this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Shadow,
    Index(u32),
    Placeholder,
}

/// Source of unique sprite ids.
#[derive(Debug, Clone, Default)]
pub struct SpriteIds {
    next: u64,
}

impl SpriteIds {
    pub fn next_id(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerSprite {
    pub layer: LayerKind,
    pub texture_key: String,
    /// Changes whenever the sprite is recreated for a new texture.
    pub sprite_id: u64,
    pub frame: u32,
    pub z: f64,
    pub order: f64,
    pub alpha: f64,
    pub tint: Option<u32>,
    pub blend: BlendMode,
    pub flip: bool,
    pub position: Vec2,
    pub ignore_mouse: bool,
    pub tag: Option<String>,
}

impl LayerSprite {
    pub fn stage_sprite(&self) -> StageSprite {
        StageSprite {
            key: self.texture_key.clone(),
            position: self.position,
            order: self.order,
            alpha: self.alpha,
            tint: self.tint,
            blend: self.blend,
            flip: self.flip,
        }
    }
}

pub fn layer_letter(layer: u32) -> char {
    char::from_u32('a' as u32 + layer).unwrap_or('a')
}

pub fn texture_key(name: &str, layer: u32, direction: u8, frame: u32) -> String {
    format!(
        "{}_{}_64_{}_{}_{}",
        name,
        name,
        layer_letter(layer),
        direction,
        frame
    )
}

pub fn shadow_key(name: &str, direction: u8) -> String {
    format!("{}_{}_64_sd_{}_0", name, name, direction)
}

/// Screen anchor of a floor furniture at room position `p`.
pub fn furniture_origin(p: Vec3) -> Vec2 {
    Vec2::new(
        TILE_HALF_WIDTH + TILE_HALF_WIDTH * p.x - TILE_HALF_WIDTH * p.y,
        TILE_HALF_HEIGHT * p.x + TILE_HALF_HEIGHT * p.y - HEIGHT_UNIT * p.z,
    )
}

/// Placeholder sprite position for a furniture at `p`.
pub fn placeholder_position(p: Vec3) -> Vec2 {
    furniture_origin(p) - Vec2::new(TILE_HALF_WIDTH, 0.0) + PLACEHOLDER_OFFSET
}

/// Keep `previous`'s id when the texture did not change.
fn sprite_id(previous: Option<&LayerSprite>, key: &str, ids: &mut SpriteIds) -> u64 {
    match previous {
        Some(p) if p.texture_key == key => p.sprite_id,
        _ => ids.next_id(),
    }
}

pub struct LayerInput<'a> {
    pub name: &'a str,
    pub layer: u32,
    pub direction: u8,
    pub frame: u32,
    pub position: Vec3,
    pub data: Option<&'a LayerData>,
    pub tint: Option<u32>,
}

pub fn build_layer(input: LayerInput<'_>, previous: Option<&LayerSprite>, ids: &mut SpriteIds) -> LayerSprite {
    let key = texture_key(input.name, input.layer, input.direction, input.frame);
    let z = input.data.map_or(0.0, |d| d.z);
    LayerSprite {
        layer: LayerKind::Index(input.layer),
        sprite_id: sprite_id(previous, &key, ids),
        texture_key: key,
        frame: input.frame,
        z,
        order: floor_furniture_order(input.position, z),
        alpha: input
            .data
            .and_then(|d| d.alpha)
            .map_or(1.0, |a| a as f64 / 255.0),
        tint: input.tint,
        blend: input
            .data
            .and_then(|d| d.ink.as_deref())
            .map_or(BlendMode::Normal, BlendMode::from_ink),
        flip: false,
        position: furniture_origin(input.position),
        ignore_mouse: input.data.map_or(false, |d| d.ignore_mouse),
        tag: input.data.and_then(|d| d.tag.clone()),
    }
}

pub fn build_shadow(
    name: &str,
    direction: u8,
    position: Vec3,
    previous: Option<&LayerSprite>,
    ids: &mut SpriteIds,
) -> LayerSprite {
    let key = shadow_key(name, direction);
    LayerSprite {
        layer: LayerKind::Shadow,
        sprite_id: sprite_id(previous, &key, ids),
        texture_key: key,
        frame: 0,
        z: SHADOW_Z_OFFSET,
        order: floor_furniture_order(position, SHADOW_Z_OFFSET),
        alpha: SHADOW_ALPHA,
        tint: None,
        blend: BlendMode::Add,
        flip: false,
        position: furniture_origin(position),
        ignore_mouse: true,
        tag: None,
    }
}

pub fn build_placeholder(position: Vec3, previous: Option<&LayerSprite>, ids: &mut SpriteIds) -> LayerSprite {
    LayerSprite {
        layer: LayerKind::Placeholder,
        sprite_id: sprite_id(previous, PLACEHOLDER_KEY, ids),
        texture_key: PLACEHOLDER_KEY.to_string(),
        frame: 0,
        z: 0.0,
        order: floor_furniture_order(position, 0.0),
        alpha: 1.0,
        tint: None,
        blend: BlendMode::Normal,
        flip: false,
        position: placeholder_position(position),
        ignore_mouse: false,
        tag: None,
    }
}
