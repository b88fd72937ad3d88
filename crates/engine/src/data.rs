//! Furniture property tables and the catalog that serves them
//!
//! A property table describes one furniture type: how many sprite layers it
//! has, which directions it supports, per-layer metadata, per-state frame
//! sequences and color variants. Tables are resolved externally and handed to
//! the engine through a [`FurnitureCatalog`].

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Visualization family named by `infos.visualization`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualizationKind {
    Static,
    Animated,
    Bottle,
    Other,
}

impl VisualizationKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "furniture_static" => VisualizationKind::Static,
            "furniture_animated" => VisualizationKind::Animated,
            "furniture_bottle" => VisualizationKind::Bottle,
            _ => VisualizationKind::Other,
        }
    }

    /// Kinds whose unknown states fall back to the first defined state.
    pub fn requires_known_state(self) -> bool {
        matches!(self, VisualizationKind::Animated | VisualizationKind::Bottle)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FurnitureInfos {
    #[serde(default)]
    pub visualization: String,
}

/// Per-layer metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerData {
    pub z: f64,
    /// 0..=255
    pub alpha: Option<u32>,
    pub ink: Option<String>,
    pub ignore_mouse: bool,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationLayer {
    pub frame_sequence: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisualizationData {
    pub layer_count: u32,
    pub directions: Vec<u8>,
    pub layers: BTreeMap<u32, LayerData>,
    /// state -> layer -> sequence
    pub animation: BTreeMap<i32, BTreeMap<u32, AnimationLayer>>,
    /// color id -> layer -> `RRGGBB`
    pub colors: BTreeMap<u32, BTreeMap<u32, String>>,
}

impl VisualizationData {
    pub fn has_state(&self, state: i32) -> bool {
        self.animation.contains_key(&state)
    }

    /// Lowest defined state key.
    pub fn first_state(&self) -> Option<i32> {
        self.animation.keys().next().copied()
    }

    pub fn frame_sequence(&self, state: i32, layer: u32) -> Option<&[u32]> {
        self.animation
            .get(&state)
            .and_then(|layers| layers.get(&layer))
            .map(|a| a.frame_sequence.as_slice())
    }

    pub fn layer(&self, layer: u32) -> Option<&LayerData> {
        self.layers.get(&layer)
    }

    /// `direction` if supported, else the first listed one.
    pub fn resolve_direction(&self, direction: u8) -> u8 {
        if self.directions.is_empty() || self.directions.contains(&direction) {
            direction
        } else {
            self.directions[0]
        }
    }

    /// Tint for `layer` under color variant `color`.
    pub fn tint(&self, color: u32, layer: u32) -> Option<u32> {
        let hex = self.colors.get(&color)?.get(&layer)?;
        u32::from_str_radix(hex.trim_start_matches('#'), 16).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FurnitureProperty {
    #[serde(default)]
    pub infos: FurnitureInfos,
    #[serde(default)]
    pub visualization: VisualizationData,
}

impl FurnitureProperty {
    pub fn kind(&self) -> VisualizationKind {
        VisualizationKind::from_name(&self.infos.visualization)
    }
}

/// Split `name*color` into the asset name and color variant.
pub fn split_color_name(name: &str) -> (&str, Option<u32>) {
    match name.split_once('*') {
        Some((base, color)) => (base, color.parse().ok()),
        None => (name, None),
    }
}

/// A resolved furniture type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureAsset {
    /// Catalog name, possibly with a `*color` suffix.
    pub name: String,
    pub property: FurnitureProperty,
}

impl FurnitureAsset {
    pub fn base_name(&self) -> &str {
        split_color_name(&self.name).0
    }

    pub fn color(&self) -> Option<u32> {
        split_color_name(&self.name).1
    }
}

/// Catalog lookup result.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEntry {
    /// Known but not available yet; show a placeholder.
    Loading,
    Ready(Rc<FurnitureAsset>),
    /// Unknown id; stays a placeholder.
    Missing,
}

pub trait FurnitureCatalog {
    fn lookup(&self, base_id: u32) -> CatalogEntry;
}

impl<T: FurnitureCatalog> FurnitureCatalog for RefCell<T> {
    fn lookup(&self, base_id: u32) -> CatalogEntry {
        self.borrow().lookup(base_id)
    }
}

/// In-memory catalog; ids can be marked as loading until inserted.
#[derive(Debug, Clone, Default)]
pub struct StaticFurnitureCatalog {
    assets: HashMap<u32, Rc<FurnitureAsset>>,
    loading: HashSet<u32>,
}

impl StaticFurnitureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{"<baseId>": {"name": ..., "property": {...}}}`.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let raw: HashMap<u32, FurnitureAsset> = serde_json::from_str(text)?;
        let mut catalog = Self::new();
        for (id, asset) in raw {
            catalog.insert(id, asset);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, base_id: u32, asset: FurnitureAsset) {
        self.loading.remove(&base_id);
        self.assets.insert(base_id, Rc::new(asset));
    }

    pub fn mark_loading(&mut self, base_id: u32) {
        if !self.assets.contains_key(&base_id) {
            self.loading.insert(base_id);
        }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl FurnitureCatalog for StaticFurnitureCatalog {
    fn lookup(&self, base_id: u32) -> CatalogEntry {
        if let Some(asset) = self.assets.get(&base_id) {
            CatalogEntry::Ready(asset.clone())
        } else if self.loading.contains(&base_id) {
            CatalogEntry::Loading
        } else {
            CatalogEntry::Missing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_property_table() {
        let value = json!({
            "infos": {"visualization": "furniture_animated"},
            "visualization": {
                "layerCount": 2,
                "directions": [2, 4],
                "layers": {"1": {"z": 3, "alpha": 128, "ink": "ADD", "ignoreMouse": true}},
                "animation": {"0": {"1": {"frameSequence": [0, 1, 2]}}},
                "colors": {"3": {"0": "FF8800"}}
            }
        });
        let p: FurnitureProperty = serde_json::from_str(&value.to_string()).unwrap();
        assert_eq!(p.kind(), VisualizationKind::Animated);
        let v = &p.visualization;
        assert_eq!(v.layer_count, 2);
        assert_eq!(v.layer(1).unwrap().alpha, Some(128));
        assert!(v.layer(1).unwrap().ignore_mouse);
        assert_eq!(v.frame_sequence(0, 1), Some(&[0, 1, 2][..]));
        assert_eq!(v.frame_sequence(0, 0), None);
        assert_eq!(v.tint(3, 0), Some(0xff8800));
        assert_eq!(v.resolve_direction(4), 4);
        assert_eq!(v.resolve_direction(6), 2);
    }

    #[test]
    fn color_suffix() {
        assert_eq!(split_color_name("chair*3"), ("chair", Some(3)));
        assert_eq!(split_color_name("chair"), ("chair", None));
    }

    #[test]
    fn catalog_states() {
        let mut c = StaticFurnitureCatalog::new();
        assert_eq!(c.lookup(7), CatalogEntry::Missing);
        c.mark_loading(7);
        assert_eq!(c.lookup(7), CatalogEntry::Loading);
        c.insert(
            7,
            FurnitureAsset {
                name: "lamp".into(),
                property: FurnitureProperty::default(),
            },
        );
        assert!(matches!(c.lookup(7), CatalogEntry::Ready(_)));
    }
}
