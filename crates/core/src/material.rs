//! Material resolution - numeric ids to colors/textures
//!
//! Resolution never fails: an unknown id falls back to the default material
//! so a missing asset can't stop the room from rendering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Material;

/// Source of floor and wall materials.
pub trait MaterialCatalog {
    fn floor(&self, id: u32) -> Option<Material>;
    fn wall(&self, id: u32) -> Option<Material>;
}

/// Catalog entry as stored in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub id: u32,
    pub color: u32,
    #[serde(default)]
    pub texture: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    floors: Vec<MaterialEntry>,
    #[serde(default)]
    walls: Vec<MaterialEntry>,
}

/// In-memory catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticMaterialCatalog {
    floors: HashMap<u32, Material>,
    walls: HashMap<u32, Material>,
}

impl StaticMaterialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small palette covering the default ids.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (id, color) in [(101, 0x989865), (110, 0xc8b48c), (111, 0x9fa4a9), (112, 0x7b5f3f)] {
            catalog.insert_floor(id, Material::solid(color));
        }
        for (id, color) in [(101, 0xbbbbcc), (102, 0xb49a78), (108, 0x8e9aa7)] {
            catalog.insert_wall(id, Material::solid(color));
        }
        catalog
    }

    /// Parse `{"floors": [...], "walls": [...]}`.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let file: CatalogFile = serde_json::from_str(text)?;
        let mut catalog = Self::new();
        for e in file.floors {
            catalog.insert_floor(e.id, Material { color: e.color, texture: e.texture });
        }
        for e in file.walls {
            catalog.insert_wall(e.id, Material { color: e.color, texture: e.texture });
        }
        Ok(catalog)
    }

    pub fn insert_floor(&mut self, id: u32, material: Material) {
        self.floors.insert(id, material);
    }

    pub fn insert_wall(&mut self, id: u32, material: Material) {
        self.walls.insert(id, material);
    }
}

impl MaterialCatalog for StaticMaterialCatalog {
    fn floor(&self, id: u32) -> Option<Material> {
        self.floors.get(&id).cloned()
    }

    fn wall(&self, id: u32) -> Option<Material> {
        self.walls.get(&id).cloned()
    }
}

/// Floor material for `id`, or the default.
pub fn resolve_floor(catalog: &dyn MaterialCatalog, id: u32, verbose: bool) -> Material {
    catalog.floor(id).unwrap_or_else(|| {
        if verbose {
            eprintln!("[Room] floor material {} not found, using default", id);
        }
        Material::default()
    })
}

/// Wall material for `id`, or the default.
pub fn resolve_wall(catalog: &dyn MaterialCatalog, id: u32, verbose: bool) -> Material {
    catalog.wall(id).unwrap_or_else(|| {
        if verbose {
            eprintln!("[Room] wall material {} not found, using default", id);
        }
        Material::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FALLBACK_MATERIAL_COLOR;

    #[test]
    fn builtin_covers_default_ids() {
        let c = StaticMaterialCatalog::builtin();
        assert!(c.floor(111).is_some());
        assert!(c.wall(101).is_some());
    }

    #[test]
    fn unknown_ids_fall_back() {
        let c = StaticMaterialCatalog::new();
        let m = resolve_floor(&c, 999, false);
        assert_eq!(m.color, FALLBACK_MATERIAL_COLOR);
        assert_eq!(m.texture, None);
        assert_eq!(resolve_wall(&c, 5, false), Material::default());
    }

    #[test]
    fn parses_json_catalog() {
        let c = StaticMaterialCatalog::from_json(
            r#"{"floors": [{"id": 7, "color": 255, "texture": "floor_7"}]}"#,
        )
        .unwrap();
        assert_eq!(
            c.floor(7),
            Some(Material {
                color: 255,
                texture: Some("floor_7".into())
            })
        );
        assert_eq!(c.wall(7), None);
    }
}
