//! Plain-data view of a composed room, for comparisons and debugging

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::parts::{PartKind, RoomPart};
use crate::types::{TilePosition, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct PartSnapshot {
    pub kind: PartKind,
    pub position: TilePosition,
    pub size: Vec3,
    pub order: f64,
}

impl From<&RoomPart> for PartSnapshot {
    fn from(part: &RoomPart) -> Self {
        Self {
            kind: part.kind(),
            position: part.position(),
            size: part.size(),
            order: part.order(),
        }
    }
}

pub fn snapshot(parts: &[RoomPart]) -> Vec<PartSnapshot> {
    parts.iter().map(PartSnapshot::from).collect()
}

/// Hash of every part's kind, position, size and face orders.
pub fn fingerprint(parts: &[RoomPart]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for part in parts {
        part.kind().hash(&mut hasher);
        part.position().hash(&mut hasher);
        let size = part.size();
        for v in [size.x, size.y, size.z] {
            v.to_bits().hash(&mut hasher);
        }
        for face in part.faces() {
            face.order.to_bits().hash(&mut hasher);
            for p in &face.points {
                p.x.to_bits().hash(&mut hasher);
                p.y.to_bits().hash(&mut hasher);
            }
        }
    }
    hasher.finish()
}
