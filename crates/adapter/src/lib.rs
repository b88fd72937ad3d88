//! Adapter module - maps server packets onto the room and furniture engines
//!
//! The room server announces a room with a `loadRoom` packet carrying the
//! heightmap, floor thickness, wall height and furniture list. This crate
//! turns that payload into the pieces the rest of the workspace consumes:
//!
//! - a [`RoomConfiguration`] snapshot (layered over a base configuration, so
//!   materials, zoom and camera settings the packet does not carry survive)
//! - the furniture placements for the furniture engine
//! - the room's display name and owner
//!
//! Networking is not part of this crate; callers hand in packet text.
//!
//! # Example Packet
//!
//! ```text
//! {"header":"loadRoom","data":{"heightmap":"x00\n000","floorThickness":8,"wallHeight":0,
//!   "furnitures":[{"id":1,"baseId":20,"position":{"x":1,"y":1,"z":0},"direction":2,"state":0}]}}
//! ```

pub mod protocol;

pub use isoroom_core as core;
pub use isoroom_engine as engine;
pub use isoroom_types as types;

use anyhow::{Context, Result};

use crate::core::Heightmap;
use crate::engine::FurniturePlacement;
use crate::protocol::{parse_packet, LoadRoomMessage, ParsedPacket};
use crate::types::RoomConfiguration;

pub use protocol::{create_load_room, OutgoingPacket};

/// Everything a `loadRoom` packet describes.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomLoad {
    pub config: RoomConfiguration,
    pub placements: Vec<FurniturePlacement>,
    pub name: Option<String>,
    pub owner_name: Option<String>,
}

impl RoomLoad {
    /// Layer `message` over `base`. Fails on a malformed heightmap.
    pub fn from_message(message: LoadRoomMessage, base: &RoomConfiguration) -> Result<Self> {
        Heightmap::parse(&message.heightmap).context("loadRoom heightmap")?;

        let mut config = base.clone().with_height_map(message.heightmap);
        if let Some(px) = message.floor_thickness {
            config = config.with_floor_thickness(px);
        }
        if let Some(height) = message.wall_height {
            config = config.with_wall_height(height);
        }
        if !message.doors.is_empty() {
            config.doors = message.doors;
        }

        Ok(Self {
            config,
            placements: message.furnitures,
            name: message.name,
            owner_name: message.owner_name,
        })
    }

    /// Parse packet text. `Ok(None)` for packets that are not room loads.
    pub fn from_packet(text: &str, base: &RoomConfiguration) -> Result<Option<Self>> {
        match parse_packet(text).context("parse packet")? {
            ParsedPacket::LoadRoom(message) => Self::from_message(message, base).map(Some),
            ParsedPacket::Unknown { .. } => Ok(None),
        }
    }

    /// Parse a bare `LoadRoomMessage` payload (no packet envelope).
    pub fn from_payload(text: &str, base: &RoomConfiguration) -> Result<Self> {
        let message: LoadRoomMessage = serde_json::from_str(text).context("parse loadRoom payload")?;
        Self::from_message(message, base)
    }

    pub fn title(&self) -> String {
        match (&self.name, &self.owner_name) {
            (Some(name), Some(owner)) => format!("{} ({})", name, owner),
            (Some(name), None) => name.clone(),
            (None, Some(owner)) => format!("room of {}", owner),
            (None, None) => "room".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GridPos;
    use serde_json::json;

    #[test]
    fn test_layers_over_base() {
        let base = RoomConfiguration::default().with_materials(3, 4).with_wall_height(2);
        let payload = json!({"heightmap": "00\n00", "floorThickness": 16}).to_string();
        let load = RoomLoad::from_payload(&payload, &base).unwrap();
        assert_eq!(load.config.height_map, "00\n00");
        assert_eq!(load.config.floor_thickness, 16);
        assert_eq!(load.config.wall_height, 2);
        assert_eq!(load.config.floor_material, 3);
        assert!(load.placements.is_empty());
        assert_eq!(load.title(), "room");
    }

    #[test]
    fn test_doors_override_base() {
        let base = RoomConfiguration::default().with_door(GridPos::new(5, 5));
        let payload = json!({"heightmap": "00\n00", "doors": [{"x": 0, "y": 1}]}).to_string();
        let load = RoomLoad::from_payload(&payload, &base).unwrap();
        assert_eq!(load.config.doors, vec![GridPos::new(0, 1)]);
    }

    #[test]
    fn test_ragged_heightmap_is_rejected() {
        let payload = json!({"heightmap": "000\n00"}).to_string();
        let err = RoomLoad::from_payload(&payload, &RoomConfiguration::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("loadRoom heightmap"));
    }

    #[test]
    fn test_from_packet_skips_other_headers() {
        let base = RoomConfiguration::default();
        assert_eq!(RoomLoad::from_packet(r#"{"header":"ping","data":{}}"#, &base).unwrap(), None);

        let packet = json!({
            "header": "loadRoom",
            "data": {"heightmap": "0", "name": "Hall", "ownerName": "ada"}
        })
        .to_string();
        let load = RoomLoad::from_packet(&packet, &base).unwrap().unwrap();
        assert_eq!(load.title(), "Hall (ada)");
    }
}
