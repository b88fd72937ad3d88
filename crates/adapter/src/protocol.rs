//! Protocol module - JSON packet types for the room server
//!
//! Every packet is `{"header": ..., "data": {...}}`. Inbound packets are
//! keyed by a string header; outbound ones by a numeric event id.

use serde::{Deserialize, Serialize};

use crate::engine::FurniturePlacement;
use crate::types::GridPos;

/// Outbound event ids.
pub mod outgoing {
    pub const USER_PING: u16 = 211;
    pub const USER_LOGIN: u16 = 212;
    pub const OPEN_NAVIGATOR: u16 = 213;
    pub const CREATE_ROOM: u16 = 214;
    pub const LOAD_ROOM: u16 = 215;
    pub const REQUEST_MY_ROOMS: u16 = 216;
}

// ============== Server -> Client ==============

/// Room load payload. Missing numeric fields take the room defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRoomMessage {
    pub heightmap: String,
    #[serde(default)]
    pub floor_thickness: Option<u32>,
    #[serde(default)]
    pub wall_height: Option<i32>,
    #[serde(default)]
    pub furnitures: Vec<FurniturePlacement>,
    #[serde(default)]
    pub doors: Vec<GridPos>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
}

/// Parsed inbound packet.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPacket {
    LoadRoom(LoadRoomMessage),
    /// Valid JSON with a header this client does not handle.
    Unknown { header: String },
}

/// Parse one inbound packet.
pub fn parse_packet(json: &str) -> Result<ParsedPacket, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "header", content = "data")]
    enum InboundPacket {
        #[serde(rename = "loadRoom")]
        LoadRoom(LoadRoomMessage),
    }

    match serde_json::from_str::<InboundPacket>(json) {
        Ok(InboundPacket::LoadRoom(m)) => Ok(ParsedPacket::LoadRoom(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct HeaderOnly {
                header: Option<serde_json::Value>,
            }
            let header = match serde_json::from_str::<HeaderOnly>(json)?.header {
                Some(serde_json::Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => "unknown".to_string(),
            };
            if header == "loadRoom" {
                return Err(e);
            }
            Ok(ParsedPacket::Unknown { header })
        }
    }
}

// ============== Client -> Server ==============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingPacket {
    pub header: u16,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadRoomRequest {
    room_id: u32,
}

/// Ask the server to load `room_id`.
pub fn create_load_room(room_id: u32) -> serde_json::Result<OutgoingPacket> {
    Ok(OutgoingPacket {
        header: outgoing::LOAD_ROOM,
        data: serde_json::to_value(LoadRoomRequest { room_id })?,
    })
}
