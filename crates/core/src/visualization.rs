//! Room visualization - walks the tile map and emits room parts
//!
//! The walk is row-major (y outer, x inner) and fully deterministic. For each
//! tile cell, walls come first, then exactly one floor part:
//! stair, else door, else plain tile.
//!
//! Walls are emitted as runs. A left run starting at a cell extends along +Y
//! while the next cell needs a west wall at the same height; a right run
//! extends along +X over cells needing a north wall. Every cell a run covers
//! gets its coverage flag set, so later cells never emit a second wall for
//! the same edge.

use crate::parts::{RoomPart, StairPart, TilePart, WallPart, WallSettings};
use crate::tile_map::TileMap;
use crate::types::{Material, TilePosition, WallType};

/// Everything the compositor needs besides the tile map.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeSettings {
    pub floor_material: Material,
    pub wall_material: Material,
    /// Pixels.
    pub floor_thickness: u32,
    pub floor_hidden: bool,
    pub wall_hidden: bool,
    pub walls: WallSettings,
}

/// Build every part for `tile_map`.
///
/// Wall coverage flags are written as walls are emitted; callers reset them
/// before a rebuild.
pub fn compose(tile_map: &mut TileMap, settings: &ComposeSettings) -> Vec<RoomPart> {
    let mut parts = Vec::with_capacity(tile_map.tile_count() * 2);

    for y in 0..tile_map.depth() as i32 {
        for x in 0..tile_map.width() as i32 {
            let cell = tile_map.tile_info(x, y);
            let Some(height) = cell.height else {
                continue;
            };
            let position = TilePosition::new(x, y, height as i32);

            if !settings.wall_hidden {
                emit_walls(tile_map, position, cell.wall_type, settings, &mut parts);
                if cell.door {
                    parts.push(RoomPart::Wall(WallPart::door(
                        position,
                        &settings.walls,
                        &settings.wall_material,
                    )));
                    tile_map.mark_wall_y(x, y);
                }
            }

            if settings.floor_hidden {
                continue;
            }

            let part = if let Some(stair) = cell.stair_type {
                RoomPart::Stair(StairPart::new(
                    position,
                    stair,
                    settings.floor_thickness,
                    &settings.floor_material,
                ))
            } else if cell.door {
                RoomPart::Door(TilePart::door(position, &settings.floor_material))
            } else {
                RoomPart::Tile(TilePart::new(
                    position,
                    settings.floor_thickness,
                    &settings.floor_material,
                ))
            };
            parts.push(part);
        }
    }

    parts
}

fn emit_walls(
    tile_map: &mut TileMap,
    position: TilePosition,
    wall_type: WallType,
    settings: &ComposeSettings,
    parts: &mut Vec<RoomPart>,
) {
    let covered = tile_map.has_wall(position.x, position.y);
    let (left, right, pillar) = match wall_type {
        WallType::Corner => match (covered.y, covered.x) {
            (false, false) => (true, true, true),
            (false, true) => (true, false, false),
            (true, false) => (false, true, false),
            (true, true) => (false, false, false),
        },
        WallType::Left => (!covered.y, false, false),
        WallType::Right => (false, !covered.x, false),
        WallType::None | WallType::Door => (false, false, false),
    };

    if pillar {
        parts.push(RoomPart::Wall(WallPart::corner(
            position,
            &settings.walls,
            &settings.wall_material,
        )));
    }
    if left {
        let length = left_run(tile_map, position);
        parts.push(RoomPart::Wall(WallPart::left(
            position,
            length,
            &settings.walls,
            &settings.wall_material,
        )));
    }
    if right {
        let length = right_run(tile_map, position);
        parts.push(RoomPart::Wall(WallPart::right(
            position,
            length,
            &settings.walls,
            &settings.wall_material,
        )));
    }
}

/// Claim west edges along +Y; returns the run length.
fn left_run(tile_map: &mut TileMap, start: TilePosition) -> u32 {
    tile_map.mark_wall_y(start.x, start.y);
    let mut length = 1;
    let mut y = start.y + 1;
    loop {
        let cell = tile_map.tile_info(start.x, y);
        let joins = cell.height.map(i32::from) == Some(start.z)
            && cell.wall_type.needs_west()
            && !cell.door
            && !tile_map.has_wall(start.x, y).y;
        if !joins {
            break;
        }
        tile_map.mark_wall_y(start.x, y);
        length += 1;
        y += 1;
    }
    length
}

/// Claim north edges along +X; returns the run length.
fn right_run(tile_map: &mut TileMap, start: TilePosition) -> u32 {
    tile_map.mark_wall_x(start.x, start.y);
    let mut length = 1;
    let mut x = start.x + 1;
    loop {
        let cell = tile_map.tile_info(x, start.y);
        let joins = cell.height.map(i32::from) == Some(start.z)
            && cell.wall_type.needs_north()
            && !tile_map.has_wall(x, start.y).x;
        if !joins {
            break;
        }
        tile_map.mark_wall_x(x, start.y);
        length += 1;
        x += 1;
    }
    length
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::PartKind;
    use crate::types::GridPos;

    fn settings() -> ComposeSettings {
        ComposeSettings {
            floor_material: Material::solid(0x808080),
            wall_material: Material::solid(0xa0a0a0),
            floor_thickness: 8,
            floor_hidden: false,
            wall_hidden: false,
            walls: WallSettings {
                thickness: 8,
                floor_thickness: 8,
                height: 0,
                max_height: 0,
            },
        }
    }

    fn walls(parts: &[RoomPart]) -> Vec<(WallType, TilePosition, u32)> {
        parts
            .iter()
            .filter_map(|p| match p {
                RoomPart::Wall(w) => Some((w.kind, w.position, w.length)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn square_room_gets_one_corner_triple() {
        let mut map = TileMap::parse("00\n00", &[]).unwrap();
        let parts = compose(&mut map, &settings());
        let origin = TilePosition::new(0, 0, 0);
        assert_eq!(
            walls(&parts),
            vec![
                (WallType::Corner, origin, 1),
                (WallType::Left, origin, 2),
                (WallType::Right, origin, 2),
            ]
        );
        let tiles = parts
            .iter()
            .filter(|p| p.kind() == PartKind::Tile)
            .count();
        assert_eq!(tiles, 4);
        assert!(map.has_wall(0, 1).y);
        assert!(map.has_wall(1, 0).x);
        assert!(!map.has_wall(1, 1).x && !map.has_wall(1, 1).y);
    }

    #[test]
    fn runs_break_at_height_changes() {
        let mut map = TileMap::parse("0\n0\n3", &[]).unwrap();
        let parts = compose(&mut map, &settings());
        let lefts: Vec<_> = walls(&parts)
            .into_iter()
            .filter(|(k, _, _)| *k == WallType::Left)
            .collect();
        assert_eq!(
            lefts,
            vec![
                (WallType::Left, TilePosition::new(0, 0, 0), 2),
                (WallType::Left, TilePosition::new(0, 2, 3), 1),
            ]
        );
    }

    #[test]
    fn door_emits_door_wall_and_door_tile() {
        let mut map = TileMap::parse("00\n00\n00", &[GridPos::new(0, 1)]).unwrap();
        let parts = compose(&mut map, &settings());
        let door_walls = parts
            .iter()
            .filter(|p| p.kind() == PartKind::Wall(WallType::Door))
            .count();
        let door_tiles = parts.iter().filter(|p| p.kind() == PartKind::Door).count();
        assert_eq!(door_walls, 1);
        assert_eq!(door_tiles, 1);
        // The corner's left run stops at the door; the cell below starts a new one.
        assert!(walls(&parts).contains(&(WallType::Left, TilePosition::new(0, 0, 0), 1)));
        assert!(walls(&parts).contains(&(WallType::Left, TilePosition::new(0, 2, 0), 1)));
    }

    #[test]
    fn stair_replaces_tile() {
        let mut map = TileMap::parse("11\n00", &[]).unwrap();
        let parts = compose(&mut map, &settings());
        let stairs = parts.iter().filter(|p| p.kind() == PartKind::Stair).count();
        let tiles = parts.iter().filter(|p| p.kind() == PartKind::Tile).count();
        assert_eq!(stairs, 2);
        assert_eq!(tiles, 2);
    }

    #[test]
    fn hidden_walls_emit_nothing_and_set_no_flags() {
        let mut map = TileMap::parse("00\n00", &[GridPos::new(0, 1)]).unwrap();
        let s = ComposeSettings {
            wall_hidden: true,
            ..settings()
        };
        let parts = compose(&mut map, &s);
        assert!(walls(&parts).is_empty());
        assert_eq!(parts.len(), 4);
        assert!(!map.has_wall(0, 0).x);
        assert!(!map.has_wall(0, 1).y);
    }

    #[test]
    fn hidden_floor_keeps_walls() {
        let mut map = TileMap::parse("00\n00", &[]).unwrap();
        let s = ComposeSettings {
            floor_hidden: true,
            ..settings()
        };
        let parts = compose(&mut map, &s);
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn composition_is_deterministic() {
        let text = "xx00\nx011\n0011\n0000";
        let mut a = TileMap::parse(text, &[GridPos::new(0, 2)]).unwrap();
        let mut b = TileMap::parse(text, &[GridPos::new(0, 2)]).unwrap();
        assert_eq!(compose(&mut a, &settings()), compose(&mut b, &settings()));
    }
}
