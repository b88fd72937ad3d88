//! Heightmap parsing and tile classification

use isoroom::core::{Heightmap, HeightmapError, TileMap};
use isoroom::types::{GridPos, WallType};

#[test]
fn test_parse_heights_and_void() {
    let map = Heightmap::parse("x12\n000").unwrap();
    assert_eq!(map.width(), 3);
    assert_eq!(map.depth(), 2);
    assert_eq!(map.height_at(0, 0), None);
    assert_eq!(map.height_at(2, 0), Some(2));
    assert!(map.is_tile(0, 1));
    assert!(!map.is_tile(5, 5));
    assert_eq!(map.max_height(), 2);
}

#[test]
fn test_ragged_rows_are_rejected() {
    let err = Heightmap::parse("000\n00").unwrap_err();
    assert_eq!(
        err,
        HeightmapError::RaggedRow {
            row: 1,
            expected: 3,
            found: 2
        }
    );
    assert!(err.to_string().contains("row 1"));
}

#[test]
fn test_empty_heightmap_is_rejected() {
    assert_eq!(Heightmap::parse("").unwrap_err(), HeightmapError::Empty);
}

#[test]
fn test_blank_row_inside_grid_is_rejected() {
    assert_eq!(
        Heightmap::parse("000\n\n000").unwrap_err(),
        HeightmapError::RaggedRow {
            row: 1,
            expected: 3,
            found: 0
        }
    );
    assert!(Heightmap::parse("000\n000\n").is_ok());
}

#[test]
fn test_first_door_marker_wins() {
    let map = TileMap::parse("000\n000\n000", &[GridPos::new(1, 2), GridPos::new(0, 1)]).unwrap();
    assert_eq!(map.door(), Some(GridPos::new(0, 1)));
    assert_eq!(map.demoted_doors(), &[GridPos::new(1, 2)]);
    assert!(map.tile_info(0, 1).door);
    assert!(!map.tile_info(1, 2).door);

    let doors = map.iter().filter(|(_, cell)| cell.door).count();
    assert_eq!(doors, 1);
}

#[test]
fn test_corner_cell_classification() {
    let map = TileMap::parse("00\n00", &[]).unwrap();
    assert_eq!(map.tile_info(0, 0).wall_type, WallType::Corner);
    assert_eq!(map.tile_info(1, 0).wall_type, WallType::Right);
    assert_eq!(map.tile_info(0, 1).wall_type, WallType::Left);
    assert_eq!(map.tile_info(1, 1).wall_type, WallType::None);
    assert_eq!(map.tile_count(), 4);
}

#[test]
fn test_one_step_up_is_a_stair() {
    // (0, 1) looks north onto a tile one step higher.
    let map = TileMap::parse("1\n0", &[]).unwrap();
    assert!(map.tile_info(0, 1).stair_type.is_some());
    assert!(map.tile_info(0, 0).stair_type.is_none());
}
