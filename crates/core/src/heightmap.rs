//! Heightmap module - parses the raw room grid text
//!
//! The grid is a block of rows, one character per cell:
//! - `x` / `X`: void (no tile)
//! - `0`-`9`: a tile at that integer height
//!
//! Rows are separated by `\n`, `\r\n` or a bare `\r` (the server format),
//! each counted as one terminator. Line breaks before the first row and after
//! the last are ignored; a blank row inside the grid is a zero-width row.
//! Every row must have the same width; a ragged grid is rejected instead of
//! padded.

use std::fmt;

/// Character marking a cell without a tile.
pub const VOID_CHAR: char = 'x';

/// Errors raised while parsing a heightmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeightmapError {
    /// The text contains no rows.
    Empty,
    /// A row's width differs from the first row.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character that is neither void nor a height digit.
    InvalidCharacter { row: usize, column: usize, ch: char },
}

/// Name used for ragged or otherwise unusable grids.
pub type MalformedHeightmapError = HeightmapError;

impl fmt::Display for HeightmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightmapError::Empty => write!(f, "heightmap is empty"),
            HeightmapError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "heightmap row {} has {} cells, expected {}",
                row, found, expected
            ),
            HeightmapError::InvalidCharacter { row, column, ch } => write!(
                f,
                "heightmap cell ({}, {}) has invalid character {:?}",
                column, row, ch
            ),
        }
    }
}

impl std::error::Error for HeightmapError {}

/// Parsed grid of heights, row-major (rows = world Y, columns = world X).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heightmap {
    width: usize,
    depth: usize,
    heights: Vec<Option<u8>>,
}

impl Heightmap {
    /// Parse heightmap text.
    pub fn parse(text: &str) -> Result<Self, HeightmapError> {
        let body = text.trim_matches(|c| c == '\n' || c == '\r');
        if body.is_empty() {
            return Err(HeightmapError::Empty);
        }
        let rows: Vec<&str> = body
            .split("\r\n")
            .flat_map(|chunk| chunk.split(|c| c == '\n' || c == '\r'))
            .collect();

        let Some(first) = rows.first() else {
            return Err(HeightmapError::Empty);
        };
        let width = first.chars().count();

        let mut heights = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(HeightmapError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                heights.push(parse_cell(ch).map_err(|ch| HeightmapError::InvalidCharacter {
                    row: y,
                    column: x,
                    ch,
                })?);
            }
        }

        Ok(Self {
            width,
            depth: rows.len(),
            heights,
        })
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.depth {
            return None;
        }
        Some((y as usize) * self.width + (x as usize))
    }

    /// Height at `(x, y)`; `None` for void cells and positions off the grid.
    pub fn height_at(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).and_then(|i| self.heights[i])
    }

    pub fn is_tile(&self, x: i32, y: i32) -> bool {
        self.height_at(x, y).is_some()
    }

    /// Tallest tile height (0 for a map without tiles).
    pub fn max_height(&self) -> u8 {
        self.heights.iter().flatten().copied().max().unwrap_or(0)
    }
}

fn parse_cell(ch: char) -> Result<Option<u8>, char> {
    match ch {
        'x' | 'X' => Ok(None),
        '0'..='9' => Ok(Some(ch as u8 - b'0')),
        other => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_void_and_heights() {
        let hm = Heightmap::parse("x01\n234").unwrap();
        assert_eq!(hm.width(), 3);
        assert_eq!(hm.depth(), 2);
        assert_eq!(hm.height_at(0, 0), None);
        assert_eq!(hm.height_at(1, 0), Some(0));
        assert_eq!(hm.height_at(2, 1), Some(4));
        assert_eq!(hm.max_height(), 4);
    }

    #[test]
    fn accepts_carriage_return_rows() {
        let hm = Heightmap::parse("00\r00\r\n00\r\n").unwrap();
        assert_eq!(hm.depth(), 3);
        assert_eq!(hm.width(), 2);
    }

    #[test]
    fn off_grid_reads_as_void() {
        let hm = Heightmap::parse("0").unwrap();
        assert_eq!(hm.height_at(-1, 0), None);
        assert_eq!(hm.height_at(0, -1), None);
        assert_eq!(hm.height_at(1, 0), None);
        assert!(hm.is_tile(0, 0));
    }

    #[test]
    fn ragged_rows_are_rejected() {
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
    fn blank_interior_row_is_ragged() {
        assert_eq!(
            Heightmap::parse("00\n\n00"),
            Err(HeightmapError::RaggedRow {
                row: 1,
                expected: 2,
                found: 0
            })
        );
        assert_eq!(
            Heightmap::parse("00\r\n\r\n00"),
            Err(HeightmapError::RaggedRow {
                row: 1,
                expected: 2,
                found: 0
            })
        );
    }

    #[test]
    fn outer_line_breaks_are_ignored() {
        let hm = Heightmap::parse("\r\n00\n00\n\n").unwrap();
        assert_eq!((hm.width(), hm.depth()), (2, 2));
        assert_eq!(Heightmap::parse("\n\r\n"), Err(HeightmapError::Empty));
    }

    #[test]
    fn invalid_characters_are_rejected() {
        let err = Heightmap::parse("0a").unwrap_err();
        assert_eq!(
            err,
            HeightmapError::InvalidCharacter {
                row: 0,
                column: 1,
                ch: 'a'
            }
        );
    }

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(Heightmap::parse(""), Err(HeightmapError::Empty));
        assert_eq!(Heightmap::parse("\n\r\n"), Err(HeightmapError::Empty));
    }
}
