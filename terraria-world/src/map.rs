//! The tile grid and its per-column run-length codec.

use crate::cursor::{Reader, Writer};
use crate::error::{CodecError, Result};
use crate::tile::Tile;

/// Two-dimensional tile grid, indexed `columns[x][y]`.
///
/// Columns are encoded independently; runs of structurally equal
/// tiles never cross a column boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Map {
    pub x_tiles: usize,
    pub y_tiles: usize,
    pub columns: Vec<Vec<Tile>>,
}

impl Map {
    /// A grid of the given size filled with empty, inactive tiles.
    pub fn new(x_tiles: usize, y_tiles: usize) -> Self {
        Self {
            x_tiles,
            y_tiles,
            columns: vec![vec![Tile::default(); y_tiles]; x_tiles],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.x_tiles == 0 || self.y_tiles == 0 || self.columns.is_empty() {
            return Err(CodecError::IncompleteWorld("map"));
        }
        if self.columns.len() != self.x_tiles {
            return Err(CodecError::InvalidArgument(format!(
                "map has {} columns, header says {}",
                self.columns.len(),
                self.x_tiles
            )));
        }
        for (x, column) in self.columns.iter().enumerate() {
            if column.len() != self.y_tiles {
                return Err(CodecError::InvalidArgument(format!(
                    "column {} has {} tiles, header says {}",
                    x,
                    column.len(),
                    self.y_tiles
                )));
            }
            for tile in column {
                tile.validate()?;
            }
        }
        Ok(())
    }

    pub(crate) fn decode(
        r: &mut Reader,
        x_tiles: i32,
        y_tiles: i32,
        importance: &[bool],
    ) -> Result<Map> {
        if x_tiles <= 0 || y_tiles <= 0 {
            return Err(CodecError::CorruptFormat(format!(
                "impossible map dimensions {}x{}",
                x_tiles, y_tiles
            )));
        }
        let (x_tiles, y_tiles) = (x_tiles as usize, y_tiles as usize);
        let mut columns = Vec::with_capacity(x_tiles);
        for x in 0..x_tiles {
            let mut column = Vec::with_capacity(y_tiles);
            while column.len() < y_tiles {
                let (tile, run) = Tile::decode(r, importance)?;
                let run = run as usize;
                if column.len() + run + 1 > y_tiles {
                    return Err(CodecError::CorruptFormat(format!(
                        "run of {} at column {} overflows past {} tiles",
                        run, x, y_tiles
                    )));
                }
                for _ in 0..run {
                    column.push(tile.clone());
                }
                column.push(tile);
            }
            columns.push(column);
        }
        Ok(Map {
            x_tiles,
            y_tiles,
            columns,
        })
    }

    pub(crate) fn encode(&self, w: &mut Writer, importance: &[bool]) -> Result<()> {
        for column in &self.columns {
            let mut run_tile: Option<&Tile> = None;
            let mut run: u16 = 0;
            for tile in column {
                match run_tile {
                    Some(prev) if prev == tile && run < u16::MAX => run += 1,
                    Some(prev) => {
                        prev.encode(w, run, importance)?;
                        run_tile = Some(tile);
                        run = 0;
                    }
                    None => {
                        run_tile = Some(tile);
                        run = 0;
                    }
                }
            }
            if let Some(prev) = run_tile {
                prev.encode(w, run, importance)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Liquid;

    fn imp() -> Vec<bool> {
        vec![false; 340]
    }

    fn dirt() -> Tile {
        Tile {
            active: true,
            tile_type: Some(0),
            ..Tile::default()
        }
    }

    fn round_trip(map: &Map) -> Map {
        let imp = imp();
        let mut w = Writer::new();
        map.encode(&mut w, &imp).unwrap();
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let out = Map::decode(&mut r, map.x_tiles as i32, map.y_tiles as i32, &imp).unwrap();
        assert_eq!(r.position(), bytes.len() as u64);
        out
    }

    #[test]
    fn uniform_column_is_one_block() {
        // One tile block plus a single count byte, however long the
        // column, as long as the count fits one byte.
        let map = Map::new(1, 200);
        let mut w = Writer::new();
        map.encode(&mut w, &imp()).unwrap();
        assert_eq!(w.into_bytes(), [0x40, 199]);

        let map = Map::new(1, 1000);
        let mut w = Writer::new();
        map.encode(&mut w, &imp()).unwrap();
        assert_eq!(w.into_bytes(), [0x80, 0xE7, 0x03]);
    }

    #[test]
    fn runs_do_not_cross_columns() {
        let map = Map::new(3, 50);
        let mut w = Writer::new();
        map.encode(&mut w, &imp()).unwrap();
        assert_eq!(w.into_bytes(), [0x40, 49, 0x40, 49, 0x40, 49]);
    }

    #[test]
    fn mixed_column_round_trips() {
        let mut map = Map::new(2, 10);
        for y in 3..7 {
            map.columns[0][y] = dirt();
        }
        map.columns[1][0] = Tile {
            liquid: Liquid::Water,
            liquid_amount: Some(128),
            ..Tile::default()
        };
        assert_eq!(round_trip(&map), map);
    }

    #[test]
    fn every_column_fills_exactly() {
        let mut map = Map::new(4, 37);
        map.columns[2][36] = dirt();
        let out = round_trip(&map);
        for column in &out.columns {
            assert_eq!(column.len(), 37);
        }
    }

    #[test]
    fn run_overflowing_column_is_corrupt() {
        // A 30-tile run declared inside a 10-tile column.
        let bytes = [0x40, 29];
        let mut r = Reader::new(&bytes);
        assert!(matches!(
            Map::decode(&mut r, 1, 10, &imp()),
            Err(CodecError::CorruptFormat(_))
        ));
    }

    #[test]
    fn truncated_map_reports_truncation() {
        let bytes = [0x40, 9];
        let mut r = Reader::new(&bytes);
        // First column parses, second finds no bytes.
        assert_eq!(
            Map::decode(&mut r, 2, 10, &imp()),
            Err(CodecError::TruncatedInput)
        );
    }

    #[test]
    fn nonsense_dimensions_are_corrupt() {
        let mut r = Reader::new(&[]);
        assert!(matches!(
            Map::decode(&mut r, -1, 10, &imp()),
            Err(CodecError::CorruptFormat(_))
        ));
    }

    #[test]
    fn ragged_grid_fails_validation() {
        let mut map = Map::new(2, 5);
        map.columns[1].pop();
        assert!(matches!(
            map.validate(),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn empty_map_is_incomplete() {
        assert_eq!(
            Map::default().validate(),
            Err(CodecError::IncompleteWorld("map"))
        );
    }
}
