//! Single-cell records and the variable-length tile block codec.
//!
//! Every cell on disk starts with up to three header bytes. The first
//! one is always present; its bit 0 says whether a second follows, and
//! the second's bit 0 says whether a third follows. The remaining bits
//! tell the decoder which payload bytes to expect: tile type (one or
//! two bytes), texture coordinates for "important" types, paints,
//! wall, liquid volume, and finally an optional run count that clones
//! the cell down its column.

use crate::cursor::{Reader, Writer};
use crate::error::{CodecError, Result};

// Primary header byte.
const H1_EXTENDED: u8 = 1;
const H1_ACTIVE: u8 = 2;
const H1_WALL: u8 = 4;
const H1_LIQUID_MASK: u8 = 24;
const H1_WIDE_TYPE: u8 = 32;
const H1_RLE_MASK: u8 = 192;

// Secondary header byte.
const H2_EXTENDED: u8 = 1;
const H2_WIRE_RED: u8 = 2;
const H2_WIRE_GREEN: u8 = 4;
const H2_WIRE_BLUE: u8 = 8;
const H2_BRICK_MASK: u8 = 112;

// Tertiary header byte.
const H3_ACTUATOR: u8 = 2;
const H3_ACTUATOR_INACTIVE: u8 = 4;
const H3_COLOR: u8 = 8;
const H3_WALL_COLOR: u8 = 16;

/// Liquid occupying a cell, stored as bits 3-4 of the primary header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liquid {
    None,
    Water,
    Lava,
    Honey,
}

impl Liquid {
    /// Raw mask value as it sits in the header byte.
    pub fn mask(self) -> u8 {
        match self {
            Liquid::None => 0,
            Liquid::Water => 8,
            Liquid::Lava => 16,
            Liquid::Honey => 24,
        }
    }

    fn from_mask(mask: u8) -> Liquid {
        match mask & H1_LIQUID_MASK {
            8 => Liquid::Water,
            16 => Liquid::Lava,
            24 => Liquid::Honey,
            _ => Liquid::None,
        }
    }
}

impl Default for Liquid {
    fn default() -> Self {
        Liquid::None
    }
}

/// A single cell of the world grid.
///
/// Freshly constructed tiles are empty and inactive, so a default grid
/// run-length encodes down to almost nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub active: bool,
    /// Meaningful only while `active` is set.
    pub tile_type: Option<u16>,
    /// Texture coordinates, carried on disk only for important types.
    pub u: i16,
    pub v: i16,
    pub color: Option<u8>,
    pub wall: Option<u8>,
    pub wall_color: Option<u8>,
    pub liquid: Liquid,
    /// Present iff `liquid` is not `None`.
    pub liquid_amount: Option<u8>,
    pub wire_red: bool,
    pub wire_green: bool,
    pub wire_blue: bool,
    pub brick_style: u8,
    pub actuator: bool,
    pub actuator_inactive: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            active: false,
            tile_type: None,
            u: -1,
            v: -1,
            color: None,
            wall: None,
            wall_color: None,
            liquid: Liquid::None,
            liquid_amount: None,
            wire_red: false,
            wire_green: false,
            wire_blue: false,
            brick_style: 0,
            actuator: false,
            actuator_inactive: false,
        }
    }
}

/// The up-to-three header bytes of an encoded tile block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TileHeaders {
    h1: u8,
    h2: u8,
    h3: u8,
}

impl TileHeaders {
    /// Folds the extension bits in: h1 advertises h2 iff h2 is
    /// nonzero, and h2 advertises h3 iff h3 is nonzero, so empty
    /// header bytes are omitted from the stream entirely.
    fn chained(mut self) -> TileHeaders {
        if self.h3 != 0 {
            self.h2 |= H2_EXTENDED;
        }
        if self.h2 != 0 {
            self.h1 |= H1_EXTENDED;
        }
        self
    }
}

fn rle_bits(run: u16) -> u8 {
    match run {
        0 => 0,
        1..=255 => 64,
        _ => 128,
    }
}

fn pack_headers(tile: &Tile, run: u16) -> TileHeaders {
    let mut h = TileHeaders::default();
    h.h1 |= rle_bits(run);
    if tile.active {
        h.h1 |= H1_ACTIVE;
    }
    if tile.wall.is_some() {
        h.h1 |= H1_WALL;
    }
    if tile.tile_type.map_or(false, |t| t > 255) {
        h.h1 |= H1_WIDE_TYPE;
    }
    h.h1 |= tile.liquid.mask();
    if tile.wire_red {
        h.h2 |= H2_WIRE_RED;
    }
    if tile.wire_green {
        h.h2 |= H2_WIRE_GREEN;
    }
    if tile.wire_blue {
        h.h2 |= H2_WIRE_BLUE;
    }
    h.h2 |= (tile.brick_style << 4) & H2_BRICK_MASK;
    if tile.actuator {
        h.h3 |= H3_ACTUATOR;
    }
    if tile.actuator_inactive {
        h.h3 |= H3_ACTUATOR_INACTIVE;
    }
    if tile.color.is_some() {
        h.h3 |= H3_COLOR;
    }
    if tile.wall_color.is_some() {
        h.h3 |= H3_WALL_COLOR;
    }
    h.chained()
}

fn is_important(tile_type: u16, importance: &[bool]) -> Result<bool> {
    importance.get(tile_type as usize).copied().ok_or_else(|| {
        CodecError::CorruptFormat(format!(
            "tile type {} is outside the {}-entry importance table",
            tile_type,
            importance.len()
        ))
    })
}

impl Tile {
    /// Whether the tile can appear in a saved world: inactive, or
    /// active with a defined type.
    pub fn validate(&self) -> Result<()> {
        if self.active && self.tile_type.is_none() {
            return Err(CodecError::IncompleteWorld("tile_type"));
        }
        Ok(())
    }

    /// Encodes one tile block, with `run` further repetitions of this
    /// tile down the column.
    pub(crate) fn encode(&self, w: &mut Writer, run: u16, importance: &[bool]) -> Result<()> {
        if self.wall_color.is_some() && self.wall.is_none() {
            return Err(CodecError::InvalidArgument(
                "tile has a wall color but no wall".into(),
            ));
        }
        let headers = pack_headers(self, run);
        w.write_u8(headers.h1)?;
        if headers.h1 & H1_EXTENDED != 0 {
            w.write_u8(headers.h2)?;
        }
        if headers.h2 & H2_EXTENDED != 0 {
            w.write_u8(headers.h3)?;
        }
        if self.active {
            let tile_type = self
                .tile_type
                .ok_or(CodecError::IncompleteWorld("tile_type"))?;
            if tile_type > 255 {
                w.write_u16(tile_type)?;
            } else {
                w.write_u8(tile_type as u8)?;
            }
            if is_important(tile_type, importance)? {
                w.write_i16(self.u)?;
                w.write_i16(self.v)?;
            }
        }
        if let Some(color) = self.color {
            w.write_u8(color)?;
        }
        if let Some(wall) = self.wall {
            w.write_u8(wall)?;
            if let Some(wall_color) = self.wall_color {
                w.write_u8(wall_color)?;
            }
        }
        if self.liquid != Liquid::None {
            let amount = self
                .liquid_amount
                .ok_or(CodecError::IncompleteWorld("liquid_amount"))?;
            w.write_u8(amount)?;
        }
        match run {
            0 => {}
            1..=255 => w.write_u8(run as u8)?,
            _ => w.write_u16(run)?,
        }
        Ok(())
    }

    /// Decodes one tile block, returning the tile and how many extra
    /// copies of it follow down the column.
    pub(crate) fn decode(r: &mut Reader, importance: &[bool]) -> Result<(Tile, u16)> {
        let h1 = r.read_u8()?;
        let h2 = if h1 & H1_EXTENDED != 0 { r.read_u8()? } else { 0 };
        let h3 = if h2 & H2_EXTENDED != 0 { r.read_u8()? } else { 0 };

        let mut tile = Tile::default();
        if h1 & H1_ACTIVE != 0 {
            tile.active = true;
            let tile_type = if h1 & H1_WIDE_TYPE != 0 {
                r.read_u16()?
            } else {
                u16::from(r.read_u8()?)
            };
            tile.tile_type = Some(tile_type);
            if is_important(tile_type, importance)? {
                tile.u = r.read_i16()?;
                tile.v = r.read_i16()?;
            }
        }
        if h3 & H3_COLOR != 0 {
            tile.color = Some(r.read_u8()?);
        }
        if h1 & H1_WALL != 0 {
            tile.wall = Some(r.read_u8()?);
            if h3 & H3_WALL_COLOR != 0 {
                tile.wall_color = Some(r.read_u8()?);
            }
        }
        tile.liquid = Liquid::from_mask(h1);
        if tile.liquid != Liquid::None {
            tile.liquid_amount = Some(r.read_u8()?);
        }
        tile.wire_red = h2 & H2_WIRE_RED != 0;
        tile.wire_green = h2 & H2_WIRE_GREEN != 0;
        tile.wire_blue = h2 & H2_WIRE_BLUE != 0;
        tile.brick_style = (h2 & H2_BRICK_MASK) >> 4;
        tile.actuator = h3 & H3_ACTUATOR != 0;
        tile.actuator_inactive = h3 & H3_ACTUATOR_INACTIVE != 0;

        // Count kinds 2 and 3 both mean a two-byte count; the writer
        // only ever emits 0, 1 or 2.
        let run = match (h1 & H1_RLE_MASK) >> 6 {
            0 => 0,
            1 => u16::from(r.read_u8()?),
            _ => r.read_u16()?,
        };
        Ok((tile, run))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_importance() -> Vec<bool> {
        vec![false; 340]
    }

    fn encode(tile: &Tile, run: u16, importance: &[bool]) -> Vec<u8> {
        let mut w = Writer::new();
        tile.encode(&mut w, run, importance).unwrap();
        w.into_bytes()
    }

    fn decode(bytes: &[u8], importance: &[bool]) -> (Tile, u16) {
        let mut r = Reader::new(bytes);
        let out = Tile::decode(&mut r, importance).unwrap();
        assert_eq!(r.position(), bytes.len() as u64, "trailing bytes");
        out
    }

    fn active(tile_type: u16) -> Tile {
        Tile {
            active: true,
            tile_type: Some(tile_type),
            ..Tile::default()
        }
    }

    #[test]
    fn empty_tile_with_run() {
        let imp = plain_importance();
        let tile = Tile::default();
        assert_eq!(encode(&tile, 64, &imp), [0x40, 0x40]);
        assert_eq!(decode(&[0x40, 0x40], &imp), (tile, 64));
    }

    #[test]
    fn dirt_with_run() {
        let imp = plain_importance();
        let tile = active(0);
        assert_eq!(encode(&tile, 64, &imp), [0x42, 0x00, 0x40]);
        assert_eq!(decode(&[0x42, 0x00, 0x40], &imp), (tile, 64));
    }

    #[test]
    fn single_dirt() {
        let imp = plain_importance();
        let tile = active(0);
        assert_eq!(encode(&tile, 0, &imp), [0x02, 0x00]);
        assert_eq!(decode(&[0x02, 0x00], &imp), (tile, 0));
    }

    #[test]
    fn brick_style() {
        let imp = plain_importance();
        let tile = Tile {
            brick_style: 1,
            ..active(0)
        };
        assert_eq!(encode(&tile, 0, &imp), [0x03, 0x10, 0x00]);
        assert_eq!(decode(&[0x03, 0x10, 0x00], &imp), (tile, 0));
    }

    #[test]
    fn honey_in_empty_tile() {
        let imp = plain_importance();
        let tile = Tile {
            liquid: Liquid::Honey,
            liquid_amount: Some(255),
            ..Tile::default()
        };
        assert_eq!(encode(&tile, 0, &imp), [0x18, 0xFF]);
        assert_eq!(decode(&[0x18, 0xFF], &imp), (tile, 0));
    }

    #[test]
    fn wide_tile_type() {
        let imp = plain_importance();
        let tile = active(256);
        assert_eq!(encode(&tile, 0, &imp), [0x22, 0x00, 0x01]);
        assert_eq!(decode(&[0x22, 0x00, 0x01], &imp), (tile, 0));
    }

    #[test]
    fn type_255_stays_narrow() {
        let imp = plain_importance();
        let tile = active(255);
        assert_eq!(encode(&tile, 0, &imp), [0x02, 0xFF]);
        assert_eq!(decode(&[0x02, 0xFF], &imp), (tile, 0));
    }

    #[test]
    fn actuator_with_run() {
        let imp = plain_importance();
        let tile = Tile {
            actuator: true,
            actuator_inactive: true,
            ..active(0)
        };
        assert_eq!(encode(&tile, 2, &imp), [0x43, 0x01, 0x06, 0x00, 0x02]);
        assert_eq!(decode(&[0x43, 0x01, 0x06, 0x00, 0x02], &imp), (tile, 2));
    }

    #[test]
    fn wall_only() {
        let imp = plain_importance();
        let tile = Tile {
            wall: Some(5),
            ..Tile::default()
        };
        assert_eq!(encode(&tile, 0, &imp), [0x04, 0x05]);
        assert_eq!(decode(&[0x04, 0x05], &imp), (tile, 0));
    }

    #[test]
    fn wired_tile() {
        let imp = plain_importance();
        let tile = Tile {
            wire_red: true,
            ..active(16)
        };
        assert_eq!(encode(&tile, 0, &imp), [0x03, 0x02, 0x10]);
        assert_eq!(decode(&[0x03, 0x02, 0x10], &imp), (tile, 0));
    }

    #[test]
    fn important_type_carries_uv() {
        let mut imp = plain_importance();
        imp[28] = true;
        let tile = Tile {
            u: 18,
            v: 108,
            ..active(28)
        };
        assert_eq!(
            encode(&tile, 0, &imp),
            [0x02, 0x1C, 0x12, 0x00, 0x6C, 0x00]
        );
        assert_eq!(
            decode(&[0x02, 0x1C, 0x12, 0x00, 0x6C, 0x00], &imp),
            (tile, 0)
        );
    }

    #[test]
    fn long_run_uses_two_count_bytes() {
        let imp = plain_importance();
        let tile = Tile::default();
        assert_eq!(encode(&tile, 300, &imp), [0x80, 0x2C, 0x01]);
        assert_eq!(decode(&[0x80, 0x2C, 0x01], &imp), (tile, 300));
    }

    #[test]
    fn rle_kind_3_reads_like_2() {
        let imp = plain_importance();
        // 0xC0 = both RLE bits set; never written, accepted on read.
        let (tile, run) = decode(&[0xC0, 0x2C, 0x01], &imp);
        assert_eq!(tile, Tile::default());
        assert_eq!(run, 300);
    }

    #[test]
    fn wall_color_without_wall_is_refused() {
        let imp = plain_importance();
        let tile = Tile {
            wall_color: Some(3),
            ..Tile::default()
        };
        let mut w = Writer::new();
        assert!(matches!(
            tile.encode(&mut w, 0, &imp),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn wall_color_rides_behind_wall() {
        let imp = plain_importance();
        let tile = Tile {
            wall: Some(4),
            wall_color: Some(9),
            color: Some(2),
            ..active(1)
        };
        let bytes = encode(&tile, 0, &imp);
        // h1 = extended | active | wall; h2 = extended2; h3 = color | wall color
        assert_eq!(bytes, [0x07, 0x01, 0x18, 0x01, 0x02, 0x04, 0x09]);
        assert_eq!(decode(&bytes, &imp), (tile, 0));
    }

    #[test]
    fn type_beyond_importance_table_is_corrupt() {
        let imp = vec![false; 4];
        let mut r = Reader::new(&[0x02, 0x09]);
        assert!(matches!(
            Tile::decode(&mut r, &imp),
            Err(CodecError::CorruptFormat(_))
        ));
    }

    #[test]
    fn header_extension_bits_propagate() {
        // An h3 payload forces both extension bits even when h2 is
        // otherwise empty.
        let headers = TileHeaders {
            h1: 0,
            h2: 0,
            h3: H3_ACTUATOR,
        }
        .chained();
        assert_eq!(headers.h1, H1_EXTENDED);
        assert_eq!(headers.h2, H2_EXTENDED);

        let headers = TileHeaders {
            h1: 0,
            h2: H2_WIRE_RED,
            h3: 0,
        }
        .chained();
        assert_eq!(headers.h1, H1_EXTENDED);
        assert_eq!(headers.h2, H2_WIRE_RED);
    }

    #[test]
    fn clone_is_independent() {
        let original = Tile {
            wall: Some(7),
            ..active(21)
        };
        let mut copy = original.clone();
        assert_eq!(copy, original);
        copy.wall = Some(8);
        assert_ne!(copy, original);
        assert_eq!(original.wall, Some(7));
    }

    #[test]
    fn active_without_type_is_incomplete() {
        let tile = Tile {
            active: true,
            ..Tile::default()
        };
        assert_eq!(
            tile.validate(),
            Err(CodecError::IncompleteWorld("tile_type"))
        );
        assert!(Tile::default().validate().is_ok());
    }
}
