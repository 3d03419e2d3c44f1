//! The world container: preamble, section-pointer table, importance
//! bitmap, and the load/save orchestration across all six sections.

use crate::cursor::{Reader, Writer};
use crate::error::{CodecError, Result};
use crate::header::{field, Header};
use crate::map::Map;
use crate::sections::{Chests, Footer, Npcs, Signs};

/// The one on-disk revision this codec writes.
pub const FORMAT_VERSION: i32 = 102;

/// Oldest revision the reader accepts.
pub const MIN_VERSION: i32 = 102;

const SECTION_COUNT: i16 = 10;

/// A whole world file held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    pub version: Option<i32>,
    /// The pointer table as it appeared on disk. Purely informative
    /// after a load; [`World::save`] recomputes it from scratch.
    pub section_pointers: Vec<i32>,
    /// One flag per defined tile type: whether that type carries
    /// texture coordinates on disk.
    pub tile_importance: Vec<bool>,
    pub header: Header,
    pub map: Map,
    pub chests: Chests,
    pub signs: Signs,
    pub npcs: Npcs,
    pub footer: Footer,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a world out of `bytes`.
    pub fn load(bytes: &[u8]) -> Result<World> {
        let mut r = Reader::new(bytes);

        let version = r.read_i32()?;
        if version < MIN_VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }
        let section_count = r.read_i16()?;
        if section_count != SECTION_COUNT {
            return Err(CodecError::CorruptFormat(format!(
                "expected {} section pointers, found {}",
                SECTION_COUNT, section_count
            )));
        }
        let mut section_pointers = Vec::with_capacity(SECTION_COUNT as usize);
        for _ in 0..SECTION_COUNT {
            section_pointers.push(r.read_i32()?);
        }
        let tile_type_count = r.read_i16()?;
        if tile_type_count <= 0 {
            return Err(CodecError::CorruptFormat(format!(
                "impossible tile type count {}",
                tile_type_count
            )));
        }
        let tile_importance = read_importance(&mut r, tile_type_count as usize)?;

        expect_pointer(&r, "header", section_pointers[0])?;
        let header = Header::decode(&mut r)?;

        expect_pointer(&r, "map", section_pointers[1])?;
        let x_tiles = field(header.x_tiles, "x_tiles")?;
        let y_tiles = field(header.y_tiles, "y_tiles")?;
        let map = Map::decode(&mut r, x_tiles, y_tiles, &tile_importance)?;

        expect_pointer(&r, "chests", section_pointers[2])?;
        let chests = Chests::decode(&mut r)?;

        expect_pointer(&r, "signs", section_pointers[3])?;
        let signs = Signs::decode(&mut r)?;

        expect_pointer(&r, "npcs", section_pointers[4])?;
        let npcs = Npcs::decode(&mut r)?;

        expect_pointer(&r, "footer", section_pointers[5])?;
        let footer = Footer::decode(&mut r)?;

        Ok(World {
            version: Some(version),
            section_pointers,
            tile_importance,
            header,
            map,
            chests,
            signs,
            npcs,
            footer,
        })
    }

    /// Serialises the world, recomputing the section-pointer table so
    /// that every section starts at its declared offset.
    pub fn save(&self) -> Result<Vec<u8>> {
        self.validate()?;
        let version = field(self.version, "version")?;
        if version != FORMAT_VERSION {
            return Err(CodecError::InvalidArgument(format!(
                "can only write format version {}, world is version {}",
                FORMAT_VERSION, version
            )));
        }
        if self.tile_importance.len() > i16::MAX as usize {
            return Err(CodecError::InvalidArgument(format!(
                "{} tile types do not fit a 16-bit count",
                self.tile_importance.len()
            )));
        }

        // Sections first; the pointer table is a forward reference
        // and needs their encoded lengths.
        let mut header = Writer::new();
        self.header.encode(&mut header)?;
        let mut map = Writer::new();
        self.map.encode(&mut map, &self.tile_importance)?;
        let mut chests = Writer::new();
        self.chests.encode(&mut chests)?;
        let mut signs = Writer::new();
        self.signs.encode(&mut signs)?;
        let mut npcs = Writer::new();
        self.npcs.encode(&mut npcs)?;
        let mut footer = Writer::new();
        self.footer.encode(&mut footer)?;
        let sections = [
            header.into_bytes(),
            map.into_bytes(),
            chests.into_bytes(),
            signs.into_bytes(),
            npcs.into_bytes(),
            footer.into_bytes(),
        ];

        let bitmap = pack_importance(&self.tile_importance);
        let preamble_len = 4 + 2 + 4 * SECTION_COUNT as usize + 2 + bitmap.len();

        let mut pointers = [0i32; SECTION_COUNT as usize];
        let mut offset = preamble_len;
        for (slot, section) in pointers.iter_mut().zip(&sections) {
            *slot = offset as i32;
            offset += section.len();
        }

        let mut out = Writer::new();
        out.write_i32(version)?;
        out.write_i16(SECTION_COUNT)?;
        for pointer in pointers {
            out.write_i32(pointer)?;
        }
        out.write_i16(self.tile_importance.len() as i16)?;
        out.extend(&bitmap);
        for section in &sections {
            out.extend(section);
        }
        Ok(out.into_bytes())
    }

    /// Whether every section is structurally complete and ready to
    /// save.
    pub fn validate(&self) -> Result<()> {
        if self.version.is_none() {
            return Err(CodecError::IncompleteWorld("version"));
        }
        if self.tile_importance.is_empty() {
            return Err(CodecError::IncompleteWorld("tile_importance"));
        }
        self.header.validate()?;
        self.map.validate()?;
        if let (Some(x), Some(y)) = (self.header.x_tiles, self.header.y_tiles) {
            if self.map.x_tiles != x as usize || self.map.y_tiles != y as usize {
                return Err(CodecError::InvalidArgument(format!(
                    "map is {}x{} tiles, header says {}x{}",
                    self.map.x_tiles, self.map.y_tiles, x, y
                )));
            }
        }
        self.chests.validate()?;
        self.signs.validate()?;
        self.npcs.validate()?;
        self.footer.validate()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

fn expect_pointer(r: &Reader, section: &'static str, expected: i32) -> Result<()> {
    if r.position() != expected as u64 {
        return Err(CodecError::PointerMismatch {
            section,
            expected,
            actual: r.position(),
        });
    }
    Ok(())
}

/// Unpacks `count` flags, bit i living in byte i / 8, LSB first.
fn read_importance(r: &mut Reader, count: usize) -> Result<Vec<bool>> {
    let mut flags = Vec::with_capacity(count);
    let mut byte = 0;
    for i in 0..count {
        if i % 8 == 0 {
            byte = r.read_u8()?;
        }
        flags.push(byte & (1 << (i % 8)) != 0);
    }
    Ok(flags)
}

fn pack_importance(flags: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; (flags.len() + 7) / 8];
    for (i, &important) in flags.iter().enumerate() {
        if important {
            bytes[i / 8] |= 1 << (i % 8);
        }
    }
    bytes
}

/// The tile-importance table of a vanilla 1.2.4.1 world: 340 types,
/// flagged where the type carries texture coordinates on disk.
pub fn vanilla_tile_importance() -> Vec<bool> {
    VANILLA_TILE_IMPORTANCE.to_vec()
}

#[rustfmt::skip]
const VANILLA_TILE_IMPORTANCE: [bool; 340] = [
    false, false, false, true, true, true, false, false, false, false, true, true, true, true, true, true, true, true, true, true,
    true, true, false, false, true, false, true, true, true, true, false, true, false, true, true, true, true, false, false, false,
    false, false, true, false, false, false, false, false, false, false, true, false, false, false, false, true, false, false, false, false,
    false, true, false, false, false, false, false, false, false, false, false, true, true, true, true, false, false, true, true, true,
    false, true, true, true, true, true, true, true, true, true, true, true, true, true, true, true, true, true, true, true,
    true, true, true, true, true, true, true, false, false, false, true, false, false, true, true, false, false, false, false, false,
    false, false, false, false, false, true, true, false, true, true, false, false, true, true, true, true, true, true, true, true,
    false, true, true, true, true, false, false, false, false, true, false, false, false, false, false, false, false, false, false, false,
    false, false, false, false, false, true, false, false, false, false, false, true, false, true, true, false, false, false, true, false,
    false, false, false, false, true, true, true, true, false, false, false, false, false, false, false, false, false, false, false, false,
    false, true, false, false, false, false, false, true, false, true, true, false, true, false, false, true, true, true, true, true,
    true, false, false, false, false, false, false, true, true, false, false, true, false, true, false, true, true, true, true, true,
    true, true, true, true, true, true, true, true, false, false, false, false, false, false, true, false, false, false, false, false,
    false, false, false, false, false, false, false, false, false, true, true, true, false, false, false, true, true, true, true, true,
    true, true, true, true, false, true, true, true, true, true, true, true, true, true, true, true, true, true, true, true,
    true, true, true, true, true, true, true, true, true, true, true, false, false, false, true, false, true, true, true, true,
    true, false, false, true, true, false, false, false, false, false, false, false, false, false, true, true, false, true, true, true,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanilla_table_shape() {
        let imp = vanilla_tile_importance();
        assert_eq!(imp.len(), 340);
        // Dirt and the ores are plain; furniture-like types carry
        // texture coordinates.
        assert!(!imp[0]);
        assert!(!imp[7]);
        assert!(!imp[166]);
        assert!(imp[3]);
        assert!(imp[21]);
        assert!(imp[28]);
        assert!(imp[55]);
        assert!(imp[85]);
        assert!(imp[178]);
        assert!(imp[339]);
    }

    #[test]
    fn importance_bitmap_round_trips() {
        let flags = vanilla_tile_importance();
        let bytes = pack_importance(&flags);
        assert_eq!(bytes.len(), 43);
        let mut r = Reader::new(&bytes);
        assert_eq!(read_importance(&mut r, flags.len()).unwrap(), flags);
    }

    #[test]
    fn importance_bitmap_is_lsb_first() {
        let flags = [true, false, false, false, false, false, false, false, true];
        assert_eq!(pack_importance(&flags), [0x01, 0x01]);
        let mut r = Reader::new(&[0x02]);
        assert_eq!(
            read_importance(&mut r, 2).unwrap(),
            vec![false, true]
        );
    }

    #[test]
    fn version_below_minimum_is_rejected() {
        let mut w = Writer::new();
        w.write_i32(71).unwrap();
        assert_eq!(
            World::load(&w.into_bytes()),
            Err(CodecError::UnsupportedVersion(71))
        );
    }

    #[test]
    fn wrong_section_count_is_corrupt() {
        let mut w = Writer::new();
        w.write_i32(102).unwrap();
        w.write_i16(11).unwrap();
        assert!(matches!(
            World::load(&w.into_bytes()),
            Err(CodecError::CorruptFormat(_))
        ));
    }

    #[test]
    fn bad_header_pointer_is_reported() {
        let mut w = Writer::new();
        w.write_i32(102).unwrap();
        w.write_i16(10).unwrap();
        for _ in 0..10 {
            w.write_i32(9999).unwrap();
        }
        w.write_i16(8).unwrap();
        w.write_u8(0).unwrap();
        let err = World::load(&w.into_bytes()).unwrap_err();
        assert_eq!(
            err,
            CodecError::PointerMismatch {
                section: "header",
                expected: 9999,
                actual: 49,
            }
        );
    }

    #[test]
    fn fresh_world_is_incomplete() {
        let world = World::new();
        assert!(!world.is_valid());
        assert_eq!(
            world.save().unwrap_err(),
            CodecError::IncompleteWorld("version")
        );
    }
}
