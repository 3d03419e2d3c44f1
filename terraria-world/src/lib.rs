//! Reader and writer for revision 102 of the Terraria world file
//! format.
//!
//! A world file is a fixed preamble (version, section-pointer table,
//! tile-importance bitmap) followed by six sections: header, tile
//! map, chests, signs, NPCs and footer. The tile map is the bulk of
//! the file, stored as bit-packed variable-length cell blocks with
//! run-length compression down each column.
//!
//! The codec works on in-memory byte buffers only and is strict both
//! ways: [`World::load`] fails fast on the first structural problem,
//! and [`World::save`] refuses a world with unpopulated fields. A
//! loaded world saves back byte-for-byte identical, which is what the
//! game requires to accept the file.
//!
//! ```no_run
//! # fn main() -> Result<(), terraria_world::CodecError> {
//! let bytes = std::fs::read("world.wld").expect("read failed");
//! let world = terraria_world::World::load(&bytes)?;
//! assert_eq!(world.save()?, bytes);
//! # Ok(())
//! # }
//! ```

mod cursor;
mod error;
mod header;
mod map;
mod sections;
mod tile;
mod world;

pub use cursor::{Reader, Writer};
pub use error::{CodecError, Result};
pub use header::Header;
pub use map::Map;
pub use sections::{Chest, ChestItem, Chests, Footer, Npc, Npcs, Sign, Signs};
pub use tile::{Liquid, Tile};
pub use world::{vanilla_tile_importance, World, FORMAT_VERSION, MIN_VERSION};
