//! The four small record-stream sections after the map: chests,
//! signs, NPCs and the footer.

use crate::cursor::{Reader, Writer};
use crate::error::{CodecError, Result};
use crate::header::field;

/// One item slot in a chest. A stack of 0 is an empty slot and elides
/// the id and prefix bytes on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChestItem {
    pub stack: i16,
    pub id: Option<i32>,
    pub prefix: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chest {
    pub x: i32,
    pub y: i32,
    pub name: String,
    /// Always exactly `max_items` slots.
    pub items: Vec<ChestItem>,
}

impl Chest {
    /// An unnamed chest at `(x, y)` with `max_items` empty slots.
    pub fn empty(x: i32, y: i32, max_items: usize) -> Self {
        Self {
            x,
            y,
            name: String::new(),
            items: vec![ChestItem::default(); max_items],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chests {
    pub max_items: Option<i16>,
    pub chests: Vec<Chest>,
}

impl Chests {
    pub fn total_chests(&self) -> usize {
        self.chests.len()
    }

    pub fn validate(&self) -> Result<()> {
        let max_items = field(self.max_items, "max_items")?;
        if self.chests.len() > i16::MAX as usize {
            return Err(CodecError::InvalidArgument(format!(
                "{} chests do not fit a 16-bit count",
                self.chests.len()
            )));
        }
        for chest in &self.chests {
            if chest.items.len() != max_items as usize {
                return Err(CodecError::InvalidArgument(format!(
                    "chest at ({}, {}) has {} item slots, expected {}",
                    chest.x,
                    chest.y,
                    chest.items.len(),
                    max_items
                )));
            }
            for item in &chest.items {
                if item.stack > 0 {
                    if item.id.is_none() {
                        return Err(CodecError::IncompleteWorld("item_id"));
                    }
                    if item.prefix.is_none() {
                        return Err(CodecError::IncompleteWorld("item_prefix"));
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) fn decode(r: &mut Reader) -> Result<Chests> {
        let total = r.read_i16()?;
        let max_items = r.read_i16()?;
        if total < 0 || max_items < 0 {
            return Err(CodecError::CorruptFormat(format!(
                "negative chest counts ({} chests, {} slots)",
                total, max_items
            )));
        }
        let mut chests = Vec::with_capacity(total as usize);
        for _ in 0..total {
            let x = r.read_i32()?;
            let y = r.read_i32()?;
            let name = r.read_pstring()?;
            let mut items = Vec::with_capacity(max_items as usize);
            for _ in 0..max_items {
                let stack = r.read_i16()?;
                if stack > 0 {
                    items.push(ChestItem {
                        stack,
                        id: Some(r.read_i32()?),
                        prefix: Some(r.read_u8()?),
                    });
                } else {
                    items.push(ChestItem {
                        stack,
                        ..ChestItem::default()
                    });
                }
            }
            chests.push(Chest { x, y, name, items });
        }
        Ok(Chests {
            max_items: Some(max_items),
            chests,
        })
    }

    pub(crate) fn encode(&self, w: &mut Writer) -> Result<()> {
        w.write_i16(self.chests.len() as i16)?;
        w.write_i16(field(self.max_items, "max_items")?)?;
        for chest in &self.chests {
            w.write_i32(chest.x)?;
            w.write_i32(chest.y)?;
            w.write_pstring(&chest.name)?;
            for item in &chest.items {
                w.write_i16(item.stack)?;
                if item.stack > 0 {
                    w.write_i32(field(item.id, "item_id")?)?;
                    w.write_u8(field(item.prefix, "item_prefix")?)?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sign {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signs {
    pub signs: Vec<Sign>,
}

impl Signs {
    pub fn total_signs(&self) -> usize {
        self.signs.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.signs.len() > i16::MAX as usize {
            return Err(CodecError::InvalidArgument(format!(
                "{} signs do not fit a 16-bit count",
                self.signs.len()
            )));
        }
        for sign in &self.signs {
            if sign.text.is_empty() {
                return Err(CodecError::IncompleteWorld("text"));
            }
        }
        Ok(())
    }

    pub(crate) fn decode(r: &mut Reader) -> Result<Signs> {
        let total = r.read_i16()?;
        if total < 0 {
            return Err(CodecError::CorruptFormat(format!(
                "negative sign count {}",
                total
            )));
        }
        let mut signs = Vec::with_capacity(total as usize);
        for _ in 0..total {
            let text = r.read_pstring()?;
            let x = r.read_i32()?;
            let y = r.read_i32()?;
            signs.push(Sign { text, x, y });
        }
        Ok(Signs { signs })
    }

    pub(crate) fn encode(&self, w: &mut Writer) -> Result<()> {
        w.write_i16(self.signs.len() as i16)?;
        for sign in &self.signs {
            w.write_pstring(&sign.text)?;
            w.write_i32(sign.x)?;
            w.write_i32(sign.y)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Npc {
    pub name: String,
    pub display_name: String,
    pub x: f32,
    pub y: f32,
    pub is_homeless: bool,
    pub home_x: i32,
    pub home_y: i32,
}

/// The NPC stream has no count; it ends at a false present-flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Npcs {
    pub npcs: Vec<Npc>,
}

impl Npcs {
    pub fn validate(&self) -> Result<()> {
        for npc in &self.npcs {
            if npc.name.is_empty() {
                return Err(CodecError::IncompleteWorld("name"));
            }
            if npc.display_name.is_empty() {
                return Err(CodecError::IncompleteWorld("display_name"));
            }
        }
        Ok(())
    }

    pub(crate) fn decode(r: &mut Reader) -> Result<Npcs> {
        let mut npcs = Vec::new();
        while r.read_bool()? {
            npcs.push(Npc {
                name: r.read_pstring()?,
                display_name: r.read_pstring()?,
                x: r.read_f32()?,
                y: r.read_f32()?,
                is_homeless: r.read_bool()?,
                home_x: r.read_i32()?,
                home_y: r.read_i32()?,
            });
        }
        Ok(Npcs { npcs })
    }

    pub(crate) fn encode(&self, w: &mut Writer) -> Result<()> {
        for npc in &self.npcs {
            w.write_bool(true)?;
            w.write_pstring(&npc.name)?;
            w.write_pstring(&npc.display_name)?;
            w.write_f32(npc.x)?;
            w.write_f32(npc.y)?;
            w.write_bool(npc.is_homeless)?;
            w.write_i32(npc.home_x)?;
            w.write_i32(npc.home_y)?;
        }
        w.write_bool(false)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Footer {
    pub valid: bool,
    /// Must match the header's world name for the game to accept the
    /// file; the codec surfaces this but does not enforce it.
    pub title: String,
    pub world_id: Option<i32>,
}

impl Footer {
    pub fn validate(&self) -> Result<()> {
        if !self.valid {
            return Err(CodecError::IncompleteWorld("valid"));
        }
        if self.title.is_empty() {
            return Err(CodecError::IncompleteWorld("title"));
        }
        match self.world_id {
            None | Some(0) => Err(CodecError::IncompleteWorld("world_id")),
            Some(_) => Ok(()),
        }
    }

    pub(crate) fn decode(r: &mut Reader) -> Result<Footer> {
        Ok(Footer {
            valid: r.read_bool()?,
            title: r.read_pstring()?,
            world_id: Some(r.read_i32()?),
        })
    }

    pub(crate) fn encode(&self, w: &mut Writer) -> Result<()> {
        w.write_bool(self.valid)?;
        w.write_pstring(&self.title)?;
        w.write_i32(field(self.world_id, "world_id")?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip_chests(chests: &Chests) -> Chests {
        let mut w = Writer::new();
        chests.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        let out = Chests::decode(&mut r).unwrap();
        assert_eq!(r.position(), bytes.len() as u64);
        out
    }

    #[test]
    fn chest_slots_elide_empty_items() {
        let mut chest = Chest::empty(10, 20, 3);
        chest.name = "loot".into();
        chest.items[1] = ChestItem {
            stack: 5,
            id: Some(857),
            prefix: Some(0),
        };
        let chests = Chests {
            max_items: Some(3),
            chests: vec![chest],
        };
        let mut w = Writer::new();
        chests.encode(&mut w).unwrap();
        // counts + x + y + name + (2 + (2+4+1) + 2) item bytes
        assert_eq!(w.len(), 4 + 8 + 5 + 2 + 7 + 2);
        assert_eq!(round_trip_chests(&chests), chests);
    }

    #[test]
    fn filled_slot_without_id_is_incomplete() {
        let mut chest = Chest::empty(0, 0, 1);
        chest.items[0].stack = 2;
        let chests = Chests {
            max_items: Some(1),
            chests: vec![chest],
        };
        assert_eq!(
            chests.validate(),
            Err(CodecError::IncompleteWorld("item_id"))
        );
    }

    #[test]
    fn wrong_slot_count_is_invalid() {
        let chests = Chests {
            max_items: Some(40),
            chests: vec![Chest::empty(1, 2, 39)],
        };
        assert!(matches!(
            chests.validate(),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn signs_round_trip() {
        let signs = Signs {
            signs: vec![
                Sign {
                    text: "beware".into(),
                    x: 100,
                    y: 200,
                },
                Sign {
                    text: "of dog".into(),
                    x: 102,
                    y: 200,
                },
            ],
        };
        let mut w = Writer::new();
        signs.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(Signs::decode(&mut r).unwrap(), signs);
    }

    #[test]
    fn empty_sign_text_is_incomplete() {
        let signs = Signs {
            signs: vec![Sign {
                text: String::new(),
                x: 0,
                y: 0,
            }],
        };
        assert_eq!(signs.validate(), Err(CodecError::IncompleteWorld("text")));
    }

    #[test]
    fn npc_stream_ends_at_false_sentinel() {
        let npcs = Npcs {
            npcs: vec![Npc {
                name: "Guide".into(),
                display_name: "Andrew".into(),
                x: 33600.0,
                y: 4640.0,
                is_homeless: false,
                home_x: 2100,
                home_y: 290,
            }],
        };
        let mut w = Writer::new();
        npcs.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes.last(), Some(&0));
        let mut r = Reader::new(&bytes);
        let out = Npcs::decode(&mut r).unwrap();
        assert_eq!(r.position(), bytes.len() as u64);
        assert_eq!(out, npcs);
    }

    #[test]
    fn empty_npc_stream_is_one_byte() {
        let mut w = Writer::new();
        Npcs::default().encode(&mut w).unwrap();
        assert_eq!(w.into_bytes(), [0]);
    }

    #[test]
    fn footer_round_trip_and_validation() {
        let footer = Footer {
            valid: true,
            title: "Sculpted".into(),
            world_id: Some(12345),
        };
        let mut w = Writer::new();
        footer.encode(&mut w).unwrap();
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        assert_eq!(Footer::decode(&mut r).unwrap(), footer);
        assert!(footer.validate().is_ok());

        assert_eq!(
            Footer::default().validate(),
            Err(CodecError::IncompleteWorld("valid"))
        );
        let zero_id = Footer {
            world_id: Some(0),
            ..footer
        };
        assert_eq!(
            zero_id.validate(),
            Err(CodecError::IncompleteWorld("world_id"))
        );
    }
}
