//! The fixed-schema world header.

use crate::cursor::{Reader, Writer};
use crate::error::{CodecError, Result};

/// Pulls a required field out of its `Option`, naming it on failure.
pub(crate) fn field<T: Copy>(value: Option<T>, name: &'static str) -> Result<T> {
    value.ok_or(CodecError::IncompleteWorld(name))
}

macro_rules! require {
    ($self:ident: $($field:ident),* $(,)?) => {
        $(if $self.$field.is_none() {
            return Err(CodecError::IncompleteWorld(stringify!($field)));
        })*
    };
}

/// World metadata, in exact serialisation order.
///
/// A header starts out with every field absent and is populated by
/// loading (or by a caller building a world from scratch); writing
/// demands every field.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub world_name: String,
    pub world_id: Option<i32>,
    pub x: Option<i32>,
    pub w: Option<i32>,
    pub y: Option<i32>,
    pub h: Option<i32>,
    pub y_tiles: Option<i32>,
    pub x_tiles: Option<i32>,
    pub moon_type: Option<u8>,
    pub tree_x: Option<[i32; 3]>,
    pub tree_style: Option<[i32; 4]>,
    pub cave_back_x: Option<[i32; 3]>,
    pub cave_back_style: Option<[i32; 4]>,
    pub ice_back_style: Option<i32>,
    pub jungle_back_style: Option<i32>,
    pub hell_back_style: Option<i32>,
    pub spawn_x: Option<i32>,
    pub spawn_y: Option<i32>,
    pub surface_level: Option<f64>,
    pub rock_layer: Option<f64>,
    pub temp_time: Option<f64>,
    pub is_day: Option<bool>,
    pub moon_phase: Option<i32>,
    pub is_blood_moon: Option<bool>,
    pub is_eclipse: Option<bool>,
    pub dungeon_x: Option<i32>,
    pub dungeon_y: Option<i32>,
    pub is_crimson: Option<bool>,
    pub is_boss_1_dead: Option<bool>,
    pub is_boss_2_dead: Option<bool>,
    pub is_boss_3_dead: Option<bool>,
    pub is_queen_bee_dead: Option<bool>,
    pub is_mech_1_dead: Option<bool>,
    pub is_mech_2_dead: Option<bool>,
    pub is_mech_3_dead: Option<bool>,
    pub is_any_mech_dead: Option<bool>,
    pub is_plant_dead: Option<bool>,
    pub is_golem_dead: Option<bool>,
    pub is_goblin_saved: Option<bool>,
    pub is_wizard_saved: Option<bool>,
    pub is_mechanic_saved: Option<bool>,
    pub is_goblins_beat: Option<bool>,
    pub is_clown_beat: Option<bool>,
    pub is_frost_beat: Option<bool>,
    pub is_pirates_beat: Option<bool>,
    pub is_orb_smashed: Option<bool>,
    pub is_meteor_spawned: Option<bool>,
    pub orb_smash_count: Option<u8>,
    pub altar_count: Option<i32>,
    pub is_hard_mode: Option<bool>,
    pub invasion_delay: Option<i32>,
    pub invasion_size: Option<i32>,
    pub invasion_type: Option<i32>,
    pub invasion_x: Option<f64>,
    pub is_temp_raining: Option<bool>,
    pub temp_rain_time: Option<i32>,
    pub temp_max_rain: Option<f32>,
    pub ore_tier_1: Option<i32>,
    pub ore_tier_2: Option<i32>,
    pub ore_tier_3: Option<i32>,
    pub bg_tree: Option<u8>,
    pub bg_corruption: Option<u8>,
    pub bg_jungle: Option<u8>,
    pub bg_snow: Option<u8>,
    pub bg_hallow: Option<u8>,
    pub bg_crimson: Option<u8>,
    pub bg_desert: Option<u8>,
    pub bg_ocean: Option<u8>,
    pub cloud_bg_active: Option<i32>,
    pub num_clouds: Option<i16>,
    pub wind_speed_set: Option<f32>,
    pub num_anglers: Option<i32>,
    pub is_angler_saved: Option<bool>,
    pub angler_quest: Option<i32>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            world_name: "Default".into(),
            world_id: None,
            x: None,
            w: None,
            y: None,
            h: None,
            y_tiles: None,
            x_tiles: None,
            moon_type: None,
            tree_x: None,
            tree_style: None,
            cave_back_x: None,
            cave_back_style: None,
            ice_back_style: None,
            jungle_back_style: None,
            hell_back_style: None,
            spawn_x: None,
            spawn_y: None,
            surface_level: None,
            rock_layer: None,
            temp_time: None,
            is_day: None,
            moon_phase: None,
            is_blood_moon: None,
            is_eclipse: None,
            dungeon_x: None,
            dungeon_y: None,
            is_crimson: None,
            is_boss_1_dead: None,
            is_boss_2_dead: None,
            is_boss_3_dead: None,
            is_queen_bee_dead: None,
            is_mech_1_dead: None,
            is_mech_2_dead: None,
            is_mech_3_dead: None,
            is_any_mech_dead: None,
            is_plant_dead: None,
            is_golem_dead: None,
            is_goblin_saved: None,
            is_wizard_saved: None,
            is_mechanic_saved: None,
            is_goblins_beat: None,
            is_clown_beat: None,
            is_frost_beat: None,
            is_pirates_beat: None,
            is_orb_smashed: None,
            is_meteor_spawned: None,
            orb_smash_count: None,
            altar_count: None,
            is_hard_mode: None,
            invasion_delay: None,
            invasion_size: None,
            invasion_type: None,
            invasion_x: None,
            is_temp_raining: None,
            temp_rain_time: None,
            temp_max_rain: None,
            ore_tier_1: None,
            ore_tier_2: None,
            ore_tier_3: None,
            bg_tree: None,
            bg_corruption: None,
            bg_jungle: None,
            bg_snow: None,
            bg_hallow: None,
            bg_crimson: None,
            bg_desert: None,
            bg_ocean: None,
            cloud_bg_active: None,
            num_clouds: None,
            wind_speed_set: None,
            num_anglers: None,
            is_angler_saved: None,
            angler_quest: None,
        }
    }
}

impl Header {
    pub fn validate(&self) -> Result<()> {
        require!(self:
            world_id, x, w, y, h, y_tiles, x_tiles, moon_type,
            tree_x, tree_style, cave_back_x, cave_back_style,
            ice_back_style, jungle_back_style, hell_back_style,
            spawn_x, spawn_y, surface_level, rock_layer, temp_time,
            is_day, moon_phase, is_blood_moon, is_eclipse,
            dungeon_x, dungeon_y, is_crimson,
            is_boss_1_dead, is_boss_2_dead, is_boss_3_dead,
            is_queen_bee_dead, is_mech_1_dead, is_mech_2_dead,
            is_mech_3_dead, is_any_mech_dead, is_plant_dead,
            is_golem_dead, is_goblin_saved, is_wizard_saved,
            is_mechanic_saved, is_goblins_beat, is_clown_beat,
            is_frost_beat, is_pirates_beat, is_orb_smashed,
            is_meteor_spawned, orb_smash_count, altar_count,
            is_hard_mode, invasion_delay, invasion_size,
            invasion_type, invasion_x, is_temp_raining,
            temp_rain_time, temp_max_rain,
            ore_tier_1, ore_tier_2, ore_tier_3,
            bg_tree, bg_corruption, bg_jungle, bg_snow, bg_hallow,
            bg_crimson, bg_desert, bg_ocean,
            cloud_bg_active, num_clouds, wind_speed_set,
            num_anglers, is_angler_saved, angler_quest,
        );
        Ok(())
    }

    pub(crate) fn decode(r: &mut Reader) -> Result<Header> {
        // Struct expression fields evaluate in written order, which
        // is the serialisation order.
        Ok(Header {
            world_name: r.read_pstring()?,
            world_id: Some(r.read_i32()?),
            x: Some(r.read_i32()?),
            w: Some(r.read_i32()?),
            y: Some(r.read_i32()?),
            h: Some(r.read_i32()?),
            y_tiles: Some(r.read_i32()?),
            x_tiles: Some(r.read_i32()?),
            moon_type: Some(r.read_u8()?),
            tree_x: Some(read_i32x3(r)?),
            tree_style: Some(read_i32x4(r)?),
            cave_back_x: Some(read_i32x3(r)?),
            cave_back_style: Some(read_i32x4(r)?),
            ice_back_style: Some(r.read_i32()?),
            jungle_back_style: Some(r.read_i32()?),
            hell_back_style: Some(r.read_i32()?),
            spawn_x: Some(r.read_i32()?),
            spawn_y: Some(r.read_i32()?),
            surface_level: Some(r.read_f64()?),
            rock_layer: Some(r.read_f64()?),
            temp_time: Some(r.read_f64()?),
            is_day: Some(r.read_bool()?),
            moon_phase: Some(r.read_i32()?),
            is_blood_moon: Some(r.read_bool()?),
            is_eclipse: Some(r.read_bool()?),
            dungeon_x: Some(r.read_i32()?),
            dungeon_y: Some(r.read_i32()?),
            is_crimson: Some(r.read_bool()?),
            is_boss_1_dead: Some(r.read_bool()?),
            is_boss_2_dead: Some(r.read_bool()?),
            is_boss_3_dead: Some(r.read_bool()?),
            is_queen_bee_dead: Some(r.read_bool()?),
            is_mech_1_dead: Some(r.read_bool()?),
            is_mech_2_dead: Some(r.read_bool()?),
            is_mech_3_dead: Some(r.read_bool()?),
            is_any_mech_dead: Some(r.read_bool()?),
            is_plant_dead: Some(r.read_bool()?),
            is_golem_dead: Some(r.read_bool()?),
            is_goblin_saved: Some(r.read_bool()?),
            is_wizard_saved: Some(r.read_bool()?),
            is_mechanic_saved: Some(r.read_bool()?),
            is_goblins_beat: Some(r.read_bool()?),
            is_clown_beat: Some(r.read_bool()?),
            is_frost_beat: Some(r.read_bool()?),
            is_pirates_beat: Some(r.read_bool()?),
            is_orb_smashed: Some(r.read_bool()?),
            is_meteor_spawned: Some(r.read_bool()?),
            orb_smash_count: Some(r.read_u8()?),
            altar_count: Some(r.read_i32()?),
            is_hard_mode: Some(r.read_bool()?),
            invasion_delay: Some(r.read_i32()?),
            invasion_size: Some(r.read_i32()?),
            invasion_type: Some(r.read_i32()?),
            invasion_x: Some(r.read_f64()?),
            is_temp_raining: Some(r.read_bool()?),
            temp_rain_time: Some(r.read_i32()?),
            temp_max_rain: Some(r.read_f32()?),
            ore_tier_1: Some(r.read_i32()?),
            ore_tier_2: Some(r.read_i32()?),
            ore_tier_3: Some(r.read_i32()?),
            bg_tree: Some(r.read_u8()?),
            bg_corruption: Some(r.read_u8()?),
            bg_jungle: Some(r.read_u8()?),
            bg_snow: Some(r.read_u8()?),
            bg_hallow: Some(r.read_u8()?),
            bg_crimson: Some(r.read_u8()?),
            bg_desert: Some(r.read_u8()?),
            bg_ocean: Some(r.read_u8()?),
            cloud_bg_active: Some(r.read_i32()?),
            num_clouds: Some(r.read_i16()?),
            wind_speed_set: Some(r.read_f32()?),
            num_anglers: Some(r.read_i32()?),
            is_angler_saved: Some(r.read_bool()?),
            angler_quest: Some(r.read_i32()?),
        })
    }

    pub(crate) fn encode(&self, w: &mut Writer) -> Result<()> {
        w.write_pstring(&self.world_name)?;
        w.write_i32(field(self.world_id, "world_id")?)?;
        w.write_i32(field(self.x, "x")?)?;
        w.write_i32(field(self.w, "w")?)?;
        w.write_i32(field(self.y, "y")?)?;
        w.write_i32(field(self.h, "h")?)?;
        w.write_i32(field(self.y_tiles, "y_tiles")?)?;
        w.write_i32(field(self.x_tiles, "x_tiles")?)?;
        w.write_u8(field(self.moon_type, "moon_type")?)?;
        write_i32s(w, &field(self.tree_x, "tree_x")?)?;
        write_i32s(w, &field(self.tree_style, "tree_style")?)?;
        write_i32s(w, &field(self.cave_back_x, "cave_back_x")?)?;
        write_i32s(w, &field(self.cave_back_style, "cave_back_style")?)?;
        w.write_i32(field(self.ice_back_style, "ice_back_style")?)?;
        w.write_i32(field(self.jungle_back_style, "jungle_back_style")?)?;
        w.write_i32(field(self.hell_back_style, "hell_back_style")?)?;
        w.write_i32(field(self.spawn_x, "spawn_x")?)?;
        w.write_i32(field(self.spawn_y, "spawn_y")?)?;
        w.write_f64(field(self.surface_level, "surface_level")?)?;
        w.write_f64(field(self.rock_layer, "rock_layer")?)?;
        w.write_f64(field(self.temp_time, "temp_time")?)?;
        w.write_bool(field(self.is_day, "is_day")?)?;
        w.write_i32(field(self.moon_phase, "moon_phase")?)?;
        w.write_bool(field(self.is_blood_moon, "is_blood_moon")?)?;
        w.write_bool(field(self.is_eclipse, "is_eclipse")?)?;
        w.write_i32(field(self.dungeon_x, "dungeon_x")?)?;
        w.write_i32(field(self.dungeon_y, "dungeon_y")?)?;
        w.write_bool(field(self.is_crimson, "is_crimson")?)?;
        w.write_bool(field(self.is_boss_1_dead, "is_boss_1_dead")?)?;
        w.write_bool(field(self.is_boss_2_dead, "is_boss_2_dead")?)?;
        w.write_bool(field(self.is_boss_3_dead, "is_boss_3_dead")?)?;
        w.write_bool(field(self.is_queen_bee_dead, "is_queen_bee_dead")?)?;
        w.write_bool(field(self.is_mech_1_dead, "is_mech_1_dead")?)?;
        w.write_bool(field(self.is_mech_2_dead, "is_mech_2_dead")?)?;
        w.write_bool(field(self.is_mech_3_dead, "is_mech_3_dead")?)?;
        w.write_bool(field(self.is_any_mech_dead, "is_any_mech_dead")?)?;
        w.write_bool(field(self.is_plant_dead, "is_plant_dead")?)?;
        w.write_bool(field(self.is_golem_dead, "is_golem_dead")?)?;
        w.write_bool(field(self.is_goblin_saved, "is_goblin_saved")?)?;
        w.write_bool(field(self.is_wizard_saved, "is_wizard_saved")?)?;
        w.write_bool(field(self.is_mechanic_saved, "is_mechanic_saved")?)?;
        w.write_bool(field(self.is_goblins_beat, "is_goblins_beat")?)?;
        w.write_bool(field(self.is_clown_beat, "is_clown_beat")?)?;
        w.write_bool(field(self.is_frost_beat, "is_frost_beat")?)?;
        w.write_bool(field(self.is_pirates_beat, "is_pirates_beat")?)?;
        w.write_bool(field(self.is_orb_smashed, "is_orb_smashed")?)?;
        w.write_bool(field(self.is_meteor_spawned, "is_meteor_spawned")?)?;
        w.write_u8(field(self.orb_smash_count, "orb_smash_count")?)?;
        w.write_i32(field(self.altar_count, "altar_count")?)?;
        w.write_bool(field(self.is_hard_mode, "is_hard_mode")?)?;
        w.write_i32(field(self.invasion_delay, "invasion_delay")?)?;
        w.write_i32(field(self.invasion_size, "invasion_size")?)?;
        w.write_i32(field(self.invasion_type, "invasion_type")?)?;
        w.write_f64(field(self.invasion_x, "invasion_x")?)?;
        w.write_bool(field(self.is_temp_raining, "is_temp_raining")?)?;
        w.write_i32(field(self.temp_rain_time, "temp_rain_time")?)?;
        w.write_f32(field(self.temp_max_rain, "temp_max_rain")?)?;
        w.write_i32(field(self.ore_tier_1, "ore_tier_1")?)?;
        w.write_i32(field(self.ore_tier_2, "ore_tier_2")?)?;
        w.write_i32(field(self.ore_tier_3, "ore_tier_3")?)?;
        w.write_u8(field(self.bg_tree, "bg_tree")?)?;
        w.write_u8(field(self.bg_corruption, "bg_corruption")?)?;
        w.write_u8(field(self.bg_jungle, "bg_jungle")?)?;
        w.write_u8(field(self.bg_snow, "bg_snow")?)?;
        w.write_u8(field(self.bg_hallow, "bg_hallow")?)?;
        w.write_u8(field(self.bg_crimson, "bg_crimson")?)?;
        w.write_u8(field(self.bg_desert, "bg_desert")?)?;
        w.write_u8(field(self.bg_ocean, "bg_ocean")?)?;
        w.write_i32(field(self.cloud_bg_active, "cloud_bg_active")?)?;
        w.write_i16(field(self.num_clouds, "num_clouds")?)?;
        w.write_f32(field(self.wind_speed_set, "wind_speed_set")?)?;
        w.write_i32(field(self.num_anglers, "num_anglers")?)?;
        w.write_bool(field(self.is_angler_saved, "is_angler_saved")?)?;
        w.write_i32(field(self.angler_quest, "angler_quest")?)?;
        Ok(())
    }
}

fn read_i32x3(r: &mut Reader) -> Result<[i32; 3]> {
    Ok([r.read_i32()?, r.read_i32()?, r.read_i32()?])
}

fn read_i32x4(r: &mut Reader) -> Result<[i32; 4]> {
    Ok([r.read_i32()?, r.read_i32()?, r.read_i32()?, r.read_i32()?])
}

fn write_i32s(w: &mut Writer, values: &[i32]) -> Result<()> {
    for &v in values {
        w.write_i32(v)?;
    }
    Ok(())
}
