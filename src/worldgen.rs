//! World-sculpting heuristics layered on top of the codec's model.

use anyhow::{bail, ensure, Context, Result};
use rand::Rng;
use terraria_world::{Chest, Sign, Tile, World};

pub const SIGN_TILE: u16 = 55;
pub const GRAVESTONE_TILE: u16 = 85;
const DIRT_TILE: u16 = 0;
const CHEST_TILE: u16 = 21;

fn solid(tile_type: u16) -> Tile {
    Tile {
        active: true,
        tile_type: Some(tile_type),
        ..Tile::default()
    }
}

fn framed(tile_type: u16, u: i16, v: i16) -> Tile {
    Tile {
        u,
        v,
        ..solid(tile_type)
    }
}

pub struct WorldGenerator<'a> {
    world: &'a mut World,
}

impl<'a> WorldGenerator<'a> {
    pub fn new(world: &'a mut World) -> Self {
        Self { world }
    }

    /// The column span between the surface and `depth`, clamped to
    /// the grid.
    fn band(&self, depth: usize) -> Result<(usize, usize)> {
        let surface = self
            .world
            .header
            .surface_level
            .context("world has no surface level")? as usize;
        let bottom = depth.min(self.world.map.y_tiles);
        ensure!(
            surface < bottom,
            "surface level {} is not above the target depth {}",
            surface,
            bottom
        );
        Ok((surface, bottom))
    }

    /// Fills the layer between the surface and `depth` with dirt.
    pub fn fill_dirt(&mut self, depth: usize) -> Result<()> {
        let (surface, bottom) = self.band(depth)?;
        let dirt = solid(DIRT_TILE);
        for column in &mut self.world.map.columns {
            for tile in &mut column[surface..bottom] {
                *tile = dirt.clone();
            }
        }
        Ok(())
    }

    /// Scatters an ore across the dirt band. The spawn chance grows
    /// linearly with depth below the surface, scaled by `density`.
    pub fn spawn_ore(
        &mut self,
        tile_type: u16,
        density: f64,
        depth: usize,
        rng: &mut impl Rng,
    ) -> Result<()> {
        let (surface, bottom) = self.band(depth)?;
        let total = (bottom - surface) as f64;
        let ore = solid(tile_type);
        for column in &mut self.world.map.columns {
            for (n, tile) in column[surface..bottom].iter_mut().enumerate() {
                if should_spawn_ore(n, density, total, rng) {
                    *tile = ore.clone();
                }
            }
        }
        Ok(())
    }

    /// Appends an empty chest record and stamps its 2x2 tile block.
    pub fn add_chest(&mut self, x: usize, y: usize) -> Result<()> {
        let max_items = self
            .world
            .chests
            .max_items
            .context("world has no chest capacity recorded")?;
        let map = &mut self.world.map;
        ensure!(
            x + 1 < map.x_tiles && y + 1 < map.y_tiles,
            "chest at ({}, {}) does not fit the {}x{} grid",
            x,
            y,
            map.x_tiles,
            map.y_tiles
        );
        map.columns[x][y] = framed(CHEST_TILE, 612, 0);
        map.columns[x + 1][y] = framed(CHEST_TILE, 630, 0);
        map.columns[x][y + 1] = framed(CHEST_TILE, 612, 18);
        map.columns[x + 1][y + 1] = framed(CHEST_TILE, 630, 18);
        self.world
            .chests
            .chests
            .push(Chest::empty(x as i32, y as i32, max_items as usize));
        Ok(())
    }

    /// Appends a sign record and stamps its 2x2 tile block. The tile
    /// type must be a sign (55) or a gravestone marker (85).
    pub fn add_sign(&mut self, x: usize, y: usize, text: &str, tile_type: u16) -> Result<()> {
        if tile_type != SIGN_TILE && tile_type != GRAVESTONE_TILE {
            bail!("tile type {} cannot hold sign text", tile_type);
        }
        let map = &mut self.world.map;
        ensure!(
            x + 1 < map.x_tiles && y + 1 < map.y_tiles,
            "sign at ({}, {}) does not fit the {}x{} grid",
            x,
            y,
            map.x_tiles,
            map.y_tiles
        );
        let u0 = if tile_type == GRAVESTONE_TILE { 180 } else { 0 };
        map.columns[x][y] = framed(tile_type, u0, 0);
        map.columns[x + 1][y] = framed(tile_type, u0 + 18, 0);
        map.columns[x][y + 1] = framed(tile_type, u0, 18);
        map.columns[x + 1][y + 1] = framed(tile_type, u0 + 18, 18);
        self.world.signs.signs.push(Sign {
            text: text.into(),
            x: x as i32,
            y: y as i32,
        });
        Ok(())
    }
}

fn should_spawn_ore(n: usize, density: f64, total: f64, rng: &mut impl Rng) -> bool {
    let percent = ((n as f64 * density) / total) / 100.0;
    rng.gen::<f64>() < percent
}
