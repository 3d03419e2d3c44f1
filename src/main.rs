use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ansi_term::Colour::{Green, Red};
use anyhow::Context;
use clap::Parser;
use terraria_world::World;

mod plan;
mod worldgen;

use plan::Plan;
use worldgen::WorldGenerator;

#[derive(Parser)]
#[clap(
    name = "wldsculpt",
    version,
    about = "Terraria world inspection/sculpting tool"
)]
enum Command {
    /// Print a summary of a world file
    Info {
        /// Path to a Terraria .wld file
        wld: PathBuf,
    },
    /// Check that a world survives a load/save round trip unchanged
    Verify {
        /// Path to a Terraria .wld file
        wld: PathBuf,
    },
    /// Apply a sculpt plan to a world
    Sculpt {
        /// Path to a Terraria .wld file
        wld: PathBuf,
        /// TOML file describing the sculpting steps
        #[clap(long)]
        plan: PathBuf,
        /// Where to write the sculpted world
        #[clap(long)]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    match Command::parse() {
        Command::Info { wld } => info(&wld),
        Command::Verify { wld } => verify(&wld),
        Command::Sculpt { wld, plan, out } => sculpt(&wld, &plan, &out),
    }
}

fn read_world(path: &Path) -> anyhow::Result<(World, Vec<u8>)> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let world =
        World::load(&bytes).with_context(|| format!("loading world {}", path.display()))?;
    Ok((world, bytes))
}

fn info(path: &Path) -> anyhow::Result<()> {
    let (world, bytes) = read_world(path)?;
    let header = &world.header;
    let width = header.x_tiles.unwrap_or(0);
    let surface = header.surface_level.unwrap_or(0.0);
    println!(
        "{} (id {}, {} bytes)",
        header.world_name,
        header.world_id.unwrap_or(0),
        bytes.len()
    );
    println!(
        "  size:       {}x{} tiles",
        width,
        header.y_tiles.unwrap_or(0)
    );
    println!(
        "  evil:       {}",
        if header.is_crimson == Some(true) {
            "crimson"
        } else {
            "corruption"
        }
    );
    println!(
        "  hard mode:  {}",
        if header.is_hard_mode == Some(true) {
            "yes"
        } else {
            "no"
        }
    );
    if let (Some(x), Some(y)) = (header.spawn_x, header.spawn_y) {
        println!("  spawn:      {}", tile_to_gps_pos(width, surface, x, y));
    }
    if let (Some(x), Some(y)) = (header.dungeon_x, header.dungeon_y) {
        println!("  dungeon:    {}", tile_to_gps_pos(width, surface, x, y));
    }
    println!(
        "  ore tiers:  {} / {} / {}",
        header.ore_tier_1.unwrap_or(0),
        header.ore_tier_2.unwrap_or(0),
        header.ore_tier_3.unwrap_or(0)
    );
    println!(
        "  contents:   {} chests, {} signs, {} npcs",
        world.chests.total_chests(),
        world.signs.total_signs(),
        world.npcs.npcs.len()
    );
    Ok(())
}

fn verify(path: &Path) -> anyhow::Result<()> {
    let (world, bytes) = read_world(path)?;
    match world.validate() {
        Ok(()) => println!("{}", Green.paint("World is structurally complete.")),
        Err(e) => {
            println!("{}", Red.paint(format!("World fails validation: {}", e)));
            return Ok(());
        }
    }
    let resaved = world.save()?;
    if resaved == bytes {
        println!("{}", Green.paint("Re-encode is byte-identical."));
    } else {
        let offset = first_difference(&bytes, &resaved).unwrap_or(0);
        println!(
            "{}",
            Red.paint(format!(
                "Re-encode differs at offset {} ({} bytes in, {} bytes out).",
                offset,
                bytes.len(),
                resaved.len()
            ))
        );
    }
    Ok(())
}

fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

fn sculpt(wld: &Path, plan_path: &Path, out: &Path) -> anyhow::Result<()> {
    let plan = Plan::from_path(plan_path)?;
    let (mut world, _) = read_world(wld)?;
    let mut rng = rand::thread_rng();
    let mut gen = WorldGenerator::new(&mut world);
    if let Some(fill) = &plan.fill_dirt {
        gen.fill_dirt(fill.depth)?;
    }
    for ore in &plan.ores {
        gen.spawn_ore(ore.tile_type, ore.density, ore.depth, &mut rng)?;
    }
    for chest in &plan.chests {
        gen.add_chest(chest.x, chest.y)?;
    }
    for sign in &plan.signs {
        gen.add_sign(sign.x, sign.y, &sign.text, sign.tile_type)?;
    }
    let bytes = world
        .save()
        .context("sculpted world no longer serialises")?;
    fs::write(out, bytes).with_context(|| format!("writing {}", out.display()))?;
    println!("{}", Green.paint(format!("Wrote {}", out.display())));
    Ok(())
}

/// A position the way the in-game GPS reports it: tiles east/west of
/// the world centre, above/below the surface line.
struct GpsPos {
    x_offset: u32,
    y_offset: u32,
    x_side: XSide,
    y_side: YSide,
}

enum XSide {
    West,
    East,
}

enum YSide {
    AboveSurface,
    BelowSurface,
}

fn tile_to_gps_pos(width: i32, surface_level: f64, x: i32, y: i32) -> GpsPos {
    let raw_x = x * 2 - width;
    let raw_y = surface_level * 2.0 - f64::from(y) * 2.0;
    let x_side = if raw_x > 0 { XSide::East } else { XSide::West };
    let y_side = if raw_y > 0.0 {
        YSide::AboveSurface
    } else {
        YSide::BelowSurface
    };
    GpsPos {
        x_offset: raw_x.unsigned_abs(),
        y_offset: raw_y.abs() as u32,
        x_side,
        y_side,
    }
}

impl fmt::Display for GpsPos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let xside = match self.x_side {
            XSide::West => "west",
            XSide::East => "east",
        };
        let yside = match self.y_side {
            YSide::AboveSurface => "above surface",
            YSide::BelowSurface => "below surface",
        };
        write!(
            f,
            "{} {}, {} {}",
            self.x_offset, xside, self.y_offset, yside
        )
    }
}
