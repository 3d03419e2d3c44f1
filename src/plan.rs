//! TOML sculpt plans: what to do to a world, in order.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::worldgen::SIGN_TILE;

#[derive(Deserialize)]
pub struct Plan {
    pub fill_dirt: Option<FillDirt>,
    #[serde(default)]
    pub ores: Vec<Ore>,
    #[serde(default)]
    pub chests: Vec<ChestSite>,
    #[serde(default)]
    pub signs: Vec<SignSite>,
}

#[derive(Deserialize)]
pub struct FillDirt {
    #[serde(default = "default_depth")]
    pub depth: usize,
}

#[derive(Deserialize)]
pub struct Ore {
    pub tile_type: u16,
    pub density: f64,
    #[serde(default = "default_depth")]
    pub depth: usize,
}

#[derive(Deserialize)]
pub struct ChestSite {
    pub x: usize,
    pub y: usize,
}

#[derive(Deserialize)]
pub struct SignSite {
    pub x: usize,
    pub y: usize,
    pub text: String,
    #[serde(default = "default_sign_tile")]
    pub tile_type: u16,
}

fn default_depth() -> usize {
    1000
}

fn default_sign_tile() -> u16 {
    SIGN_TILE
}

impl Plan {
    pub fn from_path(path: &Path) -> anyhow::Result<Plan> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading plan {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing plan {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_plan() {
        let plan: Plan = toml::from_str(
            r#"
            [fill_dirt]
            depth = 900

            [[ores]]
            tile_type = 7
            density = 3.5

            [[chests]]
            x = 120
            y = 410

            [[signs]]
            x = 122
            y = 410
            text = "welcome"
            tile_type = 85
            "#,
        )
        .unwrap();
        assert_eq!(plan.fill_dirt.unwrap().depth, 900);
        assert_eq!(plan.ores[0].depth, 1000);
        assert_eq!(plan.chests[0].x, 120);
        assert_eq!(plan.signs[0].tile_type, 85);
    }

    #[test]
    fn empty_plan_is_fine() {
        let plan: Plan = toml::from_str("").unwrap();
        assert!(plan.fill_dirt.is_none());
        assert!(plan.ores.is_empty());
        assert!(plan.signs.is_empty());
    }

    #[test]
    fn sign_tile_defaults_to_a_sign() {
        let plan: Plan = toml::from_str(
            r#"
            [[signs]]
            x = 1
            y = 2
            text = "hi"
            "#,
        )
        .unwrap();
        assert_eq!(plan.signs[0].tile_type, SIGN_TILE);
    }
}
