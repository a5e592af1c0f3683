use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tiles: TileConfig,
    pub labels: LabelNoiseConfig,
    pub world: WorldConfig,
}

impl AppConfig {
    /// Reads `path`, falling back to the built-in tileset when it does not
    /// exist. A file that exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::info!("no {} found, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_json_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        log::info!("loaded {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    pub source: String,
    pub texture_width: f32,
    pub texture_height: f32,
    pub material_tile_side_length: u32,
    pub material_pixel_side_length: u32,
    pub details_tile_side_length: u32,
    pub details_pixel_side_length: u32,
    pub border_pixel_side_length: u32,
    pub chunk_tile_side_length: u32,
    pub biomes: Vec<BiomeConfig>,
    pub empty_tile: EmptyTileConfig,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            source: "assets/images/tiles.png".to_string(),
            texture_width: 128.0,
            texture_height: 128.0,
            material_tile_side_length: 4,
            material_pixel_side_length: 32,
            details_tile_side_length: 2,
            details_pixel_side_length: 16,
            border_pixel_side_length: 16,
            chunk_tile_side_length: 32,
            biomes: vec![
                BiomeConfig::with_standard_overlays("grass", 64.0),
                BiomeConfig::with_standard_overlays("water", 32.0),
            ],
            empty_tile: EmptyTileConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeConfig {
    pub id: String,
    pub materials: Vec<RegionConfig>,
    pub details: Vec<RegionConfig>,
    /// Keyed by direction token (`n`, `south`, ...).
    pub borders: BTreeMap<String, Vec<RegionConfig>>,
}

impl BiomeConfig {
    fn with_standard_overlays(id: &str, material_x: f32) -> Self {
        let mut borders = BTreeMap::new();
        borders.insert("n".to_string(), vec![RegionConfig::new(0.0, 48.0, 10.0)]);
        borders.insert("s".to_string(), vec![RegionConfig::new(16.0, 48.0, 10.0)]);
        Self {
            id: id.to_string(),
            materials: vec![RegionConfig::new(material_x, 0.0, 10.0)],
            details: vec![
                RegionConfig::new(0.0, 32.0, 10.0),
                RegionConfig::new(16.0, 32.0, 5.0),
            ],
            borders,
        }
    }
}

/// Top-left corner of a texture region plus its raw (unnormalised) weight.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    pub x: f32,
    pub y: f32,
    pub weight: f64,
}

impl RegionConfig {
    pub const fn new(x: f32, y: f32, weight: f64) -> Self {
        Self { x, y, weight }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmptyTileConfig {
    pub x: f32,
    pub y: f32,
    pub side_length: f32,
}

impl Default for EmptyTileConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 64.0,
            side_length: 16.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelNoiseConfig {
    pub seed: u32,
    pub octaves: u32,
    pub frequency: f64,
    /// Global tile coordinates are multiplied by this before sampling.
    pub coordinate_scale: f64,
    /// Checked in order; the first band whose `below` exceeds the sample wins.
    pub bands: Vec<LabelBand>,
    pub otherwise: String,
}

impl Default for LabelNoiseConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            octaves: 2,
            frequency: 0.005,
            coordinate_scale: 10.0,
            bands: vec![LabelBand {
                below: 0.1,
                label: "grass".to_string(),
            }],
            otherwise: "water".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelBand {
    pub below: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub chunk_radius: i32,
    pub threads: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_radius: 2,
            threads: 4,
        }
    }
}
