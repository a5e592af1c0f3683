use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use glam::IVec2;
use serde::{Serialize, Serializer};

use crate::tile_core::config::{BiomeConfig, TileConfig};
use crate::tile_core::direction::Direction;
use crate::tile_core::error::{TileError, TileResult};
use crate::tile_core::rect::Rect;
use crate::tile_core::weighted::WeightedTable;

/// Stable biome key. Cheap to clone into draw instructions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(Arc<str>);

impl BiomeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BiomeId {
    fn from(id: &str) -> Self {
        Self(Arc::from(id))
    }
}

impl Borrow<str> for BiomeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for BiomeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Per-biome variant tables, built once from configuration.
#[derive(Debug, Clone)]
pub struct BiomeDefinition {
    id: BiomeId,
    material_variants: WeightedTable,
    detail_variants: Option<WeightedTable>,
    border_variants: [Option<WeightedTable>; 4],
    detail_tile_side: i32,
}

impl BiomeDefinition {
    pub fn from_config(config: &BiomeConfig, tiles: &TileConfig) -> TileResult<Self> {
        if config.id.is_empty() {
            return Err(TileError::invalid("biome id must not be empty"));
        }
        let id = config.id.as_str();
        if tiles.details_tile_side_length == 0 {
            return Err(TileError::invalid("details tile side length must be positive"));
        }
        let detail_tile_side = i32::try_from(tiles.details_tile_side_length)
            .map_err(|_| TileError::invalid("details tile side length is too large"))?;

        let material_variants = WeightedTable::from_regions(
            &config.materials,
            tiles.material_pixel_side_length as f32,
            &format!("biome {id:?} materials"),
        )?
        .ok_or_else(|| {
            TileError::invalid(format!(
                "biome {id:?} needs at least one material with positive weight"
            ))
        })?;

        let detail_variants = WeightedTable::from_regions(
            &config.details,
            tiles.details_pixel_side_length as f32,
            &format!("biome {id:?} details"),
        )?;

        let mut border_variants: [Option<WeightedTable>; 4] = Default::default();
        for (token, regions) in &config.borders {
            let direction: Direction = token.parse().map_err(|_| {
                TileError::invalid(format!(
                    "biome {id:?} has borders for unknown direction {token:?}"
                ))
            })?;
            let slot = &mut border_variants[direction.index()];
            if slot.is_some() {
                return Err(TileError::invalid(format!(
                    "biome {id:?} lists {direction:?} borders more than once"
                )));
            }
            *slot = WeightedTable::from_regions(
                regions,
                tiles.border_pixel_side_length as f32,
                &format!("biome {id:?} {direction:?} borders"),
            )?;
        }

        Ok(Self {
            id: BiomeId::from(id),
            material_variants,
            detail_variants,
            border_variants,
            detail_tile_side,
        })
    }

    pub fn id(&self) -> &BiomeId {
        &self.id
    }

    pub fn material_variants(&self) -> &WeightedTable {
        &self.material_variants
    }

    pub fn detail_variants(&self) -> Option<&WeightedTable> {
        self.detail_variants.as_ref()
    }

    pub fn border_variants(&self, direction: Direction) -> Option<&WeightedTable> {
        self.border_variants[direction.index()].as_ref()
    }

    /// Detail overlay for a global tile, chosen per detail square.
    pub fn detail_frame(&self, global_tile: IVec2) -> TileResult<Option<Rect>> {
        let Some(table) = &self.detail_variants else {
            return Ok(None);
        };
        let square = global_tile.div_euclid(IVec2::splat(self.detail_tile_side));
        table.select(square.x, square.y).map(Some)
    }
}

/// All configured biomes in configuration order, which is also the order
/// borders are emitted in.
#[derive(Debug, Clone)]
pub struct BiomeSet {
    definitions: Vec<BiomeDefinition>,
    lookup: HashMap<BiomeId, usize>,
}

impl BiomeSet {
    pub fn from_config(tiles: &TileConfig) -> TileResult<Self> {
        let mut definitions = Vec::with_capacity(tiles.biomes.len());
        let mut lookup = HashMap::with_capacity(tiles.biomes.len());
        for config in &tiles.biomes {
            let definition = BiomeDefinition::from_config(config, tiles)?;
            if lookup
                .insert(definition.id().clone(), definitions.len())
                .is_some()
            {
                return Err(TileError::invalid(format!(
                    "biome {:?} is defined more than once",
                    config.id
                )));
            }
            definitions.push(definition);
        }
        Ok(Self {
            definitions,
            lookup,
        })
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.lookup.get(id).copied()
    }

    pub fn get(&self, index: usize) -> Option<&BiomeDefinition> {
        self.definitions.get(index)
    }

    pub fn by_id(&self, id: &str) -> Option<&BiomeDefinition> {
        self.index_of(id).and_then(|index| self.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &BiomeDefinition)> {
        self.definitions.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_core::config::RegionConfig;

    fn biome(id: &str) -> BiomeConfig {
        BiomeConfig {
            id: id.to_string(),
            materials: vec![RegionConfig::new(0.0, 0.0, 1.0)],
            ..Default::default()
        }
    }

    fn tiles_with(biomes: Vec<BiomeConfig>) -> TileConfig {
        TileConfig {
            biomes,
            ..Default::default()
        }
    }

    #[test]
    fn default_tileset_builds() {
        let set = BiomeSet::from_config(&TileConfig::default()).unwrap();
        assert_eq!(set.len(), 2);
        let grass = set.by_id("grass").unwrap();
        assert!(grass.border_variants(Direction::North).is_some());
        assert!(grass.border_variants(Direction::East).is_none());
        assert_eq!(
            grass.border_variants(Direction::South).unwrap().variants()[0].region,
            Rect::square(16.0, 48.0, 16.0)
        );
        assert_eq!(set.index_of("water"), Some(1));
    }

    #[test]
    fn zero_material_weight_is_invalid() {
        let mut config = biome("mud");
        config.materials[0].weight = 0.0;
        let err = BiomeSet::from_config(&tiles_with(vec![config])).unwrap_err();
        assert!(matches!(err, TileError::InvalidConfiguration(_)));
    }

    #[test]
    fn zero_weight_borders_are_dropped() {
        let mut config = biome("mud");
        config
            .borders
            .insert("w".to_string(), vec![RegionConfig::new(0.0, 0.0, 0.0)]);
        let set = BiomeSet::from_config(&tiles_with(vec![config])).unwrap();
        assert!(set.by_id("mud").unwrap().border_variants(Direction::West).is_none());
    }

    #[test]
    fn details_side_must_fit_and_be_positive() {
        for side in [0, u32::MAX] {
            let tiles = TileConfig {
                details_tile_side_length: side,
                ..Default::default()
            };
            let err = BiomeSet::from_config(&tiles).unwrap_err();
            assert!(matches!(err, TileError::InvalidConfiguration(_)), "side {side}");
        }
    }

    #[test]
    fn unknown_border_token_is_invalid() {
        let mut config = biome("mud");
        config
            .borders
            .insert("up".to_string(), vec![RegionConfig::new(0.0, 0.0, 1.0)]);
        let err = BiomeSet::from_config(&tiles_with(vec![config])).unwrap_err();
        assert!(matches!(err, TileError::InvalidConfiguration(_)));
    }

    #[test]
    fn duplicate_border_direction_is_invalid() {
        let mut config = biome("mud");
        config
            .borders
            .insert("n".to_string(), vec![RegionConfig::new(0.0, 0.0, 1.0)]);
        config
            .borders
            .insert("north".to_string(), vec![RegionConfig::new(0.0, 0.0, 1.0)]);
        assert!(BiomeSet::from_config(&tiles_with(vec![config])).is_err());
    }

    #[test]
    fn duplicate_and_empty_ids_are_invalid() {
        assert!(BiomeSet::from_config(&tiles_with(vec![biome("a"), biome("a")])).is_err());
        assert!(BiomeSet::from_config(&tiles_with(vec![biome("")])).is_err());
    }

    #[test]
    fn detail_frame_is_shared_within_a_detail_square() {
        let set = BiomeSet::from_config(&TileConfig::default()).unwrap();
        let grass = set.by_id("grass").unwrap();
        let a = grass.detail_frame(IVec2::new(-2, 6)).unwrap().unwrap();
        let b = grass.detail_frame(IVec2::new(-1, 7)).unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.width, 16.0);

        let bare = BiomeSet::from_config(&tiles_with(vec![biome("mud")])).unwrap();
        assert!(bare
            .by_id("mud")
            .unwrap()
            .detail_frame(IVec2::ZERO)
            .unwrap()
            .is_none());
    }
}
