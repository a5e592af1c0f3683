use glam::IVec2;

use crate::tile_core::biome::BiomeDefinition;
use crate::tile_core::config::TileConfig;
use crate::tile_core::error::{TileError, TileResult};
use crate::tile_core::rect::Rect;

/// Maps tiles to source rectangles. Material art is chosen per material
/// square (`material_side` tiles across) and each tile draws its own slice
/// of that square's region.
#[derive(Debug, Clone)]
pub struct TileResolver {
    chunk_side: i32,
    material_side: i32,
    empty_frame: Rect,
}

impl TileResolver {
    pub fn new(chunk_side: u32, material_side: u32, empty_frame: Rect) -> TileResult<Self> {
        if chunk_side == 0 {
            return Err(TileError::invalid("chunk tile side length must be positive"));
        }
        if material_side == 0 {
            return Err(TileError::invalid("material tile side length must be positive"));
        }
        let chunk_side = i32::try_from(chunk_side)
            .map_err(|_| TileError::invalid("chunk tile side length is too large"))?;
        let material_side = i32::try_from(material_side)
            .map_err(|_| TileError::invalid("material tile side length is too large"))?;
        if material_side > chunk_side {
            log::warn!(
                "material squares ({material_side} tiles) are larger than chunks ({chunk_side} tiles)"
            );
        }
        Ok(Self {
            chunk_side,
            material_side,
            empty_frame,
        })
    }

    pub fn from_config(tiles: &TileConfig) -> TileResult<Self> {
        let empty = &tiles.empty_tile;
        Self::new(
            tiles.chunk_tile_side_length,
            tiles.material_tile_side_length,
            Rect::square(empty.x, empty.y, empty.side_length),
        )
    }

    pub fn chunk_side(&self) -> usize {
        self.chunk_side as usize
    }

    pub fn empty_frame(&self) -> Rect {
        self.empty_frame
    }

    pub fn global_tile(&self, chunk: IVec2, local: IVec2) -> TileResult<IVec2> {
        let axis = |chunk: i32, local: i32| {
            chunk
                .checked_mul(self.chunk_side)
                .and_then(|origin| origin.checked_add(local))
        };
        match (axis(chunk.x, local.x), axis(chunk.y, local.y)) {
            (Some(x), Some(y)) => Ok(IVec2::new(x, y)),
            _ => Err(TileError::invalid(format!(
                "tile ({}, {}) of chunk ({}, {}) lies outside the i32 tile range",
                local.x, local.y, chunk.x, chunk.y
            ))),
        }
    }

    /// Fails unless every tile of the chunk, and the ring of tiles just
    /// outside it, has an `i32` global coordinate.
    pub fn check_chunk_range(&self, chunk: IVec2) -> TileResult<()> {
        self.global_tile(chunk, IVec2::splat(-1))?;
        self.global_tile(chunk, IVec2::splat(self.chunk_side))?;
        Ok(())
    }

    /// Material square containing a global tile, by floor division so the
    /// squares continue across the origin.
    pub fn material_square(&self, global: IVec2) -> IVec2 {
        global.div_euclid(IVec2::splat(self.material_side))
    }

    pub fn resolve_tile_frame(
        &self,
        chunk: IVec2,
        local: IVec2,
        biome: Option<&BiomeDefinition>,
    ) -> TileResult<Rect> {
        let Some(biome) = biome else {
            return Ok(self.empty_frame);
        };

        let global = self.global_tile(chunk, local)?;
        let square = self.material_square(global);
        let offset = global - square * self.material_side;

        let material = biome.material_variants().select(square.x, square.y)?;
        // Source regions are square.
        let tile_px = material.width / self.material_side as f32;

        Ok(Rect::square(
            material.x + offset.x as f32 * tile_px,
            material.y + offset.y as f32 * tile_px,
            tile_px,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_core::config::{BiomeConfig, RegionConfig};

    fn striped_biome(tiles: &TileConfig) -> BiomeDefinition {
        let config = BiomeConfig {
            id: "stone".to_string(),
            materials: vec![
                RegionConfig::new(0.0, 0.0, 1.0),
                RegionConfig::new(32.0, 0.0, 1.0),
                RegionConfig::new(64.0, 0.0, 1.0),
            ],
            ..Default::default()
        };
        BiomeDefinition::from_config(&config, tiles).unwrap()
    }

    fn resolver(chunk_side: u32) -> (TileResolver, BiomeDefinition) {
        let tiles = TileConfig {
            chunk_tile_side_length: chunk_side,
            material_tile_side_length: 4,
            material_pixel_side_length: 32,
            ..Default::default()
        };
        (TileResolver::from_config(&tiles).unwrap(), striped_biome(&tiles))
    }

    #[test]
    fn empty_tile_uses_fallback_frame() {
        let (resolver, _) = resolver(8);
        let frame = resolver
            .resolve_tile_frame(IVec2::new(-3, 9), IVec2::new(1, 1), None)
            .unwrap();
        assert_eq!(frame, Rect::square(0.0, 64.0, 16.0));
    }

    #[test]
    fn tiles_slice_their_material_square() {
        let (resolver, biome) = resolver(8);
        let square = biome.material_variants().select(0, 0).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let frame = resolver
                    .resolve_tile_frame(IVec2::ZERO, IVec2::new(x, y), Some(&biome))
                    .unwrap();
                assert_eq!(
                    frame,
                    Rect::square(square.x + x as f32 * 8.0, square.y + y as f32 * 8.0, 8.0)
                );
            }
        }
    }

    #[test]
    fn negative_tiles_use_the_square_left_of_the_origin() {
        let (resolver, biome) = resolver(4);
        // Global tile (-1, 0) is local (3, 0) of chunk (-1, 0).
        let global = resolver
            .global_tile(IVec2::new(-1, 0), IVec2::new(3, 0))
            .unwrap();
        assert_eq!(global, IVec2::new(-1, 0));
        assert_eq!(resolver.material_square(global), IVec2::new(-1, 0));

        let square = biome.material_variants().select(-1, 0).unwrap();
        let frame = resolver
            .resolve_tile_frame(IVec2::new(-1, 0), IVec2::new(3, 0), Some(&biome))
            .unwrap();
        assert_eq!(frame, Rect::square(square.x + 24.0, square.y, 8.0));

        // Tiles -4..=-1 all share that square's art.
        for local_x in 0..4 {
            let frame = resolver
                .resolve_tile_frame(IVec2::new(-1, 0), IVec2::new(local_x, 0), Some(&biome))
                .unwrap();
            assert_eq!(frame.x - local_x as f32 * 8.0, square.x);
        }
    }

    #[test]
    fn chunks_larger_than_squares_continue_the_pattern() {
        let (resolver, biome) = resolver(8);
        // Local (5, 2) of chunk (1, 0) is global (13, 2), offset (1, 2) in square (3, 0).
        let square = biome.material_variants().select(3, 0).unwrap();
        let frame = resolver
            .resolve_tile_frame(IVec2::new(1, 0), IVec2::new(5, 2), Some(&biome))
            .unwrap();
        assert_eq!(frame, Rect::square(square.x + 8.0, square.y + 16.0, 8.0));
    }

    #[test]
    fn chunks_past_the_tile_range_are_rejected() {
        let (resolver, biome) = resolver(2);
        let far = IVec2::new(1_100_000_000, 0);
        assert!(matches!(
            resolver.check_chunk_range(far),
            Err(TileError::InvalidConfiguration(_))
        ));
        assert!(resolver
            .resolve_tile_frame(far, IVec2::ZERO, Some(&biome))
            .is_err());

        // Last chunk whose outer ring still fits.
        let last = IVec2::new(i32::MAX / 2 - 1, i32::MIN / 2 + 1);
        resolver.check_chunk_range(last).unwrap();
        assert!(resolver.check_chunk_range(IVec2::new(i32::MAX / 2, 0)).is_err());
        assert!(resolver.check_chunk_range(IVec2::new(0, i32::MIN / 2)).is_err());
    }

    #[test]
    fn zero_sides_are_rejected() {
        assert!(TileResolver::new(0, 4, Rect::square(0.0, 0.0, 1.0)).is_err());
        assert!(TileResolver::new(4, 0, Rect::square(0.0, 0.0, 1.0)).is_err());
    }
}
