use glam::IVec2;

use crate::tile_core::biome::BiomeSet;
use crate::tile_core::border::{BorderStitcher, StitchReport};
use crate::tile_core::chunk::{Chunk, ChunkRequest, DrawInstruction, DrawLayer, LabelGrid};
use crate::tile_core::config::TileConfig;
use crate::tile_core::error::{TileError, TileResult};
use crate::tile_core::grid::ChunkGrid;
use crate::tile_core::resolver::TileResolver;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub chunks: usize,
    pub tiles: usize,
    pub borders: usize,
}

/// Owns the biome definitions and every inserted chunk. Insertion takes
/// `&mut self`, so inserts are serialised by construction.
pub struct TileWorld {
    biomes: BiomeSet,
    resolver: TileResolver,
    grid: ChunkGrid,
}

impl TileWorld {
    pub fn new(tiles: &TileConfig) -> TileResult<Self> {
        let biomes = BiomeSet::from_config(tiles)?;
        let resolver = TileResolver::from_config(tiles)?;
        log::info!(
            "tile world ready: {} biomes, {}-tile chunks",
            biomes.len(),
            resolver.chunk_side()
        );
        Ok(Self {
            biomes,
            resolver,
            grid: ChunkGrid::new(),
        })
    }

    pub fn chunk_side(&self) -> usize {
        self.resolver.chunk_side()
    }

    pub fn biomes(&self) -> &BiomeSet {
        &self.biomes
    }

    pub fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    pub fn chunk(&self, coord: IVec2) -> Option<&Chunk> {
        self.grid.get(coord)
    }

    /// Resolves every tile, stores the chunk, then stitches borders inside
    /// it and along edges shared with stored neighbours.
    pub fn insert_chunk(&mut self, request: &ChunkRequest) -> TileResult<StitchReport> {
        let coord = request.coord();
        if self.grid.contains(coord) {
            return Err(TileError::DuplicateChunk {
                x: coord.x,
                y: coord.y,
            });
        }
        self.resolver.check_chunk_range(coord)?;

        let side = self.resolver.chunk_side();
        let (labels, unknown) = LabelGrid::from_labels(&request.labels, side, &self.biomes)?;
        if unknown > 0 {
            log::warn!(
                "chunk ({}, {}) has {unknown} tiles with unknown biome labels, drawing them empty",
                coord.x,
                coord.y
            );
        }

        let mut tiles = Vec::with_capacity(side * side);
        for y in 0..side {
            for x in 0..side {
                let biome = labels.get(x, y).and_then(|index| self.biomes.get(index));
                let local = IVec2::new(x as i32, y as i32);
                tiles.push(DrawInstruction {
                    local_x: x as u32,
                    local_y: y as u32,
                    frame: self.resolver.resolve_tile_frame(coord, local, biome)?,
                    layer: DrawLayer::Material,
                });
            }
        }

        self.grid.insert(Chunk::new(coord, labels, tiles))?;
        let report = BorderStitcher::new(&self.biomes, &self.resolver).stitch(&mut self.grid, coord)?;
        log::debug!(
            "inserted chunk ({}, {}): {} tiles, {} borders placed",
            coord.x,
            coord.y,
            side * side,
            report.placed()
        );
        Ok(report)
    }

    /// Stored chunks in the square of `radius` chunks around `center`.
    pub fn visible_chunks(&self, center: IVec2, radius: i32) -> Vec<&Chunk> {
        self.grid.chunks_within(center, radius)
    }

    pub fn stats(&self) -> WorldStats {
        self.grid
            .iter()
            .fold(WorldStats::default(), |mut stats, (_, chunk)| {
                stats.chunks += 1;
                stats.tiles += chunk.tiles().len();
                stats.borders += chunk.borders().len();
                stats
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_core::rect::Rect;

    fn small_tiles() -> TileConfig {
        TileConfig {
            chunk_tile_side_length: 2,
            material_tile_side_length: 2,
            ..Default::default()
        }
    }

    fn request(x: i32, y: i32, rows: [[&str; 2]; 2]) -> ChunkRequest {
        ChunkRequest::new(
            IVec2::new(x, y),
            rows.iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn insert_emits_one_material_instruction_per_tile() {
        let mut world = TileWorld::new(&small_tiles()).unwrap();
        world
            .insert_chunk(&request(0, 0, [["grass", ""], ["water", "lava"]]))
            .unwrap();

        let chunk = world.chunk(IVec2::ZERO).unwrap();
        let positions: Vec<(u32, u32)> = chunk
            .tiles()
            .iter()
            .map(|instruction| (instruction.local_x, instruction.local_y))
            .collect();
        assert_eq!(positions, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);

        let empty = Rect::square(0.0, 64.0, 16.0);
        assert_ne!(chunk.tiles()[0].frame, empty);
        assert_eq!(chunk.tiles()[1].frame, empty);
        assert_eq!(chunk.tiles()[3].frame, empty, "unknown labels draw as empty");
        // Grass material sits at x = 64, 32 px square split into 2 tiles.
        assert_eq!(chunk.tiles()[0].frame, Rect::square(64.0, 0.0, 16.0));
    }

    #[test]
    fn duplicate_and_misshapen_requests_are_rejected() {
        let mut world = TileWorld::new(&small_tiles()).unwrap();
        let first = request(1, 1, [["grass", "grass"], ["grass", "grass"]]);
        world.insert_chunk(&first).unwrap();
        assert_eq!(
            world.insert_chunk(&first),
            Err(TileError::DuplicateChunk { x: 1, y: 1 })
        );

        let misshapen = ChunkRequest::new(IVec2::new(5, 5), vec![vec!["grass".to_string()]]);
        assert!(matches!(
            world.insert_chunk(&misshapen),
            Err(TileError::InvalidConfiguration(_))
        ));
        assert!(world.chunk(IVec2::new(5, 5)).is_none());
    }

    #[test]
    fn chunks_outside_the_tile_range_are_not_stored() {
        let mut world = TileWorld::new(&small_tiles()).unwrap();
        let far = request(1_100_000_000, 0, [["grass", "grass"], ["water", "water"]]);
        assert!(matches!(
            world.insert_chunk(&far),
            Err(TileError::InvalidConfiguration(_))
        ));
        assert!(world.chunk(IVec2::new(1_100_000_000, 0)).is_none());
        assert_eq!(world.stats(), WorldStats::default());

        let mut single = TileWorld::new(&TileConfig {
            chunk_tile_side_length: 1,
            material_tile_side_length: 1,
            ..Default::default()
        })
        .unwrap();
        let edge = ChunkRequest::new(IVec2::new(i32::MAX, 0), vec![vec!["grass".to_string()]]);
        assert!(single.insert_chunk(&edge).is_err());
        assert_eq!(single.stats().chunks, 0);

        // The neighbour one step inside the range is fine.
        let inside = ChunkRequest::new(IVec2::new(i32::MAX - 1, 0), vec![vec!["grass".to_string()]]);
        single.insert_chunk(&inside).unwrap();
        assert_eq!(single.stats().chunks, 1);
    }

    #[test]
    fn stats_count_tiles_and_borders() {
        let mut world = TileWorld::new(&small_tiles()).unwrap();
        // Default biomes only border north and south.
        world
            .insert_chunk(&request(0, 0, [["water", "water"], ["grass", "grass"]]))
            .unwrap();
        world
            .insert_chunk(&request(0, 1, [["water", "water"], ["water", "water"]]))
            .unwrap();
        let stats = world.stats();
        assert_eq!(stats.chunks, 2);
        assert_eq!(stats.tiles, 8);
        // Chunk (0, 0) alone: grass north on row 0, water south on row 1.
        // Chunk (0, 1) then adds grass south on its row 0 and patches water
        // north onto row 1 of chunk (0, 0).
        assert_eq!(stats.borders, 8);
        assert_eq!(world.visible_chunks(IVec2::ZERO, 0).len(), 1);
        assert_eq!(world.visible_chunks(IVec2::ZERO, 1).len(), 2);
    }
}
