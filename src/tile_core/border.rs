//! Border stitching.
//!
//! A border owned by biome `b` facing direction `d` is drawn on a tile that
//! is not `b` when its neighbour one step in `d` is `b`. The overlay sits on
//! the foreign tile, looking into the biome.
//!
//! Each insertion runs three passes: the interior of the new chunk, the new
//! chunk's edges against already stored neighbours, and the neighbours'
//! facing edges against the new chunk. Whichever chunk of an adjacent pair
//! arrives second fills in the edge the first one had to skip, so the final
//! border set does not depend on insertion order.

use glam::IVec2;

use crate::tile_core::biome::{BiomeDefinition, BiomeSet};
use crate::tile_core::chunk::{BorderPlacement, Chunk, LabelGrid};
use crate::tile_core::direction::Direction;
use crate::tile_core::error::TileResult;
use crate::tile_core::grid::ChunkGrid;
use crate::tile_core::resolver::TileResolver;
use crate::tile_core::weighted::WeightedTable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StitchReport {
    pub interior: usize,
    pub edge: usize,
    pub back_propagated: usize,
    pub neighbors_patched: usize,
}

impl StitchReport {
    pub fn placed(&self) -> usize {
        self.interior + self.edge + self.back_propagated
    }
}

pub struct BorderStitcher<'a> {
    biomes: &'a BiomeSet,
    resolver: &'a TileResolver,
}

impl<'a> BorderStitcher<'a> {
    pub fn new(biomes: &'a BiomeSet, resolver: &'a TileResolver) -> Self {
        Self { biomes, resolver }
    }

    /// Runs all three passes for the chunk stored at `coord`. Missing
    /// neighbours are skipped; they patch this chunk when they arrive.
    pub fn stitch(&self, grid: &mut ChunkGrid, coord: IVec2) -> TileResult<StitchReport> {
        let mut report = StitchReport::default();
        let Some(chunk) = grid.get(coord) else {
            return Ok(report);
        };

        let interior = self.interior_placements(chunk)?;
        report.interior = apply(grid, coord, interior);

        for direction in Direction::ALL {
            let Some(neighbor_coord) = direction.step_coord(coord) else {
                continue;
            };
            let (Some(chunk), Some(neighbor)) = (grid.get(coord), grid.get(neighbor_coord)) else {
                continue;
            };

            let edge = self.edge_placements(chunk, direction, neighbor.labels())?;
            let back = self.edge_placements(neighbor, direction.opposite(), chunk.labels())?;

            report.edge += apply(grid, coord, edge);
            let patched = apply(grid, neighbor_coord, back);
            if patched > 0 {
                report.neighbors_patched += 1;
            }
            report.back_propagated += patched;
        }

        log::debug!(
            "stitched chunk ({}, {}): {} interior, {} edge, {} back-propagated into {} neighbours",
            coord.x,
            coord.y,
            report.interior,
            report.edge,
            report.back_propagated,
            report.neighbors_patched
        );
        Ok(report)
    }

    /// Re-evaluates only the interior pass. Returns how many new borders
    /// were added, which is zero for an unchanged chunk.
    pub fn rescan_interior(&self, grid: &mut ChunkGrid, coord: IVec2) -> TileResult<usize> {
        let Some(chunk) = grid.get(coord) else {
            return Ok(0);
        };
        let interior = self.interior_placements(chunk)?;
        Ok(apply(grid, coord, interior))
    }

    fn interior_placements(&self, chunk: &Chunk) -> TileResult<Vec<BorderPlacement>> {
        let labels = chunk.labels();
        let side = labels.side();
        let mut placements = Vec::new();

        for (index, biome) in self.biomes.iter() {
            for direction in Direction::ALL {
                let Some(table) = biome.border_variants(direction) else {
                    continue;
                };
                for y in 0..side {
                    for x in 0..side {
                        let Some((nx, ny)) = direction.step_within(x, y, side) else {
                            continue;
                        };
                        if triggers(labels.get(x, y), labels.get(nx, ny), index) {
                            placements.push(self.place(
                                chunk.coord(),
                                (x, y),
                                (index, biome),
                                direction,
                                table,
                            )?);
                        }
                    }
                }
            }
        }
        Ok(placements)
    }

    /// Borders on `target`'s edge tiles facing `direction`, judged against
    /// the labels of the chunk on the other side of that edge.
    fn edge_placements(
        &self,
        target: &Chunk,
        direction: Direction,
        across: &LabelGrid,
    ) -> TileResult<Vec<BorderPlacement>> {
        let labels = target.labels();
        let side = labels.side();
        let mut placements = Vec::new();

        for (index, biome) in self.biomes.iter() {
            let Some(table) = biome.border_variants(direction) else {
                continue;
            };
            for (x, y) in direction.edge_tiles(side) {
                let (nx, ny) = direction.step_wrapped(x, y, side);
                if triggers(labels.get(x, y), across.get(nx, ny), index) {
                    placements.push(self.place(
                        target.coord(),
                        (x, y),
                        (index, biome),
                        direction,
                        table,
                    )?);
                }
            }
        }
        Ok(placements)
    }

    fn place(
        &self,
        chunk: IVec2,
        (x, y): (usize, usize),
        (index, biome): (usize, &BiomeDefinition),
        direction: Direction,
        table: &WeightedTable,
    ) -> TileResult<BorderPlacement> {
        let global = self
            .resolver
            .global_tile(chunk, IVec2::new(x as i32, y as i32))?;
        Ok(BorderPlacement {
            x,
            y,
            biome: index,
            biome_id: biome.id().clone(),
            direction,
            frame: table.select(global.x, global.y)?,
        })
    }
}

fn triggers(current: Option<usize>, neighbor: Option<usize>, biome: usize) -> bool {
    current != Some(biome) && neighbor == Some(biome)
}

fn apply(grid: &mut ChunkGrid, coord: IVec2, placements: Vec<BorderPlacement>) -> usize {
    let Some(chunk) = grid.get_mut(coord) else {
        return 0;
    };
    placements
        .into_iter()
        .filter(|placement| chunk.add_border(placement.clone()))
        .count()
}
