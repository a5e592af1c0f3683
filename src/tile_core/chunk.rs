use std::collections::HashSet;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::tile_core::biome::{BiomeId, BiomeSet};
use crate::tile_core::direction::Direction;
use crate::tile_core::error::{TileError, TileResult};
use crate::tile_core::rect::Rect;

/// Labels for one chunk, `labels[y][x]`. An empty string is an unlabelled
/// tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRequest {
    pub coord: [i32; 2],
    pub labels: Vec<Vec<String>>,
}

impl ChunkRequest {
    pub fn new(coord: IVec2, labels: Vec<Vec<String>>) -> Self {
        Self {
            coord: coord.to_array(),
            labels,
        }
    }

    pub fn coord(&self) -> IVec2 {
        IVec2::from_array(self.coord)
    }
}

/// Biome index (into [`BiomeSet`]) per tile. `None` for empty or
/// unrecognised labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    side: usize,
    cells: Vec<Option<usize>>,
}

impl LabelGrid {
    /// Interns string labels. Returns the grid and the number of labels that
    /// were neither empty nor a known biome id.
    pub fn from_labels(
        labels: &[Vec<String>],
        side: usize,
        biomes: &BiomeSet,
    ) -> TileResult<(Self, usize)> {
        if labels.len() != side {
            return Err(TileError::invalid(format!(
                "label grid has {} rows, expected {side}",
                labels.len()
            )));
        }
        let mut cells = Vec::with_capacity(side * side);
        let mut unknown = 0;
        for (y, row) in labels.iter().enumerate() {
            if row.len() != side {
                return Err(TileError::invalid(format!(
                    "label grid row {y} has {} tiles, expected {side}",
                    row.len()
                )));
            }
            for label in row {
                if label.is_empty() {
                    cells.push(None);
                    continue;
                }
                let index = biomes.index_of(label);
                if index.is_none() {
                    unknown += 1;
                }
                cells.push(index);
            }
        }
        Ok((Self { side, cells }, unknown))
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn get(&self, x: usize, y: usize) -> Option<usize> {
        self.cells[y * self.side + x]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawLayer {
    Material,
    Border { biome: BiomeId, direction: Direction },
}

/// One sprite for the renderer: which source frame goes on which local tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawInstruction {
    pub local_x: u32,
    pub local_y: u32,
    pub frame: Rect,
    #[serde(flatten)]
    pub layer: DrawLayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BorderKey {
    x: usize,
    y: usize,
    biome: usize,
    direction: Direction,
}

/// A border decided by the stitcher, not yet attached to its chunk.
#[derive(Debug, Clone)]
pub struct BorderPlacement {
    pub x: usize,
    pub y: usize,
    pub biome: usize,
    pub biome_id: BiomeId,
    pub direction: Direction,
    pub frame: Rect,
}

#[derive(Debug, Clone)]
pub struct Chunk {
    coord: IVec2,
    labels: LabelGrid,
    tiles: Vec<DrawInstruction>,
    borders: Vec<DrawInstruction>,
    placed: HashSet<BorderKey>,
}

impl Chunk {
    pub fn new(coord: IVec2, labels: LabelGrid, tiles: Vec<DrawInstruction>) -> Self {
        Self {
            coord,
            labels,
            tiles,
            borders: Vec::new(),
            placed: HashSet::new(),
        }
    }

    pub fn coord(&self) -> IVec2 {
        self.coord
    }

    pub fn labels(&self) -> &LabelGrid {
        &self.labels
    }

    pub fn tiles(&self) -> &[DrawInstruction] {
        &self.tiles
    }

    pub fn borders(&self) -> &[DrawInstruction] {
        &self.borders
    }

    /// Tiles first, then borders, in emission order.
    pub fn draw_instructions(&self) -> impl Iterator<Item = &DrawInstruction> {
        self.tiles.iter().chain(self.borders.iter())
    }

    /// Appends a border unless the same (tile, biome, direction) is already
    /// present. Returns whether it was added.
    pub fn add_border(&mut self, placement: BorderPlacement) -> bool {
        let key = BorderKey {
            x: placement.x,
            y: placement.y,
            biome: placement.biome,
            direction: placement.direction,
        };
        if !self.placed.insert(key) {
            return false;
        }
        self.borders.push(DrawInstruction {
            local_x: placement.x as u32,
            local_y: placement.y as u32,
            frame: placement.frame,
            layer: DrawLayer::Border {
                biome: placement.biome_id,
                direction: placement.direction,
            },
        });
        true
    }
}
