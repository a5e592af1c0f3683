use std::collections::HashMap;

use glam::IVec2;

use crate::tile_core::chunk::Chunk;
use crate::tile_core::direction::{checked_offset, Direction};
use crate::tile_core::error::{TileError, TileResult};

/// Sparse, grow-only map of settled chunks.
#[derive(Debug, Default)]
pub struct ChunkGrid {
    chunks: HashMap<IVec2, Chunk>,
}

impl ChunkGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chunk: Chunk) -> TileResult<()> {
        let coord = chunk.coord();
        if self.chunks.contains_key(&coord) {
            return Err(TileError::DuplicateChunk {
                x: coord.x,
                y: coord.y,
            });
        }
        self.chunks.insert(coord, chunk);
        Ok(())
    }

    pub fn contains(&self, coord: IVec2) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn get(&self, coord: IVec2) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn get_mut(&mut self, coord: IVec2) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// The chunk adjacent to `coord` in `direction`, if it was inserted.
    pub fn neighbor(&self, coord: IVec2, direction: Direction) -> Option<&Chunk> {
        direction
            .step_coord(coord)
            .and_then(|neighbor| self.get(neighbor))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IVec2, &Chunk)> {
        self.chunks.iter()
    }

    /// Stored chunks inside the square of `radius` chunks around `center`,
    /// ordered by (y, x).
    pub fn chunks_within(&self, center: IVec2, radius: i32) -> Vec<&Chunk> {
        let mut found = Vec::new();
        for y in -radius..=radius {
            for x in -radius..=radius {
                let Some(coord) = checked_offset(center, IVec2::new(x, y)) else {
                    continue;
                };
                if let Some(chunk) = self.get(coord) {
                    found.push(chunk);
                }
            }
        }
        found
    }
}
