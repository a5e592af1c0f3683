use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::tile_core::chunk::DrawInstruction;
use crate::tile_runtime::world::TileWorld;

#[derive(Debug, Clone, Serialize)]
pub struct ChunkDump {
    pub coord: [i32; 2],
    pub instructions: Vec<DrawInstruction>,
}

/// Every chunk's draw instructions, ordered by (x, y). With `uv_space`
/// the frames are divided by the given texture size.
pub fn collect(world: &TileWorld, uv_space: Option<(f32, f32)>) -> Vec<ChunkDump> {
    let mut dumps: Vec<ChunkDump> = world
        .grid()
        .iter()
        .map(|(coord, chunk)| ChunkDump {
            coord: coord.to_array(),
            instructions: chunk
                .draw_instructions()
                .map(|instruction| {
                    let mut instruction = instruction.clone();
                    if let Some((width, height)) = uv_space {
                        instruction.frame = instruction.frame.to_uv(width, height);
                    }
                    instruction
                })
                .collect(),
        })
        .collect();
    dumps.sort_by_key(|dump| dump.coord);
    dumps
}

pub fn write(path: &Path, dumps: &[ChunkDump]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(dumps).context("failed to serialise chunk dump")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("wrote {} chunks to {}", dumps.len(), path.display());
    Ok(())
}
