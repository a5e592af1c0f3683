use std::sync::Arc;

use anyhow::Context;
use glam::IVec2;

use biome_tiler::tile_core::config::AppConfig;
use biome_tiler::tile_core::labels::NoiseLabelLayer;
use biome_tiler::tile_runtime::cli::RunConfig;
use biome_tiler::tile_runtime::dump;
use biome_tiler::tile_runtime::streaming::StreamingTiles;
use biome_tiler::tile_runtime::world::TileWorld;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let run = RunConfig::from_env_args()?;
    let config = AppConfig::load(&run.config_path)?;

    let world = TileWorld::new(&config.tiles).context("invalid tile configuration")?;
    let layer = Arc::new(NoiseLabelLayer::new(
        config.labels.clone(),
        world.chunk_side(),
    ));
    let mut streaming = StreamingTiles::new(world, layer, config.world.threads)?;

    let radius = run.radius.unwrap_or(config.world.chunk_radius).max(0);
    let dispatched = streaming.request_radius(IVec2::ZERO, radius);
    log::info!("generating {dispatched} chunks (radius {radius})");
    streaming.finish().context("chunk insertion failed")?;

    let world = streaming.into_world();
    let stats = world.stats();
    log::info!(
        "{} chunks, {} tiles, {} borders",
        stats.chunks,
        stats.tiles,
        stats.borders
    );

    if let Some(path) = &run.dump_path {
        let uv_space = run
            .uv
            .then_some((config.tiles.texture_width, config.tiles.texture_height));
        dump::write(path, &dump::collect(&world, uv_space))?;
    }

    Ok(())
}
