pub mod tile_core;
pub mod tile_runtime;
