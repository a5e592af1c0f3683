pub mod biome;
pub mod border;
pub mod chunk;
pub mod config;
pub mod direction;
pub mod error;
pub mod grid;
pub mod hash;
pub mod labels;
pub mod layer;
pub mod rect;
pub mod resolver;
pub mod weighted;
