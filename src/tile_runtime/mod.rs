pub mod cli;
pub mod dump;
pub mod streaming;
pub mod world;
