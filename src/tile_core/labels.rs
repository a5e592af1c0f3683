use glam::IVec2;
use noise::{NoiseFn, OpenSimplex};
use rayon::prelude::*;

use crate::tile_core::chunk::ChunkRequest;
use crate::tile_core::config::LabelNoiseConfig;
use crate::tile_core::layer::Layer;

/// Stand-in terrain source: fractal noise per global tile, banded into
/// biome labels.
pub struct NoiseLabelLayer {
    noise: OpenSimplex,
    config: LabelNoiseConfig,
    chunk_side: usize,
}

impl NoiseLabelLayer {
    pub fn new(config: LabelNoiseConfig, chunk_side: usize) -> Self {
        Self {
            noise: OpenSimplex::new(config.seed),
            config,
            chunk_side,
        }
    }

    pub fn sample(&self, global: IVec2) -> f64 {
        self.sample_at(f64::from(global.x), f64::from(global.y))
    }

    fn sample_at(&self, x: f64, y: f64) -> f64 {
        let c = &self.config;
        let x = x * c.coordinate_scale;
        let y = y * c.coordinate_scale;

        let mut result = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = c.frequency;
        for _ in 0..c.octaves {
            result += amplitude * self.noise.get([x * frequency, y * frequency]);
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        result
    }

    pub fn label_for(&self, value: f64) -> &str {
        self.config
            .bands
            .iter()
            .find(|band| value < band.below)
            .map_or(self.config.otherwise.as_str(), |band| band.label.as_str())
    }
}

impl Layer<IVec2, ChunkRequest> for NoiseLabelLayer {
    fn generate(&self, coord: IVec2) -> ChunkRequest {
        let side = self.chunk_side;
        // Widened so chunks near the i32 limit still sample.
        let origin_x = i64::from(coord.x) * side as i64;
        let origin_y = i64::from(coord.y) * side as i64;

        let values: Vec<f64> = (0..side * side)
            .into_par_iter()
            .map(|idx| {
                let x = origin_x + (idx % side) as i64;
                let y = origin_y + (idx / side) as i64;
                self.sample_at(x as f64, y as f64)
            })
            .collect();

        let labels: Vec<Vec<String>> = values
            .chunks(side.max(1))
            .map(|row| row.iter().map(|v| self.label_for(*v).to_string()).collect())
            .collect();
        ChunkRequest::new(coord, labels)
    }
}
