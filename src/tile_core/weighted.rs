//! Weighted variant tables: normalised (region, weight) lists sampled by
//! grid position.

use crate::tile_core::config::RegionConfig;
use crate::tile_core::error::{TileError, TileResult};
use crate::tile_core::hash::coordinate_hash;
use crate::tile_core::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedVariant {
    pub region: Rect,
    pub normalized_weight: f64,
}

/// A non-empty list of variants whose weights sum to ~1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTable {
    variants: Vec<WeightedVariant>,
}

impl WeightedTable {
    /// Normalises raw weights and drops zero-weight entries, which could
    /// otherwise win the last-variant fallback. Returns `Ok(None)` when the
    /// list is empty or totals to zero, so callers decide whether absence
    /// is an error.
    pub fn from_regions(
        entries: &[RegionConfig],
        region_side: f32,
        context: &str,
    ) -> TileResult<Option<Self>> {
        let mut total = 0.0;
        for entry in entries {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(TileError::invalid(format!(
                    "{context}: weight {} at ({}, {}) must be finite and non-negative",
                    entry.weight, entry.x, entry.y
                )));
            }
            total += entry.weight;
        }
        if total <= 0.0 {
            return Ok(None);
        }

        let variants = entries
            .iter()
            .filter(|entry| entry.weight > 0.0)
            .map(|entry| WeightedVariant {
                region: Rect::square(entry.x, entry.y, region_side),
                normalized_weight: entry.weight / total,
            })
            .collect();
        Ok(Some(Self { variants }))
    }

    pub fn variants(&self) -> &[WeightedVariant] {
        &self.variants
    }

    pub fn select(&self, x: i32, y: i32) -> TileResult<Rect> {
        select(x, y, &self.variants)
    }
}

/// Picks the variant whose cumulative weight interval contains
/// `coordinate_hash(x, y)`. A boundary value belongs to the later variant.
/// Rounding that leaves the cumulative total just under 1.0 falls back to
/// the last variant.
pub fn select(x: i32, y: i32, variants: &[WeightedVariant]) -> TileResult<Rect> {
    let Some(last) = variants.last() else {
        return Err(TileError::invalid("cannot select from an empty variant table"));
    };

    let r = coordinate_hash(x, y);
    let mut running = 0.0;
    for variant in variants {
        if r < running + variant.normalized_weight {
            return Ok(variant.region);
        }
        running += variant.normalized_weight;
    }
    Ok(last.region)
}
