//! Color census over cell collections
//!
//! Only colors that actually occur are keyed; an absent color is simply
//! missing rather than stored with a zero count. Iteration follows label
//! order so seeded runs stay reproducible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TideError};
use crate::core::types::ColorLabel;
use crate::spatial::grid::{Cell, Grid};

/// Count of each color within a set of cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCensus {
    counts: BTreeMap<ColorLabel, u32>,
}

impl ColorCensus {
    /// Census of an arbitrary cell collection
    pub fn of<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut counts = BTreeMap::new();
        for cell in cells {
            *counts.entry(cell.color).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Census of every cell in the grid
    pub fn of_grid(grid: &Grid) -> Self {
        Self::of(grid.cells())
    }

    /// Occurrences of `color`, zero when absent
    pub fn count(&self, color: ColorLabel) -> u32 {
        self.counts.get(&color).copied().unwrap_or(0)
    }

    /// Number of cells counted
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&n| u64::from(n)).sum()
    }

    /// Number of distinct colors present
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(color, count)` pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (ColorLabel, u32)> + '_ {
        self.counts.iter().map(|(&color, &count)| (color, count))
    }

    /// Most frequent color; ties resolve to the lowest label
    pub fn dominant(&self) -> Option<(ColorLabel, u32)> {
        self.iter()
            .fold(None, |best: Option<(ColorLabel, u32)>, (color, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((color, count)),
            })
    }

    /// Divide every count by `total_cells`
    pub fn normalize(&self, total_cells: usize) -> Result<ColorShares> {
        if total_cells == 0 {
            return Err(TideError::domain("cannot normalize a census over zero cells"));
        }
        let total = total_cells as f64;
        Ok(ColorShares {
            shares: self
                .counts
                .iter()
                .map(|(&color, &count)| (color, f64::from(count) / total))
                .collect(),
        })
    }
}

/// Normalized census: fraction of cells holding each color
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorShares {
    shares: BTreeMap<ColorLabel, f64>,
}

impl ColorShares {
    /// Fraction of cells colored `color`, zero when absent
    pub fn fraction(&self, color: ColorLabel) -> f64 {
        self.shares.get(&color).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColorLabel, f64)> + '_ {
        self.shares.iter().map(|(&color, &share)| (color, share))
    }
}
