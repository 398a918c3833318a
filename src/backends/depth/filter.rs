// SPDX-License-Identifier: GPL-3.0-only

//! Depth noise filters
//!
//! Filters run on the raw grid before the background model and the
//! classifier see it. The mesh is still unprojected from the raw samples.

use serde::{Deserialize, Serialize};

use crate::constants::depth::{DEPTH_INVALID_MM, DEPTH_MAX_MM, DEPTH_MIN_MM};
use crate::tracker::grid::DepthGrid;

/// Transforms a raw depth grid into a filtered grid of the same size
pub trait NoiseFilter {
    fn apply(&mut self, raw: &DepthGrid, filtered: &mut DepthGrid);
}

impl<F: NoiseFilter + ?Sized> NoiseFilter for Box<F> {
    fn apply(&mut self, raw: &DepthGrid, filtered: &mut DepthGrid) {
        (**self).apply(raw, filtered)
    }
}

/// Copies the raw grid unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFilter;

impl NoiseFilter for PassthroughFilter {
    fn apply(&mut self, raw: &DepthGrid, filtered: &mut DepthGrid) {
        filtered.copy_from(raw);
    }
}

/// Drops samples outside the sensor's reliable range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub min_mm: u16,
    pub max_mm: u16,
}

impl RangeFilter {
    pub fn new(min_mm: u16, max_mm: u16) -> Self {
        Self { min_mm, max_mm }
    }
}

impl Default for RangeFilter {
    fn default() -> Self {
        Self::new(DEPTH_MIN_MM, DEPTH_MAX_MM)
    }
}

impl NoiseFilter for RangeFilter {
    fn apply(&mut self, raw: &DepthGrid, filtered: &mut DepthGrid) {
        debug_assert!(filtered.same_size(raw), "filter output size differs");

        for (out, &sample) in filtered.as_mut_slice().iter_mut().zip(raw.as_slice()) {
            *out = if (self.min_mm..=self.max_mm).contains(&sample) {
                sample
            } else {
                DEPTH_INVALID_MM
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::grid::Grid;

    #[test]
    fn test_passthrough_copies() {
        let raw = Grid::from_vec(3, 1, vec![0u16, 10, 9000]).unwrap();
        let mut filtered = Grid::new(3, 1);
        PassthroughFilter.apply(&raw, &mut filtered);
        assert_eq!(filtered, raw);
    }

    #[test]
    fn test_range_filter_is_inclusive() {
        let raw = Grid::from_vec(5, 1, vec![0u16, 399, 400, 4000, 4001]).unwrap();
        let mut filtered = Grid::new(5, 1);
        RangeFilter::default().apply(&raw, &mut filtered);
        assert_eq!(filtered.as_slice(), &[0, 0, 400, 4000, 0]);
    }
}
