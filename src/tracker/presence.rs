// SPDX-License-Identifier: GPL-3.0-only

//! Floor presence map
//!
//! Splats the foreground mesh onto a square grid covering the stage floor,
//! weighting each point by its area estimate. Dense, close surfaces and
//! sparse, distant ones then contribute comparably.

use super::grid::Grid;
use super::mesh::Mesh;

/// Area-weighted occupancy of the stage floor
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceMap {
    stage_size: f32,
    cells: Grid<f32>,
}

impl PresenceMap {
    /// Square map of `cells × cells` covering `stage_size` millimetres,
    /// centred on the origin
    pub fn new(stage_size: f32, cells: usize) -> Self {
        Self {
            stage_size,
            cells: Grid::new(cells, cells),
        }
    }

    /// Rebuild the map from one frame's mesh
    ///
    /// Points outside the stage are ignored. Returns the number of points
    /// that landed on the stage.
    pub fn accumulate(&mut self, mesh: &Mesh) -> usize {
        self.cells.fill(0.0);

        let side = self.cells.width();
        if side == 0 || self.stage_size <= 0.0 {
            return 0;
        }
        let half = self.stage_size / 2.0;
        let scale = side as f32 / self.stage_size;

        let mut landed = 0;
        for (point, area) in mesh.iter() {
            let u = (point.x + half) * scale;
            let v = (point.y + half) * scale;
            if !(u >= 0.0 && v >= 0.0) {
                continue;
            }
            let (cx, cy) = (u as usize, v as usize);
            if cx >= side || cy >= side {
                continue;
            }
            let index = self.cells.index(cx, cy);
            self.cells.as_mut_slice()[index] += area;
            landed += 1;
        }
        landed
    }

    /// Accumulated area in cell `(x, y)`
    pub fn cell(&self, x: usize, y: usize) -> Option<f32> {
        self.cells.get(x, y).copied()
    }

    /// Largest cell value
    pub fn peak(&self) -> f32 {
        self.cells.as_slice().iter().copied().fold(0.0, f32::max)
    }

    /// Sum over all cells
    pub fn total(&self) -> f32 {
        self.cells.as_slice().iter().sum()
    }

    /// Cells scaled so the peak is 1.0 (all zero when empty)
    pub fn normalized(&self) -> Grid<f32> {
        let peak = self.peak();
        let mut out = self.cells.clone();
        if peak > 0.0 {
            out.as_mut_slice().iter_mut().for_each(|c| *c /= peak);
        }
        out
    }

    pub fn cells(&self) -> &Grid<f32> {
        &self.cells
    }

    pub fn stage_size(&self) -> f32 {
        self.stage_size
    }
}
