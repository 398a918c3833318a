// SPDX-License-Identifier: GPL-3.0-only

//! Per-frame tracking pipeline
//!
//! ```text
//! DepthSource ──raw──► NoiseFilter ──filtered──► BackgroundModel (clear / accumulate)
//!      │                                   │
//!      │                                   ▼
//!      │                           classify_frame ──► Mask
//!      │                                                │
//!      └──────────raw + unprojection──────► build_mesh ◄┘
//!                                               │
//!                                               ▼
//!                                        Mesh + areas
//! ```
//!
//! The pipeline is single-threaded and driven by its caller. `update` pulls
//! at most one frame; outputs are borrowed from the pipeline and are valid
//! until the next `update`, which rebuilds them in place.

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Vec3;
use super::background::BackgroundModel;
use super::classifier::classify_frame;
use super::grid::{DepthGrid, Grid, Mask};
use super::mesh::{Mesh, PlanarTransform, build_mesh};
use super::orientation::Orientation;
use crate::backends::depth::{DepthSource, NoiseFilter};
use crate::constants::depth::DEFAULT_THRESHOLD_MM;

/// Configuration applied to a single `update` call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSettings {
    /// Fold incoming frames into the background model
    pub calibrating: bool,
    /// Minimum depth difference (exclusive) for a pixel to count as foreground
    pub threshold: u16,
    /// Direction treated as vertical; must be non-zero
    pub up: Vec3,
    /// Floor-plane offset (millimetres)
    pub offset: Vector2<f32>,
    /// Rotation about the vertical axis (degrees)
    pub rotation_deg: f32,
}

impl FrameSettings {
    pub fn planar(&self) -> PlanarTransform {
        PlanarTransform::new(self.offset, self.rotation_deg)
    }
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            calibrating: false,
            threshold: DEFAULT_THRESHOLD_MM,
            up: Vector3::z(),
            offset: Vector2::zeros(),
            rotation_deg: 0.0,
        }
    }
}

/// Foreground tracker owning its source, background and outputs
pub struct DepthPipeline<S, F> {
    source: S,
    filter: F,
    filtered: DepthGrid,
    background: BackgroundModel,
    mask: Mask,
    orientation: Orientation,
    mesh: Mesh,
    clear_requested: bool,
    frame_new: bool,
    frames_processed: u64,
}

impl<S: DepthSource, F: NoiseFilter> DepthPipeline<S, F> {
    /// Create a pipeline sized to the source's resolution
    pub fn new(source: S, filter: F) -> Self {
        let width = source.width();
        let height = source.height();
        info!(width, height, "Creating depth pipeline");

        Self {
            source,
            filter,
            filtered: Grid::new(width, height),
            background: BackgroundModel::new(width, height),
            mask: Mask::new(width, height),
            orientation: Orientation::default(),
            mesh: Mesh::with_capacity(width.saturating_sub(1) * height),
            clear_requested: false,
            frame_new: false,
            frames_processed: 0,
        }
    }

    /// Ask for the background to be cleared on the next processed frame
    pub fn request_clear_background(&mut self) {
        self.clear_requested = true;
    }

    /// Whether a background clear is still pending
    pub fn clear_pending(&self) -> bool {
        self.clear_requested
    }

    /// Advance by at most one frame
    ///
    /// Returns `false` without touching any state when the source has no new
    /// frame. Otherwise the frame is filtered, optionally folded into the
    /// background, classified, and turned into a fresh mesh.
    pub fn update(&mut self, settings: &FrameSettings) -> bool {
        if !self.source.has_new_frame() {
            return false;
        }

        self.filter.apply(self.source.depth_grid(), &mut self.filtered);

        if self.clear_requested {
            self.background.clear();
            self.clear_requested = false;
            info!("Background cleared");
        }

        if settings.calibrating {
            self.background.accumulate(&self.filtered);
        }

        self.orientation.set_up(settings.up);

        classify_frame(
            &self.filtered,
            &self.background,
            settings.threshold,
            &mut self.mask,
        );

        let source = &self.source;
        build_mesh(
            &self.mask,
            source.depth_grid(),
            |x, y, raw| source.world_coordinate_at(x, y, raw),
            &self.orientation,
            &settings.planar(),
            &mut self.mesh,
        );

        self.frames_processed += 1;
        self.frame_new = true;

        debug!(
            frame = self.frames_processed,
            calibrating = settings.calibrating,
            foreground = self.mask.count_valid(),
            points = self.mesh.len(),
            "Frame processed"
        );

        true
    }

    /// Consume the "new frame processed" flag
    ///
    /// Returns `true` once after each processed frame, then `false` until the
    /// next one.
    pub fn is_frame_new(&mut self) -> bool {
        std::mem::take(&mut self.frame_new)
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Mesh points from the most recent processed frame
    pub fn mesh_points(&self) -> &[Vec3] {
        self.mesh.points()
    }

    /// Area estimates matching [`mesh_points`](Self::mesh_points) one-to-one
    pub fn mesh_area(&self) -> &[f32] {
        self.mesh.areas()
    }

    pub fn background(&self) -> &BackgroundModel {
        &self.background
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Filtered depth of the most recent processed frame
    pub fn filtered(&self) -> &DepthGrid {
        &self.filtered
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}
