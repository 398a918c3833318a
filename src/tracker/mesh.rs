// SPDX-License-Identifier: GPL-3.0-only

//! Foreground mesh reconstruction
//!
//! Only horizontally adjacent foreground pixel pairs are connected. Each
//! pair contributes its left-hand pixel as a point, together with an area
//! estimate: the squared distance between the two unprojected pixels.

use nalgebra::{UnitQuaternion, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use super::Vec3;
use super::grid::{DepthGrid, Mask};
use super::orientation::Orientation;

/// In-plane placement applied after orientation correction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarTransform {
    /// Translation on the floor plane (millimetres)
    pub offset: Vector2<f32>,
    /// Rotation about the vertical axis, in degrees (counter-clockwise)
    pub rotation_deg: f32,
}

impl PlanarTransform {
    pub fn new(offset: Vector2<f32>, rotation_deg: f32) -> Self {
        Self {
            offset,
            rotation_deg,
        }
    }

    fn turn(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.rotation_deg.to_radians())
    }

    /// Offset then rotate a single point
    pub fn apply(&self, point: &Vec3) -> Vec3 {
        self.apply_with(&self.turn(), point)
    }

    #[inline]
    fn apply_with(&self, turn: &UnitQuaternion<f32>, point: &Vec3) -> Vec3 {
        let shifted = point + Vector3::new(self.offset.x, self.offset.y, 0.0);
        turn * shifted
    }
}

impl Default for PlanarTransform {
    fn default() -> Self {
        Self::new(Vector2::zeros(), 0.0)
    }
}

/// Foreground points with their per-point area estimates
///
/// Points and areas are only ever pushed and cleared together, so both
/// sequences always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    points: Vec<Vec3>,
    areas: Vec<f32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            areas: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.areas.clear();
    }

    pub fn push(&mut self, point: Vec3, area: f32) {
        self.points.push(point);
        self.areas.push(area);
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn areas(&self) -> &[f32] {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate `(point, area)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Vec3, f32)> + '_ {
        self.points.iter().zip(self.areas.iter().copied())
    }

    /// Points dropped onto the floor plane (z = 0)
    pub fn flattened(&self) -> Vec<Vec3> {
        self.points
            .iter()
            .map(|p| Vector3::new(p.x, p.y, 0.0))
            .collect()
    }

    /// Sum of all area estimates
    pub fn total_area(&self) -> f32 {
        self.areas.iter().sum()
    }
}

/// Rebuild `mesh` from the current mask
///
/// `unproject` maps `(x, y, raw_depth)` to a sensor-native point and is
/// always fed the raw (unfiltered) depth. The area estimate is computed on
/// the unprojected pair before any transform is applied; only the left-hand
/// point of each pair is transformed and emitted.
pub fn build_mesh<U>(
    mask: &Mask,
    raw_depth: &DepthGrid,
    unproject: U,
    orientation: &Orientation,
    planar: &PlanarTransform,
    mesh: &mut Mesh,
) where
    U: Fn(usize, usize, u16) -> Vec3,
{
    debug_assert!(mask.same_size(raw_depth), "mask size differs from depth");

    mesh.clear();

    let width = mask.width();
    let height = mask.height();
    if width < 2 {
        return;
    }

    let valid = mask.as_slice();
    let depth = raw_depth.as_slice();
    let turn = planar.turn();

    for y in 0..height {
        let row = y * width;
        for x in 0..width - 1 {
            let i = row + x;
            if !(valid[i] && valid[i + 1]) {
                continue;
            }

            let current = unproject(x, y, depth[i]);
            let right = unproject(x + 1, y, depth[i + 1]);
            let area = (current - right).norm_squared();

            let oriented = orientation.apply(&current);
            mesh.push(planar.apply_with(&turn, &oriented), area);
        }
    }
}
