// SPDX-License-Identifier: GPL-3.0-only

//! Pinhole camera intrinsics for depth unprojection

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::kinect;
use crate::tracker::Vec3;

/// Camera intrinsics for depth-to-3D unprojection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl CameraIntrinsics {
    /// Kinect defaults scaled to the given resolution
    pub fn for_resolution(width: usize, height: usize) -> Self {
        let sx = width as f32 / kinect::BASE_WIDTH;
        let sy = height as f32 / kinect::BASE_HEIGHT;
        Self {
            fx: kinect::FX * sx,
            fy: kinect::FY * sy,
            cx: kinect::CX * sx,
            cy: kinect::CY * sy,
        }
    }

    /// Unproject pixel `(x, y)` at depth `depth_mm`
    ///
    /// The result is in millimetres with +Z pointing away from the sensor.
    #[inline]
    pub fn unproject(&self, x: usize, y: usize, depth_mm: u16) -> Vec3 {
        let z = f32::from(depth_mm);
        Vector3::new(
            (x as f32 - self.cx) * z / self.fx,
            (y as f32 - self.cy) * z / self.fy,
            z,
        )
    }
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self {
            fx: kinect::FX,
            fy: kinect::FY,
            cx: kinect::CX,
            cy: kinect::CY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_resolution_matches_defaults() {
        assert_eq!(CameraIntrinsics::for_resolution(640, 480), CameraIntrinsics::default());
    }

    #[test]
    fn test_adjacent_pixels_spacing_scales_with_depth() {
        let intrinsics = CameraIntrinsics::default();
        let near = intrinsics.unproject(101, 50, 1000) - intrinsics.unproject(100, 50, 1000);
        let far = intrinsics.unproject(101, 50, 2000) - intrinsics.unproject(100, 50, 2000);
        assert!((near.x - 1000.0 / kinect::FX).abs() < 1e-3);
        assert!((far.x - 2.0 * near.x).abs() < 1e-3);
        assert_eq!(near.y, 0.0);
    }

    #[test]
    fn test_zero_depth_collapses_to_origin() {
        let p = CameraIntrinsics::default().unproject(0, 0, 0);
        assert_eq!(p.norm(), 0.0);
    }
}
