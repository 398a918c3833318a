// SPDX-License-Identifier: GPL-3.0-only

//! Orientation correction from a configured up direction
//!
//! The sensor looks along its native +Z axis. The installation configures the
//! direction that should be treated as "up", and every reconstructed point
//! is rotated by the shortest-arc rotation taking +Z onto that direction.

use nalgebra::{Unit, UnitQuaternion, Vector3};
use std::f32::consts::PI;
use tracing::debug;

use super::Vec3;

/// Shortest-arc rotation taking direction `from` onto direction `to`
///
/// Neither vector needs to be normalized. Parallel inputs give the identity.
/// Opposite inputs give a half turn about an axis orthogonal to `from`.
///
/// A zero-length input has no defined rotation. Callers must not pass one;
/// if they do, the identity is returned.
pub fn rotation_between(from: &Vec3, to: &Vec3) -> UnitQuaternion<f32> {
    if from.norm_squared() == 0.0 || to.norm_squared() == 0.0 {
        debug!(?from, ?to, "Rotation requested for zero-length vector");
        return UnitQuaternion::identity();
    }

    if let Some(rotation) = UnitQuaternion::rotation_between(from, to) {
        return rotation;
    }

    // Antiparallel: any axis perpendicular to `from` works
    let axis = Unit::try_new(from.cross(&Vector3::x()), f32::EPSILON)
        .or_else(|| Unit::try_new(from.cross(&Vector3::y()), f32::EPSILON))
        .unwrap_or_else(Vector3::z_axis);
    UnitQuaternion::from_axis_angle(&axis, PI)
}

/// Configured up vector and the rotation derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    up: Vec3,
    rotation: UnitQuaternion<f32>,
}

impl Orientation {
    /// Sensor-native vertical axis
    pub fn native_up() -> Vec3 {
        Vector3::z()
    }

    /// Orientation for the given up vector (must be non-zero)
    pub fn new(up: Vec3) -> Self {
        Self {
            up,
            rotation: rotation_between(&Self::native_up(), &up),
        }
    }

    /// Change the up vector
    ///
    /// The rotation is only recomputed when the vector actually changes.
    /// Returns whether it did.
    pub fn set_up(&mut self, up: Vec3) -> bool {
        if up == self.up {
            return false;
        }
        self.up = up;
        self.rotation = rotation_between(&Self::native_up(), &up);
        debug!(
            up = ?self.up,
            angle_deg = self.rotation.angle().to_degrees(),
            "Orientation updated"
        );
        true
    }

    /// Map a sensor-native point into installation coordinates
    #[inline]
    pub fn apply(&self, point: &Vec3) -> Vec3 {
        self.rotation * point
    }

    pub fn up(&self) -> &Vec3 {
        &self.up
    }

    pub fn rotation(&self) -> &UnitQuaternion<f32> {
        &self.rotation
    }

    /// Whether the rotation is the identity (up == native +Z)
    pub fn is_identity(&self) -> bool {
        self.rotation.angle() == 0.0
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::new(Self::native_up())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Vec3, b: &Vec3) {
        assert!((a - b).norm() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_native_up_is_identity() {
        let orientation = Orientation::new(Vector3::new(0.0, 0.0, 1.0));
        assert!(orientation.is_identity());

        let point = Vector3::new(12.5, -300.0, 1800.0);
        assert_eq!(orientation.apply(&point), point);
    }

    #[test]
    fn test_native_axis_maps_onto_up() {
        let up = Vector3::new(0.0, -1.0, 1.0);
        let orientation = Orientation::new(up);
        let mapped = orientation.apply(&Vector3::z());
        assert_close(&mapped, &up.normalize());
    }

    #[test]
    fn test_unnormalized_up_is_accepted() {
        let a = Orientation::new(Vector3::new(0.0, 5.0, 0.0));
        let b = Orientation::new(Vector3::new(0.0, 1.0, 0.0));
        assert_close(
            &a.apply(&Vector3::new(1.0, 2.0, 3.0)),
            &b.apply(&Vector3::new(1.0, 2.0, 3.0)),
        );
    }

    #[test]
    fn test_opposite_up_is_half_turn() {
        let orientation = Orientation::new(Vector3::new(0.0, 0.0, -1.0));
        assert_close(&orientation.apply(&Vector3::z()), &Vector3::new(0.0, 0.0, -1.0));
        assert!((orientation.rotation().angle() - PI).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let rotation = rotation_between(&Vector3::z(), &Vector3::new(0.3, 0.4, 0.5));
        let point = Vector3::new(100.0, -50.0, 2000.0);
        assert!(((rotation * point).norm() - point.norm()).abs() < 1e-2);
    }

    #[test]
    fn test_zero_vector_falls_back_to_identity() {
        let rotation = rotation_between(&Vector3::z(), &Vector3::zeros());
        assert_eq!(rotation, UnitQuaternion::identity());
        let rotation = rotation_between(&Vector3::zeros(), &Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(rotation, UnitQuaternion::identity());
    }

    #[test]
    fn test_set_up_only_recomputes_on_change() {
        let mut orientation = Orientation::default();
        assert!(!orientation.set_up(Vector3::z()));
        assert!(orientation.set_up(Vector3::y()));
        assert!(!orientation.set_up(Vector3::y()));
        assert_close(&orientation.apply(&Vector3::z()), &Vector3::y());
    }
}
