// SPDX-License-Identifier: GPL-3.0-only

//! Foreground tracking core
//!
//! Learns a static background from calibration frames, classifies each new
//! frame against it, and rebuilds the foreground as an oriented point/strip
//! mesh with per-point area estimates.
//!
//! - [`background`]: per-pixel learned background depth
//! - [`classifier`]: per-pixel foreground rule
//! - [`orientation`]: up-vector correction
//! - [`mesh`]: mesh reconstruction and planar placement
//! - [`pipeline`]: per-frame lifecycle tying it all together
//! - [`calibration`]: timed calibration windows
//! - [`presence`]: area-weighted floor occupancy

pub mod background;
pub mod calibration;
pub mod classifier;
pub mod grid;
pub mod mesh;
pub mod orientation;
pub mod pipeline;
pub mod presence;

pub use background::BackgroundModel;
pub use calibration::CalibrationWindow;
pub use classifier::{classify, classify_frame};
pub use grid::{DepthGrid, Grid, Mask};
pub use mesh::{Mesh, PlanarTransform, build_mesh};
pub use orientation::{Orientation, rotation_between};
pub use pipeline::{DepthPipeline, FrameSettings};
pub use presence::PresenceMap;

/// 3D point or direction (millimetres where it is a position)
pub type Vec3 = nalgebra::Vector3<f32>;
