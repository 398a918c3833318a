// SPDX-License-Identifier: GPL-3.0-only

//! Depth Tracker - foreground tracking for overhead depth cameras
//!
//! Learns the static scene from a few seconds of calibration, then turns
//! everything that differs from it into an oriented point/strip mesh with a
//! per-point area estimate.
//!
//! # Architecture
//!
//! - [`backends`]: depth sources (recordings, scripted playback) and noise filters
//! - [`tracker`]: background model, classifier, orientation, mesh and pipeline
//! - [`export`]: LAS point clouds and diagnostic images
//! - [`config`]: user configuration handling
//!
//! # Example
//!
//! ```
//! use depth_tracker::backends::depth::{PassthroughFilter, PlaybackSource};
//! use depth_tracker::{DepthPipeline, FrameSettings};
//!
//! let mut source = PlaybackSource::new(4, 2);
//! source.push_uniform(1000);
//! source.push_uniform(800);
//!
//! let mut pipeline = DepthPipeline::new(source, PassthroughFilter);
//! let calibrate = FrameSettings { calibrating: true, threshold: 10, ..Default::default() };
//! pipeline.update(&calibrate);
//! pipeline.update(&FrameSettings { calibrating: false, ..calibrate });
//! assert_eq!(pipeline.mesh_points().len(), 2 * 3);
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod export;
pub mod tracker;

// Re-export commonly used types
pub use backends::depth::{DepthSource, NoiseFilter};
pub use config::Config;
pub use errors::{AppError, AppResult, SourceError};
pub use tracker::{DepthPipeline, FrameSettings, Mesh, PresenceMap, Vec3};
