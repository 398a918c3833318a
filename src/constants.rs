// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Depth sensor constants
///
/// All depth range and visualization constants live here and are shared by
/// the noise filter, the exporters and the synthetic recording generator.
pub mod depth {
    /// Kinect sensor depth range limits (millimeters)
    /// Based on Xbox Kinect v1 sensor specifications
    pub const DEPTH_MIN_MM: u16 = 400;
    pub const DEPTH_MAX_MM: u16 = 4000;

    /// Sample value meaning "no reading"
    pub const DEPTH_INVALID_MM: u16 = 0;

    /// Default foreground threshold (millimetres)
    pub const DEFAULT_THRESHOLD_MM: u16 = 10;

    /// Number of quantization bands for depth colormap visualization
    pub const DEPTH_COLORMAP_BANDS: f32 = 32.0;
}

/// Kinect camera intrinsics
///
/// Reference resolution: 640x480 (medium resolution depth mode). Sources at
/// other resolutions scale these proportionally.
pub mod kinect {
    /// Focal length X (pixels) at 640x480 base resolution
    pub const FX: f32 = 594.21;
    /// Focal length Y (pixels) at 640x480 base resolution
    pub const FY: f32 = 591.04;
    /// Principal point X (pixels) at 640x480 base resolution
    pub const CX: f32 = 339.5;
    /// Principal point Y (pixels) at 640x480 base resolution
    pub const CY: f32 = 242.7;

    /// Base width for intrinsics calculation
    pub const BASE_WIDTH: f32 = 640.0;
    /// Base height for intrinsics calculation
    pub const BASE_HEIGHT: f32 = 480.0;
}

/// Raw depth recording file format
pub mod recording {
    /// File magic at the start of every recording
    pub const MAGIC: [u8; 4] = *b"DPTH";
    /// Current format version
    pub const VERSION: u32 = 1;
    /// Preferred file extension
    pub const EXTENSION: &str = "depth";
    /// Largest accepted frame (16384 x 16384 samples)
    pub const MAX_FRAME_PIXELS: u64 = 16384 * 16384;
}

/// Installation defaults
pub mod stage {
    /// Side of the square stage floor (15'8" in millimetres)
    pub const STAGE_SIZE_MM: f32 = 4775.2;
    /// Presence map resolution (cells per side)
    pub const PRESENCE_CELLS: usize = 64;
    /// Default calibration window after start-up
    pub const CALIBRATION_SECS: f32 = 3.0;
}

/// Application metadata
pub mod app_info {
    /// Application identifier used for the config directory
    pub const APP_ID: &str = "depth-tracker";

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}
