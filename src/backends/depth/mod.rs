// SPDX-License-Identifier: GPL-3.0-only

//! Depth sources and noise filters
//!
//! A [`DepthSource`] delivers raw depth grids and knows how to unproject a
//! pixel into sensor-native 3D space. Sources are polled: the pipeline asks
//! once per tick whether a new frame is available and never blocks waiting
//! for one.

mod filter;
mod intrinsics;
mod playback;
mod recording;

pub use filter::{NoiseFilter, PassthroughFilter, RangeFilter};
pub use intrinsics::CameraIntrinsics;
pub use playback::PlaybackSource;
pub use recording::{RecordingHeader, RecordingSource, RecordingWriter};

use crate::tracker::Vec3;
use crate::tracker::grid::DepthGrid;

/// Anything that produces depth frames
///
/// Grid dimensions are fixed for the lifetime of the source.
pub trait DepthSource {
    /// Frame width in pixels
    fn width(&self) -> usize;

    /// Frame height in pixels
    fn height(&self) -> usize;

    /// Non-blocking check for a new frame
    ///
    /// Returns `true` at most once per delivered frame; the frame then
    /// becomes the current [`depth_grid`](Self::depth_grid). Sources that run
    /// in real time only report the most recent frame, so frames arriving
    /// between two polls are dropped.
    fn has_new_frame(&mut self) -> bool;

    /// Current raw depth grid (millimetres, 0 = no reading)
    fn depth_grid(&self) -> &DepthGrid;

    /// Unproject pixel `(x, y)` with raw depth `raw` into sensor space
    fn world_coordinate_at(&self, x: usize, y: usize, raw: u16) -> Vec3;
}

impl<S: DepthSource + ?Sized> DepthSource for Box<S> {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn has_new_frame(&mut self) -> bool {
        (**self).has_new_frame()
    }

    fn depth_grid(&self) -> &DepthGrid {
        (**self).depth_grid()
    }

    fn world_coordinate_at(&self, x: usize, y: usize, raw: u16) -> Vec3 {
        (**self).world_coordinate_at(x, y, raw)
    }
}
