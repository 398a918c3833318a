// SPDX-License-Identifier: GPL-3.0-only

//! Scripted playback of in-memory depth frames
//!
//! Delivers a fixed list of frames, one per poll, for deterministic tests
//! and demos. Once the script is exhausted the source never reports a new
//! frame again, so pipeline updates become no-ops.

use std::collections::VecDeque;

use tracing::debug;

use super::{CameraIntrinsics, DepthSource};
use crate::errors::SourceError;
use crate::tracker::Vec3;
use crate::tracker::grid::{DepthGrid, Grid};

/// In-memory depth source playing back scripted frames
#[derive(Debug, Clone)]
pub struct PlaybackSource {
    width: usize,
    height: usize,
    intrinsics: CameraIntrinsics,
    pending: VecDeque<DepthGrid>,
    current: DepthGrid,
    delivered: usize,
}

impl PlaybackSource {
    /// Empty source with Kinect intrinsics scaled to the resolution
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_intrinsics(width, height, CameraIntrinsics::for_resolution(width, height))
    }

    pub fn with_intrinsics(width: usize, height: usize, intrinsics: CameraIntrinsics) -> Self {
        Self {
            width,
            height,
            intrinsics,
            pending: VecDeque::new(),
            current: Grid::new(width, height),
            delivered: 0,
        }
    }

    /// Queue a frame for a later poll
    pub fn push_frame(&mut self, frame: DepthGrid) -> Result<(), SourceError> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(SourceError::DimensionMismatch {
                expected: (self.width, self.height),
                actual: (frame.width(), frame.height()),
            });
        }
        self.pending.push_back(frame);
        Ok(())
    }

    /// Queue a frame with every pixel at `depth_mm`
    pub fn push_uniform(&mut self, depth_mm: u16) {
        self.pending
            .push_back(Grid::filled(self.width, self.height, depth_mm));
    }

    /// Frames still waiting to be delivered
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Frames delivered so far
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }
}

impl DepthSource for PlaybackSource {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn has_new_frame(&mut self) -> bool {
        match self.pending.pop_front() {
            Some(frame) => {
                self.current = frame;
                self.delivered += 1;
                debug!(frame = self.delivered, "Playback frame delivered");
                true
            }
            None => false,
        }
    }

    fn depth_grid(&self) -> &DepthGrid {
        &self.current
    }

    fn world_coordinate_at(&self, x: usize, y: usize, raw: u16) -> Vec3 {
        self.intrinsics.unproject(x, y, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_delivered_in_order_once() {
        let mut source = PlaybackSource::new(2, 2);
        source.push_uniform(100);
        source.push_uniform(200);

        assert!(source.has_new_frame());
        assert_eq!(source.depth_grid().as_slice(), &[100; 4]);
        assert!(source.has_new_frame());
        assert_eq!(source.depth_grid().as_slice(), &[200; 4]);

        // Exhausted: the last frame stays current
        assert!(!source.has_new_frame());
        assert_eq!(source.depth_grid().as_slice(), &[200; 4]);
        assert_eq!(source.delivered(), 2);
    }

    #[test]
    fn test_push_rejects_wrong_dimensions() {
        let mut source = PlaybackSource::new(4, 3);
        let result = source.push_frame(Grid::new(3, 4));
        assert!(matches!(
            result,
            Err(SourceError::DimensionMismatch {
                expected: (4, 3),
                actual: (3, 4)
            })
        ));
        assert_eq!(source.remaining(), 0);
    }
}
