// SPDX-License-Identifier: GPL-3.0-only

//! Learned static background
//!
//! Each pixel holds the resting depth seen while calibrating. A value of 0
//! means nothing has been learned for that pixel yet, and the classifier
//! then treats any reading there as foreground.

use super::grid::{DepthGrid, Grid};

/// Per-pixel learned background depth (millimetres, 0 = unlearned)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundModel {
    depth: DepthGrid,
}

impl BackgroundModel {
    /// Create an empty (all unlearned) background
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            depth: Grid::new(width, height),
        }
    }

    /// Forget everything learned so far
    pub fn clear(&mut self) {
        self.depth.fill(0);
    }

    /// Fold one calibration frame into the background
    ///
    /// Pixels without a reading are skipped. The first reading for a pixel
    /// is stored as-is; later readings are averaged with the stored value
    /// (integer mean, rounded down).
    pub fn accumulate(&mut self, frame: &DepthGrid) {
        debug_assert!(self.depth.same_size(frame), "frame size differs");

        for (stored, &sample) in self
            .depth
            .as_mut_slice()
            .iter_mut()
            .zip(frame.as_slice())
        {
            if sample == 0 {
                continue;
            }
            *stored = if *stored == 0 {
                sample
            } else {
                ((u32::from(*stored) + u32::from(sample)) / 2) as u16
            };
        }
    }

    /// Whether no pixel has a learned background
    pub fn is_empty(&self) -> bool {
        self.depth.as_slice().iter().all(|&d| d == 0)
    }

    /// Number of pixels with a learned background
    pub fn learned_pixels(&self) -> usize {
        self.depth.as_slice().iter().filter(|&&d| d != 0).count()
    }

    pub fn depth(&self) -> &DepthGrid {
        &self.depth
    }

    pub fn width(&self) -> usize {
        self.depth.width()
    }

    pub fn height(&self) -> usize {
        self.depth.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(values: &[u16]) -> DepthGrid {
        Grid::from_vec(values.len(), 1, values.to_vec()).unwrap()
    }

    #[test]
    fn test_first_observation_is_stored() {
        let mut background = BackgroundModel::new(3, 1);
        background.accumulate(&frame(&[100, 0, 2500]));
        assert_eq!(background.depth().as_slice(), &[100, 0, 2500]);
        assert_eq!(background.learned_pixels(), 2);
    }

    #[test]
    fn test_subsequent_observations_are_averaged() {
        let mut background = BackgroundModel::new(2, 1);
        background.accumulate(&frame(&[100, 1000]));
        background.accumulate(&frame(&[201, 3000]));
        // (100 + 201) / 2 rounds down
        assert_eq!(background.depth().as_slice(), &[150, 2000]);
    }

    #[test]
    fn test_dropouts_do_not_disturb_background() {
        let mut background = BackgroundModel::new(2, 1);
        background.accumulate(&frame(&[800, 900]));
        background.accumulate(&frame(&[0, 0]));
        assert_eq!(background.depth().as_slice(), &[800, 900]);
    }

    #[test]
    fn test_average_does_not_overflow() {
        let mut background = BackgroundModel::new(1, 1);
        background.accumulate(&frame(&[u16::MAX]));
        background.accumulate(&frame(&[u16::MAX - 1]));
        assert_eq!(background.depth().as_slice(), &[u16::MAX - 1]);
    }

    #[test]
    fn test_clear_restarts_learning() {
        let mut background = BackgroundModel::new(2, 1);
        background.accumulate(&frame(&[500, 700]));
        background.clear();
        assert!(background.is_empty());

        // After a clear the next sample is taken verbatim, not averaged
        background.accumulate(&frame(&[1200, 0]));
        assert_eq!(background.depth().as_slice(), &[1200, 0]);
    }
}
