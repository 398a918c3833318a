// SPDX-License-Identifier: GPL-3.0-only

//! Foreground classification
//!
//! A pixel is foreground when it has a reading and either no background has
//! been learned for it, or its depth differs from the background by strictly
//! more than the threshold.

use super::background::BackgroundModel;
use super::grid::{DepthGrid, Mask};

/// Classify a single pixel
///
/// With an all-zero background (no calibration performed yet) every pixel
/// that has a reading is foreground. A difference exactly equal to
/// `threshold` is not foreground.
#[inline]
pub fn classify(depth: u16, background: u16, threshold: u16) -> bool {
    depth > 0 && (background == 0 || depth.abs_diff(background) > threshold)
}

/// Recompute the whole mask for the current frame
pub fn classify_frame(
    depth: &DepthGrid,
    background: &BackgroundModel,
    threshold: u16,
    mask: &mut Mask,
) {
    debug_assert!(mask.same_size(depth), "mask size differs from frame");
    debug_assert!(
        mask.same_size(background.depth()),
        "mask size differs from background"
    );

    for ((valid, &d), &b) in mask
        .as_mut_slice()
        .iter_mut()
        .zip(depth.as_slice())
        .zip(background.depth().as_slice())
    {
        *valid = classify(d, b, threshold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::grid::Grid;

    #[test]
    fn test_no_reading_is_never_foreground() {
        for background in [0u16, 1, 500, u16::MAX] {
            for threshold in [0u16, 10, u16::MAX] {
                assert!(!classify(0, background, threshold));
            }
        }
    }

    #[test]
    fn test_unlearned_background_is_foreground() {
        assert!(classify(1, 0, u16::MAX));
        assert!(classify(3000, 0, 0));
    }

    #[test]
    fn test_threshold_is_strict() {
        // |1050 - 1000| == 50 is not strictly greater than 50
        assert!(!classify(1050, 1000, 50));
        assert!(!classify(950, 1000, 50));
        assert!(classify(1051, 1000, 50));
        assert!(classify(949, 1000, 50));
    }

    #[test]
    fn test_classify_frame_overwrites_previous_mask() {
        let depth = Grid::from_vec(4, 1, vec![0u16, 100, 200, 300]).unwrap();
        let mut background = BackgroundModel::new(4, 1);
        background.accumulate(&Grid::from_vec(4, 1, vec![100u16, 100, 100, 0]).unwrap());

        let mut mask = Mask::filled(4, 1, true);
        classify_frame(&depth, &background, 50, &mut mask);
        assert_eq!(mask.as_slice(), &[false, false, true, true]);
    }
}
