// SPDX-License-Identifier: GPL-3.0-only

//! Diagnostic images
//!
//! Renders the learned background, the foreground mask and the presence map
//! so an operator can check calibration:
//! - Turbo colormap for depth (blue=near, red=far)
//! - White-on-black for the mask
//! - Grayscale for presence (bright = more area)

use image::{GrayImage, RgbaImage};
use std::path::Path;
use tracing::debug;

use crate::constants::depth::{DEPTH_COLORMAP_BANDS, DEPTH_MAX_MM, DEPTH_MIN_MM};
use crate::errors::{AppError, AppResult};
use crate::tracker::grid::{DepthGrid, Mask};
use crate::tracker::presence::PresenceMap;

/// Turbo colormap: perceptually uniform rainbow (blue=near, red=far)
///
/// Based on: https://ai.googleblog.com/2019/08/turbo-improved-rainbow-colormap-for.html
/// Simplified version with polynomial approximation.
#[inline]
fn turbo(t: f32) -> [u8; 4] {
    let r = (0.13572138
        + t * (4.6153926 + t * (-42.66032 + t * (132.13108 + t * (-152.54825 + t * 59.28144)))))
        .clamp(0.0, 1.0);
    let g = (0.09140261
        + t * (2.19418 + t * (4.84296 + t * (-14.18503 + t * (4.27805 + t * 2.53377)))))
        .clamp(0.0, 1.0);
    let b = (0.1066733
        + t * (12.64194 + t * (-60.58204 + t * (109.99648 + t * (-82.52904 + t * 20.43388)))))
        .clamp(0.0, 1.0);
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8, 255]
}

/// Colour a depth grid; pixels without a value are black
///
/// With `quantize`, depth is banded for easier reading of contours.
pub fn depth_to_rgba(depth: &DepthGrid, quantize: bool) -> Vec<u8> {
    let min = f32::from(DEPTH_MIN_MM);
    let max = f32::from(DEPTH_MAX_MM);

    let mut rgba = Vec::with_capacity(depth.len() * 4);
    for &d in depth.as_slice() {
        if d == 0 {
            rgba.extend_from_slice(&[0, 0, 0, 255]);
            continue;
        }
        let mut t = ((f32::from(d) - min) / (max - min)).clamp(0.0, 1.0);
        if quantize {
            t = (t * DEPTH_COLORMAP_BANDS).floor() / DEPTH_COLORMAP_BANDS;
        }
        rgba.extend_from_slice(&turbo(t));
    }
    rgba
}

/// Mask as 8-bit luminance (255 = foreground)
pub fn mask_to_gray(mask: &Mask) -> Vec<u8> {
    mask.as_slice()
        .iter()
        .map(|&valid| if valid { 255 } else { 0 })
        .collect()
}

/// Presence map as 8-bit luminance, normalized to its peak
pub fn presence_to_gray(presence: &PresenceMap) -> Vec<u8> {
    presence
        .normalized()
        .as_slice()
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect()
}

pub fn save_depth_png(depth: &DepthGrid, path: &Path) -> AppResult<()> {
    let image = RgbaImage::from_raw(
        depth.width() as u32,
        depth.height() as u32,
        depth_to_rgba(depth, true),
    )
    .ok_or_else(|| AppError::Export("Failed to create depth image".to_string()))?;
    image
        .save(path)
        .map_err(|e| AppError::Export(format!("Failed to save depth PNG: {}", e)))?;
    debug!(path = %path.display(), "Saved depth image");
    Ok(())
}

pub fn save_mask_png(mask: &Mask, path: &Path) -> AppResult<()> {
    save_gray(mask.width(), mask.height(), mask_to_gray(mask), path)
}

pub fn save_presence_png(presence: &PresenceMap, path: &Path) -> AppResult<()> {
    let cells = presence.cells();
    save_gray(
        cells.width(),
        cells.height(),
        presence_to_gray(presence),
        path,
    )
}

fn save_gray(width: usize, height: usize, data: Vec<u8>, path: &Path) -> AppResult<()> {
    let image = GrayImage::from_raw(width as u32, height as u32, data)
        .ok_or_else(|| AppError::Export("Failed to create grayscale image".to_string()))?;
    image
        .save(path)
        .map_err(|e| AppError::Export(format!("Failed to save PNG: {}", e)))?;
    debug!(path = %path.display(), "Saved grayscale image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::grid::Grid;

    #[test]
    fn test_missing_depth_is_black() {
        let rgba = depth_to_rgba(&Grid::new(2, 2), false);
        for chunk in rgba.chunks(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_near_is_blue_far_is_red() {
        let depth = Grid::from_vec(2, 1, vec![DEPTH_MIN_MM, DEPTH_MAX_MM]).unwrap();
        let rgba = depth_to_rgba(&depth, false);
        // Near: blue dominates red
        assert!(rgba[2] > rgba[0]);
        // Far: red dominates blue
        assert!(rgba[4] > rgba[6]);
    }

    #[test]
    fn test_mask_to_gray() {
        let mask = Grid::from_vec(3, 1, vec![true, false, true]).unwrap();
        assert_eq!(mask_to_gray(&mask), vec![255, 0, 255]);
    }
}
