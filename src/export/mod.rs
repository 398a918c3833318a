// SPDX-License-Identifier: GPL-3.0-only

//! Writing tracker state to disk
//!
//! - [`las`]: foreground mesh as a LAS point cloud
//! - [`images`]: background, mask and presence PNGs

pub mod images;
pub mod las;

pub use images::{save_depth_png, save_mask_png, save_presence_png};
pub use las::export_mesh_las;
