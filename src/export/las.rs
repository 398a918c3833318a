// SPDX-License-Identifier: GPL-3.0-only

//! LAS point cloud export
//!
//! Writes the foreground mesh as an uncompressed LAS 1.4 point cloud in
//! millimetres. The area estimate is stored in the intensity channel so the
//! density weighting survives the export.

use las::{Builder, Point, Writer};
use std::path::Path;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::tracker::Mesh;

/// Area (mm²) mapped to full-scale intensity
const INTENSITY_FULL_SCALE_AREA: f32 = 100.0;

/// Map an area estimate onto the 16-bit intensity range
fn area_to_intensity(area: f32) -> u16 {
    let t = (area / INTENSITY_FULL_SCALE_AREA).clamp(0.0, 1.0);
    (t * f32::from(u16::MAX)).round() as u16
}

/// Export the mesh as a LAS file
///
/// An empty mesh is reported as an error since LAS needs bounds.
pub fn export_mesh_las(mesh: &Mesh, output_path: &Path) -> AppResult<()> {
    if mesh.is_empty() {
        return Err(AppError::Export("No foreground points to export".to_string()));
    }

    info!(
        point_count = mesh.len(),
        path = %output_path.display(),
        "Exporting mesh point cloud"
    );

    // Centre the quantization offsets on the cloud's bounds
    let (min, max) = mesh.points().iter().fold(
        ([f64::MAX; 3], [f64::MIN; 3]),
        |(mut min, mut max), p| {
            for axis in 0..3 {
                let v = f64::from(p[axis]);
                min[axis] = min[axis].min(v);
                max[axis] = max[axis].max(v);
            }
            (min, max)
        },
    );

    let mut builder = Builder::from((1, 4)); // LAS 1.4
    builder.point_format.is_compressed = false;

    let scale = 1.0; // 1mm precision, coordinates are already millimetres
    builder.transforms = las::Vector {
        x: las::Transform {
            scale,
            offset: (min[0] + max[0]) / 2.0,
        },
        y: las::Transform {
            scale,
            offset: (min[1] + max[1]) / 2.0,
        },
        z: las::Transform {
            scale,
            offset: (min[2] + max[2]) / 2.0,
        },
    };

    let header = builder
        .into_header()
        .map_err(|e| AppError::Export(format!("Failed to build LAS header: {}", e)))?;

    let mut writer = Writer::from_path(output_path, header)
        .map_err(|e| AppError::Export(format!("Failed to create LAS writer: {}", e)))?;

    for (p, area) in mesh.iter() {
        let mut point = Point::default();
        point.x = f64::from(p.x);
        point.y = f64::from(p.y);
        point.z = f64::from(p.z);
        point.intensity = area_to_intensity(area);

        writer
            .write_point(point)
            .map_err(|e| AppError::Export(format!("Failed to write point: {}", e)))?;
    }

    writer
        .close()
        .map_err(|e| AppError::Export(format!("Failed to close LAS file: {}", e)))?;

    debug!(path = %output_path.display(), "LAS export complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_to_intensity_clamps() {
        assert_eq!(area_to_intensity(-1.0), 0);
        assert_eq!(area_to_intensity(0.0), 0);
        assert_eq!(area_to_intensity(INTENSITY_FULL_SCALE_AREA), u16::MAX);
        assert_eq!(area_to_intensity(1e9), u16::MAX);
        assert!(area_to_intensity(INTENSITY_FULL_SCALE_AREA / 2.0) > 30000);
    }

    #[test]
    fn test_empty_mesh_is_rejected() {
        let path = std::env::temp_dir().join("depth_tracker_empty_mesh.las");
        assert!(matches!(
            export_mesh_las(&Mesh::new(), &path),
            Err(AppError::Export(_))
        ));
    }
}
