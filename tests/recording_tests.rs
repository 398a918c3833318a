// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for recordings driving the pipeline

use depth_tracker::backends::depth::{PassthroughFilter, RecordingSource, RecordingWriter};
use depth_tracker::tracker::{DepthGrid, Grid};
use depth_tracker::{DepthPipeline, FrameSettings, PresenceMap};
use std::path::PathBuf;

fn temp_recording() -> PathBuf {
    std::env::temp_dir().join(format!("depth_tracker_{}.depth", uuid::Uuid::new_v4()))
}

#[test]
fn test_recording_drives_pipeline() {
    let path = temp_recording();
    let (width, height) = (6, 4);

    let mut writer = RecordingWriter::create(&path, width, height).unwrap();
    writer.write_frame(&Grid::filled(width, height, 2000)).unwrap();
    writer.write_frame(&Grid::filled(width, height, 2000)).unwrap();
    // Something steps into the middle two columns
    let mut frame: DepthGrid = Grid::filled(width, height, 2000);
    for y in 0..height {
        for x in 2..4 {
            let i = frame.index(x, y);
            frame.as_mut_slice()[i] = 1200;
        }
    }
    writer.write_frame(&frame).unwrap();
    assert_eq!(writer.finish().unwrap(), 3);

    let source = RecordingSource::open(&path).unwrap();
    assert_eq!(source.frame_count(), 3);
    let mut pipeline = DepthPipeline::new(source, PassthroughFilter);

    let calibrate = FrameSettings {
        calibrating: true,
        threshold: 10,
        ..FrameSettings::default()
    };
    let track = FrameSettings {
        calibrating: false,
        ..calibrate
    };

    assert!(pipeline.update(&calibrate));
    assert!(pipeline.update(&track));
    assert!(pipeline.mesh_points().is_empty());

    assert!(pipeline.update(&track));
    assert_eq!(pipeline.mask().count_valid(), 2 * height);
    // One pair per row between columns 2 and 3
    assert_eq!(pipeline.mesh_points().len(), height);

    let mut presence = PresenceMap::new(10_000.0, 8);
    assert_eq!(presence.accumulate(pipeline.mesh()), height);
    assert!(presence.total() > 0.0);

    assert!(!pipeline.update(&track));
    assert!(pipeline.source().is_finished());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_size_mismatch_is_rejected() {
    let path = temp_recording();
    let mut writer = RecordingWriter::create(&path, 4, 4).unwrap();
    assert!(writer.write_frame(&Grid::filled(3, 4, 100)).is_err());
    std::fs::remove_file(path).ok();
}
