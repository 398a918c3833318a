// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for offline tracking
//!
//! This module provides command-line functionality for:
//! - Replaying a depth recording through the tracker
//! - Writing synthetic recordings
//! - Inspecting recordings and the configuration

use chrono::Local;
use depth_tracker::backends::depth::{CameraIntrinsics, RecordingSource, RecordingWriter};
use depth_tracker::constants::{app_info, recording};
use depth_tracker::export;
use depth_tracker::tracker::{CalibrationWindow, DepthGrid, Grid};
use depth_tracker::{Config, DepthPipeline, DepthSource, PresenceMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Frame rate assumed for recording time when playback is unpaced
const NOMINAL_FPS: f64 = 30.0;

/// Sleep between polls while waiting for a paced frame
const IDLE_POLL: Duration = Duration::from_millis(2);

/// Synthetic scene depths (millimetres)
const SYNTH_WALL_MM: u16 = 3000;
const SYNTH_BOX_MM: u16 = 1500;

pub struct ReplayOptions {
    pub recording: PathBuf,
    pub config: Option<PathBuf>,
    pub calibrate_secs: Option<f32>,
    pub threshold: Option<u16>,
    pub fps: Option<f64>,
    pub looping: bool,
    pub export_dir: Option<PathBuf>,
}

/// Run the tracker over a recording and export the final state
pub fn replay(options: ReplayOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match options.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    if let Some(secs) = options.calibrate_secs {
        config.calibration_secs = secs;
    }
    if let Some(threshold) = options.threshold {
        config.tracker.threshold = threshold;
    }
    if options.fps.is_some() {
        config.playback_fps = options.fps;
    }
    config.validate()?;

    let mut source = RecordingSource::open(&options.recording)?.with_looping(options.looping);
    if let Some(fps) = config.playback_fps {
        source = source.with_fps(fps);
    }
    let intrinsics = config
        .intrinsics
        .unwrap_or_else(|| CameraIntrinsics::for_resolution(source.width(), source.height()));
    let source = source.with_intrinsics(intrinsics);

    println!("Recording: {}", options.recording.display());
    println!(
        "Frames: {} at {}x{}",
        source.frame_count(),
        source.width(),
        source.height()
    );
    println!(
        "Calibration: {:.1}s, threshold: {}mm",
        config.calibration_secs, config.tracker.threshold
    );

    let mut pipeline = DepthPipeline::new(source, config.filter.build());
    let mut presence = PresenceMap::new(config.stage_size_mm, config.presence_cells);

    // Calibration follows recording time (frame slot over fps) so unpaced
    // replays learn the same frames as paced ones
    let slot_fps = config.playback_fps.unwrap_or(NOMINAL_FPS);
    let clock_start = Instant::now();
    let mut calibration = CalibrationWindow::new(Duration::from_secs_f32(config.calibration_secs));
    calibration.begin(clock_start);
    pipeline.request_clear_background();

    // Set up Ctrl+C handler
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    if options.looping {
        println!("Looping... (press Ctrl+C to stop)");
    }

    let mut settings = config.tracker;
    loop {
        if stop_flag.load(Ordering::SeqCst) {
            println!();
            println!("Stopping...");
            break;
        }

        let slot = pipeline.source().slot_at(Instant::now());
        let recording_time = Duration::from_secs_f64(slot as f64 / slot_fps);
        settings.calibrating = calibration.is_active(clock_start + recording_time);

        if !pipeline.update(&settings) {
            if pipeline.source().is_finished() {
                break;
            }
            std::thread::sleep(IDLE_POLL);
            continue;
        }

        if pipeline.is_frame_new() {
            let landed = presence.accumulate(pipeline.mesh());
            info!(
                frame = pipeline.frames_processed(),
                calibrating = settings.calibrating,
                points = pipeline.mesh().len(),
                area = pipeline.mesh().total_area(),
                on_stage = landed,
                "Mesh updated"
            );
            print!(
                "\rFrame {:>6}: {:>7} points{}",
                pipeline.frames_processed(),
                pipeline.mesh().len(),
                if settings.calibrating {
                    " (calibrating)"
                } else {
                    ""
                }
            );
            std::io::Write::flush(&mut std::io::stdout())?;
        }
    }
    println!();

    println!("Processed {} frames", pipeline.frames_processed());
    println!(
        "Background: {} of {} pixels learned",
        pipeline.background().learned_pixels(),
        pipeline.background().depth().len()
    );

    let base_dir = options.export_dir.unwrap_or_else(|| PathBuf::from("."));
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let output_dir = base_dir.join(format!("{}_{}", app_info::APP_ID, timestamp));
    std::fs::create_dir_all(&output_dir)?;

    if pipeline.mesh().is_empty() {
        warn!("Final frame has no foreground, skipping mesh export");
        println!("No foreground in the final frame, mesh not exported");
    } else {
        export::export_mesh_las(pipeline.mesh(), &output_dir.join("mesh.las"))?;
    }
    export::save_depth_png(
        pipeline.background().depth(),
        &output_dir.join("background.png"),
    )?;
    export::save_mask_png(pipeline.mask(), &output_dir.join("mask.png"))?;
    export::save_presence_png(&presence, &output_dir.join("presence.png"))?;

    println!("Exported: {}", output_dir.display());
    Ok(())
}

/// Write a synthetic recording: a flat back wall, empty for the first half,
/// then a box sweeping left to right in front of it
pub fn synth(
    output: &Path,
    width: usize,
    height: usize,
    frames: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    if width < 2 || height < 1 {
        return Err(format!("Frame size {}x{} is too small", width, height).into());
    }
    if frames == 0 {
        return Err("A recording needs at least one frame".into());
    }

    let output = if output.extension().is_none() {
        output.with_extension(recording::EXTENSION)
    } else {
        output.to_path_buf()
    };
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = RecordingWriter::create(&output, width, height)?;
    let empty_frames = frames / 2;
    let moving_frames = frames - empty_frames;
    let box_width = (width / 4).max(1);
    let box_height = (height / 3).max(1);
    let top = (height - box_height) / 2;

    let mut frame: DepthGrid = Grid::new(width, height);
    for index in 0..frames {
        frame.fill(SYNTH_WALL_MM);
        // Sensor shadow along the left edge
        for y in 0..height {
            let i = frame.index(0, y);
            frame.as_mut_slice()[i] = 0;
        }

        if index >= empty_frames {
            let step = index - empty_frames;
            let travel = width - box_width;
            let left = if moving_frames > 1 {
                travel * step / (moving_frames - 1)
            } else {
                0
            };
            for y in top..top + box_height {
                for x in left..left + box_width {
                    let i = frame.index(x, y);
                    frame.as_mut_slice()[i] = SYNTH_BOX_MM;
                }
            }
        }

        writer.write_frame(&frame)?;
    }
    let written = writer.finish()?;

    println!(
        "Wrote {} frames ({}x{}) to {}",
        written,
        width,
        height,
        output.display()
    );
    Ok(())
}

/// Print a recording's header and length
pub fn info(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = RecordingSource::open(path)?;
    let header = source.header();
    let frames = source.frame_count();

    println!("Recording: {}", source.path().display());
    println!("  Format version: {}", header.version);
    println!("  Resolution: {}x{}", header.width, header.height);
    println!("  Frames: {}", frames);
    println!(
        "  Duration: {:.1}s at {}fps",
        frames as f64 / NOMINAL_FPS,
        NOMINAL_FPS
    );
    println!("{} {}", app_info::APP_ID, app_info::version());
    Ok(())
}

/// Print the default configuration, or write it to the default path
pub fn config(write: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    if !write {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let path = Config::default_path().ok_or("No config directory available")?;
    if path.exists() {
        return Err(format!("{} already exists", path.display()).into());
    }
    config.save(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
