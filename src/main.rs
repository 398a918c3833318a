// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "depth-tracker")]
#[command(about = "Foreground tracking for overhead depth cameras")]
#[command(version = depth_tracker::constants::app_info::version())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tracker over a depth recording
    Replay {
        /// Recording to play back
        recording: PathBuf,

        /// Config file (default: ~/.config/depth-tracker/config.json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Calibration length in seconds of recording time
        #[arg(long)]
        calibrate_secs: Option<f32>,

        /// Foreground threshold in millimetres
        #[arg(short, long)]
        threshold: Option<u16>,

        /// Pace playback at this frame rate (default: as fast as possible)
        #[arg(long)]
        fps: Option<f64>,

        /// Loop the recording until Ctrl+C
        #[arg(short, long = "loop")]
        looping: bool,

        /// Directory for the export folder (default: current directory)
        #[arg(short, long)]
        export_dir: Option<PathBuf>,
    },

    /// Write a synthetic recording (back wall with a box moving across)
    Synth {
        /// Output recording path
        output: PathBuf,

        #[arg(long, default_value = "160")]
        width: usize,

        #[arg(long, default_value = "120")]
        height: usize,

        #[arg(short, long, default_value = "180")]
        frames: usize,
    },

    /// Show information about a recording
    Info {
        recording: PathBuf,
    },

    /// Print the default configuration
    Config {
        /// Write it to the default config path instead
        #[arg(short, long)]
        write: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level
    // Examples: RUST_LOG=info, RUST_LOG=depth_tracker=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            recording,
            config,
            calibrate_secs,
            threshold,
            fps,
            looping,
            export_dir,
        } => cli::replay(cli::ReplayOptions {
            recording,
            config,
            calibrate_secs,
            threshold,
            fps,
            looping,
            export_dir,
        }),
        Commands::Synth {
            output,
            width,
            height,
            frames,
        } => cli::synth(&output, width, height, frames),
        Commands::Info { recording } => cli::info(&recording),
        Commands::Config { write } => cli::config(write),
    }
}
