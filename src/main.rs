// SPDX-License-Identifier: GPL-3.0-only

use camera_control::backends::camera::CameraPosition;
use camera_control::config::Config;
use camera_control::preview::FillMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "camera-control")]
#[command(about = "Camera session control demo running on a built-in test-pattern camera")]
#[command(version = camera_control::constants::app_info::version())]
struct Cli {
    /// Settings file (default: <config dir>/camera-control/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras and their capabilities
    List,

    /// Take a photo and save it together with its preview image
    Photo {
        /// Camera to use (front or rear)
        #[arg(short, long, value_parser = cli::parse_position)]
        camera: Option<CameraPosition>,

        /// Output file or directory (default: ~/Pictures/camera-control/IMG_TIMESTAMP.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview fill mode (aspect-fill, aspect-fit, stretch)
        #[arg(short, long, value_parser = cli::parse_fill_mode)]
        fill: Option<FillMode>,

        /// Preview surface size, WxH
        #[arg(long, default_value = "320x240", value_parser = cli::parse_size)]
        preview: (f32, f32),

        /// Focus and meter on this preview point before capturing, X,Y
        #[arg(long, value_parser = cli::parse_point)]
        focus: Option<(f32, f32)>,
    },

    /// Convert a preview point to camera space
    Map {
        /// Preview surface size, WxH
        #[arg(long, value_parser = cli::parse_size)]
        view: (f32, f32),

        /// Sensor frame size before rotation, WxH
        #[arg(long, value_parser = cli::parse_size)]
        frame: (f32, f32),

        /// Point in the preview, X,Y
        #[arg(long, value_parser = cli::parse_point)]
        point: (f32, f32),

        /// Preview fill mode (aspect-fill, aspect-fit, stretch)
        #[arg(short, long, default_value = "aspect-fill", value_parser = cli::parse_fill_mode)]
        fill: FillMode,

        /// Preview is mirrored (front camera)
        #[arg(long)]
        mirrored: bool,

        /// Clockwise sensor rotation in degrees
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        rotation: i32,
    },

    /// Stream preview frames and print statistics
    Preview {
        /// Camera to use (front or rear)
        #[arg(short, long, value_parser = cli::parse_position)]
        camera: Option<CameraPosition>,

        /// Stop after this many frames (Ctrl+C stops early)
        #[arg(short, long, default_value = "90")]
        frames: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=camera_control=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => Config::load(&path)?,
        None => Config::load_or_default(),
    };

    match cli.command {
        Commands::List => cli::list_cameras(),
        Commands::Photo {
            camera,
            output,
            fill,
            preview,
            focus,
        } => cli::take_photo(
            config,
            cli::PhotoOptions {
                camera,
                output,
                fill,
                preview,
                focus,
            },
        ),
        Commands::Map {
            view,
            frame,
            point,
            fill,
            mirrored,
            rotation,
        } => cli::map_point(view, frame, point, fill, mirrored, rotation),
        Commands::Preview { camera, frames } => cli::run_preview(config, camera, frames),
    }
}
