//! Head scroll application: scroll a page by tilting your head at the webcam.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use head_scroll::{
    app::{AppConfig, FrameInput, ScrollApp, SinkKind},
    config::{Config, EXAMPLE_CONFIG},
};
use log::info;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Sink {
    /// Inject wheel events on the X11 display
    X11,
    /// Only log where a simulated page would scroll to
    Virtual,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use (overrides the config file)
    #[arg(long)]
    cam: Option<i32>,

    /// Replay frames from a directory of images instead of the camera
    #[arg(short, long)]
    frames: Option<PathBuf>,

    /// Start over when the replayed frames run out
    #[arg(long = "loop")]
    looping: bool,

    /// Sensitivity from 1 to 10
    #[arg(short, long)]
    sensitivity: Option<u32>,

    /// Scroll speed from 1 to 10
    #[arg(long)]
    speed: Option<u32>,

    /// Where scrolling goes
    #[arg(long, value_enum, default_value = "x11")]
    sink: Sink,

    /// Stop after this many refreshes
    #[arg(long)]
    max_frames: Option<u64>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Head Scroll");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(cam) = args.cam {
        config.camera.index = cam;
    }
    if let Some(sensitivity) = args.sensitivity {
        config.settings.sensitivity = sensitivity;
    }
    if let Some(speed) = args.speed {
        config.settings.scroll_speed = speed;
    }
    config.settings = config.settings.sanitized();

    let input = match args.frames {
        Some(dir) => FrameInput::Replay {
            dir,
            looping: args.looping,
        },
        None => FrameInput::Camera(config.camera.index),
    };

    let app_config = AppConfig {
        input,
        sink: match args.sink {
            Sink::X11 => SinkKind::X11,
            Sink::Virtual => SinkKind::Virtual,
        },
        config,
        max_frames: args.max_frames,
    };

    let mut app = ScrollApp::new(app_config)?;
    let stats = app.run()?;
    info!(
        "Processed {} frames: {} detections, {} scrolls",
        stats.ticks, stats.detections, stats.intents
    );

    Ok(())
}
