//! Face overlay compositor: draws an effect over a still frame using
//! recorded face landmarks.

use anyhow::{Context, Result};
use clap::Parser;
use face_overlay::camera::{StillImageCamera, VideoFrame};
use face_overlay::clock::{Clock, FixedClock, SystemClock};
use face_overlay::config::Config;
use face_overlay::detector::RecordedDetector;
use face_overlay::draw::replay;
use face_overlay::effects::{Density, EffectMode};
use face_overlay::raster::ImageCanvas;
use face_overlay::session::Session;
use face_overlay::surface::{has_fixed_landscape_capture, Orientation, Viewport};
use face_overlay::utils::color::Color;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video frame to draw over (PNG, JPEG, ...)
    #[arg(short, long)]
    frame: PathBuf,

    /// Recorded detector output (JSON with `multiFaceLandmarks`)
    #[arg(short, long)]
    landmarks: PathBuf,

    /// Effect to draw (mesh, contour, irises, fun, none)
    #[arg(short, long)]
    effect: Option<String>,

    /// Mesh density (sparse, medium, dense)
    #[arg(long)]
    density: Option<String>,

    /// Stroke color as #rrggbb
    #[arg(long)]
    color: Option<String>,

    /// Stroke thickness in pixels
    #[arg(short, long)]
    thickness: Option<f32>,

    /// CSS width of the canvas container
    #[arg(long)]
    container_width: Option<f32>,

    /// Treat the device as held in portrait orientation
    #[arg(long)]
    portrait: bool,

    /// User agent string used to detect fixed-landscape cameras
    #[arg(long)]
    user_agent: Option<String>,

    /// Pin the animation clock to this time in milliseconds
    #[arg(long)]
    time_ms: Option<f64>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Write the composited frame to this image file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the draw commands as JSON
    #[arg(long)]
    dump_commands: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// Fold command line overrides into the loaded configuration
fn apply_overrides(config: &mut Config, args: &Args) -> Result<()> {
    if let Some(effect) = &args.effect {
        config.render.effect = effect.parse::<EffectMode>()?;
    }
    if let Some(density) = &args.density {
        config.render.density = density.parse::<Density>()?;
    }
    if let Some(color) = &args.color {
        config.render.color = color.parse::<Color>()?;
    }
    if let Some(thickness) = args.thickness {
        config.render.thickness = thickness;
    }
    if let Some(width) = args.container_width {
        config.display.container_width = width;
    }
    if let Some(user_agent) = &args.user_agent {
        config.display.platform_quirk |= has_fixed_landscape_capture(user_agent);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Face Overlay Compositor");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    apply_overrides(&mut config, &args)?;

    let frame = VideoFrame::from_file(&args.frame)
        .with_context(|| format!("Failed to read frame {}", args.frame.display()))?;
    let detector = RecordedDetector::from_file(&args.landmarks)
        .with_context(|| format!("Failed to read landmarks {}", args.landmarks.display()))?;

    let clock: Box<dyn Clock> = match args.time_ms {
        Some(now_ms) => Box::new(FixedClock::new(now_ms)),
        None => Box::new(SystemClock),
    };

    let orientation = if args.portrait {
        Orientation::Portrait
    } else {
        Orientation::Landscape
    };
    let viewport = Viewport::new(
        config.display.container_width,
        orientation,
        config.display.platform_quirk,
    );

    // Create and run session
    let mut session = Session::new(StillImageCamera::new(frame.clone()), detector, &config, clock)?;
    session.start()?;
    session.notify_resize(viewport);

    let commands = session.process_frame(&frame);
    let faces = session.detected_faces().map_or(0, |d| d.face_count());
    info!("Drew {} effect over {} face(s) in {} commands", session.effect(), faces, commands.len());

    if let Some(surface) = session.surface() {
        info!(
            "Display size {:.1}x{:.1}, transform {}",
            surface.css_width,
            surface.css_height,
            surface.transform.css()
        );
    }

    if args.dump_commands {
        println!("{}", serde_json::to_string_pretty(&commands)?);
    }

    if let Some(output) = &args.output {
        let mut canvas = ImageCanvas::default();
        replay(&commands, &mut canvas, &frame);
        canvas
            .save(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("Wrote {}", output.display());
    }

    session.stop();
    Ok(())
}
