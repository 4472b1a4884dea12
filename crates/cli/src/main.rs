#![deny(unsafe_code)]
//! CLI binary for the huepick color picker.
//!
//! Subcommands:
//! - `convert <color>`: print every representation of a color
//! - `sample <image>`: run one hover pick against a PNG "page capture"
//! - `map`: write the hue/lightness map as a PNG
//! - `last`: print the persisted last color

mod error;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use error::CliError;
use huepick_core::presentation::{format_readout, Presentation};
use huepick_core::service::{CapturedFrame, ColorStore, Viewport, ViewportPoint};
use huepick_core::{
    ColorReading, MapExtent, PickerConfig, PickerError, PickingSession, PresentationAdapter, Rgb,
};
use huepick_host::{ImageCaptureService, ImageFrame, JsonFileStore, LocalBus, RecordingSurface};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

const DEFAULT_STORE: &str = "huepick-last.json";

#[derive(Parser)]
#[command(name = "huepick", about = "Color picking, conversion and color-sphere placement")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Display settings as a JSON file; missing keys use defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show RGB, HSV, HSL, hex and sphere position for a color.
    Convert {
        /// "#rrggbb", "rrggbb" or "rgb(r, g, b)".
        color: String,
    },
    /// Pick the pixel under a pointer position from a captured page image.
    Sample {
        /// PNG standing in for the page capture.
        image: PathBuf,

        /// Pointer x in viewport coordinates.
        #[arg(long)]
        x: f64,

        /// Pointer y in viewport coordinates.
        #[arg(long)]
        y: f64,

        /// Viewport width; defaults to the image width.
        #[arg(long)]
        viewport_width: Option<f64>,

        /// Viewport height; defaults to the image height.
        #[arg(long)]
        viewport_height: Option<f64>,

        /// File that receives the picked color.
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,
    },
    /// Write the hue/lightness map as a PNG.
    Map {
        /// Map width in pixels; defaults to the configured width.
        #[arg(short = 'W', long)]
        width: Option<f64>,

        /// Map height in pixels; defaults to the configured height.
        #[arg(short = 'H', long)]
        height: Option<f64>,

        /// Output file path.
        #[arg(short, long, default_value = "huepick-map.png")]
        output: PathBuf,
    },
    /// Print the last picked color.
    Last {
        /// File written by `sample`.
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<PickerConfig, CliError> {
    let Some(path) = path else {
        return Ok(PickerConfig::default());
    };
    let json = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    let config = PickerConfig::from_json(&json)?;
    tracing::debug!(path = %path.display(), ?config, "config loaded");
    Ok(config)
}

fn reading_json(reading: &ColorReading) -> Value {
    json!({
        "rgb": { "r": reading.rgb.r, "g": reading.rgb.g, "b": reading.rgb.b },
        "hex": reading.hex.as_str(),
        "hsv": reading.hsv,
        "hsl": reading.hsl,
        "sphere": [reading.sphere.x(), reading.sphere.y(), reading.sphere.z()],
    })
}

fn presentation_json(reading: &ColorReading, presentation: &Presentation) -> Value {
    let mut value = reading_json(reading);
    value["text"] = json!(presentation.text);
    value["map"] = match presentation.map_marker {
        Some(marker) => json!({
            "x": marker.position.x,
            "y": marker.position.y,
            "visible": marker.visible,
        }),
        None => Value::Null,
    };
    value
}

fn convert(color: &str, config: &PickerConfig, json_mode: bool) -> Result<(), CliError> {
    let rgb = Rgb::parse(color)?;
    let surface = RecordingSurface::new();
    let mut presenter = PresentationAdapter::new(Box::new(surface), config)?;
    let reading = ColorReading::from_rgb(rgb);
    let presentation = presenter.present(&reading);
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&presentation_json(&reading, &presentation))?);
    } else {
        println!("{}", presentation.text);
    }
    Ok(())
}

struct SampleArgs {
    image: PathBuf,
    point: ViewportPoint,
    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
    store: PathBuf,
}

fn sample(args: SampleArgs, config: &PickerConfig, json_mode: bool) -> Result<(), CliError> {
    let frame = ImageFrame::open(&args.image)?;
    let (width, height) = frame.dimensions();
    let viewport = Viewport {
        width: args.viewport_width.unwrap_or(f64::from(width)),
        height: args.viewport_height.unwrap_or(f64::from(height)),
    };

    let capture = ImageCaptureService::new();
    let bus = LocalBus::new();
    let presenter = PresentationAdapter::new(Box::new(RecordingSurface::new()), config)?;
    let mut session =
        PickingSession::new(Box::new(capture.clone()), Box::new(bus.clone()), presenter)
            .with_store(Box::new(JsonFileStore::new(&args.store)));

    capture.push_frame(frame);
    session.toggle();
    let (token, frame) = capture
        .complete_latest()
        .ok_or(PickerError::CapturePending)?;
    session.capture_completed(token, Box::new(frame))?;
    let listener = session.listener().ok_or(PickerError::StaleSample)?;
    let result = session.pointer_moved(listener, args.point, viewport);
    session.toggle();
    let presentation = result?;

    let reading = session
        .last_reading()
        .cloned()
        .ok_or(PickerError::CapturePending)?;
    if json_mode {
        let mut value = presentation_json(&reading, &presentation);
        value["events"] = serde_json::to_value(bus.published())?;
        value["store"] = json!(args.store.display().to_string());
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", presentation.text);
        eprintln!("saved {} -> {}", reading.hex, args.store.display());
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Convert { color } => convert(&color, &config, cli.json)?,
        Command::Sample {
            image,
            x,
            y,
            viewport_width,
            viewport_height,
            store,
        } => {
            let args = SampleArgs {
                image,
                point: ViewportPoint { x, y },
                viewport_width,
                viewport_height,
                store,
            };
            sample(args, &config, cli.json)?;
        }
        Command::Map {
            width,
            height,
            output,
        } => {
            let extent = MapExtent::new(
                width.unwrap_or(config.map_width),
                height.unwrap_or(config.map_height),
            )?;
            huepick_host::snapshot::write_hsl_map_png(extent, &output)?;
            if cli.json {
                let info = json!({
                    "width": extent.width,
                    "height": extent.height,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "wrote {}x{} map -> {}",
                    extent.width,
                    extent.height,
                    output.display()
                );
            }
        }
        Command::Last { store } => {
            let last = JsonFileStore::new(&store).get();
            match (last, cli.json) {
                (Some(rgb), true) => {
                    let reading = ColorReading::from_rgb(rgb);
                    println!("{}", serde_json::to_string_pretty(&reading_json(&reading))?);
                }
                (Some(rgb), false) => {
                    let reading = ColorReading::from_rgb(rgb);
                    println!("{}", format_readout(&reading, config.include_hex));
                }
                (None, true) => println!("null"),
                (None, false) => eprintln!("no color picked yet ({})", store.display()),
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if result.is_err() {
        eprintln!("huepick: tracing subscriber already installed");
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
