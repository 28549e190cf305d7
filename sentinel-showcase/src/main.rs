use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser};
use sentinel_lighting::LightingHandle;
use tracing::info;

mod config;
mod report;

use config::{LightSection, OutputFormat, OutputSection, Settings, ShowcaseConfig};

#[derive(Parser)]
#[command(name = "sentinel-showcase")]
#[command(version, about = "Print the shadows and CSS variables a light source produces", long_about = None)]
struct Cli {
    /// TOML file with `[light]` and `[output]` sections
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[command(flatten)]
    light: LightArgs,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
#[command(next_help_heading = "Light")]
struct LightArgs {
    /// Horizontal light direction in degrees (0 = right, 90 = top)
    #[arg(long, allow_negative_numbers = true)]
    azimuth: Option<f64>,
    /// Light angle above the surface in degrees
    #[arg(long, allow_negative_numbers = true)]
    altitude: Option<f64>,
    /// Light strength between 0 and 1
    #[arg(long)]
    intensity: Option<f64>,
    /// Color temperature in Kelvin
    #[arg(long)]
    temperature: Option<f64>,
    /// Light tint, e.g. "hsl(45, 20%, 95%)"
    #[arg(long)]
    color: Option<String>,
}

#[derive(Args)]
#[command(next_help_heading = "Output")]
struct OutputArgs {
    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Surface color used for element and glass examples
    #[arg(long)]
    element_color: Option<String>,
    /// Only render this elevation level (1, 2, 4, 8, 16 or 32)
    #[arg(long)]
    elevation: Option<u32>,
}

impl From<LightArgs> for LightSection {
    fn from(args: LightArgs) -> Self {
        Self {
            azimuth: args.azimuth,
            altitude: args.altitude,
            intensity: args.intensity,
            temperature: args.temperature,
            color: args.color,
        }
    }
}

impl From<OutputArgs> for OutputSection {
    fn from(args: OutputArgs) -> Self {
        Self {
            format: args.format,
            element_color: args.element_color,
            elevation: args.elevation,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let Cli {
        config: config_path,
        light,
        output,
    } = Cli::parse();

    let file = match &config_path {
        Some(path) => config::load(path)?,
        None => ShowcaseConfig::default(),
    };
    let settings = Settings::resolve(file, light.into(), output.into())?;

    let handle = LightingHandle::new(settings.light);
    info!(light = ?handle.light(), format = ?settings.format, "rendering lighting showcase");

    let rendered = match settings.format {
        OutputFormat::Css => report::render_css(&handle, &settings),
        OutputFormat::Json => report::render_json(&handle, &settings)?,
    };
    println!("{rendered}");
    Ok(())
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new(
            "off,sentinel_lighting=info,sentinel_showcase=info",
        ) {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("off"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
