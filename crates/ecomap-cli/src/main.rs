mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ecomap",
    version,
    about = "Zonal analysis of industrial waste generation around a map point"
)]
struct Cli {
    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the facilities within a radius of a point
    Analyze {
        /// Path to a GeoJSON FeatureCollection of facilities
        data_file: PathBuf,

        /// Longitude of the selected point (WGS84 degrees)
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        /// Latitude of the selected point (WGS84 degrees)
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Search radius in km (default: the config's default radius)
        #[arg(short, long, allow_negative_numbers = true)]
        radius: Option<f64>,

        /// Predefined reporting series: sinader, retc (default: sinader)
        #[arg(short, long)]
        preset: Option<String>,

        /// Custom JSON config file
        #[arg(short, long, value_name = "FILE", conflicts_with = "preset")]
        config: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Include a plain-language summary of the zone
        #[arg(long)]
        summary: bool,

        /// Also list the N closest facilities inside the zone
        #[arg(long, value_name = "N")]
        closest: Option<usize>,
    },
    /// Print the circular zone around a point as a GeoJSON polygon
    Zone {
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Radius in km
        #[arg(short, long, default_value_t = 3.0)]
        radius: f64,

        /// Number of polygon vertices
        #[arg(long, default_value_t = ecomap_core::spatial::DEFAULT_ZONE_STEPS)]
        steps: usize,
    },
    /// Convert a consolidated SINADER workbook (xlsx) into facility GeoJSON
    Convert {
        /// Path to the xlsx workbook
        input_file: PathBuf,

        /// Where to write the GeoJSON
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: PathBuf,
    },
    /// Inspect reporting-series presets and config files
    Presets {
        #[command(subcommand)]
        action: PresetsAction,
    },
}

#[derive(Subcommand)]
enum PresetsAction {
    /// List predefined presets
    List,
    /// Print a preset as JSON
    Show {
        /// Preset name (e.g., "sinader")
        preset: String,
    },
    /// Validate a custom config file
    Validate {
        /// Path to JSON config file
        file: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            data_file,
            lng,
            lat,
            radius,
            preset,
            config,
            output,
            summary,
            closest,
        } => commands::analyze::run(commands::analyze::AnalyzeArgs {
            data_file,
            lng,
            lat,
            radius,
            preset,
            config,
            output_format: output,
            summary,
            closest,
        }),
        Commands::Zone {
            lng,
            lat,
            radius,
            steps,
        } => commands::zone::run(lng, lat, radius, steps),
        Commands::Convert { input_file, out } => commands::convert::run(input_file, out),
        Commands::Presets { action } => match action {
            PresetsAction::List => commands::presets::list(),
            PresetsAction::Show { preset } => commands::presets::show(&preset),
            PresetsAction::Validate { file } => commands::presets::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
