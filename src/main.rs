use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use image::{ImageFormat, RgbImage};
use fluorocount::format::{
    CoordinateJson, ExportOptions, ImportReport, coordinate_file_for, export_all,
};
use fluorocount::overlay::burn_overlay;
use fluorocount::{ChannelMask, EngineConfig, LogLevel, Session, image_io};

#[derive(Parser)]
#[command(name = "fluorocount")]
#[command(version, about = "Cell counting and ROI annotation for fluorescence images", long_about = None)]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the per-ROI counts stored in a coordinate file
    Summary {
        /// Coordinate file
        #[arg(value_name = "COORDS")]
        coordinates: PathBuf,
    },

    /// Render the adjusted image with ROIs and markers drawn on top
    Render {
        /// Input image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Coordinate file (defaults to <stem>_coordinates.json beside the image)
        #[arg(short, long, value_name = "FILE")]
        coordinates: Option<PathBuf>,

        /// Output PNG
        #[arg(short, long, value_name = "PNG")]
        out: PathBuf,

        /// Visible channels, any of the letters r, g, b
        #[arg(long, value_name = "RGB", default_value = "rgb")]
        channels: String,
    },

    /// Write coordinates, results and overlay for an image
    Export {
        /// Input image
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Coordinate file (defaults to <stem>_coordinates.json beside the image)
        #[arg(short, long, value_name = "FILE")]
        coordinates: Option<PathBuf>,

        /// Output directory (defaults to the image's directory)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Skip the coordinate JSON
        #[arg(long)]
        no_json: bool,

        /// Skip the results CSV
        #[arg(long)]
        no_csv: bool,

        /// Skip the overlay PNG
        #[arg(long)]
        no_overlay: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let level = cli.log_level.unwrap_or(config.log_level);
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();

    let result = match cli.command {
        Commands::Summary { coordinates } => cmd_summary(config, &coordinates),
        Commands::Render {
            image,
            coordinates,
            out,
            channels,
        } => cmd_render(config, &image, coordinates, &out, &channels),
        Commands::Export {
            image,
            coordinates,
            out_dir,
            no_json,
            no_csv,
            no_overlay,
        } => {
            let options = ExportOptions::new()
                .coordinates(!no_json)
                .results(!no_csv)
                .overlay(!no_overlay);
            cmd_export(config, &image, coordinates, out_dir, &options)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_summary(config: EngineConfig, coordinates: &Path) -> Result<(), String> {
    let mut session = Session::with_config(config);
    let report =
        CoordinateJson::import_file(&mut session, coordinates).map_err(|e| e.to_string())?;
    print_warnings(&report);

    println!("Image: {}", session.image_name());
    println!("{:<20} {:<20} {:>6}", "Cell Type", "ROI", "Count");
    for row in session.results_table() {
        println!("{:<20} {:<20} {:>6}", row.cell_type, row.roi_name, row.count);
    }
    println!("Total: {}", session.summary().total());
    Ok(())
}

fn cmd_render(
    config: EngineConfig,
    image: &Path,
    coordinates: Option<PathBuf>,
    out: &Path,
    channels: &str,
) -> Result<(), String> {
    let mask = ChannelMask::from_letters(channels)
        .ok_or_else(|| format!("Invalid channel selection '{}'", channels))?;
    let (mut session, raw) = open_annotated(config, image, coordinates)?;
    session.set_channel_mask(mask);
    let rendered = burn_overlay(&session.render(&raw), &session.overlay_geometry());
    rendered
        .save_with_format(out, ImageFormat::Png)
        .map_err(|e| format!("Failed to write {}: {}", out.display(), e))?;

    println!("Rendered {} ({})", out.display(), mask.label());
    Ok(())
}

fn cmd_export(
    config: EngineConfig,
    image: &Path,
    coordinates: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    options: &ExportOptions,
) -> Result<(), String> {
    let (session, raw) = open_annotated(config, image, coordinates)?;

    let dir = match out_dir {
        Some(dir) => dir,
        None => image
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let stem = image
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| format!("Cannot derive a file name from {}", image.display()))?;

    let result =
        export_all(&session, Some(&raw), &dir, stem, options).map_err(|e| e.to_string())?;
    for warning in &result.warnings {
        println!("  {}", warning);
    }
    for file in &result.files_created {
        println!("Wrote {}", file.display());
    }
    Ok(())
}

/// Load an image and its coordinate file, if one is given or found beside it.
fn open_annotated(
    config: EngineConfig,
    image: &Path,
    coordinates: Option<PathBuf>,
) -> Result<(Session, RgbImage), String> {
    let raw = image_io::load_rgb8(image).map_err(|e| e.to_string())?;
    let name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut session = Session::with_config(config);
    session.load_image(name, raw.width(), raw.height());

    match coordinates.or_else(|| coordinate_file_for(image)) {
        Some(path) => {
            log::info!("Using coordinates from {}", path.display());
            let report =
                CoordinateJson::import_file(&mut session, &path).map_err(|e| e.to_string())?;
            print_warnings(&report);
        }
        None => log::warn!("No coordinate file for {}", image.display()),
    }

    Ok((session, raw))
}

fn print_warnings(report: &ImportReport) {
    for warning in &report.warnings {
        println!("  {}", warning);
    }
}
