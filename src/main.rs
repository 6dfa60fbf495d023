use clap::{Args, Parser, Subcommand};
use image::ImageReader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use docscan::session::{local_now, scan_file_name};
use docscan::{DocumentScanner, HeadlessPreview, ImageSequence, ScanConfig, ScanError, ScanSession};

#[derive(Parser)]
#[command(name = "docscan")]
#[command(about = "Detect, rectify and save documents from a webcam feed")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Save intermediate images to directory (must be empty)
    #[arg(long, value_name = "DIR", global = true)]
    debug_out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the live camera feed; 's' saves, 'q' quits
    Live(LiveArgs),

    /// Scan a directory of still frames as if they came from the camera
    Replay {
        /// Directory of frames, processed in file name order
        #[arg(value_name = "DIR")]
        frames: PathBuf,

        #[command(flatten)]
        capture: CaptureArgs,
    },

    /// Rectify the document in a single image
    Scan {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Output file (defaults to Scan_HH_MM_SS.jpg in the output directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        capture: CaptureArgs,
    },
}

#[derive(Args, Clone)]
struct LiveArgs {
    /// Camera device index
    #[arg(long, default_value_t = 1)]
    device: i32,

    /// Camera brightness property
    #[arg(long, default_value_t = 150.0)]
    brightness: f64,

    #[command(flatten)]
    capture: CaptureArgs,
}

#[derive(Args, Clone)]
struct CaptureArgs {
    /// Capture width, also the width of the rectified output before cropping
    #[arg(long, default_value_t = 480)]
    width: u32,

    /// Capture height, also the height of the rectified output before cropping
    #[arg(long, default_value_t = 640)]
    height: u32,

    /// Directory for saved scans
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,
}

impl CaptureArgs {
    fn config(&self) -> ScanConfig {
        ScanConfig::new()
            .with_frame_size(self.width, self.height)
            .with_output_dir(&self.output_dir)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let command = match args.command {
        Some(command) => command,
        None => default_command(),
    };

    match command {
        Command::Live(live) => run_live(live, args.debug_out),
        Command::Replay { frames, capture } => {
            let scanner = build_scanner(capture.config(), args.debug_out)?;
            let source = ImageSequence::open(&frames)?;
            let summary = ScanSession::new(scanner, source, HeadlessPreview::new()).run()?;
            println!(
                "Processed {} frames, document found in {}",
                summary.frames, summary.documents
            );
            Ok(())
        }
        Command::Scan {
            image_path,
            output,
            capture,
        } => {
            let config = capture.config();
            let output = output.unwrap_or_else(|| config.output_dir.join(scan_file_name(local_now())));
            let scanner = build_scanner(config, args.debug_out)?;

            let img = ImageReader::open(&image_path)?
                .decode()
                .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

            let result = scanner.scan_with_debug(&img.to_rgb8(), 0)?;
            let warped = result.warped.ok_or(ScanError::NoRectifiedFrame)?;
            warped.save(&output)?;
            println!("Saving image! {}", output.display());
            Ok(())
        }
    }
}

/// `live` with every flag at its default
fn default_command() -> Command {
    match Cli::parse_from(["docscan", "live"]).command {
        Some(command) => command,
        None => unreachable!("`live` always parses to a subcommand"),
    }
}

fn build_scanner(config: ScanConfig, debug_out: Option<PathBuf>) -> anyhow::Result<DocumentScanner> {
    let scanner = DocumentScanner::new(config);
    match debug_out {
        Some(dir) => scanner.with_debug(dir),
        None => Ok(scanner),
    }
}

#[cfg(feature = "camera")]
fn run_live(live: LiveArgs, debug_out: Option<PathBuf>) -> anyhow::Result<()> {
    use docscan::{CameraSource, HighGuiPreview};

    let config = live
        .capture
        .config()
        .with_device(live.device)
        .with_brightness(live.brightness);

    let source = CameraSource::open(&config)?;
    let scanner = build_scanner(config, debug_out)?;
    ScanSession::new(scanner, source, HighGuiPreview::new()).run()?;
    Ok(())
}

#[cfg(not(feature = "camera"))]
fn run_live(_live: LiveArgs, _debug_out: Option<PathBuf>) -> anyhow::Result<()> {
    anyhow::bail!(
        "live capture needs the `camera` feature (cargo run --features camera); \
         use `replay` or `scan` for still images"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_runs_live_with_config_defaults() {
        let Command::Live(live) = default_command() else {
            panic!("default command is not `live`");
        };
        let defaults = ScanConfig::new();

        assert_eq!(live.device, defaults.device_index);
        assert_eq!(live.brightness, defaults.brightness);
        assert_eq!(live.capture.width, defaults.frame_width);
        assert_eq!(live.capture.height, defaults.frame_height);
        assert_eq!(live.capture.output_dir, defaults.output_dir);
    }
}
