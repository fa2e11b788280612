//! brightquad: outline the quadrilateral spanned by the four brightest
//! non-overlapping 5x5 patches of an image.
//!
//! # Usage
//!
//! ```text
//! brightquad <INPUT> <OUTPUT>
//! ```
//!
//! Prints `Area of quadrilateral: <value>` on stdout and writes the
//! annotated image to `OUTPUT` (format chosen by extension). Diagnostics
//! go to stderr; set `RUST_LOG=debug` for per-stage detail.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use brightquad_pipeline::{DetectorConfig, PipelineError};
use clap::Parser;

/// Find the four brightest non-overlapping 5x5 patches of an image,
/// print the area of the quadrilateral formed by their centers, and
/// save the image with that quadrilateral drawn on it.
#[derive(Parser)]
#[command(name = "brightquad", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// Path of the annotated output image.
    output: PathBuf,
}

/// Failures surfaced to the user, one exit code each.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Load {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl CliError {
    /// Process exit code for this failure. clap itself exits with 2 on
    /// usage errors.
    ///
    /// The binary always runs the default config with
    /// `Shortfall::Collapse`, so 5 (`InsufficientPatches`) and 1
    /// (`InvalidConfig`) are only reachable through library callers that
    /// share this mapping.
    const fn exit_code(&self) -> u8 {
        match self {
            Self::Load { .. }
            | Self::Pipeline(PipelineError::EmptyInput | PipelineError::ImageDecode(_)) => 3,
            Self::Pipeline(PipelineError::ImageTooSmall { .. }) => 4,
            Self::Pipeline(PipelineError::InsufficientPatches { .. }) => 5,
            Self::Write { .. } => 6,
            Self::Pipeline(PipelineError::InvalidConfig(_)) => 1,
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    log::info!("reading image from {}", cli.input.display());
    let image_bytes = std::fs::read(&cli.input).map_err(|source| CliError::Load {
        path: cli.input.clone(),
        source,
    })?;

    let (detection, annotated) =
        brightquad_pipeline::process(&image_bytes, &DetectorConfig::default())?;
    log::info!(
        "{}x{} image, {} candidates, centers {:?}",
        detection.dimensions.width,
        detection.dimensions.height,
        detection.candidates,
        detection.centers,
    );

    println!("Area of quadrilateral: {}", detection.area);

    log::info!("saving to {}", cli.output.display());
    annotated
        .save(&cli.output)
        .map_err(|source| CliError::Write {
            path: cli.output.clone(),
            source,
        })?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
