use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use vigil_core::{FrameAnalyzer, KeypointEyeDetector, RegionDetector, ScrfdDetector};

mod config;
mod keys;
mod monitor;

use config::{Config, DetectorKind};

#[derive(Parser)]
#[command(name = "vigil", about = "Webcam drowsiness watch")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the camera and report DANGER / NO DANGER per frame
    Watch,
    /// Analyze still images and print one JSON report each
    Check {
        /// Image files to analyze
        images: Vec<PathBuf>,
    },
    /// List available camera devices
    Devices,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Watch => watch(config).await,
        Commands::Check { images } => check(config, &images),
        Commands::Devices => {
            devices();
            Ok(())
        }
    }
}

/// Host the blocking watch loop on a worker thread so Ctrl-C can still
/// be delivered; either it or the in-loop exit key sets the stop flag.
async fn watch(config: Config) -> Result<()> {
    let analyzer = build_analyzer(&config)?;
    let stop = Arc::new(AtomicBool::new(false));

    let ctrl_c_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c received");
            ctrl_c_stop.store(true, Ordering::Relaxed);
        }
    });

    let summary =
        tokio::task::spawn_blocking(move || monitor::run(&config, analyzer, stop)).await??;

    tracing::info!(
        frames = summary.frames,
        danger_frames = summary.danger_frames,
        "vigil done"
    );
    Ok(())
}

/// Batch mode: each image is one independent pipeline invocation.
fn check(config: Config, images: &[PathBuf]) -> Result<()> {
    if images.is_empty() {
        bail!("no images given");
    }

    let mut analyzer = build_analyzer(&config)?;

    for path in images {
        let img = image::open(path)
            .with_context(|| format!("reading {}", path.display()))?
            .to_luma8();
        let (width, height) = img.dimensions();
        let mut gray = img.into_raw();

        if config.clahe {
            vigil_hw::frame::clahe_enhance(&mut gray, width, height, 8, 0.01);
        }

        let report = analyzer.analyze(&gray, width, height)?;
        let line = serde_json::json!({
            "image": path.display().to_string(),
            "report": report,
        });
        println!("{line}");
    }

    Ok(())
}

fn devices() {
    let found = vigil_hw::Camera::list_devices();
    if found.is_empty() {
        println!("no capture devices found");
        return;
    }
    for dev in found {
        println!("{}  {} ({}, {})", dev.path, dev.name, dev.driver, dev.bus);
    }
}

/// Build the face-scale and eye-scale detector pair for the configured
/// backend and wrap them in an analyzer.
fn build_analyzer(config: &Config) -> Result<FrameAnalyzer> {
    let (faces, eyes): (Box<dyn RegionDetector>, Box<dyn RegionDetector>) = match config.detector {
        DetectorKind::Scrfd => {
            let scrfd = ScrfdDetector::load(&config.scrfd_model_path())
                .context("loading SCRFD face model")?;
            (Box::new(scrfd), Box::new(KeypointEyeDetector::new()))
        }
        #[cfg(feature = "rustface")]
        DetectorKind::Cascade => {
            use vigil_core::cascade::CascadeDetector;

            let face_model = config
                .face_cascade
                .model_path
                .as_ref()
                .context("VIGIL_FACE_CASCADE_MODEL is required for the cascade backend")?;
            let eye_model = config
                .eye_cascade
                .model_path
                .as_ref()
                .context("VIGIL_EYE_CASCADE_MODEL is required for the cascade backend")?;

            let face = CascadeDetector::load(
                &face_model.to_string_lossy(),
                config.face_cascade.tuning,
            )
            .context("loading face cascade model")?;
            let eye = CascadeDetector::load(&eye_model.to_string_lossy(), config.eye_cascade.tuning)
                .context("loading eye cascade model")?;
            (Box::new(face), Box::new(eye))
        }
        #[cfg(not(feature = "rustface"))]
        DetectorKind::Cascade => {
            bail!("cascade backend requires the `rustface` feature")
        }
    };

    Ok(FrameAnalyzer::new(faces, eyes)
        .with_threshold(config.ear_threshold)
        .with_policy(config.face_policy))
}
