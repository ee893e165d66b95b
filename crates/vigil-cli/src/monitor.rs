//! The live watch loop: capture, analyze, annotate, poll for exit.

use crate::config::Config;
use crate::keys::KeyPoller;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use vigil_core::{FrameAnalyzer, FrameReport};
use vigil_hw::overlay;
use vigil_hw::Camera;

const OVERLAY_INTENSITY: u8 = 255;
const TEXT_SCALE: i32 = 4;

/// Counters reported when the loop ends.
#[derive(Debug, Default)]
pub struct WatchSummary {
    pub frames: u64,
    pub danger_frames: u64,
}

/// Run the blocking watch loop until the exit key is pressed, the stop
/// flag is set, or acquisition fails.
///
/// One iteration is acquire, analyze, annotate, render, poll. Nothing
/// carries over between iterations; the stop flag is observed at the top
/// of each one.
pub fn run(
    config: &Config,
    mut analyzer: FrameAnalyzer,
    stop: Arc<AtomicBool>,
) -> Result<WatchSummary> {
    let camera = Camera::open(&config.camera_device, config.frame_width, config.frame_height)?;
    let mut stream = camera.start_stream()?;

    for _ in 0..config.warmup_frames {
        let _ = stream.next_frame();
    }

    let keys = KeyPoller::new();
    let mut summary = WatchSummary::default();

    loop {
        if stop.load(Ordering::Relaxed) {
            tracing::info!("stop requested");
            break;
        }
        if keys.exit_requested() {
            tracing::info!("exit key pressed");
            break;
        }

        // Acquisition failure is fatal: log and end the loop.
        let mut frame = match stream.next_frame() {
            Ok(f) => f,
            Err(e) => {
                tracing::error!(error = %e, "frame acquisition failed");
                return Err(e).context("frame acquisition failed");
            }
        };

        if frame.is_dark {
            tracing::debug!(sequence = frame.sequence, "dark frame");
        }
        if config.clahe {
            vigil_hw::frame::clahe_enhance(&mut frame.data, frame.width, frame.height, 8, 0.01);
        }

        let report = analyzer.analyze(&frame.data, frame.width, frame.height)?;
        print_report(&report);

        summary.frames += 1;
        if report.verdict.is_danger() {
            summary.danger_frames += 1;
        }

        annotate(&mut frame.data, frame.width, frame.height, &report);
        if let Some(dir) = &config.snapshot_dir {
            if let Err(e) = write_snapshot(&frame.data, frame.width, frame.height, dir) {
                tracing::warn!(error = %e, "snapshot write failed");
            }
        }
    }

    tracing::info!(
        frames = summary.frames,
        danger_frames = summary.danger_frames,
        "watch loop finished"
    );
    Ok(summary)
}

/// The §6-style console sink: one line per measured eye pair, one line
/// per frame verdict.
fn print_report(report: &FrameReport) {
    for face in &report.faces {
        if let (Some(left), Some(right)) = (face.left_ear, face.right_ear) {
            println!("EAR left {left:.3} right {right:.3}");
        }
    }
    match (report.verdict.ear, report.verdict.reason) {
        (Some(ear), _) => println!("{} (EAR {ear:.3})", report.verdict.state.label()),
        (None, Some(reason)) => println!("{} ({reason})", report.verdict.state.label()),
        (None, None) => println!("{}", report.verdict.state.label()),
    }
}

/// Draw detection boxes and the verdict label onto the frame.
fn annotate(gray: &mut [u8], width: u32, height: u32, report: &FrameReport) {
    for face in &report.faces {
        let b = &face.face;
        overlay::draw_rect(
            gray,
            width,
            height,
            [b.x, b.y, b.width, b.height],
            OVERLAY_INTENSITY,
        );
        for eye in &face.eyes {
            overlay::draw_rect(
                gray,
                width,
                height,
                [eye.x, eye.y, eye.width, eye.height],
                OVERLAY_INTENSITY,
            );
        }
    }
    overlay::draw_text(
        gray,
        width,
        height,
        8,
        8,
        report.verdict.state.label(),
        TEXT_SCALE,
        OVERLAY_INTENSITY,
    );
}

fn write_snapshot(gray: &[u8], width: u32, height: u32, dir: &std::path::Path) -> Result<()> {
    let img = image::GrayImage::from_raw(width, height, gray.to_vec())
        .context("frame buffer does not match its dimensions")?;
    let path = dir.join("latest.png");
    img.save(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::types::{BoundingBox, FaceState, Verdict};
    use vigil_core::FaceAnalysis;

    fn report_with_face() -> FrameReport {
        let face = BoundingBox {
            x: 4.0,
            y: 4.0,
            width: 20.0,
            height: 20.0,
            confidence: 0.9,
            landmarks: None,
        };
        let eye = BoundingBox {
            x: 6.0,
            y: 8.0,
            width: 4.0,
            height: 3.0,
            confidence: 0.9,
            landmarks: None,
        };
        FrameReport {
            verdict: Verdict::clear(0.0),
            state: FaceState::TwoEyes,
            faces: vec![FaceAnalysis {
                face,
                eyes: vec![eye.clone(), eye],
                state: FaceState::TwoEyes,
                left_ear: Some(0.0),
                right_ear: Some(0.0),
                verdict: Verdict::clear(0.0),
            }],
        }
    }

    #[test]
    fn test_annotate_draws_boxes_and_label() {
        let mut gray = vec![0u8; 64 * 64];
        annotate(&mut gray, 64, 64, &report_with_face());
        // Face box corner and a lit overlay label pixel
        assert_eq!(gray[4 * 64 + 4], OVERLAY_INTENSITY);
        assert!(gray.iter().filter(|&&p| p == OVERLAY_INTENSITY).count() > 50);
    }

    #[test]
    fn test_annotate_empty_report_still_labels() {
        let report = FrameReport {
            verdict: Verdict::danger(vigil_core::types::REASON_NO_FACE),
            state: FaceState::NoFace,
            faces: vec![],
        };
        let mut gray = vec![0u8; 64 * 64];
        annotate(&mut gray, 64, 64, &report);
        assert!(gray.iter().any(|&p| p == OVERLAY_INTENSITY));
    }

    #[test]
    fn test_write_snapshot_creates_latest_png() {
        let dir = std::env::temp_dir().join(format!("vigil-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let gray = vec![128u8; 16 * 16];
        write_snapshot(&gray, 16, 16, &dir).unwrap();
        assert!(dir.join("latest.png").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
