//! vigil-core: per-frame drowsiness decision pipeline.
//!
//! Pluggable face and eye detection backends feed a pure analyzer that
//! approximates eye landmarks from detection boxes, computes an
//! eye-aspect-ratio per eye, and thresholds the average into a
//! DANGER / NO_DANGER verdict.

pub mod analyzer;
#[cfg(feature = "rustface")]
pub mod cascade;
pub mod detector;
pub mod ear;
pub mod eyes;
pub mod types;

pub use analyzer::{FaceAnalysis, FacePolicy, FrameAnalyzer, FrameReport, EAR_THRESHOLD};
pub use detector::{DetectorError, RegionDetector, ScrfdDetector};
pub use eyes::KeypointEyeDetector;
pub use types::{BoundingBox, EyeLandmarks, FaceState, Verdict, VerdictState};

/// Default directory for detection model files.
pub fn default_model_dir() -> std::path::PathBuf {
    std::path::PathBuf::from("/usr/share/vigil/models")
}
