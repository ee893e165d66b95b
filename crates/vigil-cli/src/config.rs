use std::path::PathBuf;
use vigil_core::FacePolicy;

#[cfg(feature = "rustface")]
use vigil_core::cascade::CascadeTuning;

/// Which detection backend pair to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    /// SCRFD ONNX face detector plus landmark-derived eye boxes.
    Scrfd,
    /// SeetaFace cascade classifiers for both faces and eyes.
    Cascade,
}

/// CLI configuration, loaded from environment variables.
pub struct Config {
    /// V4L2 device path (default: /dev/video0).
    pub camera_device: String,
    /// Requested capture width; the driver may adjust it.
    pub frame_width: u32,
    /// Requested capture height; the driver may adjust it.
    pub frame_height: u32,
    /// Number of warmup frames to discard at startup (camera AGC/AE stabilization).
    pub warmup_frames: usize,
    /// Directory containing detection model files.
    pub model_dir: PathBuf,
    /// Detection backend selection.
    pub detector: DetectorKind,
    /// Averaged-EAR threshold; strictly below means NO_DANGER.
    pub ear_threshold: f32,
    /// Multi-face aggregation policy.
    pub face_policy: FacePolicy,
    /// Whether to run CLAHE on each frame before detection.
    pub clahe: bool,
    /// Directory to write the annotated frame into as latest.png (unset = disabled).
    pub snapshot_dir: Option<PathBuf>,
    /// Face-scale cascade model path and tuning.
    #[cfg(feature = "rustface")]
    pub face_cascade: CascadeConfig,
    /// Eye-scale cascade model path and tuning.
    #[cfg(feature = "rustface")]
    pub eye_cascade: CascadeConfig,
}

/// One cascade instance: model file plus sensitivity knobs.
#[cfg(feature = "rustface")]
pub struct CascadeConfig {
    pub model_path: Option<PathBuf>,
    pub tuning: CascadeTuning,
}

impl Config {
    /// Load configuration from `VIGIL_*` environment variables with defaults.
    pub fn from_env() -> Self {
        let model_dir = std::env::var("VIGIL_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| vigil_core::default_model_dir());

        let detector = match std::env::var("VIGIL_DETECTOR").as_deref() {
            Ok("cascade") => DetectorKind::Cascade,
            _ => DetectorKind::Scrfd,
        };

        let face_policy = match std::env::var("VIGIL_FACE_POLICY").as_deref() {
            Ok("most-confident") => FacePolicy::MostConfident,
            _ => FacePolicy::AnyDanger,
        };

        Self {
            camera_device: std::env::var("VIGIL_CAMERA_DEVICE")
                .unwrap_or_else(|_| "/dev/video0".to_string()),
            frame_width: env_u32("VIGIL_FRAME_WIDTH", 640),
            frame_height: env_u32("VIGIL_FRAME_HEIGHT", 480),
            warmup_frames: env_usize("VIGIL_WARMUP_FRAMES", 4),
            model_dir,
            detector,
            ear_threshold: env_f32("VIGIL_EAR_THRESHOLD", vigil_core::EAR_THRESHOLD),
            face_policy,
            clahe: std::env::var("VIGIL_CLAHE").map(|v| v != "0").unwrap_or(false),
            snapshot_dir: std::env::var("VIGIL_SNAPSHOT_DIR").ok().map(PathBuf::from),
            #[cfg(feature = "rustface")]
            face_cascade: CascadeConfig::from_env("FACE"),
            #[cfg(feature = "rustface")]
            eye_cascade: CascadeConfig::from_env("EYE"),
        }
    }

    /// Path to the SCRFD detection model.
    pub fn scrfd_model_path(&self) -> String {
        self.model_dir
            .join("det_10g.onnx")
            .to_string_lossy()
            .into_owned()
    }
}

#[cfg(feature = "rustface")]
impl CascadeConfig {
    /// Load one cascade instance from `VIGIL_{scope}_CASCADE_*` variables.
    fn from_env(scope: &str) -> Self {
        let defaults = CascadeTuning::default();
        Self {
            model_path: std::env::var(format!("VIGIL_{scope}_CASCADE_MODEL"))
                .ok()
                .map(PathBuf::from),
            tuning: CascadeTuning {
                min_object_size: env_u32(
                    &format!("VIGIL_{scope}_CASCADE_MIN_SIZE"),
                    defaults.min_object_size,
                ),
                score_threshold: env_f64(
                    &format!("VIGIL_{scope}_CASCADE_SCORE"),
                    defaults.score_threshold,
                ),
                pyramid_scale: env_f32(
                    &format!("VIGIL_{scope}_CASCADE_SCALE"),
                    defaults.pyramid_scale,
                ),
                window_step: env_u32(
                    &format!("VIGIL_{scope}_CASCADE_STEP"),
                    defaults.window_step,
                ),
            },
        }
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(feature = "rustface")]
fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
