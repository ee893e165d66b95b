use serde::{Deserialize, Serialize};

/// Bounding box for a detected region, with optional facial landmarks.
///
/// Coordinates are in frame pixels. For face detections produced by a
/// landmark-capable backend, `landmarks` holds the five-point set
/// [left_eye, right_eye, nose, mouth_left, mouth_right]; eye detections
/// carry no landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
    pub landmarks: Option<[(f32, f32); 5]>,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Intersection-over-Union with another box. Zero when the union is empty.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let inter_w = (x2 - x1).max(0.0);
        let inter_h = (y2 - y1).max(0.0);
        let inter_area = inter_w * inter_h;

        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}

/// Four points approximating an eye's corners, derived from its bounding
/// box in the fixed order: top-left, top-right, bottom-right, bottom-left.
pub type EyeLandmarks = [(f32, f32); 4];

/// Per-frame classification of what the detectors found.
///
/// `NoFace` applies at frame level; the remaining variants describe the
/// eye count for one analyzed face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceState {
    NoFace,
    NoEyes,
    OneEye,
    TwoEyes,
    ManyEyes,
}

/// Binary drowsiness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictState {
    Danger,
    NoDanger,
}

impl VerdictState {
    /// Overlay / console label.
    pub fn label(&self) -> &'static str {
        match self {
            VerdictState::Danger => "DANGER",
            VerdictState::NoDanger => "NO DANGER",
        }
    }
}

pub const REASON_NO_FACE: &str = "no face";
pub const REASON_NO_EYES: &str = "no eyes";
pub const REASON_ONE_EYE: &str = "one eye";
pub const REASON_MANY_EYES: &str = "more than two eyes";

/// Drowsiness verdict for a face or a whole frame.
///
/// `ear` is the averaged eye-aspect-ratio when two eyes were measured;
/// `reason` names the detection shortfall when they were not. A verdict
/// never carries both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub state: VerdictState,
    pub ear: Option<f32>,
    pub reason: Option<&'static str>,
}

impl Verdict {
    /// DANGER because detection found too little to measure.
    pub fn danger(reason: &'static str) -> Self {
        Self {
            state: VerdictState::Danger,
            ear: None,
            reason: Some(reason),
        }
    }

    /// DANGER from a measured EAR at or above threshold.
    pub fn danger_at(ear: f32) -> Self {
        Self {
            state: VerdictState::Danger,
            ear: Some(ear),
            reason: None,
        }
    }

    /// NO_DANGER from a measured EAR below threshold.
    pub fn clear(ear: f32) -> Self {
        Self {
            state: VerdictState::NoDanger,
            ear: Some(ear),
            reason: None,
        }
    }

    pub fn is_danger(&self) -> bool {
        self.state == VerdictState::Danger
    }
}
