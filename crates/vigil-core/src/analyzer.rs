//! Per-frame drowsiness decision pipeline.
//!
//! One pass over one grayscale frame: detect faces, detect eyes inside
//! each face region, approximate corner landmarks per eye, compute EAR,
//! and threshold into a verdict. Nothing is carried between frames, so
//! re-running on an identical frame with deterministic backends yields
//! an identical report.

use crate::detector::{DetectorError, RegionDetector};
use crate::ear::{corner_landmarks, eye_aspect_ratio};
use crate::types::{
    BoundingBox, FaceState, Verdict, REASON_MANY_EYES, REASON_NO_EYES, REASON_NO_FACE,
    REASON_ONE_EYE,
};
use serde::Serialize;

/// EAR threshold separating NO_DANGER (strictly below) from DANGER.
pub const EAR_THRESHOLD: f32 = 0.80;

/// How the frame verdict is aggregated when several faces are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacePolicy {
    /// The frame is DANGER when any analyzed face is.
    #[default]
    AnyDanger,
    /// Only the most confident face decides.
    MostConfident,
}

/// Analysis of one detected face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceAnalysis {
    pub face: BoundingBox,
    pub eyes: Vec<BoundingBox>,
    pub state: FaceState,
    pub left_ear: Option<f32>,
    pub right_ear: Option<f32>,
    pub verdict: Verdict,
}

/// Full result for one frame: aggregated verdict plus per-face detail.
///
/// `faces` is sorted by detection confidence, descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub verdict: Verdict,
    pub state: FaceState,
    pub faces: Vec<FaceAnalysis>,
}

/// The decision pipeline over two injected detector capabilities.
pub struct FrameAnalyzer {
    faces: Box<dyn RegionDetector>,
    eyes: Box<dyn RegionDetector>,
    threshold: f32,
    policy: FacePolicy,
}

impl FrameAnalyzer {
    pub fn new(faces: Box<dyn RegionDetector>, eyes: Box<dyn RegionDetector>) -> Self {
        Self {
            faces,
            eyes,
            threshold: EAR_THRESHOLD,
            policy: FacePolicy::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_policy(mut self, policy: FacePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Analyze one grayscale frame.
    ///
    /// Detector failures propagate; everything the detectors can
    /// legitimately report (including nothing at all) becomes a verdict,
    /// never an error.
    pub fn analyze(
        &mut self,
        gray: &[u8],
        width: u32,
        height: u32,
    ) -> Result<FrameReport, DetectorError> {
        let found = self.faces.detect(gray, width, height, None)?;

        if found.is_empty() {
            return Ok(FrameReport {
                verdict: Verdict::danger(REASON_NO_FACE),
                state: FaceState::NoFace,
                faces: Vec::new(),
            });
        }

        let mut analyses = Vec::with_capacity(found.len());
        for face in found {
            let eyes = self.eyes.detect(gray, width, height, Some(&face))?;
            analyses.push(self.analyze_face(face, eyes));
        }

        // Backend box order is unspecified; rank by confidence so the
        // aggregation policy is deterministic.
        analyses.sort_by(|a, b| {
            b.face
                .confidence
                .partial_cmp(&a.face.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let (verdict, state) = self.decide(&analyses);

        Ok(FrameReport {
            verdict,
            state,
            faces: analyses,
        })
    }

    /// Classify one face from its detected eye regions.
    ///
    /// With exactly two eye boxes, the first is labeled the left eye and
    /// the second the right without geometric verification; callers that
    /// need anatomical labels should sort the boxes by x first.
    fn analyze_face(&self, face: BoundingBox, eyes: Vec<BoundingBox>) -> FaceAnalysis {
        let (state, left_ear, right_ear, verdict) = match eyes.len() {
            0 => (FaceState::NoEyes, None, None, Verdict::danger(REASON_NO_EYES)),
            1 => (FaceState::OneEye, None, None, Verdict::danger(REASON_ONE_EYE)),
            2 => {
                let left = eye_aspect_ratio(&corner_landmarks(&eyes[0]));
                let right = eye_aspect_ratio(&corner_landmarks(&eyes[1]));
                let avg = (left + right) / 2.0;
                let verdict = if avg < self.threshold {
                    Verdict::clear(avg)
                } else {
                    Verdict::danger_at(avg)
                };
                (FaceState::TwoEyes, Some(left), Some(right), verdict)
            }
            _ => (
                FaceState::ManyEyes,
                None,
                None,
                Verdict::danger(REASON_MANY_EYES),
            ),
        };

        FaceAnalysis {
            face,
            eyes,
            state,
            left_ear,
            right_ear,
            verdict,
        }
    }

    /// Aggregate confidence-sorted analyses into the frame verdict.
    fn decide(&self, analyses: &[FaceAnalysis]) -> (Verdict, FaceState) {
        let deciding = match self.policy {
            FacePolicy::AnyDanger => analyses
                .iter()
                .find(|a| a.verdict.is_danger())
                .unwrap_or(&analyses[0]),
            FacePolicy::MostConfident => &analyses[0],
        };
        (deciding.verdict.clone(), deciding.state)
    }
}
