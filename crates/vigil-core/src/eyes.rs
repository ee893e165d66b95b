//! Eye-scale detection derived from face landmarks.

use crate::detector::{DetectorError, RegionDetector};
use crate::types::BoundingBox;

/// Eye box width as a fraction of the face box width.
pub const EYE_WIDTH_RATIO: f32 = 0.25;
/// Eye box height as a fraction of the face box height.
pub const EYE_HEIGHT_RATIO: f32 = 0.15;

/// Eye detector that reads the face region's eye keypoints instead of
/// scanning pixels.
///
/// Requires a `region` whose `landmarks` are populated (the SCRFD face
/// backend provides them); returns one box per eye keypoint, centered on
/// the keypoint and sized as a fixed fraction of the face box. The left
/// eye keypoint produces the first box, so the analyzer's two-box
/// labeling convention holds by construction. Without a region or
/// landmarks it reports no eyes.
pub struct KeypointEyeDetector {
    width_ratio: f32,
    height_ratio: f32,
}

impl KeypointEyeDetector {
    pub fn new() -> Self {
        Self {
            width_ratio: EYE_WIDTH_RATIO,
            height_ratio: EYE_HEIGHT_RATIO,
        }
    }

    /// Override the face-fraction ratios used to size eye boxes.
    pub fn with_ratios(mut self, width_ratio: f32, height_ratio: f32) -> Self {
        self.width_ratio = width_ratio;
        self.height_ratio = height_ratio;
        self
    }
}

impl Default for KeypointEyeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionDetector for KeypointEyeDetector {
    fn detect(
        &mut self,
        _gray: &[u8],
        _width: u32,
        _height: u32,
        region: Option<&BoundingBox>,
    ) -> Result<Vec<BoundingBox>, DetectorError> {
        let Some(face) = region else {
            return Ok(Vec::new());
        };
        let Some(landmarks) = face.landmarks else {
            return Ok(Vec::new());
        };

        let box_w = face.width * self.width_ratio;
        let box_h = face.height * self.height_ratio;

        // Landmarks 0 and 1 are the left and right eye centers.
        let eyes = landmarks[..2]
            .iter()
            .map(|&(cx, cy)| BoundingBox {
                x: cx - box_w / 2.0,
                y: cy - box_h / 2.0,
                width: box_w,
                height: box_h,
                confidence: face.confidence,
                landmarks: None,
            })
            .collect();

        Ok(eyes)
    }
}
