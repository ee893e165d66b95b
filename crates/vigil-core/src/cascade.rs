//! Cascade classifier backend via the `rustface` crate (SeetaFace engine).

use crate::detector::{crop_region, offset_boxes, DetectorError, RegionDetector};
use crate::types::BoundingBox;
use std::path::Path;

/// Sensitivity parameters for one cascade instance.
///
/// The pyramid scale factor plays the role of a scale step and the score
/// threshold that of a neighbor/sensitivity knob; face-scale and
/// eye-scale instances are tuned independently.
#[derive(Debug, Clone, Copy)]
pub struct CascadeTuning {
    /// Smallest object size considered, in pixels.
    pub min_object_size: u32,
    /// Stage score required to accept a window.
    pub score_threshold: f64,
    /// Image pyramid downscale factor per level (0 < f < 1).
    pub pyramid_scale: f32,
    /// Sliding window step in pixels (applied to both axes).
    pub window_step: u32,
}

impl Default for CascadeTuning {
    fn default() -> Self {
        Self {
            min_object_size: 20,
            score_threshold: 2.0,
            pyramid_scale: 0.8,
            window_step: 4,
        }
    }
}

/// Funnel-cascade detector, the classifier variant of the capability.
///
/// Model-file agnostic: load a frontal-face model for the face-scale
/// instance and an eye model for the eye-scale one. Detections carry no
/// landmarks.
pub struct CascadeDetector {
    model_path: String,
    tuning: CascadeTuning,
}

impl CascadeDetector {
    /// Validate a SeetaFace-format cascade model and keep its path.
    ///
    /// The underlying detector object is not `Send` and keeps per-image
    /// pyramid state, so one is built from the model file for each scan
    /// instead of being held here.
    pub fn load(model_path: &str, tuning: CascadeTuning) -> Result<Self, DetectorError> {
        if !Path::new(model_path).exists() {
            return Err(DetectorError::ModelNotFound(model_path.to_string()));
        }

        // Fail fast on malformed model data, outside the per-frame loop.
        rustface::create_detector(model_path)
            .map_err(|e| DetectorError::InvalidModel(format!("{model_path}: {e}")))?;

        tracing::info!(path = model_path, ?tuning, "loaded cascade model");

        Ok(Self {
            model_path: model_path.to_string(),
            tuning,
        })
    }

    fn scan(&self, gray: &[u8], width: u32, height: u32) -> Result<Vec<BoundingBox>, DetectorError> {
        let mut detector = rustface::create_detector(&self.model_path)
            .map_err(|e| DetectorError::InvalidModel(format!("{}: {e}", self.model_path)))?;
        detector.set_min_face_size(self.tuning.min_object_size);
        detector.set_score_thresh(self.tuning.score_threshold);
        detector.set_pyramid_scale_factor(self.tuning.pyramid_scale);
        detector.set_slide_window_step(self.tuning.window_step, self.tuning.window_step);

        let mut image = rustface::ImageData::new(gray.as_ptr(), width, height);
        let found = detector.detect(&mut image);

        Ok(found
            .iter()
            .map(|info| {
                let bbox = info.bbox();
                BoundingBox {
                    x: bbox.x() as f32,
                    y: bbox.y() as f32,
                    width: bbox.width() as f32,
                    height: bbox.height() as f32,
                    confidence: info.score() as f32,
                    landmarks: None,
                }
            })
            .collect())
    }
}

impl RegionDetector for CascadeDetector {
    fn detect(
        &mut self,
        gray: &[u8],
        width: u32,
        height: u32,
        region: Option<&BoundingBox>,
    ) -> Result<Vec<BoundingBox>, DetectorError> {
        match region {
            None => self.scan(gray, width, height),
            Some(r) => {
                let Some(crop) = crop_region(gray, width, height, r) else {
                    return Ok(Vec::new());
                };
                let mut boxes = self.scan(&crop.pixels, crop.width, crop.height)?;
                offset_boxes(&mut boxes, crop.offset_x, crop.offset_y);
                Ok(boxes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_not_found() {
        let err = CascadeDetector::load("/nonexistent/model.bin", CascadeTuning::default())
            .err()
            .unwrap();
        assert!(matches!(err, DetectorError::ModelNotFound(_)));
    }

    #[test]
    fn test_default_tuning() {
        let t = CascadeTuning::default();
        assert_eq!(t.min_object_size, 20);
        assert!((t.pyramid_scale - 0.8).abs() < 1e-6);
    }
}
