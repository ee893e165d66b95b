//! Region detection: the capability trait and the SCRFD ONNX backend.
//!
//! SCRFD (Sample and Computation Redistribution for Efficient Face
//! Detection) runs anchor-free with 3-stride decoding and NMS
//! post-processing, and emits the five-point landmarks the keypoint eye
//! backend consumes.

use crate::types::BoundingBox;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use thiserror::Error;

const SCRFD_INPUT_SIZE: usize = 640;
const SCRFD_MEAN: f32 = 127.5;
const SCRFD_STD: f32 = 128.0;
const SCRFD_CONFIDENCE_THRESHOLD: f32 = 0.5;
const SCRFD_NMS_THRESHOLD: f32 = 0.4;
const SCRFD_STRIDES: [usize; 3] = [8, 16, 32];
const SCRFD_ANCHORS_PER_CELL: usize = 2;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("model file not found: {0}")]
    ModelNotFound(String),
    #[error("invalid model data: {0}")]
    InvalidModel(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("ort: {0}")]
    Ort(#[from] ort::Error),
}

/// Capability interface for detection backends.
///
/// `region`, when given, restricts the search to a sub-rectangle of the
/// frame; returned boxes are in full-frame coordinates either way. Box
/// order is backend-defined and callers must treat it as unordered.
pub trait RegionDetector: Send {
    fn detect(
        &mut self,
        gray: &[u8],
        width: u32,
        height: u32,
        region: Option<&BoundingBox>,
    ) -> Result<Vec<BoundingBox>, DetectorError>;
}

/// A sub-image cut out of a grayscale frame, with the offset needed to
/// map detections back to frame coordinates.
pub(crate) struct CroppedRegion {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Cut `region` out of a row-major grayscale frame, clamped to frame
/// bounds. Returns None when the clamped region is empty.
pub(crate) fn crop_region(
    gray: &[u8],
    width: u32,
    height: u32,
    region: &BoundingBox,
) -> Option<CroppedRegion> {
    let x0 = region.x.max(0.0).floor() as u32;
    let y0 = region.y.max(0.0).floor() as u32;
    let x1 = (region.x + region.width).ceil().min(width as f32).max(0.0) as u32;
    let y1 = (region.y + region.height).ceil().min(height as f32).max(0.0) as u32;

    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    let crop_w = x1 - x0;
    let crop_h = y1 - y0;
    let mut pixels = Vec::with_capacity((crop_w * crop_h) as usize);
    for y in y0..y1 {
        let row = (y * width + x0) as usize;
        pixels.extend_from_slice(&gray[row..row + crop_w as usize]);
    }

    Some(CroppedRegion {
        pixels,
        width: crop_w,
        height: crop_h,
        offset_x: x0 as f32,
        offset_y: y0 as f32,
    })
}

/// Shift detections from crop-local back to full-frame coordinates.
pub(crate) fn offset_boxes(boxes: &mut [BoundingBox], dx: f32, dy: f32) {
    for b in boxes.iter_mut() {
        b.x += dx;
        b.y += dy;
        if let Some(lms) = b.landmarks.as_mut() {
            for p in lms.iter_mut() {
                p.0 += dx;
                p.1 += dy;
            }
        }
    }
}

/// Metadata for coordinate de-mapping after letterbox resize.
struct LetterboxInfo {
    scale: f32,
    pad_x: f32,
    pad_y: f32,
}

/// Output tensor indices for one stride: (score_idx, bbox_idx, kps_idx).
type StrideOutputIndices = (usize, usize, usize);

/// SCRFD-based detector, the ONNX variant of the capability.
pub struct ScrfdDetector {
    session: Session,
    input_height: usize,
    input_width: usize,
    /// Per-stride output indices [(score, bbox, kps)] for strides [8, 16, 32].
    /// Discovered by name at load time; falls back to positional ordering.
    stride_indices: [StrideOutputIndices; 3],
}

impl ScrfdDetector {
    /// Load the SCRFD ONNX model from the given path.
    pub fn load(model_path: &str) -> Result<Self, DetectorError> {
        if !Path::new(model_path).exists() {
            return Err(DetectorError::ModelNotFound(model_path.to_string()));
        }

        let session = Session::builder()?
            .with_intra_threads(2)?
            .commit_from_file(model_path)?;

        let output_names: Vec<String> =
            session.outputs().iter().map(|o| o.name().to_string()).collect();
        let num_outputs = output_names.len();

        tracing::info!(
            path = model_path,
            inputs = ?session.inputs().iter().map(|i| (i.name(), i.dtype())).collect::<Vec<_>>(),
            outputs = ?output_names,
            "loaded SCRFD model"
        );

        if num_outputs < 9 {
            return Err(DetectorError::InvalidModel(format!(
                "SCRFD model requires 9 outputs (3 strides x score/bbox/kps), got {num_outputs}"
            )));
        }

        // SCRFD exports may name tensors "score_8"/"bbox_16"/"kps_32" or
        // as generic integers; fall back to positional ordering when the
        // names are not recognized.
        let stride_indices = discover_output_indices(&output_names);
        tracing::debug!(?stride_indices, "SCRFD output tensor mapping");

        Ok(Self {
            session,
            input_height: SCRFD_INPUT_SIZE,
            input_width: SCRFD_INPUT_SIZE,
            stride_indices,
        })
    }

    /// Run the model over one grayscale image, returning detections
    /// sorted by confidence (descending) in image-local coordinates.
    fn run(&mut self, gray: &[u8], width: u32, height: u32) -> Result<Vec<BoundingBox>, DetectorError> {
        let (input, letterbox) = self.preprocess(gray, width as usize, height as usize);

        let outputs = self
            .session
            .run(ort::inputs![TensorRef::from_array_view(input.view())?])?;

        let mut all_detections = Vec::new();

        for (stride_pos, &stride) in SCRFD_STRIDES.iter().enumerate() {
            let (score_idx, bbox_idx, kps_idx) = self.stride_indices[stride_pos];

            let (_, scores) = outputs[score_idx]
                .try_extract_tensor::<f32>()
                .map_err(|e| DetectorError::InferenceFailed(format!("scores stride {stride}: {e}")))?;
            let (_, bboxes) = outputs[bbox_idx]
                .try_extract_tensor::<f32>()
                .map_err(|e| DetectorError::InferenceFailed(format!("bboxes stride {stride}: {e}")))?;
            let (_, kps) = outputs[kps_idx]
                .try_extract_tensor::<f32>()
                .map_err(|e| DetectorError::InferenceFailed(format!("kps stride {stride}: {e}")))?;

            let dets = decode_stride(
                scores,
                bboxes,
                kps,
                stride,
                self.input_width,
                self.input_height,
                &letterbox,
                SCRFD_CONFIDENCE_THRESHOLD,
            );
            all_detections.extend(dets);
        }

        let mut result = nms(all_detections, SCRFD_NMS_THRESHOLD);
        result.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(result)
    }

    /// Preprocess a grayscale frame into a NCHW float tensor with letterbox padding.
    ///
    /// Resizes using bilinear interpolation to preserve edge sharpness, then
    /// normalizes to the SCRFD input distribution.
    fn preprocess(&self, frame: &[u8], width: usize, height: usize) -> (Array4<f32>, LetterboxInfo) {
        // Compute letterbox scale (fit within input_width x input_height)
        let scale_w = self.input_width as f32 / width as f32;
        let scale_h = self.input_height as f32 / height as f32;
        let scale = scale_w.min(scale_h);

        let new_w = (width as f32 * scale).round() as usize;
        let new_h = (height as f32 * scale).round() as usize;
        let pad_x = (self.input_width - new_w) as f32 / 2.0;
        let pad_y = (self.input_height - new_h) as f32 / 2.0;

        let letterbox = LetterboxInfo { scale, pad_x, pad_y };

        // Bilinear resize for sub-pixel accuracy.
        let inv_scale = 1.0 / scale;
        let mut resized = vec![0u8; new_w * new_h];
        for y in 0..new_h {
            let src_y = (y as f32 + 0.5) * inv_scale - 0.5;
            let y0 = (src_y.floor() as i32).clamp(0, height as i32 - 1) as usize;
            let y1 = (y0 + 1).min(height - 1);
            let fy = (src_y - src_y.floor()).clamp(0.0, 1.0);

            for x in 0..new_w {
                let src_x = (x as f32 + 0.5) * inv_scale - 0.5;
                let x0 = (src_x.floor() as i32).clamp(0, width as i32 - 1) as usize;
                let x1 = (x0 + 1).min(width - 1);
                let fx = (src_x - src_x.floor()).clamp(0.0, 1.0);

                let tl = frame[y0 * width + x0] as f32;
                let tr = frame[y0 * width + x1] as f32;
                let bl = frame[y1 * width + x0] as f32;
                let br = frame[y1 * width + x1] as f32;

                let val = tl * (1.0 - fx) * (1.0 - fy)
                    + tr * fx * (1.0 - fy)
                    + bl * (1.0 - fx) * fy
                    + br * fx * fy;

                resized[y * new_w + x] = val.round().clamp(0.0, 255.0) as u8;
            }
        }

        // NCHW tensor with letterbox padding (pad with SCRFD_MEAN, which
        // normalizes to 0.0).
        let pad_x_start = pad_x.floor() as usize;
        let pad_y_start = pad_y.floor() as usize;

        let mut tensor = Array4::<f32>::zeros((1, 3, self.input_height, self.input_width));

        for y in 0..self.input_height {
            for x in 0..self.input_width {
                let pixel = if y >= pad_y_start
                    && y < pad_y_start + new_h
                    && x >= pad_x_start
                    && x < pad_x_start + new_w
                {
                    resized[(y - pad_y_start) * new_w + (x - pad_x_start)] as f32
                } else {
                    SCRFD_MEAN
                };

                let normalized = (pixel - SCRFD_MEAN) / SCRFD_STD;
                // Grayscale to 3-channel: replicate Y into R, G, B.
                tensor[[0, 0, y, x]] = normalized;
                tensor[[0, 1, y, x]] = normalized;
                tensor[[0, 2, y, x]] = normalized;
            }
        }

        (tensor, letterbox)
    }
}

impl RegionDetector for ScrfdDetector {
    fn detect(
        &mut self,
        gray: &[u8],
        width: u32,
        height: u32,
        region: Option<&BoundingBox>,
    ) -> Result<Vec<BoundingBox>, DetectorError> {
        match region {
            None => self.run(gray, width, height),
            Some(r) => {
                let Some(crop) = crop_region(gray, width, height, r) else {
                    return Ok(Vec::new());
                };
                let mut boxes = self.run(&crop.pixels, crop.width, crop.height)?;
                offset_boxes(&mut boxes, crop.offset_x, crop.offset_y);
                Ok(boxes)
            }
        }
    }
}

/// Discover output tensor ordering by name.
///
/// When the "score_8"/"bbox_8"/"kps_8" pattern is present for every
/// stride, map by name; otherwise use the standard positional ordering:
///   [0-2] = scores (strides 8, 16, 32)
///   [3-5] = bboxes (strides 8, 16, 32)
///   [6-8] = kps    (strides 8, 16, 32)
fn discover_output_indices(names: &[String]) -> [StrideOutputIndices; 3] {
    let find = |prefix: &str, stride: usize| -> Option<usize> {
        let target = format!("{prefix}_{stride}");
        names.iter().position(|n| n == &target)
    };

    let named = SCRFD_STRIDES.iter().all(|&stride| {
        find("score", stride).is_some()
            && find("bbox", stride).is_some()
            && find("kps", stride).is_some()
    });

    if named {
        tracing::info!("SCRFD: using name-based output tensor mapping");
        std::array::from_fn(|i| {
            let stride = SCRFD_STRIDES[i];
            (
                find("score", stride).unwrap(),
                find("bbox", stride).unwrap(),
                find("kps", stride).unwrap(),
            )
        })
    } else {
        tracing::info!(
            ?names,
            "SCRFD: output names not recognized, using positional mapping [0-2]=scores, [3-5]=bboxes, [6-8]=kps"
        );
        [(0, 3, 6), (1, 4, 7), (2, 5, 8)]
    }
}

/// Decode detections for a single stride level.
#[allow(clippy::too_many_arguments)]
fn decode_stride(
    scores: &[f32],
    bboxes: &[f32],
    kps: &[f32],
    stride: usize,
    input_width: usize,
    input_height: usize,
    letterbox: &LetterboxInfo,
    threshold: f32,
) -> Vec<BoundingBox> {
    let grid_h = input_height / stride;
    let grid_w = input_width / stride;
    let num_anchors = grid_h * grid_w * SCRFD_ANCHORS_PER_CELL;

    let mut detections = Vec::new();

    for idx in 0..num_anchors {
        let score = scores.get(idx).copied().unwrap_or(0.0);
        if score <= threshold {
            continue;
        }

        let anchor_idx = idx / SCRFD_ANCHORS_PER_CELL;
        let cy = (anchor_idx / grid_w) as f32;
        let cx = (anchor_idx % grid_w) as f32;

        let anchor_cx = cx * stride as f32;
        let anchor_cy = cy * stride as f32;

        // Decode bbox: [x1_offset, y1_offset, x2_offset, y2_offset] * stride
        let bbox_off = idx * 4;
        if bbox_off + 3 >= bboxes.len() {
            continue;
        }
        let x1 = anchor_cx - bboxes[bbox_off] * stride as f32;
        let y1 = anchor_cy - bboxes[bbox_off + 1] * stride as f32;
        let x2 = anchor_cx + bboxes[bbox_off + 2] * stride as f32;
        let y2 = anchor_cy + bboxes[bbox_off + 3] * stride as f32;

        // Map from letterboxed space to original frame space
        let orig_x1 = (x1 - letterbox.pad_x) / letterbox.scale;
        let orig_y1 = (y1 - letterbox.pad_y) / letterbox.scale;
        let orig_x2 = (x2 - letterbox.pad_x) / letterbox.scale;
        let orig_y2 = (y2 - letterbox.pad_y) / letterbox.scale;

        // Decode landmarks
        let kps_off = idx * 10;
        let landmarks = if kps_off + 9 < kps.len() {
            let mut lms = [(0.0f32, 0.0f32); 5];
            for i in 0..5 {
                let lx = anchor_cx + kps[kps_off + i * 2] * stride as f32;
                let ly = anchor_cy + kps[kps_off + i * 2 + 1] * stride as f32;
                lms[i] = (
                    (lx - letterbox.pad_x) / letterbox.scale,
                    (ly - letterbox.pad_y) / letterbox.scale,
                );
            }
            Some(lms)
        } else {
            None
        };

        detections.push(BoundingBox {
            x: orig_x1,
            y: orig_y1,
            width: orig_x2 - orig_x1,
            height: orig_y2 - orig_y1,
            confidence: score,
            landmarks,
        });
    }

    detections
}

/// Non-Maximum Suppression: remove overlapping detections.
pub(crate) fn nms(mut detections: Vec<BoundingBox>, iou_threshold: f32) -> Vec<BoundingBox> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; detections.len()];

    for i in 0..detections.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(detections[i].clone());

        for j in (i + 1)..detections.len() {
            if suppressed[j] {
                continue;
            }
            if detections[i].iou(&detections[j]) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bbox(x: f32, y: f32, w: f32, h: f32, conf: f32) -> BoundingBox {
        BoundingBox {
            x,
            y,
            width: w,
            height: h,
            confidence: conf,
            landmarks: None,
        }
    }

    #[test]
    fn test_nms_suppresses_overlapping() {
        let detections = vec![
            make_bbox(0.0, 0.0, 100.0, 100.0, 0.9),
            make_bbox(5.0, 5.0, 100.0, 100.0, 0.8),
            make_bbox(200.0, 200.0, 50.0, 50.0, 0.7),
        ];
        let result = nms(detections, 0.4);
        assert_eq!(result.len(), 2);
        assert!((result[0].confidence - 0.9).abs() < 1e-6);
        assert!((result[1].confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_nms_no_suppression() {
        let detections = vec![
            make_bbox(0.0, 0.0, 10.0, 10.0, 0.9),
            make_bbox(50.0, 50.0, 10.0, 10.0, 0.8),
        ];
        let result = nms(detections, 0.4);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_nms_empty() {
        let result = nms(vec![], 0.4);
        assert!(result.is_empty());
    }

    #[test]
    fn test_crop_region_extracts_subimage() {
        // 4x4 frame with row-major values 0..16
        let gray: Vec<u8> = (0..16).collect();
        let region = make_bbox(1.0, 1.0, 2.0, 2.0, 1.0);
        let crop = crop_region(&gray, 4, 4, &region).unwrap();
        assert_eq!(crop.width, 2);
        assert_eq!(crop.height, 2);
        assert_eq!(crop.pixels, vec![5, 6, 9, 10]);
        assert_eq!(crop.offset_x, 1.0);
        assert_eq!(crop.offset_y, 1.0);
    }

    #[test]
    fn test_crop_region_clamps_to_frame() {
        let gray: Vec<u8> = (0..16).collect();
        let region = make_bbox(-5.0, 2.0, 100.0, 100.0, 1.0);
        let crop = crop_region(&gray, 4, 4, &region).unwrap();
        assert_eq!(crop.width, 4);
        assert_eq!(crop.height, 2);
        assert_eq!(crop.offset_x, 0.0);
        assert_eq!(crop.offset_y, 2.0);
        assert_eq!(crop.pixels, vec![8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_crop_region_outside_frame() {
        let gray: Vec<u8> = (0..16).collect();
        let region = make_bbox(10.0, 10.0, 5.0, 5.0, 1.0);
        assert!(crop_region(&gray, 4, 4, &region).is_none());
    }

    #[test]
    fn test_crop_region_fractional_edges() {
        // Fractional coordinates expand outward: floor on the near edge,
        // ceil on the far one.
        let gray: Vec<u8> = (0..16).collect();
        let region = make_bbox(0.6, 0.6, 1.8, 1.8, 1.0);
        let crop = crop_region(&gray, 4, 4, &region).unwrap();
        assert_eq!((crop.offset_x, crop.offset_y), (0.0, 0.0));
        assert_eq!((crop.width, crop.height), (3, 3));
    }

    #[test]
    fn test_offset_boxes_shifts_boxes_and_landmarks() {
        let mut boxes = vec![BoundingBox {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
            confidence: 0.5,
            landmarks: Some([(0.0, 0.0); 5]),
        }];
        offset_boxes(&mut boxes, 10.0, 20.0);
        assert_eq!(boxes[0].x, 11.0);
        assert_eq!(boxes[0].y, 22.0);
        assert_eq!(boxes[0].width, 3.0);
        assert_eq!(boxes[0].landmarks.unwrap()[0], (10.0, 20.0));
    }

    #[test]
    fn test_letterbox_coordinate_roundtrip() {
        let width = 320.0f32;
        let height = 240.0f32;
        let scale_w = 640.0 / width;
        let scale_h = 640.0 / height;
        let scale = scale_w.min(scale_h);
        let new_w = (width * scale).round();
        let new_h = (height * scale).round();
        let pad_x = (640.0 - new_w) / 2.0;
        let pad_y = (640.0 - new_h) / 2.0;

        let letterbox = LetterboxInfo { scale, pad_x, pad_y };

        let orig_x = 100.0f32;
        let orig_y = 50.0f32;
        let letterboxed_x = orig_x * scale + pad_x;
        let letterboxed_y = orig_y * scale + pad_y;

        let recovered_x = (letterboxed_x - letterbox.pad_x) / letterbox.scale;
        let recovered_y = (letterboxed_y - letterbox.pad_y) / letterbox.scale;

        assert!((recovered_x - orig_x).abs() < 0.1, "x: {recovered_x} vs {orig_x}");
        assert!((recovered_y - orig_y).abs() < 0.1, "y: {recovered_y} vs {orig_y}");
    }

    #[test]
    fn test_discover_output_indices_named() {
        let names: Vec<String> = [
            "score_8", "score_16", "score_32",
            "bbox_8", "bbox_16", "bbox_32",
            "kps_8", "kps_16", "kps_32",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let indices = discover_output_indices(&names);

        assert_eq!(indices[0], (0, 3, 6));
        assert_eq!(indices[1], (1, 4, 7));
        assert_eq!(indices[2], (2, 5, 8));
    }

    #[test]
    fn test_discover_output_indices_shuffled_named() {
        let names: Vec<String> = [
            "bbox_8", "kps_8", "score_8",
            "bbox_16", "kps_16", "score_16",
            "bbox_32", "kps_32", "score_32",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let indices = discover_output_indices(&names);

        assert_eq!(indices[0], (2, 0, 1));
        assert_eq!(indices[1], (5, 3, 4));
        assert_eq!(indices[2], (8, 6, 7));
    }

    #[test]
    fn test_discover_output_indices_positional_fallback() {
        // Generic numeric names fall back to positional mapping.
        let names: Vec<String> = (0..9).map(|i: usize| i.to_string()).collect();
        let indices = discover_output_indices(&names);
        assert_eq!(indices, [(0, 3, 6), (1, 4, 7), (2, 5, 8)]);
    }

    #[test]
    fn test_decode_stride_empty_below_threshold() {
        let letterbox = LetterboxInfo { scale: 1.0, pad_x: 0.0, pad_y: 0.0 };
        let scores = vec![0.1f32; 32];
        let bboxes = vec![0.0f32; 128];
        let kps = vec![0.0f32; 320];
        let dets = decode_stride(&scores, &bboxes, &kps, 160, 640, 640, &letterbox, 0.5);
        assert!(dets.is_empty());
    }
}
