//! Eye-aspect-ratio math and corner-landmark approximation.

use crate::types::{BoundingBox, EyeLandmarks};

/// Minimum number of landmark points required to measure an EAR.
pub const MIN_EAR_POINTS: usize = 6;

/// Compute the eye aspect ratio from ordered landmark points.
///
/// The first six points are taken as eye landmarks in the conventional
/// order (outer corner, upper-lid pair, inner corner, lower-lid pair):
///
/// ```text
/// A = dist(p1, p5)
/// B = dist(p2, p4)
/// C = dist(p0, p3)
/// EAR = (A + B) / (2 * C)
/// ```
///
/// Returns the sentinel 0.0 when fewer than [`MIN_EAR_POINTS`] points are
/// supplied, or when the outer corners coincide (C = 0). The sentinel
/// means "insufficient data", not a measured ratio; callers must
/// special-case it. Points beyond the first six are ignored.
pub fn eye_aspect_ratio(points: &[(f32, f32)]) -> f32 {
    if points.len() < MIN_EAR_POINTS {
        return 0.0;
    }

    let a = distance(points[1], points[5]);
    let b = distance(points[2], points[4]);
    let c = distance(points[0], points[3]);

    if c == 0.0 {
        return 0.0;
    }

    (a + b) / (2.0 * c)
}

/// Approximate an eye's landmarks from the four corners of its detection
/// box, ordered top-left, top-right, bottom-right, bottom-left.
///
/// A rectangle proxy for eyelid geometry: an EAR computed from these
/// corners measures the box's aspect, not eyelid openness, and since only
/// four points are produced the six-point EAR yields its sentinel.
pub fn corner_landmarks(eye: &BoundingBox) -> EyeLandmarks {
    [
        (eye.x, eye.y),
        (eye.x + eye.width, eye.y),
        (eye.x + eye.width, eye.y + eye.height),
        (eye.x, eye.y + eye.height),
    ]
}

fn distance(p: (f32, f32), q: (f32, f32)) -> f32 {
    ((p.0 - q.0).powi(2) + (p.1 - q.1).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ear_six_points() {
        // C = dist((0,0),(4,0)) = 4
        // A = dist((1,2),(1,-1)) = 3
        // B = dist((3,1),(3,-1)) = 2
        let points = [
            (0.0, 0.0),
            (1.0, 2.0),
            (3.0, 1.0),
            (4.0, 0.0),
            (3.0, -1.0),
            (1.0, -1.0),
        ];
        let ear = eye_aspect_ratio(&points);
        let expected = (3.0 + 2.0) / (2.0 * 4.0);
        assert!(
            (ear - expected).abs() < 1e-6,
            "ear {ear} vs expected {expected}"
        );
    }

    #[test]
    fn test_ear_pairing_relabel_invariant() {
        // Swapping within the (1,5), (2,4), (0,3) pairs leaves EAR unchanged.
        let points = [
            (0.0, 0.0),
            (1.0, 2.0),
            (3.0, 1.0),
            (4.0, 0.0),
            (3.0, -1.0),
            (1.0, -1.0),
        ];
        let relabeled = [
            points[3], points[5], points[4], points[0], points[2], points[1],
        ];
        let a = eye_aspect_ratio(&points);
        let b = eye_aspect_ratio(&relabeled);
        assert!((a - b).abs() < 1e-6, "relabeled {b} vs original {a}");
    }

    #[test]
    fn test_ear_insufficient_points() {
        for n in 0..MIN_EAR_POINTS {
            let points: Vec<(f32, f32)> = (0..n).map(|i| (i as f32, i as f32)).collect();
            assert_eq!(
                eye_aspect_ratio(&points),
                0.0,
                "{n} points should yield the sentinel"
            );
        }
    }

    #[test]
    fn test_ear_degenerate_outer_corners() {
        // p0 == p3 makes C zero; policy is the sentinel, not a panic.
        let points = [
            (2.0, 2.0),
            (1.0, 3.0),
            (3.0, 3.0),
            (2.0, 2.0),
            (3.0, 1.0),
            (1.0, 1.0),
        ];
        assert_eq!(eye_aspect_ratio(&points), 0.0);
    }

    #[test]
    fn test_ear_ignores_extra_points() {
        let mut points = vec![
            (0.0, 0.0),
            (1.0, 2.0),
            (3.0, 1.0),
            (4.0, 0.0),
            (3.0, -1.0),
            (1.0, -1.0),
        ];
        let base = eye_aspect_ratio(&points);
        points.push((1000.0, -1000.0));
        assert_eq!(eye_aspect_ratio(&points), base);
    }

    #[test]
    fn test_corner_landmarks_exact() {
        let eye = BoundingBox {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 15.0,
            confidence: 1.0,
            landmarks: None,
        };
        assert_eq!(
            corner_landmarks(&eye),
            [(10.0, 20.0), (40.0, 20.0), (40.0, 35.0), (10.0, 35.0)]
        );
    }

    #[test]
    fn test_corner_landmarks_feed_ear_sentinel() {
        // Four corner points are below the six-point minimum, so the
        // pipeline's per-eye EAR is always the sentinel.
        let eye = BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            confidence: 1.0,
            landmarks: None,
        };
        assert_eq!(eye_aspect_ratio(&corner_landmarks(&eye)), 0.0);
    }
}
