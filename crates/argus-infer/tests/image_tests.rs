//! Still-image pipeline tests with an encoded PNG fixture and a
//! classifier double.

use argus_infer::{FrameClassifier, FrameTensor, ImageDetector, InferError, Verdict};
use crates_image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::Arc;

struct FixedClassifier {
    score: f32,
}

impl FrameClassifier for FixedClassifier {
    fn input_hw(&self) -> (usize, usize) {
        (8, 8)
    }

    fn infer(&self, tensor: &FrameTensor) -> Result<f32, InferError> {
        assert_eq!(tensor.hw(), self.input_hw());
        Ok(self.score)
    }
}

fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(64, 48, Rgb([120, 30, 200]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn detector(score: f32) -> ImageDetector {
    ImageDetector::new(Arc::new(FixedClassifier { score }))
}

#[test]
fn test_high_score_labels_real() {
    let detection = detector(0.9).run(&png_bytes()).unwrap();
    assert_eq!(detection.label(), Verdict::Real);
    assert!(!detection.is_fake());
    assert!((detection.confidence() - 0.9).abs() < 1e-6);
    assert!((detection.score() - 0.9).abs() < 1e-6);
}

#[test]
fn test_low_score_labels_fake_with_complement_confidence() {
    let detection = detector(0.2).run(&png_bytes()).unwrap();
    assert_eq!(detection.label(), Verdict::Fake);
    assert!(detection.is_fake());
    assert!((detection.confidence() - 0.8).abs() < 1e-6);
    assert!((detection.score() - 0.2).abs() < 1e-6);
}

#[test]
fn test_score_exactly_half_labels_fake() {
    let detection = detector(0.5).run(&png_bytes()).unwrap();
    assert_eq!(detection.label(), Verdict::Fake);
}

#[test]
fn test_undecodable_bytes_are_unreadable() {
    let err = detector(0.9).run(b"not an image").unwrap_err();
    assert!(matches!(err, InferError::Unreadable(_)));
    assert!(err.is_input_error());
}

#[test]
fn test_json_shape() {
    let detection = detector(0.2).run(&png_bytes()).unwrap();
    let json = serde_json::to_value(&detection).unwrap();
    assert_eq!(json["prediction"], "fake");
    assert_eq!(json["is_fake"], true);
    assert!((json["confidence"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    assert!((json["score"].as_f64().unwrap() - 0.2).abs() < 1e-6);
}

#[tokio::test]
async fn test_run_async_matches_run() {
    let det = detector(0.9);
    let media = png_bytes();
    let sync = det.run(&media).unwrap();
    let offloaded = det.run_async(media).await.unwrap();
    assert_eq!(sync, offloaded);
}
