use super::*;
use crate::embedding::mock::{ScriptedEncoder, at_cosine, basis};
use image::{Rgb, RgbImage};

const DIM: usize = 8;
const CORNER: [u8; 3] = [30, 30, 160];

fn image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb(CORNER)))
}

fn encoder_at(cos: f32) -> ScriptedEncoder {
    ScriptedEncoder::new(DIM)
        .with_text("blue shirt", basis(DIM, 0))
        .with_image(CORNER, at_cosine(DIM, cos, 3))
}

#[test]
fn test_similar_pair_is_coherent() {
    let checker = CoherenceChecker::new(encoder_at(0.3));
    let outcome = checker.check("blue shirt", &image());

    assert!(outcome.is_complete());
    let result = outcome.into_value();
    assert!(result.is_coherent);
    assert!((result.similarity - 0.3).abs() < 1e-5);
}

#[test]
fn test_threshold_is_inclusive() {
    let checker = CoherenceChecker::new(encoder_at(0.5)).with_threshold(0.5);
    assert!(checker.check("blue shirt", &image()).into_value().is_coherent);
}

#[test]
fn test_dissimilar_pair_is_incoherent() {
    let checker = CoherenceChecker::new(encoder_at(0.1));
    let result = checker.check("blue shirt", &image()).into_value();
    assert!(!result.is_coherent);
    assert!((result.similarity - 0.1).abs() < 1e-5);
}

#[test]
fn test_negative_similarity_is_reported() {
    let checker = CoherenceChecker::new(encoder_at(-0.4));
    let result = checker.check("blue shirt", &image()).into_value();
    assert!(!result.is_coherent);
    assert!(result.similarity < 0.0);
}

#[test]
fn test_image_failure_fails_open() {
    let checker = CoherenceChecker::new(encoder_at(0.1).failing_images());
    let outcome = checker.check("blue shirt", &image());

    assert!(outcome.is_failed());
    assert_eq!(outcome.into_value(), CoherenceResult::assumed());
}

#[test]
fn test_text_failure_fails_open() {
    let checker = CoherenceChecker::new(encoder_at(0.1).failing_text());
    let result = checker.check("blue shirt", &image()).into_value();
    assert!(result.is_coherent);
    assert_eq!(result.similarity, 1.0);
}

#[test]
fn test_missing_image_fails_open() {
    let encoder = encoder_at(0.1);
    let checker = CoherenceChecker::new(&encoder);
    let outcome = checker.check_path("blue shirt", Path::new("/nonexistent/shirt.jpg"));

    assert!(outcome.is_failed());
    assert!(outcome.value().is_coherent);
    assert_eq!(encoder.image_calls(), 0);
}

#[test]
fn test_check_path_decodes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shirt.png");
    image().save(&path).unwrap();

    let checker = CoherenceChecker::new(encoder_at(0.6));
    let result = checker.check_path("blue shirt", &path).into_value();
    assert!(result.is_coherent);
}

#[test]
fn test_serialized_shape() {
    let value = serde_json::to_value(CoherenceResult {
        is_coherent: false,
        similarity: f32::NAN,
    })
    .unwrap();
    assert_eq!(value["is_coherent"], serde_json::json!(false));
    assert!(value["similarity"].is_null());
}
