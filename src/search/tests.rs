use super::*;
use crate::catalog::{CatalogRecord, InMemoryCatalog};
use crate::embedding::mock::{ScriptedEncoder, basis};
use crate::enrich::{AttributeSource, EnrichedResult, Enricher};
use crate::index::{FlatL2Index, IdMap};
use crate::validation::GateOptions;
use crate::validation::mock::{ZERO_SHOT_DIM, image_scoring, zero_shot_encoder};
use image::{DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};

const DIM: usize = ZERO_SHOT_DIM;
/// Axis no category prompt uses; text queries and index vectors live on it.
const QUERY_AXIS: usize = 90;
const RED: [u8; 3] = [220, 20, 20];

/// Five vectors at squared distance `(0.1 * i)^2` from the query axis.
fn index() -> FlatL2Index {
    let vectors: Vec<Vec<f32>> = (0..5)
        .map(|i| {
            let mut v = vec![0.0; DIM];
            v[QUERY_AXIS] = 1.0 - 0.1 * i as f32;
            v
        })
        .collect();
    FlatL2Index::from_vectors(DIM, &vectors).unwrap()
}

fn ids() -> IdMap {
    ["10", "11", "12", "13", "14"].into_iter().collect()
}

fn record(id: &str, name: &str, article_type: &str, color: &str) -> CatalogRecord {
    let mut record = CatalogRecord::new(id, name);
    record.article_type = Some(article_type.to_string());
    record.base_color = Some(color.to_string());
    record
}

/// Rows for 10, 12 and 14; 11 and 13 are missing.
fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::from_records([
        record("10", "Blue Shirt", "Shirts", "Blue"),
        record("12", "Red Dress", "Dresses", "Red"),
        record("14", "Black Jeans", "Jeans", "Black"),
    ])
}

fn encoder() -> ScriptedEncoder {
    zero_shot_encoder()
        .with_text("red dress", basis(DIM, QUERY_AXIS))
        .with_image(RED, image_scoring(&[("dress", 0.8)]))
        .with_default_image(image_scoring(&[("car", 0.9)]))
}

fn engine(
    encoder: &ScriptedEncoder,
) -> SearchEngine<&ScriptedEncoder, FlatL2Index, InMemoryCatalog> {
    SearchEngine::new(encoder, index(), ids(), catalog())
}

fn save_solid(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb(color)))
        .save(&path)
        .unwrap();
    path
}

fn ids_of(results: &[EnrichedResult]) -> Vec<&str> {
    results.iter().map(EnrichedResult::id).collect()
}

mod blocklist_tests {
    use super::*;

    #[test]
    fn test_plain_fashion_query_passes() {
        assert!(!Blocklist::default().blocks("red dress"));
        assert!(!Blocklist::default().blocks("Navy Blue cotton shirt"));
    }

    #[test]
    fn test_whole_word_match() {
        assert_eq!(Blocklist::default().find("Dog collar"), Some("dog".to_string()));
    }

    #[test]
    fn test_hyphenated_piece_match() {
        assert_eq!(
            Blocklist::default().find("red car-print dress"),
            Some("car".to_string())
        );
    }

    #[test]
    fn test_no_substring_match() {
        assert!(!Blocklist::default().blocks("cardigan"));
        assert!(!Blocklist::default().blocks("sunglasses"));
    }

    #[test]
    fn test_phrase_match() {
        let blocklist = Blocklist::default();
        assert_eq!(
            blocklist.find("washing machine cover"),
            Some("washing machine".to_string())
        );
        assert!(!blocklist.blocks("machine washable jeans"));
    }

    #[test]
    fn test_custom_keywords() {
        let blocklist = Blocklist::new(["Sofa Bed", "lamp"]);
        assert!(blocklist.blocks("LAMP shade"));
        assert!(blocklist.blocks("sofa-bed throw"));
        assert!(!blocklist.blocks("sofa"));
    }
}

mod retrieval_tests {
    use super::*;

    #[test]
    fn test_missing_rows_become_degraded_slots() {
        let encoder = encoder();
        let engine = engine(&encoder);

        let outcome = engine.retrieve(&basis(DIM, QUERY_AXIS), 10);
        assert!(outcome.is_degraded());
        assert_eq!(outcome.issues().len(), 2);

        let candidates = outcome.into_value();
        let got: Vec<(&str, bool)> = candidates
            .iter()
            .map(|c| (c.id.as_str(), c.is_degraded()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("10", false),
                ("11", true),
                ("12", false),
                ("13", true),
                ("14", false),
            ]
        );
        assert_eq!(candidates[1].name, "Product 11");
        assert_eq!(candidates[1].image, "11.jpg");
    }

    #[test]
    fn test_similarity_is_one_minus_distance() {
        let encoder = encoder();
        let candidates = engine(&encoder)
            .retrieve(&basis(DIM, QUERY_AXIS), 5)
            .into_value();

        for (i, candidate) in candidates.iter().enumerate() {
            let expected = 1.0 - (0.1 * i as f32).powi(2);
            assert!((candidate.similarity - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_unmapped_position_uses_position_as_id() {
        let encoder = encoder();
        let engine = SearchEngine::new(
            &encoder,
            index(),
            ["10", "11", "12"].into_iter().collect(),
            catalog(),
        );

        let candidates = engine.retrieve(&basis(DIM, QUERY_AXIS), 5).into_value();
        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[3].id, "3");
        assert!(candidates[3].is_degraded());
    }

    #[test]
    fn test_dimension_mismatch_fails_empty() {
        let encoder = encoder();
        let engine = engine(&encoder);

        let outcome = engine.retrieve(&[1.0, 0.0], 5);
        assert!(outcome.is_failed());
        assert!(outcome.into_value().is_empty());
    }
}

mod text_tests {
    use super::*;

    #[test]
    fn test_keeps_every_slot() {
        let encoder = encoder();
        let outcome = engine(&encoder).search_text("red dress", &SearchOptions::default());

        assert!(outcome.is_degraded());
        let results = outcome.into_value();
        assert_eq!(ids_of(&results), vec!["10", "11", "12", "13", "14"]);
        assert!(results.iter().all(|r| !r.color_match));
    }

    #[test]
    fn test_caller_colors_rank_first() {
        let encoder = encoder();
        let options = SearchOptions::default().with_colors(["Red"]);
        let results = engine(&encoder)
            .search_text("red dress", &options)
            .into_value();

        assert_eq!(results[0].id(), "12");
        assert!(results[0].color_match);
        assert_eq!(results[0].similarity(), 1.0);
        assert_eq!(ids_of(&results[1..]), vec!["10", "11", "13", "14"]);
    }

    #[test]
    fn test_truncates_after_ranking() {
        let encoder = encoder();
        let options = SearchOptions::default().with_top_k(2).with_colors(["red"]);
        let results = engine(&encoder)
            .search_text("red dress", &options)
            .into_value();

        // fetch 4 reaches id 12, which the color boost lifts into the top 2
        assert_eq!(ids_of(&results), vec!["12", "10"]);
    }

    #[test]
    fn test_huge_top_k_returns_every_slot() {
        let encoder = encoder();
        let options = SearchOptions::default().with_top_k(usize::MAX);

        let results = engine(&encoder)
            .search_text("red dress", &options)
            .into_value();
        assert_eq!(ids_of(&results), vec!["10", "11", "12", "13", "14"]);
    }

    #[test]
    fn test_blocked_query_rejected_before_encoding() {
        let encoder = encoder();
        let outcome =
            engine(&encoder).search_text("red car-print dress", &SearchOptions::default());

        assert!(outcome.is_rejected());
        assert!(outcome.into_value().is_empty());
        assert_eq!(encoder.text_calls(), 0);
    }

    #[test]
    fn test_custom_blocklist_replaces_default() {
        let encoder = encoder();
        let engine = engine(&encoder).with_blocklist(Blocklist::new(["sequin"]));

        let blocked = engine.search_text("sequin top", &SearchOptions::default());
        assert!(blocked.is_rejected());

        // "car" is only on the default list
        let outcome = engine.search_text("red car-print dress", &SearchOptions::default());
        assert!(!outcome.is_rejected());
        assert_eq!(encoder.text_calls(), 1);
    }

    #[test]
    fn test_encoder_failure_is_empty() {
        let encoder = encoder().failing_text();
        let outcome = engine(&encoder).search_text("red dress", &SearchOptions::default());

        assert!(outcome.is_failed());
        assert!(outcome.into_value().is_empty());
    }

    #[test]
    fn test_enrichment_failure_keeps_results() {
        struct Broken;

        impl AttributeSource for Broken {
            fn pick(&self, _key: &str, _salt: &str, len: usize) -> usize {
                len
            }

            fn fraction(&self, _key: &str, _salt: &str) -> f64 {
                0.5
            }
        }

        let encoder = encoder();
        let engine = engine(&encoder).with_enricher(Enricher::new(Broken));
        let options = SearchOptions::default().with_top_k(3).with_colors(["red"]);

        let outcome = engine.search_text("red dress", &options);
        assert!(outcome.is_degraded());
        assert!(
            outcome
                .issues()
                .iter()
                .any(|issue| issue.starts_with("enrichment skipped"))
        );

        let results = outcome.into_value();
        assert_eq!(ids_of(&results), vec!["10", "11", "12"]);
        assert!(results.iter().all(|r| r.price.is_none()));
    }
}

mod image_tests {
    use super::*;

    #[test]
    fn test_detected_colors_drive_ranking() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_solid(dir.path(), "red.png", RED);
        let encoder = encoder();

        let outcome = engine(&encoder).search_image(&path, &SearchOptions::default());
        let results = outcome.into_value();

        assert_eq!(results.len(), 5);
        assert_eq!(results[0].id(), "12");
        assert!(results[0].color_match);
    }

    #[test]
    fn test_caller_colors_override_detected() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_solid(dir.path(), "red.png", RED);
        let encoder = encoder();

        let options = SearchOptions::default().with_colors(["black"]);
        let results = engine(&encoder).search_image(&path, &options).into_value();

        assert_eq!(results[0].id(), "14");
        assert!(results[0].color_match);
        assert!(!results[1..].iter().any(|r| r.color_match));
    }

    #[test]
    fn test_non_fashion_image_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_solid(dir.path(), "car.png", [40, 40, 40]);
        let encoder = encoder();

        let outcome = engine(&encoder).search_image(&path, &SearchOptions::default());
        assert!(outcome.is_rejected());
        assert!(outcome.into_value().is_empty());
        // validation only; the query embedding is never computed
        assert_eq!(encoder.image_calls(), 1);
    }

    #[test]
    fn test_missing_image_fails_empty() {
        let encoder = encoder();
        let outcome = engine(&encoder)
            .search_image(Path::new("/nonexistent/red.png"), &SearchOptions::default());
        assert!(outcome.is_failed());
        assert!(outcome.into_value().is_empty());
    }

    #[test]
    fn test_validate_delegates_to_gate() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_solid(dir.path(), "red.png", RED);
        let encoder = encoder();

        let outcome = engine(&encoder).validate(&path, GateOptions::default());
        assert!(outcome.is_complete());
        assert!(outcome.value().is_fashion_related);
    }
}

mod multimodal_tests {
    use super::*;

    #[test]
    fn test_colors_extracted_from_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_solid(dir.path(), "red.png", RED);
        let encoder = encoder();

        let results = engine(&encoder)
            .search_multimodal("red dress", &path, &SearchOptions::default())
            .into_value();

        assert_eq!(results.len(), 5);
        assert_eq!(results[0].id(), "12");
    }

    #[test]
    fn test_huge_top_k_returns_every_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_solid(dir.path(), "red.png", RED);
        let encoder = encoder();
        let options = SearchOptions::default().with_top_k(usize::MAX);
        let engine = engine(&encoder);

        assert_eq!(engine.search_image(&path, &options).into_value().len(), 5);
        assert_eq!(
            engine
                .search_multimodal("red dress", &path, &options)
                .into_value()
                .len(),
            5
        );
    }

    #[test]
    fn test_incoherent_pair_still_searched() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_solid(dir.path(), "red.png", RED);
        let encoder = encoder();
        let engine = engine(&encoder);

        // the text sits on an axis the image embedding never touches
        let coherence = engine.check_coherence("red dress", &path).into_value();
        assert!(!coherence.is_coherent);

        let options = SearchOptions::default().with_top_k(3);
        let outcome = engine.search_multimodal("red dress", &path, &options);
        assert_eq!(outcome.into_value().len(), 3);
    }

    #[test]
    fn test_encoder_failure_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_solid(dir.path(), "red.png", RED);
        let encoder = encoder().failing_images();

        let outcome =
            engine(&encoder).search_multimodal("red dress", &path, &SearchOptions::default());
        assert!(outcome.is_failed());
        assert!(outcome.into_value().is_empty());
    }
}
