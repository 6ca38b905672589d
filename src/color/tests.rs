use super::*;
use image::{DynamicImage, Rgb, RgbImage};

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(rgb)))
}

mod hsv_tests {
    use super::*;

    fn approx(a: (f32, f32, f32), b: (f32, f32, f32)) -> bool {
        (a.0 - b.0).abs() < 0.5 && (a.1 - b.1).abs() < 0.5 && (a.2 - b.2).abs() < 0.5
    }

    #[test]
    fn test_primaries() {
        assert!(approx(rgb_to_hsv(255, 0, 0), (0.0, 100.0, 100.0)));
        assert!(approx(rgb_to_hsv(0, 255, 0), (120.0, 100.0, 100.0)));
        assert!(approx(rgb_to_hsv(0, 0, 255), (240.0, 100.0, 100.0)));
    }

    #[test]
    fn test_gray_has_zero_saturation() {
        let (h, s, v) = rgb_to_hsv(128, 128, 128);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((v - 50.2).abs() < 0.1);
    }

    #[test]
    fn test_hue_wraps_to_positive() {
        // magenta-leaning red: b slightly above g puts hue just below 360
        let (h, _, _) = rgb_to_hsv(255, 0, 20);
        assert!(h > 350.0 && h < 360.0, "hue was {h}");
    }
}

mod identify_tests {
    use super::*;

    #[test]
    fn test_grayscale_short_circuit_is_total() {
        let mut s = 0.0;
        while s < 10.0 {
            let mut v = 0.0;
            while v <= 100.0 {
                let mut h = 0.0;
                while h < 360.0 {
                    let name = identify_color(h, s, v);
                    assert!(
                        matches!(
                            name,
                            Some(ColorName::Black) | Some(ColorName::White) | Some(ColorName::Grey)
                        ),
                        "h={h} s={s} v={v} gave {name:?}"
                    );
                    h += 15.0;
                }
                v += 2.5;
            }
            s += 0.5;
        }
    }

    #[test]
    fn test_grayscale_bands() {
        assert_eq!(identify_color(0.0, 5.0, 10.0), Some(ColorName::Black));
        assert_eq!(identify_color(0.0, 5.0, 95.0), Some(ColorName::White));
        assert_eq!(identify_color(0.0, 5.0, 50.0), Some(ColorName::Grey));
        assert_eq!(identify_color(0.0, 5.0, 20.0), Some(ColorName::Grey));
        assert_eq!(identify_color(0.0, 5.0, 90.0), Some(ColorName::Grey));
    }

    #[test]
    fn test_red_wraps_around_zero() {
        assert_eq!(identify_color(355.0, 80.0, 80.0), Some(ColorName::Red));
        assert_eq!(identify_color(5.0, 80.0, 80.0), Some(ColorName::Red));
        assert_eq!(identify_color(0.0, 100.0, 100.0), Some(ColorName::Red));
        assert_eq!(identify_color(340.0, 50.0, 50.0), Some(ColorName::Red));
        assert_eq!(identify_color(10.0, 50.0, 50.0), Some(ColorName::Red));
    }

    #[test]
    fn test_dark_red_falls_through_to_maroon() {
        assert_eq!(identify_color(350.0, 80.0, 30.0), Some(ColorName::Maroon));
    }

    #[test]
    fn test_first_match_wins_blue_over_navy() {
        // 230 is inside both Blue and Navy Blue hue bands; value 45 only fits Blue.
        assert_eq!(identify_color(230.0, 80.0, 45.0), Some(ColorName::Blue));
        // value 30 misses Blue's value band and lands on Navy Blue.
        assert_eq!(identify_color(230.0, 80.0, 30.0), Some(ColorName::NavyBlue));
    }

    #[test]
    fn test_low_saturation_dark_is_black_rule() {
        assert_eq!(identify_color(200.0, 25.0, 10.0), Some(ColorName::Black));
    }

    #[test]
    fn test_unmatched_returns_none() {
        // hue 75 is only covered by Olive, which needs saturation <= 60
        assert_eq!(identify_color(75.0, 90.0, 90.0), None);
    }

    #[test]
    fn test_rule_table_order_is_fixed() {
        let order: Vec<ColorName> = COLOR_RULES.iter().map(|r| r.name).collect();
        assert_eq!(order, ColorName::ALL.to_vec());
    }
}

mod canonicalize_tests {
    use super::*;

    #[test]
    fn test_canonical_names_map_to_themselves() {
        for name in ColorName::ALL {
            assert_eq!(canonicalize(name.as_str()), Some(name));
        }
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(canonicalize("Navy"), Some(ColorName::NavyBlue));
        assert_eq!(canonicalize("Burgundy"), Some(ColorName::Maroon));
        assert_eq!(canonicalize("Cream"), Some(ColorName::Beige));
        assert_eq!(canonicalize("Turquoise"), Some(ColorName::Teal));
        assert_eq!(canonicalize("Dark Blue"), Some(ColorName::NavyBlue));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(canonicalize("  navy blue "), Some(ColorName::NavyBlue));
        assert_eq!(canonicalize("RED"), Some(ColorName::Red));
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(canonicalize("Multi"), None);
        assert_eq!(canonicalize(""), None);
        assert_eq!(canonicalize("   "), None);
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for (synonym, _) in COLOR_SYNONYMS {
            let once = canonicalize(synonym).expect("synonym must resolve");
            let twice = canonicalize(once.as_str());
            assert_eq!(twice, Some(once), "not idempotent for {synonym}");
        }
    }

    #[test]
    fn test_canonicalize_all_dedupes_in_order() {
        let colors = canonicalize_all(&["navy", "Red", "Navy Blue", "plaid", "burgundy"]);
        assert_eq!(
            colors,
            vec![ColorName::NavyBlue, ColorName::Red, ColorName::Maroon]
        );
    }

    #[test]
    fn test_serializes_as_display_name() {
        let json = serde_json::to_string(&vec![ColorName::NavyBlue, ColorName::Red]).unwrap();
        assert_eq!(json, r#"["Navy Blue","Red"]"#);
    }
}

mod extract_tests {
    use super::*;

    #[test]
    fn test_solid_image() {
        let image = solid(40, 40, [255, 0, 0]);
        assert_eq!(extract_dominant_colors(&image, 3), vec![ColorName::Red]);
    }

    #[test]
    fn test_most_frequent_first() {
        let mut img = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        for y in 0..30 {
            for x in 0..100 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let colors = extract_dominant_colors(&DynamicImage::ImageRgb8(img), 3);
        assert_eq!(colors, vec![ColorName::Black, ColorName::White]);
    }

    #[test]
    fn test_duplicate_names_collapse() {
        // two distinct near-black pixels both classify as Black
        let mut img = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        for y in 0..40 {
            for x in 0..100 {
                img.put_pixel(x, y, Rgb([10, 10, 10]));
            }
        }
        let colors = extract_dominant_colors(&DynamicImage::ImageRgb8(img), 3);
        assert_eq!(colors, vec![ColorName::Black]);
    }

    #[test]
    fn test_unmatched_colors_dropped() {
        // hsv(75, ~90, ~90): no rule covers it
        let image = solid(10, 10, [172, 230, 23]);
        assert!(extract_dominant_colors(&image, 3).is_empty());
    }

    #[test]
    fn test_max_colors_limits_candidates() {
        let mut img = RgbImage::from_pixel(100, 100, Rgb([255, 0, 0]));
        for y in 0..20 {
            for x in 0..100 {
                img.put_pixel(x, y, Rgb([0, 255, 0]));
            }
        }
        let colors = extract_dominant_colors(&DynamicImage::ImageRgb8(img), 1);
        assert_eq!(colors, vec![ColorName::Red]);
    }

    #[test]
    fn test_missing_file_yields_empty() {
        let colors = extract_dominant_colors_from_path(
            std::path::Path::new("/nonexistent/lookbook/shirt.jpg"),
            3,
        );
        assert!(colors.is_empty());
    }

    #[test]
    fn test_corrupt_file_yields_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(extract_dominant_colors_from_path(&path, 3).is_empty());
    }

    #[test]
    fn test_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("navy.png");
        solid(16, 16, [20, 30, 90]).save(&path).unwrap();
        let colors = extract_dominant_colors_from_path(&path, 3);
        assert_eq!(colors, vec![ColorName::NavyBlue]);
    }
}
