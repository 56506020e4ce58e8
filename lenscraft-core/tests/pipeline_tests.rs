//! Pipeline boundary tests: fragments in, lines and paragraphs out.
//!
//! Fixtures in `test_fixtures/` hold the same small receipt in two shapes:
//!
//! - `receipt_lens.json`: an OCR-lens result object, boxes nested under
//!   `pixelCoords`, fragments under `segments`
//! - `receipt_flat.json`: a bare array with flat `{x, y, width, height}` boxes
//!
//! The remaining tests check structural properties (partitioning, ordering,
//! contiguity) on arbitrary inputs across the whole density range.

use lenscraft_core::rules::LineSortKey;
use lenscraft_core::{
    BoundingBox, Fragment, LayoutConfig, LayoutError, LayoutProcessor, LayoutResult, Line,
    ReadingDirection,
};
use serde_json::{json, Value};
use std::path::PathBuf;

// ============================================================================
// Fixture helpers
// ============================================================================

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures")
}

fn load_fixture(name: &str) -> Value {
    let path = fixtures_dir().join(name);
    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Missing fixture: {}", path.display()));
    serde_json::from_str(&contents).expect("Invalid fixture JSON")
}

fn lens_segments() -> Value {
    load_fixture("receipt_lens.json")["segments"].clone()
}

fn texts(lines: &[Line]) -> Vec<String> {
    lines.iter().map(Line::combined_text).collect()
}

fn processor(density_factor: f64, direction: ReadingDirection) -> LayoutProcessor {
    LayoutProcessor::new(density_factor, direction).expect("valid config")
}

/// Box 10px tall so that center_y = y + 5
fn record(text: &str, x: f64, center_y: f64) -> Value {
    json!({
        "text": text,
        "boundingBox": { "x": x, "y": center_y - 5.0, "width": 30.0, "height": 10.0 }
    })
}

/// Identity of a fragment for set comparisons
fn key(fragment: &Fragment) -> (String, u64, u64) {
    let bbox = fragment.bounding_box();
    (fragment.text().to_string(), bbox.x.to_bits(), bbox.y.to_bits())
}

fn sorted_keys<'a>(fragments: impl Iterator<Item = &'a Fragment>) -> Vec<(String, u64, u64)> {
    let mut keys: Vec<_> = fragments.map(key).collect();
    keys.sort();
    keys
}

// ============================================================================
// Fixture: receipt
// ============================================================================

mod receipt {
    use super::*;

    #[test]
    fn lens_and_flat_shapes_agree() {
        let processor = processor(1.5, ReadingDirection::Ltr);
        let from_lens = processor.process(&lens_segments()).unwrap();
        let from_flat = processor.process(&load_fixture("receipt_flat.json")).unwrap();

        assert_eq!(from_lens.lines, from_flat.lines);
        assert_eq!(from_lens.paragraphs, from_flat.paragraphs);
    }

    #[test]
    fn receipt_lines() {
        let result = processor(1.5, ReadingDirection::Ltr)
            .process(&lens_segments())
            .unwrap();

        assert_eq!(
            texts(&result.lines),
            vec![
                "CORNER MARKET",
                "12 Elm Street",
                "Apples 3.20",
                "Bread 2.50",
                "TOTAL 5.70"
            ]
        );
        assert_eq!(result.lines[0].average_y(), 50.5);
        assert_eq!(result.lines[1].average_y(), 70.0);
    }

    #[test]
    fn header_lines_merge_and_reorder_by_x() {
        // Header centroids 50.5 and 70 are 19.5 apart: two lines at
        // threshold 15, one paragraph at 22.5. The merged paragraph is
        // re-sorted by x across both lines.
        let result = processor(1.5, ReadingDirection::Ltr)
            .process(&lens_segments())
            .unwrap();

        assert_eq!(
            texts(&result.paragraphs),
            vec![
                "12 CORNER Elm Street MARKET",
                "Apples 3.20",
                "Bread 2.50",
                "TOTAL 5.70"
            ]
        );
        assert!((result.paragraphs[0].average_y() - 62.2).abs() < 1e-4);
    }

    #[test]
    fn tighter_density_keeps_header_paragraphs_apart() {
        let result = processor(1.0, ReadingDirection::Ltr)
            .process(&lens_segments())
            .unwrap();
        assert_eq!(result.lines.len(), 5);
        assert_eq!(texts(&result.paragraphs), texts(&result.lines));
    }

    #[test]
    fn widest_density_merges_item_rows() {
        let result = processor(4.0, ReadingDirection::Ltr)
            .process(&lens_segments())
            .unwrap();
        assert_eq!(
            texts(&result.lines),
            vec!["12 CORNER Elm Street MARKET", "Apples Bread 3.20 2.50", "TOTAL 5.70"]
        );
    }

    #[test]
    fn zero_density_puts_every_distinct_center_on_its_own_line() {
        let result = processor(0.0, ReadingDirection::Ltr)
            .process(&lens_segments())
            .unwrap();
        assert_eq!(result.lines.len(), 11);
        assert!(result.lines.iter().all(|line| line.len() == 1));
        assert_eq!(texts(&result.lines)[..3], ["CORNER", "MARKET", "Elm"]);
    }

    #[test]
    fn right_to_left_reverses_within_lines() {
        let result = processor(1.5, ReadingDirection::Rtl)
            .process(&lens_segments())
            .unwrap();
        assert_eq!(
            texts(&result.lines),
            vec![
                "MARKET CORNER",
                "Street Elm 12",
                "3.20 Apples",
                "2.50 Bread",
                "5.70 TOTAL"
            ]
        );
        assert_eq!(texts(&result.paragraphs)[0], "MARKET Street Elm CORNER 12");
    }

    #[test]
    fn process_json_accepts_fixture_text() {
        let path = fixtures_dir().join("receipt_flat.json");
        let contents = std::fs::read_to_string(path).unwrap();
        let result = processor(1.5, ReadingDirection::Ltr)
            .process_json(&contents)
            .unwrap();
        assert_eq!(result.lines.len(), 5);
    }
}

// ============================================================================
// Documented scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn two_lines_two_paragraphs() {
        let raw = json!([
            record("A", 0.0, 60.0),
            record("B", 100.0, 63.0),
            record("C", 0.0, 110.0),
            record("D", 100.0, 112.0),
            record("E", 200.0, 115.0),
        ]);
        let result = processor(1.5, ReadingDirection::Ltr).process(&raw).unwrap();

        assert_eq!(texts(&result.lines), vec!["A B", "C D E"]);
        assert_eq!(texts(&result.paragraphs), vec!["A B", "C D E"]);
        assert!((result.lines[1].average_y() - 112.333).abs() < 1e-3);
    }

    #[test]
    fn single_fragment() {
        let raw = json!([record("only", 10.0, 20.0)]);
        let result = processor(1.0, ReadingDirection::Ltr).process(&raw).unwrap();

        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.paragraphs.len(), 1);
        assert_eq!(result.lines[0].combined_text(), "only");
        assert_eq!(result.paragraphs[0].combined_text(), "only");
    }

    #[test]
    fn empty_input() {
        let result = processor(1.0, ReadingDirection::Ltr).process(&json!([])).unwrap();
        assert!(result.lines.is_empty());
        assert!(result.paragraphs.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn non_sequence_input_is_rejected() {
        let processor = processor(1.0, ReadingDirection::Ltr);
        assert!(matches!(
            processor.process(&Value::Null),
            Err(LayoutError::InvalidInput(_))
        ));
        assert!(matches!(
            processor.process(&json!("x")),
            Err(LayoutError::InvalidInput(_))
        ));
    }

    #[test]
    fn out_of_range_density_is_rejected() {
        for density in [-1.0, 5.0] {
            assert!(matches!(
                LayoutProcessor::new(density, ReadingDirection::Ltr),
                Err(LayoutError::InvalidConfiguration { .. })
            ));
            assert!(matches!(
                LayoutProcessor::from_config(LayoutConfig {
                    density_factor: density,
                    direction: ReadingDirection::Ltr,
                }),
                Err(LayoutError::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn inclusive_threshold_holds_on_tall_pages() {
        // Centers 16777217 and 16777227 are exactly one threshold apart.
        // Both are exact only at double precision.
        let raw = json!([
            {
                "text": "upper",
                "boundingBox": { "x": 0.0, "y": 16777216.0, "width": 30.0, "height": 2.0 }
            },
            {
                "text": "lower",
                "boundingBox": { "x": 40.0, "y": 16777226.0, "width": 30.0, "height": 2.0 }
            }
        ]);
        let result = processor(1.0, ReadingDirection::Ltr).process(&raw).unwrap();
        assert_eq!(texts(&result.lines), vec!["upper lower"]);
    }

    #[test]
    fn processor_is_reusable() {
        let processor = processor(1.0, ReadingDirection::Ltr);
        let raw = json!([record("a", 0.0, 10.0), record("b", 40.0, 10.0)]);
        let first = processor.process(&raw).unwrap();
        let second = processor.process(&raw).unwrap();
        assert_eq!(first.lines, second.lines);
        assert_eq!(processor.config().threshold_y(), 10.0);
    }
}

// ============================================================================
// Structural properties on arbitrary inputs
// ============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;

    /// Integer-valued coordinates on a small grid so that equal `x`, equal
    /// centers and fully identical boxes show up regularly.
    fn fragment_strategy() -> impl Strategy<Value = Fragment> {
        ("[a-z]{1,6}", 0u32..400, 0u32..400, 1u32..120, 1u32..40).prop_map(
            |(text, x, y, width, height)| {
                Fragment::new(
                    text,
                    BoundingBox::new(x as f64, y as f64, width as f64, height as f64),
                )
            },
        )
    }

    fn direction_strategy() -> impl Strategy<Value = ReadingDirection> {
        prop_oneof![Just(ReadingDirection::Ltr), Just(ReadingDirection::Rtl)]
    }

    fn check_invariants(
        input: &[Fragment],
        result: &LayoutResult,
        config: &LayoutConfig,
    ) -> Result<(), TestCaseError> {
        // Lines partition the input
        prop_assert!(result.lines.iter().all(|line| !line.is_empty()));
        prop_assert_eq!(
            sorted_keys(result.lines.iter().flat_map(|l| l.fragments())),
            sorted_keys(input.iter())
        );

        // Paragraphs partition the input
        prop_assert_eq!(
            sorted_keys(result.paragraphs.iter().flat_map(|p| p.fragments())),
            sorted_keys(input.iter())
        );
        prop_assert!(result.paragraphs.len() <= result.lines.len());

        // Reading order inside lines and paragraphs
        for line in result.lines.iter().chain(result.paragraphs.iter()) {
            let xs: Vec<f64> = line.fragments().iter().map(Fragment::x).collect();
            let ordered = match config.direction {
                ReadingDirection::Ltr => xs.windows(2).all(|w| w[0] <= w[1]),
                ReadingDirection::Rtl => xs.windows(2).all(|w| w[0] >= w[1]),
            };
            prop_assert!(ordered, "fragments out of reading order: {:?}", xs);
        }

        // Lines ascend by sort key
        let keys: Vec<LineSortKey> = result
            .lines
            .iter()
            .map(|line| LineSortKey::of(line, config))
            .collect();
        prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]));

        // Each paragraph is exactly a contiguous run of lines
        let mut next_line = 0;
        for paragraph in &result.paragraphs {
            let mut covered = Vec::new();
            while covered.len() < paragraph.len() {
                prop_assert!(next_line < result.lines.len(), "paragraph overruns lines");
                covered.extend(result.lines[next_line].fragments().iter().cloned());
                next_line += 1;
            }
            prop_assert_eq!(
                sorted_keys(covered.iter()),
                sorted_keys(paragraph.fragments().iter())
            );
        }
        prop_assert_eq!(next_line, result.lines.len());
        Ok(())
    }

    #[test]
    fn invariants_hold_across_densities_and_directions() {
        proptest!(|(
            fragments in prop::collection::vec(fragment_strategy(), 0..60),
            density in 0.0f64..=4.0,
            direction in direction_strategy()
        )| {
            let config = LayoutConfig::new(density, direction).unwrap();
            let processor = LayoutProcessor::from_config(config).unwrap();
            let result = processor.process_fragments(fragments.clone()).unwrap();
            check_invariants(&fragments, &result, &config)?;
        });
    }

    #[test]
    fn output_is_deterministic_for_the_same_input() {
        proptest!(|(
            fragments in prop::collection::vec(fragment_strategy(), 0..60),
            direction in direction_strategy()
        )| {
            let processor = processor(1.5, direction);
            let first = processor.process_fragments(fragments.clone()).unwrap();
            let second = processor.process_fragments(fragments).unwrap();
            prop_assert_eq!(first.lines, second.lines);
            prop_assert_eq!(first.paragraphs, second.paragraphs);
        });
    }

    #[test]
    fn zero_density_lines_share_one_center() {
        proptest!(|(fragments in prop::collection::vec(fragment_strategy(), 1..60))| {
            let result = processor(0.0, ReadingDirection::Ltr)
                .process_fragments(fragments)
                .unwrap();
            for line in &result.lines {
                let first = line.fragments()[0].center_y();
                prop_assert!(line.fragments().iter().all(|f| f.center_y() == first));
            }
        });
    }
}

// ============================================================================
// Shipped config files
// ============================================================================

mod configs {
    use super::*;

    fn configs_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../configs")
    }

    #[test]
    fn every_shipped_config_loads() {
        let entries = std::fs::read_dir(configs_dir()).expect("configs directory");
        let mut loaded = 0;
        for entry in entries {
            let path = entry.unwrap().path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let config = LayoutConfig::load_from_file(&path)
                .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
            assert!(LayoutProcessor::from_config(config).is_ok());
            loaded += 1;
        }
        assert!(loaded >= 3);
    }

    #[test]
    fn rtl_config_reverses_receipt_lines() {
        let config = LayoutConfig::load_from_file(configs_dir().join("rtl.yaml")).unwrap();
        assert_eq!(config.direction, ReadingDirection::Rtl);

        let result = LayoutProcessor::from_config(config)
            .unwrap()
            .process(&lens_segments())
            .unwrap();
        assert_eq!(texts(&result.lines)[0], "MARKET CORNER");
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let path = configs_dir().join("does-not-exist.yaml");
        let config = LayoutConfig::load_with_fallback(path.to_str()).unwrap();
        assert_eq!(config, LayoutConfig::default());
    }
}
