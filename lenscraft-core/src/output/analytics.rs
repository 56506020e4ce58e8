use crate::line::Line;
use crate::stats;
use crate::types::LayoutResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quantitative summary of a layout. Deterministic apart from `created_at`,
/// mechanically computed from the lines and paragraphs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutProfile {
    pub created_at: DateTime<Utc>,
    pub fragment_count: usize,
    pub line_count: usize,
    pub paragraph_count: usize,
    pub mean_fragments_per_line: f64,
    pub mean_line_height: f64,
    /// Vertical distance between consecutive line centroids
    pub line_spacing: SpacingStats,
    /// Vertical distance between consecutive paragraph centroids
    pub paragraph_spacing: SpacingStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpacingStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for LayoutProfile {
    fn default() -> Self {
        Self {
            created_at: Utc::now(),
            fragment_count: 0,
            line_count: 0,
            paragraph_count: 0,
            mean_fragments_per_line: 0.0,
            mean_line_height: 0.0,
            line_spacing: SpacingStats::default(),
            paragraph_spacing: SpacingStats::default(),
        }
    }
}

/// Analytics computer for layout results
pub struct LayoutAnalytics;

impl LayoutAnalytics {
    pub fn compute(result: &LayoutResult) -> LayoutProfile {
        if result.is_empty() {
            return LayoutProfile::default();
        }

        let fragments_per_line: Vec<f64> = result.lines.iter().map(|l| l.len() as f64).collect();
        let line_heights: Vec<f64> = result.lines.iter().map(Line::height).collect();

        LayoutProfile {
            created_at: Utc::now(),
            fragment_count: result.fragment_count(),
            line_count: result.lines.len(),
            paragraph_count: result.paragraphs.len(),
            mean_fragments_per_line: stats::average(&fragments_per_line).unwrap_or_default(),
            mean_line_height: stats::average(&line_heights).unwrap_or_default(),
            line_spacing: Self::spacing(&result.lines),
            paragraph_spacing: Self::spacing(&result.paragraphs),
        }
    }

    /// Gaps between consecutive centroids, in list order
    fn spacing(lines: &[Line]) -> SpacingStats {
        let gaps: Vec<f64> = lines
            .windows(2)
            .map(|pair| (pair[1].average_y() - pair[0].average_y()).abs())
            .collect();

        if gaps.is_empty() {
            return SpacingStats::default();
        }

        SpacingStats {
            count: gaps.len(),
            mean: stats::average(&gaps).unwrap_or_default(),
            std_dev: stats::std_dev(&gaps).unwrap_or_default(),
            min: gaps.iter().copied().fold(f64::INFINITY, f64::min),
            max: gaps.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}
