use super::engine::LayoutRule;
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::line::Line;
use crate::types::Fragment;
use std::cmp::Ordering;

/// Groups fragments into horizontal lines by `center_y` proximity.
pub struct LineGroupingRule<'a> {
    config: &'a LayoutConfig,
}

impl<'a> LineGroupingRule<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Order fragments for the grouping sweep.
    ///
    /// Key: vertical bucket `floor(center_y / threshold_y)` (raw `center_y`
    /// when the threshold is 0), then left edge `x`, then input position.
    /// The key is a total order, so the result does not depend on the input
    /// permutation beyond the final position tie-break.
    pub fn sort_for_sweep(&self, fragments: Vec<Fragment>) -> Vec<Fragment> {
        let threshold = self.config.threshold_y();
        let mut indexed: Vec<(usize, f64, Fragment)> = fragments
            .into_iter()
            .enumerate()
            .map(|(position, fragment)| {
                let bucket = vertical_bucket(fragment.center_y(), threshold);
                (position, bucket, fragment)
            })
            .collect();

        indexed.sort_by(|(pos_a, bucket_a, a), (pos_b, bucket_b, b)| {
            bucket_a
                .total_cmp(bucket_b)
                .then_with(|| a.x().total_cmp(&b.x()))
                .then_with(|| pos_a.cmp(pos_b))
        });

        indexed.into_iter().map(|(_, _, fragment)| fragment).collect()
    }

    /// Sweep pre-sorted fragments, growing one line at a time.
    ///
    /// A fragment joins the open line when its `center_y` is within
    /// `threshold_y` of the line's running average (inclusive); otherwise the
    /// line is closed and a new one starts with that fragment.
    pub fn sweep(&self, sorted: Vec<Fragment>) -> Vec<Line> {
        let threshold = self.config.threshold_y();
        let direction = self.config.direction;

        let mut lines = Vec::new();
        let mut current_line: Option<Line> = None;

        for fragment in sorted {
            match &mut current_line {
                None => {
                    current_line = Some(Line::new(fragment, direction));
                }
                Some(line) => {
                    if (fragment.center_y() - line.average_y()).abs() <= threshold {
                        line.add_fragment(fragment);
                    } else {
                        let finished = std::mem::replace(line, Line::new(fragment, direction));
                        lines.push(finished);
                    }
                }
            }
        }

        // Don't forget the last line
        if let Some(line) = current_line {
            lines.push(line);
        }

        lines
    }
}

fn vertical_bucket(center_y: f64, threshold: f64) -> f64 {
    if threshold > 0.0 {
        (center_y / threshold).floor()
    } else {
        center_y
    }
}

impl<'a> LayoutRule for LineGroupingRule<'a> {
    type Input = Fragment;
    type Output = Line;

    fn apply(&self, fragments: Vec<Fragment>) -> Result<Vec<Line>> {
        if fragments.is_empty() {
            return Ok(Vec::new());
        }

        let fragment_count = fragments.len();
        let sorted = self.sort_for_sweep(fragments);
        let lines = self.sweep(sorted);

        tracing::debug!(
            rule = self.name(),
            threshold_y = self.config.threshold_y(),
            "grouped {} fragments into {} lines",
            fragment_count,
            lines.len()
        );

        Ok(lines)
    }

    fn name(&self) -> &str {
        "LineGrouping"
    }
}

/// Position of a finished line in the overall line list: the vertical bucket
/// and left edge of its top-left-most member.
#[derive(Debug, Clone, Copy)]
pub struct LineSortKey {
    pub bucket: f64,
    pub x: f64,
}

impl PartialOrd for LineSortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LineSortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bucket
            .total_cmp(&other.bucket)
            .then_with(|| self.x.total_cmp(&other.x))
    }
}

impl PartialEq for LineSortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LineSortKey {}

impl LineSortKey {
    pub fn of(line: &Line, config: &LayoutConfig) -> Self {
        let threshold = config.threshold_y();
        line.fragments()
            .iter()
            .map(|fragment| LineSortKey {
                bucket: vertical_bucket(fragment.center_y(), threshold),
                x: fragment.x(),
            })
            .min()
            .unwrap_or(LineSortKey {
                bucket: 0.0,
                x: 0.0,
            })
    }
}
