use crate::config::{LayoutConfig, ReadingDirection};
use crate::error::{LayoutError, Result};
use crate::line::{Line, Paragraph};
use crate::rules::{
    debug_pipeline_lines, DebugConfig, LayoutRule, LineGroupingRule, ParagraphGroupingRule,
};
use crate::types::*;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Captured intermediate outputs from each pipeline stage
/// Used for testing and diagnostics: lets you inspect/compare each boundary
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    /// Fragments in the order the line sweep visits them
    pub sorted_fragments: Vec<Fragment>,
    pub lines: Vec<Line>,
    pub paragraphs: Vec<Paragraph>,
}

impl PipelineStages {
    pub fn into_result(self) -> LayoutResult {
        LayoutResult {
            lines: self.lines,
            paragraphs: self.paragraphs,
        }
    }
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        tracing::debug!("{}: {}µs", step_name, elapsed.as_micros());

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn log_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();
        tracing::info!("performance summary ({}µs total)", total.as_micros());

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            tracing::info!(
                "   {:.<30} {}µs ({:.1}%)",
                step,
                duration.as_micros(),
                percentage
            );
        }
    }
}

/// Entry point of the layout pipeline: fragments -> lines -> paragraphs.
///
/// The configuration is validated at construction and never changes
/// afterwards, so one processor can be shared across threads.
#[derive(Debug, Clone)]
pub struct LayoutProcessor {
    config: LayoutConfig,
    debug_config: DebugConfig,
}

impl LayoutProcessor {
    pub fn new(density_factor: f64, direction: ReadingDirection) -> Result<Self> {
        Self::from_config(LayoutConfig {
            density_factor,
            direction,
        })
    }

    pub fn from_config(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            debug_config: DebugConfig::disabled(),
        })
    }

    pub fn with_debug_config(mut self, debug_config: DebugConfig) -> Self {
        self.debug_config = debug_config;
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Run the pipeline on untyped OCR output.
    ///
    /// The input must be a JSON array of `{text, boundingBox}` records.
    /// Anything else is `InvalidInput`; the error is logged and returned,
    /// and no partial result is produced.
    pub fn process(&self, raw: &Value) -> Result<LayoutResult> {
        self.process_with_profiling(raw, false)
    }

    /// Parse a JSON document and run the pipeline on it
    pub fn process_json(&self, json: &str) -> Result<LayoutResult> {
        let raw: Value = serde_json::from_str(json)
            .map_err(|e| LayoutError::InvalidInput(format!("malformed JSON: {e}")))
            .inspect_err(|error| tracing::error!("layout processing failed: {error}"))?;
        self.process(&raw)
    }

    /// Process with per-stage timings logged at the end
    pub fn process_with_profiling(
        &self,
        raw: &Value,
        enable_profiling: bool,
    ) -> Result<LayoutResult> {
        let mut profiler = StepProfiler::new(enable_profiling);

        let result = profiler
            .time_step("1. Parse fragments", || Self::parse_fragments(raw))
            .and_then(|fragments| self.group(fragments, &mut profiler))
            .inspect_err(|error| tracing::error!("layout processing failed: {error}"))?;

        profiler.log_summary();
        Ok(result)
    }

    /// Typed entry point for callers that already hold fragments
    pub fn process_fragments(&self, fragments: Vec<Fragment>) -> Result<LayoutResult> {
        self.group(fragments, &mut StepProfiler::new(false))
    }

    /// Run the pipeline and keep every intermediate stage
    pub fn process_capture_stages(&self, raw: &Value) -> Result<PipelineStages> {
        let fragments = Self::parse_fragments(raw)
            .inspect_err(|error| tracing::error!("layout processing failed: {error}"))?;

        let line_rule = LineGroupingRule::new(&self.config);
        let sorted_fragments = line_rule.sort_for_sweep(fragments);
        let lines = line_rule.sweep(sorted_fragments.clone());
        debug_pipeline_lines(line_rule.name(), &lines, &self.debug_config);

        let paragraph_rule = ParagraphGroupingRule::new(&self.config);
        let paragraphs = paragraph_rule.apply(lines.clone())?;
        debug_pipeline_lines(paragraph_rule.name(), &paragraphs, &self.debug_config);

        Ok(PipelineStages {
            sorted_fragments,
            lines,
            paragraphs,
        })
    }

    /// Convert raw records into fragments.
    ///
    /// Only the top-level shape and the presence of `text` and `boundingBox`
    /// are checked; coordinate ranges are taken as given.
    pub fn parse_fragments(raw: &Value) -> Result<Vec<Fragment>> {
        let records = raw.as_array().ok_or_else(|| {
            LayoutError::InvalidInput(format!(
                "input must be an array of fragments, got {}",
                json_kind(raw)
            ))
        })?;

        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                RawFragment::deserialize(record)
                    .map(Fragment::from)
                    .map_err(|e| LayoutError::InvalidInput(format!("fragment {index}: {e}")))
            })
            .collect()
    }

    fn group(&self, fragments: Vec<Fragment>, profiler: &mut StepProfiler) -> Result<LayoutResult> {
        let fragment_count = fragments.len();

        let line_rule = LineGroupingRule::new(&self.config);
        let lines = profiler.time_step("2. Line grouping", || line_rule.apply(fragments))?;
        debug_pipeline_lines(line_rule.name(), &lines, &self.debug_config);

        // Paragraphs get their own copy of the fragments
        let paragraph_rule = ParagraphGroupingRule::new(&self.config);
        let paragraphs =
            profiler.time_step("3. Paragraph grouping", || paragraph_rule.apply(lines.clone()))?;
        debug_pipeline_lines(paragraph_rule.name(), &paragraphs, &self.debug_config);

        tracing::debug!(
            density_factor = self.config.density_factor,
            direction = %self.config.direction,
            "{} fragments -> {} lines -> {} paragraphs",
            fragment_count,
            lines.len(),
            paragraphs.len()
        );

        Ok(LayoutResult { lines, paragraphs })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
