use crate::error::Result;
use crate::line::Line;
use regex::Regex;

// Debug configuration for pipeline tracing
#[derive(Debug, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub filter_patterns: Vec<String>,
}

impl DebugConfig {
    pub fn new(enabled: bool, filter_patterns: Vec<String>) -> Self {
        Self {
            enabled,
            filter_patterns,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            filter_patterns: Vec::new(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

enum LineFilter {
    Pattern(Regex),
    Substring(String),
}

impl LineFilter {
    // Try regex first, fall back to simple string contains
    fn parse(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => LineFilter::Pattern(regex),
            Err(_) => LineFilter::Substring(pattern.to_string()),
        }
    }

    fn matches(&self, text: &str) -> bool {
        match self {
            LineFilter::Pattern(regex) => regex.is_match(text),
            LineFilter::Substring(needle) => text.contains(needle.as_str()),
        }
    }
}

/// Indices of lines whose combined text matches any of the debug patterns.
pub fn matching_lines(lines: &[Line], debug_config: &DebugConfig) -> Vec<usize> {
    if !debug_config.enabled || debug_config.filter_patterns.is_empty() {
        return Vec::new();
    }

    let filters: Vec<LineFilter> = debug_config
        .filter_patterns
        .iter()
        .map(|pattern| LineFilter::parse(pattern))
        .collect();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| {
            let text = line.combined_text();
            filters.iter().any(|filter| filter.matches(&text))
        })
        .map(|(index, _)| index)
        .collect()
}

/// Trace lines that match the debug filters after a pipeline stage
pub fn debug_pipeline_lines(rule_name: &str, lines: &[Line], debug_config: &DebugConfig) {
    let matches = matching_lines(lines, debug_config);
    if matches.is_empty() {
        return;
    }

    tracing::info!("[{}] {} matching lines", rule_name, matches.len());
    for index in matches {
        let line = &lines[index];
        let text = line.combined_text();
        let text_preview = if text.chars().count() > 50 {
            format!("{}...", text.chars().take(47).collect::<String>())
        } else {
            text
        };
        tracing::info!(
            "  #{}: \"{}\" ({} fragments, average_y: {:.1})",
            index,
            text_preview,
            line.len(),
            line.average_y()
        );
    }
}

/// One stage of the grouping pipeline.
pub trait LayoutRule {
    type Input;
    type Output;

    fn apply(&self, input: Vec<Self::Input>) -> Result<Vec<Self::Output>>;
    fn name(&self) -> &str;
}
