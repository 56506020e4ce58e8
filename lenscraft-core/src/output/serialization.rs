use super::analytics::{LayoutAnalytics, LayoutProfile};
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::line::{Line, Paragraph};
use crate::types::LayoutResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The schema version stamped on every `layout` output.
/// Bump this when the output shape changes.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Serialization-ready view of a full layout run.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutDocument<'a> {
    pub schema_version: &'static str,
    pub config: LayoutConfig,
    pub lines: &'a [Line],
    pub paragraphs: &'a [Paragraph],
    pub profile: LayoutProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatDocument {
    pub format: String,
    pub lines: Vec<String>,
    pub paragraphs: Vec<String>,
}

impl LayoutResult {
    pub fn to_layout_document(&self, config: &LayoutConfig) -> LayoutDocument<'_> {
        LayoutDocument {
            schema_version: SCHEMA_VERSION,
            config: *config,
            lines: &self.lines,
            paragraphs: &self.paragraphs,
            profile: LayoutAnalytics::compute(self),
        }
    }

    pub fn to_flat_format(&self) -> FlatDocument {
        FlatDocument {
            format: "flat".to_string(),
            lines: self.lines.iter().map(Line::combined_text).collect(),
            paragraphs: self.paragraphs.iter().map(Line::combined_text).collect(),
        }
    }

    /// `Line N: ...` for every line, a blank line, then `Paragraph N: ...`
    pub fn to_text_report(&self) -> String {
        let mut report = String::from("Lines:\n");
        for (index, line) in self.lines.iter().enumerate() {
            report.push_str(&format!("Line {}: {}\n", index + 1, line.combined_text()));
        }

        report.push_str("\nParagraphs:\n");
        for (index, paragraph) in self.paragraphs.iter().enumerate() {
            report.push_str(&format!(
                "Paragraph {}: {}\n",
                index + 1,
                paragraph.combined_text()
            ));
        }
        report
    }

    /// Render in one of `layout`, `text` or `flat`. Unknown formats fall back
    /// to `layout`.
    pub fn render(&self, format: &str, config: &LayoutConfig) -> Result<String> {
        let rendered = match format {
            "text" => self.to_text_report(),
            "flat" => serde_json::to_string_pretty(&self.to_flat_format())?,
            "layout" => serde_json::to_string_pretty(&self.to_layout_document(config))?,
            other => {
                tracing::warn!("unknown output format '{}', using layout", other);
                serde_json::to_string_pretty(&self.to_layout_document(config))?
            }
        };
        Ok(rendered)
    }

    pub fn save_with_format(
        &self,
        path: impl AsRef<Path>,
        format: &str,
        config: &LayoutConfig,
    ) -> Result<()> {
        let rendered = self.render(format, config)?;
        std::fs::write(path, rendered)?;
        Ok(())
    }
}
