use super::engine::LayoutRule;
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::line::{Line, Paragraph};

/// Merges consecutive lines whose centroids are close into paragraphs.
pub struct ParagraphGroupingRule<'a> {
    config: &'a LayoutConfig,
}

impl<'a> ParagraphGroupingRule<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Check if a line continues the paragraph currently being built
    fn continues_paragraph(&self, paragraph: &Paragraph, line: &Line) -> bool {
        (line.average_y() - paragraph.average_y()).abs() <= self.config.paragraph_threshold_y()
    }
}

impl<'a> LayoutRule for ParagraphGroupingRule<'a> {
    type Input = Line;
    type Output = Paragraph;

    /// Lines are only ever merged with their immediate predecessor's
    /// paragraph, so every paragraph covers a contiguous run of lines.
    fn apply(&self, lines: Vec<Line>) -> Result<Vec<Paragraph>> {
        let line_count = lines.len();
        let mut paragraphs = Vec::new();
        let mut current_paragraph: Option<Paragraph> = None;

        for line in lines {
            match &mut current_paragraph {
                None => {
                    // Seed with the line's fragments, already in reading order
                    current_paragraph = Some(line);
                }
                Some(paragraph) => {
                    if self.continues_paragraph(paragraph, &line) {
                        paragraph.absorb(line);
                    } else {
                        let finished = std::mem::replace(paragraph, line);
                        paragraphs.push(finished);
                    }
                }
            }
        }

        if let Some(paragraph) = current_paragraph {
            paragraphs.push(paragraph);
        }

        tracing::debug!(
            rule = self.name(),
            paragraph_threshold_y = self.config.paragraph_threshold_y(),
            "merged {} lines into {} paragraphs",
            line_count,
            paragraphs.len()
        );

        Ok(paragraphs)
    }

    fn name(&self) -> &str {
        "ParagraphGrouping"
    }
}
