// Lenscraft Core Library
//
// Rebuilds reading structure from OCR output: flat text fragments with
// bounding boxes are grouped into lines, then consecutive lines into
// paragraphs, using nothing but box geometry.

pub mod config;
pub mod error;
pub mod line;
pub mod output;
pub mod processor;
pub mod rules;
pub mod stats;
pub mod types;

// Re-export main types and functions for easy use
pub use config::{LayoutConfig, ReadingDirection};
pub use error::{LayoutError, Result};
pub use line::{Line, Paragraph};
pub use output::{LayoutAnalytics, LayoutProfile};
pub use processor::{LayoutProcessor, PipelineStages, StepProfiler};
pub use rules::DebugConfig;
pub use types::*;
