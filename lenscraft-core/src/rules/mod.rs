// Grouping rules - the two clustering passes of the layout pipeline:
// - engine.rs: LayoutRule trait and debug tracing helpers
// - line_grouping.rs: fragments -> lines (Y proximity, reading-order sort)
// - paragraph_grouping.rs: consecutive lines -> paragraphs (looser Y proximity)

pub mod engine;
pub mod line_grouping;
pub mod paragraph_grouping;

pub use engine::*;
pub use line_grouping::{LineGroupingRule, LineSortKey};
pub use paragraph_grouping::ParagraphGroupingRule;
