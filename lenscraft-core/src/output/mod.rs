pub mod analytics;
pub mod serialization;

pub use analytics::{LayoutAnalytics, LayoutProfile, SpacingStats};
pub use serialization::{FlatDocument, LayoutDocument, SCHEMA_VERSION};
