// All layout functionality is in lenscraft-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod input;
pub mod overrides;
pub mod stages;

// Re-export core types for convenience
pub use lenscraft_core::*;

// Re-export CLI utilities
pub use input::{extract_fragments, read_input};
pub use overrides::{resolve_config, ConfigOverrides};
pub use stages::save_stages;
