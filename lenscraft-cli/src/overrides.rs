use lenscraft_core::{LayoutConfig, ReadingDirection, Result};

/// Command-line values that win over the config file
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides {
    pub density_factor: Option<f64>,
    pub direction: Option<ReadingDirection>,
}

impl ConfigOverrides {
    /// Apply the overrides and validate the outcome. A file that was valid on
    /// its own can still be pushed out of range here.
    pub fn apply(&self, mut config: LayoutConfig) -> Result<LayoutConfig> {
        if let Some(density_factor) = self.density_factor {
            config.density_factor = density_factor;
        }
        if let Some(direction) = self.direction {
            config.direction = direction;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Config file (or defaults) with CLI overrides applied, then re-validated
pub fn resolve_config(path: Option<&str>, overrides: ConfigOverrides) -> Result<LayoutConfig> {
    let config = LayoutConfig::load_with_fallback(path)?;
    overrides.apply(config)
}
