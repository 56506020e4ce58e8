use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Pixel tolerance for one unit of density factor.
pub const BASE_DELTA: f64 = 10.0;

/// Paragraph grouping is looser than line grouping by this factor.
pub const PARAGRAPH_THRESHOLD_MULTIPLIER: f64 = 1.5;

/// Valid range for `density_factor`, inclusive on both ends.
pub const MIN_DENSITY_FACTOR: f64 = 0.0;
pub const MAX_DENSITY_FACTOR: f64 = 4.0;

// Default value functions for serde
fn default_density_factor() -> f64 {
    1.0
}

/// Order applied to fragments inside one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingDirection {
    /// Ascending `x`.
    #[default]
    #[serde(alias = "left_to_right", alias = "leftToRight")]
    Ltr,
    /// Descending `x`.
    #[serde(alias = "right_to_left", alias = "rightToLeft")]
    Rtl,
}

impl ReadingDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingDirection::Ltr => "ltr",
            ReadingDirection::Rtl => "rtl",
        }
    }
}

impl fmt::Display for ReadingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingDirection {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ltr" | "left_to_right" | "lefttoright" => Ok(ReadingDirection::Ltr),
            "rtl" | "right_to_left" | "righttoleft" => Ok(ReadingDirection::Rtl),
            _ => Err(LayoutError::InvalidDirection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Scales the vertical tolerance used to decide line and paragraph
    /// membership. Must be within [0, 4]; 0 means exact `center_y` matches only.
    #[serde(default = "default_density_factor")]
    pub density_factor: f64,
    /// Ordering of fragments within a line
    #[serde(default)]
    pub direction: ReadingDirection,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            density_factor: default_density_factor(),
            direction: ReadingDirection::Ltr,
        }
    }
}

impl LayoutConfig {
    /// Build and validate in one step.
    pub fn new(density_factor: f64, direction: ReadingDirection) -> Result<Self> {
        let config = Self {
            density_factor,
            direction,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject density factors outside [0, 4]. NaN never satisfies the range.
    pub fn validate(&self) -> Result<()> {
        let in_range = (MIN_DENSITY_FACTOR..=MAX_DENSITY_FACTOR).contains(&self.density_factor);
        if !in_range {
            return Err(LayoutError::InvalidConfiguration {
                density_factor: self.density_factor,
            });
        }
        Ok(())
    }

    /// Maximum `center_y` distance for two fragments to share a line.
    pub fn threshold_y(&self) -> f64 {
        self.density_factor * BASE_DELTA
    }

    /// Maximum centroid distance for two consecutive lines to share a paragraph.
    pub fn paragraph_threshold_y(&self) -> f64 {
        self.threshold_y() * PARAGRAPH_THRESHOLD_MULTIPLIER
    }

    /// Load config from a YAML file and validate it
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: LayoutConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config with fallback to default.
    ///
    /// Only a missing file falls back; a file that exists but fails to parse
    /// or validate is an error.
    pub fn load_with_fallback(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) if !Path::new(p).exists() => {
                tracing::warn!("config file {} not found, using defaults", p);
                Ok(Self::default())
            }
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }
}
