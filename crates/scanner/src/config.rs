//! Scanner configuration.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ScannerError, ScannerResult};

/// Rendering parameters shared by the picker and the sweep renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Figure width in pixels.
    pub figure_width: u32,

    /// Figure height in pixels.
    pub figure_height: u32,

    /// Delay between animation frames in milliseconds.
    pub frame_interval_ms: u64,

    /// Number of samples along each cross-section path.
    pub cross_section_points: usize,

    /// Font family for all figure text.
    pub font_family: String,

    /// Chaikin smoothing passes applied to contour lines.
    pub contour_smoothing_passes: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            figure_width: 1500,
            figure_height: 1000,
            frame_interval_ms: 200,
            cross_section_points: 100,
            font_family: "sans-serif".to_string(),
            contour_smoothing_passes: 1,
        }
    }
}

impl ScannerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply `SCANNER_*` overrides from any key/value source on top of the
    /// defaults. Unparseable values are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = parsed(&lookup, "SCANNER_FIGURE_WIDTH") {
            config.figure_width = val;
        }

        if let Some(val) = parsed(&lookup, "SCANNER_FIGURE_HEIGHT") {
            config.figure_height = val;
        }

        if let Some(val) = parsed(&lookup, "SCANNER_FRAME_INTERVAL_MS") {
            config.frame_interval_ms = val;
        }

        if let Some(val) = parsed(&lookup, "SCANNER_CROSS_SECTION_POINTS") {
            config.cross_section_points = val;
        }

        if let Some(val) = parsed(&lookup, "SCANNER_CONTOUR_SMOOTHING") {
            config.contour_smoothing_passes = val;
        }

        if let Some(val) = lookup("SCANNER_FONT_FAMILY") {
            if !val.trim().is_empty() {
                config.font_family = val.trim().to_string();
            }
        }

        config
    }

    /// Parse configuration from YAML; missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> ScannerResult<Self> {
        let config: ScannerConfig = serde_yaml::from_str(yaml)
            .map_err(|e| ScannerError::invalid_configuration(format!("config YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ScannerResult<()> {
        if self.figure_width == 0 || self.figure_height == 0 {
            return Err(ScannerError::invalid_configuration(
                "figure dimensions must be > 0",
            ));
        }

        if self.cross_section_points < 2 {
            return Err(ScannerError::invalid_configuration(
                "cross_section_points must be >= 2",
            ));
        }

        if self.frame_interval_ms == 0 {
            return Err(ScannerError::invalid_configuration(
                "frame_interval_ms must be > 0",
            ));
        }

        Ok(())
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ScannerConfig::default();
        assert_eq!((config.figure_width, config.figure_height), (1500, 1000));
        assert_eq!(config.frame_interval_ms, 200);
        assert_eq!(config.cross_section_points, 100);
        config.validate().unwrap();
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let vars: HashMap<&str, &str> = [
            ("SCANNER_FIGURE_WIDTH", "800"),
            ("SCANNER_FRAME_INTERVAL_MS", "fast"),
            ("SCANNER_FONT_FAMILY", "DejaVu Sans"),
            ("SCANNER_CONTOUR_SMOOTHING", " 0 "),
        ]
        .into_iter()
        .collect();

        let config = ScannerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.figure_width, 800);
        assert_eq!(config.figure_height, 1000);
        assert_eq!(config.frame_interval_ms, 200);
        assert_eq!(config.font_family, "DejaVu Sans");
        assert_eq!(config.contour_smoothing_passes, 0);
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = ScannerConfig::from_yaml("cross_section_points: 50\n").unwrap();
        assert_eq!(config.cross_section_points, 50);
        assert_eq!(config.figure_width, 1500);

        assert!(ScannerConfig::from_yaml("cross_section_points: 1\n").is_err());
        assert!(ScannerConfig::from_yaml("figure_width: [1, 2]\n").is_err());
    }
}
