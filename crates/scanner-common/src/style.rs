//! Plot style table.
//!
//! Maps variable names (case-insensitive) to one of two rendering modes:
//! line contours or filled contours. Tables are caller-supplied
//! configuration; [`StyleTable::default`] returns the reference table for
//! potential temperature, geopotential height, temperature, relative
//! vorticity and vertical motion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while loading or validating a style table.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Failed to parse style table: {0}")]
    ParseError(String),

    #[error("Invalid style '{name}': {message}")]
    ValidationError { name: String, message: String },
}

/// Contour levels: an explicit list or a half-open range `[start, stop)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Levels {
    List(Vec<f64>),
    Range { start: f64, stop: f64, step: f64 },
}

impl Levels {
    pub fn range(start: f64, stop: f64, step: f64) -> Self {
        Levels::Range { start, stop, step }
    }

    /// Concrete level values in ascending order.
    pub fn values(&self) -> Vec<f64> {
        match self {
            Levels::List(values) => values.clone(),
            Levels::Range { start, stop, step } => arange(*start, *stop, *step),
        }
    }

    fn validate(&self) -> Result<(), String> {
        if let Levels::Range { step, .. } = self {
            if *step <= 0.0 || !step.is_finite() {
                return Err(format!("level step must be positive, got {}", step));
            }
        }
        let values = self.values();
        if values.is_empty() {
            return Err("no contour levels".to_string());
        }
        if values.windows(2).any(|w| w[1] <= w[0]) {
            return Err("contour levels must be strictly increasing".to_string());
        }
        Ok(())
    }
}

/// Evenly spaced values in `[start, stop)`; each value is computed from its
/// index so floating point error does not accumulate.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || !step.is_finite() || stop <= start {
        return vec![];
    }
    let count = ((stop - start) / step).ceil() as usize;
    (0..count)
        .map(|i| start + i as f64 * step)
        .filter(|v| *v < stop)
        .collect()
}

/// Line contour rendering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourStyle {
    pub level: Levels,
    pub color: String,
    #[serde(default = "default_linewidths")]
    pub linewidths: f64,
    pub title: String,
}

fn default_linewidths() -> f64 {
    1.0
}

/// Filled contour rendering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    pub level: Levels,
    pub cmap: String,
    pub title: String,
}

/// The rendering mode resolved for one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlotStyle<'a> {
    Contour(&'a ContourStyle),
    Fill(&'a FillStyle),
}

impl PlotStyle<'_> {
    pub fn title(&self) -> &str {
        match self {
            PlotStyle::Contour(style) => &style.title,
            PlotStyle::Fill(style) => &style.title,
        }
    }

    /// Fragment contributed to a figure's title: contours also name their color.
    pub fn title_fragment(&self) -> String {
        match self {
            PlotStyle::Contour(style) => format!("{}({})", style.title, style.color),
            PlotStyle::Fill(style) => style.title.clone(),
        }
    }
}

/// Variable name → rendering mode table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleTable {
    #[serde(default)]
    pub contour: BTreeMap<String, ContourStyle>,
    #[serde(default)]
    pub fill: BTreeMap<String, FillStyle>,
}

impl StyleTable {
    pub fn empty() -> Self {
        Self {
            contour: BTreeMap::new(),
            fill: BTreeMap::new(),
        }
    }

    /// Parse a style table from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, StyleError> {
        let table: StyleTable =
            serde_yaml::from_str(yaml).map_err(|e| StyleError::ParseError(e.to_string()))?;
        table.normalized()
    }

    /// Parse a style table from JSON.
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        let table: StyleTable =
            serde_json::from_str(json).map_err(|e| StyleError::ParseError(e.to_string()))?;
        table.normalized()
    }

    pub fn with_contour(mut self, name: &str, style: ContourStyle) -> Self {
        self.contour.insert(name.to_lowercase(), style);
        self
    }

    pub fn with_fill(mut self, name: &str, style: FillStyle) -> Self {
        self.fill.insert(name.to_lowercase(), style);
        self
    }

    /// Look up the style of a variable, ignoring case. Contour entries win
    /// over fill entries with the same name.
    pub fn lookup(&self, variable: &str) -> Option<PlotStyle<'_>> {
        let key = variable.to_lowercase();
        if let Some(style) = self.contour.get(&key) {
            return Some(PlotStyle::Contour(style));
        }
        self.fill.get(&key).map(PlotStyle::Fill)
    }

    /// Validate every entry.
    pub fn validate(&self) -> Result<(), StyleError> {
        for (name, style) in &self.contour {
            style.level.validate().map_err(|message| StyleError::ValidationError {
                name: name.clone(),
                message,
            })?;
            if style.linewidths <= 0.0 {
                return Err(StyleError::ValidationError {
                    name: name.clone(),
                    message: "line width must be positive".to_string(),
                });
            }
        }
        for (name, style) in &self.fill {
            style.level.validate().map_err(|message| StyleError::ValidationError {
                name: name.clone(),
                message,
            })?;
            if style.level.values().len() < 2 {
                return Err(StyleError::ValidationError {
                    name: name.clone(),
                    message: "filled contours need at least two levels".to_string(),
                });
            }
        }
        Ok(())
    }

    fn normalized(self) -> Result<Self, StyleError> {
        let table = Self {
            contour: self
                .contour
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
            fill: self
                .fill
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        };
        table.validate()?;
        Ok(table)
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::empty()
            .with_contour(
                "thta",
                ContourStyle {
                    level: Levels::range(250.0, 450.0, 3.0),
                    color: "red".to_string(),
                    linewidths: 1.0,
                    title: "Potential temperature (K)".to_string(),
                },
            )
            .with_contour(
                "z",
                ContourStyle {
                    level: Levels::range(0.0, 10000.0, 60.0),
                    color: "black".to_string(),
                    linewidths: 1.0,
                    title: "Geopotential height (m)".to_string(),
                },
            )
            .with_contour(
                "t",
                ContourStyle {
                    level: Levels::range(0.0, 400.0, 3.0),
                    color: "black".to_string(),
                    linewidths: 1.0,
                    title: "Temperature (K)".to_string(),
                },
            )
            .with_fill(
                "vo",
                FillStyle {
                    level: Levels::range(5e-5, 40e-5, 5e-5),
                    cmap: "YlOrRd".to_string(),
                    title: "Relative vorticity(1/s)".to_string(),
                },
            )
            .with_fill(
                "w",
                FillStyle {
                    level: Levels::range(-3.0, 3.1, 0.5),
                    cmap: "PuOr".to_string(),
                    title: "Omega(Pa/s)".to_string(),
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arange_excludes_stop() {
        assert_eq!(arange(0.0, 10.0, 2.5), vec![0.0, 2.5, 5.0, 7.5]);
        assert!(arange(1.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_default_table_lookup_is_case_insensitive() {
        let table = StyleTable::default();
        assert!(matches!(table.lookup("T"), Some(PlotStyle::Contour(_))));
        assert!(matches!(table.lookup("VO"), Some(PlotStyle::Fill(_))));
        assert!(table.lookup("q").is_none());
        table.validate().unwrap();
    }

    #[test]
    fn test_title_fragments() {
        let table = StyleTable::default();
        assert_eq!(table.lookup("z").unwrap().title_fragment(), "Geopotential height (m)(black)");
        assert_eq!(table.lookup("vo").unwrap().title_fragment(), "Relative vorticity(1/s)");
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
contour:
  Z:
    level: { start: 5000, stop: 6000, step: 60 }
    color: blue
    title: Height
fill:
  w:
    level: [-1.0, 0.0, 1.0]
    cmap: RdBu_r
    title: Omega
"#;
        let table = StyleTable::from_yaml(yaml).unwrap();
        let z = table.contour.get("z").unwrap();
        assert_eq!(z.linewidths, 1.0);
        assert_eq!(z.level.values().first().copied(), Some(5000.0));
        assert!(matches!(table.lookup("W"), Some(PlotStyle::Fill(_))));
    }

    #[test]
    fn test_validation_rejects_descending_levels() {
        let json = r#"{"fill": {"vo": {"level": [3.0, 2.0, 1.0], "cmap": "YlOrRd", "title": "x"}}}"#;
        assert!(matches!(
            StyleTable::from_json(json),
            Err(StyleError::ValidationError { .. })
        ));
    }
}
