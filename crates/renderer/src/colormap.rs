//! Named colormaps for filled contours and colorbars.
//!
//! Each map is a list of evenly spaced anchor colors sampled with linear
//! interpolation. Names are case-insensitive and any map can be reversed
//! with an `_r` suffix (`RdBu_r`).

use crate::style::{self, Rgba};

const YLORRD: &[&str] = &[
    "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026",
    "#800026",
];
const PUOR: &[&str] = &[
    "#7f3b08", "#b35806", "#e08214", "#fdb863", "#fee0b6", "#f7f7f7", "#d8daeb", "#b2abd2",
    "#8073ac", "#542788", "#2d004b",
];
const RDBU: &[&str] = &[
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0", "#92c5de",
    "#4393c3", "#2166ac", "#053061",
];
const BLUES: &[&str] = &[
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c",
    "#08306b",
];
const REDS: &[&str] = &[
    "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#a50f15",
    "#67000d",
];
const VIRIDIS: &[&str] = &[
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];
const COOLWARM: &[&str] = &[
    "#3b4cc0", "#6788ee", "#9abbff", "#c9d7f0", "#edd1c2", "#f7a889", "#e26952", "#b40426",
];

/// Names accepted by [`Colormap::from_name`], without the `_r` variants.
pub const COLORMAP_NAMES: &[&str] =
    &["YlOrRd", "PuOr", "RdBu", "Blues", "Reds", "viridis", "coolwarm"];

#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    stops: Vec<Rgba>,
}

impl Colormap {
    /// Look up a colormap by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        let (base, reversed) = match lower.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (lower.as_str(), false),
        };

        let anchors = match base {
            "ylorrd" => YLORRD,
            "puor" => PUOR,
            "rdbu" => RDBU,
            "blues" => BLUES,
            "reds" => REDS,
            "viridis" => VIRIDIS,
            "coolwarm" => COOLWARM,
            _ => return None,
        };

        let mut stops: Vec<Rgba> = anchors
            .iter()
            .filter_map(|hex| style::parse_color(hex))
            .collect();
        if reversed {
            stops.reverse();
        }

        Some(Self {
            name: name.to_string(),
            stops,
        })
    }

    /// Look up a colormap, falling back to viridis for unknown names.
    pub fn from_name_or_default(name: &str) -> Self {
        match Self::from_name(name) {
            Some(cmap) => cmap,
            None => {
                tracing::warn!(cmap = name, "Unknown colormap, using viridis");
                Self {
                    name: "viridis".to_string(),
                    stops: VIRIDIS.iter().filter_map(|hex| style::parse_color(hex)).collect(),
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color at position `t` in `[0, 1]` (clamped).
    pub fn sample(&self, t: f64) -> Rgba {
        match self.stops.len() {
            0 => style::BLACK,
            1 => self.stops[0],
            n => {
                let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
                let scaled = t * (n - 1) as f64;
                let lower = (scaled.floor() as usize).min(n - 2);
                style::lerp(self.stops[lower], self.stops[lower + 1], scaled - lower as f64)
            }
        }
    }

    /// One color per band between consecutive levels, sampled at each band's
    /// midpoint normalized over the full level range.
    pub fn band_colors(&self, levels: &[f64]) -> Vec<Rgba> {
        if levels.len() < 2 {
            return vec![];
        }
        let lo = levels[0];
        let hi = levels[levels.len() - 1];
        let span = hi - lo;
        levels
            .windows(2)
            .map(|w| {
                let mid = 0.5 * (w[0] + w[1]);
                let t = if span.abs() < f64::EPSILON {
                    0.5
                } else {
                    (mid - lo) / span
                };
                self.sample(t)
            })
            .collect()
    }
}
