//! Geographic points and coordinate captions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", format_latitude(self.lat), format_longitude(self.lon))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Zero counts as north.
    pub fn of_latitude(lat: f64) -> Self {
        if lat >= 0.0 {
            Hemisphere::North
        } else {
            Hemisphere::South
        }
    }

    /// Zero counts as east.
    pub fn of_longitude(lon: f64) -> Self {
        if lon >= 0.0 {
            Hemisphere::East
        } else {
            Hemisphere::West
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
            Hemisphere::East => 'E',
            Hemisphere::West => 'W',
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Format a coordinate rounded to two decimals, keeping its sign and always
/// showing at least one fractional digit (`-100.0`, `35.25`).
pub fn format_coordinate(value: f64) -> String {
    let rounded = round_to(value, 2);
    // Avoid "-0.0" for values that round to zero.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.2}", rounded);
    let trimmed = text.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Caption fragment for a latitude, e.g. `35.5 N` or `-12.0 S`. The letter
/// follows the rounded value, so `-0.004` reads `0.0 N`.
pub fn format_latitude(lat: f64) -> String {
    let rounded = round_to(lat, 2);
    format!("{} {}", format_coordinate(rounded), Hemisphere::of_latitude(rounded))
}

/// Caption fragment for a longitude, e.g. `-100.0 W`.
pub fn format_longitude(lon: f64) -> String {
    let rounded = round_to(lon, 2);
    format!("{} {}", format_coordinate(rounded), Hemisphere::of_longitude(rounded))
}
