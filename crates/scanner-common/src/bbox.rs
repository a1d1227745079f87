//! Geographic bounding boxes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A geographic bounding box in degrees.
///
/// Stored as (west, east, north, south), the order in which regions are
/// usually written down for reanalysis subsets, e.g. CONUS is
/// `(-130, -60, 52, 20)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub east: f64,
    pub north: f64,
    pub south: f64,
}

impl BoundingBox {
    pub fn new(west: f64, east: f64, north: f64, south: f64) -> Self {
        Self {
            west,
            east,
            north,
            south,
        }
    }

    /// True when west <= east and south <= north.
    pub fn is_ordered(&self) -> bool {
        self.west <= self.east && self.south <= self.north
    }

    /// `other` lies inside this box, give or take `tolerance` degrees.
    pub fn contains(&self, other: &BoundingBox, tolerance: f64) -> bool {
        other.west >= self.west - tolerance
            && other.east <= self.east + tolerance
            && other.south >= self.south - tolerance
            && other.north <= self.north + tolerance
    }
}

impl FromStr for BoundingBox {
    type Err = BboxParseError;

    /// Parse "west,east,north,south".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let values = parts
            .iter()
            .map(|part| {
                part.parse::<f64>()
                    .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bounding box format: {0}. Expected 'west,east,north,south'")]
    InvalidFormat(String),

    #[error("Invalid number in bounding box: {0}")]
    InvalidNumber(String),
}
