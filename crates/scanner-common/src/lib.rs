//! Common types and utilities shared across the meteoroscanner crates.

pub mod bbox;
pub mod error;
pub mod geo;
pub mod grid;
pub mod style;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{DatasetError, DatasetResult};
pub use geo::{Hemisphere, LatLon};
pub use grid::{Axis, AxisRole, Dataset, DatasetBuilder, Variable};
pub use style::{ContourStyle, FillStyle, Levels, PlotStyle, StyleError, StyleTable};
pub use time::format_valid_time;
