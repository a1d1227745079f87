//! Figure rendering for atmospheric cross-sections and maps.
//!
//! Implements:
//! - Contour lines (marching squares) with inline labels
//! - Filled contours and colorbars
//! - SVG figure assembly, rasterized through resvg
//! - PNG encoding and GIF animation

pub mod animation;
pub mod canvas;
pub mod colormap;
pub mod contour;
pub mod error;
pub mod field;
pub mod figure;
pub mod filled;
pub mod png;
pub mod style;
pub mod svg;

pub use animation::Animation;
pub use canvas::Canvas;
pub use colormap::Colormap;
pub use contour::{Contour, ContourConfig, LabelPosition, Point};
pub use error::{RenderError, RenderResult};
pub use field::Field;
pub use figure::{
    AxesText, Axes, Colorbar, DataTransform, Figure, Layout, Marker, Rect, Suptitle, Tick, TitleLoc,
    YScale, DEFAULT_FONT_FAMILY, DEFAULT_HEIGHT, DEFAULT_WIDTH, PX_PER_PT,
};
pub use filled::FilledContour;
pub use style::Rgba;
pub use svg::TextAnchor;
