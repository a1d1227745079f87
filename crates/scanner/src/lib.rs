//! Cross-section scanning of gridded reanalysis data.
//!
//! Three routines, used in this order:
//! - [`selection`] cuts a dataset down to the variables, region, level and
//!   time of interest.
//! - [`estimation`] lets the user pick a transect on a map, revising the
//!   points until they confirm.
//! - [`scanner`] sweeps that transect across the region and renders one
//!   cross-section per step, as a figure, a frame or an animation.

pub mod config;
pub mod cross_section;
pub mod error;
pub mod estimation;
pub mod geodesic;
pub mod plotting;
pub mod scanner;
pub mod selection;
pub mod sweep;

pub use config::ScannerConfig;
pub use cross_section::{CrossSection, SectionVariable};
pub use error::{ScannerError, ScannerResult};
pub use estimation::{estimation, parse_revision, FigureSink, Picker, Prompt, StdinPrompt};
pub use scanner::{scanner, scanner_frame, RenderMode, ScanOutput, Scanner, SweepInput};
pub use selection::selection;
pub use sweep::{EndpointPairs, Steps, SweepPath};
