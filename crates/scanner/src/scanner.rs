//! Sweep renderer: one cross-section figure per transect of a sweep, either
//! as a single plot, a single frame on a shared canvas, or an animation.

use std::time::{Duration, Instant};

use renderer::{Animation, Canvas, Figure};
use scanner_common::{Dataset, StyleTable};

use crate::config::ScannerConfig;
use crate::cross_section::CrossSection;
use crate::error::{ScannerError, ScannerResult};
use crate::plotting;
use crate::sweep::{EndpointPairs, Steps, SweepPath};

/// What a `scanner` call produces, resolved from the slice index and the
/// plot flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// A fresh figure for one slice.
    Plot(usize),
    /// One slice rendered into a shared canvas.
    Frame(usize),
    /// Every slice, assembled into an animation.
    Animate,
}

impl RenderMode {
    pub fn from_flags(slice_idx: Option<usize>, plot: bool) -> ScannerResult<Self> {
        match (slice_idx, plot) {
            (Some(i), true) => Ok(RenderMode::Plot(i)),
            (Some(i), false) => Ok(RenderMode::Frame(i)),
            (None, false) => Ok(RenderMode::Animate),
            (None, true) => Err(ScannerError::InvalidMode(
                "plot=true needs a slice index; pass a slice index with plot=true for one figure, \
                 a slice index with plot=false for one frame, or no slice index with plot=false \
                 for an animation"
                    .to_string(),
            )),
        }
    }
}

/// Output of a `scanner` call.
#[derive(Debug)]
pub enum ScanOutput {
    Figure(Figure),
    Frame(Canvas),
    Animation(Animation),
}

/// Where the sweep comes from: confirmed picker endpoints, or the path of a
/// previous run.
#[derive(Debug, Clone)]
pub enum SweepInput {
    Endpoints(EndpointPairs),
    Path(SweepPath),
}

impl From<EndpointPairs> for SweepInput {
    fn from(pairs: EndpointPairs) -> Self {
        SweepInput::Endpoints(pairs)
    }
}

impl From<SweepPath> for SweepInput {
    fn from(path: SweepPath) -> Self {
        SweepInput::Path(path)
    }
}

/// Renders the cross-sections of a sweep over one dataset.
#[derive(Debug)]
pub struct Scanner<'a> {
    dataset: &'a Dataset,
    styles: &'a StyleTable,
    path: SweepPath,
    config: ScannerConfig,
}

impl<'a> Scanner<'a> {
    /// The dataset must hold a single time step.
    pub fn new(
        dataset: &'a Dataset,
        input: SweepInput,
        steps: Steps,
        styles: &'a StyleTable,
        config: ScannerConfig,
    ) -> ScannerResult<Self> {
        config.validate()?;
        let times = dataset.times().len();
        if times != 1 {
            return Err(ScannerError::invalid_configuration(format!(
                "the sweep renderer needs a single time step, the dataset holds {}; select one with tidx",
                times
            )));
        }

        let path = match input {
            SweepInput::Endpoints(pairs) => SweepPath::from_endpoints(&pairs, steps)?,
            SweepInput::Path(path) => path,
        };

        Ok(Self {
            dataset,
            styles,
            path,
            config,
        })
    }

    pub fn path(&self) -> &SweepPath {
        &self.path
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Number of transects in the sweep.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    fn check_index(&self, index: usize) -> ScannerResult<()> {
        if index >= self.len() {
            return Err(ScannerError::invalid_configuration(format!(
                "slice index {} is out of range for a sweep of {} transects",
                index,
                self.len()
            )));
        }
        Ok(())
    }

    pub fn cross_section(&self, index: usize) -> ScannerResult<CrossSection> {
        self.check_index(index)?;
        let (near, far) = self
            .path
            .transect(index)
            .ok_or_else(|| ScannerError::invalid_configuration(format!("no transect {}", index)))?;
        CrossSection::extract(self.dataset, near, far, self.config.cross_section_points)
    }

    /// The cross-section figure of transect `index`.
    pub fn figure(&self, index: usize) -> ScannerResult<Figure> {
        let section = self.cross_section(index)?;
        plotting::section_figure(&section, self.styles, &self.config)
    }

    /// Render transect `index` into a shared canvas.
    pub fn render_frame(&self, canvas: &mut Canvas, index: usize) -> ScannerResult<()> {
        let figure = self.figure(index)?;
        canvas.render(&figure)?;
        tracing::debug!(frame = index, of = self.len(), "Rendered frame");
        Ok(())
    }

    /// Render every transect into one canvas and collect the frames.
    pub fn animate(&self) -> ScannerResult<Animation> {
        let start = Instant::now();
        let mut animation = Animation::new(Duration::from_millis(self.config.frame_interval_ms));

        {
            let mut canvas = Canvas::new(self.config.figure_width, self.config.figure_height)?;
            for index in 0..self.len() {
                self.render_frame(&mut canvas, index)?;
                animation.capture(&canvas)?;
            }
        }

        tracing::info!(
            frames = animation.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Assembled animation"
        );
        Ok(animation)
    }

    /// Produce the output selected by `mode`.
    pub fn run(&self, mode: RenderMode) -> ScannerResult<ScanOutput> {
        match mode {
            RenderMode::Plot(index) => Ok(ScanOutput::Figure(self.figure(index)?)),
            RenderMode::Frame(index) => {
                let mut canvas = Canvas::new(self.config.figure_width, self.config.figure_height)?;
                self.render_frame(&mut canvas, index)?;
                Ok(ScanOutput::Frame(canvas))
            }
            RenderMode::Animate => Ok(ScanOutput::Animation(self.animate()?)),
        }
    }
}

/// Render a sweep of cross-sections.
///
/// `slice_idx = Some(i)` with `plot = true` returns the figure of transect
/// `i`; with `plot = false` it renders that one frame. `slice_idx = None`
/// with `plot = false` animates every transect. `None` with `plot = true`
/// is rejected before anything is computed.
pub fn scanner(
    slice_idx: Option<usize>,
    dataset: &Dataset,
    coords: impl Into<SweepInput>,
    steps: Steps,
    styles: &StyleTable,
    plot: bool,
    config: &ScannerConfig,
) -> ScannerResult<ScanOutput> {
    let mode = RenderMode::from_flags(slice_idx, plot)?;
    let scanner = Scanner::new(dataset, coords.into(), steps, styles, config.clone())?;
    if let RenderMode::Plot(index) | RenderMode::Frame(index) = mode {
        scanner.check_index(index)?;
    }
    scanner.run(mode)
}

/// Frame mode on a caller-owned canvas: render transect `slice_idx` into
/// `canvas`, replacing whatever the previous frame drew. Reusing one canvas
/// across calls keeps its pixel buffer and font database.
pub fn scanner_frame(
    canvas: &mut Canvas,
    slice_idx: usize,
    dataset: &Dataset,
    coords: impl Into<SweepInput>,
    steps: Steps,
    styles: &StyleTable,
    config: &ScannerConfig,
) -> ScannerResult<()> {
    let scanner = Scanner::new(dataset, coords.into(), steps, styles, config.clone())?;
    scanner.check_index(slice_idx)?;
    scanner.render_frame(canvas, slice_idx)
}
