//! Figure model: one axes, optional colorbars and a suptitle, exported as SVG.
//!
//! Plot primitives are stored in data coordinates and laid out only when the
//! figure is exported, so colorbars added after plotting still shrink the
//! axes. The layout mirrors the usual scientific-plot defaults: the axes
//! span 12.5%–90% of the width and 12%–89% of the height, and every
//! colorbar steals `fraction + pad` of the axes width from the right.

use crate::contour::{collect_label_positions, contour_field, Contour, ContourConfig, LabelPosition, Point};
use crate::error::{RenderError, RenderResult};
use crate::field::Field;
use crate::filled::FilledContour;
use crate::style::{Rgba, BLACK, WHITE};
use crate::svg::{text_width, SvgDocument, TextAnchor, TextStyle};

pub const DEFAULT_WIDTH: u32 = 1500;
pub const DEFAULT_HEIGHT: u32 = 1000;
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// Pixels per typographic point at 100 dpi.
pub const PX_PER_PT: f64 = 100.0 / 72.0;

const TICK_FONT_PT: f64 = 10.0;
const TITLE_FONT_PT: f64 = 12.0;
const TICK_LENGTH: f64 = 5.0;
const MAX_AUTO_TICKS: usize = 8;
const MAX_COLORBAR_LABELS: usize = 11;
/// Extra width reserved for the tick labels of every colorbar but the outermost.
const COLORBAR_TEXT_SPACE: f64 = 0.06;
const GRID_COLOR: Rgba = [176, 176, 176, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YScale {
    #[default]
    Linear,
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleLoc {
    Left,
    Center,
    Right,
}

impl TitleLoc {
    fn index(&self) -> usize {
        match self {
            TitleLoc::Left => 0,
            TitleLoc::Center => 1,
            TitleLoc::Right => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

impl Tick {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Text with a font size in points.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub font_size: f64,
}

impl Label {
    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        Self {
            text: text.into(),
            font_size,
        }
    }
}

/// A filled circle at a data position; sizes are in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgba,
    pub edge_color: Rgba,
    pub edge_width: f64,
}

impl Marker {
    /// Large dot with a white edge.
    pub fn dot(x: f64, y: f64, color: Rgba) -> Self {
        Self {
            x,
            y,
            radius: 15.5,
            color,
            edge_color: WHITE,
            edge_width: 1.5,
        }
    }
}

/// Text placed in axes-fraction coordinates, (0, 0) being the lower-left
/// corner; `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct AxesText {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub font_size: f64,
    pub anchor: TextAnchor,
}

impl AxesText {
    pub fn new(x: f64, y: f64, text: impl Into<String>, font_size: f64) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            font_size,
            anchor: TextAnchor::Start,
        }
    }
}

/// Contour lines traced from one field, in data coordinates.
#[derive(Debug, Clone)]
pub struct ContourLayer {
    pub contours: Vec<Contour>,
    pub config: ContourConfig,
    /// `[x_min, x_max, y_min, y_max]` of the source field.
    pub extent: [f64; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    pub levels: Vec<f64>,
    pub colors: Vec<Rgba>,
    pub label: String,
    /// Label size in points.
    pub label_font_size: f64,
    /// Share of the original axes width taken by the bar.
    pub fraction: f64,
    /// Share of the original axes width left between bar and axes.
    pub pad: f64,
}

impl Colorbar {
    pub fn new(levels: Vec<f64>, colors: Vec<Rgba>, label: impl Into<String>) -> Self {
        Self {
            levels,
            colors,
            label: label.into(),
            label_font_size: 12.0,
            fraction: 0.025,
            pad: 0.02,
        }
    }

    pub fn for_filled(filled: &FilledContour, label: impl Into<String>) -> Self {
        Self::new(filled.levels().to_vec(), filled.colors().to_vec(), label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suptitle {
    pub text: String,
    /// Size in points.
    pub font_size: f64,
    /// Figure fraction of the top of the text, measured from the bottom.
    pub y: f64,
}

impl Suptitle {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 14.0,
            y: 0.98,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Pixel rectangles of the axes and of each colorbar (in insertion order).
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub axes: Rect,
    pub colorbars: Vec<Rect>,
}

/// Maps data coordinates to pixels inside the axes rectangle and back.
#[derive(Debug, Clone, Copy)]
pub struct DataTransform {
    rect: Rect,
    x_range: (f64, f64),
    y_range: (f64, f64),
    log_y: bool,
}

impl DataTransform {
    /// A log scale on a range that touches zero or negative values falls
    /// back to linear.
    pub fn new(rect: Rect, x_range: (f64, f64), y_range: (f64, f64), y_scale: YScale) -> Self {
        let log_y = y_scale == YScale::Log && y_range.0 > 0.0 && y_range.1 > 0.0;
        Self {
            rect,
            x_range,
            y_range,
            log_y,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    fn y_fraction(&self, y: f64) -> f64 {
        let (y0, y1) = self.y_range;
        if self.log_y {
            (y.ln() - y0.ln()) / (y1.ln() - y0.ln())
        } else {
            (y - y0) / (y1 - y0)
        }
    }

    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let (x0, x1) = self.x_range;
        let tx = (x - x0) / (x1 - x0);
        let ty = self.y_fraction(y);
        (
            self.rect.x + tx * self.rect.width,
            self.rect.bottom() - ty * self.rect.height,
        )
    }

    pub fn to_data(&self, px: f64, py: f64) -> (f64, f64) {
        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        let tx = (px - self.rect.x) / self.rect.width;
        let ty = (self.rect.bottom() - py) / self.rect.height;
        let y = if self.log_y {
            (y0.ln() + ty * (y1.ln() - y0.ln())).exp()
        } else {
            y0 + ty * (y1 - y0)
        };
        (x0 + tx * (x1 - x0), y)
    }
}

fn within(value: f64, range: (f64, f64)) -> bool {
    let (lo, hi) = (range.0.min(range.1), range.0.max(range.1));
    let eps = (hi - lo).abs() * 1e-9;
    value >= lo - eps && value <= hi + eps
}

fn widen(range: (f64, f64)) -> (f64, f64) {
    if range.0 == range.1 {
        (range.0 - 0.5, range.1 + 0.5)
    } else {
        range
    }
}

/// Tick values at a "nice" step (1, 2, 2.5 or 5 times a power of ten).
pub fn nice_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<f64> {
    let (min, max) = (lo.min(hi), lo.max(hi));
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return if min.is_finite() { vec![min] } else { vec![] };
    }
    let raw = span / max_ticks.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (min / step - 1e-9).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    (first..=last)
        .map(|k| {
            let v = k as f64 * step;
            if v == 0.0 {
                0.0
            } else {
                v
            }
        })
        .collect()
}

/// Decades inside the range, or linear nice ticks when fewer than two fit.
fn log_ticks(lo: f64, hi: f64) -> Vec<f64> {
    let (min, max) = (lo.min(hi), lo.max(hi));
    if min <= 0.0 {
        return nice_ticks(lo, hi, MAX_AUTO_TICKS);
    }
    let decades: Vec<f64> = ((min.log10() - 1e-9).ceil() as i32..=(max.log10() + 1e-9).floor() as i32)
        .map(|k| 10f64.powi(k))
        .collect();
    if decades.len() < 2 {
        nice_ticks(lo, hi, MAX_AUTO_TICKS)
    } else {
        decades
    }
}

/// Compact tick label; very small or very large magnitudes use scientific
/// notation.
pub fn format_tick(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-3..1e6).contains(&magnitude) {
        return format!("{:.1e}", value);
    }
    let text = format!("{:.4}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// A single plotting area.
#[derive(Debug, Clone, Default)]
pub struct Axes {
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    y_scale: YScale,
    x_ticks: Option<Vec<Tick>>,
    y_ticks: Option<Vec<Tick>>,
    x_label: Option<Label>,
    y_label: Option<Label>,
    titles: [Option<String>; 3],
    grid: bool,
    filled: Vec<FilledContour>,
    contours: Vec<ContourLayer>,
    markers: Vec<Marker>,
    texts: Vec<AxesText>,
}

impl Axes {
    pub fn set_xlim(&mut self, left: f64, right: f64) {
        self.x_range = Some((left, right));
    }

    /// `bottom` maps to the lower edge even when it is the larger value.
    pub fn set_ylim(&mut self, bottom: f64, top: f64) {
        self.y_range = Some((bottom, top));
    }

    pub fn set_yscale(&mut self, scale: YScale) {
        self.y_scale = scale;
    }

    pub fn yscale(&self) -> YScale {
        self.y_scale
    }

    /// Explicit x ticks; an empty list hides them.
    pub fn set_xticks(&mut self, ticks: Vec<Tick>) {
        self.x_ticks = Some(ticks);
    }

    pub fn set_yticks(&mut self, ticks: Vec<Tick>) {
        self.y_ticks = Some(ticks);
    }

    pub fn set_xlabel(&mut self, text: impl Into<String>, font_size: f64) {
        self.x_label = Some(Label::new(text, font_size));
    }

    pub fn set_ylabel(&mut self, text: impl Into<String>, font_size: f64) {
        self.y_label = Some(Label::new(text, font_size));
    }

    pub fn xlabel(&self) -> Option<&str> {
        self.x_label.as_ref().map(|l| l.text.as_str())
    }

    pub fn ylabel(&self) -> Option<&str> {
        self.y_label.as_ref().map(|l| l.text.as_str())
    }

    pub fn set_title(&mut self, loc: TitleLoc, text: impl Into<String>) {
        self.titles[loc.index()] = Some(text.into());
    }

    pub fn title(&self, loc: TitleLoc) -> Option<&str> {
        self.titles[loc.index()].as_deref()
    }

    pub fn set_grid(&mut self, grid: bool) {
        self.grid = grid;
    }

    /// Trace and store the contours of `field`; returns how many lines were
    /// produced.
    pub fn contour(&mut self, field: &Field, config: ContourConfig) -> usize {
        let contours = contour_field(field, &config);
        let count = contours.len();
        self.contours.push(ContourLayer {
            contours,
            config,
            extent: field_extent(field),
        });
        count
    }

    pub fn contourf(&mut self, filled: FilledContour) {
        self.filled.push(filled);
    }

    pub fn scatter(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn text(&mut self, text: AxesText) {
        self.texts.push(text);
    }

    pub fn contour_layers(&self) -> &[ContourLayer] {
        &self.contours
    }

    pub fn filled_layers(&self) -> &[FilledContour] {
        &self.filled
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn texts(&self) -> &[AxesText] {
        &self.texts
    }

    /// `[x_min, x_max, y_min, y_max]` over everything plotted.
    fn data_extent(&self) -> Option<[f64; 4]> {
        let extents = self
            .filled
            .iter()
            .map(|f| field_extent(f.field()))
            .chain(self.contours.iter().map(|c| c.extent))
            .chain(self.markers.iter().map(|m| [m.x, m.x, m.y, m.y]));
        extents.reduce(|a, b| [a[0].min(b[0]), a[1].max(b[1]), a[2].min(b[2]), a[3].max(b[3])])
    }

    /// Effective x range: explicit limits, else the data extent.
    pub fn xlim(&self) -> (f64, f64) {
        let range = self
            .x_range
            .or_else(|| self.data_extent().map(|e| (e[0], e[1])))
            .unwrap_or((0.0, 1.0));
        widen(range)
    }

    pub fn ylim(&self) -> (f64, f64) {
        let range = self
            .y_range
            .or_else(|| self.data_extent().map(|e| (e[2], e[3])))
            .unwrap_or((0.0, 1.0));
        widen(range)
    }

    pub fn x_ticks(&self) -> Vec<Tick> {
        let range = self.xlim();
        match &self.x_ticks {
            Some(ticks) => ticks.iter().filter(|t| within(t.value, range)).cloned().collect(),
            None => nice_ticks(range.0, range.1, MAX_AUTO_TICKS)
                .into_iter()
                .map(|v| Tick::new(v, format_tick(v)))
                .collect(),
        }
    }

    pub fn y_ticks(&self) -> Vec<Tick> {
        let range = self.ylim();
        match &self.y_ticks {
            Some(ticks) => ticks.iter().filter(|t| within(t.value, range)).cloned().collect(),
            None => {
                let values = match self.y_scale {
                    YScale::Linear => nice_ticks(range.0, range.1, MAX_AUTO_TICKS),
                    YScale::Log => log_ticks(range.0, range.1),
                };
                values.into_iter().map(|v| Tick::new(v, format_tick(v))).collect()
            }
        }
    }

    fn draw_data(&self, doc: &mut SvgDocument, t: &DataTransform) -> RenderResult<()> {
        let r = t.rect();
        doc.begin_clip("axes-clip", r.x, r.y, r.width, r.height);

        let raster_w = r.width.round().max(1.0) as usize;
        let raster_h = r.height.round().max(1.0) as usize;
        let sx = r.width / raster_w as f64;
        let sy = r.height / raster_h as f64;
        for filled in &self.filled {
            let png = filled.to_png(raster_w, raster_h, |px, py| {
                t.to_data(r.x + px * sx, r.y + py * sy)
            })?;
            doc.png_image(r.x, r.y, r.width, r.height, &png);
        }

        if self.grid {
            for tick in self.x_ticks() {
                let (px, _) = t.to_pixel(tick.value, self.ylim().0);
                doc.line(px, r.y, px, r.bottom(), GRID_COLOR, 0.8);
            }
            for tick in self.y_ticks() {
                let (_, py) = t.to_pixel(self.xlim().0, tick.value);
                doc.line(r.x, py, r.right(), py, GRID_COLOR, 0.8);
            }
        }

        let bounds = [r.x as f32, r.y as f32, r.right() as f32, r.bottom() as f32];
        let mut positions: Vec<LabelPosition> = Vec::new();
        let mut label_styles: Vec<(Rgba, f64)> = Vec::new();
        for layer in &self.contours {
            let config = &layer.config;
            for contour in &layer.contours {
                let pixel = Contour {
                    level: contour.level,
                    points: contour
                        .points
                        .iter()
                        .map(|p| {
                            let (x, y) = t.to_pixel(p.x as f64, p.y as f64);
                            Point::new(x as f32, y as f32)
                        })
                        .collect(),
                    closed: contour.closed,
                };
                let points: Vec<(f64, f64)> =
                    pixel.points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
                doc.polyline(&points, config.line_color, config.line_width as f64, pixel.closed);

                if config.is_labelled(contour.level) {
                    let before = positions.len();
                    collect_label_positions(&pixel, config, &mut positions, bounds);
                    let added = positions.len() - before;
                    label_styles.extend(
                        std::iter::repeat((config.line_color, config.label_font_size as f64)).take(added),
                    );
                }
            }
        }
        for (pos, (color, size)) in positions.iter().zip(&label_styles) {
            doc.boxed_label(
                pos.x as f64,
                pos.y as f64,
                (pos.angle as f64).to_degrees(),
                &pos.text,
                *size,
                *color,
            );
        }

        for marker in &self.markers {
            let (cx, cy) = t.to_pixel(marker.x, marker.y);
            doc.circle(
                cx,
                cy,
                marker.radius,
                marker.color,
                Some((marker.edge_color, marker.edge_width)),
            );
        }

        doc.end_group();

        tracing::debug!(
            filled = self.filled.len(),
            contour_layers = self.contours.len(),
            labels = positions.len(),
            markers = self.markers.len(),
            "Drew axes contents"
        );
        Ok(())
    }

    fn draw_decorations(&self, doc: &mut SvgDocument, t: &DataTransform) {
        let r = t.rect();
        doc.rect(r.x, r.y, r.width, r.height, None, Some((BLACK, 1.0)));

        let tick_px = TICK_FONT_PT * PX_PER_PT;
        let (x_lo, _) = self.xlim();
        let (y_lo, _) = self.ylim();

        let x_ticks = self.x_ticks();
        for tick in &x_ticks {
            let (px, _) = t.to_pixel(tick.value, y_lo);
            doc.line(px, r.bottom(), px, r.bottom() + TICK_LENGTH, BLACK, 1.0);
            doc.text(
                px,
                r.bottom() + TICK_LENGTH + tick_px * 1.1,
                &tick.label,
                TextStyle::new(tick_px).anchor(TextAnchor::Middle),
            );
        }

        let mut y_tick_width: f64 = 0.0;
        for tick in self.y_ticks() {
            let (_, py) = t.to_pixel(x_lo, tick.value);
            doc.line(r.x - TICK_LENGTH, py, r.x, py, BLACK, 1.0);
            doc.text(
                r.x - TICK_LENGTH - 3.0,
                py + tick_px * 0.35,
                &tick.label,
                TextStyle::new(tick_px).anchor(TextAnchor::End),
            );
            y_tick_width = y_tick_width.max(text_width(&tick.label, tick_px));
        }

        if let Some(label) = &self.x_label {
            let size = label.font_size * PX_PER_PT;
            let tick_space = if x_ticks.is_empty() { 0.0 } else { tick_px * 1.3 };
            doc.text(
                r.center_x(),
                r.bottom() + TICK_LENGTH + tick_space + size * 1.2,
                &label.text,
                TextStyle::new(size).anchor(TextAnchor::Middle),
            );
        }
        if let Some(label) = &self.y_label {
            let size = label.font_size * PX_PER_PT;
            doc.text(
                r.x - TICK_LENGTH - 6.0 - y_tick_width - size * 0.3,
                r.center_y(),
                &label.text,
                TextStyle::new(size).anchor(TextAnchor::Middle).rotate(-90.0),
            );
        }

        let title_px = TITLE_FONT_PT * PX_PER_PT;
        let title_y = r.y - 6.0;
        for (loc, x, anchor) in [
            (TitleLoc::Left, r.x, TextAnchor::Start),
            (TitleLoc::Center, r.center_x(), TextAnchor::Middle),
            (TitleLoc::Right, r.right(), TextAnchor::End),
        ] {
            if let Some(title) = self.title(loc) {
                doc.text(x, title_y, title, TextStyle::new(title_px).anchor(anchor));
            }
        }

        for text in &self.texts {
            doc.text(
                r.x + text.x * r.width,
                r.bottom() - text.y * r.height,
                &text.text,
                TextStyle::new(text.font_size * PX_PER_PT).anchor(text.anchor),
            );
        }
    }
}

fn field_extent(field: &Field) -> [f64; 4] {
    let (x, y) = (field.x(), field.y());
    let (x0, x1) = (x[0], x[x.len() - 1]);
    let (y0, y1) = (y[0], y[y.len() - 1]);
    [x0.min(x1), x0.max(x1), y0.min(y1), y0.max(y1)]
}

fn draw_colorbar(doc: &mut SvgDocument, colorbar: &Colorbar, rect: Rect) {
    let bands = colorbar.colors.len();
    if bands == 0 {
        return;
    }
    let band_height = rect.height / bands as f64;
    for (i, color) in colorbar.colors.iter().enumerate() {
        let y = rect.bottom() - (i + 1) as f64 * band_height;
        doc.rect(rect.x, y, rect.width, band_height, Some(*color), None);
    }
    doc.rect(rect.x, rect.y, rect.width, rect.height, None, Some((BLACK, 0.8)));

    let tick_px = TICK_FONT_PT * PX_PER_PT;
    let stride = colorbar.levels.len().div_ceil(MAX_COLORBAR_LABELS).max(1);
    let mut label_width: f64 = 0.0;
    for (i, level) in colorbar.levels.iter().enumerate().take(bands + 1).step_by(stride) {
        let y = rect.bottom() - i as f64 * band_height;
        let text = format_tick(*level);
        doc.line(rect.right(), y, rect.right() + TICK_LENGTH * 0.7, y, BLACK, 0.8);
        doc.text(
            rect.right() + TICK_LENGTH + 2.0,
            y + tick_px * 0.35,
            &text,
            TextStyle::new(tick_px),
        );
        label_width = label_width.max(text_width(&text, tick_px));
    }

    if !colorbar.label.is_empty() {
        let size = colorbar.label_font_size * PX_PER_PT;
        doc.text(
            rect.right() + TICK_LENGTH + 6.0 + label_width + size,
            rect.center_y(),
            &colorbar.label,
            TextStyle::new(size).anchor(TextAnchor::Middle).rotate(-90.0),
        );
    }
}

#[derive(Debug, Clone)]
pub struct Figure {
    width: u32,
    height: u32,
    font_family: String,
    suptitle: Option<Suptitle>,
    axes: Axes,
    colorbars: Vec<Colorbar>,
}

impl Default for Figure {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Figure {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            suptitle: None,
            axes: Axes::default(),
            colorbars: Vec::new(),
        }
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    pub fn axes_mut(&mut self) -> &mut Axes {
        &mut self.axes
    }

    pub fn set_suptitle(&mut self, suptitle: Suptitle) {
        self.suptitle = Some(suptitle);
    }

    pub fn suptitle(&self) -> Option<&Suptitle> {
        self.suptitle.as_ref()
    }

    /// The first colorbar added sits outermost.
    pub fn add_colorbar(&mut self, colorbar: Colorbar) {
        self.colorbars.push(colorbar);
    }

    pub fn colorbars(&self) -> &[Colorbar] {
        &self.colorbars
    }

    pub fn layout(&self) -> Layout {
        let w = self.width as f64;
        let h = self.height as f64;
        let left = 0.125 * w;
        let right = 0.9 * w;
        let top = 0.12 * h;
        let bottom = 0.89 * h;
        let full_width = right - left;

        let mut axes_right = right;
        let mut colorbars = Vec::with_capacity(self.colorbars.len());
        for (i, colorbar) in self.colorbars.iter().enumerate() {
            if i > 0 {
                axes_right -= COLORBAR_TEXT_SPACE * w;
            }
            let bar_width = colorbar.fraction * full_width;
            colorbars.push(Rect {
                x: axes_right - bar_width,
                y: top,
                width: bar_width,
                height: bottom - top,
            });
            axes_right -= bar_width + colorbar.pad * full_width;
        }

        Layout {
            axes: Rect {
                x: left,
                y: top,
                width: (axes_right - left).max(1.0),
                height: (bottom - top).max(1.0),
            },
            colorbars,
        }
    }

    pub fn transform(&self) -> DataTransform {
        DataTransform::new(
            self.layout().axes,
            self.axes.xlim(),
            self.axes.ylim(),
            self.axes.yscale(),
        )
    }

    pub fn to_svg(&self) -> RenderResult<String> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyFigure {
                width: self.width,
                height: self.height,
            });
        }

        let layout = self.layout();
        let transform = DataTransform::new(
            layout.axes,
            self.axes.xlim(),
            self.axes.ylim(),
            self.axes.yscale(),
        );
        let mut doc = SvgDocument::new(self.width, self.height, &self.font_family);

        self.axes.draw_data(&mut doc, &transform)?;
        self.axes.draw_decorations(&mut doc, &transform);
        for (colorbar, rect) in self.colorbars.iter().zip(&layout.colorbars) {
            draw_colorbar(&mut doc, colorbar, *rect);
        }

        if let Some(suptitle) = &self.suptitle {
            let size = suptitle.font_size * PX_PER_PT;
            doc.text(
                self.width as f64 / 2.0,
                (1.0 - suptitle.y) * self.height as f64 + size * 0.8,
                &suptitle.text,
                TextStyle::new(size).anchor(TextAnchor::Middle),
            );
        }

        Ok(doc.finish())
    }
}
