//! Isolines by marching squares.
//!
//! Contours are traced in grid index space, joined into polylines, smoothed,
//! and then mapped to the field's data coordinates. Label positions are
//! chosen later, in pixel space, once the figure layout is known.

use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::field::Field;
use crate::style::Rgba;

/// Endpoints closer than this, in index units, are treated as one point.
const JOIN_TOLERANCE: f32 = 1e-3;

/// A point in grid indices, data coordinates or pixels, depending on stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(self.x + t * (other.x - self.x), self.y + t * (other.y - self.y))
    }

    fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn near(self, other: Point) -> bool {
        self.distance(other) < JOIN_TOLERANCE
    }
}

/// One crossing of a level through a grid cell.
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A traced isoline. Closed rings do not repeat their first point.
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f32,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// How one contour layer is traced and drawn.
#[derive(Debug, Clone)]
pub struct ContourConfig {
    pub levels: Vec<f32>,
    /// Stroke width in pixels
    pub line_width: f32,
    pub line_color: Rgba,
    /// Chaikin passes applied after tracing
    pub smoothing_passes: u32,
    pub labels_enabled: bool,
    /// Levels that receive inline labels
    pub label_levels: Vec<f32>,
    pub label_font_size: f32,
    /// Target distance between labels on one line, in pixels
    pub label_spacing: f32,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            levels: Vec::new(),
            line_width: 1.0,
            line_color: [0, 0, 0, 255],
            smoothing_passes: 1,
            labels_enabled: false,
            label_levels: Vec::new(),
            label_font_size: 10.0,
            label_spacing: 150.0,
        }
    }
}

impl ContourConfig {
    /// Label every other level, starting from the second one.
    pub fn label_alternate_levels(mut self) -> Self {
        self.label_levels = self.levels.iter().copied().skip(1).step_by(2).collect();
        self.labels_enabled = true;
        self
    }

    pub fn is_labelled(&self, level: f32) -> bool {
        let tolerance = level.abs().max(1.0) * 1e-6;
        self.labels_enabled && self.label_levels.iter().any(|&l| (l - level).abs() <= tolerance)
    }

    /// Label text for a level: integer format, truncating toward zero.
    pub fn get_level_label(&self, level: f32) -> String {
        (level.trunc() as i64).to_string()
    }
}

/// Edges of a grid cell.
#[derive(Clone, Copy)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

use Edge::{Bottom, Left, Right, Top};

/// Edge pairs crossed for each corner mask. Bits: 1 top-left, 2 top-right,
/// 4 bottom-right, 8 bottom-left. Saddles (5 and 10) are not disambiguated.
const CASES: [&[(Edge, Edge)]; 16] = [
    &[],
    &[(Left, Top)],
    &[(Top, Right)],
    &[(Left, Right)],
    &[(Right, Bottom)],
    &[(Left, Top), (Right, Bottom)],
    &[(Top, Bottom)],
    &[(Left, Bottom)],
    &[(Left, Bottom)],
    &[(Top, Bottom)],
    &[(Top, Right), (Left, Bottom)],
    &[(Right, Bottom)],
    &[(Left, Right)],
    &[(Top, Right)],
    &[(Left, Top)],
    &[],
];

/// The four corner values of the cell whose top-left corner is `(x, y)`.
struct Cell {
    x: f32,
    y: f32,
    tl: f32,
    tr: f32,
    br: f32,
    bl: f32,
}

impl Cell {
    fn at(data: &[f32], width: usize, x: usize, y: usize) -> Option<Self> {
        let row = y * width + x;
        let cell = Self {
            x: x as f32,
            y: y as f32,
            tl: data[row],
            tr: data[row + 1],
            br: data[row + width + 1],
            bl: data[row + width],
        };
        let complete = [cell.tl, cell.tr, cell.br, cell.bl].iter().all(|v| !v.is_nan());
        complete.then_some(cell)
    }

    fn mask(&self, level: f32) -> usize {
        [self.tl, self.tr, self.br, self.bl]
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v >= level)
            .fold(0, |mask, (bit, _)| mask | (1 << bit))
    }

    fn crossing(&self, edge: Edge, level: f32) -> Point {
        let (x, y) = (self.x, self.y);
        let (a, b, va, vb) = match edge {
            Top => (Point::new(x, y), Point::new(x + 1.0, y), self.tl, self.tr),
            Right => (Point::new(x + 1.0, y), Point::new(x + 1.0, y + 1.0), self.tr, self.br),
            Bottom => (Point::new(x, y + 1.0), Point::new(x + 1.0, y + 1.0), self.bl, self.br),
            Left => (Point::new(x, y), Point::new(x, y + 1.0), self.tl, self.bl),
        };
        edge_crossing(a, b, va, vb, level)
    }
}

/// Where `level` crosses the edge `a`→`b`; the midpoint on a flat edge.
fn edge_crossing(a: Point, b: Point, va: f32, vb: f32, level: f32) -> Point {
    let delta = vb - va;
    if delta == 0.0 || !delta.is_finite() {
        return a.lerp(b, 0.5);
    }
    a.lerp(b, ((level - va) / delta).clamp(0.0, 1.0))
}

/// Crossing segments of `level` through a row-major grid, in index space.
///
/// Cells touching a NaN are skipped. Returns nothing for grids smaller than
/// 2x2 or when `data` does not match the dimensions.
pub fn march_squares(data: &[f32], width: usize, height: usize, level: f32) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return Vec::new();
    }

    (0..height - 1)
        .flat_map(|y| (0..width - 1).map(move |x| (x, y)))
        .filter_map(|(x, y)| Cell::at(data, width, x, y))
        .flat_map(|cell| {
            CASES[cell.mask(level)]
                .iter()
                .map(|&(from, to)| Segment {
                    start: cell.crossing(from, level),
                    end: cell.crossing(to, level),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Remove and return the far end of an unused segment touching `at`.
fn take_neighbour(pool: &mut Vec<Option<Segment>>, at: Point) -> Option<Point> {
    pool.iter_mut().find_map(|slot| {
        let seg = slot.as_ref()?;
        let far = if seg.start.near(at) {
            seg.end
        } else if seg.end.near(at) {
            seg.start
        } else {
            return None;
        };
        *slot = None;
        Some(far)
    })
}

/// Join unordered segments into polylines, growing each line from both ends.
///
/// The returned contours have level 0; callers assign it.
pub fn connect_segments(segments: Vec<Segment>) -> Vec<Contour> {
    let mut pool: Vec<Option<Segment>> = segments.into_iter().map(Some).collect();
    let mut contours = Vec::new();

    for i in 0..pool.len() {
        let Some(seed) = pool[i].take() else {
            continue;
        };

        let mut line = VecDeque::from([seed.start, seed.end]);
        while let Some(next) = line.back().and_then(|&tail| take_neighbour(&mut pool, tail)) {
            line.push_back(next);
        }
        while let Some(prev) = line.front().and_then(|&head| take_neighbour(&mut pool, head)) {
            line.push_front(prev);
        }

        let mut points: Vec<Point> = line.into();
        let closed = points.len() > 2 && points[0].near(points[points.len() - 1]);
        if closed {
            points.pop();
        }
        contours.push(Contour {
            level: 0.0,
            points,
            closed,
        });
    }

    contours
}

/// Chaikin corner cutting. Open lines keep their endpoints.
pub fn smooth_contour(contour: &Contour, iterations: u32) -> Contour {
    let mut points = contour.points.clone();
    if points.len() >= 3 {
        for _ in 0..iterations {
            points = chaikin_pass(&points, contour.closed);
        }
    }

    Contour {
        level: contour.level,
        points,
        closed: contour.closed,
    }
}

fn chaikin_pass(points: &[Point], closed: bool) -> Vec<Point> {
    let n = points.len();
    let edges = if closed { n } else { n - 1 };
    let cut = |i: usize| {
        let (a, b) = (points[i], points[(i + 1) % n]);
        [a.lerp(b, 0.25), a.lerp(b, 0.75)]
    };

    let mut out = Vec::with_capacity(edges * 2 + 2);
    if !closed {
        out.push(points[0]);
    }
    out.extend((0..edges).flat_map(cut));
    if !closed {
        out.push(points[n - 1]);
    }
    out
}

/// Trace every level of `config`, in grid index space.
pub fn generate_all_contours(data: &[f32], width: usize, height: usize, config: &ContourConfig) -> Vec<Contour> {
    config
        .levels
        .iter()
        .flat_map(|&level| {
            connect_segments(march_squares(data, width, height, level))
                .into_iter()
                .map(move |mut contour| {
                    contour.level = level;
                    contour
                })
        })
        .map(|contour| {
            if config.smoothing_passes > 0 {
                smooth_contour(&contour, config.smoothing_passes)
            } else {
                contour
            }
        })
        .collect()
}

/// Trace the contours of a field and map them to its data coordinates.
pub fn contour_field(field: &Field, config: &ContourConfig) -> Vec<Contour> {
    let mut contours = generate_all_contours(field.values(), field.width(), field.height(), config);
    for contour in &mut contours {
        for p in &mut contour.points {
            *p = Point::new(field.x_at(p.x) as f32, field.y_at(p.y) as f32);
        }
    }

    tracing::debug!(
        levels = config.levels.len(),
        contours = contours.len(),
        points = contours.iter().map(|c| c.points.len()).sum::<usize>(),
        "Traced contours"
    );
    contours
}

/// Position and text of an inline contour label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPosition {
    pub x: f32,
    pub y: f32,
    /// Radians, within ±90° so text reads upright
    pub angle: f32,
    pub text: String,
    pub level: f32,
}

/// Arc length of a contour, including the closing edge of a ring.
pub fn contour_length(contour: &Contour) -> f32 {
    let open: f32 = contour.points.windows(2).map(|w| w[0].distance(w[1])).sum();
    match (contour.closed, contour.points.first(), contour.points.last()) {
        (true, Some(&first), Some(&last)) if contour.points.len() > 2 => open + last.distance(first),
        _ => open,
    }
}

fn upright(angle: f32) -> f32 {
    if angle > FRAC_PI_2 {
        angle - PI
    } else if angle < -FRAC_PI_2 {
        angle + PI
    } else {
        angle
    }
}

/// Append label positions along a contour already mapped to pixels.
///
/// `floor(length / spacing)` labels (at least one) are spread evenly over
/// the line. Candidates closer than two font sizes to `bounds`
/// (`[left, top, right, bottom]`) or four font sizes to an existing label
/// are dropped.
pub fn collect_label_positions(
    contour: &Contour,
    config: &ContourConfig,
    positions: &mut Vec<LabelPosition>,
    bounds: [f32; 4],
) {
    let length = contour_length(contour);
    if length < config.label_spacing * 0.5 {
        return;
    }

    let count = ((length / config.label_spacing).floor() as usize).max(1);
    let step = length / (count as f32 + 1.0);
    let text = config.get_level_label(contour.level);
    let margin = config.label_font_size * 2.0;
    let min_gap = config.label_font_size * 4.0;
    let [left, top, right, bottom] = bounds;

    let mut targets = (1..=count).map(|k| k as f32 * step).peekable();
    let mut travelled = 0.0;
    for w in contour.points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let seg_len = a.distance(b);
        if seg_len <= f32::EPSILON {
            continue;
        }

        while let Some(target) = targets.next_if(|&t| t <= travelled + seg_len) {
            let at = a.lerp(b, (target - travelled) / seg_len);
            let inside = at.x > left + margin && at.x < right - margin && at.y > top + margin && at.y < bottom - margin;
            let crowded = positions.iter().any(|p| Point::new(p.x, p.y).distance(at) < min_gap);
            if inside && !crowded {
                positions.push(LabelPosition {
                    x: at.x,
                    y: at.y,
                    angle: upright((b.y - a.y).atan2(b.x - a.x)),
                    text: text.clone(),
                    level: contour.level,
                });
            }
        }
        travelled += seg_len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_crossing_interpolates() {
        let p = edge_crossing(Point::new(0.0, 0.0), Point::new(1.0, 0.0), 0.0, 10.0, 2.5);
        assert!((p.x - 0.25).abs() < 1e-6);
        assert_eq!(p.y, 0.0);

        let flat = edge_crossing(Point::new(0.0, 0.0), Point::new(0.0, 1.0), 3.0, 3.0, 3.0);
        assert_eq!(flat, Point::new(0.0, 0.5));
    }

    #[test]
    fn test_cell_mask_bits() {
        let cell = Cell::at(&[9.0, 0.0, 0.0, 9.0], 2, 0, 0).unwrap();
        // top-left (1) and bottom-right (4)
        assert_eq!(cell.mask(5.0), 5);
        assert!(Cell::at(&[f32::NAN, 0.0, 0.0, 0.0], 2, 0, 0).is_none());
    }

    #[test]
    fn test_peak_gives_closed_ring() {
        let data = [0.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 0.0];
        let contours = connect_segments(march_squares(&data, 3, 3, 5.0));
        assert_eq!(contours.len(), 1);
        assert!(contours[0].closed);
        assert_eq!(contours[0].points.len(), 4);
    }

    #[test]
    fn test_chaikin_pass_counts() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        assert_eq!(chaikin_pass(&square, true).len(), 8);
        assert_eq!(chaikin_pass(&square, false).len(), 8);
    }

    #[test]
    fn test_upright() {
        assert!((upright(PI) - 0.0).abs() < 1e-6);
        assert!((upright(-3.0 * FRAC_PI_2 / 2.0) - FRAC_PI_2 / 2.0).abs() < 1e-6);
    }
}
