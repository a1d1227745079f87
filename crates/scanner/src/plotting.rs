//! Figure assembly for the picker map and the cross-section frames.

use renderer::colormap::Colormap;
use renderer::style::parse_color_or_black;
use renderer::{
    AxesText, Colorbar, ContourConfig, Field, Figure, FilledContour, Marker, Suptitle, Tick, TitleLoc, YScale,
    PX_PER_PT,
};
use scanner_common::geo::{format_latitude, format_longitude};
use scanner_common::{format_valid_time, Axis, Dataset, PlotStyle, StyleTable};

use crate::config::ScannerConfig;
use crate::cross_section::CrossSection;
use crate::error::ScannerResult;

/// Font size of contour labels, in points.
const CONTOUR_LABEL_PT: f64 = 8.0;

/// Font size of axis labels, in points.
const AXIS_LABEL_PT: f64 = 12.0;

/// Font size of the "Start"/"End" captions, in points.
const ENDPOINT_TEXT_PT: f64 = 14.0;

/// Map tick spacing in degrees.
const MAP_TICK_DEGREES: f64 = 5.0;

/// Vertical position of the picker map's suptitle, as a figure fraction.
const MAP_SUPTITLE_Y: f64 = 0.85;

/// Marker colors for origin, transect end and sweep start.
pub const MARKER_COLORS: [&str; 3] = ["red", "orange", "teal"];

fn new_figure(config: &ScannerConfig) -> Figure {
    Figure::new(config.figure_width, config.figure_height).with_font_family(config.font_family.clone())
}

/// Draw every styled variable onto `figure` and return the title fragments
/// in variable order. `field_of` yields the field to draw for a variable,
/// or `None` when it can only be titled. Unstyled variables are skipped.
fn plot_styled<F>(
    figure: &mut Figure,
    variables: &[&str],
    styles: &StyleTable,
    config: &ScannerConfig,
    mut field_of: F,
) -> ScannerResult<Vec<String>>
where
    F: FnMut(&str) -> ScannerResult<Option<Field>>,
{
    let mut fragments = Vec::new();

    for &name in variables {
        let Some(style) = styles.lookup(name) else {
            tracing::debug!(variable = name, "No style configured, skipping");
            continue;
        };
        fragments.push(style.title_fragment());

        let Some(field) = field_of(name)? else {
            continue;
        };

        match style {
            PlotStyle::Contour(contour) => {
                let line_config = ContourConfig {
                    levels: contour.level.values().into_iter().map(|l| l as f32).collect(),
                    line_width: (contour.linewidths * PX_PER_PT) as f32,
                    line_color: parse_color_or_black(&contour.color),
                    smoothing_passes: config.contour_smoothing_passes,
                    label_font_size: (CONTOUR_LABEL_PT * PX_PER_PT) as f32,
                    ..Default::default()
                }
                .label_alternate_levels();
                let lines = figure.axes_mut().contour(&field, line_config);
                tracing::debug!(variable = name, lines, "Contoured variable");
            }
            PlotStyle::Fill(fill) => {
                let cmap = Colormap::from_name_or_default(&fill.cmap);
                let filled = FilledContour::with_colormap(field, fill.level.values(), &cmap)?;
                figure.add_colorbar(Colorbar::for_filled(&filled, fill.title.clone()));
                figure.axes_mut().contourf(filled);
            }
        }
    }

    Ok(fragments)
}

/// `"pressure"` → `"Pressure"`; the remainder is lower-cased.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Caption naming the transect endpoints, e.g.
/// `From: 30.0 N, -100.0 W, to: 45.0 N, -100.0 W`.
pub fn endpoints_caption(section: &CrossSection) -> String {
    let (start, end) = (section.start(), section.end());
    format!(
        "From: {}, {}, to: {}, {}",
        format_latitude(start.lat),
        format_longitude(start.lon),
        format_latitude(end.lat),
        format_longitude(end.lon)
    )
}

/// Pressure ticks every 100 hPa from 1000 upward.
fn pressure_ticks() -> Vec<Tick> {
    (1..=10)
        .rev()
        .map(|i| {
            let p = i * 100;
            Tick::new(p as f64, p.to_string())
        })
        .collect()
}

fn set_vertical_axis(figure: &mut Figure, vertical: &Axis) {
    let ax = figure.axes_mut();
    ax.set_ylabel(
        format!("{} ({})", capitalize(&vertical.long_name), vertical.units),
        AXIS_LABEL_PT,
    );
    if vertical.is_pressure() {
        ax.set_ylim(vertical.max(), vertical.min());
        ax.set_yscale(YScale::Log);
        ax.set_yticks(pressure_ticks());
    } else if let (Some(first), Some(last)) = (vertical.first(), vertical.last()) {
        ax.set_ylim(first, last);
    }
}

/// One cross-section frame: contours and fills of every styled variable,
/// title fragments joined into the suptitle, endpoint and time captions.
pub fn section_figure(
    section: &CrossSection,
    styles: &StyleTable,
    config: &ScannerConfig,
) -> ScannerResult<Figure> {
    let mut figure = new_figure(config);
    let names: Vec<&str> = section.variables().iter().map(|v| v.name.as_str()).collect();
    let drawable = section.vertical().len() >= 2;
    if !drawable {
        tracing::warn!(
            levels = section.vertical().len(),
            "Cross-section has fewer than 2 vertical levels, drawing titles only"
        );
    }

    let fragments = plot_styled(&mut figure, &names, styles, config, |name| {
        if drawable {
            section.to_field(name).map(Some)
        } else {
            Ok(None)
        }
    })?;
    figure.set_suptitle(Suptitle::new(fragments.join(", ")));

    set_vertical_axis(&mut figure, section.vertical());
    let ax = figure.axes_mut();
    ax.set_xlim(0.0, section.points().len().saturating_sub(1) as f64);
    ax.set_xticks(vec![]);
    ax.text(AxesText::new(-0.02, -0.04, "Start", ENDPOINT_TEXT_PT));
    ax.text(AxesText::new(0.98, -0.04, "End", ENDPOINT_TEXT_PT));
    ax.set_title(TitleLoc::Right, format!("Valid time: {}", format_valid_time(section.valid_time())));
    ax.set_title(TitleLoc::Left, endpoints_caption(section));

    Ok(figure)
}

/// Ticks at every `round(5 / step)`-th coordinate of `axis`, labelled with
/// the coordinate value.
fn degree_ticks(axis: &Axis) -> Vec<Tick> {
    let stride = axis
        .step()
        .filter(|step| *step > 0.0)
        .map(|step| (MAP_TICK_DEGREES / step).round_ties_even() as usize)
        .unwrap_or(1)
        .max(1);
    axis.values
        .iter()
        .step_by(stride)
        .map(|&v| Tick::new(v, format!("{:?}", v)))
        .collect()
}

/// The picker's base map: the first time and level of every styled variable
/// over the full grid, with the candidate points drawn as markers.
/// `points` holds origin, transect end and sweep start as lat/lon pairs.
pub fn map_figure(
    dataset: &Dataset,
    points: &[Option<f64>; 6],
    styles: &StyleTable,
    config: &ScannerConfig,
) -> ScannerResult<Figure> {
    let mut figure = new_figure(config);
    let (latitude, longitude, vertical) = (dataset.latitude(), dataset.longitude(), dataset.vertical());
    let drawable = latitude.len() >= 2 && longitude.len() >= 2;

    let names = dataset.variable_names();
    let fragments = plot_styled(&mut figure, &names, styles, config, |name| {
        if !drawable {
            return Ok(None);
        }
        let plane = dataset.field(name, 0, 0)?;
        let field = Field::new(longitude.values.clone(), latitude.values.clone(), plane.to_vec())?;
        Ok(Some(field))
    })?;
    figure.set_suptitle(Suptitle {
        y: MAP_SUPTITLE_Y,
        ..Suptitle::new(fragments.join(", "))
    });

    let level = vertical.first().unwrap_or(f64::NAN);
    let ax = figure.axes_mut();
    ax.set_xlim(longitude.min(), longitude.max());
    ax.set_ylim(latitude.min(), latitude.max());
    ax.set_xticks(degree_ticks(longitude));
    ax.set_yticks(degree_ticks(latitude));
    ax.set_xlabel("Longitude (Deg)", AXIS_LABEL_PT);
    ax.set_ylabel("Latitude (Deg)", AXIS_LABEL_PT);
    ax.set_grid(true);
    ax.set_title(
        TitleLoc::Left,
        format!(
            "{} level: {}{}",
            capitalize(&vertical.long_name),
            level.trunc() as i64,
            vertical.units
        ),
    );
    if let Some(time) = dataset.times().first() {
        ax.set_title(TitleLoc::Right, format!("Valid time: {}", format_valid_time(time)));
    }

    for (pair, color) in points.chunks(2).zip(MARKER_COLORS) {
        if let [Some(lat), Some(lon)] = pair {
            ax.scatter(Marker::dot(*lon, *lat, parse_color_or_black(color)));
        }
    }

    Ok(figure)
}
