//! Region selection: subset a dataset by variables, box, level and time.

use scanner_common::{BoundingBox, Dataset};

use crate::error::{ScannerError, ScannerResult};

/// Slack allowed when comparing a requested box or level with grid coordinates.
const TOLERANCE: f64 = 1e-6;

/// Coordinates this close to a box edge count as inside it.
const EDGE_EPSILON: f64 = 1e-9;

/// Restrict `dataset` to the variables in `vrbs` (in that order), the box
/// `extent` (default: the whole grid), a single pressure level and a single
/// time index. Omitted level or time keeps the whole axis.
///
/// Parameters are checked in order (`variables`, `extent`, `plevel`,
/// `tidx`) and the first failure is reported with the parameter name.
pub fn selection(
    dataset: &Dataset,
    vrbs: &[&str],
    extent: Option<BoundingBox>,
    plevel: Option<f64>,
    tidx: Option<usize>,
) -> ScannerResult<Dataset> {
    if vrbs.is_empty() {
        return Err(ScannerError::out_of_range("variables", "no variables requested"));
    }
    if let Some(missing) = vrbs.iter().find(|name| dataset.variable(name).is_none()) {
        return Err(ScannerError::out_of_range(
            "variables",
            format!(
                "'{}' is not in the dataset (available: {})",
                missing,
                dataset.variable_names().join(", ")
            ),
        ));
    }

    if let Some((i, name)) = vrbs
        .iter()
        .enumerate()
        .find(|&(i, name)| vrbs[..i].contains(name))
    {
        return Err(ScannerError::out_of_range(
            "variables",
            format!("'{}' is requested more than once (position {})", name, i),
        ));
    }

    let grid_extent = dataset.extent();
    let bbox = extent.unwrap_or(grid_extent);
    if !bbox.is_ordered() {
        return Err(ScannerError::out_of_range(
            "extent",
            format!("{:?} is inverted; expected west <= east and south <= north", bbox),
        ));
    }
    if !grid_extent.contains(&bbox, TOLERANCE) {
        return Err(ScannerError::out_of_range(
            "extent",
            format!("{:?} is not inside the grid extent {:?}", bbox, grid_extent),
        ));
    }
    let lat = dataset
        .latitude()
        .range_within(bbox.south - EDGE_EPSILON, bbox.north + EDGE_EPSILON);
    let lon = dataset
        .longitude()
        .range_within(bbox.west - EDGE_EPSILON, bbox.east + EDGE_EPSILON);
    if lat.is_empty() || lon.is_empty() {
        return Err(ScannerError::out_of_range(
            "extent",
            format!("no grid point inside {:?}", bbox),
        ));
    }

    let [nt, nz, _, _] = dataset.shape();
    let levels: Vec<usize> = match plevel {
        Some(level) => {
            let index = dataset.vertical().position(level, TOLERANCE).ok_or_else(|| {
                ScannerError::out_of_range(
                    "plevel",
                    format!(
                        "no {} level equal to {}",
                        dataset.vertical().long_name,
                        level
                    ),
                )
            })?;
            vec![index]
        }
        None => (0..nz).collect(),
    };

    let times: Vec<usize> = match tidx {
        Some(t) if t >= nt => {
            return Err(ScannerError::out_of_range(
                "tidx",
                format!("time index {} but the dataset holds {} times", t, nt),
            ));
        }
        Some(t) => vec![t],
        None => (0..nt).collect(),
    };

    let subset = dataset.subset(vrbs, &times, &levels, lat, lon)?;

    tracing::debug!(
        shape = ?subset.shape(),
        variables = ?subset.variable_names(),
        "Selected region"
    );

    Ok(subset)
}
