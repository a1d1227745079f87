//! Great-circle geometry on a spherical Earth.

use scanner_common::LatLon;

/// Earth radius in kilometers for distance calculations.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometers.
pub fn haversine_distance_km(a: LatLon, b: LatLon) -> f64 {
    EARTH_RADIUS_KM * central_angle(a, b)
}

/// Angle between two points seen from the Earth's center, in radians.
fn central_angle(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

/// Initial bearing from `a` towards `b` in radians (0 = north, π/2 = east).
pub fn initial_bearing(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    y.atan2(x)
}

/// Point at fraction `t` of the great circle from `a` to `b`.
pub fn intermediate_point(a: LatLon, b: LatLon, t: f64) -> LatLon {
    let delta = central_angle(a, b);
    if delta.abs() < 1e-12 {
        return a;
    }

    let lat1 = a.lat.to_radians();
    let lon1 = a.lon.to_radians();
    let lat2 = b.lat.to_radians();
    let lon2 = b.lon.to_radians();

    let wa = ((1.0 - t) * delta).sin() / delta.sin();
    let wb = (t * delta).sin() / delta.sin();

    let x = wa * lat1.cos() * lon1.cos() + wb * lat2.cos() * lon2.cos();
    let y = wa * lat1.cos() * lon1.sin() + wb * lat2.cos() * lon2.sin();
    let z = wa * lat1.sin() + wb * lat2.sin();

    let lat = z.atan2((x * x + y * y).sqrt());
    let lon = y.atan2(x);
    LatLon::new(lat.to_degrees(), unwrap_longitude(lon.to_degrees(), a.lon))
}

/// Shift `lon` by whole turns so it lies within 180° of `reference`; keeps
/// paths that start at e.g. -100° from jumping to the 0..360 convention.
fn unwrap_longitude(lon: f64, reference: f64) -> f64 {
    let mut lon = lon;
    while lon - reference > 180.0 {
        lon -= 360.0;
    }
    while lon - reference < -180.0 {
        lon += 360.0;
    }
    lon
}

/// `steps` points evenly spaced along the great circle from `start` to
/// `end`, both endpoints included. The endpoints are returned exactly as
/// given.
pub fn great_circle_points(start: LatLon, end: LatLon, steps: usize) -> Vec<LatLon> {
    match steps {
        0 => vec![],
        1 => vec![start],
        _ => {
            let last = steps - 1;
            (0..steps)
                .map(|i| match i {
                    0 => start,
                    i if i == last => end,
                    i => intermediate_point(start, end, i as f64 / last as f64),
                })
                .collect()
        }
    }
}
