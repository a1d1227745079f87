//! Time handling for dataset time axes.

use chrono::{DateTime, Utc};

/// Format used for the "Valid time" figure title.
pub const VALID_TIME_FORMAT: &str = "%Y-%m-%d %H:%MZ";

/// Format a time step for the right-hand figure title, e.g. `2021-08-29 12:00Z`.
pub fn format_valid_time(time: &DateTime<Utc>) -> String {
    time.format(VALID_TIME_FORMAT).to_string()
}
