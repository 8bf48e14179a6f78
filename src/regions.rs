//! Named regional bounds used by the E3SM extraction jobs
//!
//! Job configurations name the region a variable group is aggregated over.
//! Names that are not in this table fall back to global bounds at extraction
//! time, which is almost never what the user meant, so the validators flag
//! them before submission.

use std::fmt;
use tracing::debug;

/// Latitude/longitude box in degrees. Longitudes are in [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl RegionBounds {
    pub const GLOBAL: RegionBounds = RegionBounds::new(-90.0, 90.0, -180.0, 180.0);

    pub const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }
}

impl fmt::Display for RegionBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat [{}, {}], lon [{}, {}]",
            self.lat_min, self.lat_max, self.lon_min, self.lon_max
        )
    }
}

const REGIONS: &[(&str, RegionBounds)] = &[
    ("global", RegionBounds::GLOBAL),
    ("northern_hemisphere", RegionBounds::new(0.0, 90.0, -180.0, 180.0)),
    ("southern_hemisphere", RegionBounds::new(-90.0, 0.0, -180.0, 180.0)),
    ("tropics", RegionBounds::new(-23.5, 23.5, -180.0, 180.0)),
    ("arctic", RegionBounds::new(66.5, 90.0, -180.0, 180.0)),
    ("antarctic", RegionBounds::new(-90.0, -60.0, -180.0, 180.0)),
    ("north_america", RegionBounds::new(15.0, 72.0, -170.0, -50.0)),
    ("conus", RegionBounds::new(24.5, 49.5, -125.0, -66.5)),
    ("central_america", RegionBounds::new(7.0, 23.0, -118.0, -77.0)),
    ("south_america", RegionBounds::new(-56.0, 13.0, -82.0, -34.0)),
    ("amazon", RegionBounds::new(-20.0, 5.0, -80.0, -45.0)),
    ("europe", RegionBounds::new(35.0, 71.0, -10.0, 40.0)),
    ("africa", RegionBounds::new(-35.0, 37.5, -18.0, 52.0)),
    ("sahel", RegionBounds::new(10.0, 20.0, -18.0, 40.0)),
    ("middle_east", RegionBounds::new(12.0, 42.0, 26.0, 63.0)),
    ("asia", RegionBounds::new(-10.0, 80.0, 40.0, 180.0)),
    ("south_asia", RegionBounds::new(5.0, 35.0, 60.0, 97.0)),
    ("india", RegionBounds::new(6.0, 36.0, 68.0, 98.0)),
    ("east_asia", RegionBounds::new(20.0, 50.0, 100.0, 145.0)),
    ("china", RegionBounds::new(18.0, 54.0, 73.0, 135.0)),
    ("southeast_asia", RegionBounds::new(-11.0, 28.0, 92.0, 141.0)),
    ("australia", RegionBounds::new(-44.0, -10.0, 112.0, 154.0)),
];

/// Normalizes a region name for lookup: lowercase, spaces/hyphens as underscores.
fn normalize_region_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Looks up the bounds for a named region.
///
/// Returns `None` for unrecognized names. Callers treat that as global bounds.
pub fn get_regional_bounds(region: &str) -> Option<RegionBounds> {
    let key = normalize_region_name(region);
    REGIONS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, bounds)| *bounds)
}

/// Names of all recognized regions, in table order.
pub fn known_regions() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().map(|(name, _)| *name)
}

/// Checks that every named region is recognized.
///
/// `None` entries mean global and are always valid. Returns one message per
/// unrecognized name.
pub fn validate_region_names(regions: &[Option<String>]) -> Vec<String> {
    let mut issues = Vec::new();

    for region in regions.iter().flatten() {
        match get_regional_bounds(region) {
            Some(bounds) => debug!(region = %region, %bounds, "region recognized"),
            None => {
                debug!(region = %region, "region not in table");
                issues.push(format!(
                    "Region '{}' not recognized - will use global bounds",
                    region
                ));
            }
        }
    }

    issues
}
