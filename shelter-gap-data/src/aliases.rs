//! Source column names recognised for each canonical field.
//!
//! Municipal exports and hand-built datasets name the same field
//! differently; each list is tried in order.

pub(crate) const SHELTER_NAME: &[&str] = &["LOCATION_NAME", "SHELTER_NAME", "name"];
pub(crate) const SHELTER_ADDRESS: &[&str] = &["LOCATION_ADDRESS", "SHELTER_ADDRESS", "address"];
pub(crate) const CAPACITY: &[&str] = &[
    "CAPACITY_FUNDING_BED",
    "CAPACITY_ACTUAL_BED",
    "capacity_beds",
    "avg_capacity_beds",
    "capacity",
];
pub(crate) const OCCUPIED: &[&str] = &[
    "OCCUPIED_BEDS",
    "occupied_beds",
    "avg_occupied_beds",
    "occupied",
];

pub(crate) const DEMAND_NAME: &[&str] = &["name", "point_name", "site_name", "encampment_name"];
pub(crate) const WEIGHT: &[&str] = &["weight", "severity", "severity_index"];

pub(crate) const LAT: &[&str] = &["lat", "latitude"];
pub(crate) const LON: &[&str] = &["lon", "lng", "long", "longitude"];
pub(crate) const OBSERVED_AT: &[&str] = &["OCCUPANCY_DATE", "observed_at", "date"];

pub(crate) const GEOCODE_ADDRESS: &[&str] = &["LOCATION_ADDRESS", "address", "query"];
