//! Serialisable shapes of the three served collections.
//!
//! Field names are part of the presentation contract. Absent numbers are
//! omitted rather than written as `null` or `NaN`.

use serde::{Deserialize, Serialize};

use crate::{DemandPoint, Priority, Recommendation, SeverityLevel, ShelterRecord};

/// One item of the `/shelters` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelterView {
    /// Shelter name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Averaged funded capacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_capacity_beds: Option<f64>,
    /// Averaged occupied beds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_occupied_beds: Option<f64>,
    /// Occupancy percentage; may exceed 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occ_rate: Option<f64>,
}

impl From<&ShelterRecord> for ShelterView {
    fn from(shelter: &ShelterRecord) -> Self {
        Self {
            name: shelter.name().to_owned(),
            address: shelter.address().to_owned(),
            lat: shelter.lat(),
            lon: shelter.lon(),
            avg_capacity_beds: shelter.capacity_beds(),
            avg_occupied_beds: shelter.occupied_beds(),
            occ_rate: shelter.occupancy_rate(),
        }
    }
}

/// One item of the `/homeless` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandView {
    /// Point name.
    pub point_name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Severity weight in `0..=100`.
    pub weight: f64,
    /// Severity level derived from `weight`.
    pub severity: SeverityLevel,
    /// Cluster the point was assigned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<usize>,
}

impl DemandView {
    /// View of `point`, tagged with its cluster when known.
    pub fn new(point: &DemandPoint, cluster_id: Option<usize>) -> Self {
        Self {
            point_name: point.name().to_owned(),
            lat: point.lat(),
            lon: point.lon(),
            weight: point.weight(),
            severity: point.severity(),
            cluster_id,
        }
    }
}

/// One item of the `/clusters` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterView {
    /// Cluster identifier.
    pub cluster_id: usize,
    /// Closed boundary ring as `[lat, lon]` pairs.
    pub boundary: Vec<[f64; 2]>,
    /// Sum of member weights.
    pub population_weighted: f64,
    /// Mean of member weights.
    pub avg_severity_index: f64,
    /// Mean member distance to the nearest shelter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_shelter_distance_km: Option<f64>,
    /// Latitude of the proposed site.
    pub recommended_lat: f64,
    /// Longitude of the proposed site.
    pub recommended_lon: f64,
    /// Distance from the proposed site to the nearest shelter.
    pub distance_to_nearest_shelter_km: f64,
    /// Run-relative need score in `0..=100`.
    pub need_score: f64,
    /// Siting priority.
    pub priority: Priority,
    /// Latitude of the weighted centroid.
    pub centroid_lat: f64,
    /// Longitude of the weighted centroid.
    pub centroid_lon: f64,
    /// Number of member points.
    pub member_count: usize,
    /// Whether no shelter exists at all.
    pub coverage_vacuum: bool,
}

impl From<&Recommendation> for ClusterView {
    fn from(rec: &Recommendation) -> Self {
        let scored = &rec.scored;
        let centroid = scored.cluster.centroid();
        Self {
            cluster_id: scored.cluster_id(),
            boundary: scored.cluster.boundary_lat_lon(),
            population_weighted: scored.population_weighted(),
            avg_severity_index: scored.avg_severity_index(),
            avg_shelter_distance_km: scored.avg_shelter_distance_km,
            recommended_lat: rec.recommended_lat(),
            recommended_lon: rec.recommended_lon(),
            distance_to_nearest_shelter_km: scored.distance_to_nearest_shelter_km,
            need_score: scored.need_score,
            priority: rec.priority,
            centroid_lat: centroid.y,
            centroid_lon: centroid.x,
            member_count: scored.cluster.len(),
            coverage_vacuum: scored.coverage_vacuum,
        }
    }
}
