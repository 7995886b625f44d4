//! Scored clusters and ranked siting recommendations.

use geo::Coord;

use crate::{Cluster, Priority};

/// A cluster annotated with its shelter-gap measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCluster {
    /// The underlying pressure area.
    pub cluster: Cluster,
    /// Mean over members of the distance to each member's nearest shelter.
    ///
    /// `None` when no shelters exist.
    pub avg_shelter_distance_km: Option<f64>,
    /// Proposed site: the severity-weighted centroid of the members.
    pub recommended_position: Coord<f64>,
    /// Distance from the proposed site to its nearest shelter, or `0.0` in a
    /// coverage vacuum.
    pub distance_to_nearest_shelter_km: f64,
    /// `avg_severity_index * distance_to_nearest_shelter_km`.
    pub raw_need: f64,
    /// `raw_need` scaled against the largest value in the run, in `0..=100`.
    pub need_score: f64,
    /// `true` when no shelter exists at all.
    pub coverage_vacuum: bool,
}

impl ScoredCluster {
    /// Cluster identifier.
    pub fn cluster_id(&self) -> usize {
        self.cluster.id()
    }

    /// Sum of member weights.
    pub fn population_weighted(&self) -> f64 {
        self.cluster.population_weighted()
    }

    /// Mean of member weights.
    pub fn avg_severity_index(&self) -> f64 {
        self.cluster.avg_severity_index()
    }
}

/// A scored cluster with its siting priority.
///
/// Recommendations are produced in rank order; the first one is the most
/// urgent.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Measurements for the cluster.
    pub scored: ScoredCluster,
    /// Priority tier derived from the need score.
    pub priority: Priority,
}

impl Recommendation {
    /// Cluster identifier.
    pub fn cluster_id(&self) -> usize {
        self.scored.cluster_id()
    }

    /// Normalised need score.
    pub fn need_score(&self) -> f64 {
        self.scored.need_score
    }

    /// Sum of member weights.
    pub fn population_weighted(&self) -> f64 {
        self.scored.population_weighted()
    }

    /// Latitude of the proposed site.
    pub fn recommended_lat(&self) -> f64 {
        self.scored.recommended_position.y
    }

    /// Longitude of the proposed site.
    pub fn recommended_lon(&self) -> f64 {
        self.scored.recommended_position.x
    }
}
