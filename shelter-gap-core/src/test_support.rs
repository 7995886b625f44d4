//! Test-only helpers shared by unit and behaviour tests across the workspace.

use crate::{Cluster, ClusterError, Clusterer, DemandPoint, ShelterRecord};

/// `Clusterer` that places every point in its own cluster.
///
/// Identifiers follow input order.
#[derive(Default, Debug, Copy, Clone)]
pub struct SingletonClusterer;

impl Clusterer for SingletonClusterer {
    fn cluster(&self, points: &[DemandPoint]) -> Result<Vec<Cluster>, ClusterError> {
        if points.is_empty() {
            return Err(ClusterError::EmptyInput);
        }
        points
            .iter()
            .enumerate()
            .map(|(id, point)| Cluster::new(id, vec![point.clone()]))
            .collect()
    }
}

/// `Clusterer` that places every point in one cluster with id 0.
#[derive(Default, Debug, Copy, Clone)]
pub struct SingleClusterer;

impl Clusterer for SingleClusterer {
    fn cluster(&self, points: &[DemandPoint]) -> Result<Vec<Cluster>, ClusterError> {
        if points.is_empty() {
            return Err(ClusterError::EmptyInput);
        }
        Ok(vec![Cluster::new(0, points.to_vec())?])
    }
}

/// Build a demand point, panicking on invalid input.
pub fn demand_point(name: &str, lat: f64, lon: f64, weight: f64) -> DemandPoint {
    DemandPoint::new(name, lat, lon, weight).expect("valid demand point")
}

/// Build a shelter, panicking on invalid input.
pub fn shelter(
    name: &str,
    lat: f64,
    lon: f64,
    capacity_beds: Option<f64>,
    occupied_beds: Option<f64>,
) -> ShelterRecord {
    ShelterRecord::new(name, "", lat, lon, capacity_beds, occupied_beds).expect("valid shelter")
}
