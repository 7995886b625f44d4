//! [`KMeansClusterer`]: seeded weighted k-means with radius splitting.

use std::collections::HashSet;

use geo::Coord;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shelter_gap_core::{
    Cluster, ClusterError, Clusterer, DemandPoint, LocalProjection, haversine_km, weighted_centroid,
};

use crate::ClusterConfig;
use crate::lloyd::{Planar, refine, seed_centres};

/// Weighted k-means over a local planar projection.
///
/// Points are projected to kilometres around the dataset's bounding-box
/// centre, seeded with k-means++ from a [`ChaCha8Rng`] and refined with
/// Lloyd iterations using each point's weight as its mass. When a maximum
/// radius is configured, the member farthest beyond it becomes an extra seed
/// and refinement resumes, so an isolated point ends up alone.
///
/// Identifiers are assigned in order of each cluster's first member in the
/// input.
///
/// # Examples
/// ```
/// use shelter_gap_cluster::{ClusterConfig, KMeansClusterer};
/// use shelter_gap_core::{Clusterer, DemandPoint};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let points = vec![
///     DemandPoint::new("A", 43.650, -79.380, 80.0)?,
///     DemandPoint::new("B", 43.651, -79.381, 60.0)?,
///     DemandPoint::new("Far", 43.900, -79.700, 20.0)?,
/// ];
/// let clusterer = KMeansClusterer::new(ClusterConfig {
///     target_clusters: 1,
///     ..ClusterConfig::default()
/// });
/// let clusters = clusterer.cluster(&points)?;
/// assert_eq!(clusters.len(), 2);
/// assert_eq!(clusters[1].members()[0].name(), "Far");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct KMeansClusterer {
    config: ClusterConfig,
}

impl KMeansClusterer {
    /// Construct a clusterer with explicit configuration.
    #[must_use]
    pub const fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClusterConfig {
        &self.config
    }
}

impl Clusterer for KMeansClusterer {
    fn cluster(&self, points: &[DemandPoint]) -> Result<Vec<Cluster>, ClusterError> {
        if points.is_empty() {
            return Err(ClusterError::EmptyInput);
        }
        self.config.validate()?;

        let positions: Vec<Coord<f64>> = points.iter().map(DemandPoint::location).collect();
        let projection = LocalProjection::fitting(&positions).ok_or(ClusterError::EmptyInput)?;
        let planar: Vec<Planar> = positions.iter().map(|c| projection.project(*c)).collect();
        let weights: Vec<f64> = points.iter().map(DemandPoint::weight).collect();
        let distinct = distinct_positions(&positions);

        let k = self.config.target_clusters.min(distinct);
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let mut centres = seed_centres(&planar, &weights, k, &mut rng);
        let mut assignment = refine(&planar, &weights, &mut centres, self.config.max_iterations);

        let mut splits = 0_usize;
        if let Some(max_radius_km) = self.config.max_radius_km {
            while centres.len() < distinct && splits < points.len() {
                let Some(outlier) = farthest_outlier(points, &assignment, centres.len(), max_radius_km)
                else {
                    break;
                };
                let Some(seed) = planar.get(outlier).copied() else {
                    break;
                };
                centres.push(seed);
                assignment = refine(&planar, &weights, &mut centres, self.config.max_iterations);
                splits += 1;
            }
        }

        let clusters = build_clusters(points, &assignment, centres.len())?;
        log::info!(
            "clustered {} demand points into {} clusters ({} radius splits)",
            points.len(),
            clusters.len(),
            splits
        );
        Ok(clusters)
    }
}

fn distinct_positions(positions: &[Coord<f64>]) -> usize {
    positions
        .iter()
        .map(|c| (c.x.to_bits(), c.y.to_bits()))
        .collect::<HashSet<_>>()
        .len()
}

/// Member lying farthest beyond `max_radius_km` from its cluster centroid.
///
/// Ties go to the earliest point in input order.
fn farthest_outlier(
    points: &[DemandPoint],
    assignment: &[usize],
    cluster_count: usize,
    max_radius_km: f64,
) -> Option<usize> {
    let mut members: Vec<Vec<(Coord<f64>, f64)>> = vec![Vec::new(); cluster_count];
    for (point, slot) in points.iter().zip(assignment) {
        if let Some(group) = members.get_mut(*slot) {
            group.push((point.location(), point.weight()));
        }
    }
    let centroids: Vec<Option<Coord<f64>>> = members
        .into_iter()
        .map(|group| weighted_centroid(group).ok())
        .collect();

    points
        .iter()
        .zip(assignment)
        .enumerate()
        .filter_map(|(index, (point, slot))| {
            let centroid = centroids.get(*slot).copied().flatten()?;
            let distance = haversine_km(point.location(), centroid);
            (distance > max_radius_km).then_some((index, distance))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(index, _)| index)
}

/// Group points by assignment, numbering groups by first appearance.
fn build_clusters(
    points: &[DemandPoint],
    assignment: &[usize],
    cluster_count: usize,
) -> Result<Vec<Cluster>, ClusterError> {
    let mut group_of_slot: Vec<Option<usize>> = vec![None; cluster_count];
    let mut groups: Vec<Vec<DemandPoint>> = Vec::new();
    for (point, slot) in points.iter().zip(assignment) {
        let existing = group_of_slot.get(*slot).copied().flatten();
        let group = existing.unwrap_or_else(|| {
            groups.push(Vec::new());
            let created = groups.len() - 1;
            if let Some(entry) = group_of_slot.get_mut(*slot) {
                *entry = Some(created);
            }
            created
        });
        if let Some(members) = groups.get_mut(group) {
            members.push(point.clone());
        }
    }
    groups
        .into_iter()
        .enumerate()
        .map(|(id, members)| Cluster::new(id, members))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use shelter_gap_core::test_support::demand_point;

    #[fixture]
    fn downtown() -> Vec<DemandPoint> {
        vec![
            demand_point("Queen West", 43.6480, -79.3960, 80.0),
            demand_point("Moss Park", 43.6545, -79.3670, 60.0),
            demand_point("Alexandra Park", 43.6505, -79.4000, 40.0),
            demand_point("Allan Gardens", 43.6620, -79.3740, 90.0),
            demand_point("Scarborough", 43.7730, -79.2580, 30.0),
        ]
    }

    #[rstest]
    fn empty_input_is_an_error() {
        let clusterer = KMeansClusterer::default();
        assert_eq!(clusterer.cluster(&[]), Err(ClusterError::EmptyInput));
    }

    #[rstest]
    fn invalid_config_is_reported() {
        let clusterer = KMeansClusterer::new(ClusterConfig {
            target_clusters: 0,
            ..ClusterConfig::default()
        });
        let points = vec![demand_point("A", 43.6, -79.4, 10.0)];
        assert!(matches!(
            clusterer.cluster(&points),
            Err(ClusterError::InvalidParameter { .. })
        ));
    }

    #[rstest]
    fn single_point_forms_singleton(#[values(1, 5)] target_clusters: usize) {
        let clusterer = KMeansClusterer::new(ClusterConfig {
            target_clusters,
            ..ClusterConfig::default()
        });
        let points = vec![demand_point("A", 43.66, -79.40, 90.0)];
        let clusters = clusterer.cluster(&points).expect("clusters");
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters.first().map(Cluster::len), Some(1));
    }

    #[rstest]
    fn every_point_lands_in_exactly_one_cluster(downtown: Vec<DemandPoint>) {
        let clusters = KMeansClusterer::default()
            .cluster(&downtown)
            .expect("clusters");
        let mut names: Vec<&str> = clusters
            .iter()
            .flat_map(|c| c.members().iter().map(DemandPoint::name))
            .collect();
        names.sort_unstable();
        let mut expected: Vec<&str> = downtown.iter().map(DemandPoint::name).collect();
        expected.sort_unstable();
        assert_eq!(names, expected);
    }

    #[rstest]
    fn isolated_point_is_split_off(downtown: Vec<DemandPoint>) {
        let clusterer = KMeansClusterer::new(ClusterConfig {
            target_clusters: 1,
            ..ClusterConfig::default()
        });
        let clusters = clusterer.cluster(&downtown).expect("clusters");
        let scarborough = clusters
            .iter()
            .find(|c| c.members().iter().any(|m| m.name() == "Scarborough"))
            .expect("cluster containing the outlier");
        assert_eq!(scarborough.len(), 1);
    }

    #[rstest]
    fn radius_is_respected(downtown: Vec<DemandPoint>) {
        let clusterer = KMeansClusterer::new(ClusterConfig {
            target_clusters: 1,
            max_radius_km: Some(1.5),
            ..ClusterConfig::default()
        });
        for cluster in clusterer.cluster(&downtown).expect("clusters") {
            for member in cluster.members() {
                assert!(haversine_km(member.location(), cluster.centroid()) <= 1.5);
            }
        }
    }

    #[rstest]
    fn ids_follow_first_member_order(downtown: Vec<DemandPoint>) {
        let clusters = KMeansClusterer::default()
            .cluster(&downtown)
            .expect("clusters");
        let first_indices: Vec<usize> = clusters
            .iter()
            .map(|c| {
                let first = c.members().first().expect("non-empty");
                downtown
                    .iter()
                    .position(|p| p.name() == first.name())
                    .expect("member from input")
            })
            .collect();
        let ids: Vec<usize> = clusters.iter().map(Cluster::id).collect();
        assert!(first_indices.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids, (0..clusters.len()).collect::<Vec<_>>());
    }

    #[rstest]
    fn identical_positions_share_a_cluster() {
        let points = vec![
            demand_point("A", 43.66, -79.40, 10.0),
            demand_point("B", 43.66, -79.40, 20.0),
        ];
        let clusters = KMeansClusterer::default().cluster(&points).expect("clusters");
        assert_eq!(clusters.len(), 1);
    }
}
