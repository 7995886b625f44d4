//! Distance-to-capacity measurements and need normalisation.

use geo::Coord;
use log::{debug, warn};
use shelter_gap_core::{Cluster, ScoredCluster, ShelterIndex, ShelterRecord};

/// Scores clusters against one shelter snapshot.
///
/// The nearest-shelter index is built once and shared read-only by every
/// cluster scored through this value.
#[derive(Debug, Clone)]
pub struct GapScorer {
    index: ShelterIndex,
}

/// Per-cluster measurements before run-wide normalisation.
struct Measurement {
    avg_shelter_distance_km: Option<f64>,
    recommended_position: Coord<f64>,
    distance_to_nearest_shelter_km: f64,
    raw_need: f64,
}

impl GapScorer {
    /// Index `shelters` for scoring.
    #[must_use]
    pub fn new(shelters: &[ShelterRecord]) -> Self {
        Self {
            index: ShelterIndex::new(shelters),
        }
    }

    /// Number of shelters in the snapshot.
    #[must_use]
    pub fn shelter_count(&self) -> usize {
        self.index.len()
    }

    /// Score every cluster, preserving input order.
    ///
    /// With no shelters every cluster is a coverage vacuum: its nearest
    /// shelter distance is `0.0`, so every need score is `0.0`.
    #[must_use]
    pub fn score(&self, clusters: Vec<Cluster>) -> Vec<ScoredCluster> {
        let coverage_vacuum = self.index.is_empty();
        if coverage_vacuum && !clusters.is_empty() {
            warn!(
                "no shelters available; {} clusters scored as coverage vacuums",
                clusters.len()
            );
        }
        let measured: Vec<(Cluster, Measurement)> = clusters
            .into_iter()
            .map(|cluster| {
                let measurement = self.measure(&cluster);
                (cluster, measurement)
            })
            .collect();
        let needs = normalise_needs(measured.iter().map(|(_, m)| m.raw_need));
        measured
            .into_iter()
            .zip(needs)
            .map(|((cluster, m), need_score)| {
                debug!(
                    "cluster {} need {need_score:.1} (raw {:.3}, nearest shelter {:.3} km)",
                    cluster.id(),
                    m.raw_need,
                    m.distance_to_nearest_shelter_km
                );
                ScoredCluster {
                    cluster,
                    avg_shelter_distance_km: m.avg_shelter_distance_km,
                    recommended_position: m.recommended_position,
                    distance_to_nearest_shelter_km: m.distance_to_nearest_shelter_km,
                    raw_need: m.raw_need,
                    need_score,
                    coverage_vacuum,
                }
            })
            .collect()
    }

    #[expect(clippy::float_arithmetic, reason = "averaging distances and weighting need")]
    #[expect(
        clippy::cast_precision_loss,
        reason = "member counts are far below 2^52"
    )]
    fn measure(&self, cluster: &Cluster) -> Measurement {
        let avg_shelter_distance_km = if self.index.is_empty() || cluster.is_empty() {
            None
        } else {
            let total: f64 = cluster
                .members()
                .iter()
                .filter_map(|m| self.index.nearest(m.location()))
                .map(|n| n.distance_km)
                .sum();
            Some(total / cluster.len() as f64)
        };
        let recommended_position = cluster.centroid();
        let distance_to_nearest_shelter_km = self
            .index
            .nearest(recommended_position)
            .map_or(0.0, |n| n.distance_km);
        Measurement {
            avg_shelter_distance_km,
            recommended_position,
            distance_to_nearest_shelter_km,
            raw_need: cluster.avg_severity_index() * distance_to_nearest_shelter_km,
        }
    }
}

/// Score `clusters` against `shelters` in one call.
///
/// Convenience wrapper around [`GapScorer`] for callers that score a single
/// batch.
#[must_use]
pub fn score_clusters(clusters: Vec<Cluster>, shelters: &[ShelterRecord]) -> Vec<ScoredCluster> {
    GapScorer::new(shelters).score(clusters)
}

/// Scale raw needs onto `0..=100` against their maximum.
///
/// When no raw need is positive every score is `0.0`.
#[expect(clippy::float_arithmetic, reason = "min-max scaling of need")]
pub(crate) fn normalise_needs<I>(raw: I) -> Vec<f64>
where
    I: Iterator<Item = f64> + Clone,
{
    let max = raw
        .clone()
        .filter(|value| value.is_finite())
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return raw.map(|_| 0.0).collect();
    }
    raw.map(|value| {
        if value.is_finite() {
            (value / max * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use shelter_gap_core::test_support::{demand_point, shelter};

    #[fixture]
    fn downtown_shelter() -> Vec<ShelterRecord> {
        vec![shelter("Queen St Hostel", 43.65, -79.38, Some(100.0), Some(98.0))]
    }

    fn singleton(id: usize, lat: f64, lon: f64, weight: f64) -> Cluster {
        Cluster::new(id, vec![demand_point(&format!("p{id}"), lat, lon, weight)])
            .expect("cluster")
    }

    #[rstest]
    fn normalises_against_the_largest_need() {
        let raw = [10.0, 5.0, 0.0];
        let scores = normalise_needs(raw.iter().copied());
        assert_eq!(scores, vec![100.0, 50.0, 0.0]);
    }

    #[rstest]
    fn zero_maximum_yields_zero_scores() {
        let scores = normalise_needs([0.0, 0.0].iter().copied());
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[rstest]
    fn non_finite_needs_do_not_leak() {
        let scores = normalise_needs([f64::NAN, 4.0].iter().copied());
        assert_eq!(scores, vec![0.0, 100.0]);
    }

    #[rstest]
    fn single_cluster_has_full_need(downtown_shelter: Vec<ShelterRecord>) {
        let scored = score_clusters(vec![singleton(0, 43.66, -79.40, 90.0)], &downtown_shelter);
        let [only] = scored.as_slice() else {
            panic!("expected one scored cluster");
        };
        assert_eq!(only.need_score, 100.0);
        assert!(!only.coverage_vacuum);
        let avg = only.avg_shelter_distance_km.expect("shelters exist");
        assert!((avg - only.distance_to_nearest_shelter_km).abs() < 1.0e-12);
        assert!((only.distance_to_nearest_shelter_km - 1.956).abs() < 0.01);
        assert!((only.raw_need - 90.0 * only.distance_to_nearest_shelter_km).abs() < 1.0e-9);
    }

    #[rstest]
    fn recommended_site_is_the_weighted_centroid(downtown_shelter: Vec<ShelterRecord>) {
        let cluster = Cluster::new(
            0,
            vec![
                demand_point("A", 43.70, -79.40, 90.0),
                demand_point("B", 43.80, -79.40, 10.0),
            ],
        )
        .expect("cluster");
        let centroid = cluster.centroid();
        let scored = GapScorer::new(&downtown_shelter).score(vec![cluster]);
        assert_eq!(scored[0].recommended_position, centroid);
        assert!((scored[0].recommended_position.y - 43.71).abs() < 1.0e-9);
    }

    #[rstest]
    fn average_distance_uses_each_members_nearest_shelter() {
        let shelters = vec![
            shelter("North", 43.70, -79.40, None, None),
            shelter("South", 43.60, -79.40, None, None),
        ];
        let cluster = Cluster::new(
            0,
            vec![
                demand_point("A", 43.70, -79.40, 50.0),
                demand_point("B", 43.60, -79.40, 50.0),
            ],
        )
        .expect("cluster");
        let scored = GapScorer::new(&shelters).score(vec![cluster]);
        assert_eq!(scored[0].avg_shelter_distance_km, Some(0.0));
        // The midpoint is equidistant from both shelters.
        assert!((scored[0].distance_to_nearest_shelter_km - 5.56).abs() < 0.01);
    }

    #[rstest]
    fn no_shelters_is_a_coverage_vacuum() {
        let scorer = GapScorer::new(&[]);
        assert_eq!(scorer.shelter_count(), 0);
        let scored = scorer.score(vec![
            singleton(0, 43.66, -79.40, 90.0),
            singleton(1, 43.70, -79.30, 40.0),
        ]);
        for cluster in &scored {
            assert!(cluster.coverage_vacuum);
            assert_eq!(cluster.distance_to_nearest_shelter_km, 0.0);
            assert_eq!(cluster.avg_shelter_distance_km, None);
            assert_eq!(cluster.need_score, 0.0);
        }
    }

    #[rstest]
    fn scoring_preserves_cluster_order(downtown_shelter: Vec<ShelterRecord>) {
        let scored = score_clusters(
            vec![
                singleton(4, 43.66, -79.40, 10.0),
                singleton(2, 43.80, -79.20, 90.0),
            ],
            &downtown_shelter,
        );
        let ids: Vec<usize> = scored.iter().map(ScoredCluster::cluster_id).collect();
        assert_eq!(ids, vec![4, 2]);
        assert_eq!(scored[1].need_score, 100.0);
    }
}
