//! The immutable result of one analysis run and its served collections.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shelter_gap_core::{
    ClusterView, DemandPoint, DemandView, Recommendation, ShelterRecord, ShelterView,
};
use shelter_gap_data::QualitySummary;

/// Everything one run produced.
///
/// Snapshots are never mutated after construction; serve them read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSnapshot {
    shelters: Vec<ShelterRecord>,
    demand_points: Vec<DemandPoint>,
    assignments: Vec<Option<usize>>,
    recommendations: Vec<Recommendation>,
    quality: QualitySummary,
}

/// The three collections exposed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServedCollections {
    /// The `/shelters` collection.
    pub shelters: Vec<ShelterView>,
    /// The `/homeless` collection.
    pub homeless: Vec<DemandView>,
    /// The `/clusters` collection, in rank order.
    pub clusters: Vec<ClusterView>,
}

impl AnalysisSnapshot {
    pub(crate) fn new(
        shelters: Vec<ShelterRecord>,
        demand_points: Vec<DemandPoint>,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        let assignments = assign(&demand_points, &recommendations);
        Self {
            shelters,
            demand_points,
            assignments,
            recommendations,
            quality: QualitySummary::default(),
        }
    }

    pub(crate) fn with_quality(mut self, quality: QualitySummary) -> Self {
        self.quality = quality;
        self
    }

    /// Canonical shelters in first-observation order.
    #[must_use]
    pub fn shelters(&self) -> &[ShelterRecord] {
        &self.shelters
    }

    /// Canonical demand points in first-observation order.
    #[must_use]
    pub fn demand_points(&self) -> &[DemandPoint] {
        &self.demand_points
    }

    /// Cluster of each demand point, aligned with [`Self::demand_points`].
    #[must_use]
    pub fn cluster_assignments(&self) -> &[Option<usize>] {
        &self.assignments
    }

    /// Ranked recommendations, most urgent first.
    #[must_use]
    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    /// Data-quality reports for the input tables.
    #[must_use]
    pub fn quality(&self) -> &QualitySummary {
        &self.quality
    }

    /// Items of the `/shelters` collection.
    #[must_use]
    pub fn shelters_view(&self) -> Vec<ShelterView> {
        self.shelters.iter().map(ShelterView::from).collect()
    }

    /// Items of the `/homeless` collection.
    #[must_use]
    pub fn homeless_view(&self) -> Vec<DemandView> {
        self.demand_points
            .iter()
            .zip(&self.assignments)
            .map(|(point, cluster_id)| DemandView::new(point, *cluster_id))
            .collect()
    }

    /// Items of the `/clusters` collection, in rank order.
    #[must_use]
    pub fn clusters_view(&self) -> Vec<ClusterView> {
        self.recommendations.iter().map(ClusterView::from).collect()
    }

    /// All three served collections.
    #[must_use]
    pub fn collections(&self) -> ServedCollections {
        ServedCollections {
            shelters: self.shelters_view(),
            homeless: self.homeless_view(),
            clusters: self.clusters_view(),
        }
    }
}

/// Map each demand point to the cluster holding an equal member.
///
/// Points are matched by name first, then by value, so duplicate names from
/// hand-built inputs still resolve one-to-one.
fn assign(points: &[DemandPoint], recommendations: &[Recommendation]) -> Vec<Option<usize>> {
    let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, point) in points.iter().enumerate() {
        by_name.entry(point.name()).or_default().push(index);
    }
    let mut assignments = vec![None; points.len()];
    for recommendation in recommendations {
        let cluster = &recommendation.scored.cluster;
        for member in cluster.members() {
            let Some(candidates) = by_name.get(member.name()) else {
                continue;
            };
            let slot = candidates.iter().copied().find(|&index| {
                matches!(assignments.get(index), Some(None))
                    && points.get(index).is_some_and(|p| p == member)
            });
            if let Some(slot) = slot.and_then(|index| assignments.get_mut(index)) {
                *slot = Some(cluster.id());
            }
        }
    }
    assignments
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use shelter_gap_core::test_support::{SingletonClusterer, demand_point, shelter};
    use shelter_gap_core::{Clusterer, TierThresholds};
    use shelter_gap_scorer::{GapScorer, rank};

    fn snapshot(demand: Vec<DemandPoint>, shelters: Vec<ShelterRecord>) -> AnalysisSnapshot {
        let clusters = SingletonClusterer.cluster(&demand).expect("clusters");
        let ranked = rank(
            GapScorer::new(&shelters).score(clusters),
            &TierThresholds::default(),
        );
        AnalysisSnapshot::new(shelters, demand, ranked)
    }

    #[rstest]
    fn every_point_is_tagged_with_its_cluster() {
        let snapshot = snapshot(
            vec![
                demand_point("A", 43.66, -79.40, 90.0),
                demand_point("B", 43.70, -79.30, 40.0),
            ],
            vec![shelter("Hostel", 43.65, -79.38, Some(100.0), Some(98.0))],
        );
        assert_eq!(snapshot.cluster_assignments(), &[Some(0), Some(1)]);
        let ids: Vec<Option<usize>> = snapshot
            .homeless_view()
            .iter()
            .map(|view| view.cluster_id)
            .collect();
        assert_eq!(ids, vec![Some(0), Some(1)]);
    }

    #[rstest]
    fn duplicate_names_resolve_one_to_one() {
        let snapshot = snapshot(
            vec![
                demand_point("Camp", 43.66, -79.40, 90.0),
                demand_point("Camp", 43.70, -79.30, 40.0),
            ],
            Vec::new(),
        );
        assert_eq!(snapshot.cluster_assignments(), &[Some(0), Some(1)]);
    }

    #[rstest]
    fn collections_serialise_with_contract_field_names() {
        let snapshot = snapshot(
            vec![demand_point("A", 43.66, -79.40, 90.0)],
            vec![shelter("Hostel", 43.65, -79.38, Some(100.0), Some(98.0))],
        );
        let value = serde_json::to_value(snapshot.collections()).expect("serialise");
        assert_eq!(value["shelters"][0]["occ_rate"], json!(98.0));
        assert_eq!(value["homeless"][0]["point_name"], json!("A"));
        assert_eq!(value["homeless"][0]["weight"], json!(90.0));
        let cluster = &value["clusters"][0];
        assert_eq!(cluster["cluster_id"], json!(0));
        assert_eq!(cluster["need_score"], json!(100.0));
        assert_eq!(cluster["priority"], json!("HIGH"));
        assert_eq!(cluster["avg_severity_index"], json!(90.0));
        assert!(cluster["boundary"].as_array().is_some_and(|ring| ring.len() > 3));
    }

    #[rstest]
    fn vacuum_clusters_omit_average_distance() {
        let snapshot = snapshot(vec![demand_point("A", 43.66, -79.40, 90.0)], Vec::new());
        let value = serde_json::to_value(snapshot.clusters_view()).expect("serialise");
        assert!(value[0].get("avg_shelter_distance_km").is_none());
        assert_eq!(value[0]["distance_to_nearest_shelter_km"], json!(0.0));
        assert_eq!(value[0]["coverage_vacuum"], json!(true));
    }
}
