//! Property-based tests for the end-to-end pipeline.
//!
//! # Invariants tested
//!
//! - **Partition:** every demand point is assigned to exactly one served
//!   cluster, and member counts add up to the demand set.
//! - **Ordering:** the `/clusters` collection is in rank order.
//! - **Determinism:** identical inputs and seed yield identical snapshots.
//! - **No NaN:** every served number is finite.

use std::collections::HashSet;

use proptest::prelude::*;
use shelter_gap::{
    AnalysisSnapshot, ClusterConfig, DemandPoint, KMeansClusterer, ShelterRecord, TierThresholds,
    analyse,
};

fn demand_strategy() -> impl Strategy<Value = Vec<DemandPoint>> {
    prop::collection::vec(
        (43.55_f64..43.85, -79.60_f64..-79.20, 0.0_f64..=100.0),
        1..30,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (lat, lon, weight))| {
                DemandPoint::new(format!("p{i}"), lat, lon, weight).expect("generated in range")
            })
            .collect()
    })
}

fn shelter_strategy() -> impl Strategy<Value = Vec<ShelterRecord>> {
    prop::collection::vec(
        (43.55_f64..43.85, -79.60_f64..-79.20, prop::option::of(0.0_f64..200.0)),
        0..5,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (lat, lon, capacity))| {
                ShelterRecord::new(format!("s{i}"), "", lat, lon, capacity, capacity.map(|c| c / 2.0))
                    .expect("generated in range")
            })
            .collect()
    })
}

fn run(
    shelters: &[ShelterRecord],
    demand: &[DemandPoint],
    seed: u64,
) -> AnalysisSnapshot {
    let clusterer = KMeansClusterer::new(ClusterConfig {
        seed,
        ..ClusterConfig::default()
    });
    analyse(
        shelters.to_vec(),
        demand.to_vec(),
        &clusterer,
        &TierThresholds::default(),
    )
    .expect("valid configuration")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: served clusters partition the demand set.
    #[test]
    fn served_clusters_partition_demand(
        demand in demand_strategy(),
        shelters in shelter_strategy(),
        seed in any::<u64>(),
    ) {
        let snapshot = run(&shelters, &demand, seed);
        let clusters = snapshot.clusters_view();
        let served: HashSet<usize> = clusters.iter().map(|c| c.cluster_id).collect();
        prop_assert_eq!(served.len(), clusters.len());
        let members: usize = clusters.iter().map(|c| c.member_count).sum();
        prop_assert_eq!(members, demand.len());
        for view in snapshot.homeless_view() {
            let id = view.cluster_id.expect("every point is assigned");
            prop_assert!(served.contains(&id));
        }
    }

    /// Property: `/clusters` is in rank order and free of NaN.
    #[test]
    fn served_clusters_are_ranked_and_finite(
        demand in demand_strategy(),
        shelters in shelter_strategy(),
    ) {
        let clusters = run(&shelters, &demand, 42).clusters_view();
        for cluster in &clusters {
            prop_assert!(cluster.need_score.is_finite());
            prop_assert!(cluster.distance_to_nearest_shelter_km.is_finite());
            prop_assert!(cluster.avg_shelter_distance_km.is_none_or(f64::is_finite));
        }
        for pair in clusters.windows(2) {
            prop_assert!(pair[0].need_score >= pair[1].need_score);
            if pair[0].need_score == pair[1].need_score {
                prop_assert!(pair[0].population_weighted >= pair[1].population_weighted);
            }
        }
    }

    /// Property: identical input and seed give identical snapshots.
    #[test]
    fn runs_are_deterministic(
        demand in demand_strategy(),
        shelters in shelter_strategy(),
        seed in any::<u64>(),
    ) {
        prop_assert_eq!(run(&shelters, &demand, seed), run(&shelters, &demand, seed));
    }
}
