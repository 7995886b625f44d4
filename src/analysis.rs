//! The end-to-end analysis run.

use log::{info, warn};
use shelter_gap_cluster::{ClusterConfig, KMeansClusterer};
use shelter_gap_core::{ClusterError, Clusterer, DemandPoint, ShelterRecord, TierThresholds};
use shelter_gap_data::{
    GeocodeCache, NormalizeConfig, QualitySummary, RawTable, normalize_demand, normalize_shelters,
};
use shelter_gap_scorer::{GapScorer, rank};
use thiserror::Error;

use crate::AnalysisSnapshot;

/// Errors that abort an analysis run.
///
/// Data-quality problems never appear here; they are counted in the
/// snapshot's [`QualitySummary`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The clusterer rejected its configuration or input.
    #[error("clustering failed: {0}")]
    Cluster(#[from] ClusterError),
}

/// Settings for [`analyse_tables`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisConfig {
    /// Column handling and weight scaling for the input tables.
    pub normalize: NormalizeConfig,
    /// Parameters for the default k-means clusterer.
    pub cluster: ClusterConfig,
    /// Need-score bounds for each priority tier.
    pub priority_thresholds: TierThresholds,
}

/// Run the pipeline over canonical records.
///
/// An empty demand set is a legitimate degenerate run: the snapshot carries
/// the shelters and no recommendations. Zero shelters is not an error
/// either; every cluster is then scored as a coverage vacuum.
///
/// # Errors
/// [`AnalysisError::Cluster`] when `clusterer` fails on a non-empty demand
/// set, for example because its configuration is invalid.
pub fn analyse<C>(
    shelters: Vec<ShelterRecord>,
    demand_points: Vec<DemandPoint>,
    clusterer: &C,
    priority_thresholds: &TierThresholds,
) -> Result<AnalysisSnapshot, AnalysisError>
where
    C: Clusterer + ?Sized,
{
    if demand_points.is_empty() {
        warn!(
            "no demand points to analyse; returning {} shelters and no recommendations",
            shelters.len()
        );
        return Ok(AnalysisSnapshot::new(shelters, demand_points, Vec::new()));
    }

    let clusters = clusterer.cluster(&demand_points)?;
    let cluster_count = clusters.len();
    let scored = GapScorer::new(&shelters).score(clusters);
    let recommendations = rank(scored, priority_thresholds);

    info!(
        "analysed {} demand points against {} shelters: {cluster_count} clusters",
        demand_points.len(),
        shelters.len()
    );
    Ok(AnalysisSnapshot::new(
        shelters,
        demand_points,
        recommendations,
    ))
}

/// Normalise raw tables and run the pipeline with the k-means clusterer.
///
/// The returned snapshot carries the data-quality reports of both tables.
///
/// # Errors
/// [`AnalysisError::Cluster`] when the cluster configuration is invalid.
pub fn analyse_tables(
    shelters: &RawTable,
    demand: &RawTable,
    geocode_cache: Option<&GeocodeCache>,
    config: &AnalysisConfig,
) -> Result<AnalysisSnapshot, AnalysisError> {
    let shelters = normalize_shelters(shelters, geocode_cache, &config.normalize);
    let demand = normalize_demand(demand, &config.normalize);
    let quality = QualitySummary {
        shelters: shelters.report,
        demand: demand.report,
    };
    let clusterer = KMeansClusterer::new(config.cluster.clone());
    let snapshot = analyse(
        shelters.records,
        demand.records,
        &clusterer,
        &config.priority_thresholds,
    )?;
    Ok(snapshot.with_quality(quality))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use shelter_gap_core::Priority;
    use shelter_gap_core::test_support::{SingletonClusterer, demand_point, shelter};

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().copied(),
            rows.iter()
                .map(|row| row.iter().map(|cell| (*cell).to_owned()).collect())
                .collect(),
        )
    }

    #[rstest]
    fn empty_demand_is_an_empty_success() {
        let snapshot = analyse(
            vec![shelter("Hostel", 43.65, -79.38, Some(10.0), Some(5.0))],
            Vec::new(),
            &SingletonClusterer,
            &TierThresholds::default(),
        )
        .expect("empty demand succeeds");
        assert!(snapshot.recommendations().is_empty());
        assert_eq!(snapshot.shelters().len(), 1);
    }

    #[rstest]
    fn invalid_cluster_configuration_is_reported() {
        let clusterer = KMeansClusterer::new(ClusterConfig {
            target_clusters: 0,
            ..ClusterConfig::default()
        });
        let result = analyse(
            Vec::new(),
            vec![demand_point("A", 43.66, -79.40, 90.0)],
            &clusterer,
            &TierThresholds::default(),
        );
        assert!(matches!(
            result,
            Err(AnalysisError::Cluster(ClusterError::InvalidParameter {
                name: "target_clusters",
                ..
            }))
        ));
    }

    #[rstest]
    fn dyn_clusterers_are_accepted() {
        let clusterer: Box<dyn Clusterer> = Box::new(SingletonClusterer);
        let snapshot = analyse(
            Vec::new(),
            vec![demand_point("A", 43.66, -79.40, 90.0)],
            clusterer.as_ref(),
            &TierThresholds::default(),
        )
        .expect("analysis");
        assert_eq!(snapshot.recommendations().len(), 1);
    }

    #[rstest]
    fn tables_are_normalised_before_analysis() {
        let shelters = table(
            &["LOCATION_NAME", "LOCATION_ADDRESS", "lat", "lon", "CAPACITY_ACTUAL_BED", "OCCUPIED_BEDS"],
            &[
                &["Queen St Hostel", "100 Queen St W", "43.65", "-79.38", "100", "98"],
                &["Ghost", "", "", "", "10", "1"],
            ],
        );
        let demand = table(
            &["name", "lat", "lon", "weight"],
            &[&["A", "43.66", "-79.40", "90"]],
        );
        let snapshot = analyse_tables(&shelters, &demand, None, &AnalysisConfig::default())
            .expect("analysis");
        assert_eq!(snapshot.shelters().len(), 1);
        assert_eq!(snapshot.quality().shelters.dropped_invalid_coordinate, 1);
        assert_eq!(snapshot.quality().demand.records_emitted, 1);
        let top = snapshot.recommendations().first().expect("one recommendation");
        assert_eq!(top.priority, Priority::High);
    }
}
