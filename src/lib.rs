//! Facade crate for the shelter-gap analysis engine.
//!
//! This crate re-exports the domain types of the workspace and runs the
//! end-to-end pipeline: canonical shelters and demand points go in, an
//! immutable [`AnalysisSnapshot`] with ranked siting recommendations comes
//! out. The snapshot renders the three served collections (`/shelters`,
//! `/homeless` and `/clusters`).
//!
//! # Examples
//!
//! ```
//! use shelter_gap::{
//!     AnalysisSnapshot, DemandPoint, KMeansClusterer, Priority, ShelterRecord, TierThresholds,
//!     analyse,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let shelters = vec![ShelterRecord::new(
//!     "Queen St Hostel",
//!     "100 Queen St W",
//!     43.65,
//!     -79.38,
//!     Some(100.0),
//!     Some(98.0),
//! )?];
//! let demand = vec![DemandPoint::new("A", 43.66, -79.40, 90.0)?];
//!
//! let snapshot: AnalysisSnapshot = analyse(
//!     shelters,
//!     demand,
//!     &KMeansClusterer::default(),
//!     &TierThresholds::default(),
//! )?;
//! let top = &snapshot.recommendations()[0];
//! assert_eq!(top.need_score(), 100.0);
//! assert_eq!(top.priority, Priority::High);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod analysis;
mod snapshot;

pub use analysis::{AnalysisConfig, AnalysisError, analyse, analyse_tables};
pub use snapshot::{AnalysisSnapshot, ServedCollections};

pub use shelter_gap_cluster::{ClusterConfig, KMeansClusterer};
pub use shelter_gap_core::{
    Cluster, ClusterError, ClusterView, Clusterer, DemandPoint, DemandPointError, DemandView,
    GeoError, Priority, Recommendation, ScoredCluster, SeverityLevel, ShelterRecord,
    ShelterRecordError, ShelterView, ThresholdError, TierThresholds, distance_km,
    weighted_centroid,
};
pub use shelter_gap_data::{
    DataQualityReport, GeocodeCache, LoadError, NormalizeConfig, Normalized, QualitySummary,
    RawTable, normalize_demand, normalize_shelters,
};
pub use shelter_gap_scorer::{GapScorer, rank};
