//! Core domain types for the shelter-gap engine.
//!
//! The crate holds the records every pipeline stage agrees on:
//! [`ShelterRecord`], [`DemandPoint`], [`Cluster`], [`ScoredCluster`] and
//! [`Recommendation`], the shared [`TierThresholds`] table, great-circle
//! helpers, and the [`Clusterer`] seam implemented by the clustering crate.
//! Constructors validate their input and return `Result` so malformed data
//! is caught at the normalisation boundary.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod cluster;
mod demand;
mod geodesy;
mod recommendation;
mod shelter;
mod shelter_index;
mod tier;
#[cfg(feature = "serde")]
mod views;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use cluster::{BOUNDARY_PADDING_KM, Cluster, ClusterError, Clusterer, cluster_boundary};
pub use demand::{DemandPoint, DemandPointError, MAX_WEIGHT};
pub use geodesy::{
    EARTH_RADIUS_KM, GeoError, LocalProjection, distance_km, haversine_km, validated_coord,
    weighted_centroid,
};
pub use recommendation::{Recommendation, ScoredCluster};
pub use shelter::{ShelterRecord, ShelterRecordError};
pub use shelter_index::{NearestShelter, ShelterIndex};
pub use tier::{Priority, SeverityLevel, ThresholdError, Tier, TierThresholds};
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub use views::{ClusterView, DemandView, ShelterView};
