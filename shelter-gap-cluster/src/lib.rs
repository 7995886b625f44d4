//! Demand clustering for the shelter-gap engine.
//!
//! This crate provides [`KMeansClusterer`], the default implementation of
//! the [`Clusterer`](shelter_gap_core::Clusterer) trait. It partitions demand
//! points into pressure areas with a seeded, weighted k-means and splits any
//! cluster whose members stray beyond a configured radius.
//!
//! Results are reproducible: the same points, configuration and seed always
//! yield the same clusters, identifiers and boundaries.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod kmeans;
mod lloyd;

pub use config::ClusterConfig;
pub use kmeans::KMeansClusterer;
