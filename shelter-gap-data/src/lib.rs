//! Dataset normalisation for the shelter-gap engine.
//!
//! Responsibilities:
//! - Read heterogeneous CSV exports into untyped [`RawTable`]s.
//! - Map varying source column names onto canonical fields.
//! - Collapse repeated observations into one record per identity.
//! - Count and log data-quality problems instead of failing.
//!
//! Boundaries:
//! - Domain validation lives in `shelter-gap-core`; this crate only feeds it.
//! - No network access. Missing positions are resolved from an offline
//!   [`GeocodeCache`] or the row is dropped.
//!
//! Invariants:
//! - Output order is the order in which each identity was first observed.
//! - A single bad row never aborts normalisation.

mod accumulator;
mod aliases;
mod config;
mod demand;
mod geocode;
mod parse;
mod quality;
mod shelters;
mod table;

pub use config::NormalizeConfig;
pub use demand::normalize_demand;
pub use geocode::GeocodeCache;
pub use quality::{DataQualityReport, NormalizeIssue, QualitySummary};
pub use shelters::normalize_shelters;
pub use table::{LoadError, RawTable};

/// Canonical records produced from one table, with its quality report.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    /// Records in first-observation order.
    pub records: Vec<T>,
    /// What was dropped, merged or repaired along the way.
    pub report: DataQualityReport,
}
