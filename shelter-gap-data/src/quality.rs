//! Data-quality accounting for normalisation runs.
//!
//! Nothing a single row does is fatal. Each problem is logged, recorded as a
//! [`NormalizeIssue`] and counted in the [`DataQualityReport`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// A data-quality problem found in one source row.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeIssue {
    /// The row had no usable position and none could be resolved.
    InvalidCoordinate {
        /// Zero-based data row index.
        row: usize,
    },
    /// The row had no name to identify it.
    MissingIdentity {
        /// Zero-based data row index.
        row: usize,
    },
    /// Two observations of one identity disagreed on position.
    NormalizationConflict {
        /// Identity both observations claim.
        identity: String,
        /// Distance between the two positions.
        separation_km: f64,
    },
    /// A weight fell outside `0..=100` after scaling and was clamped.
    WeightClamped {
        /// Zero-based data row index.
        row: usize,
        /// Weight before clamping.
        original: f64,
    },
    /// A numeric cell could not be parsed and was treated as missing.
    UnparseableNumber {
        /// Zero-based data row index.
        row: usize,
        /// Raw cell contents.
        value: String,
    },
}

impl fmt::Display for NormalizeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinate { row } => {
                write!(f, "row {row}: no resolvable position, dropped")
            }
            Self::MissingIdentity { row } => write!(f, "row {row}: missing name, dropped"),
            Self::NormalizationConflict {
                identity,
                separation_km,
            } => write!(
                f,
                "{identity}: observations {separation_km:.3} km apart, keeping most recent"
            ),
            Self::WeightClamped { row, original } => {
                write!(f, "row {row}: weight {original} clamped into 0..=100")
            }
            Self::UnparseableNumber { row, value } => {
                write!(f, "row {row}: could not parse number {value:?}")
            }
        }
    }
}

/// Counters describing one normalised table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityReport {
    /// Data rows read from the source.
    pub rows_read: usize,
    /// Canonical records produced.
    pub records_emitted: usize,
    /// Rows dropped for lacking a usable position.
    pub dropped_invalid_coordinate: usize,
    /// Rows dropped for lacking a name.
    pub dropped_missing_identity: usize,
    /// Position conflicts resolved in favour of the latest observation.
    pub conflicts_resolved: usize,
    /// Weights clamped into range.
    pub weights_clamped: usize,
    /// Numeric cells treated as missing.
    pub unparseable_numbers: usize,
    /// Shelter observations ignored for bed averaging.
    pub incomplete_bed_observations: usize,
    /// Positions resolved from the geocode cache.
    pub geocoded_from_cache: usize,
}

impl DataQualityReport {
    /// Count `issue` under `table`.
    ///
    /// Conflicts are logged individually at warn level; row-level problems
    /// are logged at debug level and summarised by [`Self::log_summary`].
    pub(crate) fn record(&mut self, table: &str, issue: &NormalizeIssue) {
        match issue {
            NormalizeIssue::InvalidCoordinate { .. } => self.dropped_invalid_coordinate += 1,
            NormalizeIssue::MissingIdentity { .. } => self.dropped_missing_identity += 1,
            NormalizeIssue::NormalizationConflict { .. } => {
                self.conflicts_resolved += 1;
                log::warn!("{table}: {issue}");
                return;
            }
            NormalizeIssue::WeightClamped { .. } => self.weights_clamped += 1,
            NormalizeIssue::UnparseableNumber { .. } => self.unparseable_numbers += 1,
        }
        log::debug!("{table}: {issue}");
    }

    /// Log the per-reason drop counts for `table`.
    pub(crate) fn log_summary(&self, table: &str) {
        if self.dropped_invalid_coordinate > 0 {
            log::warn!(
                "{table}: dropped {} rows without a resolvable position",
                self.dropped_invalid_coordinate
            );
        }
        if self.dropped_missing_identity > 0 {
            log::warn!(
                "{table}: dropped {} rows without a name",
                self.dropped_missing_identity
            );
        }
        if self.weights_clamped > 0 || self.unparseable_numbers > 0 {
            log::warn!(
                "{table}: clamped {} weights, ignored {} unparseable numbers",
                self.weights_clamped,
                self.unparseable_numbers
            );
        }
        log::info!(
            "{table}: {} rows read, {} records emitted",
            self.rows_read,
            self.records_emitted
        );
    }

    /// Rows dropped for any reason.
    pub fn rows_dropped(&self) -> usize {
        self.dropped_invalid_coordinate + self.dropped_missing_identity
    }
}

/// Quality reports for both input tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitySummary {
    /// Report for the shelter table.
    pub shelters: DataQualityReport,
    /// Report for the demand table.
    pub demand: DataQualityReport,
}
