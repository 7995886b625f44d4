//! Error types emitted by the shelter-gap CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use shelter_gap::{AnalysisError, LoadError, ThresholdError};
use thiserror::Error;

/// Errors emitted by the shelter-gap CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that may supply the value.
        env: &'static str,
    },
    /// Priority thresholds were not four comma-separated numbers.
    #[error("--priority-thresholds expects four comma-separated numbers, got {value:?}")]
    MalformedThresholds {
        /// The rejected value.
        value: String,
    },
    /// Priority thresholds were numbers but not a valid table.
    #[error("invalid --priority-thresholds {value:?}: {source}")]
    InvalidThresholds {
        /// The rejected value.
        value: String,
        /// Why the table was rejected.
        #[source]
        source: ThresholdError,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag that named the path.
        field: &'static str,
        /// The missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag that named the path.
        field: &'static str,
        /// The offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag that named the path.
        field: &'static str,
        /// The offending path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The output directory exists but is not a directory.
    #[error("output directory {path:?} is not a directory")]
    OutputDirectoryNotDirectory {
        /// The offending path.
        path: Utf8PathBuf,
    },
    /// Opening a source table failed.
    #[error("failed to open {field} table at {path:?}: {source}")]
    OpenSource {
        /// Flag that named the path.
        field: &'static str,
        /// The path that could not be opened.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// A source table could not be decoded as CSV.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The analysis itself failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    /// Serialising a served collection failed.
    #[error("failed to serialise {name}: {source}")]
    Serialise {
        /// Output file name.
        name: &'static str,
        /// Underlying encoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// Writing the snapshot failed.
    #[error("failed to write {name} into {path:?}: {source}")]
    WriteSnapshot {
        /// Output directory.
        path: Utf8PathBuf,
        /// Output file name, or `.` for the directory itself.
        name: &'static str,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Writing the recommendation report failed.
    #[error("failed to write recommendation report: {0}")]
    WriteReport(#[source] std::io::Error),
}
