//! `analyse` command implementation for the shelter-gap CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use shelter_gap::{
    AnalysisConfig, AnalysisSnapshot, ClusterConfig, GeocodeCache, NormalizeConfig, RawTable,
    TierThresholds, analyse_tables,
};
use shelter_gap_fs::{is_regular_file, open_output_dir, open_source_file, write_output};
use std::io::{BufReader, Write};

use crate::report::write_report;
use crate::{
    ARG_CITY_SUFFIX, ARG_CLUSTERS, ARG_DEFAULT_WEIGHT, ARG_DEMAND, ARG_GEOCODE_CACHE,
    ARG_MAX_RADIUS_KM, ARG_OUTPUT_DIR, ARG_PRIORITY_THRESHOLDS, ARG_SEED, ARG_SHELTERS,
    ARG_WEIGHT_MULTIPLIER, CliError, ENV_DEMAND, ENV_SHELTERS,
};

pub(crate) const SHELTERS_FILE: &str = "shelters.json";
pub(crate) const HOMELESS_FILE: &str = "homeless.json";
pub(crate) const CLUSTERS_FILE: &str = "clusters.json";
pub(crate) const QUALITY_FILE: &str = "quality.json";

/// CLI arguments for the `analyse` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Normalise shelter and demand tables, cluster demand into \
                 pressure areas, score each area's distance from shelter \
                 capacity and write the served collections. Every option can \
                 also come from a configuration file or environment variables.",
    about = "Rank candidate shelter sites by unmet need"
)]
#[ortho_config(prefix = "SHELTER_GAP")]
pub(crate) struct AnalyseArgs {
    /// CSV export of shelter occupancy snapshots.
    #[arg(long = ARG_SHELTERS, value_name = "path")]
    #[serde(default)]
    pub(crate) shelters: Option<Utf8PathBuf>,
    /// CSV export of encampment or survey demand points.
    #[arg(long = ARG_DEMAND, value_name = "path")]
    #[serde(default)]
    pub(crate) demand: Option<Utf8PathBuf>,
    /// Offline geocode cache (`address,lat,lon`) for shelters without coordinates.
    #[arg(long = ARG_GEOCODE_CACHE, value_name = "path")]
    #[serde(default)]
    pub(crate) geocode_cache: Option<Utf8PathBuf>,
    /// Directory receiving the JSON collections (default: current directory).
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// Number of clusters to seed before radius splitting.
    #[arg(long = ARG_CLUSTERS, value_name = "n")]
    #[serde(default)]
    pub(crate) clusters: Option<usize>,
    /// Largest distance from a member to its cluster centre, in kilometres.
    #[arg(long = ARG_MAX_RADIUS_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) max_radius_km: Option<f64>,
    /// Seed for reproducible clustering.
    #[arg(long = ARG_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Need-score bounds for HIGH, MEDIUM-HIGH, MEDIUM and MEDIUM-LOW.
    #[arg(long = ARG_PRIORITY_THRESHOLDS, value_name = "a,b,c,d")]
    #[serde(default)]
    pub(crate) priority_thresholds: Option<String>,
    /// Weight given to demand rows without one.
    #[arg(long = ARG_DEFAULT_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) default_weight: Option<f64>,
    /// Factor converting source weights onto the 0-100 severity scale.
    #[arg(long = ARG_WEIGHT_MULTIPLIER, value_name = "factor")]
    #[serde(default)]
    pub(crate) weight_multiplier: Option<f64>,
    /// Suffix tried when matching shelter addresses in the geocode cache.
    #[arg(long = ARG_CITY_SUFFIX, value_name = "text")]
    #[serde(default)]
    pub(crate) city_suffix: Option<String>,
}

impl AnalyseArgs {
    pub(crate) fn into_config(self) -> Result<AnalyseConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AnalyseConfig::try_from(merged)
    }
}

/// Resolved `analyse` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AnalyseConfig {
    pub(crate) shelters: Utf8PathBuf,
    pub(crate) demand: Utf8PathBuf,
    pub(crate) geocode_cache: Option<Utf8PathBuf>,
    pub(crate) output_dir: Utf8PathBuf,
    pub(crate) analysis: AnalysisConfig,
}

impl AnalyseConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.shelters, ARG_SHELTERS)?;
        Self::require_existing(&self.demand, ARG_DEMAND)?;
        if let Some(cache) = &self.geocode_cache {
            Self::require_existing(cache, ARG_GEOCODE_CACHE)?;
        }
        if matches!(is_regular_file(&self.output_dir), Ok(true)) {
            return Err(CliError::OutputDirectoryNotDirectory {
                path: self.output_dir.clone(),
            });
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match is_regular_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<AnalyseArgs> for AnalyseConfig {
    type Error = CliError;

    fn try_from(args: AnalyseArgs) -> Result<Self, Self::Error> {
        let shelters = args.shelters.ok_or(CliError::MissingArgument {
            field: ARG_SHELTERS,
            env: ENV_SHELTERS,
        })?;
        let demand = args.demand.ok_or(CliError::MissingArgument {
            field: ARG_DEMAND,
            env: ENV_DEMAND,
        })?;
        let priority_thresholds = args
            .priority_thresholds
            .as_deref()
            .map(parse_thresholds)
            .transpose()?
            .unwrap_or_default();

        let cluster_defaults = ClusterConfig::default();
        let cluster = ClusterConfig {
            target_clusters: args.clusters.unwrap_or(cluster_defaults.target_clusters),
            max_radius_km: args.max_radius_km.or(cluster_defaults.max_radius_km),
            seed: args.seed.unwrap_or(cluster_defaults.seed),
            ..cluster_defaults
        };

        let normalize_defaults = NormalizeConfig::default();
        let normalize = NormalizeConfig {
            default_weight: args
                .default_weight
                .unwrap_or(normalize_defaults.default_weight),
            weight_multiplier: args
                .weight_multiplier
                .unwrap_or(normalize_defaults.weight_multiplier),
            city_suffix: args.city_suffix,
            ..normalize_defaults
        };

        Ok(Self {
            shelters,
            demand,
            geocode_cache: args.geocode_cache,
            output_dir: args.output_dir.unwrap_or_else(|| Utf8PathBuf::from(".")),
            analysis: AnalysisConfig {
                normalize,
                cluster,
                priority_thresholds,
            },
        })
    }
}

/// Parse `a,b,c,d` into a priority table.
pub(crate) fn parse_thresholds(value: &str) -> Result<TierThresholds, CliError> {
    let malformed = || CliError::MalformedThresholds {
        value: value.to_owned(),
    };
    let bounds = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| malformed())?;
    TierThresholds::from_slice(&bounds)
        .ok_or_else(malformed)?
        .map_err(|source| CliError::InvalidThresholds {
            value: value.to_owned(),
            source,
        })
}

pub(crate) fn run_analyse(args: AnalyseArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_analyse_with(args, &mut stdout).map(|_| ())
}

/// Run the command, writing the snapshot to disk and the report to `writer`.
pub(crate) fn run_analyse_with(
    args: AnalyseArgs,
    writer: &mut dyn Write,
) -> Result<AnalysisSnapshot, CliError> {
    let config = resolve_analyse_config(args)?;
    let snapshot = execute_analyse(&config)?;
    write_snapshot(&config.output_dir, &snapshot)?;
    write_report(writer, &snapshot)?;
    Ok(snapshot)
}

fn resolve_analyse_config(args: AnalyseArgs) -> Result<AnalyseConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_analyse(config: &AnalyseConfig) -> Result<AnalysisSnapshot, CliError> {
    let shelters = load_table(&config.shelters, ARG_SHELTERS)?;
    let demand = load_table(&config.demand, ARG_DEMAND)?;
    let geocode_cache = config
        .geocode_cache
        .as_deref()
        .map(|path| load_table(path, ARG_GEOCODE_CACHE).map(|table| GeocodeCache::from_table(&table)))
        .transpose()?;
    let snapshot = analyse_tables(&shelters, &demand, geocode_cache.as_ref(), &config.analysis)?;
    Ok(snapshot)
}

/// Read a CSV table from disk.
pub(crate) fn load_table(path: &Utf8Path, field: &'static str) -> Result<RawTable, CliError> {
    let file = open_source_file(path).map_err(|source| CliError::OpenSource {
        field,
        path: path.to_path_buf(),
        source,
    })?;
    let table = RawTable::from_csv_reader(BufReader::new(file), path.as_str())?;
    info!("read {} rows from {path}", table.len());
    Ok(table)
}

/// Write the served collections and the quality report into `dir`.
pub(crate) fn write_snapshot(dir: &Utf8Path, snapshot: &AnalysisSnapshot) -> Result<(), CliError> {
    let handle = open_output_dir(dir).map_err(|source| CliError::WriteSnapshot {
        path: dir.to_path_buf(),
        name: ".",
        source,
    })?;
    let collections = snapshot.collections();
    let outputs = [
        (SHELTERS_FILE, serde_json::to_vec_pretty(&collections.shelters)),
        (HOMELESS_FILE, serde_json::to_vec_pretty(&collections.homeless)),
        (CLUSTERS_FILE, serde_json::to_vec_pretty(&collections.clusters)),
        (QUALITY_FILE, serde_json::to_vec_pretty(snapshot.quality())),
    ];
    for (name, encoded) in outputs {
        let bytes = encoded.map_err(|source| CliError::Serialise { name, source })?;
        write_output(&handle, name, &bytes).map_err(|source| CliError::WriteSnapshot {
            path: dir.to_path_buf(),
            name,
            source,
        })?;
    }
    info!("wrote snapshot to {dir}");
    Ok(())
}
