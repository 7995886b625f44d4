//! Demand-point table normalisation.

use shelter_gap_core::{DemandPoint, MAX_WEIGHT, validated_coord};

use crate::accumulator::{Accumulator, Observation};
use crate::aliases::{DEMAND_NAME, LAT, LON, OBSERVED_AT, WEIGHT};
use crate::parse::{NumberCell, read_number};
use crate::{DataQualityReport, NormalizeConfig, NormalizeIssue, Normalized, RawTable};

const TABLE: &str = "demand";

#[derive(Debug)]
struct WeightTally {
    name: String,
    sum: f64,
    observations: u32,
}

/// Collapse a raw demand table into one [`DemandPoint`] per location.
///
/// Points are identified by trimmed name; unnamed rows fall back to their
/// position rounded to five decimal places and are named
/// `point@<lat>,<lon>`. Weights are scaled by
/// [`NormalizeConfig::weight_multiplier`], clamped into `0..=100`, and
/// averaged across repeated observations.
///
/// # Examples
/// ```
/// use shelter_gap_data::{NormalizeConfig, RawTable, normalize_demand};
///
/// let table = RawTable::new(
///     ["name", "lat", "lon", "weight"],
///     vec![
///         vec!["A".into(), "43.66".into(), "-79.40".into(), "80".into()],
///         vec!["A".into(), "43.66".into(), "-79.40".into(), "100".into()],
///     ],
/// );
/// let out = normalize_demand(&table, &NormalizeConfig::default());
/// assert_eq!(out.records.len(), 1);
/// assert_eq!(out.records[0].weight(), 90.0);
/// ```
pub fn normalize_demand(table: &RawTable, config: &NormalizeConfig) -> Normalized<DemandPoint> {
    let name_column = table.column(DEMAND_NAME);
    let lat_column = table.column(LAT);
    let lon_column = table.column(LON);
    let weight_column = table.column(WEIGHT);
    let observed_column = table.column(OBSERVED_AT);

    let mut report = DataQualityReport {
        rows_read: table.len(),
        ..DataQualityReport::default()
    };
    let mut accumulator = Accumulator::new(config.conflict_tolerance_km);

    for row in 0..table.len() {
        let lat = number(table.cell(row, lat_column), row, &mut report);
        let lon = number(table.cell(row, lon_column), row, &mut report);
        let Some(position) = lat.zip(lon).and_then(|(y, x)| validated_coord(y, x).ok()) else {
            report.record(TABLE, &NormalizeIssue::InvalidCoordinate { row });
            continue;
        };
        let name = table.cell(row, name_column).map_or_else(
            || format!("point@{:.5},{:.5}", position.y, position.x),
            str::to_owned,
        );
        let weight = ingest_weight(table.cell(row, weight_column), row, config, &mut report);

        let observation = Observation {
            position,
            observed_at: table.cell(row, observed_column),
        };
        let tally = accumulator.observe(
            name.clone(),
            observation,
            || WeightTally {
                name,
                sum: 0.0,
                observations: 0,
            },
            TABLE,
            &mut report,
        );
        tally.sum += weight;
        tally.observations += 1;
    }

    let records: Vec<DemandPoint> = accumulator
        .into_entries()
        .into_iter()
        .filter_map(|entry| {
            let tally = entry.payload;
            let weight = tally.sum / f64::from(tally.observations.max(1));
            DemandPoint::new(tally.name, entry.position.y, entry.position.x, weight)
                .map_err(|err| log::warn!("{TABLE}: discarding demand point: {err}"))
                .ok()
        })
        .collect();
    report.records_emitted = records.len();
    report.log_summary(TABLE);
    Normalized { records, report }
}

fn ingest_weight(
    cell: Option<&str>,
    row: usize,
    config: &NormalizeConfig,
    report: &mut DataQualityReport,
) -> f64 {
    let weight = number(cell, row, report)
        .map_or(config.default_weight, |w| w * config.weight_multiplier);
    if (0.0..=MAX_WEIGHT).contains(&weight) {
        return weight;
    }
    report.record(
        TABLE,
        &NormalizeIssue::WeightClamped {
            row,
            original: weight,
        },
    );
    if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, MAX_WEIGHT)
    }
}

fn number(cell: Option<&str>, row: usize, report: &mut DataQualityReport) -> Option<f64> {
    match read_number(cell) {
        NumberCell::Missing => None,
        NumberCell::Value(value) => Some(value),
        NumberCell::Invalid(value) => {
            report.record(TABLE, &NormalizeIssue::UnparseableNumber { row, value });
            None
        }
    }
}
