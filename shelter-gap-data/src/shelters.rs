//! Shelter table normalisation.

use geo::Coord;
use shelter_gap_core::{ShelterRecord, validated_coord};

use crate::accumulator::{Accumulator, Observation};
use crate::aliases::{CAPACITY, LAT, LON, OBSERVED_AT, OCCUPIED, SHELTER_ADDRESS, SHELTER_NAME};
use crate::parse::{NumberCell, is_null_marker, read_number};
use crate::{DataQualityReport, GeocodeCache, NormalizeConfig, NormalizeIssue, Normalized, RawTable};

const TABLE: &str = "shelters";

#[derive(Debug)]
struct ShelterTally {
    name: String,
    address: String,
    capacity_sum: f64,
    occupied_sum: f64,
    complete_observations: u32,
}

impl ShelterTally {
    fn average(&self) -> (Option<f64>, Option<f64>) {
        if self.complete_observations == 0 {
            return (None, None);
        }
        let n = f64::from(self.complete_observations);
        (Some(self.capacity_sum / n), Some(self.occupied_sum / n))
    }
}

struct Columns {
    name: Option<usize>,
    address: Option<usize>,
    lat: Option<usize>,
    lon: Option<usize>,
    capacity: Option<usize>,
    occupied: Option<usize>,
    observed_at: Option<usize>,
}

impl Columns {
    fn resolve(table: &RawTable) -> Self {
        Self {
            name: table.column(SHELTER_NAME),
            address: table.column(SHELTER_ADDRESS),
            lat: table.column(LAT),
            lon: table.column(LON),
            capacity: table.column(CAPACITY),
            occupied: table.column(OCCUPIED),
            observed_at: table.column(OBSERVED_AT),
        }
    }
}

/// Collapse a raw shelter table into one [`ShelterRecord`] per shelter.
///
/// Shelters are identified by trimmed name and address. Repeated
/// observations average their bed counts; only observations carrying both
/// capacity and occupancy contribute. Rows without coordinates are located
/// through `geocode` when an address match exists, and dropped otherwise.
///
/// # Examples
/// ```
/// use shelter_gap_data::{NormalizeConfig, RawTable, normalize_shelters};
///
/// let rows = [
///     ["Hostel", "1 Main St", "43.65", "-79.38", "100", "90"],
///     ["Hostel", "1 Main St", "43.65", "-79.38", "100", "100"],
/// ];
/// let table = RawTable::new(
///     ["LOCATION_NAME", "LOCATION_ADDRESS", "lat", "lon", "CAPACITY_FUNDING_BED", "OCCUPIED_BEDS"],
///     rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect(),
/// );
/// let out = normalize_shelters(&table, None, &NormalizeConfig::default());
/// assert_eq!(out.records.len(), 1);
/// assert_eq!(out.records[0].occupied_beds(), Some(95.0));
/// ```
pub fn normalize_shelters(
    table: &RawTable,
    geocode: Option<&GeocodeCache>,
    config: &NormalizeConfig,
) -> Normalized<ShelterRecord> {
    let columns = Columns::resolve(table);
    let mut report = DataQualityReport {
        rows_read: table.len(),
        ..DataQualityReport::default()
    };
    let mut accumulator = Accumulator::new(config.conflict_tolerance_km);

    for row in 0..table.len() {
        let Some(name) = table.cell(row, columns.name) else {
            report.record(TABLE, &NormalizeIssue::MissingIdentity { row });
            continue;
        };
        let address = table
            .cell(row, columns.address)
            .filter(|a| !is_null_marker(a))
            .unwrap_or_default();
        let Some(position) = locate(table, row, &columns, address, geocode, config, &mut report)
        else {
            report.record(TABLE, &NormalizeIssue::InvalidCoordinate { row });
            continue;
        };
        let capacity = bed_count(table, row, columns.capacity, &mut report);
        let occupied = bed_count(table, row, columns.occupied, &mut report);

        let observation = Observation {
            position,
            observed_at: table.cell(row, columns.observed_at),
        };
        let tally = accumulator.observe(
            format!("{name} | {address}"),
            observation,
            || ShelterTally {
                name: name.to_owned(),
                address: address.to_owned(),
                capacity_sum: 0.0,
                occupied_sum: 0.0,
                complete_observations: 0,
            },
            TABLE,
            &mut report,
        );
        match capacity.zip(occupied) {
            Some((capacity, occupied)) => {
                tally.capacity_sum += capacity;
                tally.occupied_sum += occupied;
                tally.complete_observations += 1;
            }
            None => report.incomplete_bed_observations += 1,
        }
    }

    let records: Vec<ShelterRecord> = accumulator
        .into_entries()
        .into_iter()
        .filter_map(|entry| {
            let (capacity, occupied) = entry.payload.average();
            ShelterRecord::new(
                entry.payload.name,
                entry.payload.address,
                entry.position.y,
                entry.position.x,
                capacity,
                occupied,
            )
            .map_err(|err| log::warn!("{TABLE}: discarding shelter: {err}"))
            .ok()
        })
        .collect();
    report.records_emitted = records.len();
    report.log_summary(TABLE);
    Normalized { records, report }
}

fn locate(
    table: &RawTable,
    row: usize,
    columns: &Columns,
    address: &str,
    geocode: Option<&GeocodeCache>,
    config: &NormalizeConfig,
    report: &mut DataQualityReport,
) -> Option<Coord<f64>> {
    let lat = number(table, row, columns.lat, report);
    let lon = number(table, row, columns.lon, report);
    if let Some(coord) = lat.zip(lon).and_then(|(y, x)| validated_coord(y, x).ok()) {
        return Some(coord);
    }
    let coord = geocode?.lookup(address, config.city_suffix.as_deref())?;
    report.geocoded_from_cache += 1;
    Some(coord)
}

fn bed_count(
    table: &RawTable,
    row: usize,
    column: Option<usize>,
    report: &mut DataQualityReport,
) -> Option<f64> {
    let value = number(table, row, column, report)?;
    if value < 0.0 {
        report.record(
            TABLE,
            &NormalizeIssue::UnparseableNumber {
                row,
                value: value.to_string(),
            },
        );
        return None;
    }
    Some(value)
}

fn number(
    table: &RawTable,
    row: usize,
    column: Option<usize>,
    report: &mut DataQualityReport,
) -> Option<f64> {
    match read_number(table.cell(row, column)) {
        NumberCell::Missing => None,
        NumberCell::Value(value) => Some(value),
        NumberCell::Invalid(value) => {
            report.record(TABLE, &NormalizeIssue::UnparseableNumber { row, value });
            None
        }
    }
}
