//! Offline address-to-position lookups.

use std::collections::HashMap;

use geo::Coord;
use shelter_gap_core::validated_coord;

use crate::RawTable;
use crate::aliases::{GEOCODE_ADDRESS, LAT, LON};
use crate::parse::parse_number;

/// Previously geocoded addresses, keyed case-insensitively.
///
/// Rows whose position is missing or invalid (failed lookups are often
/// cached as `NaN`) are skipped.
///
/// # Examples
/// ```
/// use shelter_gap_data::{GeocodeCache, RawTable};
///
/// let table = RawTable::new(
///     ["address", "lat", "lon"],
///     vec![vec!["1 Main St, Toronto".into(), "43.6".into(), "-79.4".into()]],
/// );
/// let cache = GeocodeCache::from_table(&table);
/// assert!(cache.lookup("1 main st", Some("Toronto")).is_some());
/// assert!(cache.lookup("2 Main St", Some("Toronto")).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeCache {
    entries: HashMap<String, Coord<f64>>,
}

impl GeocodeCache {
    /// Build a cache from a table with address, lat and lon columns.
    ///
    /// When an address appears more than once the first valid row wins.
    pub fn from_table(table: &RawTable) -> Self {
        let address = table.column(GEOCODE_ADDRESS);
        let lat = table.column(LAT);
        let lon = table.column(LON);
        let mut entries = HashMap::new();
        for row in 0..table.len() {
            let Some(key) = table.cell(row, address).map(normalise_key) else {
                continue;
            };
            let position = table
                .cell(row, lat)
                .and_then(parse_number)
                .zip(table.cell(row, lon).and_then(parse_number))
                .and_then(|(y, x)| validated_coord(y, x).ok());
            if let Some(coord) = position {
                entries.entry(key).or_insert(coord);
            }
        }
        Self { entries }
    }

    /// Number of usable entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no usable entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `address`, trying it bare and then with `city_suffix`.
    pub fn lookup(&self, address: &str, city_suffix: Option<&str>) -> Option<Coord<f64>> {
        let bare = normalise_key(address);
        if bare.is_empty() {
            return None;
        }
        self.entries.get(&bare).copied().or_else(|| {
            let suffix = city_suffix?.trim();
            let qualified = normalise_key(&format!("{address}, {suffix}"));
            self.entries.get(&qualified).copied()
        })
    }
}

fn normalise_key(address: &str) -> String {
    address.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn cache() -> GeocodeCache {
        let rows = [
            ["100 Queen St W", "43.6525", "-79.3835"],
            ["200 King St, Toronto, ON", "43.647", "-79.386"],
            ["Unknown Rd", "nan", "nan"],
            ["100 QUEEN ST W", "0", "0"],
        ];
        let table = RawTable::new(
            ["LOCATION_ADDRESS", "lat", "lon"],
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_owned()).collect())
                .collect(),
        );
        GeocodeCache::from_table(&table)
    }

    #[rstest]
    fn lookup_is_case_insensitive_and_first_wins(cache: GeocodeCache) {
        let hit = cache.lookup("100 queen st w", None).expect("cached");
        assert_eq!(hit, Coord { x: -79.3835, y: 43.6525 });
    }

    #[rstest]
    fn lookup_retries_with_city_suffix(cache: GeocodeCache) {
        assert!(cache.lookup("200 King St", None).is_none());
        assert!(cache.lookup("200 King St", Some("Toronto, ON")).is_some());
    }

    #[rstest]
    fn failed_geocodes_are_skipped(cache: GeocodeCache) {
        assert_eq!(cache.len(), 2);
        assert!(cache.lookup("Unknown Rd", None).is_none());
    }
}
