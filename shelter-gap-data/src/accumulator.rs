//! Identity-keyed accumulation of repeated observations.
//!
//! Both tables may list one shelter or encampment many times. The
//! accumulator keeps one entry per identity in first-seen order and settles
//! position disagreements in favour of the most recent observation.

use std::collections::HashMap;
use std::collections::hash_map::Entry as MapEntry;

use geo::Coord;
use shelter_gap_core::haversine_km;

use crate::{DataQualityReport, NormalizeIssue};

#[derive(Debug)]
pub(crate) struct Entry<T> {
    pub(crate) position: Coord<f64>,
    latest_observed: Option<String>,
    pub(crate) payload: T,
}

/// One observation of an identity.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Observation<'a> {
    pub(crate) position: Coord<f64>,
    /// ISO-8601 timestamp or date, compared lexicographically.
    pub(crate) observed_at: Option<&'a str>,
}

#[derive(Debug)]
pub(crate) struct Accumulator<T> {
    index: HashMap<String, usize>,
    entries: Vec<Entry<T>>,
    tolerance_km: f64,
}

impl<T> Accumulator<T> {
    pub(crate) fn new(tolerance_km: f64) -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
            tolerance_km,
        }
    }

    /// Record `observation` for `identity` and return its payload.
    ///
    /// `init` builds the payload the first time an identity is seen.
    pub(crate) fn observe(
        &mut self,
        identity: String,
        observation: Observation<'_>,
        init: impl FnOnce() -> T,
        table: &str,
        report: &mut DataQualityReport,
    ) -> &mut T {
        let (slot, identity) = match self.index.entry(identity) {
            MapEntry::Vacant(vacant) => {
                let slot = self.entries.len();
                vacant.insert(slot);
                self.entries.push(Entry {
                    position: observation.position,
                    latest_observed: observation.observed_at.map(str::to_owned),
                    payload: init(),
                });
                return &mut self.entries[slot].payload;
            }
            MapEntry::Occupied(occupied) => (*occupied.get(), occupied.key().clone()),
        };
        let tolerance_km = self.tolerance_km;
        let entry = &mut self.entries[slot];
        let newer = is_at_least_as_recent(observation.observed_at, entry.latest_observed.as_deref());
        let separation_km = haversine_km(entry.position, observation.position);
        if separation_km > tolerance_km {
            report.record(
                table,
                &NormalizeIssue::NormalizationConflict {
                    identity,
                    separation_km,
                },
            );
            if newer {
                entry.position = observation.position;
            }
        }
        if newer && observation.observed_at.is_some() {
            entry.latest_observed = observation.observed_at.map(str::to_owned);
        }
        &mut entry.payload
    }

    /// Entries in first-seen order.
    pub(crate) fn into_entries(self) -> Vec<Entry<T>> {
        self.entries
    }
}

/// Later rows win unless both observations carry timestamps and the new one
/// is strictly older.
fn is_at_least_as_recent(candidate: Option<&str>, current: Option<&str>) -> bool {
    match (candidate, current) {
        (Some(candidate), Some(current)) => candidate >= current,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const NEAR: Coord<f64> = Coord { x: -79.38, y: 43.65 };
    const FAR: Coord<f64> = Coord { x: -79.30, y: 43.70 };

    fn observe(
        acc: &mut Accumulator<u32>,
        position: Coord<f64>,
        observed_at: Option<&str>,
        report: &mut DataQualityReport,
    ) {
        *acc.observe(
            "Hostel".to_owned(),
            Observation {
                position,
                observed_at,
            },
            || 0,
            "test",
            report,
        ) += 1;
    }

    #[rstest]
    fn repeated_identity_shares_one_entry() {
        let mut report = DataQualityReport::default();
        let mut acc = Accumulator::new(0.05);
        observe(&mut acc, NEAR, None, &mut report);
        observe(&mut acc, NEAR, None, &mut report);
        let entries = acc.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries.first().map(|e| e.payload), Some(2));
        assert_eq!(report.conflicts_resolved, 0);
    }

    #[rstest]
    #[case(Some("2024-01-01"), Some("2024-02-01"), FAR)]
    #[case(Some("2024-02-01"), Some("2024-01-01"), NEAR)]
    #[case(None, None, FAR)]
    #[case(Some("2024-02-01"), None, FAR)]
    fn conflicts_prefer_the_latest_observation(
        #[case] first: Option<&str>,
        #[case] second: Option<&str>,
        #[case] expected: Coord<f64>,
    ) {
        let mut report = DataQualityReport::default();
        let mut acc = Accumulator::new(0.05);
        observe(&mut acc, NEAR, first, &mut report);
        observe(&mut acc, FAR, second, &mut report);
        let entries = acc.into_entries();
        assert_eq!(entries.first().map(|e| e.position), Some(expected));
        assert_eq!(report.conflicts_resolved, 1);
    }

    #[rstest]
    fn positions_within_tolerance_keep_the_first() {
        let mut report = DataQualityReport::default();
        let mut acc = Accumulator::new(0.05);
        let nudged = Coord {
            x: NEAR.x + 0.0001,
            y: NEAR.y,
        };
        observe(&mut acc, NEAR, None, &mut report);
        observe(&mut acc, nudged, None, &mut report);
        let entries = acc.into_entries();
        assert_eq!(entries.first().map(|e| e.position), Some(NEAR));
        assert_eq!(report.conflicts_resolved, 0);
    }
}
