use geo::Coord;
use thiserror::Error;

use crate::{GeoError, SeverityLevel, validated_coord};

/// Highest permitted demand weight.
pub const MAX_WEIGHT: f64 = 100.0;

/// A geocoded observation of unsheltered population.
///
/// `weight` is a severity index already scaled onto `0..=100` during
/// ingestion; the engine never rescales it.
///
/// # Examples
/// ```
/// use shelter_gap_core::{DemandPoint, SeverityLevel};
///
/// # fn main() -> Result<(), shelter_gap_core::DemandPointError> {
/// let point = DemandPoint::new("Underpass A", 43.66, -79.40, 90.0)?;
/// assert_eq!(point.severity(), SeverityLevel::Critical);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DemandPoint {
    name: String,
    location: Coord<f64>,
    weight: f64,
}

/// Errors returned by [`DemandPoint::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DemandPointError {
    /// The point name was blank.
    #[error("demand point name must not be empty")]
    EmptyName,
    /// The position failed validation.
    #[error(transparent)]
    InvalidCoordinate(#[from] GeoError),
    /// The weight was outside `0..=100` or not finite.
    #[error("demand weight must lie within 0..=100, got {weight}")]
    WeightOutOfRange {
        /// The rejected weight.
        weight: f64,
    },
}

impl DemandPoint {
    /// Validate and construct a [`DemandPoint`].
    pub fn new(
        name: impl Into<String>,
        lat: f64,
        lon: f64,
        weight: f64,
    ) -> Result<Self, DemandPointError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DemandPointError::EmptyName);
        }
        let location = validated_coord(lat, lon)?;
        if !(0.0..=MAX_WEIGHT).contains(&weight) {
            return Err(DemandPointError::WeightOutOfRange { weight });
        }
        Ok(Self {
            name,
            location,
            weight,
        })
    }

    /// Point name, unique within a normalised dataset.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated position.
    pub fn location(&self) -> Coord<f64> {
        self.location
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.location.x
    }

    /// Severity weight in `0..=100`.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Severity level for display.
    pub fn severity(&self) -> SeverityLevel {
        SeverityLevel::classify(self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0)]
    #[case(100.0)]
    fn accepts_boundary_weights(#[case] weight: f64) {
        assert!(DemandPoint::new("A", 43.0, -79.0, weight).is_ok());
    }

    #[rstest]
    #[case(-0.1)]
    #[case(100.1)]
    #[case(f64::NAN)]
    fn rejects_out_of_range_weight(#[case] weight: f64) {
        assert!(matches!(
            DemandPoint::new("A", 43.0, -79.0, weight),
            Err(DemandPointError::WeightOutOfRange { .. })
        ));
    }

    #[rstest]
    fn rejects_invalid_position() {
        assert!(matches!(
            DemandPoint::new("A", 43.0, 200.0, 5.0),
            Err(DemandPointError::InvalidCoordinate(GeoError::InvalidCoordinate { .. }))
        ));
    }

    #[rstest]
    fn rejects_blank_name() {
        assert_eq!(
            DemandPoint::new("", 43.0, -79.0, 5.0),
            Err(DemandPointError::EmptyName)
        );
    }
}
