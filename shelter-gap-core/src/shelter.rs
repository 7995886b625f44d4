use geo::Coord;
use thiserror::Error;

use crate::{GeoError, validated_coord};

/// An existing shelter with its (averaged) bed counts.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Bed counts
/// may be fractional because they are averaged over reporting snapshots.
///
/// # Examples
/// ```
/// use shelter_gap_core::ShelterRecord;
///
/// # fn main() -> Result<(), shelter_gap_core::ShelterRecordError> {
/// let shelter = ShelterRecord::new(
///     "Queen St Hostel",
///     "100 Queen St W",
///     43.65,
///     -79.38,
///     Some(100.0),
///     Some(98.0),
/// )?;
/// assert_eq!(shelter.occupancy_rate(), Some(98.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShelterRecord {
    name: String,
    address: String,
    location: Coord<f64>,
    capacity_beds: Option<f64>,
    occupied_beds: Option<f64>,
}

/// Errors returned by [`ShelterRecord::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShelterRecordError {
    /// The shelter name was blank.
    #[error("shelter name must not be empty")]
    EmptyName,
    /// The position failed validation.
    #[error(transparent)]
    InvalidCoordinate(#[from] GeoError),
    /// A bed count was negative or not finite.
    #[error("bed counts must be finite and non-negative, got {value}")]
    InvalidBeds {
        /// The rejected count.
        value: f64,
    },
}

impl ShelterRecord {
    /// Validate and construct a [`ShelterRecord`].
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        lat: f64,
        lon: f64,
        capacity_beds: Option<f64>,
        occupied_beds: Option<f64>,
    ) -> Result<Self, ShelterRecordError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ShelterRecordError::EmptyName);
        }
        let location = validated_coord(lat, lon)?;
        for value in [capacity_beds, occupied_beds].into_iter().flatten() {
            if !value.is_finite() || value < 0.0 {
                return Err(ShelterRecordError::InvalidBeds { value });
            }
        }
        Ok(Self {
            name,
            address: address.into(),
            location,
            capacity_beds,
            occupied_beds,
        })
    }

    /// Shelter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Street address, possibly empty.
    pub fn address(&self) -> &str {
        &self.address
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

    /// Funded bed capacity, when reported.
    pub fn capacity_beds(&self) -> Option<f64> {
        self.capacity_beds
    }

    /// Occupied beds, when reported.
    pub fn occupied_beds(&self) -> Option<f64> {
        self.occupied_beds
    }

    /// Occupied beds as a percentage of capacity.
    ///
    /// `None` when capacity is missing or zero. Values above 100 describe
    /// over-capacity shelters and are returned unclamped. A missing occupied
    /// count reads as zero.
    pub fn occupancy_rate(&self) -> Option<f64> {
        let capacity = self.capacity_beds.filter(|c| *c > 0.0)?;
        let occupied = self.occupied_beds.unwrap_or(0.0);
        Some(occupied * 100.0 / capacity)
    }
}
