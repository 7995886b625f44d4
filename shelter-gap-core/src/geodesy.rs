//! Great-circle geometry over WGS84 latitude/longitude pairs.
//!
//! Coordinates are carried as [`geo::Coord`] with `x = longitude` and
//! `y = latitude`, both in degrees. Public entry points validate their
//! inputs and return [`GeoError::InvalidCoordinate`] for NaN, infinite, or
//! out-of-range values.

use geo::Coord;
use thiserror::Error;

/// Mean Earth radius used for every distance in the engine.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Errors returned by the geometry helpers.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    /// A latitude or longitude was NaN, infinite or outside its range.
    #[error("invalid coordinate (lat {lat}, lon {lon})")]
    InvalidCoordinate {
        /// Offending latitude in degrees.
        lat: f64,
        /// Offending longitude in degrees.
        lon: f64,
    },
    /// The operation requires at least one point.
    #[error("at least one point is required")]
    EmptyInput,
}

/// Validate a latitude/longitude pair and return it as a [`Coord`].
///
/// # Examples
/// ```
/// use shelter_gap_core::{GeoError, validated_coord};
///
/// let coord = validated_coord(43.65, -79.38).expect("valid");
/// assert_eq!(coord.y, 43.65);
/// assert!(matches!(
///     validated_coord(91.0, 0.0),
///     Err(GeoError::InvalidCoordinate { .. })
/// ));
/// ```
pub fn validated_coord(lat: f64, lon: f64) -> Result<Coord<f64>, GeoError> {
    if lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
    {
        Ok(Coord { x: lon, y: lat })
    } else {
        Err(GeoError::InvalidCoordinate { lat, lon })
    }
}

fn check(coord: Coord<f64>) -> Result<Coord<f64>, GeoError> {
    validated_coord(coord.y, coord.x)
}

/// Haversine distance in kilometres between two coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use shelter_gap_core::distance_km;
///
/// let a = Coord { x: -79.38, y: 43.65 };
/// let b = Coord { x: -79.40, y: 43.66 };
/// let d = distance_km(a, b).expect("valid coordinates");
/// assert!((d - 1.956).abs() < 0.01);
/// ```
pub fn distance_km(a: Coord<f64>, b: Coord<f64>) -> Result<f64, GeoError> {
    Ok(haversine_km(check(a)?, check(b)?))
}

/// Haversine distance without input validation.
///
/// Callers must pass coordinates that already went through
/// [`validated_coord`]; domain records guarantee this at construction.
#[must_use]
pub fn haversine_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat_a = a.y.to_radians();
    let lat_b = b.y.to_radians();
    let d_lat = (b.y - a.y).to_radians();
    let d_lon = (b.x - a.x).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Mean position of `points`, weighted by each point's weight.
///
/// Negative or non-finite weights count as zero. When every weight is zero
/// the unweighted arithmetic mean is returned instead.
///
/// Means are taken directly in latitude/longitude space, which is accurate at
/// city scale; inputs straddling the antimeridian are not supported.
///
/// # Errors
/// [`GeoError::EmptyInput`] when `points` is empty and
/// [`GeoError::InvalidCoordinate`] for any invalid position.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use shelter_gap_core::weighted_centroid;
///
/// let centroid = weighted_centroid([
///     (Coord { x: 0.0, y: 0.0 }, 3.0),
///     (Coord { x: 4.0, y: 0.0 }, 1.0),
/// ])
/// .expect("non-empty");
/// assert_eq!(centroid, Coord { x: 1.0, y: 0.0 });
/// ```
pub fn weighted_centroid<I>(points: I) -> Result<Coord<f64>, GeoError>
where
    I: IntoIterator<Item = (Coord<f64>, f64)>,
{
    let mut count = 0_usize;
    let mut plain = Coord { x: 0.0, y: 0.0 };
    let mut weighted = Coord { x: 0.0, y: 0.0 };
    let mut total_weight = 0.0;

    for (coord, weight) in points {
        let coord = check(coord)?;
        let weight = if weight.is_finite() && weight > 0.0 {
            weight
        } else {
            0.0
        };
        count += 1;
        plain = plain + coord;
        weighted = weighted + coord * weight;
        total_weight += weight;
    }

    if count == 0 {
        return Err(GeoError::EmptyInput);
    }
    if total_weight > 0.0 {
        Ok(weighted / total_weight)
    } else {
        Ok(plain / count as f64)
    }
}

/// Local equirectangular projection to planar kilometres.
///
/// The projection is affine in latitude/longitude, so straight lines and
/// convex hulls survive the round trip. Distortion is negligible across a
/// single city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjection {
    origin: Coord<f64>,
    km_per_degree_lat: f64,
    km_per_degree_lon: f64,
}

impl LocalProjection {
    /// Build a projection centred on `origin`.
    #[must_use]
    pub fn centred_on(origin: Coord<f64>) -> Self {
        let km_per_degree_lat = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        let km_per_degree_lon = km_per_degree_lat * origin.y.to_radians().cos().max(1.0e-6);
        Self {
            origin,
            km_per_degree_lat,
            km_per_degree_lon,
        }
    }

    /// Build a projection centred on the bounding-box midpoint of `coords`.
    ///
    /// Returns `None` when `coords` is empty.
    pub fn fitting<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coord<f64>>,
    {
        let mut iter = coords.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), c| {
            (
                Coord {
                    x: min.x.min(c.x),
                    y: min.y.min(c.y),
                },
                Coord {
                    x: max.x.max(c.x),
                    y: max.y.max(c.y),
                },
            )
        });
        Some(Self::centred_on((min + max) / 2.0))
    }

    /// Project a coordinate to planar kilometres east/north of the origin.
    #[must_use]
    pub fn project(&self, coord: Coord<f64>) -> [f64; 2] {
        [
            (coord.x - self.origin.x) * self.km_per_degree_lon,
            (coord.y - self.origin.y) * self.km_per_degree_lat,
        ]
    }

    /// Inverse of [`LocalProjection::project`].
    #[must_use]
    pub fn unproject(&self, planar: [f64; 2]) -> Coord<f64> {
        let [east, north] = planar;
        Coord {
            x: self.origin.x + east / self.km_per_degree_lon,
            y: self.origin.y + north / self.km_per_degree_lat,
        }
    }
}
