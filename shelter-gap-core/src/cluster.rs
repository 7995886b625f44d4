//! Pressure-area clusters and the clustering seam.
//!
//! A [`Cluster`] owns a non-empty set of [`DemandPoint`]s together with the
//! derived centroid and boundary polygon. The [`Clusterer`] trait abstracts
//! the algorithm that partitions a demand dataset into clusters.

use std::f64::consts::PI;

use geo::{Area, ConvexHull, Coord, Intersects, LineString, MultiPoint, Point, Polygon};
use thiserror::Error;

use crate::{DemandPoint, LocalProjection, weighted_centroid};

/// Margin added around degenerate boundaries.
pub const BOUNDARY_PADDING_KM: f64 = 0.25;

const CIRCLE_VERTICES: u32 = 24;
// Hull areas below this (in square degrees, about 0.01 m²) count as flat.
const DEGENERATE_AREA: f64 = 1.0e-12;

/// Errors raised while building or computing clusters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// Clustering was invoked without any demand points.
    #[error("clustering requires at least one demand point")]
    EmptyInput,
    /// A cluster was built without members.
    #[error("cluster {id} has no members")]
    EmptyCluster {
        /// Identifier of the rejected cluster.
        id: usize,
    },
    /// A clustering parameter was unusable.
    #[error("invalid clustering parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// A spatially coherent group of demand points.
///
/// # Examples
/// ```
/// use shelter_gap_core::{Cluster, DemandPoint};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let members = vec![
///     DemandPoint::new("A", 43.66, -79.40, 90.0)?,
///     DemandPoint::new("B", 43.67, -79.41, 30.0)?,
/// ];
/// let cluster = Cluster::new(0, members)?;
/// assert_eq!(cluster.population_weighted(), 120.0);
/// assert_eq!(cluster.avg_severity_index(), 60.0);
/// assert!(cluster.members().iter().all(|m| cluster.encloses(m.location())));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    id: usize,
    members: Vec<DemandPoint>,
    centroid: Coord<f64>,
    boundary: Polygon<f64>,
}

impl Cluster {
    /// Build a cluster, deriving its weighted centroid and boundary.
    pub fn new(id: usize, members: Vec<DemandPoint>) -> Result<Self, ClusterError> {
        let centroid = weighted_centroid(members.iter().map(|m| (m.location(), m.weight())))
            .map_err(|_| ClusterError::EmptyCluster { id })?;
        let positions: Vec<Coord<f64>> = members.iter().map(DemandPoint::location).collect();
        let boundary = cluster_boundary(&positions, centroid);
        Ok(Self {
            id,
            members,
            centroid,
            boundary,
        })
    }

    /// Identifier, stable within one analysis run.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Member points in input order.
    pub fn members(&self) -> &[DemandPoint] {
        &self.members
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; clusters cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Severity-weighted mean position of the members.
    pub fn centroid(&self) -> Coord<f64> {
        self.centroid
    }

    /// Closed polygon enclosing every member.
    pub fn boundary(&self) -> &Polygon<f64> {
        &self.boundary
    }

    /// Boundary ring as ordered `[lat, lon]` pairs, first vertex repeated last.
    pub fn boundary_lat_lon(&self) -> Vec<[f64; 2]> {
        self.boundary
            .exterior()
            .coords()
            .map(|c| [c.y, c.x])
            .collect()
    }

    /// Sum of member weights.
    pub fn population_weighted(&self) -> f64 {
        self.members.iter().map(DemandPoint::weight).sum()
    }

    /// Mean of member weights.
    pub fn avg_severity_index(&self) -> f64 {
        self.population_weighted() / self.members.len().max(1) as f64
    }

    /// Whether `coord` lies inside or on the boundary.
    pub fn encloses(&self, coord: Coord<f64>) -> bool {
        self.boundary.intersects(&Point::from(coord))
    }
}

/// Partition demand points into pressure areas.
///
/// Implementations must:
/// - place every input point in exactly one cluster,
/// - return the same clusters for the same input and configuration,
/// - return [`ClusterError::EmptyInput`] when `points` is empty.
///
/// Implementations must be `Send + Sync` so one configured clusterer can be
/// shared between concurrent runs.
///
/// # Examples
/// ```
/// use shelter_gap_core::{Cluster, ClusterError, Clusterer, DemandPoint};
///
/// struct OneBigCluster;
///
/// impl Clusterer for OneBigCluster {
///     fn cluster(&self, points: &[DemandPoint]) -> Result<Vec<Cluster>, ClusterError> {
///         if points.is_empty() {
///             return Err(ClusterError::EmptyInput);
///         }
///         Ok(vec![Cluster::new(0, points.to_vec())?])
///     }
/// }
///
/// let point = DemandPoint::new("A", 43.66, -79.40, 90.0).expect("valid");
/// let clusters = OneBigCluster.cluster(&[point]).expect("clusters");
/// assert_eq!(clusters.len(), 1);
/// ```
pub trait Clusterer: Send + Sync {
    /// Group `points` into clusters.
    fn cluster(&self, points: &[DemandPoint]) -> Result<Vec<Cluster>, ClusterError>;
}

/// Boundary polygon for a set of member positions.
///
/// Uses the convex hull of the positions. Flat hulls (one or two distinct
/// positions, or collinear members) are replaced by a polygon circumscribing
/// a circle around `centroid` that reaches [`BOUNDARY_PADDING_KM`] beyond the
/// farthest member.
pub fn cluster_boundary(positions: &[Coord<f64>], centroid: Coord<f64>) -> Polygon<f64> {
    let hull = MultiPoint::new(positions.iter().copied().map(Point::from).collect()).convex_hull();
    if hull.unsigned_area() > DEGENERATE_AREA {
        return hull;
    }
    padded_circle(positions, centroid)
}

fn padded_circle(positions: &[Coord<f64>], centroid: Coord<f64>) -> Polygon<f64> {
    let projection = LocalProjection::centred_on(centroid);
    let reach = positions
        .iter()
        .map(|c| {
            let [east, north] = projection.project(*c);
            east.hypot(north)
        })
        .fold(0.0_f64, f64::max);
    let step = 2.0 * PI / f64::from(CIRCLE_VERTICES);
    // Scale so the polygon's inscribed circle has the padded radius.
    let radius = (reach + BOUNDARY_PADDING_KM) / (step / 2.0).cos();
    let ring: Vec<Coord<f64>> = (0..CIRCLE_VERTICES)
        .map(|k| {
            let angle = step * f64::from(k);
            projection.unproject([radius * angle.cos(), radius * angle.sin()])
        })
        .collect();
    Polygon::new(LineString::from(ring), Vec::new())
}
