//! Exact nearest-shelter lookup backed by an R\*-tree.
//!
//! Shelters are indexed as unit vectors on the sphere. Chord length between
//! unit vectors grows monotonically with great-circle distance, so the
//! Euclidean nearest neighbour in the tree is also the great-circle nearest
//! shelter. The reported distance is recomputed with [`haversine_km`].

use geo::Coord;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::{ShelterRecord, haversine_km};

type IndexedShelter = GeomWithData<[f64; 3], usize>;

/// The closest shelter to a query position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestShelter {
    /// Position of the shelter in the slice the index was built from.
    pub index: usize,
    /// Great-circle distance to the shelter in kilometres.
    pub distance_km: f64,
}

/// Read-only spatial index over a shelter snapshot.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use shelter_gap_core::{ShelterIndex, ShelterRecord};
///
/// # fn main() -> Result<(), shelter_gap_core::ShelterRecordError> {
/// let shelters = vec![
///     ShelterRecord::new("North", "", 43.70, -79.40, None, None)?,
///     ShelterRecord::new("South", "", 43.60, -79.40, None, None)?,
/// ];
/// let index = ShelterIndex::new(&shelters);
/// let nearest = index.nearest(Coord { x: -79.40, y: 43.62 }).expect("non-empty");
/// assert_eq!(nearest.index, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ShelterIndex {
    tree: RTree<IndexedShelter>,
    positions: Vec<Coord<f64>>,
}

impl ShelterIndex {
    /// Bulk-load an index over `shelters`.
    #[must_use]
    pub fn new(shelters: &[ShelterRecord]) -> Self {
        let positions: Vec<Coord<f64>> = shelters.iter().map(ShelterRecord::location).collect();
        let entries = positions
            .iter()
            .enumerate()
            .map(|(i, c)| GeomWithData::new(unit_vector(*c), i))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
            positions,
        }
    }

    /// Number of indexed shelters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the index holds no shelters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Closest shelter to `coord`, or `None` when the index is empty.
    #[must_use]
    pub fn nearest(&self, coord: Coord<f64>) -> Option<NearestShelter> {
        let hit = self.tree.nearest_neighbor(&unit_vector(coord))?;
        let shelter = self.positions.get(hit.data)?;
        Some(NearestShelter {
            index: hit.data,
            distance_km: haversine_km(coord, *shelter),
        })
    }
}

fn unit_vector(coord: Coord<f64>) -> [f64; 3] {
    let lat = coord.y.to_radians();
    let lon = coord.x.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}
