//! Weighted k-means primitives over planar kilometre coordinates.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

pub(crate) type Planar = [f64; 2];

#[expect(clippy::float_arithmetic, reason = "planar distance computation")]
pub(crate) fn squared_distance(a: Planar, b: Planar) -> f64 {
    let [ax, ay] = a;
    let [bx, by] = b;
    (ax - bx).powi(2) + (ay - by).powi(2)
}

/// Index of the centre closest to `point`; ties go to the lowest index.
fn nearest_centre(point: Planar, centres: &[Planar]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, centre) in centres.iter().enumerate() {
        let distance = squared_distance(point, *centre);
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

fn assign(points: &[Planar], centres: &[Planar]) -> Vec<usize> {
    points
        .iter()
        .map(|point| nearest_centre(*point, centres))
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
struct Moments {
    weighted: Planar,
    mass: f64,
    plain: Planar,
    count: u32,
}

impl Moments {
    #[expect(clippy::float_arithmetic, reason = "accumulating weighted sums")]
    fn add(&mut self, point: Planar, weight: f64) {
        let [x, y] = point;
        self.weighted[0] += x * weight;
        self.weighted[1] += y * weight;
        self.mass += weight;
        self.plain[0] += x;
        self.plain[1] += y;
        self.count += 1;
    }

    /// Weighted mean, or the plain mean when every member weighs zero.
    #[expect(clippy::float_arithmetic, reason = "computing means")]
    fn mean(&self) -> Option<Planar> {
        if self.count == 0 {
            return None;
        }
        if self.mass > 0.0 {
            let [x, y] = self.weighted;
            return Some([x / self.mass, y / self.mass]);
        }
        let n = f64::from(self.count);
        let [x, y] = self.plain;
        Some([x / n, y / n])
    }
}

fn recentre(points: &[Planar], weights: &[f64], assignment: &[usize], centres: &mut [Planar]) {
    let mut moments = vec![Moments::default(); centres.len()];
    for ((point, weight), slot) in points.iter().zip(weights).zip(assignment) {
        if let Some(m) = moments.get_mut(*slot) {
            m.add(*point, *weight);
        }
    }
    for (centre, m) in centres.iter_mut().zip(&moments) {
        if let Some(mean) = m.mean() {
            *centre = mean;
        }
    }
}

/// Drop centres without members and renumber the assignment to match.
fn compact(centres: &mut Vec<Planar>, assignment: &mut [usize]) {
    let mut used = vec![false; centres.len()];
    for slot in assignment.iter() {
        if let Some(flag) = used.get_mut(*slot) {
            *flag = true;
        }
    }
    let mut remap = vec![0; centres.len()];
    let mut kept = Vec::with_capacity(centres.len());
    for ((centre, flag), target) in centres.iter().zip(&used).zip(remap.iter_mut()) {
        if *flag {
            *target = kept.len();
            kept.push(*centre);
        }
    }
    for slot in assignment.iter_mut() {
        *slot = remap.get(*slot).copied().unwrap_or_default();
    }
    *centres = kept;
}

/// Run Lloyd iterations from the given centres until assignments settle.
///
/// Returns the final assignment; empty centres are removed from `centres`.
pub(crate) fn refine(
    points: &[Planar],
    weights: &[f64],
    centres: &mut Vec<Planar>,
    max_iterations: usize,
) -> Vec<usize> {
    let mut assignment = assign(points, centres);
    for _ in 0..max_iterations {
        recentre(points, weights, &assignment, centres);
        let next = assign(points, centres);
        if next == assignment {
            break;
        }
        assignment = next;
    }
    compact(centres, &mut assignment);
    assignment
}

/// Weighted k-means++ seeding.
///
/// The first centre is drawn with probability proportional to weight, each
/// later one proportional to weight times squared distance from the nearest
/// chosen centre. Zero-weight inputs fall back to unweighted draws. Fewer
/// than `k` centres are returned when every point already coincides with a
/// centre.
#[expect(clippy::float_arithmetic, reason = "k-means++ sampling scores")]
pub(crate) fn seed_centres<R: Rng>(
    points: &[Planar],
    weights: &[f64],
    k: usize,
    rng: &mut R,
) -> Vec<Planar> {
    let mut centres: Vec<Planar> = Vec::with_capacity(k);
    let first = draw(weights, rng).unwrap_or_else(|| rng.gen_range(0..points.len().max(1)));
    let Some(first_centre) = points.get(first) else {
        return centres;
    };
    centres.push(*first_centre);

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(*p, *first_centre))
        .collect();
    while centres.len() < k {
        let scores: Vec<f64> = nearest.iter().zip(weights).map(|(d, w)| d * w).collect();
        let Some(next) = draw(&scores, rng).or_else(|| draw(&nearest, rng)) else {
            break;
        };
        let Some(centre) = points.get(next).copied() else {
            break;
        };
        centres.push(centre);
        for (best, point) in nearest.iter_mut().zip(points) {
            *best = best.min(squared_distance(*point, centre));
        }
    }
    centres
}

fn draw<R: Rng>(scores: &[f64], rng: &mut R) -> Option<usize> {
    WeightedIndex::new(scores)
        .ok()
        .map(|distribution| distribution.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    fn two_blobs() -> (Vec<Planar>, Vec<f64>) {
        let points = vec![[0.0, 0.0], [0.1, 0.0], [0.0, 0.1], [10.0, 10.0], [10.1, 10.0]];
        let weights = vec![1.0; points.len()];
        (points, weights)
    }

    #[rstest]
    fn seeding_is_deterministic_for_a_seed() {
        let (points, weights) = two_blobs();
        let a = seed_centres(&points, &weights, 2, &mut ChaCha8Rng::seed_from_u64(7));
        let b = seed_centres(&points, &weights, 2, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[rstest]
    fn seeding_stops_when_points_are_exhausted() {
        let points = vec![[1.0, 1.0], [1.0, 1.0]];
        let weights = vec![0.0, 0.0];
        let centres = seed_centres(&points, &weights, 3, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(centres, vec![[1.0, 1.0]]);
    }

    #[rstest]
    fn refine_separates_blobs() {
        let (points, weights) = two_blobs();
        let mut centres = vec![[0.0, 0.0], [0.1, 0.0]];
        let assignment = refine(&points, &weights, &mut centres, 50);
        assert_eq!(assignment, vec![0, 0, 0, 1, 1]);
    }

    #[rstest]
    fn refine_drops_empty_centres() {
        let (points, weights) = two_blobs();
        let mut centres = vec![[0.0, 0.0], [100.0, 100.0], [10.0, 10.0]];
        let assignment = refine(&points, &weights, &mut centres, 50);
        assert_eq!(centres.len(), 2);
        assert_eq!(assignment, vec![0, 0, 0, 1, 1]);
    }
}
