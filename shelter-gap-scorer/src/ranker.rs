//! Priority assignment and the final recommendation order.

use std::cmp::Ordering;

use log::info;
use shelter_gap_core::{Priority, Recommendation, ScoredCluster, TierThresholds};

/// Order two scored clusters by urgency.
///
/// Higher need scores come first; ties fall back to the larger weighted
/// population, then to the smaller cluster identifier. The order is total,
/// so sorting with it is fully deterministic.
#[must_use]
pub fn compare_rank(a: &ScoredCluster, b: &ScoredCluster) -> Ordering {
    b.need_score
        .total_cmp(&a.need_score)
        .then_with(|| b.population_weighted().total_cmp(&a.population_weighted()))
        .then_with(|| a.cluster_id().cmp(&b.cluster_id()))
}

/// Attach priorities to `scored` and sort it into recommendation order.
///
/// The first element is the most urgent siting recommendation.
///
/// # Examples
/// ```
/// use shelter_gap_core::TierThresholds;
/// use shelter_gap_scorer::rank;
///
/// assert!(rank(Vec::new(), &TierThresholds::default()).is_empty());
/// ```
#[must_use]
pub fn rank(mut scored: Vec<ScoredCluster>, thresholds: &TierThresholds) -> Vec<Recommendation> {
    scored.sort_by(compare_rank);
    let recommendations: Vec<Recommendation> = scored
        .into_iter()
        .map(|scored| {
            let priority = Priority::classify(scored.need_score, thresholds);
            Recommendation { scored, priority }
        })
        .collect();
    if let Some(top) = recommendations.first() {
        info!(
            "ranked {} recommendations; top is cluster {} ({}, need {:.1})",
            recommendations.len(),
            top.cluster_id(),
            top.priority,
            top.need_score()
        );
    }
    recommendations
}
