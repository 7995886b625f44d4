//! Gap scoring and recommendation ranking for the shelter-gap engine.
//!
//! The crate provides the last two stages of an analysis run:
//! - **Gap scoring** measures how far each pressure area sits from existing
//!   shelter capacity. [`GapScorer`] indexes a shelter snapshot once and
//!   annotates every [`Cluster`](shelter_gap_core::Cluster) with member
//!   distances, a recommended site and a need score normalised against the
//!   neediest cluster of the run.
//! - **Ranking** attaches a [`Priority`](shelter_gap_core::Priority) to each
//!   scored cluster and orders the list by urgency. [`rank`] is the only
//!   place that order is decided.
//!
//! Need scores are relative: they are only comparable within one run.
//!
//! # Examples
//!
//! ```
//! use shelter_gap_core::{Cluster, DemandPoint, Priority, ShelterRecord, TierThresholds};
//! use shelter_gap_scorer::{GapScorer, rank};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let shelters = vec![ShelterRecord::new(
//!     "Queen St Hostel",
//!     "100 Queen St W",
//!     43.65,
//!     -79.38,
//!     Some(100.0),
//!     Some(98.0),
//! )?];
//! let cluster = Cluster::new(0, vec![DemandPoint::new("A", 43.66, -79.40, 90.0)?])?;
//!
//! let scored = GapScorer::new(&shelters).score(vec![cluster]);
//! let ranked = rank(scored, &TierThresholds::default());
//!
//! assert_eq!(ranked.len(), 1);
//! assert_eq!(ranked[0].need_score(), 100.0);
//! assert_eq!(ranked[0].priority, Priority::High);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod gap;
mod ranker;

pub use gap::{GapScorer, score_clusters};
pub use ranker::{compare_rank, rank};
