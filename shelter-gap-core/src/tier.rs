//! The shared five-tier threshold table.
//!
//! Per-point severity levels and per-cluster priorities both bucket a
//! `0..=100` score into five tiers. They share one [`TierThresholds`] shape
//! so presentation code and the engine cannot drift apart; priorities may
//! use an overridden table while severity always uses the default.
//!
//! # Examples
//! ```
//! use shelter_gap_core::{Priority, SeverityLevel, TierThresholds};
//!
//! let table = TierThresholds::default();
//! assert_eq!(SeverityLevel::classify(85.0), SeverityLevel::Critical);
//! assert_eq!(Priority::classify(65.0, &table), Priority::MediumHigh);
//! assert_eq!(Priority::MediumHigh.as_str(), "MEDIUM-HIGH");
//! ```

use std::fmt;

use thiserror::Error;

/// Position of a value within a [`TierThresholds`] table, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// At or above `top`.
    Top,
    /// At or above `upper`.
    Upper,
    /// At or above `middle`.
    Middle,
    /// At or above `lower`.
    Lower,
    /// Below `lower`, or not a number.
    Bottom,
}

/// Lower bounds of the four upper tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierThresholds {
    top: f64,
    upper: f64,
    middle: f64,
    lower: f64,
}

/// Errors returned by [`TierThresholds::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ThresholdError {
    /// A bound was NaN or infinite.
    #[error("tier thresholds must be finite")]
    NonFinite,
    /// The bounds were not in non-increasing order.
    #[error("tier thresholds must be non-increasing (top >= upper >= middle >= lower)")]
    Unordered,
}

impl TierThresholds {
    /// The documented defaults: 80, 60, 40, 20.
    pub const DEFAULT: Self = Self {
        top: 80.0,
        upper: 60.0,
        middle: 40.0,
        lower: 20.0,
    };

    /// Validate and build a table from its four lower bounds.
    pub fn new(top: f64, upper: f64, middle: f64, lower: f64) -> Result<Self, ThresholdError> {
        let bounds = [top, upper, middle, lower];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(ThresholdError::NonFinite);
        }
        if bounds.windows(2).any(|pair| pair[0] < pair[1]) {
            return Err(ThresholdError::Unordered);
        }
        Ok(Self {
            top,
            upper,
            middle,
            lower,
        })
    }

    /// Build a table from a slice of exactly four bounds.
    ///
    /// Returns `None` when the slice has the wrong length.
    pub fn from_slice(bounds: &[f64]) -> Option<Result<Self, ThresholdError>> {
        match bounds {
            [top, upper, middle, lower] => Some(Self::new(*top, *upper, *middle, *lower)),
            _ => None,
        }
    }

    /// The four bounds, highest first.
    pub fn bounds(&self) -> [f64; 4] {
        [self.top, self.upper, self.middle, self.lower]
    }

    /// Place `value` in a tier. Non-finite values land in [`Tier::Bottom`].
    pub fn tier(&self, value: f64) -> Tier {
        if !value.is_finite() {
            Tier::Bottom
        } else if value >= self.top {
            Tier::Top
        } else if value >= self.upper {
            Tier::Upper
        } else if value >= self.middle {
            Tier::Middle
        } else if value >= self.lower {
            Tier::Lower
        } else {
            Tier::Bottom
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-point severity, derived from a demand point's weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SeverityLevel {
    /// Weight of 80 or more.
    Critical,
    /// Weight from 60 up to 80.
    High,
    /// Weight from 40 up to 60.
    Moderate,
    /// Weight from 20 up to 40.
    Low,
    /// Weight below 20.
    Minimal,
}

impl SeverityLevel {
    /// Classify a weight with the default table.
    pub fn classify(weight: f64) -> Self {
        match TierThresholds::DEFAULT.tier(weight) {
            Tier::Top => Self::Critical,
            Tier::Upper => Self::High,
            Tier::Middle => Self::Moderate,
            Tier::Lower => Self::Low,
            Tier::Bottom => Self::Minimal,
        }
    }

    /// The wire name of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Moderate => "MODERATE",
            Self::Low => "LOW",
            Self::Minimal => "MINIMAL",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Siting priority, derived from a cluster's need score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    /// Need score in the top tier.
    #[cfg_attr(feature = "serde", serde(rename = "HIGH"))]
    High,
    /// Need score in the upper tier.
    #[cfg_attr(feature = "serde", serde(rename = "MEDIUM-HIGH"))]
    MediumHigh,
    /// Need score in the middle tier.
    #[cfg_attr(feature = "serde", serde(rename = "MEDIUM"))]
    Medium,
    /// Need score in the lower tier.
    #[cfg_attr(feature = "serde", serde(rename = "MEDIUM-LOW"))]
    MediumLow,
    /// Need score in the bottom tier.
    #[cfg_attr(feature = "serde", serde(rename = "LOW"))]
    Low,
}

impl Priority {
    /// Classify a need score against `thresholds`.
    pub fn classify(need_score: f64, thresholds: &TierThresholds) -> Self {
        match thresholds.tier(need_score) {
            Tier::Top => Self::High,
            Tier::Upper => Self::MediumHigh,
            Tier::Middle => Self::Medium,
            Tier::Lower => Self::MediumLow,
            Tier::Bottom => Self::Low,
        }
    }

    /// The wire name of the priority.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::MediumHigh => "MEDIUM-HIGH",
            Self::Medium => "MEDIUM",
            Self::MediumLow => "MEDIUM-LOW",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, SeverityLevel::Critical)]
    #[case(80.0, SeverityLevel::Critical)]
    #[case(79.9, SeverityLevel::High)]
    #[case(60.0, SeverityLevel::High)]
    #[case(59.99, SeverityLevel::Moderate)]
    #[case(40.0, SeverityLevel::Moderate)]
    #[case(20.0, SeverityLevel::Low)]
    #[case(19.5, SeverityLevel::Minimal)]
    #[case(0.0, SeverityLevel::Minimal)]
    #[case(f64::NAN, SeverityLevel::Minimal)]
    fn severity_follows_default_table(#[case] weight: f64, #[case] expected: SeverityLevel) {
        assert_eq!(SeverityLevel::classify(weight), expected);
    }

    #[rstest]
    #[case(100.0, Priority::High)]
    #[case(79.0, Priority::MediumHigh)]
    #[case(40.0, Priority::Medium)]
    #[case(39.0, Priority::MediumLow)]
    #[case(0.0, Priority::Low)]
    fn priority_follows_default_table(#[case] score: f64, #[case] expected: Priority) {
        assert_eq!(Priority::classify(score, &TierThresholds::default()), expected);
    }

    #[rstest]
    fn priority_table_is_independently_configurable() {
        let table = TierThresholds::new(90.0, 70.0, 50.0, 30.0).expect("ordered bounds");
        assert_eq!(Priority::classify(85.0, &table), Priority::MediumHigh);
        assert_eq!(SeverityLevel::classify(85.0), SeverityLevel::Critical);
    }

    #[rstest]
    fn unordered_bounds_are_rejected() {
        assert_eq!(
            TierThresholds::new(20.0, 40.0, 60.0, 80.0),
            Err(ThresholdError::Unordered)
        );
        assert_eq!(
            TierThresholds::new(f64::NAN, 40.0, 30.0, 20.0),
            Err(ThresholdError::NonFinite)
        );
    }

    #[rstest]
    fn from_slice_requires_four_bounds() {
        assert!(TierThresholds::from_slice(&[80.0, 60.0]).is_none());
        assert_eq!(
            TierThresholds::from_slice(&[80.0, 60.0, 40.0, 20.0]),
            Some(Ok(TierThresholds::DEFAULT))
        );
    }

    #[rstest]
    fn wire_names_match_display() {
        assert_eq!(Priority::MediumLow.to_string(), "MEDIUM-LOW");
        assert_eq!(SeverityLevel::Moderate.to_string(), "MODERATE");
    }
}
