use serde::{Deserialize, Serialize};

/// Tunables for the dataset normaliser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Weight given to demand rows without one.
    pub default_weight: f64,
    /// Factor applied to parsed weights before clamping into `0..=100`.
    pub weight_multiplier: f64,
    /// Positions of one identity further apart than this are a conflict.
    pub conflict_tolerance_km: f64,
    /// City suffix tried when matching addresses against the geocode cache,
    /// for example `"Toronto, ON"`.
    pub city_suffix: Option<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            default_weight: 1.0,
            weight_multiplier: 1.0,
            conflict_tolerance_km: 0.05,
            city_suffix: None,
        }
    }
}
