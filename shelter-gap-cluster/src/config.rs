use shelter_gap_core::ClusterError;

/// Configuration for [`KMeansClusterer`](crate::KMeansClusterer).
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    /// Number of clusters to seed before radius splitting.
    pub target_clusters: usize,
    /// Largest allowed great-circle distance from a member to its cluster
    /// centroid. `None` disables splitting.
    pub max_radius_km: Option<f64>,
    /// Seed for k-means++ initialisation.
    pub seed: u64,
    /// Upper bound on Lloyd iterations per refinement.
    pub max_iterations: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            target_clusters: 5,
            max_radius_km: Some(3.0),
            seed: 42,
            max_iterations: 100,
        }
    }
}

impl ClusterConfig {
    /// Reject parameters the clusterer cannot honour.
    pub fn validate(&self) -> Result<(), ClusterError> {
        if self.target_clusters == 0 {
            return Err(ClusterError::InvalidParameter {
                name: "target_clusters",
                reason: "must be at least 1",
            });
        }
        if self.max_iterations == 0 {
            return Err(ClusterError::InvalidParameter {
                name: "max_iterations",
                reason: "must be at least 1",
            });
        }
        if let Some(radius) = self.max_radius_km
            && !(radius.is_finite() && radius > 0.0)
        {
            return Err(ClusterError::InvalidParameter {
                name: "max_radius_km",
                reason: "must be finite and positive",
            });
        }
        Ok(())
    }
}
