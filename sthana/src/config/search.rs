//! Hypothesis search section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Random restart parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchSection {
    /// Perturbed hypotheses tried per scan, in addition to the prediction
    #[serde(default = "defaults::sample_count")]
    pub sample_count: usize,

    /// Std-dev of the x perturbation at zero confidence (meters)
    #[serde(default = "defaults::sample_std_xy")]
    pub sample_std_x: f64,

    /// Std-dev of the y perturbation at zero confidence (meters)
    #[serde(default = "defaults::sample_std_xy")]
    pub sample_std_y: f64,

    /// Std-dev of the yaw perturbation at zero confidence (radians)
    #[serde(default = "defaults::sample_std_yaw")]
    pub sample_std_yaw: f64,

    /// Scans with fewer valid points are skipped
    #[serde(default = "defaults::min_scan_points")]
    pub min_scan_points: usize,

    /// RNG seed; 0 draws one from the OS
    #[serde(default)]
    pub seed: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            sample_count: defaults::sample_count(),
            sample_std_x: defaults::sample_std_xy(),
            sample_std_y: defaults::sample_std_xy(),
            sample_std_yaw: defaults::sample_std_yaw(),
            min_scan_points: defaults::min_scan_points(),
            seed: 0,
        }
    }
}
