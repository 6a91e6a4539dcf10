//! Map preparation section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// How an incoming occupancy map is turned into a likelihood grid
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSection {
    /// Number of 2× downscaling passes
    #[serde(default = "defaults::downscale_levels")]
    pub downscale_levels: usize,

    /// Number of 3×3 box smoothing passes
    #[serde(default = "defaults::smoothing_iterations")]
    pub smoothing_iterations: usize,
}

impl Default for MapSection {
    fn default() -> Self {
        Self {
            downscale_levels: defaults::downscale_levels(),
            smoothing_iterations: defaults::smoothing_iterations(),
        }
    }
}
