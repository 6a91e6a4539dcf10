//! Pose optimizer section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Damped least-squares refinement parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSection {
    /// Refinement steps per hypothesis
    #[serde(default = "defaults::optimizer_iterations")]
    pub iterations: usize,

    /// Step scale applied to each solved update
    #[serde(default = "defaults::optimizer_gain")]
    pub gain: f64,

    /// Levenberg-Marquardt diagonal damping
    #[serde(default = "defaults::optimizer_damping")]
    pub damping: f64,
}

impl Default for OptimizerSection {
    fn default() -> Self {
        Self {
            iterations: defaults::optimizer_iterations(),
            gain: defaults::optimizer_gain(),
            damping: defaults::optimizer_damping(),
        }
    }
}
