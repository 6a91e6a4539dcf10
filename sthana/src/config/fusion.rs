//! Offset fusion section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Blending of corrections into the persistent map→odom offset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FusionSection {
    /// Weight of a new correction against the current offset
    #[serde(default = "defaults::update_gain")]
    pub update_gain: f64,

    /// Fraction of the remaining gap to `max_confidence` closed per correction
    #[serde(default = "defaults::confidence_gain")]
    pub confidence_gain: f64,

    /// Confidence ceiling
    #[serde(default = "defaults::max_confidence")]
    pub max_confidence: f64,
}

impl Default for FusionSection {
    fn default() -> Self {
        Self {
            update_gain: defaults::update_gain(),
            confidence_gain: defaults::confidence_gain(),
            max_confidence: defaults::max_confidence(),
        }
    }
}
