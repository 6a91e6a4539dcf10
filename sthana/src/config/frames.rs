//! Frame naming and broadcast section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Coordinate frame names and transform broadcast switch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FramesSection {
    /// Produce a map→odom transform after every accepted update
    #[serde(default = "defaults::enabled")]
    pub broadcast_enabled: bool,

    /// Robot base frame
    #[serde(default = "defaults::base_frame")]
    pub base_frame: String,

    /// Odometry frame
    #[serde(default = "defaults::odom_frame")]
    pub odom_frame: String,

    /// Fixed map frame; pose estimates must be expressed in it
    #[serde(default = "defaults::map_frame")]
    pub map_frame: String,
}

impl Default for FramesSection {
    fn default() -> Self {
        Self {
            broadcast_enabled: defaults::enabled(),
            base_frame: defaults::base_frame(),
            odom_frame: defaults::odom_frame(),
            map_frame: defaults::map_frame(),
        }
    }
}
