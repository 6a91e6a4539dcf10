//! Core data types for localization.
//!
//! - [`Pose2D`]: planar pose (x, y, theta) in meters and radians
//! - [`RangeScan`]: planar range scan in polar coordinates
//! - [`ScanPoint`]: weighted scan return in the robot base frame

mod pose;
mod scan;

pub use pose::Pose2D;
pub use scan::{RangeScan, ScanPoint};
