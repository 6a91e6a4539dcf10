//! Core foundation layer.
//!
//! Bottom layer of the localization stack with no internal dependencies.
//!
//! # Contents
//!
//! - [`types`]: poses, range scans, scan points
//! - [`math`]: angle wrapping, the [`math::Scalar`] precision trait, 3x3 solve
//! - [`transform`]: homogeneous 4x4 transforms for frame chains

pub mod math;
pub mod transform;
pub mod types;

pub use math::Scalar;
pub use transform::Transform3D;
pub use types::{Pose2D, RangeScan, ScanPoint};
