//! Localization engine.
//!
//! - [`Localizer`]: shared-state engine wiring scans, maps and pose estimates
//! - [`OffsetFusion`]: confidence-weighted map→odom offset filter
//! - [`TransformProvider`]: frame lookups consumed by the engine

mod fusion;
mod localizer;
mod transforms;

pub use fusion::{OffsetFusion, OffsetState};
pub use localizer::{Localizer, ScanCorrection};
pub use transforms::{PoseEstimate, PublishedTransform, StaticTransforms, TransformProvider};
