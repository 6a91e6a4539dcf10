//! # Sthana
//!
//! Scan-matching localization of a mobile robot against a known 2D
//! occupancy map.
//!
//! ## Overview
//!
//! Each range scan is aligned against a smoothed likelihood field of the
//! map, starting from the odometry prediction plus a handful of random
//! restarts. The winning alignment is blended into a persistent map→odom
//! offset whose confidence grows with every accepted scan and shrinks the
//! random search radius.
//!
//! ## Features
//!
//! - **Likelihood Grid**: downscaling, box smoothing, bilinear sampling with gradient
//! - **Pose Optimizer**: Levenberg-Marquardt refinement, generic over `f32`/`f64`
//! - **Hypothesis Search**: confidence-scaled Gaussian restarts, seeded RNG
//! - **Offset Fusion**: exponential blending with bounded confidence
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sthana::{Localizer, LocalizerConfig, StaticTransforms};
//!
//! let localizer = Localizer::new(LocalizerConfig::default())?;
//! localizer.ingest_map(&occupancy_map)?;
//!
//! let correction = localizer.process_scan(&scan, &transforms)?;
//! if let Some(tf) = correction.published {
//!     println!("map→odom: ({:.2}, {:.2}, {:.2})", tf.x, tf.y, tf.yaw);
//! }
//! ```
//!
//! ## Coordinate System
//!
//! Uses ROS REP-103 convention:
//! - X: Forward (positive ahead of robot)
//! - Y: Left (positive to robot's left)
//! - Theta: Rotation in radians, CCW positive from +X axis

#![warn(missing_docs)]

// Core types and transform algebra
pub mod core;

// Likelihood grid and map ingestion
pub mod grid;

// Unified configuration
pub mod config;

// Pose optimizer and hypothesis search
pub mod matching;

// Localization engine and offset fusion
pub mod localization;

// Error types
pub mod error;

// Re-export commonly used types
pub use crate::core::{Pose2D, RangeScan, Scalar, ScanPoint, Transform3D};

pub use config::LocalizerConfig;
pub use error::{LocalizationError, Result, TransformUnavailable};
pub use grid::{LikelihoodGrid, OccupancyMap};
pub use localization::{
    Localizer, OffsetFusion, OffsetState, PoseEstimate, PublishedTransform, ScanCorrection,
    StaticTransforms, TransformProvider,
};
pub use matching::{HypothesisSearch, PoseOptimizer, SearchResult, SolverState};
