//! Configuration loading for Sthana.
//!
//! Loads all configuration from a single TOML file with defaults for every
//! missing key.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sthana::config::LocalizerConfig;
//!
//! // Load from default path (configs/sthana.toml)
//! let config = LocalizerConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = LocalizerConfig::default();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`FramesSection`] | Frame names, transform broadcast |
//! | [`MapSection`] | Downscaling and smoothing of incoming maps |
//! | [`OptimizerSection`] | Iterations, gain, damping |
//! | [`SearchSection`] | Random restarts, minimum scan size, seed |
//! | [`FusionSection`] | Offset blending and confidence growth |
//!
//! ## Example TOML
//!
//! ```toml
//! [frames]
//! broadcast_enabled = true
//! base_frame = "base_link"
//!
//! [map]
//! downscale_levels = 1    # 5cm map → 10cm grid
//! smoothing_iterations = 5
//!
//! [optimizer]
//! iterations = 20
//! damping = 1000.0
//!
//! [search]
//! sample_count = 10
//! seed = 7                # 0 = OS random
//! ```

mod defaults;
mod frames;
mod fusion;
mod localizer;
mod map;
mod optimizer;
mod search;

pub use localizer::LocalizerConfig;

pub use frames::FramesSection;
pub use fusion::FusionSection;
pub use map::MapSection;
pub use optimizer::OptimizerSection;
pub use search::SearchSection;
