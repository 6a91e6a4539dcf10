//! Error types for the localization engine.

use thiserror::Error;

/// A rigid transform could not be resolved by the transform provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no transform from '{source_frame}' to '{target_frame}': {reason}")]
pub struct TransformUnavailable {
    /// Frame the result maps into
    pub target_frame: String,
    /// Frame the result maps from
    pub source_frame: String,
    /// Provider-specific explanation
    pub reason: String,
}

impl TransformUnavailable {
    /// Create a new lookup failure.
    pub fn new(
        target_frame: impl Into<String>,
        source_frame: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            target_frame: target_frame.into(),
            source_frame: source_frame.into(),
            reason: reason.into(),
        }
    }
}

/// Localization error type.
#[derive(Error, Debug)]
pub enum LocalizationError {
    /// No occupancy map has been ingested yet
    #[error("no map received yet")]
    NoMap,

    /// A required frame transform is missing
    #[error(transparent)]
    TransformUnavailable(#[from] TransformUnavailable),

    /// Too few valid scan points to constrain the pose
    #[error("scan has {found} valid points, need at least {required}")]
    InsufficientPoints {
        /// Valid points in the scan
        found: usize,
        /// Configured minimum
        required: usize,
    },

    /// Occupancy map is not square
    #[error("map must be square, got {width}x{height}")]
    NonSquareMap {
        /// Columns
        width: usize,
        /// Rows
        height: usize,
    },

    /// Occupancy map cell count does not match its dimensions
    #[error("map data has {actual} cells, expected {expected}")]
    MapDataMismatch {
        /// width × height
        expected: usize,
        /// Cells supplied
        actual: usize,
    },

    /// Grid resolution is not a positive finite number
    #[error("invalid grid resolution {0}")]
    InvalidResolution(f64),

    /// Grid would have no cells
    #[error("grid of size {0} is too small")]
    GridTooSmall(usize),

    /// Pose estimate expressed in a frame other than the map frame
    #[error("pose estimate in frame '{found}', expected '{expected}'")]
    WrongFrame {
        /// Configured map frame
        expected: String,
        /// Frame of the estimate
        found: String,
    },

    /// I/O error while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for localization operations.
pub type Result<T> = std::result::Result<T, LocalizationError>;
