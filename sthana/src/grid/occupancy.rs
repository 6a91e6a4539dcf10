//! Occupancy map ingestion.
//!
//! Converts an external occupancy map (cells in [0, 100], negative for
//! unknown) into a [`LikelihoodGrid`] and records the grid→map transform
//! derived from the map origin.

use serde::{Deserialize, Serialize};

use crate::config::MapSection;
use crate::core::{Pose2D, Scalar, Transform3D};
use crate::error::{LocalizationError, Result};

use super::LikelihoodGrid;

/// Occupancy map as delivered by a map server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyMap {
    /// Frame the origin is expressed in
    pub frame_id: String,
    /// Columns
    pub width: usize,
    /// Rows
    pub height: usize,
    /// Cell edge length in meters
    pub resolution: f64,
    /// Pose of cell (0, 0)'s outer corner in the map frame
    pub origin: Pose2D,
    /// Row-major occupancy, `data[y·width + x]`: 0..=100, negative = unknown
    pub data: Vec<i8>,
}

impl OccupancyMap {
    /// Grid→map transform: the origin pose as a planar transform.
    pub fn grid_to_map(&self) -> Transform3D {
        Transform3D::from_pose2d(&self.origin)
    }

    /// Check shape, cell count and resolution.
    pub fn validate(&self) -> Result<()> {
        if self.width != self.height {
            return Err(LocalizationError::NonSquareMap {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self.width * self.height;
        if self.data.len() != expected {
            return Err(LocalizationError::MapDataMismatch {
                expected,
                actual: self.data.len(),
            });
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(LocalizationError::InvalidResolution(self.resolution));
        }
        Ok(())
    }
}

/// Likelihood of a single occupancy cell: `min(v/100, 1)`, unknown → 0.
#[inline]
pub fn occupancy_to_likelihood<T: Scalar>(value: i8) -> T {
    if value >= 0 {
        T::cast_from((value as f64 / 100.0).min(1.0))
    } else {
        T::zero()
    }
}

impl<T: Scalar> LikelihoodGrid<T> {
    /// Convert an occupancy map into a likelihood grid.
    pub fn from_occupancy_map(map: &OccupancyMap) -> Result<Self> {
        map.validate()?;
        let cells = map.data.iter().map(|&v| occupancy_to_likelihood(v)).collect();
        Self::from_cells(map.width, map.resolution, cells)
    }
}

/// Build a ready-to-match grid: convert, downscale, then smooth.
pub fn prepare_grid<T: Scalar>(map: &OccupancyMap, config: &MapSection) -> Result<LikelihoodGrid<T>> {
    let mut grid = LikelihoodGrid::<T>::from_occupancy_map(map).inspect_err(|e| {
        log::warn!("Rejecting map: {}", e);
    })?;

    for level in 0..config.downscale_levels {
        grid = grid.downscale().inspect_err(|e| {
            log::warn!("Downscale level {} failed: {}", level + 1, e);
        })?;
        log::debug!(
            "Downscaled map to {}x{} @ {:.3} m",
            grid.size(),
            grid.size(),
            grid.resolution()
        );
    }

    grid.smooth(config.smoothing_iterations);
    log::debug!(
        "Smoothed map with {} passes",
        config.smoothing_iterations
    );

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn map(width: usize, height: usize, data: Vec<i8>) -> OccupancyMap {
        OccupancyMap {
            frame_id: "map".to_string(),
            width,
            height,
            resolution: 0.05,
            origin: Pose2D::new(-1.0, -2.0, 0.0),
            data,
        }
    }

    #[test]
    fn test_cell_conversion() {
        assert_relative_eq!(occupancy_to_likelihood::<f32>(0), 0.0);
        assert_relative_eq!(occupancy_to_likelihood::<f32>(50), 0.5);
        assert_relative_eq!(occupancy_to_likelihood::<f32>(100), 1.0);
        assert_relative_eq!(occupancy_to_likelihood::<f32>(127), 1.0);
        assert_relative_eq!(occupancy_to_likelihood::<f32>(-1), 0.0);
    }

    #[test]
    fn test_from_occupancy_map_layout() {
        let grid = LikelihoodGrid::<f64>::from_occupancy_map(&map(2, 2, vec![0, 100, -1, 50])).unwrap();
        assert_eq!(grid.get(1, 0), Some(1.0));
        assert_eq!(grid.get(0, 1), Some(0.0));
        assert_eq!(grid.get(1, 1), Some(0.5));
    }

    #[test]
    fn test_rejects_non_square() {
        let err = LikelihoodGrid::<f32>::from_occupancy_map(&map(50, 60, vec![0; 3000])).unwrap_err();
        assert!(matches!(
            err,
            LocalizationError::NonSquareMap {
                width: 50,
                height: 60
            }
        ));
    }

    #[test]
    fn test_rejects_short_data() {
        let err = LikelihoodGrid::<f32>::from_occupancy_map(&map(4, 4, vec![0; 15])).unwrap_err();
        assert!(matches!(err, LocalizationError::MapDataMismatch { .. }));
    }

    #[test]
    fn test_rejects_bad_resolution() {
        let mut m = map(2, 2, vec![0; 4]);
        m.resolution = 0.0;
        assert!(matches!(
            m.validate(),
            Err(LocalizationError::InvalidResolution(_))
        ));
    }

    #[test]
    fn test_grid_to_map_is_origin() {
        let m = map(2, 2, vec![0; 4]);
        let p = m.grid_to_map().project();
        assert_relative_eq!(p.x, -1.0);
        assert_relative_eq!(p.y, -2.0);
    }

    #[test]
    fn test_prepare_downscales_and_smooths() {
        let m = map(8, 8, vec![100; 64]);
        let config = MapSection {
            downscale_levels: 2,
            smoothing_iterations: 3,
        };
        let grid: LikelihoodGrid<f32> = prepare_grid(&m, &config).unwrap();
        assert_eq!(grid.size(), 2);
        assert_relative_eq!(grid.resolution(), 0.2);
        assert_relative_eq!(grid.mean(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_prepare_too_many_levels() {
        let m = map(2, 2, vec![0; 4]);
        let config = MapSection {
            downscale_levels: 3,
            smoothing_iterations: 0,
        };
        assert!(prepare_grid::<f32>(&m, &config).is_err());
    }
}
