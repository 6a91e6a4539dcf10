//! Scan-matching localizer against a known occupancy map.
//!
//! # Pipeline
//!
//! ```text
//! RangeScan + sensor→base + base→odom
//!       │
//!       ▼
//! ┌──────────────────┐
//! │ Frame chain      │  guess = grid←map · map←odom · odom←base
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ Hypothesis search│  refine prediction + random restarts
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ Offset fusion    │  map←odom = map←grid · best · base←odom, blended
//! └────────┬─────────┘
//!          │
//!          ▼
//!   PublishedTransform (map→odom)
//! ```
//!
//! # Concurrency
//!
//! All mutable state sits behind one mutex. Map ingestion prepares the new
//! grid outside the lock and only swaps the `Arc` under it, so a scan cycle
//! in flight keeps matching against the grid it started with.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::LocalizerConfig;
use crate::core::{Pose2D, RangeScan, Transform3D};
use crate::error::{LocalizationError, Result};
use crate::grid::{LikelihoodGrid, OccupancyMap, prepare_grid};
use crate::matching::{HypothesisSearch, SearchResult};

use super::fusion::{OffsetFusion, OffsetState};
use super::transforms::{PoseEstimate, PublishedTransform, TransformProvider};

/// Outcome of an accepted scan cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanCorrection {
    /// Odometry-predicted base pose in the grid frame
    pub predicted_pose: Pose2D,
    /// Search result in the grid frame
    pub search: SearchResult,
    /// Offset implied by this scan alone, before blending
    pub measured_offset: Pose2D,
    /// Offset after blending
    pub offset: OffsetState,
    /// Valid scan points used
    pub points_used: usize,
    /// map→odom transform to publish, when broadcasting is enabled
    pub published: Option<PublishedTransform>,
}

struct LocalizerState {
    grid: Option<Arc<LikelihoodGrid>>,
    grid_to_map: Transform3D,
    fusion: OffsetFusion,
    search: HypothesisSearch,
}

/// Localization engine. `Send + Sync`; share it through an `Arc`.
pub struct Localizer {
    config: LocalizerConfig,
    state: Mutex<LocalizerState>,
}

impl Localizer {
    /// Create a localizer with a zero offset and no map.
    pub fn new(config: LocalizerConfig) -> Result<Self> {
        config.validate()?;
        let state = LocalizerState {
            grid: None,
            grid_to_map: Transform3D::identity(),
            fusion: OffsetFusion::new(config.fusion.clone()),
            search: HypothesisSearch::new(config.optimizer.clone(), config.search.clone()),
        };
        Ok(Self {
            config,
            state: Mutex::new(state),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &LocalizerConfig {
        &self.config
    }

    /// True once a map has been ingested.
    pub fn has_map(&self) -> bool {
        self.state.lock().grid.is_some()
    }

    /// Snapshot of the active grid.
    pub fn grid(&self) -> Option<Arc<LikelihoodGrid>> {
        self.state.lock().grid.clone()
    }

    /// Grid→map transform of the active map.
    pub fn grid_to_map(&self) -> Transform3D {
        self.state.lock().grid_to_map
    }

    /// Current offset and confidence.
    pub fn offset(&self) -> OffsetState {
        *self.state.lock().fusion.state()
    }

    /// Current confidence.
    pub fn confidence(&self) -> f64 {
        self.state.lock().fusion.confidence()
    }

    /// Latest map→odom transform, when broadcasting is enabled.
    ///
    /// `None` until a scan or pose estimate has stamped the offset.
    pub fn published_transform(&self) -> Option<PublishedTransform> {
        let offset = self.offset();
        if offset.timestamp_us == 0 {
            return None;
        }
        self.publish(&offset)
    }

    /// Replace the active map.
    ///
    /// The map is validated, converted, downscaled and smoothed before the
    /// lock is taken. On success the grid and grid→map transform are
    /// swapped in and confidence drops to zero; on failure nothing changes.
    pub fn ingest_map(&self, map: &OccupancyMap) -> Result<Arc<LikelihoodGrid>> {
        log::info!(
            "Received map {}x{} @ {:.3} m in '{}'",
            map.width,
            map.height,
            map.resolution,
            map.frame_id
        );

        let grid = Arc::new(prepare_grid::<f32>(map, &self.config.map)?);
        let grid_to_map = map.grid_to_map();

        {
            let mut state = self.state.lock();
            state.grid = Some(Arc::clone(&grid));
            state.grid_to_map = grid_to_map;
            state.fusion.reset_confidence();
        }

        log::info!(
            "Map ready: {}x{} cells @ {:.3} m, confidence reset",
            grid.size(),
            grid.size(),
            grid.resolution()
        );
        Ok(grid)
    }

    /// Align one scan against the map and update the offset.
    ///
    /// Skips (returning an error, state untouched) when no map is loaded, a
    /// transform is missing, or too few valid ranges remain.
    pub fn process_scan(
        &self,
        scan: &RangeScan,
        transforms: &dyn TransformProvider,
    ) -> Result<ScanCorrection> {
        let frames = &self.config.frames;
        let mut guard = self.state.lock();
        let LocalizerState {
            grid,
            grid_to_map,
            fusion,
            search,
        } = &mut *guard;

        let Some(grid) = grid.clone() else {
            log::warn!("No map yet, skipping scan");
            return Err(LocalizationError::NoMap);
        };

        let sensor_to_base = transforms
            .lookup(&frames.base_frame, &scan.frame_id, Some(scan.timestamp_us))
            .inspect_err(|e| log::warn!("Skipping scan: {}", e))?;
        let base_to_odom = transforms
            .lookup(&frames.odom_frame, &frames.base_frame, Some(scan.timestamp_us))
            .inspect_err(|e| log::warn!("Skipping scan: {}", e))?
            .to_planar();

        let points = scan.project_points(&sensor_to_base);
        let required = self.config.search.min_scan_points;
        if points.len() < required {
            log::warn!(
                "Skipping scan: {} valid points, need {}",
                points.len(),
                required
            );
            return Err(LocalizationError::InsufficientPoints {
                found: points.len(),
                required,
            });
        }

        let odom_to_map = fusion.state().to_transform();
        let predicted_pose = (grid_to_map.invert_rigid() * odom_to_map * base_to_odom).project();

        let result = search.search(&*grid, &points, predicted_pose, fusion.confidence());

        let measured_offset =
            (*grid_to_map * Transform3D::from_pose2d(&result.pose) * base_to_odom.invert_rigid())
                .project();
        fusion.apply_correction(
            &measured_offset,
            scan.timestamp_us,
            self.config.fusion.update_gain,
        );
        let offset = *fusion.state();
        drop(guard);

        log::info!(
            "Scan matched: residual={:.4} confidence={:.3} offset=({:.3}, {:.3}, {:.3}) [{}/{} samples improved]",
            result.residual_norm,
            offset.confidence,
            offset.x,
            offset.y,
            offset.yaw,
            result.improvements,
            result.samples_evaluated
        );

        Ok(ScanCorrection {
            predicted_pose,
            search: result,
            measured_offset,
            offset,
            points_used: points.len(),
            published: self.publish(&offset),
        })
    }

    /// Reset the offset from an external pose estimate in the map frame.
    ///
    /// Confidence drops to zero so the next scans search widely.
    pub fn handle_pose_estimate(
        &self,
        estimate: &PoseEstimate,
        transforms: &dyn TransformProvider,
    ) -> Result<Option<PublishedTransform>> {
        let frames = &self.config.frames;
        if estimate.frame_id != frames.map_frame {
            log::warn!(
                "Ignoring pose estimate in frame '{}', expected '{}'",
                estimate.frame_id,
                frames.map_frame
            );
            return Err(LocalizationError::WrongFrame {
                expected: frames.map_frame.clone(),
                found: estimate.frame_id.clone(),
            });
        }

        let mut state = self.state.lock();
        let base_to_odom = transforms
            .lookup(&frames.odom_frame, &frames.base_frame, None)
            .inspect_err(|e| log::warn!("Ignoring pose estimate: {}", e))?
            .to_planar();

        let offset = (estimate.to_transform() * base_to_odom.invert_rigid()).project();
        state
            .fusion
            .apply_external_pose_estimate(&offset, estimate.timestamp_us);
        let offset = *state.fusion.state();
        drop(state);

        log::info!(
            "Pose estimate applied: offset=({:.3}, {:.3}, {:.3})",
            offset.x,
            offset.y,
            offset.yaw
        );
        Ok(self.publish(&offset))
    }

    fn publish(&self, offset: &OffsetState) -> Option<PublishedTransform> {
        let frames = &self.config.frames;
        frames.broadcast_enabled.then(|| PublishedTransform {
            parent_frame: frames.map_frame.clone(),
            child_frame: frames.odom_frame.clone(),
            timestamp_us: offset.timestamp_us,
            x: offset.x,
            y: offset.y,
            yaw: offset.yaw,
        })
    }
}

impl std::fmt::Debug for Localizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localizer")
            .field("config", &self.config)
            .field("offset", &self.offset())
            .field("has_map", &self.has_map())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::localization::StaticTransforms;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_localizer_is_send_sync() {
        assert_send_sync::<Localizer>();
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = LocalizerConfig::default();
        config.optimizer.iterations = 0;
        assert!(Localizer::new(config).is_err());
    }

    #[test]
    fn test_scan_without_map() {
        let localizer = Localizer::new(LocalizerConfig::default()).unwrap();
        let scan = RangeScan::new("laser", 0, 0.0, 0.1, vec![1.0; 20]);
        let err = localizer
            .process_scan(&scan, &StaticTransforms::new())
            .unwrap_err();
        assert!(matches!(err, LocalizationError::NoMap));
        assert_eq!(localizer.offset(), OffsetState::default());
    }

    #[test]
    fn test_broadcast_toggle() {
        let mut config = LocalizerConfig::default();
        config.frames.broadcast_enabled = false;
        let quiet = Localizer::new(config).unwrap();
        assert!(quiet.published_transform().is_none());

        let loud = Localizer::new(LocalizerConfig::default()).unwrap();
        assert!(loud.published_transform().is_none());

        let transforms =
            StaticTransforms::new().with("odom", "base_link", Transform3D::identity());
        let estimate = PoseEstimate::planar("map", 7, 0.5, 0.0, 0.0);
        loud.handle_pose_estimate(&estimate, &transforms).unwrap();
        let published = loud.published_transform().unwrap();
        assert_eq!(published.parent_frame, "map");
        assert_eq!(published.child_frame, "odom");
        assert_eq!(published.timestamp_us, 7);
    }
}
