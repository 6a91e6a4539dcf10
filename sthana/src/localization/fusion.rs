//! Confidence-weighted map→odom offset filter.
//!
//! Corrections are blended exponentially into the persistent offset:
//!
//! ```text
//! x   ← g·x_new + (1−g)·x           (same for y)
//! yaw ← wrap(yaw + g·shortest(yaw, yaw_new))
//! c   ← c + (c_max − c)·k            k = confidence gain
//! ```
//!
//! Confidence only grows under corrections. It is reset to zero when the
//! map is replaced or an external pose estimate overwrites the offset.

use crate::config::FusionSection;
use crate::core::math::{angle_diff, normalize_angle};
use crate::core::{Pose2D, Transform3D};

/// Persistent offset and confidence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OffsetState {
    /// Offset x in meters
    pub x: f64,
    /// Offset y in meters
    pub y: f64,
    /// Offset yaw in radians, in (-π, π]
    pub yaw: f64,
    /// Trust in the offset, in [0, max_confidence]
    pub confidence: f64,
    /// Time of the last update in microseconds
    pub timestamp_us: u64,
}

impl OffsetState {
    /// Offset as a planar pose.
    pub fn pose(&self) -> Pose2D {
        Pose2D::new(self.x, self.y, self.yaw)
    }

    /// Offset as a 2.5-D map←odom transform.
    pub fn to_transform(&self) -> Transform3D {
        Transform3D::planar(self.x, self.y, self.yaw)
    }
}

/// Owner of the [`OffsetState`]; the only place it is mutated.
#[derive(Debug, Clone)]
pub struct OffsetFusion {
    config: FusionSection,
    state: OffsetState,
}

impl OffsetFusion {
    /// Zero offset, zero confidence.
    pub fn new(config: FusionSection) -> Self {
        Self {
            config,
            state: OffsetState::default(),
        }
    }

    /// Read-only snapshot.
    pub fn state(&self) -> &OffsetState {
        &self.state
    }

    /// Current confidence.
    pub fn confidence(&self) -> f64 {
        self.state.confidence
    }

    /// Blend a corrected offset into the state with weight `update_gain`.
    pub fn apply_correction(&mut self, corrected: &Pose2D, timestamp_us: u64, update_gain: f64) {
        let g = update_gain.clamp(0.0, 1.0);
        let s = &mut self.state;

        s.x = corrected.x * g + s.x * (1.0 - g);
        s.y = corrected.y * g + s.y * (1.0 - g);
        s.yaw = normalize_angle(s.yaw + angle_diff(s.yaw, corrected.theta) * g);

        let max = self.config.max_confidence;
        s.confidence += (max - s.confidence) * self.config.confidence_gain;
        s.confidence = s.confidence.clamp(0.0, max);
        s.timestamp_us = timestamp_us;
    }

    /// Overwrite the offset and drop confidence to zero.
    pub fn apply_external_pose_estimate(&mut self, offset: &Pose2D, timestamp_us: u64) {
        self.state = OffsetState {
            x: offset.x,
            y: offset.y,
            yaw: normalize_angle(offset.theta),
            confidence: 0.0,
            timestamp_us,
        };
    }

    /// Drop confidence to zero, keeping the offset.
    pub fn reset_confidence(&mut self) {
        self.state.confidence = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn fusion() -> OffsetFusion {
        OffsetFusion::new(FusionSection::default())
    }

    #[test]
    fn test_blend_position() {
        let mut f = fusion();
        f.apply_correction(&Pose2D::new(2.0, -4.0, 0.0), 10, 0.5);
        assert_relative_eq!(f.state().x, 1.0);
        assert_relative_eq!(f.state().y, -2.0);
        assert_eq!(f.state().timestamp_us, 10);
    }

    #[test]
    fn test_yaw_blend_takes_short_path() {
        let mut f = fusion();
        f.apply_external_pose_estimate(&Pose2D::new(0.0, 0.0, 3.0), 0);
        f.apply_correction(&Pose2D::new(0.0, 0.0, -3.0), 1, 0.5);
        let yaw = f.state().yaw;
        assert!(yaw > -PI && yaw <= PI);
        assert!(angle_diff(yaw, PI).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_grows_monotonically_to_ceiling() {
        let mut f = OffsetFusion::new(FusionSection {
            confidence_gain: 0.3,
            ..FusionSection::default()
        });
        let mut last = f.confidence();
        for i in 0..200 {
            f.apply_correction(&Pose2D::identity(), i, 0.5);
            assert!(f.confidence() >= last);
            assert!(f.confidence() <= 0.95);
            last = f.confidence();
        }
        assert_relative_eq!(last, 0.95, epsilon = 1e-9);
    }

    #[test]
    fn test_first_correction_confidence() {
        let mut f = fusion();
        f.apply_correction(&Pose2D::identity(), 0, 0.5);
        assert_relative_eq!(f.confidence(), 0.95 * 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_external_estimate_resets_confidence() {
        let mut f = fusion();
        for i in 0..20 {
            f.apply_correction(&Pose2D::identity(), i, 0.5);
        }
        assert!(f.confidence() > 0.0);
        f.apply_external_pose_estimate(&Pose2D::new(1.0, 2.0, 0.5), 99);
        assert_eq!(f.confidence(), 0.0);
        assert_eq!(f.state().pose(), Pose2D::new(1.0, 2.0, 0.5));
        assert_eq!(f.state().timestamp_us, 99);
    }

    #[test]
    fn test_reset_confidence_keeps_offset() {
        let mut f = fusion();
        f.apply_correction(&Pose2D::new(1.0, 1.0, 0.2), 0, 1.0);
        f.reset_confidence();
        assert_eq!(f.confidence(), 0.0);
        assert_relative_eq!(f.state().x, 1.0);
    }

    #[test]
    fn test_to_transform_projects_back() {
        let mut f = fusion();
        f.apply_external_pose_estimate(&Pose2D::new(0.5, -0.5, 1.0), 0);
        let p = f.state().to_transform().project();
        assert_relative_eq!(p.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(p.theta, 1.0, epsilon = 1e-12);
    }
}
