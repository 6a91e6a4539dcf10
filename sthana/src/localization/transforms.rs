//! Frame transform interfaces consumed and produced by the localizer.

use std::collections::HashMap;

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::core::Transform3D;
use crate::error::TransformUnavailable;

/// Source of rigid transforms between named frames.
///
/// Implementations must not block: lookups run while the localizer holds
/// its state lock.
pub trait TransformProvider {
    /// Transform mapping coordinates in `source_frame` into `target_frame`
    /// at `timestamp_us`, or the latest available when `None`.
    fn lookup(
        &self,
        target_frame: &str,
        source_frame: &str,
        timestamp_us: Option<u64>,
    ) -> Result<Transform3D, TransformUnavailable>;
}

/// Time-invariant transform table.
///
/// Lookups resolve the stored pair directly, or invert the reverse pair.
/// Identical frames resolve to identity.
#[derive(Debug, Clone, Default)]
pub struct StaticTransforms {
    transforms: HashMap<(String, String), Transform3D>,
}

impl StaticTransforms {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`StaticTransforms::insert`].
    pub fn with(mut self, target_frame: &str, source_frame: &str, transform: Transform3D) -> Self {
        self.insert(target_frame, source_frame, transform);
        self
    }

    /// Store `target ← source`, replacing any previous entry.
    pub fn insert(&mut self, target_frame: &str, source_frame: &str, transform: Transform3D) {
        self.transforms
            .insert((target_frame.to_string(), source_frame.to_string()), transform);
    }

    /// Remove `target ← source`. Returns the removed transform.
    pub fn remove(&mut self, target_frame: &str, source_frame: &str) -> Option<Transform3D> {
        self.transforms
            .remove(&(target_frame.to_string(), source_frame.to_string()))
    }
}

impl TransformProvider for StaticTransforms {
    fn lookup(
        &self,
        target_frame: &str,
        source_frame: &str,
        _timestamp_us: Option<u64>,
    ) -> Result<Transform3D, TransformUnavailable> {
        if target_frame == source_frame {
            return Ok(Transform3D::identity());
        }
        let key = (target_frame.to_string(), source_frame.to_string());
        if let Some(t) = self.transforms.get(&key) {
            return Ok(*t);
        }
        let reverse = (source_frame.to_string(), target_frame.to_string());
        self.transforms
            .get(&reverse)
            .map(Transform3D::invert_rigid)
            .ok_or_else(|| TransformUnavailable::new(target_frame, source_frame, "not in table"))
    }
}

/// External full-pose estimate, e.g. an operator-provided initial pose.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseEstimate {
    /// Frame the pose is expressed in; must be the map frame
    pub frame_id: String,
    /// Stamp in microseconds
    pub timestamp_us: u64,
    /// Position in meters
    pub position: Vector3<f64>,
    /// Orientation
    pub orientation: UnitQuaternion<f64>,
}

impl PoseEstimate {
    /// Estimate at planar pose (x, y, yaw).
    pub fn planar(frame_id: impl Into<String>, timestamp_us: u64, x: f64, y: f64, yaw: f64) -> Self {
        Self {
            frame_id: frame_id.into(),
            timestamp_us,
            position: Vector3::new(x, y, 0.0),
            orientation: UnitQuaternion::from_euler_angles(0.0, 0.0, yaw),
        }
    }

    /// 2.5-D planar transform of the pose (map←base).
    pub fn to_transform(&self) -> Transform3D {
        Transform3D::from_pose(&self.position, &self.orientation).to_planar()
    }
}

/// map→odom transform handed to the external publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedTransform {
    /// Parent frame (map)
    pub parent_frame: String,
    /// Child frame (odom)
    pub child_frame: String,
    /// Stamp of the scan or pose estimate that produced it
    pub timestamp_us: u64,
    /// Translation x in meters
    pub x: f64,
    /// Translation y in meters
    pub y: f64,
    /// Rotation about Z in radians
    pub yaw: f64,
}

impl PublishedTransform {
    /// Translation (x, y, 0).
    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, 0.0)
    }

    /// Yaw-only rotation.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(0.0, 0.0, self.yaw)
    }

    /// As a 3-D rigid transform.
    pub fn to_transform(&self) -> Transform3D {
        Transform3D::from_pose(&self.translation(), &self.rotation())
    }
}
