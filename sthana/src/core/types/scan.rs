//! Range scan and projected scan point types.

use serde::{Deserialize, Serialize};

use crate::core::transform::Transform3D;

/// Sensor return expressed in the robot base frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanPoint {
    /// X coordinate in meters
    pub x: f64,
    /// Y coordinate in meters
    pub y: f64,
    /// Relative weight in the alignment cost
    pub weight: f64,
}

impl ScanPoint {
    /// Create a point with unit weight.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, weight: 1.0 }
    }

    /// Create a point with an explicit weight.
    #[inline]
    pub fn weighted(x: f64, y: f64, weight: f64) -> Self {
        Self { x, y, weight }
    }
}

/// Planar range scan in polar coordinates.
///
/// Ranges are ordered by angle, starting at `angle_min` and stepping by
/// `angle_increment`. A range that is zero, negative or non-finite means
/// "no measurement".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeScan {
    /// Sensor frame the ranges are measured in
    pub frame_id: String,
    /// Acquisition time in microseconds
    pub timestamp_us: u64,
    /// Angle of the first sample in radians
    pub angle_min: f32,
    /// Angle between consecutive samples in radians
    pub angle_increment: f32,
    /// Range samples in meters
    pub ranges: Vec<f32>,
}

impl RangeScan {
    /// Create a new scan.
    pub fn new(
        frame_id: impl Into<String>,
        timestamp_us: u64,
        angle_min: f32,
        angle_increment: f32,
        ranges: Vec<f32>,
    ) -> Self {
        Self {
            frame_id: frame_id.into(),
            timestamp_us,
            angle_min,
            angle_increment,
            ranges,
        }
    }

    /// Number of samples carrying a measurement.
    pub fn valid_count(&self) -> usize {
        self.ranges.iter().filter(|r| is_valid_range(**r)).count()
    }

    /// Project valid samples into the base frame.
    ///
    /// Each sample at angle `a` and range `r` is the sensor-frame point
    /// `(r·cos a, r·sin a, 0)`, mapped through `sensor_to_base`.
    pub fn project_points(&self, sensor_to_base: &Transform3D) -> Vec<ScanPoint> {
        let angle_min = self.angle_min as f64;
        let increment = self.angle_increment as f64;

        self.ranges
            .iter()
            .enumerate()
            .filter(|(_, r)| is_valid_range(**r))
            .map(|(i, &r)| {
                let angle = angle_min + i as f64 * increment;
                let (sin_a, cos_a) = angle.sin_cos();
                let range = r as f64;
                let p = sensor_to_base.transform_point(range * cos_a, range * sin_a, 0.0);
                ScanPoint::new(p.x, p.y)
            })
            .collect()
    }
}

#[inline]
fn is_valid_range(r: f32) -> bool {
    r.is_finite() && r > 0.0
}
