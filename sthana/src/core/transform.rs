//! Homogeneous 4x4 transforms for frame chains.
//!
//! Two flavours share the same [`Transform3D`] type:
//!
//! - **3-D rigid**: rotation block plus translation column, used for the
//!   sensor→base mounting transform and for external pose estimates.
//! - **2.5-D planar**: rotation about Z in the upper-left 2x2 block, planar
//!   translation in (0,3)/(1,3), and the accumulated yaw stored in the
//!   z-translation slot (2,3). Composing two planar transforms multiplies the
//!   2-D rigid parts and adds the yaws, so [`Transform3D::project`] can read
//!   (x, y, yaw) straight off the translation column.
//!
//! Composition follows the "child on the right" convention:
//! `map_from_odom * odom_from_base == map_from_base`.

use std::ops::Mul;

use nalgebra::{Matrix3, Matrix4, UnitQuaternion, Vector3};

use super::math::normalize_angle;
use super::types::Pose2D;

/// 4x4 homogeneous transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    matrix: Matrix4<f64>,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Wrap a raw matrix. The caller guarantees it is a valid homogeneous
    /// transform.
    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// 2.5-D rotation about Z: rotates the xy plane and adds `angle` to the
    /// yaw slot.
    pub fn rotate_z25(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            c,  -s,  0.0, 0.0,
            s,   c,  0.0, 0.0,
            0.0, 0.0, 1.0, angle,
            0.0, 0.0, 0.0, 1.0,
        );
        Self { matrix }
    }

    /// Pure 3-D rotation about Z (yaw slot untouched).
    pub fn rotate_z3(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        #[rustfmt::skip]
        let matrix = Matrix4::new(
            c,  -s,  0.0, 0.0,
            s,   c,  0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Self { matrix }
    }

    /// Planar translation.
    pub fn translate(x: f64, y: f64) -> Self {
        let mut matrix = Matrix4::identity();
        matrix[(0, 3)] = x;
        matrix[(1, 3)] = y;
        Self { matrix }
    }

    /// 2.5-D planar transform: `translate(x, y) * rotate_z25(yaw)`.
    pub fn planar(x: f64, y: f64, yaw: f64) -> Self {
        Self::translate(x, y).compose(&Self::rotate_z25(yaw))
    }

    /// 2.5-D planar transform from a pose.
    pub fn from_pose2d(pose: &Pose2D) -> Self {
        Self::planar(pose.x, pose.y, pose.theta)
    }

    /// 3-D rigid transform from a rotation matrix and translation.
    pub fn from_rotation_translation(rotation: &Matrix3<f64>, translation: &Vector3<f64>) -> Self {
        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation);
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(translation);
        Self { matrix }
    }

    /// 3-D rigid transform from a position and orientation.
    pub fn from_pose(position: &Vector3<f64>, orientation: &UnitQuaternion<f64>) -> Self {
        Self::from_rotation_translation(orientation.to_rotation_matrix().matrix(), position)
    }

    /// Matrix product `self * other`.
    #[inline]
    pub fn compose(&self, other: &Transform3D) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Exact rigid inverse `(Rᵀ, -Rᵀt)`.
    ///
    /// Assumes the upper-left 3x3 block is orthonormal, which holds for every
    /// transform built by this module. For 2.5-D transforms this also negates
    /// the yaw slot.
    pub fn invert_rigid(&self) -> Self {
        let rotation_t = self.matrix.fixed_view::<3, 3>(0, 0).transpose();
        let translation = self.matrix.fixed_view::<3, 1>(0, 3).into_owned();
        let inv_translation = -(rotation_t * translation);
        Self::from_rotation_translation(&rotation_t, &inv_translation)
    }

    /// Read a planar pose off a 2.5-D transform: (m03, m13, wrap(m23)).
    pub fn project(&self) -> Pose2D {
        Pose2D::new(
            self.matrix[(0, 3)],
            self.matrix[(1, 3)],
            normalize_angle(self.matrix[(2, 3)]),
        )
    }

    /// Heading of the rotation block (yaw of the transformed x axis).
    pub fn heading(&self) -> f64 {
        self.matrix[(1, 0)].atan2(self.matrix[(0, 0)])
    }

    /// Convert a full 3-D rigid transform into its 2.5-D planar counterpart.
    pub fn to_planar(&self) -> Self {
        Self::planar(self.matrix[(0, 3)], self.matrix[(1, 3)], self.heading())
    }

    /// Apply the transform to a point.
    pub fn transform_point(&self, x: f64, y: f64, z: f64) -> Vector3<f64> {
        let m = &self.matrix;
        Vector3::new(
            m[(0, 0)] * x + m[(0, 1)] * y + m[(0, 2)] * z + m[(0, 3)],
            m[(1, 0)] * x + m[(1, 1)] * y + m[(1, 2)] * z + m[(1, 3)],
            m[(2, 0)] * x + m[(2, 1)] * y + m[(2, 2)] * z + m[(2, 3)],
        )
    }
}

impl Mul for Transform3D {
    type Output = Transform3D;

    fn mul(self, rhs: Transform3D) -> Transform3D {
        self.compose(&rhs)
    }
}

impl Mul<&Transform3D> for &Transform3D {
    type Output = Transform3D;

    fn mul(self, rhs: &Transform3D) -> Transform3D {
        self.compose(rhs)
    }
}
