//! Mathematical primitives for planar localization.
//!
//! Angle wrapping and shortest angular distance, plus the [`Scalar`] trait
//! that lets the likelihood grid and the pose optimizer run at either `f32`
//! or `f64` precision from a single implementation.

use std::fmt::Debug;

use num_traits::{Float, FloatConst};

/// Floating-point type usable for grid cells and optimizer accumulation.
///
/// Implemented for `f32` and `f64`. The two conversion helpers are lossless
/// for `f64` and round-to-nearest for `f32`.
pub trait Scalar: Float + FloatConst + Debug + Default + Send + Sync + 'static {
    /// Convert from an `f64` literal or value.
    fn cast_from(value: f64) -> Self;

    /// Widen to `f64`.
    fn into_f64(self) -> f64;
}

impl Scalar for f32 {
    #[inline]
    fn cast_from(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn into_f64(self) -> f64 {
        self as f64
    }
}

impl Scalar for f64 {
    #[inline]
    fn cast_from(value: f64) -> Self {
        value
    }

    #[inline]
    fn into_f64(self) -> f64 {
        self
    }
}

/// Wrap an angle into (-π, π].
///
/// # Example
/// ```
/// use sthana::core::math::normalize_angle;
/// use std::f64::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-12);
/// assert!((normalize_angle(-PI) - PI).abs() < 1e-12);
/// ```
#[inline]
pub fn normalize_angle<T: Scalar>(angle: T) -> T {
    let pi = T::PI();
    let two_pi = pi + pi;
    let mut a = angle % two_pi;
    if a > pi {
        a = a - two_pi;
    } else if a <= -pi {
        a = a + two_pi;
    }
    a
}

/// Shortest signed angular distance from `from` to `to`.
///
/// Returns the angle to add to `from` to reach `to` along the shorter arc.
///
/// ```
/// use sthana::core::math::angle_diff;
/// use std::f64::consts::PI;
///
/// let diff = angle_diff(PI - 0.1, -PI + 0.1);
/// assert!((diff - 0.2).abs() < 1e-12);
/// ```
#[inline]
pub fn angle_diff<T: Scalar>(from: T, to: T) -> T {
    normalize_angle(to - from)
}

/// Solve `(A + λI) x = -b` for a 3x3 system using Cramer's rule.
///
/// Returns `None` if the regularized matrix is singular or the solution is
/// not finite.
pub fn solve_regularized_3x3<T: Scalar>(
    a: &[[T; 3]; 3],
    b: &[T; 3],
    regularization: T,
) -> Option<[T; 3]> {
    let mut ar = *a;
    ar[0][0] = ar[0][0] + regularization;
    ar[1][1] = ar[1][1] + regularization;
    ar[2][2] = ar[2][2] + regularization;

    let c00 = ar[1][1] * ar[2][2] - ar[1][2] * ar[2][1];
    let c01 = ar[1][2] * ar[2][0] - ar[1][0] * ar[2][2];
    let c02 = ar[1][0] * ar[2][1] - ar[1][1] * ar[2][0];

    let det = ar[0][0] * c00 + ar[0][1] * c01 + ar[0][2] * c02;
    if !det.is_finite() || det.abs() < T::cast_from(1e-12) {
        return None;
    }

    let inv_det = T::one() / det;

    let inv = [
        [
            c00 * inv_det,
            (ar[0][2] * ar[2][1] - ar[0][1] * ar[2][2]) * inv_det,
            (ar[0][1] * ar[1][2] - ar[0][2] * ar[1][1]) * inv_det,
        ],
        [
            c01 * inv_det,
            (ar[0][0] * ar[2][2] - ar[0][2] * ar[2][0]) * inv_det,
            (ar[0][2] * ar[1][0] - ar[0][0] * ar[1][2]) * inv_det,
        ],
        [
            c02 * inv_det,
            (ar[0][1] * ar[2][0] - ar[0][0] * ar[2][1]) * inv_det,
            (ar[0][0] * ar[1][1] - ar[0][1] * ar[1][0]) * inv_det,
        ],
    ];

    let x = [
        -(inv[0][0] * b[0] + inv[0][1] * b[1] + inv[0][2] * b[2]),
        -(inv[1][0] * b[0] + inv[1][1] * b[1] + inv[1][2] * b[2]),
        -(inv[2][0] * b[0] + inv[2][1] * b[1] + inv[2][2] * b[2]),
    ];

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}
