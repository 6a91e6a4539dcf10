//! Damped least-squares pose refinement against a likelihood field.
//!
//! ## Algorithm
//!
//! For each scan point `p` (base frame) and candidate pose `P` (grid frame):
//!
//! ```text
//! q       = P ⊕ p
//! (v, g)  = field(q)                       bilinear value and gradient
//! r       = 1 - v                          residual, 0 on a wall
//! J       = -[gx, gy, gx·∂qx/∂θ + gy·∂qy/∂θ]
//!
//! H = Σ w·J·Jᵀ        b = Σ w·J·r
//! (H + λI)·δ = -b                          Levenberg-Marquardt step
//! P ← P + gain·δ                           yaw wrapped
//! ```
//!
//! The reported residual norm is the weighted RMS `sqrt(Σw·r² / Σw)` at
//! the pose the step started from.

use crate::config::OptimizerSection;
use crate::core::math::solve_regularized_3x3;
use crate::core::{Pose2D, Scalar, ScanPoint};
use crate::grid::LikelihoodGrid;

/// Per-attempt solver state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverState {
    /// Current pose estimate in the grid frame
    pub pose: Pose2D,
    /// Residual norm of the most recent step (∞ before the first step)
    pub residual_norm: f64,
    /// Step scale
    pub gain: f64,
    /// Diagonal damping
    pub damping: f64,
}

impl SolverState {
    /// Fresh state at `pose`.
    pub fn new(pose: Pose2D, gain: f64, damping: f64) -> Self {
        Self {
            pose,
            residual_norm: f64::INFINITY,
            gain,
            damping,
        }
    }

    /// Run one refinement step in place.
    pub fn step<T: Scalar>(&mut self, grid: &LikelihoodGrid<T>, points: &[ScanPoint]) {
        let (pose, residual_norm) = step(grid, points, &self.pose, self.gain, self.damping);
        self.pose = pose;
        self.residual_norm = residual_norm;
    }
}

/// One damped least-squares step.
///
/// Returns the updated pose and the residual norm evaluated at `pose`.
/// A singular or non-finite normal system leaves the pose unchanged.
/// With no weight at all the residual norm is `∞`.
pub fn step<T: Scalar>(
    grid: &LikelihoodGrid<T>,
    points: &[ScanPoint],
    pose: &Pose2D,
    gain: f64,
    damping: f64,
) -> (Pose2D, f64) {
    let zero = T::zero();
    let one = T::one();

    let mut h = [[zero; 3]; 3];
    let mut b = [zero; 3];
    let mut sum_wr2 = zero;
    let mut sum_w = zero;

    let px0 = T::cast_from(pose.x);
    let py0 = T::cast_from(pose.y);
    let (sin_t, cos_t) = T::cast_from(pose.theta).sin_cos();

    for point in points {
        let px = T::cast_from(point.x);
        let py = T::cast_from(point.y);
        let w = T::cast_from(point.weight);

        let qx = px0 + px * cos_t - py * sin_t;
        let qy = py0 + px * sin_t + py * cos_t;

        let (value, gx, gy) = grid.sample_bilinear(qx, qy);
        let r = one - value;

        let dqx_dtheta = -px * sin_t - py * cos_t;
        let dqy_dtheta = px * cos_t - py * sin_t;
        let j = [-gx, -gy, -(gx * dqx_dtheta + gy * dqy_dtheta)];

        for i in 0..3 {
            b[i] = b[i] + w * j[i] * r;
            for k in 0..3 {
                h[i][k] = h[i][k] + w * j[i] * j[k];
            }
        }
        sum_wr2 = sum_wr2 + w * r * r;
        sum_w = sum_w + w;
    }

    let residual_norm = if sum_w > zero {
        (sum_wr2 / sum_w).sqrt().into_f64()
    } else {
        f64::INFINITY
    };

    let new_pose = match solve_regularized_3x3(&h, &b, T::cast_from(damping)) {
        Some(delta) => Pose2D::new(
            pose.x + gain * delta[0].into_f64(),
            pose.y + gain * delta[1].into_f64(),
            pose.theta + gain * delta[2].into_f64(),
        ),
        None => *pose,
    };

    (new_pose, residual_norm)
}

/// Fixed-iteration pose optimizer.
#[derive(Debug, Clone)]
pub struct PoseOptimizer {
    config: OptimizerSection,
}

impl PoseOptimizer {
    /// Create an optimizer with the given parameters.
    pub fn new(config: OptimizerSection) -> Self {
        Self { config }
    }

    /// Parameters in use.
    pub fn config(&self) -> &OptimizerSection {
        &self.config
    }

    /// Refine `initial` for the configured number of iterations.
    ///
    /// The returned residual norm belongs to the pose the last step started
    /// from, one update behind the returned pose.
    pub fn optimize<T: Scalar>(
        &self,
        grid: &LikelihoodGrid<T>,
        points: &[ScanPoint],
        initial: Pose2D,
    ) -> SolverState {
        let mut state = SolverState::new(initial, self.config.gain, self.config.damping);
        for _ in 0..self.config.iterations {
            state.step(grid, points);
        }
        state
    }
}
