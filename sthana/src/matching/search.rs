//! Multi-hypothesis search around the odometry prediction.
//!
//! The prediction is refined first. Random restarts drawn from a Gaussian
//! around the prediction then try to escape local minima; their spread
//! shrinks as confidence in the current offset grows, so a well-localized
//! robot mostly re-refines its prediction.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::config::{OptimizerSection, SearchSection};
use crate::core::{Pose2D, Scalar, ScanPoint};
use crate::grid::LikelihoodGrid;

use super::optimizer::{PoseOptimizer, SolverState};

/// Outcome of one search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Best pose in the grid frame
    pub pose: Pose2D,
    /// Residual norm of the best pose
    pub residual_norm: f64,
    /// Refinement of the prediction alone
    pub predicted: SolverState,
    /// Random hypotheses evaluated
    pub samples_evaluated: usize,
    /// Hypotheses that beat the best result so far
    pub improvements: usize,
}

/// Prediction refinement plus random restarts, owning its RNG.
#[derive(Debug)]
pub struct HypothesisSearch {
    optimizer: PoseOptimizer,
    config: SearchSection,
    rng: StdRng,
}

impl HypothesisSearch {
    /// Create a search. A seed of 0 draws a seed from the OS.
    pub fn new(optimizer: OptimizerSection, config: SearchSection) -> Self {
        let rng = if config.seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(config.seed)
        };
        Self {
            optimizer: PoseOptimizer::new(optimizer),
            config,
            rng,
        }
    }

    /// Search parameters.
    pub fn config(&self) -> &SearchSection {
        &self.config
    }

    /// Underlying optimizer.
    pub fn optimizer(&self) -> &PoseOptimizer {
        &self.optimizer
    }

    /// Find the lowest-residual pose near `guess`.
    ///
    /// Sample spread is `std × max(1 − confidence, 0)` per axis. A sample
    /// replaces the best result only if its residual is strictly lower, so
    /// the result is never worse than the refined prediction.
    pub fn search<T: Scalar>(
        &mut self,
        grid: &LikelihoodGrid<T>,
        points: &[ScanPoint],
        guess: Pose2D,
        confidence: f64,
    ) -> SearchResult {
        let predicted = self.optimizer.optimize(grid, points, guess);
        let mut result = SearchResult {
            pose: predicted.pose,
            residual_norm: predicted.residual_norm,
            predicted,
            samples_evaluated: 0,
            improvements: 0,
        };

        let spread = (1.0 - confidence).max(0.0);
        let std_x = self.config.sample_std_x * spread;
        let std_y = self.config.sample_std_y * spread;
        let std_yaw = self.config.sample_std_yaw * spread;

        for i in 0..self.config.sample_count {
            let sample = Pose2D::new(
                draw(&mut self.rng, guess.x, std_x),
                draw(&mut self.rng, guess.y, std_y),
                draw(&mut self.rng, guess.theta, std_yaw),
            );
            let state = self.optimizer.optimize(grid, points, sample);
            result.samples_evaluated += 1;

            if state.residual_norm < result.residual_norm {
                log::debug!(
                    "Sample {} improved residual {:.4} -> {:.4}",
                    i,
                    result.residual_norm,
                    state.residual_norm
                );
                result.pose = state.pose;
                result.residual_norm = state.residual_norm;
                result.improvements += 1;
            }
        }

        result
    }
}

/// Gaussian draw; a zero or invalid spread degenerates to the mean.
fn draw(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return mean;
    }
    match Normal::new(mean, std_dev) {
        Ok(normal) => normal.sample(rng),
        Err(_) => mean,
    }
}
