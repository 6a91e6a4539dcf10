//! Likelihood grid and occupancy map ingestion.
//!
//! - [`LikelihoodGrid`]: square grid of occupancy likelihoods with
//!   downscaling, smoothing and bilinear sampling
//! - [`OccupancyMap`]: external map message and its conversion
//! - [`prepare_grid`]: full conversion pipeline used at map ingestion

mod likelihood;
mod occupancy;

pub use likelihood::LikelihoodGrid;
pub use occupancy::{OccupancyMap, occupancy_to_likelihood, prepare_grid};
