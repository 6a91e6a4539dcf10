//! Scan-to-map alignment.
//!
//! - [`optimizer`]: one damped least-squares step and the fixed-iteration
//!   [`PoseOptimizer`]
//! - [`search`]: [`HypothesisSearch`] with random restarts that shrink as
//!   confidence grows

pub mod optimizer;
pub mod search;

pub use optimizer::{PoseOptimizer, SolverState, step};
pub use search::{HypothesisSearch, SearchResult};
