//! # Algorithms
use crate::data::linear_program::solution::Solution;

pub mod two_phase;

/// A linear program is either infeasible, unbounded or has a finite optimum.
///
/// This is determined as the result of an algorithm
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum OptimizationResult {
    Infeasible,
    FiniteOptimum(Solution),
    Unbounded,
}

impl OptimizationResult {
    /// The solution, if an optimum was found.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Self::FiniteOptimum(solution) => Some(solution),
            Self::Infeasible | Self::Unbounded => None,
        }
    }
}
