//! # Strategies
//!
//! Decisions made during the simplex method that don't affect its correctness.
pub mod pivot_rule;
