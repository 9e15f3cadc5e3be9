//! # Representing linear programs
//!
//! Constraints and objective functions as provided by the user, and the solution reported back.
pub mod elements;
pub mod solution;
