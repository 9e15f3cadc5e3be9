//! # A dense linear program solver
//!
//! Dense matrices with a cached LU decomposition, determinant and inverse, and a two-phase revised
//! Simplex Method as described in the book Combinatorial Optimization by Christos H. Papadimitriou
//! and Kenneth Steiglitz.
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;
pub mod diet;
pub mod error;

pub use error::Error;

#[cfg(test)]
mod tests;
