//! # Storing of matrices and linear programs in memory
//!
//! This module provides the data structures used to represent matrices and linear programs in
//! memory. Algorithms may introduce their specific data structures in `algorithm::my_algorithm`.

pub mod linear_algebra;
pub mod linear_program;
