//! # Error reporting
//!
//! A single error type shared by the matrix engine and the simplex engine. Infeasibility and
//! unboundedness are not errors: they are legitimate outcomes of solving a linear program and are
//! reported through `OptimizationResult`.
use thiserror::Error;

/// Everything that can go wrong while building or manipulating matrices and linear programs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Shapes of the operands are not compatible for the requested operation.
    ///
    /// Also used when a constraint or objective has a different number of coefficients than the
    /// linear program has variables.
    #[error("dimension mismatch in {operation}: {left:?} versus {right:?}")]
    Dimension {
        /// Name of the operation that failed.
        operation: &'static str,
        /// Shape `(rows, columns)` of the left operand, or the expected shape.
        left: (usize, usize),
        /// Shape `(rows, columns)` of the right operand, or the received shape.
        right: (usize, usize),
    },
    /// A `(row, column)` index outside of the matrix.
    #[error("index ({row}, {column}) out of range for a {nr_rows}x{nr_columns} matrix")]
    Index {
        #[allow(missing_docs)]
        row: usize,
        #[allow(missing_docs)]
        column: usize,
        #[allow(missing_docs)]
        nr_rows: usize,
        #[allow(missing_docs)]
        nr_columns: usize,
    },
    /// A linear index outside of the matrix.
    #[error("linear index {index} out of range for a matrix with {len} values")]
    LinearIndex {
        #[allow(missing_docs)]
        index: usize,
        #[allow(missing_docs)]
        len: usize,
    },
    /// A matrix literal could not be parsed.
    ///
    /// The contained `String` is a message for the end user.
    #[error("malformed matrix literal: {0}")]
    Format(String),
    /// Inversion or solving was requested for a matrix that is singular within tolerance.
    #[error("matrix is singular within tolerance")]
    SingularMatrix,
    /// The simplex method kept pivoting past the iteration limit, even with Bland's rule.
    #[error("no termination after {iterations} iterations")]
    NonTermination {
        #[allow(missing_docs)]
        iterations: usize,
    },
    /// A non-negativity constraint should name exactly one variable with a positive coefficient.
    #[error("malformed bound: {0}")]
    MalformedBound(String),
    /// The linear program can't be solved without an objective function.
    #[error("no objective function was set")]
    MissingObjective,
    /// A solver setting has a value that is not allowed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
