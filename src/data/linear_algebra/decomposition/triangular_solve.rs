//! # Triangular solves
//!
//! Forward and backward substitution against dense triangular matrices. The right-hand side is
//! overwritten with the solution.
use crate::data::linear_algebra::EPSILON;
use crate::data::linear_algebra::matrix::Matrix;
use crate::error::Error;

/// Which values on the diagonal of a triangular matrix to use.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Diagonal {
    /// All ones, whatever is stored.
    Unit,
    /// The stored values, each of which should be nonzero.
    Stored,
}

/// Solve `Lx = b` for lower triangular `L`, using only the lower triangle of `lower`.
pub(crate) fn forward_substitute(lower: &Matrix, diagonal: Diagonal, b: &mut [f64]) -> Result<(), Error> {
    debug_assert!(lower.is_square());
    debug_assert_eq!(lower.nr_rows(), b.len());

    for i in 0..b.len() {
        let row = lower.row_slice(i);
        let inner_product = row[..i].iter().zip(&b[..i]).map(|(l, x)| l * x).sum::<f64>();
        b[i] -= inner_product;

        if diagonal == Diagonal::Stored {
            b[i] = divide_by_pivot(b[i], row[i])?;
        }
    }

    Ok(())
}

/// Solve `Ux = b` for upper triangular `U`, using only the upper triangle of `upper`.
pub(crate) fn back_substitute(upper: &Matrix, diagonal: Diagonal, b: &mut [f64]) -> Result<(), Error> {
    debug_assert!(upper.is_square());
    debug_assert_eq!(upper.nr_rows(), b.len());

    for i in (0..b.len()).rev() {
        let row = upper.row_slice(i);
        let inner_product = row[(i + 1)..].iter().zip(&b[(i + 1)..]).map(|(u, x)| u * x).sum::<f64>();
        b[i] -= inner_product;

        if diagonal == Diagonal::Stored {
            b[i] = divide_by_pivot(b[i], row[i])?;
        }
    }

    Ok(())
}

fn divide_by_pivot(value: f64, pivot: f64) -> Result<f64, Error> {
    if pivot.abs() < EPSILON {
        Err(Error::SingularMatrix)
    } else {
        Ok(value / pivot)
    }
}
