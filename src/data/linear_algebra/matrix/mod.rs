//! # Dense matrices
//!
//! A `Matrix` owns a row-major buffer of `f64` values. Derived quantities that are expensive to
//! compute (the LU decomposition, the determinant and the inverse) are cached inside the matrix
//! and dropped by every operation that changes its contents.
use std::cell::OnceCell;
use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

use itertools::Itertools;
use log::debug;
use num_traits::{One, Zero};

use crate::data::linear_algebra::decomposition::LowerUpper;
use crate::error::Error;

pub use expression::{Expression, Operand};
pub use literal::ROW_DELIMITER;

mod expression;
mod literal;

/// Values derived from the contents of a matrix.
///
/// A cell that is filled is valid for the current contents of the matrix. All cells are emptied
/// together whenever the matrix is mutated.
#[derive(Clone, Debug, Default)]
pub(crate) struct Cache {
    pub(crate) lower_upper: OnceCell<Box<LowerUpper>>,
    pub(crate) determinant: OnceCell<f64>,
    pub(crate) inverse: OnceCell<Box<Matrix>>,
}

/// Dense matrix of `f64` values.
///
/// Indices start at `0`. Values are stored row after row.
#[derive(Clone, Debug)]
pub struct Matrix {
    nr_rows: usize,
    nr_columns: usize,
    /// Row-major, `values.len() == nr_rows * nr_columns`.
    values: Vec<f64>,
    cache: Cache,
}

impl Matrix {
    /// Create a matrix of zeros.
    #[must_use]
    pub fn new(nr_rows: usize, nr_columns: usize) -> Self {
        Self::filled(nr_rows, nr_columns, f64::zero())
    }

    /// Create a matrix with every value equal to `value`.
    #[must_use]
    pub fn filled(nr_rows: usize, nr_columns: usize, value: f64) -> Self {
        Self {
            nr_rows,
            nr_columns,
            values: vec![value; nr_rows * nr_columns],
            cache: Cache::default(),
        }
    }

    /// Create a square matrix of zeros.
    #[must_use]
    pub fn square(n: usize) -> Self {
        Self::new(n, n)
    }

    /// Create a square identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::square(n);
        for i in 0..n {
            matrix.values[i * n + i] = f64::one();
        }
        matrix
    }

    /// Create a matrix from row-major values.
    ///
    /// # Errors
    ///
    /// When the number of values doesn't equal `nr_rows * nr_columns`.
    pub fn from_values(nr_rows: usize, nr_columns: usize, values: Vec<f64>) -> Result<Self, Error> {
        if values.len() != nr_rows * nr_columns {
            return Err(Error::Dimension {
                operation: "construction from values",
                left: (nr_rows, nr_columns),
                right: (1, values.len()),
            });
        }

        Ok(Self { nr_rows, nr_columns, values, cache: Cache::default() })
    }

    /// Create a matrix from values whose count is known to match the dimensions.
    pub(crate) fn from_parts(nr_rows: usize, nr_columns: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), nr_rows * nr_columns);

        Self { nr_rows, nr_columns, values, cache: Cache::default() }
    }

    /// Create a matrix from a collection of rows.
    ///
    /// # Errors
    ///
    /// When not all rows have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, Error> {
        let nr_rows = rows.len();
        let nr_columns = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|row| row.len() != nr_columns) {
            return Err(Error::Dimension {
                operation: "construction from rows",
                left: (1, nr_columns),
                right: (1, row.len()),
            });
        }

        let values = rows.into_iter().flatten().collect();
        Self::from_values(nr_rows, nr_columns, values)
    }

    /// Create a `1 x n` matrix.
    #[must_use]
    pub fn row_vector(values: Vec<f64>) -> Self {
        let nr_columns = values.len();
        Self { nr_rows: 1, nr_columns, values, cache: Cache::default() }
    }

    /// Create a `n x 1` matrix.
    #[must_use]
    pub fn column_vector(values: Vec<f64>) -> Self {
        let nr_rows = values.len();
        Self { nr_rows, nr_columns: 1, values, cache: Cache::default() }
    }

    /// Number of rows and number of columns.
    pub fn dim(&self) -> (usize, usize) {
        (self.nr_rows, self.nr_columns)
    }

    /// Number of rows.
    pub fn nr_rows(&self) -> usize {
        self.nr_rows
    }

    /// Number of columns.
    pub fn nr_columns(&self) -> usize {
        self.nr_columns
    }

    /// Number of values stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the matrix has no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the number of rows equals the number of columns.
    pub fn is_square(&self) -> bool {
        self.nr_rows == self.nr_columns
    }

    /// Approximate number of bytes used by the values of this matrix.
    pub fn space(&self) -> usize {
        mem::size_of::<Self>() + self.values.capacity() * mem::size_of::<f64>()
    }

    /// All values, row after row.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Read a value.
    ///
    /// # Errors
    ///
    /// If `(row, column)` is out of range.
    pub fn get(&self, row: usize, column: usize) -> Result<f64, Error> {
        self.check_index(row, column)?;

        Ok(self.values[row * self.nr_columns + column])
    }

    /// Write a value, invalidating all cached quantities.
    ///
    /// # Errors
    ///
    /// If `(row, column)` is out of range.
    pub fn set(&mut self, row: usize, column: usize, value: f64) -> Result<(), Error> {
        self.check_index(row, column)?;

        self.invalidate();
        self.values[row * self.nr_columns + column] = value;
        Ok(())
    }

    /// Read a value by its position in the row-major ordering.
    ///
    /// # Errors
    ///
    /// If `index` is out of range.
    pub fn get_linear(&self, index: usize) -> Result<f64, Error> {
        self.values.get(index)
            .copied()
            .ok_or(Error::LinearIndex { index, len: self.len() })
    }

    /// Write a value by its position in the row-major ordering, invalidating all cached quantities.
    ///
    /// # Errors
    ///
    /// If `index` is out of range.
    pub fn set_linear(&mut self, index: usize, value: f64) -> Result<(), Error> {
        if index >= self.len() {
            return Err(Error::LinearIndex { index, len: self.len() });
        }

        self.invalidate();
        self.values[index] = value;
        Ok(())
    }

    /// Copy of row `i` as a `1 x n` matrix.
    ///
    /// # Errors
    ///
    /// If the row doesn't exist.
    pub fn row(&self, i: usize) -> Result<Self, Error> {
        if i >= self.nr_rows {
            return Err(self.index_error(i, 0));
        }

        Ok(Self::row_vector(self.row_slice(i).to_vec()))
    }

    /// Copy of column `j` as a `m x 1` matrix.
    ///
    /// # Errors
    ///
    /// If the column doesn't exist.
    pub fn column(&self, j: usize) -> Result<Self, Error> {
        if j >= self.nr_columns {
            return Err(self.index_error(0, j));
        }

        Ok(Self::column_vector(self.column_iter(j).collect()))
    }

    pub(crate) fn row_slice(&self, i: usize) -> &[f64] {
        debug_assert!(i < self.nr_rows);

        &self.values[i * self.nr_columns..(i + 1) * self.nr_columns]
    }

    pub(crate) fn row_slice_mut(&mut self, i: usize) -> &mut [f64] {
        debug_assert!(i < self.nr_rows);

        self.invalidate();
        &mut self.values[i * self.nr_columns..(i + 1) * self.nr_columns]
    }

    pub(crate) fn column_iter(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        debug_assert!(j < self.nr_columns);

        self.values.iter().skip(j).step_by(self.nr_columns.max(1)).copied()
    }

    /// Swap two rows.
    ///
    /// # Errors
    ///
    /// If one of the rows doesn't exist.
    pub fn swap_rows(&mut self, first: usize, second: usize) -> Result<(), Error> {
        if first >= self.nr_rows || second >= self.nr_rows {
            return Err(self.index_error(first.max(second), 0));
        }

        self.invalidate();
        if first != second {
            let n = self.nr_columns;
            let (low, high) = (first.min(second), first.max(second));
            let (head, tail) = self.values.split_at_mut(high * n);
            head[low * n..(low + 1) * n].swap_with_slice(&mut tail[..n]);
        }
        Ok(())
    }

    /// Swap two columns.
    ///
    /// # Errors
    ///
    /// If one of the columns doesn't exist.
    pub fn swap_columns(&mut self, first: usize, second: usize) -> Result<(), Error> {
        if first >= self.nr_columns || second >= self.nr_columns {
            return Err(self.index_error(0, first.max(second)));
        }

        self.invalidate();
        for i in 0..self.nr_rows {
            self.values.swap(i * self.nr_columns + first, i * self.nr_columns + second);
        }
        Ok(())
    }

    /// Transpose this matrix in place.
    pub fn transpose(&mut self) {
        let transposed = self.transposed();
        *self = transposed;
    }

    /// A transposed copy of this matrix.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let mut values = Vec::with_capacity(self.len());
        for j in 0..self.nr_columns {
            values.extend(self.column_iter(j));
        }

        Self { nr_rows: self.nr_columns, nr_columns: self.nr_rows, values, cache: Cache::default() }
    }

    /// Change the dimensions of this matrix.
    ///
    /// Values at indices that exist both before and after the resize are kept, new values are zero.
    pub fn resize(&mut self, nr_rows: usize, nr_columns: usize) {
        let mut values = vec![f64::zero(); nr_rows * nr_columns];
        for i in 0..self.nr_rows.min(nr_rows) {
            let kept = self.nr_columns.min(nr_columns);
            values[i * nr_columns..i * nr_columns + kept]
                .copy_from_slice(&self.row_slice(i)[..kept]);
        }

        self.invalidate();
        self.nr_rows = nr_rows;
        self.nr_columns = nr_columns;
        self.values = values;
    }

    /// Resize to a `0 x 0` matrix.
    pub fn empty(&mut self) {
        self.resize(0, 0);
    }

    /// Overwrite this (square) matrix with the identity.
    ///
    /// # Errors
    ///
    /// If the matrix is not square.
    pub fn set_identity(&mut self) -> Result<(), Error> {
        if !self.is_square() {
            return Err(Error::Dimension {
                operation: "set_identity",
                left: self.dim(),
                right: (self.nr_rows, self.nr_rows),
            });
        }

        *self = Self::identity(self.nr_rows);
        Ok(())
    }

    /// Whether this matrix is the identity within an absolute tolerance.
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.is_square() && self.values.iter()
            .enumerate()
            .all(|(index, &value)| {
                let expected = if index / self.nr_columns == index % self.nr_columns { 1f64 } else { 0f64 };
                (value - expected).abs() <= tolerance
            })
    }

    /// Whether every value is at least `value`, within an absolute tolerance.
    pub fn more_equal_than(&self, value: f64, tolerance: f64) -> bool {
        self.values.iter().all(|&v| v >= value - tolerance)
    }

    /// Whether every value is at most `value`, within an absolute tolerance.
    pub fn less_equal_than(&self, value: f64, tolerance: f64) -> bool {
        self.values.iter().all(|&v| v <= value + tolerance)
    }

    /// Whether the LU decomposition is cached for the current contents.
    pub fn lu_valid(&self) -> bool {
        self.cache.lower_upper.get().is_some()
    }

    /// Whether the determinant is cached for the current contents.
    pub fn determinant_valid(&self) -> bool {
        self.cache.determinant.get().is_some()
    }

    /// Whether the inverse is cached for the current contents.
    pub fn inverse_valid(&self) -> bool {
        self.cache.inverse.get().is_some()
    }

    /// Write the contents to the log at debug level, labeled with `name`.
    pub fn log(&self, name: &str) {
        debug!("{} ({}x{}):\n{}", name, self.nr_rows, self.nr_columns, self);
    }

    pub(crate) fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Drop all derived quantities.
    ///
    /// Every method that changes `values`, `nr_rows` or `nr_columns` calls this.
    fn invalidate(&mut self) {
        self.cache = Cache::default();
    }

    fn check_index(&self, row: usize, column: usize) -> Result<(), Error> {
        if row < self.nr_rows && column < self.nr_columns {
            Ok(())
        } else {
            Err(self.index_error(row, column))
        }
    }

    fn index_error(&self, row: usize, column: usize) -> Error {
        Error::Index { row, column, nr_rows: self.nr_rows, nr_columns: self.nr_columns }
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.dim() == other.dim() && self.values == other.values
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, column): (usize, usize)) -> &Self::Output {
        assert!(row < self.nr_rows && column < self.nr_columns, "{}", self.index_error(row, column));

        &self.values[row * self.nr_columns + column]
    }
}

/// Writing through an index drops the cached quantities before handing out the reference.
impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut Self::Output {
        assert!(row < self.nr_rows && column < self.nr_columns, "{}", self.index_error(row, column));

        self.invalidate();
        &mut self.values[row * self.nr_columns + column]
    }
}

impl Index<usize> for Matrix {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl IndexMut<usize> for Matrix {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.invalidate();
        &mut self.values[index]
    }
}

/// A `1 x 1` matrix can be read as a scalar.
impl TryFrom<&Matrix> for f64 {
    type Error = Error;

    fn try_from(matrix: &Matrix) -> Result<Self, Self::Error> {
        if matrix.dim() == (1, 1) {
            Ok(matrix.values[0])
        } else {
            Err(Error::Dimension { operation: "scalar conversion", left: matrix.dim(), right: (1, 1) })
        }
    }
}

/// Aligned rows for reading; the alternate form (`{:#}`) writes the literal form which can be
/// parsed back.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            let rows = (0..self.nr_rows)
                .map(|i| self.row_slice(i).iter().join(" "))
                .join("; ");
            return f.write_str(&rows);
        }

        let formatted = self.values.iter().map(f64::to_string).collect::<Vec<_>>();
        let width = formatted.iter().map(String::len).max().unwrap_or(0);
        for i in 0..self.nr_rows {
            let row = formatted[i * self.nr_columns..(i + 1) * self.nr_columns].iter()
                .map(|value| format!("{value:>width$}"))
                .join(" ");
            writeln!(f, "[ {row} ]")?;
        }
        Ok(())
    }
}
