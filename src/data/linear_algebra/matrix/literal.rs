//! # Matrix literals
//!
//! A literal lists the values of a matrix as text: values within a row are separated by
//! whitespace, rows are separated by `;`. For example, `"1 2 3; 4 5 6"` is a `2 x 3` matrix.
use std::str::FromStr;

use crate::data::linear_algebra::matrix::Matrix;
use crate::error::Error;

/// Separates the rows of a matrix literal.
pub const ROW_DELIMITER: char = ';';

impl FromStr for Matrix {
    type Err = Error;

    /// Parse a literal.
    ///
    /// An empty literal is a `0 x 0` matrix. A single trailing row delimiter is allowed.
    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        let rows = parse_rows(literal)?;
        let nr_columns = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != nr_columns) {
            return Err(Error::Format(format!(
                "row {} has {} values while row 0 has {}", i, row.len(), nr_columns,
            )));
        }

        Self::from_rows(rows)
    }
}

impl Matrix {
    /// Overwrite all values from a literal, in row-major order.
    ///
    /// Row delimiters may be used but only the total number of values is checked against the
    /// dimensions of the matrix.
    ///
    /// # Errors
    ///
    /// A `Format` error for malformed values and a `Dimension` error if the number of values
    /// differs from the number of values in this matrix.
    pub fn set_values(&mut self, literal: &str) -> Result<(), Error> {
        let values = parse_rows(literal)?.into_iter().flatten().collect::<Vec<_>>();
        if values.len() != self.len() {
            return Err(Error::Dimension {
                operation: "set_values",
                left: self.dim(),
                right: (1, values.len()),
            });
        }

        *self = Self::from_values(self.nr_rows(), self.nr_columns(), values)?;
        Ok(())
    }

    /// Overwrite row `i` from a literal with one value per column.
    ///
    /// # Errors
    ///
    /// If the row doesn't exist, a value is malformed or the number of values is wrong.
    pub fn set_row(&mut self, i: usize, literal: &str) -> Result<(), Error> {
        let values = parse_values(literal)?;
        if i >= self.nr_rows() {
            return Err(Error::Index { row: i, column: 0, nr_rows: self.nr_rows(), nr_columns: self.nr_columns() });
        }
        if values.len() != self.nr_columns() {
            return Err(Error::Dimension {
                operation: "set_row",
                left: (1, self.nr_columns()),
                right: (1, values.len()),
            });
        }

        self.row_slice_mut(i).copy_from_slice(&values);
        Ok(())
    }

    /// Overwrite column `j` from a literal with one value per row.
    ///
    /// # Errors
    ///
    /// If the column doesn't exist, a value is malformed or the number of values is wrong.
    pub fn set_column(&mut self, j: usize, literal: &str) -> Result<(), Error> {
        let values = parse_values(literal)?;
        if j >= self.nr_columns() {
            return Err(Error::Index { row: 0, column: j, nr_rows: self.nr_rows(), nr_columns: self.nr_columns() });
        }
        if values.len() != self.nr_rows() {
            return Err(Error::Dimension {
                operation: "set_column",
                left: (self.nr_rows(), 1),
                right: (values.len(), 1),
            });
        }

        for (i, value) in values.into_iter().enumerate() {
            self.set(i, j, value)?;
        }
        Ok(())
    }
}

/// Split a literal into rows of values.
fn parse_rows(literal: &str) -> Result<Vec<Vec<f64>>, Error> {
    if literal.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut rows = literal.split(ROW_DELIMITER).collect::<Vec<_>>();
    if rows.len() > 1 && rows.last().is_some_and(|row| row.trim().is_empty()) {
        rows.pop();
    }

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let values = parse_values(row)?;
            if values.is_empty() {
                Err(Error::Format(format!("row {i} is empty")))
            } else {
                Ok(values)
            }
        })
        .collect()
}

/// Parse whitespace separated values, without any row delimiters.
fn parse_values(text: &str) -> Result<Vec<f64>, Error> {
    text.split_whitespace()
        .map(|token| match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(_) => Err(Error::Format(format!("\"{token}\" is not a finite number"))),
            Err(_) => Err(Error::Format(format!("\"{token}\" is not a number"))),
        })
        .collect()
}
