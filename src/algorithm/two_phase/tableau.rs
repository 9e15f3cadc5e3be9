//! # Data structures for Simplex
//!
//! Contains the simplex tableau and logic for elementary operations which can be performed upon it.
//! The tableau is represented by a dense basis inverse, from which any column or element of the
//! classical tableau can be generated.
use std::cmp::max;
use std::collections::HashSet;
use std::fmt::{Display, Formatter, Result as FormatResult};

use log::trace;

use crate::algorithm::two_phase::settings::SimplexSettings;
use crate::algorithm::two_phase::standard_form::StandardForm;
use crate::data::linear_algebra::inverse::{inverse_with_transformed_column, multiply_vector};
use crate::data::linear_algebra::matrix::Matrix;
use crate::error::Error;

/// The most high-level data structure that is used by the Simplex algorithm: the Simplex tableau.
///
/// It holds only a reference to the (immutable) problem it solves, but owns the data structures
/// that describe the current solution basis.
#[derive(Clone, Debug)]
pub struct Tableau<'a> {
    problem: &'a StandardForm,
    /// Cost of each column in the current phase.
    cost: Vec<f64>,

    /// Inverse of the `m x m` matrix of basis columns.
    ///
    /// This attribute changes with a basis change.
    basis_inverse: Matrix,
    /// `B^-1 b`, the values of the basic variables.
    b: Vec<f64>,
    /// `c_B^T B^-1`, used to compute relative costs.
    pi: Vec<f64>,

    /// Column that is basic in each row.
    basis_indices: Vec<usize>,
    /// All columns currently in the basis.
    ///
    /// Could also be derived from `basis_indices`, but is here for faster reading and writing.
    basis_columns: HashSet<usize>,

    /// Basis changes since the basis inverse was last computed from scratch.
    updates_since_reinversion: usize,
    settings: SimplexSettings,
}

impl<'a> Tableau<'a> {
    /// Tableau for the first phase: the slack and artificial columns of the standard form as basis
    /// and a cost of one for each artificial variable.
    pub fn new_artificial(problem: &'a StandardForm, settings: SimplexSettings) -> Self {
        let basis_indices = problem.initial_basis().to_vec();

        Self::with_basis(
            problem,
            problem.artificial_cost(),
            Matrix::identity(problem.nr_rows()),
            basis_indices,
            settings,
        )
    }

    /// Tableau for the second phase, continuing from the basis found in the first phase.
    #[must_use]
    pub fn into_non_artificial(self) -> Self {
        let problem = self.problem;

        Self::with_basis(
            problem,
            problem.cost().to_vec(),
            self.basis_inverse,
            self.basis_indices,
            self.settings,
        )
    }

    fn with_basis(
        problem: &'a StandardForm,
        cost: Vec<f64>,
        basis_inverse: Matrix,
        basis_indices: Vec<usize>,
        settings: SimplexSettings,
    ) -> Self {
        debug_assert_eq!(cost.len(), problem.nr_columns());
        debug_assert_eq!(basis_indices.len(), problem.nr_rows());

        let basis_columns = basis_indices.iter().copied().collect();
        let mut tableau = Self {
            problem,
            cost,
            b: multiply_vector(&basis_inverse, problem.b()),
            basis_inverse,
            pi: Vec::new(),
            basis_indices,
            basis_columns,
            updates_since_reinversion: 0,
            settings,
        };
        tableau.compute_pi();

        tableau
    }

    /// Brings a column into the basis by updating the basis inverse and the data structures
    /// holding the collection of basis columns.
    ///
    /// # Arguments
    ///
    /// * `pivot_column_index`: Column entering the basis, not yet in the basis.
    /// * `pivot_row_index`: Row of the variable leaving the basis.
    /// * `column`: Output of `generate_column(pivot_column_index)`.
    ///
    /// # Errors
    ///
    /// `SingularMatrix` if the pivot is too small or the basis can't be inverted when it is
    /// recomputed.
    pub fn bring_into_basis(
        &mut self,
        pivot_column_index: usize,
        pivot_row_index: usize,
        column: &[f64],
    ) -> Result<(), Error> {
        debug_assert!(pivot_column_index < self.nr_columns());
        debug_assert!(pivot_row_index < self.nr_rows());
        debug_assert!(!self.is_in_basis(&pivot_column_index));

        self.basis_inverse = inverse_with_transformed_column(&self.basis_inverse, column, pivot_row_index)?;

        let step = self.b[pivot_row_index] / column[pivot_row_index];
        for (value, &d) in self.b.iter_mut().zip(column) {
            *value -= step * d;
        }
        self.b[pivot_row_index] = step;

        let leaving_column = self.basis_indices[pivot_row_index];
        self.update_basis_indices(pivot_row_index, pivot_column_index, leaving_column);
        trace!("Column {pivot_column_index} enters, column {leaving_column} leaves at row {pivot_row_index}");

        self.updates_since_reinversion += 1;
        if self.updates_since_reinversion >= self.settings.reinversion_interval() {
            self.reinvert()?;
        }
        self.compute_pi();

        Ok(())
    }

    /// Update the basis index.
    ///
    /// Removes the index of the variable leaving the basis from the `basis_columns` attribute,
    /// while inserting the entering variable index.
    fn update_basis_indices(&mut self, pivot_row: usize, pivot_column: usize, leaving_column: usize) {
        self.basis_indices[pivot_row] = pivot_column;
        let was_there = self.basis_columns.remove(&leaving_column);
        debug_assert!(was_there);
        let was_not_there = self.basis_columns.insert(pivot_column);
        debug_assert!(was_not_there);
    }

    /// Compute the basis inverse and the basic variable values from scratch.
    ///
    /// Removes the error accumulated by the rank-one updates.
    fn reinvert(&mut self) -> Result<(), Error> {
        let m = self.nr_rows();
        let mut basis = Matrix::square(m);
        for (k, &j) in self.basis_indices.iter().enumerate() {
            for (i, value) in self.problem.constraints().column_iter(j).enumerate() {
                basis[(i, k)] = value;
            }
        }

        self.basis_inverse = basis.inverse()?.clone();
        self.b = multiply_vector(&self.basis_inverse, self.problem.b());
        self.updates_since_reinversion = 0;
        trace!("Recomputed the basis inverse");

        Ok(())
    }

    /// Recompute `c_B^T B^-1`.
    fn compute_pi(&mut self) {
        let m = self.nr_rows();
        self.pi = (0..m)
            .map(|k| {
                self.basis_indices.iter()
                    .enumerate()
                    .map(|(i, &j)| self.cost[j] * self.basis_inverse[(i, k)])
                    .sum()
            })
            .collect();
    }

    /// Calculates the relative cost of a column.
    ///
    /// # Arguments
    ///
    /// * `j`: Index of column to calculate the relative cost for, in range `0` until
    /// `self.nr_columns()`.
    ///
    /// # Return value
    ///
    /// `c_j - pi^T a_j`, zero for basis columns up to rounding.
    pub fn relative_cost(&self, j: usize) -> f64 {
        debug_assert!(j < self.nr_columns());

        let reduction = self.problem.constraints().column_iter(j)
            .zip(&self.pi)
            .map(|(a, pi)| a * pi)
            .sum::<f64>();
        self.cost[j] - reduction
    }

    /// Column of original problem with respect to the current basis.
    ///
    /// Generate a column of the tableau as it would look like with the current basis by matrix
    /// multiplying the original column and the basis inverse.
    ///
    /// # Arguments
    ///
    /// * `j`: Column index of the variable, in range `0` until `self.nr_columns()`.
    ///
    /// # Return value
    ///
    /// Vector of size `m`.
    pub fn generate_column(&self, j: usize) -> Vec<f64> {
        debug_assert!(j < self.nr_columns());

        multiply_vector(&self.basis_inverse, &self.problem.column(j))
    }

    /// Single element with respect to the current basis.
    pub fn generate_element(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.nr_rows());
        debug_assert!(j < self.nr_columns());

        self.basis_inverse.row_slice(i).iter()
            .zip(self.problem.constraints().column_iter(j))
            .map(|(inverse, a)| inverse * a)
            .sum()
    }

    /// Determine the row to pivot on.
    ///
    /// Determine the row to pivot on, given the column. This is the row with the positive but
    /// minimal ratio between the current constraint vector and the column. Among rows with the same
    /// ratio, the one whose basic variable has the lowest index is chosen (Bland's rule).
    ///
    /// # Return value
    ///
    /// Index of the row to pivot on. If not found, the problem is optimal.
    pub fn select_primal_pivot_row(&self, column: &[f64]) -> Option<usize> {
        debug_assert_eq!(column.len(), self.nr_rows());

        let tolerance = self.settings.tolerance();
        // (chosen index, minimum ratio, corresponding leaving_column (for Bland's algorithm))
        let mut min_values: Option<(usize, f64, usize)> = None;
        for (row, &xij) in column.iter().enumerate() {
            if xij > tolerance {
                let ratio = self.b[row].max(0f64) / xij;
                let leaving_column = self.basis_indices[row];
                if let Some((min_index, min_ratio, min_leaving_column)) = &mut min_values {
                    if (ratio - *min_ratio).abs() <= tolerance {
                        if leaving_column < *min_leaving_column {
                            *min_index = row;
                            *min_leaving_column = leaving_column;
                        }
                    } else if ratio < *min_ratio {
                        *min_index = row;
                        *min_ratio = ratio;
                        *min_leaving_column = leaving_column;
                    }
                } else {
                    min_values = Some((row, ratio, leaving_column));
                }
            }
        }

        min_values.map(|(min_index, _, _)| min_index)
    }

    /// Whether a column is in the basis.
    pub fn is_in_basis(&self, column: &usize) -> bool {
        debug_assert!(*column < self.nr_columns());

        self.basis_columns.contains(column)
    }

    /// Column that is basic in row `i`.
    pub fn basis_column_index_for_row(&self, i: usize) -> usize {
        self.basis_indices[i]
    }

    /// Rows of which the basic variable is artificial, sorted.
    pub fn artificial_basis_rows(&self) -> Vec<usize> {
        (0..self.nr_rows())
            .filter(|&i| self.problem.is_artificial(self.basis_indices[i]))
            .collect()
    }

    /// Whether any artificial variable is still basic.
    pub fn has_artificial_in_basis(&self) -> bool {
        self.basis_indices.iter().any(|&j| self.problem.is_artificial(j))
    }

    /// Value of every column in the current basic feasible solution.
    pub fn current_bfs(&self) -> Vec<f64> {
        let mut x = vec![0f64; self.nr_columns()];
        for (&j, &value) in self.basis_indices.iter().zip(&self.b) {
            x[j] = value;
        }

        x
    }

    /// Objective value of the current phase.
    pub fn objective_function_value(&self) -> f64 {
        self.basis_indices.iter()
            .zip(&self.b)
            .map(|(&j, value)| self.cost[j] * value)
            .sum()
    }

    /// Number of columns that may enter the basis, starting at column `0`.
    pub fn nr_candidate_columns(&self) -> usize {
        self.problem.nr_candidate_columns()
    }

    /// The number of rows in the tableau.
    pub fn nr_rows(&self) -> usize {
        self.problem.nr_rows()
    }

    /// The number of columns in the tableau, including artificial columns.
    pub fn nr_columns(&self) -> usize {
        self.problem.nr_columns()
    }
}

impl Tableau<'_> {
    /// The same table as `Display`, with a header naming the problem.
    pub fn dump<'t>(&'t self, name: &'t str) -> impl Display + 't {
        Dump { tableau: self, name: Some(name) }
    }

    fn write_table(&self, f: &mut Formatter, name: Option<&str>) -> FormatResult {
        match name {
            Some(name) => writeln!(f, "=== Tableau {name} ===")?,
            None => writeln!(f, "=== Tableau ===")?,
        }
        let objective = (-self.objective_function_value()).to_string();
        let cost = (0..self.nr_columns())
            .map(|j| self.relative_cost(j).to_string())
            .collect::<Vec<_>>();
        let b = self.b.iter().map(f64::to_string).collect::<Vec<_>>();
        let columns = (0..self.nr_columns())
            .map(|j| self.generate_column(j).iter().map(f64::to_string).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        let row_counter_width = max("cost".len(), self.nr_rows().to_string().len());
        let column_width = columns.iter().enumerate()
            .map(|(j, column)| {
                [
                    column.iter().map(String::len).max().unwrap_or(0),
                    j.to_string().len(),
                    cost[j].len(),
                ].into_iter().max().unwrap_or(0)
            })
            .collect::<Vec<_>>();
        let b_inner_width = max(b.iter().map(String::len).max().unwrap_or(0), objective.len());

        // Column counters
        write!(f, "{0:>width$} |", "", width = row_counter_width)?;
        write!(f, " {0:^width$} |", "b", width = b_inner_width)?;
        for (j, &width) in column_width.iter().enumerate() {
            write!(f, " {j:^width$}")?;
        }
        writeln!(f)?;

        let total_width = (row_counter_width + 1) + 1 + (1 + b_inner_width + 1) + 1 +
            column_width.iter().map(|l| 1 + l).sum::<usize>();
        writeln!(f, "{}", "-".repeat(total_width))?;

        // Cost row
        write!(f, "{0:>width$} |", "cost", width = row_counter_width)?;
        write!(f, " {0:^width$} |", objective, width = b_inner_width)?;
        for (j, &width) in column_width.iter().enumerate() {
            write!(f, " {0:^width$}", cost[j])?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(total_width))?;

        // Row counter and row data
        for i in 0..self.nr_rows() {
            write!(f, "{0:>width$} |", i, width = row_counter_width)?;
            write!(f, " {0:^width$} |", b[i], width = b_inner_width)?;
            for (j, &width) in column_width.iter().enumerate() {
                write!(f, " {0:^width$}", columns[j][i])?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Basis Columns ===")?;
        writeln!(f, "{:?}", self.basis_indices.iter().enumerate().collect::<Vec<_>>())
    }
}

struct Dump<'t, 'a> {
    tableau: &'t Tableau<'a>,
    name: Option<&'t str>,
}

impl Display for Dump<'_, '_> {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        self.tableau.write_table(f, self.name)
    }
}

impl Display for Tableau<'_> {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        self.write_table(f, None)
    }
}
