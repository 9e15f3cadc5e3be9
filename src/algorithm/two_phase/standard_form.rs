//! # Standard form
//!
//! Rewrites constraints and an objective into `min c^T x` subject to `Ax = b`, `x >= 0` and
//! `b >= 0`, with an identity matrix of slack and artificial columns for the initial basis.
//!
//! The columns are ordered as follows: one column for each original variable, one column for the
//! negative part of each free variable, the slack and surplus columns and finally the artificial
//! columns.
use std::ops::Range;

use enum_map::EnumMap;
use log::debug;

use crate::data::linear_algebra::is_negligible;
use crate::data::linear_algebra::matrix::Matrix;
use crate::data::linear_program::elements::{Constraint, ConstraintType, Objective, ObjectiveFunction};
use crate::error::Error;

/// A linear program in equality form with a nonnegative right-hand side.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardForm {
    /// `m x nr_columns`.
    constraints: Matrix,
    /// Length `m`, all values nonnegative.
    b: Vec<f64>,
    /// Minimization cost of each column, zero for slack and artificial columns.
    cost: Vec<f64>,
    direction: Objective,
    /// For each original variable, the column of its negative part if it is free.
    negative_parts: Vec<Option<usize>>,
    slack_columns: Range<usize>,
    artificial_columns: Range<usize>,
    /// For each row, the slack or artificial column that forms the initial basis.
    initial_basis: Vec<usize>,
}

/// A constraint row after making the right-hand side nonnegative.
struct NormalizedRow {
    coefficients: Vec<f64>,
    constraint_type: ConstraintType,
    right_hand_side: f64,
}

impl StandardForm {
    /// Bring a linear program into standard form.
    ///
    /// Variables that are not restricted by a `NonNegative` constraint are free, and get split
    /// into a positive and a negative part.
    ///
    /// # Errors
    ///
    /// `MalformedBound` for a `NonNegative` constraint that doesn't restrict exactly one variable,
    /// and a `Dimension` error if a constraint doesn't match the number of variables of the
    /// objective.
    pub fn new(
        constraints: &[Constraint],
        objective: &ObjectiveFunction,
        tolerance: f64,
    ) -> Result<Self, Error> {
        let nr_variables = objective.nr_variables();
        if let Some(constraint) = constraints.iter().find(|c| c.nr_variables() != nr_variables) {
            return Err(Error::Dimension {
                operation: "standard form",
                left: (1, nr_variables),
                right: constraint.coefficients().dim(),
            });
        }

        let mut counts = EnumMap::<ConstraintType, usize>::default();
        for constraint in constraints {
            counts[constraint.constraint_type()] += 1;
        }
        debug!("Constraint types: {:?}", counts.iter().collect::<Vec<_>>());

        let mut is_non_negative = vec![false; nr_variables];
        for constraint in constraints.iter().filter(|c| c.constraint_type() == ConstraintType::NonNegative) {
            is_non_negative[constraint.bounded_variable()?] = true;
        }

        let mut next_column = nr_variables;
        let negative_parts = is_non_negative.iter()
            .map(|&non_negative| if non_negative {
                None
            } else {
                next_column += 1;
                Some(next_column - 1)
            })
            .collect::<Vec<_>>();
        let nr_structural = next_column;

        let rows = constraints.iter()
            .filter(|c| c.constraint_type() != ConstraintType::NonNegative)
            .map(|constraint| normalize(constraint, &negative_parts, nr_structural, tolerance))
            .collect::<Vec<_>>();

        let nr_slack = rows.iter()
            .filter(|row| row.constraint_type != ConstraintType::Equal)
            .count();
        let nr_artificial = rows.iter()
            .filter(|row| row.constraint_type != ConstraintType::LessEqual)
            .count();
        let slack_columns = nr_structural..(nr_structural + nr_slack);
        let artificial_columns = slack_columns.end..(slack_columns.end + nr_artificial);
        let nr_columns = artificial_columns.end;

        let mut matrix = Matrix::new(rows.len(), nr_columns);
        let mut b = Vec::with_capacity(rows.len());
        let mut initial_basis = Vec::with_capacity(rows.len());
        let (mut slack, mut artificial) = (slack_columns.start, artificial_columns.start);
        for (i, row) in rows.into_iter().enumerate() {
            matrix.row_slice_mut(i)[..nr_structural].copy_from_slice(&row.coefficients);
            b.push(row.right_hand_side);

            match row.constraint_type {
                ConstraintType::LessEqual => {
                    matrix[(i, slack)] = 1f64;
                    initial_basis.push(slack);
                    slack += 1;
                },
                ConstraintType::GreaterEqual => {
                    matrix[(i, slack)] = -1f64;
                    slack += 1;
                    matrix[(i, artificial)] = 1f64;
                    initial_basis.push(artificial);
                    artificial += 1;
                },
                ConstraintType::Equal => {
                    matrix[(i, artificial)] = 1f64;
                    initial_basis.push(artificial);
                    artificial += 1;
                },
                ConstraintType::NonNegative => unreachable!("bounds are not rows"),
            }
        }

        let sign = match objective.direction() {
            Objective::Minimize => 1f64,
            Objective::Maximize => -1f64,
        };
        let mut cost = vec![0f64; nr_columns];
        for (j, &c) in objective.coefficients().values().iter().enumerate() {
            cost[j] = sign * c;
            if let Some(negative) = negative_parts[j] {
                cost[negative] = -sign * c;
            }
        }

        debug!(
            "Standard form with {} rows, {} structural, {} slack and {} artificial columns",
            matrix.nr_rows(), nr_structural, nr_slack, nr_artificial,
        );

        Ok(Self {
            constraints: matrix,
            b,
            cost,
            direction: objective.direction(),
            negative_parts,
            slack_columns,
            artificial_columns,
            initial_basis,
        })
    }

    /// The constraint matrix `A`.
    pub fn constraints(&self) -> &Matrix {
        &self.constraints
    }

    /// The right-hand side `b`.
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Column `j` of `A`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.constraints.column_iter(j).collect()
    }

    /// Minimization cost of each column.
    pub fn cost(&self) -> &[f64] {
        &self.cost
    }

    /// Cost of the first phase: one for each artificial column, zero elsewhere.
    pub fn artificial_cost(&self) -> Vec<f64> {
        (0..self.nr_columns())
            .map(|j| if self.is_artificial(j) { 1f64 } else { 0f64 })
            .collect()
    }

    #[allow(missing_docs)]
    pub fn nr_rows(&self) -> usize {
        self.constraints.nr_rows()
    }

    #[allow(missing_docs)]
    pub fn nr_columns(&self) -> usize {
        self.constraints.nr_columns()
    }

    /// Number of variables of the original problem.
    pub fn nr_variables(&self) -> usize {
        self.negative_parts.len()
    }

    #[allow(missing_docs)]
    pub fn nr_artificial_variables(&self) -> usize {
        self.artificial_columns.len()
    }

    /// Columns of slack and surplus variables.
    pub fn slack_columns(&self) -> Range<usize> {
        self.slack_columns.clone()
    }

    /// Whether column `j` belongs to an artificial variable.
    pub fn is_artificial(&self, j: usize) -> bool {
        self.artificial_columns.contains(&j)
    }

    /// Columns that may enter the basis: all except the artificial ones.
    pub fn nr_candidate_columns(&self) -> usize {
        self.artificial_columns.start
    }

    /// For each row, the column of the initial basis.
    pub fn initial_basis(&self) -> &[usize] {
        &self.initial_basis
    }

    /// Values of the original variables given a value for each column.
    pub fn original_values(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.nr_columns());

        self.negative_parts.iter()
            .enumerate()
            .map(|(j, negative)| match negative {
                Some(negative) => x[j] - x[*negative],
                None => x[j],
            })
            .collect()
    }

    /// Objective value in the original direction given the minimization objective value.
    pub fn original_objective_value(&self, value: f64) -> f64 {
        match self.direction {
            Objective::Minimize => value,
            Objective::Maximize => -value,
        }
    }
}

/// Expand a row to all structural columns and make the right-hand side nonnegative.
///
/// A `>=` row with a zero right-hand side becomes a `<=` row, such that its slack can be used in
/// the initial basis.
fn normalize(
    constraint: &Constraint,
    negative_parts: &[Option<usize>],
    nr_structural: usize,
    tolerance: f64,
) -> NormalizedRow {
    let mut coefficients = vec![0f64; nr_structural];
    for (j, &value) in constraint.coefficients().values().iter().enumerate() {
        coefficients[j] = value;
        if let Some(negative) = negative_parts[j] {
            coefficients[negative] = -value;
        }
    }

    let mut constraint_type = constraint.constraint_type();
    let mut right_hand_side = constraint.right_hand_side();
    if is_negligible(right_hand_side, tolerance) {
        right_hand_side = 0f64;
    }

    let flip = right_hand_side < 0f64
        || (right_hand_side == 0f64 && constraint_type == ConstraintType::GreaterEqual);
    if flip {
        for value in &mut coefficients {
            *value = -*value;
        }
        right_hand_side = -right_hand_side;
        constraint_type = constraint_type.flipped();
    }

    NormalizedRow { coefficients, constraint_type, right_hand_side }
}

#[cfg(test)]
mod test {
    use crate::algorithm::two_phase::standard_form::StandardForm;
    use crate::data::linear_algebra::EPSILON;
    use crate::data::linear_algebra::matrix::Matrix;
    use crate::data::linear_program::elements::{Constraint, ConstraintType, Objective, ObjectiveFunction};
    use crate::error::Error;

    fn constraint(literal: &str, constraint_type: ConstraintType, right_hand_side: f64) -> Constraint {
        Constraint::new(literal.parse().unwrap(), constraint_type, right_hand_side).unwrap()
    }

    #[test]
    fn columns() {
        let constraints = [
            constraint("1 1", ConstraintType::LessEqual, 4f64),
            constraint("1 -1", ConstraintType::GreaterEqual, 1f64),
            constraint("2 1", ConstraintType::Equal, 5f64),
            Constraint::non_negative(0, 2).unwrap(),
            Constraint::non_negative(1, 2).unwrap(),
        ];
        let objective = ObjectiveFunction::new(Objective::Maximize, "3 2".parse().unwrap()).unwrap();
        let form = StandardForm::new(&constraints, &objective, EPSILON).unwrap();

        let expected: Matrix = "1 1 1 0 0 0; 1 -1 0 -1 1 0; 2 1 0 0 0 1".parse().unwrap();
        assert_eq!(form.constraints(), &expected);
        assert_eq!(form.b(), &[4f64, 1f64, 5f64]);
        assert_eq!(form.cost(), &[-3f64, -2f64, 0f64, 0f64, 0f64, 0f64]);
        assert_eq!(form.initial_basis(), &[2, 4, 5]);
        assert_eq!(form.slack_columns(), 2..4);
        assert_eq!(form.nr_artificial_variables(), 2);
        assert_eq!(form.nr_candidate_columns(), 4);
        assert_eq!(form.artificial_cost(), vec![0f64, 0f64, 0f64, 0f64, 1f64, 1f64]);
        assert_eq!(form.original_objective_value(-7f64), 7f64);
    }

    #[test]
    fn free_variables() {
        let constraints = [
            constraint("1 1", ConstraintType::LessEqual, 4f64),
            Constraint::non_negative(1, 2).unwrap(),
        ];
        let objective = ObjectiveFunction::new(Objective::Minimize, "1 2".parse().unwrap()).unwrap();
        let form = StandardForm::new(&constraints, &objective, EPSILON).unwrap();

        // The first variable is free, its negative part is column 2
        assert_eq!(form.constraints(), &"1 1 -1 1".parse::<Matrix>().unwrap());
        assert_eq!(form.cost(), &[1f64, 2f64, -1f64, 0f64]);
        assert_eq!(form.original_values(&[1f64, 2f64, 3f64, 0f64]), vec![-2f64, 2f64]);
        assert_eq!(form.nr_variables(), 2);
    }

    #[test]
    fn nonnegative_right_hand_side() {
        let constraints = [
            constraint("1 2", ConstraintType::LessEqual, -3f64),
            constraint("1 1", ConstraintType::GreaterEqual, 0f64),
            constraint("-1 1", ConstraintType::Equal, -1f64),
            Constraint::non_negative(0, 2).unwrap(),
            Constraint::non_negative(1, 2).unwrap(),
        ];
        let objective = ObjectiveFunction::new(Objective::Minimize, "1 1".parse().unwrap()).unwrap();
        let form = StandardForm::new(&constraints, &objective, EPSILON).unwrap();

        // -x - 2y >= 3, -x - y <= 0, x - y == 1
        let expected: Matrix = "-1 -2 -1 0 1 0; -1 -1 0 1 0 0; 1 -1 0 0 0 1".parse().unwrap();
        assert_eq!(form.constraints(), &expected);
        assert_eq!(form.b(), &[3f64, 0f64, 1f64]);
        assert_eq!(form.initial_basis(), &[4, 3, 5]);
        assert!(form.b().iter().all(|&v| v >= 0f64));
    }

    #[test]
    fn errors() {
        let objective = ObjectiveFunction::new(Objective::Minimize, "1 1".parse().unwrap()).unwrap();

        let constraints = [constraint("1 1", ConstraintType::NonNegative, 0f64)];
        assert!(matches!(StandardForm::new(&constraints, &objective, EPSILON), Err(Error::MalformedBound(_))));

        let constraints = [constraint("1 1 1", ConstraintType::LessEqual, 0f64)];
        assert!(matches!(StandardForm::new(&constraints, &objective, EPSILON), Err(Error::Dimension { .. })));
    }

    #[test]
    fn without_rows() {
        let constraints = [Constraint::non_negative(0, 1).unwrap()];
        let objective = ObjectiveFunction::new(Objective::Minimize, "-1".parse().unwrap()).unwrap();
        let form = StandardForm::new(&constraints, &objective, EPSILON).unwrap();

        assert_eq!(form.nr_rows(), 0);
        assert_eq!(form.nr_columns(), 1);
        assert!(form.initial_basis().is_empty());
    }
}
