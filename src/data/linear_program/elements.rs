//! # Building blocks to describe linear programs.
use std::fmt;

use enum_map::Enum;

use crate::data::linear_algebra::matrix::Matrix;
use crate::error::Error;

/// A `Constraint` is a type of (in)equality, or a sign restriction on a single variable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Enum)]
pub enum ConstraintType {
    /// `a^T x <= b`
    LessEqual,
    /// `a^T x >= b`
    GreaterEqual,
    /// `a^T x == b`
    Equal,
    /// `x_j >= 0` for the single variable `j` with a nonzero coefficient.
    ///
    /// Doesn't become a row of the linear program. The right-hand side should be zero.
    NonNegative,
}

impl ConstraintType {
    /// The type after multiplying both sides by `-1`.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::LessEqual => Self::GreaterEqual,
            Self::GreaterEqual => Self::LessEqual,
            other => other,
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NonNegative => ">= 0",
        })
    }
}

/// Direction of optimization.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Objective {
    Maximize,
    #[default]
    Minimize,
}

/// A single row `a^T x (<=, >=, ==) b`, or a sign restriction.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    /// A `1 x n` matrix.
    coefficients: Matrix,
    constraint_type: ConstraintType,
    right_hand_side: f64,
}

impl Constraint {
    /// Create a new constraint.
    ///
    /// # Arguments
    ///
    /// * `coefficients`: A `1 x n` matrix, one value per variable.
    /// * `constraint_type`: Relation between the left- and right-hand side.
    /// * `right_hand_side`: Constant on the right.
    ///
    /// # Errors
    ///
    /// A `Dimension` error if the coefficients are not a single row, `MalformedBound` if the
    /// right-hand side is not finite.
    pub fn new(coefficients: Matrix, constraint_type: ConstraintType, right_hand_side: f64) -> Result<Self, Error> {
        if coefficients.nr_rows() != 1 {
            return Err(Error::Dimension {
                operation: "constraint construction",
                left: (1, coefficients.nr_columns()),
                right: coefficients.dim(),
            });
        }
        if !right_hand_side.is_finite() {
            return Err(Error::MalformedBound(format!("right-hand side {right_hand_side} is not finite")));
        }

        Ok(Self { coefficients, constraint_type, right_hand_side })
    }

    /// A sign restriction on variable `variable` out of `nr_variables`.
    ///
    /// # Errors
    ///
    /// An `Index` error if the variable doesn't exist.
    pub fn non_negative(variable: usize, nr_variables: usize) -> Result<Self, Error> {
        let mut coefficients = Matrix::new(1, nr_variables);
        coefficients.set(0, variable, 1f64)?;

        Self::new(coefficients, ConstraintType::NonNegative, 0f64)
    }

    /// The `1 x n` coefficient row.
    pub fn coefficients(&self) -> &Matrix {
        &self.coefficients
    }

    #[allow(missing_docs)]
    pub fn constraint_type(&self) -> ConstraintType {
        self.constraint_type
    }

    #[allow(missing_docs)]
    pub fn right_hand_side(&self) -> f64 {
        self.right_hand_side
    }

    /// Number of variables this constraint is defined over.
    pub fn nr_variables(&self) -> usize {
        self.coefficients.nr_columns()
    }

    /// The variable restricted by a `NonNegative` constraint.
    ///
    /// # Errors
    ///
    /// `MalformedBound` unless exactly one coefficient is nonzero, that coefficient is positive and
    /// the right-hand side is zero.
    pub fn bounded_variable(&self) -> Result<usize, Error> {
        debug_assert_eq!(self.constraint_type, ConstraintType::NonNegative);

        let mut nonzeros = self.coefficients.values().iter()
            .enumerate()
            .filter(|&(_, v)| *v != 0f64);
        match (nonzeros.next(), nonzeros.next()) {
            (Some((j, &value)), None) if value > 0f64 && self.right_hand_side == 0f64 => Ok(j),
            (Some(_), None) => Err(Error::MalformedBound(format!(
                "{self} should have a positive coefficient and a zero right-hand side",
            ))),
            _ => Err(Error::MalformedBound(format!("{self} should name exactly one variable"))),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#}] {}", self.coefficients, self.constraint_type)?;
        if self.constraint_type != ConstraintType::NonNegative {
            write!(f, " {}", self.right_hand_side)?;
        }
        Ok(())
    }
}

/// The function to optimize: a direction and one cost per variable.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectiveFunction {
    direction: Objective,
    /// A `1 x n` matrix.
    coefficients: Matrix,
}

impl ObjectiveFunction {
    /// Create a new objective function.
    ///
    /// # Errors
    ///
    /// A `Dimension` error if the coefficients are not a single row.
    pub fn new(direction: Objective, coefficients: Matrix) -> Result<Self, Error> {
        if coefficients.nr_rows() != 1 {
            return Err(Error::Dimension {
                operation: "objective function construction",
                left: (1, coefficients.nr_columns()),
                right: coefficients.dim(),
            });
        }

        Ok(Self { direction, coefficients })
    }

    #[allow(missing_docs)]
    pub fn direction(&self) -> Objective {
        self.direction
    }

    /// The `1 x n` cost row.
    pub fn coefficients(&self) -> &Matrix {
        &self.coefficients
    }

    /// Number of variables this objective is defined over.
    pub fn nr_variables(&self) -> usize {
        self.coefficients.nr_columns()
    }

    /// Value of the objective at `x`.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), self.nr_variables());

        self.coefficients.values().iter().zip(x).map(|(c, v)| c * v).sum()
    }
}

#[cfg(test)]
mod test {
    use crate::data::linear_algebra::matrix::Matrix;
    use crate::data::linear_program::elements::{Constraint, ConstraintType, Objective, ObjectiveFunction};
    use crate::error::Error;

    #[test]
    fn construction() {
        let constraint = Constraint::new("1 2 3".parse().unwrap(), ConstraintType::LessEqual, 4f64).unwrap();
        assert_eq!(constraint.nr_variables(), 3);
        assert_eq!(constraint.to_string(), "[1 2 3] <= 4");

        let column = Matrix::column_vector(vec![1f64, 2f64]);
        assert!(matches!(Constraint::new(column.clone(), ConstraintType::Equal, 1f64), Err(Error::Dimension { .. })));
        assert!(matches!(ObjectiveFunction::new(Objective::Minimize, column), Err(Error::Dimension { .. })));
        assert!(matches!(
            Constraint::new("1".parse().unwrap(), ConstraintType::LessEqual, f64::NAN),
            Err(Error::MalformedBound(_)),
        ));
    }

    #[test]
    fn bounded_variable() {
        assert_eq!(Constraint::non_negative(2, 4).unwrap().bounded_variable(), Ok(2));

        let scaled = Constraint::new("0 3".parse().unwrap(), ConstraintType::NonNegative, 0f64).unwrap();
        assert_eq!(scaled.bounded_variable(), Ok(1));

        for (literal, right_hand_side) in [("1 1", 0f64), ("0 0", 0f64), ("-1 0", 0f64), ("1 0", 2f64)] {
            let constraint = Constraint::new(literal.parse().unwrap(), ConstraintType::NonNegative, right_hand_side).unwrap();
            assert!(matches!(constraint.bounded_variable(), Err(Error::MalformedBound(_))));
        }

        assert!(matches!(Constraint::non_negative(4, 4), Err(Error::Index { .. })));
    }

    #[test]
    fn objective() {
        let objective = ObjectiveFunction::new(Objective::Maximize, "3 5".parse().unwrap()).unwrap();
        assert_eq!(objective.evaluate(&[2f64, 6f64]), 36f64);
        assert_eq!(Objective::default(), Objective::Minimize);
        assert_eq!(ConstraintType::GreaterEqual.flipped(), ConstraintType::LessEqual);
        assert_eq!(ConstraintType::Equal.flipped(), ConstraintType::Equal);
    }
}
