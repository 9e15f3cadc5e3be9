//! Minimize `x0 + 2 x1 + 3 x2` subject to
//!
//! ```text
//! x0 + x1 + x2 <= 6
//! x0 - x1      >= 2
//! x0 + x1      == 6
//! x0, x1, x2   >= 0
//! ```
//!
//! The optimum is at `(6, 0, 0)`, with value `6`. Maximized, it is at `(4, 2, 0)` with value `8`.
use crate::algorithm::two_phase::standard_form::StandardForm;
use crate::data::linear_algebra::EPSILON;
use crate::data::linear_program::elements::{Constraint, ConstraintType, Objective, ObjectiveFunction};

pub fn constraints() -> Vec<Constraint> {
    let mut constraints = vec![
        Constraint::new("1 1 1".parse().unwrap(), ConstraintType::LessEqual, 6f64).unwrap(),
        Constraint::new("1 -1 0".parse().unwrap(), ConstraintType::GreaterEqual, 2f64).unwrap(),
        Constraint::new("1 1 0".parse().unwrap(), ConstraintType::Equal, 6f64).unwrap(),
    ];
    for j in 0..3 {
        constraints.push(Constraint::non_negative(j, 3).unwrap());
    }

    constraints
}

pub fn objective(direction: Objective) -> ObjectiveFunction {
    ObjectiveFunction::new(direction, "1 2 3".parse().unwrap()).unwrap()
}

/// Columns `0..3` are structural, `3` is the slack of the first row, `4` the surplus of the
/// second and `5`, `6` are artificial.
pub fn standard_form() -> StandardForm {
    StandardForm::new(&constraints(), &objective(Objective::Minimize), EPSILON).unwrap()
}

pub fn maximization_standard_form() -> StandardForm {
    StandardForm::new(&constraints(), &objective(Objective::Maximize), EPSILON).unwrap()
}

/// Minimize `x0` subject to `x0 + x1 == 2` and `2 x0 + 2 x1 == 4`, the second row is redundant.
pub fn redundant_standard_form() -> StandardForm {
    let constraints = [
        Constraint::new("1 1".parse().unwrap(), ConstraintType::Equal, 2f64).unwrap(),
        Constraint::new("2 2".parse().unwrap(), ConstraintType::Equal, 4f64).unwrap(),
        Constraint::non_negative(0, 2).unwrap(),
        Constraint::non_negative(1, 2).unwrap(),
    ];
    let objective = ObjectiveFunction::new(Objective::Minimize, "1 0".parse().unwrap()).unwrap();

    StandardForm::new(&constraints, &objective, EPSILON).unwrap()
}
