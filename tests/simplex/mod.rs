use approx::assert_abs_diff_eq;

use dense_lp::algorithm::OptimizationResult;
use dense_lp::algorithm::two_phase::{Simplex, State};
use dense_lp::algorithm::two_phase::settings::SimplexSettings;
use dense_lp::data::linear_algebra::matrix::Matrix;
use dense_lp::data::linear_program::elements::{Constraint, ConstraintType, Objective, ObjectiveFunction};
use dense_lp::Error;

fn constraint(literal: &str, constraint_type: ConstraintType, right_hand_side: f64) -> Constraint {
    Constraint::new(literal.parse::<Matrix>().unwrap(), constraint_type, right_hand_side).unwrap()
}

fn objective(direction: Objective, literal: &str) -> ObjectiveFunction {
    ObjectiveFunction::new(direction, literal.parse().unwrap()).unwrap()
}

fn non_negative(simplex: &mut Simplex, nr_variables: usize) {
    for j in 0..nr_variables {
        simplex.add_constraint(Constraint::non_negative(j, nr_variables).unwrap()).unwrap();
    }
}

#[test]
fn maximize_with_slack_basis() {
    let mut simplex = Simplex::new("production");
    simplex.add_constraint(constraint("1 0", ConstraintType::LessEqual, 4f64)).unwrap();
    simplex.add_constraint(constraint("0 2", ConstraintType::LessEqual, 12f64)).unwrap();
    simplex.add_constraint(constraint("3 2", ConstraintType::LessEqual, 18f64)).unwrap();
    non_negative(&mut simplex, 2);
    simplex.set_objective_function(objective(Objective::Maximize, "3 5")).unwrap();

    let result = simplex.solve().unwrap();
    let solution = result.solution().unwrap();
    assert_abs_diff_eq!(solution.objective_value(), 36f64, epsilon = 1e-8);
    assert_abs_diff_eq!(solution.values(), &[2f64, 6f64][..], epsilon = 1e-8);
    assert_eq!(simplex.state(), State::Optimal);
}

#[test]
fn minimize_with_artificial_variables() {
    let mut simplex = Simplex::new("covering");
    simplex.add_constraint(constraint("1 2", ConstraintType::GreaterEqual, 4f64)).unwrap();
    simplex.add_constraint(constraint("3 1", ConstraintType::GreaterEqual, 6f64)).unwrap();
    non_negative(&mut simplex, 2);
    simplex.set_objective_function(objective(Objective::Minimize, "1 1")).unwrap();

    let result = simplex.solve().unwrap();
    let solution = result.solution().unwrap();
    assert_abs_diff_eq!(solution.objective_value(), 2.8f64, epsilon = 1e-8);
    assert_abs_diff_eq!(solution.values(), &[1.6f64, 1.2f64][..], epsilon = 1e-8);
}

#[test]
fn equality() {
    let mut simplex = Simplex::new("equality");
    simplex.add_constraint(constraint("1 1", ConstraintType::Equal, 10f64)).unwrap();
    simplex.add_constraint(constraint("1 0", ConstraintType::LessEqual, 6f64)).unwrap();
    non_negative(&mut simplex, 2);
    simplex.set_objective_function(objective(Objective::Minimize, "2 3")).unwrap();

    let result = simplex.solve().unwrap();
    let solution = result.solution().unwrap();
    assert_abs_diff_eq!(solution.objective_value(), 24f64, epsilon = 1e-8);
    assert_abs_diff_eq!(solution.values(), &[6f64, 4f64][..], epsilon = 1e-8);
}

#[test]
fn free_variable() {
    let mut simplex = Simplex::new("free");
    simplex.add_constraint(constraint("1", ConstraintType::GreaterEqual, -3f64)).unwrap();
    simplex.set_objective_function(objective(Objective::Minimize, "1")).unwrap();

    let result = simplex.solve().unwrap();
    let solution = result.solution().unwrap();
    assert_abs_diff_eq!(solution.objective_value(), -3f64, epsilon = 1e-8);
    assert_abs_diff_eq!(solution.values(), &[-3f64][..], epsilon = 1e-8);
}

#[test]
fn infeasible() {
    let mut simplex = Simplex::new("infeasible");
    simplex.add_constraint(constraint("1", ConstraintType::GreaterEqual, 5f64)).unwrap();
    simplex.add_constraint(constraint("1", ConstraintType::LessEqual, 2f64)).unwrap();
    non_negative(&mut simplex, 1);
    simplex.set_objective_function(objective(Objective::Minimize, "1")).unwrap();

    assert_eq!(simplex.solve(), Ok(OptimizationResult::Infeasible));
    assert_eq!(simplex.state(), State::Infeasible);
    assert!(simplex.solution().is_none());
}

#[test]
fn unbounded() {
    let mut simplex = Simplex::new("unbounded");
    non_negative(&mut simplex, 1);
    simplex.set_objective_function(objective(Objective::Minimize, "-1")).unwrap();

    assert_eq!(simplex.solve(), Ok(OptimizationResult::Unbounded));
    assert_eq!(simplex.state(), State::Unbounded);

    let mut simplex = Simplex::new("unbounded with rows");
    simplex.add_constraint(constraint("1 -1", ConstraintType::LessEqual, 1f64)).unwrap();
    non_negative(&mut simplex, 2);
    simplex.set_objective_function(objective(Objective::Maximize, "1 1")).unwrap();
    assert_eq!(simplex.solve(), Ok(OptimizationResult::Unbounded));
}

#[test]
fn redundant_equalities() {
    let mut simplex = Simplex::new("redundant");
    simplex.add_constraint(constraint("1 1", ConstraintType::Equal, 2f64)).unwrap();
    simplex.add_constraint(constraint("2 2", ConstraintType::Equal, 4f64)).unwrap();
    non_negative(&mut simplex, 2);
    simplex.set_objective_function(objective(Objective::Minimize, "1 2")).unwrap();

    let result = simplex.solve().unwrap();
    let solution = result.solution().unwrap();
    assert_abs_diff_eq!(solution.objective_value(), 2f64, epsilon = 1e-8);
    assert_abs_diff_eq!(solution.values(), &[2f64, 0f64][..], epsilon = 1e-8);
}

/// Beale's example cycles with the largest coefficient rule and an unlucky choice of leaving row.
fn beale(settings: SimplexSettings) -> Simplex {
    let mut simplex = Simplex::with_settings("beale", settings);
    simplex.add_constraint(constraint("0.25 -8 -1 9", ConstraintType::LessEqual, 0f64)).unwrap();
    simplex.add_constraint(constraint("0.5 -12 -0.5 3", ConstraintType::LessEqual, 0f64)).unwrap();
    simplex.add_constraint(constraint("0 0 1 0", ConstraintType::LessEqual, 1f64)).unwrap();
    non_negative(&mut simplex, 4);
    simplex.set_objective_function(objective(Objective::Maximize, "0.75 -20 0.5 -6")).unwrap();

    simplex
}

#[test]
fn degenerate() {
    for settings in [
        SimplexSettings::default(),
        SimplexSettings::custom().bland_after(0).build().unwrap(),
        SimplexSettings::custom().reinversion_interval(1).build().unwrap(),
    ] {
        let mut simplex = beale(settings);
        let result = simplex.solve().unwrap();
        let solution = result.solution().unwrap();
        assert_abs_diff_eq!(solution.objective_value(), 1.25f64, epsilon = 1e-8);
        assert_abs_diff_eq!(solution.values(), &[1f64, 0f64, 1f64, 0f64][..], epsilon = 1e-8);
    }
}

#[test]
fn iteration_limit() {
    let settings = SimplexSettings::custom().bland_after(0).max_iterations(0).build().unwrap();
    let mut simplex = beale(settings);

    assert_eq!(simplex.solve(), Err(Error::NonTermination { iterations: 0 }));
    assert_eq!(simplex.state(), State::Building);
    assert!(simplex.solution().is_none());
}

#[test]
fn resolve_after_change() {
    let mut simplex = Simplex::new("resolve");
    simplex.add_constraint(constraint("1 1", ConstraintType::LessEqual, 4f64)).unwrap();
    non_negative(&mut simplex, 2);
    simplex.set_objective_function(objective(Objective::Maximize, "1 2")).unwrap();
    let first = simplex.solve().unwrap();
    assert_abs_diff_eq!(first.solution().unwrap().objective_value(), 8f64, epsilon = 1e-8);

    simplex.add_constraint(constraint("0 1", ConstraintType::LessEqual, 1f64)).unwrap();
    assert!(simplex.solution().is_none());
    let second = simplex.solve().unwrap();
    assert_abs_diff_eq!(second.solution().unwrap().objective_value(), 5f64, epsilon = 1e-8);
    assert_eq!(simplex.solution(), second.solution());
}
