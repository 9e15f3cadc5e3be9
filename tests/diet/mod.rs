use dense_lp::algorithm::OptimizationResult;
use dense_lp::algorithm::two_phase::State;
use dense_lp::algorithm::two_phase::settings::SimplexSettings;
use dense_lp::data::linear_algebra::matrix::Matrix;
use dense_lp::diet::{self, DEFAULT_MAXIMUM_SERVINGS, FOODS, LOWER_BOUNDS, NUTRIENTS, UPPER_BOUNDS};

const TOLERANCE: f64 = 1e-6;

fn bounds(literal: &str) -> Matrix {
    let mut bounds = Matrix::new(1, NUTRIENTS.len());
    bounds.set_values(literal).unwrap();
    bounds
}

fn check(settings: SimplexSettings) {
    let mut simplex = diet::problem(DEFAULT_MAXIMUM_SERVINGS, settings).unwrap();
    let result = simplex.solve().unwrap();
    assert_eq!(simplex.state(), State::Optimal);
    let solution = result.solution().unwrap();

    for &value in solution.values() {
        assert!(value >= -TOLERANCE);
        assert!(value <= DEFAULT_MAXIMUM_SERVINGS + TOLERANCE);
    }

    let x = Matrix::column_vector(solution.values().to_vec());
    let totals = (&diet::nutrient_table().unwrap() * &x).evaluate().unwrap();
    let (lower, upper) = (bounds(LOWER_BOUNDS), bounds(UPPER_BOUNDS));
    for i in 0..NUTRIENTS.len() {
        assert!(totals[i] >= lower[i] - TOLERANCE, "{} too low: {}", NUTRIENTS[i], totals[i]);
        assert!(totals[i] <= upper[i] + TOLERANCE, "{} too high: {}", NUTRIENTS[i], totals[i]);
    }

    let cost = solution.values().iter()
        .zip(FOODS.iter())
        .map(|(value, &(_, _, cost))| value * cost)
        .sum::<f64>();
    assert!((solution.objective_value() - cost).abs() < TOLERANCE);
    assert!(solution.to_string().contains("pasta"));
}

#[test]
fn optimal() {
    check(SimplexSettings::default());
}

#[test]
fn optimal_with_bland() {
    check(SimplexSettings::custom().bland_after(0).build().unwrap());
}

#[test]
fn optimal_with_frequent_reinversion() {
    check(SimplexSettings::custom().reinversion_interval(1).build().unwrap());
}

#[test]
fn no_servings() {
    let mut simplex = diet::problem(0f64, SimplexSettings::default()).unwrap();
    assert_eq!(simplex.solve(), Ok(OptimizationResult::Infeasible));
}
