//! # The diet problem
//!
//! Choose servings of 38 foods such that the total amount of calories, proteins, lipids and
//! carbohydrates lies between a lower and an upper bound, while minimizing the cost. Each food
//! can be eaten at most `maximum_servings` times.
use crate::algorithm::two_phase::Simplex;
use crate::algorithm::two_phase::settings::SimplexSettings;
use crate::data::linear_algebra::matrix::Matrix;
use crate::data::linear_program::elements::{Constraint, ConstraintType, Objective, ObjectiveFunction};
use crate::error::Error;

/// Name of each nutrient, in the order of the rows of the nutrient table.
pub const NUTRIENTS: [&str; 4] = ["calories", "proteins", "lipids", "carbohydrates"];

/// Smallest allowed total of each nutrient.
pub const LOWER_BOUNDS: &str = "2000  58   70    100";
/// Largest allowed total of each nutrient.
pub const UPPER_BOUNDS: &str = "2500  100  100   500";

/// Name, nutrients per serving (as a column literal) and cost per serving of each food.
pub const FOODS: [(&str, &str, f64); 38] = [
    //                            Cal   Pro  Lip   Carb
    ("pasta",               "362   11   1.5   76  ",  1.2),
    ("rice",                "348    7   0.7   78  ",  2.2),
    ("bread",               "280    8   0.5   64  ",  2.5),
    ("beans",               "120    7   0.8   20  ",  1.3),
    ("peas",                " 76    7   0.4   12  ", 1.35),
    ("garlic",              " 88    4   0.6   18  ",  5.2),
    ("carrots",             " 10    1   0      2.7",  1.9),
    ("onions",              " 30    1   0      7  ",  1.3),
    ("lettuce",             " 16    2   0.4    2.2",  1.5),
    ("eggplant",            " 15    1   0.1    2.6",  1.2),
    ("potatoes",            " 85    2   1     18  ",  0.6),
    ("tomatoes",            " 19    1   0.2    3.5",  1.5),
    ("spinach",             " 30    3.5 0.5    5  ",  1.9),
    ("orange juice",        " 40    0.5 0     10  ",  1.5),
    ("bananas",             " 75    1.2 0.3   18  ",  1.5),
    ("apples",              " 50    0.5 0.2   16  ",  1.8),
    ("beef",                "214   19  13      0  ", 12.0),
    ("pork",                "100   18   3      0  ",  6.0),
    ("chicken",             " 97   22   1.6    0  ",  9.8),
    ("veal",                "130   21   5      0.4", 18.0),
    ("cured ham",           "480   20  42      0  ", 18.0),
    ("cooked ham",          "412   21  36      0  ", 15.0),
    ("squid",               " 68   13   1.7    0.6",  6.0),
    ("mullet",              "127   16   7      0.7",  7.0),
    ("mussels",             " 65   12   1.9    2  ", 13.0),
    ("mackerel",            "168   17  11      0.8",  6.0),
    ("tuna",                "140   22   6      0.6",  8.0),
    ("milk",                " 47    3.5 1.8    5  ",  0.8),
    ("parmesan",            "381   35  27      3.5", 14.0),
    ("dairy cheese",        "450   31  37      0  ", 11.0),
    ("mozzarella",          "243   20  16      4.9",  8.0),
    ("eggs",                "160   13  11      1  ",  0.8),
    ("butter",              "760    1  84      1  ",  8.0),
    ("olive oil",           "880    0 100      0  ",  4.0),
    ("dark chocolate",      "500    4  30     60  ",  7.0),
    ("ice cream",           "220    4  14     21  ",  7.0),
    ("beer",                " 33    0   0      3  ",  1.5),
    ("wine",                " 80    0   0      0.5",  1.8),
];

/// Default upper bound on the number of servings of each food.
pub const DEFAULT_MAXIMUM_SERVINGS: f64 = 2f64;

/// The nutrient table: one row per nutrient, one column per food.
///
/// # Errors
///
/// Only if the literals in this module are malformed.
pub fn nutrient_table() -> Result<Matrix, Error> {
    let mut table = Matrix::new(NUTRIENTS.len(), FOODS.len());
    for (j, (_, nutrients, _)) in FOODS.iter().enumerate() {
        table.set_column(j, nutrients)?;
    }

    Ok(table)
}

/// Build the diet problem, ready to be solved.
///
/// For each nutrient, the total is bounded from above and below. Each food gets a sign
/// restriction and an upper bound of `maximum_servings`.
///
/// # Errors
///
/// `MalformedBound` if `maximum_servings` is not finite.
pub fn problem(maximum_servings: f64, settings: SimplexSettings) -> Result<Simplex, Error> {
    let table = nutrient_table()?;

    let mut lower_bounds = Matrix::new(1, NUTRIENTS.len());
    lower_bounds.set_values(LOWER_BOUNDS)?;
    let mut upper_bounds = Matrix::new(1, NUTRIENTS.len());
    upper_bounds.set_values(UPPER_BOUNDS)?;

    let mut simplex = Simplex::with_settings("diet", settings);
    simplex.set_variable_names(FOODS.iter().map(|&(name, _, _)| name.to_string()).collect())?;

    for i in 0..NUTRIENTS.len() {
        let coefficients = table.row(i)?;
        simplex.add_constraint(Constraint::new(coefficients.clone(), ConstraintType::LessEqual, upper_bounds[i])?)?;
        simplex.add_constraint(Constraint::new(coefficients, ConstraintType::GreaterEqual, lower_bounds[i])?)?;
    }

    for j in 0..FOODS.len() {
        let bound = Constraint::non_negative(j, FOODS.len())?;
        let unit = bound.coefficients().clone();
        simplex.add_constraint(bound)?;
        simplex.add_constraint(Constraint::new(unit, ConstraintType::LessEqual, maximum_servings)?)?;
    }

    let cost = Matrix::row_vector(FOODS.iter().map(|&(_, _, cost)| cost).collect());
    simplex.set_objective_function(ObjectiveFunction::new(Objective::Minimize, cost)?)?;

    Ok(simplex)
}
