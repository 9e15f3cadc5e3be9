//! # The Simplex algorithm
//!
//! This module contains all data structures and logic specific to the simplex algorithm. The
//! algorithm is implemented as described in chapters 2 and 4 of Combinatorial Optimization, a book
//! by Christos H. Papadimitriou and Kenneth Steiglitz.
//!
//! A `Simplex` instance collects constraints and an objective function. Solving brings these into
//! standard form, finds a basic feasible solution by minimizing the sum of artificial variables
//! and then optimizes the objective from that basis.
use log::{debug, info, trace};

use crate::algorithm::OptimizationResult;
use crate::algorithm::two_phase::settings::SimplexSettings;
use crate::algorithm::two_phase::standard_form::StandardForm;
use crate::algorithm::two_phase::strategy::pivot_rule::{FirstProfitable, PivotRule, SteepestDescentAlongVariable};
use crate::algorithm::two_phase::tableau::Tableau;
use crate::data::linear_program::elements::{Constraint, ConstraintType, ObjectiveFunction};
use crate::data::linear_program::solution::Solution;
use crate::error::Error;

pub mod settings;
pub mod standard_form;
pub mod strategy;
pub mod tableau;

/// Stage of the life of a `Simplex` instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum State {
    /// Constraints and the objective are being added.
    Building,
    /// Searching for a basic feasible solution.
    PhaseOne,
    /// Optimizing the objective from a basic feasible solution.
    PhaseTwo,
    /// Solved, a solution is available.
    Optimal,
    /// Solved, no point satisfies all constraints.
    Infeasible,
    /// Solved, the objective can be improved without limit.
    Unbounded,
}

/// A linear program together with the state of solving it.
#[derive(Clone, Debug)]
pub struct Simplex {
    name: String,
    constraints: Vec<Constraint>,
    objective: Option<ObjectiveFunction>,
    /// Fixed by the first constraint, objective or names provided.
    nr_variables: Option<usize>,
    variable_names: Option<Vec<String>>,
    settings: SimplexSettings,
    state: State,
    solution: Option<Solution>,
}

impl Simplex {
    /// Create an empty instance with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_settings(name, SimplexSettings::default())
    }

    /// Create an empty instance.
    pub fn with_settings(name: impl Into<String>, settings: SimplexSettings) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
            objective: None,
            nr_variables: None,
            variable_names: None,
            settings,
            state: State::Building,
            solution: None,
        }
    }

    #[allow(missing_docs)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[allow(missing_docs)]
    pub fn settings(&self) -> &SimplexSettings {
        &self.settings
    }

    #[allow(missing_docs)]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of variables, once known.
    pub fn nr_variables(&self) -> Option<usize> {
        self.nr_variables
    }

    /// Add a constraint.
    ///
    /// # Errors
    ///
    /// A `Dimension` error if the number of coefficients differs from the number of variables
    /// established earlier, `MalformedBound` if a `NonNegative` constraint doesn't restrict
    /// exactly one variable.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), Error> {
        if constraint.constraint_type() == ConstraintType::NonNegative {
            constraint.bounded_variable()?;
        }
        self.check_nr_variables(constraint.nr_variables(), "add_constraint")?;

        self.constraints.push(constraint);
        self.reset();
        Ok(())
    }

    /// Set the objective function, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// A `Dimension` error if the number of coefficients differs from the number of variables
    /// established earlier.
    pub fn set_objective_function(&mut self, objective: ObjectiveFunction) -> Result<(), Error> {
        self.check_nr_variables(objective.nr_variables(), "set_objective_function")?;

        self.objective = Some(objective);
        self.reset();
        Ok(())
    }

    /// Name the variables, for displaying solutions.
    ///
    /// # Errors
    ///
    /// A `Dimension` error if the number of names differs from the number of variables established
    /// earlier.
    pub fn set_variable_names(&mut self, names: Vec<String>) -> Result<(), Error> {
        self.check_nr_variables(names.len(), "set_variable_names")?;

        self.variable_names = Some(names);
        self.reset();
        Ok(())
    }

    /// Solve the linear program.
    ///
    /// Every call starts from scratch, using the constraints and objective present at that time.
    ///
    /// # Return value
    ///
    /// Whether the problem is infeasible, unbounded or has a finite optimum, in which case the
    /// solution is included.
    ///
    /// # Errors
    ///
    /// `MissingObjective` without objective function, `NonTermination` if the iteration limit is
    /// reached in either phase, and `SingularMatrix` in case of numerical breakdown.
    pub fn solve(&mut self) -> Result<OptimizationResult, Error> {
        self.reset();

        let result = self.run();
        match &result {
            Ok(OptimizationResult::FiniteOptimum(solution)) => {
                info!("{}: optimal with objective value {}", self.name, solution.objective_value());
                self.solution = Some(solution.clone());
                self.state = State::Optimal;
            },
            Ok(OptimizationResult::Infeasible) => {
                info!("{}: infeasible", self.name);
                self.state = State::Infeasible;
            },
            Ok(OptimizationResult::Unbounded) => {
                info!("{}: unbounded", self.name);
                self.state = State::Unbounded;
            },
            Err(error) => {
                info!("{}: {}", self.name, error);
                self.state = State::Building;
            },
        }

        result
    }

    /// Current stage.
    pub fn state(&self) -> State {
        self.state
    }

    /// Solution found by the last call to `solve`, if it was optimal and nothing changed since.
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    fn run(&mut self) -> Result<OptimizationResult, Error> {
        let objective = self.objective.as_ref().ok_or(Error::MissingObjective)?;
        let problem = StandardForm::new(&self.constraints, objective, self.settings.tolerance())?;

        debug!("{}: solving with {} variables and {} constraints", self.name, objective.nr_variables(), self.constraints.len());

        self.state = State::PhaseOne;
        let tableau = match artificial_primal(&self.name, &problem, self.settings)? {
            RankedFeasibilityResult::Feasible { rank, tableau } => {
                if let Rank::Deficient(rows) = &rank {
                    debug!("Rows {rows:?} are redundant, their artificial variables stay basic at zero");
                }
                tableau
            },
            RankedFeasibilityResult::Infeasible => return Ok(OptimizationResult::Infeasible),
        };

        self.state = State::PhaseTwo;
        let mut tableau = tableau.into_non_artificial();
        let result = match primal::<SteepestDescentAlongVariable, FirstProfitable>(&self.name, &mut tableau, &self.settings)? {
            Termination::Optimal => {
                let values = problem.original_values(&tableau.current_bfs());
                debug_assert!({
                    let value = problem.original_objective_value(tableau.objective_function_value());
                    (value - objective.evaluate(&values)).abs() <= 1e-6 * (1f64 + value.abs())
                });

                let solution = Solution::new(objective.evaluate(&values), values);
                let solution = match &self.variable_names {
                    Some(names) => solution.with_names(names.clone()),
                    None => solution,
                };
                OptimizationResult::FiniteOptimum(solution)
            },
            Termination::Unbounded => OptimizationResult::Unbounded,
        };

        Ok(result)
    }

    fn check_nr_variables(&mut self, nr_variables: usize, operation: &'static str) -> Result<(), Error> {
        match self.nr_variables {
            Some(existing) if existing != nr_variables => Err(Error::Dimension {
                operation,
                left: (1, existing),
                right: (1, nr_variables),
            }),
            _ => {
                self.nr_variables = Some(nr_variables);
                Ok(())
            },
        }
    }

    /// Forget the result of an earlier solve.
    fn reset(&mut self) {
        self.state = State::Building;
        self.solution = None;
    }
}

/// How a run of the primal simplex method ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Termination {
    /// No column has a negative relative cost.
    Optimal,
    /// A column with negative relative cost has no positive element.
    Unbounded,
}

/// LP's can be either feasible (allowing at least one solution) or infeasible (allowing no
/// solutions).
///
/// If the problem is feasible, it can either have full rank, or be rank deficient.
#[derive(Debug)]
pub(crate) enum RankedFeasibilityResult<'a> {
    /// The problem is feasible, the tableau holds a basic feasible solution without artificial
    /// variables at a nonzero level.
    Feasible {
        /// Whether there are redundant rows.
        rank: Rank,
        /// Tableau of the first phase, at its optimum.
        tableau: Tableau<'a>,
    },
    /// The problem is not feasible.
    Infeasible,
}

/// A matrix or linear program either has full rank, or be rank deficient.
///
/// In case it is rank deficient, a sorted, deduplicated list of (row)indices should be provided,
/// that when removed, makes the matrix or linear program full rank.
#[derive(Debug, Eq, PartialEq)]
pub enum Rank {
    /// The matrix is full rank, no rows need to be removed.
    Full,
    /// The `Vec<usize>` is sorted and contains no duplicate values.
    Deficient(Vec<usize>),
}

/// Reduces the artificial cost of the basic feasible solution to zero, if possible. In doing so, a
/// basic feasible solution to the standard form linear program is found.
///
/// # Return value
///
/// Whether the problem is feasible and if so, a tableau with a basic feasible solution.
pub(crate) fn artificial_primal<'a>(
    name: &str,
    problem: &'a StandardForm,
    settings: SimplexSettings,
) -> Result<RankedFeasibilityResult<'a>, Error> {
    let mut tableau = Tableau::new_artificial(problem, settings);
    if problem.nr_artificial_variables() == 0 {
        debug!("The slack variables form a basic feasible solution");
        return Ok(RankedFeasibilityResult::Feasible { rank: Rank::Full, tableau });
    }

    match primal::<SteepestDescentAlongVariable, FirstProfitable>(name, &mut tableau, &settings)? {
        Termination::Optimal => {},
        Termination::Unbounded => unreachable!("Artificial cost can not be unbounded."),
    }

    // Relative to the size of the right-hand side, the artificial variables sum to zero
    let scale = problem.b().iter().fold(1f64, |largest, value| largest.max(value.abs()));
    let artificial_cost = tableau.objective_function_value();
    debug!("Artificial cost after phase one: {artificial_cost}");
    if artificial_cost > settings.tolerance() * scale {
        return Ok(RankedFeasibilityResult::Infeasible);
    }

    let rank = if tableau.has_artificial_in_basis() {
        let rows_to_remove = remove_artificial_basis_variables(&mut tableau, settings.tolerance())?;
        if rows_to_remove.is_empty() {
            Rank::Full
        } else {
            Rank::Deficient(rows_to_remove)
        }
    } else {
        Rank::Full
    };

    Ok(RankedFeasibilityResult::Feasible { rank, tableau })
}

/// Removes all artificial variables from the basis by making a basis change "at zero level", or
/// without change of cost of the current solution.
///
/// # Return value
///
/// A `Vec` with indices of rows that are redundant. Is sorted as a side effect of the algorithm.
/// The artificial variables of these rows stay in the basis, their value can't change anymore.
fn remove_artificial_basis_variables(tableau: &mut Tableau, tolerance: f64) -> Result<Vec<usize>, Error> {
    let mut rows_to_remove = Vec::new();

    for pivot_row in tableau.artificial_basis_rows() {
        let pivot_column = (0..tableau.nr_candidate_columns())
            .filter(|j| !tableau.is_in_basis(j))
            .map(|j| (j, tableau.generate_element(pivot_row, j)))
            .filter(|(_, element)| element.abs() > tolerance)
            .max_by(|(_, left), (_, right)| left.abs().total_cmp(&right.abs()));

        if let Some((pivot_column, _)) = pivot_column {
            let column = tableau.generate_column(pivot_column);
            tableau.bring_into_basis(pivot_column, pivot_row, &column)?;
        } else {
            rows_to_remove.push(pivot_row);
        }
    }

    debug_assert!(rows_to_remove.is_sorted());
    Ok(rows_to_remove)
}

/// Reduces the cost of the basic feasible solution to the minimum.
///
/// Columns are selected with `PR` until `settings.bland_after()` pivots have been made, after
/// which `Fallback` is used. The ratio test breaks ties by the lowest leaving column.
///
/// # Return value
///
/// Whether the problem has a finite optimum. It cannot be infeasible, as a feasible solution is
/// needed to start using this method.
///
/// # Errors
///
/// `NonTermination` when another pivot is needed after `settings.max_iterations()` pivots.
pub(crate) fn primal<PR, Fallback>(
    name: &str,
    tableau: &mut Tableau,
    settings: &SimplexSettings,
) -> Result<Termination, Error>
where
    PR: PivotRule,
    Fallback: PivotRule,
{
    let mut rule = PR::new();
    let mut fallback = Fallback::new();

    let mut iterations = 0;
    loop {
        let candidate = if iterations < settings.bland_after() {
            rule.select_primal_pivot_column(tableau, settings.tolerance())
        } else {
            if iterations == settings.bland_after() {
                info!("Switching to Bland's rule after {iterations} iterations");
            }
            fallback.select_primal_pivot_column(tableau, settings.tolerance())
        };

        match candidate {
            Some((column_index, cost)) => {
                if iterations == settings.max_iterations() {
                    return Err(Error::NonTermination { iterations });
                }

                let column = tableau.generate_column(column_index);
                match tableau.select_primal_pivot_row(&column) {
                    Some(row_index) => tableau.bring_into_basis(column_index, row_index, &column)?,
                    None => {
                        debug!("Column {column_index} with relative cost {cost} is unbounded");
                        break Ok(Termination::Unbounded);
                    },
                }

                iterations += 1;
                trace!("{name}: iteration {iterations}, column {column_index} with relative cost {cost} entered\n{}", tableau.dump(name));
            },
            None => {
                debug!("Optimal after {iterations} iterations");
                break Ok(Termination::Optimal);
            },
        }
    }
}
