//! # Pivot rules
//!
//! Strategies for choosing the column that enters the basis in the primal simplex method.
use crate::algorithm::two_phase::tableau::Tableau;

/// Deciding how to pivot.
///
/// During the Simplex method, one needs to decide how to move from basic solution to basic
/// solution. The pivot rule describes that behavior.
///
/// Once the column has been selected, a row needs to be found. This decision is made independent
/// of the strategy, see `Tableau::select_primal_pivot_row`.
pub trait PivotRule {
    /// Create a new instance.
    fn new() -> Self;

    /// Column selection rule for the primal Simplex method.
    ///
    /// Artificial columns are never selected. A column is a candidate if its relative cost is
    /// smaller than `-tolerance`.
    ///
    /// # Return value
    ///
    /// The column index and its relative cost, or `None` if the current basis is optimal.
    fn select_primal_pivot_column(&mut self, tableau: &Tableau, tolerance: f64) -> Option<(usize, f64)>;
}

/// Simply pivot on the first column, which has a negative relative cost.
///
/// Together with the lowest index tie breaking in the ratio test, this is Bland's rule, which
/// doesn't cycle.
pub struct FirstProfitable;
impl PivotRule for FirstProfitable {
    fn new() -> Self {
        Self
    }

    fn select_primal_pivot_column(&mut self, tableau: &Tableau, tolerance: f64) -> Option<(usize, f64)> {
        (0..tableau.nr_candidate_columns())
            .filter(|column| !tableau.is_in_basis(column))
            .map(|column| (column, tableau.relative_cost(column)))
            .find(|&(_, cost)| cost < -tolerance)
    }
}

/// Simply pivot on the column, which has the most negative relative cost.
///
/// Among columns with the same cost, the one with the lowest index is chosen.
pub struct SteepestDescentAlongVariable;
impl PivotRule for SteepestDescentAlongVariable {
    fn new() -> Self {
        Self
    }

    fn select_primal_pivot_column(&mut self, tableau: &Tableau, tolerance: f64) -> Option<(usize, f64)> {
        let mut smallest: Option<(usize, f64)> = None;
        for (j, cost) in (0..tableau.nr_candidate_columns())
            .filter(|column| !tableau.is_in_basis(column))
            .map(|column| (column, tableau.relative_cost(column)))
            .filter(|&(_, cost)| cost < -tolerance) {
            if let Some((existing_j, existing_cost)) = smallest.as_mut() {
                if cost < *existing_cost {
                    *existing_j = j;
                    *existing_cost = cost;
                }
            } else { smallest = Some((j, cost)) }
        }

        smallest
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::two_phase::settings::SimplexSettings;
    use crate::algorithm::two_phase::strategy::pivot_rule::{FirstProfitable, PivotRule, SteepestDescentAlongVariable};
    use crate::algorithm::two_phase::tableau::Tableau;
    use crate::data::linear_algebra::EPSILON;
    use crate::tests::problem_1;

    #[test]
    fn first_profitable() {
        let problem = problem_1::standard_form();
        let tableau = Tableau::new_artificial(&problem, SimplexSettings::default());
        let mut rule = FirstProfitable::new();
        assert_eq!(rule.select_primal_pivot_column(&tableau, EPSILON), Some((0, -2f64)));
    }

    #[test]
    fn steepest_descent() {
        let problem = problem_1::standard_form();
        let tableau = Tableau::new_artificial(&problem, SimplexSettings::default()).into_non_artificial();

        // Phase two costs are 1, 2 and 3; with slack and artificial basis columns nothing improves
        let mut rule = SteepestDescentAlongVariable::new();
        assert_eq!(rule.select_primal_pivot_column(&tableau, EPSILON), None);

        let problem = problem_1::maximization_standard_form();
        let tableau = Tableau::new_artificial(&problem, SimplexSettings::default()).into_non_artificial();
        assert_eq!(rule.select_primal_pivot_column(&tableau, EPSILON), Some((2, -3f64)));
        assert_eq!(FirstProfitable::new().select_primal_pivot_column(&tableau, EPSILON), Some((0, -1f64)));
    }
}
