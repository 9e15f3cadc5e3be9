//! # Representation of optimal solutions
//!
//! Once a linear program is solved to optimality, a solution is derived in terms of the variables
//! of the original problem. Slack, surplus and artificial variables and the split of free variables
//! don't appear in it.
use std::fmt;

/// Objective value and a value for each of the original variables.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Value of the objective function in its original direction.
    objective_value: f64,
    /// One value per variable, in the order of the constraint coefficients.
    values: Vec<f64>,
    /// Display names, if provided. Same length as `values`.
    names: Option<Vec<String>>,
}

impl Solution {
    /// Create a new `Solution` instance.
    pub fn new(objective_value: f64, values: Vec<f64>) -> Self {
        Self { objective_value, values, names: None }
    }

    /// Attach names to the values, used when displaying.
    #[must_use]
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        debug_assert_eq!(names.len(), self.values.len());

        self.names = Some(names);
        self
    }

    #[allow(missing_docs)]
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Value of each variable.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of variable `j`.
    pub fn value(&self, j: usize) -> Option<f64> {
        self.values.get(j).copied()
    }

    /// Name and value of every variable.
    ///
    /// Variables without a provided name are called `x{j}`.
    pub fn named_values(&self) -> impl Iterator<Item = (String, f64)> + '_ {
        self.values.iter().enumerate().map(move |(j, &value)| {
            let name = match &self.names {
                Some(names) => names[j].clone(),
                None => format!("x{j}"),
            };
            (name, value)
        })
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Objective value: {}", self.objective_value)?;
        let named_values = self.named_values().collect::<Vec<_>>();
        let width = named_values.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, value) in named_values {
            writeln!(f, "{name:<width$} = {value}")?;
        }
        Ok(())
    }
}
