//! # Solver settings
//!
//! Tunables of the simplex method. Construct the defaults with `SimplexSettings::default`, or
//! customize them through `SimplexSettings::custom` and the builder it returns.
use crate::data::linear_algebra::EPSILON;
use crate::error::Error;

/// Values used by the two-phase simplex method.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimplexSettings {
    tolerance: f64,
    bland_after: usize,
    max_iterations: usize,
    reinversion_interval: usize,
}

impl SimplexSettings {
    /// Default number of pivots in a phase after which Bland's rule is used.
    pub const DEFAULT_BLAND_AFTER: usize = 1_000;
    /// Default maximum number of pivots in a phase.
    pub const DEFAULT_MAX_ITERATIONS: usize = 50_000;
    /// Default number of basis updates between two recomputations of the basis inverse.
    pub const DEFAULT_REINVERSION_INTERVAL: usize = 64;

    /// Start customizing the settings from the defaults.
    pub fn custom() -> SimplexSettingsBuilder {
        SimplexSettingsBuilder::new()
    }

    /// Absolute tolerance for sign tests on costs, ratios and infeasibility.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Pivots in a phase with the steepest descent rule before switching to Bland's rule.
    pub fn bland_after(&self) -> usize {
        self.bland_after
    }

    /// Pivots in a phase after which the solver gives up with a `NonTermination` error.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Basis updates after which the basis inverse is computed from scratch.
    pub fn reinversion_interval(&self) -> usize {
        self.reinversion_interval
    }
}

impl Default for SimplexSettings {
    fn default() -> Self {
        Self {
            tolerance: EPSILON,
            bland_after: Self::DEFAULT_BLAND_AFTER,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            reinversion_interval: Self::DEFAULT_REINVERSION_INTERVAL,
        }
    }
}

/// Builder to customize `SimplexSettings`.
///
/// Call the setters for the values that should differ from the defaults, then `build` to validate.
#[derive(Copy, Clone, Debug)]
pub struct SimplexSettingsBuilder {
    settings: SimplexSettings,
}

impl SimplexSettingsBuilder {
    fn new() -> Self {
        Self { settings: SimplexSettings::default() }
    }

    /// Set the absolute tolerance. Should be a small positive value.
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.settings.tolerance = tolerance;
        self
    }

    /// Set the number of pivots after which Bland's rule is used.
    ///
    /// Use `0` to always use Bland's rule.
    #[must_use]
    pub fn bland_after(mut self, bland_after: usize) -> Self {
        self.settings.bland_after = bland_after;
        self
    }

    /// Set the maximum number of pivots per phase.
    #[must_use]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.settings.max_iterations = max_iterations;
        self
    }

    /// Set the number of basis updates between two recomputations of the basis inverse.
    #[must_use]
    pub fn reinversion_interval(mut self, reinversion_interval: usize) -> Self {
        self.settings.reinversion_interval = reinversion_interval;
        self
    }

    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the tolerance isn't positive and finite, if Bland's rule would only
    /// be used after the iteration limit, or if the reinversion interval is zero.
    pub fn build(self) -> Result<SimplexSettings, Error> {
        let settings = self.settings;
        if !(settings.tolerance > 0f64 && settings.tolerance.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "the tolerance should be positive and finite, not {}", settings.tolerance,
            )));
        }
        if settings.bland_after > settings.max_iterations {
            return Err(Error::InvalidParameter(format!(
                "switching to Bland's rule after {} iterations is beyond the limit of {} iterations",
                settings.bland_after, settings.max_iterations,
            )));
        }
        if settings.reinversion_interval == 0 {
            return Err(Error::InvalidParameter("the reinversion interval should be at least one".to_string()));
        }

        Ok(settings)
    }
}
