//! # Problems that require a look inside the crate.
//!
//! Convention for function names:
//!
//! * `fn constraints()`
//! * `fn objective()`
//! * `fn standard_form()`
pub mod problem_1;
