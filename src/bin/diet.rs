use std::process::exit;

use clap::Parser;
use log::LevelFilter;

use dense_lp::algorithm::OptimizationResult;
use dense_lp::algorithm::two_phase::settings::SimplexSettings;
use dense_lp::data::linear_algebra::EPSILON;
use dense_lp::diet::{self, DEFAULT_MAXIMUM_SERVINGS};

/// Solve the diet problem: the cheapest selection of foods meeting nutrient bounds.
#[derive(Parser)]
#[command(version, author = "Bram van den Heuvel <bram@vandenheuvel.online>")]
struct Opts {
    /// Upper bound on the number of servings of each food
    #[arg(long, default_value_t = DEFAULT_MAXIMUM_SERVINGS)]
    maximum_servings: f64,
    /// Pivots per phase after which the simplex method gives up
    #[arg(long, default_value_t = SimplexSettings::DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    /// Pivots per phase after which Bland's rule is used
    #[arg(long, default_value_t = SimplexSettings::DEFAULT_BLAND_AFTER)]
    bland_after: usize,
    /// Absolute tolerance for sign tests
    #[arg(long, default_value_t = EPSILON)]
    tolerance: f64,
    /// Pivots after which the basis inverse is recomputed from scratch
    #[arg(long, default_value_t = SimplexSettings::DEFAULT_REINVERSION_INTERVAL)]
    reinversion_interval: usize,
}

fn main() {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("DIET_LOG", "warn,dense_lp=info"))
        .init();

    let opts = Opts::parse();

    let settings = SimplexSettings::custom()
        .tolerance(opts.tolerance)
        .bland_after(opts.bland_after)
        .max_iterations(opts.max_iterations)
        .reinversion_interval(opts.reinversion_interval)
        .build();
    let settings = match settings {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("Invalid settings: {error}");
            exit(2);
        },
    };

    let mut simplex = match diet::problem(opts.maximum_servings, settings) {
        Ok(simplex) => simplex,
        Err(error) => {
            eprintln!("Couldn't build the problem: {error}");
            exit(2);
        },
    };

    println!("Solving \"{}\"...", simplex.name());
    match simplex.solve() {
        Ok(OptimizationResult::FiniteOptimum(solution)) => {
            println!("Solution computed.");
            print!("{solution}");
        },
        Ok(OptimizationResult::Infeasible) => println!("Problem is not feasible."),
        Ok(OptimizationResult::Unbounded) => println!("Problem is unbounded."),
        Err(error) => {
            eprintln!("Solving failed: {error}");
            exit(1);
        },
    }
}
