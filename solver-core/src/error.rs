//! Error taxonomy for the optimizer.
//!
//! Two error families, matching the two points at which a run can be
//! rejected before any search happens: [`ConfigError`] at optimizer
//! construction and [`DataError`] at problem-model construction. Neither is
//! raised once a search has started — a completed run whose
//! `hard_violations > 0` is not an error, it is surfaced through
//! [`crate::optimizer::Metrics`] instead.

use thiserror::Error;

/// Raised by [`crate::optimizer::OptimizerConfig::validate`].
///
/// Every variant names the offending value so a caller can report it back to
/// whoever authored the configuration without re-deriving which field was
/// wrong.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("population_size must be positive, got {0}")]
    PopulationSizeNonPositive(i64),

    #[error("generations must be positive, got {0}")]
    GenerationsNonPositive(i64),

    #[error("elitism ({elitism}) must be less than population_size ({population_size})")]
    ElitismTooLarge { elitism: usize, population_size: usize },

    #[error("crossover_rate must be in [0, 1], got {0}")]
    CrossoverRateOutOfRange(f64),

    #[error("mutation_rate must be in [0, 1], got {0}")]
    MutationRateOutOfRange(f64),

    #[error("initial_temp must be positive, got {0}")]
    InitialTempNonPositive(f64),

    #[error("cooling_rate must be in (0, 1), got {0}")]
    CoolingRateOutOfRange(f64),

    #[error("iterations_per_temp must be positive, got {0}")]
    IterationsPerTempNonPositive(i64),

    #[error("soft weight '{name}' must be non-negative, got {value}")]
    NegativeSoftWeight { name: &'static str, value: f64 },
}

/// Raised by [`crate::problem::ProblemModel::build`].
///
/// These are data-shape problems, not optimization failures: the model
/// cannot even be constructed, so no GA/SA run is attempted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("no sessions supplied; at least one session is required")]
    NoSessions,

    #[error("no rooms supplied; at least one room is required")]
    NoRooms,

    #[error(
        "no slot penalties supplied; at least one start time is required to build the slot grid"
    )]
    NoSlots,
}

/// Top-level error returned by [`crate::run_solver`] and
/// [`crate::run_solver_with_progress`], unifying the two construction-time
/// failure points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("invalid problem data: {0}")]
    Data(#[from] DataError),

    #[error("invalid solver configuration: {0}")]
    Config(#[from] ConfigError),
}
