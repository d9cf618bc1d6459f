//! Optimizer facade (C6): owns the run's single seeded RNG and drives the
//! GA phase straight into the SA phase.
//!
//! `Optimizer::run_full_optimization` is the one entry point most callers
//! need; `solver-server` and `solver-wasm` both sit on top of it rather than
//! calling [`crate::algorithms`] directly.

use std::time::Instant;

use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::algorithms::annealing::{self, SaConfig, SaProgressCallback};
use crate::algorithms::genetic::{self, GaConfig, GaProgressCallback};
use crate::algorithms::Rng;
use crate::chromosome::Solution;
use crate::error::ConfigError;
use crate::evaluator::{Breakdown, SoftWeights};
use crate::problem::ProblemModel;

/// Full configuration for one optimization run: GA parameters, SA
/// parameters, soft-rule weights, and the seed that makes the run
/// reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default)]
    pub ga: GaConfig,
    #[serde(default)]
    pub sa: SaConfig,
    #[serde(default)]
    pub weights: SoftWeights,
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
}

/// Default random seed used when a configuration omits one.
fn default_random_seed() -> u64 {
    42
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            ga: GaConfig::default(),
            sa: SaConfig::default(),
            weights: SoftWeights::default(),
            random_seed: default_random_seed(),
        }
    }
}

impl OptimizerConfig {
    /// Rejects configurations the GA/SA loops cannot run with, before any
    /// search starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ga.population_size == 0 {
            return Err(ConfigError::PopulationSizeNonPositive(0));
        }
        if self.ga.generations == 0 {
            return Err(ConfigError::GenerationsNonPositive(0));
        }
        if self.ga.elitism >= self.ga.population_size {
            return Err(ConfigError::ElitismTooLarge {
                elitism: self.ga.elitism,
                population_size: self.ga.population_size,
            });
        }
        if !(0.0..=1.0).contains(&self.ga.crossover_rate) {
            return Err(ConfigError::CrossoverRateOutOfRange(self.ga.crossover_rate));
        }
        if !(0.0..=1.0).contains(&self.ga.mutation_rate) {
            return Err(ConfigError::MutationRateOutOfRange(self.ga.mutation_rate));
        }
        if self.sa.initial_temp <= 0.0 {
            return Err(ConfigError::InitialTempNonPositive(self.sa.initial_temp));
        }
        if !(0.0..1.0).contains(&self.sa.cooling_rate) {
            return Err(ConfigError::CoolingRateOutOfRange(self.sa.cooling_rate));
        }
        if self.sa.iterations_per_temp == 0 {
            return Err(ConfigError::IterationsPerTempNonPositive(0));
        }
        for (name, value) in [
            ("gaps", self.weights.gaps),
            ("time_penalties", self.weights.time_penalties),
            ("load_balance", self.weights.load_balance),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeSoftWeight { name, value });
            }
        }
        Ok(())
    }
}

/// Post-run quality summary returned alongside the final solution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub initial_fitness: f64,
    pub final_fitness: f64,
    pub hard_violations: u32,
    pub soft_penalty: f64,
    pub execution_time_seconds: f64,
    /// `(initial - final) / initial * 100`, `0.0` when `initial_fitness` is
    /// itself zero (nothing to improve on).
    pub improvement_pct: f64,
    /// Per-rule violation counts and penalties behind `final_fitness`.
    pub detailed_analysis: Breakdown,
}

/// The full result of one `run_full_optimization` call.
pub struct OptimizationResult {
    pub solution: Solution,
    pub metrics: Metrics,
    pub ga_history: Vec<f64>,
    pub sa_history: Vec<f64>,
}

/// Owns the one seeded [`Rng`] an optimization run is threaded through.
pub struct Optimizer {
    problem: ProblemModel,
    config: OptimizerConfig,
    rng: Rng,
    last_metrics: Option<Metrics>,
}

impl Optimizer {
    pub fn new(problem: ProblemModel, config: OptimizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = Rng::seed_from_u64(config.random_seed);
        Ok(Optimizer { problem, config, rng, last_metrics: None })
    }

    /// Returns the metrics of the most recently completed
    /// `run_full_optimization` call, or `None` if no run has completed yet.
    pub fn get_metrics(&self) -> Option<&Metrics> {
        self.last_metrics.as_ref()
    }

    /// Runs GA to completion, then feeds its best individual straight into
    /// SA, returning the SA phase's best-ever individual.
    pub fn run_full_optimization(
        &mut self,
        ga_callback: Option<&mut GaProgressCallback>,
        sa_callback: Option<&mut SaProgressCallback>,
    ) -> OptimizationResult {
        let start = Instant::now();

        let ga_outcome = genetic::run(
            &self.problem,
            &self.config.ga,
            &self.config.weights,
            &mut self.rng,
            ga_callback,
        );
        let initial_fitness = ga_outcome.best_breakdown.fitness;

        let sa_outcome = annealing::run(
            &self.problem,
            &self.config.sa,
            &self.config.weights,
            &mut self.rng,
            ga_outcome.best.clone(),
            sa_callback,
        );

        let execution_time_seconds = start.elapsed().as_secs_f64();
        let final_fitness = sa_outcome.best_breakdown.fitness;
        let improvement_pct = if initial_fitness > 0.0 {
            (initial_fitness - final_fitness) / initial_fitness * 100.0
        } else {
            0.0
        };

        let metrics = Metrics {
            initial_fitness,
            final_fitness,
            hard_violations: sa_outcome.best_breakdown.total_hard,
            soft_penalty: sa_outcome.best_breakdown.total_soft,
            execution_time_seconds,
            improvement_pct,
            detailed_analysis: sa_outcome.best_breakdown,
        };
        self.last_metrics = Some(metrics);

        OptimizationResult {
            solution: sa_outcome.best,
            metrics,
            ga_history: ga_outcome.history,
            sa_history: sa_outcome.history,
        }
    }
}
