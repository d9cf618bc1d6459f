//! The two cooperating search strategies (C4, C5).
//!
//! - [`genetic`]: a generational Genetic Algorithm used for global
//!   exploration of the assignment space.
//! - [`annealing`]: a Simulated Annealing refiner used afterwards for local
//!   polish of the GA's best individual.
//!
//! Both phases share one seeded [`Rng`], owned and threaded in by
//! [`crate::optimizer::Optimizer`]: neither phase seeds its own randomness,
//! which is what makes a full `run_full_optimization` call reproducible
//! given the same seed and configuration.

pub mod annealing;
pub mod genetic;

/// The RNG type threaded through GA and SA. A concrete, seedable generator
/// (rather than a trait object) keeps `StdRng::seed_from_u64` as the single
/// source of randomness for an entire run, which is what makes a run
/// reproducible.
pub type Rng = rand::rngs::StdRng;
