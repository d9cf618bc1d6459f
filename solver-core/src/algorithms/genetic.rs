//! Genetic Algorithm driver (C4): tournament selection, uniform crossover,
//! per-gene mutation, elitism, and fitness-history tracking.
//!
//! The GA never fails: it always returns the best individual it
//! has ever observed, even if stopped early by a callback or by reaching
//! fitness zero. A zero-size population is a caller configuration error,
//! rejected earlier by [`crate::optimizer::OptimizerConfig::validate`], not
//! handled here.

use log::debug;
use rand::seq::index::sample;
use rand::Rng as _;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::Rng;
use crate::chromosome::{initial_population, Solution};
use crate::evaluator::{evaluate, Breakdown, EvalScratch, SoftWeights};
use crate::problem::ProblemModel;

/// Parameters for the GA phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaConfig {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub elitism: usize,
    pub tournament_size: usize,
}

impl Default for GaConfig {
    fn default() -> Self {
        GaConfig {
            population_size: 100,
            generations: 300,
            crossover_rate: 0.8,
            mutation_rate: 0.15,
            elitism: 10,
            tournament_size: 5,
        }
    }
}

/// One generation's worth of progress, handed to the caller-supplied
/// callback once per generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaProgress {
    pub generation: usize,
    pub total_generations: usize,
    pub fitness: f64,
    pub hard_violations: u32,
    pub soft_penalty: f64,
}

/// Returning `false` requests cooperative early termination; the current
/// generation still completes and best-ever is updated before the loop
/// exits.
pub type GaProgressCallback<'a> = dyn FnMut(GaProgress) -> bool + 'a;

/// The best-ever individual found, its breakdown, and the per-generation
/// best-fitness history.
pub struct GaOutcome {
    pub best: Solution,
    pub best_breakdown: Breakdown,
    pub history: Vec<f64>,
}

/// Evaluates every individual in `population`, in parallel, reducing in
/// index order so results (and therefore everything downstream) stay
/// deterministic under a fixed seed. `map_init` allocates one [`EvalScratch`]
/// per rayon worker thread and reuses it across that thread's individuals,
/// instead of allocating fresh aggregation maps for every individual.
fn evaluate_population(
    problem: &ProblemModel,
    population: &[Solution],
    weights: &SoftWeights,
) -> Vec<Breakdown> {
    population
        .par_iter()
        .map_init(EvalScratch::new, |scratch, solution| {
            evaluate(problem, solution, weights, scratch)
        })
        .collect()
}

fn tournament_select(breakdowns: &[Breakdown], tournament_size: usize, rng: &mut Rng) -> usize {
    let k = tournament_size.min(breakdowns.len());
    let contestants = sample(rng, breakdowns.len(), k);
    contestants
        .iter()
        .min_by(|&a, &b| breakdowns[a].fitness.total_cmp(&breakdowns[b].fitness))
        .expect("tournament draws at least one contestant")
}

fn uniform_crossover(
    parent_a: &Solution,
    parent_b: &Solution,
    crossover_rate: f64,
    rng: &mut Rng,
) -> (Solution, Solution) {
    if rng.random::<f64>() >= crossover_rate {
        return (parent_a.clone(), parent_b.clone());
    }

    let mut child_a = Vec::with_capacity(parent_a.len());
    let mut child_b = Vec::with_capacity(parent_b.len());
    for (gene_a, gene_b) in parent_a.assignments.iter().zip(parent_b.assignments.iter()) {
        if rng.random::<f64>() < 0.5 {
            child_a.push(*gene_b);
            child_b.push(*gene_a);
        } else {
            child_a.push(*gene_a);
            child_b.push(*gene_b);
        }
    }
    (Solution { assignments: child_a }, Solution { assignments: child_b })
}

fn mutate(solution: &mut Solution, problem: &ProblemModel, mutation_rate: f64, rng: &mut Rng) {
    for gene in solution.assignments.iter_mut() {
        if rng.random::<f64>() >= mutation_rate {
            continue;
        }
        match rng.random_range(0..3) {
            0 => gene.slot_id = rng.random_range(0..problem.num_slots()),
            1 => gene.room_id = rng.random_range(0..problem.num_rooms()),
            _ => {
                gene.slot_id = rng.random_range(0..problem.num_slots());
                gene.room_id = rng.random_range(0..problem.num_rooms());
            }
        }
    }
}

/// Returns the ascending-fitness order of `breakdowns`, ties broken by
/// first occurrence (a stable sort already guarantees this).
fn ranked_indices(breakdowns: &[Breakdown]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..breakdowns.len()).collect();
    indices.sort_by(|&a, &b| breakdowns[a].fitness.total_cmp(&breakdowns[b].fitness));
    indices
}

/// Runs the full GA phase and returns the best-ever individual observed.
pub fn run(
    problem: &ProblemModel,
    config: &GaConfig,
    weights: &SoftWeights,
    rng: &mut Rng,
    mut callback: Option<&mut GaProgressCallback>,
) -> GaOutcome {
    let mut population = initial_population(config.population_size, problem, rng);
    let mut history = Vec::with_capacity(config.generations);

    let mut best: Option<(Solution, Breakdown)> = None;

    for generation in 0..config.generations {
        let breakdowns = evaluate_population(problem, &population, weights);
        let order = ranked_indices(&breakdowns);
        let gen_best_idx = order[0];
        let gen_best = breakdowns[gen_best_idx];

        history.push(gen_best.fitness);

        let improves_best_ever = best
            .as_ref()
            .map(|(_, b)| gen_best.fitness < b.fitness)
            .unwrap_or(true);
        if improves_best_ever {
            best = Some((population[gen_best_idx].clone(), gen_best));
        }

        debug!(
            "ga generation {}/{}: best fitness {:.3} (hard {}, soft {:.3})",
            generation + 1,
            config.generations,
            gen_best.fitness,
            gen_best.total_hard,
            gen_best.total_soft
        );

        let keep_going = match callback.as_deref_mut() {
            Some(cb) => cb(GaProgress {
                generation,
                total_generations: config.generations,
                fitness: gen_best.fitness,
                hard_violations: gen_best.total_hard,
                soft_penalty: gen_best.total_soft,
            }),
            None => true,
        };

        if gen_best.fitness == 0.0 || !keep_going {
            break;
        }

        population = next_generation(problem, config, &population, &breakdowns, &order, rng);
    }

    let (best_solution, best_breakdown) =
        best.expect("generations > 0 is enforced by OptimizerConfig::validate");

    GaOutcome { best: best_solution, best_breakdown, history }
}

fn next_generation(
    problem: &ProblemModel,
    config: &GaConfig,
    population: &[Solution],
    breakdowns: &[Breakdown],
    ranked: &[usize],
    rng: &mut Rng,
) -> Vec<Solution> {
    let mut next = Vec::with_capacity(config.population_size);
    next.extend(ranked[..config.elitism].iter().map(|&i| population[i].clone()));

    while next.len() < config.population_size {
        let a = tournament_select(breakdowns, config.tournament_size, rng);
        let b = tournament_select(breakdowns, config.tournament_size, rng);

        let (mut child_a, mut child_b) =
            uniform_crossover(&population[a], &population[b], config.crossover_rate, rng);
        mutate(&mut child_a, problem, config.mutation_rate, rng);
        mutate(&mut child_b, problem, config.mutation_rate, rng);

        next.push(child_a);
        if next.len() < config.population_size {
            next.push(child_b);
        }
    }

    next.truncate(config.population_size);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{GroupInput, RoomInput, SessionInput, SessionType, SlotPenaltyInput};
    use rand::SeedableRng;

    fn conflict_problem() -> ProblemModel {
        ProblemModel::build(
            &[
                SessionInput {
                    session_name: "C1".into(),
                    session_type: SessionType::Cours,
                    teacher_id: Some("T1".into()),
                    group_name: Some("G1".into()),
                },
                SessionInput {
                    session_name: "C2".into(),
                    session_type: SessionType::Cours,
                    teacher_id: Some("T1".into()),
                    group_name: Some("G2".into()),
                },
            ],
            &[
                RoomInput { room_id: "R1".into(), capacity: 100, room_type: None },
                RoomInput { room_id: "R2".into(), capacity: 100, room_type: None },
            ],
            &[
                GroupInput { group_name: "G1".into(), size: 30 },
                GroupInput { group_name: "G2".into(), size: 30 },
            ],
            &[SlotPenaltyInput { start_time: "08:30".into(), penalty: 0.0 }],
        )
        .unwrap()
    }

    #[test]
    fn resolves_forced_teacher_conflict() {
        let problem = conflict_problem();
        let config = GaConfig { population_size: 30, generations: 50, ..GaConfig::default() };
        let mut rng = Rng::seed_from_u64(42);
        let outcome = run(&problem, &config, &SoftWeights::default(), &mut rng, None);
        assert_eq!(outcome.best_breakdown.total_hard, 0);
    }

    #[test]
    fn history_is_non_increasing() {
        let problem = conflict_problem();
        let config = GaConfig { population_size: 20, generations: 30, ..GaConfig::default() };
        let mut rng = Rng::seed_from_u64(1);
        let outcome = run(&problem, &config, &SoftWeights::default(), &mut rng, None);
        for window in outcome.history.windows(2) {
            assert!(window[1] <= window[0] + 1e-9);
        }
    }

    #[test]
    fn elitism_equal_to_population_size_is_monotone_non_increasing() {
        let problem = conflict_problem();
        let config = GaConfig {
            population_size: 10,
            generations: 10,
            elitism: 10,
            ..GaConfig::default()
        };
        let mut rng = Rng::seed_from_u64(2);
        let outcome = run(&problem, &config, &SoftWeights::default(), &mut rng, None);
        for window in outcome.history.windows(2) {
            assert!(window[1] <= window[0] + 1e-9);
        }
    }

    #[test]
    fn determinism_given_same_seed() {
        let problem = conflict_problem();
        let config = GaConfig { population_size: 20, generations: 15, ..GaConfig::default() };

        let mut rng_a = Rng::seed_from_u64(99);
        let outcome_a = run(&problem, &config, &SoftWeights::default(), &mut rng_a, None);

        let mut rng_b = Rng::seed_from_u64(99);
        let outcome_b = run(&problem, &config, &SoftWeights::default(), &mut rng_b, None);

        assert_eq!(outcome_a.best, outcome_b.best);
        assert_eq!(outcome_a.history, outcome_b.history);
    }

    #[test]
    fn single_session_terminates() {
        let problem = ProblemModel::build(
            &[SessionInput {
                session_name: "C1".into(),
                session_type: SessionType::Cours,
                teacher_id: Some("T1".into()),
                group_name: Some("G1".into()),
            }],
            &[RoomInput { room_id: "R1".into(), capacity: 100, room_type: None }],
            &[GroupInput { group_name: "G1".into(), size: 30 }],
            &[SlotPenaltyInput { start_time: "08:30".into(), penalty: 0.0 }],
        )
        .unwrap();
        let config = GaConfig { population_size: 5, generations: 5, ..GaConfig::default() };
        let mut rng = Rng::seed_from_u64(3);
        let outcome = run(&problem, &config, &SoftWeights::default(), &mut rng, None);
        assert_eq!(outcome.best.len(), 1);
    }
}
