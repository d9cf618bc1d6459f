//! Simulated Annealing refiner (C5): four neighborhood moves, Metropolis
//! acceptance, geometric cooling, independent best-ever tracking.
//!
//! The refiner starts from the GA phase's best individual and runs in a simple
//! two-state machine: `HOT` (temperature above the fixed floor, still
//! running inner batches) and `COLD` (terminal). A transition happens after
//! every batch of `iterations_per_temp` moves.

use log::debug;
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use super::Rng;
use crate::chromosome::Solution;
use crate::evaluator::{evaluate, Breakdown, EvalScratch, SoftWeights};
use crate::problem::ProblemModel;

/// Parameters for the SA phase. `stop_temp` is fixed at 0.1, not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaConfig {
    pub initial_temp: f64,
    pub cooling_rate: f64,
    pub iterations_per_temp: u32,
}

impl Default for SaConfig {
    fn default() -> Self {
        SaConfig { initial_temp: 1000.0, cooling_rate: 0.95, iterations_per_temp: 100 }
    }
}

/// Fixed temperature floor; also the loop termination threshold.
pub const STOP_TEMP: f64 = 0.1;
/// Temperature floor used in the Metropolis denominator to avoid
/// division-by-zero as `T → 0`.
const TEMP_FLOOR: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaProgress {
    /// `1.0` once temperature has decayed past `stop_temp`, `0.0` at start.
    pub progress: f64,
    pub temperature: f64,
    pub best_fitness: f64,
    pub hard_violations: u32,
    pub soft_penalty: f64,
}

/// Returning `false` requests cooperative early termination; the current
/// cooling step still completes first.
pub type SaProgressCallback<'a> = dyn FnMut(SaProgress) -> bool + 'a;

pub struct SaOutcome {
    pub best: Solution,
    pub best_breakdown: Breakdown,
    /// Current fitness recorded after every evaluated move, not just
    /// accepted ones.
    pub history: Vec<f64>,
}

#[derive(Clone, Copy)]
enum Move {
    Swap,
    MoveSlot,
    MoveRoom,
    MoveBoth,
}

fn pick_move(num_sessions: usize, rng: &mut Rng) -> Move {
    // `swap` needs two distinct positions; with a single session it is
    // simply excluded from the draw.
    let options: &[Move] =
        if num_sessions >= 2 {
            &[Move::Swap, Move::MoveSlot, Move::MoveRoom, Move::MoveBoth]
        } else {
            &[Move::MoveSlot, Move::MoveRoom, Move::MoveBoth]
        };
    options[rng.random_range(0..options.len())]
}

fn apply_move(solution: &mut Solution, problem: &ProblemModel, mv: Move, rng: &mut Rng) {
    let num_sessions = solution.len();
    match mv {
        Move::Swap => {
            let i = rng.random_range(0..num_sessions);
            let mut j = rng.random_range(0..num_sessions);
            while j == i {
                j = rng.random_range(0..num_sessions);
            }
            solution.assignments.swap(i, j);
        }
        Move::MoveSlot => {
            let i = rng.random_range(0..num_sessions);
            solution.assignments[i].slot_id = rng.random_range(0..problem.num_slots());
        }
        Move::MoveRoom => {
            let i = rng.random_range(0..num_sessions);
            solution.assignments[i].room_id = rng.random_range(0..problem.num_rooms());
        }
        Move::MoveBoth => {
            let i = rng.random_range(0..num_sessions);
            solution.assignments[i].slot_id = rng.random_range(0..problem.num_slots());
            solution.assignments[i].room_id = rng.random_range(0..problem.num_rooms());
        }
    }
}

/// Runs the full SA phase starting from `initial`, returning the best-ever
/// individual observed (independent of which moves were accepted).
pub fn run(
    problem: &ProblemModel,
    config: &SaConfig,
    weights: &SoftWeights,
    rng: &mut Rng,
    initial: Solution,
    mut callback: Option<&mut SaProgressCallback>,
) -> SaOutcome {
    let mut scratch = EvalScratch::new();
    let mut current = initial;
    let mut current_breakdown = evaluate(problem, &current, weights, &mut scratch);

    let mut best = current.clone();
    let mut best_breakdown = current_breakdown;
    let mut history = Vec::new();

    let mut temperature = config.initial_temp;
    let total_steps_estimate = if config.cooling_rate < 1.0 && config.initial_temp > STOP_TEMP {
        ((STOP_TEMP / config.initial_temp).ln() / config.cooling_rate.ln()).ceil().max(1.0)
    } else {
        1.0
    };
    let mut steps_done = 0.0;

    while temperature > STOP_TEMP {
        for _ in 0..config.iterations_per_temp {
            let mut neighbor = current.clone();
            apply_move(&mut neighbor, problem, pick_move(neighbor.len(), rng), rng);
            let neighbor_breakdown = evaluate(problem, &neighbor, weights, &mut scratch);

            let delta = neighbor_breakdown.fitness - current_breakdown.fitness;
            let accept = delta < 0.0
                || rng.random::<f64>() < (-delta / temperature.max(TEMP_FLOOR)).exp();

            if accept {
                current = neighbor;
                current_breakdown = neighbor_breakdown;
            }

            if accept && neighbor_breakdown.fitness < best_breakdown.fitness {
                best = current.clone();
                best_breakdown = neighbor_breakdown;
            }

            history.push(current_breakdown.fitness);
        }

        steps_done += 1.0;
        temperature *= config.cooling_rate;

        debug!(
            "sa cooling step: T={:.4}, current fitness={:.3}, best fitness={:.3}",
            temperature, current_breakdown.fitness, best_breakdown.fitness
        );

        let keep_going = match callback.as_deref_mut() {
            Some(cb) => cb(SaProgress {
                progress: (steps_done / total_steps_estimate).min(1.0),
                temperature,
                best_fitness: best_breakdown.fitness,
                hard_violations: best_breakdown.total_hard,
                soft_penalty: best_breakdown.total_soft,
            }),
            None => true,
        };

        if !keep_going {
            break;
        }
    }

    SaOutcome { best, best_breakdown, history }
}
