//! # solver-core: hybrid GA/SA university timetable optimizer
//!
//! This crate assigns each teaching session — a `(course, group,
//! session_type, teacher)` tuple — to a `(slot, room)` pair so that hard
//! physical constraints (no teacher/room/group double-booking, capacity,
//! room type) are satisfied and soft preferences (schedule gaps, time-of-day
//! penalties, weekday load balance) are minimized.
//!
//! The search is a generational Genetic Algorithm for global exploration
//! followed by a Simulated Annealing pass that locally refines the GA's
//! best individual. Both phases share one seeded RNG, so a run is a pure
//! function of `(input, config, seed)`.
//!
//! ## Quick example
//!
//! ```no_run
//! use solver_core::models::ApiInput;
//! use solver_core::problem::{SessionInput, SessionType, RoomInput, GroupInput, SlotPenaltyInput};
//!
//! let input = ApiInput {
//!     sessions: vec![SessionInput {
//!         session_name: "Algorithms".to_string(),
//!         session_type: SessionType::Cours,
//!         teacher_id: Some("T1".to_string()),
//!         group_name: Some("G1".to_string()),
//!     }],
//!     rooms: vec![RoomInput { room_id: "R1".to_string(), capacity: 100, room_type: None }],
//!     groups: vec![GroupInput { group_name: "G1".to_string(), size: 30 }],
//!     slot_penalties: vec![SlotPenaltyInput { start_time: "08:30".to_string(), penalty: 0.0 }],
//!     config: Default::default(),
//! };
//!
//! match solver_core::run_solver(&input) {
//!     Ok(output) => println!("{}", output.display()),
//!     Err(e) => eprintln!("solve failed: {e}"),
//! }
//! ```

pub mod algorithms;
pub mod chromosome;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod optimizer;
pub mod problem;

use models::{ApiInput, ProgressCallback, ProgressUpdate, Phase, ScheduleEntry, SolverOutput};
use error::SolverError;
use optimizer::Optimizer;
use problem::ProblemModel;

/// Runs the optimizer end-to-end with no progress reporting.
///
/// # Errors
///
/// Returns [`SolverError::Data`] if the input tables fail
/// [`ProblemModel::build`]'s checks, or [`SolverError::Config`] if
/// `input.config` fails [`optimizer::OptimizerConfig::validate`]. Neither is
/// raised once the search has started; an infeasible result is reported
/// through the metrics block, not as an error.
pub fn run_solver(input: &ApiInput) -> Result<SolverOutput, SolverError> {
    run_solver_with_progress(input, None, None)
}

/// Runs the optimizer with optional GA/SA progress callbacks.
///
/// `ga_progress` fires once per GA generation, `sa_progress` once per SA
/// cooling step. Returning `false` from either requests cooperative early
/// termination; the in-flight generation or cooling step still completes
/// and best-ever is updated before the run returns.
pub fn run_solver_with_progress(
    input: &ApiInput,
    ga_progress: Option<&mut ProgressCallback>,
    sa_progress: Option<&mut ProgressCallback>,
) -> Result<SolverOutput, SolverError> {
    let problem = ProblemModel::build(
        &input.sessions,
        &input.rooms,
        &input.groups,
        &input.slot_penalties,
    )?;

    let logging = input.config.logging;
    if logging.log_initial_state {
        println!(
            "starting optimization: {} sessions, {} rooms, {} slots",
            problem.num_sessions(),
            problem.num_rooms(),
            problem.num_slots()
        );
    }

    let mut optimizer = Optimizer::new(problem.clone(), input.config.optimizer)?;

    let log_frequency = logging.log_frequency;
    let mut ga_callback = ga_progress.map(|cb| {
        move |p: algorithms::genetic::GaProgress| -> bool {
            if let Some(freq) = log_frequency {
                if freq > 0 && p.generation as u64 % freq == 0 {
                    println!(
                        "ga generation {}/{}: fitness {:.3}",
                        p.generation + 1,
                        p.total_generations,
                        p.fitness
                    );
                }
            }
            cb(&ProgressUpdate {
                phase: Phase::GeneticAlgorithm,
                step: p.generation as u64,
                total_steps: Some(p.total_generations as u64),
                current_fitness: p.fitness,
                hard_violations: p.hard_violations,
                soft_penalty: p.soft_penalty,
            })
        }
    });
    let mut sa_callback = sa_progress.map(|cb| {
        move |p: algorithms::annealing::SaProgress| -> bool {
            cb(&ProgressUpdate {
                phase: Phase::SimulatedAnnealing,
                step: (p.progress * 1_000_000.0) as u64,
                total_steps: None,
                current_fitness: p.best_fitness,
                hard_violations: p.hard_violations,
                soft_penalty: p.soft_penalty,
            })
        }
    });

    let result = optimizer.run_full_optimization(
        ga_callback.as_mut().map(|cb| cb as &mut algorithms::genetic::GaProgressCallback),
        sa_callback.as_mut().map(|cb| cb as &mut algorithms::annealing::SaProgressCallback),
    );

    if logging.log_duration_and_score {
        println!(
            "optimization finished in {:.2}s: final fitness {:.3}",
            result.metrics.execution_time_seconds, result.metrics.final_fitness
        );
    }
    if logging.log_final_score_breakdown {
        let b = &result.metrics.detailed_analysis;
        println!(
            "hard: teacher_conflicts={} room_conflicts={} group_conflicts={} \
             capacity_violations={} room_type_violations={} (total={})",
            b.h1_teacher_conflicts,
            b.h2_room_conflicts,
            b.h3_group_conflicts,
            b.h4_capacity_violations,
            b.h5_room_type_violations,
            b.total_hard
        );
        println!(
            "soft: gaps={:.3} time_penalties={:.3} load_balance={:.3} (total={:.3}) improvement={:.1}%",
            b.s1_gaps, b.s2_time_penalties, b.s3_load_balance, b.total_soft, result.metrics.improvement_pct
        );
    }

    let schedule = result
        .solution
        .assignments
        .iter()
        .enumerate()
        .map(|(session_id, assignment)| {
            let slot = &problem.slots[assignment.slot_id];
            ScheduleEntry {
                session_name: problem.sessions[session_id].session_name.clone(),
                day: format!("{:?}", slot.day),
                start_time: slot.start_time.clone(),
                room_id: problem.rooms[assignment.room_id].external_id.clone(),
            }
        })
        .collect();

    let output = SolverOutput {
        schedule,
        metrics: result.metrics,
        ga_history: result.ga_history,
        sa_history: result.sa_history,
    };

    if logging.display_final_schedule {
        println!("{}", output.display());
    }

    Ok(output)
}
