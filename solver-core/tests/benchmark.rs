//! Wall-clock benchmark for a realistically-sized timetable. Not run by
//! default; `cargo test -- --ignored` to exercise it.

use solver_core::algorithms::annealing::SaConfig;
use solver_core::algorithms::genetic::GaConfig;
use solver_core::models::{ApiInput, SolverConfiguration};
use solver_core::optimizer::OptimizerConfig;
use solver_core::problem::{GroupInput, RoomInput, SessionInput, SessionType, SlotPenaltyInput};
use solver_core::run_solver;
use std::time::Instant;

fn create_benchmark_input() -> ApiInput {
    let num_teachers = 20;
    let num_groups = 15;
    let sessions_per_group = 8;

    let groups: Vec<GroupInput> = (0..num_groups)
        .map(|i| GroupInput { group_name: format!("G{i}"), size: 25 + (i as u32 % 4) * 10 })
        .collect();

    let sessions: Vec<SessionInput> = (0..num_groups)
        .flat_map(|g| {
            (0..sessions_per_group).map(move |s| SessionInput {
                session_name: format!("G{g}-S{s}"),
                session_type: if s % 3 == 0 { SessionType::Cours } else { SessionType::Td },
                teacher_id: Some(format!("T{}", (g * sessions_per_group + s) % num_teachers)),
                group_name: Some(format!("G{g}")),
            })
        })
        .collect();

    let rooms: Vec<RoomInput> = (0..12)
        .map(|i| RoomInput {
            room_id: format!("R{i}"),
            capacity: if i < 2 { 300 } else { 40 },
            room_type: None,
        })
        .collect();

    let slot_penalties = vec![
        SlotPenaltyInput { start_time: "08:30".into(), penalty: 0.0 },
        SlotPenaltyInput { start_time: "10:30".into(), penalty: 0.0 },
        SlotPenaltyInput { start_time: "14:00".into(), penalty: 5.0 },
        SlotPenaltyInput { start_time: "16:00".into(), penalty: 10.0 },
        SlotPenaltyInput { start_time: "18:30".into(), penalty: 15.0 },
    ];

    ApiInput {
        sessions,
        rooms,
        groups,
        slot_penalties,
        config: SolverConfiguration {
            optimizer: OptimizerConfig {
                ga: GaConfig { population_size: 150, generations: 400, ..Default::default() },
                sa: SaConfig { initial_temp: 1000.0, cooling_rate: 0.95, iterations_per_temp: 150 },
                random_seed: 42,
                ..Default::default()
            },
            logging: Default::default(),
        },
    }
}

#[test]
#[ignore]
fn run_full_algorithm_benchmark() {
    let input = create_benchmark_input();

    println!("--- Starting Benchmark ---");
    println!(
        "Sessions: {}, Rooms: {}, Groups: {}",
        input.sessions.len(),
        input.rooms.len(),
        input.groups.len()
    );

    let start_time = Instant::now();
    let output = run_solver(&input).unwrap();
    let duration = start_time.elapsed();

    println!("--- Benchmark Finished ---");
    println!("Total runtime: {:.4} seconds", duration.as_secs_f64());
    println!(
        "Final fitness: {:.3} (hard {}, soft {:.3})",
        output.metrics.final_fitness, output.metrics.hard_violations, output.metrics.soft_penalty
    );
}
