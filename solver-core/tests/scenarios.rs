//! End-to-end scenarios covering feasibility, conflict resolution, capacity
//! pressure, soft-only minimization, determinism, and monotone best-ever
//! tracking across generations.

use solver_core::algorithms::annealing::SaConfig;
use solver_core::algorithms::genetic::GaConfig;
use solver_core::models::{ApiInput, SolverConfiguration};
use solver_core::optimizer::OptimizerConfig;
use solver_core::problem::{GroupInput, RoomInput, RoomType, SessionInput, SessionType, SlotPenaltyInput};
use solver_core::run_solver;

fn config(ga: GaConfig, sa: SaConfig, seed: u64) -> SolverConfiguration {
    SolverConfiguration {
        optimizer: OptimizerConfig {
            ga,
            sa,
            random_seed: seed,
            ..Default::default()
        },
        logging: Default::default(),
    }
}

fn standard_ga() -> GaConfig {
    GaConfig { population_size: 40, generations: 60, ..Default::default() }
}

fn standard_sa() -> SaConfig {
    SaConfig { initial_temp: 100.0, cooling_rate: 0.9, iterations_per_temp: 30 }
}

#[test]
fn scenario_a_trivial_feasibility() {
    let input = ApiInput {
        sessions: vec![SessionInput {
            session_name: "C1".into(),
            session_type: SessionType::Cours,
            teacher_id: Some("T1".into()),
            group_name: Some("G1".into()),
        }],
        rooms: vec![RoomInput { room_id: "R1".into(), capacity: 100, room_type: None }],
        groups: vec![GroupInput { group_name: "G1".into(), size: 30 }],
        slot_penalties: vec![SlotPenaltyInput { start_time: "08:30".into(), penalty: 0.0 }],
        config: config(standard_ga(), standard_sa(), 42),
    };

    let output = run_solver(&input).unwrap();
    assert_eq!(output.schedule.len(), 1);
    assert_eq!(output.metrics.hard_violations, 0);
}

#[test]
fn scenario_b_forced_teacher_conflict_resolves() {
    let input = ApiInput {
        sessions: vec![
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
        rooms: vec![
            RoomInput { room_id: "R1".into(), capacity: 100, room_type: None },
            RoomInput { room_id: "R2".into(), capacity: 100, room_type: None },
        ],
        groups: vec![
            GroupInput { group_name: "G1".into(), size: 30 },
            GroupInput { group_name: "G2".into(), size: 30 },
        ],
        slot_penalties: vec![SlotPenaltyInput { start_time: "08:30".into(), penalty: 0.0 }],
        config: config(standard_ga(), standard_sa(), 42),
    };

    let output = run_solver(&input).unwrap();
    assert_eq!(output.metrics.hard_violations, 0);
}

#[test]
fn scenario_c_capacity_pressure_prefers_amphitheater() {
    let input = ApiInput {
        sessions: vec![SessionInput {
            session_name: "C1".into(),
            session_type: SessionType::Cours,
            teacher_id: None,
            group_name: Some("Big".into()),
        }],
        rooms: vec![
            RoomInput { room_id: "A1".into(), capacity: 400, room_type: Some(RoomType::Amphitheater) },
            RoomInput { room_id: "R1".into(), capacity: 50, room_type: Some(RoomType::Classroom) },
        ],
        groups: vec![GroupInput { group_name: "Big".into(), size: 200 }],
        slot_penalties: vec![SlotPenaltyInput { start_time: "08:30".into(), penalty: 0.0 }],
        config: config(standard_ga(), standard_sa(), 42),
    };

    let output = run_solver(&input).unwrap();
    assert_eq!(output.metrics.hard_violations, 0);
    assert_eq!(output.schedule[0].room_id, "A1");
}

#[test]
fn scenario_d_soft_only_minimization_picks_zero_penalty_slot() {
    let input = ApiInput {
        sessions: vec![
            SessionInput {
                session_name: "C1".into(),
                session_type: SessionType::Cours,
                teacher_id: Some("T1".into()),
                group_name: Some("G1".into()),
            },
            SessionInput {
                session_name: "C2".into(),
                session_type: SessionType::Cours,
                teacher_id: Some("T2".into()),
                group_name: Some("G2".into()),
            },
        ],
        rooms: vec![
            RoomInput { room_id: "R1".into(), capacity: 100, room_type: None },
            RoomInput { room_id: "R2".into(), capacity: 100, room_type: None },
        ],
        groups: vec![
            GroupInput { group_name: "G1".into(), size: 30 },
            GroupInput { group_name: "G2".into(), size: 30 },
        ],
        slot_penalties: vec![
            SlotPenaltyInput { start_time: "08:30".into(), penalty: 0.0 },
            SlotPenaltyInput { start_time: "18:30".into(), penalty: 15.0 },
        ],
        config: config(standard_ga(), standard_sa(), 42),
    };

    let output = run_solver(&input).unwrap();
    assert_eq!(output.metrics.hard_violations, 0);
    assert!(output.schedule.iter().all(|e| e.start_time == "08:30"));
}

#[test]
fn scenario_e_determinism_across_repeated_runs() {
    let input = ApiInput {
        sessions: vec![SessionInput {
            session_name: "C1".into(),
            session_type: SessionType::Cours,
            teacher_id: None,
            group_name: Some("Big".into()),
        }],
        rooms: vec![
            RoomInput { room_id: "A1".into(), capacity: 400, room_type: Some(RoomType::Amphitheater) },
            RoomInput { room_id: "R1".into(), capacity: 50, room_type: Some(RoomType::Classroom) },
        ],
        groups: vec![GroupInput { group_name: "Big".into(), size: 200 }],
        slot_penalties: vec![SlotPenaltyInput { start_time: "08:30".into(), penalty: 0.0 }],
        config: config(standard_ga(), standard_sa(), 42),
    };

    let first = run_solver(&input).unwrap();
    let second = run_solver(&input).unwrap();

    assert_eq!(first.metrics.final_fitness, second.metrics.final_fitness);
    assert_eq!(first.ga_history, second.ga_history);
    assert_eq!(first.sa_history, second.sa_history);
    for (a, b) in first.schedule.iter().zip(second.schedule.iter()) {
        assert_eq!(a.room_id, b.room_id);
        assert_eq!(a.day, b.day);
        assert_eq!(a.start_time, b.start_time);
    }
}

#[test]
fn scenario_f_monotone_best_ever_across_generations() {
    let input = ApiInput {
        sessions: vec![
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
        rooms: vec![
            RoomInput { room_id: "R1".into(), capacity: 100, room_type: None },
            RoomInput { room_id: "R2".into(), capacity: 100, room_type: None },
        ],
        groups: vec![
            GroupInput { group_name: "G1".into(), size: 30 },
            GroupInput { group_name: "G2".into(), size: 30 },
        ],
        slot_penalties: vec![SlotPenaltyInput { start_time: "08:30".into(), penalty: 0.0 }],
        config: config(
            GaConfig { population_size: 30, generations: 50, ..Default::default() },
            standard_sa(),
            42,
        ),
    };

    let output = run_solver(&input).unwrap();
    for window in output.ga_history.windows(2) {
        assert!(window[1] <= window[0] + 1e-9);
    }
}
