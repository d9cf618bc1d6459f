//! Pure constraint evaluation (C3).
//!
//! [`evaluate`] is the single source of truth for solution quality: it maps
//! a `(problem, solution, weights)` triple to a [`Breakdown`] deterministically
//! and without side effects. Calling it twice on the same inputs always
//! yields identical results.
//!
//! Evaluation runs in O(S) work plus O(bucket) constant overhead per
//! bucket, without per-call allocation of the
//! aggregation maps. [`EvalScratch`] holds those maps so callers that
//! evaluate millions of candidates (the GA/SA inner loops) can reuse one
//! scratch buffer across calls instead of allocating fresh ones every time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chromosome::Solution;
use crate::problem::ProblemModel;

/// Lexicographic separator between hard violations and soft penalty: any
/// reduction in hard-violation count dominates any realistic soft change.
pub const HARD_WEIGHT: f64 = 1_000_000.0;

/// Weights applied to each soft rule before summing. Disabling a rule means
/// setting its weight to zero, not omitting it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoftWeights {
    pub gaps: f64,
    pub time_penalties: f64,
    pub load_balance: f64,
}

impl Default for SoftWeights {
    fn default() -> Self {
        SoftWeights { gaps: 1.0, time_penalties: 1.0, load_balance: 1.0 }
    }
}

/// Per-rule breakdown of a solution's quality, plus the aggregated
/// `total_hard`, `total_soft`, and `fitness`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub h1_teacher_conflicts: u32,
    pub h2_room_conflicts: u32,
    pub h3_group_conflicts: u32,
    pub h4_capacity_violations: u32,
    pub h5_room_type_violations: u32,
    pub total_hard: u32,

    pub s1_gaps: f64,
    pub s2_time_penalties: f64,
    pub s3_load_balance: f64,
    pub total_soft: f64,

    pub fitness: f64,
}

impl Breakdown {
    /// The feasibility predicate: zero hard violations.
    pub fn is_feasible(&self) -> bool {
        self.total_hard == 0
    }
}

/// Reusable aggregation buffers for [`evaluate`]. Construct one per
/// long-running search (GA generation loop, SA refinement loop) and pass it
/// to every `evaluate` call instead of letting each call allocate its own
/// maps.
#[derive(Debug, Default)]
pub struct EvalScratch {
    teacher_slot_counts: HashMap<(usize, usize), u32>,
    room_slot_counts: HashMap<(usize, usize), u32>,
    group_slot_counts: HashMap<(usize, usize), u32>,
    teacher_day_times: HashMap<(usize, usize), Vec<usize>>,
    group_day_times: HashMap<(usize, usize), Vec<usize>>,
}

impl EvalScratch {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear(&mut self) {
        self.teacher_slot_counts.clear();
        self.room_slot_counts.clear();
        self.group_slot_counts.clear();
        for times in self.teacher_day_times.values_mut() {
            times.clear();
        }
        for times in self.group_day_times.values_mut() {
            times.clear();
        }
    }
}

/// Evaluates `solution` against `problem` under `weights`. See module docs
/// for the performance/purity contract.
pub fn evaluate(
    problem: &ProblemModel,
    solution: &Solution,
    weights: &SoftWeights,
    scratch: &mut EvalScratch,
) -> Breakdown {
    scratch.clear();

    let mut day_counts = [0u32; 6];
    let mut s2_time_penalties = 0.0;

    for (session_id, assignment) in solution.assignments.iter().enumerate() {
        let slot = &problem.slots[assignment.slot_id];
        s2_time_penalties += slot.penalty;
        day_counts[slot.day.index()] += 1;

        if let Some(teacher_idx) = problem.session_teacher_idx[session_id] {
            *scratch
                .teacher_slot_counts
                .entry((teacher_idx, assignment.slot_id))
                .or_insert(0) += 1;
            scratch
                .teacher_day_times
                .entry((teacher_idx, slot.day.index()))
                .or_default()
                .push(problem.slot_time_index[assignment.slot_id]);
        }

        if let Some(group_idx) = problem.session_group_idx[session_id] {
            *scratch
                .group_slot_counts
                .entry((group_idx, assignment.slot_id))
                .or_insert(0) += 1;
            scratch
                .group_day_times
                .entry((group_idx, slot.day.index()))
                .or_default()
                .push(problem.slot_time_index[assignment.slot_id]);
        }

        *scratch
            .room_slot_counts
            .entry((assignment.slot_id, assignment.room_id))
            .or_insert(0) += 1;
    }

    let h1_teacher_conflicts: u32 = scratch
        .teacher_slot_counts
        .values()
        .map(|&count| count.saturating_sub(1))
        .sum();
    let h2_room_conflicts: u32 = scratch
        .room_slot_counts
        .values()
        .map(|&count| count.saturating_sub(1))
        .sum();
    let h3_group_conflicts: u32 = scratch
        .group_slot_counts
        .values()
        .map(|&count| count.saturating_sub(1))
        .sum();

    let mut h4_capacity_violations = 0u32;
    let mut h5_room_type_violations = 0u32;
    for (session_id, assignment) in solution.assignments.iter().enumerate() {
        let room = &problem.rooms[assignment.room_id];
        let group_size = problem.session_group_size[session_id];

        if group_size > room.capacity {
            h4_capacity_violations += 1;
        }

        let session = &problem.sessions[session_id];
        if session.session_type == crate::problem::SessionType::Cours
            && group_size > 100
            && room.room_type != crate::problem::RoomType::Amphitheater
        {
            h5_room_type_violations += 1;
        }
    }

    let mut s1_gaps = 0.0;
    for times in scratch.teacher_day_times.values() {
        s1_gaps += gap_for_entity_day(times);
    }
    for times in scratch.group_day_times.values() {
        s1_gaps += gap_for_entity_day(times);
    }

    let mean = day_counts.iter().sum::<u32>() as f64 / day_counts.len() as f64;
    let s3_load_balance = day_counts
        .iter()
        .map(|&c| {
            let d = c as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / day_counts.len() as f64;

    let total_hard = h1_teacher_conflicts
        + h2_room_conflicts
        + h3_group_conflicts
        + h4_capacity_violations
        + h5_room_type_violations;
    let total_soft = weights.gaps * s1_gaps
        + weights.time_penalties * s2_time_penalties
        + weights.load_balance * s3_load_balance;
    let fitness = HARD_WEIGHT * total_hard as f64 + total_soft;

    Breakdown {
        h1_teacher_conflicts,
        h2_room_conflicts,
        h3_group_conflicts,
        h4_capacity_violations,
        h5_room_type_violations,
        total_hard,
        s1_gaps,
        s2_time_penalties,
        s3_load_balance,
        total_soft,
        fitness,
    }
}

/// `(max - min + 1) - count` for one entity's session times on one day,
/// skipped (contributes 0) when the entity has at most one session that day.
fn gap_for_entity_day(time_indices: &[usize]) -> f64 {
    if time_indices.len() <= 1 {
        return 0.0;
    }
    let min = *time_indices.iter().min().unwrap();
    let max = *time_indices.iter().max().unwrap();
    ((max - min + 1) as i64 - time_indices.len() as i64) as f64
}
