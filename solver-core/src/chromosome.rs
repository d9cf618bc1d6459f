//! Candidate solution representation and factories (C2).
//!
//! A [`Solution`] is a flat, cheaply-cloneable vector of `(slot_id,
//! room_id)` pairs, one per session. Nothing in this module mutates a
//! [`ProblemModel`] — it only reads from it.

use rand::Rng;

use crate::problem::ProblemModel;

/// One session's assignment: which slot and which room it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub slot_id: usize,
    pub room_id: usize,
}

/// A candidate timetable: `assignments[session_id]` is that session's
/// `(slot_id, room_id)` pair. Length always equals the problem's session
/// count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub assignments: Vec<Assignment>,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Every `slot_id`/`room_id` in `solution` references an entry present in
/// `problem`'s catalogs, and the length matches the session count.
pub fn is_well_formed(problem: &ProblemModel, solution: &Solution) -> bool {
    solution.len() == problem.num_sessions()
        && solution
            .assignments
            .iter()
            .all(|a| a.slot_id < problem.num_slots() && a.room_id < problem.num_rooms())
}

/// Draws a `(slot_id, room_id)` pair uniformly at random for every session,
/// independently.
pub fn random_solution(problem: &ProblemModel, rng: &mut impl Rng) -> Solution {
    let assignments = (0..problem.num_sessions())
        .map(|_| Assignment {
            slot_id: rng.random_range(0..problem.num_slots()),
            room_id: rng.random_range(0..problem.num_rooms()),
        })
        .collect();
    Solution { assignments }
}

/// Capacity-aware greedy construction.
///
/// Iterates sessions in input order, tracking a running `room_usage`
/// counter. For each session, prefers a room whose capacity covers the
/// group (falling back to any room if none qualifies), picking the least-
/// used such room (ties broken by first occurrence). Slot choice prefers a
/// zero-penalty slot when one exists.
pub fn greedy_solution(problem: &ProblemModel, rng: &mut impl Rng) -> Solution {
    let mut room_usage = vec![0u32; problem.num_rooms()];
    let zero_penalty_slots: Vec<usize> = problem
        .slots
        .iter()
        .filter(|s| s.penalty == 0.0)
        .map(|s| s.slot_id)
        .collect();

    let mut assignments = Vec::with_capacity(problem.num_sessions());
    for (session_id, _session) in problem.sessions.iter().enumerate() {
        let need = problem.session_group_size[session_id];

        let mut candidates: Vec<usize> = problem
            .rooms
            .iter()
            .filter(|r| r.capacity >= need)
            .map(|r| r.room_id)
            .collect();
        if candidates.is_empty() {
            candidates = (0..problem.num_rooms()).collect();
        }

        let room_id = *candidates
            .iter()
            .min_by_key(|&&room_id| room_usage[room_id])
            .expect("candidates is non-empty: either capacity-filtered or the full room list");

        let slot_id = if !zero_penalty_slots.is_empty() {
            zero_penalty_slots[rng.random_range(0..zero_penalty_slots.len())]
        } else {
            rng.random_range(0..problem.num_slots())
        };

        room_usage[room_id] += 1;
        assignments.push(Assignment { slot_id, room_id });
    }

    Solution { assignments }
}

/// Builds the GA's starting population: `⌊pop_size/2⌋` random individuals
/// followed by the remainder greedy (odd sizes round the random half down).
pub fn initial_population(
    pop_size: usize,
    problem: &ProblemModel,
    rng: &mut impl Rng,
) -> Vec<Solution> {
    let random_count = pop_size / 2;
    let greedy_count = pop_size - random_count;

    let mut population = Vec::with_capacity(pop_size);
    population.extend((0..random_count).map(|_| random_solution(problem, rng)));
    population.extend((0..greedy_count).map(|_| greedy_solution(problem, rng)));
    population
}
