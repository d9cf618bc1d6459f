//! Public API types for the solver-core crate.
//!
//! This module is the serializable boundary between the optimization
//! engine and its callers: a JSON/YAML document deserializes into
//! [`ApiInput`], a run produces a [`SolverOutput`]. Everything in
//! [`crate::problem`], [`crate::algorithms`], and [`crate::optimizer`] is
//! reachable without going through here, but `models` is what a web
//! frontend or CLI wrapper actually talks to.

use serde::{Deserialize, Serialize};

use crate::evaluator::Breakdown;
use crate::optimizer::{Metrics, OptimizerConfig};
use crate::problem::{GroupInput, RoomInput, SessionInput, SlotPenaltyInput};

/// Complete input specification for one optimization run.
///
/// # Example
///
/// ```no_run
/// use solver_core::models::*;
/// use solver_core::problem::{SessionInput, SessionType, RoomInput, GroupInput, SlotPenaltyInput};
///
/// let input = ApiInput {
///     sessions: vec![SessionInput {
///         session_name: "Algorithms".to_string(),
///         session_type: SessionType::Cours,
///         teacher_id: Some("T1".to_string()),
///         group_name: Some("G1".to_string()),
///     }],
///     rooms: vec![RoomInput { room_id: "R1".to_string(), capacity: 100, room_type: None }],
///     groups: vec![GroupInput { group_name: "G1".to_string(), size: 30 }],
///     slot_penalties: vec![SlotPenaltyInput { start_time: "08:30".to_string(), penalty: 0.0 }],
///     config: SolverConfiguration::default(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInput {
    pub sessions: Vec<SessionInput>,
    pub rooms: Vec<RoomInput>,
    pub groups: Vec<GroupInput>,
    pub slot_penalties: Vec<SlotPenaltyInput>,
    #[serde(default)]
    pub config: SolverConfiguration,
}

/// Solver algorithm configuration plus logging preferences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct SolverConfiguration {
    #[serde(flatten)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub logging: LoggingOptions,
}

/// Controls what a run prints to stdout/stderr as it progresses. Separate
/// from the `log` crate's diagnostic output: these are user-facing
/// progress/summary lines, gated per caller preference rather than a log
/// level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct LoggingOptions {
    /// Print a GA progress line every N generations. `None` disables it.
    #[serde(default)]
    pub log_frequency: Option<u64>,
    /// Print the GA's starting best fitness before the first generation.
    #[serde(default)]
    pub log_initial_state: bool,
    /// Print total elapsed time and final fitness once the run completes.
    #[serde(default)]
    pub log_duration_and_score: bool,
    /// Print the final schedule in human-readable form.
    #[serde(default)]
    pub display_final_schedule: bool,
    /// Print the final per-rule breakdown (H1..H5, S1..S3).
    #[serde(default)]
    pub log_final_score_breakdown: bool,
}

/// One session's final placement, in display-friendly form (external
/// identifiers rather than dense indices).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub session_name: String,
    pub day: String,
    pub start_time: String,
    pub room_id: String,
}

/// Everything a caller gets back from a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverOutput {
    pub schedule: Vec<ScheduleEntry>,
    pub metrics: Metrics,
    pub ga_history: Vec<f64>,
    pub sa_history: Vec<f64>,
}

impl SolverOutput {
    /// Formats the schedule grouped by day, sessions within a day ordered
    /// by start time.
    pub fn display(&self) -> String {
        let mut by_day: std::collections::BTreeMap<&str, Vec<&ScheduleEntry>> =
            std::collections::BTreeMap::new();
        for entry in &self.schedule {
            by_day.entry(entry.day.as_str()).or_default().push(entry);
        }

        let mut output = String::new();
        for (day, mut entries) in by_day {
            entries.sort_by(|a, b| a.start_time.cmp(&b.start_time));
            output.push_str(&format!("========== {} ==========\n", day.to_uppercase()));
            for entry in entries {
                output.push_str(&format!(
                    "{} {}  {} @ {}\n",
                    entry.start_time, entry.room_id, entry.session_name, entry.day
                ));
            }
            output.push('\n');
        }
        output
    }
}

/// Progress update delivered to a caller-supplied callback during a run
/// GA generations and SA cooling steps both map onto this one
/// shape so a single UI widget can drive off either phase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub phase: Phase,
    /// Generation index (GA) or cooling-step index (SA).
    pub step: u64,
    /// Total generations (GA) or `None` for SA, whose step count is only
    /// known once the temperature has actually decayed past the floor.
    pub total_steps: Option<u64>,
    pub current_fitness: f64,
    pub hard_violations: u32,
    pub soft_penalty: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    GeneticAlgorithm,
    SimulatedAnnealing,
}

/// Callback type for receiving [`ProgressUpdate`]s. Returning `false`
/// requests cooperative early termination.
pub type ProgressCallback = dyn FnMut(&ProgressUpdate) -> bool + Send;
