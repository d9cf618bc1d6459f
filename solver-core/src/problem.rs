//! Immutable problem catalogs (C1).
//!
//! [`ProblemModel`] is built once from the four input tables (rooms, groups,
//! sessions, slot penalties) and is read-only for the rest of a run. It
//! pre-computes every lookup the evaluator needs so that no string parsing
//! or map construction happens inside the hot evaluation loop.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A teaching occurrence to be scheduled. Immutable input data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInput {
    pub session_name: String,
    pub session_type: SessionType,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
}

/// The three kinds of teaching session this domain recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    Cours,
    #[serde(rename = "TD")]
    Td,
    #[serde(rename = "TP")]
    Tp,
}

/// A bookable room. `room_type` is taken as given; when the caller doesn't
/// know it, [`RoomType::derive_from_capacity`] applies a capacity-based
/// fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInput {
    pub room_id: String,
    pub capacity: u32,
    #[serde(default)]
    pub room_type: Option<RoomType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    Amphitheater,
    Classroom,
}

impl RoomType {
    /// capacity > 100 ⇒ Amphitheater, the default for large rooms.
    pub fn derive_from_capacity(capacity: u32) -> Self {
        if capacity > 100 {
            RoomType::Amphitheater
        } else {
            RoomType::Classroom
        }
    }
}

/// A reference row mapping a group's name to its headcount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInput {
    pub group_name: String,
    pub size: u32,
}

/// A single start time with its scheduling preference penalty. The core
/// crosses this with the six fixed weekdays to build the full slot grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPenaltyInput {
    pub start_time: String,
    pub penalty: f64,
}

/// The six teaching weekdays, in the fixed order slots are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Day {
    Lundi,
    Mardi,
    Mercredi,
    Jeudi,
    Vendredi,
    Samedi,
}

impl Day {
    pub const ALL: [Day; 6] = [
        Day::Lundi,
        Day::Mardi,
        Day::Mercredi,
        Day::Jeudi,
        Day::Vendredi,
        Day::Samedi,
    ];

    /// Dense 0..6 index, used to address fixed-size per-day arrays without
    /// going through a `HashMap`.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A normalized session, indexed densely 0..S-1. Evaluation only ever
/// touches this form, never [`SessionInput`] directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub session_id: usize,
    pub session_name: String,
    pub session_type: SessionType,
    pub teacher_id: Option<String>,
    pub group_name: Option<String>,
}

/// A normalized, densely-indexed room.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub room_id: usize,
    pub external_id: String,
    pub capacity: u32,
    pub room_type: RoomType,
}

/// A (day, start-time) slot, indexed densely 0..T-1.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub slot_id: usize,
    pub day: Day,
    pub start_time: String,
    pub penalty: f64,
}

fn parse_minutes(start_time: &str) -> Option<u32> {
    let (h, m) = start_time.split_once(':')?;
    let h: u32 = h.trim().parse().ok()?;
    let m: u32 = m.trim().parse().ok()?;
    Some(h * 60 + m)
}

/// The immutable, read-only problem catalogs and the index tables computed
/// from them. Built once per run; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ProblemModel {
    pub sessions: Vec<Session>,
    pub rooms: Vec<Room>,
    pub slots: Vec<Slot>,

    /// `group_size(name)` falls back to 30 for any group not in this table.
    group_size: HashMap<String, u32>,

    /// `slot_penalty[slot_id]`.
    pub slot_penalty: Vec<f64>,
    /// `slot_time_index[slot_id]` = position of the slot's start time within
    /// the sorted list of distinct start times (used for S1 gap computation).
    pub slot_time_index: Vec<usize>,

    /// Dense index for every teacher string seen on a session, built purely
    /// to make H1/S1 bucket counts array-backed instead of hashmap-backed.
    teacher_id_to_idx: HashMap<String, usize>,
    /// Dense index for every group string seen on a session (distinct from
    /// the `group_size` reference table, which may name groups that never
    /// appear on a session, or omit groups that do).
    group_name_to_idx: HashMap<String, usize>,

    /// `session_teacher_idx[session_id]`, `None` when the session has no
    /// teacher.
    pub session_teacher_idx: Vec<Option<usize>>,
    /// `session_group_idx[session_id]`, `None` when the session has no group.
    pub session_group_idx: Vec<Option<usize>>,
    /// Group size looked up per session (cached; spares a hashmap probe per
    /// evaluation for the single most common lookup, capacity checking).
    pub session_group_size: Vec<u32>,

    pub num_teachers: usize,
    pub num_groups: usize,
}

/// Default headcount assumed for a group absent from the reference table.
pub const DEFAULT_GROUP_SIZE: u32 = 30;

impl ProblemModel {
    pub fn build(
        sessions: &[SessionInput],
        rooms: &[RoomInput],
        groups: &[GroupInput],
        slot_penalties: &[SlotPenaltyInput],
    ) -> Result<Self, DataError> {
        if sessions.is_empty() {
            return Err(DataError::NoSessions);
        }
        if rooms.is_empty() {
            return Err(DataError::NoRooms);
        }
        if slot_penalties.is_empty() {
            return Err(DataError::NoSlots);
        }

        let normalized_sessions: Vec<Session> = sessions
            .iter()
            .enumerate()
            .map(|(session_id, s)| Session {
                session_id,
                session_name: s.session_name.clone(),
                session_type: s.session_type,
                teacher_id: s.teacher_id.clone(),
                group_name: s.group_name.clone(),
            })
            .collect();

        let normalized_rooms: Vec<Room> = rooms
            .iter()
            .enumerate()
            .map(|(room_id, r)| Room {
                room_id,
                external_id: r.room_id.clone(),
                capacity: r.capacity,
                room_type: r
                    .room_type
                    .unwrap_or_else(|| RoomType::derive_from_capacity(r.capacity)),
            })
            .collect();

        // Distinct start times, sorted by time-of-day.
        let mut distinct_times: Vec<(u32, String, f64)> = Vec::new();
        for sp in slot_penalties {
            let minutes = parse_minutes(&sp.start_time).unwrap_or(0);
            if !distinct_times.iter().any(|(_, t, _)| *t == sp.start_time) {
                distinct_times.push((minutes, sp.start_time.clone(), sp.penalty));
            }
        }
        distinct_times.sort_by_key(|(minutes, _, _)| *minutes);

        if distinct_times.is_empty() {
            return Err(DataError::NoSlots);
        }

        let mut normalized_slots = Vec::with_capacity(Day::ALL.len() * distinct_times.len());
        let mut slot_penalty = Vec::with_capacity(normalized_slots.capacity());
        let mut slot_time_index = Vec::with_capacity(normalized_slots.capacity());
        for day in Day::ALL {
            for (time_idx, (_, start_time, penalty)) in distinct_times.iter().enumerate() {
                let slot_id = normalized_slots.len();
                normalized_slots.push(Slot {
                    slot_id,
                    day,
                    start_time: start_time.clone(),
                    penalty: *penalty,
                });
                slot_penalty.push(*penalty);
                slot_time_index.push(time_idx);
            }
        }

        let group_size: HashMap<String, u32> = groups
            .iter()
            .map(|g| (g.group_name.clone(), g.size))
            .collect();

        let mut teacher_id_to_idx: HashMap<String, usize> = HashMap::new();
        let mut group_name_to_idx: HashMap<String, usize> = HashMap::new();
        let mut session_teacher_idx = Vec::with_capacity(normalized_sessions.len());
        let mut session_group_idx = Vec::with_capacity(normalized_sessions.len());
        let mut session_group_size = Vec::with_capacity(normalized_sessions.len());

        for session in &normalized_sessions {
            let teacher_idx = session.teacher_id.as_ref().map(|t| {
                let next = teacher_id_to_idx.len();
                *teacher_id_to_idx.entry(t.clone()).or_insert(next)
            });
            session_teacher_idx.push(teacher_idx);

            let group_idx = session.group_name.as_ref().map(|g| {
                let next = group_name_to_idx.len();
                *group_name_to_idx.entry(g.clone()).or_insert(next)
            });
            session_group_idx.push(group_idx);

            let size = session
                .group_name
                .as_ref()
                .and_then(|g| group_size.get(g).copied())
                .unwrap_or(DEFAULT_GROUP_SIZE);
            session_group_size.push(size);
        }

        debug!(
            "built problem model: {} sessions, {} rooms, {} slots, {} teachers, {} groups",
            normalized_sessions.len(),
            normalized_rooms.len(),
            normalized_slots.len(),
            teacher_id_to_idx.len(),
            group_name_to_idx.len(),
        );

        Ok(ProblemModel {
            sessions: normalized_sessions,
            rooms: normalized_rooms,
            num_teachers: teacher_id_to_idx.len(),
            num_groups: group_name_to_idx.len(),
            slots: normalized_slots,
            group_size,
            slot_penalty,
            slot_time_index,
            teacher_id_to_idx,
            group_name_to_idx,
            session_teacher_idx,
            session_group_idx,
            session_group_size,
        })
    }

    pub fn num_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn num_rooms(&self) -> usize {
        self.rooms.len()
    }

    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Group size lookup, defaulting to [`DEFAULT_GROUP_SIZE`] for any name
    /// not present in the reference table.
    pub fn group_size(&self, group_name: &str) -> u32 {
        self.group_size
            .get(group_name)
            .copied()
            .unwrap_or(DEFAULT_GROUP_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str, capacity: u32) -> RoomInput {
        RoomInput {
            room_id: id.to_string(),
            capacity,
            room_type: None,
        }
    }

    fn session(name: &str, teacher: Option<&str>, group: Option<&str>) -> SessionInput {
        SessionInput {
            session_name: name.to_string(),
            session_type: SessionType::Cours,
            teacher_id: teacher.map(str::to_string),
            group_name: group.map(str::to_string),
        }
    }

    #[test]
    fn builds_slot_grid_as_cross_product_of_days_and_times() {
        let model = ProblemModel::build(
            &[session("C1", Some("T1"), Some("G1"))],
            &[room("R1", 100)],
            &[GroupInput { group_name: "G1".into(), size: 30 }],
            &[
                SlotPenaltyInput { start_time: "08:30".into(), penalty: 0.0 },
                SlotPenaltyInput { start_time: "18:30".into(), penalty: 15.0 },
            ],
        )
        .unwrap();

        assert_eq!(model.num_slots(), 12);
        assert_eq!(model.slot_time_index[0], 0);
        assert_eq!(model.slot_penalty[0], 0.0);
    }

    #[test]
    fn sorts_distinct_times_by_time_of_day_not_input_order() {
        let model = ProblemModel::build(
            &[session("C1", None, None)],
            &[room("R1", 100)],
            &[],
            &[
                SlotPenaltyInput { start_time: "14:00".into(), penalty: 5.0 },
                SlotPenaltyInput { start_time: "08:00".into(), penalty: 0.0 },
            ],
        )
        .unwrap();

        // Day-major loop, times sorted ascending within each day.
        assert_eq!(model.slots[0].start_time, "08:00");
        assert_eq!(model.slots[1].start_time, "14:00");
    }

    #[test]
    fn unknown_group_defaults_to_thirty() {
        let model = ProblemModel::build(
            &[session("C1", None, Some("Ghost"))],
            &[room("R1", 100)],
            &[],
            &[SlotPenaltyInput { start_time: "08:00".into(), penalty: 0.0 }],
        )
        .unwrap();

        assert_eq!(model.group_size("Ghost"), DEFAULT_GROUP_SIZE);
        assert_eq!(model.session_group_size[0], DEFAULT_GROUP_SIZE);
    }

    #[test]
    fn room_type_derivation_uses_capacity_threshold() {
        assert_eq!(RoomType::derive_from_capacity(101), RoomType::Amphitheater);
        assert_eq!(RoomType::derive_from_capacity(100), RoomType::Classroom);
    }

    #[test]
    fn rejects_empty_sessions_rooms_or_slots() {
        let ok_room = [room("R1", 100)];
        let ok_slot = [SlotPenaltyInput { start_time: "08:00".into(), penalty: 0.0 }];
        let ok_session = [session("C1", None, None)];

        assert_eq!(
            ProblemModel::build(&[], &ok_room, &[], &ok_slot).unwrap_err(),
            DataError::NoSessions
        );
        assert_eq!(
            ProblemModel::build(&ok_session, &[], &[], &ok_slot).unwrap_err(),
            DataError::NoRooms
        );
        assert_eq!(
            ProblemModel::build(&ok_session, &ok_room, &[], &[]).unwrap_err(),
            DataError::NoSlots
        );
    }
}
