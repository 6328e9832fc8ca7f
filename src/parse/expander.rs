// src/parse/expander.rs
//! Compound occupant/room fields → one record per occupant.
//!
//! Pairing rules, in order:
//! 1. as many rooms as occupants: pair by position;
//! 2. exactly one room: every occupant gets it;
//! 3. otherwise: every occupant gets the first room.
//!
//! Rule 3 is inherited and carries no guarantee when both counts exceed one
//! and differ. It is reported as an ambiguous expansion, never corrected.

use crate::core::split_compound;
use crate::model::{LessonDraft, LessonRecord};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expansion {
    pub records: Vec<LessonRecord>,
    /// Rule 3 fired for this draft.
    pub ambiguous: bool,
}

pub fn expand(draft: &LessonDraft) -> Expansion {
    let occupants = split_compound(&draft.occupant_field);
    let rooms = split_compound(&draft.room_field);

    if occupants.is_empty() {
        // Nobody to pair with: keep the room cell as written.
        return Expansion {
            records: vec![record(draft, "", draft.room_field.trim())],
            ambiguous: false,
        };
    }

    let ambiguous = rooms.len() > 1 && rooms.len() != occupants.len();
    if ambiguous {
        tracing::warn!(
            class = %draft.class,
            time = %draft.time,
            row = draft.row,
            occupants = %draft.occupant_field,
            rooms = %draft.room_field,
            "ambiguous occupant/room pairing, using first room for all"
        );
    }

    let records = occupants
        .iter()
        .enumerate()
        .map(|(i, occupant)| {
            let room = if rooms.len() == occupants.len() {
                rooms[i]
            } else {
                rooms.first().copied().unwrap_or("")
            };
            record(draft, occupant, room)
        })
        .collect();

    Expansion { records, ambiguous }
}

fn record(draft: &LessonDraft, teacher: &str, room: &str) -> LessonRecord {
    LessonRecord {
        day: draft.day,
        shift: draft.shift,
        class: draft.class.clone(),
        time: draft.time.clone(),
        subject: draft.subject.clone(),
        teacher: teacher.to_string(),
        room: room.to_string(),
        original_teacher_field: draft.occupant_field.clone(),
    }
}
