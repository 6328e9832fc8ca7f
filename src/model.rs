// src/model.rs
//! Value types shared by the parser, the index and the query layer.
//!
//! Nothing downstream of the assembler sees raw grid rows; lessons travel as
//! [`LessonRecord`] from there on.

use std::fmt;

use serde::Serialize;

use crate::config::consts::LESSON_MINUTES;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    pub const ALL: [Day; 6] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri, Day::Sat];

    pub fn from_index(i: usize) -> Option<Day> {
        Self::ALL.get(i).copied()
    }

    /// Name as printed in the source banners.
    pub fn title(self) -> &'static str {
        match self {
            Day::Mon => "ПОНЕДЕЛЬНИК",
            Day::Tue => "ВТОРНИК",
            Day::Wed => "СРЕДА",
            Day::Thu => "ЧЕТВЕРГ",
            Day::Fri => "ПЯТНИЦА",
            Day::Sat => "СУББОТА",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Shift {
    First,
    Second,
}

impl Shift {
    pub fn title(self) -> &'static str {
        match self {
            Shift::First => "1 смена",
            Shift::Second => "2 смена",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A run of grid rows sharing one (day, shift) context. Rows are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Segment {
    pub day: Day,
    pub shift: Shift,
    pub start_row: usize,
    pub end_row: usize,
}

impl Segment {
    #[inline]
    pub fn contains(&self, row: usize) -> bool {
        self.start_row <= row && row <= self.end_row
    }
}

/// Every day banner seen, including days that produced no table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DayBlock {
    pub day: Day,
    pub marker_row: usize,
    pub segments: Vec<Segment>,
}

/// A grid cell recognized as a class label. `context` is `None` when the row
/// lies outside every segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
    pub label: String,
    pub context: Option<Segment>,
}

/// Lesson time as written in the grid, e.g. `8.00–8.45`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RawTimeRange(pub String);

impl RawTimeRange {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Minutes since midnight of the start time; a bare lesson number `n`
    /// sorts as `n * 45`; anything else sorts as 0.
    pub fn sort_key(&self) -> u32 {
        let start = self
            .0
            .split(['–', '—', '-'])
            .next()
            .unwrap_or("")
            .trim();
        if let Some((h, m)) = start.split_once(['.', ':']) {
            return match (h.trim().parse::<u32>(), m.trim().parse::<u32>()) {
                (Ok(h), Ok(m)) => h.checked_mul(60).and_then(|v| v.checked_add(m)).unwrap_or(0),
                _ => 0,
            };
        }
        let number = start.split_whitespace().next().unwrap_or("");
        number
            .parse::<u32>()
            .ok()
            .and_then(|n| n.checked_mul(LESSON_MINUTES))
            .unwrap_or(0)
    }

    /// Hyphenated form for plain-text output.
    pub fn display(&self) -> String {
        self.0.replace(['–', '—'], "-")
    }
}

impl fmt::Display for RawTimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One lesson block as read from the grid, before compound fields are split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonDraft {
    pub day: Day,
    pub shift: Shift,
    pub class: String,
    pub time: RawTimeRange,
    pub subject: String,
    pub occupant_field: String,
    pub room_field: String,
    /// Grid row the time was read from.
    pub row: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LessonRecord {
    pub day: Day,
    pub shift: Shift,
    pub class: String,
    pub time: RawTimeRange,
    pub subject: String,
    pub teacher: String,
    pub room: String,
    pub original_teacher_field: String,
}

/// Deduplication identity of a lesson.
pub type LessonKey<'a> = (&'a RawTimeRange, &'a str, &'a str, &'a str, Day, Shift);

impl LessonRecord {
    pub fn key(&self) -> LessonKey<'_> {
        (&self.time, &self.subject, &self.class, &self.room, self.day, self.shift)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub day: Day,
    pub shift: Shift,
    pub lessons: Vec<LessonRecord>,
}
