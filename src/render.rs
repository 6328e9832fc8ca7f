// src/render.rs
//! Plain-text and delimited output for query results.

use std::fmt::Write as _;
use std::io;

use crate::config::consts::SELF_STUDY_ROOM;
use crate::csv::write_row;
use crate::model::{DaySchedule, LessonRecord};
use crate::query::{MatchType, TeacherHit, TeacherResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Format {
    #[default]
    Text,
    Csv,
    Tsv,
    Json,
}

impl Format {
    pub fn delimiter(self) -> Option<char> {
        match self {
            Format::Csv => Some(','),
            Format::Tsv => Some('\t'),
            _ => None,
        }
    }
}

/// Room worth printing: not blank and not the self-study placeholder.
fn shown_room(room: &str) -> Option<&str> {
    let room = room.trim();
    (!room.is_empty() && room.to_uppercase() != SELF_STUDY_ROOM).then_some(room)
}

fn day_header(out: &mut String, group: &DaySchedule, with_count: bool) {
    let _ = write!(out, "{}, {}", group.day, group.shift);
    if with_count {
        let _ = write!(out, " ({} уроков)", group.lessons.len());
    }
    out.push_str(":\n");
}

/// Consecutive lessons sharing a time string. Input is already time-sorted.
fn by_time(lessons: &[LessonRecord]) -> Vec<&[LessonRecord]> {
    lessons.chunk_by(|a, b| a.time == b.time).collect()
}

/// Records expanded from one compound cell: same slot, subject and occupant field.
fn by_cell(lessons: &[LessonRecord]) -> Vec<&[LessonRecord]> {
    lessons
        .chunk_by(|a, b| {
            a.time == b.time
                && a.subject == b.subject
                && a.class == b.class
                && a.original_teacher_field == b.original_teacher_field
        })
        .collect()
}

/// Distinct printable rooms of a cell, in order, joined with `/`.
fn cell_rooms(cell: &[LessonRecord]) -> Option<String> {
    let mut rooms: Vec<&str> = Vec::new();
    for room in cell.iter().filter_map(|l| shown_room(&l.room)) {
        if !rooms.contains(&room) {
            rooms.push(room);
        }
    }
    (!rooms.is_empty()).then(|| rooms.join("/"))
}

/* ---------------- Text ---------------- */

pub fn class_text(name: &str, groups: &[DaySchedule]) -> String {
    if groups.is_empty() {
        return format!("Расписание для класса {name} не найдено.\n");
    }
    let mut out = format!("Расписание для класса {name}:\n\n");
    for group in groups {
        day_header(&mut out, group, false);
        for cell in by_cell(&group.lessons) {
            let l = &cell[0];
            let _ = write!(out, "{} - {}", l.time.display(), l.subject);
            let teacher = if l.original_teacher_field.is_empty() { &l.teacher } else { &l.original_teacher_field };
            if !teacher.is_empty() {
                let _ = write!(out, " ({teacher})");
            }
            if let Some(rooms) = cell_rooms(cell) {
                let _ = write!(out, " каб. {rooms}");
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

pub fn teacher_text(query: &str, result: Option<&TeacherResult>) -> String {
    let Some(r) = result else {
        return format!("Учитель {query} не найден в расписании.\n");
    };
    let mut out = format!("Расписание учителя {}:\n", r.display_name);
    if r.match_type == MatchType::Partial {
        let _ = writeln!(out, "(по запросу «{}» найдено: {})", r.query, r.found_as);
    }
    let _ = writeln!(out, "Всего уроков: {}\n", r.total_lessons);

    for group in &r.groups {
        day_header(&mut out, group, true);
        for slot in by_time(&group.lessons) {
            let _ = writeln!(out, "{}:", slot[0].time.display());
            for l in slot {
                let _ = write!(out, "  - {}: {}", l.class, l.subject);
                if let Some(room) = shown_room(&l.room) {
                    let _ = write!(out, " (каб. {room})");
                }
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out
}

pub fn room_text(number: &str, groups: &[DaySchedule]) -> String {
    if groups.is_empty() {
        return format!("Кабинет {number} не найден в расписании.\n");
    }
    let total: usize = groups.iter().map(|g| g.lessons.len()).sum();
    let mut out = format!("Расписание кабинета {number}:\nВсего уроков: {total}\n\n");

    for group in groups {
        day_header(&mut out, group, true);
        for slot in by_time(&group.lessons) {
            let _ = writeln!(out, "{}:", slot[0].time.display());
            for l in slot {
                let _ = write!(out, "  - {}: {}", l.class, l.subject);
                if !l.teacher.is_empty() {
                    let _ = write!(out, " ({})", l.teacher);
                }
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out
}

pub fn search_text(query: &str, hits: &[TeacherHit]) -> String {
    if hits.is_empty() {
        return format!("По запросу «{query}» учителя не найдены.\n");
    }
    let mut out = format!("Найдено по запросу «{query}»: {}\n", hits.len());
    for h in hits {
        let _ = write!(out, "  - {} ({} уроков", h.name, h.lesson_count);
        if h.is_combined {
            let _ = write!(out, ", совместно: {}", h.sample_lesson.original_teacher_field);
        }
        out.push_str(")\n");
    }
    out
}

pub fn list_text(items: &[String]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(item);
        out.push('\n');
    }
    out
}

/* ---------------- Delimited ---------------- */

pub const RECORD_HEADERS: [&str; 8] =
    ["day", "shift", "class", "time", "subject", "teacher", "room", "occupants"];

/// One row per lesson record, headers first.
pub fn records_delimited(groups: &[DaySchedule], sep: char) -> io::Result<String> {
    let mut buf = Vec::new();
    write_row(&mut buf, &RECORD_HEADERS[..], sep)?;
    for l in groups.iter().flat_map(|g| &g.lessons) {
        write_row(&mut buf, &[
            l.day.title(),
            l.shift.title(),
            l.class.as_str(),
            l.time.as_str(),
            l.subject.as_str(),
            l.teacher.as_str(),
            l.room.as_str(),
            l.original_teacher_field.as_str(),
        ], sep)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
