// src/index.rs
use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;

use crate::config::ParseOptions;
use crate::core::{class_key, normalize, split_compound};
use crate::grid::Grid;
use crate::model::{LessonRecord, Segment};
use crate::parse::{self, Layout};

/// Counters gathered while building an index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub rows: usize,
    pub segments: usize,
    pub positions: usize,
    pub lessons: usize,
    pub records: usize,
    /// Drafts whose rooms could only be assigned by the first-room fallback.
    pub ambiguous_expansions: usize,
}

/// Lessons filed under one raw occupant cell, e.g. `ИВАНОВА/ПЕТРОВ`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupantEntry {
    /// The cell text as first seen.
    pub display: String,
    /// One record per lesson, carrying the first occupant.
    pub lessons: Vec<LessonRecord>,
}

#[derive(Clone, Debug)]
pub struct ScheduleIndex {
    build_seq: u64,
    built_at: Instant,
    layout: Layout,
    classes: Vec<String>,
    class_index: BTreeMap<String, Vec<LessonRecord>>,
    teacher_index: BTreeMap<String, Vec<LessonRecord>>,
    teacher_names: BTreeMap<String, String>,
    room_index: BTreeMap<String, Vec<LessonRecord>>,
    occupant_index: BTreeMap<String, OccupantEntry>,
    stats: BuildStats,
}

impl ScheduleIndex {
    pub fn build(grid: &Grid, opts: &ParseOptions, built_at: Instant, build_seq: u64) -> Self {
        let parsed = parse::parse_grid(grid, opts);

        let mut class_index: BTreeMap<String, Vec<LessonRecord>> = BTreeMap::new();
        let mut teacher_index: BTreeMap<String, Vec<LessonRecord>> = BTreeMap::new();
        let mut teacher_names: BTreeMap<String, String> = BTreeMap::new();
        let mut room_index: BTreeMap<String, Vec<LessonRecord>> = BTreeMap::new();
        let mut occupant_index: BTreeMap<String, OccupantEntry> = BTreeMap::new();
        let mut records = 0;

        for lesson in &parsed.lessons {
            let Some(head) = lesson.first() else { continue };

            let field = head.original_teacher_field.trim();
            if !field.is_empty() {
                occupant_index
                    .entry(normalize(field))
                    .or_insert_with(|| OccupantEntry { display: s!(field), lessons: Vec::new() })
                    .lessons
                    .push(head.clone());
            }

            for rec in lesson {
                records += 1;
                class_index.entry(class_key(&rec.class)).or_default().push(rec.clone());

                if !rec.teacher.is_empty() {
                    let key = normalize(&rec.teacher);
                    teacher_names.entry(key.clone()).or_insert_with(|| rec.teacher.clone());
                    teacher_index.entry(key).or_default().push(rec.clone());
                }
                for part in split_compound(&rec.room) {
                    room_index.entry(normalize(part)).or_default().push(rec.clone());
                }
            }
        }

        let stats = BuildStats {
            rows: grid.len(),
            segments: parsed.layout.segments.len(),
            positions: parsed.positions.len(),
            lessons: parsed.lessons.len(),
            records,
            ambiguous_expansions: parsed.ambiguous_expansions,
        };
        tracing::info!(
            build_seq,
            rows = stats.rows,
            segments = stats.segments,
            lessons = stats.lessons,
            teachers = teacher_index.len(),
            ambiguous = stats.ambiguous_expansions,
            "schedule index built"
        );

        Self {
            build_seq,
            built_at,
            layout: parsed.layout,
            classes: parse::locator::available_classes(grid),
            class_index,
            teacher_index,
            teacher_names,
            room_index,
            occupant_index,
            stats,
        }
    }

    pub fn build_seq(&self) -> u64 { self.build_seq }
    pub fn built_at(&self) -> Instant { self.built_at }
    pub fn stats(&self) -> BuildStats { self.stats }
    pub fn layout(&self) -> &Layout { &self.layout }
    pub fn segments(&self) -> &[Segment] { &self.layout.segments }
    pub fn available_classes(&self) -> &[String] { &self.classes }

    /// Lessons of a class; `key` is a [`class_key`].
    pub fn class_lessons(&self, key: &str) -> &[LessonRecord] {
        self.class_index.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lessons of a single teacher; `key` is [`normalize`]d.
    pub fn teacher_lessons(&self, key: &str) -> &[LessonRecord] {
        self.teacher_index.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Teacher name as first written in the grid.
    pub fn teacher_name(&self, key: &str) -> Option<&str> {
        self.teacher_names.get(key).map(String::as_str)
    }

    /// Normalized teacher keys in ascending order.
    pub fn teacher_keys(&self) -> impl Iterator<Item = &str> {
        self.teacher_index.keys().map(String::as_str)
    }

    /// Lessons held in a room; `key` is [`normalize`]d.
    pub fn room_lessons(&self, key: &str) -> &[LessonRecord] {
        self.room_index.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Raw occupant cells, normalized key → entry, in ascending key order.
    pub fn occupant_fields(&self) -> impl Iterator<Item = (&str, &OccupantEntry)> {
        self.occupant_index.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MemoryGrid;

    fn build(lines: &[&str]) -> ScheduleIndex {
        let grid = Grid::from_source(&MemoryGrid::from_lines(lines)).unwrap();
        ScheduleIndex::build(&grid, &ParseOptions::default(), Instant::now(), 1)
    }

    const DAY: &[&str] = &[
        "ПЯТНИЦА",
        ",Время,5А,6 б",
        ",,Английский язык,История",
        "1,8.00–8.45,Иванова/Петров,Иванова",
        ",,101/102,305",
        ",,Физика,Химия",
        "2,8.55–9.40,Сидоров,Кузнецова/Орлов/Белов",
        ",,201,11/12",
    ];

    #[test]
    fn indexes_by_class_teacher_and_room() {
        let idx = build(DAY);
        assert_eq!(idx.class_lessons("5А").len(), 3);
        assert_eq!(idx.class_lessons("6Б").len(), 4);
        assert_eq!(idx.teacher_lessons("ИВАНОВА").len(), 2);
        assert_eq!(idx.teacher_name("ИВАНОВА"), Some("Иванова"));
        assert_eq!(idx.room_lessons("102")[0].teacher, "Петров");
        // fallback: all three get room 11
        assert_eq!(idx.room_lessons("11").len(), 3);
        assert!(idx.room_lessons("12").is_empty());
        assert_eq!(idx.stats().ambiguous_expansions, 1);
        assert_eq!(idx.stats().lessons, 4);
        assert_eq!(idx.stats().records, 7);
        assert_eq!(idx.available_classes(), ["5А", "6 б"]);
    }

    #[test]
    fn occupant_fields_keep_compound_cells() {
        let idx = build(DAY);
        let fields: Vec<(&str, usize)> = idx
            .occupant_fields()
            .map(|(k, e)| (k, e.lessons.len()))
            .collect();
        assert_eq!(fields, vec![
            ("ИВАНОВА", 1),
            ("ИВАНОВА/ПЕТРОВ", 1),
            ("КУЗНЕЦОВА/ОРЛОВ/БЕЛОВ", 1),
            ("СИДОРОВ", 1),
        ]);
    }

    #[test]
    fn empty_grid_builds_empty_index() {
        let idx = build(&[]);
        assert_eq!(idx.stats(), BuildStats::default());
        assert!(idx.teacher_keys().next().is_none());
        assert!(idx.class_lessons("5А").is_empty());
    }
}
