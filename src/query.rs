// src/query.rs
//! Class, teacher and room lookups over the current [`ScheduleIndex`].

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::config::{Options, ParseOptions};
use crate::core::normalize::is_compound;
use crate::core::{class_key, normalize, split_compound};
use crate::error::{Result, ScheduleError};
use crate::grid::{Grid, GridSource};
use crate::index::{BuildStats, ScheduleIndex};
use crate::model::{DaySchedule, LessonRecord, Segment};
use crate::store::{Clock, ScheduleStore, SystemClock};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Partial,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TeacherResult {
    pub query: String,
    /// Normalized key the query resolved to.
    pub found_as: String,
    /// The key as written in the grid.
    pub display_name: String,
    pub match_type: MatchType,
    pub groups: Vec<DaySchedule>,
    pub total_lessons: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TeacherHit {
    /// First name of the occupant cell.
    pub name: String,
    /// Lessons filed under the whole cell.
    pub lesson_count: usize,
    pub sample_lesson: LessonRecord,
    pub is_combined: bool,
}

pub struct QueryService<C: Clock = SystemClock> {
    store: ScheduleStore<C>,
}

impl QueryService<SystemClock> {
    pub fn new(opts: &Options) -> Self {
        Self { store: ScheduleStore::new(opts.parse, opts.cache.ttl()) }
    }
}

impl Default for QueryService<SystemClock> {
    fn default() -> Self { Self::new(&Options::default()) }
}

impl<C: Clock> QueryService<C> {
    pub fn with_clock(parse: ParseOptions, ttl: Duration, clock: C) -> Self {
        Self { store: ScheduleStore::with_clock(parse, ttl, clock) }
    }

    /* ---------------- Loading ---------------- */

    /// Reads `source` and swaps the grid in. On error, or when the source
    /// holds no rows, the current grid and snapshot stay as they were.
    pub fn reload(&self, source: &dyn GridSource) -> Result<usize> {
        let grid = match Grid::from_source(source) {
            Ok(grid) => grid,
            Err(e) => {
                tracing::warn!(source = %source.describe(), error = %e, "reload failed, keeping previous grid");
                return Err(e);
            }
        };
        if grid.is_empty() {
            tracing::warn!(source = %source.describe(), "reload found no rows, keeping previous grid");
            return Err(ScheduleError::EmptySource(source.describe()));
        }
        let rows = grid.len();
        self.store.replace_grid(grid);
        tracing::info!(source = %source.describe(), rows, "grid reloaded");
        Ok(rows)
    }

    pub fn load_rows(&self, rows: Vec<Vec<String>>) -> Result<usize> {
        if rows.is_empty() {
            return Err(ScheduleError::EmptySource(s!("in-memory rows")));
        }
        let n = rows.len();
        self.store.replace_grid(Grid::new(rows));
        Ok(n)
    }

    pub fn invalidate(&self) { self.store.invalidate() }
    pub fn is_loaded(&self) -> bool { self.store.is_loaded() }

    pub fn snapshot(&self) -> Arc<ScheduleIndex> { self.store.get() }
    pub fn store(&self) -> &ScheduleStore<C> { &self.store }

    /* ---------------- Lookups ---------------- */

    pub fn find_class(&self, name: &str) -> Vec<DaySchedule> {
        let key = class_key(name);
        if key.is_empty() {
            return Vec::new();
        }
        group_by_day(self.store.get().class_lessons(&key))
    }

    pub fn find_teacher_exact(&self, name: &str) -> Option<TeacherResult> {
        let needle = normalize(name);
        if needle.is_empty() {
            return None;
        }
        let index = self.store.get();

        let (key, match_type) = if !index.teacher_lessons(&needle).is_empty() {
            (needle, MatchType::Exact)
        } else {
            let key = index
                .teacher_keys()
                .filter(|k| k.contains(needle.as_str()))
                .min_by(|a, b| a.chars().count().cmp(&b.chars().count()).then_with(|| a.cmp(b)))?;
            (s!(key), MatchType::Partial)
        };

        let lessons = dedup(index.teacher_lessons(&key));
        let total_lessons = lessons.len();
        tracing::debug!(query = name, found_as = %key, ?match_type, total_lessons, "teacher lookup");

        Some(TeacherResult {
            query: s!(name),
            display_name: index.teacher_name(&key).map(String::from).unwrap_or_else(|| key.clone()),
            found_as: key,
            match_type,
            groups: group_by_day(&lessons),
            total_lessons,
        })
    }

    /// Occupant cells containing `query`, most lessons first. A shared cell
    /// such as `ИВАНОВА/ПЕТРОВ` is one hit, named after its first occupant.
    pub fn search_teachers_by_substring(&self, query: &str) -> Vec<TeacherHit> {
        let needle = normalize(query);
        if needle.is_empty() {
            return Vec::new();
        }
        let index = self.store.get();

        let mut hits: Vec<TeacherHit> = index
            .occupant_fields()
            .filter(|(key, _)| key.contains(needle.as_str()))
            .filter_map(|(_, entry)| {
                let sample = entry.lessons.first()?;
                let name = split_compound(&entry.display).first().map(|n| s!(*n))?;
                Some(TeacherHit {
                    name,
                    lesson_count: entry.lessons.len(),
                    sample_lesson: sample.clone(),
                    is_combined: is_compound(&entry.display),
                })
            })
            .collect();

        hits.sort_by(|a, b| b.lesson_count.cmp(&a.lesson_count).then_with(|| a.name.cmp(&b.name)));
        hits
    }

    pub fn find_room(&self, number: &str) -> Vec<DaySchedule> {
        let key = normalize(number);
        if key.is_empty() {
            return Vec::new();
        }
        group_by_day(self.store.get().room_lessons(&key))
    }

    pub fn available_classes(&self) -> Vec<String> {
        self.store.get().available_classes().to_vec()
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.store.get().segments().to_vec()
    }

    pub fn stats(&self) -> BuildStats {
        self.store.get().stats()
    }
}

/* ---------------- Helpers ---------------- */

/// Groups by `(day, shift)` in week order; lessons stable-sorted by start.
pub fn group_by_day(lessons: &[LessonRecord]) -> Vec<DaySchedule> {
    let mut by_day: BTreeMap<_, Vec<LessonRecord>> = BTreeMap::new();
    for rec in lessons {
        by_day.entry((rec.day, rec.shift)).or_default().push(rec.clone());
    }
    by_day
        .into_iter()
        .map(|((day, shift), mut lessons)| {
            lessons.sort_by_key(|l| l.time.sort_key());
            DaySchedule { day, shift, lessons }
        })
        .collect()
}

/// Drops repeats of the same lesson identity, keeping first occurrences.
fn dedup(lessons: &[LessonRecord]) -> Vec<LessonRecord> {
    let mut seen = HashSet::new();
    lessons.iter().filter(|l| seen.insert(l.key())).cloned().collect()
}
