// src/parse/assembler.rs
//! Lesson blocks under one class label.
//!
//! Two block shapes occur in exports:
//! - time in column 1: subject on the row above, teacher on the time row,
//!   room on the row below (three rows per lesson);
//! - time in the class column itself: subject, teacher and room on the
//!   three rows that follow it.
//!
//! Reads never leave `[label row + 1, segment end]`.

use crate::config::ParseOptions;
use crate::core::patterns::find_duration;
use crate::grid::Grid;
use crate::model::{LessonDraft, Position, RawTimeRange};
use super::segmenter::is_class_header;

const TIME_COL: usize = 1;

pub fn assemble(grid: &Grid, pos: &Position, opts: &ParseOptions) -> Vec<LessonDraft> {
    let Some(seg) = pos.context else {
        tracing::debug!(label = %pos.label, row = pos.row, "label outside any segment, skipped");
        return Vec::new();
    };

    let first = pos.row + 1;
    let last = seg.end_row.min(pos.row + opts.lesson_scan_rows);
    let col = pos.col;
    let cell = |r: usize| if (first..=last).contains(&r) { grid.cell(r, col) } else { "" };

    let mut out = Vec::new();
    let mut i = first;
    while i <= last {
        if grid.is_blank(i) {
            i += 1;
            continue;
        }
        if i > pos.row + opts.label_grace_rows && is_class_header(grid, i) {
            break; // next class-header block
        }

        let (time, subject, occupant, room, step) = if let Some(t) = find_duration(grid.cell(i, col)) {
            (t, cell(i + 1), cell(i + 2), cell(i + 3), 4)
        } else if let Some(t) = find_duration(grid.cell(i, TIME_COL)) {
            (t, cell(i - 1), cell(i), cell(i + 1), 2)
        } else {
            i += 1;
            continue;
        };

        if !(subject.is_empty() && occupant.is_empty() && room.is_empty()) {
            out.push(LessonDraft {
                day: seg.day,
                shift: seg.shift,
                class: pos.label.clone(),
                time: RawTimeRange::new(time),
                subject: subject.to_string(),
                occupant_field: occupant.to_string(),
                room_field: room.to_string(),
                row: i,
            });
        }
        i += step;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MemoryGrid;
    use crate::model::{Day, Segment, Shift};
    use crate::parse::context::ContextResolver;
    use crate::parse::locator::locate;
    use crate::parse::segmenter::segment;

    fn grid(lines: &[&str]) -> Grid {
        Grid::from_source(&MemoryGrid::from_lines(lines)).unwrap()
    }

    fn drafts_for(g: &Grid, label: &str) -> Vec<LessonDraft> {
        let opts = ParseOptions::default();
        let resolver = ContextResolver::new(segment(g, &opts).segments);
        locate(g, &resolver)
            .iter()
            .filter(|p| p.label == label)
            .flat_map(|p| assemble(g, p, &opts))
            .collect()
    }

    #[test]
    fn own_column_time_layout() {
        let g = grid(&[
            "ПОНЕДЕЛЬНИК",
            "5А,5Б",
            "Время,Время",
            "8.00–8.45,8.00–8.45",
            "Математика,Физика",
            "Иванов,Петров",
            "101,102",
        ]);
        let d = drafts_for(&g, "5А");
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].time.as_str(), "8.00–8.45");
        assert_eq!(d[0].subject, "Математика");
        assert_eq!(d[0].occupant_field, "Иванов");
        assert_eq!(d[0].room_field, "101");
        assert_eq!((d[0].day, d[0].shift), (Day::Mon, Shift::First));

        let d = drafts_for(&g, "5Б");
        assert_eq!((d[0].subject.as_str(), d[0].occupant_field.as_str(), d[0].room_field.as_str()),
                   ("Физика", "Петров", "102"));
    }

    #[test]
    fn column_one_time_layout() {
        let g = grid(&[
            "ВТОРНИК",
            ",Время,5А,5Б",
            ",,Математика,Физика",
            "1,8.00–8.45,Иванов,Петров/Сидоров",
            ",,101,102/103",
            ",,Русский язык,",
            "2,8.55-9.40,Иванов,",
            ",,101,",
            ",,,Химия",
            "3,9:50-10:35,,Кузнецова",
            ",,,204",
        ]);
        let d = drafts_for(&g, "5А");
        let got: Vec<(&str, &str, &str, &str)> = d
            .iter()
            .map(|l| (l.time.as_str(), l.subject.as_str(), l.occupant_field.as_str(), l.room_field.as_str()))
            .collect();
        assert_eq!(got, vec![
            ("8.00–8.45", "Математика", "Иванов", "101"),
            ("8.55-9.40", "Русский язык", "Иванов", "101"),
        ]);

        let d = drafts_for(&g, "5Б");
        assert_eq!(d.len(), 2);
        assert_eq!(d[0].occupant_field, "Петров/Сидоров");
        assert_eq!(d[0].room_field, "102/103");
        assert_eq!((d[1].subject.as_str(), d[1].time.as_str()), ("Химия", "9:50-10:35"));
    }

    #[test]
    fn stops_at_next_class_header_block() {
        let g = grid(&[
            "СРЕДА",
            ",Время,5А",
            ",,Алгебра",
            "1,8.00–8.45,Иванов",
            ",,101",
            ",,6А",
            ",,Геометрия",
            "2,8.55–9.40,Петров",
            ",,202",
        ]);
        let d = drafts_for(&g, "5А");
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].subject, "Алгебра");

        let d = drafts_for(&g, "6А");
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].occupant_field, "Петров");
    }

    #[test]
    fn label_outside_segments_yields_nothing() {
        let g = grid(&["5А", "Математика", ",8.00–8.45", "101"]);
        let pos = Position { row: 0, col: 0, label: s!("5А"), context: None };
        assert!(assemble(&g, &pos, &ParseOptions::default()).is_empty());
    }

    #[test]
    fn reads_stay_inside_the_window() {
        // Time row directly under the label: the label row is not a subject.
        // Room row beyond the segment end is not read.
        let g = grid(&["5А", ",8.00–8.45", "Иванов-room"]);
        let seg = Segment { day: Day::Fri, shift: Shift::First, start_row: 0, end_row: 1 };
        let pos = Position { row: 0, col: 0, label: s!("5А"), context: Some(seg) };
        let d = assemble(&g, &pos, &ParseOptions::default());
        assert!(d.is_empty(), "nothing but the time cell is inside the window: {d:?}");

        let g = grid(&["5А", "Химия,8.00–8.45", "Иванов", "101"]);
        let seg = Segment { day: Day::Fri, shift: Shift::First, start_row: 0, end_row: 2 };
        let pos = Position { row: 0, col: 0, label: s!("5А"), context: Some(seg) };
        let d = assemble(&g, &pos, &ParseOptions::default());
        assert_eq!(d.len(), 1);
        assert_eq!((d[0].subject.as_str(), d[0].occupant_field.as_str(), d[0].room_field.as_str()),
                   ("", "Химия", "Иванов"));
        assert!(d.iter().all(|l| l.row > pos.row && l.row <= seg.end_row));
    }

    #[test]
    fn scan_is_bounded_past_the_label() {
        let mut lines = vec!["ЧЕТВЕРГ", ",Время,5А"];
        for _ in 0..30 {
            lines.extend([",,Урок", "1,8.00–8.45,Иванов", ",,101"]);
        }
        let g = grid(&lines);
        let mut opts = ParseOptions::default();
        opts.table_scan_rows = 200;
        let resolver = ContextResolver::new(segment(&g, &opts).segments);
        let pos = locate(&g, &resolver).remove(0);
        let d = assemble(&g, &pos, &opts);
        // Rows 2..=51 hold 50 rows: 16 full blocks plus a time row whose room
        // falls outside the window.
        assert_eq!(d.len(), 17);
        assert!(d.iter().all(|l| l.row <= pos.row + opts.lesson_scan_rows));
        assert_eq!(d[16].room_field, "");
    }
}
