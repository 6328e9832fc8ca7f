// src/parse/segmenter.rs
//! Day × shift segmentation of the grid.
//!
//! A small state machine walks the rows once:
//!
//! ```text
//! state            row kind        -> next state         cursor
//! ---------------  -------------      ------------------  -----------
//! ScanningDay      DayMarker(d)    -> InDayNoTable(d)     row + 1
//! ScanningDay      *               -> ScanningDay         row + 1
//! InDayNoTable     DayMarker(d')   -> InDayNoTable(d')    row + 1   (closes d)
//! InDayNoTable     TableStart      -> InTable             row
//! InDayNoTable     *               -> InDayNoTable        row + 1
//! InTable          (any)           -> InDayNoTable        end + 1   (emits segment)
//! ```
//!
//! `InTable` runs the bounded forward scan for the table end and emits one
//! [`Segment`]. The open day is flushed at end of input.

use crate::config::ParseOptions;
use crate::config::consts::DAY_BANNER_MAX_CELLS;
use crate::core::patterns::{day_in, has_table_token, is_class_label, shift_marker};
use crate::grid::Grid;
use crate::model::{Day, DayBlock, Segment, Shift};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    DayMarker(Day),
    TableStart,
    Blank,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    ScanningDay,
    InDayNoTable { day: Day },
    InTable { day: Day, table_row: usize },
}

/// Segmentation result: every day banner plus the flat, ordered segment list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    pub days: Vec<DayBlock>,
    pub segments: Vec<Segment>,
}

pub fn segment(grid: &Grid, opts: &ParseOptions) -> Layout {
    Segmenter::new(grid, opts).run()
}

/* ---------------- Row predicates ---------------- */

pub fn classify(grid: &Grid, row: usize) -> RowKind {
    if grid.is_blank(row) {
        return RowKind::Blank;
    }
    if let Some(day) = day_marker(grid, row) {
        return RowKind::DayMarker(day);
    }
    if is_table_start(grid, row) {
        return RowKind::TableStart;
    }
    RowKind::Other
}

fn day_marker(grid: &Grid, row: usize) -> Option<Day> {
    if grid.filled_cells(row) > DAY_BANNER_MAX_CELLS {
        return None;
    }
    grid.row(row).iter().find_map(|cell| day_in(cell))
}

/// `ВРЕМЯ`/`TIME` header with at least one delimiter in the row.
pub fn is_table_start(grid: &Grid, row: usize) -> bool {
    grid.row(row).len() > 1 && has_table_token(&grid.row_text(row))
}

/// A row carrying at least one class label.
pub fn is_class_header(grid: &Grid, row: usize) -> bool {
    grid.row(row).iter().any(|c| is_class_label(c))
}

/* ---------------- Machine ---------------- */

struct Segmenter<'g> {
    grid: &'g Grid,
    opts: &'g ParseOptions,
    state: State,
    days: Vec<DayBlock>,
    open: Option<DayBlock>,
    segments: Vec<Segment>,
    // First row a new table of the open day may claim.
    floor: usize,
}

impl<'g> Segmenter<'g> {
    fn new(grid: &'g Grid, opts: &'g ParseOptions) -> Self {
        Self {
            grid,
            opts,
            state: State::ScanningDay,
            days: Vec::new(),
            open: None,
            segments: Vec::new(),
            floor: 0,
        }
    }

    fn run(mut self) -> Layout {
        let mut row = 0;
        while row < self.grid.len() {
            let kind = classify(self.grid, row);
            let (next, next_row) = self.transition(kind, row);
            if next != self.state {
                tracing::trace!(row, ?kind, from = ?self.state, to = ?next, "segmenter transition");
            }
            self.state = next;
            row = next_row;
        }
        self.close_day();
        tracing::debug!(days = self.days.len(), segments = self.segments.len(), "grid segmented");
        Layout { days: self.days, segments: self.segments }
    }

    fn transition(&mut self, kind: RowKind, row: usize) -> (State, usize) {
        match (self.state, kind) {
            (State::InTable { day, table_row }, _) => {
                let seg = self.close_table(day, table_row);
                (State::InDayNoTable { day }, seg.end_row + 1)
            }
            (_, RowKind::DayMarker(day)) => {
                self.close_day();
                self.open_day(day, row);
                (State::InDayNoTable { day }, row + 1)
            }
            (State::ScanningDay, _) => (State::ScanningDay, row + 1),
            (State::InDayNoTable { day }, RowKind::TableStart) => {
                (State::InTable { day, table_row: row }, row)
            }
            (state @ State::InDayNoTable { .. }, _) => (state, row + 1),
        }
    }

    fn open_day(&mut self, day: Day, marker_row: usize) {
        self.open = Some(DayBlock { day, marker_row, segments: Vec::new() });
        self.floor = marker_row + 1;
    }

    fn close_day(&mut self) {
        if let Some(block) = self.open.take() {
            self.days.push(block);
        }
    }

    fn close_table(&mut self, day: Day, table_row: usize) -> Segment {
        let shift = self.shift_for(table_row);
        let start_row = self.table_origin(table_row, self.floor);
        let end_row = self.table_end(table_row);
        let seg = Segment { day, shift, start_row, end_row };
        tracing::debug!(?day, ?shift, start_row, end_row, "segment");

        self.segments.push(seg);
        if let Some(block) = self.open.as_mut() {
            block.segments.push(seg);
        }
        self.floor = end_row + 1;
        seg
    }

    /// Second shift when any of the preceding `shift_lookback_rows` rows
    /// carries a second-shift banner, first shift otherwise.
    fn shift_for(&self, table_row: usize) -> Shift {
        let lower = table_row.saturating_sub(self.opts.shift_lookback_rows);
        let second = (lower..table_row)
            .any(|r| matches!(shift_marker(&self.grid.row_text(r)), Some(Shift::Second)));
        if second { Shift::Second } else { Shift::First }
    }

    /// Back up over class-header rows directly above a table start, never
    /// below `floor`.
    fn table_origin(&self, table_row: usize, floor: usize) -> usize {
        let mut start = table_row;
        while start > floor
            && table_row - (start - 1) <= self.opts.header_backtrack_rows
            && is_class_header(self.grid, start - 1)
            && !is_table_start(self.grid, start - 1)
        {
            start -= 1;
        }
        start
    }

    /// A row that begins another table: a table start, or class-header rows
    /// leading straight into one.
    fn opens_table(&self, row: usize) -> bool {
        if is_table_start(self.grid, row) {
            return true;
        }
        let mut r = row;
        while is_class_header(self.grid, r) && r - row < self.opts.header_backtrack_rows {
            r += 1;
            if is_table_start(self.grid, r) {
                return true;
            }
        }
        false
    }

    fn table_end(&self, table_row: usize) -> usize {
        let n = self.grid.len();
        let last = (table_row + self.opts.table_scan_rows).min(n.saturating_sub(1));

        for j in table_row + 1..=last {
            match classify(self.grid, j) {
                RowKind::DayMarker(_) => return j - 1,
                RowKind::Blank => {
                    let next = j + 1;
                    if next < n
                        && (self.opens_table(next) || matches!(classify(self.grid, next), RowKind::DayMarker(_)))
                    {
                        return j - 1;
                    }
                }
                RowKind::TableStart if j > table_row + self.opts.min_table_gap_rows => {
                    return self.table_origin(j, table_row + 1) - 1;
                }
                _ => {}
            }
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MemoryGrid;
    use proptest::prelude::*;

    fn grid(lines: &[&str]) -> Grid {
        Grid::from_source(&MemoryGrid::from_lines(lines)).unwrap()
    }

    fn layout(lines: &[&str]) -> Layout {
        segment(&grid(lines), &ParseOptions::default())
    }

    #[test]
    fn header_row_above_time_row_joins_the_segment() {
        let l = layout(&[
            "ПОНЕДЕЛЬНИК",
            "5А,5Б",
            "Время,Время",
            "8.00–8.45,8.00–8.45",
            "Математика,Физика",
            "Иванов,Петров",
            "101,102",
        ]);
        assert_eq!(l.segments, vec![Segment { day: Day::Mon, shift: Shift::First, start_row: 1, end_row: 6 }]);
        assert_eq!(l.days.len(), 1);
        assert_eq!(l.days[0].marker_row, 0);
    }

    #[test]
    fn second_shift_banner_splits_the_day() {
        let l = layout(&[
            "ПОНЕДЕЛЬНИК",            // 0
            ",Время,5А,5Б",           // 1
            ",,Математика,Физика",    // 2
            "1,8.00–8.45,Иванов,Петров",
            ",,101,102",              // 4
            "",                       // 5
            "2 смена",                // 6
            ",Время,6А",              // 7
            ",,История",              // 8
            "1,13.00–13.45,Сидоров",  // 9
            ",,201",                  // 10
            "ВТОРНИК",                // 11
        ]);
        assert_eq!(l.segments.len(), 2);
        assert_eq!(l.segments[0], Segment { day: Day::Mon, shift: Shift::First, start_row: 1, end_row: 6 });
        assert_eq!(l.segments[1], Segment { day: Day::Mon, shift: Shift::Second, start_row: 7, end_row: 10 });
        assert_eq!(l.days.iter().map(|d| d.day).collect::<Vec<_>>(), vec![Day::Mon, Day::Tue]);
        assert!(l.days[1].segments.is_empty());
    }

    #[test]
    fn blank_row_before_next_table_closes_current_one() {
        let l = layout(&[
            "СРЕДА",
            ",Время,5А",
            ",,Химия",
            "",
            "5Б,6А",
            ",Время,x",
            ",,Литература",
        ]);
        assert_eq!(l.segments.len(), 2);
        assert_eq!(l.segments[0].end_row, 2);
        assert_eq!(l.segments[1].start_row, 4);
        assert_eq!(l.segments[1].end_row, 6);
    }

    #[test]
    fn days_without_tables_and_stray_tables() {
        let l = layout(&[
            ",Время,5А",    // before any day: ignored
            "ЧЕТВЕРГ",
            "ПЯТНИЦА",
            "просто текст",
            "СУББОТА",
            ",Время,7В",
            ",,Физкультура",
        ]);
        let days: Vec<(Day, usize)> = l.days.iter().map(|d| (d.day, d.segments.len())).collect();
        assert_eq!(days, vec![(Day::Thu, 0), (Day::Fri, 0), (Day::Sat, 1)]);
        assert_eq!(l.segments, vec![Segment { day: Day::Sat, shift: Shift::First, start_row: 5, end_row: 6 }]);
    }

    #[test]
    fn table_scan_is_bounded() {
        let mut lines = vec!["ВТОРНИК", ",Время,5А"];
        lines.extend(std::iter::repeat_n(",,урок", 150));
        let l = layout(&lines);
        assert_eq!(l.segments.len(), 1);
        assert_eq!(l.segments[0].start_row, 1);
        assert_eq!(l.segments[0].end_row, 101);
    }

    #[test]
    fn close_table_start_does_not_split() {
        // A repeated header within the gap belongs to the same table.
        let l = layout(&[
            "ПОНЕДЕЛЬНИК",
            ",Время,5А",
            ",,Химия",
            ",Время,5А",
            ",,Физика",
        ]);
        assert_eq!(l.segments.len(), 1);
        assert_eq!(l.segments[0].end_row, 4);
    }

    #[test]
    fn any_second_shift_banner_in_lookback_wins() {
        // A nearer first-shift note does not hide the banner.
        let l = layout(&[
            "ПОНЕДЕЛЬНИК",
            "2 смена",
            "примечание: 1 смена в 8.00",
            ",Время,5А",
            ",,Химия",
        ]);
        assert_eq!(l.segments[0].shift, Shift::Second);

        // The window reaches above the day banner.
        let l = layout(&["2 смена", "ПОНЕДЕЛЬНИК", ",Время,5А", ",,Химия"]);
        assert_eq!(l.segments[0].shift, Shift::Second);

        let l = layout(&["Понедельник 2 смена", ",Время,5А", ",,Химия"]);
        assert_eq!(l.segments[0].shift, Shift::Second);
    }

    #[test]
    fn second_shift_banner_beyond_lookback_is_ignored() {
        let mut lines = vec!["2 смена", "ПОНЕДЕЛЬНИК"];
        lines.extend(std::iter::repeat("").take(9));
        lines.extend([",Время,5А", ",,Химия"]);
        // banner sits 11 rows above the table start
        assert_eq!(layout(&lines).segments[0].shift, Shift::First);

        let l = layout(&["ПОНЕДЕЛЬНИК", "1 смена", ",Время,5А", ",,Химия"]);
        assert_eq!(l.segments[0].shift, Shift::First);
    }

    #[test]
    fn empty_grid() {
        assert_eq!(layout(&[]), Layout::default());
    }

    fn line_strategy() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "", "ПОНЕДЕЛЬНИК", "ВТОРНИК", ",Время,5А,5Б", "5А,5Б", "2 смена",
            ",,Математика,Физика", "1,8.00–8.45,Иванов,Петров", ",,101,102",
        ])
    }

    proptest! {
        #[test]
        fn segments_are_ordered_and_disjoint(lines in prop::collection::vec(line_strategy(), 0..120)) {
            let g = grid(&lines);
            let l = segment(&g, &ParseOptions::default());
            for s in &l.segments {
                prop_assert!(s.start_row <= s.end_row);
                prop_assert!(s.end_row < g.len());
            }
            for w in l.segments.windows(2) {
                prop_assert!(w[0].end_row < w[1].start_row);
            }
            let per_day: usize = l.days.iter().map(|d| d.segments.len()).sum();
            prop_assert_eq!(per_day, l.segments.len());
        }
    }
}
