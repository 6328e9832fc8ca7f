// src/grid.rs
//! The raw grid: ordered rows of ordered cell strings, and where it comes from.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::consts::GRID_SEP;
use crate::csv::parse_rows;
use crate::error::{Result, ScheduleError};

/// Supplies one grid snapshot per refresh.
pub trait GridSource {
    fn rows(&self) -> Result<Vec<Vec<String>>>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String {
        s!("grid")
    }
}

/// Rows already in memory (tests, or a fetcher that scraped them directly).
#[derive(Clone, Debug, Default)]
pub struct MemoryGrid {
    rows: Vec<Vec<String>>,
}

impl MemoryGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build from comma-joined lines, the way the exporter writes them.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let rows = lines
            .iter()
            .map(|l| {
                let l = l.as_ref();
                if l.is_empty() { Vec::new() } else { l.split(GRID_SEP).map(String::from).collect() }
            })
            .collect();
        Self { rows }
    }
}

impl GridSource for MemoryGrid {
    fn rows(&self) -> Result<Vec<Vec<String>>> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} rows)", self.rows.len())
    }
}

/// A CSV export of the schedule table on disk.
#[derive(Clone, Debug)]
pub struct CsvFile {
    path: PathBuf,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GridSource for CsvFile {
    fn rows(&self) -> Result<Vec<Vec<String>>> {
        if !self.path.exists() {
            return Err(ScheduleError::EmptySource(format!("{} not found", self.path.display())));
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(parse_rows(&text, GRID_SEP))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Immutable grid snapshot with tolerant cell access.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn from_source(source: &dyn GridSource) -> Result<Self> {
        source.rows().map(Self::new)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> &[String] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Trimmed cell text; out-of-range cells read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.row(row).get(col).map(|c| c.trim()).unwrap_or("")
    }

    /// A row with no visible text in any cell.
    pub fn is_blank(&self, row: usize) -> bool {
        self.row(row).iter().all(|c| c.trim().is_empty())
    }

    pub fn filled_cells(&self, row: usize) -> usize {
        self.row(row).iter().filter(|c| !c.trim().is_empty()).count()
    }

    /// The row as the exporter wrote it: cells joined by commas.
    pub fn row_text(&self, row: usize) -> String {
        self.row(row).join(",")
    }
}
