// src/parse/mod.rs
//! # Grid parsing
//!
//! Turns the exported schedule grid (rows of plain cell strings, no schema)
//! into [`LessonRecord`]s.
//!
//! ## Pipeline
//! ```text
//! Grid → segmenter (day × shift segments)
//!      → context (row → segment)
//!      → locator (class-label positions)
//!      → assembler (lesson drafts per position)
//!      → expander (one record per teacher)
//! ```
//!
//! ## Conventions & invariants
//! - Everything here is **tolerant**: unreadable structure degrades to fewer
//!   lessons, never to an error.
//! - Segments are disjoint and ordered; the assembler never reads outside the
//!   segment of its label.
//! - Markers and patterns live in `config::consts` / `core::patterns`; they
//!   are the contract with whoever exports the grid.
//! - Nothing below the assembler sees raw rows again.
//!
//! Caching and lookup live in `index` and `query`.

pub mod assembler;
pub mod context;
pub mod expander;
pub mod locator;
pub mod segmenter;

use crate::config::ParseOptions;
use crate::grid::Grid;
use crate::model::{LessonRecord, Position};

pub use context::ContextResolver;
pub use segmenter::Layout;

/// Everything derived from one grid snapshot.
#[derive(Clone, Debug, Default)]
pub struct ParsedGrid {
    pub layout: Layout,
    pub positions: Vec<Position>,
    /// Records grouped per draft, in position order.
    pub lessons: Vec<Vec<LessonRecord>>,
    pub ambiguous_expansions: usize,
}

pub fn parse_grid(grid: &Grid, opts: &ParseOptions) -> ParsedGrid {
    let layout = segmenter::segment(grid, opts);
    let resolver = ContextResolver::new(layout.segments.clone());
    let positions = locator::locate(grid, &resolver);

    let mut lessons = Vec::new();
    let mut ambiguous_expansions = 0;
    for pos in &positions {
        for draft in assembler::assemble(grid, pos, opts) {
            let expansion = expander::expand(&draft);
            if expansion.ambiguous {
                ambiguous_expansions += 1;
            }
            lessons.push(expansion.records);
        }
    }

    tracing::debug!(
        positions = positions.len(),
        lessons = lessons.len(),
        ambiguous_expansions,
        "grid parsed"
    );
    ParsedGrid { layout, positions, lessons, ambiguous_expansions }
}
