// src/parse/locator.rs
use std::collections::HashSet;

use crate::core::class_key;
use crate::core::patterns::{grade_of, is_class_label};
use crate::grid::Grid;
use crate::model::Position;
use super::context::ContextResolver;

/// Every class-label cell in the grid, in row-major order. Repeated labels
/// stay separate: each occurrence heads its own lesson block.
pub fn locate(grid: &Grid, resolver: &ContextResolver) -> Vec<Position> {
    let mut out = Vec::new();
    for (row, cells) in grid.rows().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if !is_class_label(cell) { continue; }
            out.push(Position {
                row,
                col,
                label: cell.trim().to_string(),
                context: resolver.resolve(row),
            });
        }
    }
    out
}

/// Distinct class labels, ordered by grade number then text.
pub fn available_classes(grid: &Grid) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut classes: Vec<String> = grid
        .rows()
        .iter()
        .flatten()
        .map(|c| c.trim())
        .filter(|c| is_class_label(c) && seen.insert(class_key(c)))
        .map(String::from)
        .collect();
    classes.sort_by(|a, b| {
        let ga = grade_of(a).unwrap_or(u32::MAX);
        let gb = grade_of(b).unwrap_or(u32::MAX);
        ga.cmp(&gb).then_with(|| class_key(a).cmp(&class_key(b)))
    });
    classes
}
