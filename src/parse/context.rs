// src/parse/context.rs
use crate::model::Segment;

/// Row → enclosing segment lookup over an already computed segment list.
#[derive(Clone, Debug, Default)]
pub struct ContextResolver {
    segments: Vec<Segment>,
}

impl ContextResolver {
    /// `segments` must be disjoint; they are sorted here by start row.
    pub fn new(mut segments: Vec<Segment>) -> Self {
        segments.sort_by_key(|s| s.start_row);
        Self { segments }
    }

    /// `None` is the unknown context: the row lies outside every segment.
    pub fn resolve(&self, row: usize) -> Option<Segment> {
        let idx = self.segments.partition_point(|s| s.start_row <= row);
        let candidate = self.segments.get(idx.checked_sub(1)?)?;
        candidate.contains(row).then_some(*candidate)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
