// src/store.rs
//! Holds the current grid and a lazily rebuilt [`ScheduleIndex`] over it.
//!
//! Readers get an `Arc` snapshot and never block each other. A snapshot goes
//! stale when its TTL elapses or the store is invalidated; the next reader
//! rebuilds it. Rebuilds are single-flight: concurrent readers of a stale
//! store wait for one build instead of starting their own.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

use crate::config::ParseOptions;
use crate::grid::Grid;
use crate::index::ScheduleIndex;

/* ---------------- Clocks ---------------- */

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant { Instant::now() }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset_ms: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { base: Instant::now(), offset_ms: AtomicU64::new(0) }
    }

    pub fn advance(&self, by: Duration) {
        let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.offset_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self { Self::new() }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant { (**self).now() }
}

/* ---------------- Store ---------------- */

struct Slot {
    index: Arc<ScheduleIndex>,
    generation: u64,
}

pub struct ScheduleStore<C: Clock = SystemClock> {
    grid: RwLock<Arc<Grid>>,
    current: RwLock<Option<Slot>>,
    generation: AtomicU64,
    builds: AtomicU64,
    rebuild: Mutex<()>,
    ttl: Duration,
    opts: ParseOptions,
    clock: C,
}

impl ScheduleStore<SystemClock> {
    pub fn new(opts: ParseOptions, ttl: Duration) -> Self {
        Self::with_clock(opts, ttl, SystemClock)
    }
}

impl<C: Clock> ScheduleStore<C> {
    pub fn with_clock(opts: ParseOptions, ttl: Duration, clock: C) -> Self {
        Self {
            grid: RwLock::new(Arc::new(Grid::default())),
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
            builds: AtomicU64::new(0),
            rebuild: Mutex::new(()),
            ttl,
            opts,
            clock,
        }
    }

    /// Current snapshot, rebuilt first if stale.
    pub fn get(&self) -> Arc<ScheduleIndex> {
        if let Some(index) = self.fresh() {
            return index;
        }

        let _guard = self.rebuild.lock();
        // Another reader may have finished the build while we waited.
        if let Some(index) = self.fresh() {
            return index;
        }

        // Generation before grid: a replace in between leaves this build stale.
        let generation = self.generation.load(Ordering::Acquire);
        let grid = self.grid.read().clone();
        let build_seq = self.builds.fetch_add(1, Ordering::AcqRel) + 1;
        let index = Arc::new(ScheduleIndex::build(&grid, &self.opts, self.clock.now(), build_seq));

        *self.current.write() = Some(Slot { index: Arc::clone(&index), generation });
        index
    }

    /// Marks the snapshot stale. Readers keep the one they already hold.
    pub fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(generation, "schedule index invalidated");
    }

    /// Swaps in a new grid and invalidates.
    pub fn replace_grid(&self, grid: Grid) {
        *self.grid.write() = Arc::new(grid);
        self.invalidate();
    }

    pub fn grid(&self) -> Arc<Grid> {
        self.grid.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        !self.grid.read().is_empty()
    }

    /// Number of index builds so far.
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::Acquire)
    }

    pub fn ttl(&self) -> Duration { self.ttl }

    fn fresh(&self) -> Option<Arc<ScheduleIndex>> {
        let current = self.current.read();
        let slot = current.as_ref()?;
        if slot.generation != self.generation.load(Ordering::Acquire) {
            return None;
        }
        let age = self.clock.now().saturating_duration_since(slot.index.built_at());
        (age <= self.ttl).then(|| Arc::clone(&slot.index))
    }
}
