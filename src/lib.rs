// src/lib.rs
//! Timetable reconstruction from exported school schedule grids.
//!
//! Load a grid into a [`QueryService`], then look up classes, teachers and
//! rooms. Parsing is tolerant and never fails; only I/O and empty sources
//! surface as [`ScheduleError`].

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod csv;
pub mod error;
pub mod grid;
pub mod index;
pub mod log;
pub mod model;
pub mod parse;
pub mod query;
pub mod render;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Result, ScheduleError};
pub use grid::{CsvFile, Grid, GridSource, MemoryGrid};
pub use model::{Day, DaySchedule, LessonRecord, Segment, Shift};
pub use query::{MatchType, QueryService, TeacherHit, TeacherResult};
pub use store::{Clock, ManualClock, ScheduleStore, SystemClock};
