// src/cli.rs
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;

use crate::config::Options;
use crate::config::consts::DEFAULT_CONFIG_FILE;
use crate::csv::write_row;
use crate::grid::CsvFile;
use crate::model::{DaySchedule, Segment};
use crate::query::{QueryService, TeacherHit};
use crate::render::{self, Format};

#[derive(Parser, Debug)]
#[command(name = "schedule", version, about = "Look up classes, teachers and rooms in an exported school timetable")]
pub struct Args {
    /// Grid CSV; overrides `source.grid_path` from the config
    #[arg(long, value_name = "FILE")]
    pub grid: Option<PathBuf>,

    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Log file; overrides `log.file` from the config
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Week schedule of a class, e.g. `5А`
    Class { name: String },
    /// Schedule of one teacher; falls back to the closest partial match
    Teacher { name: String },
    /// Teachers whose name contains the query
    Search { query: String },
    /// Lessons held in a room
    Room { number: String },
    /// All class labels in the grid
    Classes,
    /// Detected day/shift segments
    Segments,
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    let mut opts = Options::load(&args.config)
        .wrap_err_with(|| format!("Failed to read config {}", args.config.display()))?;
    if let Some(grid) = args.grid.clone() { opts.source.grid_path = grid; }
    if let Some(log) = args.log.clone() { opts.log.file = log; }

    crate::log::init(&opts.log).wrap_err("Failed to start logging")?;

    let service = QueryService::new(&opts);
    let source = CsvFile::new(&opts.source.grid_path);
    service
        .reload(&source)
        .wrap_err_with(|| format!("No schedule grid in {}", opts.source.grid_path.display()))?;

    let out = execute(&service, &args.command, args.format)?;
    print!("{out}");
    Ok(())
}

/// Runs one command against a loaded service and renders the result.
pub fn execute(service: &QueryService, command: &Command, format: Format) -> Result<String> {
    let out = match command {
        Command::Class { name } => {
            let groups = service.find_class(name);
            match format {
                Format::Text => render::class_text(name, &groups),
                _ => schedules(&groups, format)?,
            }
        }
        Command::Teacher { name } => {
            let result = service.find_teacher_exact(name);
            match format {
                Format::Text => render::teacher_text(name, result.as_ref()),
                Format::Json => json(&result)?,
                _ => schedules(result.as_ref().map(|r| r.groups.as_slice()).unwrap_or(&[]), format)?,
            }
        }
        Command::Search { query } => {
            let hits = service.search_teachers_by_substring(query);
            match format {
                Format::Text => render::search_text(query, &hits),
                Format::Json => json(&hits)?,
                _ => hits_delimited(&hits, format)?,
            }
        }
        Command::Room { number } => {
            let groups = service.find_room(number);
            match format {
                Format::Text => render::room_text(number, &groups),
                _ => schedules(&groups, format)?,
            }
        }
        Command::Classes => {
            let classes = service.available_classes();
            match format {
                Format::Json => json(&classes)?,
                _ => render::list_text(&classes),
            }
        }
        Command::Segments => {
            let segments = service.segments();
            match format {
                Format::Text => segments_text(&segments),
                Format::Json => json(&segments)?,
                _ => segments_delimited(&segments, format)?,
            }
        }
    };
    Ok(out)
}

/* ---------------- Helpers ---------------- */

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

fn schedules(groups: &[DaySchedule], format: Format) -> Result<String> {
    match format.delimiter() {
        Some(sep) => Ok(render::records_delimited(groups, sep)?),
        None => json(groups),
    }
}

fn hits_delimited(hits: &[TeacherHit], format: Format) -> Result<String> {
    let sep = format.delimiter().unwrap_or(',');
    let mut buf = Vec::new();
    write_row(&mut buf, &["name", "lessons", "combined", "occupants"][..], sep)?;
    for h in hits {
        let count = h.lesson_count.to_string();
        let combined = h.is_combined.to_string();
        write_row(&mut buf, &[
            h.name.as_str(),
            count.as_str(),
            combined.as_str(),
            h.sample_lesson.original_teacher_field.as_str(),
        ], sep)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn segments_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| format!("{}, {}: rows {}-{}\n", s.day, s.shift, s.start_row, s.end_row))
        .collect()
}

fn segments_delimited(segments: &[Segment], format: Format) -> Result<String> {
    let sep = format.delimiter().unwrap_or(',');
    let mut buf = Vec::new();
    write_row(&mut buf, &["day", "shift", "start_row", "end_row"][..], sep)?;
    for s in segments {
        let start = s.start_row.to_string();
        let end = s.end_row.to_string();
        write_row(&mut buf, &[s.day.title(), s.shift.title(), start.as_str(), end.as_str()], sep)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
