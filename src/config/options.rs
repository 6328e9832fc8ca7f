// src/config/options.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::consts::*;
use crate::error::ScheduleError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    pub source: SourceOptions,
    pub cache: CacheOptions,
    pub parse: ParseOptions,
    pub log: LogOptions,
}

impl Options {
    /// Read options from a TOML file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ScheduleError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ScheduleError> {
        toml::from_str(text).map_err(|e| ScheduleError::Config(e.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceOptions {
    pub grid_path: PathBuf,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self { grid_path: PathBuf::from(DEFAULT_GRID_FILE) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    pub ttl_secs: u64,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { ttl_secs: CACHE_TTL_SECS }
    }
}

impl CacheOptions {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Scan bounds used by the segmenter and the lesson assembler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Rows scanned past a table start while looking for its end.
    pub table_scan_rows: usize,
    /// Rows above a table start searched for a shift banner.
    pub shift_lookback_rows: usize,
    /// A second table start closes the current table only beyond this distance.
    pub min_table_gap_rows: usize,
    /// Class-header rows above a table start that still belong to it.
    pub header_backtrack_rows: usize,
    /// Rows scanned past a class label while assembling lessons.
    pub lesson_scan_rows: usize,
    /// Rows after a class label in which other labels do not end assembly.
    pub label_grace_rows: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            table_scan_rows: TABLE_SCAN_ROWS,
            shift_lookback_rows: SHIFT_LOOKBACK_ROWS,
            min_table_gap_rows: MIN_TABLE_GAP_ROWS,
            header_backtrack_rows: HEADER_BACKTRACK_ROWS,
            lesson_scan_rows: LESSON_SCAN_ROWS,
            label_grace_rows: LABEL_GRACE_ROWS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    pub file: PathBuf,
    /// Fallback filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            file: PathBuf::from(STORE_DIR).join(LOG_FILE),
            level: s!("info"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let text = r#"
            [cache]
            ttl_secs = 30

            [parse]
            lesson_scan_rows = 20
        "#;
        let opts = Options::from_toml(text).unwrap();
        assert_eq!(opts.cache.ttl(), Duration::from_secs(30));
        assert_eq!(opts.parse.lesson_scan_rows, 20);
        assert_eq!(opts.parse.table_scan_rows, TABLE_SCAN_ROWS);
        assert_eq!(opts.source.grid_path, PathBuf::from(DEFAULT_GRID_FILE));
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        let err = Options::from_toml("[cache]\nttl_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ScheduleError::Config(_)));
    }

    #[test]
    fn missing_file_means_defaults() {
        let opts = Options::load(Path::new("definitely/not/here.toml")).unwrap();
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn defaults_come_from_each_section() {
        let opts = Options::default();
        assert_eq!(opts, Options::from_toml("").unwrap());
        assert_eq!(opts.cache.ttl(), Duration::from_secs(CACHE_TTL_SECS));
        assert_eq!(opts.parse.shift_lookback_rows, SHIFT_LOOKBACK_ROWS);
        assert_eq!(opts.log.level, "info");
        assert_eq!(opts.source.grid_path, PathBuf::from(DEFAULT_GRID_FILE));
    }
}
