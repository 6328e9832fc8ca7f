// src/log.rs
use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::Uptime;

use crate::config::options::LogOptions;
use crate::error::Result;

/// Installs the global subscriber. `RUST_LOG` overrides the configured
/// level. Calling it again is a no-op.
pub fn init(opts: &LogOptions) -> Result<()> {
    if let Some(parent) = opts.file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(&opts.file)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&opts.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(Uptime::default())
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init();

    tracing::debug!(file = %opts.file.display(), level = %opts.level, "logging started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_log_file_and_parent() {
        let dir = std::env::temp_dir().join(format!("schedule_log_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let opts = LogOptions { file: dir.join("nested").join("debug.log"), level: s!("debug") };
        init(&opts).unwrap();
        assert!(opts.file.exists());
        // second call keeps the first subscriber
        init(&opts).unwrap();
        let _ = fs::remove_dir_all(&dir);
    }
}
