use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{env, fs};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::debug;

pub const DEFAULT_LOG_FILE: &str = "my_log.txt";

pub trait Recorder {
    fn record(&self, message: &str);
}

/// Appends `[YYYY-MM-DD HH:MM:SS] message` entries, blank-line separated.
#[derive(Debug, Clone)]
pub struct FileRecorder {
    path: PathBuf,
}

impl FileRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_home(file_name: &str) -> Option<Self> {
        home_dir().map(|home| Self::new(home.join(file_name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open log: {}", self.path.display()))?;
        file.write_all(format_entry(now(), message)?.as_bytes())?;
        Ok(())
    }
}

impl Recorder for FileRecorder {
    fn record(&self, message: &str) {
        if let Err(err) = self.append(message) {
            debug!("{:#}", err);
        }
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn format_entry(at: OffsetDateTime, message: &str) -> Result<String> {
    let stamp = at.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))?;
    Ok(format!("[{}] {}\n\n", stamp, message))
}

fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    env::var_os(var)
        .map(PathBuf::from)
        .filter(|p| fs::metadata(p).map(|m| m.is_dir()).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn entry_format() {
        let line = format_entry(datetime!(2024-03-05 07:08:09 UTC), "opened https://x.y/z").unwrap();
        assert_eq!(line, "[2024-03-05 07:08:09] opened https://x.y/z\n\n");
    }

    #[test]
    fn appends_entries() {
        let dir = tempfile::tempdir().unwrap();
        let rec = FileRecorder::new(dir.path().join("log.txt"));
        rec.record("first");
        rec.record("second");
        let txt = fs::read_to_string(rec.path()).unwrap();
        let entries: Vec<&str> = txt.split_terminator("\n\n").collect();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].starts_with('[') && entries[0].ends_with("] first"));
        assert!(entries[1].ends_with("] second"));
        assert_eq!(entries[0].find(']'), Some(20));
    }

    #[test]
    fn unwritable_path_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let rec = FileRecorder::new(dir.path().join("missing").join("log.txt"));
        rec.record("dropped");
        assert!(!rec.path().exists());
    }
}
