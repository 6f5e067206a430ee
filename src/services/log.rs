use crate::error::{Result, ScaffoldError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

const LOG_FILE: &str = "activity.log";
const INFO_MARK: &str = "🟢";
const ERROR_MARK: &str = "🔴";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// What the event is about: a test URL, a script id, ...
    pub scope: Option<String>,
    pub event: String,
    pub details: Option<String>,
}

pub struct ActivityLogger {
    log_path: PathBuf,
}

impl ActivityLogger {
    /// Logger writing to `~/.scaffolded/activity.log`.
    pub fn new() -> Result<Self> {
        let user_dirs = directories::UserDirs::new().ok_or_else(|| {
            ScaffoldError::storage_error("initialization", "could not determine home directory")
        })?;
        Self::in_dir(&user_dirs.home_dir().join(".scaffolded"))
    }

    pub fn in_dir(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            log_path: dir.join(LOG_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn log(
        &self,
        level: LogLevel,
        scope: Option<&str>,
        event: &str,
        details: Option<&str>,
    ) -> Result<()> {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            scope: scope.map(|s| s.to_string()),
            event: event.to_string(),
            details: details.map(|d| d.to_string()),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        let level_str = match entry.level {
            LogLevel::Info => INFO_MARK,
            LogLevel::Error => ERROR_MARK,
        };

        let scope_str = entry.scope.as_deref().unwrap_or("*");
        // One entry per line, whatever the error text contains.
        let details_str = entry.details.as_deref().unwrap_or("").replace('\n', " ");

        writeln!(
            file,
            "{} {} {} {} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            level_str,
            entry.event,
            scope_str,
            details_str
        )?;

        Ok(())
    }

    /// Read entries newest first, optionally only errors and/or only lines mentioning `scope_filter`.
    pub fn read_logs(&self, scope_filter: Option<&str>, errors_only: bool) -> Result<Vec<String>> {
        if !self.log_path.exists() {
            return Ok(vec![]);
        }

        let file = fs::File::open(&self.log_path)?;
        let reader = BufReader::new(file);
        let mut matching_lines = Vec::new();

        for line in reader.lines() {
            let line = line?;

            if errors_only && !line.contains(ERROR_MARK) {
                continue;
            }

            if let Some(scope) = scope_filter {
                if !line.contains(scope) {
                    continue;
                }
            }

            matching_lines.push(line);
        }

        matching_lines.reverse();
        Ok(matching_lines)
    }

    pub fn info(&self, scope: Option<&str>, event: &str, details: Option<&str>) -> Result<()> {
        self.log(LogLevel::Info, scope, event, details)
    }

    pub fn error(&self, scope: Option<&str>, event: &str, details: Option<&str>) -> Result<()> {
        self.log(LogLevel::Error, scope, event, details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_reads_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ActivityLogger::in_dir(dir.path()).unwrap();

        logger.info(Some("https://a.example"), "run_translator", Some("succeeded in 3ms")).unwrap();
        logger.error(Some("https://b.example"), "test_case", Some("network error: refused")).unwrap();

        let lines = logger.read_logs(None, false).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("test_case"));
        assert!(lines[1].contains("run_translator"));
    }

    #[test]
    fn filters_errors_and_scope() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ActivityLogger::in_dir(dir.path()).unwrap();

        logger.info(Some("https://a.example"), "run_translator", None).unwrap();
        logger.error(Some("https://b.example"), "test_case", None).unwrap();
        logger.error(Some("https://a.example"), "test_case", None).unwrap();

        assert_eq!(logger.read_logs(None, true).unwrap().len(), 2);
        assert_eq!(logger.read_logs(Some("a.example"), false).unwrap().len(), 2);
        assert_eq!(logger.read_logs(Some("a.example"), true).unwrap().len(), 1);
    }

    #[test]
    fn multiline_details_stay_on_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ActivityLogger::in_dir(dir.path()).unwrap();
        logger.error(None, "test_translator", Some("first\nsecond")).unwrap();
        assert_eq!(logger.read_logs(None, false).unwrap().len(), 1);
    }

    #[test]
    fn missing_log_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ActivityLogger::in_dir(&dir.path().join("fresh")).unwrap();
        assert!(logger.read_logs(None, false).unwrap().is_empty());
    }
}
