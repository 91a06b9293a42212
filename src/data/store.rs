//! Schedule log discovery
//!
//! Walks a directory tree and loads every `*.csv` file as a team schedule log.

use crate::data::schedule::{LogId, ScheduleLog};
use crate::{Result, VolleyballError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Raw schedule logs keyed by file name
pub type LogMap = BTreeMap<String, ScheduleLog>;

/// A file that was found but not loaded
#[derive(Debug, Clone, Serialize)]
pub struct SkippedLog {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of loading a schedules directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// CSV files seen
    pub files: usize,
    /// Logs loaded into the map
    pub loaded: usize,
    /// Total rows across loaded logs
    pub rows: usize,
    pub skipped: Vec<SkippedLog>,
}

/// Loads schedule logs from a directory tree
pub struct LogStore {
    root: PathBuf,
}

impl LogStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        LogStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Paths of every CSV file under the root, in file-name order.
    ///
    /// Entries the walk cannot read are logged and left out.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(VolleyballError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("schedules directory not found: {}", self.root.display()),
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_csv(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Load every log. Files that cannot be read or parsed are skipped and reported.
    pub fn load(&self) -> Result<(LogMap, LoadReport)> {
        let mut logs = LogMap::new();
        let mut report = LoadReport::default();

        for path in self.discover()? {
            report.files += 1;
            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    log::warn!("Skipping non UTF-8 file name: {}", path.display());
                    report.skipped.push(SkippedLog {
                        path,
                        reason: "file name is not valid UTF-8".to_string(),
                    });
                    continue;
                }
            };

            match load_log(&path, &file_name) {
                Ok(log) => {
                    log::debug!("Loaded {} ({} rows)", file_name, log.len());
                    if logs.insert(file_name.clone(), log).is_some() {
                        log::warn!("Duplicate log name {}, keeping {}", file_name, path.display());
                    }
                }
                Err(VolleyballError::EmptyLog(_)) => {
                    log::warn!("{} is empty", file_name);
                    report.skipped.push(SkippedLog {
                        path,
                        reason: "empty file".to_string(),
                    });
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    report.skipped.push(SkippedLog {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.loaded = logs.len();
        report.rows = logs.values().map(ScheduleLog::len).sum();
        log::info!(
            "Loaded {} schedule logs ({} rows) from {}, skipped {}",
            report.loaded,
            report.rows,
            self.root.display(),
            report.skipped.len()
        );

        Ok((logs, report))
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "csv")
        .unwrap_or(false)
}

fn load_log(path: &Path, file_name: &str) -> Result<ScheduleLog> {
    let file = File::open(path)?;
    ScheduleLog::from_reader(LogId::from_file_name(file_name), file)
}
