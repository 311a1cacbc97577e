//! Request history kept for user recall.
//!
//! # Design
//! Entries deliberately carry no headers and no body so credentials never end
//! up on disk. The file is `{"history": [...]}`; a missing or damaged file is
//! treated as an empty history rather than a startup failure. Both load and
//! save keep only the newest `MAX_HISTORY_ITEMS` entries.
//!
//! The dispatcher does not depend on this module; the shell records an entry
//! after each successful exchange.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dispatch::Exchange;

pub const MAX_HISTORY_ITEMS: usize = 100;

const APP_DIR: &str = "nanoman";
const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("could not write history: {0}")]
    Io(#[from] io::Error),

    #[error("could not encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One past request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub method: String,
    pub url: String,
    pub status: u16,
    /// Seconds.
    pub elapsed: f64,
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
}

impl HistoryEntry {
    /// Record `exchange`, stamped with the current local time.
    pub fn from_exchange(method: &str, url: &str, exchange: &Exchange) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url: url.trim().to_string(),
            status: exchange.status,
            elapsed: exchange.elapsed_seconds(),
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
struct HistoryFile {
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

/// Bounded, oldest-first list of history entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `path`. Never fails: problems are logged and yield an empty
    /// history.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read history");
                return Self::new();
            }
        };

        match serde_json::from_str::<HistoryFile>(&raw) {
            Ok(file) => {
                let mut history = Self { entries: file.history };
                history.truncate();
                tracing::info!(count = history.len(), "loaded history");
                history
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not parse history");
                Self::new()
            }
        }
    }

    /// Truncate to the newest entries and write to `path`, creating parent
    /// directories as needed.
    pub fn save(&mut self, path: &Path) -> Result<(), HistoryError> {
        self.truncate();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = HistoryFile {
            history: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(path, json)?;
        tracing::info!(count = self.len(), path = %path.display(), "saved history");
        Ok(())
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        self.truncate();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn truncate(&mut self) {
        if self.entries.len() > MAX_HISTORY_ITEMS {
            let excess = self.entries.len() - MAX_HISTORY_ITEMS;
            self.entries.drain(..excess);
        }
    }
}

/// `<config dir>/nanoman/history.json`, when the platform has a config dir.
pub fn default_history_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(HISTORY_FILE))
}
