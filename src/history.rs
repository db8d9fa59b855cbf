//! Command history.
//!
//! Entries are numbered in the order they were entered and persisted as plain
//! text, one command per line, to `$HOME/.simple_shell_history`. At most
//! [`HISTORY_MAX`] entries are kept; the oldest are evicted first.

use crate::error::ShellError;
use crate::store::EntryList;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the history file inside `$HOME`.
pub const HISTORY_FILE: &str = ".simple_shell_history";
/// Maximum number of stored entries.
pub const HISTORY_MAX: usize = 4096;

/// History path for a given home directory.
pub fn history_path(home: &str) -> PathBuf {
    Path::new(home).join(HISTORY_FILE)
}

#[derive(Debug, Clone, Default)]
pub struct History {
    entries: EntryList,
    next_tag: usize,
    path: Option<PathBuf>,
}

impl History {
    /// Empty history, optionally bound to a file used by [`History::save`].
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            entries: EntryList::new(),
            next_tag: 0,
            path,
        }
    }

    /// Read history from `path`. A missing file yields an empty history.
    pub fn load(path: PathBuf) -> Result<Self, ShellError> {
        let mut history = Self::new(Some(path.clone()));
        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(history),
            Err(source) => return Err(ShellError::HistoryIo { path, source }),
        };
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| ShellError::HistoryIo {
                path: path.clone(),
                source,
            })?;
            if !line.is_empty() {
                history.entries.push(line, 0);
            }
        }
        history.entries.truncate_front(HISTORY_MAX);
        history.next_tag = history.entries.renumber();
        log::debug!("loaded {} history entries from {}", history.len(), path.display());
        Ok(history)
    }

    /// Append a line, evicting the oldest entry once the cap is exceeded.
    pub fn push(&mut self, line: &str) {
        self.entries.push(line, self.next_tag);
        self.next_tag += 1;
        if self.entries.len() > HISTORY_MAX {
            self.entries.truncate_front(HISTORY_MAX);
            self.next_tag = self.entries.renumber();
        }
    }

    /// Write all entries to the bound file. Without a file this is a no-op.
    pub fn save(&self) -> Result<(), ShellError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| ShellError::HistoryIo {
            path: path.clone(),
            source,
        };
        let file = fs::File::create(path).map_err(io_err)?;
        let mut out = BufWriter::new(file);
        for entry in &self.entries {
            writeln!(out, "{}", entry.text).map_err(io_err)?;
        }
        out.flush().map_err(io_err)?;
        log::debug!("saved {} history entries to {}", self.len(), path.display());
        Ok(())
    }

    /// `(number, line)` pairs, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(|e| (e.tag, e.text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
