//! Command history (data model §3) and directory history with a cursor,
//! both bounded ordered lists of strings with slightly different mutation
//! rules.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::path::Path;

use crate::platform::Fs;

/// Bounded command history (one line per entry).
pub struct CommandHistory {
    max_len: usize,
    lines: VecDeque<String>,
}

impl CommandHistory {
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len: max_len.max(1),
            lines: VecDeque::new(),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.max_len {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Load the command-history file (one line per entry, oldest first).
    /// A missing file loads as empty.
    pub fn load(fs: &dyn Fs, path: &Path, max_len: usize) -> Result<Self> {
        let mut hist = Self::new(max_len);
        if !fs.exists(path) {
            return Ok(hist);
        }
        let contents = fs
            .read_to_string(path)
            .with_context(|| format!("failed to read command history: {}", path.display()))?;
        for line in contents.lines() {
            if !line.is_empty() {
                hist.push(line.to_string());
            }
        }
        Ok(hist)
    }

    pub fn save(&self, fs: &dyn Fs, path: &Path) -> Result<()> {
        let mut contents = String::new();
        for line in self.lines() {
            contents.push_str(line);
            contents.push('\n');
        }
        fs.write(path, contents.as_bytes())
            .with_context(|| format!("failed to write command history: {}", path.display()))
    }
}

/// Directory history: an ordered list of absolute paths with a cursor.
/// `back`/`forth` move the cursor without mutating the list; any other
/// navigation truncates everything after the cursor and appends (§3).
pub struct DirHistory {
    paths: Vec<String>,
    cursor: usize,
}

impl DirHistory {
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            cursor: 0,
        }
    }

    /// Record a directory change by any means other than `back`/`forth`.
    /// Duplicate-consecutive entries are suppressed.
    pub fn visit(&mut self, path: impl Into<String>) {
        let path = path.into();
        if self.paths.get(self.cursor).map(String::as_str) == Some(path.as_str()) {
            return;
        }
        self.paths.truncate(self.cursor + 1);
        self.paths.push(path);
        self.cursor = self.paths.len() - 1;
    }

    pub fn back(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.paths.get(self.cursor).map(String::as_str)
    }

    pub fn forth(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.paths.len() {
            return None;
        }
        self.cursor += 1;
        self.paths.get(self.cursor).map(String::as_str)
    }

    pub fn current(&self) -> Option<&str> {
        self.paths.get(self.cursor).map(String::as_str)
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Load the directory history file (one absolute path per line). The
    /// cursor starts at the last entry. A missing file loads as empty.
    pub fn load(fs: &dyn Fs, path: &Path) -> Result<Self> {
        let mut hist = Self::new();
        if !fs.exists(path) {
            return Ok(hist);
        }
        let contents = fs
            .read_to_string(path)
            .with_context(|| format!("failed to read directory history: {}", path.display()))?;
        for line in contents.lines() {
            if !line.is_empty() {
                hist.paths.push(line.to_string());
            }
        }
        hist.cursor = hist.paths.len().saturating_sub(1);
        Ok(hist)
    }

    pub fn save(&self, fs: &dyn Fs, path: &Path) -> Result<()> {
        let mut contents = String::new();
        for p in &self.paths {
            contents.push_str(p);
            contents.push('\n');
        }
        fs.write(path, contents.as_bytes())
            .with_context(|| format!("failed to write directory history: {}", path.display()))
    }
}

impl Default for DirHistory {
    fn default() -> Self {
        Self::new()
    }
}
