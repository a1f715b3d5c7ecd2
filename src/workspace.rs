//! Workspaces (data model §3): four slots, each optionally bound to an
//! absolute directory, with one "current" at a time.

use anyhow::{Context, Result};
use std::path::Path;

use crate::platform::Fs;

/// Number of workspace slots.
pub const SLOT_COUNT: usize = 4;

pub struct Workspaces {
    slots: [Option<String>; SLOT_COUNT],
    current: usize,
}

impl Workspaces {
    /// All slots start unbound; slot 0 is current.
    pub fn new() -> Self {
        Self {
            slots: Default::default(),
            current: 0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_path(&self) -> Option<&str> {
        self.slots[self.current].as_deref()
    }

    pub fn slot_path(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|s| s.as_deref())
    }

    /// Bind the current workspace to `path`.
    pub fn set_current_path(&mut self, path: impl Into<String>) {
        self.slots[self.current] = Some(path.into());
    }

    /// Switch to `index`. An unbound target slot inherits the current
    /// workspace's path. Returns the resulting path, if any.
    pub fn switch(&mut self, index: usize) -> Option<String> {
        if index >= SLOT_COUNT {
            return self.current_path().map(str::to_string);
        }
        if self.slots[index].is_none() {
            self.slots[index] = self.slots[self.current].clone();
        }
        self.current = index;
        self.current_path().map(str::to_string)
    }

    /// True if `path` is bound to any slot (used to award the jump
    /// database's in-workspace rank bonus, §4.6).
    pub fn contains(&self, path: &str) -> bool {
        self.slots.iter().any(|s| s.as_deref() == Some(path))
    }

    /// Load the last-visited file (§6): one `[*]N:PATH` line per
    /// workspace, `*` marking the current one. A missing file leaves every
    /// slot unbound.
    pub fn load(fs: &dyn Fs, path: &Path) -> Result<Self> {
        let mut ws = Self::new();
        if !fs.exists(path) {
            return Ok(ws);
        }
        let contents = fs
            .read_to_string(path)
            .with_context(|| format!("failed to read last-visited file: {}", path.display()))?;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let is_current = line.starts_with('*');
            let rest = line.trim_start_matches('*');
            let Some((idx_str, dir)) = rest.split_once(':') else {
                continue;
            };
            let Ok(idx) = idx_str.parse::<usize>() else {
                continue;
            };
            if idx >= SLOT_COUNT || dir.is_empty() {
                continue;
            }
            ws.slots[idx] = Some(dir.to_string());
            if is_current {
                ws.current = idx;
            }
        }
        Ok(ws)
    }

    /// Persist the last-visited file.
    pub fn save(&self, fs: &dyn Fs, path: &Path) -> Result<()> {
        let mut contents = String::new();
        for (idx, slot) in self.slots.iter().enumerate() {
            let Some(dir) = slot else { continue };
            if idx == self.current {
                contents.push('*');
            }
            contents.push_str(&format!("{idx}:{dir}\n"));
        }
        fs.write(path, contents.as_bytes())
            .with_context(|| format!("failed to write last-visited file: {}", path.display()))
    }
}

impl Default for Workspaces {
    fn default() -> Self {
        Self::new()
    }
}
