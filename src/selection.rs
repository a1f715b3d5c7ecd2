//! Selection store: an ordered, de-duplicated set of
//! absolute paths, persisted as a full-file replacement on every mutation.

use anyhow::{Context, Result};

use crate::platform::Fs;

/// One comment line written at the top of a freshly-created selection file.
const HEADER: &str = "# selected files\n";

/// Ordered, de-duplicated (by exact string equality) set of absolute paths.
pub struct Selection {
    paths: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    /// Load from `path`; a missing file is an empty selection, not an error.
    pub fn load(fs: &dyn Fs, path: &std::path::Path) -> Result<Self> {
        if !fs.exists(path) {
            return Ok(Self::new());
        }
        let contents = fs
            .read_to_string(path)
            .with_context(|| format!("failed to read selection file: {}", path.display()))?;
        let mut selection = Self::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            selection.add_one(line.to_string());
        }
        Ok(selection)
    }

    /// Persist to `path`. An empty selection removes the file instead of
    /// writing an empty one.
    pub fn save(&self, fs: &dyn Fs, path: &std::path::Path) -> Result<()> {
        if self.paths.is_empty() {
            if fs.exists(path) {
                fs.remove_file(path)
                    .with_context(|| format!("failed to remove selection file: {}", path.display()))?;
            }
            return Ok(());
        }
        let mut contents = String::from(HEADER);
        for path in &self.paths {
            contents.push_str(path);
            contents.push('\n');
        }
        fs.write(path, contents.as_bytes())
            .with_context(|| format!("failed to write selection file: {}", path.display()))
    }

    fn add_one(&mut self, path: String) -> bool {
        if !path.starts_with('/') {
            return false;
        }
        if self.paths.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    /// Add absolute paths to the selection, skipping any already present or
    /// relative. Returns the count actually added.
    pub fn add(&mut self, paths: impl IntoIterator<Item = String>) -> usize {
        paths.into_iter().filter(|p| self.add_one(p.clone())).count()
    }

    /// Remove by 1-based indices into `list()`'s order. Out-of-range indices
    /// are ignored.
    pub fn remove_indices(&mut self, indices: &[usize]) {
        let mut to_remove: Vec<usize> = indices
            .iter()
            .filter_map(|&i| i.checked_sub(1))
            .filter(|&i| i < self.paths.len())
            .collect();
        to_remove.sort_unstable();
        to_remove.dedup();
        for &idx in to_remove.iter().rev() {
            self.paths.remove(idx);
        }
    }

    pub fn remove_paths(&mut self, paths: &[String]) {
        self.paths.retain(|p| !paths.contains(p));
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn list(&self) -> &[String] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}
