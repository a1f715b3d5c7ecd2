//! Bookmarks store: a text-backed list of shortcut/name/path
//! triples, with several accepted on-load syntaxes.

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::platform::Fs;

/// `{shortcut?, name?, path}` with at least `path` present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub shortcut: Option<String>,
    pub name: Option<String>,
    pub path: String,
}

pub struct Bookmarks {
    entries: Vec<Bookmark>,
}

impl Bookmarks {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn load(fs: &dyn Fs, path: &Path) -> Result<Self> {
        let mut store = Self::new();
        if !fs.exists(path) {
            return Ok(store);
        }
        let contents = fs
            .read_to_string(path)
            .with_context(|| format!("failed to read bookmarks file: {}", path.display()))?;
        for line in contents.lines() {
            if let Some(bookmark) = parse_line(line) {
                store.entries.push(bookmark);
            }
        }
        Ok(store)
    }

    pub fn save(&self, fs: &dyn Fs, path: &Path) -> Result<()> {
        let mut contents = String::new();
        for bookmark in &self.entries {
            contents.push_str(&format_line(bookmark));
            contents.push('\n');
        }
        fs.write(path, contents.as_bytes())
            .with_context(|| format!("failed to write bookmarks file: {}", path.display()))
    }

    pub fn entries(&self) -> &[Bookmark] {
        &self.entries
    }

    /// Add a bookmark; fails if its shortcut or name collides with an
    /// existing one (both must be unique across the store when present).
    pub fn add(&mut self, bookmark: Bookmark) -> Result<()> {
        if let Some(sc) = &bookmark.shortcut
            && self.entries.iter().any(|b| b.shortcut.as_deref() == Some(sc))
        {
            bail!("shortcut already bookmarked: {sc}");
        }
        if let Some(name) = &bookmark.name
            && self.entries.iter().any(|b| b.name.as_deref() == Some(name))
        {
            bail!("name already bookmarked: {name}");
        }
        self.entries.push(bookmark);
        Ok(())
    }

    /// Delete by shortcut, name, or exact path. Returns true if something
    /// was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|b| {
            b.shortcut.as_deref() != Some(key)
                && b.name.as_deref() != Some(key)
                && b.path != key
        });
        self.entries.len() != before
    }

    /// Resolve a user's opener-menu response (ELN, name, or shortcut) to a
    /// path.
    pub fn resolve(&self, response: &str) -> Option<&str> {
        if let Ok(eln) = response.parse::<usize>()
            && eln >= 1
            && eln <= self.entries.len()
        {
            return Some(&self.entries[eln - 1].path);
        }
        self.entries
            .iter()
            .find(|b| b.name.as_deref() == Some(response) || b.shortcut.as_deref() == Some(response))
            .map(|b| b.path.as_str())
    }
}

impl Default for Bookmarks {
    fn default() -> Self {
        Self::new()
    }
}

/// Accepts `[SC]NAME:PATH`, `NAME:PATH`, `[SC]PATH`, and bare `/PATH`.
/// Lines starting with `#`, empty lines, and lines without any `/` are
/// ignored.
fn parse_line(line: &str) -> Option<Bookmark> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || !line.contains('/') {
        return None;
    }

    let (shortcut, rest) = if let Some(stripped) = line.strip_prefix('[') {
        let (sc, rest) = stripped.split_once(']')?;
        (Some(sc.to_string()), rest)
    } else {
        (None, line)
    };

    if let Some((name, path)) = rest.split_once(':') {
        if path.contains('/') {
            return Some(Bookmark {
                shortcut,
                name: Some(name.to_string()),
                path: path.to_string(),
            });
        }
    }

    if rest.contains('/') {
        return Some(Bookmark {
            shortcut,
            name: None,
            path: rest.to_string(),
        });
    }
    None
}

fn format_line(bookmark: &Bookmark) -> String {
    let mut out = String::new();
    if let Some(sc) = &bookmark.shortcut {
        out.push('[');
        out.push_str(sc);
        out.push(']');
    }
    if let Some(name) = &bookmark.name {
        out.push_str(name);
        out.push(':');
    }
    out.push_str(&bookmark.path);
    out
}
