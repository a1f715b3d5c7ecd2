//! Jump database: a frecency-ranked directory history.
//! Rank is recomputed at persistence time, never at query time — an
//! explicit decision preserved from the source design (see DESIGN.md).

use anyhow::{Context, Result};
use std::path::Path;

use crate::platform::Fs;

/// One entry in the jump database (data model §3).
#[derive(Debug, Clone)]
pub struct JumpEntry {
    pub path: String,
    pub visits: u64,
    pub first_visit: i64,
    pub last_visit: i64,
    pub rank: i64,
    /// Transient bonus flags, refreshed by the caller from current
    /// bookmark/pin/workspace state before each persistence pass.
    pub bookmarked: bool,
    pub pinned: bool,
    pub in_workspace: bool,
}

impl JumpEntry {
    /// True if any bonus flag is set — exempts the entry from the
    /// floor-based purge (the source's `keep_flag`, §3).
    pub fn keep(&self) -> bool {
        self.bookmarked || self.pinned || self.in_workspace
    }
}

#[derive(Debug, Clone, Copy)]
pub struct JumpConfig {
    pub ceiling: i64,
    pub floor: i64,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            ceiling: 100_000,
            floor: 10,
        }
    }
}

pub struct JumpDb {
    entries: Vec<JumpEntry>,
    config: JumpConfig,
}

const TRAILER_PREFIX: char = '@';

impl JumpDb {
    pub fn new(config: JumpConfig) -> Self {
        Self {
            entries: Vec::new(),
            config,
        }
    }

    pub fn load(fs: &dyn Fs, path: &Path, config: JumpConfig) -> Result<Self> {
        let mut db = Self::new(config);
        if !fs.exists(path) {
            return Ok(db);
        }
        let contents = fs
            .read_to_string(path)
            .with_context(|| format!("failed to read jump database: {}", path.display()))?;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(TRAILER_PREFIX) {
                continue;
            }
            if let Some(entry) = parse_line(line) {
                db.entries.push(entry);
            }
        }
        Ok(db)
    }

    pub fn save(&mut self, fs: &dyn Fs, path: &Path, now: i64) -> Result<()> {
        self.recompute_ranks(now);
        let total: i64 = self.entries.iter().map(|e| e.rank).sum();
        let mut contents = String::new();
        for entry in &self.entries {
            contents.push_str(&format!(
                "{}:{}:{}:{}\n",
                entry.visits, entry.first_visit, entry.last_visit, entry.path
            ));
        }
        contents.push_str(&format!("{TRAILER_PREFIX}{total}\n"));
        fs.write(path, contents.as_bytes())
            .with_context(|| format!("failed to write jump database: {}", path.display()))
    }

    /// Record a successful directory change: increments visits for an
    /// existing entry, or appends a fresh one.
    pub fn visit(&mut self, path: &str, now: i64) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.path == path) {
            entry.visits += 1;
            entry.last_visit = now;
        } else {
            self.entries.push(JumpEntry {
                path: path.to_string(),
                visits: 1,
                first_visit: now,
                last_visit: now,
                rank: 0,
                bookmarked: false,
                pinned: false,
                in_workspace: false,
            });
        }
    }

    pub fn mark_bookmarked(&mut self, path: &str, bookmarked: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.path == path) {
            entry.bookmarked = bookmarked;
        }
    }

    pub fn mark_pinned(&mut self, path: &str, pinned: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.path == path) {
            entry.pinned = pinned;
        }
    }

    pub fn mark_in_workspace(&mut self, path: &str, in_workspace: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.path == path) {
            entry.in_workspace = in_workspace;
        }
    }

    pub fn entries(&self) -> &[JumpEntry] {
        &self.entries
    }

    /// Recompute every entry's rank per the five-step formula (§4.6),
    /// applying the ceiling normalization and floor-based purge. Called
    /// automatically by `save`; exposed separately for testing.
    pub fn recompute_ranks(&mut self, now: i64) {
        for entry in &mut self.entries {
            entry.rank = persistence_rank(entry, now);
        }
        let total: i64 = self.entries.iter().map(|e| e.rank).sum();
        if total > self.config.ceiling {
            let divisor = (total as f64 / self.config.ceiling as f64) + 1.0;
            for entry in &mut self.entries {
                entry.rank = (entry.rank as f64 / divisor).round() as i64;
            }
        }
        let floor = self.config.floor;
        self.entries.retain(|e| e.keep() || e.rank >= floor);
    }

    /// Query-time rank for candidate selection: persisted rank plus the
    /// basename-match bonus, which only ever applies at query time (§4.6).
    pub fn query_rank(entry: &JumpEntry, query_matches_basename: bool) -> i64 {
        entry.rank + if query_matches_basename { 300 } else { 0 }
    }
}

fn persistence_rank(entry: &JumpEntry, now: i64) -> i64 {
    let days_since_first = ((now - entry.first_visit) / 86_400).max(0);
    let base = (entry.visits as i64 * 100) / days_since_first.max(1);

    let hours_since_last = (now - entry.last_visit) / 3_600;
    let multiplier = if hours_since_last <= 0 {
        4.0
    } else if hours_since_last <= 24 {
        2.0
    } else if hours_since_last <= 168 {
        0.5
    } else {
        0.25
    };

    let mut rank = (base as f64 * multiplier) as i64;
    if entry.bookmarked {
        rank += 300;
    }
    if entry.pinned {
        rank += 1000;
    }
    if entry.in_workspace {
        rank += 300;
    }
    rank
}

fn parse_line(line: &str) -> Option<JumpEntry> {
    let mut parts = line.splitn(4, ':');
    let visits = parts.next()?.parse().ok()?;
    let first_visit = parts.next()?.parse().ok()?;
    let last_visit = parts.next()?.parse().ok()?;
    let path = parts.next()?.to_string();
    if path.is_empty() {
        return None;
    }
    Some(JumpEntry {
        path,
        visits,
        first_visit,
        last_visit,
        rank: 0,
        bookmarked: false,
        pinned: false,
        in_workspace: false,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    Any,
    Ancestors,
    Descendants,
}

/// Select candidates matching every token (case sensitivity configurable),
/// narrowed by `scope` (ancestors-only for `jp`, descendants-only for
/// `jc`), excluding `current_dir`, ranked best-first.
pub fn query<'a>(
    entries: &'a [JumpEntry],
    tokens: &[String],
    current_dir: &str,
    case_sensitive: bool,
    scope: QueryScope,
) -> Vec<&'a JumpEntry> {
    let normalize = |s: &str| {
        if case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    };
    let basename = |p: &str| p.rsplit('/').next().unwrap_or(p).to_string();

    let mut candidates: Vec<&JumpEntry> = entries
        .iter()
        .filter(|e| e.path != current_dir)
        .filter(|e| match scope {
            QueryScope::Any => true,
            QueryScope::Ancestors => current_dir.starts_with(e.path.as_str()),
            QueryScope::Descendants => e.path.starts_with(current_dir),
        })
        .filter(|e| {
            let path = normalize(&e.path);
            tokens.iter().all(|tok| path.contains(&normalize(tok)))
        })
        .collect();

    candidates.sort_by(|a, b| {
        let a_basename_match = tokens
            .iter()
            .any(|t| normalize(&basename(&a.path)).contains(&normalize(t)));
        let b_basename_match = tokens
            .iter()
            .any(|t| normalize(&basename(&b.path)).contains(&normalize(t)));
        let a_rank = JumpDb::query_rank(a, a_basename_match);
        let b_rank = JumpDb::query_rank(b, b_basename_match);
        b_rank.cmp(&a_rank)
    });
    candidates
}
