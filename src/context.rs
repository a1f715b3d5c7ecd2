//! The long-lived context value:
//! everything the dispatcher and its helpers mutate across a session,
//! threaded through by reference rather than scattered across globals.

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::bookmarks::Bookmarks;
use crate::config::Config;
use crate::history::{CommandHistory, DirHistory};
use crate::jump::JumpDb;
use crate::logging::MessageLog;
use crate::platform::Fs;
use crate::scanner::Entry;
use crate::selection::Selection;
use crate::uservars::UserVars;
use crate::workspace::Workspaces;

/// File paths for one profile's persisted state (§6's filesystem layout).
#[derive(Debug, Clone)]
pub struct ProfilePaths {
    pub root: PathBuf,
}

impl ProfilePaths {
    pub fn new(profile: &str) -> Self {
        Self {
            root: Config::profile_dir(profile),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("fileman.cfg")
    }
    pub fn selection_file(&self) -> PathBuf {
        self.root.join("selbox")
    }
    pub fn jump_file(&self) -> PathBuf {
        self.root.join("jump.cfm")
    }
    pub fn bookmarks_file(&self) -> PathBuf {
        self.root.join("bookmarks.cfm")
    }
    pub fn command_history_file(&self) -> PathBuf {
        self.root.join("history.cfm")
    }
    pub fn dir_history_file(&self) -> PathBuf {
        self.root.join("dirhist.cfm")
    }
    pub fn last_visited_file(&self) -> PathBuf {
        self.root.join(".last")
    }
}

/// Everything a running session needs: profile identity, cursor state
/// (cwd, workspaces, pinned dir), mutable stores (selection, jump db,
/// bookmarks, histories, user variables), the active config, the last
/// scan, and the message log backing the `msg` verb and prompt indicator.
pub struct Context {
    pub profile: String,
    pub paths: ProfilePaths,
    pub cwd: PathBuf,
    pub home: Option<PathBuf>,
    pub config: Config,
    pub workspaces: Workspaces,
    pub selection: Selection,
    pub jump: JumpDb,
    pub bookmarks: Bookmarks,
    pub command_history: CommandHistory,
    pub dir_history: DirHistory,
    pub user_vars: UserVars,
    pub pinned: Option<String>,
    pub last_listing: Vec<Entry>,
    pub messages: MessageLog,
    pub exit_code: i32,
}

impl Context {
    /// Load every persisted store for `profile`, chdir-ing into the last
    /// workspace if one is bound, falling back to `fallback_dir`.
    pub fn load(fs: &dyn Fs, profile: &str, fallback_dir: &Path) -> Result<Self> {
        let paths = ProfilePaths::new(profile);
        let config = Config::load(&paths.config_file()).unwrap_or_default();
        let workspaces = Workspaces::load(fs, &paths.last_visited_file())
            .with_context(|| "failed to load workspaces")?;
        let selection = Selection::load(fs, &paths.selection_file())
            .with_context(|| "failed to load selection")?;
        let jump = JumpDb::load(fs, &paths.jump_file(), config.jump)
            .with_context(|| "failed to load jump database")?;
        let bookmarks = Bookmarks::load(fs, &paths.bookmarks_file())
            .with_context(|| "failed to load bookmarks")?;
        let command_history =
            CommandHistory::load(fs, &paths.command_history_file(), config.command_history_max)
                .with_context(|| "failed to load command history")?;
        let dir_history = DirHistory::load(fs, &paths.dir_history_file())
            .with_context(|| "failed to load directory history")?;

        let cwd = workspaces
            .current_path()
            .map(PathBuf::from)
            .filter(|p| fs.is_dir(p))
            .unwrap_or_else(|| fallback_dir.to_path_buf());

        Ok(Self {
            profile: profile.to_string(),
            paths,
            cwd,
            home: fs.home_dir(),
            messages: MessageLog::new(config.message_log_capacity),
            config,
            workspaces,
            selection,
            jump,
            bookmarks,
            command_history,
            dir_history,
            user_vars: UserVars::new(),
            pinned: None,
            last_listing: Vec::new(),
            exit_code: 0,
        })
    }

    /// Persist every file-backed store. Called at exit and on profile
    /// switch (§4.11: "frees all paths ... re-reads the config").
    pub fn save(&mut self, fs: &dyn Fs, now: i64) -> Result<()> {
        self.workspaces
            .save(fs, &self.paths.last_visited_file())
            .with_context(|| "failed to save workspaces")?;
        self.selection
            .save(fs, &self.paths.selection_file())
            .with_context(|| "failed to save selection")?;
        self.jump
            .save(fs, &self.paths.jump_file(), now)
            .with_context(|| "failed to save jump database")?;
        self.bookmarks
            .save(fs, &self.paths.bookmarks_file())
            .with_context(|| "failed to save bookmarks")?;
        self.command_history
            .save(fs, &self.paths.command_history_file())
            .with_context(|| "failed to save command history")?;
        self.dir_history
            .save(fs, &self.paths.dir_history_file())
            .with_context(|| "failed to save directory history")?;
        self.config
            .save(&self.paths.config_file())
            .with_context(|| "failed to save config")
    }

    /// Record a successful directory change by any means other than
    /// `back`/`forth`: updates cwd, dir history, jump visit counters, and
    /// the current workspace's bound path, keeping the jump db's
    /// in-workspace bonus flags in sync.
    pub fn navigate_to(&mut self, path: impl Into<String>, now: i64) {
        let path = path.into();
        self.dir_history.visit(&path);
        self.jump.visit(&path, now);
        self.workspaces.set_current_path(path.clone());
        for entry in self.jump_entry_paths() {
            let in_workspace = self.workspaces.contains(&entry);
            self.jump.mark_in_workspace(&entry, in_workspace);
        }
        self.cwd = PathBuf::from(path);
    }

    fn jump_entry_paths(&self) -> Vec<String> {
        self.jump.entries().iter().map(|e| e.path.clone()).collect()
    }

    /// `back`/`forth` move the dir-history cursor without recording a new
    /// jump visit or mutating the workspace binding beyond following the
    /// cursor (§3: these two moves don't mutate history).
    pub fn navigate_back(&mut self) -> bool {
        match self.dir_history.back() {
            Some(path) => {
                let path = path.to_string();
                self.workspaces.set_current_path(path.clone());
                self.cwd = PathBuf::from(path);
                true
            }
            None => false,
        }
    }

    pub fn navigate_forth(&mut self) -> bool {
        match self.dir_history.forth() {
            Some(path) => {
                let path = path.to_string();
                self.workspaces.set_current_path(path.clone());
                self.cwd = PathBuf::from(path);
                true
            }
            None => false,
        }
    }

    /// Switch to workspace `index`, inheriting the current path if
    /// unbound (`Workspaces::switch`), and record a visit for the
    /// resulting path as an ordinary navigation.
    pub fn switch_workspace(&mut self, index: usize, now: i64) -> Option<String> {
        let path = self.workspaces.switch(index)?;
        self.dir_history.visit(&path);
        self.jump.visit(&path, now);
        self.cwd = PathBuf::from(&path);
        Some(path)
    }
}
