//! Abstracted external dependencies for testability.
//!
//! Every side effect the core performs — filesystem access, spawning
//! children, reading a line of input, prompting interactively, probing a
//! MIME type, and locking a persisted file against concurrent instances —
//! goes through a trait here. Production wires the `Real*` implementations;
//! tests substitute `Fake*` ones via generics, no trait objects needed.

pub mod job;
mod real_archiver;
mod real_fs;
mod real_line_editor;
mod real_locker;
mod real_mime;
mod real_prompt;
mod real_shell;
mod real_trash;

pub use real_archiver::RealArchiver;
pub use real_fs::{RealFs, has_capabilities};
pub use real_line_editor::RealLineEditor;
pub use real_locker::RealLocker;
pub use real_mime::RealMimeProber;
pub use real_prompt::RealPrompter;
pub use real_shell::RealShell;
pub use real_trash::RealTrash;

#[cfg(test)]
mod fake_archiver;
#[cfg(test)]
mod fake_fs;
#[cfg(test)]
mod fake_line_editor;
#[cfg(test)]
mod fake_locker;
#[cfg(test)]
mod fake_mime;
#[cfg(test)]
mod fake_prompt;
#[cfg(test)]
mod fake_shell;
#[cfg(test)]
mod fake_trash;

#[cfg(test)]
pub use fake_archiver::FakeArchiver;
#[cfg(test)]
pub use fake_fs::FakeFs;
#[cfg(test)]
pub use fake_line_editor::FakeLineEditor;
#[cfg(test)]
pub use fake_locker::FakeLocker;
#[cfg(test)]
pub use fake_mime::FakeMimeProber;
#[cfg(test)]
pub use fake_prompt::FakePrompter;
#[cfg(test)]
pub use fake_shell::FakeShell;
#[cfg(test)]
pub use fake_trash::FakeTrash;

use anyhow::Result;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

/// File-type classification learned from a single scan pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Dir,
    Regular,
    Symlink { resolves_to_dir: bool },
    Socket,
    Fifo,
    Block,
    Char,
    Unknown,
}

impl Kind {
    /// True for directories and symlinks that resolve to a directory —
    /// the predicate `list_folders_first` sorts on.
    pub fn is_dir_like(self) -> bool {
        matches!(self, Kind::Dir | Kind::Symlink { resolves_to_dir: true })
    }
}

/// Raw per-entry metadata the scanner needs, independent of `Kind`.
#[derive(Debug, Clone)]
pub struct RawStat {
    pub kind: Kind,
    pub inode: u64,
    pub nlink: u64,
    pub size: u64,
    pub uid: u32,
    pub gid: u32,
    pub mode: u32,
    pub atime: i64,
    pub btime: Option<i64>,
    pub ctime: i64,
    pub mtime: i64,
}

/// Abstraction over all filesystem operations the core performs.
pub trait Fs {
    /// List the immediate (non-recursive) children of a directory, excluding
    /// `.` and `..`. Each returned name is joined with `dir` by the caller.
    fn read_dir(&self, dir: &Path) -> Result<Vec<String>>;

    /// `lstat`-like metadata for a single path (does not follow a trailing
    /// symlink for classification, but resolves one level to learn whether a
    /// symlink points at a directory).
    fn lstat(&self, path: &Path) -> Result<RawStat>;

    /// Count entries in a directory excluding `.`/`..`. `Err` means
    /// permission denied (caller maps to child_count == -1).
    fn count_children(&self, dir: &Path) -> Result<usize>;

    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn symlink(&self, original: &Path, link: &Path) -> Result<()>;
    fn read_link(&self, path: &Path) -> Result<PathBuf>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    fn home_dir(&self) -> Option<PathBuf>;
    fn config_dir(&self) -> Option<PathBuf>;
    fn data_dir(&self) -> Option<PathBuf>;

    /// Current executable search path (`$PATH`), split into directories.
    fn path_dirs(&self) -> Vec<PathBuf>;
    /// Whether `path` names an executable regular file.
    fn is_executable(&self, path: &Path) -> bool;
    /// Flip the owner/group/other execute bits on (`on = true`) or off.
    fn set_executable(&self, path: &Path, on: bool) -> Result<()>;
    fn env_var(&self, name: &str) -> Option<String>;

    /// Expand a wildcard pattern (`*`, `?`, `[...]`, no braces — those are
    /// expanded by the caller) against the filesystem, returning every
    /// match as an absolute path. A relative `pattern` resolves against
    /// `cwd`, never the process's actual OS working directory, so wildcard
    /// expansion follows the session wherever it has `cd`'d to.
    fn glob(&self, cwd: &Path, pattern: &str) -> Vec<PathBuf>;
}

// ---------------------------------------------------------------------------
// Shell / child processes
// ---------------------------------------------------------------------------

/// Outcome of running an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnOutcome {
    Exited(i32),
    Signaled,
}

/// Abstraction over spawning external commands. The real implementation
/// performs the signal-disposition and process-group dance described in the
/// concurrency model (see `platform::job`); the fake implementation records
/// invocations only, so tests never fork.
pub trait Shell {
    /// Run a shell command line, waiting for it to finish (foreground).
    fn run_foreground(&self, command: &str, cwd: &Path) -> Result<SpawnOutcome>;

    /// Run a shell command line without waiting (background, `&` suffix).
    fn run_background(&self, command: &str, cwd: &Path) -> Result<()>;

    /// Run a command and capture stdout as a string, used for command
    /// substitution (`$(...)`, `` `...` ``).
    fn capture(&self, command: &str, cwd: &Path) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Prompter
// ---------------------------------------------------------------------------

/// Abstraction over interactive user prompts (opener menu, ambiguous-app
/// confirmation, profile picker).
pub trait Prompter {
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

// ---------------------------------------------------------------------------
// Line editor
// ---------------------------------------------------------------------------

/// Narrow line-editor seam (design note §9): the core is agnostic to the
/// underlying readline implementation.
pub trait LineEditor {
    fn read_line(&mut self, prompt: &str) -> Option<String>;
    fn add_history(&mut self, line: &str);
}

// ---------------------------------------------------------------------------
// MIME probing
// ---------------------------------------------------------------------------

/// Abstraction over MIME-type probing (`file --brief --mime-type` in
/// production).
pub trait MimeProber {
    fn probe(&self, path: &Path) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Process lock
// ---------------------------------------------------------------------------

/// Abstraction over process-level file locking, used to guard the
/// full-file-replacement writes to selection/jump/bookmark files against
/// concurrent instances of the program.
pub trait Locker {
    fn try_lock(&mut self) -> Result<bool>;
    fn unlock(&mut self) -> Result<()>;
    fn lock_path(&self) -> &Path;
    /// PID of the process currently holding the lock, if known. Only
    /// meaningful to call after `try_lock` returned `false`.
    fn read_lock_owner(&self) -> Result<Option<i32>>;
}

// ---------------------------------------------------------------------------
// Trash
// ---------------------------------------------------------------------------

/// One entry in the trash can, as reported by `list()`.
#[derive(Debug, Clone)]
pub struct TrashedFile {
    pub trashed_name: String,
    pub original_path: PathBuf,
    pub deletion_date: String,
}

/// Thin contract over the XDG trash subsystem (§6; out of scope beyond this
/// command surface). `RealTrash` writes `$XDG_DATA_HOME/Trash/{files,info}`
/// directly; `FakeTrash` is an in-memory stand-in for tests.
pub trait Trash {
    fn trash(&self, paths: &[PathBuf]) -> Result<()>;
    fn untrash(&self, names: &[String]) -> Result<()>;
    fn list(&self) -> Result<Vec<TrashedFile>>;
}

// ---------------------------------------------------------------------------
// Archiver / remote mounts
// ---------------------------------------------------------------------------

/// Thin contract over archive creation/extraction (`atool`/`zstd`/`7z`/
/// `mkisofs`, §6) and remote-mount helpers (`sshfs`/`curlftpfs`/
/// `mount.cifs`). Out of scope beyond dispatch wiring: the real
/// implementation shells out; tests substitute a fake that just records
/// what was asked for.
pub trait Archiver {
    fn archive(&self, paths: &[PathBuf], dest: &Path) -> Result<()>;
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;
    /// True if `path`'s contents look like a supported archive/ISO, per a
    /// cheap extension/MIME probe (not a full format sniff).
    fn looks_like_archive(&self, path: &Path) -> bool;
}
