//! In-memory filesystem fake for testing.
//!
//! Stores files, directories, and symlinks in a `HashMap` with interior
//! mutability via `RefCell`. Supports all `Fs` trait operations including
//! symlink resolution and directory listing.
//!
//! Non-trait setup methods (`add_file`, `add_dir`, `add_symlink`) auto-create
//! parent directories for convenience in test setup.

use anyhow::{Result, bail};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{Fs, Kind, RawStat};

/// A single entry in the fake filesystem.
#[derive(Clone, Debug)]
pub(crate) enum FakeEntry {
    File {
        content: Vec<u8>,
        mode: u32,
        mtime: i64,
    },
    Symlink {
        target: PathBuf,
    },
    Dir,
}

/// In-memory filesystem for testing — no real I/O.
pub struct FakeFs {
    entries: RefCell<HashMap<PathBuf, FakeEntry>>,
    home: PathBuf,
    config_dir: PathBuf,
    data_dir: PathBuf,
    fail_writes: RefCell<bool>,
    executables: RefCell<Vec<PathBuf>>,
    path_dirs: RefCell<Vec<PathBuf>>,
    env: RefCell<HashMap<String, String>>,
    next_ino: RefCell<u64>,
    clock: RefCell<i64>,
    unreadable_dirs: RefCell<Vec<PathBuf>>,
}

impl FakeFs {
    /// Create a new fake filesystem with the given home directory.
    /// Automatically creates the home, `~/.config`, and `~/.local/share` dirs.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let config_dir = home.join(".config");
        let data_dir = home.join(".local/share");
        let mut entries = HashMap::new();
        entries.insert(PathBuf::from("/"), FakeEntry::Dir);
        entries.insert(home.clone(), FakeEntry::Dir);
        entries.insert(config_dir.clone(), FakeEntry::Dir);
        entries.insert(data_dir.clone(), FakeEntry::Dir);
        Self {
            entries: RefCell::new(entries),
            home,
            config_dir,
            data_dir,
            fail_writes: RefCell::new(false),
            executables: RefCell::new(Vec::new()),
            path_dirs: RefCell::new(vec![PathBuf::from("/usr/bin"), PathBuf::from("/bin")]),
            env: RefCell::new(HashMap::new()),
            next_ino: RefCell::new(1),
            clock: RefCell::new(1_700_000_000),
            unreadable_dirs: RefCell::new(Vec::new()),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.borrow_mut() = fail;
    }

    /// Make `count_children` report permission-denied for `dir`, simulating
    /// a directory the scanning user can't open (scanner.rs's "on
    /// permission denied, child count is -1" path, §4.2).
    pub fn deny_count_children(&self, dir: impl Into<PathBuf>) {
        self.unreadable_dirs.borrow_mut().push(dir.into());
    }

    pub fn set_env(&self, name: impl Into<String>, value: impl Into<String>) {
        self.env.borrow_mut().insert(name.into(), value.into());
    }

    pub fn set_path_dirs(&self, dirs: Vec<PathBuf>) {
        *self.path_dirs.borrow_mut() = dirs;
    }

    /// Advance the fake clock (seconds), used by time-dependent tests (jump db aging).
    pub fn advance_clock(&self, secs: i64) {
        *self.clock.borrow_mut() += secs;
    }

    pub fn now(&self) -> i64 {
        *self.clock.borrow()
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let path = path.into();
        self.ensure_parents(&path);
        let now = self.now();
        self.entries.borrow_mut().insert(
            path,
            FakeEntry::File {
                content: content.into(),
                mode: 0o644,
                mtime: now,
            },
        );
    }

    pub fn add_executable(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.add_file(path.clone(), "#!/bin/sh\n");
        self.executables.borrow_mut().push(path);
    }

    pub fn add_dir(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.ensure_parents(&path);
        self.entries
            .borrow_mut()
            .entry(path)
            .or_insert(FakeEntry::Dir);
    }

    pub fn add_symlink(&self, link: impl Into<PathBuf>, target: impl Into<PathBuf>) {
        let link = link.into();
        self.ensure_parents(&link);
        self.entries.borrow_mut().insert(
            link,
            FakeEntry::Symlink {
                target: target.into(),
            },
        );
    }

    fn ensure_parents(&self, path: &Path) {
        let mut entries = self.entries.borrow_mut();
        if let Some(parent) = path.parent() {
            let mut current = PathBuf::new();
            for component in parent.components() {
                current.push(component);
                entries.entry(current.clone()).or_insert(FakeEntry::Dir);
            }
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        let entries = self.entries.borrow();
        let mut current = path.to_path_buf();
        for _ in 0..32 {
            match entries.get(&current) {
                Some(FakeEntry::Symlink { target }) => current = target.clone(),
                _ => break,
            }
        }
        current
    }

    fn ino_for(&self, path: &Path) -> u64 {
        // Stable pseudo-inode derived from path hash; good enough for tests
        // that only need distinct identity, not real inode semantics.
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        let _ = &self.next_ino;
        hasher.finish()
    }
}

impl Fs for FakeFs {
    fn read_dir(&self, dir: &Path) -> Result<Vec<String>> {
        let entries = self.entries.borrow();
        if !matches!(entries.get(dir), Some(FakeEntry::Dir)) {
            bail!("not a directory: {}", dir.display());
        }
        let mut names: Vec<String> = entries
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    fn lstat(&self, path: &Path) -> Result<RawStat> {
        let entries = self.entries.borrow();
        let entry = entries
            .get(path)
            .ok_or_else(|| anyhow::anyhow!("not found: {}", path.display()))?;
        let now = self.now();
        let (kind, size, mode, mtime) = match entry {
            FakeEntry::Dir => (Kind::Dir, 0, 0o755, now),
            FakeEntry::File {
                content,
                mode,
                mtime,
            } => (Kind::Regular, content.len() as u64, *mode, *mtime),
            FakeEntry::Symlink { target } => {
                let resolves_to_dir = matches!(entries.get(target), Some(FakeEntry::Dir));
                (Kind::Symlink { resolves_to_dir }, 0, 0o777, now)
            }
        };
        Ok(RawStat {
            kind,
            inode: self.ino_for(path),
            nlink: 1,
            size,
            uid: 1000,
            gid: 1000,
            mode,
            atime: now,
            btime: Some(now),
            ctime: mtime,
            mtime,
        })
    }

    fn count_children(&self, dir: &Path) -> Result<usize> {
        if self.unreadable_dirs.borrow().iter().any(|p| p == dir) {
            bail!("permission denied: {}", dir.display());
        }
        Ok(self.read_dir(dir)?.len())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let resolved = self.resolve_path(path);
        let entries = self.entries.borrow();
        match entries.get(&resolved) {
            Some(FakeEntry::File { content, .. }) => Ok(String::from_utf8(content.clone())?),
            Some(_) => bail!("not a file: {}", path.display()),
            None => bail!("file not found: {}", path.display()),
        }
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let resolved = self.resolve_path(path);
        let entries = self.entries.borrow();
        match entries.get(&resolved) {
            Some(FakeEntry::File { content, .. }) => Ok(content.clone()),
            Some(_) => bail!("not a file: {}", path.display()),
            None => bail!("file not found: {}", path.display()),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if *self.fail_writes.borrow() {
            bail!("simulated write failure: {}", path.display());
        }
        self.ensure_parents(path);
        let resolved = self.resolve_path(path);
        let mode = match self.entries.borrow().get(&resolved) {
            Some(FakeEntry::File { mode, .. }) => *mode,
            _ => 0o644,
        };
        let now = self.now();
        self.entries.borrow_mut().insert(
            resolved,
            FakeEntry::File {
                content: contents.to_vec(),
                mode,
                mtime: now,
            },
        );
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        match entries.get(path) {
            Some(FakeEntry::File { .. } | FakeEntry::Symlink { .. }) => {
                entries.remove(path);
                Ok(())
            }
            Some(FakeEntry::Dir) => bail!("is a directory: {}", path.display()),
            None => bail!("file not found: {}", path.display()),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|p, _| p != path && !p.starts_with(path));
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        match entries.remove(from) {
            Some(entry) => {
                entries.insert(to.to_path_buf(), entry);
                Ok(())
            }
            None => bail!("not found: {}", from.display()),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            entries.entry(current.clone()).or_insert(FakeEntry::Dir);
        }
        Ok(())
    }

    fn symlink(&self, original: &Path, link: &Path) -> Result<()> {
        self.ensure_parents(link);
        self.entries.borrow_mut().insert(
            link.to_path_buf(),
            FakeEntry::Symlink {
                target: original.to_path_buf(),
            },
        );
        Ok(())
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        let entries = self.entries.borrow();
        match entries.get(path) {
            Some(FakeEntry::Symlink { target }) => Ok(target.clone()),
            _ => bail!("not a symlink: {}", path.display()),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        let resolved = self.resolve_path(path);
        self.entries.borrow().contains_key(&resolved)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let resolved = self.resolve_path(path);
        matches!(self.entries.borrow().get(&resolved), Some(FakeEntry::Dir))
    }

    fn home_dir(&self) -> Option<PathBuf> {
        Some(self.home.clone())
    }

    fn config_dir(&self) -> Option<PathBuf> {
        Some(self.config_dir.clone())
    }

    fn data_dir(&self) -> Option<PathBuf> {
        Some(self.data_dir.clone())
    }

    fn path_dirs(&self) -> Vec<PathBuf> {
        self.path_dirs.borrow().clone()
    }

    fn is_executable(&self, path: &Path) -> bool {
        self.executables.borrow().iter().any(|p| p == path)
    }

    fn set_executable(&self, path: &Path, on: bool) -> Result<()> {
        let resolved = self.resolve_path(path);
        if !self.entries.borrow().contains_key(&resolved) {
            anyhow::bail!("no such file: {}", path.display());
        }
        let mut executables = self.executables.borrow_mut();
        executables.retain(|p| p != &resolved);
        if on {
            executables.push(resolved);
        }
        Ok(())
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.borrow().get(name).cloned()
    }

    fn glob(&self, cwd: &Path, pattern: &str) -> Vec<PathBuf> {
        let full = if Path::new(pattern).is_absolute() {
            PathBuf::from(pattern)
        } else {
            cwd.join(pattern)
        };
        let mut candidates = vec![PathBuf::from("/")];
        for component in full.components() {
            use std::path::Component;
            let part = match component {
                Component::Normal(part) => part.to_string_lossy().into_owned(),
                _ => continue,
            };
            let Ok(matcher) = glob::Pattern::new(&part) else {
                return Vec::new();
            };
            let mut next = Vec::new();
            for base in &candidates {
                if part.contains(['*', '?', '[']) {
                    if let Ok(names) = self.read_dir(base) {
                        for name in names {
                            if matcher.matches(&name) {
                                next.push(base.join(&name));
                            }
                        }
                    }
                } else {
                    let joined = base.join(&part);
                    if self.entries.borrow().contains_key(&joined) {
                        next.push(joined);
                    }
                }
            }
            candidates = next;
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_roundtrip() {
        let fs = FakeFs::new("/home/test");
        fs.add_file("/tmp/hello.txt", "hello world");
        assert_eq!(
            fs.read_to_string(Path::new("/tmp/hello.txt")).unwrap(),
            "hello world"
        );
        assert!(fs.exists(Path::new("/tmp/hello.txt")));
        assert!(!fs.is_dir(Path::new("/tmp/hello.txt")));
    }

    #[test]
    fn symlink_resolution() {
        let fs = FakeFs::new("/home/test");
        fs.add_file("/real/file.txt", "content");
        fs.add_symlink("/link", "/real/file.txt");
        assert!(fs.exists(Path::new("/link")));
        assert_eq!(fs.read_to_string(Path::new("/link")).unwrap(), "content");
        assert_eq!(
            fs.read_link(Path::new("/link")).unwrap(),
            PathBuf::from("/real/file.txt")
        );
    }

    #[test]
    fn broken_symlink_does_not_exist() {
        let fs = FakeFs::new("/home/test");
        fs.add_symlink("/broken", "/nonexistent");
        assert!(!fs.exists(Path::new("/broken")));
    }

    #[test]
    fn read_dir_excludes_dot_and_dotdot() {
        let fs = FakeFs::new("/home/test");
        fs.add_file("/d/a.txt", "a");
        fs.add_file("/d/b.txt", "b");
        fs.add_dir("/d/sub");
        let names = fs.read_dir(Path::new("/d")).unwrap();
        assert_eq!(names, vec!["a.txt", "b.txt", "sub"]);
    }

    #[test]
    fn lstat_classifies_symlink_to_dir() {
        let fs = FakeFs::new("/home/test");
        fs.add_dir("/target");
        fs.add_symlink("/link", "/target");
        let stat = fs.lstat(Path::new("/link")).unwrap();
        assert_eq!(
            stat.kind,
            Kind::Symlink {
                resolves_to_dir: true
            }
        );
    }

    #[test]
    fn auto_creates_parents() {
        let fs = FakeFs::new("/home/test");
        fs.add_file("/a/b/c/d.txt", "deep");
        assert!(fs.is_dir(Path::new("/a")));
        assert!(fs.is_dir(Path::new("/a/b")));
        assert!(fs.is_dir(Path::new("/a/b/c")));
    }

    #[test]
    fn write_failure_toggle() {
        let fs = FakeFs::new("/home/test");
        fs.set_fail_writes(true);
        assert!(fs.write(Path::new("/tmp/x"), b"y").is_err());
    }

    #[test]
    fn remove_dir_all_recursive() {
        let fs = FakeFs::new("/home/test");
        fs.add_file("/d/a.txt", "a");
        fs.add_file("/d/sub/b.txt", "b");
        fs.remove_dir_all(Path::new("/d")).unwrap();
        assert!(!fs.exists(Path::new("/d")));
        assert!(!fs.exists(Path::new("/d/sub/b.txt")));
    }
}
