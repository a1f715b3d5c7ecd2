//! Production file-lock implementation backed by `fslock`, guarding the
//! full-file-replacement writes to selection/jump/bookmark files against
//! concurrent instances of the program (§5).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::Locker;

pub struct RealLocker {
    inner: fslock::LockFile,
    path: PathBuf,
}

impl RealLocker {
    pub fn new(path: PathBuf) -> Result<Self> {
        let inner = fslock::LockFile::open(&path)
            .with_context(|| format!("failed to open lock file at {}", path.display()))?;
        Ok(Self { inner, path })
    }
}

impl Locker for RealLocker {
    fn try_lock(&mut self) -> Result<bool> {
        self.inner
            .try_lock_with_pid()
            .with_context(|| format!("failed to acquire lock at {}", self.path.display()))
    }

    fn unlock(&mut self) -> Result<()> {
        self.inner
            .unlock()
            .with_context(|| format!("failed to release lock at {}", self.path.display()))
    }

    fn lock_path(&self) -> &Path {
        &self.path
    }

    fn read_lock_owner(&self) -> Result<Option<i32>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.trim().parse().ok()),
            Err(_) => Ok(None),
        }
    }
}
