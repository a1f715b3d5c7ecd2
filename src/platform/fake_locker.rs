//! Test double for process locking.

use anyhow::Result;
use std::cell::Cell;
use std::path::{Path, PathBuf};

use super::Locker;

pub struct FakeLocker {
    locked: Cell<bool>,
    contended: bool,
    owner_pid: Option<i32>,
    path: PathBuf,
}

impl FakeLocker {
    /// Create a locker that is not contended (lock will succeed).
    pub fn new(path: PathBuf) -> Self {
        Self {
            locked: Cell::new(false),
            contended: false,
            owner_pid: None,
            path,
        }
    }

    /// Create a locker that simulates another process (`owner_pid`) holding
    /// the lock.
    pub fn new_contended(path: PathBuf, owner_pid: i32) -> Self {
        Self {
            locked: Cell::new(false),
            contended: true,
            owner_pid: Some(owner_pid),
            path,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

impl Locker for FakeLocker {
    fn try_lock(&mut self) -> Result<bool> {
        if self.contended {
            return Ok(false);
        }
        self.locked.set(true);
        Ok(true)
    }

    fn unlock(&mut self) -> Result<()> {
        self.locked.set(false);
        Ok(())
    }

    fn lock_path(&self) -> &Path {
        &self.path
    }

    fn read_lock_owner(&self) -> Result<Option<i32>> {
        Ok(self.owner_pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_and_unlock() {
        let mut locker = FakeLocker::new(PathBuf::from("/tmp/test.lock"));
        assert!(locker.try_lock().unwrap());
        assert!(locker.is_locked());
        locker.unlock().unwrap();
        assert!(!locker.is_locked());
    }

    #[test]
    fn contended_lock_fails() {
        let mut locker = FakeLocker::new_contended(PathBuf::from("/tmp/test.lock"));
        assert!(!locker.try_lock().unwrap());
    }
}
