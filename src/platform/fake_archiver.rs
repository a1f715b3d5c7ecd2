//! Test double for `Archiver`. Records calls instead of shelling out.

use anyhow::Result;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use super::Archiver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiverCall {
    Archive(Vec<PathBuf>, PathBuf),
    Extract(PathBuf, PathBuf),
}

pub struct FakeArchiver {
    calls: RefCell<Vec<ArchiverCall>>,
    archive_extensions: Vec<String>,
}

impl FakeArchiver {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            archive_extensions: vec!["zip".to_string(), "tar".to_string(), "gz".to_string()],
        }
    }

    pub fn calls(&self) -> Vec<ArchiverCall> {
        self.calls.borrow().clone()
    }
}

impl Default for FakeArchiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Archiver for FakeArchiver {
    fn archive(&self, paths: &[PathBuf], dest: &Path) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(ArchiverCall::Archive(paths.to_vec(), dest.to_path_buf()));
        Ok(())
    }

    fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(ArchiverCall::Extract(archive.to_path_buf(), dest.to_path_buf()));
        Ok(())
    }

    fn looks_like_archive(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.archive_extensions.iter().any(|known| known == ext))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_archive_and_extract_calls() {
        let archiver = FakeArchiver::new();
        archiver
            .archive(&[PathBuf::from("/a")], Path::new("/out.zip"))
            .unwrap();
        archiver
            .extract(Path::new("/out.zip"), Path::new("/dest"))
            .unwrap();
        assert_eq!(archiver.calls().len(), 2);
    }
}
