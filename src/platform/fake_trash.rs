//! In-memory `Trash` stand-in for tests.

use anyhow::Result;
use std::cell::RefCell;
use std::path::PathBuf;

use super::{Trash, TrashedFile};

pub struct FakeTrash {
    entries: RefCell<Vec<TrashedFile>>,
    next_id: RefCell<u32>,
}

impl FakeTrash {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: RefCell::new(0),
        }
    }

    pub fn contents(&self) -> Vec<TrashedFile> {
        self.entries.borrow().clone()
    }
}

impl Default for FakeTrash {
    fn default() -> Self {
        Self::new()
    }
}

impl Trash for FakeTrash {
    fn trash(&self, paths: &[PathBuf]) -> Result<()> {
        let mut id = self.next_id.borrow_mut();
        for path in paths {
            let trashed_name = format!("{}-{}", path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default(), *id);
            *id += 1;
            self.entries.borrow_mut().push(TrashedFile {
                trashed_name,
                original_path: path.clone(),
                deletion_date: "19700101T00:00:00".to_string(),
            });
        }
        Ok(())
    }

    fn untrash(&self, names: &[String]) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        for name in names {
            let pos = entries
                .iter()
                .position(|e| &e.trashed_name == name)
                .ok_or_else(|| anyhow::anyhow!("no such trashed file: {name}"))?;
            entries.remove(pos);
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<TrashedFile>> {
        Ok(self.entries.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trash_then_list_then_untrash() {
        let trash = FakeTrash::new();
        trash.trash(&[PathBuf::from("/a/b.txt")]).unwrap();
        let listed = trash.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].original_path, PathBuf::from("/a/b.txt"));

        trash.untrash(&[listed[0].trashed_name.clone()]).unwrap();
        assert!(trash.list().unwrap().is_empty());
    }

    #[test]
    fn untrash_unknown_name_errors() {
        let trash = FakeTrash::new();
        assert!(trash.untrash(&["nope".to_string()]).is_err());
    }
}
