//! Production `Archiver`. Archive/extract formats require shelling out to
//! tools this crate does not vendor (§6) — this implementation declines
//! explicitly rather than silently no-opping.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::Archiver;
use crate::errors::CoreErrorKind;

pub struct RealArchiver;

const ARCHIVE_EXTENSIONS: &[&str] = &[
    "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar", "iso", "zst",
];

impl Archiver for RealArchiver {
    fn archive(&self, _paths: &[PathBuf], _dest: &Path) -> Result<()> {
        Err(anyhow::Error::new(CoreErrorKind::Io))
            .context("archive creation is not supported in this build")
    }

    fn extract(&self, _archive: &Path, _dest: &Path) -> Result<()> {
        Err(anyhow::Error::new(CoreErrorKind::Io))
            .context("archive extraction is not supported in this build")
    }

    fn looks_like_archive(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| ARCHIVE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_common_archive_extensions() {
        let a = RealArchiver;
        assert!(a.looks_like_archive(Path::new("stuff.tar.gz")));
        assert!(a.looks_like_archive(Path::new("stuff.ZIP")));
        assert!(!a.looks_like_archive(Path::new("stuff.txt")));
    }

    #[test]
    fn archive_and_extract_decline() {
        let a = RealArchiver;
        assert!(a.archive(&[], Path::new("/tmp/out.zip")).is_err());
        assert!(a.extract(Path::new("/tmp/out.zip"), Path::new("/tmp")).is_err());
    }
}
