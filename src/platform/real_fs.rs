//! Real filesystem implementation delegating to `std::fs`,
//! `std::os::unix::fs`, `libc`, `xattr`, and `dirs`.

use anyhow::{Context, Result};
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use super::{Fs, Kind, RawStat};

/// Real filesystem — delegates every operation to the OS.
pub struct RealFs;

fn classify(meta: &std::fs::Metadata, path: &Path) -> Kind {
    let ft = meta.file_type();
    if ft.is_dir() {
        Kind::Dir
    } else if ft.is_file() {
        Kind::Regular
    } else if ft.is_symlink() {
        let resolves_to_dir = std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false);
        Kind::Symlink { resolves_to_dir }
    } else if ft.is_socket() {
        Kind::Socket
    } else if ft.is_fifo() {
        Kind::Fifo
    } else if ft.is_block_device() {
        Kind::Block
    } else if ft.is_char_device() {
        Kind::Char
    } else {
        Kind::Unknown
    }
}

use std::os::unix::fs::FileTypeExt;

impl Fs for RealFs {
    fn read_dir(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to open directory: {}", dir.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn lstat(&self, path: &Path) -> Result<RawStat> {
        let meta = std::fs::symlink_metadata(path)
            .with_context(|| format!("Failed to stat: {}", path.display()))?;
        let kind = classify(&meta, path);
        Ok(RawStat {
            kind,
            inode: meta.ino(),
            nlink: meta.nlink(),
            size: meta.size(),
            uid: meta.uid(),
            gid: meta.gid(),
            mode: meta.mode(),
            atime: meta.atime(),
            btime: std::fs::metadata(path).ok().and_then(|m| m.created().ok()).and_then(|t| {
                t.duration_since(std::time::UNIX_EPOCH).ok().map(|d| d.as_secs() as i64)
            }),
            ctime: meta.ctime(),
            mtime: meta.mtime(),
        })
    }

    fn count_children(&self, dir: &Path) -> Result<usize> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to open directory: {}", dir.display()))?;
        Ok(entries.count())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove file: {}", path.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        std::fs::rename(from, to)
            .with_context(|| format!("Failed to rename {} -> {}", from.display(), to.display()))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))
    }

    fn symlink(&self, original: &Path, link: &Path) -> Result<()> {
        std::os::unix::fs::symlink(original, link).with_context(|| {
            format!(
                "Failed to create symlink: {} -> {}",
                link.display(),
                original.display()
            )
        })
    }

    fn read_link(&self, path: &Path) -> Result<PathBuf> {
        std::fs::read_link(path)
            .with_context(|| format!("Failed to read symlink: {}", path.display()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        dirs::config_dir()
    }

    fn data_dir(&self) -> Option<PathBuf> {
        dirs::data_dir()
    }

    fn path_dirs(&self) -> Vec<PathBuf> {
        std::env::var_os("PATH")
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default()
    }

    fn is_executable(&self, path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    fn set_executable(&self, path: &Path, on: bool) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let meta = std::fs::metadata(path)
            .with_context(|| format!("Failed to stat: {}", path.display()))?;
        let mut mode = meta.permissions().mode();
        mode = if on { mode | 0o111 } else { mode & !0o111 };
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
            .with_context(|| format!("Failed to chmod: {}", path.display()))
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn glob(&self, cwd: &Path, pattern: &str) -> Vec<PathBuf> {
        let full_pattern = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            cwd.join(pattern).to_string_lossy().into_owned()
        };
        match glob::glob(&full_pattern) {
            Ok(paths) => paths.flatten().collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Check for a non-empty `security.capability` xattr (Linux file
/// capabilities). Returns `false` on platforms without xattr support or when
/// the attribute is absent — capability probing is best-effort.
pub fn has_capabilities(path: &Path) -> bool {
    xattr::get(path, "security.capability")
        .ok()
        .flatten()
        .is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_dirs_reads_env() {
        // SAFETY: test-only, single-threaded test process.
        unsafe { std::env::set_var("PATH", "/usr/bin:/bin") };
        let fs = RealFs;
        let dirs = fs.path_dirs();
        assert!(dirs.contains(&PathBuf::from("/usr/bin")));
        assert!(dirs.contains(&PathBuf::from("/bin")));
    }
}
