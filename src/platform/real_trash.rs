//! Production `Trash` implementation writing the XDG trash layout
//! (`$XDG_DATA_HOME/Trash/{files,info}`) directly (§6).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::{Trash, TrashedFile};
use crate::paths::{url_decode, url_encode};

pub struct RealTrash {
    files_dir: PathBuf,
    info_dir: PathBuf,
}

impl RealTrash {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let files_dir = data_dir.join("Trash").join("files");
        let info_dir = data_dir.join("Trash").join("info");
        std::fs::create_dir_all(&files_dir)
            .with_context(|| format!("failed to create {}", files_dir.display()))?;
        std::fs::create_dir_all(&info_dir)
            .with_context(|| format!("failed to create {}", info_dir.display()))?;
        Ok(Self { files_dir, info_dir })
    }

    fn deletion_date_now() -> String {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        format_timestamp(now)
    }

    fn info_path(&self, trashed_name: &str) -> PathBuf {
        self.info_dir.join(format!("{trashed_name}.trashinfo"))
    }

    /// Pick a trashed-name that doesn't collide with an existing one,
    /// appending `_N` as needed.
    fn unique_trashed_name(&self, original: &Path) -> String {
        let base = original
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let mut candidate = base.clone();
        let mut n = 1;
        while self.files_dir.join(&candidate).exists() || self.info_path(&candidate).exists() {
            candidate = format!("{base}_{n}");
            n += 1;
        }
        candidate
    }
}

impl Trash for RealTrash {
    fn trash(&self, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            let trashed_name = self.unique_trashed_name(path);
            let dest = self.files_dir.join(&trashed_name);
            std::fs::rename(path, &dest)
                .with_context(|| format!("failed to move {} to trash", path.display()))?;

            let stanza = format!(
                "[Trash Info]\nPath={}\nDeletionDate={}\n",
                url_encode(&path.to_string_lossy()),
                Self::deletion_date_now(),
            );
            std::fs::write(self.info_path(&trashed_name), stanza)
                .with_context(|| format!("failed to write trashinfo for {}", path.display()))?;
        }
        Ok(())
    }

    fn untrash(&self, names: &[String]) -> Result<()> {
        for name in names {
            let info_path = self.info_path(name);
            let contents = std::fs::read_to_string(&info_path)
                .with_context(|| format!("no such trashed file: {name}"))?;
            let original_path = parse_path_stanza(&contents)
                .ok_or_else(|| anyhow::anyhow!("malformed trashinfo for {name}"))?;

            if let Some(parent) = original_path.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            std::fs::rename(self.files_dir.join(name), &original_path)
                .with_context(|| format!("failed to restore {name}"))?;
            std::fs::remove_file(&info_path).ok();
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<TrashedFile>> {
        let mut out = Vec::new();
        let entries = match std::fs::read_dir(&self.info_dir) {
            Ok(e) => e,
            Err(_) => return Ok(out),
        };
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("trashinfo") {
                continue;
            }
            let trashed_name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let contents = std::fs::read_to_string(&path)?;
            let original_path = parse_path_stanza(&contents).unwrap_or_default();
            let deletion_date = parse_deletion_date(&contents).unwrap_or_default();
            out.push(TrashedFile {
                trashed_name,
                original_path,
                deletion_date,
            });
        }
        Ok(out)
    }
}

fn parse_path_stanza(contents: &str) -> Option<PathBuf> {
    contents
        .lines()
        .find_map(|line| line.strip_prefix("Path="))
        .map(|encoded| PathBuf::from(url_decode(encoded)))
}

fn parse_deletion_date(contents: &str) -> Option<String> {
    contents
        .lines()
        .find_map(|line| line.strip_prefix("DeletionDate="))
        .map(|s| s.to_string())
}

fn format_timestamp(epoch_secs: i64) -> String {
    // Minimal UTC civil-from-days conversion, avoiding a chrono dependency
    // for a single call site.
    let days = epoch_secs.div_euclid(86_400);
    let secs_of_day = epoch_secs.rem_euclid(86_400);
    let (y, m, d) = civil_from_days(days);
    let hh = secs_of_day / 3600;
    let mm = (secs_of_day % 3600) / 60;
    let ss = secs_of_day % 60;
    format!("{y:04}{m:02}{d:02}T{hh:02}:{mm:02}:{ss:02}")
}

/// Howard Hinnant's `civil_from_days` algorithm.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}
