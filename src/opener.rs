//! Resource opener: explicit-app spawn, or MIME/extension
//! probing against the mime list file, with directory/archive fallbacks.

use anyhow::{Context, Result};
use std::path::Path;

use crate::platform::{Archiver, Fs, MimeProber, Shell};

/// One `KEY=APP1;APP2;…` line of the mime list file (§6).
struct MimeListEntry {
    key: MimeKey,
    apps: Vec<String>,
}

enum MimeKey {
    /// `E:<regex>` — matches by file extension.
    Extension(regex::Regex),
    /// A bare regex — matches by MIME type.
    Mime(regex::Regex),
}

/// Parse the mime list file: `#`/blank lines ignored, otherwise
/// `KEY=APPS` where `APPS` is `;`-separated (§6).
fn parse_mime_list(contents: &str) -> Vec<MimeListEntry> {
    let mut out = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, apps)) = line.split_once('=') else {
            continue;
        };
        let key = if let Some(ext_pattern) = key.strip_prefix("E:") {
            regex::Regex::new(ext_pattern).ok().map(MimeKey::Extension)
        } else {
            regex::Regex::new(key).ok().map(MimeKey::Mime)
        };
        let Some(key) = key else { continue };
        out.push(MimeListEntry {
            key,
            apps: apps.split(';').map(str::to_string).collect(),
        });
    }
    out
}

/// Extension after the last `.` in the basename, ignoring a leading dot
/// (dotfiles have no extension by this rule).
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let name = name.trim_start_matches('.');
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_string())
    }
}

/// Resolve the first word of each candidate app string against `PATH`,
/// left to right; `extra` holds any words after the first (passed through
/// as leading arguments ahead of the file path).
fn resolve_app(fs: &dyn Fs, apps: &[String]) -> Option<(String, Vec<String>)> {
    for candidate in apps {
        let mut words = candidate.split_whitespace();
        let Some(program) = words.next() else {
            continue;
        };
        let extra: Vec<String> = words.map(str::to_string).collect();
        if fs.path_dirs().iter().any(|dir| fs.is_executable(&dir.join(program))) {
            return Some((program.to_string(), extra));
        }
    }
    None
}

/// Find the first mime-list line matching `mime_type`/`extension`, and
/// resolve the first available app in it.
fn resolve_from_mime_list(
    fs: &dyn Fs,
    mime_list: &[MimeListEntry],
    mime_type: &str,
    extension: Option<&str>,
) -> Option<(String, Vec<String>)> {
    for entry in mime_list {
        let matched = match &entry.key {
            MimeKey::Extension(re) => extension.is_some_and(|ext| re.is_match(ext)),
            MimeKey::Mime(re) => re.is_match(mime_type),
        };
        if matched {
            return resolve_app(fs, &entry.apps);
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Spawned,
    SpawnedBackground,
    DelegatedCd,
    DelegatedArchive,
    NoAppFound,
}

/// Open `path`. `explicit_app` overrides the mime-list resolution
/// entirely; `background` corresponds to a trailing `&` on the command
/// line.
#[allow(clippy::too_many_arguments)]
pub fn open(
    fs: &dyn Fs,
    shell: &dyn Shell,
    mime: &dyn MimeProber,
    archiver: &dyn Archiver,
    path: &Path,
    explicit_app: Option<&str>,
    background: bool,
    mime_list_contents: &str,
    cwd: &Path,
) -> Result<OpenOutcome> {
    if let Some(app) = explicit_app {
        return spawn(shell, app, &[], path, background, cwd);
    }

    let mime_type = mime.probe(path).unwrap_or_default();
    let extension = extension_of(path);
    let mime_list = parse_mime_list(mime_list_contents);

    if let Some((app, extra)) =
        resolve_from_mime_list(fs, &mime_list, &mime_type, extension.as_deref())
    {
        return spawn(shell, &app, &extra, path, background, cwd);
    }

    if fs.is_dir(path) {
        return Ok(OpenOutcome::DelegatedCd);
    }
    if archiver.looks_like_archive(path) {
        return Ok(OpenOutcome::DelegatedArchive);
    }
    Ok(OpenOutcome::NoAppFound)
}

fn spawn(
    shell: &dyn Shell,
    app: &str,
    extra_args: &[String],
    path: &Path,
    background: bool,
    cwd: &Path,
) -> Result<OpenOutcome> {
    let mut command = String::from(app);
    for arg in extra_args {
        command.push(' ');
        command.push_str(arg);
    }
    command.push(' ');
    command.push_str(&crate::paths::escape(&path.to_string_lossy()));

    if background {
        shell
            .run_background(&command, cwd)
            .with_context(|| format!("failed to open {} in background", path.display()))?;
        Ok(OpenOutcome::SpawnedBackground)
    } else {
        shell
            .run_foreground(&command, cwd)
            .with_context(|| format!("failed to open {}", path.display()))?;
        Ok(OpenOutcome::Spawned)
    }
}

/// `mime info FILE`: MIME type, extension, and the app that would be
/// chosen, without spawning anything.
pub struct MimeInfo {
    pub mime_type: String,
    pub extension: Option<String>,
    pub resolved_app: Option<String>,
}

pub fn mime_info(
    fs: &dyn Fs,
    mime: &dyn MimeProber,
    path: &Path,
    mime_list_contents: &str,
) -> MimeInfo {
    let mime_type = mime.probe(path).unwrap_or_default();
    let extension = extension_of(path);
    let mime_list = parse_mime_list(mime_list_contents);
    let resolved_app =
        resolve_from_mime_list(fs, &mime_list, &mime_type, extension.as_deref())
            .map(|(app, _)| app);
    MimeInfo {
        mime_type,
        extension,
        resolved_app,
    }
}
