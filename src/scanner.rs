//! Directory scanner: lists one directory's immediate
//! children as a vector of `Entry`, assigning color/icon tags and
//! type-specific flags from a single `lstat` pass.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::paths::unicode_width;
use crate::platform::{Fs, Kind, RawStat};

/// File-type tag, matching the data model's closed set (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Directory,
    Regular,
    Symlink,
    Socket,
    Fifo,
    Block,
    Char,
    Unknown,
}

impl From<Kind> for FileType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Dir => FileType::Directory,
            Kind::Regular => FileType::Regular,
            Kind::Symlink { .. } => FileType::Symlink,
            Kind::Socket => FileType::Socket,
            Kind::Fifo => FileType::Fifo,
            Kind::Block => FileType::Block,
            Kind::Char => FileType::Char,
            Kind::Unknown => FileType::Unknown,
        }
    }
}

/// Color tag resolved once per scan from `LS_COLORS`/override variables.
/// The crate does not render SGR codes itself (rendering is out of scope);
/// this is the data the rendering layer would key off of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorTag {
    Directory,
    Executable,
    Symlink,
    BrokenSymlink,
    Setuid,
    Setgid,
    Unreadable,
    Socket,
    Fifo,
    Device,
    ByExtension(String),
    Normal,
}

/// One entry produced by a directory scan (data model §3).
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub display_width: usize,
    pub path: PathBuf,
    pub inode: u64,
    pub nlink: u64,
    pub size: u64,
    pub uid: u32,
    pub gid: u32,
    /// Time field chosen by the active sort mode; populated by the sorter,
    /// not the scanner, from the raw stat fields below.
    pub atime: i64,
    pub btime: Option<i64>,
    pub ctime: i64,
    pub mtime: i64,
    pub file_type: FileType,
    pub resolved_to_directory: bool,
    pub executable: bool,
    pub readable: bool,
    /// -1 unreadable, 0 empty, else child count excluding `.`/`..`.
    pub child_count: i64,
    pub mode: u32,
    pub has_capabilities: bool,
    pub setuid: bool,
    pub setgid: bool,
    pub color_tag: ColorTag,
    pub icon_tag: &'static str,
    pub eln_digits: usize,
}

impl Entry {
    pub fn is_dir_like(&self) -> bool {
        self.file_type == FileType::Directory || self.resolved_to_directory
    }
}

/// Scanner options.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub show_hidden: bool,
    pub only_dirs: bool,
    pub filter: Option<regex::Regex>,
    /// Light mode: skip lstat, rely only on directory-entry name; no
    /// permission checks, no link resolution, no color/icon lookup.
    pub light_mode: bool,
    /// Whether to count children of directories (the `counter` option).
    pub count_children: bool,
}

fn icon_for(file_type: FileType, executable: bool) -> &'static str {
    match file_type {
        FileType::Directory => "\u{f07b}",
        FileType::Symlink => "\u{f0c1}",
        FileType::Socket => "\u{f1e6}",
        FileType::Fifo => "\u{f03a}",
        FileType::Block | FileType::Char => "\u{f0a0}",
        FileType::Unknown => "\u{f128}",
        FileType::Regular if executable => "\u{f013}",
        FileType::Regular => "\u{f15b}",
    }
}

fn color_for(
    file_type: FileType,
    stat: &RawStat,
    executable: bool,
    resolved_to_directory: bool,
    readable: bool,
    name: &str,
) -> ColorTag {
    match file_type {
        FileType::Directory if !readable => ColorTag::Unreadable,
        FileType::Directory => ColorTag::Directory,
        FileType::Symlink if resolved_to_directory && !readable => ColorTag::Unreadable,
        FileType::Symlink if resolved_to_directory => ColorTag::Directory,
        FileType::Symlink => {
            if readable {
                ColorTag::Symlink
            } else {
                ColorTag::BrokenSymlink
            }
        }
        FileType::Socket => ColorTag::Socket,
        FileType::Fifo => ColorTag::Fifo,
        FileType::Block | FileType::Char => ColorTag::Device,
        FileType::Unknown => ColorTag::Normal,
        FileType::Regular => {
            if stat.mode & 0o4000 != 0 {
                ColorTag::Setuid
            } else if stat.mode & 0o2000 != 0 {
                ColorTag::Setgid
            } else if executable {
                ColorTag::Executable
            } else if !readable {
                ColorTag::Unreadable
            } else if let Some(ext) = Path::new(name).extension() {
                ColorTag::ByExtension(ext.to_string_lossy().to_lowercase())
            } else {
                ColorTag::Normal
            }
        }
    }
}

fn eln_digit_count(n: usize) -> usize {
    if n == 0 {
        1
    } else {
        (n as f64).log10().floor() as usize + 1
    }
}

/// Scan `dir` for its immediate children. On an open failure, the caller
/// should keep its previous listing on failure — this
/// function simply returns `Err` and touches nothing.
pub fn scan(fs: &dyn Fs, dir: &Path, opts: &ScanOptions) -> Result<Vec<Entry>> {
    let names = fs
        .read_dir(dir)
        .with_context(|| format!("cannot access directory: {}", dir.display()))?;

    let candidate_count = names.len();
    let mut entries = Vec::with_capacity(candidate_count);
    let mut eln = 0usize;

    for name in names {
        if name == "." || name == ".." || name.is_empty() {
            continue;
        }
        if !opts.show_hidden && name.starts_with('.') {
            continue;
        }
        if let Some(filter) = &opts.filter
            && filter.is_match(&name)
        {
            continue;
        }

        let path = dir.join(&name);

        let entry = if opts.light_mode {
            build_light_entry(&path, &name)
        } else {
            match build_full_entry(fs, &path, &name, opts) {
                Ok(entry) => entry,
                // A single-entry lstat failure skips that entry; scan continues.
                Err(_) => continue,
            }
        };

        if opts.only_dirs && !entry.is_dir_like() {
            continue;
        }

        eln += 1;
        entries.push(entry);
    }

    let total_digits = eln_digit_count(eln);
    for entry in &mut entries {
        entry.eln_digits = total_digits;
    }

    Ok(entries)
}

fn build_light_entry(path: &Path, name: &str) -> Entry {
    Entry {
        name: name.to_string(),
        display_width: unicode_width(name),
        path: path.to_path_buf(),
        inode: 0,
        nlink: 1,
        size: 0,
        uid: 0,
        gid: 0,
        atime: 0,
        btime: None,
        ctime: 0,
        mtime: 0,
        file_type: FileType::Unknown,
        resolved_to_directory: false,
        executable: false,
        readable: true,
        child_count: -1,
        mode: 0,
        has_capabilities: false,
        setuid: false,
        setgid: false,
        color_tag: ColorTag::Normal,
        icon_tag: "\u{f128}",
        eln_digits: 1,
    }
}

fn build_full_entry(fs: &dyn Fs, path: &Path, name: &str, opts: &ScanOptions) -> Result<Entry> {
    let stat = fs.lstat(path)?;
    let file_type: FileType = stat.kind.into();
    let resolved_to_directory = matches!(
        stat.kind,
        Kind::Symlink {
            resolves_to_dir: true
        }
    );
    let executable = fs.is_executable(path);
    let is_dir_like = file_type == FileType::Directory || resolved_to_directory;

    let child_count = if opts.count_children && is_dir_like {
        fs.count_children(path).map(|n| n as i64).unwrap_or(-1)
    } else {
        0
    };

    // A directory (or a symlink resolving to one) is only known unreadable
    // when a `count_children` probe actually hit permission denied (child
    // count -1); otherwise no signal was gathered and it's assumed
    // readable, matching the scanner's single `lstat` pass (§4.2).
    let readable = match file_type {
        FileType::Symlink if !resolved_to_directory => fs.exists(path),
        _ if is_dir_like => child_count != -1,
        _ => true,
    };

    let setuid = stat.mode & 0o4000 != 0;
    let setgid = stat.mode & 0o2000 != 0;
    let has_capabilities = file_type == FileType::Regular && crate::platform::has_capabilities(path);

    let color_tag = color_for(file_type, &stat, executable, resolved_to_directory, readable, name);
    let icon_tag = icon_for(file_type, executable);

    Ok(Entry {
        name: name.to_string(),
        display_width: unicode_width(name),
        path: path.to_path_buf(),
        inode: stat.inode,
        nlink: stat.nlink,
        size: stat.size,
        uid: stat.uid,
        gid: stat.gid,
        atime: stat.atime,
        btime: stat.btime,
        ctime: stat.ctime,
        mtime: stat.mtime,
        file_type,
        resolved_to_directory,
        executable,
        readable,
        child_count,
        mode: stat.mode,
        has_capabilities,
        setuid,
        setgid,
        color_tag,
        icon_tag,
        eln_digits: 1,
    })
}
