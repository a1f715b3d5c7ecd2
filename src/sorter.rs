//! Sorter: orders a scan's entries by one of eleven
//! methods, with folders-first and reverse as orthogonal toggles.

use std::cmp::Ordering;

use crate::scanner::Entry;

/// Sort method, indexed 0..11.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMethod {
    None,
    Name,
    Size,
    Atime,
    Btime,
    Ctime,
    Mtime,
    Version,
    Extension,
    Inode,
    Owner,
    Group,
}

#[derive(Debug, Clone, Copy)]
pub struct SortOptions {
    pub method: SortMethod,
    pub folders_first: bool,
    pub case_sensitive: bool,
    pub reverse: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            method: SortMethod::Name,
            folders_first: true,
            case_sensitive: false,
            reverse: false,
        }
    }
}

/// Name used for tie-breaking and `Name`/`Version`/`Extension` comparisons:
/// a single leading `.` is ignored.
fn sort_key(name: &str, case_sensitive: bool) -> String {
    let trimmed = name.strip_prefix('.').unwrap_or(name);
    if case_sensitive {
        trimmed.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

fn name_cmp(a: &Entry, b: &Entry, case_sensitive: bool) -> Ordering {
    sort_key(&a.name, case_sensitive).cmp(&sort_key(&b.name, case_sensitive))
}

fn extension_of(name: &str) -> String {
    std::path::Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn method_cmp(a: &Entry, b: &Entry, opts: &SortOptions) -> Ordering {
    match opts.method {
        SortMethod::None => Ordering::Equal,
        SortMethod::Name => name_cmp(a, b, opts.case_sensitive),
        SortMethod::Size => a.size.cmp(&b.size),
        SortMethod::Atime => a.atime.cmp(&b.atime),
        SortMethod::Btime => {
            let a_time = a.btime.unwrap_or(a.ctime);
            let b_time = b.btime.unwrap_or(b.ctime);
            a_time.cmp(&b_time)
        }
        SortMethod::Ctime => a.ctime.cmp(&b.ctime),
        SortMethod::Mtime => a.mtime.cmp(&b.mtime),
        SortMethod::Version => {
            match natord::compare(&a.name, &b.name) {
                Ordering::Equal => name_cmp(a, b, opts.case_sensitive),
                other => other,
            }
        }
        SortMethod::Extension => extension_of(&a.name)
            .cmp(&extension_of(&b.name))
            .then_with(|| name_cmp(a, b, opts.case_sensitive)),
        SortMethod::Inode => a.inode.cmp(&b.inode),
        SortMethod::Owner => a.uid.cmp(&b.uid),
        SortMethod::Group => a.gid.cmp(&b.gid),
    }
}

/// Sort `entries` in place according to `opts`.
pub fn sort(entries: &mut [Entry], opts: &SortOptions) {
    entries.sort_by(|a, b| {
        if opts.folders_first {
            let a_dir = a.is_dir_like();
            let b_dir = b.is_dir_like();
            if a_dir != b_dir {
                return if a_dir { Ordering::Less } else { Ordering::Greater };
            }
        }
        let primary = method_cmp(a, b, opts);
        let ordering = if primary == Ordering::Equal {
            name_cmp(a, b, opts.case_sensitive)
        } else {
            primary
        };
        if opts.reverse { ordering.reverse() } else { ordering }
    });
}
