//! Per-category command handlers. Each function takes the
//! already-expanded argument words (ELNs resolved to paths by the parser's
//! pass (f), except where `accepts_literal_integer` kept them literal) and
//! mutates the shared `Context`.

use anyhow::{Context as _, Result, bail};
use std::path::{Path, PathBuf};

use crate::bookmarks::Bookmark;
use crate::context::Context;
use crate::errors::CoreErrorKind;
use crate::jump::{self, QueryScope};
use crate::logging::Severity;
use crate::opener::{self, OpenOutcome};
use crate::platform::{Archiver, Fs, MimeProber, Shell, Trash};
use crate::scanner::{self, ScanOptions};
use crate::sorter;

/// Resolve a possibly-relative argument against the current directory,
/// tilde-expanding first.
pub fn resolve_path(ctx: &Context, arg: &str) -> PathBuf {
    let expanded = crate::paths::expand_tilde(arg, ctx.home.as_deref());
    if expanded.is_absolute() {
        expanded
    } else {
        ctx.cwd.join(expanded)
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

pub fn cd(ctx: &mut Context, fs: &dyn Fs, target: Option<&str>, now: i64) -> Result<()> {
    let dest = match target {
        Some(t) => resolve_path(ctx, t),
        None => ctx
            .home
            .clone()
            .ok_or(CoreErrorKind::Input)
            .map_err(anyhow::Error::from)?,
    };
    if !fs.is_dir(&dest) {
        return Err(anyhow::Error::new(CoreErrorKind::Input)).context(format!("not a directory: {}", dest.display()));
    }
    ctx.navigate_to(dest.to_string_lossy().into_owned(), now);
    Ok(())
}

pub fn back(ctx: &mut Context) -> bool {
    ctx.navigate_back()
}

pub fn forth(ctx: &mut Context) -> bool {
    ctx.navigate_forth()
}

pub fn dir_history(ctx: &Context) -> Vec<String> {
    ctx.dir_history.paths().to_vec()
}

pub fn workspace(ctx: &mut Context, arg: Option<&str>, now: i64) -> Result<Option<String>> {
    let index: usize = match arg {
        Some(a) => a.parse().map_err(|_| CoreErrorKind::Input)?,
        None => return Ok(Some(ctx.workspaces.current_index().to_string())),
    };
    if index == 0 || index > 4 {
        return Err(anyhow::Error::new(CoreErrorKind::Input)).context("workspace index must be 1-4");
    }
    Ok(ctx.switch_workspace(index - 1, now))
}

pub fn jump(ctx: &Context, verb_alias: &str, tokens: &[String]) -> Vec<String> {
    let scope = match verb_alias {
        "jp" => QueryScope::Ancestors,
        "jc" => QueryScope::Descendants,
        _ => QueryScope::Any,
    };
    let cwd = ctx.cwd.to_string_lossy();
    jump::query(ctx.jump.entries(), tokens, &cwd, ctx.config.case_sensitive_jump, scope)
        .into_iter()
        .map(|e| e.path.clone())
        .collect()
}

pub fn pin(ctx: &mut Context) {
    ctx.pinned = Some(ctx.cwd.to_string_lossy().into_owned());
}

pub fn unpin(ctx: &mut Context) {
    ctx.pinned = None;
}

pub fn prev_dir(ctx: &Context) -> Option<String> {
    ctx.dir_history.paths().iter().rev().nth(1).cloned()
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Re-scan the current directory and re-sort, storing the result on
/// `ctx.last_listing`. Shared by `rf`/`refresh` and `rl`/`reload`; `reload`
/// additionally re-reads the config first.
pub fn rescan(ctx: &mut Context, fs: &dyn Fs) -> Result<()> {
    let opts = ScanOptions {
        show_hidden: ctx.config.show_hidden,
        only_dirs: false,
        filter: ctx.config.filter.clone(),
        light_mode: ctx.config.light_mode,
        count_children: !ctx.config.light_mode,
    };
    let mut entries = scanner::scan(fs, &ctx.cwd, &opts)?;
    sorter::sort(&mut entries, &ctx.config.sort);
    if let Some(max) = ctx.config.max_files {
        entries.truncate(max);
    }
    ctx.last_listing = entries;
    Ok(())
}

pub fn reload(ctx: &mut Context, fs: &dyn Fs) -> Result<()> {
    ctx.config = crate::config::Config::load(&ctx.paths.config_file()).unwrap_or_default();
    rescan(ctx, fs)
}

pub fn set_pager(ctx: &mut Context, on: Option<bool>) -> bool {
    ctx.config.pager_enabled = on.unwrap_or(!ctx.config.pager_enabled);
    ctx.config.pager_enabled
}

pub fn set_light_mode(ctx: &mut Context, on: Option<bool>) -> bool {
    ctx.config.light_mode = on.unwrap_or(!ctx.config.light_mode);
    ctx.config.light_mode
}

pub fn set_hidden(ctx: &mut Context, on: Option<bool>) -> bool {
    ctx.config.show_hidden = on.unwrap_or(!ctx.config.show_hidden);
    ctx.config.show_hidden
}

pub fn set_max_files(ctx: &mut Context, arg: Option<&str>) -> Result<Option<usize>> {
    match arg {
        None | Some("0") => ctx.config.max_files = None,
        Some(n) => ctx.config.max_files = Some(n.parse().map_err(|_| CoreErrorKind::Input)?),
    }
    Ok(ctx.config.max_files)
}

/// `ft PATTERN` compiles a regex into the scanner's filter; `ft unset` (or
/// no argument) clears it. Names matching the filter are excluded from the
/// next scan (§4.2, §4.9).
pub fn set_filter(ctx: &mut Context, pattern: Option<&str>) -> Result<Option<String>> {
    match pattern {
        None | Some("unset") => {
            ctx.config.filter = None;
            Ok(None)
        }
        Some(p) => {
            let re = regex::Regex::new(p).map_err(|_| CoreErrorKind::Input)?;
            let text = re.as_str().to_string();
            ctx.config.filter = Some(re);
            Ok(Some(text))
        }
    }
}

pub fn set_icons(ctx: &mut Context, on: Option<bool>) -> bool {
    ctx.config.icons_enabled = on.unwrap_or(!ctx.config.icons_enabled);
    ctx.config.icons_enabled
}

pub fn sort(ctx: &mut Context, arg: Option<&str>) -> Result<()> {
    if let Some(n) = arg {
        let method = n.parse::<u8>().map_err(|_| CoreErrorKind::Input)?;
        ctx.config.sort.method = sort_method_from_index(method)?;
    } else {
        ctx.config.sort.reverse = !ctx.config.sort.reverse;
    }
    Ok(())
}

fn sort_method_from_index(n: u8) -> Result<sorter::SortMethod> {
    use sorter::SortMethod::*;
    Ok(match n {
        0 => None,
        1 => Name,
        2 => Size,
        3 => Atime,
        4 => Btime,
        5 => Ctime,
        6 => Mtime,
        7 => Version,
        8 => Extension,
        9 => Inode,
        10 => Owner,
        11 => Group,
        _ => bail!(CoreErrorKind::Input),
    })
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

pub fn select(ctx: &mut Context, args: &[String]) -> usize {
    let mut resolved = Vec::new();
    for arg in args {
        resolved.extend(resolve_selection_pattern(ctx, arg));
    }
    ctx.selection.add(resolved)
}

pub fn deselect(ctx: &mut Context, args: &[String]) {
    if args.is_empty() || args.iter().any(|a| a == "*") {
        ctx.selection.clear();
        return;
    }
    if let Ok(indices) = args.iter().map(|a| a.parse::<usize>()).collect::<Result<Vec<_>, _>>() {
        ctx.selection.remove_indices(&indices);
        return;
    }
    let mut resolved = Vec::new();
    for arg in args {
        resolved.extend(resolve_selection_pattern(ctx, arg));
    }
    ctx.selection.remove_paths(&resolved);
}

/// Resolve one `sel`/`ds` argument against the current listing (§4.5): a
/// glob pattern or regex pattern matches listed names, a leading `!`
/// inverts the match set, anything else is a literal filename/path.
fn resolve_selection_pattern(ctx: &Context, arg: &str) -> Vec<String> {
    let (invert, pattern) = match arg.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, arg),
    };
    let names: Vec<&str> = ctx.last_listing.iter().map(|e| e.name.as_str()).collect();
    // A pattern that names a listed entry exactly is always literal, even
    // if it also happens to contain a regex metacharacter (e.g. "a.txt").
    let exact_match = !invert && names.contains(&pattern);

    let hits: Option<Vec<&str>> = if exact_match {
        None
    } else if has_glob_meta(pattern) {
        glob::Pattern::new(pattern)
            .ok()
            .map(|g| names.iter().copied().filter(|n| g.matches(n)).collect())
    } else if looks_like_selection_regex(pattern) {
        regex::Regex::new(pattern)
            .ok()
            .map(|re| names.iter().copied().filter(|n| re.is_match(n)).collect())
    } else {
        None
    };

    let selected: Vec<&str> = match hits {
        Some(hits) if invert => names.iter().copied().filter(|n| !hits.contains(n)).collect(),
        Some(hits) => hits,
        None if invert => names.iter().copied().filter(|n| *n != pattern).collect(),
        None => return vec![resolve_path(ctx, pattern).to_string_lossy().into_owned()],
    };
    selected
        .into_iter()
        .map(|n| resolve_path(ctx, n).to_string_lossy().into_owned())
        .collect()
}

fn has_glob_meta(s: &str) -> bool {
    s.contains('*') || s.contains('?') || s.contains('[')
}

fn looks_like_selection_regex(s: &str) -> bool {
    s.chars().any(|c| matches!(c, '.' | '^' | '$' | '+' | '(' | ')' | '|'))
}

pub fn selbox(ctx: &Context) -> &[String] {
    ctx.selection.list()
}

// ---------------------------------------------------------------------------
// File ops
// ---------------------------------------------------------------------------

pub fn open(
    ctx: &Context,
    fs: &dyn Fs,
    shell: &dyn Shell,
    mime: &dyn MimeProber,
    archiver: &dyn Archiver,
    target: &str,
    explicit_app: Option<&str>,
    background: bool,
) -> Result<OpenOutcome> {
    let path = resolve_path(ctx, target);
    let mime_list = fs
        .read_to_string(&ctx.paths.root.join("mimelist.cfm"))
        .unwrap_or_default();
    opener::open(fs, shell, mime, archiver, &path, explicit_app, background, &mime_list, &ctx.cwd)
}

/// Shell-wrapper commands (`c`/`l`/`m`/`md`/`r`): delegate verbatim to an
/// external coreutils-style command, joining ELN-expanded args.
pub fn shell_wrapper(ctx: &Context, shell: &dyn Shell, program: &str, args: &[String]) -> Result<i32> {
    let mut command = String::from(program);
    for arg in args {
        command.push(' ');
        command.push_str(&crate::paths::escape(arg));
    }
    match shell.run_foreground(&command, &ctx.cwd)? {
        crate::platform::SpawnOutcome::Exited(code) => Ok(code),
        crate::platform::SpawnOutcome::Signaled => Ok(130),
    }
}

pub fn toggle_exec(ctx: &Context, fs: &dyn Fs, targets: &[String]) -> Result<()> {
    for t in targets {
        let path = resolve_path(ctx, t);
        let currently_exec = fs.is_executable(&path);
        fs.set_executable(&path, !currently_exec)?;
    }
    Ok(())
}

/// `le LINK [NEW_TARGET]`: with one argument, report the symlink's current
/// target; with two, relink it to `NEW_TARGET` via `Fs::remove_file` +
/// `Fs::symlink` (§4.9's "le" file op).
pub fn edit_symlink(ctx: &Context, fs: &dyn Fs, args: &[String]) -> Result<String> {
    let Some(link_arg) = args.first() else {
        return Err(anyhow::Error::new(CoreErrorKind::Input)).context("le: missing symlink");
    };
    let link = resolve_path(ctx, link_arg);
    let current = fs
        .read_link(&link)
        .with_context(|| format!("le: not a symlink: {}", link.display()))?;
    match args.get(1) {
        None => Ok(current.to_string_lossy().into_owned()),
        Some(new_target) => {
            let target = resolve_path(ctx, new_target);
            fs.remove_file(&link)?;
            fs.symlink(&target, &link)?;
            Ok(target.to_string_lossy().into_owned())
        }
    }
}

/// `bl [DEST]`: symlink every selected file into `DEST` (the current
/// directory if omitted), named after its basename (§4.9's "bl" file op).
pub fn batch_link(ctx: &mut Context, fs: &dyn Fs, args: &[String]) -> Result<usize> {
    if ctx.selection.list().is_empty() {
        return Err(anyhow::Error::new(CoreErrorKind::Input)).context("bl: no files selected");
    }
    let dest = match args.first() {
        Some(d) => resolve_path(ctx, d),
        None => ctx.cwd.clone(),
    };
    let mut count = 0;
    for src in ctx.selection.list().to_vec() {
        let src_path = Path::new(&src);
        let Some(name) = src_path.file_name() else { continue };
        let link_path = dest.join(name);
        fs.symlink(src_path, &link_path)?;
        count += 1;
    }
    Ok(count)
}

/// `br OLD=NEW ...`: rename each listed target to its paired new name in
/// the same directory (§4.9's "br"/"bulk" file op — a non-interactive
/// stand-in for the source's editor-backed batch rename, since this crate
/// has no in-process text editor to spawn one through).
pub fn bulk_rename(ctx: &Context, fs: &dyn Fs, args: &[String]) -> Result<usize> {
    if args.is_empty() {
        return Err(anyhow::Error::new(CoreErrorKind::Input)).context("br: missing OLD=NEW pair(s)");
    }
    let mut count = 0;
    for pair in args {
        let Some((old, new)) = pair.split_once('=') else {
            return Err(anyhow::Error::new(CoreErrorKind::Input))
                .context(format!("br: expected OLD=NEW, got {pair}"));
        };
        let old_path = resolve_path(ctx, old);
        let new_path = match old_path.parent() {
            Some(parent) => parent.join(new),
            None => PathBuf::from(new),
        };
        fs.rename(&old_path, &new_path)?;
        count += 1;
    }
    Ok(count)
}

pub fn paste(ctx: &mut Context, fs: &dyn Fs, dest: &Path) -> Result<usize> {
    let mut count = 0;
    for src in ctx.selection.list().to_vec() {
        let src_path = Path::new(&src);
        let Some(name) = src_path.file_name() else { continue };
        let dest_path = dest.join(name);
        fs.rename(src_path, &dest_path)?;
        count += 1;
    }
    Ok(count)
}

pub fn trash(ctx: &mut Context, trash: &dyn Trash, targets: &[String]) -> Result<()> {
    let paths: Vec<PathBuf> = targets.iter().map(|t| resolve_path(ctx, t)).collect();
    trash.trash(&paths)?;
    let removed: Vec<String> = targets.iter().map(|t| resolve_path(ctx, t).to_string_lossy().into_owned()).collect();
    ctx.selection.remove_paths(&removed);
    Ok(())
}

pub fn untrash(trash: &dyn Trash, names: &[String]) -> Result<()> {
    trash.untrash(names)
}

pub fn mime_info(ctx: &Context, fs: &dyn Fs, mime: &dyn MimeProber, target: &str) -> opener::MimeInfo {
    let path = resolve_path(ctx, target);
    let mime_list = fs
        .read_to_string(&ctx.paths.root.join("mimelist.cfm"))
        .unwrap_or_default();
    opener::mime_info(fs, mime, &path, &mime_list)
}

// ---------------------------------------------------------------------------
// Config / profile
// ---------------------------------------------------------------------------

pub fn profile_switch(ctx: &mut Context, fs: &dyn Fs, name: &str, now: i64) -> Result<()> {
    ctx.save(fs, now)?;
    let fallback = ctx.cwd.clone();
    *ctx = Context::load(fs, name, &fallback)?;
    rescan(ctx, fs)
}

pub fn bookmark_add(ctx: &mut Context, shortcut: Option<&str>, name: Option<&str>, now: i64) -> Result<()> {
    let path = ctx.cwd.to_string_lossy().into_owned();
    ctx.bookmarks.add(Bookmark {
        shortcut: shortcut.map(str::to_string),
        name: name.map(str::to_string),
        path: path.clone(),
    })?;
    ctx.jump.mark_bookmarked(&path, true);
    let _ = now;
    Ok(())
}

pub fn bookmark_delete(ctx: &mut Context, key: &str) -> bool {
    let path = ctx.bookmarks.resolve(key).map(str::to_string);
    let found = ctx.bookmarks.delete(key);
    if found && let Some(path) = path {
        ctx.jump.mark_bookmarked(&path, false);
    }
    found
}

/// Outcome of the `bm`/`bookmarks` command (§4.7): either a menu listing
/// or a path to jump to, resolved from an ELN/NAME/SC response.
pub enum BookmarkOutcome {
    Listing(Vec<String>),
    JumpTo(String),
}

/// `bm` with no arguments lists every bookmark with its ELN; `bm add`
/// bookmarks the current directory (optionally under `bm add NAME`); `bm
/// del KEY` removes one; any other single argument is resolved as an
/// opener-menu response (ELN, NAME, or SC) and jumped to.
pub fn bookmarks(ctx: &mut Context, args: &[String], now: i64) -> Result<BookmarkOutcome> {
    match args.first().map(String::as_str) {
        None => Ok(BookmarkOutcome::Listing(
            ctx.bookmarks
                .entries()
                .iter()
                .enumerate()
                .map(|(i, b)| {
                    let sc = b.shortcut.as_deref().map(|s| format!("[{s}]")).unwrap_or_default();
                    let name = b.name.as_deref().unwrap_or("-");
                    format!("{} {sc}{name} -> {}", i + 1, b.path)
                })
                .collect(),
        )),
        Some("add") => {
            let name = args.get(1).map(String::as_str);
            bookmark_add(ctx, None, name, now)?;
            Ok(BookmarkOutcome::Listing(vec!["bookmark added".to_string()]))
        }
        Some("del") => {
            let Some(key) = args.get(1) else {
                return Err(anyhow::Error::new(CoreErrorKind::Input)).context("bm del: missing key");
            };
            if bookmark_delete(ctx, key) {
                Ok(BookmarkOutcome::Listing(vec!["bookmark deleted".to_string()]))
            } else {
                Err(anyhow::Error::new(CoreErrorKind::Input)).context(format!("no such bookmark: {key}"))
            }
        }
        Some("edit") => Ok(BookmarkOutcome::Listing(vec![format!(
            "bookmarks file: {}",
            ctx.paths.bookmarks_file().display()
        )])),
        Some(key) => match ctx.bookmarks.resolve(key) {
            Some(path) => Ok(BookmarkOutcome::JumpTo(path.to_string())),
            None => Err(anyhow::Error::new(CoreErrorKind::Input)).context(format!("no such bookmark: {key}")),
        },
    }
}

// ---------------------------------------------------------------------------
// Meta
// ---------------------------------------------------------------------------

pub fn history(ctx: &Context) -> Vec<String> {
    ctx.command_history.lines().map(str::to_string).collect()
}

pub fn log(ctx: &Context) -> Vec<String> {
    ctx.messages.all().map(|m| m.text.clone()).collect()
}

pub fn msg(ctx: &mut Context) -> Vec<String> {
    let out = ctx.messages.all().map(|m| m.text.clone()).collect();
    ctx.messages.mark_read();
    out
}

pub fn note(ctx: &mut Context, severity: Severity, text: impl Into<String>) {
    ctx.messages.push(severity, text);
}

/// `quit`/`q`/`exit` always persist state; `Q` additionally asks the
/// caller to write the "cd on quit" marker (§4.9's exit policy).
pub fn quit(ctx: &mut Context, fs: &dyn Fs, now: i64) -> Result<()> {
    ctx.save(fs, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::FakeFs;

    fn ctx_with_listing(fs: &FakeFs, names: &[&str]) -> Context {
        for name in names {
            fs.add_file(format!("/home/u/proj/{name}"), "x");
        }
        let mut ctx = Context::load(fs, "default", Path::new("/home/u/proj")).unwrap();
        ctx.navigate_to("/home/u/proj", 0);
        rescan(&mut ctx, fs).unwrap();
        ctx
    }

    #[test]
    fn select_glob_pattern_matches_listed_names() {
        let fs = FakeFs::new("/home/u");
        let mut ctx = ctx_with_listing(&fs, &["a.txt", "b.txt", "c.log"]);
        let n = select(&mut ctx, &["*.txt".to_string()]);
        assert_eq!(n, 2);
        assert!(ctx.selection.list().iter().any(|p| p.ends_with("a.txt")));
        assert!(ctx.selection.list().iter().any(|p| p.ends_with("b.txt")));
        assert!(!ctx.selection.list().iter().any(|p| p.ends_with("c.log")));
    }

    #[test]
    fn select_literal_name_with_dot_is_not_treated_as_regex() {
        let fs = FakeFs::new("/home/u");
        let mut ctx = ctx_with_listing(&fs, &["a.txt", "axtxt"]);
        let n = select(&mut ctx, &["a.txt".to_string()]);
        assert_eq!(n, 1);
        assert!(ctx.selection.list().iter().any(|p| p.ends_with("a.txt")));
        assert!(!ctx.selection.list().iter().any(|p| p.ends_with("axtxt")));
    }

    #[test]
    fn select_inverted_pattern_selects_everything_else() {
        let fs = FakeFs::new("/home/u");
        let mut ctx = ctx_with_listing(&fs, &["a.txt", "b.txt", "c.log"]);
        let n = select(&mut ctx, &["!*.txt".to_string()]);
        assert_eq!(n, 1);
        assert!(ctx.selection.list().iter().any(|p| p.ends_with("c.log")));
    }

    #[test]
    fn deselect_star_clears_the_whole_selection() {
        let fs = FakeFs::new("/home/u");
        let mut ctx = ctx_with_listing(&fs, &["a.txt", "b.txt"]);
        select(&mut ctx, &["*.txt".to_string()]);
        assert_eq!(ctx.selection.list().len(), 2);
        deselect(&mut ctx, &["*".to_string()]);
        assert!(ctx.selection.list().is_empty());
    }

    #[test]
    fn deselect_by_index_removes_just_that_entry() {
        let fs = FakeFs::new("/home/u");
        let mut ctx = ctx_with_listing(&fs, &["a.txt", "b.txt"]);
        select(&mut ctx, &["*.txt".to_string()]);
        deselect(&mut ctx, &["1".to_string()]);
        assert_eq!(ctx.selection.list().len(), 1);
    }

    #[test]
    fn set_filter_compiles_pattern_and_unset_clears_it() {
        let fs = FakeFs::new("/home/u");
        let mut ctx = ctx_with_listing(&fs, &["keep.txt", "drop.bak"]);
        set_filter(&mut ctx, Some(r"\.bak$")).unwrap();
        rescan(&mut ctx, &fs).unwrap();
        assert_eq!(ctx.last_listing.len(), 1);
        assert_eq!(ctx.last_listing[0].name, "keep.txt");

        set_filter(&mut ctx, None).unwrap();
        rescan(&mut ctx, &fs).unwrap();
        assert_eq!(ctx.last_listing.len(), 2);
    }

    #[test]
    fn edit_symlink_with_one_arg_reports_current_target() {
        let fs = FakeFs::new("/home/u");
        let ctx = ctx_with_listing(&fs, &[]);
        fs.add_file("/home/u/real.txt", "x");
        fs.add_symlink("/home/u/proj/link", "/home/u/real.txt");
        let target = edit_symlink(&ctx, &fs, &["link".to_string()]).unwrap();
        assert_eq!(target, "/home/u/real.txt");
    }

    #[test]
    fn edit_symlink_with_two_args_relinks_to_new_target() {
        let fs = FakeFs::new("/home/u");
        let ctx = ctx_with_listing(&fs, &[]);
        fs.add_file("/home/u/old.txt", "x");
        fs.add_file("/home/u/new.txt", "y");
        fs.add_symlink("/home/u/proj/link", "/home/u/old.txt");
        let target = edit_symlink(
            &ctx,
            &fs,
            &["link".to_string(), "/home/u/new.txt".to_string()],
        )
        .unwrap();
        assert_eq!(target, "/home/u/new.txt");
        assert_eq!(fs.read_link(Path::new("/home/u/proj/link")).unwrap(), Path::new("/home/u/new.txt"));
    }

    #[test]
    fn edit_symlink_on_non_symlink_errors() {
        let fs = FakeFs::new("/home/u");
        let ctx = ctx_with_listing(&fs, &["plain.txt"]);
        assert!(edit_symlink(&ctx, &fs, &["plain.txt".to_string()]).is_err());
    }

    #[test]
    fn batch_link_creates_a_symlink_per_selected_file_in_dest() {
        let fs = FakeFs::new("/home/u");
        let mut ctx = ctx_with_listing(&fs, &["a.txt", "b.txt"]);
        fs.add_dir("/home/u/out");
        select(&mut ctx, &["*.txt".to_string()]);
        let n = batch_link(&mut ctx, &fs, &["/home/u/out".to_string()]).unwrap();
        assert_eq!(n, 2);
        assert_eq!(
            fs.read_link(Path::new("/home/u/out/a.txt")).unwrap(),
            Path::new("/home/u/proj/a.txt")
        );
        assert_eq!(
            fs.read_link(Path::new("/home/u/out/b.txt")).unwrap(),
            Path::new("/home/u/proj/b.txt")
        );
    }

    #[test]
    fn batch_link_without_selection_errors() {
        let fs = FakeFs::new("/home/u");
        let mut ctx = ctx_with_listing(&fs, &["a.txt"]);
        assert!(batch_link(&mut ctx, &fs, &[]).is_err());
    }

    #[test]
    fn bulk_rename_renames_each_old_new_pair() {
        let fs = FakeFs::new("/home/u");
        let ctx = ctx_with_listing(&fs, &["a.txt", "b.txt"]);
        let n = bulk_rename(
            &ctx,
            &fs,
            &["a.txt=a2.txt".to_string(), "b.txt=b2.txt".to_string()],
        )
        .unwrap();
        assert_eq!(n, 2);
        assert!(fs.exists(Path::new("/home/u/proj/a2.txt")));
        assert!(fs.exists(Path::new("/home/u/proj/b2.txt")));
        assert!(!fs.exists(Path::new("/home/u/proj/a.txt")));
    }

    #[test]
    fn bulk_rename_rejects_a_pair_missing_the_equals_separator() {
        let fs = FakeFs::new("/home/u");
        let ctx = ctx_with_listing(&fs, &["a.txt"]);
        assert!(bulk_rename(&ctx, &fs, &["a.txt".to_string()]).is_err());
    }
}
