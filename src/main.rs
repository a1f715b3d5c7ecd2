//! fileman — a keyboard-driven terminal file manager core.
//!
//! Parses CLI arguments, loads the active profile's persisted state, and
//! runs the interactive command loop: read a line, parse and expand it,
//! dispatch the resolved verb or fall back to autocd / auto-open / an
//! external command, then re-list and re-render as needed.

mod bookmarks;
mod cli;
mod commands;
mod config;
mod context;
mod errors;
mod history;
mod jump;
mod layout;
mod lock;
mod logging;
mod opener;
mod parser;
mod paths;
mod platform;
mod scanner;
mod selection;
mod sorter;
mod uservars;
mod workspace;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;

use cli::Cli;
use commands::dispatch::{self, Collaborators};
use context::{Context as AppContext, ProfilePaths};
use errors::CoreErrorKind;
use logging::Severity;
use parser::{ParseContext, ParseOutcome};
use platform::{
    Fs, LineEditor, Locker, RealArchiver, RealFs, RealLineEditor, RealLocker, RealMimeProber,
    RealPrompter, RealShell, RealTrash, Shell, SpawnOutcome,
};

fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Current terminal dimensions, falling back to 80x24 when stdout isn't a
/// TTY or the ioctl fails.
fn terminal_size() -> (usize, usize) {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let ok = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) } == 0;
    if ok && ws.ws_col > 0 && ws.ws_row > 0 {
        (ws.ws_col as usize, ws.ws_row as usize)
    } else {
        (80, 24)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose, cli.quiet);
    platform::job::ignore_job_control_signals();

    let fs = RealFs;
    let paths = ProfilePaths::new(&cli.profile);
    fs.create_dir_all(&paths.root)
        .context("failed to create profile directory")?;

    let mut locker = RealLocker::new(paths.root.join(".lock"))?;
    lock::acquire_lock(&mut locker, Duration::from_secs(5))?;

    let fallback_dir = std::env::current_dir().context("failed to read current directory")?;
    let mut ctx = AppContext::load(&fs, &cli.profile, &fallback_dir)?;

    if let Some(path) = &cli.path {
        let target = commands::handlers::resolve_path(&ctx, &path.to_string_lossy());
        if fs.is_dir(&target) {
            ctx.navigate_to(target.to_string_lossy().into_owned(), now());
        }
    }

    let stdin_temp_dir = if stdin_is_tty() {
        None
    } else {
        enter_stdin_mode(&mut ctx, &fs, now())?
    };

    let trash_dir = fs.data_dir().unwrap_or_else(|| paths.root.clone());
    let trash = RealTrash::new(trash_dir)?;
    let archiver = RealArchiver;
    let mime = RealMimeProber;
    let shell = RealShell;
    let prompter = RealPrompter;
    let collab = Collaborators {
        fs: &fs,
        shell: &shell,
        prompter: &prompter,
        mime: &mime,
        trash: &trash,
        archiver: &archiver,
    };

    let mut editor = RealLineEditor::new(Some(paths.command_history_file()))?;

    commands::handlers::rescan(&mut ctx, &fs)?;
    render(&ctx);

    let exit_code = loop {
        let prompt = prompt_for(&ctx);
        let Some(line) = editor.read_line(&prompt) else {
            break 0;
        };
        if line.trim().is_empty() {
            continue;
        }
        editor.add_history(&line);
        ctx.command_history.push(line.clone());

        match run_line(&line, &mut ctx, &fs, &shell, &collab, stdin_temp_dir.as_deref()) {
            Ok(LineOutcome::Continue) => {}
            Ok(LineOutcome::Exit(code)) => break code,
            Err(err) => {
                ctx.exit_code = CoreErrorKind::of(&err).map(CoreErrorKind::exit_code).unwrap_or(1);
                let message = errors::user_message("fileman", &line, format!("{err:#}"));
                eprintln!("{message}");
                commands::handlers::note(&mut ctx, Severity::Error, message);
            }
        }
    };

    ctx.save(&fs, now())?;
    if let Some(temp_dir) = &stdin_temp_dir {
        let _ = fs.remove_dir_all(temp_dir);
    }
    locker.unlock().ok();
    std::process::exit(exit_code);
}

/// True when stdin is not a TTY, the trigger for stdin mode (§6).
fn stdin_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

/// Reads paths from stdin (one per line), symlinks each into a fresh temp
/// directory, and chdirs into it before the REPL starts (§6). Returns
/// `None` if stdin yielded no usable lines, leaving the cwd untouched.
fn enter_stdin_mode(ctx: &mut AppContext, fs: &RealFs, now: i64) -> Result<Option<PathBuf>> {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        return Ok(None);
    }

    let temp_dir = std::env::temp_dir().join(format!("fileman.{}.stdin", std::process::id()));
    fs.create_dir_all(&temp_dir).context("failed to create stdin temp directory")?;

    for line in &lines {
        let target = commands::handlers::resolve_path(ctx, line);
        let Some(name) = target.file_name() else {
            continue;
        };
        let link = temp_dir.join(name);
        let _ = fs.symlink(&target, &link);
    }

    ctx.navigate_to(temp_dir.to_string_lossy().into_owned(), now);
    Ok(Some(temp_dir))
}

enum LineOutcome {
    Continue,
    Exit(i32),
}

/// Run one input line through the parser, dispatch its segments in order
/// (honoring `&&` chaining), and report whether the session should exit.
fn run_line(
    line: &str,
    ctx: &mut AppContext,
    fs: &RealFs,
    shell: &RealShell,
    collab: &Collaborators,
    stdin_temp_dir: Option<&std::path::Path>,
) -> Result<LineOutcome> {
    let outcome = {
        let entry_names: Vec<String> = ctx.last_listing.iter().map(|e| e.name.clone()).collect();
        let selection: Vec<String> = ctx.selection.list().to_vec();
        let mut bookmark_names: Vec<String> = Vec::new();
        for b in ctx.bookmarks.entries() {
            if let Some(name) = &b.name {
                bookmark_names.push(name.clone());
            }
            if let Some(sc) = &b.shortcut {
                bookmark_names.push(sc.clone());
            }
        }
        let resolve_bookmark = |key: &str| ctx.bookmarks.resolve(key).map(str::to_string);
        let lookup_var = |name: &str| ctx.user_vars.get(name).map(str::to_string);
        let resolve_symlink =
            |rel: &str| fs.read_link(&ctx.cwd.join(rel)).ok().map(|p| p.to_string_lossy().into_owned());
        let capture_command = |cmd: &str| shell.capture(cmd, &ctx.cwd).ok();
        let path_exists = |rel: &str| fs.exists(&ctx.cwd.join(rel));
        let glob_expand = |pattern: &str| fs.glob(&ctx.cwd, pattern);
        let in_stdin_temp_dir = stdin_temp_dir == Some(ctx.cwd.as_path());

        let pc = ParseContext {
            entry_names: &entry_names,
            selection: &selection,
            pinned: ctx.pinned.as_deref(),
            bookmark_names: &bookmark_names,
            resolve_bookmark: &resolve_bookmark,
            expand_bookmarks: ctx.config.expand_bookmarks,
            trash_as_rm: ctx.config.trash_as_rm,
            lookup_var: &lookup_var,
            in_stdin_temp_dir,
            resolve_symlink: &resolve_symlink,
            home: ctx.home.as_deref(),
            cwd: ctx.cwd.as_path(),
            glob_expand: &glob_expand,
            capture_command: &capture_command,
            path_exists: &path_exists,
        };
        parser::parse(line, &pc)?
    };

    match outcome {
        ParseOutcome::Assignment(name, value) => {
            ctx.user_vars.set(name, value);
            Ok(LineOutcome::Continue)
        }
        ParseOutcome::ShellPassthrough(command) => {
            run_external(ctx, shell, &command)?;
            Ok(LineOutcome::Continue)
        }
        ParseOutcome::Segments(segments) => {
            let mut last_failed = false;
            let mut exit_code = None;
            for segment in segments {
                if segment.conditional_and && last_failed {
                    continue;
                }
                match run_segment(ctx, fs, shell, collab, &segment.tokens)? {
                    SegmentOutcome::Ran => last_failed = false,
                    SegmentOutcome::Failed => last_failed = true,
                    SegmentOutcome::Exit(code) => {
                        exit_code = Some(code);
                        break;
                    }
                }
            }
            match exit_code {
                Some(code) => Ok(LineOutcome::Exit(code)),
                None => Ok(LineOutcome::Continue),
            }
        }
    }
}

enum SegmentOutcome {
    Ran,
    Failed,
    Exit(i32),
}

fn run_segment(
    ctx: &mut AppContext,
    fs: &RealFs,
    shell: &RealShell,
    collab: &Collaborators,
    tokens: &[String],
) -> Result<SegmentOutcome> {
    let Some(alias) = tokens.first() else {
        return Ok(SegmentOutcome::Ran);
    };
    let args = &tokens[1..];

    if let Some(verb) = commands::resolve(alias) {
        let result = dispatch::dispatch(verb, alias, args, ctx, collab, now())?;
        if let Some(message) = &result.message {
            println!("{message}");
        }
        if result.rescan {
            commands::handlers::rescan(ctx, fs)?;
            render(ctx);
        }
        if result.should_exit {
            if result.cd_on_quit_marker {
                write_cd_on_quit_marker(ctx);
            }
            return Ok(SegmentOutcome::Exit(ctx.exit_code));
        }
        return Ok(SegmentOutcome::Ran);
    }

    if tokens.len() == 1 && autocd_or_open(ctx, fs, shell, alias)? {
        render(ctx);
        return Ok(SegmentOutcome::Ran);
    }

    if let Some(suggestion) = dispatch::suggest(alias) {
        println!("no such command: {alias} (did you mean `{suggestion}`?)");
        return Ok(SegmentOutcome::Failed);
    }

    let command = tokens.join(" ");
    let code = run_external(ctx, shell, &command)?;
    if code == 0 {
        Ok(SegmentOutcome::Ran)
    } else {
        Ok(SegmentOutcome::Failed)
    }
}

/// A bare word matching a listed entry: `autocd` jumps into a directory,
/// `auto_open` opens a regular file, both without requiring `cd`/`o` first
/// (the unknown-command fallback).
fn autocd_or_open(ctx: &mut AppContext, fs: &RealFs, shell: &RealShell, word: &str) -> Result<bool> {
    let Some(entry) = ctx.last_listing.iter().find(|e| e.name == word) else {
        return Ok(false);
    };
    if entry.is_dir_like() {
        if ctx.config.autocd {
            let path = commands::handlers::resolve_path(ctx, word);
            ctx.navigate_to(path.to_string_lossy().into_owned(), now());
            return Ok(true);
        }
        return Ok(false);
    }
    if ctx.config.auto_open {
        let archiver = RealArchiver;
        let mime = RealMimeProber;
        let outcome = commands::handlers::open(ctx, fs, shell, &mime, &archiver, word, None, false)?;
        return Ok(outcome != opener::OpenOutcome::NoAppFound);
    }
    Ok(false)
}

fn run_external(ctx: &mut AppContext, shell: &RealShell, command: &str) -> Result<i32> {
    let outcome = shell.run_foreground(command, &ctx.cwd)?;
    let code = match outcome {
        SpawnOutcome::Exited(code) => code,
        SpawnOutcome::Signaled => 130,
    };
    ctx.exit_code = code;
    Ok(code)
}

/// `Q` (quit with cd-on-exit) writes the current directory to a marker file
/// a shell wrapper function can `cd` into after this process exits (§4.9).
fn write_cd_on_quit_marker(ctx: &AppContext) {
    let marker = std::env::temp_dir().join(format!("fileman.{}.lastdir", std::process::id()));
    let _ = std::fs::write(marker, ctx.cwd.to_string_lossy().as_bytes());
}

fn prompt_for(ctx: &AppContext) -> String {
    let cwd = paths::home_abbreviate(&ctx.cwd.to_string_lossy(), ctx.home.as_deref());
    match ctx.messages.indicator() {
        Some(flag) => format!("[{flag}] {cwd} > "),
        None => format!("{cwd} > "),
    }
}

/// Re-render the current listing, paging through `layout::Paginator` when
/// it overflows the terminal. An empty directory emits the synthetic
/// `. ..` line rather than nothing (§8).
fn render(ctx: &AppContext) {
    if ctx.last_listing.is_empty() {
        println!(". ..");
        return;
    }
    let (cols, rows) = terminal_size();
    let lines = if ctx.config.long_view {
        render_long(ctx, cols)
    } else {
        let longest = layout::longest_width(&ctx.last_listing, ctx.config.icons_enabled, ctx.config.classify);
        let columns = layout::column_count(cols, longest, ctx.last_listing.len());
        layout::render_columns(
            &ctx.last_listing,
            columns,
            longest,
            ctx.config.icons_enabled,
            ctx.config.classify,
            1,
        )
    };

    if !ctx.config.pager_enabled {
        for line in &lines {
            println!("{line}");
        }
        return;
    }

    let mut paginator = layout::Paginator::new(lines.len(), rows);
    for (shown, line) in lines.iter().enumerate() {
        println!("{line}");
        paginator.advance_rows(1);
        if paginator.should_block() && shown + 1 < lines.len() && !wait_for_pager_key(&mut paginator) {
            break;
        }
    }
}

/// `ls -l`-style rendering: one `layout::render_long_line` per entry.
/// ACL detection isn't wired up, so the ACL marker column is never set.
fn render_long(ctx: &AppContext, term_cols: usize) -> Vec<String> {
    ctx.last_listing
        .iter()
        .enumerate()
        .map(|(idx, entry)| layout::render_long_line(entry, idx + 1, false, term_cols))
        .collect()
}

/// Block for a single keypress at a pager stop, returning false if the user
/// asked to stop paging (`q`).
fn wait_for_pager_key(paginator: &mut layout::Paginator) -> bool {
    use std::io::Read;
    print!("--More--");
    let _ = std::io::Write::flush(&mut std::io::stdout());
    let mut byte = [0u8; 1];
    if std::io::stdin().read_exact(&mut byte).is_err() {
        return false;
    }
    !matches!(paginator.handle_key(byte[0] as char), layout::PagerAction::Stop)
}
