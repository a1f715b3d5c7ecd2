//! The dispatcher: routes a resolved `Verb` plus its
//! already-expanded argument words to the matching handler, and decides
//! the post-command bookkeeping (re-list, exit, message log).

use anyhow::{Context as _, Result};

use crate::context::Context;
use crate::errors::CoreErrorKind;
use crate::logging::Severity;
use crate::platform::{Archiver, Fs, MimeProber, Prompter, Shell, Trash};

use super::handlers;
use super::Verb;

/// Everything a command can do to the session that isn't expressed in its
/// return value: print a message, trigger a re-list, or end the session.
pub struct DispatchOutcome {
    pub message: Option<String>,
    pub rescan: bool,
    pub should_exit: bool,
    pub cd_on_quit_marker: bool,
}

impl DispatchOutcome {
    fn plain(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            rescan: false,
            should_exit: false,
            cd_on_quit_marker: false,
        }
    }

    fn quiet() -> Self {
        Self {
            message: None,
            rescan: false,
            should_exit: false,
            cd_on_quit_marker: false,
        }
    }

    fn with_rescan(mut self) -> Self {
        self.rescan = true;
        self
    }
}

/// External collaborators threaded through every dispatch call (design
/// note §9: the dispatcher is the one place that needs all of them).
pub struct Collaborators<'a> {
    pub fs: &'a dyn Fs,
    pub shell: &'a dyn Shell,
    pub prompter: &'a dyn Prompter,
    pub mime: &'a dyn MimeProber,
    pub trash: &'a dyn Trash,
    pub archiver: &'a dyn Archiver,
}

/// Run one parsed command. `alias` is the literal first word (needed to
/// distinguish `jp`/`jc`/`j` which all resolve to `Verb::Jump`, and
/// `c`/`l`/`m`/`md`/`r` which all resolve to `Verb::ShellWrapper`).
pub fn dispatch(
    verb: Verb,
    alias: &str,
    args: &[String],
    ctx: &mut Context,
    collab: &Collaborators,
    now: i64,
) -> Result<DispatchOutcome> {
    match verb {
        Verb::Cd => {
            handlers::cd(ctx, collab.fs, args.first().map(String::as_str), now)?;
            Ok(DispatchOutcome::quiet().with_rescan())
        }
        Verb::Back => Ok(if handlers::back(ctx) {
            DispatchOutcome::quiet().with_rescan()
        } else {
            DispatchOutcome::plain("no earlier directory")
        }),
        Verb::Forth => Ok(if handlers::forth(ctx) {
            DispatchOutcome::quiet().with_rescan()
        } else {
            DispatchOutcome::plain("no later directory")
        }),
        Verb::DirHistory => Ok(DispatchOutcome::plain(handlers::dir_history(ctx).join("\n"))),
        Verb::Workspace => {
            let result = handlers::workspace(ctx, args.first().map(String::as_str), now)?;
            Ok(match result {
                Some(path) => DispatchOutcome::plain(path).with_rescan(),
                None => DispatchOutcome::quiet(),
            })
        }
        Verb::Jump => {
            let matches = handlers::jump(ctx, alias, args);
            Ok(DispatchOutcome::plain(matches.join("\n")))
        }
        Verb::Bookmark => match handlers::bookmarks(ctx, args, now)? {
            handlers::BookmarkOutcome::Listing(lines) => Ok(DispatchOutcome::plain(lines.join("\n"))),
            handlers::BookmarkOutcome::JumpTo(path) => {
                handlers::cd(ctx, collab.fs, Some(path.as_str()), now)?;
                Ok(DispatchOutcome::quiet().with_rescan())
            }
        },
        Verb::Pin => {
            handlers::pin(ctx);
            Ok(DispatchOutcome::plain("directory pinned"))
        }
        Verb::Unpin => {
            handlers::unpin(ctx);
            Ok(DispatchOutcome::plain("pin cleared"))
        }
        Verb::PrevDir => Ok(DispatchOutcome::plain(
            handlers::prev_dir(ctx).unwrap_or_else(|| "no previous directory".to_string()),
        )),

        Verb::Refresh => {
            handlers::rescan(ctx, collab.fs)?;
            Ok(DispatchOutcome::quiet())
        }
        Verb::Reload => {
            handlers::reload(ctx, collab.fs)?;
            Ok(DispatchOutcome::quiet())
        }
        Verb::Ls => {
            if args.iter().any(|a| a == "-l" || a == "long") {
                ctx.config.long_view = true;
            } else if args.iter().any(|a| a == "-c" || a == "short") {
                ctx.config.long_view = false;
            }
            Ok(DispatchOutcome::quiet().with_rescan())
        }
        Verb::Columns => {
            ctx.config.long_view = false;
            Ok(DispatchOutcome::quiet().with_rescan())
        }
        Verb::Pager => {
            let on = handlers::set_pager(ctx, parse_onoff(args.first()));
            Ok(DispatchOutcome::plain(format!("pager {}", onoff(on))))
        }
        Verb::LightMode => {
            let on = handlers::set_light_mode(ctx, parse_onoff(args.first()));
            Ok(DispatchOutcome::plain(format!("light mode {}", onoff(on))).with_rescan())
        }
        Verb::Filter => {
            let arg = args.first().map(String::as_str);
            let result = handlers::set_filter(ctx, arg)?;
            Ok(DispatchOutcome::plain(match result {
                Some(pattern) => format!("filter: {pattern}"),
                None => "filter unset".to_string(),
            })
            .with_rescan())
        }
        Verb::Hidden => {
            let on = handlers::set_hidden(ctx, parse_onoff(args.first()));
            Ok(DispatchOutcome::plain(format!("hidden files {}", onoff(on))).with_rescan())
        }
        Verb::MaxFiles => {
            let max = handlers::set_max_files(ctx, args.first().map(String::as_str))?;
            Ok(DispatchOutcome::plain(match max {
                Some(n) => format!("max files: {n}"),
                None => "max files: unlimited".to_string(),
            })
            .with_rescan())
        }
        Verb::Icons => {
            let on = handlers::set_icons(ctx, parse_onoff(args.first()));
            Ok(DispatchOutcome::plain(format!("icons {}", onoff(on))))
        }
        Verb::Sort => {
            handlers::sort(ctx, args.first().map(String::as_str))?;
            Ok(DispatchOutcome::quiet().with_rescan())
        }
        Verb::ColorSchemes => Ok(DispatchOutcome::plain("color schemes not supported in this build")),

        Verb::Select => {
            let n = handlers::select(ctx, args);
            ctx.selection
                .save(collab.fs, &ctx.paths.selection_file())
                .context("failed to persist selection")?;
            Ok(DispatchOutcome::plain(format!("{n} file(s) selected")))
        }
        Verb::Deselect => {
            handlers::deselect(ctx, args);
            ctx.selection
                .save(collab.fs, &ctx.paths.selection_file())
                .context("failed to persist selection")?;
            Ok(DispatchOutcome::quiet())
        }
        Verb::SelBox => Ok(DispatchOutcome::plain(handlers::selbox(ctx).join("\n"))),

        Verb::Open => {
            let Some(target) = args.first() else {
                return Err(anyhow::Error::new(CoreErrorKind::Input)).context("open: missing file");
            };
            let background = args.len() > 1 && args.last().map(String::as_str) == Some("&");
            let app_end = if background { args.len() - 1 } else { args.len() };
            let explicit_app = args.get(1..app_end).and_then(|s| s.first()).map(String::as_str);
            let outcome = handlers::open(
                ctx,
                collab.fs,
                collab.shell,
                collab.mime,
                collab.archiver,
                target,
                explicit_app,
                background,
            )?;
            if outcome == crate::opener::OpenOutcome::DelegatedCd {
                handlers::cd(ctx, collab.fs, Some(target.as_str()), now)?;
            }
            Ok(describe_open(outcome))
        }
        Verb::ShellWrapper => {
            let code = handlers::shell_wrapper(ctx, collab.shell, alias, args)?;
            Ok(DispatchOutcome::quiet().with_rescan().tap_exit_code(ctx, code))
        }
        Verb::EditSymlink => {
            let target = handlers::edit_symlink(ctx, collab.fs, args)?;
            Ok(DispatchOutcome::plain(format!("link target: {target}")).with_rescan())
        }
        Verb::BatchLink => {
            let n = handlers::batch_link(ctx, collab.fs, args)?;
            Ok(DispatchOutcome::plain(format!("{n} link(s) created")).with_rescan())
        }
        Verb::BulkRename => {
            let n = handlers::bulk_rename(ctx, collab.fs, args)?;
            Ok(DispatchOutcome::plain(format!("{n} file(s) renamed")).with_rescan())
        }
        Verb::ToggleExec => {
            handlers::toggle_exec(ctx, collab.fs, args)?;
            Ok(DispatchOutcome::quiet().with_rescan())
        }
        Verb::Paste => {
            let n = handlers::paste(ctx, collab.fs, &ctx.cwd.clone())?;
            Ok(DispatchOutcome::plain(format!("{n} file(s) pasted")).with_rescan())
        }
        Verb::Trash => {
            handlers::trash(ctx, collab.trash, args)?;
            ctx.selection
                .save(collab.fs, &ctx.paths.selection_file())
                .context("failed to persist selection")?;
            Ok(DispatchOutcome::quiet().with_rescan())
        }
        Verb::Untrash => {
            handlers::untrash(collab.trash, args)?;
            Ok(DispatchOutcome::quiet().with_rescan())
        }
        Verb::Archive => {
            let looks = args.first().map(|p| collab.archiver.looks_like_archive(std::path::Path::new(p)));
            Ok(DispatchOutcome::plain(format!("archive support: {looks:?} (declined in this build)")))
        }
        Verb::Export => Ok(DispatchOutcome::plain("export not supported in this build")),
        Verb::Mime => {
            let Some(target) = args.first() else {
                return Err(anyhow::Error::new(CoreErrorKind::Input)).context("mime: missing file");
            };
            let info = handlers::mime_info(ctx, collab.fs, collab.mime, target);
            Ok(DispatchOutcome::plain(format!(
                "type: {}\nextension: {}\napp: {}",
                info.mime_type,
                info.extension.unwrap_or_default(),
                info.resolved_app.unwrap_or_else(|| "none".to_string())
            )))
        }

        Verb::Profile => {
            let Some(name) = args.first() else {
                return Ok(DispatchOutcome::plain(ctx.profile.clone()));
            };
            handlers::profile_switch(ctx, collab.fs, name, now)?;
            Ok(DispatchOutcome::quiet().with_rescan())
        }
        Verb::Keybinds => Ok(DispatchOutcome::plain("keybinds not supported in this build")),
        Verb::Alias => Ok(DispatchOutcome::plain("aliases not supported in this build")),
        Verb::Opener => Ok(DispatchOutcome::plain("edit the mime list file directly")),
        Verb::Shell => Ok(DispatchOutcome::plain("shell switching not supported in this build")),
        Verb::Edit => Ok(DispatchOutcome::plain(format!(
            "config file: {}",
            ctx.paths.config_file().display()
        ))),
        Verb::Actions => Ok(DispatchOutcome::plain("custom actions not supported in this build")),

        Verb::History => Ok(DispatchOutcome::plain(handlers::history(ctx).join("\n"))),
        Verb::Log => Ok(DispatchOutcome::plain(handlers::log(ctx).join("\n"))),
        Verb::Msg => Ok(DispatchOutcome::plain(handlers::msg(ctx).join("\n"))),
        Verb::Cmd => {
            let Some(cmd) = args.first() else {
                return Err(anyhow::Error::new(CoreErrorKind::Input)).context("cmd: missing command");
            };
            let output = collab.shell.capture(cmd, &ctx.cwd)?;
            Ok(DispatchOutcome::plain(output))
        }
        Verb::Help => Ok(DispatchOutcome::plain("see the project README for command help")),
        Verb::Version => Ok(DispatchOutcome::plain(env!("CARGO_PKG_VERSION"))),
        Verb::Colors => Ok(DispatchOutcome::plain("colors follow LS_COLORS")),
        Verb::Mountpoints => Ok(DispatchOutcome::plain("mountpoint listing not supported in this build")),
        Verb::FreeSoftware => Ok(DispatchOutcome::plain(
            "this program is free software; see the project license",
        )),
        Verb::Tips => Ok(DispatchOutcome::plain("use `j` to jump to a frequent directory")),
        Verb::Splash => Ok(DispatchOutcome::plain("fileman")),
        Verb::Bonus => Ok(DispatchOutcome::quiet()),
        Verb::NewInstance => Ok(DispatchOutcome::plain("new-instance spawning not supported in this build")),

        Verb::Quit => {
            handlers::quit(ctx, collab.fs, now)?;
            Ok(DispatchOutcome {
                message: None,
                rescan: false,
                should_exit: true,
                cd_on_quit_marker: alias == "Q",
            })
        }
    }
}

impl DispatchOutcome {
    fn tap_exit_code(self, ctx: &mut Context, code: i32) -> Self {
        ctx.exit_code = code;
        self
    }
}

fn describe_open(outcome: crate::opener::OpenOutcome) -> DispatchOutcome {
    use crate::opener::OpenOutcome::*;
    match outcome {
        Spawned | SpawnedBackground => DispatchOutcome::quiet().with_rescan(),
        DelegatedCd => DispatchOutcome::quiet().with_rescan(),
        DelegatedArchive => DispatchOutcome::plain("archive extraction is not supported in this build"),
        NoAppFound => DispatchOutcome::plain("no application found to open this file"),
    }
}

fn parse_onoff(arg: Option<&String>) -> Option<bool> {
    match arg.map(String::as_str) {
        Some("on") => Some(true),
        Some("off") => Some(false),
        _ => None,
    }
}

fn onoff(b: bool) -> &'static str {
    if b {
        "on"
    } else {
        "off"
    }
}

/// Unknown-command path (autocd/auto-open and external
/// fallback): not a registered verb.
pub fn suggest(unknown: &str) -> Option<&'static str> {
    const KNOWN: &[&str] = &[
        "cd", "back", "forth", "ws", "jump", "bm", "pin", "unpin", "refresh", "reload", "ls", "pager",
        "hidden", "icons", "sort", "select", "deselect", "selbox", "open", "trash", "untrash",
        "mime", "profile", "history", "log", "msg", "help", "quit",
    ];
    crate::config::suggest_command(unknown, KNOWN.iter().copied())
}

#[allow(dead_code)]
fn note_error(ctx: &mut Context, text: impl Into<String>) {
    handlers::note(ctx, Severity::Error, text);
}
