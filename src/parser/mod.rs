//! Input parser/expander: the core's hot spot. An input
//! line goes through a strictly ordered sequence of passes, each a pure
//! function producing a fresh `Vec<Token>` — no pass observes a later
//! pass' output, and an earlier pass' output is the next pass' only input.

mod expand;
mod substitute;

use anyhow::{Result, bail};

use crate::commands;

pub type Token = String;

/// One independently-dispatchable segment of the input line, produced by
/// pass (c). `conditional_and` is true when this segment was joined to the
/// previous one by `&&` (abort the chain if the previous segment failed);
/// false for `;` (always run).
#[derive(Debug, Clone)]
pub struct Segment {
    pub tokens: Vec<Token>,
    pub conditional_and: bool,
}

/// The fully parsed result of one input line.
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    /// First non-space byte was `;`/`:`, or the whole line is a
    /// `NAME=VALUE` assignment whose shell-passthrough guard fired.
    ShellPassthrough(String),
    /// A bare `NAME=VALUE` line — recorded as a user variable, nothing
    /// else happens.
    Assignment(String, String),
    /// One or more segments to dispatch in order.
    Segments(Vec<Segment>),
}

/// Everything the parser needs to resolve ELNs, `sel`, bookmarks, pinned
/// directory, and user variables, without owning any of it.
pub struct ParseContext<'a> {
    pub entry_names: &'a [String],
    pub selection: &'a [String],
    pub pinned: Option<&'a str>,
    pub bookmark_names: &'a [String],
    pub resolve_bookmark: &'a dyn Fn(&str) -> Option<String>,
    pub expand_bookmarks: bool,
    pub trash_as_rm: bool,
    pub lookup_var: &'a dyn Fn(&str) -> Option<String>,
    /// True when the current directory is the stdin temp directory (§6):
    /// symlinks are resolved to their targets during substitution.
    pub in_stdin_temp_dir: bool,
    pub resolve_symlink: &'a dyn Fn(&str) -> Option<String>,
    pub home: Option<&'a std::path::Path>,
    /// Current working directory. A relative wildcard pattern (pass g) is
    /// resolved against this, not the process's OS launch directory, so
    /// expansion follows the session wherever it has `cd`'d to.
    pub cwd: &'a std::path::Path,
    /// Expand a (tilde/brace-expanded) wildcard pattern through the `Fs`
    /// abstraction, returning every match as an absolute path. Routed
    /// through a callback, like `resolve_symlink`/`path_exists`, so tests
    /// can drive it off a `FakeFs` instead of the real filesystem.
    pub glob_expand: &'a dyn Fn(&str) -> Vec<std::path::PathBuf>,
    /// Runs a command and returns its captured stdout, for `$(...)`,
    /// `${...}`, and `` `...` `` substitution (pass g). `None` if the
    /// shell collaborator is unavailable (e.g. under test without one).
    pub capture_command: &'a dyn Fn(&str) -> Option<String>,
    /// Whether a (tilde-expanded) token names a path that already exists,
    /// resolved against the current directory through the `Fs`
    /// abstraction — used by pass (g)'s regex-expansion gate. Takes a
    /// relative-or-absolute token, not a pre-joined path.
    pub path_exists: &'a dyn Fn(&str) -> bool,
}

/// Run every pass over `line`, in order, producing the dispatchable result.
pub fn parse(line: &str, ctx: &ParseContext) -> Result<ParseOutcome> {
    let line = pass_a_fused_command_split(line);

    if let Some(outcome) = pass_b_shell_passthrough_guard(&line) {
        return Ok(outcome);
    }

    let raw_segments = pass_c_split_chains(&line);

    let mut segments = Vec::with_capacity(raw_segments.len());
    for (text, conditional_and) in raw_segments {
        let words = pass_d_word_split(&text);
        let words = pass_e_trash_as_rm(words, ctx.trash_as_rm);
        let words = substitute::pass_f_builtin_substitutions(words, ctx)?;
        let is_internal = words
            .first()
            .map(|w| commands::is_internal(w))
            .unwrap_or(false);
        let words = if is_internal {
            expand::pass_g_internal_expansions(words, ctx)?
        } else {
            words
        };
        segments.push(Segment {
            tokens: words,
            conditional_and,
        });
    }

    Ok(ParseOutcome::Segments(segments))
}

/// (a) Fused-command split: `o12` -> `o 12`, but only when the line has no
/// `/`, doesn't start with `;`, `:`, `\`, and the letter-prefix up to the
/// first letter-then-digit boundary is a known command name.
fn pass_a_fused_command_split(line: &str) -> String {
    if line.contains('/') {
        return line.to_string();
    }
    if matches!(line.chars().next(), Some(';') | Some(':') | Some('\\')) {
        return line.to_string();
    }
    let bytes = line.as_bytes();
    for i in 0..bytes.len().saturating_sub(1) {
        let c = bytes[i] as char;
        let next = bytes[i + 1] as char;
        if c.is_ascii_lowercase() && next.is_ascii_digit() {
            let prefix = &line[..=i];
            if commands::is_internal(prefix) {
                return format!("{} {}", prefix, &line[i + 1..]);
            }
        }
    }
    line.to_string()
}

/// (b) Shell-passthrough guard: `;`/`:` prefix, or a bare `NAME=VALUE`
/// assignment.
fn pass_b_shell_passthrough_guard(line: &str) -> Option<ParseOutcome> {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix(';').or_else(|| trimmed.strip_prefix(':')) {
        return Some(ParseOutcome::ShellPassthrough(rest.trim_start().to_string()));
    }
    if let Some((name, value)) = crate::uservars::UserVars::parse_assignment(trimmed) {
        return Some(ParseOutcome::Assignment(name, value));
    }
    None
}

/// (c) Split on unescaped top-level `;` or `&&`, but only when at least one
/// resulting segment's first token is an internal command — otherwise the
/// whole line is a single segment (it's presumably a single external
/// command whose arguments happen to contain a literal `;`).
fn pass_c_split_chains(line: &str) -> Vec<(String, bool)> {
    let mut segments: Vec<(String, bool)> = Vec::new();
    let mut current = String::new();
    let mut next_is_and = false;
    let mut in_single = false;
    let mut in_double = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if !in_single => {
                current.push(c);
                if let Some(n) = chars.next() {
                    current.push(n);
                }
            }
            '\'' if !in_double => {
                in_single = !in_single;
                current.push(c);
            }
            '"' if !in_single => {
                in_double = !in_double;
                current.push(c);
            }
            ';' if !in_single && !in_double => {
                segments.push((std::mem::take(&mut current), next_is_and));
                next_is_and = false;
            }
            '&' if !in_single && !in_double && chars.peek() == Some(&'&') => {
                chars.next();
                segments.push((std::mem::take(&mut current), next_is_and));
                next_is_and = true;
            }
            _ => current.push(c),
        }
    }
    segments.push((current, next_is_and));

    let any_internal = segments.iter().any(|(seg, _)| {
        seg.split_whitespace()
            .next()
            .is_some_and(commands::is_internal)
    });
    if segments.len() > 1 && any_internal {
        segments
    } else {
        vec![(line.to_string(), false)]
    }
}

/// (d) Word split: space/tab/newline, honoring quotes and backslash
/// escapes, preserving `$(...)`, `${...}`, and `` `...` `` as one word.
fn pass_d_word_split(line: &str) -> Vec<Token> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut has_content = false;
    let mut in_single = false;
    let mut in_double = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if !in_single => {
                has_content = true;
                current.push(c);
                if let Some(n) = chars.next() {
                    current.push(n);
                }
            }
            '\'' if !in_double => {
                in_single = !in_single;
                has_content = true;
                current.push(c);
            }
            '"' if !in_single => {
                in_double = !in_double;
                has_content = true;
                current.push(c);
            }
            '$' if !in_single && chars.peek() == Some(&'(') => {
                has_content = true;
                current.push(c);
                current.push(chars.next().unwrap());
                consume_balanced(&mut chars, &mut current, '(', ')');
            }
            '$' if !in_single && chars.peek() == Some(&'{') => {
                has_content = true;
                current.push(c);
                current.push(chars.next().unwrap());
                consume_balanced(&mut chars, &mut current, '{', '}');
            }
            '`' if !in_single => {
                has_content = true;
                current.push(c);
                for n in chars.by_ref() {
                    current.push(n);
                    if n == '`' {
                        break;
                    }
                }
            }
            c if c.is_whitespace() && !in_single && !in_double => {
                if has_content {
                    words.push(std::mem::take(&mut current));
                    has_content = false;
                }
            }
            _ => {
                has_content = true;
                current.push(c);
            }
        }
    }
    if has_content {
        words.push(current);
    }
    words
}

fn consume_balanced(
    chars: &mut std::iter::Peekable<std::str::Chars>,
    out: &mut String,
    open: char,
    close: char,
) {
    let mut depth = 1;
    for c in chars.by_ref() {
        out.push(c);
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                break;
            }
        }
    }
}

/// (e) `trash-as-rm`: when set, a first token of exactly `r` rewrites to
/// `tr`.
fn pass_e_trash_as_rm(mut words: Vec<Token>, trash_as_rm: bool) -> Vec<Token> {
    if trash_as_rm && words.first().map(String::as_str) == Some("r") {
        words[0] = "tr".to_string();
    }
    words
}

/// Pull `sel` out of an argument list, ensuring the caller's error message
/// matches the "`sel` with empty selection fails the parse" rule.
pub(crate) fn require_nonempty_selection(selection: &[String]) -> Result<()> {
    if selection.is_empty() {
        bail!("sel: no files selected");
    }
    Ok(())
}
