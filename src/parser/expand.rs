//! Pass (g): internal-only expansions, skipped for external commands.
//! Tilde/brace/wildcard expansion, command/parameter substitution, and
//! regex expansion against the current listing — in that order, since
//! substitution can produce the literal text a later wildcard expects.

use anyhow::Result;

use super::{ParseContext, Token};
use crate::paths;

/// Commands where `*` has its own command-specific meaning and wildcard
/// expansion must not run.
const WILDCARD_EXEMPT: &[&str] = &["sel", "ds", "u"];

pub(super) fn pass_g_internal_expansions(
    words: Vec<Token>,
    ctx: &ParseContext,
) -> Result<Vec<Token>> {
    if words.is_empty() {
        return Ok(words);
    }
    let command = words[0].clone();
    let wildcards_allowed = !WILDCARD_EXEMPT.contains(&command.as_str());

    let mut out = Vec::with_capacity(words.len());
    for (idx, word) in words.into_iter().enumerate() {
        if idx == 0 {
            out.push(word);
            continue;
        }
        let word = substitute_commands(&word, ctx);
        if wildcards_allowed {
            out.extend(expand_wildcards(&word, ctx));
        } else {
            out.push(word);
        }
    }
    Ok(out)
}

/// `$(...)`, `` `...` ``, and `${...}` substitution. A word with no
/// recognized substitution form is returned unchanged.
fn substitute_commands(word: &str, ctx: &ParseContext) -> String {
    if let Some(inner) = word.strip_prefix("$(").and_then(|s| s.strip_suffix(')')) {
        return run_capture(inner, ctx).unwrap_or_else(|| word.to_string());
    }
    if let Some(inner) = word.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return run_capture(inner, ctx).unwrap_or_else(|| word.to_string());
    }
    if let Some(inner) = word.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        return run_capture(inner, ctx).unwrap_or_else(|| word.to_string());
    }
    word.to_string()
}

fn run_capture(command: &str, ctx: &ParseContext) -> Option<String> {
    (ctx.capture_command)(command).map(|s| s.trim_end_matches('\n').to_string())
}

/// Tilde, brace, and wildcard expansion, the last routed through
/// `ctx.glob_expand` (an `Fs`-mediated callback) rather than calling `glob`
/// directly, so relative patterns resolve against the session's navigated
/// `ctx.cwd` rather than the process's OS launch directory. Matching `.`
/// and `..` are excluded. A token with no glob metacharacters and no
/// leading `~` passes through unchanged without touching the filesystem.
fn expand_wildcards(word: &str, ctx: &ParseContext) -> Vec<String> {
    let expanded_tilde = expand_tilde(word, ctx);

    if !has_glob_meta(&expanded_tilde) {
        return regex_expand(word, &expanded_tilde, ctx);
    }

    let pattern_is_absolute = std::path::Path::new(&expanded_tilde).is_absolute();
    let candidates = expand_braces(&expanded_tilde);
    let mut matches = Vec::new();
    for candidate in &candidates {
        for entry in (ctx.glob_expand)(candidate) {
            let name = entry.file_name().map(|n| n.to_string_lossy().into_owned());
            if matches!(name.as_deref(), Some(".") | Some("..")) {
                continue;
            }
            let display = if pattern_is_absolute {
                entry.to_string_lossy().into_owned()
            } else {
                entry
                    .strip_prefix(ctx.cwd)
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_else(|_| entry.to_string_lossy().into_owned())
            };
            matches.push(paths::escape(&display));
        }
    }

    if matches.is_empty() {
        vec![word.to_string()]
    } else {
        matches
    }
}

fn expand_tilde(word: &str, ctx: &ParseContext) -> String {
    if let Some(rest) = word.strip_prefix('~')
        && (rest.is_empty() || rest.starts_with('/'))
        && let Some(home) = ctx.home
    {
        return format!("{}{}", home.display(), rest);
    }
    word.to_string()
}

fn has_glob_meta(s: &str) -> bool {
    s.contains('*') || s.contains('?') || s.contains('[') || s.contains('{')
}

/// Expand `{a,b,c}` brace groups into a cartesian product of candidates.
/// Only one brace group is supported per token, matching the scope of a
/// file-manager shorthand rather than a full shell brace expander.
fn expand_braces(word: &str) -> Vec<String> {
    let Some(open) = word.find('{') else {
        return vec![word.to_string()];
    };
    let Some(close) = word[open..].find('}').map(|i| i + open) else {
        return vec![word.to_string()];
    };
    let prefix = &word[..open];
    let suffix = &word[close + 1..];
    word[open + 1..close]
        .split(',')
        .map(|alt| format!("{prefix}{alt}{suffix}"))
        .collect()
}

/// Regex expansion: a token without glob metacharacters that is not
/// already a valid path and contains a regex metacharacter is matched
/// against the current listing's names. No match keeps the token verbatim.
fn regex_expand(original: &str, tilde_expanded: &str, ctx: &ParseContext) -> Vec<String> {
    if (ctx.path_exists)(tilde_expanded) {
        return vec![tilde_expanded.to_string()];
    }
    if !looks_like_regex(original) {
        return vec![tilde_expanded.to_string()];
    }
    let Ok(re) = regex::Regex::new(original) else {
        return vec![tilde_expanded.to_string()];
    };
    let matches: Vec<String> = ctx
        .entry_names
        .iter()
        .filter(|name| re.is_match(name))
        .map(|name| paths::escape(name))
        .collect();
    if matches.is_empty() {
        vec![tilde_expanded.to_string()]
    } else {
        matches
    }
}

fn looks_like_regex(s: &str) -> bool {
    s.chars()
        .any(|c| matches!(c, '.' | '^' | '$' | '+' | '(' | ')' | '|' | '\\'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_capture<'a>(
        entry_names: &'a [String],
        capture: &'a dyn Fn(&str) -> Option<String>,
        home: Option<&'a std::path::Path>,
    ) -> ParseContext<'a> {
        ParseContext {
            entry_names,
            selection: &[],
            pinned: None,
            bookmark_names: &[],
            resolve_bookmark: &|_| None,
            expand_bookmarks: true,
            trash_as_rm: false,
            lookup_var: &|_| None,
            in_stdin_temp_dir: false,
            resolve_symlink: &|_| None,
            home,
            cwd: std::path::Path::new("/"),
            glob_expand: &|_: &str| Vec::new(),
            capture_command: capture,
            path_exists: &|_: &str| false,
        }
    }

    #[test]
    fn command_substitution_runs_capture_and_trims_newline() {
        let names = vec![];
        let capture = |cmd: &str| -> Option<String> {
            if cmd == "echo hi" {
                Some("hi\n".to_string())
            } else {
                None
            }
        };
        let ctx = ctx_with_capture(&names, &capture, None);
        let words =
            pass_g_internal_expansions(vec!["cd".to_string(), "$(echo hi)".to_string()], &ctx)
                .unwrap();
        assert_eq!(words, vec!["cd", "hi"]);
    }

    #[test]
    fn wildcard_exempt_commands_skip_glob() {
        let names = vec![];
        let capture = |_: &str| None;
        let ctx = ctx_with_capture(&names, &capture, None);
        let words =
            pass_g_internal_expansions(vec!["sel".to_string(), "*.txt".to_string()], &ctx)
                .unwrap();
        assert_eq!(words, vec!["sel", "*.txt"]);
    }

    #[test]
    fn regex_expansion_matches_listing_names() {
        let names = vec!["report.log".to_string(), "notes.txt".to_string()];
        let capture = |_: &str| None;
        let ctx = ctx_with_capture(&names, &capture, None);
        let words =
            pass_g_internal_expansions(vec!["o".to_string(), r"report\.log".to_string()], &ctx)
                .unwrap();
        assert_eq!(words, vec!["o", "report.log"]);
    }

    #[test]
    fn tilde_expands_using_home() {
        let names = vec![];
        let capture = |_: &str| None;
        let home = std::path::Path::new("/home/user");
        let ctx = ctx_with_capture(&names, &capture, Some(home));
        assert_eq!(expand_tilde("~/docs", &ctx), "/home/user/docs");
        assert_eq!(expand_tilde("~other", &ctx), "~other");
    }

    /// A relative wildcard pattern must resolve against the directory the
    /// session has navigated to, not the directory the process happened to
    /// launch in. Exercised through `FakeFs`, which never touches the real
    /// filesystem, after moving `ctx.cwd` away from `/`.
    #[test]
    fn wildcard_expansion_resolves_against_navigated_cwd() {
        use crate::platform::{FakeFs, Fs};

        let fs = FakeFs::new("/home/user");
        fs.add_file("/home/user/project/a.txt", "a");
        fs.add_file("/home/user/project/b.txt", "b");
        fs.add_file("/elsewhere/c.txt", "c");

        let cwd = std::path::PathBuf::from("/home/user/project");
        let glob_expand = |pattern: &str| fs.glob(&cwd, pattern);
        let names = vec![];
        let capture = |_: &str| None;
        let mut ctx = ctx_with_capture(&names, &capture, None);
        ctx.cwd = &cwd;
        ctx.glob_expand = &glob_expand;

        let words =
            pass_g_internal_expansions(vec!["o".to_string(), "*.txt".to_string()], &ctx).unwrap();

        assert_eq!(words.len(), 3);
        assert_eq!(words[0], "o");
        let mut matched: Vec<&str> = words[1..].iter().map(String::as_str).collect();
        matched.sort();
        assert_eq!(matched, vec!["a.txt", "b.txt"]);
    }
}
