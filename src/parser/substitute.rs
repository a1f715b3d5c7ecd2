//! Pass (f): built-in substitutions, applied per-word.

use anyhow::{Result, bail};

use super::{ParseContext, Token, require_nonempty_selection};
use crate::commands;
use crate::paths;

pub(super) fn pass_f_builtin_substitutions(
    words: Vec<Token>,
    ctx: &ParseContext,
) -> Result<Vec<Token>> {
    if words.is_empty() {
        return Ok(words);
    }
    let command = words[0].clone();
    let literal_ints = commands::accepts_literal_integer(&command);

    let mut out = Vec::with_capacity(words.len());
    for (idx, word) in words.into_iter().enumerate() {
        if idx == 0 {
            out.push(word);
            continue;
        }
        out.extend(substitute_word(&word, ctx, literal_ints)?);
    }
    Ok(out)
}

fn substitute_word(word: &str, ctx: &ParseContext, literal_ints: bool) -> Result<Vec<String>> {
    if word == "," {
        if let Some(pinned) = ctx.pinned {
            return Ok(vec![paths::escape(pinned)]);
        }
        return Ok(vec![word.to_string()]);
    }

    if let Some(expanded) = paths::fastback(word) {
        return Ok(vec![expanded]);
    }

    if word == "sel" {
        require_nonempty_selection(ctx.selection)?;
        return Ok(ctx.selection.iter().map(|p| paths::escape(p)).collect());
    }

    if let Some((start, end)) = parse_range(word)
        && valid_eln(start, ctx)
        && valid_eln(end, ctx)
    {
        return Ok((start..=end)
            .map(|i| paths::escape(&ctx.entry_names[i - 1]))
            .collect());
    }

    if let Some(name) = word.strip_prefix('$') {
        return Ok(vec![
            (ctx.lookup_var)(name).unwrap_or_else(|| word.to_string()),
        ]);
    }

    if ctx.expand_bookmarks
        && !ctx.entry_names.iter().any(|n| n == word)
        && ctx.bookmark_names.iter().any(|n| n == word)
        && let Some(path) = (ctx.resolve_bookmark)(word)
    {
        return Ok(vec![path]);
    }

    if let Ok(n) = word.parse::<usize>() {
        if literal_ints {
            return Ok(vec![word.to_string()]);
        }
        let literally_named = ctx.entry_names.iter().any(|name| name == word);
        if literally_named {
            bail!(
                "{word}: ambiguous — both an entry-list number and a file name; prefix with ';' to use the file name"
            );
        }
        if valid_eln(n, ctx) {
            return Ok(vec![paths::escape(&ctx.entry_names[n - 1])]);
        }
        bail!("{word}: no such entry-list number");
    }

    if ctx.in_stdin_temp_dir
        && let Some(target) = (ctx.resolve_symlink)(word)
    {
        return Ok(vec![target]);
    }

    Ok(vec![word.to_string()])
}

fn valid_eln(n: usize, ctx: &ParseContext) -> bool {
    n >= 1 && n <= ctx.entry_names.len()
}

fn parse_range(word: &str) -> Option<(usize, usize)> {
    let (left, right) = word.split_once('-')?;
    if left.is_empty() || right.is_empty() {
        return None;
    }
    let start: usize = left.parse().ok()?;
    let end: usize = right.parse().ok()?;
    if start > end {
        return None;
    }
    Some((start, end))
}
