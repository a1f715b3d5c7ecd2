//! Column layout, long view, and the interactive pager.
//! Color rendering wires `lscolors` onto the scanner's `ColorTag` (§6's
//! "ANSI SGR for colors throughout"); the scanner only classifies, this
//! module renders.

use std::path::Path;

use crate::paths::unicode_width;
use crate::scanner::{ColorTag, Entry};

/// Width contribution of the ELN prefix for an `n`-digit count, including
/// the trailing space.
fn eln_width(eln_digits: usize) -> usize {
    eln_digits + 1
}

/// Longest rendered entry width across the listing, including ELN digits
/// + space, icon + space (if enabled), and a one-character classify
/// indicator (if enabled).
pub fn longest_width(entries: &[Entry], icons_enabled: bool, classify: bool) -> usize {
    entries
        .iter()
        .map(|e| {
            let mut w = eln_width(e.eln_digits) + e.display_width;
            if icons_enabled {
                w += unicode_width(e.icon_tag) + 1;
            }
            if classify {
                w += 1;
            }
            w
        })
        .max()
        .unwrap_or(0)
}

/// Column count for a normal-view listing: at least one, capped at the
/// entry count.
pub fn column_count(term_cols: usize, longest: usize, entry_count: usize) -> usize {
    if entry_count == 0 {
        return 1;
    }
    (term_cols / (longest + 1)).max(1).min(entry_count)
}

fn classify_indicator(entry: &Entry) -> char {
    if entry.is_dir_like() {
        '/'
    } else if entry.executable {
        '*'
    } else {
        match entry.file_type {
            crate::scanner::FileType::Symlink => '@',
            crate::scanner::FileType::Fifo => '|',
            crate::scanner::FileType::Socket => '=',
            _ => ' ',
        }
    }
}

/// Renders an entry's icon/name/classify-indicator cell, padded to
/// `cell_width`. The ELN prefix is added separately by the caller, which
/// knows the row's starting ELN.
fn render_cell(entry: &Entry, icons_enabled: bool, classify: bool, cell_width: usize) -> String {
    let mut out = String::new();
    if icons_enabled {
        out.push_str(entry.icon_tag);
        out.push(' ');
    }
    out.push_str(&entry.name);
    if classify {
        out.push(classify_indicator(entry));
    }
    let width = unicode_width(&out);
    let pad = cell_width.saturating_sub(width);
    out.push_str(&" ".repeat(pad + 1));
    out
}

/// Emit entries row-major into `columns` columns, each column padded to
/// `longest+1` except the last of each row, which ends with a newline
/// instead. `eln_start` is the 1-based ELN of `entries[0]`.
pub fn render_columns(
    entries: &[Entry],
    columns: usize,
    longest: usize,
    icons_enabled: bool,
    classify: bool,
    eln_start: usize,
) -> Vec<String> {
    let columns = columns.max(1);
    let row_count = entries.len().div_ceil(columns);
    let mut rows = Vec::with_capacity(row_count);

    for row in 0..row_count {
        let mut line = String::new();
        for col in 0..columns {
            let idx = row + col * row_count;
            let Some(entry) = entries.get(idx) else {
                continue;
            };
            let eln = eln_start + idx;
            line.push_str(&format!("{eln:>width$} ", width = entry.eln_digits));
            let cell = render_cell(entry, icons_enabled, classify, longest - eln_width(entry.eln_digits));
            line.push_str(cell.trim_end_matches(' '));
            if col + 1 < columns && row + (col + 1) * row_count < entries.len() {
                line.push_str(&" ".repeat(longest.saturating_sub(unicode_width(&line)) + 1));
            }
        }
        rows.push(line);
    }
    rows
}

/// One `ls -l`-style line: ELN, type char, permission triads, ACL marker,
/// `uid:gid`, formatted mtime, size, name (truncated with a trailing `~`
/// if it would overflow `available_width`).
pub fn render_long_line(entry: &Entry, eln: usize, has_acl: bool, available_width: usize) -> String {
    let type_char = match entry.file_type {
        crate::scanner::FileType::Directory => 'd',
        crate::scanner::FileType::Symlink => 'l',
        crate::scanner::FileType::Socket => 's',
        crate::scanner::FileType::Fifo => 'p',
        crate::scanner::FileType::Block => 'b',
        crate::scanner::FileType::Char => 'c',
        crate::scanner::FileType::Regular => '-',
        crate::scanner::FileType::Unknown => '?',
    };
    let perms = permission_triads(entry.mode, entry.setuid, entry.setgid);
    let acl_marker = if has_acl { "+" } else { "" };
    let mtime = format_mtime(entry.mtime);
    let size = crate::paths::human_size(entry.size);

    let prefix = format!(
        "{eln:>width$} {type_char}{perms}{acl_marker} {uid}:{gid} {mtime} {size:>8} ",
        width = entry.eln_digits,
        uid = entry.uid,
        gid = entry.gid,
    );
    let prefix_width = unicode_width(&prefix);
    let name_budget = available_width.saturating_sub(prefix_width);
    let name = truncate_with_tilde(&entry.name, name_budget);
    format!("{prefix}{name}")
}

fn truncate_with_tilde(name: &str, budget: usize) -> String {
    if budget == 0 || unicode_width(name) <= budget {
        return name.to_string();
    }
    let mut out = String::new();
    for c in name.chars() {
        if unicode_width(&format!("{out}{c}~")) > budget {
            break;
        }
        out.push(c);
    }
    out.push('~');
    out
}

fn permission_triads(mode: u32, setuid: bool, setgid: bool) -> String {
    let bit = |shift: u32, c: char| if mode & (1 << shift) != 0 { c } else { '-' };
    let mut owner = [bit(8, 'r'), bit(7, 'w'), bit(6, 'x')];
    let mut group = [bit(5, 'r'), bit(4, 'w'), bit(3, 'x')];
    let other = [bit(2, 'r'), bit(1, 'w'), bit(0, 'x')];
    if setuid {
        owner[2] = if owner[2] == 'x' { 's' } else { 'S' };
    }
    if setgid {
        group[2] = if group[2] == 'x' { 's' } else { 'S' };
    }
    format!(
        "{}{}{}{}{}{}{}{}{}",
        owner[0], owner[1], owner[2], group[0], group[1], group[2], other[0], other[1], other[2]
    )
}

fn format_mtime(epoch_secs: i64) -> String {
    let days = epoch_secs.div_euclid(86_400);
    let secs_of_day = epoch_secs.rem_euclid(86_400);
    let (y, m, d) = civil_from_days(days);
    let hh = secs_of_day / 3600;
    let mm = (secs_of_day % 3600) / 60;
    format!("{y:04}-{m:02}-{d:02} {hh:02}:{mm:02}")
}

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

/// ANSI SGR prefix for a resolved `ColorTag`, looked up against `LS_COLORS`
/// via `lscolors`, falling back to no styling when the indicator/extension
/// isn't covered.
pub fn sgr_for(tag: &ColorTag, ls_colors: &lscolors::LsColors, path: &Path) -> String {
    use lscolors::Indicator;

    let style = match tag {
        ColorTag::Directory => ls_colors.style_for_indicator(Indicator::Directory),
        ColorTag::Executable => ls_colors.style_for_indicator(Indicator::ExecutableFile),
        ColorTag::Symlink => ls_colors.style_for_indicator(Indicator::SymbolicLink),
        ColorTag::BrokenSymlink => ls_colors.style_for_indicator(Indicator::OrphanedSymbolicLink),
        ColorTag::Setuid => ls_colors.style_for_indicator(Indicator::Setuid),
        ColorTag::Setgid => ls_colors.style_for_indicator(Indicator::Setgid),
        ColorTag::Socket => ls_colors.style_for_indicator(Indicator::Socket),
        ColorTag::Fifo => ls_colors.style_for_indicator(Indicator::FIFO),
        ColorTag::Device => ls_colors.style_for_indicator(Indicator::BlockDevice),
        ColorTag::Unreadable => None,
        ColorTag::ByExtension(_) => ls_colors.style_for_path(path),
        ColorTag::Normal => None,
    };
    style.map(render_sgr).unwrap_or_default()
}

fn render_sgr(style: &lscolors::Style) -> String {
    let mut codes: Vec<String> = Vec::new();
    if style.font_style.bold {
        codes.push("1".to_string());
    }
    if style.font_style.underline {
        codes.push("4".to_string());
    }
    if let Some(fg) = &style.foreground {
        codes.push(color_code(fg, false));
    }
    if let Some(bg) = &style.background {
        codes.push(color_code(bg, true));
    }
    if codes.is_empty() {
        return String::new();
    }
    format!("\x1b[{}m", codes.join(";"))
}

fn color_code(color: &lscolors::Color, background: bool) -> String {
    use lscolors::Color::*;
    let base = if background { 40 } else { 30 };
    match color {
        Black => base.to_string(),
        Red => (base + 1).to_string(),
        Green => (base + 2).to_string(),
        Yellow => (base + 3).to_string(),
        Blue => (base + 4).to_string(),
        Magenta => (base + 5).to_string(),
        Cyan => (base + 6).to_string(),
        White => (base + 7).to_string(),
        Fixed(n) => format!("{};5;{n}", if background { 48 } else { 38 }),
        RGB(r, g, b) => format!("{};2;{r};{g};{b}", if background { 48 } else { 38 }),
        _ => base.to_string(),
    }
}

pub const SGR_RESET: &str = "\x1b[0m";

/// Pager action produced by classifying a keystroke (§4.4); the pager
/// itself never mutates listing state, only a cursor into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerAction {
    AdvanceLine,
    AdvancePage,
    Stop,
    Help,
    RewindRow,
}

pub fn classify_key(key: char) -> PagerAction {
    match key {
        ' ' | '\n' | '\r' => PagerAction::AdvanceLine,
        'q' | 'c' | 'p' => PagerAction::Stop,
        '?' | 'h' => PagerAction::Help,
        _ => PagerAction::RewindRow,
    }
}

/// Tracks how many rows of a listing have been emitted so far, so the
/// caller knows when to block for a keystroke. Paging never mutates the
/// listing itself, only this cursor.
pub struct Paginator {
    page_rows: usize,
    emitted: usize,
    total: usize,
    stopped: bool,
}

impl Paginator {
    pub fn new(total: usize, term_rows: usize) -> Self {
        Self {
            page_rows: term_rows.saturating_sub(2).max(1),
            emitted: 0,
            total,
            stopped: false,
        }
    }

    /// True once a full page has been emitted and more rows remain, and
    /// paging hasn't been stopped for the rest of the listing.
    pub fn should_block(&self) -> bool {
        !self.stopped && self.emitted > 0 && self.emitted % self.page_rows == 0 && self.emitted < self.total
    }

    pub fn advance_rows(&mut self, n: usize) {
        self.emitted += n;
    }

    /// Apply a keystroke while blocked; returns how many additional rows
    /// (if any) should be rewound (negative emitted count) to reprint.
    pub fn handle_key(&mut self, key: char) -> PagerAction {
        let action = classify_key(key);
        match action {
            PagerAction::Stop => self.stopped = true,
            PagerAction::Help => self.emitted = self.emitted.saturating_sub(self.page_rows),
            PagerAction::RewindRow => self.emitted = self.emitted.saturating_sub(1),
            PagerAction::AdvanceLine | PagerAction::AdvancePage => {}
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_count_caps_at_entry_count() {
        assert_eq!(column_count(80, 10, 2), 2);
        assert_eq!(column_count(80, 10, 100), 7);
        assert_eq!(column_count(10, 100, 50), 1);
    }

    #[test]
    fn truncate_with_tilde_shortens_long_names() {
        assert_eq!(truncate_with_tilde("short", 20), "short");
        assert_eq!(truncate_with_tilde("a_very_long_filename", 6), "a_ver~");
    }

    #[test]
    fn permission_triads_render_setuid_bit() {
        assert_eq!(permission_triads(0o755, false, false), "rwxr-xr-x");
        assert_eq!(permission_triads(0o755, true, false), "rwsr-xr-x");
        assert_eq!(permission_triads(0o644, true, false), "rwSr--r--");
    }

    #[test]
    fn format_mtime_renders_epoch_zero() {
        assert_eq!(format_mtime(0), "1970-01-01 00:00");
    }

    #[test]
    fn classify_key_maps_keys_to_actions() {
        assert_eq!(classify_key(' '), PagerAction::AdvanceLine);
        assert_eq!(classify_key('q'), PagerAction::Stop);
        assert_eq!(classify_key('?'), PagerAction::Help);
        assert_eq!(classify_key('z'), PagerAction::RewindRow);
    }

    #[test]
    fn paginator_blocks_after_a_full_page() {
        let mut pager = Paginator::new(20, 12);
        assert!(!pager.should_block());
        pager.advance_rows(10);
        assert!(pager.should_block());
        pager.handle_key('q');
        pager.advance_rows(10);
        assert!(!pager.should_block(), "stopped paging should never block again");
    }
}
