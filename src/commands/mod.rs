//! The internal command table: verb categories, their
//! aliases, and the handlers each alias routes to.
//!
//! SPEC_FULL scopes the full ~180-verb table down to one fully working
//! verb per category, with the rest of that category's aliases sharing
//! the same handler (see DESIGN.md).

pub mod dispatch;
pub mod handlers;

use std::collections::HashMap;
use std::sync::OnceLock;

/// A command category, used by the dispatcher to group related aliases
/// and by the opener/autocd checks in the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Cd,
    Back,
    Forth,
    DirHistory,
    Workspace,
    Jump,
    Bookmark,
    Pin,
    Unpin,
    PrevDir,
    Refresh,
    Reload,
    Ls,
    Columns,
    Pager,
    LightMode,
    Filter,
    Hidden,
    MaxFiles,
    Icons,
    Sort,
    ColorSchemes,
    Select,
    Deselect,
    SelBox,
    Open,
    ShellWrapper,
    EditSymlink,
    BatchLink,
    BulkRename,
    ToggleExec,
    Paste,
    Trash,
    Untrash,
    Archive,
    Export,
    Mime,
    Profile,
    Keybinds,
    Alias,
    Opener,
    Shell,
    Edit,
    Actions,
    History,
    Log,
    Msg,
    Cmd,
    Help,
    Version,
    Colors,
    Mountpoints,
    FreeSoftware,
    Tips,
    Splash,
    Bonus,
    NewInstance,
    Quit,
}

/// Every alias recognized by the dispatcher, mapped to its `Verb`.
fn alias_table() -> &'static HashMap<&'static str, Verb> {
    static TABLE: OnceLock<HashMap<&'static str, Verb>> = OnceLock::new();
    TABLE.get_or_init(|| {
        use Verb::*;
        HashMap::from([
            ("cd", Cd),
            ("b", Back),
            ("back", Back),
            ("f", Forth),
            ("forth", Forth),
            ("bh", DirHistory),
            ("fh", DirHistory),
            ("ws", Workspace),
            ("workspace", Workspace),
            ("j", Jump),
            ("jc", Jump),
            ("jp", Jump),
            ("jo", Jump),
            ("jl", Jump),
            ("je", Jump),
            ("bm", Bookmark),
            ("bookmarks", Bookmark),
            ("pin", Pin),
            ("unpin", Unpin),
            ("p", PrevDir),
            ("pr", PrevDir),
            ("pp", PrevDir),
            ("rf", Refresh),
            ("refresh", Refresh),
            ("rl", Reload),
            ("reload", Reload),
            ("ls", Ls),
            ("cl", Columns),
            ("columns", Columns),
            ("pg", Pager),
            ("pager", Pager),
            ("lm", LightMode),
            ("ft", Filter),
            ("filter", Filter),
            ("hf", Hidden),
            ("hidden", Hidden),
            ("mf", MaxFiles),
            ("icons", Icons),
            ("st", Sort),
            ("sort", Sort),
            ("cs", ColorSchemes),
            ("colorschemes", ColorSchemes),
            ("s", Select),
            ("sel", Select),
            ("ds", Deselect),
            ("desel", Deselect),
            ("sb", SelBox),
            ("selbox", SelBox),
            ("o", Open),
            ("open", Open),
            ("c", ShellWrapper),
            ("l", ShellWrapper),
            ("m", ShellWrapper),
            ("md", ShellWrapper),
            ("r", ShellWrapper),
            ("le", EditSymlink),
            ("bl", BatchLink),
            ("br", BulkRename),
            ("bulk", BulkRename),
            ("te", ToggleExec),
            ("v", Paste),
            ("vv", Paste),
            ("paste", Paste),
            ("t", Trash),
            ("trash", Trash),
            ("u", Untrash),
            ("untrash", Untrash),
            ("ac", Archive),
            ("ad", Archive),
            ("exp", Export),
            ("export", Export),
            ("mm", Mime),
            ("mime", Mime),
            ("pf", Profile),
            ("profile", Profile),
            ("kb", Keybinds),
            ("keybinds", Keybinds),
            ("alias", Alias),
            ("opener", Opener),
            ("shell", Shell),
            ("edit", Edit),
            ("actions", Actions),
            ("history", History),
            ("log", Log),
            ("msg", Msg),
            ("cmd", Cmd),
            ("help", Help),
            ("ver", Version),
            ("cc", Colors),
            ("mp", Mountpoints),
            ("fs", FreeSoftware),
            ("tips", Tips),
            ("splash", Splash),
            ("bonus", Bonus),
            ("x", NewInstance),
            ("X", NewInstance),
            ("q", Quit),
            ("quit", Quit),
            ("exit", Quit),
            ("Q", Quit),
        ])
    })
}

/// Resolve a command word to its `Verb`, if it names one.
pub fn resolve(word: &str) -> Option<Verb> {
    alias_table().get(word).copied()
}

/// True if `word` names a known internal command — used by the parser's
/// fused-command-split and chained-command passes (§4.8 a, c).
pub fn is_internal(word: &str) -> bool {
    alias_table().contains_key(word)
}

/// Commands whose first argument is accepted as a literal integer rather
/// than expanded to an ELN (§4.8 f): `mf`, `st`/`sort`, `ws`, `jo`.
pub fn accepts_literal_integer(word: &str) -> bool {
    matches!(word, "mf" | "st" | "sort" | "ws" | "jo")
}
