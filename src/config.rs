//! Config load/reload: `Name=Value` lines, one option per
//! line; lines between `#PROMPT` and `#END OF PROMPT` are a prompt script,
//! kept verbatim and out of scope for interpretation (§1).

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::jump::JumpConfig;
use crate::paths::expand_tilde;
use crate::sorter::{SortMethod, SortOptions};

/// Config options consumed by the scanner, sorter, parser, and dispatcher
/// (§4.11's "set of options consumed", out-of-scope beyond that set).
#[derive(Debug, Clone)]
pub struct Config {
    pub show_hidden: bool,
    pub light_mode: bool,
    pub pager_enabled: bool,
    pub icons_enabled: bool,
    pub classify: bool,
    pub autocd: bool,
    pub auto_open: bool,
    pub trash_as_rm: bool,
    pub expand_bookmarks: bool,
    pub max_files: Option<usize>,
    /// Compiled `ft`/`filter` pattern: listed names matching it are
    /// excluded from the scan (§4.2, §4.9).
    pub filter: Option<regex::Regex>,
    /// Long-view (`ls -l`) vs column-view rendering (§4.4).
    pub long_view: bool,
    pub sort: SortOptions,
    /// Case sensitivity is configurable independently for three
    /// comparisons: listing sort, dirjump matching, and
    /// path completion.
    pub case_sensitive_sort: bool,
    pub case_sensitive_jump: bool,
    pub case_sensitive_completion: bool,
    pub jump: JumpConfig,
    pub command_history_max: usize,
    pub message_log_capacity: usize,
    /// Lines between `#PROMPT`/`#END OF PROMPT`, kept verbatim.
    pub prompt_script: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_hidden: false,
            light_mode: false,
            pager_enabled: true,
            icons_enabled: true,
            classify: false,
            autocd: true,
            auto_open: true,
            trash_as_rm: false,
            expand_bookmarks: true,
            max_files: None,
            filter: None,
            long_view: false,
            sort: SortOptions::default(),
            case_sensitive_sort: false,
            case_sensitive_jump: false,
            case_sensitive_completion: false,
            jump: JumpConfig::default(),
            command_history_max: 1000,
            message_log_capacity: 200,
            prompt_script: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a `Name=Value` config file; unknown keys and malformed lines
    /// are ignored rather than rejected, matching a tolerant reload.
    pub fn parse(contents: &str) -> Self {
        let mut cfg = Self::default();
        let mut in_prompt = false;
        for line in contents.lines() {
            let trimmed = line.trim();
            if trimmed == "#PROMPT" {
                in_prompt = true;
                continue;
            }
            if trimmed == "#END OF PROMPT" {
                in_prompt = false;
                continue;
            }
            if in_prompt {
                cfg.prompt_script.push(line.to_string());
                continue;
            }
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((name, value)) = trimmed.split_once('=') else {
                continue;
            };
            cfg.apply(name.trim(), value.trim());
        }
        cfg
    }

    fn apply(&mut self, name: &str, value: &str) {
        let bool_val = || matches!(value, "true" | "1" | "yes");
        match name {
            "ShowHiddenFiles" => self.show_hidden = bool_val(),
            "LightMode" => self.light_mode = bool_val(),
            "Pager" => self.pager_enabled = bool_val(),
            "Icons" => self.icons_enabled = bool_val(),
            "Classify" => self.classify = bool_val(),
            "Autocd" => self.autocd = bool_val(),
            "AutoOpen" => self.auto_open = bool_val(),
            "TrashAsRm" => self.trash_as_rm = bool_val(),
            "ExpandBookmarks" => self.expand_bookmarks = bool_val(),
            "MaxFiles" => self.max_files = value.parse().ok(),
            "Filter" => self.filter = if value.is_empty() { None } else { regex::Regex::new(value).ok() },
            "LongView" => self.long_view = bool_val(),
            "SortMethod" => self.sort.method = parse_sort_method(value),
            "FoldersFirst" => self.sort.folders_first = bool_val(),
            "SortReverse" => self.sort.reverse = bool_val(),
            "CaseSensitiveSort" => {
                self.case_sensitive_sort = bool_val();
                self.sort.case_sensitive = self.case_sensitive_sort;
            }
            "CaseSensitiveJump" => self.case_sensitive_jump = bool_val(),
            "CaseSensitiveCompletion" => self.case_sensitive_completion = bool_val(),
            "JumpCeiling" => {
                if let Ok(n) = value.parse() {
                    self.jump.ceiling = n;
                }
            }
            "JumpFloor" => {
                if let Ok(n) = value.parse() {
                    self.jump.floor = n;
                }
            }
            "CommandHistoryMax" => {
                if let Ok(n) = value.parse() {
                    self.command_history_max = n;
                }
            }
            "MessageLogCapacity" => {
                if let Ok(n) = value.parse() {
                    self.message_log_capacity = n;
                }
            }
            _ => {}
        }
    }

    /// Serialize back to `Name=Value` lines, round-tripping the prompt
    /// script verbatim.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("ShowHiddenFiles={}\n", self.show_hidden));
        out.push_str(&format!("LightMode={}\n", self.light_mode));
        out.push_str(&format!("Pager={}\n", self.pager_enabled));
        out.push_str(&format!("Icons={}\n", self.icons_enabled));
        out.push_str(&format!("Classify={}\n", self.classify));
        out.push_str(&format!("Autocd={}\n", self.autocd));
        out.push_str(&format!("AutoOpen={}\n", self.auto_open));
        out.push_str(&format!("TrashAsRm={}\n", self.trash_as_rm));
        out.push_str(&format!("ExpandBookmarks={}\n", self.expand_bookmarks));
        if let Some(n) = self.max_files {
            out.push_str(&format!("MaxFiles={n}\n"));
        }
        if let Some(re) = &self.filter {
            out.push_str(&format!("Filter={}\n", re.as_str()));
        }
        out.push_str(&format!("LongView={}\n", self.long_view));
        out.push_str(&format!("SortMethod={}\n", sort_method_name(self.sort.method)));
        out.push_str(&format!("FoldersFirst={}\n", self.sort.folders_first));
        out.push_str(&format!("SortReverse={}\n", self.sort.reverse));
        out.push_str(&format!("CaseSensitiveSort={}\n", self.case_sensitive_sort));
        out.push_str(&format!("CaseSensitiveJump={}\n", self.case_sensitive_jump));
        out.push_str(&format!(
            "CaseSensitiveCompletion={}\n",
            self.case_sensitive_completion
        ));
        out.push_str(&format!("JumpCeiling={}\n", self.jump.ceiling));
        out.push_str(&format!("JumpFloor={}\n", self.jump.floor));
        out.push_str(&format!("CommandHistoryMax={}\n", self.command_history_max));
        out.push_str(&format!(
            "MessageLogCapacity={}\n",
            self.message_log_capacity
        ));
        if !self.prompt_script.is_empty() {
            out.push_str("#PROMPT\n");
            for line in &self.prompt_script {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str("#END OF PROMPT\n");
        }
        out
    }

    /// Load a profile's `clifmrc`-equivalent config file; a missing file
    /// loads as the default config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Ok(Self::parse(&contents))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, self.render())
            .with_context(|| format!("failed to write config file: {}", path.display()))
    }

    /// Default config directory: `$XDG_CONFIG_HOME/fileman` or
    /// `$HOME/.config/fileman` (§6).
    pub fn config_root() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| expand_tilde("~/.config", dirs::home_dir().as_deref()))
            .join("fileman")
    }

    pub fn profile_dir(profile: &str) -> PathBuf {
        Self::config_root().join("profiles").join(profile)
    }
}

fn parse_sort_method(value: &str) -> SortMethod {
    match value {
        "None" => SortMethod::None,
        "Size" => SortMethod::Size,
        "Atime" => SortMethod::Atime,
        "Btime" => SortMethod::Btime,
        "Ctime" => SortMethod::Ctime,
        "Mtime" => SortMethod::Mtime,
        "Version" => SortMethod::Version,
        "Extension" => SortMethod::Extension,
        "Inode" => SortMethod::Inode,
        "Owner" => SortMethod::Owner,
        "Group" => SortMethod::Group,
        _ => SortMethod::Name,
    }
}

fn sort_method_name(method: SortMethod) -> &'static str {
    match method {
        SortMethod::None => "None",
        SortMethod::Name => "Name",
        SortMethod::Size => "Size",
        SortMethod::Atime => "Atime",
        SortMethod::Btime => "Btime",
        SortMethod::Ctime => "Ctime",
        SortMethod::Mtime => "Mtime",
        SortMethod::Version => "Version",
        SortMethod::Extension => "Extension",
        SortMethod::Inode => "Inode",
        SortMethod::Owner => "Owner",
        SortMethod::Group => "Group",
    }
}

/// Suggest the closest known command name for an unrecognized one, used by
/// the dispatcher's "no such command" error. `None` below a similarity
/// threshold.
pub fn suggest_command<'a>(unknown: &str, known: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    const THRESHOLD: f64 = 0.8;
    let mut best: Option<(&str, f64)> = None;
    for candidate in known {
        let score = strsim::jaro_winkler(unknown, candidate);
        if score > THRESHOLD && best.map_or(true, |(_, b)| score > b) {
            best = Some((candidate, score));
        }
    }
    best.map(|(name, _)| name)
}
