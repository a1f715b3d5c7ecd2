//! Command-line interface definition using `clap` derive macros.

use clap::Parser;
use std::path::PathBuf;

/// Top-level CLI arguments.
#[derive(Parser)]
#[command(name = "fileman", about = "A keyboard-driven terminal file manager")]
pub struct Cli {
    /// Starting directory (defaults to the current directory, or the last
    /// visited directory for the active profile if one was recorded)
    pub path: Option<PathBuf>,

    /// Profile name; each profile has its own config, bookmarks, jump
    /// database, and history under its own directory
    #[arg(short, long, default_value = "default")]
    pub profile: String,

    /// Override the profile's config file location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v = DEBUG, -vv = TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Decrease verbosity (-q = WARN, -qq = ERROR, -qqq = OFF)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub quiet: u8,
}
