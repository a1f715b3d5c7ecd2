//! Real command execution, delegating the foreground signal/process-group
//! dance to `platform::job`.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

use super::{Shell, SpawnOutcome};
use crate::platform::job;

pub struct RealShell;

impl Shell for RealShell {
    fn run_foreground(&self, command: &str, cwd: &Path) -> Result<SpawnOutcome> {
        let job = job::ForegroundJob::spawn(command, cwd)?;
        job.wait()
    }

    fn run_background(&self, command: &str, cwd: &Path) -> Result<()> {
        job::spawn_background(command, cwd)
    }

    fn capture(&self, command: &str, cwd: &Path) -> Result<String> {
        let output = Command::new("/bin/sh")
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .output()
            .with_context(|| format!("failed to run: {command}"))?;
        let mut stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        while stdout.ends_with('\n') {
            stdout.pop();
        }
        Ok(stdout)
    }
}
