//! Foreground child-process handling: signal disposition, process groups,
//! and terminal ownership (§5's "child process policy").
//!
//! The parent ignores `SIGINT`/`SIGQUIT`/`SIGTSTP` at startup so the prompt
//! survives a stray Ctrl-C. Each foreground spawn puts the child in its own
//! process group and hands it the controlling terminal via `tcsetpgrp`, so
//! the user's quit key reaches the child, not the shell. The terminal is
//! reclaimed by the parent once the child exits.

use anyhow::{Context, Result};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::Command;

use super::SpawnOutcome;

/// Reset `SIGHUP`/`SIGINT`/`SIGQUIT`/`SIGTERM` to their default disposition.
/// Safe to call only between `fork` and `exec` (i.e. inside `pre_exec`).
fn reset_default_dispositions() -> std::io::Result<()> {
    unsafe {
        for sig in [libc::SIGHUP, libc::SIGINT, libc::SIGQUIT, libc::SIGTERM] {
            if libc::signal(sig, libc::SIG_DFL) == libc::SIG_ERR {
                return Err(std::io::Error::last_os_error());
            }
        }
    }
    Ok(())
}

/// Ignore `SIGINT`/`SIGQUIT`/`SIGTSTP` in the running (parent) process. Call
/// once at startup.
pub fn ignore_job_control_signals() {
    unsafe {
        libc::signal(libc::SIGINT, libc::SIG_IGN);
        libc::signal(libc::SIGQUIT, libc::SIG_IGN);
        libc::signal(libc::SIGTSTP, libc::SIG_IGN);
    }
}

/// A single foreground child: its own process group, holding the terminal
/// for the duration of the wait.
pub struct ForegroundJob {
    child: std::process::Child,
    parent_pgrp: libc::pid_t,
}

impl ForegroundJob {
    /// Spawn `command` via `/bin/sh -c`, placing it in a new process group
    /// and giving it the controlling terminal.
    pub fn spawn(command: &str, cwd: &Path) -> Result<Self> {
        let parent_pgrp = unsafe { libc::getpgrp() };
        let mut builder = Command::new("/bin/sh");
        builder.arg("-c").arg(command).current_dir(cwd);
        // SAFETY: pre_exec runs in the forked child before exec; only
        // async-signal-safe calls are made here.
        unsafe {
            builder.pre_exec(|| {
                reset_default_dispositions()?;
                let pid = libc::getpid();
                if libc::setpgid(0, pid) != 0 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }
        let child = builder.spawn().context("failed to spawn child process")?;
        let child_pgrp = child.id() as libc::pid_t;
        unsafe {
            libc::tcsetpgrp(libc::STDIN_FILENO, child_pgrp);
        }
        Ok(Self { child, parent_pgrp })
    }

    /// Wait for the child to exit, then reclaim the terminal for the parent.
    pub fn wait(mut self) -> Result<SpawnOutcome> {
        let status = self
            .child
            .wait()
            .context("failed to wait for child process")?;
        unsafe {
            libc::tcsetpgrp(libc::STDIN_FILENO, self.parent_pgrp);
        }
        Ok(classify_status(status))
    }
}

fn classify_status(status: std::process::ExitStatus) -> SpawnOutcome {
    use std::os::unix::process::ExitStatusExt;
    match status.code() {
        Some(code) => SpawnOutcome::Exited(code),
        None => match status.signal() {
            Some(_) => SpawnOutcome::Signaled,
            None => SpawnOutcome::Exited(1),
        },
    }
}

/// Spawn a background command (trailing `&`), detached from the controlling
/// terminal, and attempt one non-blocking reap in case it has already
/// exited (e.g. a trivial `true &`).
pub fn spawn_background(command: &str, cwd: &Path) -> Result<()> {
    let mut child = Command::new("/bin/sh")
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .spawn()
        .context("failed to spawn background process")?;
    if let Ok(Some(_status)) = child.try_wait() {
        // Already exited; nothing further to reap.
    }
    Ok(())
}
