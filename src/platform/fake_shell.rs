//! Fake command execution — records invocations, never forks.

use anyhow::Result;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use super::{Shell, SpawnOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub cwd: PathBuf,
}

pub struct FakeShell {
    foreground: RefCell<Vec<Invocation>>,
    background: RefCell<Vec<Invocation>>,
    captures: RefCell<Vec<Invocation>>,
    outcome: RefCell<SpawnOutcome>,
    capture_output: RefCell<String>,
    fail: RefCell<bool>,
}

impl FakeShell {
    pub fn new() -> Self {
        Self {
            foreground: RefCell::new(Vec::new()),
            background: RefCell::new(Vec::new()),
            captures: RefCell::new(Vec::new()),
            outcome: RefCell::new(SpawnOutcome::Exited(0)),
            capture_output: RefCell::new(String::new()),
            fail: RefCell::new(false),
        }
    }

    pub fn set_outcome(&self, outcome: SpawnOutcome) {
        *self.outcome.borrow_mut() = outcome;
    }

    pub fn set_capture_output(&self, output: impl Into<String>) {
        *self.capture_output.borrow_mut() = output.into();
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.borrow_mut() = fail;
    }

    pub fn foreground_calls(&self) -> Vec<Invocation> {
        self.foreground.borrow().clone()
    }

    pub fn background_calls(&self) -> Vec<Invocation> {
        self.background.borrow().clone()
    }

    pub fn captured_calls(&self) -> Vec<Invocation> {
        self.captures.borrow().clone()
    }
}

impl Default for FakeShell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell for FakeShell {
    fn run_foreground(&self, command: &str, cwd: &Path) -> Result<SpawnOutcome> {
        if *self.fail.borrow() {
            anyhow::bail!("simulated spawn failure: {command}");
        }
        self.foreground.borrow_mut().push(Invocation {
            command: command.to_string(),
            cwd: cwd.to_path_buf(),
        });
        Ok(self.outcome.borrow().clone())
    }

    fn run_background(&self, command: &str, cwd: &Path) -> Result<()> {
        if *self.fail.borrow() {
            anyhow::bail!("simulated spawn failure: {command}");
        }
        self.background.borrow_mut().push(Invocation {
            command: command.to_string(),
            cwd: cwd.to_path_buf(),
        });
        Ok(())
    }

    fn capture(&self, command: &str, cwd: &Path) -> Result<String> {
        if *self.fail.borrow() {
            anyhow::bail!("simulated spawn failure: {command}");
        }
        self.captures.borrow_mut().push(Invocation {
            command: command.to_string(),
            cwd: cwd.to_path_buf(),
        });
        Ok(self.capture_output.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_foreground_invocation() {
        let shell = FakeShell::new();
        shell
            .run_foreground("ls", Path::new("/tmp"))
            .expect("run_foreground");
        let calls = shell.foreground_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].command, "ls");
    }

    #[test]
    fn capture_returns_configured_output() {
        let shell = FakeShell::new();
        shell.set_capture_output("hello");
        let out = shell.capture("echo hello", Path::new("/tmp")).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn fail_toggle_errors_every_call() {
        let shell = FakeShell::new();
        shell.set_fail(true);
        assert!(shell.run_foreground("x", Path::new("/tmp")).is_err());
        assert!(shell.run_background("x", Path::new("/tmp")).is_err());
        assert!(shell.capture("x", Path::new("/tmp")).is_err());
    }
}
