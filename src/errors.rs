//! Typed error kinds layered under `anyhow`.
//!
//! Call sites still propagate with `anyhow::Result` and `.context(...)`,
//! exactly as the rest of the crate does; `CoreErrorKind` is attached with
//! `.context(CoreErrorKind::Input)` (or similar) only where the dispatcher
//! needs to later recover *which* kind of failure occurred (to pick an exit
//! code or a `<program>: <subject>: <reason>` prefix).

use std::fmt;

/// The six error kinds named in the error-handling design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CoreErrorKind {
    /// Bad syntax, bad ELN, empty selection, no such bookmark/workspace.
    #[error("input error")]
    Input,
    /// Cannot open, read, or write a file.
    #[error("I/O error")]
    Io,
    /// Access denied.
    #[error("permission error")]
    Permission,
    /// A spawned child exited with a non-zero status.
    #[error("child exited non-zero")]
    ChildExited,
    /// A spawned child was killed by a signal / crashed.
    #[error("child crashed")]
    ChildCrashed,
    /// Allocation failure; always fatal, never recoverable.
    #[error("allocation failure")]
    AllocFatal,
}

impl CoreErrorKind {
    /// Recover the kind attached to an `anyhow::Error`, if any.
    pub fn of(err: &anyhow::Error) -> Option<CoreErrorKind> {
        err.chain().find_map(|cause| cause.downcast_ref().copied())
    }

    /// Conventional Unix exit code for this error kind.
    pub fn exit_code(self) -> i32 {
        match self {
            CoreErrorKind::Input | CoreErrorKind::Io | CoreErrorKind::Permission => 1,
            CoreErrorKind::ChildExited => 1,
            CoreErrorKind::ChildCrashed => 130,
            CoreErrorKind::AllocFatal => 1,
        }
    }
}

/// Format a user-visible failure message: `<program>: <subject>: <reason>`.
pub fn user_message(program: &str, subject: &str, reason: impl fmt::Display) -> String {
    format!("{program}: {subject}: {reason}")
}
