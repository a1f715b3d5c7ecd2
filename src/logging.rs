//! Tracing setup and the bounded message-log ring backing the `msg` verb.

use std::collections::VecDeque;
use tracing_subscriber::EnvFilter;

/// Initialize the `tracing` subscriber from a verbosity delta
/// (`-v` increases, `-q` decreases), using a `<crate>=<level>`
/// env-filter convention.
pub fn init_tracing(verbose: u8, quiet: u8) {
    let level = verbose as i8 - quiet as i8;
    let filter = match level {
        ..=-3 => "fileman=off",
        -2 => "fileman=error",
        -1 => "fileman=warn",
        0 => "fileman=info",
        1 => "fileman=debug",
        2.. => "fileman=trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .without_time()
        .try_init();
}

/// Severity of a logged message, surfaced via the prompt's `E`/`W`/`N`
/// indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Notice,
}

/// One entry in the message ring.
#[derive(Debug, Clone)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

/// Size-bounded ring buffer of warnings/errors/notices, reachable via `msg`.
pub struct MessageLog {
    capacity: usize,
    messages: VecDeque<Message>,
    unread: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            messages: VecDeque::new(),
            unread: 0,
        }
    }

    /// Push a message, evicting the oldest entry if at capacity.
    pub fn push(&mut self, severity: Severity, text: impl Into<String>) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(Message {
            severity,
            text: text.into(),
        });
        self.unread += 1;
    }

    /// All messages, oldest first.
    pub fn all(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Mark every message as read (called when the user runs `msg`).
    pub fn mark_read(&mut self) {
        self.unread = 0;
    }

    /// The highest-severity indicator character for the prompt, if any
    /// message is unread: `E` > `W` > `N`.
    pub fn indicator(&self) -> Option<char> {
        if self.unread == 0 {
            return None;
        }
        self.messages
            .iter()
            .rev()
            .take(self.unread)
            .map(|msg| match msg.severity {
                Severity::Error => 0,
                Severity::Warning => 1,
                Severity::Notice => 2,
            })
            .min()
            .map(|rank| match rank {
                0 => 'E',
                1 => 'W',
                _ => 'N',
            })
    }
}
