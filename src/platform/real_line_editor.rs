//! Production `LineEditor` wrapping `rustyline`, with file-backed history
//! (§6's command-history-file persistence).

use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::LineEditor;

pub struct RealLineEditor {
    inner: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl RealLineEditor {
    pub fn new(history_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut inner = DefaultEditor::new()?;
        if let Some(path) = &history_path {
            let _ = inner.load_history(path);
        }
        Ok(Self { inner, history_path })
    }
}

impl LineEditor for RealLineEditor {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        match self.inner.readline(prompt) {
            Ok(line) => Some(line),
            Err(rustyline::error::ReadlineError::Eof) => None,
            Err(rustyline::error::ReadlineError::Interrupted) => Some(String::new()),
            Err(e) => {
                warn!("line editor error: {e}");
                None
            }
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.inner.add_history_entry(line);
        if let Some(path) = &self.history_path {
            save_history(&mut self.inner, path);
        }
    }
}

fn save_history(editor: &mut DefaultEditor, path: &Path) {
    if let Err(e) = editor.save_history(path) {
        warn!("failed to save command history to {}: {e}", path.display());
    }
}
