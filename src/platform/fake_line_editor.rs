//! Fake line editor for testing — returns a pre-queued sequence of lines,
//! `None` once exhausted (simulating EOF/Ctrl-D).

use std::collections::VecDeque;

use super::LineEditor;

pub struct FakeLineEditor {
    lines: VecDeque<String>,
    history: Vec<String>,
}

impl FakeLineEditor {
    pub fn new(lines: Vec<&str>) -> Self {
        Self {
            lines: lines.into_iter().map(String::from).collect(),
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl LineEditor for FakeLineEditor {
    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        self.lines.pop_front()
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_queued_lines_then_none() {
        let mut editor = FakeLineEditor::new(vec!["ls", "cd /tmp"]);
        assert_eq!(editor.read_line("> ").as_deref(), Some("ls"));
        assert_eq!(editor.read_line("> ").as_deref(), Some("cd /tmp"));
        assert_eq!(editor.read_line("> "), None);
    }

    #[test]
    fn records_history() {
        let mut editor = FakeLineEditor::new(vec![]);
        editor.add_history("ls");
        editor.add_history("pwd");
        assert_eq!(editor.history(), &["ls".to_string(), "pwd".to_string()]);
    }
}
