//! Fake prompter for testing.
//!
//! Pre-loaded with queues of responses. Each `select()`/`confirm()` call
//! pops the next response from its own queue. Errors if a queue is
//! exhausted or a selection index is out of range for the given items.

use anyhow::{Result, bail};
use std::cell::RefCell;
use std::collections::VecDeque;

use super::Prompter;

/// Mock prompter — returns pre-configured responses in order.
pub struct FakePrompter {
    selections: RefCell<VecDeque<usize>>,
    confirmations: RefCell<VecDeque<bool>>,
}

impl FakePrompter {
    /// Create a prompter that returns the given selection responses in order.
    pub fn new(responses: Vec<usize>) -> Self {
        Self {
            selections: RefCell::new(responses.into()),
            confirmations: RefCell::new(VecDeque::new()),
        }
    }

    /// Queue a sequence of confirm() responses, returned in order.
    pub fn with_confirmations(self, responses: Vec<bool>) -> Self {
        *self.confirmations.borrow_mut() = responses.into();
        self
    }

    /// How many unconsumed selection responses remain.
    pub fn remaining(&self) -> usize {
        self.selections.borrow().len()
    }
}

impl Prompter for FakePrompter {
    fn select(&self, prompt: &str, items: &[&str], _default: usize) -> Result<usize> {
        let response = self.selections.borrow_mut().pop_front();
        match response {
            Some(idx) => {
                if idx >= items.len() {
                    bail!(
                        "FakePrompter: response index {} out of range for {} items (prompt: \"{}\")",
                        idx,
                        items.len(),
                        prompt
                    );
                }
                Ok(idx)
            }
            None => bail!(
                "FakePrompter: no more selection responses queued (prompt: \"{}\")",
                prompt
            ),
        }
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        match self.confirmations.borrow_mut().pop_front() {
            Some(answer) => Ok(answer),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_responses_in_order() {
        let prompter = FakePrompter::new(vec![0, 2, 1]);
        assert_eq!(prompter.select("q1", &["a", "b", "c"], 0).unwrap(), 0);
        assert_eq!(prompter.select("q2", &["a", "b", "c"], 0).unwrap(), 2);
        assert_eq!(prompter.select("q3", &["a", "b", "c"], 0).unwrap(), 1);
    }

    #[test]
    fn exhausted_queue_fails() {
        let prompter = FakePrompter::new(vec![0]);
        prompter.select("q1", &["a"], 0).unwrap();
        assert!(prompter.select("q2", &["a"], 0).is_err());
    }

    #[test]
    fn out_of_range_fails() {
        let prompter = FakePrompter::new(vec![5]);
        assert!(prompter.select("q1", &["a", "b"], 0).is_err());
    }

    #[test]
    fn confirm_uses_queued_then_default() {
        let prompter = FakePrompter::new(vec![]).with_confirmations(vec![true]);
        assert!(prompter.confirm("overwrite?", false).unwrap());
        assert!(!prompter.confirm("overwrite again?", false).unwrap());
    }
}
