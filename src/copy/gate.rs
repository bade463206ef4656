//! Confirmation gate: the one lock in front of the terminal.
//!
//! Overwrite prompts and per-result status lines both go through here, so a
//! question never shows up in the middle of result output and two questions
//! never compete for the same input line. The lock covers one interaction
//! only; file I/O happens outside it.

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::output::Tone;
use crate::prompt::Terminal;

pub struct ConfirmationGate<T> {
    terminal: Mutex<T>,
}

impl<T: Terminal> ConfirmationGate<T> {
    pub fn new(terminal: T) -> Self {
        Self {
            terminal: Mutex::new(terminal),
        }
    }

    /// Run `f` with exclusive access to the terminal.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Ask a yes/no question while holding the gate.
    pub fn confirm(&self, question: &str) -> io::Result<bool> {
        self.with(|t| t.confirm(question))
    }

    /// Print one line while holding the gate.
    pub fn say(&self, tone: Tone, message: &str) {
        self.with(|t| t.say(tone, message));
    }

    pub fn into_inner(self) -> T {
        self.terminal
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // A task that panicked mid-prompt must not wedge every other task.
    fn lock(&self) -> MutexGuard<'_, T> {
        self.terminal.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
