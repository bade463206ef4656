//! `cliclack` rendering for interactive sessions.
//!
//! cliclack draws on stderr and reads keys from the controlling terminal, so
//! this is only used when both are terminals.

use std::io;

use super::Terminal;
use crate::output::Tone;

/// Prompts drawn by `cliclack`.
#[derive(Debug, Default)]
pub struct ClackTerminal;

impl ClackTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl Terminal for ClackTerminal {
    fn text_input(&mut self, label: &str) -> io::Result<String> {
        cliclack::input(label).interact()
    }

    fn multiselect(&mut self, label: &str, options: &[String]) -> io::Result<Vec<String>> {
        let mut prompt = cliclack::multiselect(label).required(false).filter_mode();
        for opt in options {
            prompt = prompt.item(opt.clone(), opt, "");
        }
        let picked = prompt.interact()?;
        // Keep catalog order regardless of the order keys were toggled in.
        Ok(options
            .iter()
            .filter(|o| picked.contains(o))
            .cloned()
            .collect())
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        cliclack::confirm(question).initial_value(false).interact()
    }

    fn say(&mut self, tone: Tone, message: &str) {
        if message.is_empty() {
            return;
        }
        // Status lines are not actionable if the terminal went away.
        let _ = match tone {
            Tone::Plain => cliclack::log::remark(message),
            Tone::Info => cliclack::log::info(message),
            Tone::Success => cliclack::log::success(message),
            Tone::Warn => cliclack::log::warning(message),
            Tone::Error => cliclack::log::error(message),
        };
    }
}
