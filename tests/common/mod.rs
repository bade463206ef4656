//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::Path;

use confcopy::Terminal;
use confcopy::output::Tone;

/// Terminal that answers overwrite questions with a fixed rule and records
/// every interaction.
pub struct Scripted {
    answer: Box<dyn Fn(&str) -> bool + Send>,
    pub questions: Vec<String>,
    pub lines: Vec<String>,
}

impl Scripted {
    pub fn answering(answer: impl Fn(&str) -> bool + Send + 'static) -> Self {
        Self {
            answer: Box::new(answer),
            questions: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn always(yes: bool) -> Self {
        Self::answering(move |_| yes)
    }
}

impl Terminal for Scripted {
    fn text_input(&mut self, _label: &str) -> io::Result<String> {
        Ok(String::new())
    }

    fn multiselect(&mut self, _label: &str, _options: &[String]) -> io::Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        self.questions.push(question.to_string());
        Ok((self.answer)(question))
    }

    fn say(&mut self, _tone: Tone, message: &str) {
        self.lines.push(message.to_string());
    }
}

pub fn write_file(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}
