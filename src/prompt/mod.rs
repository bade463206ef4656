//! Interactive prompt provider.
//!
//! `Terminal` is the only seam the copy engine depends on. On a real terminal
//! the prompts are rendered by `cliclack` (filtered multiselect, y/N confirm,
//! text input); when stdin is piped a plain line protocol reads answers one
//! line at a time. Tests plug in scripted implementations.

mod clack;
mod line;

pub use clack::ClackTerminal;
pub use line::LineTerminal;

use std::io;

use crate::output::Tone;

/// One terminal: a single input cursor and a single output stream.
pub trait Terminal: Send {
    /// Ask for one line of free text.
    fn text_input(&mut self, label: &str) -> io::Result<String>;

    /// Let the user pick any subset of `options`; returns picks in option order.
    fn multiselect(&mut self, label: &str, options: &[String]) -> io::Result<Vec<String>>;

    /// Yes/no question; defaults to "no".
    fn confirm(&mut self, question: &str) -> io::Result<bool>;

    /// Print one user-facing line.
    fn say(&mut self, tone: Tone, message: &str);
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn text_input(&mut self, label: &str) -> io::Result<String> {
        (**self).text_input(label)
    }

    fn multiselect(&mut self, label: &str, options: &[String]) -> io::Result<Vec<String>> {
        (**self).multiselect(label, options)
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        (**self).confirm(question)
    }

    fn say(&mut self, tone: Tone, message: &str) {
        (**self).say(tone, message)
    }
}

/// Terminal for this process: `cliclack` when both stdin and stderr are
/// terminals, the line protocol over stdin/stdout otherwise.
pub fn stdio_terminal() -> Box<dyn Terminal> {
    if atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stderr) {
        Box::new(ClackTerminal::new())
    } else {
        Box::new(LineTerminal::stdio())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn boxed_terminal_forwards_every_call() {
        let line = LineTerminal::new(Cursor::new(b"/srv/app\nweb\ny\n".to_vec()), Vec::new(), false);
        let mut term: Box<dyn Terminal> = Box::new(line);
        let opts = vec!["db".to_string(), "web".to_string()];

        assert_eq!(term.text_input("1. Project path").unwrap(), "/srv/app");
        assert_eq!(term.multiselect("Pick", &opts).unwrap(), vec!["web".to_string()]);
        assert!(term.confirm("Proceed?").unwrap());
        assert_eq!(
            term.confirm("Again?").unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }
}
