//! Line protocol for piped input.
//!
//! One answer per line: free text, `y`/`n`, or a selection of numbers and
//! labels. A closed input stream surfaces as `UnexpectedEof` rather than a
//! default answer.

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use super::Terminal;
use crate::output::{self, Tone};

/// `Terminal` over a reader/writer pair.
pub struct LineTerminal<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl LineTerminal<BufReader<Stdin>, Stdout> {
    /// Process stdin/stdout; colors follow TTY detection.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout(), output::is_tty())
    }
}

impl<R: BufRead, W: Write> LineTerminal<R, W> {
    pub fn new(input: R, output: W, color: bool) -> Self {
        Self {
            input,
            output,
            color,
        }
    }

    /// Give back the underlying streams.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R, W> Terminal for LineTerminal<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn text_input(&mut self, label: &str) -> io::Result<String> {
        self.ask(&format!("{label}: "))
    }

    fn multiselect(&mut self, label: &str, options: &[String]) -> io::Result<Vec<String>> {
        writeln!(self.output, "{label}")?;
        for (i, opt) in options.iter().enumerate() {
            writeln!(self.output, "  {:>2}) {}", i + 1, output::highlight(opt, self.color))?;
        }
        loop {
            let answer = self.ask("Numbers or labels, comma separated ('all' for every one): ")?;
            match pick(&answer, options) {
                Ok(picked) => return Ok(picked),
                Err(bad) => self.say(Tone::Error, &format!("Not a valid choice: '{bad}'")),
            }
        }
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            let answer = self.ask(&format!("{question} [y/N]: "))?;
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => return Ok(false),
                _ => self.say(Tone::Warn, "Please answer 'y' or 'n'."),
            }
        }
    }

    fn say(&mut self, tone: Tone, message: &str) {
        // Output failures (closed pipe) are not actionable for a status line.
        let _ = writeln!(self.output, "{}", output::render(tone, message, self.color));
        let _ = self.output.flush();
    }
}

/// Resolve an answer to options, in option order. Returns the first token
/// that is neither a 1-based index nor a label.
fn pick(answer: &str, options: &[String]) -> Result<Vec<String>, String> {
    let mut chosen = vec![false; options.len()];
    for token in answer
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if token.eq_ignore_ascii_case("all") {
            chosen.iter_mut().for_each(|c| *c = true);
        } else if let Some(i) = options.iter().position(|o| o == token) {
            chosen[i] = true;
        } else {
            match token.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => chosen[n - 1] = true,
                _ => return Err(token.to_string()),
            }
        }
    }
    Ok(options
        .iter()
        .zip(chosen)
        .filter_map(|(o, c)| c.then(|| o.clone()))
        .collect())
}
