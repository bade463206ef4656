use owo_colors::OwoColorize;

/// Small wrapper around stdout/stderr printing to provide consistent, colored
/// user-facing messages. Colors are enabled only when output is a TTY.
pub fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

/// Same check for stderr, which carries warnings and errors.
pub fn is_stderr_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

/// Visual category of a user-facing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Info,
    Success,
    Warn,
    Error,
}

/// Render one line with its prefix, colored when `color` is set.
pub fn render(tone: Tone, msg: &str, color: bool) -> String {
    let prefix = match tone {
        Tone::Plain => return msg.to_string(),
        Tone::Info => "info:",
        Tone::Success => "ok:",
        Tone::Warn => "warn:",
        Tone::Error => "error:",
    };
    if !color {
        return format!("{prefix} {msg}");
    }
    let prefix = match tone {
        Tone::Info => prefix.cyan().bold().to_string(),
        Tone::Success => prefix.green().bold().to_string(),
        Tone::Warn => prefix.yellow().bold().to_string(),
        _ => prefix.red().bold().to_string(),
    };
    format!("{prefix} {msg}")
}

/// Highlight a value (path, label) inside a plain line.
pub fn highlight(value: &str, color: bool) -> String {
    if color {
        value.green().to_string()
    } else {
        value.to_string()
    }
}

pub fn print_info(msg: &str) {
    println!("{}", render(Tone::Info, msg, is_tty()));
}

pub fn print_warn(msg: &str) {
    eprintln!("{}", render(Tone::Warn, msg, is_stderr_tty()));
}

pub fn print_error(msg: &str) {
    eprintln!("{}", render(Tone::Error, msg, is_stderr_tty()));
}

pub fn print_success(msg: &str) {
    println!("{}", render(Tone::Success, msg, is_tty()));
}

/// Print a plain user-facing line (no prefix). Use this for primary outputs
/// such as label listings which users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_render_has_no_prefix() {
        assert_eq!(render(Tone::Plain, "hello", false), "hello");
    }

    #[test]
    fn uncolored_prefixes() {
        assert_eq!(render(Tone::Success, "done", false), "ok: done");
        assert_eq!(render(Tone::Error, "boom", false), "error: boom");
        assert_eq!(render(Tone::Warn, "hmm", false), "warn: hmm");
        assert_eq!(render(Tone::Info, "fyi", false), "info: fyi");
    }

    #[test]
    fn colored_render_keeps_message() {
        let line = render(Tone::Success, "done", true);
        assert!(line.contains("done"));
        assert!(line.contains("ok:"));
    }
}
