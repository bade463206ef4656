//! Tracing initialization.
//!
//! One registry, filtered by the configured `LogLevel`, with a console layer on
//! stderr and an optional non-blocking file layer. Both use the same format
//! (compact or JSON). stdout is left to prompts and results.

use anyhow::Result;
use chrono::Local;
use std::fmt as stdfmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry, fmt as tsfmt, registry};

use confcopy::output as out;
use confcopy::{LogLevel, path_has_symlink_ancestor};

type Filtered = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// DD/MM/YY HH:MM:SS in local time.
struct LocalHumanTime;

impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

fn directive(lvl: &LogLevel) -> &'static str {
    match lvl {
        LogLevel::Quiet => "error",
        LogLevel::Normal => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "trace",
    }
}

fn fmt_layer<W>(writer: W, json: bool, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tsfmt::layer()
        .with_timer(LocalHumanTime)
        .with_target(true)
        .with_thread_names(true)
        .with_ansi(ansi)
        .with_writer(writer);
    if json {
        layer.json().boxed()
    } else {
        layer.compact().boxed()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    opts.open(path)
}

/// Non-blocking writer for `path`, or None (with the reason on stderr) when
/// an ancestor is a symlink or the file cannot be opened.
fn file_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(false) => {}
        Ok(true) => {
            eprintln!(
                "Refusing to enable file logging: ancestor of {} is a symlink.",
                path.display()
            );
            return None;
        }
        Err(e) => {
            eprintln!("Cannot check log path {} for symlinks: {e}", path.display());
            return None;
        }
    }

    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match open_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            eprintln!("Failed to open log file {}: {e}", path.display());
            None
        }
    }
}

/// Install the global subscriber. The returned guard (present only with a
/// working log file) must live until exit so buffered lines get flushed.
pub fn init_tracing(
    lvl: &LogLevel,
    log_file: Option<&Path>,
    json: bool,
) -> Result<Option<WorkerGuard>> {
    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(
        io::stderr,
        json,
        out::is_stderr_tty(),
    )];

    let mut guard = None;
    if let Some(path) = log_file {
        match file_writer(path) {
            Some((writer, g)) => {
                layers.push(fmt_layer(writer, json, false));
                guard = Some(g);
            }
            None => out::print_warn(&format!(
                "File logging to '{}' is disabled; logs continue on stderr.",
                path.display()
            )),
        }
    }

    registry()
        .with(EnvFilter::new(directive(lvl)))
        .with(layers)
        .try_init()?;
    Ok(guard)
}
