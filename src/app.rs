//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the interrupt handler,
//! walks the user through destination, selection and confirmation, then hands
//! the resolved file list to the copy engine.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use confcopy::cli::Args;
use confcopy::config::{CONFIG_ENV, create_template_config, load_config};
use confcopy::output::{self as out, Tone};
use confcopy::{
    BatchError, Catalog, ConfirmationGate, Config, CopyOrchestrator, Terminal, default_config_path,
    normalize_path, stdio_terminal,
};

use crate::logging::init_tracing;

const PATH_PROMPT: &str = "1. Project path";
const SELECT_PROMPT: &str = "2. Which configurations do you want to copy to your project?";

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config / --init-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(());
    }
    if args.init_config {
        let path = default_config_path().context("could not determine a config path")?;
        create_template_config(&path)?;
        out::print_success(&format!(
            "A template confcopy config was written to: {}",
            path.display()
        ));
        out::print_info(&format!(
            "Edit it to point `catalog` and `source_dir` at your bundles. To use a different location set {CONFIG_ENV}."
        ));
        return Ok(());
    }

    // Config file values first, CLI flags on top.
    let (mut cfg, loaded_from) = match load_config()? {
        Some((cfg, path)) => (cfg, Some(path)),
        None => (Config::default(), None),
    };
    args.apply_overrides(&mut cfg);

    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json)
        .context("failed to initialize logging")?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            out::print_warn("Interrupted; stopping.");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
            std::process::exit(130);
        })
        .context("failed to install interrupt handler")?;
    }

    debug!(?args, "Starting confcopy");
    match &loaded_from {
        Some(p) => debug!(path = %p.display(), "Loaded config file"),
        None => debug!("No config file found; using defaults"),
    }

    let result = execute(&args, &cfg);
    if let Err(e) = &result {
        match e.downcast_ref::<BatchError>() {
            Some(BatchError::Failed { failed, total }) => {
                error!(failed, total, kind = "batch_failed", "Copy finished with errors")
            }
            Some(other) => error!(error = %other, kind = "batch_aborted", "Copy aborted"),
            None => error!(error = %format!("{e:#}"), "confcopy failed"),
        }
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

fn print_config_location() {
    if let Some(cfg_env) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        out::print_info(&format!(
            "Using {CONFIG_ENV} (explicit):\n  {}\n",
            Path::new(&cfg_env).display()
        ));
        out::print_info(&format!(
            "To override, unset {CONFIG_ENV} or set it to another file."
        ));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default confcopy config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run with --init-config to create a template.");
            }
        }
        None => out::print_error("Could not determine a default config path."),
    }
}

fn execute(args: &Args, cfg: &Config) -> Result<()> {
    let catalog = Catalog::load(&cfg.catalog).context("Failed to read config file")?;
    info!(path = %cfg.catalog.display(), bundles = catalog.len(), "Catalog loaded");

    if args.list {
        for label in catalog.labels() {
            out::print_user(&label);
        }
        return Ok(());
    }

    // Entries under a bad source dir fail one by one in the report.
    if let Err(e) = cfg.validate() {
        warn!(error = %format!("{e:#}"), "Source directory check failed");
    }

    let color = out::is_tty();
    let hl = |p: &Path| out::highlight(&p.display().to_string(), color);
    let gate = ConfirmationGate::new(stdio_terminal());

    let raw_dest = match &args.dest {
        Some(d) => d.clone(),
        None => gate
            .with(|t| t.text_input(PATH_PROMPT))
            .context("Failed to input file path")?,
    };
    let project = normalize_path(&raw_dest).context("Failed to input file path")?;
    gate.say(
        Tone::Plain,
        &format!("Normalized file path is {}", hl(project.as_path())),
    );

    let selection = match &args.select {
        Some(s) => s.clone(),
        None => {
            let labels = catalog.labels();
            gate.with(|t| t.multiselect(SELECT_PROMPT, &labels))
                .context("Failed to read selection")?
        }
    };
    let files = catalog.resolve(&selection);
    debug!(selected = ?selection, files = files.len(), "Selection resolved");

    gate.with(|t| {
        t.say(
            Tone::Plain,
            &format!(
                "Following files will be copied to the project path {}",
                hl(project.as_path())
            ),
        );
        for f in &files {
            t.say(
                Tone::Plain,
                &format!("- {}", hl(cfg.source_dir.join(&f.path).as_path())),
            );
        }
    });

    if args.dry_run {
        gate.say(Tone::Info, "Dry-run: nothing was copied.");
        return Ok(());
    }

    let proceed = if args.yes {
        true
    } else {
        gate.confirm("Do you want to proceed?")
            .context("Failed to read confirmation")?
    };
    gate.say(Tone::Plain, "");
    if !proceed {
        gate.say(Tone::Error, "You cancelled copying!");
        info!("Copy cancelled by user");
        return Ok(());
    }

    let report = CopyOrchestrator::new(&gate, &cfg.source_dir)
        .with_overwrite(cfg.overwrite)
        .with_max_concurrency(cfg.max_concurrency)
        .copy_all(&files, &project)?;
    info!(
        copied = report.succeeded,
        dest = %project.display(),
        "Copy completed"
    );
    Ok(())
}
