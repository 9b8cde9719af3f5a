//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the interrupt handler, resolves the
//! mapping workbook, runs one split-and-relocate cycle and reports each row.

use anyhow::{Context, Result, anyhow, bail};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

use pdf_splitter::cli::Args;
use pdf_splitter::config::{
    CONFIG_ENV, Config, LoadResult, default_config_path, default_state_path, load_or_init, load_remembered_mapping,
    remember_mapping,
};
use pdf_splitter::confirm::{AlwaysCreate, ConsolePrompt, FolderConfirmer, NeverCreate};
use pdf_splitter::output as out;
use pdf_splitter::pipeline::{CycleReport, CycleRequest, run_cycle};
use pdf_splitter::{PipelineError, shutdown};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_locations();
        return Ok(());
    }

    let mut cfg = match load_or_init()? {
        LoadResult::Loaded(cfg, _) => cfg,
        LoadResult::CreatedTemplate(path) => {
            out::print_success(&format!("A template pdf_splitter config was written to: {}", path.display()));
            out::print_info(&format!("Edit it to change the defaults. To use a different file set {CONFIG_ENV}."));
            Config::default()
        }
        LoadResult::Defaults => Config::default(),
    };
    args.apply_overrides(&mut cfg);

    if let Some(raw) = args.log_level.as_deref()
        && args.effective_log_level().is_none()
    {
        out::print_warn(&format!("Unknown log level '{raw}'; keeping '{}'", cfg.log_level));
    }

    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; finishing the current row and stopping...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .context("failed to install interrupt handler")?;
    }

    debug!("Starting pdf_splitter: {:?}", args);

    let result = (|| -> Result<()> {
        if let Err(e) = cfg.validate() {
            log_fatal(&e);
            return Err(e.into());
        }

        let document = args
            .document
            .clone()
            .ok_or_else(|| anyhow!("no document given"))?;
        let mapping = resolve_mapping(&args)?;
        if args.remember {
            match default_state_path() {
                Some(state) => remember_mapping(&state, &mapping)?,
                None => warn!("no location available to remember the mapping workbook"),
            }
        }

        let mut confirmer: Box<dyn FolderConfirmer> = if args.yes {
            Box::new(AlwaysCreate)
        } else if args.no_create {
            Box::new(NeverCreate)
        } else {
            Box::new(ConsolePrompt::stdio())
        };

        let request = CycleRequest {
            document,
            mapping,
            layout: cfg.layout.clone(),
            pages_per_split: cfg.pages_per_split,
            scratch_dir: cfg.scratch_dir.clone(),
        };

        let report = match run_cycle(&request, confirmer.as_mut()) {
            Ok(r) => r,
            Err(e) => {
                log_fatal(&e);
                return Err(e.into());
            }
        };

        summarize(&report)
    })();

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

fn print_config_locations() {
    match std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        Some(p) => out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {}", PathBuf::from(p).display())),
        None => match default_config_path() {
            Some(p) => {
                out::print_info(&format!("Default pdf_splitter config path:\n  {}", p.display()));
                if !p.exists() {
                    out::print_info("No config file exists there yet. A template is written on the next run.");
                }
            }
            None => out::print_error("Could not determine a default config path"),
        },
    }
    if let Some(state) = default_state_path() {
        out::print_info(&format!("Remembered workbook is stored in:\n  {}", state.display()));
        if let Some(mapping) = load_remembered_mapping(&state) {
            out::print_info(&format!("Remembered workbook:\n  {}", mapping.display()));
        }
    }
}

/// `--mapping` wins; otherwise fall back to the remembered workbook.
fn resolve_mapping(args: &Args) -> Result<PathBuf> {
    if let Some(m) = &args.mapping {
        return Ok(m.clone());
    }
    match default_state_path().and_then(|s| load_remembered_mapping(&s)) {
        Some(m) => {
            info!(mapping = %m.display(), "using remembered mapping workbook");
            Ok(m)
        }
        None => bail!("no mapping workbook given; pass --mapping (add --remember to keep it for next time)"),
    }
}

fn log_fatal(e: &PipelineError) {
    error!(code = e.code(), kind = e.kind(), error = %e, "cycle aborted");
}

fn summarize(report: &CycleReport) -> Result<()> {
    for row in &report.rows {
        out::print_row(row);
    }
    for path in &report.unprocessed {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        out::print_warn(&format!("{name} had no mapping row and was discarded"));
    }
    if let Some(e) = &report.purge_error {
        out::print_error(&format!("scratch area was not removed: {e}"));
    }

    let summary = format!(
        "{} part(s) created, {} moved, {} skipped, {} failed",
        report.artifacts.len(),
        report.moved(),
        report.skipped(),
        report.failed()
    );
    if report.interrupted {
        out::print_warn(&summary);
        let e = PipelineError::Interrupted;
        error!(code = e.code(), kind = e.kind(), "cycle interrupted");
        return Err(e.into());
    }
    if report.failed() > 0 {
        out::print_error(&summary);
        bail!("{} row(s) could not be relocated", report.failed());
    }
    if report.purge_error.is_some() {
        out::print_warn(&summary);
        bail!("scratch area could not be removed");
    }
    out::print_info(&summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn clean_report_succeeds() {
        assert!(summarize(&CycleReport::default()).is_ok());
    }

    #[test]
    fn purge_failure_fails_the_run() {
        let report = CycleReport {
            purge_error: Some(PipelineError::ScratchWrite {
                op: "remove scratch directory",
                path: PathBuf::from("/tmp/output_pdfs"),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            }),
            ..CycleReport::default()
        };
        assert!(summarize(&report).is_err());
    }
}
