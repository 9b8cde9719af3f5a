use owo_colors::OwoColorize;

use crate::relocator::{RelocationOutcome, RowOutcome};

/// Small wrapper around stdout/stderr printing to provide consistent, colored
/// user-facing messages. Colors are enabled only when output is a TTY.
fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// One human-readable line per mapping row (row numbers are 1-based here).
pub fn describe_row(o: &RowOutcome) -> String {
    let artifact = o
        .artifact
        .as_deref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<no part>".into());
    let row = o.row + 1;
    match &o.outcome {
        RelocationOutcome::Moved if o.folder_created => format!(
            "row {row}: {artifact} -> {} (folder created)",
            o.destination.display()
        ),
        RelocationOutcome::Moved => format!("row {row}: {artifact} -> {}", o.destination.display()),
        RelocationOutcome::SkippedMissingArtifact => format!("row {row}: {artifact} not found, skipped"),
        RelocationOutcome::SkippedUserDeclinedFolder => format!(
            "row {row}: folder not created, {artifact} left unfiled ({})",
            o.destination.parent().map(|p| p.display().to_string()).unwrap_or_default()
        ),
        RelocationOutcome::Failed(e) => format!("row {row}: {artifact} failed: {e}"),
    }
}

/// Print a row outcome with the prefix matching its severity.
pub fn print_row(o: &RowOutcome) {
    let line = describe_row(o);
    match o.outcome {
        RelocationOutcome::Moved => print_success(&line),
        RelocationOutcome::Failed(_) => print_error(&line),
        _ => print_warn(&line),
    }
}
