//! Pipeline driver composing locator, client, and commit engine.
//!
//! The driver is the only layer that decides whether a failure halts the
//! run (single mode) or is tolerated and tallied (batch mode). Per-note
//! failures go to stdout and never fail the process; only resource loading
//! needed before any transformation is fatal.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::commit;
use crate::config::{Workspace, ARCHIVE_DIR_NAME};
use crate::error::PipelineError;
use crate::lm::Formatter;
use crate::locate;
use crate::prompt;

/// List staged notes without touching the filesystem.
pub fn run_list(ws: &Workspace) -> Result<()> {
    let staging = ws.staging_dir();
    if !staging.exists() {
        println!("Staging directory {} does not exist.", staging.display());
        return Ok(());
    }
    let notes = locate::list_pending(ws);
    if notes.is_empty() {
        println!("No staged notes found.");
        return Ok(());
    }
    println!("Staged notes:");
    for note in &notes {
        println!("  - {}", locate::relative_display(note, &staging));
    }
    Ok(())
}

/// Format a single note identified by `reference`.
pub fn run_single(
    ws: &Workspace,
    formatter: &dyn Formatter,
    reference: &str,
    strict_archive: bool,
) -> Result<()> {
    let system_prompt = prompt::load_system_prompt(ws)?;
    ws.ensure_archive_dir()?;

    let note = match locate::resolve(ws, reference) {
        Ok(note) => note,
        Err(err) => {
            println!("{err}");
            return Ok(());
        }
    };
    process_and_report(ws, formatter, &system_prompt, &note, strict_archive);
    Ok(())
}

/// Format every staged note sequentially, tolerating individual failures.
pub fn run_batch(ws: &Workspace, formatter: &dyn Formatter, strict_archive: bool) -> Result<()> {
    let system_prompt = prompt::load_system_prompt(ws)?;

    let staging = ws.staging_dir();
    if !staging.exists() {
        println!("Staging directory {} does not exist.", staging.display());
        return Ok(());
    }
    let notes = locate::list_pending(ws);
    if notes.is_empty() {
        println!("No staged notes found.");
        return Ok(());
    }
    println!("Found {} note(s) to process.", notes.len());
    ws.ensure_archive_dir()?;

    let mut succeeded = 0;
    for note in &notes {
        if process_and_report(ws, formatter, &system_prompt, note, strict_archive) {
            succeeded += 1;
        }
    }
    println!();
    println!(
        "Processing complete: {succeeded}/{} notes formatted successfully.",
        notes.len()
    );
    Ok(())
}

/// Run one note through read, format, and commit; print the outcome.
///
/// Returns whether the note fully succeeded. An archive-move failure counts
/// as not succeeded for the tally, but its message names the kept artifact
/// so the transformation work is not mistaken for lost.
fn process_and_report(
    ws: &Workspace,
    formatter: &dyn Formatter,
    system_prompt: &str,
    note: &Path,
    strict_archive: bool,
) -> bool {
    let name = note
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| note.display().to_string());
    println!("Processing: {name}");

    match process_note(ws, formatter, system_prompt, note, strict_archive) {
        Ok(output) => {
            println!(
                "  formatted note saved to {}",
                locate::relative_display(&output, ws.root())
            );
            println!("  original archived as {ARCHIVE_DIR_NAME}/{name}");
            true
        }
        Err(err) => {
            println!("  {err}");
            false
        }
    }
}

/// The per-note stage sequence; any stage's failure short-circuits the rest.
fn process_note(
    ws: &Workspace,
    formatter: &dyn Formatter,
    system_prompt: &str,
    note: &Path,
    strict_archive: bool,
) -> Result<PathBuf, PipelineError> {
    let content = fs::read_to_string(note).map_err(|err| PipelineError::ReadFailed {
        path: note.to_path_buf(),
        source: err,
    })?;
    let formatted = formatter.format(&content, system_prompt)?;
    commit::commit(ws, note, &formatted, formatter.model(), strict_archive)
}
