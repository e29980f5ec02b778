//! Artifact write and archive move for formatted notes.
//!
//! The write happens first; the original is only moved once the artifact is
//! safely on disk, so a failure at any point leaves the staged note intact.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::config::Workspace;
use crate::error::PipelineError;

/// Tool identity recorded in artifact headers.
const TOOL_NAME: &str = "noteform";

/// Compact sortable stamp embedded in artifact filenames.
const FILE_STAMP: &str = "%Y%m%d-%H%M%S";

/// Human-readable stamp recorded in artifact headers.
const HEADER_STAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Write the formatted artifact to the workspace root, then move the
/// original into the archive under its own name.
pub fn commit(
    ws: &Workspace,
    source: &Path,
    formatted: &str,
    model: &str,
    strict_archive: bool,
) -> Result<PathBuf, PipelineError> {
    commit_at(ws, source, formatted, model, strict_archive, Local::now())
}

/// Commit with an explicit timestamp; the single capture feeds both the
/// filename stamp and the header stamp.
fn commit_at(
    ws: &Workspace,
    source: &Path,
    formatted: &str,
    model: &str,
    strict_archive: bool,
    stamp: DateTime<Local>,
) -> Result<PathBuf, PipelineError> {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "note".to_string());
    let original_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| stem.clone());

    let output_path = ws
        .root()
        .join(format!("{stem}-{}.md", stamp.format(FILE_STAMP)));
    let artifact = render_artifact(&original_name, &stamp, model, formatted);
    write_new(&output_path, &artifact).map_err(|err| PipelineError::WriteFailed {
        path: output_path.clone(),
        source: err,
    })?;

    let dest = ws.archive_dir().join(&original_name);
    if strict_archive && dest.exists() {
        return Err(PipelineError::ArchiveMoveFailed {
            output: output_path,
            dest,
            detail: "an entry with this name is already archived".to_string(),
        });
    }
    move_file(source, &dest).map_err(|err| PipelineError::ArchiveMoveFailed {
        output: output_path.clone(),
        dest: dest.clone(),
        detail: err.to_string(),
    })?;

    Ok(output_path)
}

/// Provenance header followed by a blank line and the formatted text.
fn render_artifact(
    original_name: &str,
    stamp: &DateTime<Local>,
    model: &str,
    body: &str,
) -> String {
    format!(
        "<!-- Formatted by {TOOL_NAME} -->\n<!-- Original file: {original_name} -->\n<!-- Processed: {} -->\n<!-- Model: {model} -->\n\n{body}",
        stamp.format(HEADER_STAMP)
    )
}

/// Create the artifact, refusing to clobber an existing file at the path.
fn write_new(path: &Path, contents: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(contents.as_bytes())
}

/// Rename into the archive, copying across devices when rename fails.
fn move_file(source: &Path, dest: &Path) -> io::Result<()> {
    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }
    fs::copy(source, dest)?;
    fs::remove_file(source)
}
