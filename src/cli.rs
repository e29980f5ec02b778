//! CLI argument parsing for the note formatting pipeline.
//!
//! The CLI is intentionally thin: it selects one of the three pipeline modes
//! and carries the model override, nothing more.
use clap::Parser;

use crate::lm::DEFAULT_MODEL;

#[derive(Parser, Debug)]
#[command(
    name = "noteform",
    version,
    about = "Format staged notes with a local Ollama model",
    after_help = "Modes:\n  (no arguments)   Format every staged note\n  --file <REF>     Format a single note\n  --list-files     List staged notes without formatting\n\nExamples:\n  noteform\n  noteform --file meeting.md\n  noteform --file notes/meeting.md --model llama3.1:8b\n  noteform --list-files"
)]
pub struct Args {
    /// Note to format: a `preformatted/...` path, a staging-relative path,
    /// or a bare filename searched recursively
    #[arg(long, short, value_name = "REF")]
    pub file: Option<String>,

    /// Ollama model used for formatting
    #[arg(long, short, value_name = "MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// List staged notes and exit without side effects
    #[arg(long, short = 'l', conflicts_with = "file")]
    pub list_files: bool,

    /// Fail instead of overwriting a same-named entry in the archive
    #[arg(long)]
    pub strict_archive: bool,
}
