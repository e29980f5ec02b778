//! Failure taxonomy for the formatting pipeline.
//!
//! Every stage returns one of these instead of panicking, so the driver can
//! decide per mode whether a failure halts the run or is tolerated.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The system prompt resource is missing.
    #[error("system prompt not found at {}", path.display())]
    ResourceNotFound { path: PathBuf },

    /// A reference resolved to nothing under the searched scope.
    #[error("file '{reference}' not found under {}", scope.display())]
    NotFound { reference: String, scope: PathBuf },

    /// A bare filename matched more than one staged note.
    #[error("multiple files named '{reference}' found: {}; specify a fuller path", candidates.join(", "))]
    Ambiguous {
        reference: String,
        candidates: Vec<String>,
    },

    /// A note or resource exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backend could not be reached at all.
    #[error("backend unreachable: {detail}")]
    Unreachable { detail: String },

    /// The backend answered with a non-success status.
    #[error("backend returned status {status}")]
    BadStatus { status: u16 },

    /// The backend answered with a body the client could not interpret.
    #[error("malformed backend response: {detail}")]
    MalformedResponse { detail: String },

    /// The backend did not answer within the request bound.
    #[error("backend did not respond within {limit_secs}s")]
    Timeout { limit_secs: u64 },

    /// The output artifact could not be written; the original is untouched.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The artifact was written but the original could not be archived.
    #[error(
        "failed to archive original to {}: {detail} (formatted output kept at {})",
        dest.display(),
        output.display()
    )]
    ArchiveMoveFailed {
        output: PathBuf,
        dest: PathBuf,
        detail: String,
    },
}
