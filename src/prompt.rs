use std::fs;
use std::io;

use crate::config::Workspace;
use crate::error::PipelineError;

/// Load the instruction template shipped at `prompts/system.md`.
///
/// Read fresh on every invocation so edits take effect without a rebuild.
/// Absence is fatal for any operation that formats notes; listing never
/// needs it.
pub fn load_system_prompt(ws: &Workspace) -> Result<String, PipelineError> {
    let path = ws.system_prompt_path();
    match fs::read_to_string(&path) {
        Ok(text) => Ok(text.trim().to_string()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(PipelineError::ResourceNotFound { path })
        }
        Err(err) => Err(PipelineError::ReadFailed { path, source: err }),
    }
}
