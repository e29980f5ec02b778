//! Workspace layout and path resolution.
//!
//! Every directory the pipeline touches derives from a single root chosen at
//! startup, so no component consults ambient global state.

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable selecting the workspace root.
pub const ROOT_ENV: &str = "NOTEFORM_ROOT";

/// Directory under the root holding notes awaiting formatting.
pub const STAGING_DIR_NAME: &str = "preformatted";

/// Directory under the root receiving originals after formatting.
pub const ARCHIVE_DIR_NAME: &str = "processed";

/// System prompt resource, relative to the root.
const SYSTEM_PROMPT_REL: &str = "prompts/system.md";

/// Immutable set of workspace paths shared by every pipeline stage.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve the workspace root from `NOTEFORM_ROOT` or the current
    /// directory.
    pub fn discover() -> Result<Self> {
        let root = match env::var_os(ROOT_ENV) {
            Some(value) => PathBuf::from(value),
            None => env::current_dir().context("resolve current directory")?,
        };
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR_NAME)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.root.join(ARCHIVE_DIR_NAME)
    }

    pub fn system_prompt_path(&self) -> PathBuf {
        self.root.join(SYSTEM_PROMPT_REL)
    }

    /// Create the archive directory if absent. Runs once before any
    /// processing mode; listing never calls this.
    pub fn ensure_archive_dir(&self) -> Result<()> {
        let dir = self.archive_dir();
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))
    }
}
