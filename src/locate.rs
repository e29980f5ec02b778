use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Workspace, STAGING_DIR_NAME};
use crate::error::PipelineError;

/// Extension recognized as a staged note.
const NOTE_EXTENSION: &str = "md";

/// All staged notes under the staging tree, in sorted order.
///
/// A missing staging directory yields an empty list; unreadable
/// subdirectories are skipped so a corrupt tree degrades to a partial
/// listing instead of an error.
pub fn list_pending(ws: &Workspace) -> Vec<PathBuf> {
    let mut notes = Vec::new();
    walk(&ws.staging_dir(), &mut |path| {
        if path.extension().is_some_and(|ext| ext == NOTE_EXTENSION) {
            notes.push(path.to_path_buf());
        }
    });
    notes.sort();
    notes
}

/// Map a user-supplied reference to exactly one staged note.
///
/// A reference rooted at `preformatted/` resolves from the workspace root,
/// one containing a separator resolves from the staging directory, and a
/// bare filename is searched recursively. Whatever branch ran, the result
/// must exist as a regular file.
pub fn resolve(ws: &Workspace, reference: &str) -> Result<PathBuf, PipelineError> {
    let staging = ws.staging_dir();
    let rooted_prefix = format!("{STAGING_DIR_NAME}/");
    let path = if reference.starts_with(&rooted_prefix) {
        ws.root().join(reference)
    } else if reference.contains('/') {
        staging.join(reference)
    } else {
        find_by_name(&staging, reference)?
    };
    if !path.is_file() {
        return Err(PipelineError::NotFound {
            reference: reference.to_string(),
            scope: staging,
        });
    }
    Ok(path)
}

/// Recursive exact-filename search used for bare references.
fn find_by_name(staging: &Path, name: &str) -> Result<PathBuf, PipelineError> {
    let mut matches = Vec::new();
    walk(staging, &mut |path| {
        if path.file_name().is_some_and(|file_name| file_name == name) {
            matches.push(path.to_path_buf());
        }
    });
    matches.sort();
    match matches.len() {
        0 => Err(PipelineError::NotFound {
            reference: name.to_string(),
            scope: staging.to_path_buf(),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(PipelineError::Ambiguous {
            reference: name.to_string(),
            candidates: matches
                .iter()
                .map(|path| relative_display(path, staging))
                .collect(),
        }),
    }
}

/// Depth-first walk calling `visit` on every regular file.
fn walk(dir: &Path, visit: &mut dyn FnMut(&Path)) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "skipping unreadable directory");
            return;
        }
    };
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        if path.is_dir() {
            walk(&path, visit);
        } else if path.is_file() {
            visit(&path);
        }
    }
}

/// Render a path relative to `base` when possible.
pub fn relative_display(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(relative) => relative.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_workspace() -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let ws = Workspace::new(dir.path().to_path_buf());
        (dir, ws)
    }

    fn stage(ws: &Workspace, rel: &str, content: &str) {
        let path = ws.staging_dir().join(rel);
        fs::create_dir_all(path.parent().expect("staging parent")).expect("create staging dirs");
        fs::write(path, content).expect("write staged note");
    }

    #[test]
    fn list_pending_missing_staging_is_empty() {
        let (_dir, ws) = temp_workspace();
        assert!(list_pending(&ws).is_empty());
    }

    #[test]
    fn list_pending_empty_staging_is_empty() {
        let (_dir, ws) = temp_workspace();
        fs::create_dir_all(ws.staging_dir()).expect("create staging");
        assert!(list_pending(&ws).is_empty());
    }

    #[test]
    fn list_pending_finds_nested_notes_only() {
        let (_dir, ws) = temp_workspace();
        stage(&ws, "a.md", "a");
        stage(&ws, "deep/nested/b.md", "b");
        stage(&ws, "deep/ignore.txt", "x");

        let notes = list_pending(&ws);
        assert_eq!(
            notes,
            vec![
                ws.staging_dir().join("a.md"),
                ws.staging_dir().join("deep/nested/b.md"),
            ]
        );
    }

    #[test]
    fn resolve_bare_unique_name() {
        let (_dir, ws) = temp_workspace();
        stage(&ws, "notes/a.md", "a");
        let resolved = resolve(&ws, "a.md").expect("resolve");
        assert_eq!(resolved, ws.staging_dir().join("notes/a.md"));
    }

    #[test]
    fn resolve_bare_missing_is_not_found() {
        let (_dir, ws) = temp_workspace();
        stage(&ws, "notes/a.md", "a");
        let err = resolve(&ws, "zzz.md").unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { .. }));
    }

    #[test]
    fn resolve_bare_duplicate_is_ambiguous_with_both_paths() {
        let (_dir, ws) = temp_workspace();
        stage(&ws, "notes/dup.md", "one");
        stage(&ws, "misc/dup.md", "two");
        let err = resolve(&ws, "dup.md").unwrap_err();
        match err {
            PipelineError::Ambiguous { candidates, .. } => {
                assert_eq!(
                    candidates,
                    vec!["misc/dup.md".to_string(), "notes/dup.md".to_string()]
                );
            }
            other => panic!("expected Ambiguous, got {other}"),
        }
    }

    #[test]
    fn resolve_staging_relative_path() {
        let (_dir, ws) = temp_workspace();
        stage(&ws, "notes/a.md", "a");
        let resolved = resolve(&ws, "notes/a.md").expect("resolve");
        assert_eq!(resolved, ws.staging_dir().join("notes/a.md"));
    }

    #[test]
    fn resolve_root_relative_path() {
        let (_dir, ws) = temp_workspace();
        stage(&ws, "notes/a.md", "a");
        let resolved = resolve(&ws, "preformatted/notes/a.md").expect("resolve");
        assert_eq!(resolved, ws.staging_dir().join("notes/a.md"));
    }

    #[test]
    fn resolve_explicit_path_must_exist() {
        let (_dir, ws) = temp_workspace();
        fs::create_dir_all(ws.staging_dir()).expect("create staging");
        let err = resolve(&ws, "notes/missing.md").unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { .. }));
    }
}
