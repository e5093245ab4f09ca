//! Descriptor file discovery.
//!
//! Explicit paths may be directories (direct children only, never
//! recursive) or individual YAML files; anything else is skipped with a
//! warning. Files under a `.github` subtree are always excluded, however
//! they were reached. With no explicit paths the current working directory
//! is scanned under the same rules.

use std::path::{Component, Path, PathBuf};

use crate::error::CatalogResult;

/// Subtree reserved for CI automation, never validated.
const RESERVED_DIR: &str = ".github";

/// Result of a discovery pass.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Candidate files in discovery order.
    pub files: Vec<PathBuf>,

    /// Non-fatal warnings for paths that were skipped.
    pub warnings: Vec<String>,
}

/// Find descriptor files for the given explicit paths, or for the current
/// working directory if `paths` is empty.
///
/// The order is deterministic: directory listings are sorted, explicit
/// paths keep their given order, and duplicates keep their first position.
pub fn find_descriptor_files(paths: &[PathBuf]) -> CatalogResult<Discovery> {
    let mut discovery = Discovery::default();

    if paths.is_empty() {
        let cwd = std::env::current_dir()?;
        collect_dir(&cwd, &mut discovery);
        return Ok(discovery);
    }

    for path in paths {
        if path.is_dir() {
            collect_dir(path, &mut discovery);
        } else if path.is_file() && has_yaml_extension(path) {
            push_file(path.clone(), &mut discovery);
        } else {
            discovery.warnings.push(format!(
                "Warning: {} is not a YAML file or directory",
                path.display()
            ));
        }
    }

    Ok(discovery)
}

/// Collect the direct YAML children of `dir`, sorted by name.
fn collect_dir(dir: &Path, discovery: &mut Discovery) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            discovery
                .warnings
                .push(format!("Warning: cannot read {}: {}", dir.display(), e));
            return;
        }
    };

    let mut children: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_yaml_extension(path))
        .collect();
    children.sort();

    for child in children {
        push_file(child, discovery);
    }
}

fn push_file(path: PathBuf, discovery: &mut Discovery) {
    if in_reserved_subtree(&path) {
        return;
    }
    if !discovery.files.contains(&path) {
        discovery.files.push(path);
    }
}

fn has_yaml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

fn in_reserved_subtree(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == RESERVED_DIR))
}
