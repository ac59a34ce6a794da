//! Discovery Module
//!
//! Filesystem side of component assembly: derive a component name from a
//! resource path, list its sibling files, and find every multi-file
//! component below a directory.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{ComponentError, Result};

lazy_static! {
    /// A sibling that already is a complete single file component.
    static ref PRECOMPOSED_RE: Regex = Regex::new(r"\.vue$").unwrap();
}

/// Where a multi-file component lives.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentLocation {
    pub dir: PathBuf,
    pub name: String,
}

/// Component name of a resource: its file name up to the first match of
/// `test`, or the whole file name when `test` does not match.
pub fn component_name(resource_path: &Path, test: &Regex) -> String {
    let file_name = resource_path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    match test.find(&file_name) {
        Some(m) => file_name[..m.start()].to_string(),
        None => file_name.into_owned(),
    }
}

/// Non-hidden files in `context` whose name starts with `<name>.`, sorted
/// by name.
pub fn find_component_files(context: &Path, name: &str) -> Result<Vec<String>> {
    let prefix = format!("{}.", name);
    let mut files = Vec::new();

    let walker = WalkDir::new(context)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| ComponentError::io(context, e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if !is_hidden(&file_name) && file_name.starts_with(&prefix) {
            files.push(file_name.into_owned());
        }
    }

    debug!(component = name, count = files.len(), "found component files");
    Ok(files)
}

/// The first sibling that is already a complete single file component.
pub fn find_precomposed(files: &[String]) -> Option<&str> {
    files
        .iter()
        .map(String::as_str)
        .find(|file| PRECOMPOSED_RE.is_match(file))
}

/// Every multi-file component below `root`, one entry per directory and
/// component name. Hidden directories are skipped and unreadable entries
/// are logged and ignored.
pub fn discover_components(root: &Path, test: &Regex) -> Result<Vec<ComponentLocation>> {
    if !root.is_dir() {
        return Err(ComponentError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut found = BTreeSet::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden_entry(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if !test.is_match(&file_name) {
            continue;
        }
        let name = component_name(entry.path(), test);
        if name.is_empty() {
            continue;
        }
        if let Some(dir) = entry.path().parent() {
            found.insert(ComponentLocation {
                dir: dir.to_path_buf(),
                name,
            });
        }
    }

    debug!(root = %root.display(), count = found.len(), "discovered components");
    Ok(found.into_iter().collect())
}

fn is_hidden(file_name: &str) -> bool {
    file_name.starts_with('.')
}

fn is_hidden_entry(entry: &DirEntry) -> bool {
    is_hidden(&entry.file_name().to_string_lossy())
}
