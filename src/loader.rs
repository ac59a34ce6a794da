//! Loader Module
//!
//! End-to-end transform a build host runs for a multi-file component
//! resource, plus directory-wide assembly for tooling.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::component::ComponentAssembler;
use crate::discovery::{
    component_name, discover_components, find_component_files, find_precomposed,
};
use crate::error::{ComponentError, Result};
use crate::options::LoaderOptions;

/// Produce the single file component source for `resource_path`, whose
/// siblings live in `context`.
///
/// A pre-composed `<name>.vue` sibling is returned verbatim. Otherwise every
/// sibling is fed to a fresh assembler in name order.
pub fn load_component(
    resource_path: &Path,
    context: &Path,
    options: &LoaderOptions,
) -> Result<String> {
    let name = component_name(resource_path, &options.test);
    load_named_component(&name, context, options)
}

/// Same as [`load_component`] for a known component name.
pub fn load_named_component(
    name: &str,
    context: &Path,
    options: &LoaderOptions,
) -> Result<String> {
    let files = find_component_files(context, name)?;

    if files.is_empty() {
        return Err(ComponentError::NoCandidateFiles {
            component: name.to_string(),
        });
    }

    if let Some(existing) = find_precomposed(&files) {
        debug!(component = name, file = existing, "returning existing single file component");
        let path = context.join(existing);
        return fs::read_to_string(&path).map_err(|e| ComponentError::io(path, e));
    }

    assemble(name, &files, options)
}

/// Assemble a component from an already filtered list of sibling names.
pub fn assemble(name: &str, files: &[String], options: &LoaderOptions) -> Result<String> {
    let mut component = ComponentAssembler::new(name, options);
    for file in files {
        component.add(file)?;
    }
    component.build()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembledComponent {
    pub dir: PathBuf,
    pub name: String,
    pub source: Option<String>,
    pub error: Option<String>,
}

/// Assemble every multi-file component under `root` in parallel.
///
/// A failing component is reported in its entry; it does not abort the
/// others.
pub fn assemble_directory(
    root: &Path,
    options: &LoaderOptions,
) -> Result<Vec<AssembledComponent>> {
    let locations = discover_components(root, &options.test)?;

    let assembled = locations
        .into_par_iter()
        .map(|location| {
            let outcome = load_named_component(&location.name, &location.dir, options);
            let (source, error) = match outcome {
                Ok(source) => (Some(source), None),
                Err(e) => (None, Some(e.to_string())),
            };
            AssembledComponent {
                dir: location.dir,
                name: location.name,
                source,
                error,
            }
        })
        .collect();

    Ok(assembled)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
