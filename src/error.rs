//! Error types for multi-file component assembly.
//!
//! Every failure is fatal to the operation that raised it. Messages carry the
//! name of the emitting transform so they read well in host build output.

use std::path::PathBuf;

use thiserror::Error;

use crate::role::Role;

pub const LOADER_NAME: &str = "VueMultiFileComponentLoader";
pub const PLUGIN_NAME: &str = "VueMultiFileComponentPlugin";

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("[{}] no valid files found for component '{component}'", LOADER_NAME)]
    NoCandidateFiles { component: String },

    #[error("[{}] duplicate {role} files found in component '{component}'", LOADER_NAME)]
    DuplicateRole { component: String, role: Role },

    #[error(
        "[{}] no template or script file defined for component '{component}'",
        LOADER_NAME
    )]
    MissingPrimaryBlock { component: String },

    #[error("[{origin}] option '{option}' {reason}")]
    InvalidConfiguration {
        origin: &'static str,
        option: String,
        reason: String,
    },

    #[error("[{transform}] {transform} must be used after {companion}")]
    RegistrationOrderViolation {
        transform: String,
        companion: String,
    },

    #[error("[{transform}] host configuration has no '{section}' section")]
    MissingHostSection {
        transform: String,
        section: &'static str,
    },

    #[error("[{}] failed to read '{}': {source}", LOADER_NAME, .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ComponentError {
    pub(crate) fn not_a_regexp(origin: &'static str, option: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            origin,
            option: option.into(),
            reason: "must be of RegExp type".to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ComponentError>;
