//! Manifest loading errors

use crate::logging::{codes, Code};
use crate::resource::{Identifier, ValidationError};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Entry #{index} ({}): {source}", .server_hostname.as_deref().unwrap_or("<unnamed>"))]
    InvalidEntry {
        index: usize,
        server_hostname: Option<String>,
        #[source]
        source: ValidationError,
    },

    #[error("Entries #{first} and #{second} both declare server '{identifier}'")]
    DuplicateResource {
        identifier: Identifier,
        first: usize,
        second: usize,
    },
}

impl ManifestError {
    pub fn code(&self) -> Code {
        match self {
            ManifestError::Io { .. } => codes::manifest::READ_FAILED,
            ManifestError::Parse(_) => codes::manifest::PARSE_FAILED,
            ManifestError::InvalidEntry { .. } => codes::manifest::INVALID_ENTRY,
            ManifestError::DuplicateResource { .. } => codes::manifest::DUPLICATE_RESOURCE,
        }
    }
}
