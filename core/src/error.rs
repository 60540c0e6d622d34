//! Error taxonomy for layout management.

use std::path::{Path, PathBuf};

use thiserror::Error;


pub type LayoutResult<T> = Result<T, LayoutError>;


#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("cannot open document {}: {reason}", path.display())]
    DocumentOpen { path: PathBuf, reason: String },

    #[error("malformed layout store {}: {reason}", path.display())]
    MalformedStore { path: PathBuf, reason: String },

    #[error("layout '{0}' already exists")]
    LayoutAlreadyExists(String),

    #[error("layout '{0}' does not exist")]
    LayoutNotFound(String),

    #[error("no active layout")]
    NoActiveLayout,

    #[error("failed to persist {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings error: {0}")]
    Config(String),

    #[error("invalid command: {0}")]
    InvalidCommand(String),
}


impl LayoutError {
    pub fn document_open(path: &Path, reason: impl Into<String>) -> Self {
        LayoutError::DocumentOpen {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        LayoutError::MalformedStore {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn persist(path: &Path, source: std::io::Error) -> Self {
        LayoutError::Persist {
            path: path.to_path_buf(),
            source,
        }
    }
}
