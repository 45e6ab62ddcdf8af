use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid path {input:?}: {reason}")]
    InvalidPath { input: String, reason: String },
}
