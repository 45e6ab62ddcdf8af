//! Error types for the diff engine.

use graphdiff_types::Path;

/// Errors that can occur while configuring a differ or assembling a node tree.
///
/// Properties of the compared data (duplicate identities, unstable identity
/// keys, mismatched shapes) are never errors; they resolve to a defined node.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A differ was built without the comparator it delegates to.
    #[error("a comparator is required to build this differ")]
    MissingComparator,

    /// A child node already exists at this path.
    #[error("duplicate child node at {0}")]
    DuplicateChild(Path),

    /// The node's path is not its intended parent's path plus one element.
    #[error("node at {child} is not a direct child of {parent}")]
    NotADirectChild {
        parent: Path,
        child: Path,
    },

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
