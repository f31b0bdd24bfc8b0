//! Errors raised when a host collaborator breaks the block's contract.

use thiserror::Error;

use crate::block::types::ValueType;
use crate::config::SizeMode;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FragmentError {
    /// The resolved parameter bundle does not match the configured size mode.
    #[error(
        "configuration/shape mismatch: parameter `{param}` is {found} but size mode {size_mode} expects {expected}"
    )]
    ShapeMismatch {
        param: String,
        size_mode: SizeMode,
        expected: ValueType,
        found: ValueType,
    },

    /// The resolver omitted a parameter the generated formula references.
    #[error("configuration/shape mismatch: parameter `{param}` is missing from the {size_mode} bundle")]
    MissingParameter { param: String, size_mode: SizeMode },

    /// The resolver returned the same parameter more than once.
    #[error("configuration/shape mismatch: parameter `{param}` appears more than once in the {size_mode} bundle")]
    DuplicateParameter { param: String, size_mode: SizeMode },

    /// A generated fragment failed its own consistency check.
    #[error("inconsistent fragment: {0}")]
    InconsistentFragment(String),
}
