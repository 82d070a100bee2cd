//! Engine errors

use thiserror::Error;

/// Engine result
pub type TraitResult<T> = Result<T, TraitError>;

/// Errors surfaced by created objects and the host property primitive.
///
/// `MissingRequired` and `UnresolvedConflict` are the two failure kinds of
/// the trait algebra itself. They are raised lazily, on the first read or
/// write of the unresolved slot, never during composition or resolution.
/// The remaining variants belong to the host object system: lookup misses,
/// read-only slots, and calls on values that are not functions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraitError {
    #[error("Missing required property: {0}")]
    MissingRequired(String),

    #[error("Remaining conflicting property: {0}")]
    UnresolvedConflict(String),

    #[error("No such property: {0}")]
    NoSuchProperty(String),

    #[error("Property is not writable: {0}")]
    NotWritable(String),

    #[error("Property is not callable: {0}")]
    NotCallable(String),
}
