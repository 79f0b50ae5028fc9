//! Error type shared by every fallible [`OrderedMap`](crate::OrderedMap) operation.

use thiserror::Error;

/// Errors reported by [`OrderedMap`](crate::OrderedMap).
///
/// Absence on removal is not an error: `remove` and `remove_at` report it as `false`.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A key-based lookup found no entry
    #[error("no such key in map")]
    KeyNotFound,

    /// A positional index fell outside `[-len, len)`
    #[error("index {index} out of range for map of length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    /// The key order and the value store disagree. Never reachable through the public API.
    #[error("ordered map is internally inconsistent: {reason}")]
    InternalInconsistency { reason: String },
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound)
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::IndexOutOfRange { .. })
    }

    pub fn is_inconsistency(&self) -> bool {
        matches!(self, Error::InternalInconsistency { .. })
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

pub(crate) fn inconsistency(reason: impl Into<String>) -> Error {
    let reason = reason.into();
    tracing::error!(%reason, "key order and value store diverged");
    Error::InternalInconsistency { reason }
}
