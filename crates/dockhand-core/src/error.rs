//! Failure taxonomy for layout capture, restore, and persisted state.

use thiserror::Error;

/// Failure to represent a layout tree in its persisted string form, or to
/// decode that form back into a tree.
///
/// Fatal to the save or restore attempt at hand. Callers recover by
/// discarding the persisted layout, never by keeping a partial write.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// The tree could not be encoded as a string.
    #[error("layout cannot be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    /// The persisted string is not a well-formed layout envelope.
    #[error("persisted layout is malformed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The tree nests deeper than the codec will represent.
    #[error("layout tree exceeds maximum depth {limit}")]
    DepthExceeded {
        /// The depth bound that was exceeded.
        limit: usize,
    },

    /// The envelope was written by an incompatible schema revision.
    #[error("unsupported layout schema version {found}, expected {expected}")]
    UnsupportedSchema {
        /// Version found in the envelope.
        found: u16,
        /// Version this build understands.
        expected: u16,
    },
}

/// Failure to rebuild one component from its construction descriptor.
///
/// Always recovered locally: the offending slot stays vacant and the rest
/// of the restore proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructionError {
    /// No factory is registered under the descriptor's id.
    #[error("no factory registered for `{factory_id}`")]
    MissingFactory {
        /// The unknown factory id.
        factory_id: String,
    },

    /// The factory ran and failed.
    #[error("factory `{factory_id}` failed: {message}")]
    Factory {
        /// Id of the factory that failed.
        factory_id: String,
        /// Human-readable failure description.
        message: String,
    },
}

/// Persisted-state backend failure.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium failed.
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be mapped onto the backing medium.
    #[error("invalid storage key `{key}`: {reason}")]
    InvalidKey {
        /// The offending key.
        key: String,
        /// Why the key was rejected.
        reason: &'static str,
    },
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
