use thiserror::Error;

/// Rejected `(ref, version)` input.
///
/// Validation failures are never coerced or retried; the same pair is rejected by
/// every read and write path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The ref is the empty string.
    #[error("object ref must not be empty")]
    EmptyRef,

    /// The ref exceeds the maximum length.
    #[error("object ref is {len} bytes long, maximum is {max}")]
    RefTooLong {
        /// Length of the rejected ref.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// The ref contains a character outside `[A-Za-z0-9_.-]`.
    #[error("object ref contains invalid character {ch:?} at byte {position}")]
    InvalidRefCharacter {
        /// First offending character.
        ch: char,
        /// Byte offset of the offending character.
        position: usize,
    },

    /// The ref contains `..` or starts with `.`.
    #[error("object ref {object_ref:?} contains a path traversal sequence")]
    PathTraversal {
        /// The rejected ref.
        object_ref: String,
    },

    /// Version zero is reserved.
    #[error("object version must be between 1 and 65535, got 0")]
    ZeroVersion,

    /// A wide integer does not fit in the 16-bit version space.
    #[error("object version must be between 1 and 65535, got {value}")]
    VersionOutOfRange {
        /// The rejected value.
        value: u64,
    },
}

/// Convenience result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;
