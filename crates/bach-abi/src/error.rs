//! ABI codec error types

use thiserror::Error;

/// Coarse error classes surfaced by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed types, widths, counts or values that can never be encoded
    InvalidArgument,
    /// Integer value outside the range of its declared width
    NumericRange,
    /// Decoding ran past the end of the input buffer
    BufferOverrun,
    /// A codec invariant was broken; never caused by user input
    Internal,
}

/// ABI encoding/decoding error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// Argument rejected by a type rule
    #[error("invalid argument {argument} ({value}): {reason}")]
    InvalidArgument {
        /// Name of the offending argument
        argument: String,
        /// Offending value or type spelling
        value: String,
        /// What rule was broken
        reason: String,
    },

    /// Base kind that no coder handles
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// Type spelling could not be parsed
    #[error("cannot parse type: {0}")]
    Parse(String),

    /// Type and value lists differ in length
    #[error("types/values length mismatch: {types} types, {values} values")]
    LengthMismatch {
        /// Number of types
        types: usize,
        /// Number of values
        values: usize,
    },

    /// Value does not fit the shape of its type
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Declared type
        expected: String,
        /// Kind of the supplied value
        found: String,
    },

    /// Encoded word rejected by strict decoding
    #[error("invalid {ty} data: {reason}")]
    InvalidData {
        /// Declared type
        ty: String,
        /// What was wrong with the word
        reason: String,
    },

    /// Named lookup for a name no component carries
    #[error("unknown name: {0}")]
    UnknownName(String),

    /// Named lookup for a name several components share
    #[error("ambiguous name: {0}")]
    AmbiguousName(String),

    /// Integer outside the representable range of its type
    #[error("value out of range for {ty}: {value}")]
    NumericRange {
        /// Declared type
        ty: String,
        /// Offending value
        value: String,
    },

    /// Read past the end of the input
    #[error("buffer overrun: need {needed} bytes at offset {offset}, have {available}")]
    BufferOverrun {
        /// Absolute offset of the read
        offset: usize,
        /// Bytes the read required
        needed: usize,
        /// Total bytes in the buffer
        available: usize,
    },

    /// Offset or length word too large to address any buffer
    #[error("offset or length out of bounds: {0}")]
    OffsetOverflow(String),

    /// Broken codec invariant
    #[error("internal error: {0}")]
    Internal(String),
}

impl AbiError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AbiError::InvalidArgument { .. }
            | AbiError::InvalidType(_)
            | AbiError::Parse(_)
            | AbiError::LengthMismatch { .. }
            | AbiError::TypeMismatch { .. }
            | AbiError::InvalidData { .. }
            | AbiError::UnknownName(_)
            | AbiError::AmbiguousName(_) => ErrorKind::InvalidArgument,
            AbiError::NumericRange { .. } => ErrorKind::NumericRange,
            AbiError::BufferOverrun { .. } | AbiError::OffsetOverflow(_) => ErrorKind::BufferOverrun,
            AbiError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn invalid_argument(
        argument: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        AbiError::InvalidArgument {
            argument: argument.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_data(ty: impl Into<String>, reason: impl Into<String>) -> Self {
        AbiError::InvalidData {
            ty: ty.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for codec operations
pub type Result<T> = std::result::Result<T, AbiError>;
