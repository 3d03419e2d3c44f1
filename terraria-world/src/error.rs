use std::error::Error;
use std::fmt;
use std::io;

/// Result alias used throughout the codec.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Everything that can go wrong while reading or writing a world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The file's format version is older than [`crate::MIN_VERSION`].
    UnsupportedVersion(i32),
    /// The cursor did not land on the declared start of a section.
    PointerMismatch {
        section: &'static str,
        expected: i32,
        actual: u64,
    },
    /// A primitive read ran past the end of the buffer.
    TruncatedInput,
    /// Structurally invalid bytes.
    CorruptFormat(String),
    /// A pstring's bytes are not decodable.
    InvalidUtf8,
    /// Save was requested on a world with an unpopulated required field.
    IncompleteWorld(&'static str),
    /// Caller-side misuse.
    InvalidArgument(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CodecError::UnsupportedVersion(v) => write!(
                f,
                "world version {} is below the minimum supported version {}",
                v,
                crate::MIN_VERSION
            ),
            CodecError::PointerMismatch {
                section,
                expected,
                actual,
            } => write!(
                f,
                "{} section starts at offset {} but its pointer says {}",
                section, actual, expected
            ),
            CodecError::TruncatedInput => f.write_str("input ended in the middle of a read"),
            CodecError::CorruptFormat(detail) => write!(f, "corrupt world data: {}", detail),
            CodecError::InvalidUtf8 => f.write_str("string is not valid utf-8"),
            CodecError::IncompleteWorld(field) => {
                write!(f, "cannot save: required field `{}` is not populated", field)
            }
            CodecError::InvalidArgument(detail) => write!(f, "invalid argument: {}", detail),
        }
    }
}

impl Error for CodecError {}

impl From<io::Error> for CodecError {
    fn from(_: io::Error) -> Self {
        // The codec only ever reads in-memory buffers, so the sole io
        // failure mode is running off the end of the slice.
        CodecError::TruncatedInput
    }
}
