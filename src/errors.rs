//! Error types.

use core::fmt;

/// Alias for [`core::result::Result`] with the crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Structural decoding/encoding errors.
///
/// Every failure is terminal: a failed import never yields a partially
/// populated key, and no primitive attempts recovery or repair.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A TLV tag did not match the value expected at its structural
    /// position.
    MalformedTag {
        /// Tag octet that was expected.
        expected: u8,
        /// Tag octet that was read.
        actual: u8,
    },

    /// A declared length is inconsistent with the DER short/long-form
    /// encoding rules or exceeds the remaining input.
    MalformedLength,

    /// The `AlgorithmIdentifier` bytes do not exactly match the fixed
    /// `rsaEncryption` constant.
    UnexpectedAlgorithmIdentifier,

    /// A read would consume bytes beyond the end of the input.
    TruncatedInput,

    /// Bytes remain after a declared structure length was fully consumed.
    TrailingBytes,

    /// A fixed-size integer read decoded a different number of bytes than
    /// expected.
    SizeMismatch {
        /// Magnitude length in bytes that was expected.
        expected: usize,
        /// Magnitude length in bytes that was decoded.
        actual: usize,
    },

    /// A `BIT STRING` declared unused bits, which the key structures never
    /// contain.
    MalformedBitString,

    /// A `version` field held something other than 0.
    Version,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::MalformedTag { expected, actual } => {
                write!(f, "expected tag 0x{expected:02x}, got 0x{actual:02x}")
            }
            Error::MalformedLength => f.write_str("malformed DER length"),
            Error::UnexpectedAlgorithmIdentifier => {
                f.write_str("AlgorithmIdentifier is not rsaEncryption")
            }
            Error::TruncatedInput => f.write_str("unexpected end of input"),
            Error::TrailingBytes => f.write_str("trailing bytes after DER structure"),
            Error::SizeMismatch { expected, actual } => {
                write!(f, "expected a {expected}-byte integer, got {actual} bytes")
            }
            Error::MalformedBitString => f.write_str("BIT STRING declares unused bits"),
            Error::Version => f.write_str("version mismatch"),
        }
    }
}

impl core::error::Error for Error {}
