use thiserror::Error;

/// Failure to turn an encoded attribute value back into bytes.
///
/// Offsets count bytes from the start of the encoded text, prefix included.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A character that is neither a hex digit nor whitespace.
    #[error("bad input encoding: invalid hex digit {digit:?} at offset {offset}")]
    InvalidHexDigit {
        /// The offending character.
        digit: char,
        /// Position of the character.
        offset: usize,
    },
    /// Hex digits must come in pairs.
    #[error("bad input encoding: odd number of hex digits")]
    OddHexDigits,
    /// Base64 payload rejected by the decoder.
    #[error("bad input encoding: {0}")]
    Base64(#[from] base64::DecodeError),
    /// A backslash with nothing after it.
    #[error("bad input encoding: truncated escape at offset {offset}")]
    TruncatedEscape {
        /// Position of the backslash.
        offset: usize,
    },
    /// An octal escape whose value does not fit in a byte.
    #[error("bad input encoding: octal escape \\{digits} at offset {offset} exceeds \\377")]
    OctalOutOfRange {
        /// The escape's digits.
        digits: String,
        /// Position of the backslash.
        offset: usize,
    },
}

/// An `--encoding` argument that names no known scheme.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unrecognized encoding '{0}' (expected text, hex or base64)")]
pub struct UnknownEncoding(pub String);
