use std::fmt;
use std::str::FromStr;

use crate::{DecodeError, UnknownEncoding, b64, hex, text};

/// Scheme used to render an attribute value as text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Double-quoted with backslash escapes.
    #[default]
    Text,
    /// `0x` followed by two hex digits per byte.
    Hex,
    /// `0s` followed by standard base64.
    Base64,
}

impl Encoding {
    /// All schemes, in command-line order.
    pub const ALL: [Self; 3] = [Self::Text, Self::Hex, Self::Base64];

    /// Name accepted by `--encoding`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Hex => "hex",
            Self::Base64 => "base64",
        }
    }

    /// Identifies the scheme of an encoded value from its first two bytes.
    #[must_use]
    pub fn detect(text: &[u8]) -> Self {
        match text {
            [b'0', b'x' | b'X', ..] => Self::Hex,
            [b'0', b's' | b'S', ..] => Self::Base64,
            _ => Self::Text,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|encoding| encoding.name() == s)
            .ok_or_else(|| UnknownEncoding(s.to_string()))
    }
}

/// Renders `bytes` in the given scheme, prefix or quotes included.
#[must_use]
pub fn encode(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Text => text::encode(bytes),
        Encoding::Hex => hex::encode(bytes),
        Encoding::Base64 => b64::encode(bytes),
    }
}

/// Decodes a value in any scheme, detected from its prefix.
///
/// # Errors
///
/// Returns a [`DecodeError`] when the text is not well formed for its scheme.
pub fn decode(text: &[u8]) -> Result<Vec<u8>, DecodeError> {
    match Encoding::detect(text) {
        Encoding::Hex => hex::decode(&text[2..], 2),
        Encoding::Base64 => b64::decode(&text[2..]),
        Encoding::Text => text::decode(text),
    }
}

/// An attribute value in its textual form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EncodedValue {
    /// `"..."`
    Text(String),
    /// `0x...`
    Hex(String),
    /// `0s...`
    Base64(String),
}

impl EncodedValue {
    /// Encodes `bytes` with `encoding`.
    #[must_use]
    pub fn encode(bytes: &[u8], encoding: Encoding) -> Self {
        let text = encode(bytes, encoding);
        match encoding {
            Encoding::Text => Self::Text(text),
            Encoding::Hex => Self::Hex(text),
            Encoding::Base64 => Self::Base64(text),
        }
    }

    /// Wraps already-encoded text, classifying it by prefix. The text is not
    /// validated until [`decode`](Self::decode) is called.
    #[must_use]
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        match Encoding::detect(text.as_bytes()) {
            Encoding::Text => Self::Text(text),
            Encoding::Hex => Self::Hex(text),
            Encoding::Base64 => Self::Base64(text),
        }
    }

    /// Recovers the original bytes.
    ///
    /// # Errors
    ///
    /// See [`decode`](crate::decode).
    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        decode(self.as_str().as_bytes())
    }

    /// The encoded text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) | Self::Hex(text) | Self::Base64(text) => text,
        }
    }

    /// The scheme this value uses.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        match self {
            Self::Text(_) => Encoding::Text,
            Self::Hex(_) => Encoding::Hex,
            Self::Base64(_) => Encoding::Base64,
        }
    }
}

impl fmt::Display for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
