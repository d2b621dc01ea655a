#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! Lossless textual encodings for extended attribute values, as used by the
//! dump format and the `-v` argument of `oc-setfattr`.
//!
//! | Scheme | Form | Example for `A\0` |
//! |--------|------|-------------------|
//! | text   | `"..."` with `\\`, `\"` and `\ooo` escapes | `"A\000"` |
//! | hex    | `0x` + lowercase pairs | `0x4100` |
//! | base64 | `0s` + standard alphabet | `0sQQA=` |
//!
//! # Invariants
//!
//! `decode(encode(bytes, scheme)) == bytes` for every byte string and scheme.
//! Decoding never guesses: malformed input is an error.
//!
//! The [`quote`] and [`unquote`] helpers handle the separate job of keeping
//! paths and names on a single line.
//!
//! # Examples
//!
//! ```
//! use codec::{Encoding, decode, encode};
//!
//! let text = encode(b"\x00\xff", Encoding::Hex);
//! assert_eq!(text, "0x00ff");
//! assert_eq!(decode(text.as_bytes()).unwrap(), b"\x00\xff");
//! ```

mod b64;
mod encoding;
mod error;
mod hex;
mod quote;
mod text;

pub use encoding::{EncodedValue, Encoding, decode, encode};
pub use error::{DecodeError, UnknownEncoding};
pub use quote::{quote, unquote};

/// ASCII whitespace as understood by C `isspace`, vertical tab included.
pub(crate) const fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c')
}
