//! Octal quoting for paths and names in the dump format.
//!
//! A quoted string never contains a control byte, DEL, or any byte the caller
//! lists as special, so it can sit on one line next to `=` without ambiguity.

use std::borrow::Cow;

/// Escapes control bytes, DEL, backslash and every byte in `extra` as `\ooo`.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
///
/// # Examples
///
/// ```
/// assert_eq!(codec::quote(b"a=b\n", b"="), b"a\\075b\\012".as_slice());
/// assert_eq!(codec::quote(b"plain", b"="), b"plain".as_slice());
/// ```
#[must_use]
pub fn quote<'a>(bytes: &'a [u8], extra: &[u8]) -> Cow<'a, [u8]> {
    let needs = |byte: u8| byte < 0x20 || byte == 0x7f || byte == b'\\' || extra.contains(&byte);
    if !bytes.iter().any(|&byte| needs(byte)) {
        return Cow::Borrowed(bytes);
    }

    let mut out = Vec::with_capacity(bytes.len() + 8);
    for &byte in bytes {
        if needs(byte) {
            out.extend_from_slice(&[
                b'\\',
                b'0' + (byte >> 6),
                b'0' + ((byte >> 3) & 0o7),
                b'0' + (byte & 0o7),
            ]);
        } else {
            out.push(byte);
        }
    }
    Cow::Owned(out)
}

/// Reverses [`quote`]: every backslash followed by exactly three octal digits
/// becomes the byte they encode. Anything else is copied through.
#[must_use]
pub fn unquote(bytes: &[u8]) -> Cow<'_, [u8]> {
    if !bytes.contains(&b'\\') {
        return Cow::Borrowed(bytes);
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if let &[b'\\', a @ b'0'..=b'3', b @ b'0'..=b'7', c @ b'0'..=b'7', ..] = &bytes[index..] {
            out.push(((a - b'0') << 6) | ((b - b'0') << 3) | (c - b'0'));
            index += 4;
        } else {
            out.push(bytes[index]);
            index += 1;
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_newlines_and_backslashes() {
        assert_eq!(&*quote(b"a\nb\\c", b""), b"a\\012b\\134c");
    }

    #[test]
    fn equals_only_quoted_when_requested() {
        assert_eq!(&*quote(b"k=v", b""), b"k=v");
        assert_eq!(&*quote(b"k=v", b"="), b"k\\075v");
    }

    #[test]
    fn unquote_inverts_quote() {
        let raw = b"dir/\x01weird=name\\\x7f";
        let quoted = quote(raw, b"=");
        assert_eq!(&*unquote(&quoted), raw);
    }

    #[test]
    fn unquote_leaves_incomplete_escapes() {
        assert_eq!(&*unquote(b"a\\12"), b"a\\12");
        assert_eq!(&*unquote(b"a\\400"), b"a\\400");
        assert_eq!(&*unquote(b"\\n"), b"\\n");
    }
}
