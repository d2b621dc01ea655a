//! Quoted text scheme: `"..."` with backslash escapes.

use crate::DecodeError;

pub(crate) fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &byte in bytes {
        match byte {
            b'\\' | b'"' => {
                out.push('\\');
                out.push(char::from(byte));
            }
            32..=126 => out.push(char::from(byte)),
            _ => push_octal(&mut out, byte),
        }
    }
    out.push('"');
    out
}

pub(crate) fn push_octal(out: &mut String, byte: u8) {
    out.push('\\');
    out.push(char::from(b'0' + (byte >> 6)));
    out.push(char::from(b'0' + ((byte >> 3) & 0o7)));
    out.push(char::from(b'0' + (byte & 0o7)));
}

pub(crate) fn decode(text: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let (body, base) = match text {
        [b'"', inner @ .., b'"'] => (inner, 1),
        _ => (text, 0),
    };

    let mut out = Vec::with_capacity(body.len());
    let mut index = 0;
    while index < body.len() {
        let byte = body[index];
        if byte != b'\\' {
            out.push(byte);
            index += 1;
            continue;
        }

        match body.get(index + 1) {
            None => return Err(DecodeError::TruncatedEscape { offset: base + index }),
            Some(&escaped @ (b'\\' | b'"')) => {
                out.push(escaped);
                index += 2;
            }
            Some(b'0'..=b'7') => {
                let digits = &body[index + 1..];
                let count = digits
                    .iter()
                    .take(3)
                    .take_while(|digit| matches!(digit, b'0'..=b'7'))
                    .count();
                let digits = &digits[..count];
                let value = digits
                    .iter()
                    .fold(0u16, |acc, digit| acc * 8 + u16::from(digit - b'0'));
                let value = u8::try_from(value).map_err(|_| DecodeError::OctalOutOfRange {
                    digits: String::from_utf8_lossy(digits).into_owned(),
                    offset: base + index,
                })?;
                out.push(value);
                index += 1 + count;
            }
            // Unknown escapes are kept as written.
            Some(&other) => {
                out.extend_from_slice(&[b'\\', other]);
                index += 2;
            }
        }
    }
    Ok(out)
}
