//! `0x` hexadecimal scheme.

use std::fmt::Write as _;

use crate::{DecodeError, is_space};

pub(crate) fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for byte in bytes {
        // Writing into a String cannot fail.
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Decodes the digits following the `0x` prefix. `base` is the prefix length,
/// used to report offsets relative to the whole value.
pub(crate) fn decode(digits: &[u8], base: usize) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(digits.len() / 2);
    let mut high: Option<u8> = None;

    for (index, &digit) in digits.iter().enumerate() {
        if is_space(digit) {
            continue;
        }
        let nibble = nibble(digit).ok_or(DecodeError::InvalidHexDigit {
            digit: char::from(digit),
            offset: base + index,
        })?;
        match high.take() {
            Some(high) => out.push((high << 4) | nibble),
            None => high = Some(nibble),
        }
    }

    if high.is_some() {
        return Err(DecodeError::OddHexDigits);
    }
    Ok(out)
}

const fn nibble(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_lowercase_pairs() {
        assert_eq!(encode(&[0x00, 0xAB, 0x7f]), "0x00ab7f");
        assert_eq!(encode(&[]), "0x");
    }

    #[test]
    fn decodes_mixed_case_with_whitespace() {
        assert_eq!(decode(b"De Ad\nbE\tef", 2).unwrap(), [0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn odd_digit_count_fails() {
        assert_eq!(decode(b"abc", 2).unwrap_err(), DecodeError::OddHexDigits);
    }

    #[test]
    fn invalid_digit_reports_offset() {
        assert_eq!(
            decode(b"0g", 2).unwrap_err(),
            DecodeError::InvalidHexDigit {
                digit: 'g',
                offset: 3
            }
        );
    }
}
