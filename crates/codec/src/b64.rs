//! `0s` base64 scheme (standard alphabet, `=` padding).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::{DecodeError, is_space};

pub(crate) fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len().div_ceil(3) * 4);
    out.push_str("0s");
    STANDARD.encode_string(bytes, &mut out);
    out
}

pub(crate) fn decode(payload: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let compact: Vec<u8> = payload.iter().copied().filter(|&b| !is_space(b)).collect();
    Ok(STANDARD.decode(compact)?)
}
