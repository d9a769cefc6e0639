use crate::PrimitiveError;
use alloy::primitives::Address;
use std::str::FromStr;

/// Width of a 32-byte word in hex characters.
const WORD_NIBBLES: usize = 64;

/// Encode bytes as a `0x`-prefixed lowercase hex string.
pub fn hex_encode<T: AsRef<[u8]>>(bytes: T) -> String {
    hex::encode_prefixed(bytes)
}

/// Decode a hex string, with or without a `0x` prefix.
pub fn hex_decode(s: &str) -> Result<Vec<u8>, PrimitiveError> {
    hex::decode(strip_prefix(s)).map_err(|_| PrimitiveError::MalformedHex(s.to_owned()))
}

/// Remove a leading lowercase `0x`.
pub fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Left-pad with `0` to `width` characters. Inputs already at least `width`
/// long are returned unchanged.
pub fn pad_left(s: &str, width: usize) -> String {
    format!("{s:0>width$}")
}

/// Parse a 20-byte address. Input is case-insensitive, with or without a
/// `0x` prefix. No checksum validation is performed.
pub fn parse_address(s: &str) -> Result<Address, PrimitiveError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    Address::from_str(digits).map_err(|_| PrimitiveError::InvalidAddress(s.to_owned()))
}

/// Reorder a 65-byte `r‖s‖v` signature into the `pad64(v)‖r‖s` layout
/// appended to permit payloads.
///
/// The result is unprefixed lowercase hex, 192 characters long.
pub fn convert_sig_rs_to_vrs(sig: &str) -> Result<String, PrimitiveError> {
    let sig = strip_prefix(sig).to_ascii_lowercase();
    if sig.len() != 130 || !sig.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PrimitiveError::MalformedHex(sig));
    }

    let (rs, v) = sig.split_at(128);
    let mut out = pad_left(v, WORD_NIBBLES);
    out.push_str(rs);
    Ok(out)
}

/// Inverse of [`convert_sig_rs_to_vrs`]: turns `pad64(v)‖r‖s` back into
/// the 130-character `r‖s‖v` form.
pub fn convert_sig_vrs_to_rs(vrs: &str) -> Result<String, PrimitiveError> {
    let vrs = strip_prefix(vrs).to_ascii_lowercase();
    if vrs.len() != 192 || !vrs.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PrimitiveError::MalformedHex(vrs));
    }

    let (v_word, rs) = vrs.split_at(WORD_NIBBLES);
    let (padding, v) = v_word.split_at(WORD_NIBBLES - 2);
    if padding.bytes().any(|b| b != b'0') {
        return Err(PrimitiveError::MalformedHex(vrs));
    }

    let mut out = String::with_capacity(130);
    out.push_str(rs);
    out.push_str(v);
    Ok(out)
}
