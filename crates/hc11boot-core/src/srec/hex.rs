//! Fixed-width hex field decoding

const DIGITS_PER_BYTE: usize = 2;

/// Decode one byte from a pair of hex digits
pub(crate) fn decode_byte(pair: &[u8]) -> Option<u8> {
    // from_str_radix alone would accept a leading '+'
    if pair.len() != DIGITS_PER_BYTE || !pair.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let digits = core::str::from_utf8(pair).ok()?;
    u8::from_str_radix(digits, 16).ok()
}

/// Decode a big-endian 16-bit value from four hex digits
pub(crate) fn decode_u16(digits: &[u8]) -> Option<u16> {
    if digits.len() != 2 * DIGITS_PER_BYTE {
        return None;
    }
    let high = decode_byte(&digits[..DIGITS_PER_BYTE])?;
    let low = decode_byte(&digits[DIGITS_PER_BYTE..])?;
    Some(u16::from_be_bytes([high, low]))
}

/// Number of characters used to encode `bytes` bytes
pub(crate) const fn digits_for(bytes: usize) -> usize {
    bytes * DIGITS_PER_BYTE
}
