//! Fixed-width base-58 codec between 64-byte digests and C4 id text.
//!
//! A C4 id is the two character prefix `c4` followed by exactly 88 base-58
//! digits, most significant first. Leading zero digits are written as `1`,
//! the first symbol of the alphabet, so every id has the same width and ids
//! sort as strings in the same order as their numeric values.
//!
//! The arithmetic works directly on the 64-byte big-endian buffer: encoding
//! is repeated long division by 58, decoding is repeated multiply-and-add.
//! [`encode`] is a `const fn` so the well-known ids can be built at compile
//! time.

use crate::error::{C4Error, C4Result};

/// The 58 symbols, in digit order. `0`, `O`, `I` and `l` are excluded.
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Literal prefix of every textual id.
pub const PREFIX: &str = "c4";

/// Total characters in a textual id.
pub const ID_LEN: usize = 90;

/// Base-58 digits following the prefix.
pub const DIGITS_LEN: usize = ID_LEN - PREFIX.len();

/// Bytes in a digest.
pub const DIGEST_LEN: usize = 64;

const BASE: u32 = 58;

const INVALID: u8 = 0xFF;

const DECODE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Map an ASCII byte to its digit value, if it is in the alphabet.
pub const fn digit_value(symbol: u8) -> Option<u8> {
    match DECODE[symbol as usize] {
        INVALID => None,
        digit => Some(digit),
    }
}

/// Encode a digest value as 88 base-58 digit symbols, zero padded.
///
/// The prefix is not included. An all-zero value encodes as 88 `1`s; the
/// decision to render it as empty text belongs to the identifier layer.
pub const fn encode(bytes: &[u8; DIGEST_LEN]) -> [u8; DIGITS_LEN] {
    let mut value = *bytes;
    let mut digits = [ALPHABET[0]; DIGITS_LEN];

    // Skip leading zero bytes; they never contribute to a quotient.
    let mut start = 0;
    let mut pos = DIGITS_LEN;
    while pos > 0 {
        while start < DIGEST_LEN && value[start] == 0 {
            start += 1;
        }
        if start == DIGEST_LEN {
            break;
        }

        let mut rem: u32 = 0;
        let mut i = start;
        while i < DIGEST_LEN {
            let acc = (rem << 8) | value[i] as u32;
            value[i] = (acc / BASE) as u8;
            rem = acc % BASE;
            i += 1;
        }

        pos -= 1;
        digits[pos] = ALPHABET[rem as usize];
    }
    digits
}

/// Decode a full 90-character id into its 64-byte big-endian value.
///
/// Fails with [`C4Error::BadLength`] unless the input is exactly 90
/// characters, with [`C4Error::BadChar`] at position 0 if the prefix is
/// wrong or at the offending position for a symbol outside the alphabet, and
/// with [`C4Error::OutOfRange`] if the value overflows 512 bits.
pub fn decode(src: &str) -> C4Result<[u8; DIGEST_LEN]> {
    let len = src.chars().count();
    if len != ID_LEN {
        return Err(C4Error::BadLength(len));
    }
    if !src.starts_with(PREFIX) {
        return Err(C4Error::BadChar(0));
    }

    let mut value = [0u8; DIGEST_LEN];
    for (pos, c) in src.chars().enumerate().skip(PREFIX.len()) {
        let digit = u8::try_from(c)
            .ok()
            .and_then(digit_value)
            .ok_or(C4Error::BadChar(pos))?;

        let mut carry = u32::from(digit);
        for byte in value.iter_mut().rev() {
            let acc = u32::from(*byte) * BASE + carry;
            *byte = (acc & 0xFF) as u8;
            carry = acc >> 8;
        }
        if carry != 0 {
            return Err(C4Error::OutOfRange);
        }
    }
    Ok(value)
}
