//! Base64 VLQ codec used by the `mappings` field of v3 source maps.

use crate::errors::SourceMapError;

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE_MASK: u64 = (1 << VLQ_BASE_SHIFT) - 1;
const VLQ_CONTINUATION_BIT: u64 = 1 << VLQ_BASE_SHIFT;

/// Largest magnitude a decoded value may have (values are signed 32-bit).
const MAX_MAGNITUDE: u64 = 1 << 31;

/// Append the VLQ encoding of `value` to `out`.
pub fn encode(value: i64, out: &mut String) {
    let mut vlq = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = vlq & VLQ_BASE_MASK;
        vlq >>= VLQ_BASE_SHIFT;
        if vlq > 0 {
            digit |= VLQ_CONTINUATION_BIT;
        }
        out.push(BASE64_ALPHABET[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

fn decode_digit(c: char) -> Result<u64, SourceMapError> {
    let digit = match c {
        'A'..='Z' => c as u8 - b'A',
        'a'..='z' => c as u8 - b'a' + 26,
        '0'..='9' => c as u8 - b'0' + 52,
        '+' => 62,
        '/' => 63,
        _ => return Err(SourceMapError::InvalidBase64(c)),
    };
    Ok(u64::from(digit))
}

/// Decode every value of a single comma-free segment.
pub fn decode_segment(segment: &str) -> Result<Vec<i64>, SourceMapError> {
    let mut values = Vec::with_capacity(5);
    let mut accumulator: u64 = 0;
    let mut shift: u32 = 0;
    let mut pending = false;

    for c in segment.chars() {
        let digit = decode_digit(c)?;
        if shift > 32 {
            return Err(SourceMapError::VlqOverflow);
        }
        accumulator |= (digit & VLQ_BASE_MASK) << shift;

        if digit & VLQ_CONTINUATION_BIT != 0 {
            shift += VLQ_BASE_SHIFT;
            pending = true;
            continue;
        }

        let negative = accumulator & 1 == 1;
        let magnitude = accumulator >> 1;
        if magnitude > MAX_MAGNITUDE {
            return Err(SourceMapError::VlqOverflow);
        }
        let magnitude = magnitude as i64;
        values.push(if negative { -magnitude } else { magnitude });

        accumulator = 0;
        shift = 0;
        pending = false;
    }

    if pending {
        return Err(SourceMapError::TruncatedVlq);
    }
    Ok(values)
}
