//! Base-128 varints and zigzag mapping.
//!
//! Varints are little-endian groups of seven bits with the high bit of each
//! byte set while more bytes follow. A `u64` never needs more than ten bytes.

use crate::error::DecodeError;
use bytes::BufMut;

/// Longest valid varint encoding of a `u64`
pub const MAX_VARINT_LEN: usize = 10;

/// Append `value` to `out` as a varint.
#[inline]
pub fn encode_varint(mut value: u64, out: &mut impl BufMut) {
    while value >= 0x80 {
        out.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    out.put_u8(value as u8);
}

/// Number of bytes `encode_varint` writes for `value`.
#[inline]
pub fn varint_len(value: u64) -> usize {
    // 1 byte per started group of 7 significant bits, at least one byte.
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Read a varint from the front of `input`, starting at absolute `offset`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_varint(input: &[u8], offset: usize) -> Result<(u64, usize), DecodeError> {
    let mut value: u64 = 0;
    for (i, &byte) in input.iter().enumerate() {
        // the tenth byte may only contribute the top bit of a u64
        if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
            return Err(DecodeError::VarintOverflow { offset });
        }
        value |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(DecodeError::UnexpectedEof {
        offset: offset + input.len(),
    })
}

/// Map a signed value onto an unsigned one so small magnitudes stay short.
#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_varint(value, &mut out);
        out
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encoded(0), vec![0x00]);
        assert_eq!(encoded(1), vec![0x01]);
        assert_eq!(encoded(127), vec![0x7F]);
        assert_eq!(encoded(128), vec![0x80, 0x01]);
        assert_eq!(encoded(300), vec![0xAC, 0x02]);
        assert_eq!(encoded(u64::MAX).len(), MAX_VARINT_LEN);
    }

    #[test]
    fn test_varint_len_matches_encoding() {
        for value in [0, 1, 127, 128, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
            assert_eq!(varint_len(value), encoded(value).len(), "value {value}");
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_decode_reports_consumed_bytes() {
        let (value, used) = decode_varint(&[0xAC, 0x02, 0xFF], 0).unwrap();
        assert_eq!(value, 300);
        assert_eq!(used, 2);
    }

    #[test]
    fn test_truncated_varint() {
        assert_eq!(
            decode_varint(&[0x80, 0x80], 4),
            Err(DecodeError::UnexpectedEof { offset: 6 })
        );
        assert_eq!(
            decode_varint(&[], 0),
            Err(DecodeError::UnexpectedEof { offset: 0 })
        );
    }

    #[test]
    fn test_overlong_varint() {
        let bytes = [0xFF; 11];
        assert_eq!(
            decode_varint(&bytes, 0),
            Err(DecodeError::VarintOverflow { offset: 0 })
        );
        // ten bytes whose last byte overflows 64 bits
        let mut bytes = [0xFF; 10];
        bytes[9] = 0x02;
        assert_eq!(
            decode_varint(&bytes, 0),
            Err(DecodeError::VarintOverflow { offset: 0 })
        );
    }

    #[test]
    fn test_zigzag() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
        assert_eq!(zigzag_encode(i64::MIN), u64::MAX);
        for v in [0i64, -1, 1, i32::MIN as i64, i64::MAX, i64::MIN] {
            assert_eq!(zigzag_decode(zigzag_encode(v)), v);
        }
    }
}
