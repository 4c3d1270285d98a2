//! ULEB128 variable-length integers.
//!
//! Seven value bits per byte, least significant group first, high bit set on
//! every byte except the last. Decoding is strict: the value must fit in the
//! declared width, the stream must terminate, and the encoding must be the
//! shortest one (no redundant zero groups).

use crate::error::EncodingError;

/// Append the ULEB128 encoding of `value` to `out`.
pub fn encode(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Encode `value` into a fresh buffer.
pub fn to_vec(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(10);
    encode(value, &mut out);
    out
}

/// Decode a ULEB128 value no wider than `bits` from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode(bytes: &[u8], bits: u32) -> Result<(u64, usize), EncodingError> {
    debug_assert!(bits > 0 && bits <= 64);
    let mut value: u64 = 0;
    let mut shift: u32 = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if shift >= bits {
            return Err(EncodingError::UlebOverflow { bits });
        }
        let group = (byte & 0x7f) as u64;
        let room = bits - shift;
        if room < 7 && group >> room != 0 {
            return Err(EncodingError::UlebOverflow { bits });
        }
        value |= group << shift;

        if byte & 0x80 == 0 {
            if i > 0 && byte == 0 {
                return Err(EncodingError::NonCanonicalUleb);
            }
            return Ok((value, i + 1));
        }
        shift += 7;
    }

    Err(EncodingError::UnterminatedUleb)
}

/// Decode a length or variant tag (BCS caps these at `u32`).
pub fn decode_u32(bytes: &[u8]) -> Result<(u32, usize), EncodingError> {
    let (value, read) = decode(bytes, 32)?;
    Ok((value as u32, read))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, &[0x00])]
    #[case(1, &[0x01])]
    #[case(127, &[0x7f])]
    #[case(128, &[0x80, 0x01])]
    #[case(300, &[0xac, 0x02])]
    #[case(16384, &[0x80, 0x80, 0x01])]
    #[case(u32::MAX as u64, &[0xff, 0xff, 0xff, 0xff, 0x0f])]
    fn test_known_encodings(#[case] value: u64, #[case] expected: &[u8]) {
        assert_eq!(to_vec(value), expected);
        assert_eq!(decode(expected, 64).unwrap(), (value, expected.len()));
    }

    #[test]
    fn test_u64_max() {
        let bytes = to_vec(u64::MAX);
        assert_eq!(bytes.len(), 10);
        assert_eq!(decode(&bytes, 64).unwrap(), (u64::MAX, 10));
    }

    #[test]
    fn test_rejects_value_wider_than_u32() {
        // u32::MAX + 1
        let bytes = to_vec(1u64 << 32);
        assert_eq!(
            decode_u32(&bytes),
            Err(EncodingError::UlebOverflow { bits: 32 })
        );
    }

    #[test]
    fn test_rejects_sixth_byte_for_u32() {
        let bytes = [0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        assert_eq!(
            decode_u32(&bytes),
            Err(EncodingError::UlebOverflow { bits: 32 })
        );
    }

    #[test]
    fn test_rejects_eleven_bytes_for_u64() {
        let mut bytes = vec![0xff; 10];
        bytes.push(0x01);
        assert_eq!(
            decode(&bytes, 64),
            Err(EncodingError::UlebOverflow { bits: 64 })
        );
    }

    #[test]
    fn test_rejects_unterminated() {
        assert_eq!(decode(&[0x80, 0x80], 32), Err(EncodingError::UnterminatedUleb));
        assert_eq!(decode(&[], 32), Err(EncodingError::UnterminatedUleb));
    }

    #[test]
    fn test_rejects_non_canonical() {
        assert_eq!(decode(&[0x80, 0x00], 32), Err(EncodingError::NonCanonicalUleb));
    }

    #[test]
    fn test_ignores_bytes_after_terminator() {
        assert_eq!(decode(&[0x05, 0xff], 32).unwrap(), (5, 1));
    }

    proptest! {
        #[test]
        fn uleb_roundtrip_u64(value in any::<u64>()) {
            let bytes = to_vec(value);
            prop_assert_eq!(decode(&bytes, 64).unwrap(), (value, bytes.len()));
        }

        #[test]
        fn uleb_roundtrip_u32(value in any::<u32>()) {
            let bytes = to_vec(value as u64);
            prop_assert_eq!(decode_u32(&bytes).unwrap(), (value, bytes.len()));
        }

        #[test]
        fn uleb_rejects_over_wide(value in (1u64 << 32)..=u64::MAX) {
            let bytes = to_vec(value);
            prop_assert!(decode_u32(&bytes).is_err());
        }
    }
}
