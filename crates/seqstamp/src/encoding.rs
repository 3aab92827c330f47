//! Fixed-length URL-safe text form of 64-bit identifiers.
//!
//! A value is written as its 8 big-endian bytes, base64-encoded with the
//! URL-safe alphabet (`A-Z a-z 0-9 - _`) and without the trailing `=` pad,
//! which always yields exactly [`ENCODED_LEN`] ASCII characters.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::{Error, Result};

/// Length of an encoded identifier: `ceil(8 * 8 / 6)`.
pub const ENCODED_LEN: usize = 11;

/// Stack buffer that holds exactly one encoded identifier.
pub type EncodedId = [u8; ENCODED_LEN];

/// Encodes `value` into `buf` without allocating.
///
/// # Example
///
/// ```
/// use seqstamp::{EncodedId, encode_to_buf};
///
/// let mut buf = EncodedId::default();
/// encode_to_buf(1, &mut buf);
/// assert_eq!(&buf, b"AAAAAAAAAAE");
/// ```
#[inline]
pub fn encode_to_buf(value: i64, buf: &mut EncodedId) {
    let written = URL_SAFE_NO_PAD.encode_slice(value.to_be_bytes(), buf);
    debug_assert!(matches!(written, Ok(ENCODED_LEN)));
}

/// Encodes `value` as an owned 11-character string.
///
/// This is a pure function; it is how a value obtained from
/// [`UniqueIdGenerator::next_long`](crate::UniqueIdGenerator::next_long) or
/// received from elsewhere is rendered consistently.
pub fn encode(value: i64) -> String {
    URL_SAFE_NO_PAD.encode(value.to_be_bytes())
}

/// Decodes an 11-character identifier back into its 64-bit value.
///
/// # Errors
///
/// Returns [`Error::InvalidIdString`] if the input has the wrong length,
/// contains bytes outside the URL-safe alphabet (including `=` padding), or
/// sets the unused low bits of the final character.
pub fn decode(s: &str) -> Result<i64> {
    let invalid = || Error::InvalidIdString {
        input: s.to_owned(),
    };

    if s.len() != ENCODED_LEN {
        return Err(invalid());
    }
    let bytes = URL_SAFE_NO_PAD.decode(s).map_err(|_| invalid())?;
    let bytes: [u8; 8] = bytes.as_slice().try_into().map_err(|_| invalid())?;
    Ok(i64::from_be_bytes(bytes))
}

/// Returns `true` if `s` has the shape of an encoded identifier.
pub fn is_encoded_id(s: &str) -> bool {
    s.len() == ENCODED_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_vectors() {
        assert_eq!(encode(0), "AAAAAAAAAAA");
        assert_eq!(encode(1), "AAAAAAAAAAE");
        assert_eq!(encode(-1), "__________8");
        assert_eq!(encode(i64::MAX), "f_________8");
        assert_eq!(encode(i64::MIN), "gAAAAAAAAAA");
    }

    #[test]
    fn buffer_and_string_forms_agree() {
        for v in [0, 1, -1, 42, i64::MAX, i64::MIN, 0x0123_4567_89AB_CDEF] {
            let mut buf = EncodedId::default();
            encode_to_buf(v, &mut buf);
            assert_eq!(core::str::from_utf8(&buf).unwrap(), encode(v));
        }
    }

    #[test]
    fn decode_inverts_encode() {
        for v in [0, 1, -1, i64::MAX, i64::MIN] {
            assert_eq!(decode(&encode(v)).unwrap(), v);
        }
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert!(matches!(decode(""), Err(Error::InvalidIdString { .. })));
        assert!(matches!(decode("AAAAAAAAAA"), Err(Error::InvalidIdString { .. })));
        assert!(matches!(decode("AAAAAAAAAAA="), Err(Error::InvalidIdString { .. })));
    }

    #[test]
    fn decode_rejects_standard_alphabet() {
        assert!(matches!(decode("+/AAAAAAAAA"), Err(Error::InvalidIdString { .. })));
    }

    #[test]
    fn decode_rejects_trailing_bits() {
        // 'B' sets one of the two unused low bits of the final sextet.
        assert!(matches!(decode("AAAAAAAAAAB"), Err(Error::InvalidIdString { .. })));
    }

    proptest! {
        #[test]
        fn prop_encoded_is_url_safe(v in any::<i64>()) {
            let s = encode(v);
            prop_assert_eq!(s.len(), ENCODED_LEN);
            prop_assert!(is_encoded_id(&s));
            prop_assert!(!s.contains(['+', '/', '=']));
            prop_assert_eq!(decode(&s).unwrap(), v);
        }
    }
}
