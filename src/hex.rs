//! Lowercase hex encoding used for `bytes` fields.

use crate::error::ConversionError;

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Encode `bytes` as lowercase hex, high nibble first.
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(char::from(DIGITS[usize::from(byte >> 4)]));
        out.push(char::from(DIGITS[usize::from(byte & 0x0f)]));
    }
    out
}

/// Decode a hex string. Upper and lower case digits are both accepted.
///
/// Fails with [`ErrorKind::MalformedEncoding`](crate::ErrorKind::MalformedEncoding)
/// if the length is odd or any character is not a hex digit.
pub fn decode_hex(hex: &str) -> Result<Vec<u8>, ConversionError> {
    let digits = hex.as_bytes();
    if digits.len() % 2 != 0 {
        return Err(ConversionError::malformed_encoding(
            "hex string must be of even length",
        ));
    }

    digits
        .chunks_exact(2)
        .map(|pair| Ok((nibble(pair[0])? << 4) | nibble(pair[1])?))
        .collect()
}

fn nibble(digit: u8) -> Result<u8, ConversionError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(ConversionError::malformed_encoding(
            "hex string must only contain hex digits",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use proptest::prelude::*;
    use proptest::property_test;

    #[test]
    fn test_encode() {
        assert_eq!(encode_hex(&[]), "");
        assert_eq!(encode_hex(&[0x0a, 0xff]), "0aff");
        assert_eq!(encode_hex(&[0x00, 0x10, 0xab]), "0010ab");
    }

    #[test]
    fn test_decode_mixed_case() {
        assert_eq!(decode_hex("0AfF").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(decode_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_rejects_odd_length() {
        let err = decode_hex("abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEncoding);
        assert_eq!(err.message(), "hex string must be of even length");
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        for input in ["zz", "0g", "+1", "é0"] {
            let err = decode_hex(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedEncoding, "input {input:?}");
        }
    }

    #[property_test]
    fn proptest_hex_bytes_roundtrip(bytes: Vec<u8>) {
        let hex = encode_hex(&bytes);
        prop_assert_eq!(hex.len(), bytes.len() * 2);
        prop_assert_eq!(decode_hex(&hex).unwrap(), bytes);
    }

    #[test]
    fn proptest_hex_string_normalizes_case() {
        fn test(hex: String) {
            let bytes = decode_hex(&hex).unwrap();
            assert_eq!(encode_hex(&bytes), hex.to_ascii_lowercase());
        }

        proptest!(|(hex in "([0-9a-fA-F]{2}){0,32}")| test(hex))
    }
}
