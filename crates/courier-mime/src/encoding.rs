//! Transfer encoding utilities.
//!
//! Attachment bodies are sent as Base64, split into CRLF-terminated lines
//! (RFC 2045 section 6.8).

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Maximum encoded line length for Base64 bodies.
pub const MAX_LINE_LENGTH: usize = 76;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// Whitespace (including the CRLF inserted by [`encode_base64_wrapped`]) is
/// ignored.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).map_err(Into::into)
}

/// Encodes data as Base64 and wraps it at [`MAX_LINE_LENGTH`] characters.
///
/// Every line, including the last one, ends with CRLF. Empty input yields
/// an empty string.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    wrap_lines(&encode_base64(data), MAX_LINE_LENGTH)
}

/// Splits `text` into chunks of `width` characters, each followed by CRLF.
///
/// Intended for ASCII input such as Base64 output; chunks are cut on byte
/// offsets.
#[must_use]
pub fn wrap_lines(text: &str, width: usize) -> String {
    if width == 0 || text.is_empty() {
        return text.to_string();
    }

    let mut result = String::with_capacity(text.len() + (text.len() / width + 1) * 2);
    for chunk in text.as_bytes().chunks(width) {
        result.push_str(&String::from_utf8_lossy(chunk));
        result.push_str("\r\n");
    }
    result
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base64_encode_decode() {
        let data = b"Hello, World!";
        let encoded = encode_base64(data);
        assert_eq!(encoded, "SGVsbG8sIFdvcmxkIQ==");

        let decoded = decode_base64(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_wrapped_short_input() {
        assert_eq!(encode_base64_wrapped(b"Hello"), "SGVsbG8=\r\n");
    }

    #[test]
    fn test_wrapped_empty_input() {
        assert_eq!(encode_base64_wrapped(b""), "");
    }

    #[test]
    fn test_wrapped_exact_line() {
        // 57 bytes encode to exactly 76 characters
        let data = [b'a'; 57];
        let wrapped = encode_base64_wrapped(&data);
        assert_eq!(wrapped.len(), 78);
        assert!(wrapped.ends_with("\r\n"));
        assert_eq!(wrapped.matches("\r\n").count(), 1);
    }

    #[test]
    fn test_wrapped_two_lines() {
        let data = [0xFFu8; 60];
        let wrapped = encode_base64_wrapped(&data);
        let lines: Vec<&str> = wrapped.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 76);
        assert_eq!(lines[1].len(), 4);
    }

    #[test]
    fn test_decode_ignores_line_breaks() {
        let data: Vec<u8> = (0..=255).collect();
        let wrapped = encode_base64_wrapped(&data);
        assert_eq!(decode_base64(&wrapped).unwrap(), data);
    }

    #[test]
    fn test_decode_invalid() {
        assert!(decode_base64("not base64!").is_err());
    }

    proptest! {
        #[test]
        fn wrapped_lines_never_exceed_limit(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let wrapped = encode_base64_wrapped(&data);
            for line in wrapped.split_terminator("\r\n") {
                prop_assert!(line.len() <= MAX_LINE_LENGTH);
                prop_assert!(!line.is_empty());
            }
            prop_assert_eq!(wrapped.replace("\r\n", ""), encode_base64(&data));
        }
    }
}
