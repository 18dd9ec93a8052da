//! Multipart boundary delimiters.

use chrono::{DateTime, Utc};
use std::fmt;

/// Prefix of the outer `multipart/mixed` boundary.
pub const MIXED_PREFIX: &str = "Boundary-mixed-";

/// Prefix of the `multipart/alternative` boundary.
pub const ALTERNATIVE_PREFIX: &str = "Boundary-alt-";

/// Boundary token shared by all parts of one message.
///
/// The same token backs both the mixed and the alternative boundary; the
/// prefixes keep them distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary(String);

impl Boundary {
    /// Creates a boundary from an explicit token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Derives a boundary from a point in time.
    ///
    /// The token is the hex Unix timestamp followed by the zero-padded hex
    /// sub-second nanoseconds.
    #[must_use]
    pub fn from_time(time: DateTime<Utc>) -> Self {
        Self(format!(
            "{:x}{:08x}",
            time.timestamp(),
            time.timestamp_subsec_nanos()
        ))
    }

    /// Derives a boundary from the current time.
    #[must_use]
    pub fn now() -> Self {
        Self::from_time(Utc::now())
    }

    /// Returns the raw token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }

    /// Returns the `multipart/mixed` boundary value.
    #[must_use]
    pub fn mixed(&self) -> String {
        format!("{MIXED_PREFIX}{}", self.0)
    }

    /// Returns the `multipart/alternative` boundary value.
    #[must_use]
    pub fn alternative(&self) -> String {
        format!("{ALTERNATIVE_PREFIX}{}", self.0)
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the delimiter line that opens a part: `--<boundary>\r\n`.
#[must_use]
pub fn open_delimiter(boundary: &str) -> String {
    format!("--{boundary}\r\n")
}

/// Returns the delimiter line that closes a multipart body: `--<boundary>--\r\n`.
#[must_use]
pub fn close_delimiter(boundary: &str) -> String {
    format!("--{boundary}--\r\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_time() {
        let time = Utc.timestamp_opt(1_700_000_000, 255).unwrap();
        let boundary = Boundary::from_time(time);
        assert_eq!(boundary.token(), "6553f100000000ff");
    }

    #[test]
    fn test_prefixes() {
        let boundary = Boundary::new("abc");
        assert_eq!(boundary.mixed(), "Boundary-mixed-abc");
        assert_eq!(boundary.alternative(), "Boundary-alt-abc");
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(open_delimiter("Boundary-alt-abc"), "--Boundary-alt-abc\r\n");
        assert_eq!(close_delimiter("Boundary-alt-abc"), "--Boundary-alt-abc--\r\n");
    }

    #[test]
    fn test_now_is_hex() {
        let boundary = Boundary::now();
        assert!(!boundary.token().is_empty());
        assert!(boundary.token().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
