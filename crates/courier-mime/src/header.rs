//! Header lines and the custom header map.

use std::fmt;
use std::fmt::Write as _;

/// Appends a `Name: value\r\n` line to `out`.
pub fn write_header(out: &mut String, name: &str, value: impl fmt::Display) {
    let _ = write!(out, "{name}: {value}\r\n");
}

/// Replaces CR, LF and other control characters with spaces.
///
/// Keeps a caller-supplied value on a single header line.
#[must_use]
pub fn sanitize_header_value(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Ordered header map keyed by exact header name.
///
/// Setting an existing name replaces its value in place, keeping the
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Gets the value of a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Removes a header. Returns the removed value, if any.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
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

    #[test]
    fn test_write_header() {
        let mut out = String::new();
        write_header(&mut out, "X-Priority", "1 (Highest)");
        assert_eq!(out, "X-Priority: 1 (Highest)\r\n");
    }

    #[test]
    fn test_sanitize_header_value() {
        assert_eq!(
            sanitize_header_value("Hi\r\nBcc: evil@example.com"),
            "Hi  Bcc: evil@example.com"
        );
        assert_eq!(sanitize_header_value("a\tb\0c"), "a b c");
        assert_eq!(sanitize_header_value("Grüße"), "Grüße");
    }

    #[test]
    fn test_headers_set_get() {
        let mut headers = Headers::new();
        headers.set("X-Mailer", "courier");
        assert_eq!(headers.get("X-Mailer"), Some("courier"));
        assert_eq!(headers.get("x-mailer"), None);
    }

    #[test]
    fn test_headers_set_keeps_position() {
        let mut headers = Headers::new();
        headers.set("A", "1");
        headers.set("B", "2");
        headers.set("A", "3");

        let collected: Vec<_> = headers.iter().collect();
        assert_eq!(collected, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_headers_remove() {
        let mut headers = Headers::new();
        headers.set("A", "1");
        headers.set("B", "2");
        assert_eq!(headers.remove("A"), Some("1".to_string()));
        assert_eq!(headers.remove("A"), None);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_headers_display() {
        let mut headers = Headers::new();
        headers.set("X-One", "1");
        headers.set("X-Two", "2");
        assert_eq!(headers.to_string(), "X-One: 1\r\nX-Two: 2\r\n");
        assert!(Headers::new().to_string().is_empty());
    }
}
