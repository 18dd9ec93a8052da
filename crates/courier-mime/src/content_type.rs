//! MIME content type handling.

use crate::boundary::Boundary;
use crate::error::{Error, Result};
use std::fmt;

/// Charset used for body parts unless the caller picks another one.
pub const DEFAULT_CHARSET: &str = "iso-8859-1";

/// MIME content type with ordered parameters.
///
/// Parameter values are always rendered quoted, e.g.
/// `text/plain; charset="iso-8859-1"`. Quotes, backslashes and control
/// characters are dropped from values when rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Type and subtype as given (e.g., "image/png").
    pub mime: String,
    /// Parameters in insertion order (e.g., charset, boundary, name).
    pub parameters: Vec<(String, String)>,
}

impl ContentType {
    /// Creates a content type from a `type/subtype` string without parameters.
    #[must_use]
    pub fn new(mime: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates a text/plain content type.
    #[must_use]
    pub fn text_plain(charset: &str) -> Self {
        Self::new("text/plain").with_parameter("charset", charset)
    }

    /// Creates a text/html content type.
    #[must_use]
    pub fn text_html(charset: &str) -> Self {
        Self::new("text/html").with_parameter("charset", charset)
    }

    /// Creates the outer multipart/mixed content type.
    #[must_use]
    pub fn multipart_mixed(boundary: &Boundary) -> Self {
        Self::new("multipart/mixed").with_parameter("boundary", boundary.mixed())
    }

    /// Creates the multipart/alternative content type.
    #[must_use]
    pub fn multipart_alternative(boundary: &Boundary) -> Self {
        Self::new("multipart/alternative").with_parameter("boundary", boundary.alternative())
    }

    /// Creates the content type of an attached file.
    #[must_use]
    pub fn attachment(mime: &str, name: &str) -> Self {
        Self::new(mime).with_parameter("name", name)
    }

    /// Adds a parameter, replacing an existing one with the same key.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self
            .parameters
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            slot.1 = value;
        } else {
            self.parameters.push((key, value));
        }
        self
    }

    /// Returns a parameter value by case-insensitive key.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary")
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.mime
            .split('/')
            .next()
            .is_some_and(|main| main.trim().eq_ignore_ascii_case("multipart"))
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2="value2"`
    ///
    /// # Errors
    ///
    /// Returns an error if the type or subtype is missing.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(';');

        let mime = parts.next().unwrap_or_default().trim();
        match mime.split_once('/') {
            Some((main, sub)) if !main.trim().is_empty() && !sub.trim().is_empty() => {}
            _ => return Err(Error::InvalidContentType(s.to_string())),
        }

        let mut content_type = Self::new(mime);
        for param in parts {
            if let Some((key, value)) = param.trim().split_once('=') {
                content_type = content_type
                    .with_parameter(key.trim(), value.trim().trim_matches('"'));
            }
        }

        Ok(content_type)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mime)?;
        for (key, value) in &self.parameters {
            write!(f, "; {key}=\"{}\"", sanitize_parameter_value(value))?;
        }
        Ok(())
    }
}

/// Drops characters that would end a quoted parameter value or the header
/// line: `"`, `\` and control characters.
#[must_use]
pub fn sanitize_parameter_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '"' | '\\'))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_text_plain() {
        let ct = ContentType::text_plain(DEFAULT_CHARSET);
        assert_eq!(ct.to_string(), "text/plain; charset=\"iso-8859-1\"");
        assert_eq!(ct.charset(), Some("iso-8859-1"));
    }

    #[test]
    fn test_text_html() {
        let ct = ContentType::text_html("utf-8");
        assert_eq!(ct.to_string(), "text/html; charset=\"utf-8\"");
    }

    #[test]
    fn test_multipart_mixed() {
        let ct = ContentType::multipart_mixed(&Boundary::new("42"));
        assert_eq!(
            ct.to_string(),
            "multipart/mixed; boundary=\"Boundary-mixed-42\""
        );
        assert!(ct.is_multipart());
    }

    #[test]
    fn test_multipart_alternative() {
        let ct = ContentType::multipart_alternative(&Boundary::new("42"));
        assert_eq!(ct.boundary(), Some("Boundary-alt-42"));
    }

    #[test]
    fn test_attachment() {
        let ct = ContentType::attachment("application/pdf", "report.pdf");
        assert_eq!(ct.to_string(), "application/pdf; name=\"report.pdf\"");
        assert!(!ct.is_multipart());
    }

    #[test]
    fn test_attachment_name_cannot_break_out() {
        let ct = ContentType::attachment("text/plain", "a\"\r\nContent-Type: text/html");
        assert_eq!(
            ct.to_string(),
            "text/plain; name=\"aContent-Type: text/html\""
        );

        let ct = ContentType::attachment("text/plain", "dir\\x\".txt");
        assert_eq!(ct.to_string(), "text/plain; name=\"dirx.txt\"");
    }

    #[test]
    fn test_parameter_replaced_in_place() {
        let ct = ContentType::new("text/plain")
            .with_parameter("charset", "us-ascii")
            .with_parameter("format", "flowed")
            .with_parameter("Charset", "utf-8");
        assert_eq!(ct.to_string(), "text/plain; charset=\"utf-8\"; format=\"flowed\"");
    }

    #[test]
    fn test_parse_quoted() {
        let ct = ContentType::parse("multipart/mixed; boundary=\"Boundary-mixed-1\"").unwrap();
        assert_eq!(ct.mime, "multipart/mixed");
        assert_eq!(ct.boundary(), Some("Boundary-mixed-1"));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ContentType::parse("text").is_err());
        assert!(ContentType::parse("/plain").is_err());
        assert!(ContentType::parse("").is_err());
    }
}
