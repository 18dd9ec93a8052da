//! Email address types and address-list formatting.

use std::fmt;

/// Mailbox: an email address with an optional display name.
///
/// Validation is left to the caller; this type only stores and renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmailAddress {
    address: String,
    name: Option<String>,
}

impl EmailAddress {
    /// Creates a new address without a display name.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
        }
    }

    /// Creates a new address with a display name.
    #[must_use]
    pub fn with_name(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: Some(name.into()),
        }
    }

    /// Creates an address from an optional display name.
    #[must_use]
    pub fn from_parts(address: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            address: address.into(),
            name: name.map(ToString::to_string),
        }
    }

    /// Returns the raw address as given.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the display name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Renders the address for use in a header.
    ///
    /// Returns `"Name" <address>` when a non-blank display name is set,
    /// otherwise just the sanitized address. An address that sanitizes to
    /// nothing renders empty, whatever the display name.
    #[must_use]
    pub fn render(&self) -> String {
        let address = sanitize_address(&self.address);
        if address.is_empty() {
            return address;
        }
        match self.name.as_deref().map(sanitize_display_name) {
            Some(name) if !name.is_empty() => format!("\"{name}\" <{address}>"),
            _ => address,
        }
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Removes every character that is not legal in an email address.
///
/// Keeps ASCII letters, digits and ``!#$%&'*+-=?^_`{|}~@.[]``. Whitespace,
/// CR/LF, angle brackets, quotes and control characters are dropped.
#[must_use]
pub fn sanitize_address(address: &str) -> String {
    address
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-=?^_`{|}~@.[]".contains(*c))
        .collect()
}

/// Trims a display name and drops control characters and double quotes.
#[must_use]
pub fn sanitize_display_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Formats a list of addresses for a header value.
///
/// Entries are joined with `,` and no space. Returns `None` when the result
/// is blank, so callers can omit the header instead of emitting it empty.
#[must_use]
pub fn format_address_list<'a, I>(addresses: I) -> Option<String>
where
    I: IntoIterator<Item = &'a EmailAddress>,
{
    let joined = addresses
        .into_iter()
        .map(EmailAddress::render)
        .filter(|rendered| !rendered.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
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
    use proptest::prelude::*;

    #[test]
    fn test_render_without_name() {
        let addr = EmailAddress::new("user@example.com");
        assert_eq!(addr.render(), "user@example.com");
    }

    #[test]
    fn test_render_with_name() {
        let addr = EmailAddress::with_name("john@example.com", "John Doe");
        assert_eq!(addr.render(), "\"John Doe\" <john@example.com>");
    }

    #[test]
    fn test_render_blank_name() {
        let addr = EmailAddress::with_name("john@example.com", "   ");
        assert_eq!(addr.render(), "john@example.com");

        let addr = EmailAddress::with_name("john@example.com", "");
        assert_eq!(addr.render(), "john@example.com");
    }

    #[test]
    fn test_sanitize_strips_injection() {
        assert_eq!(
            sanitize_address("victim@example.com\r\nBcc: evil@example.com"),
            "victim@example.comBccevil@example.com"
        );
        assert_eq!(sanitize_address("<user@example.com>"), "user@example.com");
        assert_eq!(sanitize_address("us er@exa\tmple.com"), "user@example.com");
    }

    #[test]
    fn test_sanitize_keeps_specials() {
        let addr = "a.b+c-d_e!#$%&'*=?^`{|}~@[127.0.0.1]";
        assert_eq!(sanitize_address(addr), addr);
    }

    #[test]
    fn test_display_name_sanitized() {
        let addr = EmailAddress::with_name("a@example.com", " Eve \"the\"\r\nBcc: x ");
        assert_eq!(addr.render(), "\"Eve theBcc: x\" <a@example.com>");
    }

    #[test]
    fn test_format_list_joins_without_space() {
        let list = vec![
            EmailAddress::new("a@example.com"),
            EmailAddress::with_name("b@example.com", "Bee"),
        ];
        assert_eq!(
            format_address_list(&list).as_deref(),
            Some("a@example.com,\"Bee\" <b@example.com>")
        );
    }

    #[test]
    fn test_format_list_empty() {
        let list: Vec<EmailAddress> = Vec::new();
        assert_eq!(format_address_list(&list), None);

        let list = vec![EmailAddress::new("<>")];
        assert_eq!(format_address_list(&list), None);

        let list = vec![EmailAddress::with_name("", "Nobody")];
        assert_eq!(format_address_list(&list), None);
    }

    #[test]
    fn test_format_list_skips_empty_entries() {
        let list = vec![EmailAddress::new("\r\n"), EmailAddress::new("a@example.com")];
        assert_eq!(format_address_list(&list).as_deref(), Some("a@example.com"));
    }

    proptest! {
        #[test]
        fn sanitized_address_has_no_header_breaking_chars(input in ".*") {
            let clean = sanitize_address(&input);
            prop_assert!(!clean.contains('\r'));
            prop_assert!(!clean.contains('\n'));
            prop_assert!(!clean.contains('<'));
            prop_assert!(!clean.contains('>'));
            prop_assert!(!clean.contains(' '));
        }
    }
}
