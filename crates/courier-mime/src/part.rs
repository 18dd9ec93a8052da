//! Body parts of a multipart message.

use crate::boundary::open_delimiter;
use crate::content_type::ContentType;
use crate::encoding::encode_base64_wrapped;
use crate::header::write_header;
use std::fmt;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// Base64 encoding.
    Base64,
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::Base64 => write!(f, "base64"),
        }
    }
}

/// One part inside a multipart body.
#[derive(Debug, Clone)]
pub struct Part {
    /// Content type of the part.
    pub content_type: ContentType,
    /// Transfer encoding of the part.
    pub transfer_encoding: TransferEncoding,
    /// Content-Disposition value, if any.
    pub disposition: Option<String>,
    /// Encoded body, written verbatim after the blank separator line.
    pub body: String,
}

impl Part {
    /// Creates a 7bit text part.
    ///
    /// The body is followed by a blank line.
    #[must_use]
    pub fn text(content_type: ContentType, text: &str) -> Self {
        Self {
            content_type,
            transfer_encoding: TransferEncoding::SevenBit,
            disposition: None,
            body: format!("{text}\r\n\r\n"),
        }
    }

    /// Creates a Base64 attachment part from raw file content.
    #[must_use]
    pub fn attachment(mime: &str, name: &str, content: &[u8]) -> Self {
        Self {
            content_type: ContentType::attachment(mime, name),
            transfer_encoding: TransferEncoding::Base64,
            disposition: Some("attachment".to_string()),
            body: encode_base64_wrapped(content),
        }
    }

    /// Writes the part, opened by the given boundary, to `out`.
    pub fn write_to(&self, out: &mut String, boundary: &str) {
        out.push_str(&open_delimiter(boundary));
        write_header(out, "Content-Type", &self.content_type);
        write_header(out, "Content-Transfer-Encoding", self.transfer_encoding);
        if let Some(disposition) = &self.disposition {
            write_header(out, "Content-Disposition", disposition);
        }
        out.push_str("\r\n");
        out.push_str(&self.body);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::content_type::DEFAULT_CHARSET;

    #[test]
    fn test_text_part() {
        let part = Part::text(ContentType::text_plain(DEFAULT_CHARSET), "Hello");
        let mut out = String::new();
        part.write_to(&mut out, "Boundary-alt-1");
        assert_eq!(
            out,
            concat!(
                "--Boundary-alt-1\r\n",
                "Content-Type: text/plain; charset=\"iso-8859-1\"\r\n",
                "Content-Transfer-Encoding: 7bit\r\n",
                "\r\n",
                "Hello\r\n",
                "\r\n",
            )
        );
    }

    #[test]
    fn test_attachment_part() {
        let part = Part::attachment("text/plain", "hello.txt", b"Hello, World!");
        let mut out = String::new();
        part.write_to(&mut out, "Boundary-mixed-1");
        assert_eq!(
            out,
            concat!(
                "--Boundary-mixed-1\r\n",
                "Content-Type: text/plain; name=\"hello.txt\"\r\n",
                "Content-Transfer-Encoding: base64\r\n",
                "Content-Disposition: attachment\r\n",
                "\r\n",
                "SGVsbG8sIFdvcmxkIQ==\r\n",
            )
        );
    }

    #[test]
    fn test_transfer_encoding_display() {
        assert_eq!(TransferEncoding::SevenBit.to_string(), "7bit");
        assert_eq!(TransferEncoding::Base64.to_string(), "base64");
    }
}
