//! Message transports.
//!
//! A [`Transport`] receives the formatted pieces of a message and is
//! responsible for handing them to a mail transfer agent.
//!
//! ## Key components
//!
//! - [`Transport`]: trait implemented by delivery backends
//! - [`Delivery`]: borrowed view of one formatted message
//! - [`Sendmail`]: pipes messages to a local `sendmail` binary
//! - [`MemoryTransport`]: records deliveries for tests and dry runs

mod memory;
mod sendmail;

use std::io;
use std::rc::Rc;

use courier_mime::{sanitize_header_value, write_header};

pub use memory::{Delivered, MemoryTransport};
pub use sendmail::{DEFAULT_SENDMAIL_PATH, Sendmail};

/// Errors reported by a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The delivery program could not be started or waited on.
    #[error("Failed to run delivery program: {0}")]
    Spawn(#[source] io::Error),

    /// Writing the message to the delivery program failed.
    #[error("Failed to write message: {0}")]
    Write(#[source] io::Error),

    /// The delivery program exited with a non-zero status.
    #[error("Delivery program exited with status {0}")]
    Exit(i32),

    /// The delivery program was terminated by a signal.
    #[error("Delivery program was terminated by a signal")]
    Terminated,

    /// The transport refused the message.
    #[error("Message rejected: {0}")]
    Rejected(String),
}

/// Formatted message handed to a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery<'a> {
    /// Primary recipients, already formatted as an address list.
    pub to: Option<&'a str>,
    /// Subject line.
    pub subject: Option<&'a str>,
    /// MIME body block.
    pub body: &'a str,
    /// Header block, CRLF-terminated lines.
    pub headers: &'a str,
}

impl Delivery<'_> {
    /// Renders the complete message as sent to an MTA.
    ///
    /// `To` and `Subject` come first, then the header block, a blank line
    /// (unless the header block already ends with one) and the body.
    /// Control characters in `To` and `Subject` are replaced with spaces.
    #[must_use]
    pub fn render(&self) -> String {
        let mut message = String::with_capacity(self.headers.len() + self.body.len() + 128);
        if let Some(to) = self.to {
            write_header(&mut message, "To", sanitize_header_value(to));
        }
        if let Some(subject) = self.subject {
            write_header(&mut message, "Subject", sanitize_header_value(subject));
        }
        message.push_str(self.headers);
        if !self.headers.ends_with("\r\n\r\n") {
            message.push_str("\r\n");
        }
        message.push_str(self.body);
        message
    }
}

/// Delivery backend.
pub trait Transport {
    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be handed over.
    fn deliver(&self, delivery: &Delivery<'_>) -> Result<(), TransportError>;

    /// Sender address configured for this transport, if any.
    fn default_sender(&self) -> Option<&str> {
        None
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn deliver(&self, delivery: &Delivery<'_>) -> Result<(), TransportError> {
        (**self).deliver(delivery)
    }

    fn default_sender(&self) -> Option<&str> {
        (**self).default_sender()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn deliver(&self, delivery: &Delivery<'_>) -> Result<(), TransportError> {
        (**self).deliver(delivery)
    }

    fn default_sender(&self) -> Option<&str> {
        (**self).default_sender()
    }
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    fn deliver(&self, delivery: &Delivery<'_>) -> Result<(), TransportError> {
        (**self).deliver(delivery)
    }

    fn default_sender(&self) -> Option<&str> {
        (**self).default_sender()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_alternative_headers() {
        let delivery = Delivery {
            to: Some("r@example.com"),
            subject: Some("Hi"),
            body: "BODY",
            headers: "Content-Type: multipart/alternative; boundary=\"Boundary-alt-1\"\r\n\r\n",
        };
        assert_eq!(
            delivery.render(),
            concat!(
                "To: r@example.com\r\n",
                "Subject: Hi\r\n",
                "Content-Type: multipart/alternative; boundary=\"Boundary-alt-1\"\r\n",
                "\r\n",
                "BODY",
            )
        );
    }

    #[test]
    fn test_render_mixed_headers() {
        let delivery = Delivery {
            to: None,
            subject: None,
            body: "BODY",
            headers: "Content-Type: multipart/mixed; boundary=\"Boundary-mixed-1\"\r\n",
        };
        assert_eq!(
            delivery.render(),
            "Content-Type: multipart/mixed; boundary=\"Boundary-mixed-1\"\r\n\r\nBODY"
        );
    }

    #[test]
    fn test_render_keeps_subject_and_to_on_one_line() {
        let delivery = Delivery {
            to: Some("r@example.com\nBcc: x@example.com"),
            subject: Some("Hi\r\nBcc: evil@attacker.example"),
            body: "BODY",
            headers: "Content-Type: multipart/alternative; boundary=\"Boundary-alt-1\"\r\n\r\n",
        };
        let rendered = delivery.render();
        let lines: Vec<&str> = rendered.split("\r\n").collect();
        assert_eq!(lines[0], "To: r@example.com Bcc: x@example.com");
        assert_eq!(lines[1], "Subject: Hi  Bcc: evil@attacker.example");
        assert!(!rendered.contains("\nBcc:"));
    }

    #[test]
    fn test_exit_error_message() {
        assert_eq!(
            TransportError::Exit(75).to_string(),
            "Delivery program exited with status 75"
        );
    }
}
