//! In-memory transport.

use std::cell::RefCell;

use super::{Delivery, Transport, TransportError};

/// Owned copy of a delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    /// Formatted primary recipients.
    pub to: Option<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// MIME body block.
    pub body: String,
    /// Header block.
    pub headers: String,
}

impl From<&Delivery<'_>> for Delivered {
    fn from(delivery: &Delivery<'_>) -> Self {
        Self {
            to: delivery.to.map(ToString::to_string),
            subject: delivery.subject.map(ToString::to_string),
            body: delivery.body.to_string(),
            headers: delivery.headers.to_string(),
        }
    }
}

/// Transport that keeps delivered messages in memory.
///
/// Can be switched to reject every delivery with [`reject_with`](Self::reject_with).
#[derive(Debug, Default)]
pub struct MemoryTransport {
    delivered: RefCell<Vec<Delivered>>,
    rejection: RefCell<Option<String>>,
    default_sender: Option<String>,
}

impl MemoryTransport {
    /// Creates an empty transport that accepts every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default sender reported to the builder.
    #[must_use]
    pub fn with_default_sender(mut self, sender: impl Into<String>) -> Self {
        self.default_sender = Some(sender.into());
        self
    }

    /// Rejects subsequent deliveries with `reason`.
    pub fn reject_with(&self, reason: impl Into<String>) {
        *self.rejection.borrow_mut() = Some(reason.into());
    }

    /// Accepts subsequent deliveries.
    pub fn accept(&self) {
        *self.rejection.borrow_mut() = None;
    }

    /// Returns all accepted messages in delivery order.
    #[must_use]
    pub fn delivered(&self) -> Vec<Delivered> {
        self.delivered.borrow().clone()
    }

    /// Returns the most recently accepted message.
    #[must_use]
    pub fn last(&self) -> Option<Delivered> {
        self.delivered.borrow().last().cloned()
    }

    /// Returns the number of accepted messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.delivered.borrow().len()
    }

    /// Returns true if no message was accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delivered.borrow().is_empty()
    }
}

impl Transport for MemoryTransport {
    fn deliver(&self, delivery: &Delivery<'_>) -> Result<(), TransportError> {
        if let Some(reason) = self.rejection.borrow().as_ref() {
            return Err(TransportError::Rejected(reason.clone()));
        }
        self.delivered.borrow_mut().push(Delivered::from(delivery));
        Ok(())
    }

    fn default_sender(&self) -> Option<&str> {
        self.default_sender.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DELIVERY: Delivery<'static> = Delivery {
        to: Some("r@example.com"),
        subject: Some("Hi"),
        body: "body",
        headers: "headers",
    };

    #[test]
    fn test_records_deliveries() {
        let transport = MemoryTransport::new();
        transport.deliver(&DELIVERY).unwrap();
        transport.deliver(&DELIVERY).unwrap();

        assert_eq!(transport.len(), 2);
        let last = transport.last().unwrap();
        assert_eq!(last.to.as_deref(), Some("r@example.com"));
        assert_eq!(last.subject.as_deref(), Some("Hi"));
        assert_eq!(last.body, "body");
    }

    #[test]
    fn test_reject_and_accept() {
        let transport = MemoryTransport::new();
        transport.reject_with("mailbox full");
        let err = transport.deliver(&DELIVERY).unwrap_err();
        assert_eq!(err.to_string(), "Message rejected: mailbox full");
        assert!(transport.is_empty());

        transport.accept();
        assert!(transport.deliver(&DELIVERY).is_ok());
        assert_eq!(transport.len(), 1);
    }

    #[test]
    fn test_default_sender() {
        let transport = MemoryTransport::new().with_default_sender("postmaster@example.com");
        assert_eq!(transport.default_sender(), Some("postmaster@example.com"));
        assert_eq!(MemoryTransport::new().default_sender(), None);
    }
}
