//! # courier
//!
//! Builds outgoing email messages and hands them to a transport.
//!
//! ## Features
//!
//! - **Fluent builder**: recipients, sender, reply-to, read receipts, subject,
//!   text and HTML bodies, priority, custom headers and attachments
//! - **MIME assembly**: `multipart/alternative` bodies, wrapped in
//!   `multipart/mixed` when files are attached, Base64 attachment parts
//! - **Pluggable collaborators**: [`Transport`], [`FileAccess`] and
//!   [`EmailValidator`]
//! - **Transports**: local [`Sendmail`] and in-memory [`MemoryTransport`]
//!
//! ## Quick Start
//!
//! ```ignore
//! use courier::{MailerConfig, MessageBuilder};
//!
//! let config = MailerConfig::load("/etc/courier/mailer.json")?;
//! let mut message = MessageBuilder::from_config(&config);
//!
//! message
//!     .to("alice@example.com", Some("Alice"))?
//!     .from("reports@example.com", None)?
//!     .subject("Monthly report")
//!     .text("The report is attached.")
//!     .attachment("report.pdf", None, None)?
//!     .priority(2)?;
//!
//! if message.send().fails() {
//!     eprintln!("delivery failed: {:?}", message.last_error());
//! }
//! ```
//!
//! ### Deferred configuration
//!
//! ```ignore
//! use courier::{MemoryTransport, MessageBuilder};
//!
//! let mut message = MessageBuilder::new(MemoryTransport::new());
//! message.send_with(|m| {
//!     m.subject("Built just in time").text("Hello");
//! });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod builder;
mod config;
mod error;
mod files;
mod priority;
pub mod transport;
mod validator;

pub use builder::{Attachment, MessageBuilder, SendOutcome};
pub use config::MailerConfig;
pub use error::{Error, Result};
pub use files::{FALLBACK_MIME_TYPE, FileAccess, FileRef, LocalFiles, detect_mime_type};
pub use priority::Priority;
pub use transport::{Delivered, Delivery, MemoryTransport, Sendmail, Transport, TransportError};
pub use validator::{BasicValidator, EmailValidator, is_valid_email};

pub use courier_mime::{Boundary, EmailAddress, Headers};
