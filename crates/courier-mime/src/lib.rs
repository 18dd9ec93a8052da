//! # courier-mime
//!
//! MIME formatting primitives for outgoing email.
//!
//! ## Features
//!
//! - **Addresses**: mailbox rendering with header-safe sanitization
//! - **Boundaries**: time-derived tokens with `Boundary-mixed-` / `Boundary-alt-` prefixes
//! - **Content types**: ordered, always-quoted parameters
//! - **Parts**: 7bit text parts and Base64 attachment parts
//! - **Encoding**: Base64 wrapped at 76 characters with CRLF line endings
//!
//! ## Quick Start
//!
//! ```ignore
//! use courier_mime::{Boundary, ContentType, EmailAddress, Part, format_address_list};
//!
//! let to = vec![
//!     EmailAddress::with_name("alice@example.com", "Alice"),
//!     EmailAddress::new("bob@example.com"),
//! ];
//! assert_eq!(
//!     format_address_list(&to).as_deref(),
//!     Some("\"Alice\" <alice@example.com>,bob@example.com")
//! );
//!
//! let boundary = Boundary::now();
//! let mut body = String::new();
//! Part::text(ContentType::text_plain("utf-8"), "Hello")
//!     .write_to(&mut body, &boundary.alternative());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod boundary;
mod content_type;
mod error;
mod header;
mod part;

pub mod encoding;

pub use address::{EmailAddress, format_address_list, sanitize_address, sanitize_display_name};
pub use boundary::{ALTERNATIVE_PREFIX, Boundary, MIXED_PREFIX, close_delimiter, open_delimiter};
pub use content_type::{ContentType, DEFAULT_CHARSET, sanitize_parameter_value};
pub use error::{Error, Result};
pub use header::{Headers, sanitize_header_value, write_header};
pub use part::{Part, TransferEncoding};
