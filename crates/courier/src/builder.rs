//! Fluent message builder.
//!
//! [`MessageBuilder`] accumulates recipients, content, priority, custom
//! headers and attachments, then formats them into a header block and a MIME
//! body block and hands both to a [`Transport`].
//!
//! Body layout without attachments:
//!
//! ```text
//! multipart/alternative (Boundary-alt-<token>)
//! ├── text/plain
//! └── text/html
//! ```
//!
//! With attachments the alternative section is nested in an outer
//! `multipart/mixed` (Boundary-mixed-<token>) followed by one Base64 part per
//! file.

use std::cell::OnceCell;
use std::fmt;
use std::iter;
use std::path::Path;

use courier_mime::{
    Boundary, ContentType, DEFAULT_CHARSET, EmailAddress, Headers, Part, close_delimiter,
    format_address_list, open_delimiter, write_header,
};
use tracing::{debug, warn};

use crate::config::MailerConfig;
use crate::error::{Error, Result};
use crate::files::{FileAccess, FileRef, LocalFiles};
use crate::priority::Priority;
use crate::transport::{Delivery, Sendmail, Transport};
use crate::validator::{BasicValidator, EmailValidator};

/// A file queued for attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    file: FileRef,
    name: String,
    mime_type: String,
}

impl Attachment {
    /// The resolved file.
    #[must_use]
    pub const fn file(&self) -> &FileRef {
        &self.file
    }

    /// Name announced in the Content-Type `name` parameter.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME type of the part.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

/// Result of the most recent [`MessageBuilder::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendOutcome {
    /// `send` has not been called.
    #[default]
    Pending,
    /// The transport accepted the message.
    Sent,
    /// Formatting or delivery failed.
    Failed,
}

/// Builder for one outgoing message.
///
/// Address mutators validate their input and return `Result<&mut Self>`;
/// the others return `&mut Self`. A failed call leaves the builder unchanged.
///
/// The boundary token is generated on first use and kept for the lifetime
/// of the builder, so sending twice reuses it.
pub struct MessageBuilder<T> {
    transport: T,
    validator: Box<dyn EmailValidator>,
    files: Box<dyn FileAccess>,

    to: Vec<EmailAddress>,
    cc: Vec<EmailAddress>,
    bcc: Vec<EmailAddress>,
    from: Option<EmailAddress>,
    reply_to: Option<EmailAddress>,
    notify: Option<EmailAddress>,
    priority: Option<Priority>,
    custom: Headers,
    attachments: Vec<Attachment>,

    subject: Option<String>,
    text: Option<String>,
    html: Option<String>,
    charset: String,

    boundary: OnceCell<Boundary>,
    outcome: SendOutcome,
    last_error: Option<Error>,
}

impl MessageBuilder<Sendmail> {
    /// Creates a sendmail-backed builder from configuration.
    #[must_use]
    pub fn from_config(config: &MailerConfig) -> Self {
        let mut builder = Self::new(Sendmail::from_config(config));
        builder.charset.clone_from(&config.charset);
        builder
    }
}

impl<T: Transport> MessageBuilder<T> {
    /// Creates an empty builder delivering through `transport`.
    ///
    /// Uses [`BasicValidator`] and [`LocalFiles`] until replaced.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            validator: Box::new(BasicValidator),
            files: Box::new(LocalFiles),
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            from: None,
            reply_to: None,
            notify: None,
            priority: None,
            custom: Headers::new(),
            attachments: Vec::new(),
            subject: None,
            text: None,
            html: None,
            charset: DEFAULT_CHARSET.to_string(),
            boundary: OnceCell::new(),
            outcome: SendOutcome::Pending,
            last_error: None,
        }
    }

    /// Replaces the email validity check.
    #[must_use]
    pub fn with_validator(mut self, validator: impl EmailValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Replaces the attachment file source.
    #[must_use]
    pub fn with_file_access(mut self, files: impl FileAccess + 'static) -> Self {
        self.files = Box::new(files);
        self
    }

    /// Returns the transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    // Recipients and senders

    /// Adds a primary recipient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `email` fails validation.
    pub fn to(&mut self, email: &str, name: Option<&str>) -> Result<&mut Self> {
        let address = self.checked_address("to", email, name)?;
        self.to.push(address);
        Ok(self)
    }

    /// Adds a carbon-copy recipient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `email` fails validation.
    pub fn cc(&mut self, email: &str, name: Option<&str>) -> Result<&mut Self> {
        let address = self.checked_address("cc", email, name)?;
        self.cc.push(address);
        Ok(self)
    }

    /// Adds a blind carbon-copy recipient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `email` fails validation.
    pub fn bcc(&mut self, email: &str, name: Option<&str>) -> Result<&mut Self> {
        let address = self.checked_address("bcc", email, name)?;
        self.bcc.push(address);
        Ok(self)
    }

    /// Sets the sender, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `email` fails validation.
    pub fn from(&mut self, email: &str, name: Option<&str>) -> Result<&mut Self> {
        self.from = Some(self.checked_address("from", email, name)?);
        Ok(self)
    }

    /// Sets the Reply-To address, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `email` fails validation.
    pub fn reply(&mut self, email: &str, name: Option<&str>) -> Result<&mut Self> {
        self.reply_to = Some(self.checked_address("reply", email, name)?);
        Ok(self)
    }

    /// Requests a read receipt, replacing any previous request.
    ///
    /// With `None` the receipt goes to the sender, or to the transport's
    /// default sender when no sender is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `email` is given and fails
    /// validation.
    pub fn notify(&mut self, email: Option<&str>, name: Option<&str>) -> Result<&mut Self> {
        let address = match email {
            Some(email) => self.checked_address("notify", email, name)?,
            None => EmailAddress::from_parts("", name),
        };
        self.notify = Some(address);
        Ok(self)
    }

    fn checked_address(
        &self,
        operation: &'static str,
        email: &str,
        name: Option<&str>,
    ) -> Result<EmailAddress> {
        if !self.validator.is_valid(email) {
            return Err(Error::InvalidAddress {
                operation,
                parameter: "email",
                value: email.to_string(),
            });
        }
        Ok(EmailAddress::from_parts(email, name))
    }

    // Content

    /// Sets the subject.
    pub fn subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the plain-text body.
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the HTML body.
    pub fn html(&mut self, html: impl Into<String>) -> &mut Self {
        self.html = Some(html.into());
        self
    }

    /// Sets the charset declared on text and HTML parts.
    pub fn charset(&mut self, charset: impl Into<String>) -> &mut Self {
        self.charset = charset.into();
        self
    }

    /// Sets the priority from a numeric level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPriority`] unless `level` is within 1-5.
    pub fn priority(&mut self, level: i64) -> Result<&mut Self> {
        let priority = Priority::try_from(level).map_err(|level| Error::InvalidPriority {
            operation: "priority",
            level,
        })?;
        self.priority = Some(priority);
        Ok(self)
    }

    /// Sets the priority.
    pub const fn priority_value(&mut self, priority: Priority) -> &mut Self {
        self.priority = Some(priority);
        self
    }

    /// Adds a custom header. Re-adding a name replaces its value in place.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.custom.set(name, value);
        self
    }

    /// Removes a custom header.
    pub fn remove_header(&mut self, name: &str) -> &mut Self {
        self.custom.remove(name);
        self
    }

    /// Attaches a file.
    ///
    /// `name` defaults to the file's basename and `mime` to its detected
    /// MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnreadableFile`] if the file cannot be opened.
    pub fn attachment(
        &mut self,
        path: impl AsRef<Path>,
        name: Option<&str>,
        mime: Option<&str>,
    ) -> Result<&mut Self> {
        let path = path.as_ref();
        let file = self
            .files
            .open(path)
            .map_err(|source| Error::UnreadableFile {
                operation: "attachment",
                path: path.to_path_buf(),
                source,
            })?;

        let name = name.map_or_else(|| file.basename().to_string(), ToString::to_string);
        let mime_type = mime.map_or_else(|| file.mime_type().to_string(), ToString::to_string);
        debug!(
            path = %path.display(),
            name = %name,
            mime = %mime_type,
            size = file.size(),
            "Attachment added"
        );

        self.attachments.push(Attachment {
            file,
            name,
            mime_type,
        });
        Ok(self)
    }

    /// Pins the boundary token instead of deriving it from the clock.
    pub fn with_boundary(&mut self, token: impl Into<String>) -> &mut Self {
        self.boundary = OnceCell::from(Boundary::new(token));
        self
    }

    // Accessors

    /// Primary recipients in insertion order.
    #[must_use]
    pub fn to_addresses(&self) -> &[EmailAddress] {
        &self.to
    }

    /// Carbon-copy recipients in insertion order.
    #[must_use]
    pub fn cc_addresses(&self) -> &[EmailAddress] {
        &self.cc
    }

    /// Blind carbon-copy recipients in insertion order.
    #[must_use]
    pub fn bcc_addresses(&self) -> &[EmailAddress] {
        &self.bcc
    }

    /// Sender.
    #[must_use]
    pub const fn from_address(&self) -> Option<&EmailAddress> {
        self.from.as_ref()
    }

    /// Reply-To address.
    #[must_use]
    pub const fn reply_to_address(&self) -> Option<&EmailAddress> {
        self.reply_to.as_ref()
    }

    /// Read-receipt address as requested (may be empty).
    #[must_use]
    pub const fn notify_address(&self) -> Option<&EmailAddress> {
        self.notify.as_ref()
    }

    /// Subject.
    #[must_use]
    pub fn subject_line(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Plain-text body.
    #[must_use]
    pub fn text_body(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// HTML body.
    #[must_use]
    pub fn html_body(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// Priority, if set.
    #[must_use]
    pub const fn priority_level(&self) -> Option<Priority> {
        self.priority
    }

    /// Custom headers in insertion order.
    #[must_use]
    pub const fn custom_headers(&self) -> &Headers {
        &self.custom
    }

    /// Queued attachments in insertion order.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Boundary of this message, generated on first call.
    #[must_use]
    pub fn boundary(&self) -> &Boundary {
        self.boundary.get_or_init(Boundary::now)
    }

    // Formatting

    /// Formats the primary recipients passed to the transport.
    #[must_use]
    pub fn format_to(&self) -> Option<String> {
        format_address_list(&self.to)
    }

    /// Resolves the read-receipt address.
    ///
    /// Returns `None` when no receipt was requested. Otherwise falls back
    /// from the requested address to the sender, then to the transport's
    /// default sender.
    #[must_use]
    pub fn format_notify(&self) -> Option<String> {
        let notify = self.notify.as_ref()?;
        format_address_list(iter::once(notify))
            .or_else(|| format_address_list(&self.from))
            .or_else(|| {
                self.transport
                    .default_sender()
                    .filter(|sender| !sender.trim().is_empty())
                    .map(ToString::to_string)
            })
    }

    /// Formats the header block.
    ///
    /// Ends with the top-level Content-Type line. Without attachments a
    /// blank line follows it.
    #[must_use]
    pub fn format_headers(&self) -> String {
        let mut out = String::new();

        let lists = [
            ("Bcc", format_address_list(&self.bcc)),
            ("Cc", format_address_list(&self.cc)),
            ("Reply-To", format_address_list(&self.reply_to)),
            ("From", format_address_list(&self.from)),
        ];
        for (label, value) in lists {
            if let Some(value) = value {
                write_header(&mut out, label, value);
            }
        }

        if let Some(notify) = self.format_notify() {
            write_header(&mut out, "Disposition-Notification-To", &notify);
            write_header(&mut out, "X-Confirm-Reading-To", &notify);
        }

        if let Some(priority) = self.priority {
            for (name, value) in priority.headers() {
                write_header(&mut out, name, value);
            }
        }

        out.push_str(&self.custom.to_string());

        let boundary = self.boundary();
        if self.attachments.is_empty() {
            write_header(&mut out, "Content-Type", ContentType::multipart_alternative(boundary));
            out.push_str("\r\n");
        } else {
            write_header(&mut out, "Content-Type", ContentType::multipart_mixed(boundary));
        }

        out
    }

    /// Formats the MIME body block.
    ///
    /// Attachment files are read here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnreadableFile`] if an attachment can no longer be
    /// read.
    pub fn format_message(&self) -> Result<String> {
        let boundary = self.boundary();
        let alternative = boundary.alternative();
        let mixed = boundary.mixed();
        let mut out = String::new();

        if !self.attachments.is_empty() {
            out.push_str(&open_delimiter(&mixed));
            write_header(&mut out, "Content-Type", ContentType::multipart_alternative(boundary));
            out.push_str("\r\n");
        }

        if let Some(text) = &self.text {
            Part::text(ContentType::text_plain(&self.charset), text)
                .write_to(&mut out, &alternative);
        }
        if let Some(html) = &self.html {
            Part::text(ContentType::text_html(&self.charset), html)
                .write_to(&mut out, &alternative);
        }
        out.push_str(&close_delimiter(&alternative));

        if !self.attachments.is_empty() {
            for attachment in &self.attachments {
                let content = self
                    .files
                    .read_all(&attachment.file)
                    .map_err(|source| Error::UnreadableFile {
                        operation: "format_message",
                        path: attachment.file.path().to_path_buf(),
                        source,
                    })?;
                Part::attachment(&attachment.mime_type, &attachment.name, &content)
                    .write_to(&mut out, &mixed);
            }
            out.push_str(&close_delimiter(&mixed));
        }

        Ok(out)
    }

    // Delivery

    /// Formats and delivers the message.
    ///
    /// Failures are not returned; check [`success`](Self::success) or
    /// [`fails`](Self::fails) afterwards.
    pub fn send(&mut self) -> &mut Self {
        let result = self.format_and_deliver();
        self.record(result)
    }

    /// Runs `prepare` on the builder, then formats and delivers the message.
    pub fn send_with<F>(&mut self, prepare: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        prepare(self);
        self.send()
    }

    fn format_and_deliver(&self) -> Result<()> {
        let to = self.format_to();
        let headers = self.format_headers();
        let body = self.format_message()?;

        debug!(
            has_to = to.is_some(),
            attachments = self.attachments.len(),
            body_bytes = body.len(),
            "Delivering message"
        );

        self.transport.deliver(&Delivery {
            to: to.as_deref(),
            subject: self.subject.as_deref(),
            body: &body,
            headers: &headers,
        })?;
        Ok(())
    }

    fn record(&mut self, result: Result<()>) -> &mut Self {
        match result {
            Ok(()) => {
                debug!("Message delivered");
                self.outcome = SendOutcome::Sent;
                self.last_error = None;
            }
            Err(e) => {
                warn!(error = %e, "Message delivery failed");
                self.outcome = SendOutcome::Failed;
                self.last_error = Some(e);
            }
        }
        self
    }

    /// Returns true if the last `send` was accepted by the transport.
    #[must_use]
    pub fn success(&self) -> bool {
        self.outcome == SendOutcome::Sent
    }

    /// Returns true unless the last `send` succeeded.
    #[must_use]
    pub fn fails(&self) -> bool {
        !self.success()
    }

    /// Outcome of the last `send`.
    #[must_use]
    pub const fn outcome(&self) -> SendOutcome {
        self.outcome
    }

    /// Error of the last failed `send`, cleared by a successful one.
    #[must_use]
    pub const fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }
}

impl<T: fmt::Debug> fmt::Debug for MessageBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBuilder")
            .field("transport", &self.transport)
            .field("to", &self.to)
            .field("cc", &self.cc)
            .field("bcc", &self.bcc)
            .field("from", &self.from)
            .field("reply_to", &self.reply_to)
            .field("notify", &self.notify)
            .field("priority", &self.priority)
            .field("custom", &self.custom)
            .field("attachments", &self.attachments)
            .field("subject", &self.subject)
            .field("charset", &self.charset)
            .field("boundary", &self.boundary.get())
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
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
    use crate::transport::MemoryTransport;
    use std::collections::HashMap;
    use std::io;

    /// File source backed by a map of path to content.
    #[derive(Default)]
    struct FakeFiles(HashMap<String, Vec<u8>>);

    impl FakeFiles {
        fn with(mut self, path: &str, content: &[u8]) -> Self {
            self.0.insert(path.to_string(), content.to_vec());
            self
        }
    }

    impl FileAccess for FakeFiles {
        fn open(&self, path: &Path) -> io::Result<FileRef> {
            let key = path.to_string_lossy();
            let content = self
                .0
                .get(key.as_ref())
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
            let basename = path.file_name().unwrap().to_string_lossy().into_owned();
            Ok(FileRef::new(
                path,
                basename,
                crate::files::detect_mime_type(path),
                content.len() as u64,
            ))
        }

        fn read_all(&self, file: &FileRef) -> io::Result<Vec<u8>> {
            self.0
                .get(file.path().to_string_lossy().as_ref())
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    fn builder() -> MessageBuilder<MemoryTransport> {
        let mut builder = MessageBuilder::new(MemoryTransport::new());
        builder.with_boundary("b1");
        builder
    }

    #[test]
    fn test_to_appends_in_order() {
        let mut message = builder();
        message
            .to("a@x.com", None)
            .unwrap()
            .to("b@x.com", Some("Bee"))
            .unwrap();

        let addresses: Vec<_> = message.to_addresses().iter().map(EmailAddress::address).collect();
        assert_eq!(addresses, vec!["a@x.com", "b@x.com"]);
        assert_eq!(message.format_to().as_deref(), Some("a@x.com,\"Bee\" <b@x.com>"));
    }

    #[test]
    fn test_cc_bcc_append_in_order() {
        let mut message = builder();
        message
            .cc("a@x.com", None)
            .unwrap()
            .bcc("c@x.com", None)
            .unwrap()
            .cc("b@x.com", Some("Bee"))
            .unwrap()
            .bcc("d@x.com", None)
            .unwrap();

        let headers = message.format_headers();
        assert!(headers.starts_with(concat!(
            "Bcc: c@x.com,d@x.com\r\n",
            "Cc: a@x.com,\"Bee\" <b@x.com>\r\n",
        )));
    }

    #[test]
    fn test_from_replaces() {
        let mut message = builder();
        message.from("a@x.com", Some("A")).unwrap();
        message.from("b@x.com", Some("B")).unwrap();

        let headers = message.format_headers();
        assert!(headers.contains("From: \"B\" <b@x.com>\r\n"));
        assert!(!headers.contains("a@x.com"));
    }

    #[test]
    fn test_reply_replaces() {
        let mut message = builder();
        message.reply("a@x.com", None).unwrap();
        message.reply("b@x.com", None).unwrap();
        assert_eq!(message.reply_to_address().unwrap().address(), "b@x.com");
    }

    #[test]
    fn test_invalid_address_leaves_state_unchanged() {
        let mut message = builder();
        message.cc("ok@x.com", None).unwrap();

        let err = message.cc("not-an-address", None).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(matches!(
            err,
            Error::InvalidAddress {
                operation: "cc",
                parameter: "email",
                ..
            }
        ));
        assert_eq!(message.cc_addresses().len(), 1);

        message.from("ok@x.com", None).unwrap();
        assert!(message.from("bad", None).is_err());
        assert_eq!(message.from_address().unwrap().address(), "ok@x.com");
    }

    #[test]
    fn test_notify_unset() {
        let mut message = builder();
        message.from("me@x.com", None).unwrap();
        assert_eq!(message.format_notify(), None);
        assert!(!message.format_headers().contains("Disposition-Notification-To"));
    }

    #[test]
    fn test_notify_explicit() {
        let mut message = builder();
        message.from("me@x.com", None).unwrap();
        message.notify(Some("receipts@x.com"), None).unwrap();
        assert_eq!(message.format_notify().as_deref(), Some("receipts@x.com"));
    }

    #[test]
    fn test_notify_falls_back_to_from() {
        let mut message = builder();
        message.from("me@x.com", Some("Me")).unwrap();
        message.notify(None, None).unwrap();
        assert_eq!(message.format_notify().as_deref(), Some("\"Me\" <me@x.com>"));

        message.notify(None, Some("Receipts")).unwrap();
        assert_eq!(message.format_notify().as_deref(), Some("\"Me\" <me@x.com>"));
    }

    #[test]
    fn test_notify_empty_after_sanitizing_falls_back_to_from() {
        let mut message = builder().with_validator(|_: &str| true);
        message.from("me@x.com", None).unwrap();
        message.notify(Some("<>"), None).unwrap();
        assert_eq!(message.format_notify().as_deref(), Some("me@x.com"));
    }

    #[test]
    fn test_notify_falls_back_to_default_sender() {
        let mut message = MessageBuilder::new(
            MemoryTransport::new().with_default_sender("postmaster@x.com"),
        );
        message.notify(None, None).unwrap();
        assert_eq!(message.format_notify().as_deref(), Some("postmaster@x.com"));
    }

    #[test]
    fn test_notify_without_any_fallback() {
        let mut message = builder();
        message.notify(None, None).unwrap();
        assert_eq!(message.format_notify(), None);
    }

    #[test]
    fn test_notify_replaces() {
        let mut message = builder();
        message.notify(Some("first@x.com"), None).unwrap();
        message.notify(Some("second@x.com"), Some("Second")).unwrap();

        let headers = message.format_headers();
        assert!(headers.contains(concat!(
            "Disposition-Notification-To: \"Second\" <second@x.com>\r\n",
            "X-Confirm-Reading-To: \"Second\" <second@x.com>\r\n",
        )));
        assert!(!headers.contains("first@x.com"));
    }

    #[test]
    fn test_notify_invalid() {
        let mut message = builder();
        let err = message.notify(Some("nope"), None).unwrap_err();
        assert!(matches!(err, Error::InvalidAddress { operation: "notify", .. }));
        assert!(message.notify_address().is_none());
    }

    #[test]
    fn test_priority_range() {
        let mut message = builder();
        for level in [0, 6] {
            let err = message.priority(level).unwrap_err();
            assert!(err.is_invalid_argument());
            assert!(matches!(err, Error::InvalidPriority { level: l, .. } if l == level));
        }
        assert!(message.priority_level().is_none());

        message.priority(1).unwrap();
        assert_eq!(message.priority_level(), Some(Priority::Highest));
    }

    #[test]
    fn test_priority_headers() {
        let mut message = builder();
        message.priority(4).unwrap();
        assert!(message.format_headers().contains(concat!(
            "X-Priority: 4 (Low)\r\n",
            "X-MSMail-Priority: Low\r\n",
            "Importance: Low\r\n",
        )));
    }

    #[test]
    fn test_custom_headers() {
        let mut message = builder();
        message
            .add_header("X-Mailer", "courier")
            .add_header("X-Campaign", "spring")
            .add_header("X-Mailer", "courier/2");
        message.remove_header("X-Missing");
        assert_eq!(message.custom_headers().len(), 2);

        let headers = message.format_headers();
        assert!(headers.contains("X-Mailer: courier/2\r\nX-Campaign: spring\r\n"));

        message.remove_header("X-Mailer");
        assert!(!message.format_headers().contains("X-Mailer"));
    }

    #[test]
    fn test_headers_full_order_without_attachments() {
        let mut message = builder();
        message
            .to("to@x.com", None)
            .unwrap()
            .cc("cc@x.com", None)
            .unwrap()
            .bcc("bcc@x.com", None)
            .unwrap()
            .reply("reply@x.com", None)
            .unwrap()
            .from("from@x.com", Some("Sender"))
            .unwrap()
            .notify(Some("read@x.com"), None)
            .unwrap()
            .priority(3)
            .unwrap()
            .add_header("X-Custom", "1");

        assert_eq!(
            message.format_headers(),
            concat!(
                "Bcc: bcc@x.com\r\n",
                "Cc: cc@x.com\r\n",
                "Reply-To: reply@x.com\r\n",
                "From: \"Sender\" <from@x.com>\r\n",
                "Disposition-Notification-To: read@x.com\r\n",
                "X-Confirm-Reading-To: read@x.com\r\n",
                "X-Priority: 3 (Normal)\r\n",
                "X-MSMail-Priority: Normal\r\n",
                "Importance: Normal\r\n",
                "X-Custom: 1\r\n",
                "Content-Type: multipart/alternative; boundary=\"Boundary-alt-b1\"\r\n",
                "\r\n",
            )
        );
    }

    #[test]
    fn test_headers_with_attachment() {
        let mut message = builder().with_file_access(FakeFiles::default().with("/a.txt", b"x"));
        message.attachment("/a.txt", None, None).unwrap();

        let headers = message.format_headers();
        assert!(headers.ends_with(
            "Content-Type: multipart/mixed; boundary=\"Boundary-mixed-b1\"\r\n"
        ));
        assert!(!headers.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_message_text_only() {
        let mut message = builder();
        message.text("Hello");

        assert_eq!(
            message.format_message().unwrap(),
            concat!(
                "--Boundary-alt-b1\r\n",
                "Content-Type: text/plain; charset=\"iso-8859-1\"\r\n",
                "Content-Transfer-Encoding: 7bit\r\n",
                "\r\n",
                "Hello\r\n",
                "\r\n",
                "--Boundary-alt-b1--\r\n",
            )
        );
    }

    #[test]
    fn test_message_text_and_html() {
        let mut message = builder();
        message.html("<p>Hi</p>").text("Hi").charset("utf-8");

        let body = message.format_message().unwrap();
        let text_at = body.find("Content-Type: text/plain; charset=\"utf-8\"").unwrap();
        let html_at = body.find("Content-Type: text/html; charset=\"utf-8\"").unwrap();
        assert!(text_at < html_at);
        assert_eq!(body.matches("--Boundary-alt-b1\r\n").count(), 2);
        assert!(body.ends_with("<p>Hi</p>\r\n\r\n--Boundary-alt-b1--\r\n"));
        assert!(!body.contains("Boundary-mixed"));
    }

    #[test]
    fn test_message_empty_body() {
        let message = builder();
        assert_eq!(message.format_message().unwrap(), "--Boundary-alt-b1--\r\n");
    }

    #[test]
    fn test_text_replaces() {
        let mut message = builder();
        message.text("one").text("two");
        assert_eq!(message.text_body(), Some("two"));
    }

    #[test]
    fn test_message_with_attachment() {
        let files = FakeFiles::default().with("/docs/hello.txt", b"Hello, World!");
        let mut message = builder().with_file_access(files);
        message
            .text("See attached")
            .attachment("/docs/hello.txt", None, None)
            .unwrap();

        assert_eq!(
            message.format_message().unwrap(),
            concat!(
                "--Boundary-mixed-b1\r\n",
                "Content-Type: multipart/alternative; boundary=\"Boundary-alt-b1\"\r\n",
                "\r\n",
                "--Boundary-alt-b1\r\n",
                "Content-Type: text/plain; charset=\"iso-8859-1\"\r\n",
                "Content-Transfer-Encoding: 7bit\r\n",
                "\r\n",
                "See attached\r\n",
                "\r\n",
                "--Boundary-alt-b1--\r\n",
                "--Boundary-mixed-b1\r\n",
                "Content-Type: text/plain; name=\"hello.txt\"\r\n",
                "Content-Transfer-Encoding: base64\r\n",
                "Content-Disposition: attachment\r\n",
                "\r\n",
                "SGVsbG8sIFdvcmxkIQ==\r\n",
                "--Boundary-mixed-b1--\r\n",
            )
        );
    }

    #[test]
    fn test_attachment_overrides() {
        let files = FakeFiles::default().with("/tmp/blob", b"data");
        let mut message = builder().with_file_access(files);
        message
            .attachment("/tmp/blob", Some("report.pdf"), Some("application/pdf"))
            .unwrap();

        let attachment = &message.attachments()[0];
        assert_eq!(attachment.name(), "report.pdf");
        assert_eq!(attachment.mime_type(), "application/pdf");
        assert!(message
            .format_message()
            .unwrap()
            .contains("Content-Type: application/pdf; name=\"report.pdf\"\r\n"));
    }

    #[test]
    fn test_attachment_name_stays_in_its_parameter() {
        let files = FakeFiles::default().with("/tmp/blob", b"data");
        let mut message = builder().with_file_access(files);
        message
            .attachment("/tmp/blob", Some("a\"\r\nContent-Type: text/html"), None)
            .unwrap();

        let body = message.format_message().unwrap();
        assert!(body.contains(
            "Content-Type: application/octet-stream; name=\"aContent-Type: text/html\"\r\n"
        ));
        assert!(!body.contains("\r\nContent-Type: text/html"));
    }

    #[test]
    fn test_attachment_unreadable() {
        let mut message = builder().with_file_access(FakeFiles::default());
        let err = message.attachment("/missing.pdf", None, None).unwrap_err();
        assert!(err.is_runtime());
        assert!(matches!(
            err,
            Error::UnreadableFile {
                operation: "attachment",
                ..
            }
        ));
        assert!(message.attachments().is_empty());
    }

    #[test]
    fn test_boundary_cached() {
        let message = MessageBuilder::new(MemoryTransport::new());
        let first = message.boundary().clone();
        assert_eq!(message.boundary(), &first);
        assert!(message.format_headers().contains(&first.alternative()));
        assert!(message.format_message().unwrap().contains(&first.alternative()));
    }

    #[test]
    fn test_send_records_success() {
        let mut message = builder();
        assert_eq!(message.outcome(), SendOutcome::Pending);
        assert!(!message.success());

        message.to("r@x.com", None).unwrap().subject("Hi").text("Hello");
        assert!(message.send().success());
        assert!(!message.fails());
        assert!(message.last_error().is_none());

        let delivered = message.transport().last().unwrap();
        assert_eq!(delivered.to.as_deref(), Some("r@x.com"));
        assert_eq!(delivered.subject.as_deref(), Some("Hi"));
        assert_eq!(delivered.headers, message.format_headers());
    }

    #[test]
    fn test_send_swallows_transport_failure() {
        let mut message = builder();
        message.transport().reject_with("relay denied");
        message.text("Hello");

        assert!(message.send().fails());
        assert_eq!(message.outcome(), SendOutcome::Failed);
        assert!(matches!(message.last_error(), Some(Error::Transport(_))));

        message.transport().accept();
        assert!(message.send().success());
        assert!(message.last_error().is_none());
    }

    #[test]
    fn test_send_with_prepares_first() {
        let mut message = builder();
        message.send_with(|m| {
            m.subject("Deferred").text("Built late");
        });

        assert!(message.success());
        let delivered = message.transport().last().unwrap();
        assert_eq!(delivered.subject.as_deref(), Some("Deferred"));
        assert!(delivered.body.contains("Built late"));
        assert_eq!(delivered.to, None);
    }
}
