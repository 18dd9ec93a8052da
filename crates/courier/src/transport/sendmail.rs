//! Delivery through a local `sendmail`-compatible binary.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use super::{Delivery, Transport, TransportError};
use crate::config::MailerConfig;

/// Default path of the sendmail binary.
pub const DEFAULT_SENDMAIL_PATH: &str = "/usr/sbin/sendmail";

/// Pipes rendered messages to a local MTA.
///
/// The MTA reads recipients from the message headers (`-t`), so only the
/// rendered message is written to its standard input.
#[derive(Debug, Clone)]
pub struct Sendmail {
    program: PathBuf,
    args: Vec<String>,
    default_sender: Option<String>,
}

impl Sendmail {
    /// Creates a transport for `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            default_sender: None,
        }
    }

    /// Creates a transport from configuration.
    #[must_use]
    pub fn from_config(config: &MailerConfig) -> Self {
        Self {
            program: config.sendmail_path.clone(),
            args: config.sendmail_args.clone(),
            default_sender: config.default_sender.clone(),
        }
    }

    /// Sets the program arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the envelope sender passed as `-f <sender>`.
    #[must_use]
    pub fn with_default_sender(mut self, sender: impl Into<String>) -> Self {
        self.default_sender = Some(sender.into());
        self
    }

    /// Returns the program path.
    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(sender) = &self.default_sender {
            command.arg("-f").arg(sender);
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());
        command
    }
}

impl Default for Sendmail {
    fn default() -> Self {
        Self::new(DEFAULT_SENDMAIL_PATH).with_args(["-t", "-i"])
    }
}

impl Transport for Sendmail {
    fn deliver(&self, delivery: &Delivery<'_>) -> Result<(), TransportError> {
        let message = delivery.render();
        debug!(
            program = %self.program.display(),
            bytes = message.len(),
            "Piping message to sendmail"
        );

        let mut child = self.command().spawn().map_err(TransportError::Spawn)?;

        // stdin is dropped after the write so the MTA sees EOF
        let written = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(message.as_bytes()));

        let status = child.wait().map_err(TransportError::Spawn)?;
        written.map_err(TransportError::Write)?;

        if status.success() {
            Ok(())
        } else {
            Err(status.code().map_or(TransportError::Terminated, TransportError::Exit))
        }
    }

    fn default_sender(&self) -> Option<&str> {
        self.default_sender.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn delivery() -> Delivery<'static> {
        Delivery {
            to: Some("r@example.com"),
            subject: Some("Hi"),
            body: "--Boundary-alt-1--\r\n",
            headers: "Content-Type: multipart/alternative; boundary=\"Boundary-alt-1\"\r\n\r\n",
        }
    }

    #[test]
    fn test_default_command() {
        let sendmail = Sendmail::default();
        assert_eq!(sendmail.program(), &PathBuf::from(DEFAULT_SENDMAIL_PATH));
        assert_eq!(sendmail.args, vec!["-t", "-i"]);
        assert_eq!(Transport::default_sender(&sendmail), None);
    }

    #[test]
    fn test_from_config() {
        let config = MailerConfig {
            sendmail_path: PathBuf::from("/opt/mta/bin/sendmail"),
            sendmail_args: vec!["-t".to_string()],
            default_sender: Some("noreply@example.com".to_string()),
            ..MailerConfig::default()
        };
        let sendmail = Sendmail::from_config(&config);
        assert_eq!(sendmail.program(), &PathBuf::from("/opt/mta/bin/sendmail"));
        assert_eq!(
            Transport::default_sender(&sendmail),
            Some("noreply@example.com")
        );
    }

    #[test]
    fn test_missing_program() {
        let sendmail = Sendmail::new("/nonexistent/courier-sendmail");
        let err = sendmail.deliver(&delivery()).unwrap_err();
        assert!(matches!(err, TransportError::Spawn(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_program() {
        let sendmail = Sendmail::new("sh").with_args(["-c", "cat > /dev/null"]);
        assert!(sendmail.deliver(&delivery()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program() {
        let sendmail = Sendmail::new("sh").with_args(["-c", "cat > /dev/null; exit 3"]);
        let err = sendmail.deliver(&delivery()).unwrap_err();
        assert!(matches!(err, TransportError::Exit(3)));
    }

    #[cfg(unix)]
    #[test]
    fn test_sender_flag_passed() {
        // sh -c '<script>' <argv0> -f <sender>: the script checks $1/$2
        let sendmail = Sendmail::new("sh")
            .with_args([
                "-c",
                "cat > /dev/null; [ \"$1\" = -f ] && [ \"$2\" = a@example.com ]",
                "sendmail",
            ])
            .with_default_sender("a@example.com");
        assert!(sendmail.deliver(&delivery()).is_ok());
    }
}
