//! Mailer configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::transport::DEFAULT_SENDMAIL_PATH;
use crate::validator::is_valid_email;

/// Delivery environment settings.
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailerConfig {
    /// Path of the sendmail-compatible binary.
    pub sendmail_path: PathBuf,
    /// Arguments passed to the binary (default: `-t -i`).
    pub sendmail_args: Vec<String>,
    /// Sender address of the delivery environment. Also the last fallback
    /// for read-receipt notifications.
    pub default_sender: Option<String>,
    /// Charset declared on text and HTML parts.
    pub charset: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            sendmail_path: PathBuf::from(DEFAULT_SENDMAIL_PATH),
            sendmail_args: vec!["-t".to_string(), "-i".to_string()],
            default_sender: None,
            charset: courier_mime::DEFAULT_CHARSET.to_string(),
        }
    }
}

impl MailerConfig {
    /// Parses configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks the values that cannot be expressed in the type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.sendmail_path.as_os_str().is_empty() {
            return Err(Error::Config("sendmail_path must not be empty".into()));
        }
        if self.charset.trim().is_empty() {
            return Err(Error::Config("charset must not be empty".into()));
        }
        if let Some(sender) = &self.default_sender
            && !is_valid_email(sender)
        {
            return Err(Error::Config(format!(
                "default_sender is not a valid email address: {sender}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MailerConfig::from_json("{}").unwrap();
        assert_eq!(config, MailerConfig::default());
        assert_eq!(config.sendmail_path, PathBuf::from("/usr/sbin/sendmail"));
        assert_eq!(config.sendmail_args, vec!["-t", "-i"]);
        assert_eq!(config.charset, "iso-8859-1");
        assert!(config.default_sender.is_none());
    }

    #[test]
    fn test_partial_override() {
        let config = MailerConfig::from_json(
            r#"{ "default_sender": "noreply@example.com", "charset": "utf-8" }"#,
        )
        .unwrap();
        assert_eq!(config.default_sender.as_deref(), Some("noreply@example.com"));
        assert_eq!(config.charset, "utf-8");
        assert_eq!(config.sendmail_args, vec!["-t", "-i"]);
    }

    #[test]
    fn test_invalid_sender() {
        let err = MailerConfig::from_json(r#"{ "default_sender": "nobody" }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_charset() {
        let err = MailerConfig::from_json(r#"{ "charset": " " }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = MailerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "sendmail_path": "/usr/lib/sendmail" }}"#).unwrap();

        let config = MailerConfig::load(file.path()).unwrap();
        assert_eq!(config.sendmail_path, PathBuf::from("/usr/lib/sendmail"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MailerConfig::load(dir.path().join("mailer.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
