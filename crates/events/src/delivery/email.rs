//! Notification delivery via SMTP.
//!
//! [`SmtpMailer`] wraps the blocking `lettre` SMTP transport and implements
//! [`MailTransport`]. Configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and the
//! host should fall back to [`LogTransport`](super::LogTransport).

use std::path::{Path, PathBuf};

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::transport::{MailTransport, OutgoingMail};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// An attachment could not be read from disk.
    #[error("Failed to read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The message has no recipients.
    #[error("Email has no recipients")]
    NoRecipients,
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@tidings.local";

/// MIME type used for every attachment.
const ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

/// Configuration for the SMTP transport.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// Default RFC 5322 "From" address, used when a notification sets none.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured.
    ///
    /// | Variable        | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | yes      | (none)                   |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `noreply@tidings.local`  |
    /// | `SMTP_USER`     | no       | (none)                   |
    /// | `SMTP_PASSWORD` | no       | (none)                   |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// SmtpMailer
// ---------------------------------------------------------------------------

/// Sends notification emails via SMTP.
pub struct SmtpMailer {
    config: EmailConfig,
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Build the SMTP transport. No connection is opened until the first send.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let mut builder =
            SmtpTransport::starttls_relay(&config.smtp_host)?.port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            config,
        })
    }

    /// Build and send a single message.
    pub fn deliver(&self, mail: &OutgoingMail) -> Result<(), EmailError> {
        let message = self.build_message(mail)?;
        self.transport.send(&message)?;
        Ok(())
    }

    /// Assemble the MIME message for `mail`.
    ///
    /// The body is sent as HTML when the content-type header says so and as
    /// plain text otherwise. Attachments turn the message into
    /// `multipart/mixed`.
    fn build_message(&self, mail: &OutgoingMail) -> Result<Message, EmailError> {
        if mail.to.is_empty() {
            return Err(EmailError::NoRecipients);
        }

        let from: Mailbox = mail
            .from_header()
            .unwrap_or(&self.config.from_address)
            .parse()?;

        let mut builder = Message::builder().from(from).subject(mail.subject.clone());
        for to in &mail.to {
            builder = builder.to(to.parse::<Mailbox>()?);
        }

        let body = if mail.is_html() {
            SinglePart::html(mail.body.clone())
        } else {
            SinglePart::plain(mail.body.clone())
        };

        let message = if mail.attachments.is_empty() {
            builder.singlepart(body)
        } else {
            let mut parts = MultiPart::mixed().singlepart(body);
            for path in &mail.attachments {
                parts = parts.singlepart(attachment_part(path)?);
            }
            builder.multipart(parts)
        };

        message.map_err(|e| EmailError::Build(e.to_string()))
    }
}

fn attachment_part(path: &Path) -> Result<SinglePart, EmailError> {
    let bytes = std::fs::read(path).map_err(|source| EmailError::Attachment {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    let content_type = ContentType::parse(ATTACHMENT_CONTENT_TYPE)
        .map_err(|e| EmailError::Build(e.to_string()))?;

    Ok(Attachment::new(filename).body(bytes, content_type))
}

impl MailTransport for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> bool {
        match self.deliver(mail) {
            Ok(()) => {
                tracing::info!(to = ?mail.to, subject = %mail.subject, "Notification email sent");
                true
            }
            Err(e) => {
                tracing::error!(
                    to = ?mail.to,
                    subject = %mail.subject,
                    error = %e,
                    "Failed to send notification email"
                );
                false
            }
        }
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("smtp_host", &self.config.smtp_host)
            .field("smtp_port", &self.config.smtp_port)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
