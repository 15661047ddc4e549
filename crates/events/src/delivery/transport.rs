use std::fmt;
use std::path::PathBuf;

/// Content type sent for rich (HTML) bodies.
pub const CONTENT_TYPE_HTML: &str = "text/html";

/// A delivery header built by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailHeader {
    /// Sender override, either `address` or `Name <address>`.
    From(String),
    /// MIME type of the body.
    ContentType(String),
}

impl fmt::Display for MailHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From(from) => write!(f, "From: {from}"),
            Self::ContentType(content_type) => write!(f, "Content-Type: {content_type}"),
        }
    }
}

/// A fully formed message handed to a [`MailTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub headers: Vec<MailHeader>,
    pub attachments: Vec<PathBuf>,
}

impl OutgoingMail {
    /// The `From` header value, if one was set.
    pub fn from_header(&self) -> Option<&str> {
        self.headers.iter().find_map(|h| match h {
            MailHeader::From(from) => Some(from.as_str()),
            MailHeader::ContentType(_) => None,
        })
    }

    /// Whether the body is HTML.
    pub fn is_html(&self) -> bool {
        self.headers
            .iter()
            .any(|h| matches!(h, MailHeader::ContentType(ct) if ct == CONTENT_TYPE_HTML))
    }
}

/// Sends a fully formed message.
///
/// Returns `true` when the message was handed off successfully. Timeouts and
/// retries are the transport's own business; the dispatcher only records the
/// outcome.
pub trait MailTransport: Send + Sync {
    fn send(&self, mail: &OutgoingMail) -> bool;
}

/// Transport that only logs messages. Always reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

impl MailTransport for LogTransport {
    fn send(&self, mail: &OutgoingMail) -> bool {
        tracing::info!(
            to = ?mail.to,
            subject = %mail.subject,
            html = mail.is_html(),
            attachments = mail.attachments.len(),
            "SMTP not configured, notification logged instead of sent"
        );
        true
    }
}
