//! Mail transports.
//!
//! [`MailTransport`] is the boundary the dispatcher sends through. This
//! module provides an SMTP transport ([`SmtpMailer`]) and a log-only
//! transport ([`LogTransport`]) for hosts without SMTP configuration.

pub mod email;
pub mod transport;

pub use email::{EmailConfig, EmailError, SmtpMailer};
pub use transport::{LogTransport, MailHeader, MailTransport, OutgoingMail, CONTENT_TYPE_HTML};
