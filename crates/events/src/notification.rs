//! The notification capability set and the frozen field snapshot.
//!
//! A [`Notification`] is built once per dispatch attempt from
//! [`NotificationArgs`](crate::NotificationArgs). Dispatch may happen after
//! the request that scheduled it has finished, so implementations must read
//! everything they need from their arguments (or from values captured when
//! their handler was registered), never from ambient request state.

use std::path::PathBuf;

use serde::Serialize;
use tidings_core::markup::strip_tags;

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// An email-like notification payload.
///
/// Every accessor is a pure function of the construction arguments. A missing
/// or malformed argument must surface as `is_valid() == false`, never as a
/// panic in one of the accessors.
pub trait Notification: Send {
    /// Subject line.
    fn subject(&self) -> String;

    /// `From:` value, either a bare address or `Name <address>`.
    ///
    /// `None` means "use the transport default".
    fn sender(&self) -> Option<String>;

    /// One or more recipient addresses.
    fn recipients(&self) -> Vec<String>;

    /// Rich (HTML) body.
    fn rich_content(&self) -> String;

    /// Plain-text body. Defaults to [`rich_content`](Self::rich_content) with
    /// all markup removed.
    fn plain_content(&self) -> String {
        strip_tags(&self.rich_content())
    }

    /// Files to attach, in order.
    fn attachments(&self) -> Vec<PathBuf> {
        Vec::new()
    }

    /// Whether the arguments carry everything needed to address and justify
    /// this message.
    fn is_valid(&self) -> bool;
}

// ---------------------------------------------------------------------------
// MailField
// ---------------------------------------------------------------------------

/// The six fields collected from a notification at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MailField {
    To,
    From,
    Subject,
    RichContent,
    PlainContent,
    Attachments,
}

impl MailField {
    pub const ALL: [MailField; 6] = [
        Self::To,
        Self::From,
        Self::Subject,
        Self::RichContent,
        Self::PlainContent,
        Self::Attachments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::To => "to",
            Self::From => "from",
            Self::Subject => "subject",
            Self::RichContent => "rich_content",
            Self::PlainContent => "plain_content",
            Self::Attachments => "attachments",
        }
    }
}

impl std::fmt::Display for MailField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MailFields
// ---------------------------------------------------------------------------

/// Snapshot of a notification's fields after per-field filters ran.
///
/// Rendering and transport only ever see this snapshot, never the
/// notification itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MailFields {
    pub to: Vec<String>,
    pub from: Option<String>,
    pub subject: String,
    pub rich_content: String,
    pub plain_content: String,
    pub attachments: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl Notification for Fixed {
        fn subject(&self) -> String {
            "s".into()
        }
        fn sender(&self) -> Option<String> {
            None
        }
        fn recipients(&self) -> Vec<String> {
            vec!["a@example.com".into()]
        }
        fn rich_content(&self) -> String {
            "<div><p>Hello <a href=\"/x\"><b>world</b></a></p></div>".into()
        }
        fn is_valid(&self) -> bool {
            true
        }
    }

    #[test]
    fn plain_content_defaults_to_stripped_rich_content() {
        assert_eq!(Fixed.plain_content(), "Hello world");
    }

    #[test]
    fn attachments_default_to_empty() {
        assert!(Fixed.attachments().is_empty());
    }

    #[test]
    fn field_names_are_snake_case() {
        let names: Vec<&str> = MailField::ALL.iter().map(MailField::as_str).collect();
        assert_eq!(
            names,
            ["to", "from", "subject", "rich_content", "plain_content", "attachments"]
        );
    }
}
