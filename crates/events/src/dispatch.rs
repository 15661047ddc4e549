//! End-of-cycle dispatch.
//!
//! [`Dispatcher`] owns the registry, the extension hooks and the transport.
//! The host calls [`Dispatcher::flush`] once when a processing cycle ends;
//! every queued notification is resolved, validated, rendered and handed to
//! the transport, in the order it was scheduled. One entry failing never
//! stops the others.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::args::NotificationArgs;
use crate::delivery::transport::{MailHeader, MailTransport, OutgoingMail, CONTENT_TYPE_HTML};
use crate::hooks::Hooks;
use crate::notification::{MailFields, Notification};
use crate::queue::{NotificationQueue, ScheduledNotification};
use crate::registry::{NotificationRegistry, RegistryEntry};
use crate::render::ContentRenderer;

/// Resolves and sends deferred notifications.
///
/// Shared across cycles via `Arc<Dispatcher>`; it holds no per-cycle state.
pub struct Dispatcher {
    registry: NotificationRegistry,
    hooks: Arc<Hooks>,
    transport: Arc<dyn MailTransport>,
}

impl Dispatcher {
    pub fn new(
        registry: NotificationRegistry,
        hooks: Hooks,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            registry,
            hooks: Arc::new(hooks),
            transport,
        }
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Registry entries after registration hooks and validation.
    pub fn list_entries(&self, enabled_only: bool) -> IndexMap<String, RegistryEntry> {
        self.registry.list_entries(&self.hooks, enabled_only)
    }

    /// Drain `queue` and dispatch everything it held.
    ///
    /// Notifications scheduled on `queue` while this runs are left for the
    /// next flush.
    pub fn flush(&self, queue: &NotificationQueue) {
        self.dispatch_all(queue.drain());
    }

    /// Dispatch already-drained notifications in order.
    ///
    /// Keys that are unregistered, invalid or disabled are skipped silently.
    /// Arguments that are not a JSON object are treated as empty.
    pub fn dispatch_all(&self, pending: Vec<ScheduledNotification>) {
        if pending.is_empty() {
            return;
        }

        let entries = self.list_entries(true);
        let total = pending.len();
        let mut attempted = 0usize;
        let mut sent = 0usize;

        for scheduled in pending {
            let Some(entry) = entries.get(&scheduled.key) else {
                tracing::debug!(
                    key = %scheduled.key,
                    "Skipping unregistered or disabled notification"
                );
                continue;
            };

            let notification = entry.build(NotificationArgs::from_value(scheduled.args));
            attempted += 1;
            if self.dispatch_one(&scheduled.key, notification.as_ref()) {
                sent += 1;
            }
        }

        tracing::debug!(total, attempted, sent, "Deferred notifications flushed");
    }

    /// Validate, render and send a single notification.
    ///
    /// Returns the transport's result, or `false` without touching the
    /// transport when the notification is invalid.
    pub fn dispatch_one(&self, key: &str, notification: &dyn Notification) -> bool {
        if !notification.is_valid() {
            tracing::debug!(key, "Notification arguments invalid, not sent");
            return false;
        }

        let fields = self.hooks.filter_fields(key, collect_fields(notification));
        let plain_mode = self.hooks.send_as_plain_text();

        let mut headers = Vec::new();
        if let Some(from) = fields.from.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            headers.push(MailHeader::From(from.to_string()));
        }
        if !plain_mode {
            headers.push(MailHeader::ContentType(CONTENT_TYPE_HTML.to_string()));
        }

        let body = ContentRenderer::new(&self.hooks).render(key, &fields, plain_mode);

        let mail = OutgoingMail {
            to: fields.to,
            subject: fields.subject,
            body,
            headers,
            attachments: fields.attachments,
        };

        let delivered = self.transport.send(&mail);
        if !delivered {
            tracing::debug!(key, "Notification transport reported failure");
        }
        delivered
    }
}

/// Read every field from `notification`, before filters.
fn collect_fields(notification: &dyn Notification) -> MailFields {
    MailFields {
        to: notification.recipients(),
        from: notification.sender(),
        subject: notification.subject(),
        rich_content: notification.rich_content(),
        plain_content: notification.plain_content(),
        attachments: notification.attachments(),
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;
    use crate::registry::HandlerCatalog;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<OutgoingMail>>,
        succeed: bool,
    }

    impl MailTransport for Recorder {
        fn send(&self, mail: &OutgoingMail) -> bool {
            self.sent.lock().unwrap().push(mail.clone());
            self.succeed
        }
    }

    struct Memo {
        valid: bool,
        from: Option<String>,
    }

    impl Notification for Memo {
        fn subject(&self) -> String {
            "Memo".into()
        }
        fn sender(&self) -> Option<String> {
            self.from.clone()
        }
        fn recipients(&self) -> Vec<String> {
            vec!["staff@example.com".into()]
        }
        fn rich_content(&self) -> String {
            "Team <b>update</b>".into()
        }
        fn attachments(&self) -> Vec<PathBuf> {
            vec![PathBuf::from("/tmp/agenda.pdf")]
        }
        fn is_valid(&self) -> bool {
            self.valid
        }
    }

    fn dispatcher(hooks: Hooks, succeed: bool) -> (Dispatcher, Arc<Recorder>) {
        let recorder = Arc::new(Recorder {
            succeed,
            ..Recorder::default()
        });
        let registry = NotificationRegistry::new(HandlerCatalog::new());
        let transport: Arc<dyn MailTransport> = recorder.clone();
        (Dispatcher::new(registry, hooks, transport), recorder)
    }

    fn memo(valid: bool, from: Option<&str>) -> Memo {
        Memo {
            valid,
            from: from.map(str::to_string),
        }
    }

    #[test]
    fn invalid_notification_never_reaches_transport() {
        let (dispatcher, recorder) = dispatcher(Hooks::new(), true);
        assert!(!dispatcher.dispatch_one("memo", &memo(false, None)));
        assert!(recorder.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn rich_mode_sends_html_header_and_wrapped_body() {
        let (dispatcher, recorder) = dispatcher(Hooks::new(), true);
        assert!(dispatcher.dispatch_one("memo", &memo(true, None)));

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let mail = &sent[0];
        assert_eq!(mail.to, vec!["staff@example.com"]);
        assert_eq!(mail.subject, "Memo");
        assert_eq!(
            mail.headers,
            vec![MailHeader::ContentType(CONTENT_TYPE_HTML.to_string())]
        );
        assert_eq!(mail.body, "<p>Team <b>update</b></p>\n");
        assert_eq!(mail.attachments, vec![PathBuf::from("/tmp/agenda.pdf")]);
    }

    #[test]
    fn plain_mode_omits_content_type_and_uses_plain_content() {
        let mut hooks = Hooks::new();
        hooks.on_plain_text(|_| true);
        let (dispatcher, recorder) = dispatcher(hooks, true);
        dispatcher.dispatch_one("memo", &memo(true, None));

        let sent = recorder.sent.lock().unwrap();
        assert!(sent[0].headers.is_empty());
        assert_eq!(sent[0].body, "Team update");
    }

    #[test]
    fn from_header_only_when_sender_non_empty() {
        let (dispatcher, recorder) = dispatcher(Hooks::new(), true);
        dispatcher.dispatch_one("memo", &memo(true, Some("Boss <boss@example.com>")));
        dispatcher.dispatch_one("memo", &memo(true, Some("  ")));

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent[0].from_header(), Some("Boss <boss@example.com>"));
        assert!(sent[1].from_header().is_none());
    }

    #[test]
    fn field_filters_apply_per_key() {
        let mut hooks = Hooks::new();
        hooks.fields_mut("memo").subject.push(|s| format!("[Team] {s}"));
        hooks.fields_mut("memo").attachments.push(|_| Vec::new());
        hooks.fields_mut("other").subject.push(|_| "wrong".into());
        let (dispatcher, recorder) = dispatcher(hooks, true);
        dispatcher.dispatch_one("memo", &memo(true, None));

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent[0].subject, "[Team] Memo");
        assert!(sent[0].attachments.is_empty());
    }

    #[test]
    fn filtered_rich_content_is_what_gets_rendered() {
        let mut hooks = Hooks::new();
        hooks
            .fields_mut("memo")
            .rich_content
            .push(|_| "Replaced".into());
        let (dispatcher, recorder) = dispatcher(hooks, true);
        dispatcher.dispatch_one("memo", &memo(true, None));

        assert_eq!(recorder.sent.lock().unwrap()[0].body, "<p>Replaced</p>\n");
    }

    #[test]
    fn transport_result_is_returned_verbatim() {
        let (dispatcher, recorder) = dispatcher(Hooks::new(), false);
        assert!(!dispatcher.dispatch_one("memo", &memo(true, None)));
        assert_eq!(recorder.sent.lock().unwrap().len(), 1);
    }
}
