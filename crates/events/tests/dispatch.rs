//! End-to-end flush scenarios: queue, registry, hooks and transport together.

use std::sync::{Arc, Mutex};

use serde_json::json;
use tidings_events::{
    Dispatcher, EntryConfig, Hooks, MailHeader, MailTransport, Notification, NotificationArgs,
    NotificationConfig, NotificationQueue, NotificationRegistry, OutgoingMail,
};

const ADMIN_KEY: &str = "admin_notice_new_listing";

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingTransport {
    fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailTransport for RecordingTransport {
    fn send(&self, mail: &OutgoingMail) -> bool {
        self.sent.lock().unwrap().push(mail.clone());
        true
    }
}

/// Records every message and reports failure for the first `failures` sends.
struct FlakyTransport {
    sent: Mutex<Vec<OutgoingMail>>,
    failures: usize,
}

impl MailTransport for FlakyTransport {
    fn send(&self, mail: &OutgoingMail) -> bool {
        let mut sent = self.sent.lock().unwrap();
        sent.push(mail.clone());
        sent.len() > self.failures
    }
}

/// Echoes the `n` argument into the subject so ordering can be observed.
struct Echo {
    args: NotificationArgs,
}

impl Notification for Echo {
    fn subject(&self) -> String {
        format!("echo {}", self.args.get("n").cloned().unwrap_or_default())
    }
    fn sender(&self) -> Option<String> {
        None
    }
    fn recipients(&self) -> Vec<String> {
        vec!["echo@example.com".into()]
    }
    fn rich_content(&self) -> String {
        "echo".into()
    }
    fn is_valid(&self) -> bool {
        self.args.get("n").is_some()
    }
}

fn config() -> NotificationConfig {
    NotificationConfig {
        admin_email: vec!["admin@example.com".into()],
        ..NotificationConfig::default()
    }
}

fn echo_registry(config: &NotificationConfig) -> NotificationRegistry {
    let mut registry = NotificationRegistry::with_builtins(config)
        .with_entry("echo", EntryConfig::new("echo", "Echo", true));
    registry
        .catalog_mut()
        .register("echo", |args| Echo { args });
    registry
}

fn setup(
    registry: NotificationRegistry,
    hooks: Hooks,
) -> (Dispatcher, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let shared: Arc<dyn MailTransport> = transport.clone();
    (Dispatcher::new(registry, hooks, shared), transport)
}

fn valid_job() -> serde_json::Value {
    json!({
        "job": {
            "id": 7,
            "title": "Senior Welder",
            "company_name": "Acme",
            "permalink": "https://jobs.example.com/7"
        }
    })
}

#[test]
fn admin_notice_for_valid_listing_is_sent_once() {
    let (dispatcher, transport) = setup(NotificationRegistry::with_builtins(&config()), Hooks::new());
    let queue = NotificationQueue::new();
    queue.schedule(ADMIN_KEY, valid_job());
    dispatcher.flush(&queue);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].subject.contains("Senior Welder"));
    assert_eq!(sent[0].to, vec!["admin@example.com"]);
    assert!(sent[0].is_html());
    assert!(sent[0].body.contains("<strong>Senior Welder</strong>"));
}

#[test]
fn admin_notice_without_job_is_never_sent() {
    let (dispatcher, transport) = setup(NotificationRegistry::with_builtins(&config()), Hooks::new());
    let queue = NotificationQueue::new();
    queue.schedule(ADMIN_KEY, json!({}));
    queue.schedule(ADMIN_KEY, json!(["not", "an", "object"]));
    dispatcher.flush(&queue);

    assert!(transport.sent().is_empty());
}

#[test]
fn admin_notice_without_admin_address_is_never_sent() {
    let registry = NotificationRegistry::with_builtins(&NotificationConfig::default());
    let (dispatcher, transport) = setup(registry, Hooks::new());
    let queue = NotificationQueue::new();
    queue.schedule(ADMIN_KEY, valid_job());
    dispatcher.flush(&queue);

    assert!(transport.sent().is_empty());
}

#[test]
fn unregistered_key_is_skipped() {
    let (dispatcher, transport) = setup(echo_registry(&config()), Hooks::new());
    let queue = NotificationQueue::new();
    queue.schedule("no_such_notification", json!({ "n": 1 }));
    queue.schedule("echo", json!({ "n": 2 }));
    dispatcher.flush(&queue);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "echo 2");
}

#[test]
fn repeated_schedules_dispatch_in_order() {
    let (dispatcher, transport) = setup(echo_registry(&config()), Hooks::new());
    let queue = NotificationQueue::new();
    for n in 1..=3 {
        queue.schedule("echo", json!({ "n": n }));
    }
    dispatcher.flush(&queue);

    let subjects: Vec<String> = transport.sent().into_iter().map(|m| m.subject).collect();
    assert_eq!(subjects, vec!["echo 1", "echo 2", "echo 3"]);
}

#[test]
fn second_flush_sends_nothing() {
    let (dispatcher, transport) = setup(echo_registry(&config()), Hooks::new());
    let queue = NotificationQueue::new();
    queue.schedule("echo", json!({ "n": 1 }));
    dispatcher.flush(&queue);
    dispatcher.flush(&queue);

    assert_eq!(transport.sent().len(), 1);
    assert!(queue.is_empty());
}

#[test]
fn invalid_entries_do_not_stop_later_ones() {
    let (dispatcher, transport) = setup(echo_registry(&config()), Hooks::new());
    let queue = NotificationQueue::new();
    queue.schedule("echo", json!({}));
    queue.schedule(ADMIN_KEY, json!({}));
    queue.schedule("echo", json!({ "n": 9 }));
    dispatcher.flush(&queue);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "echo 9");
}

#[test]
fn disabled_notification_is_not_sent() {
    let config = NotificationConfig {
        disabled: vec![ADMIN_KEY.into()],
        ..config()
    };
    let (dispatcher, transport) = setup(NotificationRegistry::with_builtins(&config), Hooks::new());
    let queue = NotificationQueue::new();
    queue.schedule(ADMIN_KEY, valid_job());
    dispatcher.flush(&queue);

    assert!(transport.sent().is_empty());
    assert!(dispatcher.list_entries(true).is_empty());
    assert!(dispatcher.list_entries(false).contains_key(ADMIN_KEY));
}

#[test]
fn registration_hook_can_remove_and_add_entries() {
    let mut hooks = Hooks::new();
    hooks.on_register(|entries| {
        entries.shift_remove(ADMIN_KEY);
        entries.insert("late_echo".into(), EntryConfig::new("echo", "Late Echo", true));
        entries.insert("ghost".into(), EntryConfig::new("missing_handler", "Ghost", true));
    });
    let (dispatcher, transport) = setup(echo_registry(&config()), hooks);

    let keys: Vec<String> = dispatcher.list_entries(false).into_keys().collect();
    assert_eq!(keys, vec!["echo", "late_echo"]);

    let queue = NotificationQueue::new();
    queue.schedule(ADMIN_KEY, valid_job());
    queue.schedule("late_echo", json!({ "n": 4 }));
    queue.schedule("ghost", json!({ "n": 5 }));
    dispatcher.flush(&queue);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "echo 4");
}

#[test]
fn plain_text_config_sends_plain_body() {
    let config = NotificationConfig {
        plain_text: true,
        ..config()
    };
    let (dispatcher, transport) = setup(
        NotificationRegistry::with_builtins(&config),
        Hooks::from_config(&config),
    );
    let queue = NotificationQueue::new();
    queue.schedule(ADMIN_KEY, valid_job());
    dispatcher.flush(&queue);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(!sent[0].is_html());
    assert!(!sent[0].body.contains("<strong>"));
    assert!(sent[0].body.contains("View the listing: https://jobs.example.com/7"));
}

#[test]
fn field_filters_and_wrappers_shape_the_message() {
    let mut hooks = Hooks::new();
    hooks
        .fields_mut(ADMIN_KEY)
        .from
        .push(|_| Some("Jobs Board <jobs@example.com>".into()));
    hooks
        .on_header(|_, _, _| "<h1>Jobs Board</h1>".into())
        .on_footer(|key, _, _| format!("<small>{key}</small>"));
    let (dispatcher, transport) = setup(NotificationRegistry::with_builtins(&config()), hooks);

    let queue = NotificationQueue::new();
    queue.schedule(ADMIN_KEY, valid_job());
    dispatcher.flush(&queue);

    let mail = &transport.sent()[0];
    assert_eq!(mail.headers[0], MailHeader::From("Jobs Board <jobs@example.com>".into()));
    assert!(mail.body.starts_with("<h1>Jobs Board</h1>"));
    assert!(mail.body.ends_with("<small>admin_notice_new_listing</small>"));
}

#[test]
fn transport_failure_does_not_stop_later_entries() {
    let transport = Arc::new(FlakyTransport {
        sent: Mutex::new(Vec::new()),
        failures: 1,
    });
    let shared: Arc<dyn MailTransport> = transport.clone();
    let dispatcher = Dispatcher::new(echo_registry(&config()), Hooks::new(), shared);

    let queue = NotificationQueue::new();
    for n in 1..=3 {
        queue.schedule("echo", json!({ "n": n }));
    }
    dispatcher.flush(&queue);

    let subjects: Vec<String> = transport
        .sent
        .lock()
        .unwrap()
        .iter()
        .map(|m| m.subject.clone())
        .collect();
    assert_eq!(subjects, vec!["echo 1", "echo 2", "echo 3"]);
    assert!(queue.is_empty());
}
