//! Tidings deferred notification dispatch.
//!
//! Business code schedules notifications by key during a processing cycle;
//! the host flushes them once the cycle ends:
//!
//! - [`NotificationQueue`] -- per-cycle list of scheduled `(key, args)` pairs.
//! - [`NotificationRegistry`] -- maps keys to handler constructors, filtered
//!   by validation and enablement.
//! - [`Notification`] -- the capability set every handler implements.
//! - [`Hooks`] -- extension points (registration, per-field filters,
//!   plain-text mode, header/footer wrappers).
//! - [`ContentRenderer`] -- renders the final body.
//! - [`Dispatcher`] -- resolves, validates, renders and sends at flush time.
//! - [`delivery`] -- mail transports (SMTP, log-only).
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tidings_events::{
//!     Dispatcher, Hooks, LogTransport, NotificationConfig, NotificationQueue,
//!     NotificationRegistry,
//! };
//!
//! let config = NotificationConfig::default();
//! let dispatcher = Dispatcher::new(
//!     NotificationRegistry::with_builtins(&config),
//!     Hooks::new(),
//!     Arc::new(LogTransport),
//! );
//!
//! let queue = NotificationQueue::new();
//! queue.schedule("admin_notice_new_listing", serde_json::json!({}));
//! dispatcher.flush(&queue);
//! assert!(queue.is_empty());
//! ```

pub mod args;
pub mod config;
pub mod delivery;
pub mod dispatch;
pub mod emails;
pub mod hooks;
pub mod notification;
pub mod queue;
pub mod registry;
pub mod render;

pub use args::NotificationArgs;
pub use config::NotificationConfig;
pub use delivery::{
    EmailConfig, LogTransport, MailHeader, MailTransport, OutgoingMail, SmtpMailer,
};
pub use dispatch::Dispatcher;
pub use hooks::{FieldFilters, FilterChain, Hooks};
pub use notification::{MailField, MailFields, Notification};
pub use queue::{NotificationQueue, ScheduledNotification};
pub use registry::{
    ConfiguredEnablement, DefaultEnablement, EnablementResolver, EntryConfig, HandlerCatalog,
    NotificationRegistry, RegistryEntry,
};
pub use render::ContentRenderer;
