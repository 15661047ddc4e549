//! Extension registry.
//!
//! Every extension point of the dispatch engine is an ordered chain of
//! callbacks, invoked in registration order:
//!
//! | Extension point     | Shape                                   | Used by |
//! |---------------------|-----------------------------------------|---------|
//! | registration        | edits the `key -> EntryConfig` map      | [`NotificationRegistry`](crate::NotificationRegistry) |
//! | per-field filters   | `T -> T` per `(notification key, field)`| [`Dispatcher`](crate::Dispatcher) |
//! | plain-text mode     | `bool -> bool`, seeded with `false`     | [`Dispatcher`](crate::Dispatcher) |
//! | header / footer     | `(key, fields, plain) -> String`        | [`ContentRenderer`](crate::ContentRenderer) |
//!
//! Hooks are assembled during setup and then shared read-only (behind an
//! `Arc`) by every processing cycle.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::NotificationConfig;
use crate::notification::MailFields;
use crate::registry::EntryConfig;

/// Callback that may add, replace or remove registry entries.
pub type RegistrationHook = Arc<dyn Fn(&mut IndexMap<String, EntryConfig>) + Send + Sync>;

/// Callback that emits markup around a rendered body.
///
/// Receives the notification key, the frozen fields and whether plain-text
/// mode is active.
pub type ContentWrapper = Arc<dyn Fn(&str, &MailFields, bool) -> String + Send + Sync>;

// ---------------------------------------------------------------------------
// FilterChain
// ---------------------------------------------------------------------------

/// Ordered list of value transforms.
pub struct FilterChain<T> {
    filters: Vec<Arc<dyn Fn(T) -> T + Send + Sync>>,
}

impl<T> FilterChain<T> {
    /// Append a transform to the end of the chain.
    pub fn push<F>(&mut self, filter: F)
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(filter));
    }

    /// Run `value` through every transform in registration order.
    pub fn apply(&self, value: T) -> T {
        self.filters.iter().fold(value, |acc, filter| filter(acc))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<T> Default for FilterChain<T> {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
        }
    }
}

impl<T> Clone for FilterChain<T> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldFilters
// ---------------------------------------------------------------------------

/// Per-field filter chains for a single notification key.
#[derive(Clone, Default)]
pub struct FieldFilters {
    pub to: FilterChain<Vec<String>>,
    pub from: FilterChain<Option<String>>,
    pub subject: FilterChain<String>,
    pub rich_content: FilterChain<String>,
    pub plain_content: FilterChain<String>,
    pub attachments: FilterChain<Vec<PathBuf>>,
}

impl FieldFilters {
    /// Run every field through its own chain.
    pub fn apply(&self, fields: MailFields) -> MailFields {
        MailFields {
            to: self.to.apply(fields.to),
            from: self.from.apply(fields.from),
            subject: self.subject.apply(fields.subject),
            rich_content: self.rich_content.apply(fields.rich_content),
            plain_content: self.plain_content.apply(fields.plain_content),
            attachments: self.attachments.apply(fields.attachments),
        }
    }

    fn len(&self) -> usize {
        self.to.len()
            + self.from.len()
            + self.subject.len()
            + self.rich_content.len()
            + self.plain_content.len()
            + self.attachments.len()
    }
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

/// All extension points of the dispatch engine.
#[derive(Clone, Default)]
pub struct Hooks {
    registration: Vec<RegistrationHook>,
    fields: HashMap<String, FieldFilters>,
    plain_text: FilterChain<bool>,
    header: Vec<ContentWrapper>,
    footer: Vec<ContentWrapper>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hooks seeded from configuration. Installs a plain-text mode filter
    /// when `config.plain_text` is set.
    pub fn from_config(config: &NotificationConfig) -> Self {
        let mut hooks = Self::new();
        if config.plain_text {
            hooks.on_plain_text(|_| true);
        }
        hooks
    }

    /// Register a callback that edits the registry entry map.
    pub fn on_register<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut IndexMap<String, EntryConfig>) + Send + Sync + 'static,
    {
        self.registration.push(Arc::new(hook));
        self
    }

    /// Filter chains for the notification identified by `key`.
    ///
    /// ```rust
    /// use tidings_events::Hooks;
    ///
    /// let mut hooks = Hooks::new();
    /// hooks
    ///     .fields_mut("admin_notice_new_listing")
    ///     .subject
    ///     .push(|subject| format!("[Jobs] {subject}"));
    /// ```
    pub fn fields_mut(&mut self, key: &str) -> &mut FieldFilters {
        self.fields.entry(key.to_string()).or_default()
    }

    /// Register a transform of the global plain-text flag.
    pub fn on_plain_text<F>(&mut self, filter: F) -> &mut Self
    where
        F: Fn(bool) -> bool + Send + Sync + 'static,
    {
        self.plain_text.push(filter);
        self
    }

    /// Register a callback emitting markup before the body.
    pub fn on_header<F>(&mut self, wrapper: F) -> &mut Self
    where
        F: Fn(&str, &MailFields, bool) -> String + Send + Sync + 'static,
    {
        self.header.push(Arc::new(wrapper));
        self
    }

    /// Register a callback emitting markup after the body.
    pub fn on_footer<F>(&mut self, wrapper: F) -> &mut Self
    where
        F: Fn(&str, &MailFields, bool) -> String + Send + Sync + 'static,
    {
        self.footer.push(Arc::new(wrapper));
        self
    }

    pub(crate) fn apply_registration(&self, entries: &mut IndexMap<String, EntryConfig>) {
        for hook in &self.registration {
            hook(entries);
        }
    }

    pub(crate) fn filter_fields(&self, key: &str, fields: MailFields) -> MailFields {
        match self.fields.get(key) {
            Some(filters) => filters.apply(fields),
            None => fields,
        }
    }

    /// Resolve the global rendering mode. Without filters this is `false` (rich).
    pub fn send_as_plain_text(&self) -> bool {
        self.plain_text.apply(false)
    }

    pub(crate) fn render_header(&self, key: &str, fields: &MailFields, plain: bool) -> String {
        concat_wrappers(&self.header, key, fields, plain)
    }

    pub(crate) fn render_footer(&self, key: &str, fields: &MailFields, plain: bool) -> String {
        concat_wrappers(&self.footer, key, fields, plain)
    }
}

fn concat_wrappers(
    wrappers: &[ContentWrapper],
    key: &str,
    fields: &MailFields,
    plain: bool,
) -> String {
    wrappers
        .iter()
        .map(|wrapper| wrapper(key, fields, plain))
        .collect()
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let field_filters: usize = self.fields.values().map(FieldFilters::len).sum();
        f.debug_struct("Hooks")
            .field("registration", &self.registration.len())
            .field("field_filters", &field_filters)
            .field("plain_text", &self.plain_text.len())
            .field("header", &self.header.len())
            .field("footer", &self.footer.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
