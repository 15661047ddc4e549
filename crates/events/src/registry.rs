//! Notification registry.
//!
//! Maps notification keys to the handler that builds them. The built-in set
//! is fixed at construction; registration hooks may add, replace or remove
//! entries, and every listing re-applies them to a fresh copy, so the
//! registry itself never mutates after setup.
//!
//! Handlers are registered by name in a [`HandlerCatalog`] with a typed
//! constructor, which means "implements the notification capability set" is
//! checked by the compiler. A registry entry referencing a handler name that
//! is not in the catalog is structurally invalid and silently dropped.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::args::NotificationArgs;
use crate::config::NotificationConfig;
use crate::emails;
use crate::hooks::Hooks;
use crate::notification::Notification;

/// Type-erased constructor for a registered handler.
pub type NotificationFactory =
    Arc<dyn Fn(NotificationArgs) -> Box<dyn Notification> + Send + Sync>;

// ---------------------------------------------------------------------------
// EntryConfig
// ---------------------------------------------------------------------------

/// Registration record for a notification key, as seen by registration hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    /// Name of the handler in the [`HandlerCatalog`].
    pub handler: String,
    /// Human-readable name.
    pub name: String,
    /// Whether the notification is sent when no enablement override exists.
    #[serde(default = "default_enabled")]
    pub default_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl EntryConfig {
    pub fn new(
        handler: impl Into<String>,
        name: impl Into<String>,
        default_enabled: bool,
    ) -> Self {
        Self {
            handler: handler.into(),
            name: name.into(),
            default_enabled,
        }
    }
}

// ---------------------------------------------------------------------------
// HandlerCatalog
// ---------------------------------------------------------------------------

/// Named notification constructors.
#[derive(Clone, Default)]
pub struct HandlerCatalog {
    handlers: HashMap<String, NotificationFactory>,
}

impl HandlerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the constructor for `name`.
    pub fn register<N, F>(&mut self, name: impl Into<String>, constructor: F) -> &mut Self
    where
        N: Notification + 'static,
        F: Fn(NotificationArgs) -> N + Send + Sync + 'static,
    {
        let factory: NotificationFactory =
            Arc::new(move |args| Box::new(constructor(args)) as Box<dyn Notification>);
        self.handlers.insert(name.into(), factory);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    fn resolve(&self, name: &str) -> Option<NotificationFactory> {
        self.handlers.get(name).cloned()
    }
}

impl std::fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

// ---------------------------------------------------------------------------
// RegistryEntry
// ---------------------------------------------------------------------------

/// A validated registry entry with its resolved constructor.
#[derive(Clone)]
pub struct RegistryEntry {
    pub key: String,
    pub name: String,
    pub handler: String,
    pub default_enabled: bool,
    factory: NotificationFactory,
}

impl RegistryEntry {
    /// Build a notification of this entry's handler type.
    pub fn build(&self, args: NotificationArgs) -> Box<dyn Notification> {
        (self.factory)(args)
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("handler", &self.handler)
            .field("default_enabled", &self.default_enabled)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Enablement
// ---------------------------------------------------------------------------

/// Decides whether a structurally valid entry is currently enabled.
///
/// Only consulted when listing enabled entries.
pub trait EnablementResolver: Send + Sync {
    fn is_enabled(&self, key: &str, default_enabled: bool) -> bool;
}

impl<F> EnablementResolver for F
where
    F: Fn(&str, bool) -> bool + Send + Sync,
{
    fn is_enabled(&self, key: &str, default_enabled: bool) -> bool {
        self(key, default_enabled)
    }
}

/// Honours each entry's `default_enabled` flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnablement;

impl EnablementResolver for DefaultEnablement {
    fn is_enabled(&self, _key: &str, default_enabled: bool) -> bool {
        default_enabled
    }
}

/// Per-key overrides on top of `default_enabled`.
///
/// A key listed as disabled stays disabled even if it is also listed as
/// enabled.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredEnablement {
    enabled: HashSet<String>,
    disabled: HashSet<String>,
}

impl ConfiguredEnablement {
    pub fn new<E, D>(enabled: E, disabled: D) -> Self
    where
        E: IntoIterator<Item = String>,
        D: IntoIterator<Item = String>,
    {
        Self {
            enabled: enabled.into_iter().collect(),
            disabled: disabled.into_iter().collect(),
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.enabled.clone(), config.disabled.clone())
    }
}

impl EnablementResolver for ConfiguredEnablement {
    fn is_enabled(&self, key: &str, default_enabled: bool) -> bool {
        if self.disabled.contains(key) {
            return false;
        }
        self.enabled.contains(key) || default_enabled
    }
}

// ---------------------------------------------------------------------------
// NotificationRegistry
// ---------------------------------------------------------------------------

/// Built-in entries, the handler catalog and the enablement policy.
#[derive(Clone)]
pub struct NotificationRegistry {
    builtins: IndexMap<String, EntryConfig>,
    catalog: HandlerCatalog,
    enablement: Arc<dyn EnablementResolver>,
}

impl NotificationRegistry {
    /// An empty registry over `catalog`, honouring `default_enabled` flags.
    pub fn new(catalog: HandlerCatalog) -> Self {
        Self {
            builtins: IndexMap::new(),
            catalog,
            enablement: Arc::new(DefaultEnablement),
        }
    }

    /// The registry shipped with the engine: built-in handlers and entries,
    /// with enablement overrides taken from `config`.
    pub fn with_builtins(config: &NotificationConfig) -> Self {
        let mut catalog = HandlerCatalog::new();
        emails::register_handlers(&mut catalog, config);

        let mut registry =
            Self::new(catalog).with_enablement(ConfiguredEnablement::from_config(config));
        for (key, entry) in emails::builtin_entries() {
            registry.builtins.insert(key, entry);
        }
        registry
    }

    /// Add (or replace) a built-in entry.
    pub fn with_entry(mut self, key: impl Into<String>, entry: EntryConfig) -> Self {
        self.builtins.insert(key.into(), entry);
        self
    }

    pub fn with_enablement(mut self, resolver: impl EnablementResolver + 'static) -> Self {
        self.enablement = Arc::new(resolver);
        self
    }

    pub fn catalog_mut(&mut self) -> &mut HandlerCatalog {
        &mut self.catalog
    }

    /// List the entries that survive registration hooks and validation.
    ///
    /// When `enabled_only` is set, entries whose enablement resolves to
    /// `false` are dropped as well. Returns a fresh map on every call, in
    /// registration order.
    pub fn list_entries(
        &self,
        hooks: &Hooks,
        enabled_only: bool,
    ) -> IndexMap<String, RegistryEntry> {
        let mut configs = self.builtins.clone();
        hooks.apply_registration(&mut configs);

        configs
            .into_iter()
            .filter_map(|(key, config)| self.validate(key, config))
            .filter(|entry| {
                if !enabled_only || self.enablement.is_enabled(&entry.key, entry.default_enabled) {
                    return true;
                }
                tracing::debug!(key = %entry.key, "Notification disabled, not listed");
                false
            })
            .map(|entry| (entry.key.clone(), entry))
            .collect()
    }

    /// Structural validation. Invalid entries are dropped, never reported.
    fn validate(&self, key: String, config: EntryConfig) -> Option<RegistryEntry> {
        if key.trim().is_empty() {
            tracing::debug!(
                handler = %config.handler,
                "Dropping notification entry with empty key"
            );
            return None;
        }
        if config.name.trim().is_empty() {
            tracing::debug!(key = %key, "Dropping notification entry with empty name");
            return None;
        }
        let Some(factory) = self.catalog.resolve(&config.handler) else {
            tracing::debug!(
                key = %key,
                handler = %config.handler,
                "Dropping notification entry with unknown handler"
            );
            return None;
        };

        Some(RegistryEntry {
            key,
            name: config.name,
            handler: config.handler,
            default_enabled: config.default_enabled,
            factory,
        })
    }
}

impl std::fmt::Debug for NotificationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationRegistry")
            .field("builtins", &self.builtins)
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
