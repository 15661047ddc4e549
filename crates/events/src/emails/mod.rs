//! Built-in notifications.
//!
//! Each submodule implements one [`Notification`](crate::Notification).
//! [`register_handlers`] adds their constructors to a
//! [`HandlerCatalog`](crate::HandlerCatalog) and [`builtin_entries`] lists the
//! registry entries pointing at them.

pub mod admin_new_listing;

use indexmap::IndexMap;
use tidings_core::keys::{ADMIN_NOTICE_NEW_LISTING, HANDLER_ADMIN_NEW_LISTING};

use crate::config::NotificationConfig;
use crate::registry::{EntryConfig, HandlerCatalog};

pub use admin_new_listing::AdminNewListing;

/// Register the built-in handler constructors.
///
/// Values the handlers need from configuration are captured here, so the
/// notifications never read ambient state at dispatch time.
pub fn register_handlers(catalog: &mut HandlerCatalog, config: &NotificationConfig) {
    let admin_email = config.admin_email.clone();
    catalog.register(HANDLER_ADMIN_NEW_LISTING, move |args| {
        AdminNewListing::new(args, admin_email.clone())
    });
}

/// The built-in registry entries, in display order.
pub fn builtin_entries() -> IndexMap<String, EntryConfig> {
    let mut entries = IndexMap::new();
    entries.insert(
        ADMIN_NOTICE_NEW_LISTING.to_string(),
        EntryConfig::new(HANDLER_ADMIN_NEW_LISTING, "Admin Notice of New Listing", true),
    );
    entries
}
