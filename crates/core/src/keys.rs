//! Well-known notification key and handler name constants.
//!
//! Keys identify a registry entry; handler names identify the constructor a
//! registry entry resolves to. Both are referenced by the built-in registry,
//! the API host that schedules notifications, and extension code that wants
//! to override a built-in entry.

/// Email to the site administrator when a new listing is submitted.
pub const ADMIN_NOTICE_NEW_LISTING: &str = "admin_notice_new_listing";

/// Handler name backing [`ADMIN_NOTICE_NEW_LISTING`].
pub const HANDLER_ADMIN_NEW_LISTING: &str = "admin_new_listing";

/// Argument key carrying the submitted listing object.
pub const ARG_JOB: &str = "job";
