//! Request middleware.
//!
//! - [`notifications::notification_cycle`] -- Opens a deferred notification
//!   queue per request and flushes it once the response is ready.

pub mod notifications;
