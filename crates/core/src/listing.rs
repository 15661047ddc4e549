//! Job listing payload carried by listing notifications.
//!
//! The host serializes a `Listing` into the `job` argument when it schedules
//! a notification; notification handlers deserialize it back out of their
//! arguments. Every optional field stays optional on the wire so a partially
//! populated listing still parses.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum length of a listing title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// A submitted job listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub id: Option<DbId>,
    pub title: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<Timestamp>,
}

/// Validate a listing title: non-blank and within length limit.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Listing title must not be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Listing title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}
