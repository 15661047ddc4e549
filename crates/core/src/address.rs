//! Recipient address parsing and validation.
//!
//! Recipient lists arrive either as a single comma-separated string (the
//! shape used in configuration) or as a list of addresses. Both reduce to a
//! `Vec<String>` of trimmed, non-empty entries.

use validator::ValidateEmail;

/// Split a comma-separated address list into trimmed, non-empty entries.
pub fn parse_address_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether `address` is a usable mailbox.
///
/// Accepts a bare address (`a@example.com`) or the display form
/// (`Jane Doe <a@example.com>`).
pub fn is_valid_address(address: &str) -> bool {
    bare_address(address).validate_email()
}

/// Extract the bare address from a mailbox that may carry a display name.
pub fn bare_address(address: &str) -> &str {
    let address = address.trim();
    match (address.rfind('<'), address.ends_with('>')) {
        (Some(open), true) => address[open + 1..address.len() - 1].trim(),
        _ => address,
    }
}
