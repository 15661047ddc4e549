//! Email to the site administrator when a new listing is submitted.
//!
//! Expects the submitted [`Listing`] under the `job` argument. The admin
//! address is captured from configuration when the handler is registered.

use tidings_core::address::is_valid_address;
use tidings_core::keys::ARG_JOB;
use tidings_core::listing::Listing;
use tidings_core::markup::escape_html;

use crate::args::NotificationArgs;
use crate::notification::Notification;

const SUBJECT_PREFIX: &str = "New Job Listing Submitted";

/// Admin notice of a newly submitted listing.
#[derive(Debug, Clone)]
pub struct AdminNewListing {
    args: NotificationArgs,
    admin_email: Vec<String>,
}

impl AdminNewListing {
    pub fn new(args: NotificationArgs, admin_email: Vec<String>) -> Self {
        Self { args, admin_email }
    }

    /// The listing argument, if present, well-formed and titled.
    fn listing(&self) -> Option<Listing> {
        self.args
            .parse::<Listing>(ARG_JOB)
            .filter(|listing| !listing.title.trim().is_empty())
    }
}

/// Labelled detail lines shown below the headline.
fn details(listing: &Listing) -> Vec<(&'static str, &str)> {
    [
        ("Company", listing.company_name.as_deref()),
        ("Location", listing.location.as_deref()),
        ("Submitted by", listing.author.as_deref()),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| (label, v))
    })
    .collect()
}

impl Notification for AdminNewListing {
    fn subject(&self) -> String {
        match self.listing() {
            Some(listing) => format!("{SUBJECT_PREFIX}: {}", listing.title.trim()),
            None => SUBJECT_PREFIX.to_string(),
        }
    }

    fn sender(&self) -> Option<String> {
        None
    }

    /// Configured admin addresses that parse as mailboxes.
    fn recipients(&self) -> Vec<String> {
        self.admin_email
            .iter()
            .filter(|address| is_valid_address(address))
            .cloned()
            .collect()
    }

    fn rich_content(&self) -> String {
        let Some(listing) = self.listing() else {
            return String::new();
        };

        let mut body = format!(
            "A new job listing has been submitted: <strong>{}</strong>",
            escape_html(listing.title.trim())
        );

        let lines: Vec<String> = details(&listing)
            .into_iter()
            .map(|(label, value)| format!("{label}: {}", escape_html(value)))
            .collect();
        if !lines.is_empty() {
            body.push_str("\n\n");
            body.push_str(&lines.join("\n"));
        }

        if let Some(link) = listing.permalink.as_deref().filter(|l| !l.is_empty()) {
            body.push_str(&format!(
                "\n\n<a href=\"{}\">View the listing</a>",
                escape_html(link)
            ));
        }

        body
    }

    fn plain_content(&self) -> String {
        let Some(listing) = self.listing() else {
            return String::new();
        };

        let mut body = format!(
            "A new job listing has been submitted: {}",
            listing.title.trim()
        );

        let lines: Vec<String> = details(&listing)
            .into_iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect();
        if !lines.is_empty() {
            body.push_str("\n\n");
            body.push_str(&lines.join("\n"));
        }

        if let Some(link) = listing.permalink.as_deref().filter(|l| !l.is_empty()) {
            body.push_str(&format!("\n\nView the listing: {link}"));
        }

        body
    }

    fn is_valid(&self) -> bool {
        self.listing().is_some() && !self.recipients().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
