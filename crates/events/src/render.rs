//! Body rendering.
//!
//! The rendered body is the concatenation of the header wrappers, the body
//! and the footer wrappers. In plain-text mode the body is the texturized
//! plain content; otherwise it is the texturized rich content wrapped into
//! paragraphs.

use tidings_core::markup::{autop, texturize};

use crate::hooks::Hooks;
use crate::notification::MailFields;

/// Renders the final message body from a frozen field snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ContentRenderer<'a> {
    hooks: &'a Hooks,
}

impl<'a> ContentRenderer<'a> {
    pub fn new(hooks: &'a Hooks) -> Self {
        Self { hooks }
    }

    /// Render the body for notification `key`.
    ///
    /// Deterministic for identical inputs as long as the registered header
    /// and footer wrappers are.
    pub fn render(&self, key: &str, fields: &MailFields, plain_mode: bool) -> String {
        let mut content = self.hooks.render_header(key, fields, plain_mode);

        if plain_mode {
            content.push_str(&texturize(&fields.plain_content));
        } else {
            content.push_str(&autop(&texturize(&fields.rich_content)));
        }

        content.push_str(&self.hooks.render_footer(key, fields, plain_mode));
        content
    }
}
