use tidings_core::address::parse_address_list;

/// Notification settings loaded from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Recipients of administrator notices. Empty means admin notices are invalid.
    pub admin_email: Vec<String>,
    /// Render every notification as plain text instead of HTML.
    pub plain_text: bool,
    /// Keys forced on regardless of their default.
    pub enabled: Vec<String>,
    /// Keys forced off regardless of their default.
    pub disabled: Vec<String>,
}

impl NotificationConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `ADMIN_EMAIL`              | (none)  |
    /// | `NOTIFICATIONS_PLAIN_TEXT` | `false` |
    /// | `NOTIFICATIONS_ENABLED`    | (none)  |
    /// | `NOTIFICATIONS_DISABLED`   | (none)  |
    ///
    /// List variables are comma-separated.
    pub fn from_env() -> Self {
        Self {
            admin_email: std::env::var("ADMIN_EMAIL")
                .map(|raw| parse_address_list(&raw))
                .unwrap_or_default(),
            plain_text: std::env::var("NOTIFICATIONS_PLAIN_TEXT")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            enabled: env_list("NOTIFICATIONS_ENABLED"),
            disabled: env_list("NOTIFICATIONS_DISABLED"),
        }
    }
}

/// Comma-separated notification keys, trimmed, empties skipped.
fn env_list(name: &str) -> Vec<String> {
    std::env::var(name)
        .map(|raw| parse_key_list(&raw))
        .unwrap_or_default()
}

fn parse_key_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_accepts_common_truthy_values() {
        for raw in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_flag(raw), "{raw:?} should be truthy");
        }
        for raw in ["", "0", "false", "off", "nope"] {
            assert!(!parse_flag(raw), "{raw:?} should be falsy");
        }
    }

    #[test]
    fn key_lists_are_trimmed_and_skip_empties() {
        assert_eq!(
            parse_key_list(" admin_notice_new_listing, ,other_key,"),
            vec!["admin_notice_new_listing".to_string(), "other_key".to_string()]
        );
        assert!(parse_key_list("").is_empty());
    }

    #[test]
    fn default_config_is_rich_and_unaddressed() {
        let config = NotificationConfig::default();
        assert!(config.admin_email.is_empty());
        assert!(!config.plain_text);
    }
}
