//! Dispatcher configuration.

use crate::url::UrlPolicy;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Characters of a rejected URL kept in the audit log.
pub const AUDIT_URL_PREFIX_CHARS: usize = 50;

/// Settings fixed at `Dispatcher` construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Used when a request carries no timeout (or a zero one).
    pub default_timeout_secs: u64,
    pub url_policy: UrlPolicy,
    /// Sent as `User-Agent` unless the request sets one.
    pub user_agent: Option<String>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            url_policy: UrlPolicy::Lenient,
            user_agent: None,
        }
    }
}

impl DispatcherConfig {
    /// Build from `NANOMAN_TIMEOUT_SECS`, `NANOMAN_STRICT_URLS` and
    /// `NANOMAN_USER_AGENT`, falling back to defaults for anything unset or
    /// unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(secs) = lookup("NANOMAN_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|s| *s > 0)
        {
            config.default_timeout_secs = secs;
        }
        if let Some(strict) = lookup("NANOMAN_STRICT_URLS") {
            if matches!(strict.trim(), "1" | "true" | "yes") {
                config.url_policy = UrlPolicy::Strict;
            }
        }
        config.user_agent = lookup("NANOMAN_USER_AGENT").filter(|ua| !ua.trim().is_empty());
        config
    }

    /// Resolve a per-request timeout: zero or absent means the default.
    pub fn effective_timeout(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(secs) if secs > 0 => secs,
            _ => self.default_timeout_secs,
        }
    }
}
