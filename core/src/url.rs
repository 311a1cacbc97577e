//! URL safety gate.
//!
//! Only `http://` and `https://` URLs with a plain host (DNS name, bare
//! intranet label, or dotted-quad) are allowed through. Everything else,
//! including `javascript:`, `data:`, `file:` and scheme-less input, is
//! rejected before any network I/O.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)] // static pattern
static SAFE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^https?://",
        r"(?:",
        r"(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)*[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?",
        r"|[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}",
        r")",
        r"(?::([0-9]{1,5}))?",
        r"(?:/\S*)?$",
    ))
    .expect("static url pattern")
});

#[allow(clippy::expect_used)] // static pattern
static IPV4_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})(?:[:/]|$)")
        .expect("static ipv4 pattern")
});

/// How strictly host and port are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlPolicy {
    /// Structural check only: IPv4 octets and ports are not range-checked,
    /// so `http://999.999.999.999:99999` passes.
    #[default]
    Lenient,
    /// Structural check plus IPv4 octets in 0-255 and port in 0-65535.
    Strict,
}

impl UrlPolicy {
    pub fn is_safe(self, url: &str) -> bool {
        let url = url.trim();
        let Some(caps) = SAFE_URL.captures(url) else {
            return false;
        };
        if self == UrlPolicy::Lenient {
            return true;
        }

        if let Some(port) = caps.get(1) {
            if port.as_str().parse::<u16>().is_err() {
                return false;
            }
        }
        match IPV4_HOST.captures(url) {
            Some(octets) => octets
                .iter()
                .skip(1)
                .flatten()
                .all(|o| o.as_str().parse::<u8>().is_ok()),
            None => true,
        }
    }
}

/// Lenient safety check; see `UrlPolicy::Lenient`.
pub fn is_safe(url: &str) -> bool {
    UrlPolicy::Lenient.is_safe(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_urls() {
        for url in [
            "https://google.com",
            "https://api.example.com/v1/data",
            "https://sub.domain.example.org/path?query=value",
            "https://192.168.1.1:8080/api",
        ] {
            assert!(is_safe(url), "should be valid: {url}");
        }
    }

    #[test]
    fn accepts_http_urls() {
        for url in [
            "http://localhost",
            "http://localhost:8000",
            "http://127.0.0.1:5000/api",
            "http://example.com",
            "HTTP://EXAMPLE.COM/Upper",
        ] {
            assert!(is_safe(url), "should be valid: {url}");
        }
    }

    #[test]
    fn accepts_intranet_hosts() {
        for url in [
            "http://intranet",
            "http://intranet/api",
            "http://server1:8080/data",
            "http://myserver/api/v1/users",
            "https://internal-api:3000",
        ] {
            assert!(is_safe(url), "should be valid: {url}");
        }
    }

    #[test]
    fn rejects_dangerous_schemes() {
        for url in [
            "ftp://malicious.com/file",
            "file:///etc/passwd",
            "javascript:alert('XSS')",
            "javascript:alert(1)",
            "data:text/html,<script>alert('XSS')</script>",
            "vbscript:msgbox('XSS')",
        ] {
            assert!(!is_safe(url), "should be rejected: {url}");
        }
    }

    #[test]
    fn rejects_malformed_urls() {
        for url in [
            "",
            "   ",
            "not a url at all",
            "://missing-protocol.com",
            "https://",
            "http://",
            "example.com/no-scheme",
            "http://-leading.example.com",
            "http://trailing-.example.com",
            "http://host:123456",
            "http://exa mple.com",
            "http://example.com/pa th",
        ] {
            assert!(!is_safe(url), "should be rejected: {url}");
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert!(is_safe("  https://example.com/api \n"));
    }

    #[test]
    fn label_length_is_bounded() {
        let ok = format!("http://{}.com", "a".repeat(63));
        let too_long = format!("http://{}.com", "a".repeat(64));
        assert!(is_safe(&ok));
        assert!(!is_safe(&too_long));
    }

    #[test]
    fn lenient_policy_skips_range_checks() {
        assert!(is_safe("http://999.999.999.999"));
        assert!(is_safe("http://example.com:99999/x"));
    }

    #[test]
    fn strict_policy_checks_octets_and_port() {
        let strict = UrlPolicy::Strict;
        assert!(strict.is_safe("http://192.168.1.1:8080/api"));
        assert!(strict.is_safe("http://255.255.255.255"));
        assert!(strict.is_safe("https://api.example.com/v1"));
        assert!(!strict.is_safe("http://999.1.1.1"));
        assert!(!strict.is_safe("http://10.0.0.256/x"));
        assert!(!strict.is_safe("http://host:70000"));
        assert!(!strict.is_safe("javascript:alert(1)"));
    }
}
