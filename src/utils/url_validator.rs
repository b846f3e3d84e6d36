//! Redirect target validation.
//!
//! Decides whether a submitted string may become the destination of a short link.
//! The checks run in a fixed order and the first failure is reported. Validation
//! is pure: no DNS lookups, no network access.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Shortest accepted input, in characters.
pub const MIN_URL_LENGTH: usize = 4;

/// Longest accepted input, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

const MAX_HOSTNAME_LENGTH: usize = 253;
const MAX_LABEL_LENGTH: usize = 63;

/// Hosts that must never be redirect targets, together with all their subdomains.
pub const DEFAULT_BLOCKED_HOSTS: &[&str] = &[
    "localhost",
    "127.0.0.1",
    "0.0.0.0",
    "[::1]",
    "internal",
    "local",
];

/// Matches an explicit `scheme://` prefix.
static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap());

static LABEL_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").unwrap());

/// Reasons a URL is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL too short (minimum {MIN_URL_LENGTH} characters)")]
    TooShort,

    #[error("URL too long (max {MAX_URL_LENGTH} characters)")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    Malformed(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedScheme,

    #[error("URL must contain a valid hostname")]
    MissingHost,

    #[error("Invalid hostname: {0}")]
    InvalidHostname(&'static str),

    #[error("Domain '{0}' is not allowed")]
    BlockedHost(String),
}

/// Validator for redirect targets with a configurable host blocklist.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    blocked_hosts: Vec<String>,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self {
            blocked_hosts: DEFAULT_BLOCKED_HOSTS
                .iter()
                .map(|h| h.to_string())
                .collect(),
        }
    }
}

impl UrlValidator {
    /// Creates a validator that blocks the default hosts plus `extra`.
    pub fn with_blocked_hosts<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut validator = Self::default();
        for host in extra {
            let host = host.as_ref().trim().to_ascii_lowercase();
            if !host.is_empty() && !validator.blocked_hosts.contains(&host) {
                validator.blocked_hosts.push(host);
            }
        }
        validator
    }

    /// Validates `raw` and returns the redirect target: `raw` itself, prefixed
    /// with `https://` when it carries no scheme. Nothing else is normalized.
    ///
    /// # Errors
    ///
    /// Returns the first rule the input violates, see [`UrlValidationError`].
    pub fn validate(&self, raw: &str) -> Result<String, UrlValidationError> {
        let length = raw.chars().count();
        if length < MIN_URL_LENGTH {
            return Err(UrlValidationError::TooShort);
        }
        if length > MAX_URL_LENGTH {
            return Err(UrlValidationError::TooLong);
        }

        // The parser strips tabs and newlines silently; the stored target must not carry them.
        if let Some(c) = raw.chars().find(|c| c.is_control() || c.is_whitespace()) {
            return Err(UrlValidationError::Malformed(format!(
                "contains control or whitespace character {c:?}"
            )));
        }

        let candidate = if SCHEME_PREFIX.is_match(raw) {
            raw.to_string()
        } else {
            format!("https://{raw}")
        };

        let url =
            Url::parse(&candidate).map_err(|e| UrlValidationError::Malformed(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(UrlValidationError::UnsupportedScheme);
        }

        let hostname = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => return Err(UrlValidationError::MissingHost),
        };

        validate_hostname(hostname)?;

        if self.is_blocked(hostname) {
            return Err(UrlValidationError::BlockedHost(hostname.to_string()));
        }

        Ok(candidate)
    }

    /// Exact or dot-suffix match against the blocklist.
    ///
    /// `sub.internal` is blocked, `internal-corp.com` and `notlocalhost.com` are not.
    pub fn is_blocked(&self, hostname: &str) -> bool {
        let hostname = hostname.to_ascii_lowercase();
        self.blocked_hosts.iter().any(|blocked| {
            hostname == *blocked
                || hostname
                    .strip_suffix(blocked.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

/// Checks DNS hostname syntax, or accepts a dotted-quad IPv4 address.
fn validate_hostname(hostname: &str) -> Result<(), UrlValidationError> {
    if is_valid_ipv4(hostname) {
        return Ok(());
    }

    if hostname.len() > MAX_HOSTNAME_LENGTH {
        return Err(UrlValidationError::InvalidHostname(
            "hostname too long (max 253 characters)",
        ));
    }
    if hostname.contains("..") {
        return Err(UrlValidationError::InvalidHostname(
            "hostname cannot contain consecutive dots",
        ));
    }
    if hostname.starts_with('.') || hostname.ends_with('.') {
        return Err(UrlValidationError::InvalidHostname(
            "hostname cannot start or end with a dot",
        ));
    }

    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() < 2 {
        return Err(UrlValidationError::InvalidHostname(
            "hostname must be a valid domain or IP address",
        ));
    }

    for label in labels {
        if label.len() > MAX_LABEL_LENGTH {
            return Err(UrlValidationError::InvalidHostname(
                "hostname label too long (max 63 characters)",
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(UrlValidationError::InvalidHostname(
                "hostname labels cannot start or end with a hyphen",
            ));
        }
        if !LABEL_CHARS.is_match(label) {
            return Err(UrlValidationError::InvalidHostname(
                "hostname contains invalid characters",
            ));
        }
    }

    Ok(())
}

/// Dotted-quad IPv4: four octets 0-255, no leading zeros in multi-digit octets.
pub fn is_valid_ipv4(host: &str) -> bool {
    let octets: Vec<&str> = host.split('.').collect();
    if octets.len() != 4 {
        return false;
    }

    octets.iter().all(|octet| {
        !octet.is_empty()
            && octet.len() <= 3
            && octet.bytes().all(|b| b.is_ascii_digit())
            && !(octet.len() > 1 && octet.starts_with('0'))
            && octet.parse::<u16>().is_ok_and(|n| n <= 255)
    })
}
