// Built-in format validators

use crate::FormatValidator;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

// Scheme, a host with at least one dotted alphabetic suffix, optional port and path.
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[A-Za-z0-9][A-Za-z0-9-]*(\.[A-Za-z]+)+(:[0-9]+)?(/\S*)?$").unwrap()
});

static DOMAIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$").unwrap()
});

static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$").unwrap());

// RFC 5321 dot-atom; quoted strings are not accepted.
static LOCAL_PART_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$").unwrap()
});

static HOST_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").unwrap()
});

const MAX_ADDRESS_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 253;

/// Validates `http://` and `https://` URLs on a dotted host name
pub struct IsUrl;

impl FormatValidator for IsUrl {
    fn is_valid(&self, value: &str) -> bool {
        URL_REGEX.is_match(value)
    }

    fn name(&self) -> &'static str {
        "isUrl"
    }

    fn default_message(&self, field: &str) -> String {
        format!("{} should be a URL and start with http:// or https://", field)
    }
}

/// Validates fully qualified domain names
pub struct IsDomain;

impl FormatValidator for IsDomain {
    fn is_valid(&self, value: &str) -> bool {
        DOMAIN_REGEX.is_match(value)
    }

    fn name(&self) -> &'static str {
        "isDomain"
    }

    fn default_message(&self, field: &str) -> String {
        format!("{} should be a FQDN such as example.com or my.example.org", field)
    }
}

/// Validates lowercase slug-like tokens such as `yay-pie`
pub struct IsToken;

impl FormatValidator for IsToken {
    fn is_valid(&self, value: &str) -> bool {
        TOKEN_REGEX.is_match(value)
    }

    fn name(&self) -> &'static str {
        "isToken"
    }

    fn default_message(&self, field: &str) -> String {
        format!(
            "{} should start and end with letters/numbers and contain only lowercase letters, numbers and dashes",
            field
        )
    }
}

/// How permissive the mailbox check is about the top-level label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProfile {
    /// Numeric-only top-level labels (`me@t.123`) are rejected
    #[default]
    Strict,
    /// Numeric-only top-level labels are accepted
    Loose,
}

impl FromStr for EmailProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(EmailProfile::Strict),
            "loose" => Ok(EmailProfile::Loose),
            other => Err(format!("unknown email profile '{}'", other)),
        }
    }
}

impl fmt::Display for EmailProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmailProfile::Strict => f.write_str("strict"),
            EmailProfile::Loose => f.write_str("loose"),
        }
    }
}

/// Validates mailbox syntax: `local-part@domain`.
///
/// Quoted local parts and bracketed address literals are rejected. A
/// single-label domain (`user@localhost`) is accepted.
pub struct IsEmailAddress(pub EmailProfile);

impl IsEmailAddress {
    fn domain_is_valid(&self, domain: &str) -> bool {
        if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
            return false;
        }
        if !domain.split('.').all(|label| HOST_LABEL_REGEX.is_match(label)) {
            return false;
        }

        let tld = domain.rsplit('.').next().unwrap_or_default();
        let numeric_tld = tld.bytes().all(|b| b.is_ascii_digit());
        !numeric_tld || self.0 == EmailProfile::Loose
    }
}

impl Default for IsEmailAddress {
    fn default() -> Self {
        Self(EmailProfile::Strict)
    }
}

impl FormatValidator for IsEmailAddress {
    fn is_valid(&self, value: &str) -> bool {
        if value.len() > MAX_ADDRESS_LEN {
            return false;
        }
        let Some((local, domain)) = value.rsplit_once('@') else {
            return false;
        };
        if local.is_empty() || local.len() > MAX_LOCAL_PART_LEN {
            return false;
        }

        LOCAL_PART_REGEX.is_match(local) && self.domain_is_valid(domain)
    }

    fn name(&self) -> &'static str {
        "isEmailAddress"
    }

    fn default_message(&self, field: &str) -> String {
        format!("{} should be an Email Address", field)
    }
}
