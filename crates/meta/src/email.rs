// Email address validation for audit properties

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated email address.
///
/// Deliberately stricter than RFC 5321 (no quoted local parts, no address
/// literals): metadata audit fields hold ordinary user addresses, and a
/// typo'd address should fail at `set` time, not when someone tries to
/// contact the document owner.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress {
    address: String,
}

/// Characters allowed in the local part besides alphanumerics.
const LOCAL_SPECIALS: &str = "!#$%&'*+/=?^_`{|}~-";

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<EmailAddress, EmailAddressError> {
        if raw.is_empty() {
            return Err(EmailAddressError::Empty);
        }

        let mut halves = raw.splitn(2, '@');
        let local = halves.next().unwrap_or("");
        let domain = match halves.next() {
            Some(domain) => domain,
            None => return Err(EmailAddressError::MissingAt),
        };

        if local.is_empty() || local.len() > 64 {
            return Err(EmailAddressError::InvalidLocalPart);
        }
        if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
            return Err(EmailAddressError::InvalidLocalPart);
        }
        let local_ok = local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || LOCAL_SPECIALS.contains(c));
        if !local_ok {
            return Err(EmailAddressError::InvalidLocalPart);
        }

        if domain.is_empty() || domain.len() > 255 || !domain.contains('.') {
            return Err(EmailAddressError::InvalidDomain);
        }
        for label in domain.split('.') {
            let label_ok = !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
            if !label_ok {
                return Err(EmailAddressError::InvalidDomain);
            }
        }

        Ok(EmailAddress { address: raw.to_string() })
    }

    pub fn as_str(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

impl std::str::FromStr for EmailAddress {
    type Err = EmailAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmailAddress::parse(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailAddressError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        EmailAddress::parse(&raw)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> String {
        email.address
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailAddressError {
    Empty,
    MissingAt,
    InvalidLocalPart,
    InvalidDomain,
}

impl fmt::Display for EmailAddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Address is empty"),
            Self::MissingAt => write!(f, "Address has no @"),
            Self::InvalidLocalPart => write!(f, "Invalid local part"),
            Self::InvalidDomain => write!(f, "Invalid domain"),
        }
    }
}

impl std::error::Error for EmailAddressError {}
