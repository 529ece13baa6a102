use std::fmt::{self, Display};

use crate::errors::ConfigError;

/// Identifier of a tracked page inside the visit count store.
///
/// Always non-empty and made of ASCII alphanumerics and underscores, so it
/// needs no escaping inside the cookie payload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageKey(String);

impl PageKey {
    pub fn new<S: Into<String>>(key: S) -> Result<Self, ConfigError> {
        let key = key.into();
        if is_valid_page_key(&key) {
            Ok(Self(key))
        } else {
            Err(ConfigError::InvalidPageKey(key))
        }
    }

    /// Default key for a page without a configured one: `page_<id>`.
    pub fn for_page_id(id: u64) -> Self {
        Self(format!("page_{id}"))
    }

    /// Strips every character that is not allowed in a key.
    ///
    /// Returns `None` when nothing is left.
    pub fn sanitize(raw: &str) -> Option<Self> {
        let key: String = raw.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_').collect();
        (!key.is_empty()).then_some(Self(key))
    }

    /// Sanitizes `raw`, falling back to the page's default key.
    pub fn sanitize_or_default(raw: &str, page_id: u64) -> Self {
        Self::sanitize(raw).unwrap_or_else(|| Self::for_page_id(page_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn is_valid_page_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for PageKey {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
