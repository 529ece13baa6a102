//! Cookie core types.
//!
//! This module defines the **type-erased jar handle** shared by the visit
//! recorder and the visibility evaluator, and the serializable [`Cookie`]
//! record.
//!
//! # Concurrency model
//! - [`CookieJarHandle`] is `Arc<RwLock<dyn CookieJar + Send + Sync>>`.
//!   - Readers take a **read lock**, writers a **write lock**.
//!   - A read-modify-write (fetch, change, store) spans two lock scopes, so two
//!     page loads sharing one jar can interleave and the last write wins. This
//!     mirrors what a browser does with `document.cookie`.
//!
//! # Typical usage
//! ```ignore
//! let raw = jar.read().unwrap().get_cookie("wp_visit_counts");
//! jar.write().unwrap().set_cookie(cookie)?;
//! ```

use std::fmt::{self, Display};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::cookies::CookieJar;

/// A handle to a cookie jar trait.
pub type CookieJarHandle = Arc<RwLock<dyn CookieJar + Send + Sync>>;

/// SameSite policy of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// A cookie as held by a jar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name (case-sensitive).
    pub name: String,

    /// Raw cookie value (already percent-encoded by the writer).
    pub value: String,

    /// Path scoping (e.g., `"/"`).
    pub path: Option<String>,

    /// If `true`, cookie is only sent over HTTPS.
    pub secure: bool,

    /// Expiration timestamp. Session cookies have `None`.
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires: Option<OffsetDateTime>,

    /// SameSite policy.
    pub same_site: Option<SameSite>,
}

impl Cookie {
    /// A session cookie with no attributes set.
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            secure: false,
            expires: None,
            same_site: None,
        }
    }

    /// Returns `true` when the cookie has an expiry at or before `now`.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires.is_some_and(|exp| exp <= now)
    }

    /// Renders the cookie the way a page script assigns it to `document.cookie`:
    /// `name=value; expires=<date>; path=/; SameSite=Lax; Secure`.
    pub fn to_set_cookie_string(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);

        if let Some(expires) = self.expires.and_then(http_date) {
            out.push_str("; expires=");
            out.push_str(&expires);
        }
        if let Some(path) = &self.path {
            out.push_str("; path=");
            out.push_str(path);
        }
        if let Some(same_site) = self.same_site {
            out.push_str(&format!("; SameSite={same_site}"));
        }
        if self.secure {
            out.push_str("; Secure");
        }

        out
    }
}

/// `Expires` attribute format (RFC 7231 IMF-fixdate, as `Date.toUTCString()` prints it).
fn http_date(at: OffsetDateTime) -> Option<String> {
    let format = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    at.to_offset(UtcOffset::UTC).format(format).ok()
}

/// Looks up `name` in a `document.cookie` style header (`a=1; b=2`).
///
/// The value is only returned when the name occurs exactly once; duplicates
/// (e.g. the same cookie set on two paths) are treated as absent.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    let mut found = None;

    for pair in header.split(';') {
        let Some((k, v)) = pair.trim_start().split_once('=') else {
            continue;
        };
        if k == name {
            if found.is_some() {
                return None;
            }
            found = Some(v);
        }
    }

    found
}
