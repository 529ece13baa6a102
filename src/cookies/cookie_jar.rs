//! Cookie jar abstraction and simple implementations.
//!
//! A **cookie jar** holds the cookies one client keeps for a site. It is the
//! only shared state between the visit recorder (writer) and the visibility
//! evaluator (reader).
//!
//! This module defines the [`CookieJar`] trait and two implementations:
//! - [`DefaultCookieJar`]: in-memory, honours `Expires` on read.
//! - [`NullCookieJar`]: a client with cookies disabled. Reads see nothing and
//!   writes are refused with [`CookieError::Blocked`].
//!
//! Neither is internally synchronized. Use them through a
//! [`CookieJarHandle`](crate::cookies::CookieJarHandle).

use std::any::Any;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config::is_valid_cookie_name;
use crate::cookies::{cookie_value, Cookie, CookieJarHandle};
use crate::errors::CookieError;

/// A cookie jar keeps the cookies of one client for one site.
///
/// ### Type erasure
/// `as_any` enables downcasting when callers need the concrete jar
/// (e.g. for snapshotting into a persistent store).
pub trait CookieJar: Send + Sync {
    /// Returns a type-erased reference to the jar.
    fn as_any(&self) -> &dyn Any;

    /// Returns the `document.cookie` view of the jar (`a=1; b=2`), or `None`
    /// when no live cookie is present.
    fn cookie_header(&self) -> Option<String>;

    /// Stores `cookie`, replacing any cookie with the same name.
    ///
    /// A cookie whose expiry already passed removes the existing entry instead.
    fn set_cookie(&mut self, cookie: Cookie) -> Result<(), CookieError>;

    /// Removes the cookie named `name`, if present.
    fn remove_cookie(&mut self, name: &str);

    /// Removes all cookies from the jar.
    fn clear(&mut self);

    /// Returns the raw value of the cookie named `name`.
    fn get_cookie(&self, name: &str) -> Option<String> {
        let header = self.cookie_header()?;
        cookie_value(&header, name).map(str::to_string)
    }
}

/// In-memory cookie jar.
///
/// Cookies are kept in insertion order, which is also the order of the
/// `document.cookie` header. Expired cookies are skipped on read and dropped on
/// the next write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultCookieJar {
    pub entries: Vec<Cookie>,
}

impl DefaultCookieJar {
    /// Creates an empty in-memory cookie jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a jar from a `document.cookie` style header. All cookies are
    /// session cookies without attributes.
    pub fn from_cookie_header(header: &str) -> Self {
        let mut jar = Self::new();
        for pair in header.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if is_valid_cookie_name(name) {
                    jar.upsert(Cookie::new(name, value));
                }
            }
        }
        jar
    }

    /// Wraps the jar into a shareable handle.
    pub fn into_handle(self) -> CookieJarHandle {
        Arc::new(RwLock::new(self))
    }

    /// Returns the stored cookie named `name`, expired or not.
    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.entries.iter().find(|c| c.name == name)
    }

    fn upsert(&mut self, cookie: Cookie) {
        match self.entries.iter_mut().find(|c| c.name == cookie.name) {
            Some(existing) => *existing = cookie,
            None => self.entries.push(cookie),
        }
    }
}

impl CookieJar for DefaultCookieJar {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn cookie_header(&self) -> Option<String> {
        let now = OffsetDateTime::now_utc();
        let header = self
            .entries
            .iter()
            .filter(|c| !c.is_expired_at(now))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");

        if header.is_empty() {
            None
        } else {
            Some(header)
        }
    }

    fn set_cookie(&mut self, cookie: Cookie) -> Result<(), CookieError> {
        if !is_valid_cookie_name(&cookie.name) {
            return Err(CookieError::InvalidName(cookie.name));
        }

        let now = OffsetDateTime::now_utc();
        self.entries.retain(|c| !c.is_expired_at(now));

        if cookie.is_expired_at(now) {
            self.remove_cookie(&cookie.name);
        } else {
            self.upsert(cookie);
        }
        Ok(())
    }

    fn remove_cookie(&mut self, name: &str) {
        self.entries.retain(|c| c.name != name);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Cookie jar of a client that refuses cookies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCookieJar;

impl NullCookieJar {
    pub fn into_handle(self) -> CookieJarHandle {
        Arc::new(RwLock::new(self))
    }
}

impl CookieJar for NullCookieJar {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn cookie_header(&self) -> Option<String> {
        None
    }

    fn set_cookie(&mut self, _cookie: Cookie) -> Result<(), CookieError> {
        Err(CookieError::Blocked)
    }

    fn remove_cookie(&mut self, _name: &str) {}

    fn clear(&mut self) {}
}
