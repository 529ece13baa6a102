//! Tracker configuration.
//!
//! `TrackerConfig` names the shared visit cookie and the attributes it is
//! written with, plus the class used to discover conditional blocks in a
//! document. The defaults match the cookie contract the page scripts expect:
//!
//! - cookie name `wp_visit_counts`
//! - time-to-live of 180 days, refreshed on every write
//! - `Path=/`, `SameSite=Lax`
//! - conditional blocks carry the class `cookie-logic-conditional-block`
//!
//! # Examples
//!
//! ```rust
//! use visit_logic::config::TrackerConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = TrackerConfig::builder()
//!     .cookie_name("site_visits")
//!     .ttl_days(30)
//!     .build()?;
//! assert_eq!(cfg.cookie_name, "site_visits");
//! # Ok(()) }
//! ```

use crate::cookies::SameSite;
use crate::errors::ConfigError;
use time::Duration;

/// Name of the cookie that holds every page's visit count.
pub const DEFAULT_COOKIE_NAME: &str = "wp_visit_counts";

/// 180 days, in seconds.
pub const DEFAULT_TTL_SECS: i64 = 15_552_000;

/// Class carried by every conditional block element.
pub const DEFAULT_BLOCK_CLASS: &str = "cookie-logic-conditional-block";

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Name of the shared visit count cookie
    pub cookie_name: String,
    /// How long a written cookie lives, counted from the write
    pub ttl: Duration,
    /// Cookie `Path` attribute
    pub path: String,
    /// Cookie `SameSite` attribute
    pub same_site: SameSite,
    /// Class used to discover conditional blocks
    pub block_class: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            ttl: Duration::seconds(DEFAULT_TTL_SECS),
            path: "/".to_string(),
            same_site: SameSite::Lax,
            block_class: DEFAULT_BLOCK_CLASS.to_string(),
        }
    }
}

impl TrackerConfig {
    pub fn builder() -> TrackerConfigBuilder {
        TrackerConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrackerConfigBuilder {
    inner: TrackerConfig,
}

impl TrackerConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut TrackerConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn cookie_name<S: Into<String>>(self, name: S) -> Self { self.map(|c| c.cookie_name = name.into()) }
    pub fn ttl(self, ttl: Duration) -> Self { self.map(|c| c.ttl = ttl) }
    pub fn ttl_days(self, days: i64) -> Self { self.map(|c| c.ttl = Duration::days(days)) }
    pub fn path<S: Into<String>>(self, path: S) -> Self { self.map(|c| c.path = path.into()) }
    pub fn same_site(self, same_site: SameSite) -> Self { self.map(|c| c.same_site = same_site) }
    pub fn block_class<S: Into<String>>(self, class: S) -> Self { self.map(|c| c.block_class = class.into()) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut TrackerConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<TrackerConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

/// A cookie name is an RFC 6265 token: visible ASCII without separators.
pub(crate) fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic()
                && !matches!(
                    b,
                    b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"' | b'/'
                        | b'[' | b']' | b'?' | b'=' | b'{' | b'}'
                )
        })
}

fn validate(c: &TrackerConfig) -> Result<(), ConfigError> {
    if !is_valid_cookie_name(&c.cookie_name) {
        return Err(ConfigError::InvalidCookieName(c.cookie_name.clone()));
    }
    if c.ttl <= Duration::ZERO {
        return Err(ConfigError::NonPositiveTtl);
    }
    if !c.path.starts_with('/') {
        return Err(ConfigError::InvalidPath(c.path.clone()));
    }
    if c.block_class.trim().is_empty() {
        return Err(ConfigError::EmptyBlockClass);
    }
    Ok(())
}
