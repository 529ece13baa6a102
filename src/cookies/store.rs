//! Cookie store infrastructure.
//!
//! A **cookie store** provisions per-site cookie jars and persists them so the
//! visit counts survive between page loads that do not share memory (separate
//! processes, restarts). The engine only ever holds a
//! [`CookieJarHandle`]; the store is used to obtain it.
//!
//! Jars only point back at their store weakly, so the store must outlive the
//! jars that are still written to.
//!
//! ## Example
//! ```rust,no_run
//! use url::Url;
//! use visit_logic::cookies::{CookieStore, JsonCookieStore};
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = JsonCookieStore::new("cookies.json".into())?;
//! let site = Url::parse("https://example.com/")?.origin();
//! let jar = store.jar_for(&site);
//! # Ok(()) }
//! ```
mod json;

use std::sync::{Arc, Weak};

use crate::cookies::{CookieJarHandle, DefaultCookieJar};

pub use json::JsonCookieStore;

/// A handle to a cookie store trait.
pub type CookieStoreHandle = Arc<dyn CookieStore + Send + Sync>;

/// Non-owning store handle held by the jars a store hands out.
pub type WeakCookieStoreHandle = Weak<dyn CookieStore + Send + Sync>;

/// A cookie **store** mints per-site cookie **jars** and persists them.
///
/// Implementations must be `Send + Sync`, internally synchronized, and must
/// not panic on storage failures.
pub trait CookieStore: Send + Sync {
    /// Returns (or creates and returns) the jar for `site`.
    ///
    /// Must return the *same logical jar* for a site across calls so every
    /// holder observes consistent state.
    fn jar_for(&self, site: &url::Origin) -> CookieJarHandle;

    /// Persists the state of `site` from a snapshot, replacing what is stored.
    fn persist_site_from_snapshot(&self, site: &str, snapshot: &DefaultCookieJar) -> anyhow::Result<()>;

    /// Removes all persisted cookies for `site`. Idempotent.
    fn remove_site(&self, site: &url::Origin) -> anyhow::Result<()>;
}

/// Storage key of a site: its ASCII origin serialization (`https://example.com`).
pub(crate) fn site_key(site: &url::Origin) -> String {
    site.ascii_serialization()
}
