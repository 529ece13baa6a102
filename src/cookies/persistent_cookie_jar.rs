use std::any::Any;
use std::sync::PoisonError;

use crate::cookies::store::WeakCookieStoreHandle;
use crate::cookies::{Cookie, CookieJar, CookieJarHandle, DefaultCookieJar};
use crate::errors::CookieError;

/// A `CookieJar` decorator that persists changes after each mutation.
///
/// Reads go straight to the inner jar; every write is followed by a snapshot
/// pushed to the backing store. A write whose snapshot cannot be persisted is
/// rolled back, so the jar never shows state the store does not have.
///
/// The jar only holds a weak reference to its store. Once the store is
/// dropped, writes fail with [`CookieError::Store`].
pub struct PersistentCookieJar {
    /// Store key of the site this jar belongs to.
    site: String,
    /// Inner cookie jar that holds the actual cookie state.
    pub inner: CookieJarHandle,
    /// Cookie store responsible for persistence.
    store_handle: WeakCookieStoreHandle,
}

impl PersistentCookieJar {
    pub fn new(site: String, jar: CookieJarHandle, store_handle: WeakCookieStoreHandle) -> Self {
        Self {
            site,
            inner: jar,
            store_handle,
        }
    }

    fn snapshot(&self) -> Result<DefaultCookieJar, CookieError> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner
            .as_any()
            .downcast_ref::<DefaultCookieJar>()
            .cloned()
            .ok_or_else(|| CookieError::Store(format!("jar for {} cannot be snapshotted", self.site)))
    }

    /// Snapshots the inner jar and persists it to the backing store.
    fn persist(&self) -> Result<(), CookieError> {
        let snapshot = self.snapshot()?;
        let store = self
            .store_handle
            .upgrade()
            .ok_or_else(|| CookieError::Store(format!("cookie store for {} was dropped", self.site)))?;

        store
            .persist_site_from_snapshot(&self.site, &snapshot)
            .map_err(|e| CookieError::Store(format!("{e:#}")))
    }

    /// Puts the inner jar back to `previous`.
    fn restore(&self, previous: DefaultCookieJar) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.clear();
        for cookie in previous.entries {
            if let Err(e) = inner.set_cookie(cookie) {
                log::warn!("Cookie jar for {}: cannot restore cookie: {e}", self.site);
            }
        }
    }
}

impl CookieJar for PersistentCookieJar {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn cookie_header(&self) -> Option<String> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).cookie_header()
    }

    /// Stores the cookie and persists the updated state, or leaves the jar
    /// untouched when persisting fails.
    fn set_cookie(&mut self, cookie: Cookie) -> Result<(), CookieError> {
        let previous = self.snapshot()?;
        self.inner.write().unwrap_or_else(PoisonError::into_inner).set_cookie(cookie)?;

        if let Err(e) = self.persist() {
            self.restore(previous);
            return Err(e);
        }
        Ok(())
    }

    fn remove_cookie(&mut self, name: &str) {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).remove_cookie(name);
        if let Err(e) = self.persist() {
            log::warn!("Cookie jar for {}: cannot persist removal of {name}: {e}", self.site);
        }
    }

    fn clear(&mut self) {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).clear();
        if let Err(e) = self.persist() {
            log::warn!("Cookie jar for {}: cannot persist clear: {e}", self.site);
        }
    }
}
