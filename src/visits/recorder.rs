use std::sync::PoisonError;

use time::OffsetDateTime;

use crate::config::TrackerConfig;
use crate::cookies::{Cookie, CookieJarHandle};
use crate::errors::VisitLogicError;
use crate::visits::{decode, encode, PageKey};

/// Tracking settings of one page, as supplied by the site's page settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTrackingConfig {
    /// Whether visits to this page are counted
    pub enabled: bool,
    /// Key the page's visits are counted under
    pub page_key: PageKey,
    /// Whether the page is a single content page (post, page). Archives and
    /// listings are never counted.
    pub singular: bool,
}

impl PageTrackingConfig {
    pub fn new(page_key: PageKey, enabled: bool) -> Self {
        Self {
            enabled,
            page_key,
            singular: true,
        }
    }

    /// Only singular pages with tracking switched on record a visit.
    pub fn should_record(&self) -> bool {
        self.enabled && self.singular
    }
}

/// Counts page views into the shared visit cookie.
///
/// Each call is one read-modify-write of the whole cookie. Two page loads
/// recording at the same time can both read `N` and both write `N + 1`.
#[derive(Clone)]
pub struct VisitRecorder {
    jar: CookieJarHandle,
    config: TrackerConfig,
}

impl VisitRecorder {
    pub fn new(jar: CookieJarHandle, config: TrackerConfig) -> Self {
        Self { jar, config }
    }

    /// Records one visit to `page_key`. Failures are logged, never raised.
    pub fn record(&self, page_key: &PageKey, secure: bool) {
        if let Err(e) = self.try_record(page_key, secure) {
            log::warn!("Visit to {page_key} not recorded: {e}");
        }
    }

    /// Records one visit and returns the new count for `page_key`.
    pub fn try_record(&self, page_key: &PageKey, secure: bool) -> Result<u64, VisitLogicError> {
        self.try_record_at(page_key, secure, OffsetDateTime::now_utc())
    }

    /// Like [`try_record`](Self::try_record), with the cookie expiry counted from `now`.
    pub fn try_record_at(
        &self,
        page_key: &PageKey,
        secure: bool,
        now: OffsetDateTime,
    ) -> Result<u64, VisitLogicError> {
        let raw = self
            .jar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_cookie(&self.config.cookie_name);

        let mut store = decode(raw.as_deref());
        let count = store.increment(page_key.as_str());

        let cookie = Cookie {
            name: self.config.cookie_name.clone(),
            value: encode(&store),
            path: Some(self.config.path.clone()),
            secure,
            expires: Some(now + self.config.ttl),
            same_site: Some(self.config.same_site),
        };
        log::trace!("Writing visit cookie: {}", cookie.to_set_cookie_string());

        self.jar
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_cookie(cookie)?;

        log::info!("Recorded visit {count} to {page_key}");
        Ok(count)
    }
}
