use crate::blocks::VisibilityEvaluator;
use crate::config::TrackerConfig;
use crate::cookies::{CookieJarHandle, CookieStore};
use crate::document::PageLoad;
use crate::visits::{PageTrackingConfig, VisitRecorder};

/// Entry point: one client's cookie jar plus the tracker configuration.
///
/// The recorder and the evaluator it hands out share nothing but the jar.
pub struct VisitLogicEngine {
    config: TrackerConfig,
    jar: CookieJarHandle,
}

impl VisitLogicEngine {
    /// Creates an engine over `jar`. Can use None when using the default configuration.
    pub fn new(config: Option<TrackerConfig>, jar: CookieJarHandle) -> Self {
        Self {
            config: config.unwrap_or_default(),
            jar,
        }
    }

    /// Creates an engine over the persisted jar of `site` in `store`.
    pub fn with_store(config: Option<TrackerConfig>, store: &dyn CookieStore, site: &url::Origin) -> Self {
        Self::new(config, store.jar_for(site))
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn jar(&self) -> CookieJarHandle {
        self.jar.clone()
    }

    pub fn recorder(&self) -> VisitRecorder {
        VisitRecorder::new(self.jar.clone(), self.config.clone())
    }

    pub fn evaluator(&self) -> VisibilityEvaluator {
        VisibilityEvaluator::new(self.jar.clone(), self.config.clone())
    }

    /// Schedules the per-load work behind the document's readiness: first
    /// the visit (when `tracking` says this page counts), then the blocks.
    pub fn load_page(&self, page: &mut PageLoad, tracking: Option<&PageTrackingConfig>) {
        if let Some(tracking) = tracking.filter(|t| t.should_record()) {
            let recorder = self.recorder();
            let page_key = tracking.page_key.clone();
            page.when_ready(move |doc| recorder.record(&page_key, doc.is_secure()));
        } else {
            log::debug!("Page {} is not tracked", page.document.url());
        }

        let evaluator = self.evaluator();
        page.when_ready(move |doc| {
            evaluator.evaluate(doc);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{ATTR_MIN_VISITS, ATTR_TARGET_KEY, ATTR_VISIBILITY_MODE};
    use crate::cookies::{CookieJar, DefaultCookieJar, JsonCookieStore, NullCookieJar};
    use crate::document::{Document, Element, ReadyState};
    use crate::visits::{decode, encode, PageKey, VisitCountStore};
    use url::Url;

    fn store(pairs: &[(&str, u64)]) -> VisitCountStore {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn jar_with(store: &VisitCountStore) -> CookieJarHandle {
        DefaultCookieJar::from_cookie_header(&format!("wp_visit_counts={}", encode(store))).into_handle()
    }

    fn stored(jar: &CookieJarHandle) -> VisitCountStore {
        decode(jar.read().unwrap().get_cookie("wp_visit_counts").as_deref())
    }

    fn block(target: &str, min: u64, mode: &str) -> Element {
        Element::new("div")
            .with_class("cookie-logic-conditional-block")
            .with_attribute(ATTR_TARGET_KEY, target)
            .with_attribute(ATTR_MIN_VISITS, min.to_string())
            .with_attribute(ATTR_VISIBILITY_MODE, mode)
    }

    fn page(url: &str, blocks: Vec<Element>) -> PageLoad {
        let mut doc = Document::new(Url::parse(url).unwrap());
        for b in blocks {
            doc.push(b);
        }
        PageLoad::new(doc)
    }

    fn tracked(key: &str) -> PageTrackingConfig {
        PageTrackingConfig::new(PageKey::new(key).unwrap(), true)
    }

    #[test]
    fn first_load_of_tracked_page() {
        let jar = DefaultCookieJar::new().into_handle();
        let engine = VisitLogicEngine::new(None, jar.clone());

        let mut load = page("https://example.com/page-5", vec![]);
        engine.load_page(&mut load, Some(&tracked("page_5")));
        load.content_loaded();

        assert_eq!(stored(&jar), store(&[("page_5", 1)]));
    }

    #[test]
    fn nothing_runs_before_content_loaded() {
        let jar = jar_with(&store(&[("page_5", 3)]));
        let engine = VisitLogicEngine::new(None, jar.clone());

        let mut load = page("https://example.com/", vec![block("page_5", 4, "show")]);
        engine.load_page(&mut load, Some(&tracked("page_5")));

        assert_eq!(stored(&jar).count("page_5"), 3);
        assert!(load.document.elements()[0].style.is_empty());

        load.content_loaded();
        assert_eq!(stored(&jar).count("page_5"), 4);
        assert!(!load.document.elements()[0].is_hidden());
    }

    #[test]
    fn block_visible_at_threshold() {
        let engine = VisitLogicEngine::new(None, jar_with(&store(&[("page_5", 3)])));
        let mut load = page("https://example.com/", vec![block("page_5", 3, "show")]);
        engine.load_page(&mut load, None);
        load.content_loaded();

        assert!(!load.document.elements()[0].is_hidden());
    }

    #[test]
    fn block_hidden_below_threshold() {
        let engine = VisitLogicEngine::new(None, jar_with(&store(&[("page_5", 3)])));
        let mut load = page("https://example.com/", vec![block("page_5", 4, "show")]);
        engine.load_page(&mut load, None);
        load.content_loaded();

        assert!(load.document.elements()[0].is_hidden());
    }

    #[test]
    fn hide_mode_suppresses_when_met() {
        let engine = VisitLogicEngine::new(None, jar_with(&store(&[("page_5", 3)])));
        let mut load = page("https://example.com/", vec![block("page_5", 3, "hide")]);
        engine.load_page(&mut load, None);
        load.content_loaded();

        assert!(load.document.elements()[0].is_hidden());
    }

    #[test]
    fn blocks_with_different_targets_are_independent() {
        let engine = VisitLogicEngine::new(None, jar_with(&store(&[("page_5", 3), ("pricing", 1)])));
        let mut load = page(
            "https://example.com/",
            vec![block("page_5", 2, "show"), block("pricing", 2, "show")],
        );
        engine.load_page(&mut load, None);
        load.content_loaded();

        let els = load.document.elements();
        assert!(!els[0].is_hidden());
        assert!(els[1].is_hidden());
    }

    #[test]
    fn block_on_the_tracked_page_sees_this_visit() {
        let jar = DefaultCookieJar::new().into_handle();
        let engine = VisitLogicEngine::new(None, jar);

        let mut load = page("https://example.com/", vec![block("page_5", 1, "show")]);
        engine.load_page(&mut load, Some(&tracked("page_5")));
        load.content_loaded();

        assert!(!load.document.elements()[0].is_hidden());
    }

    #[test]
    fn untracked_and_non_singular_pages_do_not_count() {
        let jar = DefaultCookieJar::new().into_handle();
        let engine = VisitLogicEngine::new(None, jar.clone());

        let mut disabled = PageTrackingConfig::new(PageKey::new("page_5").unwrap(), false);
        let mut load = page("https://example.com/", vec![]);
        engine.load_page(&mut load, Some(&disabled));
        load.content_loaded();

        disabled.enabled = true;
        disabled.singular = false;
        let mut load = page("https://example.com/archive", vec![]);
        engine.load_page(&mut load, Some(&disabled));
        load.content_loaded();

        assert!(stored(&jar).is_empty());
    }

    #[test]
    fn secure_flag_follows_page_scheme() {
        let jar = DefaultCookieJar::new().into_handle();
        let engine = VisitLogicEngine::new(None, jar.clone());

        let mut load = page("https://example.com/", vec![]);
        engine.load_page(&mut load, Some(&tracked("page_5")));
        load.content_loaded();
        {
            let guard = jar.read().unwrap();
            let default = guard.as_any().downcast_ref::<DefaultCookieJar>().unwrap();
            assert!(default.cookie("wp_visit_counts").unwrap().secure);
        }

        let mut load = page("http://example.com/", vec![]);
        engine.load_page(&mut load, Some(&tracked("page_5")));
        load.content_loaded();

        let guard = jar.read().unwrap();
        let default = guard.as_any().downcast_ref::<DefaultCookieJar>().unwrap();
        assert!(!default.cookie("wp_visit_counts").unwrap().secure);
    }

    #[test]
    fn blocked_cookies_degrade_to_zero_counts() {
        let engine = VisitLogicEngine::new(None, NullCookieJar.into_handle());
        let mut load = page(
            "https://example.com/",
            vec![block("page_5", 1, "show"), block("page_5", 1, "hide")],
        );
        engine.load_page(&mut load, Some(&tracked("page_5")));
        load.content_loaded();

        let els = load.document.elements();
        assert!(els[0].is_hidden());
        assert!(!els[1].is_hidden());
    }

    #[test]
    fn counts_persist_across_page_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let site = Url::parse("https://example.com/").unwrap().origin();

        for _ in 0..3 {
            let cookie_store = JsonCookieStore::new(path.clone()).unwrap();
            let engine = VisitLogicEngine::with_store(None, &*cookie_store, &site);
            let mut load = page("https://example.com/page-5", vec![]);
            engine.load_page(&mut load, Some(&tracked("page_5")));
            load.content_loaded();
        }

        let cookie_store = JsonCookieStore::new(path).unwrap();
        let engine = VisitLogicEngine::with_store(None, &*cookie_store, &site);
        let mut doc = Document::new(Url::parse("https://example.com/").unwrap())
            .with_element(block("page_5", 3, "show"));
        doc.ready_state = ReadyState::Complete;
        let mut load = PageLoad::new(doc);
        engine.load_page(&mut load, None);

        assert_eq!(engine.evaluator().store().count("page_5"), 3);
        assert!(!load.document.elements()[0].is_hidden());
    }
}
