use std::sync::PoisonError;

use crate::blocks::{ConditionalBlockConfig, VisibilityMode};
use crate::config::TrackerConfig;
use crate::cookies::CookieJarHandle;
use crate::document::{Document, Element};
use crate::visits::{decode, VisitCountStore};

/// Outcome of the visibility decision for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Decides whether a block is visible given the current visit counts.
///
/// A block without a target key is always hidden.
pub fn decide(store: &VisitCountStore, config: &ConditionalBlockConfig) -> Visibility {
    let Some(target) = config.target_key.as_deref() else {
        return Visibility::Hidden;
    };

    let condition_met = store.count(target) >= config.min_visits;
    let visible = match config.mode {
        VisibilityMode::Show => condition_met,
        VisibilityMode::Hide => !condition_met,
    };

    if visible {
        Visibility::Visible
    } else {
        Visibility::Hidden
    }
}

/// Applies a decision to the element's inline style.
///
/// Hiding wins over any stylesheet rule (`display: none !important`). Showing
/// removes the inline `display` so the element falls back to its own layout.
pub fn apply(element: &mut Element, visibility: Visibility) {
    match visibility {
        Visibility::Hidden => element.style.set_property("display", "none", true),
        Visibility::Visible => {
            element.style.remove_property("display");
        }
    }
}

/// Result of evaluating one block, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOutcome {
    /// Position among the conditional blocks of the document
    pub index: usize,
    pub config: ConditionalBlockConfig,
    /// Visit count of the target key (0 when unset)
    pub count: u64,
    pub visibility: Visibility,
}

/// Shows or hides every conditional block of a document.
///
/// Reads the visit cookie once per pass and never writes it.
#[derive(Clone)]
pub struct VisibilityEvaluator {
    jar: CookieJarHandle,
    config: TrackerConfig,
}

impl VisibilityEvaluator {
    pub fn new(jar: CookieJarHandle, config: TrackerConfig) -> Self {
        Self { jar, config }
    }

    /// Current visit counts as seen by this evaluator.
    pub fn store(&self) -> VisitCountStore {
        let raw = self
            .jar
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_cookie(&self.config.cookie_name);
        decode(raw.as_deref())
    }

    pub fn evaluate(&self, document: &mut Document) -> Vec<BlockOutcome> {
        let store = self.store();

        let outcomes: Vec<BlockOutcome> = document
            .elements_by_class_mut(&self.config.block_class)
            .enumerate()
            .map(|(index, element)| {
                let config = ConditionalBlockConfig::from_element(element);
                let count = config.target_key.as_deref().map_or(0, |k| store.count(k));
                let visibility = decide(&store, &config);
                apply(element, visibility);

                log::trace!(
                    "Block #{index}: target={:?} count={count} min={} mode={} -> {visibility:?}",
                    config.target_key,
                    config.min_visits,
                    config.mode,
                );

                BlockOutcome {
                    index,
                    config,
                    count,
                    visibility,
                }
            })
            .collect();

        log::debug!("Evaluated {} conditional block(s) on {}", outcomes.len(), document.url());
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{ATTR_MIN_VISITS, ATTR_TARGET_KEY, ATTR_VISIBILITY_MODE};
    use crate::cookies::DefaultCookieJar;
    use crate::visits::encode;
    use url::Url;

    fn store(pairs: &[(&str, u64)]) -> VisitCountStore {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn block(target: &str, min: &str, mode: &str) -> Element {
        Element::new("div")
            .with_class("cookie-logic-conditional-block")
            .with_attribute(ATTR_TARGET_KEY, target)
            .with_attribute(ATTR_MIN_VISITS, min)
            .with_attribute(ATTR_VISIBILITY_MODE, mode)
    }

    fn evaluator_for(store: &VisitCountStore) -> VisibilityEvaluator {
        let jar = DefaultCookieJar::from_cookie_header(&format!("wp_visit_counts={}", encode(store)));
        VisibilityEvaluator::new(jar.into_handle(), TrackerConfig::default())
    }

    #[test]
    fn show_mode_around_threshold() {
        let t = 3;
        let cfg = ConditionalBlockConfig::new("p", t, VisibilityMode::Show);
        assert_eq!(decide(&store(&[("p", t - 1)]), &cfg), Visibility::Hidden);
        assert_eq!(decide(&store(&[("p", t)]), &cfg), Visibility::Visible);
        assert_eq!(decide(&store(&[("p", t + 1)]), &cfg), Visibility::Visible);
    }

    #[test]
    fn hide_mode_around_threshold() {
        let t = 3;
        let cfg = ConditionalBlockConfig::new("p", t, VisibilityMode::Hide);
        assert_eq!(decide(&store(&[("p", t - 1)]), &cfg), Visibility::Visible);
        assert_eq!(decide(&store(&[("p", t)]), &cfg), Visibility::Hidden);
        assert_eq!(decide(&store(&[("p", t + 1)]), &cfg), Visibility::Hidden);
    }

    #[test]
    fn missing_target_is_always_hidden() {
        let s = store(&[("p", 100)]);
        for mode in [VisibilityMode::Show, VisibilityMode::Hide] {
            for min in [0, 1, 100, 1000] {
                let cfg = ConditionalBlockConfig {
                    target_key: None,
                    min_visits: min,
                    mode,
                };
                assert_eq!(decide(&s, &cfg), Visibility::Hidden);
            }
        }
    }

    #[test]
    fn unvisited_target_counts_zero() {
        let cfg = ConditionalBlockConfig::new("never_seen", 1, VisibilityMode::Show);
        assert_eq!(decide(&VisitCountStore::new(), &cfg), Visibility::Hidden);

        let cfg = ConditionalBlockConfig::new("never_seen", 1, VisibilityMode::Hide);
        assert_eq!(decide(&VisitCountStore::new(), &cfg), Visibility::Visible);
    }

    #[test]
    fn apply_hides_with_priority_and_unhides_by_clearing() {
        let mut el = Element::new("div");
        el.style.set_property("color", "red", false);
        el.style.set_property("display", "flex", false);

        apply(&mut el, Visibility::Hidden);
        let display = el.style.get_property("display").unwrap();
        assert_eq!(display.value, "none");
        assert!(display.important);
        assert!(el.is_hidden());

        apply(&mut el, Visibility::Visible);
        assert!(el.style.get_property("display").is_none());
        assert_eq!(el.style.css_text(), "color: red;");
    }

    #[test]
    fn evaluates_only_conditional_blocks() {
        let evaluator = evaluator_for(&store(&[("page_5", 3)]));
        let mut doc = Document::new(Url::parse("https://example.com/").unwrap())
            .with_element(Element::new("div").with_attribute(ATTR_TARGET_KEY, "page_5"))
            .with_element(block("page_5", "3", "show"));

        let outcomes = evaluator.evaluate(&mut doc);

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].count, 3);
        assert!(doc.elements()[0].style.is_empty());
    }

    #[test]
    fn malformed_threshold_does_not_stop_other_blocks() {
        let evaluator = evaluator_for(&store(&[("a", 1)]));
        let mut doc = Document::new(Url::parse("https://example.com/").unwrap())
            .with_element(block("a", "lots", "hide"))
            .with_element(block("a", "2", "show"));

        let outcomes = evaluator.evaluate(&mut doc);

        assert_eq!(outcomes[0].config.min_visits, 0);
        assert_eq!(outcomes[0].visibility, Visibility::Hidden);
        assert_eq!(outcomes[1].visibility, Visibility::Hidden);
    }

    #[test]
    fn evaluation_never_writes_the_cookie() {
        let s = store(&[("a", 2)]);
        let evaluator = evaluator_for(&s);
        let mut doc = Document::new(Url::parse("https://example.com/").unwrap())
            .with_element(block("a", "1", "show"));

        evaluator.evaluate(&mut doc);
        evaluator.evaluate(&mut doc);

        assert_eq!(evaluator.store(), s);
    }
}
