use std::path::PathBuf;

use url::Url;
use visit_logic::config::TrackerConfig;
use visit_logic::cookies::JsonCookieStore;
use visit_logic::document::{Document, Element, PageLoad};
use visit_logic::visits::{PageKey, PageTrackingConfig};
use visit_logic::{logging, VisitLogicEngine};

fn main() -> anyhow::Result<()> {
    logging::init_with_default("debug");

    // Cookies live in a JSON file, so running this demo again keeps counting.
    let cookie_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("visit-logic-demo-cookies.json"));
    let cookie_store = JsonCookieStore::new(cookie_path.clone())?;

    let site = Url::parse("https://example.com/")?;
    let config = TrackerConfig::builder().build()?;
    let engine = VisitLogicEngine::with_store(Some(config), &*cookie_store, &site.origin());

    // The pricing page counts its own visits and carries two blocks: a teaser that
    // disappears after the third visit, and a discount that appears from then on.
    let tracking = PageTrackingConfig::new(PageKey::sanitize_or_default("pricing", 42), true);

    for visit in 1..=4 {
        let doc = Document::new(site.join("/pricing")?)
            .with_element(conditional_block("teaser", "pricing", 3, "hide"))
            .with_element(conditional_block("discount", "pricing", 3, "show"));

        let mut load = PageLoad::new(doc);
        engine.load_page(&mut load, Some(&tracking));
        load.content_loaded();

        for el in load.document.elements() {
            let id = el.attribute("id").unwrap_or("?");
            let state = if el.is_hidden() { "hidden" } else { "visible" };
            println!("load #{visit}: {id:<8} {state:<8} style=\"{}\"", el.style.css_text());
        }
    }

    println!(
        "pricing visits so far: {} (cookies in {})",
        engine.evaluator().store().count("pricing"),
        cookie_path.display()
    );

    Ok(())
}

fn conditional_block(id: &str, target: &str, min_visits: u64, mode: &str) -> Element {
    Element::new("div")
        .with_class("cookie-logic-conditional-block")
        .with_attribute("id", id)
        .with_attribute("data-cookie-name", target)
        .with_attribute("data-min-visits", min_visits.to_string())
        .with_attribute("data-visibility-mode", mode)
}
