//! Cookie-backed page visit counting and conditional block visibility.
//!
//! A [`VisitRecorder`](visits::VisitRecorder) counts views of tracked pages
//! into a single cookie; a [`VisibilityEvaluator`](blocks::VisibilityEvaluator)
//! reads the same cookie to show or hide conditional blocks. The two only
//! meet through the [`CookieJarHandle`](cookies::CookieJarHandle).
//!
//! ```rust
//! use url::Url;
//! use visit_logic::cookies::DefaultCookieJar;
//! use visit_logic::document::{Document, Element, PageLoad};
//! use visit_logic::visits::{PageKey, PageTrackingConfig};
//! use visit_logic::VisitLogicEngine;
//!
//! let engine = VisitLogicEngine::new(None, DefaultCookieJar::new().into_handle());
//!
//! let doc = Document::new(Url::parse("https://example.com/pricing").unwrap()).with_element(
//!     Element::new("div")
//!         .with_class("cookie-logic-conditional-block")
//!         .with_attribute("data-cookie-name", "pricing")
//!         .with_attribute("data-min-visits", "2")
//!         .with_attribute("data-visibility-mode", "show"),
//! );
//! let tracking = PageTrackingConfig::new(PageKey::new("pricing").unwrap(), true);
//!
//! let mut load = PageLoad::new(doc);
//! engine.load_page(&mut load, Some(&tracking));
//! load.content_loaded();
//!
//! // First visit: the block wants two.
//! assert!(load.document.elements()[0].is_hidden());
//! ```

pub mod blocks;
pub mod config;
pub mod cookies;
pub mod document;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod visits;

pub use engine::VisitLogicEngine;
pub use errors::VisitLogicError;
