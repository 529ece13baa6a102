//! Rendered page model: a [`Document`] of [`Element`]s and the [`PageLoad`]
//! that sequences work behind the document's readiness.

mod element;
mod ready;

use url::Url;

pub use element::{Element, InlineStyle, StyleDeclaration};
pub use ready::{GateState, ReadyGate};

/// Loading state of a document, as `document.readyState` reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

#[derive(Debug, Clone)]
pub struct Document {
    url: Url,
    pub ready_state: ReadyState,
    elements: Vec<Element>,
}

impl Document {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            ready_state: ReadyState::Loading,
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whether the page was loaded over an encrypted transport.
    pub fn is_secure(&self) -> bool {
        self.url.scheme() == "https"
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Elements carrying `class`, in document order.
    pub fn elements_by_class_mut<'a>(&'a mut self, class: &'a str) -> impl Iterator<Item = &'a mut Element> + 'a {
        self.elements.iter_mut().filter(move |e| e.has_class(class))
    }
}

/// One load of a document.
///
/// Holds the document and the gate that defers work until the document
/// structure exists. A document that is no longer `Loading` starts with an
/// open gate.
#[derive(Debug)]
pub struct PageLoad {
    pub document: Document,
    gate: ReadyGate<Document>,
}

impl PageLoad {
    pub fn new(document: Document) -> Self {
        let gate = match document.ready_state {
            ReadyState::Loading => ReadyGate::pending(),
            ReadyState::Interactive | ReadyState::Complete => ReadyGate::ready(),
        };
        Self { document, gate }
    }

    /// Runs `callback` once the document structure is ready.
    pub fn when_ready(&mut self, callback: impl FnOnce(&mut Document) + 'static) {
        self.gate.when_ready(&mut self.document, callback);
    }

    /// The document finished parsing (`DOMContentLoaded`).
    pub fn content_loaded(&mut self) {
        if self.document.ready_state == ReadyState::Loading {
            self.document.ready_state = ReadyState::Interactive;
        }
        self.gate.open(&mut self.document);
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }
}
