use std::collections::BTreeMap;

/// One declaration of an element's inline `style` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDeclaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// Inline style of an element, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<StyleDeclaration>,
}

impl InlineStyle {
    /// Sets (or replaces) a declaration.
    pub fn set_property(&mut self, property: &str, value: &str, important: bool) {
        let decl = StyleDeclaration {
            property: property.to_string(),
            value: value.to_string(),
            important,
        };
        match self.declarations.iter_mut().find(|d| d.property == property) {
            Some(existing) => *existing = decl,
            None => self.declarations.push(decl),
        }
    }

    /// Removes a declaration, returning its old value.
    pub fn remove_property(&mut self, property: &str) -> Option<String> {
        let idx = self.declarations.iter().position(|d| d.property == property)?;
        Some(self.declarations.remove(idx).value)
    }

    pub fn get_property(&self, property: &str) -> Option<&StyleDeclaration> {
        self.declarations.iter().find(|d| d.property == property)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serializes the declarations the way `style.cssText` does.
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|d| {
                if d.important {
                    format!("{}: {} !important;", d.property, d.value)
                } else {
                    format!("{}: {};", d.property, d.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A rendered element, reduced to what the visibility adapter needs:
/// its class list, its attributes and its inline style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    pub style: InlineStyle,
}

impl Element {
    pub fn new<S: Into<String>>(tag: S) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_class<S: Into<String>>(mut self, class: S) -> Self {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Whether the element is hidden through an inline `display: none`.
    pub fn is_hidden(&self) -> bool {
        self.style.get_property("display").is_some_and(|d| d.value == "none")
    }
}
