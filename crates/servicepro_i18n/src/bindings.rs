//! Attribute bindings between document elements and dictionary keys.

use servicepro_dom::{Document, ElementId};

/// Which property of an element a binding writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingTarget {
    /// Visible text content (`data-i18n`)
    Text,
    /// `placeholder` attribute (`data-i18n-placeholder`)
    Placeholder,
    /// `alt` attribute (`data-i18n-alt`)
    Alt,
    /// The document title (`data-i18n-title`)
    Title,
    /// `value` attribute of form controls (`data-i18n-value`)
    Value,
}

impl BindingTarget {
    /// All targets, in render order.
    pub const ALL: [BindingTarget; 5] = [
        BindingTarget::Text,
        BindingTarget::Placeholder,
        BindingTarget::Alt,
        BindingTarget::Title,
        BindingTarget::Value,
    ];

    /// The attribute holding the dictionary key.
    pub fn attribute(self) -> &'static str {
        match self {
            BindingTarget::Text => "data-i18n",
            BindingTarget::Placeholder => "data-i18n-placeholder",
            BindingTarget::Alt => "data-i18n-alt",
            BindingTarget::Title => "data-i18n-title",
            BindingTarget::Value => "data-i18n-value",
        }
    }

    /// Write a translated string to the bound property.
    pub fn apply(self, document: &mut Document, element: ElementId, value: &str) {
        match self {
            BindingTarget::Text => document.set_text(element, value),
            BindingTarget::Placeholder => document.set_attribute(element, "placeholder", value),
            BindingTarget::Alt => document.set_attribute(element, "alt", value),
            BindingTarget::Title => document.set_title(value),
            BindingTarget::Value => document.set_attribute(element, "value", value),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub element: ElementId,
    pub key: String,
    pub target: BindingTarget,
}

/// Bindings found by the last scan, valid for one document structure generation.
#[derive(Debug, Default)]
pub struct BindingCache {
    generation: Option<u64>,
    bindings: Vec<Binding>,
    scans: usize,
}

impl BindingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rescan if the document structure changed since the last scan.
    pub fn refresh(&mut self, document: &Document) {
        let current = document.structure_generation();
        if self.generation == Some(current) {
            return;
        }
        self.bindings = scan(document);
        self.generation = Some(current);
        self.scans += 1;
    }

    pub fn invalidate(&mut self) {
        self.generation = None;
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// How many full scans have run.
    pub fn scans(&self) -> usize {
        self.scans
    }
}

fn scan(document: &Document) -> Vec<Binding> {
    let mut out = Vec::new();
    for target in BindingTarget::ALL {
        let attr = target.attribute();
        for element in document.elements_with_attribute(attr) {
            if let Some(key) = document.attribute(element, attr) {
                out.push(Binding {
                    element,
                    key: key.to_string(),
                    target,
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scan_groups_by_target_in_document_order() {
        let mut doc = Document::new();
        let input = doc.create_element("input");
        doc.set_attribute(input, "data-i18n-placeholder", "form.name");
        let h1 = doc.create_element("h1");
        doc.set_attribute(h1, "data-i18n", "hero.title");
        doc.append_child(doc.body(), input);
        doc.append_child(doc.body(), h1);

        let mut cache = BindingCache::new();
        cache.refresh(&doc);
        let targets: Vec<_> = cache.bindings().iter().map(|b| b.target).collect();
        assert_eq!(targets, vec![BindingTarget::Text, BindingTarget::Placeholder]);
        assert_eq!(cache.bindings()[0].key, "hero.title");
    }

    #[test]
    fn cache_rescans_only_after_structure_change() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.set_attribute(p, "data-i18n", "a");
        doc.append_child(doc.body(), p);

        let mut cache = BindingCache::new();
        cache.refresh(&doc);
        cache.refresh(&doc);
        assert_eq!(cache.scans(), 1);

        // Writing a rendered property is not a structure change.
        doc.set_attribute(p, "placeholder", "x");
        cache.refresh(&doc);
        assert_eq!(cache.scans(), 1);

        let q = doc.create_element("p");
        doc.set_attribute(q, "data-i18n", "b");
        doc.append_child(doc.body(), q);
        cache.refresh(&doc);
        assert_eq!(cache.scans(), 2);
        assert_eq!(cache.bindings().len(), 2);

        cache.invalidate();
        cache.refresh(&doc);
        assert_eq!(cache.scans(), 3);
    }

    #[test]
    fn rebinding_a_key_is_picked_up() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.set_attribute(p, "data-i18n", "old");
        doc.append_child(doc.body(), p);

        let mut cache = BindingCache::new();
        cache.refresh(&doc);
        doc.set_attribute(p, "data-i18n", "new");
        cache.refresh(&doc);
        assert_eq!(cache.bindings()[0].key, "new");
    }
}
