//! Element tree management

use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};
use tracing::trace;

new_key_type! {
    pub struct ElementId;
}

/// A single element node.
#[derive(Clone, Debug)]
pub struct Element {
    tag: String,
    attributes: IndexMap<String, String>,
    classes: Vec<String>,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.trim().to_ascii_lowercase(),
            attributes: IndexMap::new(),
            classes: Vec::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// The page document: an `html` root holding a `body`, plus the document title.
///
/// `structure_generation` advances whenever the set of attached elements
/// changes or a `data-*` attribute is written. Callers that cache query
/// results compare generations to know when to rescan.
pub struct Document {
    nodes: SlotMap<ElementId, Element>,
    root: ElementId,
    body: ElementId,
    title: String,
    generation: u64,
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Element::new("html"));
        let mut body_el = Element::new("body");
        body_el.parent = Some(root);
        let body = nodes.insert(body_el);
        if let Some(root_el) = nodes.get_mut(root) {
            root_el.children.push(body);
        }

        Self {
            nodes,
            root,
            body,
            title: String::new(),
            generation: 0,
        }
    }

    /// The `html` element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn structure_generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Create a detached element. It joins the document once appended.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.nodes.insert(Element::new(tag))
    }

    /// Append `child` as the last child of `parent`, detaching it from any previous parent.
    ///
    /// Appending an element under itself or one of its descendants is ignored.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            trace!("Document::append_child: unknown element");
            return;
        }
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            trace!("Document::append_child: refusing to create a cycle");
            return;
        }

        self.detach(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
        self.generation += 1;
    }

    /// Remove an element and all of its descendants.
    ///
    /// The root and body cannot be removed.
    pub fn remove(&mut self, id: ElementId) {
        if id == self.root || id == self.body || !self.nodes.contains_key(id) {
            return;
        }
        self.detach(id);
        self.drop_subtree(id);
        self.generation += 1;
    }

    fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.nodes.get(id).and_then(|e| e.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(e) = self.nodes.get_mut(id) {
            e.parent = None;
        }
    }

    fn drop_subtree(&mut self, id: ElementId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(el) = self.nodes.remove(next) {
                stack.extend(el.children);
            }
        }
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.nodes
            .get(id)
            .and_then(|e| e.attributes.get(name))
            .map(|s| s.as_str())
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        let Some(el) = self.nodes.get_mut(id) else {
            return;
        };
        let value = value.into();
        if el.attributes.get(name) == Some(&value) {
            return;
        }
        el.attributes.insert(name.to_string(), value);
        if name.starts_with("data-") {
            self.generation += 1;
        }
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        let Some(el) = self.nodes.get_mut(id) else {
            return;
        };
        if el.attributes.shift_remove(name).is_some() && name.starts_with("data-") {
            self.generation += 1;
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.nodes.get_mut(id) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(el) = self.nodes.get_mut(id) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Flip `class` on the element. Returns whether it is present afterwards.
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            self.has_class(id, class)
        }
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.nodes.get(id).map(|e| e.text.as_str())
    }

    /// Replace the element's content with plain text, dropping any children.
    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        let children = match self.nodes.get_mut(id) {
            Some(el) => {
                el.text = text.into();
                std::mem::take(&mut el.children)
            }
            None => return,
        };
        if children.is_empty() {
            return;
        }
        for child in children {
            self.drop_subtree(child);
        }
        self.generation += 1;
    }

    /// Iterate from the element's parent up to the root.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let mut cur = self.nodes.get(id).and_then(|e| e.parent);
        std::iter::from_fn(move || {
            let next = cur?;
            cur = self.nodes.get(next).and_then(|e| e.parent);
            Some(next)
        })
    }

    /// The element itself or its nearest ancestor carrying `class`.
    pub fn closest_with_class(&self, id: ElementId, class: &str) -> Option<ElementId> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&e| self.has_class(e, class))
    }

    /// All attached elements in document order (pre-order from the root).
    pub fn descendants(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(el) = self.nodes.get(id) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn elements_with_attribute(&self, name: &str) -> Vec<ElementId> {
        self.descendants()
            .into_iter()
            .filter(|&id| self.attribute(id, name).is_some())
            .collect()
    }

    pub fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        self.descendants()
            .into_iter()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    /// First attached element whose `id` attribute equals `html_id`.
    pub fn element_by_id(&self, html_id: &str) -> Option<ElementId> {
        self.descendants()
            .into_iter()
            .find(|&id| self.attribute(id, "id") == Some(html_id))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc_with_list() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let ul = doc.create_element("ul");
        let a = doc.create_element("li");
        let b = doc.create_element("li");
        doc.append_child(doc.body(), ul);
        doc.append_child(ul, a);
        doc.append_child(ul, b);
        (doc, ul, a, b)
    }

    #[test]
    fn new_document_has_html_and_body() {
        let doc = Document::new();
        assert_eq!(doc.get(doc.root()).unwrap().tag(), "html");
        assert_eq!(doc.get(doc.body()).unwrap().tag(), "body");
        assert_eq!(doc.get(doc.body()).unwrap().parent(), Some(doc.root()));
    }

    #[test]
    fn descendants_are_in_document_order() {
        let (doc, ul, a, b) = doc_with_list();
        assert_eq!(doc.descendants(), vec![doc.root(), doc.body(), ul, a, b]);
    }

    #[test]
    fn detached_elements_are_not_queried() {
        let mut doc = Document::new();
        let orphan = doc.create_element("p");
        doc.set_attribute(orphan, "data-i18n", "x");
        assert!(doc.elements_with_attribute("data-i18n").is_empty());

        doc.append_child(doc.body(), orphan);
        assert_eq!(doc.elements_with_attribute("data-i18n"), vec![orphan]);
    }

    #[test]
    fn remove_drops_descendants() {
        let (mut doc, ul, a, b) = doc_with_list();
        doc.remove(ul);
        assert!(!doc.contains(ul));
        assert!(!doc.contains(a));
        assert!(!doc.contains(b));
        assert!(doc.get(doc.body()).unwrap().children().is_empty());
    }

    #[test]
    fn root_and_body_survive_remove() {
        let mut doc = Document::new();
        doc.remove(doc.root());
        doc.remove(doc.body());
        assert!(doc.contains(doc.root()));
        assert!(doc.contains(doc.body()));
    }

    #[test]
    fn append_refuses_cycles() {
        let (mut doc, ul, a, _) = doc_with_list();
        doc.append_child(a, ul);
        assert_eq!(doc.get(ul).unwrap().parent(), Some(doc.body()));
    }

    #[test]
    fn generation_tracks_structure_and_data_attributes() {
        let (mut doc, ul, a, _) = doc_with_list();
        let g0 = doc.structure_generation();

        doc.set_attribute(a, "placeholder", "x");
        doc.add_class(a, "active");
        assert_eq!(doc.structure_generation(), g0);

        doc.set_attribute(a, "data-i18n", "k");
        let g1 = doc.structure_generation();
        assert!(g1 > g0);

        // Same value again is not a change.
        doc.set_attribute(a, "data-i18n", "k");
        assert_eq!(doc.structure_generation(), g1);

        doc.remove(ul);
        assert!(doc.structure_generation() > g1);
    }

    #[test]
    fn set_text_replaces_children() {
        let (mut doc, ul, a, _) = doc_with_list();
        let g0 = doc.structure_generation();
        doc.set_text(ul, "plain");
        assert_eq!(doc.text(ul), Some("plain"));
        assert!(!doc.contains(a));
        assert!(doc.structure_generation() > g0);
    }

    #[test]
    fn class_list_operations() {
        let (mut doc, _, a, _) = doc_with_list();
        doc.add_class(a, "lang-btn");
        doc.add_class(a, "lang-btn");
        assert_eq!(doc.get(a).unwrap().classes(), &["lang-btn".to_string()]);

        assert!(doc.toggle_class(a, "active"));
        assert!(!doc.toggle_class(a, "active"));
        doc.remove_class(a, "lang-btn");
        assert!(doc.get(a).unwrap().classes().is_empty());
    }

    #[test]
    fn closest_with_class_checks_self_then_ancestors() {
        let (mut doc, ul, a, _) = doc_with_list();
        let span = doc.create_element("span");
        doc.append_child(a, span);
        doc.add_class(ul, "lang-btn");

        assert_eq!(doc.closest_with_class(span, "lang-btn"), Some(ul));
        doc.add_class(span, "lang-btn");
        assert_eq!(doc.closest_with_class(span, "lang-btn"), Some(span));
        assert_eq!(doc.closest_with_class(span, "missing"), None);
    }

    #[test]
    fn element_by_id_finds_attached_element() {
        let (mut doc, _, _, b) = doc_with_list();
        doc.set_attribute(b, "id", "second");
        assert_eq!(doc.element_by_id("second"), Some(b));
        assert_eq!(doc.element_by_id("nope"), None);
    }
}
