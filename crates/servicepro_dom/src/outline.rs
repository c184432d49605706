//! Page outlines: a JSON description of a page body, and markup output for previews.

use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::document::{Document, ElementId};
use crate::DomError;

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// One element of a page outline.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ElementOutline {
    pub tag: String,
    /// Space separated class list
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub attrs: IndexMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<ElementOutline>,
}

/// A whole page: document title plus the children of `body`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PageOutline {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Vec<ElementOutline>,
}

fn is_valid_tag(tag: &str) -> bool {
    let mut it = tag.chars();
    match it.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    it.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl PageOutline {
    pub fn from_json(src: &str) -> Result<Self, DomError> {
        Ok(serde_json::from_str(src)?)
    }

    /// Build a fresh document from this outline.
    pub fn build(&self) -> Result<Document, DomError> {
        let mut doc = Document::new();
        doc.set_title(self.title.clone());
        let body = doc.body();
        for child in &self.body {
            append_outline(&mut doc, body, child)?;
        }
        Ok(doc)
    }
}

fn append_outline(
    doc: &mut Document,
    parent: ElementId,
    outline: &ElementOutline,
) -> Result<(), DomError> {
    if !is_valid_tag(&outline.tag) {
        return Err(DomError::InvalidTag(outline.tag.clone()));
    }
    let id = doc.create_element(&outline.tag);
    for class in outline.class.split_whitespace() {
        doc.add_class(id, class);
    }
    for (name, value) in &outline.attrs {
        doc.set_attribute(id, name, value.clone());
    }
    if let Some(text) = &outline.text {
        doc.set_text(id, text.clone());
    }
    doc.append_child(parent, id);
    for child in &outline.children {
        append_outline(doc, id, child)?;
    }
    Ok(())
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

impl Document {
    /// Render the document as indented HTML-like markup.
    ///
    /// The title is emitted as a `<title>` line directly under `<html>`.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_element(&mut out, self.root(), 0);
        out
    }

    fn write_element(&self, out: &mut String, id: ElementId, depth: usize) {
        let Some(el) = self.get(id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}<{}", el.tag());
        for (name, value) in el.attributes() {
            let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
        }
        if !el.classes().is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_attr(&el.classes().join(" ")));
        }
        out.push('>');

        if VOID_TAGS.contains(&el.tag()) {
            out.push('\n');
            return;
        }

        if el.children().is_empty() && id != self.root() {
            let _ = writeln!(out, "{}</{}>", escape_text(el.text()), el.tag());
            return;
        }

        out.push('\n');
        if id == self.root() {
            let _ = writeln!(
                out,
                "{indent}  <title>{}</title>",
                escape_text(self.title())
            );
        }
        if !el.text().is_empty() {
            let _ = writeln!(out, "{indent}  {}", escape_text(el.text()));
        }
        for &child in el.children() {
            self.write_element(out, child, depth + 1);
        }
        let _ = writeln!(out, "{indent}</{}>", el.tag());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"{
        "title": "ServicePro",
        "body": [
            { "tag": "nav", "class": "navbar", "children": [
                { "tag": "button", "class": "lang-btn", "attrs": { "data-lang": "en" }, "text": "EN" },
                { "tag": "button", "class": "lang-btn", "attrs": { "data-lang": "ar" }, "text": "AR" }
            ]},
            { "tag": "input", "attrs": { "data-i18n-placeholder": "form.name" } }
        ]
    }"#;

    #[test]
    fn build_from_json() {
        let doc = PageOutline::from_json(PAGE).unwrap().build().unwrap();
        assert_eq!(doc.title(), "ServicePro");
        assert_eq!(doc.elements_with_class("lang-btn").len(), 2);
        let input = doc.elements_with_attribute("data-i18n-placeholder")[0];
        assert_eq!(doc.get(input).unwrap().tag(), "input");
    }

    #[test]
    fn invalid_tag_is_rejected() {
        let outline = PageOutline {
            title: String::new(),
            body: vec![ElementOutline {
                tag: "<script>".to_string(),
                ..Default::default()
            }],
        };
        assert!(matches!(outline.build(), Err(DomError::InvalidTag(_))));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            PageOutline::from_json("{ not json"),
            Err(DomError::Outline(_))
        ));
    }

    #[test]
    fn markup_escapes_text_and_attributes() {
        let mut doc = Document::new();
        doc.set_title("A & B");
        let p = doc.create_element("p");
        doc.set_attribute(p, "title", "say \"hi\"");
        doc.set_text(p, "<b>");
        doc.append_child(doc.body(), p);

        let expected = "<html>\n  <title>A &amp; B</title>\n  <body>\n    <p title=\"say &quot;hi&quot;\">&lt;b&gt;</p>\n  </body>\n</html>\n";
        assert_eq!(doc.to_markup(), expected);
    }

    #[test]
    fn markup_leaves_void_elements_open() {
        let mut doc = Document::new();
        let img = doc.create_element("img");
        doc.set_attribute(img, "alt", "logo");
        doc.append_child(doc.body(), img);
        assert!(doc.to_markup().contains("    <img alt=\"logo\">\n"));
    }
}
