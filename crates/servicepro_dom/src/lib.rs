//! ServicePro document model
//!
//! A small in-memory stand-in for the browser DOM, just large enough for the
//! site scripts that mutate it:
//!
//! - **Element tree**: tag names, ordered attributes, class lists, text content
//! - **Queries**: by attribute, by class, by `id`, closest ancestor with a class
//! - **Event Dispatch**: document-level listeners keyed by event type
//! - **Page outlines**: build a document from JSON, render it back as markup
//!
//! # Example
//!
//! ```rust
//! use servicepro_dom::Document;
//!
//! let mut doc = Document::new();
//! let heading = doc.create_element("h1");
//! doc.set_attribute(heading, "data-i18n", "hero.title");
//! doc.append_child(doc.body(), heading);
//!
//! assert_eq!(doc.elements_with_attribute("data-i18n"), vec![heading]);
//! ```

mod document;
mod error;
pub mod events;
mod outline;

pub use document::{Document, Element, ElementId};
pub use error::DomError;
pub use events::{Event, EventDispatcher, EventHandler, EventType};
pub use outline::{ElementOutline, PageOutline};
