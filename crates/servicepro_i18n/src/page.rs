use std::sync::Arc;

use servicepro_dom::{Document, ElementId, Event, EventDispatcher};

use crate::config::I18nConfig;
use crate::controller::LocalizationController;
use crate::signal::LanguageSignal;
use crate::source::DictionarySource;
use crate::store::PreferenceStore;

/// Mutable page state handed to document-level event handlers.
pub struct Page {
    pub document: Document,
    pub i18n: LocalizationController,
}

/// Document-level listeners for a [`Page`].
pub type PageEvents = EventDispatcher<Page>;

impl Page {
    /// Open a page session: initialize localization for `document` and
    /// return the page together with its registered listeners.
    pub async fn open<S: DictionarySource>(
        config: I18nConfig,
        source: Arc<S>,
        store: Box<dyn PreferenceStore>,
        signal: &dyn LanguageSignal,
        mut document: Document,
    ) -> (Page, PageEvents) {
        let mut events = PageEvents::new();
        let i18n = LocalizationController::initialize(
            config,
            source,
            store,
            signal,
            &mut document,
            &mut events,
        )
        .await;
        (Page { document, i18n }, events)
    }

    /// Dispatch a click on `target` to every click listener.
    pub fn click(&mut self, events: &PageEvents, target: ElementId) {
        events.dispatch(self, &mut Event::click(target));
    }

    /// Switch locale as if the user picked it (persisted).
    pub fn set_locale(&mut self, id: &str) -> bool {
        self.i18n.set_locale(&mut self.document, id, true)
    }

    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.i18n.translate(key)
    }
}
