use std::collections::HashMap;
use std::sync::Arc;

use servicepro_dom::events::event_types;
use servicepro_dom::{Document, ElementId, Event};
use tracing::{debug, trace, warn};

use crate::bindings::BindingCache;
use crate::config::I18nConfig;
use crate::dictionary::Dictionary;
use crate::locale::{normalize_locale, primary_subtag, Direction, Locale};
use crate::page::{Page, PageEvents};
use crate::signal::LanguageSignal;
use crate::source::{load_dictionaries, DictionarySource};
use crate::store::PreferenceStore;

/// Class marking a language switch control
pub const SWITCHER_CLASS: &str = "lang-btn";
/// Attribute naming the switch control's target locale
pub const SWITCHER_LOCALE_ATTR: &str = "data-lang";
/// Class set on the switch control of the active locale
pub const ACTIVE_CLASS: &str = "active";

/// Runtime localization state for one page session.
///
/// Owns the loaded dictionaries and the single active locale. All document
/// updates happen in [`LocalizationController::render`], which runs to
/// completion on every locale change.
pub struct LocalizationController {
    config: I18nConfig,
    active: String,
    dictionaries: HashMap<String, Dictionary>,
    store: Box<dyn PreferenceStore>,
    bindings: BindingCache,
}

impl LocalizationController {
    /// Load dictionaries, pick the initial locale, render, and hook up the switch controls.
    ///
    /// Never fails: unloadable dictionaries become empty and the page keeps
    /// showing raw keys or its original text.
    pub async fn initialize<S: DictionarySource>(
        config: I18nConfig,
        source: Arc<S>,
        store: Box<dyn PreferenceStore>,
        signal: &dyn LanguageSignal,
        document: &mut Document,
        events: &mut PageEvents,
    ) -> Self {
        let config = config.normalized();
        let dictionaries = load_dictionaries(source, &config.locales).await;
        Self::start(config, dictionaries, store, signal, document, events)
    }

    /// [`initialize`](Self::initialize) with dictionaries already in hand.
    pub fn start(
        config: I18nConfig,
        dictionaries: HashMap<String, Dictionary>,
        store: Box<dyn PreferenceStore>,
        signal: &dyn LanguageSignal,
        document: &mut Document,
        events: &mut PageEvents,
    ) -> Self {
        let mut controller = Self::with_dictionaries(config, dictionaries, store);

        let saved = controller.store.get(&controller.config.storage_key);
        let detected = signal.language();
        controller.active = controller.resolve_initial(saved.as_deref(), detected.as_deref());
        debug!(
            "LocalizationController::start: active locale `{}` (saved: {:?}, detected: {:?})",
            controller.active, saved, detected
        );

        controller.render(document);
        Self::register_switcher(events);
        controller
    }

    /// Build a controller without rendering or touching the store.
    ///
    /// Only dictionaries for configured locales are kept; configured locales
    /// without one get an empty dictionary. The active locale starts as the base.
    pub fn with_dictionaries(
        config: I18nConfig,
        dictionaries: HashMap<String, Dictionary>,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        let config = config.normalized();
        let mut by_id: HashMap<String, Dictionary> = dictionaries
            .into_iter()
            .map(|(id, dict)| (normalize_locale(&id), dict))
            .filter(|(id, _)| config.is_supported(id))
            .collect();
        for id in &config.locales {
            by_id.entry(id.clone()).or_default();
        }

        Self {
            active: config.base.clone(),
            config,
            dictionaries: by_id,
            store,
            bindings: BindingCache::new(),
        }
    }

    fn is_usable(&self, id: &str) -> bool {
        self.dictionaries.get(id).is_some_and(Dictionary::has_translations)
    }

    /// Initial locale: saved preference, then the language signal's primary
    /// subtag, then the base locale, then any locale that has translations.
    /// Each candidate needs a dictionary with at least one non-empty value.
    fn resolve_initial(&self, saved: Option<&str>, detected: Option<&str>) -> String {
        if let Some(saved) = saved.map(normalize_locale) {
            if self.is_usable(&saved) {
                return saved;
            }
            trace!("ignoring saved locale `{}`", saved);
        }

        let detected = primary_subtag(detected.unwrap_or(&self.config.base));
        if self.is_usable(&detected) {
            return detected;
        }
        if self.is_usable(&self.config.base) {
            return self.config.base.clone();
        }
        self.config
            .locales
            .iter()
            .find(|id| self.is_usable(id))
            .cloned()
            .unwrap_or_else(|| self.config.base.clone())
    }

    pub fn config(&self) -> &I18nConfig {
        &self.config
    }

    pub fn active_locale(&self) -> &str {
        &self.active
    }

    pub fn direction(&self) -> Direction {
        self.config.direction_of(&self.active)
    }

    pub fn is_rtl(&self) -> bool {
        self.direction().is_rtl()
    }

    pub fn supported_locales(&self) -> Vec<Locale> {
        self.config.supported()
    }

    pub fn dictionary(&self, id: &str) -> Option<&Dictionary> {
        self.dictionaries.get(&normalize_locale(id))
    }

    /// Switch the active locale and re-render.
    ///
    /// Unsupported ids and the already-active id are ignored. Returns whether
    /// the locale changed.
    pub fn set_locale(&mut self, document: &mut Document, id: &str, persist: bool) -> bool {
        let id = normalize_locale(id);
        if !self.dictionaries.contains_key(&id) {
            trace!("LocalizationController::set_locale: unsupported `{}`", id);
            return false;
        }
        if id == self.active {
            trace!("LocalizationController::set_locale: `{}` already active", id);
            return false;
        }

        debug!("LocalizationController::set_locale: {} -> {}", self.active, id);
        self.active = id;

        if persist {
            if let Err(e) = self.store.set(&self.config.storage_key, &self.active) {
                warn!("failed to persist locale `{}`: {}", self.active, e);
            }
        }

        self.render(document);
        true
    }

    /// Translate a key, falling back to the key itself.
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.dictionaries
            .get(&self.active)
            .and_then(|d| d.get(key))
            .unwrap_or(key)
    }

    /// Full render pass for the active locale.
    pub fn render(&mut self, document: &mut Document) {
        let dir = self.direction();

        // 1) Root direction and language
        let root = document.root();
        document.set_attribute(root, "dir", dir.as_str());
        document.set_attribute(root, "lang", self.active.as_str());

        // 2) Bound properties; missing keys leave existing content alone
        self.bindings.refresh(document);
        if let Some(dict) = self.dictionaries.get(&self.active) {
            for binding in self.bindings.bindings() {
                if let Some(value) = dict.get(&binding.key) {
                    binding.target.apply(document, binding.element, value);
                }
            }
        }

        // 3) Switch controls
        for btn in document.elements_with_class(SWITCHER_CLASS) {
            let is_active = document
                .attribute(btn, SWITCHER_LOCALE_ATTR)
                .is_some_and(|l| normalize_locale(l) == self.active);
            if is_active {
                document.add_class(btn, ACTIVE_CLASS);
            } else {
                document.remove_class(btn, ACTIVE_CLASS);
            }
        }

        // 4) Body direction class
        let body = document.body();
        document.remove_class(body, Direction::Rtl.as_str());
        document.remove_class(body, Direction::Ltr.as_str());
        document.add_class(body, dir.as_str());
    }

    /// Language switch click handling: the clicked element or its closest
    /// switch control ancestor selects its `data-lang` locale, persisted.
    pub fn handle_click(&mut self, document: &mut Document, target: ElementId) -> bool {
        let Some(btn) = document.closest_with_class(target, SWITCHER_CLASS) else {
            return false;
        };
        let Some(lang) = document
            .attribute(btn, SWITCHER_LOCALE_ATTR)
            .map(str::to_string)
        else {
            return false;
        };
        self.set_locale(document, &lang, true)
    }

    fn register_switcher(events: &mut PageEvents) {
        events.register(event_types::CLICK, |page: &mut Page, event: &mut Event| {
            let Page { document, i18n } = page;
            i18n.handle_click(document, event.target);
        });
    }
}
