//! ServicePro localization
//!
//! Goals:
//! - One controller owning the active locale and the loaded dictionaries
//! - Runtime locale switching that re-renders every bound element
//! - RTL-aware: root `dir`/`lang` and a body direction class follow the locale
//! - Graceful degradation: failed dictionary loads become empty dictionaries,
//!   missing keys leave the page untouched, `translate` falls back to the key
//!
//! Bindings are attributes carrying a dictionary key:
//! - `data-i18n`: text content
//! - `data-i18n-placeholder`: `placeholder`
//! - `data-i18n-alt`: `alt`
//! - `data-i18n-title`: document title
//! - `data-i18n-value`: `value`
//!
//! Switch controls carry the `lang-btn` class and a `data-lang` attribute.

mod bindings;
mod config;
mod controller;
mod dictionary;
mod error;
mod locale;
mod page;
mod signal;
mod source;
mod store;

pub use bindings::{Binding, BindingCache, BindingTarget};
pub use config::I18nConfig;
pub use controller::{LocalizationController, ACTIVE_CLASS, SWITCHER_CLASS, SWITCHER_LOCALE_ATTR};
pub use dictionary::{Dictionary, DictionaryError};
pub use error::I18nError;
pub use locale::{normalize_locale, primary_subtag, Direction, Locale};
pub use page::{Page, PageEvents};
pub use signal::{FixedLanguage, LanguageSignal};
#[cfg(feature = "system-locale")]
pub use signal::SystemLanguage;
pub use source::{load_dictionaries, DictionarySource, DirSource, StaticSource};
pub use store::{FileStore, MemoryStore, PreferenceStore, DEFAULT_STORAGE_KEY};
