use serde::{Deserialize, Serialize};

use crate::locale::{normalize_locale, Direction, Locale};
use crate::store::DEFAULT_STORAGE_KEY;

/// Localization settings (`[i18n]` in `servicepro.toml`)
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct I18nConfig {
    /// Supported locale ids, in preference order for fallbacks
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    /// Locale ids laid out right-to-left
    #[serde(default = "default_rtl")]
    pub rtl: Vec<String>,
    /// Locale used when nothing else matches
    #[serde(default = "default_base")]
    pub base: String,
    /// Preference store key for the chosen locale
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_locales() -> Vec<String> {
    vec!["en".to_string(), "ar".to_string()]
}

fn default_rtl() -> Vec<String> {
    vec!["ar".to_string()]
}

fn default_base() -> String {
    "en".to_string()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: default_locales(),
            rtl: default_rtl(),
            base: default_base(),
            storage_key: default_storage_key(),
        }
    }
}

fn dedup_normalized(ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids.iter().map(|s| normalize_locale(s)) {
        if !id.is_empty() && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

impl I18nConfig {
    /// Normalized copy: ids normalized and deduplicated, the base locale
    /// guaranteed to be in the supported set.
    pub fn normalized(&self) -> Self {
        let mut base = normalize_locale(&self.base);
        if base.is_empty() {
            base = default_base();
        }
        let mut locales = dedup_normalized(&self.locales);
        if !locales.contains(&base) {
            locales.insert(0, base.clone());
        }
        let storage_key = if self.storage_key.trim().is_empty() {
            default_storage_key()
        } else {
            self.storage_key.trim().to_string()
        };

        Self {
            locales,
            rtl: dedup_normalized(&self.rtl),
            base,
            storage_key,
        }
    }

    pub fn is_supported(&self, id: &str) -> bool {
        self.locales.iter().any(|l| *l == normalize_locale(id))
    }

    pub fn direction_of(&self, id: &str) -> Direction {
        let id = normalize_locale(id);
        if self.rtl.contains(&id) {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }

    /// Supported locales with their directions.
    pub fn supported(&self) -> Vec<Locale> {
        self.locales
            .iter()
            .map(|id| Locale::new(id, self.direction_of(id)))
            .collect()
    }
}
