use std::collections::HashMap;

use thiserror::Error;

const MAX_DICTIONARY_ENTRIES: usize = 10_000;
const MAX_KEY_BYTES: usize = 128;
const MAX_VALUE_BYTES: usize = 16 * 1024;

/// An immutable key -> display string mapping for one locale.
///
/// Source format is a flat JSON object:
///
/// ```json
/// { "nav.home": "Home", "hero.title": "Reliable home services" }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dictionary {
    entries: HashMap<String, String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look up a key. Empty values count as missing.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any key has a non-empty value.
    pub fn has_translations(&self) -> bool {
        self.entries.values().any(|v| !v.is_empty())
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    /// Keys present in `other` but missing (or empty) here, sorted.
    pub fn missing_from(&self, other: &Dictionary) -> Vec<String> {
        other
            .keys()
            .into_iter()
            .filter(|k| other.contains_key(k) && !self.contains_key(k))
            .map(str::to_string)
            .collect()
    }

    /// Parse a flat JSON object of string values.
    pub fn parse(src: &str) -> Result<Self, DictionaryError> {
        let value: serde_json::Value = serde_json::from_str(src)?;
        let serde_json::Value::Object(raw) = value else {
            return Err(DictionaryError::Catalog(
                "dictionary must be a JSON object".to_string(),
            ));
        };
        if raw.len() > MAX_DICTIONARY_ENTRIES {
            return Err(DictionaryError::Catalog(format!(
                "too many entries (max {MAX_DICTIONARY_ENTRIES})"
            )));
        }

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, v) in raw {
            if key.is_empty() {
                return Err(DictionaryError::Catalog(
                    "dictionary keys must be non-empty".to_string(),
                ));
            }
            if key.len() > MAX_KEY_BYTES {
                return Err(DictionaryError::Catalog(format!(
                    "key `{key}` is too long (max {MAX_KEY_BYTES} bytes)"
                )));
            }
            let serde_json::Value::String(val) = v else {
                return Err(DictionaryError::Catalog(format!(
                    "value for key `{key}` must be a string"
                )));
            };
            if val.len() > MAX_VALUE_BYTES {
                return Err(DictionaryError::Catalog(format!(
                    "value for key `{key}` is too long (max {MAX_VALUE_BYTES} bytes)"
                )));
            }
            entries.insert(key, val);
        }
        Ok(Self { entries })
    }
}

impl<K, V> FromIterator<(K, V)> for Dictionary
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("dictionary json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dictionary error: {0}")]
    Catalog(String),
}
