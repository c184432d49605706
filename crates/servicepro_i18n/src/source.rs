//! Where dictionaries come from, and the concurrent load that reads them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::dictionary::Dictionary;
use crate::I18nError;

/// A place that can hand out the raw dictionary text for a locale.
pub trait DictionarySource: Send + Sync + 'static {
    fn fetch(&self, locale: &str) -> Result<String, I18nError>;
}

/// Reads `<dir>/<locale>.json`, the layout of the site's `lang/` folder.
#[derive(Clone, Debug)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.dir.join(format!("{locale}.json"))
    }
}

impl DictionarySource for DirSource {
    fn fetch(&self, locale: &str) -> Result<String, I18nError> {
        Ok(fs::read_to_string(self.path_for(locale))?)
    }
}

/// Dictionaries held in memory, for embedded builds and tests.
///
/// Locales without an entry fail to fetch, like an unreachable file.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    files: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locale: &str, src: impl Into<String>) -> Self {
        self.files.insert(locale.to_string(), src.into());
        self
    }
}

impl DictionarySource for StaticSource {
    fn fetch(&self, locale: &str) -> Result<String, I18nError> {
        self.files
            .get(locale)
            .cloned()
            .ok_or_else(|| I18nError::Source(format!("no dictionary for `{locale}`")))
    }
}

fn fetch_and_parse<S: DictionarySource>(source: &S, locale: &str) -> Result<Dictionary, I18nError> {
    let src = source.fetch(locale)?;
    Ok(Dictionary::parse(&src)?)
}

/// Load every requested locale concurrently.
///
/// Each locale is fetched on its own blocking task; none waits on another.
/// The result has an entry for every requested locale: a failed fetch or
/// parse is logged and replaced by an empty dictionary.
pub async fn load_dictionaries<S: DictionarySource>(
    source: Arc<S>,
    locales: &[String],
) -> HashMap<String, Dictionary> {
    let mut tasks = JoinSet::new();
    for locale in locales {
        let source = Arc::clone(&source);
        let locale = locale.clone();
        tasks.spawn_blocking(move || {
            let result = fetch_and_parse(source.as_ref(), &locale);
            (locale, result)
        });
    }

    let mut out = HashMap::with_capacity(locales.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((locale, Ok(dict))) => {
                debug!("loaded dictionary `{}` ({} entries)", locale, dict.len());
                out.insert(locale, dict);
            }
            Ok((locale, Err(e))) => {
                warn!("failed to load dictionary `{}`: {}", locale, e);
                out.insert(locale, Dictionary::new());
            }
            Err(e) => {
                warn!("dictionary load task failed: {}", e);
            }
        }
    }

    for locale in locales {
        out.entry(locale.clone()).or_default();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn locales(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn keys_with_spaces_do_not_drop_the_locale() {
        let source = StaticSource::new()
            .with("en", r#"{ "greet": "Hello", "hero title": "Welcome" }"#)
            .with("ar", r#"{ "greet": "مرحبا" }"#);
        let dicts = load_dictionaries(Arc::new(source), &locales(&["en", "ar"])).await;

        assert_eq!(dicts["en"].len(), 2);
        assert_eq!(dicts["en"].get("greet"), Some("Hello"));
        assert_eq!(dicts["en"].get("hero title"), Some("Welcome"));
    }

    #[tokio::test]
    async fn loads_every_locale() {
        let source = StaticSource::new()
            .with("en", r#"{ "greet": "Hello" }"#)
            .with("ar", r#"{ "greet": "مرحبا" }"#);
        let dicts = load_dictionaries(Arc::new(source), &locales(&["en", "ar"])).await;

        assert_eq!(dicts.len(), 2);
        assert_eq!(dicts["en"].get("greet"), Some("Hello"));
        assert_eq!(dicts["ar"].get("greet"), Some("مرحبا"));
    }

    #[tokio::test]
    async fn unreachable_locale_becomes_empty() {
        let source = StaticSource::new().with("en", r#"{ "greet": "Hello" }"#);
        let dicts = load_dictionaries(Arc::new(source), &locales(&["en", "ar"])).await;

        assert_eq!(dicts["en"].len(), 1);
        assert!(dicts["ar"].is_empty());
    }

    #[tokio::test]
    async fn malformed_locale_becomes_empty() {
        let source = StaticSource::new()
            .with("en", "{ broken")
            .with("ar", r#"{ "greet": "مرحبا" }"#);
        let dicts = load_dictionaries(Arc::new(source), &locales(&["en", "ar"])).await;

        assert!(dicts["en"].is_empty());
        assert_eq!(dicts["ar"].len(), 1);
    }

    #[tokio::test]
    async fn dir_source_reads_json_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en.json"), r#"{ "nav.home": "Home" }"#).unwrap();

        let source = DirSource::new(dir.path());
        let dicts = load_dictionaries(Arc::new(source), &locales(&["en", "ar"])).await;

        assert_eq!(dicts["en"].get("nav.home"), Some("Home"));
        assert!(dicts["ar"].is_empty());
    }
}
