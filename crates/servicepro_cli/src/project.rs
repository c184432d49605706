//! Site scaffolding

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::{SiteConfig, CONFIG_FILE};

/// Create `servicepro.toml` and empty dictionaries for every configured locale.
///
/// Existing files are left alone.
pub fn init_site(path: &Path, name: &str) -> Result<Vec<String>> {
    let config = SiteConfig::new(name);
    let mut created = Vec::new();

    fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))?;

    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, config.to_toml()?)?;
        created.push(CONFIG_FILE.to_string());
    }

    let lang_dir = config.lang_dir(path);
    fs::create_dir_all(&lang_dir)?;
    for locale in &config.i18n.locales {
        let file = lang_dir.join(format!("{locale}.json"));
        if file.exists() {
            continue;
        }
        fs::write(&file, dictionary_template(locale)?)?;
        created.push(format!("{}/{locale}.json", config.site.lang_dir));
    }

    Ok(created)
}

fn dictionary_template(locale: &str) -> Result<String> {
    let greet = match locale {
        "ar" => "مرحبا",
        _ => "Hello",
    };
    let map = serde_json::json!({ "greet": greet });
    serde_json::to_string_pretty(&map).context("Failed to serialize dictionary template")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use servicepro_i18n::Dictionary;
    use tempfile::tempdir;

    #[test]
    fn init_creates_config_and_dictionaries() {
        let dir = tempdir().expect("failed to create temp dir");
        let created = init_site(dir.path(), "Demo").unwrap();
        assert_eq!(created, vec!["servicepro.toml", "lang/en.json", "lang/ar.json"]);

        let config = SiteConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.site.name, "Demo");

        let ar = fs::read_to_string(dir.path().join("lang/ar.json")).unwrap();
        assert_eq!(Dictionary::parse(&ar).unwrap().get("greet"), Some("مرحبا"));
    }

    #[test]
    fn init_keeps_existing_files() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::create_dir_all(dir.path().join("lang")).unwrap();
        fs::write(dir.path().join("lang/en.json"), r#"{ "mine": "x" }"#).unwrap();

        let created = init_site(dir.path(), "Demo").unwrap();
        assert_eq!(created, vec!["servicepro.toml", "lang/ar.json"]);
        let en = fs::read_to_string(dir.path().join("lang/en.json")).unwrap();
        assert!(en.contains("mine"));
    }
}
