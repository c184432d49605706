//! Site configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use servicepro_i18n::I18nConfig;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "servicepro.toml";

/// Top-level site configuration (servicepro.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub i18n: I18nConfig,
    #[serde(default)]
    pub offline: OfflineConfig,
}

/// Site metadata and file locations (relative to the site root)
#[derive(Debug, Deserialize, Serialize)]
pub struct SiteSection {
    #[serde(default = "default_name")]
    pub name: String,
    /// Directory holding `<locale>.json` dictionaries
    #[serde(default = "default_lang_dir")]
    pub lang_dir: String,
    /// Preference store file standing in for browser local storage
    #[serde(default = "default_storage_file")]
    pub storage_file: String,
}

fn default_name() -> String {
    "ServicePro".to_string()
}

fn default_lang_dir() -> String {
    "lang".to_string()
}

fn default_storage_file() -> String {
    ".servicepro/storage.toml".to_string()
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            lang_dir: default_lang_dir(),
            storage_file: default_storage_file(),
        }
    }
}

/// Offline precache settings, mirrored by the service worker
#[derive(Debug, Deserialize, Serialize)]
pub struct OfflineConfig {
    /// Cache name; bump by hand between releases
    #[serde(default = "default_cache_name")]
    pub cache_name: String,
    /// Root-relative asset paths precached on install
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,
}

fn default_cache_name() -> String {
    "servicepro-v1".to_string()
}

fn default_assets() -> Vec<String> {
    [
        "/",
        "/style.css",
        "/script.js",
        "/language-manager.js",
        "/en.json",
        "/ar.json",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            cache_name: default_cache_name(),
            assets: default_assets(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a directory (looks for servicepro.toml)
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found in {}. Run `servicepro init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: SiteConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(config)
    }

    /// Create a new configuration with the given site name
    pub fn new(name: &str) -> Self {
        Self {
            site: SiteSection {
                name: name.to_string(),
                ..SiteSection::default()
            },
            ..Self::default()
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn lang_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.site.lang_dir)
    }

    pub fn storage_path(&self, root: &Path) -> PathBuf {
        root.join(&self.site.storage_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn defaults_describe_the_servicepro_site() {
        let config = SiteConfig::default();
        assert_eq!(config.site.name, "ServicePro");
        assert_eq!(config.site.lang_dir, "lang");
        assert_eq!(config.i18n.storage_key, "servicepro_lang");
        assert_eq!(config.offline.cache_name, "servicepro-v1");
        assert_eq!(config.offline.assets.len(), 6);
    }

    #[test]
    fn toml_round_trip() {
        let config = SiteConfig::new("Demo");
        let text = config.to_toml().unwrap();
        let parsed: SiteConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.site.name, "Demo");
        assert_eq!(parsed.i18n, config.i18n);
        assert_eq!(parsed.offline.assets, config.offline.assets);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[offline]\ncache_name = \"servicepro-v2\"\n",
        )
        .unwrap();

        let config = SiteConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.offline.cache_name, "servicepro-v2");
        assert_eq!(config.offline.assets.len(), 6);
        assert_eq!(config.i18n.locales, vec!["en", "ar"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().expect("failed to create temp dir");
        let err = SiteConfig::load_from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("servicepro init"));
    }

    #[test]
    fn paths_resolve_against_the_site_root() {
        let config = SiteConfig::default();
        let root = Path::new("/srv/site");
        assert_eq!(config.lang_dir(root), PathBuf::from("/srv/site/lang"));
        assert_eq!(
            config.storage_path(root),
            PathBuf::from("/srv/site/.servicepro/storage.toml")
        );
    }
}
