//! Offline precache manifest for the service worker.

use anyhow::Result;
use serde::Serialize;

use crate::config::OfflineConfig;

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct OfflineManifest {
    pub cache_name: String,
    pub assets: Vec<String>,
}

impl OfflineManifest {
    /// Validate the `[offline]` section: a non-empty cache name and
    /// root-relative asset paths. Duplicates are dropped, order kept.
    pub fn from_config(config: &OfflineConfig) -> Result<Self> {
        let cache_name = config.cache_name.trim();
        if cache_name.is_empty() {
            anyhow::bail!("offline.cache_name must not be empty");
        }

        let mut assets: Vec<String> = Vec::with_capacity(config.assets.len());
        for asset in &config.assets {
            let asset = asset.trim();
            if !asset.starts_with('/') {
                anyhow::bail!("offline asset `{asset}` must start with `/`");
            }
            if !assets.iter().any(|a| a == asset) {
                assets.push(asset.to_string());
            }
        }

        Ok(Self {
            cache_name: cache_name.to_string(),
            assets,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
